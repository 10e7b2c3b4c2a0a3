//! Host-side decisions about what the user may click, computed from a built view.

use chrono::{DateTime, Utc};

use crate::calendar::{DateAdapter, Event};
use super::model::{SchedulerView, ViewEvent, ViewHourSegment};
use super::options::pixels_per_minute;

/// Events starting this close to a segment, in minutes, block clicks on it.
pub const SEGMENT_PROXIMITY_MINUTES: f64 = 7.5;

/// Default validity rule: nothing in the past can be scheduled.
pub fn is_not_past<A: DateAdapter + ?Sized>(adapter: &A, date: DateTime<Utc>) -> bool {
    date >= adapter.now()
}

/// Disables every segment and event the predicate rejects. Segments are
/// judged by their start, events by theirs.
pub fn apply_validity<F>(view: &mut SchedulerView, is_valid: F)
where
    F: Fn(DateTime<Utc>) -> bool,
{
    let mark = |view_events: &mut [ViewEvent]| {
        for view_event in view_events {
            view_event.event.is_disabled = !is_valid(view_event.event.start);
        }
    };

    for day in &mut view.days {
        mark(day.events.as_mut_slice());
        for hour in &mut day.hours {
            mark(hour.events.as_mut_slice());
            for segment in &mut hour.segments {
                segment.is_disabled = !is_valid(segment.date);
                mark(segment.events.as_mut_slice());
            }
        }
    }
    for event in &mut view.period.events {
        event.is_disabled = !is_valid(event.start);
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SegmentInteraction {
    pub disabled: bool,
    pub involved_events: usize,
    /// The preview event competes with at least one other event for this slot.
    pub preview_highly_overlapped: bool,
}

/// Works out whether a segment still accepts clicks once nearby events are considered.
pub fn analyze_segment(segment: &ViewHourSegment, clickable: bool) -> SegmentInteraction {
    let mut interaction = SegmentInteraction {
        disabled: segment.is_disabled,
        ..SegmentInteraction::default()
    };
    if !clickable || segment.is_disabled {
        return interaction;
    }

    let mut preview_involved = false;
    for view_event in &segment.events {
        let offset_seconds = (segment.date - view_event.event.start).num_seconds() as f64;
        let offset_minutes = (offset_seconds / 60.0).floor();
        if offset_minutes.abs() < SEGMENT_PROXIMITY_MINUTES {
            interaction.disabled = true;
            interaction.involved_events += 1;
            preview_involved |= view_event.event.is_preview();
        }
    }
    interaction.preview_highly_overlapped = interaction.involved_events > 1 && preview_involved;
    interaction
}

/// The event to report for a click, if it accepts clicks at all.
pub fn click_target(event: &Event) -> Option<&Event> {
    event.is_clickable.then_some(event)
}

/// Pixel offset of the "now" line from the start of `now`'s day.
pub fn timeline_top<A: DateAdapter + ?Sized>(
    adapter: &A,
    now: DateTime<Utc>,
    hour_segments: u32,
    hour_segment_height: f64,
) -> f64 {
    let elapsed = now - adapter.start_of_day(now);
    let minutes = elapsed.num_milliseconds() as f64 / 60_000.0;
    (pixels_per_minute(hour_segments, hour_segment_height) * minutes).floor()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::{ZonedAdapter, PREVIEW_EVENT_ID};
    use crate::scheduler::diagnostics::NoopDiagnostics;
    use crate::scheduler::options::ViewConfig;
    use crate::scheduler::view::build_view;
    use chrono::{Duration, TimeZone};

    fn at(hour: u32, minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 19, hour, minute, 0).unwrap()
    }

    fn segment(date: DateTime<Utc>, events: Vec<Event>) -> ViewHourSegment {
        ViewHourSegment {
            date,
            display_date: date,
            is_start: true,
            events: events
                .into_iter()
                .map(|event| ViewEvent {
                    event,
                    top: 0.0,
                    height: 16.0,
                    width: 100.0,
                    left: 0.0,
                    starts_before_day: false,
                    ends_after_day: false,
                })
                .collect(),
            is_disabled: false,
        }
    }

    #[test]
    fn past_segments_and_events_are_disabled() {
        let adapter = ZonedAdapter::new(Utc).with_now(at(12, 0));
        let config = ViewConfig { view_days: 1, ..ViewConfig::default() };
        let events = vec![
            Event::new(1, "morning", at(9, 0), Some(at(9, 30))),
            Event::new(2, "afternoon", at(15, 0), Some(at(15, 30))),
        ];
        let mut view = build_view(&adapter, &events, at(0, 0), &config, &NoopDiagnostics).unwrap();

        apply_validity(&mut view, |date| is_not_past(&adapter, date));

        let day = &view.days[0];
        assert!(day.hours[11].segments.iter().all(|s| s.is_disabled));
        assert!(day.hours[12].segments.iter().all(|s| !s.is_disabled));
        assert!(day.events[0].event.is_disabled);
        assert!(!day.events[1].event.is_disabled);
        assert!(day.hours[9].segments[0].events[0].event.is_disabled);
        assert!(view.period.events[0].is_disabled);
    }

    #[test]
    fn event_starting_near_segment_blocks_it() {
        let seg = segment(at(10, 0), vec![Event::new(1, "a", at(10, 5), None)]);

        let interaction = analyze_segment(&seg, true);

        assert!(interaction.disabled);
        assert_eq!(interaction.involved_events, 1);
        assert!(!interaction.preview_highly_overlapped);
    }

    #[test]
    fn distant_event_leaves_segment_enabled() {
        let seg = segment(at(10, 15), vec![Event::new(1, "a", at(10, 0), Some(at(11, 0)))]);

        let interaction = analyze_segment(&seg, true);

        assert!(!interaction.disabled);
        assert_eq!(interaction.involved_events, 0);
    }

    #[test]
    fn preview_sharing_a_slot_is_highly_overlapped() {
        let seg = segment(
            at(10, 0),
            vec![
                Event::new(1, "a", at(10, 0), None),
                Event::new(PREVIEW_EVENT_ID, "preview", at(10, 0) + Duration::minutes(3), None),
            ],
        );

        let interaction = analyze_segment(&seg, true);

        assert_eq!(interaction.involved_events, 2);
        assert!(interaction.preview_highly_overlapped);
    }

    #[test]
    fn non_clickable_segments_are_not_analyzed() {
        let seg = segment(at(10, 0), vec![Event::new(1, "a", at(10, 0), None)]);

        assert_eq!(analyze_segment(&seg, false), SegmentInteraction::default());
    }

    #[test]
    fn only_clickable_events_emit_clicks() {
        let mut event = Event::new(1, "a", at(10, 0), None);
        assert!(click_target(&event).is_some());

        event.is_clickable = false;
        assert!(click_target(&event).is_none());
    }

    #[test]
    fn timeline_tracks_minutes_since_midnight() {
        let adapter = ZonedAdapter::new(Utc);

        let top = timeline_top(&adapter, at(9, 0), 4, 16.0);

        assert_eq!(top, (540.0 * pixels_per_minute(4, 16.0)).floor());
        assert_eq!(timeline_top(&adapter, at(0, 0), 4, 16.0), 0.0);
    }
}
