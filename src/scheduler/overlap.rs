//! Column packing for events that share vertical space on a day.
//!
//! Events are compared on whole pixels: `[top, bottom)` of both ranges is
//! floored before any test.

use chrono::{DateTime, Utc};

use crate::calendar::Overlap;
use super::diagnostics::{Diagnostic, Diagnostics, OverlapRule};
use super::model::ViewEvent;

/// Narrowest width, in percent, an event can be shrunk to.
pub const MIN_EVENT_WIDTH: f64 = 1.0;

/// Rule by which `other` overlaps `range`, if any.
pub fn overlap_rule(range: (f64, f64), other: (f64, f64)) -> Option<OverlapRule> {
    let (top, bottom) = (range.0.floor(), range.1.floor());
    let (other_top, other_bottom) = (other.0.floor(), other.1.floor());

    if top < other_bottom && other_bottom < bottom {
        Some(OverlapRule::BottomInside)
    } else if top < other_top && other_top < bottom {
        Some(OverlapRule::TopInside)
    } else if other_top <= top && bottom <= other_bottom {
        Some(OverlapRule::Contained)
    } else {
        None
    }
}

/// Indices of the `candidates` whose pixel range overlaps `subject`'s.
pub fn overlapping<'a, I>(subject: &ViewEvent, candidates: I, diagnostics: &dyn Diagnostics) -> Vec<usize>
where
    I: IntoIterator<Item = (usize, &'a ViewEvent)>,
{
    let range = (subject.top, subject.bottom());
    candidates
        .into_iter()
        .filter_map(|(index, other)| {
            let rule = overlap_rule(range, (other.top, other.bottom()))?;
            diagnostics.record(&Diagnostic::OverlapDetected {
                event_id: subject.event.id,
                other_id: other.event.id,
                rule,
                range: (range.0.floor() as i64, range.1.floor() as i64),
                other_range: (other.top.floor() as i64, other.bottom().floor() as i64),
            });
            Some(index)
        })
        .collect()
}

fn others(events: &[ViewEvent], skip: usize) -> impl Iterator<Item = (usize, &ViewEvent)> {
    events.iter().enumerate().filter(move |(index, _)| *index != skip)
}

/// Places each event, in order, in the leftmost column step not taken by an
/// earlier overlapping event. Sets `left` to a multiple of `column_width`
/// and `width` to `column_width`.
pub fn assign_columns(events: &mut [ViewEvent], column_width: f64, diagnostics: &dyn Diagnostics) {
    for index in 0..events.len() {
        let (placed, rest) = events.split_at_mut(index);
        let current = &mut rest[0];
        let taken = overlapping(current, placed.iter().enumerate(), diagnostics);

        let mut left = 0.0;
        while taken.iter().any(|&other| placed[other].left == left) {
            left += column_width;
        }
        current.left = left;
        current.width = column_width;
    }
}

/// Number of columns the overlap cluster around `index` spans.
///
/// Starting from the events overlapping `index`, repeatedly pulls in events
/// sitting in a column beyond the current count that overlap the previous
/// step, until no such event remains.
pub fn column_count(
    events: &[ViewEvent],
    columns: &[usize],
    index: usize,
    diagnostics: &dyn Diagnostics,
) -> usize {
    let mut frontier = overlapping(&events[index], others(events, index), diagnostics);
    frontier.push(index);

    loop {
        let count = frontier.iter().map(|&i| columns[i] + 1).max().unwrap_or(1);
        let next: Vec<usize> = (0..events.len())
            .filter(|&candidate| columns[candidate] >= count)
            .filter(|&candidate| {
                let reached = frontier.iter().map(|&i| (i, &events[i]));
                !overlapping(&events[candidate], reached, diagnostics).is_empty()
            })
            .collect();

        if next.is_empty() {
            return count;
        }
        frontier = next;
    }
}

/// Turns column steps into percentages of the day column: every event gets
/// `100 / count` of its cluster's width.
pub fn normalize_columns(events: &mut [ViewEvent], column_width: f64, diagnostics: &dyn Diagnostics) {
    let columns: Vec<usize> = events
        .iter()
        .map(|event| (event.left / column_width).round() as usize)
        .collect();
    let counts: Vec<usize> = (0..events.len())
        .map(|index| column_count(events, &columns, index, diagnostics))
        .collect();

    for ((event, column), count) in events.iter_mut().zip(&columns).zip(&counts) {
        let width = 100.0 / *count as f64;
        event.left = *column as f64 * width;
        event.width = width;
    }
}

/// Trims each event so it stops where the nearest overlapping event to its
/// right begins.
pub fn shrink_widths(events: &mut [ViewEvent], day: DateTime<Utc>, diagnostics: &dyn Diagnostics) {
    for index in 0..events.len() {
        let left = events[index].left;
        let to_the_right = events
            .iter()
            .enumerate()
            .filter(|(_, other)| other.left > left);
        let neighbours = overlapping(&events[index], to_the_right, diagnostics);

        diagnostics.record(&Diagnostic::RightNeighbours {
            day,
            event_id: events[index].event.id,
            neighbour_ids: neighbours.iter().map(|&i| events[i].event.id).collect(),
        });

        let nearest = neighbours
            .iter()
            .map(|&i| events[i].left)
            .fold(f64::INFINITY, f64::min);
        if nearest.is_finite() {
            events[index].width = (nearest - left).max(MIN_EVENT_WIDTH);
        }
    }
}

/// Marks events sharing space with exactly one other event as [`Overlap::Two`]
/// and every member of a crowd of three or more as [`Overlap::ThreeOrMore`].
pub fn annotate_overlaps(events: &mut [ViewEvent], diagnostics: &dyn Diagnostics) {
    let mut marks: Vec<(usize, Overlap)> = Vec::new();

    for index in 0..events.len() {
        let mut group = overlapping(&events[index], others(events, index), diagnostics);
        group.push(index);

        let level = match group.len() {
            0 | 1 => continue,
            2 => Overlap::Two,
            _ => Overlap::ThreeOrMore,
        };
        marks.extend(group.into_iter().map(|member| (member, level)));
    }

    for (member, level) in marks {
        events[member].event.mark_overlap(level);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::Event;
    use crate::scheduler::diagnostics::NoopDiagnostics;
    use chrono::TimeZone;

    fn placed(id: i64, top: f64, height: f64) -> ViewEvent {
        let start = Utc.with_ymd_and_hms(2026, 10, 19, 9, 0, 0).unwrap();
        ViewEvent {
            event: Event::new(id, format!("event {}", id), start, None),
            top,
            height,
            width: 1.0,
            left: 0.0,
            starts_before_day: false,
            ends_after_day: false,
        }
    }

    fn day() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 19, 0, 0, 0).unwrap()
    }

    fn layout(events: &mut [ViewEvent]) {
        assign_columns(events, 1.0, &NoopDiagnostics);
        normalize_columns(events, 1.0, &NoopDiagnostics);
        shrink_widths(events, day(), &NoopDiagnostics);
        annotate_overlaps(events, &NoopDiagnostics);
    }

    #[test]
    fn rules_match_each_kind_of_overlap() {
        assert_eq!(overlap_rule((10.0, 50.0), (0.0, 20.0)), Some(OverlapRule::BottomInside));
        assert_eq!(overlap_rule((10.0, 50.0), (40.0, 80.0)), Some(OverlapRule::TopInside));
        assert_eq!(overlap_rule((10.0, 50.0), (0.0, 80.0)), Some(OverlapRule::Contained));
        assert_eq!(overlap_rule((10.0, 50.0), (10.0, 50.0)), Some(OverlapRule::Contained));
    }

    #[test]
    fn touching_ranges_do_not_overlap() {
        assert_eq!(overlap_rule((10.0, 50.0), (50.0, 80.0)), None);
        assert_eq!(overlap_rule((10.0, 50.0), (0.0, 10.0)), None);
    }

    #[test]
    fn ranges_are_compared_on_whole_pixels() {
        assert_eq!(overlap_rule((10.0, 50.7), (50.2, 80.0)), None);
    }

    #[test]
    fn sequential_events_share_the_first_column() {
        let mut events = vec![placed(1, 0.0, 40.0), placed(2, 40.0, 40.0)];

        layout(&mut events);

        assert!(events.iter().all(|e| e.left == 0.0 && e.width == 100.0));
        assert!(events.iter().all(|e| e.event.overlap.is_none()));
    }

    #[test]
    fn packing_reuses_freed_columns() {
        let mut events = vec![placed(1, 0.0, 100.0), placed(2, 10.0, 20.0), placed(3, 50.0, 20.0)];

        assign_columns(&mut events, 1.0, &NoopDiagnostics);

        let lefts: Vec<f64> = events.iter().map(|e| e.left).collect();
        assert_eq!(lefts, vec![0.0, 1.0, 1.0]);
    }

    #[test]
    fn packing_respects_column_step() {
        let mut events = vec![placed(1, 0.0, 100.0), placed(2, 10.0, 20.0)];

        assign_columns(&mut events, 2.5, &NoopDiagnostics);

        assert_eq!(events[1].left, 2.5);
        assert_eq!(events[1].width, 2.5);
    }

    #[test]
    fn chained_cluster_counts_every_reached_column() {
        let mut events = vec![
            placed(1, 0.0, 100.0),
            placed(2, 0.0, 30.0),
            placed(3, 20.0, 30.0),
        ];
        assign_columns(&mut events, 1.0, &NoopDiagnostics);
        let columns = vec![0, 1, 2];

        assert_eq!(column_count(&events, &columns, 0, &NoopDiagnostics), 3);
        assert_eq!(column_count(&events, &columns, 1, &NoopDiagnostics), 3);
    }

    #[test]
    fn two_overlapping_events_split_the_column() {
        let mut events = vec![placed(1, 0.0, 40.0), placed(2, 0.0, 40.0)];

        layout(&mut events);

        assert_eq!((events[0].left, events[0].width), (0.0, 50.0));
        assert_eq!((events[1].left, events[1].width), (50.0, 50.0));
        assert!(events.iter().all(|e| e.event.overlap == Some(Overlap::Two)));
    }

    #[test]
    fn three_overlapping_events_form_a_staircase() {
        let mut events = vec![placed(1, 0.0, 90.0), placed(2, 10.0, 90.0), placed(3, 20.0, 90.0)];

        layout(&mut events);

        let third = 100.0 / 3.0;
        assert_eq!(events[0].left, 0.0);
        assert!((events[1].left - third).abs() < 1e-9);
        assert!((events[2].left - 2.0 * third).abs() < 1e-9);
        assert!((events[0].width - third).abs() < 1e-9);
        assert!((events[1].width - third).abs() < 1e-9);
        assert!((events[2].width - third).abs() < 1e-9);
        assert!(events.iter().all(|e| e.event.overlap == Some(Overlap::ThreeOrMore)));
    }

    #[test]
    fn cluster_width_follows_transitive_overlaps() {
        // 2 only touches 1, but 1 also reaches the third column through 4
        let mut events = vec![
            placed(1, 0.0, 200.0),
            placed(2, 0.0, 50.0),
            placed(3, 100.0, 50.0),
            placed(4, 100.0, 50.0),
        ];

        layout(&mut events);

        let third = 100.0 / 3.0;
        assert!((events[1].left - third).abs() < 1e-9);
        assert!((events[1].width - third).abs() < 1e-9);
        assert!((events[3].left - 2.0 * third).abs() < 1e-9);
        assert!((events[0].width - third).abs() < 1e-9);
    }

    #[test]
    fn shrink_never_goes_below_minimum_width() {
        let mut events = vec![placed(1, 0.0, 40.0), placed(2, 0.0, 40.0)];
        events[0].left = 10.0;
        events[0].width = 50.0;
        events[1].left = 10.25;

        shrink_widths(&mut events, day(), &NoopDiagnostics);

        assert_eq!(events[0].width, MIN_EVENT_WIDTH);
    }

    #[test]
    fn three_level_is_not_downgraded_by_a_later_pair() {
        // 2 overlaps 1 and 3; 1 and 3 only overlap 2
        let mut events = vec![placed(1, 0.0, 40.0), placed(2, 20.0, 40.0), placed(3, 50.0, 40.0)];

        layout(&mut events);

        assert!(events.iter().all(|e| e.event.overlap == Some(Overlap::ThreeOrMore)));
    }

    #[test]
    fn existing_annotation_is_kept_for_lone_events() {
        let mut events = vec![placed(1, 0.0, 40.0)];
        events[0].event.overlap = Some(Overlap::Two);

        layout(&mut events);

        assert_eq!(events[0].event.overlap, Some(Overlap::Two));
    }
}
