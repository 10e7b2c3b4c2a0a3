use chrono::{DateTime, Utc};

use crate::calendar::{DateAdapter, Event};
use super::days::{first_visible_day, visible_days};
use super::diagnostics::{Diagnostic, Diagnostics};
use super::error::SchedulerError;
use super::hour_grid::hour_grid;
use super::model::{GridHour, SchedulerView, ViewDay, ViewEvent, ViewHour, ViewHourSegment, ViewPeriod};
use super::options::ViewConfig;
use super::overlap::{annotate_overlaps, assign_columns, normalize_columns, shrink_widths};
use super::period::{events_in_period, is_event_in_period, view_events_in_period};

/// Builds the complete multi-day layout for `events`.
///
/// Each call is independent: `events` is not modified and the result is
/// freshly allocated.
pub fn build_view<A: DateAdapter + ?Sized>(
    adapter: &A,
    events: &[Event],
    view_date: DateTime<Utc>,
    config: &ViewConfig,
    diagnostics: &dyn Diagnostics,
) -> Result<SchedulerView, SchedulerError> {
    config.validate()?;
    validate_events(events)?;

    let period_start = first_visible_day(adapter, view_date, config);
    let last_day = adapter.add_days(period_start, i64::from(config.view_days) - 1);
    let period_end = adapter.end_of_day(last_day);
    let mut period_events = events_in_period(adapter, events, period_start, period_end);

    let mut days = visible_days(adapter, view_date, config);
    let ratio = config.pixels_per_minute();

    let mut sources: Vec<Vec<usize>> = Vec::with_capacity(days.len());
    for day in &mut days {
        let (day_sources, day_events) = layout_day(adapter, day.date, &period_events, config, ratio, diagnostics);
        day.events = day_events;
        sources.push(day_sources);
    }

    // an event drawn on several days shows its strongest overlap everywhere
    for (day, day_sources) in days.iter().zip(&sources) {
        for (view_event, &source) in day.events.iter().zip(day_sources) {
            if let Some(level) = view_event.event.overlap {
                period_events[source].mark_overlap(level);
            }
        }
    }
    for (day, day_sources) in days.iter_mut().zip(&sources) {
        for (view_event, &source) in day.events.iter_mut().zip(day_sources) {
            view_event.event.overlap = period_events[source].overlap;
        }
    }

    // DST days have their own hour count, so the grid is built per day
    for day in &mut days {
        let grid = hour_grid(adapter, day.date, config.hour_segments, config.day_start, config.day_end);
        day.hours = day_hours(adapter, day, &grid, config, diagnostics);
    }

    tracing::debug!(
        days = days.len(),
        events = period_events.len(),
        %period_start,
        %period_end,
        "built scheduler view"
    );

    Ok(SchedulerView {
        days,
        period: ViewPeriod {
            events: period_events,
            start: period_start,
            end: period_end,
        },
    })
}

fn validate_events(events: &[Event]) -> Result<(), SchedulerError> {
    match events.iter().find(|event| event.end.is_some_and(|end| end < event.start)) {
        Some(event) => Err(SchedulerError::InvalidEvent {
            id: event.id,
            reason: format!("ends at {} before it starts at {}", event.effective_end(), event.start),
        }),
        None => Ok(()),
    }
}

/// Visible window of `day`: from the configured start to the configured end minute.
pub fn day_window<A: DateAdapter + ?Sized>(
    adapter: &A,
    day: DateTime<Utc>,
    config: &ViewConfig,
) -> (DateTime<Utc>, DateTime<Utc>) {
    let start = adapter.set_minutes(
        adapter.set_hours(adapter.start_of_day(day), config.day_start.hour),
        config.day_start.minute,
    );
    let end = adapter.set_minutes(
        adapter.set_hours(adapter.start_of_minute(adapter.end_of_day(day)), config.day_end.hour),
        config.day_end.minute,
    );
    (start, end)
}

/// Lays out the events visible on `day`. Returns, alongside each placed
/// event, the index of the period event it came from.
fn layout_day<A: DateAdapter + ?Sized>(
    adapter: &A,
    day: DateTime<Utc>,
    period_events: &[Event],
    config: &ViewConfig,
    ratio: f64,
    diagnostics: &dyn Diagnostics,
) -> (Vec<usize>, Vec<ViewEvent>) {
    let (start_of_view, end_of_view) = day_window(adapter, day, config);

    let mut sources: Vec<usize> = (0..period_events.len())
        .filter(|&index| is_event_in_period(adapter, &period_events[index], start_of_view, end_of_view))
        .collect();
    sources.sort_by_key(|&index| period_events[index].start);

    let mut placed: Vec<ViewEvent> = sources
        .iter()
        .map(|&index| {
            place_event(
                adapter,
                &period_events[index],
                start_of_view,
                end_of_view,
                ratio,
                config.hour_segment_height,
            )
        })
        .collect();

    assign_columns(&mut placed, config.event_width, diagnostics);
    normalize_columns(&mut placed, config.event_width, diagnostics);
    shrink_widths(&mut placed, day, diagnostics);
    annotate_overlaps(&mut placed, diagnostics);

    (sources, placed)
}

fn place_event<A: DateAdapter + ?Sized>(
    adapter: &A,
    event: &Event,
    start_of_view: DateTime<Utc>,
    end_of_view: DateTime<Utc>,
    ratio: f64,
    segment_height: f64,
) -> ViewEvent {
    let event_start = event.start;
    let event_end = event.effective_end();
    let starts_before_day = event_start < start_of_view;
    let ends_after_day = adapter.add_minutes(event_end, -1) > end_of_view;

    let top = if event_start > start_of_view {
        adapter.difference_in_minutes(event_start, start_of_view) as f64 * ratio
    } else {
        0.0
    };

    let from = if starts_before_day { start_of_view } else { event_start };
    let to = if ends_after_day { end_of_view } else { event_end.min(end_of_view) };
    let visible_minutes = adapter.difference_in_minutes(to, from);
    // point events and events clipped down to nothing still take one segment
    let height = if visible_minutes > 0 {
        visible_minutes as f64 * ratio
    } else {
        segment_height
    };

    ViewEvent {
        event: event.clone(),
        top,
        height,
        width: 0.0,
        left: 0.0,
        starts_before_day,
        ends_after_day,
    }
}

fn day_hours<A: DateAdapter + ?Sized>(
    adapter: &A,
    day: &ViewDay,
    grid: &[GridHour],
    config: &ViewConfig,
    diagnostics: &dyn Diagnostics,
) -> Vec<ViewHour> {
    let segment_minutes = i64::from(config.segment_minutes());

    grid.iter()
        .filter_map(|hour| {
            let first = hour.segments.first()?;
            let start_of_hour = adapter.set_hours(adapter.start_of_day(day.date), adapter.hour_of(first.date));
            let end_of_hour = adapter.add_seconds(adapter.add_hours(start_of_hour, 1), -1);
            let events = view_events_in_period(adapter, &day.events, start_of_hour, end_of_hour);

            let segments = hour
                .segments
                .iter()
                .map(|segment| {
                    let date = segment.date;
                    let end = adapter.add_seconds(adapter.add_minutes(date, segment_minutes), -1);
                    let segment_events = view_events_in_period(adapter, &events, date, end);

                    diagnostics.record(&Diagnostic::SegmentEvents {
                        start: date,
                        end,
                        event_ids: segment_events.iter().map(|e| e.event.id).collect(),
                    });

                    ViewHourSegment {
                        date,
                        display_date: segment.display_date,
                        is_start: segment.is_start,
                        events: segment_events,
                        is_disabled: false,
                    }
                })
                .collect();

            Some(ViewHour {
                date: start_of_hour,
                events,
                segments,
            })
        })
        .collect()
}
