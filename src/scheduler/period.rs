use chrono::{DateTime, Utc};

use crate::calendar::{DateAdapter, Event};
use super::model::ViewEvent;

/// Whether `event` should be shown in `[period_start, period_end]`.
///
/// Events touching a boundary to the second are included, so nothing falls
/// between two adjacent segments.
pub fn is_event_in_period<A: DateAdapter + ?Sized>(
    adapter: &A,
    event: &Event,
    period_start: DateTime<Utc>,
    period_end: DateTime<Utc>,
) -> bool {
    let event_start = event.start;
    let event_end = event.effective_end();

    if event_start > period_start && event_start < period_end {
        return true;
    }
    if event_end > period_start && event_end < period_end {
        return true;
    }
    if event_start < period_start && event_end > period_end {
        return true;
    }
    if adapter.is_same_second(event_start, period_start) || adapter.is_same_second(event_start, period_end) {
        return true;
    }

    let last_second = adapter.add_seconds(event_end, -1);
    adapter.is_same_second(last_second, period_start) || adapter.is_same_second(last_second, period_end)
}

pub fn events_in_period<A: DateAdapter + ?Sized>(
    adapter: &A,
    events: &[Event],
    period_start: DateTime<Utc>,
    period_end: DateTime<Utc>,
) -> Vec<Event> {
    events
        .iter()
        .filter(|event| is_event_in_period(adapter, event, period_start, period_end))
        .cloned()
        .collect()
}

pub fn view_events_in_period<A: DateAdapter + ?Sized>(
    adapter: &A,
    events: &[ViewEvent],
    period_start: DateTime<Utc>,
    period_end: DateTime<Utc>,
) -> Vec<ViewEvent> {
    events
        .iter()
        .filter(|view_event| is_event_in_period(adapter, &view_event.event, period_start, period_end))
        .cloned()
        .collect()
}
