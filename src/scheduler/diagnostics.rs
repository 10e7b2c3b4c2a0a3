use chrono::{DateTime, Utc};

/// Which of the pixel-overlap rules matched two events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlapRule {
    /// The other event's bottom edge lies strictly inside this event.
    BottomInside,
    /// The other event's top edge lies strictly inside this event.
    TopInside,
    /// This event lies entirely within the other one.
    Contained,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Diagnostic {
    OverlapDetected {
        event_id: i64,
        other_id: i64,
        rule: OverlapRule,
        range: (i64, i64),
        other_range: (i64, i64),
    },
    RightNeighbours {
        day: DateTime<Utc>,
        event_id: i64,
        neighbour_ids: Vec<i64>,
    },
    SegmentEvents {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        event_ids: Vec<i64>,
    },
}

/// Receives layout decisions while a view is built.
pub trait Diagnostics {
    fn record(&self, diagnostic: &Diagnostic);
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoopDiagnostics;

impl Diagnostics for NoopDiagnostics {
    fn record(&self, _diagnostic: &Diagnostic) {}
}

/// Forwards every diagnostic to `tracing` at debug level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingDiagnostics;

impl Diagnostics for TracingDiagnostics {
    fn record(&self, diagnostic: &Diagnostic) {
        match diagnostic {
            Diagnostic::OverlapDetected { event_id, other_id, rule, range, other_range } => {
                tracing::debug!(
                    event_id,
                    other_id,
                    ?rule,
                    top = range.0,
                    bottom = range.1,
                    other_top = other_range.0,
                    other_bottom = other_range.1,
                    "overlapping events"
                );
            }
            Diagnostic::RightNeighbours { day, event_id, neighbour_ids } => {
                tracing::debug!(%day, event_id, ?neighbour_ids, "events to the right");
            }
            Diagnostic::SegmentEvents { start, end, event_ids } => {
                tracing::debug!(%start, %end, ?event_ids, "segment events");
            }
        }
    }
}
