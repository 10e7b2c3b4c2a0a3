use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::calendar::Event;

/// One slot of the bare hour grid, before any events are attached.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GridSegment {
    pub date: DateTime<Utc>,
    /// Instant the segment was computed at; differs from `date` only on DST days.
    pub display_date: DateTime<Utc>,
    pub is_start: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GridHour {
    pub segments: Vec<GridSegment>,
}

/// An event placed on a day column.
///
/// `top` and `height` are pixels from the start of the visible day;
/// `left` and `width` are percentages of the day column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewEvent {
    pub event: Event,
    pub top: f64,
    pub height: f64,
    pub width: f64,
    pub left: f64,
    pub starts_before_day: bool,
    pub ends_after_day: bool,
}

impl ViewEvent {
    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewHourSegment {
    pub date: DateTime<Utc>,
    pub display_date: DateTime<Utc>,
    pub is_start: bool,
    pub events: Vec<ViewEvent>,
    pub is_disabled: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewHour {
    pub date: DateTime<Utc>,
    pub events: Vec<ViewEvent>,
    pub segments: Vec<ViewHourSegment>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewDay {
    pub date: DateTime<Utc>,
    pub is_past: bool,
    pub is_today: bool,
    pub is_future: bool,
    pub is_weekend: bool,
    pub in_month: bool,
    pub hours: Vec<ViewHour>,
    pub events: Vec<ViewEvent>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewPeriod {
    pub events: Vec<Event>,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SchedulerView {
    pub days: Vec<ViewDay>,
    pub period: ViewPeriod,
}
