use serde::{Deserialize, Serialize};

use crate::calendar::time::{DAYS_IN_WEEK, MINUTES_IN_HOUR, SATURDAY, SUNDAY, MONDAY};
use crate::calendar::TimeOfDay;
use super::error::SchedulerError;

pub const SUPPORTED_HOUR_SEGMENTS: [u32; 6] = [1, 2, 4, 6, 12, 60];
pub const DEFAULT_HOUR_SEGMENTS: u32 = 4;
pub const DEFAULT_HOUR_SEGMENT_HEIGHT: f64 = 16.0;
pub const DEFAULT_EVENT_WIDTH: f64 = 1.0;
pub const DEFAULT_VIEW_DAYS: u32 = 7;
pub const DEFAULT_WEEKEND_DAYS: [u32; 2] = [SUNDAY, SATURDAY];

/// Everything a view build needs besides the events and the view date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    pub view_days: u32,
    pub hour_segments: u32,
    pub week_starts_on: u32,
    pub starts_with_today: bool,
    pub excluded_weekdays: Vec<u32>,
    pub weekend_weekdays: Vec<u32>,
    /// Column step used while packing events, before widths are normalised to percentages.
    pub event_width: f64,
    /// Pixel height of a single hour segment.
    pub hour_segment_height: f64,
    pub day_start: TimeOfDay,
    pub day_end: TimeOfDay,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            view_days: DEFAULT_VIEW_DAYS,
            hour_segments: DEFAULT_HOUR_SEGMENTS,
            week_starts_on: MONDAY,
            starts_with_today: false,
            excluded_weekdays: Vec::new(),
            weekend_weekdays: DEFAULT_WEEKEND_DAYS.to_vec(),
            event_width: DEFAULT_EVENT_WIDTH,
            hour_segment_height: DEFAULT_HOUR_SEGMENT_HEIGHT,
            day_start: TimeOfDay::START_OF_DAY,
            day_end: TimeOfDay::END_OF_DAY,
        }
    }
}

impl ViewConfig {
    pub fn validate(&self) -> Result<(), SchedulerError> {
        if !SUPPORTED_HOUR_SEGMENTS.contains(&self.hour_segments) {
            return Err(invalid(format!(
                "hour_segments must be one of {:?}, got {}",
                SUPPORTED_HOUR_SEGMENTS, self.hour_segments
            )));
        }
        if self.view_days == 0 {
            return Err(invalid("view_days must be at least 1".to_string()));
        }
        if self.week_starts_on >= DAYS_IN_WEEK {
            return Err(invalid(format!("week_starts_on must be 0-6, got {}", self.week_starts_on)));
        }
        if let Some(day) = self
            .excluded_weekdays
            .iter()
            .chain(self.weekend_weekdays.iter())
            .find(|day| **day >= DAYS_IN_WEEK)
        {
            return Err(invalid(format!("weekday must be 0-6, got {}", day)));
        }
        if !self.day_start.is_valid() || !self.day_end.is_valid() {
            return Err(invalid(format!(
                "day bounds must lie within 00:00-23:59, got {} - {}",
                self.day_start, self.day_end
            )));
        }
        if self.day_start > self.day_end {
            return Err(invalid(format!(
                "day_start {} is after day_end {}",
                self.day_start, self.day_end
            )));
        }
        if !(self.event_width.is_finite() && self.event_width > 0.0) {
            return Err(invalid(format!("event_width must be positive, got {}", self.event_width)));
        }
        if !(self.hour_segment_height.is_finite() && self.hour_segment_height > 0.0) {
            return Err(invalid(format!(
                "hour_segment_height must be positive, got {}",
                self.hour_segment_height
            )));
        }
        Ok(())
    }

    pub fn segment_minutes(&self) -> u32 {
        MINUTES_IN_HOUR / self.hour_segments
    }

    pub fn pixels_per_minute(&self) -> f64 {
        pixels_per_minute(self.hour_segments, self.hour_segment_height)
    }
}

/// Vertical scale shared by event placement and the "now" indicator.
///
/// The extra `segments / 2 + 0.2` accounts for the segment borders drawn by the grid.
pub fn pixels_per_minute(hour_segments: u32, hour_segment_height: f64) -> f64 {
    let segments = f64::from(hour_segments);
    (segments * hour_segment_height + segments / 2.0 + 0.2) / f64::from(MINUTES_IN_HOUR)
}

fn invalid(message: String) -> SchedulerError {
    SchedulerError::InvalidViewParameters(message)
}
