use serde::{Deserialize, Serialize};
use std::fmt;

pub const SUNDAY: u32 = 0;
pub const MONDAY: u32 = 1;
pub const TUESDAY: u32 = 2;
pub const WEDNESDAY: u32 = 3;
pub const THURSDAY: u32 = 4;
pub const FRIDAY: u32 = 5;
pub const SATURDAY: u32 = 6;

pub const DAYS_IN_WEEK: u32 = 7;
pub const HOURS_IN_DAY: u32 = 24;
pub const MINUTES_IN_HOUR: u32 = 60;

/// A wall-clock bound of the visible part of a day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TimeOfDay {
    pub hour: u32,
    pub minute: u32,
}

impl TimeOfDay {
    pub const START_OF_DAY: TimeOfDay = TimeOfDay { hour: 0, minute: 0 };
    pub const END_OF_DAY: TimeOfDay = TimeOfDay { hour: 23, minute: 59 };

    pub fn new(hour: u32, minute: u32) -> Self {
        Self { hour, minute }
    }

    /// Clamps into `00:00 ..= 23:59`.
    pub fn sanitised(self) -> Self {
        Self {
            hour: self.hour.min(HOURS_IN_DAY - 1),
            minute: self.minute.min(MINUTES_IN_HOUR - 1),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.hour < HOURS_IN_DAY && self.minute < MINUTES_IN_HOUR
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}
