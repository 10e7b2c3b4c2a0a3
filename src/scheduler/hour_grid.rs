use chrono::{DateTime, Utc};

use crate::calendar::time::{HOURS_IN_DAY, MINUTES_IN_HOUR};
use crate::calendar::{DateAdapter, TimeOfDay};
use super::error::SchedulerError;
use super::model::{GridHour, GridSegment};
use super::options::ViewConfig;

/// Visible hours of `view_date`, each split into `hour_segments` slots.
///
/// Hours without a single slot inside the day bounds are left out.
pub fn build_hour_grid<A: DateAdapter + ?Sized>(
    adapter: &A,
    view_date: DateTime<Utc>,
    config: &ViewConfig,
) -> Result<Vec<GridHour>, SchedulerError> {
    config.validate()?;
    Ok(hour_grid(adapter, view_date, config.hour_segments, config.day_start, config.day_end))
}

pub(crate) fn hour_grid<A: DateAdapter + ?Sized>(
    adapter: &A,
    view_date: DateTime<Utc>,
    hour_segments: u32,
    day_start: TimeOfDay,
    day_end: TimeOfDay,
) -> Vec<GridHour> {
    let (day_start, day_end) = (day_start.sanitised(), day_end.sanitised());
    let segment_minutes = i64::from(MINUTES_IN_HOUR / hour_segments);

    let mut start_of_view = adapter.set_minutes(
        adapter.set_hours(adapter.start_of_day(view_date), day_start.hour),
        day_start.minute,
    );
    let mut end_of_view = adapter.set_minutes(
        adapter.set_hours(adapter.start_of_minute(adapter.end_of_day(view_date)), day_end.hour),
        day_end.minute,
    );
    let mut start_of_view_day = adapter.start_of_day(view_date);
    let end_of_view_day = adapter.end_of_day(view_date);

    // A DST switch inside the day breaks hour arithmetic; lay the grid out on
    // the following day and move every slot back afterwards.
    let crosses_dst =
        adapter.utc_offset_minutes(start_of_view_day) != adapter.utc_offset_minutes(end_of_view_day);
    if crosses_dst {
        start_of_view_day = adapter.add_days(start_of_view_day, 1);
        start_of_view = adapter.add_days(start_of_view, 1);
        end_of_view = adapter.add_days(end_of_view, 1);
    }

    let mut hours = Vec::new();
    for hour in 0..HOURS_IN_DAY {
        let mut segments = Vec::new();
        for index in 0..hour_segments {
            let display_date = adapter.add_minutes(
                adapter.add_hours(start_of_view_day, i64::from(hour)),
                i64::from(index) * segment_minutes,
            );
            if display_date < start_of_view || display_date >= end_of_view {
                continue;
            }

            let date = if crosses_dst {
                let moved = adapter.add_days(display_date, -1);
                // wall time skipped by the switch
                if adapter.hour_of(moved) != adapter.hour_of(display_date) {
                    continue;
                }
                moved
            } else {
                display_date
            };

            segments.push(GridSegment {
                date,
                display_date,
                is_start: index == 0,
            });
        }
        if !segments.is_empty() {
            hours.push(GridHour { segments });
        }
    }

    hours
}
