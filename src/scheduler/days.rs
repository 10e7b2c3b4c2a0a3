use chrono::{DateTime, Utc};

use crate::calendar::time::DAYS_IN_WEEK;
use crate::calendar::DateAdapter;
use super::error::SchedulerError;
use super::model::ViewDay;
use super::options::ViewConfig;

/// First day shown: the view date itself for short or "starts today" views,
/// otherwise the start of its week.
pub fn first_visible_day<A: DateAdapter + ?Sized>(
    adapter: &A,
    view_date: DateTime<Utc>,
    config: &ViewConfig,
) -> DateTime<Utc> {
    if config.starts_with_today || config.view_days < DAYS_IN_WEEK {
        adapter.start_of_day(view_date)
    } else {
        adapter.start_of_week(view_date, config.week_starts_on)
    }
}

/// Visible days of the view, in order. Excluded weekdays are dropped, so the
/// result can be shorter than `view_days`.
pub fn build_days<A: DateAdapter + ?Sized>(
    adapter: &A,
    view_date: DateTime<Utc>,
    config: &ViewConfig,
) -> Result<Vec<ViewDay>, SchedulerError> {
    config.validate()?;
    Ok(visible_days(adapter, view_date, config))
}

pub(crate) fn visible_days<A: DateAdapter + ?Sized>(
    adapter: &A,
    view_date: DateTime<Utc>,
    config: &ViewConfig,
) -> Vec<ViewDay> {
    let start = first_visible_day(adapter, view_date, config);
    let today = adapter.start_of_day(adapter.now());

    (0..config.view_days)
        .map(|offset| adapter.add_days(start, i64::from(offset)))
        .filter(|date| !config.excluded_weekdays.contains(&adapter.day_of_week(*date)))
        .map(|date| view_day(adapter, date, today, &config.weekend_weekdays))
        .collect()
}

fn view_day<A: DateAdapter + ?Sized>(
    adapter: &A,
    date: DateTime<Utc>,
    today: DateTime<Utc>,
    weekend_weekdays: &[u32],
) -> ViewDay {
    ViewDay {
        date,
        is_past: date < today,
        is_today: adapter.is_same_day(date, today),
        is_future: date >= adapter.add_days(today, 1),
        is_weekend: weekend_weekdays.contains(&adapter.day_of_week(date)),
        in_month: adapter.is_same_month(date, today),
        hours: Vec::new(),
        events: Vec::new(),
    }
}
