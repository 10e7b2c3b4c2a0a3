use chrono::{
    DateTime, Datelike, Duration, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, Offset,
    TimeZone, Timelike, Utc,
};

/// Calendar arithmetic the scheduler is written against.
///
/// Instants are always UTC; every "day", "week", "month" or wall-clock field
/// is interpreted in the adapter's own calendar zone. Weekdays are numbered
/// `0 = Sunday ..= 6 = Saturday`, months `1 ..= 12`.
pub trait DateAdapter {
    fn now(&self) -> DateTime<Utc>;

    fn start_of_day(&self, date: DateTime<Utc>) -> DateTime<Utc>;
    fn end_of_day(&self, date: DateTime<Utc>) -> DateTime<Utc>;
    fn start_of_minute(&self, date: DateTime<Utc>) -> DateTime<Utc>;
    fn start_of_week(&self, date: DateTime<Utc>, week_starts_on: u32) -> DateTime<Utc>;
    fn end_of_week(&self, date: DateTime<Utc>, week_starts_on: u32) -> DateTime<Utc>;
    fn start_of_month(&self, date: DateTime<Utc>) -> DateTime<Utc>;
    fn end_of_month(&self, date: DateTime<Utc>) -> DateTime<Utc>;

    /// Calendar days, keeping the wall-clock time.
    fn add_days(&self, date: DateTime<Utc>, days: i64) -> DateTime<Utc>;
    fn add_hours(&self, date: DateTime<Utc>, hours: i64) -> DateTime<Utc>;
    fn add_minutes(&self, date: DateTime<Utc>, minutes: i64) -> DateTime<Utc>;
    fn add_seconds(&self, date: DateTime<Utc>, seconds: i64) -> DateTime<Utc>;

    /// Whole minutes from `right` to `left`, truncated toward zero.
    fn difference_in_minutes(&self, left: DateTime<Utc>, right: DateTime<Utc>) -> i64;

    fn is_same_day(&self, left: DateTime<Utc>, right: DateTime<Utc>) -> bool;
    fn is_same_month(&self, left: DateTime<Utc>, right: DateTime<Utc>) -> bool;
    fn is_same_second(&self, left: DateTime<Utc>, right: DateTime<Utc>) -> bool;

    fn day_of_week(&self, date: DateTime<Utc>) -> u32;
    fn year_of(&self, date: DateTime<Utc>) -> i32;
    fn month_of(&self, date: DateTime<Utc>) -> u32;
    fn day_of_month(&self, date: DateTime<Utc>) -> u32;
    fn hour_of(&self, date: DateTime<Utc>) -> u32;

    fn set_year(&self, date: DateTime<Utc>, year: i32) -> DateTime<Utc>;
    fn set_month(&self, date: DateTime<Utc>, month: u32) -> DateTime<Utc>;
    fn set_date(&self, date: DateTime<Utc>, day: u32) -> DateTime<Utc>;
    fn set_hours(&self, date: DateTime<Utc>, hours: u32) -> DateTime<Utc>;
    fn set_minutes(&self, date: DateTime<Utc>, minutes: u32) -> DateTime<Utc>;

    /// Offset of the calendar zone from UTC at `date`, in minutes.
    fn utc_offset_minutes(&self, date: DateTime<Utc>) -> i32;
}

/// [`DateAdapter`] backed by a `chrono` time zone.
///
/// Wall-clock times that fall into a DST gap resolve forward by the size of
/// the gap; ambiguous times resolve to the earlier instant. Year and month
/// setters clamp the day-of-month instead of spilling into the next month.
#[derive(Debug, Clone)]
pub struct ZonedAdapter<Tz: TimeZone> {
    tz: Tz,
    fixed_now: Option<DateTime<Utc>>,
}

impl<Tz: TimeZone> ZonedAdapter<Tz> {
    pub fn new(tz: Tz) -> Self {
        Self { tz, fixed_now: None }
    }

    /// Pins `now()` to a fixed instant.
    pub fn with_now(mut self, now: DateTime<Utc>) -> Self {
        self.fixed_now = Some(now);
        self
    }

    pub fn timezone(&self) -> &Tz {
        &self.tz
    }

    fn local(&self, date: DateTime<Utc>) -> NaiveDateTime {
        date.with_timezone(&self.tz).naive_local()
    }

    fn resolve(&self, naive: NaiveDateTime) -> DateTime<Utc> {
        match self.tz.from_local_datetime(&naive) {
            LocalResult::Single(dt) => dt.with_timezone(&Utc),
            LocalResult::Ambiguous(earliest, _) => earliest.with_timezone(&Utc),
            LocalResult::None => {
                // inside a gap: apply the offset in effect before the transition
                let before = naive - Duration::hours(3);
                let offset_seconds = self
                    .tz
                    .from_local_datetime(&before)
                    .earliest()
                    .map(|dt| dt.offset().fix().local_minus_utc())
                    .unwrap_or(0);
                (naive - Duration::seconds(i64::from(offset_seconds))).and_utc()
            }
        }
    }
}

fn days_in_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = if month == 12 { (year + 1, 1) } else { (year, month + 1) };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|first| first.pred_opt())
        .map(|last| last.day())
        .unwrap_or(28)
}

fn with_calendar_date(naive: NaiveDateTime, year: i32, month: u32, day: u32) -> NaiveDateTime {
    let month = month.clamp(1, 12);
    let day = day.clamp(1, days_in_month(year, month));
    NaiveDate::from_ymd_opt(year, month, day)
        .map(|date| date.and_time(naive.time()))
        .unwrap_or(naive)
}

impl<Tz: TimeZone> DateAdapter for ZonedAdapter<Tz> {
    fn now(&self) -> DateTime<Utc> {
        self.fixed_now.unwrap_or_else(Utc::now)
    }

    fn start_of_day(&self, date: DateTime<Utc>) -> DateTime<Utc> {
        self.resolve(self.local(date).date().and_time(NaiveTime::MIN))
    }

    fn end_of_day(&self, date: DateTime<Utc>) -> DateTime<Utc> {
        let midnight = self.local(date).date().and_time(NaiveTime::MIN);
        self.resolve(midnight + Duration::days(1) - Duration::milliseconds(1))
    }

    fn start_of_minute(&self, date: DateTime<Utc>) -> DateTime<Utc> {
        let local = self.local(date);
        let truncated = local
            .with_second(0)
            .and_then(|dt| dt.with_nanosecond(0))
            .unwrap_or(local);
        self.resolve(truncated)
    }

    fn start_of_week(&self, date: DateTime<Utc>, week_starts_on: u32) -> DateTime<Utc> {
        let day = self.day_of_week(date);
        let diff = (day + 7 - week_starts_on % 7) % 7;
        self.start_of_day(self.add_days(date, -i64::from(diff)))
    }

    fn end_of_week(&self, date: DateTime<Utc>, week_starts_on: u32) -> DateTime<Utc> {
        let start = self.start_of_week(date, week_starts_on);
        self.end_of_day(self.add_days(start, 6))
    }

    fn start_of_month(&self, date: DateTime<Utc>) -> DateTime<Utc> {
        let local = self.local(date);
        let first = with_calendar_date(local, local.year(), local.month(), 1);
        self.resolve(first.date().and_time(NaiveTime::MIN))
    }

    fn end_of_month(&self, date: DateTime<Utc>) -> DateTime<Utc> {
        let local = self.local(date);
        let last_day = days_in_month(local.year(), local.month());
        let last = with_calendar_date(local, local.year(), local.month(), last_day);
        self.end_of_day(self.resolve(last.date().and_time(NaiveTime::MIN)))
    }

    fn add_days(&self, date: DateTime<Utc>, days: i64) -> DateTime<Utc> {
        self.resolve(self.local(date) + Duration::days(days))
    }

    fn add_hours(&self, date: DateTime<Utc>, hours: i64) -> DateTime<Utc> {
        date + Duration::hours(hours)
    }

    fn add_minutes(&self, date: DateTime<Utc>, minutes: i64) -> DateTime<Utc> {
        date + Duration::minutes(minutes)
    }

    fn add_seconds(&self, date: DateTime<Utc>, seconds: i64) -> DateTime<Utc> {
        date + Duration::seconds(seconds)
    }

    fn difference_in_minutes(&self, left: DateTime<Utc>, right: DateTime<Utc>) -> i64 {
        (left - right).num_minutes()
    }

    fn is_same_day(&self, left: DateTime<Utc>, right: DateTime<Utc>) -> bool {
        self.local(left).date() == self.local(right).date()
    }

    fn is_same_month(&self, left: DateTime<Utc>, right: DateTime<Utc>) -> bool {
        let (left, right) = (self.local(left), self.local(right));
        left.year() == right.year() && left.month() == right.month()
    }

    fn is_same_second(&self, left: DateTime<Utc>, right: DateTime<Utc>) -> bool {
        left.timestamp() == right.timestamp()
    }

    fn day_of_week(&self, date: DateTime<Utc>) -> u32 {
        self.local(date).weekday().num_days_from_sunday()
    }

    fn year_of(&self, date: DateTime<Utc>) -> i32 {
        self.local(date).year()
    }

    fn month_of(&self, date: DateTime<Utc>) -> u32 {
        self.local(date).month()
    }

    fn day_of_month(&self, date: DateTime<Utc>) -> u32 {
        self.local(date).day()
    }

    fn hour_of(&self, date: DateTime<Utc>) -> u32 {
        self.local(date).hour()
    }

    fn set_year(&self, date: DateTime<Utc>, year: i32) -> DateTime<Utc> {
        let local = self.local(date);
        self.resolve(with_calendar_date(local, year, local.month(), local.day()))
    }

    fn set_month(&self, date: DateTime<Utc>, month: u32) -> DateTime<Utc> {
        let local = self.local(date);
        self.resolve(with_calendar_date(local, local.year(), month, local.day()))
    }

    fn set_date(&self, date: DateTime<Utc>, day: u32) -> DateTime<Utc> {
        let local = self.local(date);
        self.resolve(with_calendar_date(local, local.year(), local.month(), day))
    }

    fn set_hours(&self, date: DateTime<Utc>, hours: u32) -> DateTime<Utc> {
        let local = self.local(date);
        self.resolve(local.with_hour(hours.min(23)).unwrap_or(local))
    }

    fn set_minutes(&self, date: DateTime<Utc>, minutes: u32) -> DateTime<Utc> {
        let local = self.local(date);
        self.resolve(local.with_minute(minutes.min(59)).unwrap_or(local))
    }

    fn utc_offset_minutes(&self, date: DateTime<Utc>) -> i32 {
        date.with_timezone(&self.tz).offset().fix().local_minus_utc() / 60
    }
}
