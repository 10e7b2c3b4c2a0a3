use std::{
    env,
    fmt::Display,
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
    process::{Command, Stdio},
};

use anyhow::Context;
use chrono::{
    format::{Item, StrftimeItems},
    DateTime, Duration, Local, NaiveDate, TimeZone, Utc,
};

use callback_scheduler::{
    calendar::{Event, Overlap, ZonedAdapter},
    scheduler::{
        interaction::{analyze_segment, apply_validity, is_not_past},
        Scheduler, SchedulerView, TracingDiagnostics, ViewDay, ViewEvent,
    },
    storage::config::{Config, DisplayConfig},
};

use crate::sample_events::sample_events;

pub const USAGE: &str =
    "Usage: callback-scheduler [--events FILE] [--date YYYY/MM/DD] [--days N] [--sample]";

const FALLBACK_TIME_FORMAT: &str = "%H:%M";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AgendaOptions {
    pub events: Option<PathBuf>,
    pub date: Option<NaiveDate>,
    pub days: Option<u32>,
    pub sample: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CliMode {
    Agenda(AgendaOptions),
    Help,
}

pub fn parse_cli_mode() -> Result<CliMode, String> {
    parse_args(env::args().skip(1))
}

fn parse_args<I>(args: I) -> Result<CliMode, String>
where
    I: IntoIterator<Item = String>,
{
    let mut options = AgendaOptions::default();
    let mut args = args.into_iter();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--sample" => {
                options.sample = true;
            }
            "--events" => {
                let path = args.next().ok_or("--events needs a file path")?;
                options.events = Some(PathBuf::from(path));
            }
            "--date" => {
                let date_str = args.next().ok_or("--date needs a value")?;
                let date = NaiveDate::parse_from_str(&date_str, "%Y/%m/%d")
                    .map_err(|_| format!("Invalid date '{}'. Use YYYY/MM/DD.", date_str))?;
                options.date = Some(date);
            }
            "--days" => {
                let days_str = args.next().ok_or("--days needs a value")?;
                let days = days_str
                    .parse::<u32>()
                    .map_err(|_| format!("Invalid day count '{}'.", days_str))?;
                options.days = Some(days);
            }
            "--help" | "-h" => return Ok(CliMode::Help),
            _ => return Err(format!("Unknown argument: {}", arg)),
        }
    }

    Ok(CliMode::Agenda(options))
}

pub fn run_agenda_mode(options: AgendaOptions) -> anyhow::Result<()> {
    let mut config = Config::load_or_create().context("Failed to load config")?;
    if let Some(days) = options.days {
        config.view.view_days = days;
    }

    let agenda = match config.timezone()? {
        Some(tz) => build_agenda(tz, &options, &config)?,
        None => build_agenda(Local, &options, &config)?,
    };

    display_with_pager(&agenda).context("Failed to display agenda")
}

fn build_agenda<Tz>(tz: Tz, options: &AgendaOptions, config: &Config) -> anyhow::Result<String>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let date = options
        .date
        .unwrap_or_else(|| Utc::now().with_timezone(&tz).date_naive());

    let mut events = match &options.events {
        Some(path) => load_events(path)?,
        None => Vec::new(),
    };
    if options.sample {
        events.extend(sample_events(&tz, date));
    }

    let scheduler = Scheduler::new(ZonedAdapter::new(tz.clone())).with_diagnostics(TracingDiagnostics);
    let mut view = scheduler.view(&events, local_noon(&tz, date)?, &config.view)?;
    apply_validity(&mut view, |instant| is_not_past(scheduler.adapter(), instant));

    tracing::info!(
        "Built agenda for {} with {} of {} events in range",
        date,
        view.period.events.len(),
        events.len()
    );

    Ok(format_agenda_text(&view, &tz, config))
}

fn load_events(path: &Path) -> anyhow::Result<Vec<Event>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read events from {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse events in {}", path.display()))
}

fn local_noon<Tz: TimeZone>(tz: &Tz, date: NaiveDate) -> anyhow::Result<DateTime<Utc>> {
    let noon = date.and_hms_opt(12, 0, 0).context("Invalid agenda date")?;
    tz.from_local_datetime(&noon)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
        .with_context(|| format!("{} has no noon in the configured timezone", date))
}

fn format_agenda_text<Tz>(view: &SchedulerView, tz: &Tz, config: &Config) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let display = &config.display;
    let time_format = time_format(display);
    let mut lines = Vec::new();
    lines.push(format!(
        "Callbacks {} to {}",
        view.period.start.with_timezone(tz).format("%a %b %d, %Y"),
        view.period.end.with_timezone(tz).format("%a %b %d, %Y")
    ));
    lines.push(String::new());

    for day in &view.days {
        lines.push(day_heading(day, tz));
        if day.events.is_empty() {
            lines.push("  No callbacks scheduled.".to_string());
        } else {
            for view_event in &day.events {
                let line = build_agenda_line(view_event, tz, time_format, display.display_event_details);
                lines.push(truncate_to_width(&format!("  - {}", line), display.max_line_width));
            }
        }
        if display.segment_clickable {
            let slots = open_slots(day, tz, time_format, display, config.view.segment_minutes());
            lines.push(truncate_to_width(&format!("  Open for callbacks: {}", slots), display.max_line_width));
        }
        lines.push(String::new());
    }

    lines.join("\n")
}

fn day_heading<Tz>(day: &ViewDay, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let mut heading = day.date.with_timezone(tz).format("%A, %B %d").to_string();
    if day.is_today {
        heading.push_str(" (today)");
    }
    if day.is_weekend {
        heading.push_str(" (weekend)");
    }
    heading
}

fn build_agenda_line<Tz>(view_event: &ViewEvent, tz: &Tz, time_format: &str, show_details: bool) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let event = &view_event.event;
    let start = event.start.with_timezone(tz).format(time_format);
    let time_label = match event.end {
        Some(end) => format!("{}-{}", start, end.with_timezone(tz).format(time_format)),
        None => start.to_string(),
    };

    let mut line = format!("{:<13} {}", time_label, event.title);
    if show_details
        && let Some(content) = &event.content
        && !content.is_empty()
    {
        line.push_str(&format!(" - {}", content));
    }
    if view_event.width < 100.0 {
        line.push_str(&format!(" [{:.0}%+{:.0}%]", view_event.left, view_event.width));
    }
    match event.overlap {
        Some(Overlap::Two) => line.push_str(" (overlaps 1 other)"),
        Some(Overlap::ThreeOrMore) => line.push_str(" (overlaps 2+ others)"),
        None => {}
    }
    if event.is_cancelled {
        line.push_str(" (cancelled)");
    }
    if event.is_disabled {
        line.push_str(" (past)");
    }
    line
}

/// Segments that still accept a new callback, merged into ranges, or listed
/// one by one when `show_segment_hour` is set.
fn open_slots<Tz>(
    day: &ViewDay,
    tz: &Tz,
    time_format: &str,
    display: &DisplayConfig,
    segment_minutes: u32,
) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let slot = Duration::minutes(i64::from(segment_minutes));
    let label = |instant: DateTime<Utc>| instant.with_timezone(tz).format(time_format).to_string();

    let open: Vec<DateTime<Utc>> = day
        .hours
        .iter()
        .flat_map(|hour| &hour.segments)
        .filter(|segment| !analyze_segment(segment, display.segment_clickable).disabled)
        .map(|segment| segment.date)
        .collect();
    if open.is_empty() {
        return "none".to_string();
    }
    if display.show_segment_hour {
        return open.into_iter().map(label).collect::<Vec<_>>().join(" ");
    }

    let mut ranges: Vec<(DateTime<Utc>, DateTime<Utc>)> = Vec::new();
    for start in open {
        match ranges.last_mut() {
            Some((_, end)) if *end == start => *end = start + slot,
            _ => ranges.push((start, start + slot)),
        }
    }
    ranges
        .into_iter()
        .map(|(start, end)| format!("{}-{}", label(start), label(end)))
        .collect::<Vec<_>>()
        .join(", ")
}

/// The configured strftime pattern, or `%H:%M` when it does not parse.
fn time_format(display: &DisplayConfig) -> &str {
    if StrftimeItems::new(&display.time_format).any(|item| matches!(item, Item::Error)) {
        let pattern = &display.time_format;
        tracing::warn!("Ignoring invalid time format '{}'", pattern);
        FALLBACK_TIME_FORMAT
    } else {
        &display.time_format
    }
}

fn truncate_to_width(line: &str, width: usize) -> String {
    if width > 0 && line.chars().count() > width {
        let mut truncated = line.chars().take(width.saturating_sub(1)).collect::<String>();
        truncated.push('…');
        truncated
    } else {
        line.to_string()
    }
}

fn display_with_pager(text: &str) -> Result<(), io::Error> {
    let pager_value = env::var("PAGER").unwrap_or_else(|_| "less".to_string());
    let mut parts = pager_value.split_whitespace();
    let cmd = match parts.next() {
        Some(c) => c,
        None => {
            print!("{text}");
            return Ok(());
        }
    };
    let args: Vec<&str> = parts.collect();

    match Command::new(cmd)
        .args(&args)
        .stdin(Stdio::piped())
        .spawn()
    {
        Ok(mut child) => {
            if let Some(stdin) = child.stdin.as_mut() {
                stdin.write_all(text.as_bytes())?;
            }
            let _ = child.wait();
        }
        Err(_) => {
            print!("{text}");
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use callback_scheduler::calendar::TimeOfDay;
    use callback_scheduler::scheduler::ViewConfig;
    use chrono::Duration;
    use pretty_assertions::assert_eq;

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    fn monday_nine() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 19, 9, 0, 0).unwrap()
    }

    fn single_day(display: DisplayConfig) -> Config {
        Config {
            view: ViewConfig { view_days: 1, ..ViewConfig::default() },
            display,
            ..Config::default()
        }
    }

    fn agenda_for(events: &[Event], config: &Config) -> String {
        let scheduler = Scheduler::new(ZonedAdapter::new(Utc).with_now(monday_nine()));
        let view = scheduler.view(events, monday_nine(), &config.view).unwrap();
        format_agenda_text(&view, &Utc, config)
    }

    fn morning(display: DisplayConfig) -> Config {
        let mut config = single_day(display);
        config.view.day_start = TimeOfDay::new(9, 0);
        config.view.day_end = TimeOfDay::new(12, 0);
        config
    }

    #[test]
    fn no_arguments_builds_default_agenda() {
        assert_eq!(parse_args(args(&[])), Ok(CliMode::Agenda(AgendaOptions::default())));
    }

    #[test]
    fn all_flags_are_parsed() {
        let mode = parse_args(args(&[
            "--events", "calls.json", "--date", "2026/10/19", "--days", "3", "--sample",
        ]))
        .unwrap();

        assert_eq!(
            mode,
            CliMode::Agenda(AgendaOptions {
                events: Some(PathBuf::from("calls.json")),
                date: NaiveDate::from_ymd_opt(2026, 10, 19),
                days: Some(3),
                sample: true,
            })
        );
    }

    #[test]
    fn help_short_circuits() {
        assert_eq!(parse_args(args(&["--sample", "--help", "--bogus"])), Ok(CliMode::Help));
    }

    #[test]
    fn bad_arguments_are_reported() {
        assert!(parse_args(args(&["--date", "19-10-2026"])).is_err());
        assert!(parse_args(args(&["--days", "many"])).is_err());
        assert!(parse_args(args(&["--events"])).is_err());
        assert_eq!(parse_args(args(&["--agenda"])), Err("Unknown argument: --agenda".to_string()));
    }

    #[test]
    fn empty_day_says_so() {
        let agenda = agenda_for(&[], &single_day(DisplayConfig::default()));

        assert!(agenda.starts_with("Callbacks Mon Oct 19, 2026 to Mon Oct 19, 2026"));
        assert!(agenda.contains("Monday, October 19 (today)"));
        assert!(agenda.contains("No callbacks scheduled."));
    }

    #[test]
    fn overlapping_callbacks_show_columns_and_level() {
        let end = monday_nine() + Duration::hours(1);
        let mut first = Event::new(1, "Call Alice", monday_nine(), Some(end));
        first.content = Some("Renewal".to_string());
        let second = Event::new(2, "Call Bob", monday_nine(), Some(end));

        let agenda = agenda_for(&[first, second], &single_day(DisplayConfig::default()));

        assert!(agenda.contains("09:00-10:00   Call Alice - Renewal [0%+50%] (overlaps 1 other)"));
        assert!(agenda.contains("09:00-10:00   Call Bob [50%+50%] (overlaps 1 other)"));
    }

    #[test]
    fn details_can_be_hidden() {
        let mut event = Event::new(1, "Call Alice", monday_nine(), None);
        event.content = Some("Renewal".to_string());
        let display = DisplayConfig { display_event_details: false, ..DisplayConfig::default() };

        let agenda = agenda_for(&[event], &single_day(display));

        assert!(agenda.contains("- 09:00         Call Alice"));
        assert!(!agenda.contains("Renewal"));
    }

    #[test]
    fn clickable_segments_list_open_ranges() {
        let display = DisplayConfig { segment_clickable: true, ..DisplayConfig::default() };
        let event = Event::new(1, "Call Alice", monday_nine() + Duration::hours(1), Some(monday_nine() + Duration::minutes(90)));

        let agenda = agenda_for(&[event], &morning(display));

        assert!(agenda.contains("  Open for callbacks: 09:00-10:00, 10:15-12:00"));
    }

    #[test]
    fn segment_hours_list_every_open_slot() {
        let display = DisplayConfig {
            segment_clickable: true,
            show_segment_hour: true,
            ..DisplayConfig::default()
        };
        let mut config = morning(display);
        config.view.day_end = TimeOfDay::new(10, 0);
        let event = Event::new(1, "Call Alice", monday_nine() + Duration::minutes(30), None);

        let agenda = agenda_for(&[event], &config);

        assert!(agenda.contains("  Open for callbacks: 09:00 09:15 09:45"));
    }

    #[test]
    fn open_slots_are_hidden_unless_segments_are_clickable() {
        let agenda = agenda_for(&[], &morning(DisplayConfig::default()));

        assert!(!agenda.contains("Open for callbacks"));
    }

    #[test]
    fn agenda_lines_respect_max_width() {
        let display = DisplayConfig { max_line_width: 20, ..DisplayConfig::default() };
        let event = Event::new(1, "Call back about the contract renewal", monday_nine(), None);

        let agenda = agenda_for(&[event], &single_day(display));

        assert!(agenda.contains("  - 09:00         C…"));
        assert!(agenda
            .lines()
            .filter(|line| line.starts_with("  - "))
            .all(|line| line.chars().count() <= 20));
    }

    #[test]
    fn invalid_time_format_falls_back() {
        let display = DisplayConfig { time_format: "%Q".to_string(), ..DisplayConfig::default() };

        assert_eq!(time_format(&display), FALLBACK_TIME_FORMAT);
        assert_eq!(time_format(&DisplayConfig::default()), "%H:%M");
    }

    #[test]
    fn long_lines_are_truncated() {
        assert_eq!(truncate_to_width("Call back tomorrow", 8), "Call ba…");
        assert_eq!(truncate_to_width("short", 8), "short");
    }

    #[test]
    fn events_load_from_json_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("events.json");
        fs::write(
            &path,
            r#"[{"id": 1, "start": "2026-10-19T09:00:00Z", "end": "2026-10-19T09:30:00Z", "title": "Call"}]"#,
        )
        .unwrap();

        let events = load_events(&path).unwrap();

        assert_eq!(events.len(), 1);
        assert_eq!(events[0].end, Some(monday_nine() + Duration::minutes(30)));
    }

    #[test]
    fn noon_resolves_in_zone() {
        let noon = local_noon(&chrono_tz::America::New_York, NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()).unwrap();

        assert_eq!(noon, Utc.with_ymd_and_hms(2026, 10, 19, 16, 0, 0).unwrap());
    }
}
