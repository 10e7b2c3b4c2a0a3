use chrono::{NaiveDate, TimeZone, Utc};
use callback_scheduler::calendar::{Event, PREVIEW_EVENT_ID};

/// Demo callbacks around `anchor`, including an overlapping pair, a
/// three-way clash and the preview slot of a callback being scheduled.
pub fn sample_events<Tz: TimeZone>(tz: &Tz, anchor: NaiveDate) -> Vec<Event> {
    let Some(tomorrow) = anchor.succ_opt() else { return Vec::new() };
    let Some(yesterday) = anchor.pred_opt() else { return Vec::new() };

    let callbacks = vec![
        ("Call back: billing question", anchor, 9, 0, Some((9, 30)), None),
        ("Call back: contract renewal", anchor, 9, 15, Some((10, 0)), Some("Customer asked for the sales lead")),
        ("Call back: missed delivery", anchor, 14, 0, Some((14, 30)), Some("Second attempt")),
        ("Call back: onboarding", tomorrow, 10, 0, Some((11, 0)), None),
        ("Call back: upgrade", tomorrow, 10, 15, Some((10, 45)), None),
        ("Call back: refund", tomorrow, 10, 30, Some((11, 30)), Some("Refund approved")),
        ("Call back: voicemail", yesterday, 16, 0, None, None),
    ];

    let mut events = Vec::new();
    for (i, (title, date, start_h, start_m, end, content)) in callbacks.into_iter().enumerate() {
        let Some(start) = local_instant(tz, date, start_h, start_m) else { continue };
        let end = match end {
            Some((end_h, end_m)) => match local_instant(tz, date, end_h, end_m) {
                Some(end) => Some(end),
                None => continue,
            },
            None => None,
        };

        let mut event = Event::new(i as i64 + 1, title, start, end);
        event.content = content.map(String::from);
        event.css_class = Some("callback".to_string());
        events.push(event);
    }

    if let (Some(start), Some(end)) = (
        local_instant(tz, anchor, 14, 15),
        local_instant(tz, anchor, 14, 45),
    ) {
        let mut preview = Event::new(PREVIEW_EVENT_ID, "New callback", start, Some(end));
        preview.is_clickable = false;
        preview.css_class = Some("preview".to_string());
        events.push(preview);
    }

    events
}

fn local_instant<Tz: TimeZone>(tz: &Tz, date: NaiveDate, hour: u32, minute: u32) -> Option<chrono::DateTime<Utc>> {
    let naive = date.and_hms_opt(hour, minute, 0)?;
    match tz.from_local_datetime(&naive) {
        chrono::LocalResult::Single(dt) => Some(dt.with_timezone(&Utc)),
        _ => None,
    }
}
