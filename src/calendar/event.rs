use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Id reserved for the transient event previewed while a callback is being scheduled.
pub const PREVIEW_EVENT_ID: i64 = -1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: i64,
    pub start: DateTime<Utc>,
    #[serde(default)]
    pub end: Option<DateTime<Utc>>,
    pub title: String,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub overlap: Option<Overlap>,
    #[serde(default)]
    pub css_class: Option<String>,
    #[serde(default)]
    pub is_disabled: bool,
    #[serde(default)]
    pub is_clickable: bool,
    #[serde(default)]
    pub is_cancelled: bool,
    #[serde(default)]
    pub resizable: Resizable,
    #[serde(default)]
    pub draggable: bool,
}

/// How crowded the spot an event was laid out in is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum Overlap {
    Two,
    ThreeOrMore,
}

impl From<Overlap> for u8 {
    fn from(overlap: Overlap) -> Self {
        match overlap {
            Overlap::Two => 2,
            Overlap::ThreeOrMore => 3,
        }
    }
}

impl TryFrom<u8> for Overlap {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            2 => Ok(Overlap::Two),
            3 => Ok(Overlap::ThreeOrMore),
            other => Err(format!("unsupported overlap level {}", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Resizable {
    #[serde(default)]
    pub before_start: bool,
    #[serde(default)]
    pub after_end: bool,
}

impl Event {
    pub fn new(id: i64, title: impl Into<String>, start: DateTime<Utc>, end: Option<DateTime<Utc>>) -> Self {
        Self {
            id,
            start,
            end,
            title: title.into(),
            content: None,
            overlap: None,
            css_class: None,
            is_disabled: false,
            is_clickable: true,
            is_cancelled: false,
            resizable: Resizable::default(),
            draggable: false,
        }
    }

    pub fn is_preview(&self) -> bool {
        self.id == PREVIEW_EVENT_ID
    }

    /// Point events end where they start.
    pub fn effective_end(&self) -> DateTime<Utc> {
        self.end.unwrap_or(self.start)
    }

    pub fn duration_minutes(&self) -> i64 {
        (self.effective_end() - self.start).num_minutes()
    }

    /// Raises the annotation to `level`; never lowers it.
    pub fn mark_overlap(&mut self, level: Overlap) {
        self.overlap = Some(self.overlap.map_or(level, |current| current.max(level)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 19, 9, 0, 0).unwrap()
    }

    #[test]
    fn new_event_is_clickable_and_not_annotated() {
        let event = Event::new(1, "Call back", start(), None);

        assert!(event.is_clickable);
        assert_eq!(event.overlap, None);
    }

    #[test]
    fn point_event_has_zero_duration() {
        let event = Event::new(1, "Call back", start(), None);

        assert_eq!(event.effective_end(), start());
        assert_eq!(event.duration_minutes(), 0);
    }

    #[test]
    fn event_duration_calculated_correctly() {
        let event = Event::new(1, "Call back", start(), Some(start() + Duration::minutes(90)));

        assert_eq!(event.duration_minutes(), 90);
    }

    #[test]
    fn preview_event_uses_reserved_id() {
        assert!(Event::new(PREVIEW_EVENT_ID, "Preview", start(), None).is_preview());
        assert!(!Event::new(7, "Call back", start(), None).is_preview());
    }

    #[test]
    fn overlap_is_never_downgraded() {
        let mut event = Event::new(1, "Call back", start(), None);

        event.mark_overlap(Overlap::ThreeOrMore);
        event.mark_overlap(Overlap::Two);

        assert_eq!(event.overlap, Some(Overlap::ThreeOrMore));
    }

    #[test]
    fn overlap_serializes_as_level_number() {
        let mut event = Event::new(4, "Call back", start(), None);
        event.mark_overlap(Overlap::Two);

        let json = serde_json::to_value(&event).unwrap();

        assert_eq!(json["overlap"], 2);
    }

    #[test]
    fn minimal_json_event_parses_with_defaults() {
        let json = r#"{"id": 3, "start": "2026-10-19T09:00:00Z", "title": "Call back"}"#;

        let event: Event = serde_json::from_str(json).unwrap();

        assert_eq!(event.end, None);
        assert!(!event.is_clickable);
        assert!(!event.resizable.after_end);
    }

    #[test]
    fn unknown_overlap_level_is_rejected() {
        let json = r#"{"id": 3, "start": "2026-10-19T09:00:00Z", "title": "x", "overlap": 5}"#;

        assert!(serde_json::from_str::<Event>(json).is_err());
    }
}
