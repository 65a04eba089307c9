//! Serializer — calendar events → VCALENDAR text.
//!
//! Output layout for each document:
//!
//! ```text
//! BEGIN:VCALENDAR
//! VERSION:2.0
//! PRODID:-//ics-codec//EN
//! CALSCALE:GREGORIAN
//! METHOD:PUBLISH
//! BEGIN:VEVENT            (one block per event)
//! ...
//! END:VEVENT
//! END:VCALENDAR
//! ```
//!
//! Every content line goes through [`fold_line_with`] and lines are joined
//! with CRLF, including after the final `END:VCALENDAR`.
//!
//! Serialization is total: it never fails and does not re-validate its input.
//! Callers that need a conformance gate run the validator over the output.

use chrono::{DateTime, Utc};

use crate::model::CalendarEvent;
use crate::recurrence::to_rrule_string;
use crate::temporal::encode_instant;
use crate::text::{escape_text, fold_line_with, normalize_newlines, FoldMode};

/// Default `PRODID` value.
pub const PRODUCT_ID: &str = "-//ics-codec//EN";

/// Knobs for [`serialize_with`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SerializeOptions {
    /// Value of the `PRODID` header line.
    pub product_id: String,
    /// How the 75-unit line limit is measured.
    pub fold_mode: FoldMode,
    /// Fixed `DTSTAMP`. When `None`, the time of serialization is used, so
    /// serializing the same event twice yields different bytes.
    pub timestamp: Option<DateTime<Utc>>,
}

impl Default for SerializeOptions {
    fn default() -> Self {
        Self {
            product_id: PRODUCT_ID.to_string(),
            fold_mode: FoldMode::default(),
            timestamp: None,
        }
    }
}

impl SerializeOptions {
    pub fn with_product_id(mut self, product_id: impl Into<String>) -> Self {
        self.product_id = product_id.into();
        self
    }

    pub fn with_fold_mode(mut self, fold_mode: FoldMode) -> Self {
        self.fold_mode = fold_mode;
        self
    }

    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }
}

/// Serialize events into one VCALENDAR document with default options.
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use ics_codec::{serialize, CalendarEvent};
///
/// let start = Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap();
/// let end = Utc.with_ymd_and_hms(2026, 3, 1, 10, 0, 0).unwrap();
/// let ics = serialize(&[CalendarEvent::new("Standup", start, end)]);
/// assert!(ics.contains("DTSTART:20260301T090000Z\r\n"));
/// assert!(ics.ends_with("END:VCALENDAR\r\n"));
/// ```
pub fn serialize(events: &[CalendarEvent]) -> String {
    serialize_with(events, &SerializeOptions::default())
}

/// Serialize a single event into its own VCALENDAR document.
pub fn serialize_event(event: &CalendarEvent) -> String {
    serialize(std::slice::from_ref(event))
}

/// Serialize events into one VCALENDAR document.
pub fn serialize_with(events: &[CalendarEvent], options: &SerializeOptions) -> String {
    let stamp = encode_instant(options.timestamp.unwrap_or_else(Utc::now), false);

    let mut lines: Vec<String> = vec![
        "BEGIN:VCALENDAR".to_string(),
        "VERSION:2.0".to_string(),
        format!("PRODID:{}", options.product_id),
        "CALSCALE:GREGORIAN".to_string(),
        "METHOD:PUBLISH".to_string(),
    ];
    for event in events {
        push_event(event, &stamp, &mut lines);
    }
    lines.push("END:VCALENDAR".to_string());

    tracing::debug!(events = events.len(), lines = lines.len(), "serialized calendar");

    let mut out = String::new();
    for line in &lines {
        out.push_str(&fold_line_with(line, options.fold_mode));
        out.push_str("\r\n");
    }
    out
}

/// Append the VEVENT block for one event.
fn push_event(event: &CalendarEvent, stamp: &str, lines: &mut Vec<String>) {
    lines.push("BEGIN:VEVENT".to_string());
    lines.push(format!("UID:{}", event.id()));
    lines.push(format!("DTSTAMP:{stamp}"));
    lines.push(date_line("DTSTART", event.start, event.is_all_day));
    lines.push(date_line("DTEND", event.end, event.is_all_day));
    lines.push(text_line("SUMMARY", &event.title));

    if let Some(location) = &event.location {
        lines.push(text_line("LOCATION", location));
    }
    if let Some(notes) = &event.notes {
        lines.push(text_line("DESCRIPTION", notes));
    }
    if let Some(url) = &event.url {
        lines.push(text_line("URL", url));
    }

    if let Some(trigger) = event.alert.trigger() {
        lines.push("BEGIN:VALARM".to_string());
        lines.push("ACTION:DISPLAY".to_string());
        lines.push(text_line("DESCRIPTION", &event.title));
        lines.push(format!("TRIGGER:{trigger}"));
        lines.push("END:VALARM".to_string());
    }

    if let Some(rule) = to_rrule_string(&event.recurrence) {
        lines.push(format!("RRULE:{rule}"));
    }

    lines.push("END:VEVENT".to_string());
}

/// `NAME:value` for UTC instants, `NAME;VALUE=DATE:value` for all-day dates.
fn date_line(name: &str, t: DateTime<Utc>, all_day: bool) -> String {
    if all_day {
        format!("{name};VALUE=DATE:{}", encode_instant(t, true))
    } else {
        format!("{name}:{}", encode_instant(t, false))
    }
}

/// `NAME:escaped-text`, with embedded CR/CRLF normalized to a newline first.
fn text_line(name: &str, value: &str) -> String {
    format!("{name}:{}", escape_text(&normalize_newlines(value)))
}
