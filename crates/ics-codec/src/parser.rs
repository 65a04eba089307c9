//! Parser — VCALENDAR text → calendar events.
//!
//! The parser walks unfolded content lines once, keeping a stack of open
//! component names and a property map for the VEVENT currently open.
//!
//! # Key design decisions
//!
//! - **Resilience over strictness**: a VEVENT missing `SUMMARY` or `DTSTART`,
//!   or carrying an unparseable date, is dropped on its own. Other blocks in the
//!   same document are still returned. Nothing here returns an error.
//! - **Alarms fold into their event**: properties inside a VALARM never leak
//!   into the event's map (so the alarm's `DESCRIPTION` cannot shadow the
//!   event's). On `END:VALARM` the alarm's `TRIGGER` becomes the event's
//!   [`Alert`]; the first alarm wins.
//! - **First UID wins**: a VEVENT whose `UID` was already seen in the document
//!   is discarded. VEVENTs without a `UID` get a fresh identifier and are
//!   always kept.

use std::collections::{BTreeMap, HashMap, HashSet};

use chrono::{DateTime, Duration, Utc};

use crate::error::{IcsError, Result};
use crate::model::{Alert, CalendarEvent};
use crate::recurrence::from_rrule_string;
use crate::temporal::{decode_duration, decode_instant};
use crate::text::{logical_lines, unescape_text};

/// Parse every well-formed VEVENT in `text`.
///
/// Accepts CRLF, LF, or CR line endings and folded lines. The result may hold
/// fewer events than the document has VEVENT blocks.
///
/// ```
/// use ics_codec::parse;
///
/// let ics = "BEGIN:VCALENDAR\r\nBEGIN:VEVENT\r\nUID:1\r\nSUMMARY:Lunch\\, maybe\r\n\
///            DTSTART:20260301T120000Z\r\nDURATION:PT1H\r\nEND:VEVENT\r\nEND:VCALENDAR\r\n";
/// let events = parse(ics);
/// assert_eq!(events.len(), 1);
/// assert_eq!(events[0].title, "Lunch, maybe");
/// ```
pub fn parse(text: &str) -> Vec<CalendarEvent> {
    let mut parser = Parser::default();
    for (index, line) in logical_lines(text).iter().enumerate() {
        parser.feed(line, index + 1);
    }
    parser.events
}

// ---------------------------------------------------------------------------
// Content lines
// ---------------------------------------------------------------------------

/// One `NAME;KEY=VALUE:value` line, with the name and parameter keys
/// uppercased and parameter quotes stripped. The value is left raw.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ContentLine {
    pub(crate) name: String,
    pub(crate) parameters: BTreeMap<String, String>,
    pub(crate) value: String,
}

impl ContentLine {
    /// Split a logical line at the first `:` that is not inside a quoted
    /// parameter value. Returns `None` for lines without a value separator.
    pub(crate) fn parse(line: &str) -> Option<Self> {
        let colon = find_value_separator(line)?;
        let (head, value) = (&line[..colon], &line[colon + 1..]);

        let mut segments = split_unquoted(head, ';').into_iter();
        let name = segments.next()?.trim().to_ascii_uppercase();
        if name.is_empty() {
            return None;
        }

        let parameters = segments
            .filter_map(|segment| {
                let (key, val) = segment.split_once('=')?;
                Some((key.trim().to_ascii_uppercase(), val.trim().trim_matches('"').to_string()))
            })
            .collect();

        Some(Self {
            name,
            parameters,
            value: value.to_string(),
        })
    }

    /// Case-insensitive parameter test, e.g. `has_parameter("VALUE", "DATE")`.
    pub(crate) fn has_parameter(&self, key: &str, value: &str) -> bool {
        self.parameters
            .get(key)
            .is_some_and(|v| v.eq_ignore_ascii_case(value))
    }
}

fn find_value_separator(line: &str) -> Option<usize> {
    let mut quoted = false;
    for (i, ch) in line.char_indices() {
        match ch {
            '"' => quoted = !quoted,
            ':' if !quoted => return Some(i),
            _ => {}
        }
    }
    None
}

fn split_unquoted(s: &str, separator: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut quoted = false;
    let mut start = 0;
    for (i, ch) in s.char_indices() {
        if ch == '"' {
            quoted = !quoted;
        } else if ch == separator && !quoted {
            parts.push(&s[start..i]);
            start = i + ch.len_utf8();
        }
    }
    parts.push(&s[start..]);
    parts
}

// ---------------------------------------------------------------------------
// Component walker
// ---------------------------------------------------------------------------

type PropertyMap = HashMap<String, ContentLine>;

#[derive(Default)]
struct Parser {
    stack: Vec<String>,
    event: Option<PropertyMap>,
    alarm: Option<PropertyMap>,
    alert: Option<Alert>,
    events: Vec<CalendarEvent>,
    seen_uids: HashSet<String>,
}

impl Parser {
    fn feed(&mut self, line: &str, line_no: usize) {
        if line.trim().is_empty() {
            return;
        }
        let Some(content) = ContentLine::parse(line) else {
            tracing::trace!(line_no, "skipping line without a value separator");
            return;
        };

        match content.name.as_str() {
            "BEGIN" => self.begin(content.value.trim().to_ascii_uppercase(), line_no),
            "END" => self.end(content.value.trim().to_ascii_uppercase(), line_no),
            _ => self.property(content),
        }
    }

    fn begin(&mut self, component: String, line_no: usize) {
        match component.as_str() {
            "VEVENT" => {
                if self.event.is_some() {
                    tracing::warn!(line_no, "VEVENT opened inside an unfinished VEVENT; discarding the outer one");
                }
                self.event = Some(PropertyMap::new());
                self.alert = None;
            }
            "VALARM" if self.event.is_some() => self.alarm = Some(PropertyMap::new()),
            _ => {}
        }
        self.stack.push(component);
    }

    fn end(&mut self, component: String, line_no: usize) {
        match self.stack.iter().rposition(|open| *open == component) {
            Some(index) => {
                if index + 1 != self.stack.len() {
                    tracing::warn!(line_no, component = %component, "END closes components that were never ended");
                }
                self.stack.truncate(index);
            }
            None => {
                tracing::warn!(line_no, component = %component, "END without matching BEGIN");
                return;
            }
        }

        match component.as_str() {
            "VALARM" => self.finish_alarm(),
            "VEVENT" => self.finish_event(line_no),
            _ => {}
        }
    }

    fn property(&mut self, content: ContentLine) {
        let target = match self.stack.last().map(String::as_str) {
            Some("VALARM") => self.alarm.as_mut(),
            Some("VEVENT") => self.event.as_mut(),
            _ => None,
        };
        if let Some(map) = target {
            map.entry(content.name.clone()).or_insert(content);
        }
    }

    fn finish_alarm(&mut self) {
        let Some(alarm) = self.alarm.take() else {
            return;
        };
        if self.alert.is_none() {
            if let Some(trigger) = alarm.get("TRIGGER") {
                self.alert = Some(Alert::from_trigger(&trigger.value));
            }
        }
    }

    fn finish_event(&mut self, line_no: usize) {
        let Some(props) = self.event.take() else {
            return;
        };
        let alert = self.alert.take().unwrap_or_default();

        let event = match build_event(&props, alert) {
            Ok(event) => event,
            Err(err) => {
                tracing::debug!(line_no, error = %err, "dropping malformed VEVENT");
                return;
            }
        };

        if props.contains_key("UID") && !self.seen_uids.insert(event.id().to_string()) {
            tracing::debug!(line_no, uid = event.id(), "dropping VEVENT with duplicate UID");
            return;
        }
        self.events.push(event);
    }
}

// ---------------------------------------------------------------------------
// Event construction
// ---------------------------------------------------------------------------

fn build_event(props: &PropertyMap, alert: Alert) -> Result<CalendarEvent> {
    let title = text_value(props, "SUMMARY")
        .filter(|title| !title.trim().is_empty())
        .ok_or_else(|| IcsError::MissingRequiredProperty("SUMMARY".to_string()))?;

    let dtstart = props
        .get("DTSTART")
        .ok_or_else(|| IcsError::MissingRequiredProperty("DTSTART".to_string()))?;
    let all_day = dtstart.has_parameter("VALUE", "DATE");
    let start = decode_instant(dtstart.value.trim(), all_day)?;
    let end = end_of(props, start, all_day)?;
    if end < start {
        return Err(IcsError::invalid_value("DTEND", "ends before DTSTART"));
    }

    let mut event = match props.get("UID").map(|uid| uid.value.trim()) {
        Some(uid) if !uid.is_empty() => CalendarEvent::with_id(uid, title, start, end),
        _ => CalendarEvent::new(title, start, end),
    };
    event.is_all_day = all_day;
    event.location = text_value(props, "LOCATION");
    event.notes = text_value(props, "DESCRIPTION");
    event.url = text_value(props, "URL");
    event.alert = alert;
    if let Some(rule) = props.get("RRULE") {
        event.recurrence = from_rrule_string(&rule.value);
    }
    Ok(event)
}

/// DTEND, else DTSTART + DURATION, else the RFC 5545 default: the start
/// itself for timed events and one day later for all-day events.
fn end_of(props: &PropertyMap, start: DateTime<Utc>, all_day: bool) -> Result<DateTime<Utc>> {
    if let Some(dtend) = props.get("DTEND") {
        if dtend.has_parameter("VALUE", "DATE") != all_day {
            return Err(IcsError::invalid_value(
                "DTEND",
                "value type differs from DTSTART",
            ));
        }
        return decode_instant(dtend.value.trim(), all_day);
    }

    let length = match props.get("DURATION") {
        Some(duration) => decode_duration(duration.value.trim())?,
        None if all_day => Duration::days(1),
        None => Duration::zero(),
    };
    start
        .checked_add_signed(length)
        .ok_or_else(|| IcsError::invalid_value("DURATION", "end is out of range"))
}

/// Unescaped TEXT value of `name`. An empty value is kept as `Some("")`.
fn text_value(props: &PropertyMap, name: &str) -> Option<String> {
    props.get(name).map(|line| unescape_text(&line.value))
}
