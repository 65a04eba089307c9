//! Calendar record model — the event, alert, recurrence, and attachment types
//! the serializer consumes and the parser produces.
//!
//! Closed sets of wire values (alerts, frequencies, weekdays) are sum types
//! with exhaustive `match` tables, so adding a variant without a wire mapping
//! fails to compile.

use std::collections::BTreeSet;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A calendar event as the surrounding application stores it.
///
/// `start` and `end` are UTC instants. For all-day events only their calendar
/// date is significant; [`CalendarEvent::all_day`] stores them at midnight UTC.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarEvent {
    #[serde(default = "new_event_id")]
    id: String,
    pub title: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    #[serde(default)]
    pub is_all_day: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Minutes of travel before the event. Informational; never written to ICS.
    #[serde(default)]
    pub travel_time: u32,
    #[serde(default)]
    pub alert: Alert,
    #[serde(default)]
    pub recurrence: Recurrence,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<Attachment>,
}

fn new_event_id() -> String {
    Uuid::new_v4().to_string()
}

impl CalendarEvent {
    /// Create a timed event with a freshly generated UUID.
    pub fn new(title: impl Into<String>, start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self::with_id(new_event_id(), title, start, end)
    }

    /// Create a timed event with a caller-supplied identifier (e.g. an ICS `UID`).
    pub fn with_id(
        id: impl Into<String>,
        title: impl Into<String>,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            start,
            end,
            is_all_day: false,
            location: None,
            notes: None,
            url: None,
            travel_time: 0,
            alert: Alert::None,
            recurrence: Recurrence::None,
            attachments: Vec::new(),
        }
    }

    /// Create an all-day event spanning the given calendar dates.
    pub fn all_day(title: impl Into<String>, start: NaiveDate, end: NaiveDate) -> Self {
        let mut event = Self::new(title, midnight_utc(start), midnight_utc(end));
        event.is_all_day = true;
        event
    }

    /// The stable identifier, written as the ICS `UID`.
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn with_alert(mut self, alert: Alert) -> Self {
        self.alert = alert;
        self
    }

    pub fn with_recurrence(mut self, recurrence: Recurrence) -> Self {
        self.recurrence = recurrence;
        self
    }

    pub fn with_travel_time(mut self, minutes: u32) -> Self {
        self.travel_time = minutes;
        self
    }

    pub fn with_attachment(mut self, attachment: Attachment) -> Self {
        self.attachments.push(attachment);
        self
    }
}

/// Midnight UTC of `date`, the stored form of an all-day bound.
pub fn midnight_utc(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(chrono::NaiveTime::MIN).and_utc()
}

/// A file attached to an event. Carried on the record but not emitted to ICS.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    pub id: String,
    pub filename: String,
    #[serde(default)]
    pub data: Vec<u8>,
    pub mime_type: String,
}

// ---------------------------------------------------------------------------
// Alerts
// ---------------------------------------------------------------------------

/// Reminder offset relative to the event start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Alert {
    #[default]
    None,
    AtTime,
    FiveMinutes,
    TenMinutes,
    FifteenMinutes,
    ThirtyMinutes,
    OneHour,
    TwoHours,
    OneDay,
    TwoDays,
    OneWeek,
}

impl Alert {
    /// Every alert, in ascending offset order.
    pub const ALL: [Alert; 11] = [
        Alert::None,
        Alert::AtTime,
        Alert::FiveMinutes,
        Alert::TenMinutes,
        Alert::FifteenMinutes,
        Alert::ThirtyMinutes,
        Alert::OneHour,
        Alert::TwoHours,
        Alert::OneDay,
        Alert::TwoDays,
        Alert::OneWeek,
    ];

    /// The VALARM `TRIGGER` value, or `None` for [`Alert::None`].
    pub fn trigger(self) -> Option<&'static str> {
        crate::temporal::alert_to_trigger(self)
    }

    /// Map a `TRIGGER` value back to an alert; unrecognized triggers give
    /// [`Alert::None`].
    pub fn from_trigger(trigger: &str) -> Self {
        crate::temporal::trigger_to_alert(trigger)
    }
}

// ---------------------------------------------------------------------------
// Recurrence
// ---------------------------------------------------------------------------

/// How an event repeats.
///
/// Custom parameters only exist on the [`Recurrence::Custom`] variant.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Recurrence {
    #[default]
    None,
    Daily,
    Weekly,
    Monthly,
    Yearly,
    Custom(CustomRecurrence),
}

/// Base frequency of a recurrence rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Frequency {
    Daily,
    #[default]
    Weekly,
    Monthly,
    Yearly,
}

impl Frequency {
    /// The RRULE `FREQ` value.
    pub fn as_str(self) -> &'static str {
        match self {
            Frequency::Daily => "DAILY",
            Frequency::Weekly => "WEEKLY",
            Frequency::Monthly => "MONTHLY",
            Frequency::Yearly => "YEARLY",
        }
    }

    /// Parse a `FREQ` value (case-insensitive).
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_uppercase().as_str() {
            "DAILY" => Some(Frequency::Daily),
            "WEEKLY" => Some(Frequency::Weekly),
            "MONTHLY" => Some(Frequency::Monthly),
            "YEARLY" => Some(Frequency::Yearly),
            _ => None,
        }
    }
}

/// Day of the week as used by `BYDAY`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Weekday {
    #[serde(rename = "MO")]
    Monday,
    #[serde(rename = "TU")]
    Tuesday,
    #[serde(rename = "WE")]
    Wednesday,
    #[serde(rename = "TH")]
    Thursday,
    #[serde(rename = "FR")]
    Friday,
    #[serde(rename = "SA")]
    Saturday,
    #[serde(rename = "SU")]
    Sunday,
}

impl Weekday {
    /// Two-letter RFC 5545 weekday code.
    pub fn code(self) -> &'static str {
        match self {
            Weekday::Monday => "MO",
            Weekday::Tuesday => "TU",
            Weekday::Wednesday => "WE",
            Weekday::Thursday => "TH",
            Weekday::Friday => "FR",
            Weekday::Saturday => "SA",
            Weekday::Sunday => "SU",
        }
    }

    /// Parse a two-letter code (case-insensitive).
    pub fn from_code(code: &str) -> Option<Self> {
        match code.to_ascii_uppercase().as_str() {
            "MO" => Some(Weekday::Monday),
            "TU" => Some(Weekday::Tuesday),
            "WE" => Some(Weekday::Wednesday),
            "TH" => Some(Weekday::Thursday),
            "FR" => Some(Weekday::Friday),
            "SA" => Some(Weekday::Saturday),
            "SU" => Some(Weekday::Sunday),
            _ => None,
        }
    }
}

/// User-defined recurrence parameters.
///
/// `count` and `until` are alternative terminations; when both are set,
/// validators treat `until` as the one that governs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomRecurrence {
    #[serde(default)]
    pub frequency: Frequency,
    #[serde(default = "default_interval")]
    pub interval: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub until: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub weekdays: BTreeSet<Weekday>,
}

fn default_interval() -> u32 {
    1
}

impl Default for CustomRecurrence {
    fn default() -> Self {
        Self::new(Frequency::default())
    }
}

impl CustomRecurrence {
    pub fn new(frequency: Frequency) -> Self {
        Self {
            frequency,
            interval: 1,
            count: None,
            until: None,
            weekdays: BTreeSet::new(),
        }
    }

    pub fn every(mut self, interval: u32) -> Self {
        self.interval = interval;
        self
    }

    pub fn count(mut self, count: u32) -> Self {
        self.count = Some(count);
        self
    }

    pub fn until(mut self, until: DateTime<Utc>) -> Self {
        self.until = Some(until);
        self
    }

    pub fn on(mut self, weekdays: impl IntoIterator<Item = Weekday>) -> Self {
        self.weekdays.extend(weekdays);
        self
    }
}
