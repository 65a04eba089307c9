//! # ics-codec
//!
//! Pure-Rust encoder and decoder between calendar event records and
//! **iCalendar (RFC 5545)** VCALENDAR / VEVENT / VALARM text.
//!
//! ## Quick start
//!
//! ```rust
//! use chrono::{TimeZone, Utc};
//! use ics_codec::{parse, serialize, Alert, CalendarEvent};
//!
//! let start = Utc.with_ymd_and_hms(2026, 2, 17, 14, 0, 0).unwrap();
//! let end = Utc.with_ymd_and_hms(2026, 2, 17, 15, 0, 0).unwrap();
//! let event = CalendarEvent::new("Design review; room 4", start, end)
//!     .with_alert(Alert::FifteenMinutes);
//!
//! // Record → ICS
//! let ics = serialize(&[event.clone()]);
//! assert!(ics.contains("SUMMARY:Design review\\; room 4\r\n"));
//! assert!(ics.contains("TRIGGER:-PT15M\r\n"));
//!
//! // ICS → record (roundtrip)
//! let back = parse(&ics);
//! assert_eq!(back.len(), 1);
//! assert_eq!(back[0].title, event.title);
//! assert_eq!(back[0].alert, Alert::FifteenMinutes);
//! ```
//!
//! ## Modules
//!
//! - [`text`] — line folding/unfolding and TEXT escaping
//! - [`temporal`] — DATE / DATE-TIME, DURATION, and alarm trigger values
//! - [`model`] — `CalendarEvent`, `Alert`, `Recurrence` and friends
//! - [`recurrence`] — `Recurrence` ↔ RRULE strings
//! - [`serializer`] — events → VCALENDAR text
//! - [`parser`] — VCALENDAR text → events
//! - [`error`] — error types shared with the validator

pub mod error;
pub mod model;
pub mod parser;
pub mod recurrence;
pub mod serializer;
pub mod temporal;
pub mod text;

pub use error::{IcsError, Result};
pub use model::{
    Alert, Attachment, CalendarEvent, CustomRecurrence, Frequency, Recurrence, Weekday,
};
pub use parser::parse;
pub use recurrence::{from_rrule_string, to_rrule_string};
pub use serializer::{serialize, serialize_event, serialize_with, SerializeOptions, PRODUCT_ID};
pub use text::FoldMode;
