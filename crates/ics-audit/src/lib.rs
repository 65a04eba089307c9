//! # ics-audit
//!
//! Rule-based **iCalendar (RFC 5545)** conformance validator. Raw ICS text
//! goes in, an ordered list of categorized pass/fail checks comes out.
//!
//! ```rust
//! use ics_audit::{validate, CheckKind};
//!
//! let ics = "BEGIN:VCALENDAR\r\nVERSION:2.0\r\nPRODID:-//demo//EN\r\n\
//!            BEGIN:VEVENT\r\nUID:1\r\nDTSTAMP:20260101T000000Z\r\n\
//!            DTSTART:20260217T140000Z\r\nDTEND:20260217T150000Z\r\n\
//!            SUMMARY:Standup\r\nPRIORITY:12\r\nEND:VEVENT\r\nEND:VCALENDAR\r\n";
//!
//! let report = validate(ics);
//! assert!(!report.is_valid());
//! assert!(!report.get(CheckKind::Priority).unwrap().passed);
//! assert!(report.get(CheckKind::Attendee).is_none()); // no ATTENDEE, not run
//! ```
//!
//! ## Modules
//!
//! - [`validator`] — the rule table and [`validate`]
//! - [`checks`] — one pure function per rule
//! - [`grammar`] — full RRULE grammar checker
//! - [`document`] — line-numbered, unfolded view of the input
//! - [`report`] — `ValidationReport`, `ValidationCheck`, categories
//! - [`export`] — serialize-then-validate flow
//! - [`error`] — error types

pub mod checks;
pub mod document;
pub mod error;
pub mod export;
pub mod grammar;
mod patterns;
pub mod report;
pub mod validator;

pub use error::{AuditError, Result};
pub use export::export;
pub use grammar::check_rrule;
pub use report::{CheckCategory, CheckKind, ValidationCheck, ValidationReport};
pub use validator::{validate, Rule, Trigger, RULES};
