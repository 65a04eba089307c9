//! Validated export: serialize events and refuse to hand back a calendar
//! that fails its own conformance checks.

use ics_codec::{serialize_with, CalendarEvent, IcsError, SerializeOptions};

use crate::error::{AuditError, Result};
use crate::validator::validate;

/// Serialize `events` and validate the output.
///
/// # Errors
/// - [`AuditError::Codec`] if an event has a blank title or ends before it
///   starts. Nothing is serialized in that case.
/// - [`AuditError::Rejected`] if any validation check fails.
pub fn export(events: &[CalendarEvent], options: &SerializeOptions) -> Result<String> {
    for event in events {
        preflight(event)?;
    }

    let ics = serialize_with(events, options);
    let report = validate(&ics);

    if let Some(message) = report.failure_summary() {
        tracing::debug!(%message, "serialized calendar rejected");
        return Err(AuditError::Rejected {
            message,
            failures: report.failures().cloned().collect(),
        });
    }

    tracing::debug!(events = events.len(), checks = report.len(), "export validated");
    Ok(ics)
}

fn preflight(event: &CalendarEvent) -> std::result::Result<(), IcsError> {
    if event.title.trim().is_empty() {
        return Err(IcsError::MissingRequiredProperty("SUMMARY".to_string()));
    }
    if event.end < event.start {
        return Err(IcsError::invalid_value(
            "DTEND",
            format!("event '{}' ends before it starts", event.title),
        ));
    }
    Ok(())
}
