//! Error types for the export flow.

use ics_codec::IcsError;
use thiserror::Error;

use crate::report::ValidationCheck;

/// Errors returned by [`export`](crate::export::export).
///
/// [`validate`](crate::validate) itself never fails; problems are reported
/// as failed checks.
#[derive(Error, Debug)]
pub enum AuditError {
    /// An event was rejected before serialization.
    #[error(transparent)]
    Codec(#[from] IcsError),

    /// The serialized calendar failed one or more conformance checks.
    /// `message` joins the failed checks' messages with `"; "`.
    #[error("Calendar failed validation: {message}")]
    Rejected {
        message: String,
        failures: Vec<ValidationCheck>,
    },
}

/// Convenience alias used throughout ics-audit.
pub type Result<T> = std::result::Result<T, AuditError>;
