//! Error types for iCalendar encoding, decoding, and conformance checks.

use thiserror::Error;

/// Errors that can occur while decoding iCalendar values or checking them
/// for conformance.
///
/// The serializer never produces these: it is total over well-formed
/// [`CalendarEvent`](crate::CalendarEvent) values.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IcsError {
    /// A DATE or DATE-TIME value did not match the exact expected grammar.
    #[error("Malformed date '{value}': expected {expected}")]
    MalformedDate {
        value: String,
        expected: &'static str,
    },

    /// A DURATION value did not match `[+-]P(nW|nD)(T(nH)(nM)(nS))`.
    #[error("Malformed duration '{0}'")]
    MalformedDuration(String),

    /// A property the export path or a check requires is absent.
    #[error("Missing required property: {0}")]
    MissingRequiredProperty(String),

    /// BEGIN/END lines are unbalanced or out of order.
    #[error("Invalid structure: {0}")]
    InvalidStructure(String),

    /// The text contains characters outside the permitted set.
    #[error("Invalid encoding: {0}")]
    InvalidEncoding(String),

    /// A property value falls outside its value domain.
    #[error("Invalid value for {property}: {reason}")]
    InvalidPropertyValue { property: String, reason: String },
}

impl IcsError {
    /// Shorthand for [`IcsError::InvalidPropertyValue`].
    pub fn invalid_value(property: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidPropertyValue {
            property: property.into(),
            reason: reason.into(),
        }
    }
}

/// Convenience alias used throughout ics-codec.
pub type Result<T> = std::result::Result<T, IcsError>;
