//! Lazily compiled regexes.
//!
//! Each pattern is stored as a `Result` so a pattern that fails to compile
//! turns into a failed check instead of a panic.

use std::sync::LazyLock;

use chrono::NaiveDateTime;
use ics_codec::IcsError;
use regex::Regex;

pub(crate) type Pattern = LazyLock<Result<Regex, regex::Error>>;

pub(crate) static DATE_VALUE: Pattern = LazyLock::new(|| Regex::new(r"^[0-9]{8}$"));
pub(crate) static DATE_TIME_VALUE: Pattern =
    LazyLock::new(|| Regex::new(r"^[0-9]{8}T[0-9]{6}Z?$"));
pub(crate) static URL_SCHEME: Pattern =
    LazyLock::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9+.\-]*://\S+$"));
pub(crate) static TZID_NAME: Pattern = LazyLock::new(|| {
    Regex::new(r"^(UTC|GMT|[A-Za-z][A-Za-z0-9_+\-]*(/[A-Za-z0-9_+\-]+)+|/\S+)$")
});

/// Borrow a compiled pattern, or report why it failed to compile.
pub(crate) fn compiled(pattern: &'static Pattern) -> Result<&'static Regex, IcsError> {
    match LazyLock::force(pattern) {
        Ok(regex) => Ok(regex),
        Err(e) => Err(IcsError::invalid_value("pattern", e.to_string())),
    }
}

/// `yyyyMMddTHHmmss` with optional `Z`, naming a real date and time.
pub(crate) fn is_date_time(value: &str) -> Result<bool, IcsError> {
    if !compiled(&DATE_TIME_VALUE)?.is_match(value) {
        return Ok(false);
    }
    let local = value.strip_suffix('Z').unwrap_or(value);
    Ok(NaiveDateTime::parse_from_str(local, "%Y%m%dT%H%M%S").is_ok())
}
