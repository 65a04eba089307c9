//! Temporal codec — DATE / DATE-TIME values, DURATION values, and alarm triggers.
//!
//! Only two date representations are produced or accepted:
//!
//! - `DATE` (`yyyyMMdd`) for all-day bounds
//! - UTC `DATE-TIME` (`yyyyMMdd'T'HHmmss'Z'`) for everything else
//!
//! Decoding is exact: the string must have the right length and character
//! class at every position before chrono gets to see it, so partial matches
//! such as `20240101T1000Z` or `2024-01-01` are rejected.

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, Utc};

use crate::error::{IcsError, Result};
use crate::model::{midnight_utc, Alert};

const DATE_GRAMMAR: &str = "yyyyMMdd";
const UTC_GRAMMAR: &str = "yyyyMMdd'T'HHmmss'Z'";

const SECONDS_PER_WEEK: i64 = 7 * 24 * 60 * 60;
const SECONDS_PER_DAY: i64 = 24 * 60 * 60;

// ---------------------------------------------------------------------------
// DATE / DATE-TIME
// ---------------------------------------------------------------------------

/// Encode an instant as a DATE (`all_day`) or a UTC DATE-TIME.
pub fn encode_instant(t: DateTime<Utc>, all_day: bool) -> String {
    if all_day {
        t.format("%Y%m%d").to_string()
    } else {
        t.format("%Y%m%dT%H%M%SZ").to_string()
    }
}

/// Decode a DATE (`all_day`) or UTC DATE-TIME value.
///
/// All-day dates decode to midnight UTC.
///
/// # Errors
/// Returns [`IcsError::MalformedDate`] unless the value matches the expected
/// grammar exactly and names a real calendar date/time.
pub fn decode_instant(s: &str, all_day: bool) -> Result<DateTime<Utc>> {
    if all_day {
        decode_date(s).map(midnight_utc)
    } else {
        decode_utc(s)
    }
}

/// Decode an exact `yyyyMMdd` DATE value.
pub fn decode_date(s: &str) -> Result<NaiveDate> {
    let malformed = || IcsError::MalformedDate {
        value: s.to_string(),
        expected: DATE_GRAMMAR,
    };
    if s.len() != 8 || !s.bytes().all(|b| b.is_ascii_digit()) {
        return Err(malformed());
    }
    NaiveDate::parse_from_str(s, "%Y%m%d").map_err(|_| malformed())
}

/// Decode an exact `yyyyMMdd'T'HHmmss'Z'` DATE-TIME value.
pub fn decode_utc(s: &str) -> Result<DateTime<Utc>> {
    let malformed = || IcsError::MalformedDate {
        value: s.to_string(),
        expected: UTC_GRAMMAR,
    };
    let bytes = s.as_bytes();
    let shape_ok = bytes.len() == 16
        && bytes[..8].iter().all(u8::is_ascii_digit)
        && bytes[8] == b'T'
        && bytes[9..15].iter().all(u8::is_ascii_digit)
        && bytes[15] == b'Z';
    if !shape_ok {
        return Err(malformed());
    }
    NaiveDateTime::parse_from_str(&s[..15], "%Y%m%dT%H%M%S")
        .map(|naive| naive.and_utc())
        .map_err(|_| malformed())
}

// ---------------------------------------------------------------------------
// DURATION
// ---------------------------------------------------------------------------

/// Encode a duration as `[-]P(nW|nD)(T(nH)(nM)(nS))`.
///
/// Whole weeks use the `W` form; zero encodes as `PT0S`. Sub-second precision
/// is dropped.
pub fn encode_duration(d: Duration) -> String {
    let total = d.num_seconds();
    if total == 0 {
        return "PT0S".to_string();
    }

    let mut out = String::new();
    if total < 0 {
        out.push('-');
    }
    out.push('P');

    let secs = total.unsigned_abs() as i64;
    if secs % SECONDS_PER_WEEK == 0 {
        out.push_str(&format!("{}W", secs / SECONDS_PER_WEEK));
        return out;
    }

    let days = secs / SECONDS_PER_DAY;
    let hours = (secs % SECONDS_PER_DAY) / 3600;
    let minutes = (secs % 3600) / 60;
    let seconds = secs % 60;

    if days > 0 {
        out.push_str(&format!("{days}D"));
    }
    if hours > 0 || minutes > 0 || seconds > 0 {
        out.push('T');
        if hours > 0 {
            out.push_str(&format!("{hours}H"));
        }
        if minutes > 0 {
            out.push_str(&format!("{minutes}M"));
        }
        if seconds > 0 {
            out.push_str(&format!("{seconds}S"));
        }
    }
    out
}

/// Decode a `[+-]P(nW|nD)?(T(nH)?(nM)?(nS)?)?` duration.
///
/// # Errors
/// Returns [`IcsError::MalformedDuration`] when the value is empty after `P`
/// or `T`, components appear out of order, or the total overflows.
pub fn decode_duration(s: &str) -> Result<Duration> {
    let malformed = || IcsError::MalformedDuration(s.to_string());

    let (negative, rest) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let rest = rest.strip_prefix('P').ok_or_else(malformed)?;

    let (date_part, time_part) = match rest.split_once('T') {
        Some((date, time)) => (date, Some(time)),
        None => (rest, None),
    };

    let date_components = components(date_part, &['W', 'D']).ok_or_else(malformed)?;
    // A week duration stands alone in the date part.
    if date_components.len() > 1 {
        return Err(malformed());
    }
    let time_components = match time_part {
        Some(time) => {
            let parsed = components(time, &['H', 'M', 'S']).ok_or_else(malformed)?;
            if parsed.is_empty() {
                return Err(malformed());
            }
            parsed
        }
        None => Vec::new(),
    };
    if date_components.is_empty() && time_components.is_empty() {
        return Err(malformed());
    }

    let mut total: i64 = 0;
    for (unit, n) in date_components.into_iter().chain(time_components) {
        let scale = match unit {
            'W' => SECONDS_PER_WEEK,
            'D' => SECONDS_PER_DAY,
            'H' => 3600,
            'M' => 60,
            _ => 1,
        };
        total = n
            .checked_mul(scale)
            .and_then(|secs| total.checked_add(secs))
            .ok_or_else(malformed)?;
    }
    if negative {
        total = -total;
    }
    Duration::try_seconds(total).ok_or_else(malformed)
}

/// Split `nXnYnZ` into `(unit, n)` pairs, requiring units to appear in the
/// order given by `units`, each at most once.
fn components(s: &str, units: &[char]) -> Option<Vec<(char, i64)>> {
    let mut out = Vec::new();
    let mut next_unit = 0;
    let mut rest = s;

    while !rest.is_empty() {
        let digits_end = rest
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(rest.len());
        if digits_end == 0 {
            return None;
        }
        let n: i64 = rest[..digits_end].parse().ok()?;
        let unit = rest[digits_end..].chars().next()?;
        let position = units[next_unit..].iter().position(|&u| u == unit)?;
        next_unit += position + 1;
        out.push((unit, n));
        rest = &rest[digits_end + unit.len_utf8()..];
    }
    Some(out)
}

// ---------------------------------------------------------------------------
// Alarm triggers
// ---------------------------------------------------------------------------

/// The VALARM `TRIGGER` for an alert. [`Alert::None`] has no trigger.
pub fn alert_to_trigger(alert: Alert) -> Option<&'static str> {
    match alert {
        Alert::None => None,
        Alert::AtTime => Some("PT0M"),
        Alert::FiveMinutes => Some("-PT5M"),
        Alert::TenMinutes => Some("-PT10M"),
        Alert::FifteenMinutes => Some("-PT15M"),
        Alert::ThirtyMinutes => Some("-PT30M"),
        Alert::OneHour => Some("-PT1H"),
        Alert::TwoHours => Some("-PT2H"),
        Alert::OneDay => Some("-P1D"),
        Alert::TwoDays => Some("-P2D"),
        Alert::OneWeek => Some("-P1W"),
    }
}

/// Map a `TRIGGER` value to an alert.
///
/// Exact table matches win. Otherwise the value is decoded as a duration and
/// compared by length, so `-PT60M` still maps to [`Alert::OneHour`]. Anything
/// unrecognized maps to [`Alert::None`].
pub fn trigger_to_alert(trigger: &str) -> Alert {
    let trigger = trigger.trim();
    if let Some(alert) = Alert::ALL
        .into_iter()
        .find(|a| alert_to_trigger(*a) == Some(trigger))
    {
        return alert;
    }

    let Ok(offset) = decode_duration(trigger) else {
        return Alert::None;
    };
    Alert::ALL
        .into_iter()
        .find(|a| {
            alert_to_trigger(*a)
                .and_then(|t| decode_duration(t).ok())
                .is_some_and(|d| d == offset)
        })
        .unwrap_or(Alert::None)
}
