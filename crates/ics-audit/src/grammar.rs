//! RRULE grammar checker.
//!
//! Broader than the codec's recurrence encoder: besides `FREQ`, `INTERVAL`,
//! `COUNT`, `UNTIL`, and `BYDAY` it checks the value domains of every
//! RFC 5545 §3.3.10 rule part. The encoder only covers what a
//! `CustomRecurrence` can express.

use std::collections::HashSet;
use std::sync::LazyLock;

use ics_codec::temporal::decode_date;
use ics_codec::IcsError;
use regex::Regex;

use crate::patterns::{compiled, is_date_time};

const FREQUENCIES: [&str; 7] = [
    "SECONDLY", "MINUTELY", "HOURLY", "DAILY", "WEEKLY", "MONTHLY", "YEARLY",
];
const WEEKDAYS: [&str; 7] = ["MO", "TU", "WE", "TH", "FR", "SA", "SU"];

static BYDAY_ITEM: LazyLock<Result<Regex, regex::Error>> =
    LazyLock::new(|| Regex::new(r"^[+-]?([1-9]|[1-4][0-9]|5[0-3])?(MO|TU|WE|TH|FR|SA|SU)$"));

/// Check one RRULE value (without the `RRULE:` prefix).
///
/// When both `COUNT` and `UNTIL` are present the rule still passes; `UNTIL`
/// governs termination.
///
/// # Errors
/// Returns [`IcsError::InvalidPropertyValue`] for the first offending part.
pub fn check_rrule(value: &str) -> Result<(), IcsError> {
    let invalid = |reason: String| IcsError::invalid_value("RRULE", reason);

    let value = value.trim();
    if value.is_empty() {
        return Err(invalid("empty rule".to_string()));
    }

    let mut seen = HashSet::new();
    let mut has_freq = false;

    for part in value.split(';') {
        let Some((key, val)) = part.split_once('=') else {
            return Err(invalid(format!("'{part}' is not a KEY=VALUE pair")));
        };
        let key = key.trim().to_ascii_uppercase();
        let val = val.trim();
        if !seen.insert(key.clone()) {
            return Err(invalid(format!("{key} appears more than once")));
        }
        if val.is_empty() {
            return Err(invalid(format!("{key} has no value")));
        }

        match key.as_str() {
            "FREQ" => {
                has_freq = true;
                if !FREQUENCIES.contains(&val.to_ascii_uppercase().as_str()) {
                    return Err(invalid(format!("unknown FREQ '{val}'")));
                }
            }
            "INTERVAL" | "COUNT" => positive(&key, val).map_err(invalid)?,
            "UNTIL" => {
                if decode_date(val).is_err() && !is_date_time(val)? {
                    return Err(invalid(format!("UNTIL '{val}' is not a DATE or DATE-TIME")));
                }
            }
            "BYDAY" => {
                let pattern = compiled(&BYDAY_ITEM)?;
                for item in val.split(',') {
                    if !pattern.is_match(&item.trim().to_ascii_uppercase()) {
                        return Err(invalid(format!("BYDAY item '{item}' is not a weekday")));
                    }
                }
            }
            "BYMONTH" => each_in_range(&key, val, 1, 12, false).map_err(invalid)?,
            "BYMONTHDAY" => each_in_range(&key, val, 1, 31, true).map_err(invalid)?,
            "BYYEARDAY" | "BYSETPOS" => each_in_range(&key, val, 1, 366, true).map_err(invalid)?,
            "BYWEEKNO" => each_in_range(&key, val, 1, 53, true).map_err(invalid)?,
            "BYHOUR" => each_in_range(&key, val, 0, 23, false).map_err(invalid)?,
            "BYMINUTE" => each_in_range(&key, val, 0, 59, false).map_err(invalid)?,
            "BYSECOND" => each_in_range(&key, val, 0, 60, false).map_err(invalid)?,
            "WKST" => {
                if !WEEKDAYS.contains(&val.to_ascii_uppercase().as_str()) {
                    return Err(invalid(format!("WKST '{val}' is not a weekday")));
                }
            }
            other if other.starts_with("X-") => {}
            other => return Err(invalid(format!("unknown rule part '{other}'"))),
        }
    }

    if !has_freq {
        return Err(invalid("FREQ is required".to_string()));
    }
    Ok(())
}

fn positive(key: &str, val: &str) -> Result<(), String> {
    match val.parse::<u32>() {
        Ok(n) if n >= 1 => Ok(()),
        _ => Err(format!("{key} must be a positive integer, found '{val}'")),
    }
}

/// Every comma-separated item is an integer in `min..=max`; with `signed`,
/// a leading `+`/`-` is allowed (zero never is).
fn each_in_range(key: &str, val: &str, min: u32, max: u32, signed: bool) -> Result<(), String> {
    for item in val.split(',') {
        let item = item.trim();
        let has_sign = item.starts_with(['+', '-']);
        let bounds = u64::from(min)..=u64::from(max);
        let ok = (signed || !has_sign)
            && item
                .parse::<i64>()
                .is_ok_and(|n| bounds.contains(&n.unsigned_abs()) && (!signed || n != 0));
        if !ok {
            let range = if signed {
                format!("±{min}..{max}")
            } else {
                format!("{min}..{max}")
            };
            return Err(format!("{key} item '{item}' is outside {range}"));
        }
    }
    Ok(())
}
