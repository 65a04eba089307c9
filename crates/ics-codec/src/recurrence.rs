//! Recurrence encoding — [`Recurrence`] ↔ RRULE value strings.
//!
//! The encoder covers `FREQ`, `INTERVAL`, `COUNT`, `UNTIL`, and `BYDAY`, which
//! is everything a [`CustomRecurrence`] can express. The decoder is
//! coarser: it only classifies a rule by frequency and does not
//! rebuild custom parameters. Full RRULE grammar checking lives in the
//! validator, not here.

use crate::model::{CustomRecurrence, Frequency, Recurrence};
use crate::temporal::encode_instant;

/// Build the RRULE value for a recurrence, or `None` when it does not repeat.
///
/// Custom rules emit their parts in a fixed order: `FREQ`, then `INTERVAL`
/// (only when greater than 1), `COUNT`, `UNTIL` (always a UTC instant), and
/// `BYDAY` with codes sorted lexicographically.
///
/// ```
/// use ics_codec::model::{CustomRecurrence, Frequency, Recurrence, Weekday};
/// use ics_codec::recurrence::to_rrule_string;
///
/// let rule = Recurrence::Custom(
///     CustomRecurrence::new(Frequency::Weekly)
///         .every(2)
///         .on([Weekday::Wednesday, Weekday::Monday]),
/// );
/// assert_eq!(
///     to_rrule_string(&rule).as_deref(),
///     Some("FREQ=WEEKLY;INTERVAL=2;BYDAY=MO,WE")
/// );
/// ```
pub fn to_rrule_string(recurrence: &Recurrence) -> Option<String> {
    let frequency = match recurrence {
        Recurrence::None => return None,
        Recurrence::Daily => Frequency::Daily,
        Recurrence::Weekly => Frequency::Weekly,
        Recurrence::Monthly => Frequency::Monthly,
        Recurrence::Yearly => Frequency::Yearly,
        Recurrence::Custom(custom) => return Some(encode_custom(custom)),
    };
    Some(format!("FREQ={}", frequency.as_str()))
}

fn encode_custom(custom: &CustomRecurrence) -> String {
    let mut parts = vec![format!("FREQ={}", custom.frequency.as_str())];

    if custom.interval > 1 {
        parts.push(format!("INTERVAL={}", custom.interval));
    }
    if let Some(count) = custom.count {
        parts.push(format!("COUNT={count}"));
    }
    if let Some(until) = custom.until {
        parts.push(format!("UNTIL={}", encode_instant(until, false)));
    }
    if !custom.weekdays.is_empty() {
        let mut codes: Vec<&str> = custom.weekdays.iter().map(|d| d.code()).collect();
        codes.sort_unstable();
        parts.push(format!("BYDAY={}", codes.join(",")));
    }

    parts.join(";")
}

/// Classify an RRULE value.
///
/// `FREQ=DAILY|WEEKLY|MONTHLY|YEARLY` map to the matching simple recurrence.
/// Any other rule carrying `BYDAY` or `BYMONTHDAY` becomes
/// [`Recurrence::Custom`] with default parameters; everything else is
/// [`Recurrence::None`]. Interval, count, and until are not recovered.
pub fn from_rrule_string(text: &str) -> Recurrence {
    let text = text.trim();
    let text = text.strip_prefix("RRULE:").unwrap_or(text);

    let mut has_by_rule = false;
    let mut frequency = None;

    for part in text.split(';') {
        let Some((key, value)) = part.split_once('=') else {
            continue;
        };
        match key.trim().to_ascii_uppercase().as_str() {
            "FREQ" => frequency = Frequency::parse(value.trim()),
            "BYDAY" | "BYMONTHDAY" => has_by_rule = true,
            _ => {}
        }
    }

    match frequency {
        Some(Frequency::Daily) => Recurrence::Daily,
        Some(Frequency::Weekly) => Recurrence::Weekly,
        Some(Frequency::Monthly) => Recurrence::Monthly,
        Some(Frequency::Yearly) => Recurrence::Yearly,
        None if has_by_rule => Recurrence::Custom(CustomRecurrence::default()),
        None => Recurrence::None,
    }
}
