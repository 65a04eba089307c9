//! The individual conformance checks.
//!
//! Every check is a pure function of the [`Document`]. `Ok(message)` is a
//! pass; `Err(e)` is a failure whose message is `e.to_string()`. Checks never
//! see each other's results.

use std::str::FromStr;

use ics_codec::temporal::{decode_date, decode_duration};
use ics_codec::IcsError;

use crate::document::{Document, Line};
use crate::grammar::check_rrule;
use crate::patterns::{compiled, is_date_time, DATE_VALUE, TZID_NAME, URL_SCHEME};

/// Outcome of one check.
pub type CheckResult = Result<String, IcsError>;

/// Non-ASCII letters tolerated by the encoding check.
pub const ACCENTED_LETTERS: &str =
    "áéíóúàèìòùâêîôûäëïöüñçÁÉÍÓÚÀÈÌÒÙÂÊÎÔÛÄËÏÖÜÑÇ";

const MAX_LINE_OCTETS: usize = 75;

const ALARM_ACTIONS: [&str; 3] = ["AUDIO", "DISPLAY", "EMAIL"];
const STATUSES: [&str; 3] = ["TENTATIVE", "CONFIRMED", "CANCELLED"];
const DATE_PROPERTIES: [&str; 7] = [
    "DTSTART",
    "DTEND",
    "DTSTAMP",
    "CREATED",
    "LAST-MODIFIED",
    "RECURRENCE-ID",
    "EXDATE",
];

/// Prefix a property-value failure's reason with its line number.
fn at_line(line: &Line, property: &str, reason: impl std::fmt::Display) -> IcsError {
    IcsError::invalid_value(property, format!("line {}: {reason}", line.number))
}

// ---------------------------------------------------------------------------
// Unconditional
// ---------------------------------------------------------------------------

/// Printable ASCII, horizontal tab, and [`ACCENTED_LETTERS`] only. CR and LF
/// are line terminators and never reach this check.
pub fn encoding(doc: &Document<'_>) -> CheckResult {
    for (index, line) in doc.physical.iter().enumerate() {
        let bad = line
            .chars()
            .find(|&c| !(c == '\t' || (' '..='~').contains(&c) || ACCENTED_LETTERS.contains(c)));
        if let Some(c) = bad {
            return Err(IcsError::InvalidEncoding(format!(
                "line {}: character {c:?} (U+{:04X}) is not permitted",
                index + 1,
                c as u32
            )));
        }
    }
    Ok("All characters are permitted".to_string())
}

/// No physical line may exceed 75 octets.
pub fn line_length(doc: &Document<'_>) -> CheckResult {
    let long: Vec<String> = doc
        .physical
        .iter()
        .enumerate()
        .filter(|(_, line)| line.len() > MAX_LINE_OCTETS)
        .map(|(index, line)| format!("line {} ({} octets)", index + 1, line.len()))
        .collect();
    if long.is_empty() {
        return Ok(format!("All lines are at most {MAX_LINE_OCTETS} octets"));
    }
    Err(IcsError::InvalidStructure(format!(
        "{} line(s) longer than {MAX_LINE_OCTETS} octets must be folded: {}",
        long.len(),
        long.join(", ")
    )))
}

/// `BEGIN:VCALENDAR` and `END:VCALENDAR` must both be present.
pub fn calendar_structure(doc: &Document<'_>) -> CheckResult {
    let has = |keyword: &str| {
        doc.lines
            .iter()
            .any(|line| line.component(keyword).as_deref() == Some("VCALENDAR"))
    };
    match (has("BEGIN"), has("END")) {
        (true, true) => Ok("VCALENDAR begins and ends".to_string()),
        (false, true) => Err(IcsError::InvalidStructure("missing BEGIN:VCALENDAR".to_string())),
        (true, false) => Err(IcsError::InvalidStructure("missing END:VCALENDAR".to_string())),
        (false, false) => Err(IcsError::InvalidStructure(
            "missing BEGIN:VCALENDAR and END:VCALENDAR".to_string(),
        )),
    }
}

// ---------------------------------------------------------------------------
// Structure and content
// ---------------------------------------------------------------------------

/// Every END closes the most recent open BEGIN of the same name.
pub fn nesting(doc: &Document<'_>) -> CheckResult {
    let mut stack: Vec<(String, usize)> = Vec::new();
    let mut components = 0;

    for line in &doc.lines {
        if let Some(name) = line.component("BEGIN") {
            stack.push((name, line.number));
            components += 1;
        } else if let Some(name) = line.component("END") {
            match stack.pop() {
                Some((open, _)) if open == name => {}
                Some((open, opened_at)) => {
                    return Err(IcsError::InvalidStructure(format!(
                        "line {}: END:{name} does not match BEGIN:{open} on line {opened_at}",
                        line.number
                    )));
                }
                None => {
                    return Err(IcsError::InvalidStructure(format!(
                        "line {}: END:{name} has no matching BEGIN",
                        line.number
                    )));
                }
            }
        }
    }

    if let Some((open, opened_at)) = stack.pop() {
        return Err(IcsError::InvalidStructure(format!(
            "BEGIN:{open} on line {opened_at} is never closed"
        )));
    }
    Ok(format!("{components} component(s) correctly nested"))
}

/// `VERSION:2.0` is present.
pub fn version(doc: &Document<'_>) -> CheckResult {
    match doc.properties("VERSION").next() {
        None => Err(IcsError::MissingRequiredProperty("VERSION".to_string())),
        Some(line) if line.value.trim() == "2.0" => Ok("VERSION is 2.0".to_string()),
        Some(line) => Err(at_line(
            line,
            "VERSION",
            format!("expected 2.0, found '{}'", line.value.trim()),
        )),
    }
}

/// At least one VEVENT.
pub fn event_presence(doc: &Document<'_>) -> CheckResult {
    let count = doc
        .lines
        .iter()
        .filter(|line| line.component("BEGIN").as_deref() == Some("VEVENT"))
        .count();
    if count == 0 {
        return Err(IcsError::MissingRequiredProperty("VEVENT component".to_string()));
    }
    Ok(format!("{count} event(s) found"))
}

/// `SUMMARY` and `DTSTART` appear somewhere in the document. This is a
/// document-wide check, not a per-event one.
pub fn required_fields(doc: &Document<'_>) -> CheckResult {
    let missing: Vec<&str> = ["SUMMARY", "DTSTART"]
        .into_iter()
        .filter(|name| doc.properties(name).next().is_none())
        .collect();
    if missing.is_empty() {
        return Ok("SUMMARY and DTSTART present".to_string());
    }
    Err(IcsError::MissingRequiredProperty(missing.join(", ")))
}

/// Every RRULE passes the grammar checker.
pub fn recurrence(doc: &Document<'_>) -> CheckResult {
    let mut count = 0;
    for line in doc.properties("RRULE") {
        check_rrule(&line.value).map_err(|err| match err {
            IcsError::InvalidPropertyValue { property, reason } => at_line(line, &property, reason),
            other => other,
        })?;
        count += 1;
    }
    Ok(format!("{count} recurrence rule(s) valid"))
}

/// Every DURATION value parses.
pub fn duration(doc: &Document<'_>) -> CheckResult {
    let mut count = 0;
    for line in doc.properties("DURATION") {
        let value = line.value.trim();
        if decode_duration(value).is_err() {
            return Err(at_line(line, "DURATION", format!("'{value}' is not a valid duration")));
        }
        count += 1;
    }
    Ok(format!("{count} duration(s) valid"))
}

/// ATTACH values are `scheme://` URLs or `data:` URIs.
pub fn attachment(doc: &Document<'_>) -> CheckResult {
    let url = compiled(&URL_SCHEME)?;
    let mut count = 0;
    for line in doc.properties("ATTACH") {
        let value = line.value.trim();
        let is_data = value.len() > 5
            && value.get(..5).is_some_and(|scheme| scheme.eq_ignore_ascii_case("data:"));
        if !is_data && !url.is_match(value) {
            return Err(at_line(line, "ATTACH", "value must be a URL or a data: URI"));
        }
        count += 1;
    }
    Ok(format!("{count} attachment(s) valid"))
}

/// Every VALARM has an ACTION of AUDIO, DISPLAY, or EMAIL and a TRIGGER.
pub fn alarm(doc: &Document<'_>) -> CheckResult {
    let blocks = doc.blocks("VALARM");
    for block in &blocks {
        let Some(action) = block.property("ACTION") else {
            return Err(IcsError::MissingRequiredProperty(format!(
                "ACTION in VALARM on line {}",
                block.begin
            )));
        };
        let value = action.value.trim().to_ascii_uppercase();
        if !ALARM_ACTIONS.contains(&value.as_str()) {
            return Err(at_line(
                action,
                "ACTION",
                format!("'{value}' is not one of {}", ALARM_ACTIONS.join(", ")),
            ));
        }
        if block.property("TRIGGER").is_none() {
            return Err(IcsError::MissingRequiredProperty(format!(
                "TRIGGER in VALARM on line {}",
                block.begin
            )));
        }
    }
    Ok(format!("{} alarm(s) valid", blocks.len()))
}

/// DATE and DATE-TIME properties use `yyyyMMdd` / `yyyyMMddTHHmmss[Z]` and
/// name real dates.
pub fn date_format(doc: &Document<'_>) -> CheckResult {
    let date = compiled(&DATE_VALUE)?;
    let mut count = 0;

    for line in doc.lines.iter().filter(|l| DATE_PROPERTIES.contains(&l.name.as_str())) {
        let is_date = line
            .parameter("VALUE")
            .is_some_and(|v| v.eq_ignore_ascii_case("DATE"));
        for value in line.value.split(',').map(str::trim) {
            let ok = if is_date {
                date.is_match(value) && decode_date(value).is_ok()
            } else {
                is_date_time(value)?
            };
            if !ok {
                let expected = if is_date { "yyyyMMdd" } else { "yyyyMMddTHHmmss[Z]" };
                return Err(at_line(
                    line,
                    &line.name,
                    format!("'{value}' does not match {expected}"),
                ));
            }
            count += 1;
        }
    }
    Ok(format!("{count} date value(s) well-formed"))
}

/// TZID parameters and properties name a known or well-formed timezone.
///
/// Identifiers are never resolved to offsets; chrono-tz only tells whether
/// the name is in the IANA database.
pub fn timezone(doc: &Document<'_>) -> CheckResult {
    let shape = compiled(&TZID_NAME)?;
    let mut known = 0;
    let mut custom = 0;

    let ids = doc.lines.iter().flat_map(|line| {
        let param = line.parameter("TZID").map(|id| (line, id));
        let prop = (line.name == "TZID").then(|| (line, line.value.trim()));
        param.into_iter().chain(prop)
    });

    for (line, id) in ids {
        if chrono_tz::Tz::from_str(id).is_ok() {
            known += 1;
        } else if shape.is_match(id) {
            custom += 1;
        } else {
            return Err(at_line(line, "TZID", format!("'{id}' is not a valid timezone identifier")));
        }
    }
    Ok(format!("{known} IANA and {custom} custom timezone identifier(s)"))
}

/// CATEGORIES lists are non-empty.
pub fn categories(doc: &Document<'_>) -> CheckResult {
    let mut total = 0;
    for line in doc.properties("CATEGORIES") {
        let items = split_unescaped_commas(&line.value);
        if items.iter().any(|item| item.trim().is_empty()) {
            return Err(at_line(line, "CATEGORIES", "empty category"));
        }
        total += items.len();
    }
    Ok(format!("{total} categor{} found", if total == 1 { "y" } else { "ies" }))
}

fn split_unescaped_commas(value: &str) -> Vec<&str> {
    let mut items = Vec::new();
    let mut start = 0;
    let mut escaped = false;
    for (i, ch) in value.char_indices() {
        match ch {
            _ if escaped => escaped = false,
            '\\' => escaped = true,
            ',' => {
                items.push(&value[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    items.push(&value[start..]);
    items
}

/// PRIORITY is an integer from 0 to 9.
pub fn priority(doc: &Document<'_>) -> CheckResult {
    let mut count = 0;
    for line in doc.properties("PRIORITY") {
        let value = line.value.trim();
        if !value.parse::<u8>().is_ok_and(|p| p <= 9) {
            return Err(at_line(line, "PRIORITY", format!("'{value}' is not in 0..9")));
        }
        count += 1;
    }
    Ok(format!("{count} priority value(s) valid"))
}

/// STATUS is TENTATIVE, CONFIRMED, or CANCELLED.
pub fn status(doc: &Document<'_>) -> CheckResult {
    let mut count = 0;
    for line in doc.properties("STATUS") {
        let value = line.value.trim().to_ascii_uppercase();
        if !STATUSES.contains(&value.as_str()) {
            return Err(at_line(
                line,
                "STATUS",
                format!("'{value}' is not one of {}", STATUSES.join(", ")),
            ));
        }
        count += 1;
    }
    Ok(format!("{count} status value(s) valid"))
}

/// ATTENDEE values are `mailto:` addresses.
pub fn attendee(doc: &Document<'_>) -> CheckResult {
    let mut count = 0;
    for line in doc.properties("ATTENDEE") {
        let value = line.value.trim();
        let address = value
            .get(..7)
            .filter(|scheme| scheme.eq_ignore_ascii_case("mailto:"))
            .map(|_| &value[7..]);
        if !address.is_some_and(|a| !a.trim().is_empty()) {
            return Err(at_line(line, "ATTENDEE", format!("'{value}' is not a mailto: address")));
        }
        count += 1;
    }
    Ok(format!("{count} attendee(s) valid"))
}
