//! Rule-table conformance validator.
//!
//! [`RULES`] is evaluated top to bottom. A conditional rule runs only when
//! its trigger substring occurs in the raw text; skipped rules leave no entry
//! in the report. A failed gate rule ends the run.

use ics_codec::IcsError;

use crate::checks::{self, CheckResult};
use crate::document::Document;
use crate::report::{CheckCategory, CheckKind, ValidationCheck, ValidationReport};

use CheckCategory as Cat;
use CheckKind as Kind;
use Trigger::{Always, Marker};

/// When a rule applies.
#[derive(Debug, Clone, Copy)]
pub enum Trigger {
    Always,
    /// Any of the substrings occurs in the raw text.
    Marker(&'static [&'static str]),
}

impl Trigger {
    fn matches(self, doc: &Document<'_>) -> bool {
        match self {
            Trigger::Always => true,
            Trigger::Marker(markers) => markers.iter().any(|m| doc.contains(m)),
        }
    }
}

/// One row of the rule table.
#[derive(Debug, Clone, Copy)]
pub struct Rule {
    pub kind: CheckKind,
    pub category: CheckCategory,
    pub description: &'static str,
    pub trigger: Trigger,
    /// Stop evaluating later rules if this one fails.
    pub gate: bool,
    pub check: fn(&Document<'_>) -> CheckResult,
}

const fn rule(
    kind: CheckKind,
    category: CheckCategory,
    description: &'static str,
    trigger: Trigger,
    check: fn(&Document<'_>) -> CheckResult,
) -> Rule {
    Rule {
        kind,
        category,
        description,
        trigger,
        gate: false,
        check,
    }
}

/// Every rule in evaluation order.
pub static RULES: [Rule; 17] = [
    rule(Kind::Encoding, Cat::General, "Character encoding", Always, checks::encoding),
    rule(Kind::LineLength, Cat::Format, "Line length", Always, checks::line_length),
    Rule {
        gate: true,
        ..rule(
            Kind::CalendarStructure,
            Cat::Structure,
            "Calendar structure",
            Always,
            checks::calendar_structure,
        )
    },
    rule(Kind::Nesting, Cat::Structure, "Component nesting", Marker(&["BEGIN:"]), checks::nesting),
    rule(Kind::Version, Cat::General, "iCalendar version", Marker(&["BEGIN:VCALENDAR"]), checks::version),
    rule(
        Kind::EventPresence,
        Cat::Content,
        "Event presence",
        Marker(&["BEGIN:VCALENDAR"]),
        checks::event_presence,
    ),
    rule(
        Kind::RequiredFields,
        Cat::Content,
        "Required event fields",
        Marker(&["BEGIN:VEVENT"]),
        checks::required_fields,
    ),
    rule(Kind::Recurrence, Cat::Format, "Recurrence rules", Marker(&["RRULE:"]), checks::recurrence),
    rule(Kind::Duration, Cat::Format, "Duration values", Marker(&["DURATION:"]), checks::duration),
    rule(Kind::Attachment, Cat::Content, "Attachments", Marker(&["ATTACH"]), checks::attachment),
    rule(Kind::Alarm, Cat::Alarms, "Alarm components", Marker(&["BEGIN:VALARM"]), checks::alarm),
    rule(
        Kind::DateFormat,
        Cat::Format,
        "Date and time format",
        Marker(&["DTSTART", "DTEND", "DTSTAMP"]),
        checks::date_format,
    ),
    rule(Kind::Timezone, Cat::General, "Timezone identifiers", Marker(&["TZID"]), checks::timezone),
    rule(Kind::Categories, Cat::Content, "Categories", Marker(&["CATEGORIES"]), checks::categories),
    rule(Kind::Priority, Cat::Content, "Priority", Marker(&["PRIORITY"]), checks::priority),
    rule(Kind::Status, Cat::Content, "Event status", Marker(&["STATUS"]), checks::status),
    rule(Kind::Attendee, Cat::Attendees, "Attendees", Marker(&["ATTENDEE"]), checks::attendee),
];

/// Validate raw ICS text against every applicable rule.
///
/// Never fails: every problem becomes a failed [`ValidationCheck`].
pub fn validate(text: &str) -> ValidationReport {
    let doc = Document::new(text);
    let mut report = ValidationReport::default();

    for rule in &RULES {
        if !rule.trigger.matches(&doc) {
            tracing::trace!(rule = ?rule.kind, "trigger absent, skipping");
            continue;
        }

        let outcome = (rule.check)(&doc);
        let check = to_check(rule, outcome);
        tracing::debug!(
            rule = ?rule.kind,
            passed = check.passed,
            message = check.message.as_deref().unwrap_or_default(),
            "rule evaluated"
        );

        let stop = rule.gate && !check.passed;
        report.push(check);
        if stop {
            tracing::debug!(rule = ?rule.kind, "gate failed, stopping");
            break;
        }
    }

    report
}

fn to_check(rule: &Rule, outcome: Result<String, IcsError>) -> ValidationCheck {
    let (passed, message) = match outcome {
        Ok(message) => (true, message),
        Err(err) => (false, err.to_string()),
    };
    ValidationCheck {
        kind: rule.kind,
        description: rule.description.to_string(),
        passed,
        message: Some(message),
        category: rule.category,
    }
}
