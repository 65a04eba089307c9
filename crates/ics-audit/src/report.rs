//! Validation report types.

use std::fmt;

use serde::Serialize;

/// Grouping used to present checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckCategory {
    General,
    Structure,
    Content,
    Format,
    Attendees,
    Alarms,
}

impl CheckCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            CheckCategory::General => "general",
            CheckCategory::Structure => "structure",
            CheckCategory::Content => "content",
            CheckCategory::Format => "format",
            CheckCategory::Attendees => "attendees",
            CheckCategory::Alarms => "alarms",
        }
    }
}

/// Which rule produced a check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckKind {
    Encoding,
    LineLength,
    CalendarStructure,
    Nesting,
    Version,
    EventPresence,
    RequiredFields,
    Recurrence,
    Duration,
    Attachment,
    Alarm,
    DateFormat,
    Timezone,
    Categories,
    Priority,
    Status,
    Attendee,
}

/// The result of evaluating one rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationCheck {
    pub kind: CheckKind,
    pub description: String,
    pub passed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub category: CheckCategory,
}

/// Ordered results of one validation run.
///
/// Only rules whose trigger matched the input appear, so the length varies
/// with the document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationReport {
    checks: Vec<ValidationCheck>,
}

impl ValidationReport {
    pub(crate) fn push(&mut self, check: ValidationCheck) {
        self.checks.push(check);
    }

    pub fn checks(&self) -> &[ValidationCheck] {
        &self.checks
    }

    pub fn into_checks(self) -> Vec<ValidationCheck> {
        self.checks
    }

    pub fn len(&self) -> usize {
        self.checks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.checks.is_empty()
    }

    /// `true` when every check that ran passed.
    pub fn is_valid(&self) -> bool {
        self.checks.iter().all(|c| c.passed)
    }

    /// The first check of the given kind, if it ran.
    pub fn get(&self, kind: CheckKind) -> Option<&ValidationCheck> {
        self.checks.iter().find(|c| c.kind == kind)
    }

    pub fn failures(&self) -> impl Iterator<Item = &ValidationCheck> {
        self.checks.iter().filter(|c| !c.passed)
    }

    /// Failed checks' messages joined with `"; "`, or `None` if all passed.
    pub fn failure_summary(&self) -> Option<String> {
        let messages: Vec<&str> = self
            .failures()
            .map(|c| c.message.as_deref().unwrap_or(c.description.as_str()))
            .collect();
        (!messages.is_empty()).then(|| messages.join("; "))
    }
}

impl<'a> IntoIterator for &'a ValidationReport {
    type Item = &'a ValidationCheck;
    type IntoIter = std::slice::Iter<'a, ValidationCheck>;

    fn into_iter(self) -> Self::IntoIter {
        self.checks.iter()
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for check in &self.checks {
            write!(
                f,
                "{} [{}] {}",
                if check.passed { "PASS" } else { "FAIL" },
                check.category.as_str(),
                check.description
            )?;
            if let Some(message) = &check.message {
                write!(f, ": {message}")?;
            }
            writeln!(f)?;
        }
        let failed = self.failures().count();
        write!(f, "{} checks, {} failed", self.checks.len(), failed)
    }
}
