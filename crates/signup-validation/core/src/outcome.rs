//! Validation outcomes per field and for the whole form

use crate::field::FieldName;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Why a field was rejected.
///
/// The config key of each kind (`required`, `length`, `format`, `match`, `age`)
/// is the name its message goes by in `signup.toml`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    MissingRequired,
    LengthOutOfBounds,
    FormatMismatch,
    MismatchWithOtherField,
    AgeBelowMinimum,
}

impl FailureKind {
    pub fn config_key(&self) -> &'static str {
        match self {
            FailureKind::MissingRequired => "required",
            FailureKind::LengthOutOfBounds => "length",
            FailureKind::FormatMismatch => "format",
            FailureKind::MismatchWithOtherField => "match",
            FailureKind::AgeBelowMinimum => "age",
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.config_key())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Failure {
    pub kind: FailureKind,
    pub message: String,
}

/// Outcome of one field: the first failing check, or nothing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FieldOutcome {
    Ok,
    Fail(Failure),
}

impl FieldOutcome {
    pub fn is_ok(&self) -> bool {
        matches!(self, FieldOutcome::Ok)
    }

    pub fn failure(&self) -> Option<&Failure> {
        match self {
            FieldOutcome::Ok => None,
            FieldOutcome::Fail(failure) => Some(failure),
        }
    }
}

/// Result of validating every field of the form in one submission attempt
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    submittable: bool,
    outcomes: BTreeMap<FieldName, FieldOutcome>,
}

impl ValidationReport {
    pub fn new(outcomes: BTreeMap<FieldName, FieldOutcome>) -> Self {
        let submittable = outcomes.values().all(FieldOutcome::is_ok);
        Self { submittable, outcomes }
    }

    /// True only when every field passed
    pub fn all_submittable(&self) -> bool {
        self.submittable
    }

    pub fn outcome(&self, field: FieldName) -> Option<&FieldOutcome> {
        self.outcomes.get(&field)
    }

    pub fn outcomes(&self) -> impl Iterator<Item = (FieldName, &FieldOutcome)> {
        self.outcomes.iter().map(|(field, outcome)| (*field, outcome))
    }

    /// Failing fields in form order
    pub fn failures(&self) -> impl Iterator<Item = (FieldName, &Failure)> {
        self.outcomes
            .iter()
            .filter_map(|(field, outcome)| outcome.failure().map(|failure| (*field, failure)))
    }

    pub fn failure_count(&self) -> usize {
        self.failures().count()
    }

    /// Message shown for a field, if it failed
    pub fn message(&self, field: FieldName) -> Option<&str> {
        self.outcome(field)
            .and_then(FieldOutcome::failure)
            .map(|failure| failure.message.as_str())
    }

    pub fn kind(&self, field: FieldName) -> Option<FailureKind> {
        self.outcome(field)
            .and_then(FieldOutcome::failure)
            .map(|failure| failure.kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fail(kind: FailureKind, message: &str) -> FieldOutcome {
        FieldOutcome::Fail(Failure {
            kind,
            message: message.to_string(),
        })
    }

    #[test]
    fn test_report_is_submittable_only_without_failures() {
        let ok = ValidationReport::new(BTreeMap::from([
            (FieldName::Email, FieldOutcome::Ok),
            (FieldName::Address, FieldOutcome::Ok),
        ]));
        assert!(ok.all_submittable());
        assert_eq!(ok.failure_count(), 0);

        let bad = ValidationReport::new(BTreeMap::from([
            (FieldName::Email, fail(FailureKind::FormatMismatch, "bad email")),
            (FieldName::Address, FieldOutcome::Ok),
        ]));
        assert!(!bad.all_submittable());
        assert_eq!(bad.message(FieldName::Email), Some("bad email"));
        assert_eq!(bad.kind(FieldName::Email), Some(FailureKind::FormatMismatch));
        assert_eq!(bad.message(FieldName::Address), None);
    }

    #[test]
    fn test_report_serializes_with_status_tags() {
        let report = ValidationReport::new(BTreeMap::from([
            (FieldName::Fullname, FieldOutcome::Ok),
            (FieldName::ConfirmPassword, fail(FailureKind::MismatchWithOtherField, "x")),
        ]));
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["submittable"], false);
        assert_eq!(json["outcomes"]["fullname"]["status"], "ok");
        assert_eq!(json["outcomes"]["confirmPassword"]["status"], "fail");
        assert_eq!(json["outcomes"]["confirmPassword"]["kind"], "mismatch_with_other_field");
    }
}
