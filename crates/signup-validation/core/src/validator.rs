// File: src/validator.rs
// Purpose: Evaluates the rule set against the current form values

use crate::age::{age_on, parse_birthdate, today_local};
use crate::field::{FieldName, FormValues};
use crate::outcome::{Failure, FailureKind, FieldOutcome, ValidationReport};
use crate::rules::{Check, FieldRule, RuleError, RuleSet};
use chrono::NaiveDate;
use std::collections::BTreeMap;

/// Validates every field of the form from scratch on each call
#[derive(Debug, Clone)]
pub struct Validator {
    rules: RuleSet,
}

impl Validator {
    pub fn new(rules: RuleSet) -> Self {
        Self { rules }
    }

    /// Validator for the registration form with the stock rules
    pub fn registration() -> Result<Self, RuleError> {
        Ok(Self::new(RuleSet::registration()?))
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// Validate against today's date on the local calendar
    pub fn validate(&self, values: &FormValues) -> ValidationReport {
        self.validate_on(values, today_local())
    }

    /// Validate with ages computed at `today`
    pub fn validate_on(&self, values: &FormValues, today: NaiveDate) -> ValidationReport {
        let outcomes: BTreeMap<FieldName, FieldOutcome> = self
            .rules
            .iter()
            .map(|rule| (rule.name(), self.evaluate(rule, values, today)))
            .collect();

        let report = ValidationReport::new(outcomes);
        for (field, failure) in report.failures() {
            tracing::debug!(field = %field, kind = %failure.kind, "field failed validation");
        }
        report
    }

    /// First failing check of one field, in rule order
    pub fn validate_field(
        &self,
        field: FieldName,
        values: &FormValues,
        today: NaiveDate,
    ) -> Option<FieldOutcome> {
        self.rules
            .get(field)
            .map(|rule| self.evaluate(rule, values, today))
    }

    fn evaluate(&self, rule: &FieldRule, values: &FormValues, today: NaiveDate) -> FieldOutcome {
        let value = rule.read(values.get(rule.name()));

        if value.is_empty() {
            return if rule.is_required() {
                fail(rule, FailureKind::MissingRequired)
            } else {
                FieldOutcome::Ok
            };
        }

        for check in rule.checks() {
            if !self.passes(check, value, values, today) {
                return fail(rule, check.failure_kind());
            }
        }

        FieldOutcome::Ok
    }

    fn passes(&self, check: &Check, value: &str, values: &FormValues, today: NaiveDate) -> bool {
        match check {
            // lengths are counted in UTF-16 code units, as the browser does
            Check::Length { min, max } => {
                let len = value.encode_utf16().count();
                len >= *min && len <= *max
            }
            Check::Pattern(matcher) => matcher.is_match(value),
            Check::MatchField(other) => {
                // the other field is read the way its own rule reads it
                let other_value = match self.rules.get(*other) {
                    Some(other_rule) => other_rule.read(values.get(*other)),
                    None => values.get(*other),
                };
                value == other_value
            }
            // an unreadable date cannot establish the minimum age
            Check::MinimumAge(years) => parse_birthdate(value)
                .map(|birth| i64::from(age_on(birth, today)) >= i64::from(*years))
                .unwrap_or(false),
        }
    }
}

fn fail(rule: &FieldRule, kind: FailureKind) -> FieldOutcome {
    // RuleSet::new guarantees a message for every kind a rule can produce
    let message = rule.message_for(kind).unwrap_or_default().to_string();
    FieldOutcome::Fail(Failure { kind, message })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::FieldRule;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 16).unwrap()
    }

    #[test]
    fn test_optional_empty_field_skips_all_checks() {
        let rules = RuleSet::new(vec![FieldRule::new(FieldName::Address)
            .length(5, 10)
            .message(FailureKind::LengthOutOfBounds, "too long")])
        .unwrap();
        let validator = Validator::new(rules);

        let report = validator.validate_on(&FormValues::new().with(FieldName::Address, "   "), today());
        assert!(report.all_submittable());
    }

    #[test]
    fn test_first_failing_check_wins() {
        let rules = RuleSet::new(vec![FieldRule::new(FieldName::Username)
            .pattern(crate::matcher::Matcher::new("^[a-z]+$").unwrap())
            .length(3, 5)
            .message(FailureKind::LengthOutOfBounds, "length")
            .message(FailureKind::FormatMismatch, "format")])
        .unwrap();
        let validator = Validator::new(rules);

        // fails both checks; length is evaluated first
        let values = FormValues::new().with(FieldName::Username, "A1");
        assert_eq!(
            validator.validate_field(FieldName::Username, &values, today()),
            Some(FieldOutcome::Fail(Failure {
                kind: FailureKind::LengthOutOfBounds,
                message: "length".to_string(),
            }))
        );
    }

    #[test]
    fn test_length_counts_utf16_units_not_bytes() {
        let validator = Validator::registration().unwrap();
        let name = "Ñ".repeat(50);
        let values = FormValues::new().with(FieldName::Fullname, name);
        assert_eq!(
            validator.validate_field(FieldName::Fullname, &values, today()),
            Some(FieldOutcome::Ok)
        );

        // one astral character is two units: 99 + 2 exceeds 100
        let address = format!("{}\u{1F3E0}", "a".repeat(99));
        let values = FormValues::new().with(FieldName::Address, address);
        let outcome = validator
            .validate_field(FieldName::Address, &values, today())
            .unwrap();
        assert_eq!(outcome.failure().map(|f| f.kind), Some(FailureKind::LengthOutOfBounds));
    }

    #[test]
    fn test_unparseable_birthdate_fails_age_check() {
        let validator = Validator::registration().unwrap();
        let values = FormValues::new().with(FieldName::Birthdate, "not a date");
        let outcome = validator
            .validate_field(FieldName::Birthdate, &values, today())
            .unwrap();
        assert_eq!(outcome.failure().map(|f| f.kind), Some(FailureKind::AgeBelowMinimum));
    }

    #[test]
    fn test_unknown_field_has_no_outcome() {
        let rules = RuleSet::new(vec![FieldRule::new(FieldName::Address)]).unwrap();
        let validator = Validator::new(rules);
        assert_eq!(
            validator.validate_field(FieldName::Email, &FormValues::new(), today()),
            None
        );
    }
}
