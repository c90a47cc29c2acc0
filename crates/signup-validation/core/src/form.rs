// File: src/form.rs
// Purpose: Submission and input handlers that keep the error slots in sync

use crate::field::{FieldName, FormValues};
use crate::outcome::{FieldOutcome, ValidationReport};
use crate::validator::Validator;
use chrono::NaiveDate;
use std::collections::BTreeMap;

/// Where a field's current validation message is displayed.
///
/// Implemented over the DOM by the WASM client and in memory by [`MemorySlots`].
pub trait ErrorSlots {
    /// Show `message` for `field` and mark the field invalid
    fn show(&mut self, field: FieldName, message: &str);

    /// Empty the slot of `field` and drop its invalid marker
    fn clear(&mut self, field: FieldName);
}

/// Display state of one error slot
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SlotState {
    pub text: String,
    pub invalid: bool,
}

/// In-memory error slots, used by the CLI and in tests
#[derive(Debug, Clone, Default)]
pub struct MemorySlots {
    slots: BTreeMap<FieldName, SlotState>,
}

impl MemorySlots {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self, field: FieldName) -> SlotState {
        self.slots.get(&field).cloned().unwrap_or_default()
    }

    pub fn text(&self, field: FieldName) -> &str {
        self.slots.get(&field).map(|slot| slot.text.as_str()).unwrap_or("")
    }

    pub fn is_invalid(&self, field: FieldName) -> bool {
        self.slots.get(&field).is_some_and(|slot| slot.invalid)
    }

    /// Fields currently showing a message, in form order
    pub fn displayed(&self) -> impl Iterator<Item = (FieldName, &str)> {
        self.slots
            .iter()
            .filter(|(_, slot)| !slot.text.is_empty())
            .map(|(field, slot)| (*field, slot.text.as_str()))
    }
}

impl ErrorSlots for MemorySlots {
    fn show(&mut self, field: FieldName, message: &str) {
        self.slots.insert(
            field,
            SlotState {
                text: message.to_string(),
                invalid: true,
            },
        );
    }

    fn clear(&mut self, field: FieldName) {
        self.slots.insert(field, SlotState::default());
    }
}

/// What to do with the submission that triggered validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    /// Every field passed; the default submit action goes ahead
    Proceed(ValidationReport),
    /// At least one field failed; the default submit action must be cancelled
    Cancel(ValidationReport),
}

impl Submission {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Submission::Cancel(_))
    }

    pub fn report(&self) -> &ValidationReport {
        match self {
            Submission::Proceed(report) | Submission::Cancel(report) => report,
        }
    }
}

/// Binds a validator to the error slots of one form
#[derive(Debug)]
pub struct FormController<S> {
    validator: Validator,
    slots: S,
}

impl<S: ErrorSlots> FormController<S> {
    pub fn new(validator: Validator, slots: S) -> Self {
        Self { validator, slots }
    }

    pub fn validator(&self) -> &Validator {
        &self.validator
    }

    pub fn slots(&self) -> &S {
        &self.slots
    }

    pub fn into_slots(self) -> S {
        self.slots
    }

    /// Submission handler, dated today on the local calendar
    pub fn submit(&mut self, values: &FormValues) -> Submission {
        self.submit_on(values, crate::age::today_local())
    }

    /// Submission handler.
    ///
    /// Every slot is rewritten from this attempt's outcome alone: passing
    /// fields are cleared, failing fields show their first failure.
    pub fn submit_on(&mut self, values: &FormValues, today: NaiveDate) -> Submission {
        let report = self.validator.validate_on(values, today);

        for (field, outcome) in report.outcomes() {
            match outcome {
                FieldOutcome::Ok => self.slots.clear(field),
                FieldOutcome::Fail(failure) => self.slots.show(field, &failure.message),
            }
        }

        tracing::info!(
            submittable = report.all_submittable(),
            failures = report.failure_count(),
            "registration form submitted"
        );

        if report.all_submittable() {
            Submission::Proceed(report)
        } else {
            Submission::Cancel(report)
        }
    }

    /// Input handler: clears the changed field's slot without re-validating
    pub fn input_changed(&mut self, field: FieldName) {
        tracing::trace!(field = %field, "clearing error slot after input");
        self.slots.clear(field);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 16).unwrap()
    }

    #[test]
    fn test_failed_submission_marks_slots_invalid() {
        let mut form = FormController::new(Validator::registration().unwrap(), MemorySlots::new());

        let submission = form.submit_on(&FormValues::new(), today());

        assert!(submission.is_cancelled());
        assert_eq!(form.slots().text(FieldName::Email), "El correo electrónico es obligatorio.");
        assert!(form.slots().is_invalid(FieldName::Email));
        // optional and empty
        assert_eq!(form.slots().state(FieldName::Address), SlotState::default());
    }

    #[test]
    fn test_input_change_clears_only_that_field() {
        let mut form = FormController::new(Validator::registration().unwrap(), MemorySlots::new());
        form.submit_on(&FormValues::new(), today());

        form.input_changed(FieldName::Username);

        assert_eq!(form.slots().text(FieldName::Username), "");
        assert!(!form.slots().is_invalid(FieldName::Username));
        assert_eq!(form.slots().text(FieldName::Fullname), "El nombre es obligatorio.");
        assert!(form.slots().is_invalid(FieldName::Fullname));
    }
}
