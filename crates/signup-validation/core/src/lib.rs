//! Signup Validation Core
//!
//! Rule table and validator for the registration form.
//! Used by the command line checker and by the WASM client in the browser.

pub mod age;
pub mod config;
pub mod field;
pub mod form;
pub mod matcher;
pub mod outcome;
pub mod rules;
pub mod validator;

pub use config::{Config, DomConfig, MessageOverrides, RulesConfig};
pub use field::{FieldName, FormValues, UnknownField};
pub use form::{ErrorSlots, FormController, MemorySlots, SlotState, Submission};
pub use matcher::Matcher;
pub use outcome::{Failure, FailureKind, FieldOutcome, ValidationReport};
pub use rules::{registration_rules, Check, FieldRule, RuleError, RuleSet, DEFAULT_MINIMUM_AGE};
pub use validator::Validator;
