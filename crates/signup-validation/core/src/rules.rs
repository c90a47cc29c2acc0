// File: src/rules.rs
// Purpose: Static rule table of the registration form

use crate::field::FieldName;
use crate::matcher::Matcher;
use crate::outcome::FailureKind;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use thiserror::Error;

pub const DEFAULT_MINIMUM_AGE: u32 = 13;

static FULLNAME_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-zÁÉÍÓÚáéíóúÑñ\s]{3,50}$").unwrap());

static USERNAME_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z0-9_]{3,20}$").unwrap());

static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());

// 8-16 ASCII letters/digits with at least one lowercase, one uppercase and one digit
static PASSWORD_REGEXES: Lazy<Vec<Regex>> = Lazy::new(|| {
    [r"^[A-Za-z0-9]{8,16}$", r"[a-z]", r"[A-Z]", r"[0-9]"]
        .iter()
        .map(|pattern| Regex::new(pattern).unwrap())
        .collect()
});

static ADDRESS_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9ÁÉÍÓÚáéíóúÑñ\s,.-]{0,100}$").unwrap());

/// One check a field may require, beyond "required".
///
/// A rule keeps its checks in evaluation order: length, then pattern, then
/// match, then age. The first one that fails decides the message.
#[derive(Debug, Clone)]
pub enum Check {
    /// Inclusive bounds on the number of characters
    Length { min: usize, max: usize },
    Pattern(Matcher),
    /// Value must equal the current value of another field
    MatchField(FieldName),
    /// Value is a birthdate; the age it gives must be at least this many years
    MinimumAge(u32),
}

impl Check {
    fn rank(&self) -> u8 {
        match self {
            Check::Length { .. } => 0,
            Check::Pattern(_) => 1,
            Check::MatchField(_) => 2,
            Check::MinimumAge(_) => 3,
        }
    }

    pub fn failure_kind(&self) -> FailureKind {
        match self {
            Check::Length { .. } => FailureKind::LengthOutOfBounds,
            Check::Pattern(_) => FailureKind::FormatMismatch,
            Check::MatchField(_) => FailureKind::MismatchWithOtherField,
            Check::MinimumAge(_) => FailureKind::AgeBelowMinimum,
        }
    }
}

impl fmt::Display for Check {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Check::Length { min, max } => write!(f, "length {}..={}", min, max),
            Check::Pattern(matcher) => write!(f, "pattern {}", matcher),
            Check::MatchField(other) => write!(f, "equals {}", other),
            Check::MinimumAge(years) => write!(f, "age >= {}", years),
        }
    }
}

/// Validation configuration of a single field
#[derive(Debug, Clone)]
pub struct FieldRule {
    name: FieldName,
    required: bool,
    trim: bool,
    checks: Vec<Check>,
    messages: BTreeMap<FailureKind, String>,
}

impl FieldRule {
    /// Optional, trimmed, no checks
    pub fn new(name: FieldName) -> Self {
        Self {
            name,
            required: false,
            trim: true,
            checks: Vec::new(),
            messages: BTreeMap::new(),
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Read the value as typed, keeping surrounding whitespace
    pub fn untrimmed(mut self) -> Self {
        self.trim = false;
        self
    }

    pub fn length(self, min: usize, max: usize) -> Self {
        self.check(Check::Length { min, max })
    }

    pub fn pattern(self, matcher: impl Into<Matcher>) -> Self {
        self.check(Check::Pattern(matcher.into()))
    }

    pub fn must_match(self, other: FieldName) -> Self {
        self.check(Check::MatchField(other))
    }

    pub fn minimum_age(self, years: u32) -> Self {
        self.check(Check::MinimumAge(years))
    }

    pub fn check(mut self, check: Check) -> Self {
        self.checks.push(check);
        // stable, so two checks of one kind keep insertion order
        self.checks.sort_by_key(Check::rank);
        self
    }

    pub fn message(mut self, kind: FailureKind, text: impl Into<String>) -> Self {
        self.set_message(kind, text);
        self
    }

    pub fn set_message(&mut self, kind: FailureKind, text: impl Into<String>) {
        self.messages.insert(kind, text.into());
    }

    pub fn name(&self) -> FieldName {
        self.name
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn trims(&self) -> bool {
        self.trim
    }

    pub fn checks(&self) -> &[Check] {
        &self.checks
    }

    pub fn message_for(&self, kind: FailureKind) -> Option<&str> {
        self.messages.get(&kind).map(|s| s.as_str())
    }

    /// The value this rule evaluates, given the raw input
    pub fn read<'a>(&self, raw: &'a str) -> &'a str {
        if self.trim {
            raw.trim_matches(is_trimmable)
        } else {
            raw
        }
    }

    /// Every failure kind this rule can report
    pub fn failure_kinds(&self) -> BTreeSet<FailureKind> {
        let mut kinds: BTreeSet<FailureKind> = self.checks.iter().map(Check::failure_kind).collect();
        if self.required {
            kinds.insert(FailureKind::MissingRequired);
        }
        kinds
    }
}

/// Characters stripped from both ends of a trimmed value.
///
/// Matches what browsers strip: Unicode whitespace plus the byte order mark,
/// but not NEXT LINE (U+0085).
pub fn is_trimmable(c: char) -> bool {
    c == '\u{FEFF}' || (c.is_whitespace() && c != '\u{85}')
}

/// Stock age message for a given threshold
pub fn age_message(minimum_age: u32) -> String {
    format!("Debes tener al menos {} años para registrarte.", minimum_age)
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuleError {
    #[error("field {0} has more than one rule")]
    DuplicateField(FieldName),

    #[error("field {field} must match {target}, which has no rule")]
    UnknownMatchField { field: FieldName, target: FieldName },

    #[error("field {field} has length bounds {min}..={max} with min > max")]
    InvertedBounds { field: FieldName, min: usize, max: usize },

    #[error("field {field} can fail with '{kind}' but has no message for it")]
    MissingMessage { field: FieldName, kind: FailureKind },
}

/// Immutable set of field rules, in evaluation order.
///
/// Construction checks that every cross-field reference resolves, every pair
/// of length bounds is ordered, and every failure a rule can produce has a
/// message.
#[derive(Debug, Clone)]
pub struct RuleSet {
    rules: Vec<FieldRule>,
}

impl RuleSet {
    pub fn new(rules: Vec<FieldRule>) -> Result<Self, RuleError> {
        let mut seen = BTreeSet::new();
        for rule in &rules {
            if !seen.insert(rule.name) {
                return Err(RuleError::DuplicateField(rule.name));
            }
        }

        for rule in &rules {
            for check in &rule.checks {
                match check {
                    Check::MatchField(target) if !seen.contains(target) => {
                        return Err(RuleError::UnknownMatchField {
                            field: rule.name,
                            target: *target,
                        });
                    }
                    Check::Length { min, max } if min > max => {
                        return Err(RuleError::InvertedBounds {
                            field: rule.name,
                            min: *min,
                            max: *max,
                        });
                    }
                    _ => {}
                }
            }

            if let Some(kind) = rule
                .failure_kinds()
                .into_iter()
                .find(|kind| !rule.messages.contains_key(kind))
            {
                return Err(RuleError::MissingMessage { field: rule.name, kind });
            }
        }

        Ok(Self { rules })
    }

    /// Rules of the registration form with the stock messages
    pub fn registration() -> Result<Self, RuleError> {
        Self::new(registration_rules(DEFAULT_MINIMUM_AGE))
    }

    pub fn get(&self, field: FieldName) -> Option<&FieldRule> {
        self.rules.iter().find(|rule| rule.name == field)
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldRule> {
        self.rules.iter()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// Unvalidated rules of the registration form, ready for message overrides
pub fn registration_rules(minimum_age: u32) -> Vec<FieldRule> {
    use FailureKind::*;

    vec![
        FieldRule::new(FieldName::Fullname)
            .required()
            .length(3, 50)
            .pattern(FULLNAME_REGEX.clone())
            .message(MissingRequired, "El nombre es obligatorio.")
            .message(LengthOutOfBounds, "El nombre debe tener entre 3 y 50 caracteres.")
            .message(FormatMismatch, "Solo se permiten letras, espacios, eñes y tildes."),
        FieldRule::new(FieldName::Username)
            .required()
            .length(3, 20)
            .pattern(USERNAME_REGEX.clone())
            .message(MissingRequired, "El nombre de usuario es obligatorio.")
            .message(
                LengthOutOfBounds,
                "El nombre de usuario debe tener entre 3 y 20 caracteres.",
            )
            .message(FormatMismatch, "Solo se permiten letras, números y guiones bajos."),
        FieldRule::new(FieldName::Email)
            .required()
            .pattern(EMAIL_REGEX.clone())
            .message(MissingRequired, "El correo electrónico es obligatorio.")
            .message(FormatMismatch, "El correo electrónico no es válido."),
        FieldRule::new(FieldName::Password)
            .required()
            .untrimmed()
            .pattern(Matcher::AllOf(PASSWORD_REGEXES.clone()))
            .message(MissingRequired, "La contraseña es obligatoria.")
            .message(
                FormatMismatch,
                "La contraseña debe tener entre 8 y 16 caracteres, incluyendo una mayúscula, una minúscula y un número.",
            ),
        FieldRule::new(FieldName::ConfirmPassword)
            .required()
            .untrimmed()
            .must_match(FieldName::Password)
            .message(MissingRequired, "La confirmación de la contraseña es obligatoria.")
            .message(MismatchWithOtherField, "Las contraseñas no coinciden."),
        FieldRule::new(FieldName::Birthdate)
            .required()
            .minimum_age(minimum_age)
            .message(MissingRequired, "La fecha de nacimiento es obligatoria.")
            .message(AgeBelowMinimum, age_message(minimum_age)),
        FieldRule::new(FieldName::Address)
            .length(0, 100)
            .pattern(ADDRESS_REGEX.clone())
            .message(LengthOutOfBounds, "La dirección debe tener hasta 100 caracteres.")
            .message(FormatMismatch, "La dirección contiene caracteres no permitidos."),
    ]
}
