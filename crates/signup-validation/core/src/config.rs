// File: src/config.rs
// Purpose: Configuration parsing from signup.toml

use crate::field::FieldName;
use crate::outcome::FailureKind;
use crate::rules::{registration_rules, RuleError, RuleSet, DEFAULT_MINIMUM_AGE};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Form configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub rules: RulesConfig,

    /// Message overrides per field
    #[serde(default)]
    pub messages: BTreeMap<FieldName, MessageOverrides>,

    #[serde(default)]
    pub dom: DomConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct RulesConfig {
    /// Youngest age, in whole years, allowed to register (default: 13).
    /// The stock age message names this threshold.
    #[serde(default = "default_minimum_age")]
    pub minimum_age: u32,
}

/// Replacement texts, keyed like the failure kinds
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct MessageOverrides {
    #[serde(default)]
    pub required: Option<String>,

    #[serde(default)]
    pub length: Option<String>,

    #[serde(default)]
    pub format: Option<String>,

    #[serde(default, rename = "match")]
    pub mismatch: Option<String>,

    #[serde(default)]
    pub age: Option<String>,
}

impl MessageOverrides {
    fn entries(&self) -> impl Iterator<Item = (FailureKind, &str)> {
        [
            (FailureKind::MissingRequired, &self.required),
            (FailureKind::LengthOutOfBounds, &self.length),
            (FailureKind::FormatMismatch, &self.format),
            (FailureKind::MismatchWithOtherField, &self.mismatch),
            (FailureKind::AgeBelowMinimum, &self.age),
        ]
        .into_iter()
        .filter_map(|(kind, text)| text.as_deref().map(|text| (kind, text)))
    }
}

/// Page conventions used by the browser client
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct DomConfig {
    /// Id prefix of the element holding a field's message (default: "error-")
    #[serde(default = "default_error_prefix")]
    pub error_prefix: String,

    /// Class added to an input while it is invalid (default: "is-invalid")
    #[serde(default = "default_invalid_class")]
    pub invalid_class: String,
}

fn default_minimum_age() -> u32 {
    DEFAULT_MINIMUM_AGE
}

fn default_error_prefix() -> String {
    "error-".to_string()
}

fn default_invalid_class() -> String {
    "is-invalid".to_string()
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            minimum_age: default_minimum_age(),
        }
    }
}

impl Default for DomConfig {
    fn default() -> Self {
        Self {
            error_prefix: default_error_prefix(),
            invalid_class: default_invalid_class(),
        }
    }
}

impl DomConfig {
    /// Id of the element displaying `field`'s message
    pub fn error_slot_id(&self, field: FieldName) -> String {
        format!("{}{}", self.error_prefix, field)
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        // Missing file means stock configuration
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;

        Self::from_toml_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path))
    }

    /// Load configuration from default path (./signup.toml)
    pub fn load_default() -> Result<Self> {
        Self::load("signup.toml")
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        Ok(toml::from_str(content)?)
    }

    /// Registration rules with this configuration applied
    pub fn rule_set(&self) -> Result<RuleSet, RuleError> {
        let mut rules = registration_rules(self.rules.minimum_age);

        for rule in &mut rules {
            let Some(overrides) = self.messages.get(&rule.name()) else {
                continue;
            };
            let producible = rule.failure_kinds();
            for (kind, text) in overrides.entries() {
                if !producible.contains(&kind) {
                    tracing::warn!(
                        field = %rule.name(),
                        kind = %kind,
                        "message override for a failure this field never reports"
                    );
                }
                rule.set_message(kind, text);
            }
        }

        RuleSet::new(rules)
    }
}
