// File: src/field.rs
// Purpose: Field names of the registration form and the values submitted for them

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A field of the registration form.
///
/// The serialized name is the `id` of the input element in the page
/// (`confirmPassword` keeps its camelCase spelling). Variants are declared in
/// form order, so ordered collections keyed by `FieldName` iterate top to bottom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FieldName {
    Fullname,
    Username,
    Email,
    Password,
    ConfirmPassword,
    Birthdate,
    Address,
}

impl FieldName {
    /// Every field, in form order
    pub const ALL: [FieldName; 7] = [
        FieldName::Fullname,
        FieldName::Username,
        FieldName::Email,
        FieldName::Password,
        FieldName::ConfirmPassword,
        FieldName::Birthdate,
        FieldName::Address,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FieldName::Fullname => "fullname",
            FieldName::Username => "username",
            FieldName::Email => "email",
            FieldName::Password => "password",
            FieldName::ConfirmPassword => "confirmPassword",
            FieldName::Birthdate => "birthdate",
            FieldName::Address => "address",
        }
    }
}

impl fmt::Display for FieldName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown form field: {0:?}")]
pub struct UnknownField(pub String);

impl FromStr for FieldName {
    type Err = UnknownField;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FieldName::ALL
            .into_iter()
            .find(|field| field.as_str() == s)
            .ok_or_else(|| UnknownField(s.to_string()))
    }
}

/// Raw values of the form at the moment they are read.
///
/// A field with no entry reads as the empty string, the same as an untouched input.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormValues(BTreeMap<FieldName, String>);

impl FormValues {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style setter
    pub fn with(mut self, field: FieldName, value: impl Into<String>) -> Self {
        self.set(field, value);
        self
    }

    pub fn set(&mut self, field: FieldName, value: impl Into<String>) {
        self.0.insert(field, value.into());
    }

    /// Current raw value of a field, untrimmed
    pub fn get(&self, field: FieldName) -> &str {
        self.0.get(&field).map(|s| s.as_str()).unwrap_or("")
    }
}

impl<S: Into<String>> FromIterator<(FieldName, S)> for FormValues {
    fn from_iter<I: IntoIterator<Item = (FieldName, S)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(field, value)| (field, value.into())).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_round_trip_through_from_str() {
        for field in FieldName::ALL {
            assert_eq!(field.as_str().parse::<FieldName>(), Ok(field));
        }
        assert!("confirm_password".parse::<FieldName>().is_err());
    }

    #[test]
    fn test_serde_names_match_element_ids() {
        let json = serde_json::to_string(&FieldName::ConfirmPassword).unwrap();
        assert_eq!(json, "\"confirmPassword\"");
    }

    #[test]
    fn test_missing_value_reads_empty() {
        let values = FormValues::new().with(FieldName::Email, "a@b.co");
        assert_eq!(values.get(FieldName::Email), "a@b.co");
        assert_eq!(values.get(FieldName::Address), "");
    }

    #[test]
    fn test_values_deserialize_from_toml() {
        let values: FormValues = toml::from_str(
            r#"
            fullname = "Ana Pérez"
            confirmPassword = "Abcdef12"
            "#,
        )
        .unwrap();
        assert_eq!(values.get(FieldName::Fullname), "Ana Pérez");
        assert_eq!(values.get(FieldName::ConfirmPassword), "Abcdef12");
    }
}
