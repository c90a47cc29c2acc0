// File: src/matcher.rs
// Purpose: Format matchers used by pattern checks

use regex::Regex;
use std::fmt;

/// A format a field value must satisfy.
///
/// `AllOf` covers formats that need several independent conditions
/// (the `regex` crate has no look-ahead), e.g. "8-16 alphanumerics with at
/// least one lowercase, one uppercase and one digit".
#[derive(Debug, Clone)]
pub enum Matcher {
    Regex(Regex),
    AllOf(Vec<Regex>),
}

impl Matcher {
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        Ok(Matcher::Regex(Regex::new(pattern)?))
    }

    pub fn all_of(patterns: &[&str]) -> Result<Self, regex::Error> {
        let regexes = patterns
            .iter()
            .map(|pattern| Regex::new(pattern))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Matcher::AllOf(regexes))
    }

    pub fn is_match(&self, value: &str) -> bool {
        match self {
            Matcher::Regex(regex) => regex.is_match(value),
            Matcher::AllOf(regexes) => regexes.iter().all(|regex| regex.is_match(value)),
        }
    }
}

impl From<Regex> for Matcher {
    fn from(regex: Regex) -> Self {
        Matcher::Regex(regex)
    }
}

impl fmt::Display for Matcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Matcher::Regex(regex) => f.write_str(regex.as_str()),
            Matcher::AllOf(regexes) => {
                let parts: Vec<&str> = regexes.iter().map(Regex::as_str).collect();
                write!(f, "all of [{}]", parts.join(", "))
            }
        }
    }
}
