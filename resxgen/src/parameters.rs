//! Formatting-parameter classification for resource values.
//!
//! A value either uses named placeholders (`{argumentName}`) or positional
//! ones (`{0}`). Named detection wins: when any named token is present,
//! positional-looking tokens are treated as literal text.

use std::collections::HashSet;

use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;

lazy_static! {
    static ref NAMED_PARAMETER_REGEX: Regex = Regex::new(r"\{([A-Za-z][A-Za-z0-9_]*)\}").unwrap();
    static ref POSITIONAL_PARAMETER_REGEX: Regex = Regex::new(r"\{([0-9]+)\}").unwrap();
}

/// Placeholder style used by a resource value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ParameterStyle {
    Named,
    Positional,
}

/// The formatting-parameter contract of one resource value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParameterList {
    pub style: ParameterStyle,
    /// Distinct tokens: first-occurrence order for named style, ascending
    /// numeric order for positional style.
    pub tokens: Vec<String>,
}

impl ParameterList {
    pub fn uses_named_parameters(&self) -> bool {
        self.style == ParameterStyle::Named
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }
}

/// Classifies `value` and returns its de-duplicated parameter tokens.
///
/// A value without placeholders yields an empty positional list.
pub fn classify(value: &str) -> ParameterList {
    let named = distinct_captures(&NAMED_PARAMETER_REGEX, value);
    if !named.is_empty() {
        return ParameterList {
            style: ParameterStyle::Named,
            tokens: named,
        };
    }

    let mut positional = distinct_captures(&POSITIONAL_PARAMETER_REGEX, value);
    // Stable: equal indices such as `1` and `01` keep occurrence order.
    positional.sort_by_key(|token| positional_index(token));
    ParameterList {
        style: ParameterStyle::Positional,
        tokens: positional,
    }
}

/// Numeric value of a positional token; saturates for absurdly long digit runs.
pub fn positional_index(token: &str) -> u64 {
    token.parse().unwrap_or(u64::MAX)
}

fn distinct_captures(regex: &Regex, value: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    regex
        .captures_iter(value)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str())
        .filter(|token| seen.insert(*token))
        .map(str::to_string)
        .collect()
}
