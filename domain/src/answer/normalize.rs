//! Answer normalization
//!
//! Turns a [`RawAnswer`] into a comparable [`NormalizedAnswer`]. The function
//! is total: every input maps to some normalized form.

use super::raw::RawAnswer;
use serde::{Deserialize, Serialize};

/// Separator used when a multi-select answer is rendered as one key
pub const MULTI_SEPARATOR: &str = ", ";

/// A canonical, comparable answer
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum NormalizedAnswer {
    /// Empty, whitespace-only or absent; excluded from every denominator
    Empty,
    /// Trimmed, lower-cased text
    Text(String),
    /// Sorted multiset of trimmed, lower-cased choices (never empty)
    Multi(Vec<String>),
}

impl NormalizedAnswer {
    pub fn is_empty(&self) -> bool {
        matches!(self, NormalizedAnswer::Empty)
    }

    /// Display key; `None` for [`NormalizedAnswer::Empty`]
    ///
    /// Distinct multisets can share a key (`["a, b"]` and `["a", "b"]`), so
    /// counting and comparison use the value itself.
    pub fn key(&self) -> Option<String> {
        match self {
            NormalizedAnswer::Empty => None,
            NormalizedAnswer::Text(s) => Some(s.clone()),
            NormalizedAnswer::Multi(items) => Some(items.join(MULTI_SEPARATOR)),
        }
    }

    /// View as a multiset of choices; text is a one-element multiset
    pub fn as_choices(&self) -> Vec<&str> {
        match self {
            NormalizedAnswer::Empty => Vec::new(),
            NormalizedAnswer::Text(s) => vec![s.as_str()],
            NormalizedAnswer::Multi(items) => items.iter().map(String::as_str).collect(),
        }
    }
}

fn normalize_text(s: &str) -> Option<String> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_lowercase())
    }
}

/// Canonicalize a raw answer
pub fn normalize(raw: &RawAnswer) -> NormalizedAnswer {
    match raw {
        RawAnswer::Absent => NormalizedAnswer::Empty,
        RawAnswer::Text(s) | RawAnswer::Scalar(s) => match normalize_text(s) {
            Some(text) => NormalizedAnswer::Text(text),
            None => NormalizedAnswer::Empty,
        },
        RawAnswer::Multi(items) => {
            let mut choices: Vec<String> = items.iter().filter_map(|s| normalize_text(s)).collect();
            if choices.is_empty() {
                return NormalizedAnswer::Empty;
            }
            choices.sort();
            NormalizedAnswer::Multi(choices)
        }
    }
}
