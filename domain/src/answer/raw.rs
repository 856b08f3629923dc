//! Raw answer values as produced by a generator

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// An answer before normalization
///
/// Deserializes from any JSON value: `null` is [`RawAnswer::Absent`], an
/// array is [`RawAnswer::Multi`], a string is [`RawAnswer::Text`] and any
/// other scalar keeps its string form in [`RawAnswer::Scalar`].
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "Value", into = "Value")]
pub enum RawAnswer {
    /// Unanswered, or the generator failed for this question
    #[default]
    Absent,
    Text(String),
    /// Multi-select choices, order irrelevant
    Multi(Vec<String>),
    /// Number or boolean coerced to its string form
    Scalar(String),
}

impl RawAnswer {
    pub fn text(value: impl Into<String>) -> Self {
        RawAnswer::Text(value.into())
    }

    pub fn multi<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        RawAnswer::Multi(values.into_iter().map(Into::into).collect())
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, RawAnswer::Absent)
    }
}

impl From<Value> for RawAnswer {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => RawAnswer::Absent,
            Value::String(s) => RawAnswer::Text(s),
            Value::Array(items) => RawAnswer::Multi(
                items
                    .into_iter()
                    .filter_map(|item| match item {
                        Value::Null => None,
                        Value::String(s) => Some(s),
                        other => Some(other.to_string()),
                    })
                    .collect(),
            ),
            other => RawAnswer::Scalar(other.to_string()),
        }
    }
}

impl From<RawAnswer> for Value {
    fn from(answer: RawAnswer) -> Self {
        match answer {
            RawAnswer::Absent => Value::Null,
            RawAnswer::Text(s) | RawAnswer::Scalar(s) => Value::String(s),
            RawAnswer::Multi(items) => Value::Array(items.into_iter().map(Value::String).collect()),
        }
    }
}

impl From<&str> for RawAnswer {
    fn from(s: &str) -> Self {
        RawAnswer::Text(s.to_string())
    }
}
