//! Question value objects and the ordered question catalog

use super::error::DomainError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// How a question is answered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionType {
    SingleSelect,
    MultiSelect,
    RatingScale,
    /// Open "user input" answers; not directly comparable across reruns
    #[serde(alias = "user_input", alias = "text")]
    FreeText,
}

impl QuestionType {
    /// Whether answers to this type can be scored for rerun stability
    pub fn is_comparable(&self) -> bool {
        !matches!(self, QuestionType::FreeText)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            QuestionType::SingleSelect => "single_select",
            QuestionType::MultiSelect => "multi_select",
            QuestionType::RatingScale => "rating_scale",
            QuestionType::FreeText => "free_text",
        }
    }
}

impl std::fmt::Display for QuestionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A survey question (Value Object)
///
/// Immutable once simulation has started against it. `question_number` is
/// unique within a catalog and only drives display order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub question_number: u32,
    pub text: String,
    #[serde(rename = "type")]
    pub question_type: QuestionType,
}

impl Question {
    pub fn new(question_number: u32, text: impl Into<String>, question_type: QuestionType) -> Self {
        Self {
            question_number,
            text: text.into(),
            question_type,
        }
    }
}

/// Ordered list of questions shared by every response set under comparison
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct QuestionCatalog {
    questions: Vec<Question>,
}

impl QuestionCatalog {
    /// Build a catalog, rejecting duplicate question numbers
    pub fn new(questions: Vec<Question>) -> Result<Self, DomainError> {
        let mut seen = HashSet::new();
        for q in &questions {
            if !seen.insert(q.question_number) {
                return Err(DomainError::DuplicateQuestion(q.question_number));
            }
        }
        Ok(Self { questions })
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn get(&self, question_number: u32) -> Option<&Question> {
        self.questions
            .iter()
            .find(|q| q.question_number == question_number)
    }

    pub fn numbers(&self) -> impl Iterator<Item = u32> + '_ {
        self.questions.iter().map(|q| q.question_number)
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }
}

impl<'de> Deserialize<'de> for QuestionCatalog {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let questions = Vec::<Question>::deserialize(deserializer)?;
        QuestionCatalog::new(questions).map_err(serde::de::Error::custom)
    }
}
