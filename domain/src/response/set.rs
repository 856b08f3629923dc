//! Response set entities

use crate::answer::{NormalizedAnswer, RawAnswer, normalize};
use crate::core::source::Source;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// One answer of one respondent to one question
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerEntry {
    pub question_number: u32,
    #[serde(default)]
    pub answer: RawAnswer,
}

impl AnswerEntry {
    pub fn new(question_number: u32, answer: impl Into<RawAnswer>) -> Self {
        Self {
            question_number,
            answer: answer.into(),
        }
    }
}

/// All answers of one simulated respondent within a response set
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RespondentRecord {
    pub respondent_index: usize,
    #[serde(default)]
    pub archetype: Option<String>,
    #[serde(default)]
    pub answers: Vec<AnswerEntry>,
}

impl RespondentRecord {
    pub fn new(respondent_index: usize, answers: Vec<AnswerEntry>) -> Self {
        Self {
            respondent_index,
            archetype: None,
            answers,
        }
    }

    pub fn with_archetype(mut self, archetype: impl Into<String>) -> Self {
        self.archetype = Some(archetype.into());
        self
    }

    /// Raw answer to a question; [`RawAnswer::Absent`] when missing
    ///
    /// If a question was answered twice the first entry wins.
    pub fn raw_answer(&self, question_number: u32) -> &RawAnswer {
        static ABSENT: RawAnswer = RawAnswer::Absent;
        self.answers
            .iter()
            .find(|a| a.question_number == question_number)
            .map(|a| &a.answer)
            .unwrap_or(&ABSENT)
    }

    /// Normalized answer to a question
    pub fn answer(&self, question_number: u32) -> NormalizedAnswer {
        normalize(self.raw_answer(question_number))
    }
}

/// Every answer produced by one generation source
///
/// Created once per simulation run and never mutated afterwards; fields are
/// only reachable through accessors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseSet {
    source: Source,
    respondents: Vec<RespondentRecord>,
}

impl ResponseSet {
    pub fn new(source: Source, respondents: Vec<RespondentRecord>) -> Self {
        Self {
            source,
            respondents,
        }
    }

    pub fn source(&self) -> &Source {
        &self.source
    }

    pub fn respondents(&self) -> &[RespondentRecord] {
        &self.respondents
    }

    pub fn respondent_count(&self) -> usize {
        self.respondents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.respondents.is_empty()
    }

    /// Question numbers that appear anywhere in this set
    pub fn question_numbers(&self) -> BTreeSet<u32> {
        self.respondents
            .iter()
            .flat_map(|r| r.answers.iter().map(|a| a.question_number))
            .collect()
    }

    /// Normalized non-empty answers to one question, in respondent order
    pub fn answers_for(&self, question_number: u32) -> Vec<NormalizedAnswer> {
        self.respondents
            .iter()
            .map(|r| r.answer(question_number))
            .filter(|a| !a.is_empty())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set() -> ResponseSet {
        ResponseSet::new(
            Source::model("gpt-4.1"),
            vec![
                RespondentRecord::new(0, vec![AnswerEntry::new(1, "Yes"), AnswerEntry::new(2, "  ")])
                    .with_archetype("skeptic"),
                RespondentRecord::new(1, vec![AnswerEntry::new(1, "No"), AnswerEntry::new(3, "Blue")]),
            ],
        )
    }

    #[test]
    fn test_missing_answer_is_absent() {
        let set = set();
        assert!(set.respondents()[0].raw_answer(3).is_absent());
        assert!(set.respondents()[0].answer(3).is_empty());
    }

    #[test]
    fn test_answers_for_skips_empty() {
        let set = set();
        assert_eq!(set.answers_for(1).len(), 2);
        assert!(set.answers_for(2).is_empty());
    }

    #[test]
    fn test_question_numbers_union() {
        assert_eq!(
            set().question_numbers().into_iter().collect::<Vec<_>>(),
            vec![1, 2, 3]
        );
    }

    #[test]
    fn test_deserialize_respondent_record() {
        let json = r#"{
            "source": "rerun-1",
            "respondents": [
                {"respondent_index": 0, "archetype": "early adopter",
                 "answers": [{"question_number": 1, "answer": ["A", "B"]},
                             {"question_number": 2}]}
            ]
        }"#;
        let set: ResponseSet = serde_json::from_str(json).unwrap();
        assert_eq!(set.source(), &Source::rerun(1));
        let record = &set.respondents()[0];
        assert_eq!(record.archetype.as_deref(), Some("early adopter"));
        assert_eq!(record.raw_answer(1), &RawAnswer::multi(["A", "B"]));
        assert!(record.raw_answer(2).is_absent());
    }
}
