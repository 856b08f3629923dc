//! Per-question consensus
//!
//! Frequency counting uses exact normalized values, never containment; the
//! comparator only matters for metrics that pair answers up.

use super::percent::percent;
use crate::answer::NormalizedAnswer;
use crate::core::string::capitalize_first;
use crate::response::ResponseSet;
use serde::{Deserialize, Serialize};

/// Displayed dominant answer when a question has no comparable answers
pub const NO_DATA: &str = "No data";

/// Count of one normalized answer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistributionEntry {
    /// Display key of `normalized`
    pub answer: String,
    /// The counted value; entries are distinct by this, not by `answer`
    pub normalized: NormalizedAnswer,
    pub count: usize,
}

impl DistributionEntry {
    /// A single occurrence; `None` for an empty answer
    pub fn first(normalized: NormalizedAnswer) -> Option<Self> {
        Some(Self {
            answer: normalized.key()?,
            normalized,
            count: 1,
        })
    }
}

/// Dominant answer, confidence and distribution for one question
///
/// Always a view recomputed from response sets, never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsensusResult {
    /// Most frequent answer with its first letter upper-cased, or [`NO_DATA`]
    pub dominant_answer: String,
    /// Share of non-empty answers equal to the dominant one (0-100)
    pub confidence: u8,
    /// Normalized answer counts in first-encountered order
    pub distribution: Vec<DistributionEntry>,
    /// Number of non-empty answers counted
    pub total: usize,
}

impl ConsensusResult {
    /// The "No data" sentinel
    pub fn no_data() -> Self {
        Self {
            dominant_answer: NO_DATA.to_string(),
            confidence: 0,
            distribution: Vec::new(),
            total: 0,
        }
    }

    pub fn has_data(&self) -> bool {
        self.total > 0
    }

    /// Every non-empty answer was identical after normalization
    pub fn is_unanimous(&self) -> bool {
        self.distribution.len() == 1
    }

    /// Most frequent entry, first-encountered on ties
    pub fn dominant_entry(&self) -> Option<&DistributionEntry> {
        self.distribution
            .iter()
            .fold(None, |best: Option<&DistributionEntry>, entry| match best {
                Some(b) if b.count >= entry.count => Some(b),
                _ => Some(entry),
            })
    }

    /// Dominant answer as a normalized value, for pattern comparison
    pub fn dominant_normalized(&self) -> NormalizedAnswer {
        match self.dominant_entry() {
            Some(entry) => entry.normalized.clone(),
            None => NormalizedAnswer::Empty,
        }
    }

    /// Second most frequent answer, first-encountered on ties
    pub fn runner_up(&self) -> Option<&DistributionEntry> {
        let dominant = self.dominant_entry()?;
        self.distribution
            .iter()
            .filter(|e| !std::ptr::eq(*e, dominant))
            .fold(None, |best: Option<&DistributionEntry>, entry| match best {
                Some(b) if b.count >= entry.count => Some(b),
                _ => Some(entry),
            })
    }
}

/// Computes [`ConsensusResult`]s
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsensusCalculator;

impl ConsensusCalculator {
    /// Consensus over a sequence of answers; empty answers are skipped
    pub fn consensus<'a, I>(&self, answers: I) -> ConsensusResult
    where
        I: IntoIterator<Item = &'a NormalizedAnswer>,
    {
        let mut distribution: Vec<DistributionEntry> = Vec::new();
        let mut total = 0usize;
        for answer in answers.into_iter().filter(|a| !a.is_empty()) {
            total += 1;
            match distribution.iter_mut().find(|e| &e.normalized == answer) {
                Some(entry) => entry.count += 1,
                None => distribution.extend(DistributionEntry::first(answer.clone())),
            }
        }
        if total == 0 {
            return ConsensusResult::no_data();
        }

        let mut result = ConsensusResult {
            dominant_answer: String::new(),
            confidence: 0,
            distribution,
            total,
        };
        let (answer, top) = match result.dominant_entry() {
            Some(entry) => (entry.answer.clone(), entry.count),
            None => return ConsensusResult::no_data(),
        };
        let mut confidence = percent(top, total);
        // rounding must not report a split vote as unanimous
        if top < total && confidence == 100 {
            confidence = 99;
        }
        result.dominant_answer = capitalize_first(&answer);
        result.confidence = confidence;
        result
    }

    /// Consensus for one question within one set
    pub fn for_set(&self, set: &ResponseSet, question_number: u32) -> ConsensusResult {
        self.consensus(&set.answers_for(question_number))
    }

    /// Consensus for one question across several sets combined
    pub fn for_sets(&self, sets: &[ResponseSet], question_number: u32) -> ConsensusResult {
        let answers: Vec<NormalizedAnswer> = sets
            .iter()
            .flat_map(|s| s.answers_for(question_number))
            .collect();
        self.consensus(&answers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::answer::{RawAnswer, normalize};
    use crate::core::source::Source;
    use crate::response::{AnswerEntry, RespondentRecord};

    fn answers(raw: &[&str]) -> Vec<NormalizedAnswer> {
        raw.iter().map(|s| normalize(&RawAnswer::text(*s))).collect()
    }

    #[test]
    fn test_majority_answer_with_confidence() {
        let result = ConsensusCalculator.consensus(&answers(&["A", "A", "B"]));
        assert_eq!(result.dominant_answer, "A");
        assert_eq!(result.confidence, 67);
        assert_eq!(result.total, 3);
        assert_eq!(result.runner_up().unwrap().answer, "b");
    }

    #[test]
    fn test_no_data_sentinel() {
        let result = ConsensusCalculator.consensus(&answers(&["", "   "]));
        assert_eq!(result.dominant_answer, NO_DATA);
        assert_eq!(result.confidence, 0);
        assert!(!result.has_data());
        assert!(result.runner_up().is_none());
    }

    #[test]
    fn test_tie_broken_by_first_encountered() {
        let result = ConsensusCalculator.consensus(&answers(&["blue", "red", "red", "blue"]));
        assert_eq!(result.dominant_answer, "Blue");
        assert_eq!(result.confidence, 50);
    }

    #[test]
    fn test_counts_use_exact_keys_not_containment() {
        let result = ConsensusCalculator.consensus(&answers(&["yes", "yes please", "Yes"]));
        assert_eq!(result.distribution.len(), 2);
        assert_eq!(result.confidence, 67);
    }

    #[test]
    fn test_unanimous_iff_confidence_100() {
        let unanimous = ConsensusCalculator.consensus(&answers(&["Red", " red ", "RED"]));
        assert_eq!(unanimous.confidence, 100);
        assert!(unanimous.is_unanimous());

        let mut many = vec!["a"; 199];
        many.push("b");
        let split = ConsensusCalculator.consensus(&answers(&many));
        assert!(!split.is_unanimous());
        assert_eq!(split.confidence, 99);
    }

    #[test]
    fn test_capitalizes_only_first_letter() {
        let result = ConsensusCalculator.consensus(&answers(&["strongly AGREE"]));
        assert_eq!(result.dominant_answer, "Strongly agree");
    }

    #[test]
    fn test_multi_select_key() {
        let a = normalize(&RawAnswer::multi(["red", "blue"]));
        let b = normalize(&RawAnswer::multi(["Blue", "Red"]));
        let result = ConsensusCalculator.consensus([&a, &b]);
        assert_eq!(result.dominant_answer, "Blue, red");
        assert_eq!(result.confidence, 100);
    }

    #[test]
    fn test_multi_select_dominant_stays_multi() {
        let a = normalize(&RawAnswer::multi(["red", "blue"]));
        let result = ConsensusCalculator.consensus([&a]);
        assert_eq!(
            result.dominant_normalized(),
            NormalizedAnswer::Multi(vec!["blue".into(), "red".into()])
        );
    }

    #[test]
    fn test_separator_in_choice_is_counted_separately() {
        let joined = normalize(&RawAnswer::multi(["a, b"]));
        let split = normalize(&RawAnswer::multi(["a", "b"]));
        let result = ConsensusCalculator.consensus([&joined, &split, &split]);
        assert_eq!(result.distribution.len(), 2);
        assert_eq!(result.confidence, 67);
        assert_eq!(result.dominant_normalized(), split);
    }

    #[test]
    fn test_combined_sets() {
        let a = ResponseSet::new(
            Source::model("a"),
            vec![RespondentRecord::new(0, vec![AnswerEntry::new(1, "Yes")])],
        );
        let b = ResponseSet::new(
            Source::model("b"),
            vec![
                RespondentRecord::new(0, vec![AnswerEntry::new(1, "No")]),
                RespondentRecord::new(1, vec![AnswerEntry::new(1, "no")]),
                RespondentRecord::new(2, vec![]),
            ],
        );
        let result = ConsensusCalculator.for_sets(&[a, b], 1);
        assert_eq!(result.dominant_answer, "No");
        assert_eq!(result.confidence, 67);
        assert_eq!(result.total, 3);
    }

    #[test]
    fn test_idempotent() {
        let input = answers(&["x", "y", "x"]);
        assert_eq!(
            ConsensusCalculator.consensus(&input),
            ConsensusCalculator.consensus(&input)
        );
    }
}
