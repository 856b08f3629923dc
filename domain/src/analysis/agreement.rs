//! Agreement, variance, consistency and diversity between response sets
//!
//! All scores are integer percentages. A respondent pair only counts toward a
//! denominator when both answers are non-empty.

use super::consensus::ConsensusCalculator;
use super::percent::{mean_percent, percent, ratio_to_percent};
use crate::answer::AnswerComparator;
use crate::core::question::QuestionCatalog;
use crate::core::source::Source;
use crate::response::{AlignmentStrategy, RespondentRecord, ResponseSet};
use serde::{Deserialize, Serialize};

/// Weight of the winning-answer mismatch in [`AgreementMatrix::variance`]
pub const PATTERN_WEIGHT: f64 = 70.0;
/// Weight of the confidence gap in [`AgreementMatrix::variance`]
pub const CONFIDENCE_WEIGHT: f64 = 30.0;

/// Agreement between two sets on one question
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgreementScore {
    pub question_number: u32,
    pub agreeing: usize,
    pub comparable: usize,
    pub score: u8,
}

/// One row of a [`PairwiseAgreement`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionComparison {
    pub question_number: u32,
    pub agreement: u8,
    pub variance: u8,
    pub comparable: usize,
}

/// Full comparison of two response sets
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairwiseAgreement {
    pub source_a: Source,
    pub source_b: Source,
    /// Global agreeing / comparable ratio over every question and respondent
    pub overall: u8,
    pub per_question: Vec<QuestionComparison>,
    /// Respondent pairs produced by the alignment strategy
    pub aligned_respondents: usize,
    /// The sets had different respondent counts or question coverage
    pub degraded: bool,
}

/// Question numbers in catalog order that both sets answer somewhere
pub fn shared_questions(catalog: &QuestionCatalog, a: &ResponseSet, b: &ResponseSet) -> Vec<u32> {
    let in_a = a.question_numbers();
    let in_b = b.question_numbers();
    catalog
        .numbers()
        .filter(|n| in_a.contains(n) && in_b.contains(n))
        .collect()
}

/// Pairwise metrics over response sets
pub struct AgreementMatrix<'a> {
    comparator: &'a dyn AnswerComparator,
    alignment: &'a dyn AlignmentStrategy,
}

impl<'a> AgreementMatrix<'a> {
    pub fn new(comparator: &'a dyn AnswerComparator, alignment: &'a dyn AlignmentStrategy) -> Self {
        Self {
            comparator,
            alignment,
        }
    }

    /// `Some(agrees)` when both answers are non-empty, `None` otherwise
    fn compare(&self, a: &RespondentRecord, b: &RespondentRecord, question_number: u32) -> Option<bool> {
        let left = a.answer(question_number);
        let right = b.answer(question_number);
        if left.is_empty() || right.is_empty() {
            return None;
        }
        Some(self.comparator.same(&left, &right))
    }

    fn tally<'r, I>(&self, pairs: I, questions: &[u32]) -> (usize, usize)
    where
        I: IntoIterator<Item = (&'r RespondentRecord, &'r RespondentRecord)>,
    {
        let mut agreeing = 0;
        let mut comparable = 0;
        for (a, b) in pairs {
            for &q in questions {
                if let Some(same) = self.compare(a, b, q) {
                    comparable += 1;
                    if same {
                        agreeing += 1;
                    }
                }
            }
        }
        (agreeing, comparable)
    }

    /// Agreement of two sets on one question
    pub fn agreement(&self, a: &ResponseSet, b: &ResponseSet, question_number: u32) -> AgreementScore {
        let (agreeing, comparable) = self.tally(self.alignment.align_pair(a, b), &[question_number]);
        AgreementScore {
            question_number,
            agreeing,
            comparable,
            score: percent(agreeing, comparable),
        }
    }

    /// One global ratio over all listed questions and aligned respondents
    pub fn overall_similarity(&self, a: &ResponseSet, b: &ResponseSet, questions: &[u32]) -> u8 {
        let (agreeing, comparable) = self.tally(self.alignment.align_pair(a, b), questions);
        percent(agreeing, comparable)
    }

    /// Difference in dominant-answer pattern and confidence for one question
    ///
    /// `(1 - pattern_match) * 70 + |conf_a - conf_b| / 100 * 30`. A side with
    /// no data never matches the other's pattern.
    pub fn variance(&self, a: &ResponseSet, b: &ResponseSet, question_number: u32) -> u8 {
        let left = ConsensusCalculator.for_set(a, question_number);
        let right = ConsensusCalculator.for_set(b, question_number);
        let pattern_match = self
            .comparator
            .same(&left.dominant_normalized(), &right.dominant_normalized());
        let mismatch = if pattern_match { 0.0 } else { 1.0 };
        let gap = (f64::from(left.confidence) - f64::from(right.confidence)).abs();
        let variance = mismatch * PATTERN_WEIGHT + gap / 100.0 * CONFIDENCE_WEIGHT;
        variance.round().clamp(0.0, 100.0) as u8
    }

    /// Mean pairwise agreement between the respondents of one set
    ///
    /// 100 with fewer than two respondents; 0 when no respondent pair shares
    /// a single comparable answer.
    pub fn consistency(&self, set: &ResponseSet, questions: &[u32]) -> u8 {
        let respondents = set.respondents();
        if respondents.len() < 2 {
            return 100;
        }
        let mut ratios = Vec::new();
        for (i, a) in respondents.iter().enumerate() {
            for b in &respondents[i + 1..] {
                let (agreeing, comparable) = self.tally([(a, b)], questions);
                if comparable > 0 {
                    ratios.push(agreeing as f64 / comparable as f64);
                }
            }
        }
        if ratios.is_empty() {
            return 0;
        }
        ratio_to_percent(ratios.iter().sum::<f64>() / ratios.len() as f64)
    }

    /// `100 - mean(pairwise overall similarity)`; `None` with fewer than two sets
    pub fn diversity_index(&self, sets: &[ResponseSet], catalog: &QuestionCatalog) -> Option<u8> {
        if sets.len() < 2 {
            return None;
        }
        let mut similarities = Vec::new();
        for (i, a) in sets.iter().enumerate() {
            for b in &sets[i + 1..] {
                let questions = shared_questions(catalog, a, b);
                similarities.push(self.overall_similarity(a, b, &questions));
            }
        }
        mean_percent(&similarities).map(|mean| 100 - mean)
    }

    /// Overall and per-question comparison over the questions both sets cover
    pub fn pairwise_agreement(
        &self,
        a: &ResponseSet,
        b: &ResponseSet,
        catalog: &QuestionCatalog,
    ) -> PairwiseAgreement {
        let questions = shared_questions(catalog, a, b);
        let pairs = self.alignment.align_pair(a, b);
        let aligned_respondents = pairs.len();
        let per_question = questions
            .iter()
            .map(|&q| {
                let score = self.agreement(a, b, q);
                QuestionComparison {
                    question_number: q,
                    agreement: score.score,
                    variance: self.variance(a, b, q),
                    comparable: score.comparable,
                }
            })
            .collect();
        let (agreeing, comparable) = self.tally(pairs, &questions);
        let degraded = a.respondent_count() != b.respondent_count()
            || aligned_respondents < a.respondent_count().max(b.respondent_count())
            || a.question_numbers() != b.question_numbers();

        PairwiseAgreement {
            source_a: a.source().clone(),
            source_b: b.source().clone(),
            overall: percent(agreeing, comparable),
            per_question,
            aligned_respondents,
            degraded,
        }
    }
}
