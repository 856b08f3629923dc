//! Survey-level indicators composed from the per-question metrics

use super::agreement::{AgreementMatrix, shared_questions};
use super::consensus::ConsensusCalculator;
use super::percent::mean_percent;
use crate::core::error::DomainError;
use crate::core::question::QuestionCatalog;
use crate::core::source::Source;
use crate::response::ResponseSet;
use serde::{Deserialize, Serialize};

/// Default number of questions averaged into `consensus_strength`
pub const DEFAULT_CONSENSUS_WINDOW: usize = 10;

/// Tuning for [`InsightsSummarizer::summarize`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsightsParams {
    /// Only the first N questions with data (catalog order) are averaged
    pub consensus_window: usize,
    /// Reference set for `most_divergent`; the first set when `None`
    pub baseline: Option<Source>,
}

impl Default for InsightsParams {
    fn default() -> Self {
        Self {
            consensus_window: DEFAULT_CONSENSUS_WINDOW,
            baseline: None,
        }
    }
}

impl InsightsParams {
    pub fn with_window(mut self, window: usize) -> Self {
        self.consensus_window = window;
        self
    }

    pub fn with_baseline(mut self, baseline: Source) -> Self {
        self.baseline = Some(baseline);
        self
    }
}

/// A source and the score that selected it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceScore {
    pub source: Source,
    pub score: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurveyInsights {
    pub total_responses: usize,
    /// Mean combined confidence; `None` when no question had data
    pub consensus_strength: Option<u8>,
    pub questions_analyzed: usize,
    pub diversity_index: Option<u8>,
    /// Highest internal consistency
    pub most_consistent: Option<SourceScore>,
    /// Lowest overall similarity to the baseline
    pub most_divergent: Option<SourceScore>,
    pub baseline: Option<Source>,
}

pub struct InsightsSummarizer<'a> {
    matrix: AgreementMatrix<'a>,
}

impl<'a> InsightsSummarizer<'a> {
    pub fn new(matrix: AgreementMatrix<'a>) -> Self {
        Self { matrix }
    }

    /// Roll the sets up into [`SurveyInsights`]
    ///
    /// Fails only when `params.baseline` names a source that is not present.
    pub fn summarize(
        &self,
        sets: &[ResponseSet],
        catalog: &QuestionCatalog,
        params: &InsightsParams,
    ) -> Result<SurveyInsights, DomainError> {
        let baseline_index = match &params.baseline {
            Some(source) => Some(
                sets.iter()
                    .position(|s| s.source() == source)
                    .ok_or_else(|| DomainError::UnknownSource(source.to_string()))?,
            ),
            None if sets.is_empty() => None,
            None => Some(0),
        };

        let confidences: Vec<u8> = catalog
            .numbers()
            .map(|q| ConsensusCalculator.for_sets(sets, q))
            .filter(|c| c.has_data())
            .take(params.consensus_window)
            .map(|c| c.confidence)
            .collect();

        Ok(SurveyInsights {
            total_responses: sets.iter().map(ResponseSet::respondent_count).sum(),
            consensus_strength: mean_percent(&confidences),
            questions_analyzed: confidences.len(),
            diversity_index: self.matrix.diversity_index(sets, catalog),
            most_consistent: self.most_consistent(sets, catalog),
            most_divergent: baseline_index.and_then(|i| self.most_divergent(sets, i, catalog)),
            baseline: baseline_index.map(|i| sets[i].source().clone()),
        })
    }

    fn most_consistent(&self, sets: &[ResponseSet], catalog: &QuestionCatalog) -> Option<SourceScore> {
        let mut best: Option<SourceScore> = None;
        for set in sets {
            let present = set.question_numbers();
            let questions: Vec<u32> = catalog.numbers().filter(|q| present.contains(q)).collect();
            let score = self.matrix.consistency(set, &questions);
            if best.as_ref().is_none_or(|b| score > b.score) {
                best = Some(SourceScore {
                    source: set.source().clone(),
                    score,
                });
            }
        }
        best
    }

    fn most_divergent(
        &self,
        sets: &[ResponseSet],
        baseline: usize,
        catalog: &QuestionCatalog,
    ) -> Option<SourceScore> {
        let reference = &sets[baseline];
        let mut worst: Option<SourceScore> = None;
        for (i, set) in sets.iter().enumerate() {
            if i == baseline {
                continue;
            }
            let questions = shared_questions(catalog, reference, set);
            let score = self.matrix.overall_similarity(reference, set, &questions);
            if worst.as_ref().is_none_or(|w| score < w.score) {
                worst = Some(SourceScore {
                    source: set.source().clone(),
                    score,
                });
            }
        }
        worst
    }
}
