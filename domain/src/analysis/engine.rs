//! Analysis facade
//!
//! [`AnalysisEngine`] owns one comparator and one alignment strategy and
//! exposes every metric through them, so a run applies a single matching
//! policy throughout. All methods are pure reads over immutable sets.

use super::agreement::{AgreementMatrix, PairwiseAgreement};
use super::consensus::{ConsensusCalculator, ConsensusResult};
use super::insights::{InsightsParams, InsightsSummarizer, SurveyInsights};
use super::stability::{StabilityEvaluator, StabilityReport};
use crate::answer::{AnswerComparator, ComparatorKind, ContainmentComparator, MultiSelectPolicy};
use crate::campaign::CampaignResult;
use crate::core::error::DomainError;
use crate::core::question::QuestionCatalog;
use crate::response::{AlignmentKind, AlignmentStrategy, PositionalAlignment, ResponseSet};

pub struct AnalysisEngine {
    comparator: Box<dyn AnswerComparator>,
    alignment: Box<dyn AlignmentStrategy>,
}

impl Default for AnalysisEngine {
    fn default() -> Self {
        Self::new(
            Box::new(ContainmentComparator::default()),
            Box::new(PositionalAlignment),
        )
    }
}

impl AnalysisEngine {
    pub fn new(comparator: Box<dyn AnswerComparator>, alignment: Box<dyn AlignmentStrategy>) -> Self {
        Self {
            comparator,
            alignment,
        }
    }

    pub fn from_kinds(
        comparator: ComparatorKind,
        multi_select: MultiSelectPolicy,
        alignment: AlignmentKind,
    ) -> Self {
        Self::new(comparator.build(multi_select), alignment.build())
    }

    pub fn comparator(&self) -> &dyn AnswerComparator {
        self.comparator.as_ref()
    }

    pub fn alignment(&self) -> &dyn AlignmentStrategy {
        self.alignment.as_ref()
    }

    pub fn matrix(&self) -> AgreementMatrix<'_> {
        AgreementMatrix::new(self.comparator.as_ref(), self.alignment.as_ref())
    }

    /// Combined consensus for one question across `sets`
    pub fn consensus(&self, sets: &[ResponseSet], question_number: u32) -> ConsensusResult {
        ConsensusCalculator.for_sets(sets, question_number)
    }

    pub fn pairwise_agreement(
        &self,
        a: &ResponseSet,
        b: &ResponseSet,
        catalog: &QuestionCatalog,
    ) -> PairwiseAgreement {
        self.matrix().pairwise_agreement(a, b, catalog)
    }

    /// Consistency of one set over the catalog questions it answers
    pub fn internal_consistency(&self, set: &ResponseSet, catalog: &QuestionCatalog) -> u8 {
        let present = set.question_numbers();
        let questions: Vec<u32> = catalog.numbers().filter(|q| present.contains(q)).collect();
        self.matrix().consistency(set, &questions)
    }

    pub fn diversity_index(&self, sets: &[ResponseSet], catalog: &QuestionCatalog) -> Option<u8> {
        self.matrix().diversity_index(sets, catalog)
    }

    pub fn stability_report(&self, catalog: &QuestionCatalog, campaign: &CampaignResult) -> StabilityReport {
        StabilityEvaluator::new(self.comparator.as_ref(), self.alignment.as_ref())
            .evaluate_campaign(catalog, campaign)
    }

    /// Stability over rerun sets that did not come from a tracked campaign
    pub fn stability_of(&self, catalog: &QuestionCatalog, reruns: &[ResponseSet]) -> StabilityReport {
        StabilityEvaluator::new(self.comparator.as_ref(), self.alignment.as_ref()).evaluate(catalog, reruns)
    }

    pub fn survey_insights(
        &self,
        sets: &[ResponseSet],
        catalog: &QuestionCatalog,
        params: &InsightsParams,
    ) -> Result<SurveyInsights, DomainError> {
        InsightsSummarizer::new(self.matrix()).summarize(sets, catalog, params)
    }
}

impl std::fmt::Debug for AnalysisEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnalysisEngine")
            .field("comparator", &self.comparator.name())
            .field("alignment", &self.alignment.name())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::answer::RawAnswer;
    use crate::campaign::{CampaignStatus, RunId};
    use crate::core::question::{Question, QuestionType};
    use crate::core::source::Source;
    use crate::response::{AnswerEntry, RespondentRecord};

    fn catalog() -> QuestionCatalog {
        QuestionCatalog::new(vec![
            Question::new(1, "Do you drink coffee?", QuestionType::SingleSelect),
            Question::new(2, "Why?", QuestionType::FreeText),
        ])
        .unwrap()
    }

    fn set(source: Source, q1: &[&str]) -> ResponseSet {
        ResponseSet::new(
            source,
            q1.iter()
                .enumerate()
                .map(|(i, a)| {
                    RespondentRecord::new(
                        i,
                        vec![
                            AnswerEntry::new(1, RawAnswer::text(*a)),
                            AnswerEntry::new(2, RawAnswer::text(format!("reason {}", i))),
                        ],
                    )
                })
                .collect(),
        )
    }

    #[test]
    fn test_default_engine_is_lenient() {
        let engine = AnalysisEngine::default();
        let a = set(Source::model("a"), &["Yes", "No"]);
        let b = set(Source::model("b"), &["yes please", "no thanks"]);
        let report = engine.pairwise_agreement(&a, &b, &catalog());
        assert_eq!(report.per_question[0].agreement, 100);
        assert_eq!(format!("{:?}", engine), "AnalysisEngine { comparator: \"containment\", alignment: \"positional\" }");
    }

    #[test]
    fn test_strict_engine_applies_everywhere() {
        let engine = AnalysisEngine::from_kinds(
            ComparatorKind::Strict,
            MultiSelectPolicy::Exact,
            AlignmentKind::Positional,
        );
        let a = set(Source::model("a"), &["Yes", "No"]);
        let b = set(Source::model("b"), &["yes please", "no thanks"]);
        let report = engine.pairwise_agreement(&a, &b, &catalog());
        assert_eq!(report.per_question[0].agreement, 0);
        assert_eq!(engine.diversity_index(&[a, b], &catalog()), Some(100));
    }

    #[test]
    fn test_consensus_across_sets() {
        let engine = AnalysisEngine::default();
        let sets = vec![
            set(Source::model("a"), &["Yes", "yes"]),
            set(Source::model("b"), &["no", " YES "]),
        ];
        let result = engine.consensus(&sets, 1);
        assert_eq!(result.dominant_answer, "Yes");
        assert_eq!(result.confidence, 75);
        assert_eq!(result.total, 4);
    }

    #[test]
    fn test_stability_report_from_campaign() {
        let engine = AnalysisEngine::default();
        let campaign = CampaignResult {
            run_id: RunId::new(),
            status: CampaignStatus::Completed,
            rerun_count: 2,
            reruns: vec![
                set(Source::rerun(1), &["yes", "no"]),
                set(Source::rerun(2), &["yes", "yes"]),
            ],
            excluded_personas: Vec::new(),
        };
        let report = engine.stability_report(&catalog(), &campaign);
        assert_eq!(report.overall, Some(50));
        assert!(report.question(2).unwrap().is_not_applicable());
        assert_eq!(report.flagged_count, 1);
        assert_eq!(report.flagged[0].respondent_index, 1);
    }

    #[test]
    fn test_internal_consistency_uses_present_questions() {
        let engine = AnalysisEngine::default();
        let s = set(Source::model("a"), &["yes", "yes"]);
        // q1 agrees, q2 "reason 0" vs "reason 1" does not
        assert_eq!(engine.internal_consistency(&s, &catalog()), 50);
    }
}
