//! Analyze Survey use case
//!
//! Produces every report over already-materialized response sets: combined
//! or per-source consensus, pairwise agreement, internal consistency and the
//! survey-level insights. All computation is synchronous.

use crate::config::AnalysisParams;
use crate::ports::analysis_logger::{AnalysisEvent, AnalysisLogger, NoAnalysisLogger};
use consensus_domain::{
    AnalysisEngine, ConsensusResult, DomainError, PairwiseAgreement, QuestionCatalog,
    QuestionType, ReportMode, ResponseSet, Source, SourceScore, SurveyInsights,
};
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors that can occur while analyzing a survey
#[derive(Error, Debug)]
pub enum AnalyzeError {
    #[error("No response sets to analyze")]
    NoResponseSets,

    #[error("Comparison needs exactly two response sets, got {0}")]
    PairRequired(usize),

    #[error(transparent)]
    Domain(#[from] DomainError),
}

/// Input for the AnalyzeSurvey use case
#[derive(Debug, Clone)]
pub struct AnalyzeSurveyInput {
    pub catalog: QuestionCatalog,
    pub sets: Vec<ResponseSet>,
}

impl AnalyzeSurveyInput {
    pub fn new(catalog: QuestionCatalog, sets: Vec<ResponseSet>) -> Self {
        Self { catalog, sets }
    }
}

/// Consensus of one source for one question
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceConsensus {
    pub source: Source,
    pub consensus: ConsensusResult,
}

/// Consensus view of one question
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuestionConsensus {
    pub question_number: u32,
    pub text: String,
    pub question_type: QuestionType,
    /// All sets combined; set in aggregate mode
    #[serde(skip_serializing_if = "Option::is_none")]
    pub combined: Option<ConsensusResult>,
    /// One entry per set in input order; filled in compare mode
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub per_source: Vec<SourceConsensus>,
}

/// Full survey report
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SurveyReport {
    pub mode: ReportMode,
    pub questions: Vec<QuestionConsensus>,
    /// Every non-baseline set against the baseline; empty in aggregate mode
    pub comparisons: Vec<PairwiseAgreement>,
    pub consistency: Vec<SourceScore>,
    pub insights: SurveyInsights,
}

/// Use case for survey analysis
pub struct AnalyzeSurveyUseCase {
    params: AnalysisParams,
    engine: AnalysisEngine,
    logger: Arc<dyn AnalysisLogger>,
}

impl AnalyzeSurveyUseCase {
    pub fn new(params: AnalysisParams) -> Self {
        let engine = params.engine();
        Self {
            params,
            engine,
            logger: Arc::new(NoAnalysisLogger),
        }
    }

    pub fn with_logger(mut self, logger: Arc<dyn AnalysisLogger>) -> Self {
        self.logger = logger;
        self
    }

    pub fn params(&self) -> &AnalysisParams {
        &self.params
    }

    pub fn engine(&self) -> &AnalysisEngine {
        &self.engine
    }

    /// Consensus per question in `mode`
    pub fn consensus(&self, input: &AnalyzeSurveyInput, mode: ReportMode) -> Vec<QuestionConsensus> {
        warn_uncatalogued(input);
        let questions: Vec<QuestionConsensus> = input
            .catalog
            .questions()
            .iter()
            .map(|q| {
                let (combined, per_source) = match mode {
                    ReportMode::Aggregate => (
                        Some(self.engine.consensus(&input.sets, q.question_number)),
                        Vec::new(),
                    ),
                    ReportMode::Compare => (
                        None,
                        input
                            .sets
                            .iter()
                            .map(|set| SourceConsensus {
                                source: set.source().clone(),
                                consensus: self
                                    .engine
                                    .consensus(std::slice::from_ref(set), q.question_number),
                            })
                            .collect(),
                    ),
                };
                QuestionConsensus {
                    question_number: q.question_number,
                    text: q.text.clone(),
                    question_type: q.question_type,
                    combined,
                    per_source,
                }
            })
            .collect();

        self.logger.log(AnalysisEvent::new(
            "consensus",
            serde_json::json!({
                "mode": mode,
                "sets": input.sets.len(),
                "questions": questions.len(),
            }),
        ));
        questions
    }

    /// Agreement between exactly two sets
    pub fn compare(&self, input: &AnalyzeSurveyInput) -> Result<PairwiseAgreement, AnalyzeError> {
        let [a, b] = input.sets.as_slice() else {
            return Err(AnalyzeError::PairRequired(input.sets.len()));
        };
        Ok(self.compare_pair(a, b, &input.catalog))
    }

    fn compare_pair(&self, a: &ResponseSet, b: &ResponseSet, catalog: &QuestionCatalog) -> PairwiseAgreement {
        let report = self.engine.pairwise_agreement(a, b, catalog);
        if report.degraded {
            warn!(
                "Comparing {} ({} respondents) with {} ({} respondents): sets are misaligned, {} respondent pairs and {} shared questions used",
                a.source(),
                a.respondent_count(),
                b.source(),
                b.respondent_count(),
                report.aligned_respondents,
                report.per_question.len()
            );
        }
        debug!(
            "Agreement {} vs {}: {}% ({})",
            a.source(),
            b.source(),
            report.overall,
            self.engine.comparator().name()
        );
        self.logger.log(AnalysisEvent::new(
            "pairwise_agreement",
            serde_json::json!({
                "source_a": a.source(),
                "source_b": b.source(),
                "overall": report.overall,
                "aligned_respondents": report.aligned_respondents,
                "degraded": report.degraded,
            }),
        ));
        report
    }

    /// Internal consistency of every set, in input order
    pub fn consistency(&self, input: &AnalyzeSurveyInput) -> Vec<SourceScore> {
        input
            .sets
            .iter()
            .map(|set| SourceScore {
                source: set.source().clone(),
                score: self.engine.internal_consistency(set, &input.catalog),
            })
            .collect()
    }

    pub fn insights(&self, input: &AnalyzeSurveyInput) -> Result<SurveyInsights, AnalyzeError> {
        let insights = self
            .engine
            .survey_insights(&input.sets, &input.catalog, &self.params.insights)?;
        self.logger.log(AnalysisEvent::new(
            "survey_insights",
            serde_json::to_value(&insights).unwrap_or_default(),
        ));
        Ok(insights)
    }

    /// Everything at once, in the configured report mode
    pub fn execute(&self, input: &AnalyzeSurveyInput) -> Result<SurveyReport, AnalyzeError> {
        self.execute_with_mode(input, self.params.mode)
    }

    pub fn execute_with_mode(
        &self,
        input: &AnalyzeSurveyInput,
        mode: ReportMode,
    ) -> Result<SurveyReport, AnalyzeError> {
        if input.sets.is_empty() {
            return Err(AnalyzeError::NoResponseSets);
        }
        info!(
            "Analyzing {} response sets over {} questions ({} mode, {} comparator)",
            input.sets.len(),
            input.catalog.len(),
            mode,
            self.engine.comparator().name()
        );

        let insights = self.insights(input)?;
        let comparisons = match (mode, &insights.baseline) {
            (ReportMode::Compare, Some(baseline)) => {
                let reference = input
                    .sets
                    .iter()
                    .find(|s| s.source() == baseline)
                    .ok_or_else(|| DomainError::UnknownSource(baseline.to_string()))?;
                input
                    .sets
                    .iter()
                    .filter(|s| !std::ptr::eq(*s, reference))
                    .map(|s| self.compare_pair(reference, s, &input.catalog))
                    .collect()
            }
            _ => Vec::new(),
        };

        Ok(SurveyReport {
            mode,
            questions: self.consensus(input, mode),
            comparisons,
            consistency: self.consistency(input),
            insights,
        })
    }
}

/// Answers to questions outside the catalog are ignored; say so once
fn warn_uncatalogued(input: &AnalyzeSurveyInput) {
    for set in &input.sets {
        let unknown: Vec<u32> = set
            .question_numbers()
            .into_iter()
            .filter(|q| input.catalog.get(*q).is_none())
            .collect();
        if !unknown.is_empty() {
            warn!(
                "{} answers questions not in the catalog, ignored: {:?}",
                set.source(),
                unknown
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use consensus_domain::{
        AnswerEntry, ComparatorKind, InsightsParams, Question, RawAnswer, RespondentRecord,
    };
    use std::sync::Mutex;

    // ==================== Test Mocks ====================

    #[derive(Default)]
    struct RecordingLogger {
        events: Mutex<Vec<&'static str>>,
    }

    impl AnalysisLogger for RecordingLogger {
        fn log(&self, event: AnalysisEvent) {
            self.events.lock().unwrap().push(event.event_type);
        }
    }

    // ==================== Helpers ====================

    fn catalog() -> QuestionCatalog {
        QuestionCatalog::new(vec![
            Question::new(1, "Do you own a car?", QuestionType::SingleSelect),
            Question::new(2, "How often do you drive?", QuestionType::RatingScale),
        ])
        .unwrap()
    }

    fn set(source: &str, rows: &[[&str; 2]]) -> ResponseSet {
        ResponseSet::new(
            Source::model(source),
            rows.iter()
                .enumerate()
                .map(|(i, row)| {
                    RespondentRecord::new(
                        i,
                        vec![
                            AnswerEntry::new(1, RawAnswer::text(row[0])),
                            AnswerEntry::new(2, RawAnswer::text(row[1])),
                        ],
                    )
                })
                .collect(),
        )
    }

    fn input() -> AnalyzeSurveyInput {
        AnalyzeSurveyInput::new(
            catalog(),
            vec![
                set("gpt", &[["Yes", "5"], ["No", "1"]]),
                set("claude", &[["yes", "5"], ["yes", "2"]]),
                set("gemini", &[["No", "3"], ["No", "4"]]),
            ],
        )
    }

    // ==================== Tests ====================

    #[test]
    fn test_aggregate_mode_combines_sets() {
        let uc = AnalyzeSurveyUseCase::new(AnalysisParams::default());
        let questions = uc.consensus(&input(), ReportMode::Aggregate);
        assert_eq!(questions.len(), 2);
        let combined = questions[0].combined.as_ref().unwrap();
        assert_eq!(combined.total, 6);
        assert_eq!(combined.dominant_answer, "Yes");
        assert_eq!(combined.confidence, 50);
        assert!(questions[0].per_source.is_empty());
    }

    #[test]
    fn test_compare_mode_reports_per_source() {
        let uc = AnalyzeSurveyUseCase::new(AnalysisParams::default());
        let questions = uc.consensus(&input(), ReportMode::Compare);
        assert!(questions[0].combined.is_none());
        let per_source = &questions[0].per_source;
        assert_eq!(per_source.len(), 3);
        assert_eq!(per_source[1].source, Source::model("claude"));
        assert_eq!(per_source[1].consensus.confidence, 100);
        assert_eq!(per_source[0].consensus.confidence, 50);
    }

    #[test]
    fn test_mode_does_not_change_metrics() {
        let uc = AnalyzeSurveyUseCase::new(AnalysisParams::default());
        let compare = uc.execute_with_mode(&input(), ReportMode::Compare).unwrap();
        let aggregate = uc.execute_with_mode(&input(), ReportMode::Aggregate).unwrap();
        assert_eq!(compare.insights, aggregate.insights);
        assert_eq!(compare.consistency, aggregate.consistency);
        assert_eq!(compare.comparisons.len(), 2);
        assert!(aggregate.comparisons.is_empty());
    }

    #[test]
    fn test_compare_requires_pair() {
        let uc = AnalyzeSurveyUseCase::new(AnalysisParams::default());
        assert!(matches!(uc.compare(&input()), Err(AnalyzeError::PairRequired(3))));

        let pair = AnalyzeSurveyInput::new(
            catalog(),
            vec![set("a", &[["Yes", "5"]]), set("b", &[["yes please", "5"]])],
        );
        let report = uc.compare(&pair).unwrap();
        assert_eq!(report.overall, 100);
        assert!(!report.degraded);
    }

    #[test]
    fn test_strict_params_flow_through() {
        let params = AnalysisParams::default().with_comparator(ComparatorKind::Strict);
        let uc = AnalyzeSurveyUseCase::new(params);
        let pair = AnalyzeSurveyInput::new(
            catalog(),
            vec![set("a", &[["Yes", "5"]]), set("b", &[["yes please", "5"]])],
        );
        assert_eq!(uc.compare(&pair).unwrap().overall, 50);
    }

    #[test]
    fn test_baseline_selects_comparisons() {
        let params = AnalysisParams::default()
            .with_insights(InsightsParams::default().with_baseline(Source::model("gemini")));
        let uc = AnalyzeSurveyUseCase::new(params);
        let report = uc.execute(&input()).unwrap();
        assert!(report.comparisons.iter().all(|c| c.source_a == Source::model("gemini")));
        assert_eq!(report.insights.baseline, Some(Source::model("gemini")));
    }

    #[test]
    fn test_unknown_baseline_is_error() {
        let params = AnalysisParams::default()
            .with_insights(InsightsParams::default().with_baseline(Source::model("llama")));
        let uc = AnalyzeSurveyUseCase::new(params);
        assert!(matches!(
            uc.execute(&input()),
            Err(AnalyzeError::Domain(DomainError::UnknownSource(_)))
        ));
    }

    #[test]
    fn test_empty_input_rejected() {
        let uc = AnalyzeSurveyUseCase::new(AnalysisParams::default());
        let empty = AnalyzeSurveyInput::new(catalog(), Vec::new());
        assert!(matches!(uc.execute(&empty), Err(AnalyzeError::NoResponseSets)));
    }

    #[test]
    fn test_events_are_logged() {
        let logger = Arc::new(RecordingLogger::default());
        let uc = AnalyzeSurveyUseCase::new(AnalysisParams::default()).with_logger(logger.clone());
        uc.execute(&input()).unwrap();
        let events = logger.events.lock().unwrap();
        assert!(events.contains(&"survey_insights"));
        assert!(events.contains(&"pairwise_agreement"));
        assert!(events.contains(&"consensus"));
    }
}
