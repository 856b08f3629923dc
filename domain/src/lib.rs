//! Domain layer for panel-consensus
//!
//! This crate contains the core analysis logic, entities, and value objects.
//! It has no dependencies on infrastructure or presentation concerns, and
//! every metric is a pure function over immutable response sets.
//!
//! # Core Concepts
//!
//! ## Response sets
//!
//! A [`ResponseSet`] holds every synthetic respondent's answers as produced
//! by one [`Source`]: a named model, or one rerun of a persona-preserving
//! campaign. Sets are compared question by question, with respondents paired
//! up by an [`AlignmentStrategy`].
//!
//! ## Metrics
//!
//! - **Consensus**: dominant answer and confidence per question
//! - **Agreement**: how often two sets give the same answer
//! - **Stability**: how often reruns of the same persona give the same answer
//! - **Insights**: survey-level roll-up of the above
//!
//! "Same answer" is always decided by one [`AnswerComparator`], chosen once
//! per run through [`AnalysisEngine`].

pub mod analysis;
pub mod answer;
pub mod campaign;
pub mod config;
pub mod core;
pub mod response;

// Re-export commonly used types
pub use analysis::{
    AgreementMatrix, AgreementScore, AnalysisEngine, ConsensusCalculator, ConsensusResult,
    DistributionEntry, FlaggedPair, InsightsParams, InsightsSummarizer, NO_DATA,
    NOT_APPLICABLE_LABEL, PairwiseAgreement, QuestionComparison, QuestionStability, ReportMode,
    SourceScore, StabilityEvaluator, StabilityReport, StabilityStatus, SurveyInsights,
};
pub use answer::{
    AnswerComparator, ComparatorKind, ContainmentComparator, MultiSelectPolicy, NormalizedAnswer,
    RawAnswer, StrictComparator, normalize,
};
pub use campaign::{CampaignProgress, CampaignResult, CampaignSnapshot, CampaignStatus, Persona, RunId};
pub use config::{ConfigIssue, ConfigIssueCode, OutputFormat, Severity};
pub use core::{
    error::DomainError,
    question::{Question, QuestionCatalog, QuestionType},
    source::Source,
};
pub use response::{
    AlignmentKind, AlignmentStrategy, AnswerEntry, PositionalAlignment, RespondentIndexAlignment,
    RespondentRecord, ResponseSet,
};
