//! Metrics over response sets
//!
//! ```text
//! ResponseSet ─┬─▶ ConsensusCalculator ─┐
//!              ├─▶ AgreementMatrix ─────┼─▶ InsightsSummarizer
//!              └─▶ StabilityEvaluator   │
//!                                       └── AnalysisEngine (facade)
//! ```

pub mod agreement;
pub mod consensus;
pub mod engine;
pub mod insights;
pub mod mode;
pub mod percent;
pub mod stability;

pub use agreement::{
    AgreementMatrix, AgreementScore, PairwiseAgreement, QuestionComparison, shared_questions,
};
pub use consensus::{ConsensusCalculator, ConsensusResult, DistributionEntry, NO_DATA};
pub use engine::AnalysisEngine;
pub use insights::{
    DEFAULT_CONSENSUS_WINDOW, InsightsParams, InsightsSummarizer, SourceScore, SurveyInsights,
};
pub use mode::ReportMode;
pub use stability::{
    FlaggedPair, NOT_APPLICABLE_LABEL, QuestionStability, StabilityEvaluator, StabilityReport,
    StabilityStatus,
};
