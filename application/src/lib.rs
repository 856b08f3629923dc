//! Application layer for panel-consensus
//!
//! This crate contains use cases, port definitions, and application configuration.
//! It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::{AnalysisParams, CampaignParams};
pub use ports::{
    analysis_logger::{AnalysisEvent, AnalysisLogger, NoAnalysisLogger},
    progress::{CampaignProgressNotifier, NoProgress},
    response_generator::{GenerationError, ResponseGenerator},
};
pub use use_cases::analyze_survey::{
    AnalyzeError, AnalyzeSurveyInput, AnalyzeSurveyUseCase, QuestionConsensus, SourceConsensus,
    SurveyReport,
};
pub use use_cases::campaign_tracker::{CampaignTicket, CampaignTracker};
pub use use_cases::run_stability_campaign::{
    CampaignError, RunStabilityCampaignInput, RunStabilityCampaignOutput,
    RunStabilityCampaignUseCase,
};
