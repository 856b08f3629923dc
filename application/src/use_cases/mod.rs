//! Use cases (application services)

pub mod analyze_survey;
pub mod campaign_tracker;
pub mod run_stability_campaign;
