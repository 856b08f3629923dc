//! Application-level configuration.
//!
//! - [`AnalysisParams`]: matching policy and insight tuning for every report
//! - [`CampaignParams`]: rerun campaign sizing and concurrency

pub mod analysis_params;
pub mod campaign_params;

pub use analysis_params::AnalysisParams;
pub use campaign_params::CampaignParams;
