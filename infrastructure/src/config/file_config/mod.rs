//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! Enum-like settings stay strings here and are parsed by `parse_*` methods,
//! which fall back to defaults and report a [`ConfigIssue`] instead of
//! failing deserialization.

mod analysis;
mod campaign;
mod logging;
mod output;

pub use analysis::FileAnalysisConfig;
pub use campaign::FileCampaignConfig;
pub use logging::FileLoggingConfig;
pub use output::{FileOutputConfig, FileOutputFormat};

use consensus_domain::ConfigIssue;
use serde::{Deserialize, Serialize};

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Matching policy and insight tuning
    pub analysis: FileAnalysisConfig,
    /// Rerun campaign sizing
    pub campaign: FileCampaignConfig,
    /// Output settings
    pub output: FileOutputConfig,
    /// Structured analysis log
    pub logging: FileLoggingConfig,
}

/// Raised by [`FileConfig::ensure_valid`] when any issue is an error
#[derive(Debug, thiserror::Error)]
#[error("invalid configuration ({count} error(s)): {first}")]
pub struct ConfigValidationError {
    pub count: usize,
    pub first: String,
    pub issues: Vec<ConfigIssue>,
}

impl FileConfig {
    /// Validate the entire configuration, returning all detected issues.
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();
        issues.extend(self.analysis.to_analysis_params().1);
        issues.extend(self.campaign.to_campaign_params().1);
        issues
    }

    /// Fail on error-severity issues; warnings are returned for display.
    pub fn ensure_valid(&self) -> Result<Vec<ConfigIssue>, ConfigValidationError> {
        let (errors, warnings): (Vec<_>, Vec<_>) =
            self.validate().into_iter().partition(ConfigIssue::is_error);
        match errors.first() {
            None => Ok(warnings),
            Some(first) => Err(ConfigValidationError {
                count: errors.len(),
                first: first.message.clone(),
                issues: errors,
            }),
        }
    }
}
