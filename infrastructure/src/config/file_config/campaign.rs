//! Campaign configuration from TOML (`[campaign]` section)

use consensus_application::CampaignParams;
use consensus_domain::{ConfigIssue, ConfigIssueCode};
use serde::{Deserialize, Serialize};

/// Raw campaign configuration from TOML
///
/// ```toml
/// [campaign]
/// rerun_count = 3
/// max_concurrency = 4
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileCampaignConfig {
    pub rerun_count: usize,
    pub max_concurrency: usize,
}

impl Default for FileCampaignConfig {
    fn default() -> Self {
        let params = CampaignParams::default();
        Self {
            rerun_count: params.rerun_count,
            max_concurrency: params.max_concurrency,
        }
    }
}

impl FileCampaignConfig {
    pub fn to_campaign_params(&self) -> (CampaignParams, Vec<ConfigIssue>) {
        let mut issues = Vec::new();
        let mut params = CampaignParams::default();

        match self.rerun_count {
            0 => issues.push(ConfigIssue::error(
                ConfigIssueCode::ZeroRerunCount,
                "campaign.rerun_count: must be at least 1",
            )),
            1 => {
                issues.push(ConfigIssue::warning(
                    ConfigIssueCode::SingleRerun,
                    "campaign.rerun_count: 1 rerun leaves nothing to compare, every question reports no data",
                ));
                params = params.with_rerun_count(1);
            }
            n => params = params.with_rerun_count(n),
        }

        if self.max_concurrency == 0 {
            issues.push(ConfigIssue::warning(
                ConfigIssueCode::ZeroConcurrency,
                "campaign.max_concurrency: 0 would never schedule a generation, using 1",
            ));
            params = params.with_max_concurrency(1);
        } else {
            params = params.with_max_concurrency(self.max_concurrency);
        }

        (params, issues)
    }
}
