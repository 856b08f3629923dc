//! Campaign parameters: rerun count and generation concurrency.

use serde::{Deserialize, Serialize};

/// Rerun campaign control parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CampaignParams {
    /// How many times every persona is regenerated
    pub rerun_count: usize,
    /// Maximum generation calls in flight at once
    pub max_concurrency: usize,
}

impl Default for CampaignParams {
    fn default() -> Self {
        Self {
            rerun_count: 3,
            max_concurrency: 4,
        }
    }
}

impl CampaignParams {
    // ==================== Builder Methods ====================

    pub fn with_rerun_count(mut self, count: usize) -> Self {
        self.rerun_count = count;
        self
    }

    pub fn with_max_concurrency(mut self, max: usize) -> Self {
        self.max_concurrency = max;
        self
    }
}
