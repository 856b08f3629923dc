//! Rerun campaign lifecycle
//!
//! ```text
//! Pending ──▶ Running ──▶ Completed
//!                   └───▶ Failed
//! ```

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};

/// Lifecycle state of a rerun campaign
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CampaignStatus {
    #[default]
    Pending,
    Running,
    /// At least one persona produced usable reruns
    Completed,
    /// No persona completed; carries zero results
    Failed,
}

impl CampaignStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CampaignStatus::Pending => "pending",
            CampaignStatus::Running => "running",
            CampaignStatus::Completed => "completed",
            CampaignStatus::Failed => "failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, CampaignStatus::Completed | CampaignStatus::Failed)
    }

    pub fn can_transition_to(&self, next: CampaignStatus) -> bool {
        matches!(
            (self, next),
            (CampaignStatus::Pending, CampaignStatus::Running)
                | (CampaignStatus::Running, CampaignStatus::Completed)
                | (CampaignStatus::Running, CampaignStatus::Failed)
        )
    }

    /// Move to `next`, rejecting illegal transitions
    pub fn transition(self, next: CampaignStatus) -> Result<CampaignStatus, DomainError> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(DomainError::InvalidTransition {
                from: self,
                to: next,
            })
        }
    }

    pub(crate) fn to_u8(self) -> u8 {
        match self {
            CampaignStatus::Pending => 0,
            CampaignStatus::Running => 1,
            CampaignStatus::Completed => 2,
            CampaignStatus::Failed => 3,
        }
    }

    pub(crate) fn from_u8(value: u8) -> CampaignStatus {
        match value {
            1 => CampaignStatus::Running,
            2 => CampaignStatus::Completed,
            3 => CampaignStatus::Failed,
            _ => CampaignStatus::Pending,
        }
    }
}

impl std::fmt::Display for CampaignStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
