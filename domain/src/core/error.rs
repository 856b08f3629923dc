//! Domain error types
//!
//! Only programmer errors live here. Data-quality problems (empty answers,
//! misaligned sets, failed generations) are reported as values by the
//! analysis modules and never surface as errors.

use crate::campaign::CampaignStatus;
use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Duplicate question number {0} in catalog")]
    DuplicateQuestion(u32),

    #[error("Unknown question number {0}")]
    UnknownQuestion(u32),

    #[error("Unknown response source: {0}")]
    UnknownSource(String),

    #[error("Invalid source identifier: {0}")]
    InvalidSource(String),

    #[error("Invalid campaign transition: {from} -> {to}")]
    InvalidTransition {
        from: CampaignStatus,
        to: CampaignStatus,
    },
}

impl DomainError {
    /// Check if this error was raised by the campaign state machine
    pub fn is_transition_error(&self) -> bool {
        matches!(self, DomainError::InvalidTransition { .. })
    }
}
