//! Rerun campaign entities and lock-free progress
//!
//! Progress is append-only: `personas_completed` only grows, and a poller
//! treats `personas_completed == persona_count` as the completion signal.
//! Reads never block the generating side.

use super::status::CampaignStatus;
use crate::core::error::DomainError;
use crate::response::ResponseSet;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU8, AtomicUsize, Ordering};
use uuid::Uuid;

/// Identifier of one rerun campaign
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RunId(Uuid);

impl RunId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RunId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A synthetic respondent description shared by every rerun
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Persona {
    pub index: usize,
    #[serde(default)]
    pub archetype: Option<String>,
    #[serde(default)]
    pub description: String,
}

impl Persona {
    pub fn new(index: usize, description: impl Into<String>) -> Self {
        Self {
            index,
            archetype: None,
            description: description.into(),
        }
    }

    pub fn with_archetype(mut self, archetype: impl Into<String>) -> Self {
        self.archetype = Some(archetype.into());
        self
    }
}

/// Point-in-time view of a campaign, as returned to pollers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CampaignSnapshot {
    pub run_id: RunId,
    pub status: CampaignStatus,
    pub persona_count: usize,
    pub personas_completed: usize,
}

impl CampaignSnapshot {
    pub fn is_done(&self) -> bool {
        self.personas_completed == self.persona_count
    }
}

/// Shared, monotonic progress counter of one campaign
#[derive(Debug)]
pub struct CampaignProgress {
    run_id: RunId,
    persona_count: usize,
    completed: AtomicUsize,
    status: AtomicU8,
}

impl CampaignProgress {
    pub fn new(run_id: RunId, persona_count: usize) -> Self {
        Self {
            run_id,
            persona_count,
            completed: AtomicUsize::new(0),
            status: AtomicU8::new(CampaignStatus::Pending.to_u8()),
        }
    }

    pub fn run_id(&self) -> RunId {
        self.run_id
    }

    pub fn persona_count(&self) -> usize {
        self.persona_count
    }

    pub fn personas_completed(&self) -> usize {
        self.completed.load(Ordering::Acquire)
    }

    pub fn status(&self) -> CampaignStatus {
        CampaignStatus::from_u8(self.status.load(Ordering::Acquire))
    }

    /// Atomically move to `next` if the transition is legal
    pub fn transition(&self, next: CampaignStatus) -> Result<CampaignStatus, DomainError> {
        let mut current = self.status();
        loop {
            current.transition(next)?;
            match self.status.compare_exchange(
                current.to_u8(),
                next.to_u8(),
                Ordering::AcqRel,
                Ordering::Acquire,
            ) {
                Ok(_) => return Ok(next),
                Err(actual) => current = CampaignStatus::from_u8(actual),
            }
        }
    }

    /// Count one processed persona (succeeded or failed); saturates at the total
    pub fn record_persona(&self) -> usize {
        let mut current = self.completed.load(Ordering::Acquire);
        loop {
            if current >= self.persona_count {
                return current;
            }
            match self.completed.compare_exchange(
                current,
                current + 1,
                Ordering::AcqRel,
                Ordering::Acquire,
            ) {
                Ok(_) => return current + 1,
                Err(actual) => current = actual,
            }
        }
    }

    pub fn snapshot(&self) -> CampaignSnapshot {
        CampaignSnapshot {
            run_id: self.run_id,
            status: self.status(),
            persona_count: self.persona_count,
            personas_completed: self.personas_completed(),
        }
    }
}

/// Rerun response sets produced by a finished campaign
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CampaignResult {
    pub run_id: RunId,
    pub status: CampaignStatus,
    pub rerun_count: usize,
    /// One set per rerun, respondents ordered by persona index
    pub reruns: Vec<ResponseSet>,
    /// Personas dropped because a generation call failed
    pub excluded_personas: Vec<usize>,
}

impl CampaignResult {
    /// A terminal failure with zero results
    pub fn failed(run_id: RunId, rerun_count: usize, excluded_personas: Vec<usize>) -> Self {
        Self {
            run_id,
            status: CampaignStatus::Failed,
            rerun_count,
            reruns: Vec::new(),
            excluded_personas,
        }
    }

    pub fn is_failed(&self) -> bool {
        self.status == CampaignStatus::Failed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_is_monotonic_and_saturates() {
        let progress = CampaignProgress::new(RunId::new(), 2);
        assert_eq!(progress.record_persona(), 1);
        assert_eq!(progress.record_persona(), 2);
        assert_eq!(progress.record_persona(), 2);
        assert!(progress.snapshot().is_done());
    }

    #[test]
    fn test_progress_transitions() {
        let progress = CampaignProgress::new(RunId::new(), 1);
        assert_eq!(progress.status(), CampaignStatus::Pending);
        assert!(progress.transition(CampaignStatus::Completed).is_err());
        progress.transition(CampaignStatus::Running).unwrap();
        progress.transition(CampaignStatus::Failed).unwrap();
        assert_eq!(progress.snapshot().status, CampaignStatus::Failed);
        assert!(progress.transition(CampaignStatus::Running).is_err());
    }

    #[test]
    fn test_zero_personas_snapshot_is_done() {
        let progress = CampaignProgress::new(RunId::new(), 0);
        assert!(progress.snapshot().is_done());
        assert_eq!(progress.record_persona(), 0);
    }

    #[test]
    fn test_concurrent_recording() {
        let progress = std::sync::Arc::new(CampaignProgress::new(RunId::new(), 64));
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let p = std::sync::Arc::clone(&progress);
                std::thread::spawn(move || {
                    for _ in 0..10 {
                        p.record_persona();
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        assert_eq!(progress.personas_completed(), 64);
    }

    #[test]
    fn test_failed_result_is_empty() {
        let result = CampaignResult::failed(RunId::new(), 3, vec![0, 1]);
        assert!(result.is_failed());
        assert!(result.reruns.is_empty());
    }
}
