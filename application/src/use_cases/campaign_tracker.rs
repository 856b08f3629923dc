//! Registry of running rerun campaigns
//!
//! `start` hands out a ticket immediately; the campaign itself runs later and
//! updates its [`CampaignProgress`] in place. `poll` never waits on the
//! generating side: it reads the shared atomics.

use super::run_stability_campaign::CampaignError;
use consensus_domain::{CampaignProgress, CampaignSnapshot, Persona, RunId};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, PoisonError, RwLock};
use tracing::debug;

/// Returned by [`CampaignTracker::start`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CampaignTicket {
    pub run_id: RunId,
    pub persona_count: usize,
    pub rerun_count: usize,
}

#[derive(Debug, Default)]
pub struct CampaignTracker {
    campaigns: RwLock<HashMap<RunId, Arc<CampaignProgress>>>,
}

impl CampaignTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a pending campaign
    pub fn start(&self, personas: &[Persona], rerun_count: usize) -> Result<CampaignTicket, CampaignError> {
        if rerun_count == 0 {
            return Err(CampaignError::InvalidRerunCount);
        }
        let mut seen = HashSet::new();
        if let Some(dup) = personas.iter().find(|p| !seen.insert(p.index)) {
            return Err(CampaignError::DuplicatePersona(dup.index));
        }

        let run_id = RunId::new();
        let progress = Arc::new(CampaignProgress::new(run_id, personas.len()));
        self.campaigns
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(run_id, progress);
        debug!("Registered campaign {} ({} personas)", run_id, personas.len());

        Ok(CampaignTicket {
            run_id,
            persona_count: personas.len(),
            rerun_count,
        })
    }

    /// Shared progress handle of a registered campaign
    pub fn progress(&self, run_id: RunId) -> Option<Arc<CampaignProgress>> {
        self.campaigns
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&run_id)
            .cloned()
    }

    /// Current status and counts; `None` for an unknown run id
    pub fn poll(&self, run_id: RunId) -> Option<CampaignSnapshot> {
        self.progress(run_id).map(|p| p.snapshot())
    }

    /// Drop a campaign from the registry
    pub fn forget(&self, run_id: RunId) -> bool {
        self.campaigns
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&run_id)
            .is_some()
    }

    pub fn len(&self) -> usize {
        self.campaigns
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use consensus_domain::CampaignStatus;

    fn personas(n: usize) -> Vec<Persona> {
        (0..n).map(|i| Persona::new(i, format!("persona {}", i))).collect()
    }

    #[test]
    fn test_start_registers_pending_campaign() {
        let tracker = CampaignTracker::new();
        let ticket = tracker.start(&personas(3), 2).unwrap();
        assert_eq!(ticket.persona_count, 3);
        let snapshot = tracker.poll(ticket.run_id).unwrap();
        assert_eq!(snapshot.status, CampaignStatus::Pending);
        assert_eq!(snapshot.personas_completed, 0);
        assert_eq!(tracker.len(), 1);
    }

    #[test]
    fn test_zero_reruns_rejected() {
        let tracker = CampaignTracker::new();
        assert!(matches!(
            tracker.start(&personas(1), 0),
            Err(CampaignError::InvalidRerunCount)
        ));
        assert!(tracker.is_empty());
    }

    #[test]
    fn test_duplicate_persona_rejected() {
        let tracker = CampaignTracker::new();
        let mut list = personas(2);
        list.push(Persona::new(1, "again"));
        assert!(matches!(
            tracker.start(&list, 1),
            Err(CampaignError::DuplicatePersona(1))
        ));
    }

    #[test]
    fn test_poll_unknown_and_forget() {
        let tracker = CampaignTracker::new();
        assert!(tracker.poll(RunId::new()).is_none());
        let ticket = tracker.start(&personas(1), 1).unwrap();
        assert!(tracker.forget(ticket.run_id));
        assert!(!tracker.forget(ticket.run_id));
        assert!(tracker.poll(ticket.run_id).is_none());
    }

    #[test]
    fn test_poll_sees_progress_updates() {
        let tracker = CampaignTracker::new();
        let ticket = tracker.start(&personas(2), 1).unwrap();
        let progress = tracker.progress(ticket.run_id).unwrap();
        progress.transition(CampaignStatus::Running).unwrap();
        progress.record_persona();
        let snapshot = tracker.poll(ticket.run_id).unwrap();
        assert_eq!(snapshot.status, CampaignStatus::Running);
        assert_eq!(snapshot.personas_completed, 1);
        assert!(!snapshot.is_done());
    }
}
