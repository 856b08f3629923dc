//! Progress notification port
//!
//! Defines the interface for reporting progress during a rerun campaign.

use consensus_domain::{CampaignSnapshot, Persona};

/// Callback for progress updates during a rerun campaign
///
/// Implementations live in the presentation layer and can display
/// progress in various ways (progress bar, log lines, etc.)
pub trait CampaignProgressNotifier: Send + Sync {
    /// Called once the campaign is running
    fn on_campaign_start(&self, snapshot: &CampaignSnapshot, rerun_count: usize);

    /// Called when every rerun of one persona has finished
    fn on_persona_complete(&self, snapshot: &CampaignSnapshot, persona: &Persona, success: bool);

    /// Called when the campaign reached a terminal status
    fn on_campaign_complete(&self, snapshot: &CampaignSnapshot);
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoProgress;

impl CampaignProgressNotifier for NoProgress {
    fn on_campaign_start(&self, _snapshot: &CampaignSnapshot, _rerun_count: usize) {}
    fn on_persona_complete(&self, _snapshot: &CampaignSnapshot, _persona: &Persona, _success: bool) {}
    fn on_campaign_complete(&self, _snapshot: &CampaignSnapshot) {}
}
