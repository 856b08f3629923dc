//! Rerun campaigns
//!
//! A campaign regenerates answers for one fixed persona list `rerun_count`
//! times so that answer stability can be measured. Generation itself is an
//! external concern; this module only holds the lifecycle and progress.

pub mod progress;
pub mod status;

pub use progress::{CampaignProgress, CampaignResult, CampaignSnapshot, Persona, RunId};
pub use status::CampaignStatus;
