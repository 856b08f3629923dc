//! Progress reporting for rerun campaigns

use colored::Colorize;
use consensus_application::CampaignProgressNotifier;
use consensus_domain::{CampaignSnapshot, CampaignStatus, Persona};
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Mutex;

/// Reports campaign progress with a progress bar, one tick per persona
pub struct CampaignProgressReporter {
    bar: Mutex<Option<ProgressBar>>,
}

impl CampaignProgressReporter {
    pub fn new() -> Self {
        Self {
            bar: Mutex::new(None),
        }
    }

    fn style() -> ProgressStyle {
        ProgressStyle::default_bar()
            .template("{spinner:.green} {prefix:.bold.cyan} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-")
    }

    fn persona_label(persona: &Persona) -> String {
        match &persona.archetype {
            Some(archetype) => format!("#{} {}", persona.index, archetype),
            None => format!("#{}", persona.index),
        }
    }
}

impl Default for CampaignProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl CampaignProgressNotifier for CampaignProgressReporter {
    fn on_campaign_start(&self, snapshot: &CampaignSnapshot, rerun_count: usize) {
        let pb = ProgressBar::new(snapshot.persona_count as u64);
        pb.set_style(Self::style());
        pb.set_prefix(format!("{} reruns", rerun_count));
        pb.set_message("Starting...");

        if let Ok(mut bar) = self.bar.lock() {
            *bar = Some(pb);
        }
    }

    fn on_persona_complete(&self, _snapshot: &CampaignSnapshot, persona: &Persona, success: bool) {
        if let Ok(bar) = self.bar.lock()
            && let Some(pb) = bar.as_ref()
        {
            let label = Self::persona_label(persona);
            let status = if success {
                format!("{} {}", "v".green(), label)
            } else {
                format!("{} {}", "x".red(), label)
            };
            pb.set_message(status);
            pb.inc(1);
        }
    }

    fn on_campaign_complete(&self, snapshot: &CampaignSnapshot) {
        if let Ok(mut bar) = self.bar.lock()
            && let Some(pb) = bar.take()
        {
            let message = match snapshot.status {
                CampaignStatus::Completed => "Campaign complete!".green(),
                _ => "Campaign failed".red(),
            };
            pb.finish_with_message(message.to_string());
        }
    }
}

/// Simple text-based progress (no fancy UI)
pub struct SimpleProgress;

impl CampaignProgressNotifier for SimpleProgress {
    fn on_campaign_start(&self, snapshot: &CampaignSnapshot, rerun_count: usize) {
        eprintln!(
            "{} {} ({} personas x {} reruns)",
            "->".cyan(),
            "Rerun campaign".bold(),
            snapshot.persona_count,
            rerun_count
        );
    }

    fn on_persona_complete(&self, snapshot: &CampaignSnapshot, persona: &Persona, success: bool) {
        let label = CampaignProgressReporter::persona_label(persona);
        if success {
            eprintln!(
                "  {} {} ({}/{})",
                "v".green(),
                label,
                snapshot.personas_completed,
                snapshot.persona_count
            );
        } else {
            eprintln!("  {} {} (excluded)", "x".red(), label);
        }
    }

    fn on_campaign_complete(&self, snapshot: &CampaignSnapshot) {
        eprintln!("  {} {}", "=".cyan(), snapshot.status.as_str());
    }
}
