//! Presentation layer for panel-consensus
//!
//! This crate contains CLI definitions, report formatters and campaign
//! progress reporters.

pub mod cli;
pub mod output;
pub mod progress;

// Re-export commonly used types
pub use cli::commands::{
    AlignmentArg, Cli, Command, ComparatorArg, FormatArg, InsightsArgs, ModeArg,
    SetArgs, StabilityArgs,
};
pub use output::console::ConsoleFormatter;
pub use output::formatter::{JsonFormatter, ReportFormatter, formatter_for};
pub use progress::reporter::{CampaignProgressReporter, SimpleProgress};
