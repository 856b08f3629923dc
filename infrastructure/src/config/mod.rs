//! Configuration file loading for panel-consensus
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `--config <path>` specified file
//! 2. `PANEL_CONSENSUS_*` environment variables
//! 3. Project root: `./panel-consensus.toml` or `./.panel-consensus.toml`
//! 4. XDG config: `$XDG_CONFIG_HOME/panel-consensus/config.toml`
//! 5. Fallback: `~/.config/panel-consensus/config.toml`
//! 6. Default values

mod file_config;
mod loader;

pub use file_config::{
    ConfigValidationError, FileAnalysisConfig, FileCampaignConfig, FileConfig, FileLoggingConfig,
    FileOutputConfig, FileOutputFormat,
};
pub use loader::ConfigLoader;
