//! Infrastructure layer for panel-consensus
//!
//! This crate contains adapters that implement the ports defined in the
//! application layer, plus file-based configuration and dataset loading.
//!
//! # Adapters
//!
//! - [`ReplayResponseGenerator`]: serves recorded rerun sets to a campaign
//! - [`JsonlAnalysisLogger`]: structured analysis log, one JSON object per line
//! - [`DatasetLoader`]: question catalogs, response sets and persona lists
//! - [`ConfigLoader`]: figment-based TOML configuration

pub mod config;
pub mod dataset;
pub mod generator;
pub mod logging;

pub use config::{
    ConfigLoader, ConfigValidationError, FileAnalysisConfig, FileCampaignConfig, FileConfig,
    FileLoggingConfig, FileOutputConfig, FileOutputFormat,
};
pub use dataset::{DatasetError, DatasetLoader};
pub use generator::ReplayResponseGenerator;
pub use logging::JsonlAnalysisLogger;
