//! Port definitions (interfaces for external adapters)

pub mod analysis_logger;
pub mod progress;
pub mod response_generator;
