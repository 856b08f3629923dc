//! Logging configuration from TOML (`[logging]` section)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// ```toml
/// [logging]
/// analysis_log = "~/.local/share/panel-consensus/analysis.jsonl"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLoggingConfig {
    /// JSONL file receiving structured analysis events; disabled when unset
    pub analysis_log: Option<String>,
}

impl FileLoggingConfig {
    /// Resolve `analysis_log`, expanding a leading `~/`
    pub fn analysis_log_path(&self) -> Option<PathBuf> {
        let raw = self.analysis_log.as_deref()?.trim();
        if raw.is_empty() {
            return None;
        }
        match raw.strip_prefix("~/") {
            Some(rest) => dirs::home_dir().map(|home| home.join(rest)),
            None => Some(PathBuf::from(raw)),
        }
    }
}
