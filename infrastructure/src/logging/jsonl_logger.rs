//! JSONL file writer for analysis events.
//!
//! Each [`AnalysisEvent`] becomes one JSON line with `type` and `timestamp`
//! added. The file is opened in append mode so successive runs accumulate.

use consensus_application::{AnalysisEvent, AnalysisLogger};
use serde_json::Value;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::warn;

/// Thread-safe via `Mutex<BufWriter<File>>`. Flushes on `Drop`.
pub struct JsonlAnalysisLogger {
    writer: Mutex<BufWriter<File>>,
    path: PathBuf,
}

impl JsonlAnalysisLogger {
    /// Open (or create) the log file, creating parent directories.
    ///
    /// Returns `None` after a warning if the file cannot be opened; analysis
    /// then runs without a structured log.
    pub fn new(path: impl AsRef<Path>) -> Option<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && let Err(e) = std::fs::create_dir_all(parent)
        {
            warn!(
                "Could not create analysis log directory {}: {}",
                parent.display(),
                e
            );
            return None;
        }

        let file = match OpenOptions::new().create(true).append(true).open(path) {
            Ok(f) => f,
            Err(e) => {
                warn!("Could not open analysis log {}: {}", path.display(), e);
                return None;
            }
        };

        Some(Self {
            writer: Mutex::new(BufWriter::new(file)),
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn record(event: AnalysisEvent) -> Value {
        let timestamp = chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true);
        match event.payload {
            Value::Object(mut map) => {
                map.insert("type".to_string(), Value::String(event.event_type.to_string()));
                map.insert("timestamp".to_string(), Value::String(timestamp));
                Value::Object(map)
            }
            other => serde_json::json!({
                "type": event.event_type,
                "timestamp": timestamp,
                "data": other,
            }),
        }
    }
}

impl AnalysisLogger for JsonlAnalysisLogger {
    fn log(&self, event: AnalysisEvent) {
        let Ok(line) = serde_json::to_string(&Self::record(event)) else {
            return;
        };

        if let Ok(mut writer) = self.writer.lock() {
            let _ = writeln!(writer, "{}", line);
            let _ = writer.flush();
        }
    }
}

impl Drop for JsonlAnalysisLogger {
    fn drop(&mut self) {
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writer.flush();
        }
    }
}
