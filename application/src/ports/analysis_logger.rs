//! Port for structured analysis logging.
//!
//! Defines the [`AnalysisLogger`] trait for recording analysis events
//! (reports produced, campaign lifecycle, degraded comparisons) to a
//! structured log.
//!
//! This is separate from `tracing`-based operation logs: tracing handles
//! human-readable diagnostic messages, while this port captures every
//! computed result in a machine-readable format (JSONL).

use serde_json::Value;

/// A structured analysis event for logging.
pub struct AnalysisEvent {
    /// Event type identifier (e.g., "consensus", "campaign_completed").
    pub event_type: &'static str,
    /// JSON payload with event-specific data.
    pub payload: Value,
}

impl AnalysisEvent {
    pub fn new(event_type: &'static str, payload: Value) -> Self {
        Self {
            event_type,
            payload,
        }
    }
}

/// Port for logging analysis events to a structured log.
///
/// `log` is synchronous and infallible; logging failures never interrupt an
/// analysis.
pub trait AnalysisLogger: Send + Sync {
    /// Record an analysis event.
    fn log(&self, event: AnalysisEvent);
}

/// No-op implementation for tests and when logging is disabled.
pub struct NoAnalysisLogger;

impl AnalysisLogger for NoAnalysisLogger {
    fn log(&self, _event: AnalysisEvent) {}
}
