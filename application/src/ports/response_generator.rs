//! Response generator port
//!
//! Defines the interface for producing one persona's answers. Real
//! implementations call a simulation service; the engine only consumes
//! their output.

use async_trait::async_trait;
use consensus_domain::{AnswerEntry, Persona, QuestionCatalog};
use thiserror::Error;

/// Errors that can occur while generating a persona's answers
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GenerationError {
    #[error("Generator unavailable: {0}")]
    Unavailable(String),

    #[error("No answers for persona {persona} in rerun {rerun}")]
    Missing { persona: usize, rerun: usize },

    #[error("Malformed answers: {0}")]
    Malformed(String),

    #[error("Timeout")]
    Timeout,

    #[error("Other error: {0}")]
    Other(String),
}

/// Generates answers for one persona
///
/// Each call is independent: a campaign calls `generate` once per persona
/// per rerun, possibly concurrently. Implementations live in the
/// infrastructure layer.
#[async_trait]
pub trait ResponseGenerator: Send + Sync {
    /// Answer every question in `catalog` as `persona`, for 1-indexed `rerun`
    async fn generate(
        &self,
        persona: &Persona,
        catalog: &QuestionCatalog,
        rerun: usize,
    ) -> Result<Vec<AnswerEntry>, GenerationError>;

    /// Identifier for logs
    fn name(&self) -> &str {
        "generator"
    }
}
