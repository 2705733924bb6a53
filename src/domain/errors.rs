//! Domain errors for the Ponder reasoning pipeline.

use thiserror::Error;

/// Domain-level errors that can occur while running the reasoning pipeline.
///
/// Per-step tool failures are NOT represented here — a tool failure is a
/// value (`ToolError`) consumed by the orchestrator's retry loop and
/// degraded into a failed execution record. Only structural faults that
/// must abort a run before or during execution surface as `DomainError`.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Invalid pattern for tier {tier}: {reason}")]
    InvalidPattern { tier: String, reason: String },

    #[error("Validation failed: {0}")]
    ValidationFailed(String),

    #[error("Run cancelled before step {step}")]
    Cancelled { step: usize },

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

pub type DomainResult<T> = Result<T, DomainError>;

impl From<serde_json::Error> for DomainError {
    fn from(err: serde_json::Error) -> Self {
        DomainError::SerializationError(err.to_string())
    }
}
