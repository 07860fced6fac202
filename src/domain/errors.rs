//! Domain errors for the VoiceForge evolution engine.

use thiserror::Error;
use uuid::Uuid;

/// Domain-level errors that can occur in the VoiceForge system.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Brand voice not found: {0}")]
    VoiceNotFound(Uuid),

    #[error("Rewrite not found: {0}")]
    RewriteNotFound(Uuid),

    #[error("Validation failed: {0}")]
    ValidationFailed(String),

    #[error("LLM call failed: {0}")]
    LlmFailed(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Concurrency conflict: {entity} {id} was modified")]
    ConcurrencyConflict { entity: String, id: String },
}

pub type DomainResult<T> = Result<T, DomainError>;

impl From<sqlx::Error> for DomainError {
    fn from(err: sqlx::Error) -> Self {
        DomainError::DatabaseError(err.to_string())
    }
}

impl From<serde_json::Error> for DomainError {
    fn from(err: serde_json::Error) -> Self {
        DomainError::SerializationError(err.to_string())
    }
}
