//! SQLite database adapters for the VoiceForge evolution engine.

pub mod candidate_repository;
pub mod connection;
pub mod feedback_repository;
pub mod migrations;
pub mod prompt_version_repository;
pub mod rewrite_repository;
pub mod voice_repository;

pub use candidate_repository::SqliteCandidateRepository;
pub use connection::{create_pool, create_test_pool, ConnectionError};
pub use feedback_repository::SqliteFeedbackRepository;
pub use migrations::{all_embedded_migrations, Migration, MigrationError, Migrator};
pub use prompt_version_repository::SqlitePromptVersionRepository;
pub use rewrite_repository::SqliteRewriteRepository;
pub use voice_repository::SqliteVoiceRepository;

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::domain::errors::{DomainError, DomainResult};

/// Parse a UUID string from a SQLite row field.
pub(crate) fn parse_uuid(s: &str) -> DomainResult<Uuid> {
    Uuid::parse_str(s).map_err(|e| DomainError::SerializationError(e.to_string()))
}

/// Parse an optional UUID string from a SQLite row field.
pub(crate) fn parse_optional_uuid(s: Option<String>) -> DomainResult<Option<Uuid>> {
    s.map(|s| Uuid::parse_str(&s))
        .transpose()
        .map_err(|e| DomainError::SerializationError(e.to_string()))
}

/// Parse an RFC3339 datetime string from a SQLite row field.
pub(crate) fn parse_datetime(s: &str) -> DomainResult<DateTime<Utc>> {
    chrono::DateTime::parse_from_rfc3339(s)
        .map_err(|e| DomainError::SerializationError(e.to_string()))
        .map(|dt| dt.with_timezone(&Utc))
}

/// Parse a JSON array-of-strings column.
pub(crate) fn parse_string_list(s: &str) -> DomainResult<Vec<String>> {
    serde_json::from_str(s).map_err(|e| DomainError::SerializationError(e.to_string()))
}

#[derive(Debug, thiserror::Error)]
pub enum DatabaseError {
    #[error("Connection error: {0}")]
    Connection(#[from] ConnectionError),
    #[error("Migration error: {0}")]
    Migration(#[from] MigrationError),
    #[error("Query error: {0}")]
    Query(#[from] sqlx::Error),
}

/// Open the database at `database_url` and bring it up to schema.
pub async fn initialize_database(
    database_url: &str,
    max_connections: u32,
) -> Result<SqlitePool, DatabaseError> {
    let pool = create_pool(database_url, max_connections).await?;
    let migrator = Migrator::new(pool.clone());
    migrator.run_embedded_migrations(all_embedded_migrations()).await?;
    Ok(pool)
}

/// Create an in-memory test pool with all migrations applied.
pub async fn create_migrated_test_pool() -> Result<SqlitePool, DatabaseError> {
    let pool = create_test_pool().await?;
    let migrator = Migrator::new(pool.clone());
    migrator.run_embedded_migrations(all_embedded_migrations()).await?;
    Ok(pool)
}
