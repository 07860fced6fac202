//! SQLite implementation of the `CandidateRepository` port.
//!
//! Read/insert only. The pending -> implemented transition lives in
//! `SqlitePromptVersionRepository::commit_evolution` so it shares a
//! transaction with the version activation.

use async_trait::async_trait;
use sqlx::SqlitePool;
use uuid::Uuid;

use super::{parse_datetime, parse_uuid};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{CandidateStatus, RefinedCandidate};
use crate::domain::ports::CandidateRepository;

/// SQLite-backed persistence for refined candidates.
#[derive(Clone)]
pub struct SqliteCandidateRepository {
    pool: SqlitePool,
}

impl SqliteCandidateRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
pub(crate) struct RefinedCandidateRow {
    id: String,
    source_feedback_id: String,
    refined_text: String,
    quality_score: i64,
    status: String,
    rejection_reason: Option<String>,
    created_at: String,
}

impl TryFrom<RefinedCandidateRow> for RefinedCandidate {
    type Error = DomainError;

    fn try_from(row: RefinedCandidateRow) -> Result<Self, Self::Error> {
        let quality_score = u8::try_from(row.quality_score).map_err(|_| {
            DomainError::SerializationError(format!("Score out of range: {}", row.quality_score))
        })?;

        Ok(RefinedCandidate {
            id: parse_uuid(&row.id)?,
            source_feedback_id: parse_uuid(&row.source_feedback_id)?,
            refined_text: row.refined_text,
            quality_score,
            status: CandidateStatus::from_str(&row.status).ok_or_else(|| {
                DomainError::SerializationError(format!("Unknown status: '{}'", row.status))
            })?,
            rejection_reason: row.rejection_reason,
            created_at: parse_datetime(&row.created_at)?,
        })
    }
}

#[async_trait]
impl CandidateRepository for SqliteCandidateRepository {
    async fn create(&self, candidate: &RefinedCandidate) -> DomainResult<()> {
        sqlx::query(
            r#"INSERT INTO refined_candidates
               (id, source_feedback_id, refined_text, quality_score, status,
                rejection_reason, created_at)
               VALUES (?, ?, ?, ?, ?, ?, ?)"#,
        )
        .bind(candidate.id.to_string())
        .bind(candidate.source_feedback_id.to_string())
        .bind(&candidate.refined_text)
        .bind(i64::from(candidate.quality_score))
        .bind(candidate.status.as_str())
        .bind(&candidate.rejection_reason)
        .bind(candidate.created_at.to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn get(&self, id: Uuid) -> DomainResult<Option<RefinedCandidate>> {
        let row: Option<RefinedCandidateRow> =
            sqlx::query_as("SELECT * FROM refined_candidates WHERE id = ?")
                .bind(id.to_string())
                .fetch_optional(&self.pool)
                .await?;

        row.map(RefinedCandidate::try_from).transpose()
    }

    async fn get_by_source_feedback(
        &self,
        feedback_id: Uuid,
    ) -> DomainResult<Option<RefinedCandidate>> {
        let row: Option<RefinedCandidateRow> =
            sqlx::query_as("SELECT * FROM refined_candidates WHERE source_feedback_id = ?")
                .bind(feedback_id.to_string())
                .fetch_optional(&self.pool)
                .await?;

        row.map(RefinedCandidate::try_from).transpose()
    }

    async fn list_pending(&self) -> DomainResult<Vec<RefinedCandidate>> {
        let rows: Vec<RefinedCandidateRow> = sqlx::query_as(
            "SELECT * FROM refined_candidates WHERE status = 'pending' \
             ORDER BY created_at ASC, id ASC",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(RefinedCandidate::try_from).collect()
    }

    async fn count_pending(&self) -> DomainResult<u64> {
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM refined_candidates WHERE status = 'pending'")
                .fetch_one(&self.pool)
                .await?;

        Ok(count.unsigned_abs())
    }
}
