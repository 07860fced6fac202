//! SQLite implementation of the `PromptVersionRepository` port.
//!
//! The single-active-version invariant is enforced twice: every writer runs
//! deactivate-all-then-insert inside one transaction, and the schema carries a
//! partial unique index on `is_active = 1` as a backstop.

use async_trait::async_trait;
use sqlx::{Sqlite, SqlitePool, Transaction};
use uuid::Uuid;

use super::{parse_datetime, parse_string_list, parse_uuid};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::SystemPromptVersion;
use crate::domain::ports::PromptVersionRepository;

/// SQLite-backed persistence for the append-only prompt version history.
#[derive(Clone)]
pub struct SqlitePromptVersionRepository {
    pool: SqlitePool,
}

impl SqlitePromptVersionRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    async fn insert_active(
        tx: &mut Transaction<'_, Sqlite>,
        version: &SystemPromptVersion,
    ) -> DomainResult<()> {
        sqlx::query("UPDATE system_prompt_versions SET is_active = 0 WHERE is_active = 1")
            .execute(&mut **tx)
            .await?;

        let instruction_list_json = serde_json::to_string(&version.instruction_list)?;
        sqlx::query(
            r#"INSERT INTO system_prompt_versions
               (id, content, instruction_list_json, is_active, created_at)
               VALUES (?, ?, ?, 1, ?)"#,
        )
        .bind(version.id.to_string())
        .bind(&version.content)
        .bind(&instruction_list_json)
        .bind(version.created_at.to_rfc3339())
        .execute(&mut **tx)
        .await?;

        Ok(())
    }
}

#[derive(sqlx::FromRow)]
struct PromptVersionRow {
    id: String,
    content: String,
    instruction_list_json: String,
    is_active: i64,
    created_at: String,
}

impl TryFrom<PromptVersionRow> for SystemPromptVersion {
    type Error = DomainError;

    fn try_from(row: PromptVersionRow) -> Result<Self, Self::Error> {
        Ok(SystemPromptVersion {
            id: parse_uuid(&row.id)?,
            content: row.content,
            instruction_list: parse_string_list(&row.instruction_list_json)?,
            is_active: row.is_active != 0,
            created_at: parse_datetime(&row.created_at)?,
        })
    }
}

#[async_trait]
impl PromptVersionRepository for SqlitePromptVersionRepository {
    async fn get_active(&self) -> DomainResult<Option<SystemPromptVersion>> {
        let row: Option<PromptVersionRow> =
            sqlx::query_as("SELECT * FROM system_prompt_versions WHERE is_active = 1")
                .fetch_optional(&self.pool)
                .await?;

        row.map(SystemPromptVersion::try_from).transpose()
    }

    async fn create_version(&self, version: &SystemPromptVersion) -> DomainResult<()> {
        let mut tx = self.pool.begin().await?;
        Self::insert_active(&mut tx, version).await?;
        tx.commit().await?;
        Ok(())
    }

    async fn commit_evolution(
        &self,
        version: &SystemPromptVersion,
        candidate_ids: &[Uuid],
    ) -> DomainResult<()> {
        let mut tx = self.pool.begin().await?;

        // Claim the snapshot first: each candidate must still be pending.
        // A concurrent evolution that already implemented one of them makes
        // this run the deterministic loser; dropping the transaction rolls
        // back any rows claimed so far.
        for id in candidate_ids {
            let result = sqlx::query(
                "UPDATE refined_candidates SET status = 'implemented' \
                 WHERE id = ? AND status = 'pending'",
            )
            .bind(id.to_string())
            .execute(&mut *tx)
            .await?;

            if result.rows_affected() != 1 {
                return Err(DomainError::ConcurrencyConflict {
                    entity: "refined_candidate".to_string(),
                    id: id.to_string(),
                });
            }
        }

        Self::insert_active(&mut tx, version).await?;
        tx.commit().await?;
        Ok(())
    }

    async fn list_versions(&self) -> DomainResult<Vec<SystemPromptVersion>> {
        let rows: Vec<PromptVersionRow> =
            sqlx::query_as("SELECT * FROM system_prompt_versions ORDER BY created_at DESC")
                .fetch_all(&self.pool)
                .await?;

        rows.into_iter().map(SystemPromptVersion::try_from).collect()
    }

    async fn count_versions(&self) -> DomainResult<u64> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM system_prompt_versions")
            .fetch_one(&self.pool)
            .await?;

        Ok(count.unsigned_abs())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::sqlite::{create_migrated_test_pool, SqliteCandidateRepository, SqliteFeedbackRepository};
    use crate::domain::models::{CandidateStatus, FeedbackEvent, RefinedCandidate, Sentiment};
    use crate::domain::ports::{CandidateRepository, FeedbackRepository};

    #[tokio::test]
    async fn test_create_version_deactivates_previous() {
        let pool = create_migrated_test_pool().await.unwrap();
        let repo = SqlitePromptVersionRepository::new(pool);

        let v1 = SystemPromptVersion::new("v1".into(), vec![]);
        let v2 = SystemPromptVersion::new("v2".into(), vec!["No emojis.".into()]);
        repo.create_version(&v1).await.unwrap();
        repo.create_version(&v2).await.unwrap();

        let active = repo.get_active().await.unwrap().unwrap();
        assert_eq!(active.id, v2.id);
        assert_eq!(active.instruction_list, vec!["No emojis.".to_string()]);

        // History is append-only: both rows exist, exactly one active
        let versions = repo.list_versions().await.unwrap();
        assert_eq!(versions.len(), 2);
        assert_eq!(versions.iter().filter(|v| v.is_active).count(), 1);
    }

    #[tokio::test]
    async fn test_get_active_none_before_bootstrap() {
        let pool = create_migrated_test_pool().await.unwrap();
        let repo = SqlitePromptVersionRepository::new(pool);
        assert!(repo.get_active().await.unwrap().is_none());
    }

    async fn seed_pending(pool: &SqlitePool, text: &str) -> RefinedCandidate {
        let feedback_repo = SqliteFeedbackRepository::new(pool.clone());
        let event = FeedbackEvent::new(Uuid::new_v4(), None, text.to_string(), Sentiment::Negative);
        feedback_repo.create(&event).await.unwrap();

        let candidate = RefinedCandidate::from_verdict(event.id, text.to_string(), 80, None);
        SqliteCandidateRepository::new(pool.clone())
            .create(&candidate)
            .await
            .unwrap();
        candidate
    }

    #[tokio::test]
    async fn test_commit_evolution_marks_only_snapshot() {
        let pool = create_migrated_test_pool().await.unwrap();
        let repo = SqlitePromptVersionRepository::new(pool.clone());
        let candidates = SqliteCandidateRepository::new(pool.clone());

        let in_batch = seed_pending(&pool, "Rule A").await;
        let late_arrival = seed_pending(&pool, "Rule B").await;

        let version = SystemPromptVersion::new("evolved".into(), vec!["Rule A".into()]);
        repo.commit_evolution(&version, &[in_batch.id]).await.unwrap();

        let implemented = candidates.get(in_batch.id).await.unwrap().unwrap();
        assert_eq!(implemented.status, CandidateStatus::Implemented);

        // The late arrival was not swallowed by the commit
        let still_pending = candidates.get(late_arrival.id).await.unwrap().unwrap();
        assert_eq!(still_pending.status, CandidateStatus::Pending);

        assert_eq!(repo.get_active().await.unwrap().unwrap().id, version.id);
    }

    #[tokio::test]
    async fn test_commit_evolution_conflict_rolls_back_everything() {
        let pool = create_migrated_test_pool().await.unwrap();
        let repo = SqlitePromptVersionRepository::new(pool.clone());
        let candidates = SqliteCandidateRepository::new(pool.clone());

        let a = seed_pending(&pool, "Rule A").await;
        let b = seed_pending(&pool, "Rule B").await;

        // First evolution claims both
        let v1 = SystemPromptVersion::new("first".into(), vec![]);
        repo.commit_evolution(&v1, &[a.id, b.id]).await.unwrap();

        // A racing evolution over the same snapshot must lose and leave no trace
        let v2 = SystemPromptVersion::new("second".into(), vec![]);
        let err = repo.commit_evolution(&v2, &[a.id, b.id]).await.unwrap_err();
        assert!(matches!(err, DomainError::ConcurrencyConflict { .. }));

        assert_eq!(repo.count_versions().await.unwrap(), 1);
        assert_eq!(repo.get_active().await.unwrap().unwrap().id, v1.id);
        assert_eq!(
            candidates.get(a.id).await.unwrap().unwrap().status,
            CandidateStatus::Implemented
        );
    }
}
