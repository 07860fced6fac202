//! SQLite implementation of the `RewriteRepository` port.

use async_trait::async_trait;
use sqlx::SqlitePool;
use uuid::Uuid;

use super::{parse_datetime, parse_optional_uuid, parse_uuid};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::Rewrite;
use crate::domain::ports::RewriteRepository;

/// SQLite-backed persistence for generated rewrites.
#[derive(Clone)]
pub struct SqliteRewriteRepository {
    pool: SqlitePool,
}

impl SqliteRewriteRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct RewriteRow {
    id: String,
    user_id: String,
    brand_voice_id: Option<String>,
    original_text: String,
    rewritten_text: String,
    created_at: String,
}

impl TryFrom<RewriteRow> for Rewrite {
    type Error = DomainError;

    fn try_from(row: RewriteRow) -> Result<Self, Self::Error> {
        Ok(Rewrite {
            id: parse_uuid(&row.id)?,
            user_id: parse_uuid(&row.user_id)?,
            brand_voice_id: parse_optional_uuid(row.brand_voice_id)?,
            original_text: row.original_text,
            rewritten_text: row.rewritten_text,
            created_at: parse_datetime(&row.created_at)?,
        })
    }
}

#[async_trait]
impl RewriteRepository for SqliteRewriteRepository {
    async fn create(&self, rewrite: &Rewrite) -> DomainResult<()> {
        sqlx::query(
            r#"INSERT INTO rewrites
               (id, user_id, brand_voice_id, original_text, rewritten_text, created_at)
               VALUES (?, ?, ?, ?, ?, ?)"#,
        )
        .bind(rewrite.id.to_string())
        .bind(rewrite.user_id.to_string())
        .bind(rewrite.brand_voice_id.map(|id| id.to_string()))
        .bind(&rewrite.original_text)
        .bind(&rewrite.rewritten_text)
        .bind(rewrite.created_at.to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn get(&self, id: Uuid) -> DomainResult<Option<Rewrite>> {
        let row: Option<RewriteRow> = sqlx::query_as("SELECT * FROM rewrites WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await?;

        row.map(Rewrite::try_from).transpose()
    }

    async fn list_for_user(&self, user_id: Uuid) -> DomainResult<Vec<Rewrite>> {
        let rows: Vec<RewriteRow> =
            sqlx::query_as("SELECT * FROM rewrites WHERE user_id = ? ORDER BY created_at DESC")
                .bind(user_id.to_string())
                .fetch_all(&self.pool)
                .await?;

        rows.into_iter().map(Rewrite::try_from).collect()
    }
}
