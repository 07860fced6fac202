//! SQLite implementation of the `FeedbackRepository` port.

use async_trait::async_trait;
use sqlx::SqlitePool;
use uuid::Uuid;

use super::{parse_datetime, parse_optional_uuid, parse_uuid};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{FeedbackEvent, Sentiment};
use crate::domain::ports::FeedbackRepository;

/// SQLite-backed persistence for raw feedback events.
#[derive(Clone)]
pub struct SqliteFeedbackRepository {
    pool: SqlitePool,
}

impl SqliteFeedbackRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct FeedbackEventRow {
    id: String,
    user_id: String,
    rewrite_id: Option<String>,
    text: String,
    sentiment: String,
    created_at: String,
}

impl TryFrom<FeedbackEventRow> for FeedbackEvent {
    type Error = DomainError;

    fn try_from(row: FeedbackEventRow) -> Result<Self, Self::Error> {
        Ok(FeedbackEvent {
            id: parse_uuid(&row.id)?,
            user_id: parse_uuid(&row.user_id)?,
            rewrite_id: parse_optional_uuid(row.rewrite_id)?,
            text: row.text,
            sentiment: Sentiment::from_str(&row.sentiment).ok_or_else(|| {
                DomainError::SerializationError(format!("Unknown sentiment: '{}'", row.sentiment))
            })?,
            created_at: parse_datetime(&row.created_at)?,
        })
    }
}

#[async_trait]
impl FeedbackRepository for SqliteFeedbackRepository {
    async fn create(&self, event: &FeedbackEvent) -> DomainResult<()> {
        sqlx::query(
            r#"INSERT INTO feedback_events (id, user_id, rewrite_id, text, sentiment, created_at)
               VALUES (?, ?, ?, ?, ?, ?)"#,
        )
        .bind(event.id.to_string())
        .bind(event.user_id.to_string())
        .bind(event.rewrite_id.map(|id| id.to_string()))
        .bind(&event.text)
        .bind(event.sentiment.as_str())
        .bind(event.created_at.to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn get(&self, id: Uuid) -> DomainResult<Option<FeedbackEvent>> {
        let row: Option<FeedbackEventRow> =
            sqlx::query_as("SELECT * FROM feedback_events WHERE id = ?")
                .bind(id.to_string())
                .fetch_optional(&self.pool)
                .await?;

        row.map(FeedbackEvent::try_from).transpose()
    }

    async fn list_for_user(&self, user_id: Uuid) -> DomainResult<Vec<FeedbackEvent>> {
        let rows: Vec<FeedbackEventRow> = sqlx::query_as(
            "SELECT * FROM feedback_events WHERE user_id = ? ORDER BY created_at DESC",
        )
        .bind(user_id.to_string())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(FeedbackEvent::try_from).collect()
    }
}
