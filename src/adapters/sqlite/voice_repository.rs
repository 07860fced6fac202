//! SQLite implementation of the `VoiceRepository` port.

use async_trait::async_trait;
use sqlx::SqlitePool;
use uuid::Uuid;

use super::{parse_datetime, parse_string_list, parse_uuid};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::BrandVoice;
use crate::domain::ports::VoiceRepository;

/// SQLite-backed persistence for brand voices and their learned rules.
#[derive(Clone)]
pub struct SqliteVoiceRepository {
    pool: SqlitePool,
}

impl SqliteVoiceRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct BrandVoiceRow {
    id: String,
    user_id: String,
    name: String,
    guidelines: String,
    tone_tags_json: String,
    learned_rules_json: String,
    created_at: String,
}

impl TryFrom<BrandVoiceRow> for BrandVoice {
    type Error = DomainError;

    fn try_from(row: BrandVoiceRow) -> Result<Self, Self::Error> {
        Ok(BrandVoice {
            id: parse_uuid(&row.id)?,
            user_id: parse_uuid(&row.user_id)?,
            name: row.name,
            guidelines: row.guidelines,
            tone_tags: parse_string_list(&row.tone_tags_json)?,
            learned_rules: parse_string_list(&row.learned_rules_json)?,
            created_at: parse_datetime(&row.created_at)?,
        })
    }
}

#[async_trait]
impl VoiceRepository for SqliteVoiceRepository {
    async fn create(&self, voice: &BrandVoice) -> DomainResult<()> {
        sqlx::query(
            r#"INSERT INTO brand_voices
               (id, user_id, name, guidelines, tone_tags_json, learned_rules_json, created_at)
               VALUES (?, ?, ?, ?, ?, ?, ?)"#,
        )
        .bind(voice.id.to_string())
        .bind(voice.user_id.to_string())
        .bind(&voice.name)
        .bind(&voice.guidelines)
        .bind(serde_json::to_string(&voice.tone_tags)?)
        .bind(serde_json::to_string(&voice.learned_rules)?)
        .bind(voice.created_at.to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn get(&self, id: Uuid) -> DomainResult<Option<BrandVoice>> {
        let row: Option<BrandVoiceRow> = sqlx::query_as("SELECT * FROM brand_voices WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await?;

        row.map(BrandVoice::try_from).transpose()
    }

    async fn get_learned_rules(&self, voice_id: Uuid) -> DomainResult<Vec<String>> {
        let row: Option<(String,)> =
            sqlx::query_as("SELECT learned_rules_json FROM brand_voices WHERE id = ?")
                .bind(voice_id.to_string())
                .fetch_optional(&self.pool)
                .await?;

        match row {
            Some((json,)) => parse_string_list(&json),
            None => Err(DomainError::VoiceNotFound(voice_id)),
        }
    }

    async fn append_learned_rule(&self, voice_id: Uuid, rule: &str) -> DomainResult<bool> {
        let mut tx = self.pool.begin().await?;

        let row: Option<(String,)> =
            sqlx::query_as("SELECT learned_rules_json FROM brand_voices WHERE id = ?")
                .bind(voice_id.to_string())
                .fetch_optional(&mut *tx)
                .await?;

        let Some((json,)) = row else {
            return Err(DomainError::VoiceNotFound(voice_id));
        };

        let mut rules = parse_string_list(&json)?;
        if rules.iter().any(|existing| existing == rule) {
            // Already present: idempotent no-op, nothing to write
            return Ok(false);
        }

        rules.push(rule.to_string());
        sqlx::query("UPDATE brand_voices SET learned_rules_json = ? WHERE id = ?")
            .bind(serde_json::to_string(&rules)?)
            .bind(voice_id.to_string())
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::sqlite::create_migrated_test_pool;

    fn make_voice() -> BrandVoice {
        BrandVoice::new(
            Uuid::new_v4(),
            "casual".to_string(),
            "casual tone".to_string(),
            vec!["witty".to_string()],
        )
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let pool = create_migrated_test_pool().await.unwrap();
        let repo = SqliteVoiceRepository::new(pool);

        let voice = make_voice();
        repo.create(&voice).await.unwrap();

        let fetched = repo.get(voice.id).await.unwrap().unwrap();
        assert_eq!(fetched.name, "casual");
        assert_eq!(fetched.tone_tags, vec!["witty".to_string()]);
        assert!(fetched.learned_rules.is_empty());
    }

    #[tokio::test]
    async fn test_append_learned_rule_is_idempotent() {
        let pool = create_migrated_test_pool().await.unwrap();
        let repo = SqliteVoiceRepository::new(pool);

        let voice = make_voice();
        repo.create(&voice).await.unwrap();

        assert!(repo.append_learned_rule(voice.id, "Avoid emoji usage.").await.unwrap());
        assert!(!repo.append_learned_rule(voice.id, "Avoid emoji usage.").await.unwrap());
        assert!(repo.append_learned_rule(voice.id, "Keep it short.").await.unwrap());

        let rules = repo.get_learned_rules(voice.id).await.unwrap();
        assert_eq!(
            rules,
            vec!["Avoid emoji usage.".to_string(), "Keep it short.".to_string()]
        );
    }

    #[tokio::test]
    async fn test_rules_for_missing_voice_is_not_found() {
        let pool = create_migrated_test_pool().await.unwrap();
        let repo = SqliteVoiceRepository::new(pool);

        let err = repo.get_learned_rules(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, DomainError::VoiceNotFound(_)));

        let err = repo.append_learned_rule(Uuid::new_v4(), "rule").await.unwrap_err();
        assert!(matches!(err, DomainError::VoiceNotFound(_)));
    }
}
