//! Rewrite domain model: one persisted generation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Generation mode requested by the user.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RewriteMode {
    /// Rewrite the given text in the brand voice.
    #[default]
    Enhance,
    /// Create a new post about the given topic in the brand voice.
    Generate,
}

/// Target platform, used for platform-specific prompt addenda.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Platform {
    #[default]
    Twitter,
    Linkedin,
    General,
}

impl Platform {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Twitter => "twitter",
            Self::Linkedin => "linkedin",
            Self::General => "general",
        }
    }
}

/// One persisted generation result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Rewrite {
    pub id: Uuid,
    pub user_id: Uuid,
    pub brand_voice_id: Option<Uuid>,
    pub original_text: String,
    pub rewritten_text: String,
    pub created_at: DateTime<Utc>,
}

impl Rewrite {
    pub fn new(
        user_id: Uuid,
        brand_voice_id: Option<Uuid>,
        original_text: String,
        rewritten_text: String,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            brand_voice_id,
            original_text,
            rewritten_text,
            created_at: Utc::now(),
        }
    }
}

/// Input for a generation request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RewriteRequest {
    pub brand_voice_id: Uuid,
    pub original_text: String,
    #[serde(default)]
    pub mode: RewriteMode,
    #[serde(default)]
    pub platform: Platform,
}
