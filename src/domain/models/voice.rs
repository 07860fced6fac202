//! Brand voice domain model.
//!
//! The voice record itself (name, guidelines, tone) is owned by the outer
//! product; this core reads it at generation time and owns exactly one piece
//! of it: the learned-rules list and its append logic.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A named profile of tone/guidelines used to steer generation for one user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrandVoice {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub guidelines: String,
    pub tone_tags: Vec<String>,
    /// Voice-specific instructions derived from this voice's own feedback
    /// history. Ordered, no duplicate text.
    pub learned_rules: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl BrandVoice {
    pub fn new(user_id: Uuid, name: String, guidelines: String, tone_tags: Vec<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            name,
            guidelines,
            tone_tags,
            learned_rules: Vec::new(),
            created_at: Utc::now(),
        }
    }

    /// Comma-joined tone tags for prompt construction, or "standard" when the
    /// voice has none.
    pub fn tone_label(&self) -> String {
        if self.tone_tags.is_empty() {
            "standard".to_string()
        } else {
            self.tone_tags.join(", ")
        }
    }
}
