//! System prompt version domain model.
//!
//! The shared system prompt is modelled as an append-only version table with
//! a single-writer activation step: new versions are inserted active while all
//! previous versions are deactivated in the same transaction. Old versions are
//! retained for audit and never mutated.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Compiled-in instruction used to bootstrap an empty prompt-version table.
pub const DEFAULT_SYSTEM_INSTRUCTION: &str = "You are an expert social media \
copywriter. Write clear, engaging copy that matches the requested brand voice \
exactly. Prioritize the user's utility over cleverness, keep a professional \
register, and never produce harmful or misleading content.";

/// One immutable version of the shared system prompt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemPromptVersion {
    pub id: Uuid,
    /// Free-text instruction injected into every generation.
    pub content: String,
    /// Ordered list of atomic rule strings distilled from accepted feedback.
    pub instruction_list: Vec<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl SystemPromptVersion {
    pub fn new(content: String, instruction_list: Vec<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            content,
            instruction_list,
            is_active: true,
            created_at: Utc::now(),
        }
    }

    /// The first-run bootstrap version seeded from the compiled-in default.
    pub fn bootstrap() -> Self {
        Self::new(DEFAULT_SYSTEM_INSTRUCTION.to_string(), Vec::new())
    }
}

/// Read-side view of the active prompt, consumed at generation time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptContext {
    pub content: String,
    pub instruction_list: Vec<String>,
}

impl PromptContext {
    /// Context served before any version exists (pre-bootstrap reads).
    pub fn default_context() -> Self {
        Self {
            content: DEFAULT_SYSTEM_INSTRUCTION.to_string(),
            instruction_list: Vec::new(),
        }
    }
}

impl From<&SystemPromptVersion> for PromptContext {
    fn from(version: &SystemPromptVersion) -> Self {
        Self {
            content: version.content.clone(),
            instruction_list: version.instruction_list.clone(),
        }
    }
}
