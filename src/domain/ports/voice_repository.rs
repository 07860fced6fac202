//! Brand voice repository port.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::errors::DomainResult;
use crate::domain::models::BrandVoice;

/// Repository interface for brand voices.
///
/// The voice record is owned by the outer product; this core reads it and
/// appends to its learned-rules list.
#[async_trait]
pub trait VoiceRepository: Send + Sync {
    /// Persist a new voice (used by the outer product and tests).
    async fn create(&self, voice: &BrandVoice) -> DomainResult<()>;

    /// Get a voice by ID.
    async fn get(&self, id: Uuid) -> DomainResult<Option<BrandVoice>>;

    /// The voice's learned rules, in append order.
    async fn get_learned_rules(&self, voice_id: Uuid) -> DomainResult<Vec<String>>;

    /// Append a learned rule with set-add semantics: the rule is added only
    /// if its exact text is not already present. Returns `true` when the list
    /// grew, `false` when the rule was already there.
    ///
    /// Read-then-append-if-absent runs inside one transaction so concurrent
    /// appends of the same text against the same voice cannot both land.
    async fn append_learned_rule(&self, voice_id: Uuid, rule: &str) -> DomainResult<bool>;
}
