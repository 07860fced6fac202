//! System prompt version repository port.
//!
//! The active flag is the one piece of truly shared mutable state in the
//! system. All writers go through `create_version` / `commit_evolution`; no
//! other code path may set `is_active` directly.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::errors::DomainResult;
use crate::domain::models::SystemPromptVersion;

/// Repository interface for the append-only prompt version history.
#[async_trait]
pub trait PromptVersionRepository: Send + Sync {
    /// The unique active version, or `None` before first bootstrap.
    async fn get_active(&self) -> DomainResult<Option<SystemPromptVersion>>;

    /// Insert a new active version, deactivating all previous versions in the
    /// same transaction. A reader never observes zero or multiple active
    /// versions mid-operation.
    async fn create_version(&self, version: &SystemPromptVersion) -> DomainResult<()>;

    /// Atomic evolution commit: insert `version` as the new active version
    /// (deactivating the previous one) and transition exactly `candidate_ids`
    /// from pending to implemented, all in one transaction.
    ///
    /// If any of the IDs is no longer pending (a concurrent evolution claimed
    /// it first), the whole transaction rolls back and the call fails with
    /// `DomainError::ConcurrencyConflict` so the loser no-ops deterministically.
    async fn commit_evolution(
        &self,
        version: &SystemPromptVersion,
        candidate_ids: &[Uuid],
    ) -> DomainResult<()>;

    /// Full version history, newest first. Retained for audit.
    async fn list_versions(&self) -> DomainResult<Vec<SystemPromptVersion>>;

    /// Total number of stored versions.
    async fn count_versions(&self) -> DomainResult<u64>;
}
