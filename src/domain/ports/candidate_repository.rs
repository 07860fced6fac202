//! Refined candidate repository port.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::errors::DomainResult;
use crate::domain::models::RefinedCandidate;

/// Repository interface for refined candidates.
///
/// Candidates are created by the judge and only ever transitioned
/// pending -> implemented, and only through
/// `PromptVersionRepository::commit_evolution` so the transition stays inside
/// the same transaction as the version activation.
#[async_trait]
pub trait CandidateRepository: Send + Sync {
    /// Persist a new candidate (pending or rejected).
    async fn create(&self, candidate: &RefinedCandidate) -> DomainResult<()>;

    /// Get a candidate by ID.
    async fn get(&self, id: Uuid) -> DomainResult<Option<RefinedCandidate>>;

    /// Get the candidate derived from a given feedback event, if any.
    async fn get_by_source_feedback(
        &self,
        feedback_id: Uuid,
    ) -> DomainResult<Option<RefinedCandidate>>;

    /// All pending candidates, oldest first. This ordering is what the
    /// synthesis prompt relies on for deterministic conflict resolution.
    async fn list_pending(&self) -> DomainResult<Vec<RefinedCandidate>>;

    /// Number of pending candidates.
    async fn count_pending(&self) -> DomainResult<u64>;
}
