//! Rewrite repository port.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::errors::DomainResult;
use crate::domain::models::Rewrite;

/// Repository interface for persisted generations.
#[async_trait]
pub trait RewriteRepository: Send + Sync {
    /// Persist a new rewrite.
    async fn create(&self, rewrite: &Rewrite) -> DomainResult<()>;

    /// Get a rewrite by ID.
    async fn get(&self, id: Uuid) -> DomainResult<Option<Rewrite>>;

    /// List a user's rewrites, newest first.
    async fn list_for_user(&self, user_id: Uuid) -> DomainResult<Vec<Rewrite>>;
}
