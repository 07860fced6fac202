//! Feedback event repository port.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::errors::DomainResult;
use crate::domain::models::FeedbackEvent;

/// Repository interface for raw feedback events.
///
/// Events are immutable; there is no update or delete.
#[async_trait]
pub trait FeedbackRepository: Send + Sync {
    /// Persist a new feedback event.
    async fn create(&self, event: &FeedbackEvent) -> DomainResult<()>;

    /// Get a feedback event by ID.
    async fn get(&self, id: Uuid) -> DomainResult<Option<FeedbackEvent>>;

    /// List events submitted by one user, newest first.
    async fn list_for_user(&self, user_id: Uuid) -> DomainResult<Vec<FeedbackEvent>>;
}
