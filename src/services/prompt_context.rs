//! Read side of the shared system prompt, plus first-run bootstrap.

use std::sync::Arc;
use tracing::{info, instrument};

use crate::domain::errors::DomainResult;
use crate::domain::models::{PromptContext, SystemPromptVersion};
use crate::domain::ports::PromptVersionRepository;

/// Serves the active prompt context and seeds the first version.
pub struct PromptContextService {
    version_repository: Arc<dyn PromptVersionRepository>,
}

impl PromptContextService {
    pub fn new(version_repository: Arc<dyn PromptVersionRepository>) -> Self {
        Self { version_repository }
    }

    /// The prompt context every generation starts from. Falls back to the
    /// compiled-in default when no version has been persisted yet, so reads
    /// never fail on an empty table.
    pub async fn active_prompt_context(&self) -> DomainResult<PromptContext> {
        match self.version_repository.get_active().await? {
            Some(version) => Ok(PromptContext::from(&version)),
            None => Ok(PromptContext::default_context()),
        }
    }

    /// Persist the bootstrap version if the table is empty. Idempotent:
    /// a second call observes the existing active version and does nothing.
    #[instrument(skip(self))]
    pub async fn bootstrap(&self) -> DomainResult<SystemPromptVersion> {
        if let Some(existing) = self.version_repository.get_active().await? {
            return Ok(existing);
        }

        let version = SystemPromptVersion::bootstrap();
        self.version_repository.create_version(&version).await?;
        info!(version_id = %version.id, "Bootstrapped initial system prompt version");
        Ok(version)
    }
}
