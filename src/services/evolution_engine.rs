//! Batch evolution engine: synthesizes pending candidates into a new active
//! system prompt version.
//!
//! Evolution is threshold-gated: nothing happens until enough accepted
//! candidates have accumulated. A run snapshots the pending set, makes one
//! synthesis LLM call, and commits atomically through
//! `PromptVersionRepository::commit_evolution`; the commit claims exactly the
//! snapshot IDs, so a concurrent run that got there first makes this one a
//! clean no-op instead of double-implementing feedback.
//!
//! An in-process mutex serializes runs sharing this engine instance. The
//! database-side claim in `commit_evolution` is what protects against other
//! processes; no database lock is held across the LLM call.

use serde::Deserialize;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use super::extract_json_from_response;
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{PromptContext, RefinedCandidate, SystemPromptVersion};
use crate::domain::ports::{
    CandidateRepository, GenerateRequest, LlmClient, PromptVersionRepository,
};

const SYNTHESIS_SYSTEM_PROMPT: &str = "You maintain the instruction list of a \
shared system prompt for a brand-voice writing assistant. You receive the \
current instruction list and a batch of new candidate instructions distilled \
from user feedback. Produce the updated list:\n\
- Merge near-duplicates into one instruction.\n\
- When candidates conflict with existing instructions or each other, prefer \
the newer candidate (candidates are listed oldest first).\n\
- Keep every instruction atomic, imperative, and general.\n\
- Never drop an existing instruction unless a candidate supersedes it.\n\
Respond with ONLY a JSON object: {\"instruction_list\": [string, ...], \
\"content\": string}. Include \"content\" only when the base prompt text \
itself needs revision; omit it to keep the current text.";

#[derive(Debug, Deserialize)]
struct SynthesisOutput {
    instruction_list: Vec<String>,
    #[serde(default)]
    content: Option<String>,
}

/// Result of one evolution attempt.
#[derive(Debug)]
pub enum EvolutionOutcome {
    /// Not enough pending candidates to justify a synthesis call.
    BelowThreshold { pending: u64 },
    /// A new version was activated and the snapshot marked implemented.
    Evolved {
        version: SystemPromptVersion,
        implemented: usize,
    },
    /// A concurrent evolution claimed part of the snapshot first; nothing was
    /// written.
    LostRace,
}

/// Threshold-gated batch synthesis of the global system prompt.
pub struct EvolutionEngine {
    llm_client: Arc<dyn LlmClient>,
    candidate_repository: Arc<dyn CandidateRepository>,
    version_repository: Arc<dyn PromptVersionRepository>,
    batch_threshold: u64,
    run_lock: Mutex<()>,
}

impl EvolutionEngine {
    pub fn new(
        llm_client: Arc<dyn LlmClient>,
        candidate_repository: Arc<dyn CandidateRepository>,
        version_repository: Arc<dyn PromptVersionRepository>,
        batch_threshold: u64,
    ) -> Self {
        Self {
            llm_client,
            candidate_repository,
            version_repository,
            batch_threshold,
            run_lock: Mutex::new(()),
        }
    }

    /// Run an evolution if the pending count has reached the threshold.
    ///
    /// Called after every accepted candidate; cheap when below threshold
    /// (a single COUNT query).
    #[instrument(skip(self))]
    pub async fn maybe_evolve(&self) -> DomainResult<EvolutionOutcome> {
        let pending = self.candidate_repository.count_pending().await?;
        if pending < self.batch_threshold {
            return Ok(EvolutionOutcome::BelowThreshold { pending });
        }

        let _guard = self.run_lock.lock().await;

        // Re-check under the lock: the run we queued behind may have already
        // consumed the batch.
        let pending = self.candidate_repository.count_pending().await?;
        if pending < self.batch_threshold {
            return Ok(EvolutionOutcome::BelowThreshold { pending });
        }

        self.evolve_once().await
    }

    async fn evolve_once(&self) -> DomainResult<EvolutionOutcome> {
        let snapshot = self.candidate_repository.list_pending().await?;
        let snapshot_ids: Vec<Uuid> = snapshot.iter().map(|c| c.id).collect();

        let context = match self.version_repository.get_active().await? {
            Some(version) => PromptContext::from(&version),
            None => PromptContext::default_context(),
        };

        let output = self.synthesize(&context, &snapshot).await?;
        let content = output.content.unwrap_or(context.content);
        let version = SystemPromptVersion::new(content, output.instruction_list);

        match self
            .version_repository
            .commit_evolution(&version, &snapshot_ids)
            .await
        {
            Ok(()) => {
                info!(
                    version_id = %version.id,
                    implemented = snapshot_ids.len(),
                    instructions = version.instruction_list.len(),
                    "Evolution committed"
                );
                Ok(EvolutionOutcome::Evolved {
                    implemented: snapshot_ids.len(),
                    version,
                })
            }
            Err(DomainError::ConcurrencyConflict { entity, id }) => {
                warn!(entity = %entity, id = %id, "Evolution lost the commit race, discarding synthesis");
                Ok(EvolutionOutcome::LostRace)
            }
            Err(other) => Err(other),
        }
    }

    async fn synthesize(
        &self,
        context: &PromptContext,
        candidates: &[RefinedCandidate],
    ) -> DomainResult<SynthesisOutput> {
        let current = if context.instruction_list.is_empty() {
            "(none)".to_string()
        } else {
            numbered(&context.instruction_list)
        };
        let incoming = numbered(
            &candidates
                .iter()
                .map(|c| c.refined_text.clone())
                .collect::<Vec<_>>(),
        );

        let prompt = format!(
            "Current system prompt:\n{}\n\nCurrent instruction list:\n{current}\n\n\
New candidate instructions (oldest first):\n{incoming}",
            context.content
        );
        let mut request = GenerateRequest::structured(prompt);
        request.system = Some(SYNTHESIS_SYSTEM_PROMPT.to_string());

        let response = self.llm_client.generate(request).await?;
        let json = extract_json_from_response(&response.text);
        let output: SynthesisOutput = serde_json::from_str(json).map_err(|e| {
            warn!(error = %e, "Synthesis output did not parse");
            DomainError::LlmFailed(format!("unparseable synthesis output: {e}"))
        })?;

        if output.instruction_list.is_empty() {
            return Err(DomainError::LlmFailed(
                "synthesis produced an empty instruction list".to_string(),
            ));
        }

        Ok(output)
    }
}

fn numbered(items: &[String]) -> String {
    items
        .iter()
        .enumerate()
        .map(|(i, item)| format!("{}. {}", i + 1, item))
        .collect::<Vec<_>>()
        .join("\n")
}
