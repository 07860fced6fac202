//! Per-voice rule updater: the low-latency feedback path.
//!
//! Negative feedback tied to a voice-linked rewrite updates that voice's
//! learned rules directly, without waiting for the global batch. The judge's
//! refined text is the canonical rule and is appended verbatim; the one LLM
//! call here only gates whether the feedback expresses a durable preference
//! for this voice at all, so one-off content complaints never pollute the
//! rule list.

use serde::Deserialize;
use std::sync::Arc;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use super::extract_json_from_response;
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::FeedbackEvent;
use crate::domain::ports::{GenerateRequest, LlmClient, VoiceRepository};

const APPLICABILITY_SYSTEM_PROMPT: &str = "You decide whether a piece of user \
feedback about generated copy expresses a durable stylistic preference that \
should permanently shape one brand voice. One-off content complaints (wrong \
facts, wrong topic, typos) do not qualify; tone, phrasing, formatting, and \
vocabulary preferences do. Respond with ONLY a JSON object: \
{\"applies_to_voice\": boolean}.";

#[derive(Debug, Deserialize)]
struct ApplicabilityVerdict {
    applies_to_voice: bool,
}

/// Applies accepted feedback to a single brand voice's learned rules.
pub struct VoiceRuleUpdater {
    llm_client: Arc<dyn LlmClient>,
    voice_repository: Arc<dyn VoiceRepository>,
}

impl VoiceRuleUpdater {
    pub fn new(llm_client: Arc<dyn LlmClient>, voice_repository: Arc<dyn VoiceRepository>) -> Self {
        Self {
            llm_client,
            voice_repository,
        }
    }

    /// Apply a judged feedback event to one voice.
    ///
    /// `refined_rule` is the judge's refined text; it is appended verbatim
    /// when the applicability gate passes. Returns `true` when the rule list
    /// grew, `false` when the gate rejected the feedback or the rule was
    /// already present.
    #[instrument(skip(self, event, refined_rule), fields(voice_id = %voice_id, feedback_id = %event.id))]
    pub async fn apply(
        &self,
        voice_id: Uuid,
        event: &FeedbackEvent,
        refined_rule: &str,
    ) -> DomainResult<bool> {
        let prompt = format!("User feedback:\n\"{}\"", event.text);
        let mut request = GenerateRequest::structured(prompt);
        request.system = Some(APPLICABILITY_SYSTEM_PROMPT.to_string());

        let response = self.llm_client.generate(request).await?;
        let json = extract_json_from_response(&response.text);
        let verdict: ApplicabilityVerdict = serde_json::from_str(json).map_err(|e| {
            warn!(error = %e, "Applicability verdict did not parse");
            DomainError::LlmFailed(format!("unparseable applicability verdict: {e}"))
        })?;

        if !verdict.applies_to_voice {
            info!("Feedback not applicable to voice, skipping rule append");
            return Ok(false);
        }

        let appended = self
            .voice_repository
            .append_learned_rule(voice_id, refined_rule)
            .await?;

        if appended {
            info!(rule = refined_rule, "Learned rule appended to voice");
        } else {
            info!(rule = refined_rule, "Learned rule already present, no-op");
        }

        Ok(appended)
    }
}
