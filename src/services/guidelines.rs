//! Distills raw voice notes and tone keywords into writing guidelines.
//!
//! Stateless LLM plumbing used when a voice is created or edited; the caller
//! stores the result on the voice record.

use std::sync::Arc;
use tracing::instrument;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::ports::{GenerateRequest, LlmClient};

const GUIDELINES_SYSTEM_PROMPT: &str = "You turn a founder's rough notes about \
how their brand should sound into concise writing guidelines. Output 4-8 short \
bullet points covering voice, vocabulary, sentence rhythm, and what to avoid. \
Output only the bullet points.";

/// Generates brand voice guidelines from notes and tone keywords.
pub struct GuidelineService {
    llm_client: Arc<dyn LlmClient>,
}

impl GuidelineService {
    pub fn new(llm_client: Arc<dyn LlmClient>) -> Self {
        Self { llm_client }
    }

    #[instrument(skip(self, notes, tone_keywords))]
    pub async fn generate_guidelines(
        &self,
        notes: &str,
        tone_keywords: &[String],
    ) -> DomainResult<String> {
        if notes.trim().is_empty() {
            return Err(DomainError::ValidationFailed(
                "voice notes must not be empty".to_string(),
            ));
        }

        let tone = if tone_keywords.is_empty() {
            "standard".to_string()
        } else {
            tone_keywords.join(", ")
        };
        let prompt = format!("Notes:\n{}\n\nTone keywords: {tone}", notes.trim());

        let mut request = GenerateRequest::text(prompt);
        request.system = Some(GUIDELINES_SYSTEM_PROMPT.to_string());
        request.temperature = Some(0.4);

        let response = self.llm_client.generate(request).await?;
        Ok(response.text.trim().to_string())
    }
}
