//! Service layer: the feedback-to-prompt evolution pipeline.
//!
//! Services orchestrate the domain ports:
//! - `RefinementJudge`: scores raw feedback into refined candidates
//! - `VoiceRuleUpdater`: low-latency per-voice rule path
//! - `EvolutionEngine`: threshold-gated batch synthesis of the global prompt
//! - `PromptContextService`: read side of the active prompt + bootstrap
//! - `FeedbackService`: the submission boundary tying the above together
//! - `RewriteService`: voice-steered generation consuming the evolved prompt
//! - `GuidelineService`: distills voice notes and tone tags into guidelines

pub mod evolution_engine;
pub mod feedback_service;
pub mod guidelines;
pub mod prompt_context;
pub mod refinement_judge;
pub mod rewrite_service;
pub mod voice_rule_updater;

pub use evolution_engine::{EvolutionEngine, EvolutionOutcome};
pub use feedback_service::FeedbackService;
pub use guidelines::GuidelineService;
pub use prompt_context::PromptContextService;
pub use refinement_judge::{JudgeVerdict, RefinementJudge};
pub use rewrite_service::RewriteService;
pub use voice_rule_updater::VoiceRuleUpdater;

/// Extract a JSON payload from an LLM response that may wrap it in markdown
/// code fences or surround it with prose. Returns the innermost candidate
/// string without attempting to parse it.
pub(crate) fn extract_json_from_response(response: &str) -> &str {
    let trimmed = response.trim();

    // Fenced block first: ```json ... ``` or plain ``` ... ```
    if let Some(start) = trimmed.find("```") {
        let after_fence = &trimmed[start + 3..];
        let body = after_fence
            .strip_prefix("json")
            .unwrap_or(after_fence)
            .trim_start();
        if let Some(end) = body.find("```") {
            return body[..end].trim();
        }
    }

    // Otherwise take the outermost braces, tolerating prose on either side.
    if let (Some(start), Some(end)) = (trimmed.find('{'), trimmed.rfind('}')) {
        if start < end {
            return trimmed[start..=end].trim();
        }
    }

    trimmed
}
