//! Refinement judge: turns raw feedback into a scored, refined candidate.
//!
//! One LLM call per feedback event. The judge strips emotion, generalizes the
//! complaint into an atomic instruction, and scores it 0-100. The acceptance
//! threshold lives in the domain model (`ACCEPTANCE_THRESHOLD`); the judge
//! always persists exactly one candidate per successfully judged event,
//! accepted or rejected.
//!
//! Parsing is fail-closed: a response that is not the expected JSON shape is
//! an `LlmFailed` error, never a silently accepted candidate.

use serde::Deserialize;
use std::sync::Arc;
use tracing::{info, instrument, warn};

use super::extract_json_from_response;
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{FeedbackEvent, RefinedCandidate};
use crate::domain::ports::{CandidateRepository, GenerateRequest, LlmClient};

const JUDGE_SYSTEM_PROMPT: &str = "You are a quality judge for a brand-voice \
writing assistant. You receive one piece of raw user feedback about generated \
copy. Your job:\n\
1. Strip emotion, sarcasm, and filler. Keep only the actionable writing \
instruction, phrased as a single imperative sentence (e.g. \"Avoid emoji \
usage.\").\n\
2. Score the instruction 0-100 for how useful it is as a permanent writing \
rule: specific, actionable, and generalizable scores high; vague venting, \
contradictions, and one-off requests score low.\n\
3. If the score is below 70, give a short rejection reason.\n\
Respond with ONLY a JSON object: {\"refined_text\": string, \
\"quality_score\": number, \"rejection_reason\": string or null}.";

/// Parsed judge verdict. `quality_score` is clamped to 100 on conversion;
/// anything non-numeric or missing fails the parse.
#[derive(Debug, Clone, Deserialize)]
pub struct JudgeVerdict {
    pub refined_text: String,
    pub quality_score: u16,
    #[serde(default)]
    pub rejection_reason: Option<String>,
}

impl JudgeVerdict {
    fn clamped_score(&self) -> u8 {
        u8::try_from(self.quality_score.min(100)).unwrap_or(100)
    }
}

/// Scores raw feedback into refined candidates.
pub struct RefinementJudge {
    llm_client: Arc<dyn LlmClient>,
    candidate_repository: Arc<dyn CandidateRepository>,
}

impl RefinementJudge {
    pub fn new(
        llm_client: Arc<dyn LlmClient>,
        candidate_repository: Arc<dyn CandidateRepository>,
    ) -> Self {
        Self {
            llm_client,
            candidate_repository,
        }
    }

    /// Judge one feedback event and persist the resulting candidate.
    ///
    /// Errors from the LLM call or verdict parsing propagate; in that case no
    /// candidate row is written and the raw event stays judged-less.
    #[instrument(skip(self, event), fields(feedback_id = %event.id))]
    pub async fn judge(&self, event: &FeedbackEvent) -> DomainResult<RefinedCandidate> {
        let prompt = format!(
            "Raw user feedback (sentiment: {}):\n\"{}\"",
            event.sentiment.as_str(),
            event.text
        );

        let mut request = GenerateRequest::structured(prompt);
        request.system = Some(JUDGE_SYSTEM_PROMPT.to_string());

        let response = self.llm_client.generate(request).await?;
        let verdict = Self::parse_verdict(&response.text)?;

        let candidate = RefinedCandidate::from_verdict(
            event.id,
            verdict.refined_text.clone(),
            verdict.clamped_score(),
            verdict.rejection_reason.clone(),
        );

        self.candidate_repository.create(&candidate).await?;

        if candidate.is_accepted() {
            info!(
                candidate_id = %candidate.id,
                score = candidate.quality_score,
                "Feedback accepted as pending candidate"
            );
        } else {
            info!(
                candidate_id = %candidate.id,
                score = candidate.quality_score,
                reason = candidate.rejection_reason.as_deref().unwrap_or(""),
                "Feedback rejected at judging"
            );
        }

        Ok(candidate)
    }

    fn parse_verdict(response_text: &str) -> DomainResult<JudgeVerdict> {
        let json = extract_json_from_response(response_text);
        let verdict: JudgeVerdict = serde_json::from_str(json).map_err(|e| {
            warn!(error = %e, "Judge verdict did not parse");
            DomainError::LlmFailed(format!("unparseable judge verdict: {e}"))
        })?;

        if verdict.refined_text.trim().is_empty() {
            return Err(DomainError::LlmFailed(
                "judge verdict carried empty refined_text".to_string(),
            ));
        }

        Ok(verdict)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::sqlite::{
        create_migrated_test_pool, SqliteCandidateRepository, SqliteFeedbackRepository,
    };
    use crate::domain::models::{CandidateStatus, Sentiment, DEFAULT_REJECTION_REASON};
    use crate::domain::ports::FeedbackRepository;
    use crate::services::test_support::ScriptedLlm;
    use uuid::Uuid;

    async fn persisted_event(pool: &sqlx::SqlitePool, text: &str) -> FeedbackEvent {
        let repo = SqliteFeedbackRepository::new(pool.clone());
        let event = FeedbackEvent::new(Uuid::new_v4(), None, text.to_string(), Sentiment::Negative);
        repo.create(&event).await.unwrap();
        event
    }

    #[tokio::test]
    async fn test_accepted_verdict_persists_pending_candidate() {
        let pool = create_migrated_test_pool().await.unwrap();
        let candidates = Arc::new(SqliteCandidateRepository::new(pool.clone()));
        let llm = Arc::new(ScriptedLlm::new(vec![Ok(
            r#"{"refined_text": "Avoid emoji usage.", "quality_score": 85, "rejection_reason": null}"#
                .to_string(),
        )]));

        let judge = RefinementJudge::new(llm, candidates.clone());
        let event = persisted_event(&pool, "ugh, way too many emojis!!!").await;

        let candidate = judge.judge(&event).await.unwrap();
        assert_eq!(candidate.status, CandidateStatus::Pending);
        assert_eq!(candidate.refined_text, "Avoid emoji usage.");

        let stored = candidates.get(candidate.id).await.unwrap().unwrap();
        assert_eq!(stored.source_feedback_id, event.id);
    }

    #[tokio::test]
    async fn test_below_threshold_persists_rejected_candidate() {
        let pool = create_migrated_test_pool().await.unwrap();
        let candidates = Arc::new(SqliteCandidateRepository::new(pool.clone()));
        let llm = Arc::new(ScriptedLlm::new(vec![Ok(
            r#"{"refined_text": "Make it better.", "quality_score": 30}"#.to_string(),
        )]));

        let judge = RefinementJudge::new(llm, candidates.clone());
        let event = persisted_event(&pool, "this sucks").await;

        let candidate = judge.judge(&event).await.unwrap();
        assert_eq!(candidate.status, CandidateStatus::Rejected);
        assert_eq!(
            candidate.rejection_reason.as_deref(),
            Some(DEFAULT_REJECTION_REASON)
        );
        assert_eq!(candidates.count_pending().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_fenced_verdict_parses() {
        let pool = create_migrated_test_pool().await.unwrap();
        let candidates = Arc::new(SqliteCandidateRepository::new(pool.clone()));
        let llm = Arc::new(ScriptedLlm::new(vec![Ok(
            "```json\n{\"refined_text\": \"Keep sentences short.\", \"quality_score\": 75}\n```"
                .to_string(),
        )]));

        let judge = RefinementJudge::new(llm, candidates);
        let event = persisted_event(&pool, "sentences run on forever").await;

        let candidate = judge.judge(&event).await.unwrap();
        assert!(candidate.is_accepted());
    }

    #[tokio::test]
    async fn test_unparseable_verdict_writes_no_candidate() {
        let pool = create_migrated_test_pool().await.unwrap();
        let candidates = Arc::new(SqliteCandidateRepository::new(pool.clone()));
        let llm = Arc::new(ScriptedLlm::new(vec![Ok("I refuse to emit JSON".to_string())]));

        let judge = RefinementJudge::new(llm, candidates.clone());
        let event = persisted_event(&pool, "too formal").await;

        let err = judge.judge(&event).await.unwrap_err();
        assert!(matches!(err, DomainError::LlmFailed(_)));
        assert!(candidates
            .get_by_source_feedback(event.id)
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_out_of_range_score_clamps_to_100() {
        let pool = create_migrated_test_pool().await.unwrap();
        let candidates = Arc::new(SqliteCandidateRepository::new(pool.clone()));
        let llm = Arc::new(ScriptedLlm::new(vec![Ok(
            r#"{"refined_text": "Use active voice.", "quality_score": 120}"#.to_string(),
        )]));

        let judge = RefinementJudge::new(llm, candidates);
        let event = persisted_event(&pool, "so passive").await;

        let candidate = judge.judge(&event).await.unwrap();
        assert_eq!(candidate.quality_score, 100);
        assert!(candidate.is_accepted());
    }
}
