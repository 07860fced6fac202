//! Feedback submission boundary.
//!
//! One entry point ties the pipeline together: validate, persist the raw
//! event, judge it, route the accepted candidate to the per-voice fast path
//! and/or the global batch, and answer the user with a generic thank-you.
//! Internal rejection is invisible to the submitter; infrastructure failures
//! anywhere in the pipeline surface as errors.

use std::sync::Arc;
use tracing::instrument;

use super::evolution_engine::EvolutionEngine;
use super::refinement_judge::RefinementJudge;
use super::voice_rule_updater::VoiceRuleUpdater;
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{
    FeedbackEvent, FeedbackOutcome, FeedbackRoute, NewFeedback, Rewrite, Sentiment,
};
use crate::domain::ports::{FeedbackRepository, RewriteRepository};

const THANK_YOU_MESSAGE: &str = "Thanks! Your feedback helps us improve.";
const MAX_FEEDBACK_CHARS: usize = 4_000;

/// Orchestrates the full feedback pipeline behind one boundary call.
pub struct FeedbackService {
    feedback_repository: Arc<dyn FeedbackRepository>,
    rewrite_repository: Arc<dyn RewriteRepository>,
    judge: Arc<RefinementJudge>,
    voice_rule_updater: Arc<VoiceRuleUpdater>,
    evolution_engine: Arc<EvolutionEngine>,
}

impl FeedbackService {
    pub fn new(
        feedback_repository: Arc<dyn FeedbackRepository>,
        rewrite_repository: Arc<dyn RewriteRepository>,
        judge: Arc<RefinementJudge>,
        voice_rule_updater: Arc<VoiceRuleUpdater>,
        evolution_engine: Arc<EvolutionEngine>,
    ) -> Self {
        Self {
            feedback_repository,
            rewrite_repository,
            judge,
            voice_rule_updater,
            evolution_engine,
        }
    }

    /// Submit one piece of feedback.
    ///
    /// The raw event is persisted before the judge runs, so an upstream AI
    /// failure still leaves the event on record. Rejection by the judge is an
    /// `Ok` outcome with the same message an acceptance gets; the submitter
    /// never learns the internal verdict. Failures downstream of the judge
    /// propagate too: already-persisted rows stay put, but the caller sees
    /// the error rather than a thank-you.
    #[instrument(skip(self, new_feedback), fields(user_id = %new_feedback.user_id))]
    pub async fn submit_feedback(&self, new_feedback: NewFeedback) -> DomainResult<FeedbackOutcome> {
        let rewrite = self.validate(&new_feedback).await?;

        let event = FeedbackEvent::new(
            new_feedback.user_id,
            new_feedback.rewrite_id,
            new_feedback.text.trim().to_string(),
            new_feedback.sentiment(),
        );
        self.feedback_repository.create(&event).await?;

        let candidate = self.judge.judge(&event).await?;

        if candidate.is_accepted() {
            let route = Self::route(&event, rewrite.as_ref());

            if route.includes_voice() {
                let voice_id = rewrite
                    .as_ref()
                    .and_then(|r| r.brand_voice_id)
                    .ok_or_else(|| {
                        DomainError::ValidationFailed("voice route without voice".into())
                    })?;
                self.voice_rule_updater
                    .apply(voice_id, &event, &candidate.refined_text)
                    .await?;
            }

            if route.includes_global() {
                // A failed batch run leaves its candidates pending for the
                // next trigger; the caller still sees the error.
                self.evolution_engine.maybe_evolve().await?;
            }
        }

        Ok(FeedbackOutcome {
            accepted: candidate.is_accepted(),
            message: THANK_YOU_MESSAGE.to_string(),
        })
    }

    /// Resolve and check the referenced rewrite, if any.
    async fn validate(&self, new_feedback: &NewFeedback) -> DomainResult<Option<Rewrite>> {
        let text = new_feedback.text.trim();
        if text.is_empty() {
            return Err(DomainError::ValidationFailed(
                "feedback text must not be empty".to_string(),
            ));
        }
        if text.chars().count() > MAX_FEEDBACK_CHARS {
            return Err(DomainError::ValidationFailed(format!(
                "feedback text exceeds {MAX_FEEDBACK_CHARS} characters"
            )));
        }

        match new_feedback.rewrite_id {
            None => Ok(None),
            Some(rewrite_id) => {
                let rewrite = self
                    .rewrite_repository
                    .get(rewrite_id)
                    .await?
                    .filter(|r| r.user_id == new_feedback.user_id)
                    .ok_or(DomainError::RewriteNotFound(rewrite_id))?;
                Ok(Some(rewrite))
            }
        }
    }

    /// Negative feedback on a voice-linked rewrite takes both paths;
    /// everything else only feeds the global batch.
    fn route(event: &FeedbackEvent, rewrite: Option<&Rewrite>) -> FeedbackRoute {
        let voice_linked = rewrite.is_some_and(|r| r.brand_voice_id.is_some());
        if event.sentiment == Sentiment::Negative && voice_linked {
            FeedbackRoute::Both
        } else {
            FeedbackRoute::Global
        }
    }
}
