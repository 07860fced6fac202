//! Shared test helpers: scripted LLM and a fully wired service stack over an
//! in-memory migrated database.
#![allow(dead_code)]

use async_trait::async_trait;
use sqlx::SqlitePool;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use voiceforge::adapters::sqlite::{
    create_migrated_test_pool, SqliteCandidateRepository, SqliteFeedbackRepository,
    SqlitePromptVersionRepository, SqliteRewriteRepository, SqliteVoiceRepository,
};
use voiceforge::{
    DomainError, DomainResult, EvolutionEngine, FeedbackService, GenerateRequest,
    GenerateResponse, LlmClient, PromptContextService, RefinementJudge, VoiceRuleUpdater,
};

/// Scripted LLM: pops queued responses in order and records every request.
pub struct ScriptedLlm {
    responses: Mutex<VecDeque<DomainResult<String>>>,
    pub requests: Mutex<Vec<GenerateRequest>>,
}

impl ScriptedLlm {
    pub fn new(responses: Vec<DomainResult<String>>) -> Self {
        Self {
            responses: Mutex::new(responses.into_iter().collect()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn push(&self, response: DomainResult<String>) {
        self.responses.lock().unwrap().push_back(response);
    }
}

#[async_trait]
impl LlmClient for ScriptedLlm {
    async fn generate(&self, request: GenerateRequest) -> DomainResult<GenerateResponse> {
        self.requests.lock().unwrap().push(request);
        let next = self
            .responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(DomainError::LlmFailed("script exhausted".into())));
        next.map(|text| GenerateResponse { text })
    }
}

/// A fully wired pipeline over one in-memory database.
pub struct Stack {
    pub pool: SqlitePool,
    pub llm: Arc<ScriptedLlm>,
    pub feedback_service: FeedbackService,
    pub prompt_context: Arc<PromptContextService>,
    pub feedback_repo: Arc<SqliteFeedbackRepository>,
    pub candidate_repo: Arc<SqliteCandidateRepository>,
    pub voice_repo: Arc<SqliteVoiceRepository>,
    pub rewrite_repo: Arc<SqliteRewriteRepository>,
    pub version_repo: Arc<SqlitePromptVersionRepository>,
}

/// Wire the full pipeline with the given scripted responses and batch
/// threshold.
pub async fn stack(responses: Vec<DomainResult<String>>, batch_threshold: u64) -> Stack {
    let pool = create_migrated_test_pool()
        .await
        .expect("failed to create test pool");
    let llm = Arc::new(ScriptedLlm::new(responses));

    let feedback_repo = Arc::new(SqliteFeedbackRepository::new(pool.clone()));
    let candidate_repo = Arc::new(SqliteCandidateRepository::new(pool.clone()));
    let voice_repo = Arc::new(SqliteVoiceRepository::new(pool.clone()));
    let rewrite_repo = Arc::new(SqliteRewriteRepository::new(pool.clone()));
    let version_repo = Arc::new(SqlitePromptVersionRepository::new(pool.clone()));

    let judge = Arc::new(RefinementJudge::new(llm.clone(), candidate_repo.clone()));
    let updater = Arc::new(VoiceRuleUpdater::new(llm.clone(), voice_repo.clone()));
    let engine = Arc::new(EvolutionEngine::new(
        llm.clone(),
        candidate_repo.clone(),
        version_repo.clone(),
        batch_threshold,
    ));
    let prompt_context = Arc::new(PromptContextService::new(version_repo.clone()));

    let feedback_service = FeedbackService::new(
        feedback_repo.clone(),
        rewrite_repo.clone(),
        judge,
        updater,
        engine,
    );

    Stack {
        pool,
        llm,
        feedback_service,
        prompt_context,
        feedback_repo,
        candidate_repo,
        voice_repo,
        rewrite_repo,
        version_repo,
    }
}

/// Judge verdict JSON accepting the given rule with the given score.
pub fn verdict(rule: &str, score: u8) -> String {
    format!(r#"{{"refined_text": "{rule}", "quality_score": {score}}}"#)
}

/// Applicability verdict JSON for the voice path.
pub fn applicability(applies: bool) -> String {
    format!(r#"{{"applies_to_voice": {applies}}}"#)
}

/// Synthesis output JSON with the given instruction list.
pub fn synthesis(rules: &[&str]) -> String {
    let quoted: Vec<String> = rules.iter().map(|r| format!("\"{r}\"")).collect();
    format!(r#"{{"instruction_list": [{}]}}"#, quoted.join(", "))
}
