//! Generation-time consumer of the evolved prompt.
//!
//! Builds the full generation prompt from, in order: the active system prompt
//! content and instruction list, the voice's guidelines, tone tags, and
//! learned rules, then a mode- and platform-specific task. Every generation
//! is persisted as a `Rewrite` row so later feedback can reference it.

use std::sync::Arc;
use tracing::{info, instrument};
use uuid::Uuid;

use super::prompt_context::PromptContextService;
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{BrandVoice, Platform, PromptContext, Rewrite, RewriteMode, RewriteRequest};
use crate::domain::ports::{GenerateRequest, LlmClient, RewriteRepository, VoiceRepository};

const MAX_INPUT_CHARS: usize = 10_000;

/// Voice-steered copy generation.
pub struct RewriteService {
    llm_client: Arc<dyn LlmClient>,
    voice_repository: Arc<dyn VoiceRepository>,
    rewrite_repository: Arc<dyn RewriteRepository>,
    prompt_context: Arc<PromptContextService>,
}

impl RewriteService {
    pub fn new(
        llm_client: Arc<dyn LlmClient>,
        voice_repository: Arc<dyn VoiceRepository>,
        rewrite_repository: Arc<dyn RewriteRepository>,
        prompt_context: Arc<PromptContextService>,
    ) -> Self {
        Self {
            llm_client,
            voice_repository,
            rewrite_repository,
            prompt_context,
        }
    }

    /// Generate and persist one rewrite for the given user.
    ///
    /// The voice must belong to the requesting user; a foreign voice reads as
    /// not-found rather than forbidden.
    #[instrument(skip(self, request), fields(user_id = %user_id, voice_id = %request.brand_voice_id))]
    pub async fn create_rewrite(
        &self,
        user_id: Uuid,
        request: RewriteRequest,
    ) -> DomainResult<Rewrite> {
        let text = request.original_text.trim();
        if text.is_empty() {
            return Err(DomainError::ValidationFailed(
                "original text must not be empty".to_string(),
            ));
        }
        if text.chars().count() > MAX_INPUT_CHARS {
            return Err(DomainError::ValidationFailed(format!(
                "original text exceeds {MAX_INPUT_CHARS} characters"
            )));
        }

        let voice = self
            .voice_repository
            .get(request.brand_voice_id)
            .await?
            .filter(|v| v.user_id == user_id)
            .ok_or(DomainError::VoiceNotFound(request.brand_voice_id))?;

        let context = self.prompt_context.active_prompt_context().await?;
        let system = build_system_prompt(&context, &voice, request.platform);
        let task = build_task(text, request.mode);

        let mut generate = GenerateRequest::text(task);
        generate.system = Some(system);
        generate.temperature = Some(0.7);

        let response = self.llm_client.generate(generate).await?;

        let rewrite = Rewrite::new(
            user_id,
            Some(voice.id),
            text.to_string(),
            response.text.trim().to_string(),
        );
        self.rewrite_repository.create(&rewrite).await?;

        info!(rewrite_id = %rewrite.id, mode = ?request.mode, "Rewrite persisted");
        Ok(rewrite)
    }
}

fn build_system_prompt(context: &PromptContext, voice: &BrandVoice, platform: Platform) -> String {
    let mut sections = vec![context.content.clone()];

    if !context.instruction_list.is_empty() {
        sections.push(format!(
            "Standing instructions:\n{}",
            bullet_list(&context.instruction_list)
        ));
    }

    sections.push(format!("Brand voice guidelines:\n{}", voice.guidelines));
    sections.push(format!("Tone: {}", voice.tone_label()));

    if !voice.learned_rules.is_empty() {
        sections.push(format!(
            "Rules this voice has learned from feedback (always follow):\n{}",
            bullet_list(&voice.learned_rules)
        ));
    }

    sections.push(platform_addendum(platform).to_string());
    sections.join("\n\n")
}

fn build_task(text: &str, mode: RewriteMode) -> String {
    match mode {
        RewriteMode::Enhance => format!(
            "Rewrite the following text in the brand voice. Return only the \
rewritten text.\n\n{text}"
        ),
        RewriteMode::Generate => format!(
            "Write a new post about the following topic in the brand voice. \
Return only the post.\n\n{text}"
        ),
    }
}

fn platform_addendum(platform: Platform) -> &'static str {
    match platform {
        Platform::Twitter => {
            "Platform: Twitter/X. Stay under 280 characters, open with a strong \
hook, and use hashtags sparingly if at all."
        }
        Platform::Linkedin => {
            "Platform: LinkedIn. A professional but personable register; short \
paragraphs; no hashtag walls."
        }
        Platform::General => "Platform: general. No platform-specific constraints.",
    }
}

fn bullet_list(items: &[String]) -> String {
    items
        .iter()
        .map(|item| format!("- {item}"))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::sqlite::{
        create_migrated_test_pool, SqlitePromptVersionRepository, SqliteRewriteRepository,
        SqliteVoiceRepository,
    };
    use crate::domain::models::SystemPromptVersion;
    use crate::domain::ports::PromptVersionRepository;
    use crate::services::test_support::ScriptedLlm;

    async fn service(pool: &sqlx::SqlitePool, llm: Arc<ScriptedLlm>) -> RewriteService {
        RewriteService::new(
            llm,
            Arc::new(SqliteVoiceRepository::new(pool.clone())),
            Arc::new(SqliteRewriteRepository::new(pool.clone())),
            Arc::new(PromptContextService::new(Arc::new(
                SqlitePromptVersionRepository::new(pool.clone()),
            ))),
        )
    }

    async fn seeded_voice(pool: &sqlx::SqlitePool, user_id: Uuid) -> BrandVoice {
        let repo = SqliteVoiceRepository::new(pool.clone());
        let mut voice = BrandVoice::new(
            user_id,
            "launch".into(),
            "short punchy sentences".into(),
            vec!["bold".into()],
        );
        voice.learned_rules = vec!["Avoid emoji usage.".into()];
        repo.create(&voice).await.unwrap();
        voice
    }

    #[tokio::test]
    async fn test_rewrite_persists_and_injects_voice_material() {
        let pool = create_migrated_test_pool().await.unwrap();
        let llm = Arc::new(ScriptedLlm::always("Shipped. Try it today."));
        let user_id = Uuid::new_v4();
        let voice = seeded_voice(&pool, user_id).await;

        let versions = SqlitePromptVersionRepository::new(pool.clone());
        versions
            .create_version(&SystemPromptVersion::new(
                "be clear".into(),
                vec!["Keep sentences short.".into()],
            ))
            .await
            .unwrap();

        let svc = service(&pool, llm.clone()).await;
        let rewrite = svc
            .create_rewrite(
                user_id,
                RewriteRequest {
                    brand_voice_id: voice.id,
                    original_text: "we released the thing".into(),
                    mode: RewriteMode::Enhance,
                    platform: Platform::Twitter,
                },
            )
            .await
            .unwrap();

        assert_eq!(rewrite.rewritten_text, "Shipped. Try it today.");
        assert_eq!(rewrite.brand_voice_id, Some(voice.id));

        let stored = SqliteRewriteRepository::new(pool.clone())
            .get(rewrite.id)
            .await
            .unwrap();
        assert!(stored.is_some());

        let prompts = llm.prompts.lock().unwrap();
        let system = prompts[0].system.as_deref().unwrap();
        assert!(system.contains("be clear"));
        assert!(system.contains("Keep sentences short."));
        assert!(system.contains("short punchy sentences"));
        assert!(system.contains("Tone: bold"));
        assert!(system.contains("Avoid emoji usage."));
        assert!(system.contains("280 characters"));
    }

    #[tokio::test]
    async fn test_generate_mode_uses_topic_task() {
        let pool = create_migrated_test_pool().await.unwrap();
        let llm = Arc::new(ScriptedLlm::always("A post."));
        let user_id = Uuid::new_v4();
        let voice = seeded_voice(&pool, user_id).await;

        let svc = service(&pool, llm.clone()).await;
        svc.create_rewrite(
            user_id,
            RewriteRequest {
                brand_voice_id: voice.id,
                original_text: "our new pricing".into(),
                mode: RewriteMode::Generate,
                platform: Platform::General,
            },
        )
        .await
        .unwrap();

        let prompts = llm.prompts.lock().unwrap();
        assert!(prompts[0].prompt.contains("new post about"));
    }

    #[tokio::test]
    async fn test_foreign_voice_reads_as_not_found() {
        let pool = create_migrated_test_pool().await.unwrap();
        let llm = Arc::new(ScriptedLlm::new(vec![]));
        let owner = Uuid::new_v4();
        let voice = seeded_voice(&pool, owner).await;

        let svc = service(&pool, llm).await;
        let err = svc
            .create_rewrite(
                Uuid::new_v4(),
                RewriteRequest {
                    brand_voice_id: voice.id,
                    original_text: "hello".into(),
                    mode: RewriteMode::Enhance,
                    platform: Platform::Twitter,
                },
            )
            .await
            .unwrap_err();

        assert!(matches!(err, DomainError::VoiceNotFound(id) if id == voice.id));
    }

    #[tokio::test]
    async fn test_empty_input_is_rejected() {
        let pool = create_migrated_test_pool().await.unwrap();
        let svc = service(&pool, Arc::new(ScriptedLlm::new(vec![]))).await;

        let err = svc
            .create_rewrite(
                Uuid::new_v4(),
                RewriteRequest {
                    brand_voice_id: Uuid::new_v4(),
                    original_text: "  ".into(),
                    mode: RewriteMode::Enhance,
                    platform: Platform::Twitter,
                },
            )
            .await
            .unwrap_err();

        assert!(matches!(err, DomainError::ValidationFailed(_)));
    }
}
