//! Port trait definitions (Hexagonal Architecture)
//!
//! Async trait interfaces that infrastructure adapters implement:
//! - Repositories: feedback events, refined candidates, prompt versions,
//!   brand voices, rewrites
//! - `LlmClient`: text-generation provider
//!
//! These contracts keep the domain independent of sqlx and reqwest.

pub mod candidate_repository;
pub mod feedback_repository;
pub mod llm_client;
pub mod prompt_version_repository;
pub mod rewrite_repository;
pub mod voice_repository;

pub use candidate_repository::CandidateRepository;
pub use feedback_repository::FeedbackRepository;
pub use llm_client::{GenerateRequest, GenerateResponse, LlmClient};
pub use prompt_version_repository::PromptVersionRepository;
pub use rewrite_repository::RewriteRepository;
pub use voice_repository::VoiceRepository;
