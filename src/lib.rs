//! VoiceForge - Feedback-Driven Prompt Evolution Engine
//!
//! VoiceForge turns raw user feedback on generated copy into durable prompt
//! improvements: a judge refines and scores each piece of feedback, accepted
//! candidates update the originating brand voice immediately, and batches of
//! accepted candidates are synthesized into new versions of the shared system
//! prompt.
//!
//! # Architecture
//!
//! This crate follows Hexagonal Architecture principles:
//!
//! - **Domain Layer** (`domain`): Models, port traits, and domain errors
//! - **Service Layer** (`services`): The feedback/evolution/generation pipeline
//! - **Adapters** (`adapters`): SQLite persistence behind the repository ports
//! - **Infrastructure Layer** (`infrastructure`): Config, logging, Gemini API
//!
//! # Example
//!
//! ```ignore
//! use voiceforge::adapters::sqlite::initialize_database;
//! use voiceforge::infrastructure::config::ConfigLoader;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = ConfigLoader::load()?;
//!     let pool = initialize_database(&config.database.url(), config.database.max_connections).await?;
//!     // Wire repositories and services from the pool
//!     Ok(())
//! }
//! ```

pub mod adapters;
pub mod domain;
pub mod infrastructure;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::errors::{DomainError, DomainResult};
pub use domain::models::{
    BrandVoice, CandidateStatus, Config, DatabaseConfig, EvolutionConfig, FeedbackEvent,
    FeedbackOutcome, FeedbackRoute, LlmConfig, LoggingConfig, NewFeedback, Platform,
    PromptContext, RefinedCandidate, Rewrite, RewriteMode, RewriteRequest, Sentiment,
    SystemPromptVersion, ACCEPTANCE_THRESHOLD, DEFAULT_SYSTEM_INSTRUCTION,
};
pub use domain::ports::{
    CandidateRepository, FeedbackRepository, GenerateRequest, GenerateResponse, LlmClient,
    PromptVersionRepository, RewriteRepository, VoiceRepository,
};
pub use infrastructure::config::{ConfigError, ConfigLoader};
pub use infrastructure::gemini::{GeminiClient, GeminiClientConfig};
pub use services::{
    EvolutionEngine, EvolutionOutcome, FeedbackService, GuidelineService, PromptContextService,
    RefinementJudge, RewriteService, VoiceRuleUpdater,
};
