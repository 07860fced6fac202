pub mod candidate;
pub mod config;
pub mod feedback;
pub mod prompt_version;
pub mod rewrite;
pub mod voice;

pub use candidate::{
    CandidateStatus, RefinedCandidate, ACCEPTANCE_THRESHOLD, DEFAULT_REJECTION_REASON,
};
pub use config::{Config, DatabaseConfig, EvolutionConfig, LlmConfig, LoggingConfig};
pub use feedback::{FeedbackEvent, FeedbackOutcome, FeedbackRoute, NewFeedback, Sentiment};
pub use prompt_version::{PromptContext, SystemPromptVersion, DEFAULT_SYSTEM_INSTRUCTION};
pub use rewrite::{Platform, Rewrite, RewriteMode, RewriteRequest};
pub use voice::BrandVoice;
