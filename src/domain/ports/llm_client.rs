//! LLM text-generation port.
//!
//! The domain depends on this trait, not on a concrete provider. The
//! production adapter (`infrastructure::gemini`) speaks the Gemini HTTP API;
//! tests inject scripted mocks.
//!
//! Implementations must be `Send + Sync`; methods take `&self` so callers can
//! issue concurrent requests without mutable state.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::errors::DomainResult;

/// A single text-generation request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateRequest {
    /// User-facing prompt body.
    pub prompt: String,

    /// Optional system instruction prepended by the provider.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,

    /// Ask the provider for a JSON response. Callers must still parse
    /// defensively; providers are not trusted to honor this.
    #[serde(default)]
    pub json_mode: bool,

    /// Sampling temperature (0.0 to 1.0).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,

    /// Maximum tokens to generate.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

impl GenerateRequest {
    /// Plain-text request with provider defaults.
    pub fn text(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            system: None,
            json_mode: false,
            temperature: None,
            max_tokens: None,
        }
    }

    /// JSON-mode request with a low temperature, used for structured
    /// judge/synthesis calls where determinism matters more than flair.
    pub fn structured(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            system: None,
            json_mode: true,
            temperature: Some(0.2),
            max_tokens: None,
        }
    }
}

/// A completed generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateResponse {
    /// Full generated text.
    pub text: String,
}

/// Port trait for LLM text generation.
///
/// Every call is a blocking-from-the-caller's-perspective network round trip
/// and may fail or time out; callers must not hold exclusive resources across
/// an invocation.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Generate text for the given request.
    async fn generate(&self, request: GenerateRequest) -> DomainResult<GenerateResponse>;
}
