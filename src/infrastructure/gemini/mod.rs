//! Gemini API integration.
//!
//! Provides the `LlmClient` implementation used in production, with typed
//! errors and a retry policy for transient failures.

pub mod client;
pub mod error;
pub mod retry;

pub use client::{GeminiClient, GeminiClientConfig};
pub use error::GeminiApiError;
pub use retry::RetryPolicy;
