//! HTTP client for the Gemini `generateContent` API.
//!
//! Implements the `LlmClient` port with connection pooling, a request
//! timeout, and exponential-backoff retries for transient errors. Responses
//! are parsed defensively: a missing or empty candidate list is an error, not
//! an empty string.

use async_trait::async_trait;
use reqwest::Client as ReqwestClient;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, instrument};

use super::error::GeminiApiError;
use super::retry::RetryPolicy;
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::LlmConfig;
use crate::domain::ports::{GenerateRequest, GenerateResponse, LlmClient};

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Configuration for the Gemini HTTP client
#[derive(Debug, Clone)]
pub struct GeminiClientConfig {
    /// API key (required)
    pub api_key: String,

    /// Model identifier
    pub model: String,

    /// Base URL for the API (overridable for tests/proxies)
    pub base_url: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,

    /// Retry policy for transient errors
    pub retry: RetryPolicy,
}

impl GeminiClientConfig {
    /// Build client config from application config, falling back to the
    /// `GOOGLE_API_KEY` environment variable when no key is configured.
    pub fn from_llm_config(config: &LlmConfig) -> Self {
        let api_key = if config.api_key.is_empty() {
            std::env::var("GOOGLE_API_KEY").unwrap_or_default()
        } else {
            config.api_key.clone()
        };

        Self {
            api_key,
            model: config.model.clone(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: config.timeout_secs,
            retry: RetryPolicy::new(
                config.max_retries,
                config.initial_backoff_ms,
                config.max_backoff_ms,
            ),
        }
    }
}

/// Gemini API client implementing the `LlmClient` port.
pub struct GeminiClient {
    http_client: ReqwestClient,
    config: GeminiClientConfig,
}

// ── wire types ─────────────────────────────────────────────────────────────

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct WireRequest {
    contents: Vec<WireContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<WireContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<WireGenerationConfig>,
}

#[derive(Serialize, Deserialize)]
struct WireContent {
    parts: Vec<WirePart>,
}

#[derive(Serialize, Deserialize)]
struct WirePart {
    text: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct WireGenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_output_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_mime_type: Option<String>,
}

#[derive(Deserialize)]
struct WireResponse {
    #[serde(default)]
    candidates: Vec<WireCandidate>,
}

#[derive(Deserialize)]
struct WireCandidate {
    content: Option<WireContent>,
}

// ── client ─────────────────────────────────────────────────────────────────

impl GeminiClient {
    pub fn new(config: GeminiClientConfig) -> anyhow::Result<Self> {
        let http_client = ReqwestClient::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .pool_max_idle_per_host(10)
            .build()?;

        Ok(Self {
            http_client,
            config,
        })
    }

    fn to_wire_request(request: &GenerateRequest) -> WireRequest {
        let generation_config = if request.temperature.is_some()
            || request.max_tokens.is_some()
            || request.json_mode
        {
            Some(WireGenerationConfig {
                temperature: request.temperature,
                max_output_tokens: request.max_tokens,
                response_mime_type: request
                    .json_mode
                    .then(|| "application/json".to_string()),
            })
        } else {
            None
        };

        WireRequest {
            contents: vec![WireContent {
                parts: vec![WirePart {
                    text: request.prompt.clone(),
                }],
            }],
            system_instruction: request.system.as_ref().map(|s| WireContent {
                parts: vec![WirePart { text: s.clone() }],
            }),
            generation_config,
        }
    }

    async fn send_request(&self, body: &WireRequest) -> Result<String, GeminiApiError> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.base_url, self.config.model
        );

        let response = self
            .http_client
            .post(&url)
            .header("x-goog-api-key", &self.config.api_key)
            .header("content-type", "application/json")
            .json(body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    GeminiApiError::Timeout
                } else {
                    GeminiApiError::NetworkError(e)
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GeminiApiError::from_status(status, body));
        }

        let wire: WireResponse = response
            .json()
            .await
            .map_err(|e| GeminiApiError::UnusableResponse(e.to_string()))?;

        let text = wire
            .candidates
            .into_iter()
            .filter_map(|c| c.content)
            .flat_map(|c| c.parts)
            .map(|p| p.text)
            .collect::<Vec<_>>()
            .join("");

        if text.is_empty() {
            return Err(GeminiApiError::UnusableResponse(
                "response carried no text content".to_string(),
            ));
        }

        Ok(text)
    }
}

#[async_trait]
impl LlmClient for GeminiClient {
    #[instrument(skip(self, request), fields(model = %self.config.model, json_mode = request.json_mode))]
    async fn generate(&self, request: GenerateRequest) -> DomainResult<GenerateResponse> {
        let body = Self::to_wire_request(&request);

        let text = self
            .config
            .retry
            .execute(|| self.send_request(&body))
            .await
            .map_err(|e| DomainError::LlmFailed(e.to_string()))?;

        debug!(chars = text.len(), "Gemini generation succeeded");
        Ok(GenerateResponse { text })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config(base_url: String) -> GeminiClientConfig {
        GeminiClientConfig {
            api_key: "test-key".to_string(),
            model: "gemini-2.5-flash-lite".to_string(),
            base_url,
            timeout_secs: 5,
            retry: RetryPolicy::new(2, 1, 4),
        }
    }

    fn candidate_body(text: &str) -> String {
        serde_json::json!({
            "candidates": [{"content": {"parts": [{"text": text}]}}]
        })
        .to_string()
    }

    #[tokio::test]
    async fn test_generate_parses_candidate_text() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock(
                "POST",
                "/v1beta/models/gemini-2.5-flash-lite:generateContent",
            )
            .with_status(200)
            .with_body(candidate_body("Avoid emoji usage."))
            .create_async()
            .await;

        let client = GeminiClient::new(test_config(server.url())).unwrap();
        let response = client
            .generate(GenerateRequest::text("judge this"))
            .await
            .unwrap();

        assert_eq!(response.text, "Avoid emoji usage.");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_generate_retries_server_errors_until_exhausted() {
        let mut server = mockito::Server::new_async().await;
        // max_retries = 2, so the client should attempt 3 times in total.
        let mock = server
            .mock(
                "POST",
                "/v1beta/models/gemini-2.5-flash-lite:generateContent",
            )
            .with_status(503)
            .with_body("overloaded")
            .expect(3)
            .create_async()
            .await;

        let client = GeminiClient::new(test_config(server.url())).unwrap();
        let err = client
            .generate(GenerateRequest::text("p"))
            .await
            .unwrap_err();

        assert!(matches!(err, DomainError::LlmFailed(_)));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_generate_auth_error_fails_fast() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock(
                "POST",
                "/v1beta/models/gemini-2.5-flash-lite:generateContent",
            )
            .with_status(403)
            .with_body("forbidden")
            .expect(1)
            .create_async()
            .await;

        let client = GeminiClient::new(test_config(server.url())).unwrap();
        let err = client
            .generate(GenerateRequest::text("p"))
            .await
            .unwrap_err();

        assert!(matches!(err, DomainError::LlmFailed(_)));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_empty_candidates_is_an_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock(
                "POST",
                "/v1beta/models/gemini-2.5-flash-lite:generateContent",
            )
            .with_status(200)
            .with_body(r#"{"candidates": []}"#)
            .create_async()
            .await;

        let client = GeminiClient::new(test_config(server.url())).unwrap();
        let err = client
            .generate(GenerateRequest::text("p"))
            .await
            .unwrap_err();

        assert!(matches!(err, DomainError::LlmFailed(_)));
    }
}
