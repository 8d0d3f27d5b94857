// SPDX-FileCopyrightText: 2026 Tavolo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the Gemini generateContent API.
//!
//! Provides [`GeminiClient`] which handles request construction,
//! authentication, and error classification. The client performs no retries
//! of its own: retry policy belongs to the callers, who apply different
//! rules for per-review and aggregate calls.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue};
use tracing::debug;

use tavolo_core::{TavoloError, TextGenerator};

use crate::types::{ApiErrorResponse, GenerateContentRequest, GenerateContentResponse, GenerationConfig};

/// Base URL for the Gemini API.
const API_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// HTTP client for Gemini API communication.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    client: reqwest::Client,
    model: String,
    generation: GenerationConfig,
    request_timeout: Duration,
    base_url: String,
}

impl GeminiClient {
    /// Creates a new Gemini API client.
    ///
    /// # Arguments
    /// * `api_key` - Gemini API key for authentication
    /// * `model` - Model identifier (e.g., "gemini-1.5-flash")
    /// * `generation` - Sampling parameters attached to every request
    /// * `request_timeout` - Socket-level timeout for one HTTP exchange
    pub fn new(
        api_key: String,
        model: String,
        generation: GenerationConfig,
        request_timeout: Duration,
    ) -> Result<Self, TavoloError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-goog-api-key",
            HeaderValue::from_str(&api_key)
                .map_err(|e| TavoloError::Config(format!("invalid API key header value: {e}")))?,
        );
        headers.insert("content-type", HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(request_timeout)
            .build()
            .map_err(|e| TavoloError::Transport {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            client,
            model,
            generation,
            request_timeout,
            base_url: API_BASE_URL.to_string(),
        })
    }

    /// Returns the model identifier this client targets.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Overrides the base URL (for testing with wiremock).
    #[cfg(test)]
    pub fn with_base_url(mut self, url: String) -> Self {
        self.base_url = url;
        self
    }

    /// Sends one prompt and returns the generated text.
    pub async fn generate_content(&self, prompt: &str) -> Result<String, TavoloError> {
        let request = GenerateContentRequest::from_prompt(prompt, self.generation.clone());
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        );

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    TavoloError::Timeout {
                        duration: self.request_timeout,
                    }
                } else {
                    TavoloError::Transport {
                        message: format!("HTTP request failed: {e}"),
                        source: Some(Box::new(e)),
                    }
                }
            })?;

        let status = response.status();
        debug!(status = %status, model = %self.model, "generation response received");

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(classify_api_error(status, &body));
        }

        let body = response.text().await.map_err(|e| TavoloError::Transport {
            message: format!("failed to read response body: {e}"),
            source: Some(Box::new(e)),
        })?;
        let parsed: GenerateContentResponse =
            serde_json::from_str(&body).map_err(|e| TavoloError::Transport {
                message: format!("failed to parse API response: {e}"),
                source: Some(Box::new(e)),
            })?;

        match parsed.first_text() {
            Some(text) if !text.trim().is_empty() => Ok(text),
            _ => Err(TavoloError::EmptyResponse),
        }
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn generate(&self, prompt: &str) -> Result<String, TavoloError> {
        self.generate_content(prompt).await
    }
}

/// Maps a non-success API response onto the shared error taxonomy.
///
/// HTTP 429 and quota-style rejections (RESOURCE_EXHAUSTED, or any body
/// mentioning a quota) become [`TavoloError::RateLimited`]; everything else
/// is [`TavoloError::Transport`].
fn classify_api_error(status: reqwest::StatusCode, body: &str) -> TavoloError {
    let envelope = serde_json::from_str::<ApiErrorResponse>(body).ok();
    let message = match &envelope {
        Some(parsed) => format!(
            "Gemini API error ({}): {}",
            parsed
                .error
                .status
                .clone()
                .unwrap_or_else(|| status.to_string()),
            parsed.error.message
        ),
        None => format!("API returned {status}: {body}"),
    };

    let quota_rejection = envelope
        .as_ref()
        .and_then(|parsed| parsed.error.status.as_deref())
        .is_some_and(|code| code == "RESOURCE_EXHAUSTED")
        || body.to_ascii_lowercase().contains("quota");

    if status.as_u16() == 429 || quota_rejection {
        TavoloError::RateLimited { message }
    } else {
        TavoloError::Transport {
            message,
            source: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_client(base_url: &str) -> GeminiClient {
        GeminiClient::new(
            "test-api-key".into(),
            "gemini-1.5-flash".into(),
            GenerationConfig::default(),
            Duration::from_secs(30),
        )
        .unwrap()
        .with_base_url(base_url.to_string())
    }

    fn success_body(text: &str) -> serde_json::Value {
        serde_json::json!({
            "candidates": [
                {"content": {"parts": [{"text": text}], "role": "model"}}
            ]
        })
    }

    #[tokio::test]
    async fn generate_content_success() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1beta/models/gemini-1.5-flash:generateContent"))
            .respond_with(ResponseTemplate::new(200).set_body_json(success_body("Hi there!")))
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let text = client.generate_content("Hello").await.unwrap();
        assert_eq!(text, "Hi there!");
    }

    #[tokio::test]
    async fn client_sends_api_key_and_sampling_config() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1beta/models/gemini-1.5-flash:generateContent"))
            .and(header("x-goog-api-key", "test-api-key"))
            .and(header("content-type", "application/json"))
            .and(body_partial_json(serde_json::json!({
                "contents": [{"parts": [{"text": "Hello"}]}],
                "generationConfig": {"temperature": 0.7, "topP": 0.8, "topK": 40}
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(success_body("ok")))
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let result = client.generate_content("Hello").await;
        assert!(result.is_ok(), "request should match: {result:?}");
    }

    #[tokio::test]
    async fn http_429_maps_to_rate_limited() {
        let server = MockServer::start().await;

        let error_body = serde_json::json!({
            "error": {"code": 429, "message": "Rate limit hit", "status": "RESOURCE_EXHAUSTED"}
        });
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429).set_body_json(&error_body))
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let err = client.generate_content("Hello").await.unwrap_err();
        assert!(matches!(err, TavoloError::RateLimited { .. }), "got: {err}");
        assert!(err.to_string().contains("RESOURCE_EXHAUSTED"), "got: {err}");
    }

    #[tokio::test]
    async fn quota_body_maps_to_rate_limited_even_without_429() {
        let server = MockServer::start().await;

        let error_body = serde_json::json!({
            "error": {"code": 403, "message": "Quota exceeded for this project", "status": "PERMISSION_DENIED"}
        });
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(403).set_body_json(&error_body))
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let err = client.generate_content("Hello").await.unwrap_err();
        assert!(matches!(err, TavoloError::RateLimited { .. }), "got: {err}");
    }

    #[tokio::test]
    async fn server_error_maps_to_transport() {
        let server = MockServer::start().await;

        let error_body = serde_json::json!({
            "error": {"code": 500, "message": "Internal failure", "status": "INTERNAL"}
        });
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_json(&error_body))
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let err = client.generate_content("Hello").await.unwrap_err();
        assert!(matches!(err, TavoloError::Transport { .. }), "got: {err}");
        assert!(err.to_string().contains("INTERNAL"), "got: {err}");
    }

    #[tokio::test]
    async fn missing_candidates_is_empty_response() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let err = client.generate_content("Hello").await.unwrap_err();
        assert!(matches!(err, TavoloError::EmptyResponse), "got: {err}");
    }

    #[tokio::test]
    async fn whitespace_only_text_is_empty_response() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(success_body("   \n")))
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let err = client.generate_content("Hello").await.unwrap_err();
        assert!(matches!(err, TavoloError::EmptyResponse), "got: {err}");
    }
}
