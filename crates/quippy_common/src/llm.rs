//! Language-model backends
//!
//! A backend takes one free-text prompt and returns free text. The
//! analyzer treats every error as "use the fallback", so backends only
//! need to report failures, never recover from them.
//!
//! - `GeminiBackend`: Google Generative Language `generateContent`
//! - `DisabledBackend`: classifier-only mode
//! - `FakeBackend`: scripted responses for tests

use crate::config::LlmSettings;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Mutex;
use std::time::Duration;

/// LLM errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LlmError {
    #[error("LLM backend is disabled")]
    Disabled,

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("HTTP error: {0}")]
    HttpError(String),

    #[error("Request timeout")]
    Timeout,

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("LLM returned empty response")]
    EmptyResponse,
}

/// Text-in, text-out generation
#[async_trait]
pub trait LlmBackend: Send + Sync {
    /// Short name for logs and health output
    fn name(&self) -> &str;

    async fn generate(&self, prompt: &str) -> Result<String, LlmError>;
}

/// Backend used when the language model is turned off
pub struct DisabledBackend;

#[async_trait]
impl LlmBackend for DisabledBackend {
    fn name(&self) -> &str {
        "disabled"
    }

    async fn generate(&self, _prompt: &str) -> Result<String, LlmError> {
        Err(LlmError::Disabled)
    }
}

// ============================================================================
// Gemini
// ============================================================================

#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: [Content<'a>; 1],
}

#[derive(Serialize)]
struct Content<'a> {
    parts: [Part<'a>; 1],
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

/// HTTP client for the hosted Gemini text-generation API
pub struct GeminiBackend {
    client: reqwest::Client,
    endpoint: String,
    model: String,
    api_key: String,
}

impl GeminiBackend {
    /// `timeout` of None leaves reqwest's defaults in place
    pub fn new(
        endpoint: impl Into<String>,
        model: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Option<Duration>,
    ) -> Result<Self, LlmError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| LlmError::ConfigError(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
            model: model.into(),
            api_key: api_key.into(),
        })
    }

    /// Build from config, reading the API key from the configured env var
    pub fn from_settings(settings: &LlmSettings) -> Result<Self, LlmError> {
        let api_key = settings
            .resolve_api_key()
            .map_err(|e| LlmError::ConfigError(e.to_string()))?;
        Self::new(
            settings.endpoint.clone(),
            settings.model.clone(),
            api_key,
            settings.timeout_secs.map(Duration::from_secs),
        )
    }

    fn url(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.endpoint.trim_end_matches('/'),
            self.model
        )
    }
}

#[async_trait]
impl LlmBackend for GeminiBackend {
    fn name(&self) -> &str {
        &self.model
    }

    async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        let body = GenerateRequest {
            contents: [Content {
                parts: [Part { text: prompt }],
            }],
        };

        let response = self
            .client
            .post(self.url())
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    LlmError::Timeout
                } else {
                    LlmError::HttpError(format!("Request failed: {}", e))
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(LlmError::HttpError(format!("HTTP {} from Gemini", status)));
        }

        let parsed: GenerateResponse = response
            .json()
            .await
            .map_err(|e| LlmError::InvalidResponse(format!("Failed to parse response: {}", e)))?;

        let text: String = parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .filter_map(|p| p.text)
                    .collect::<Vec<_>>()
                    .join("")
            })
            .ok_or(LlmError::EmptyResponse)?;

        if text.is_empty() {
            return Err(LlmError::EmptyResponse);
        }
        Ok(text)
    }
}

/// Build the backend the settings ask for
pub fn backend_from_settings(settings: &LlmSettings) -> Result<Box<dyn LlmBackend>, LlmError> {
    if !settings.enabled {
        return Ok(Box::new(DisabledBackend));
    }
    Ok(Box::new(GeminiBackend::from_settings(settings)?))
}

// ============================================================================
// Fake
// ============================================================================

/// Fake backend for testing
pub struct FakeBackend {
    responses: Mutex<Vec<Result<String, LlmError>>>,
    prompts: Mutex<Vec<String>>,
}

impl FakeBackend {
    /// Responses are handed out in order; the last one repeats
    pub fn new(responses: Vec<Result<String, LlmError>>) -> Self {
        Self {
            responses: Mutex::new(responses),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn always(text: impl Into<String>) -> Self {
        Self::new(vec![Ok(text.into())])
    }

    pub fn always_error(error: LlmError) -> Self {
        Self::new(vec![Err(error)])
    }

    pub fn call_count(&self) -> usize {
        self.prompts.lock().map(|p| p.len()).unwrap_or(0)
    }

    /// Prompts received so far
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().map(|p| p.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl LlmBackend for FakeBackend {
    fn name(&self) -> &str {
        "fake"
    }

    async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        if let Ok(mut prompts) = self.prompts.lock() {
            prompts.push(prompt.to_string());
        }

        let mut responses = self
            .responses
            .lock()
            .map_err(|_| LlmError::InvalidResponse("fake backend poisoned".to_string()))?;
        match responses.len() {
            0 => Err(LlmError::EmptyResponse),
            1 => responses[0].clone(),
            _ => responses.remove(0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{extract::Query, http::StatusCode, routing::post, Json, Router};
    use std::collections::HashMap;

    /// Serve `app` on an ephemeral port and return its base URL
    async fn spawn(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    const ROUTE: &str = "/v1beta/models/test-model:generateContent";

    #[tokio::test]
    async fn test_disabled_backend() {
        let result = DisabledBackend.generate("hi").await;
        assert_eq!(result, Err(LlmError::Disabled));
    }

    #[tokio::test]
    async fn test_fake_backend_sequence() {
        let fake = FakeBackend::new(vec![
            Ok("first".to_string()),
            Err(LlmError::Timeout),
            Ok("last".to_string()),
        ]);
        assert_eq!(fake.generate("a").await, Ok("first".to_string()));
        assert_eq!(fake.generate("b").await, Err(LlmError::Timeout));
        assert_eq!(fake.generate("c").await, Ok("last".to_string()));
        assert_eq!(fake.generate("d").await, Ok("last".to_string()));
        assert_eq!(fake.call_count(), 4);
        assert_eq!(fake.prompts(), vec!["a", "b", "c", "d"]);
    }

    #[tokio::test]
    async fn test_gemini_extracts_text_and_sends_key() {
        let app = Router::new().route(
            ROUTE,
            post(
                |Query(params): Query<HashMap<String, String>>,
                 Json(body): Json<serde_json::Value>| async move {
                    assert_eq!(params.get("key").map(String::as_str), Some("secret"));
                    let prompt = body["contents"][0]["parts"][0]["text"].as_str().unwrap_or("");
                    Json(serde_json::json!({
                        "candidates": [{
                            "content": { "parts": [
                                { "text": "Echo: " },
                                { "text": prompt }
                            ]}
                        }]
                    }))
                },
            ),
        );
        let base = spawn(app).await;

        let backend = GeminiBackend::new(base, "test-model", "secret", None).unwrap();
        let text = backend.generate("my pc is slow").await.unwrap();
        assert_eq!(text, "Echo: my pc is slow");
    }

    #[tokio::test]
    async fn test_gemini_http_error() {
        let app = Router::new().route(
            ROUTE,
            post(|| async { (StatusCode::FORBIDDEN, "API key not valid") }),
        );
        let base = spawn(app).await;

        let backend = GeminiBackend::new(base, "test-model", "bad", None).unwrap();
        let err = backend.generate("x").await.unwrap_err();
        assert!(matches!(err, LlmError::HttpError(ref m) if m.contains("403")));
    }

    #[tokio::test]
    async fn test_gemini_no_candidates() {
        let app = Router::new().route(
            ROUTE,
            post(|| async { Json(serde_json::json!({ "candidates": [] })) }),
        );
        let base = spawn(app).await;

        let backend = GeminiBackend::new(base, "test-model", "k", None).unwrap();
        assert_eq!(backend.generate("x").await, Err(LlmError::EmptyResponse));
    }

    #[tokio::test]
    async fn test_gemini_malformed_body() {
        let app = Router::new().route(ROUTE, post(|| async { "not json" }));
        let base = spawn(app).await;

        let backend = GeminiBackend::new(base, "test-model", "k", None).unwrap();
        let err = backend.generate("x").await.unwrap_err();
        assert!(matches!(err, LlmError::InvalidResponse(_)));
    }

    #[tokio::test]
    async fn test_gemini_unreachable() {
        // Port 9 (discard) on localhost is not expected to be listening
        let backend = GeminiBackend::new(
            "http://127.0.0.1:9",
            "test-model",
            "k",
            Some(Duration::from_secs(2)),
        )
        .unwrap();
        let err = backend.generate("x").await.unwrap_err();
        assert!(matches!(err, LlmError::HttpError(_) | LlmError::Timeout));
    }

    #[test]
    fn test_backend_from_disabled_settings() {
        let settings = LlmSettings {
            enabled: false,
            ..Default::default()
        };
        let backend = backend_from_settings(&settings).unwrap();
        assert_eq!(backend.name(), "disabled");
    }

    #[test]
    fn test_backend_requires_api_key() {
        let settings = LlmSettings {
            api_key_env: "QUIPPY_TEST_KEY_THAT_IS_NEVER_SET".to_string(),
            ..Default::default()
        };
        let err = backend_from_settings(&settings).err().unwrap();
        assert!(matches!(
            err,
            LlmError::ConfigError(ref m) if m.contains("QUIPPY_TEST_KEY_THAT_IS_NEVER_SET")
        ));
    }
}
