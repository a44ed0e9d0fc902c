//! HTTP client for communicating with quippyd.

use anyhow::{anyhow, Context, Result};
use quippy_common::{AnalysisSource, ChatMessage, SystemSnapshot};
use serde::{Deserialize, Serialize};

/// Default daemon address
pub const DEFAULT_URL: &str = "http://127.0.0.1:7878";

/// Reply to one chat message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatReply {
    pub outcome: String,
    pub reply: ChatMessage,
    #[serde(default)]
    pub source: Option<AnalysisSource>,
    #[serde(default)]
    pub system: Option<SystemSnapshot>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DaemonHealth {
    pub status: String,
    pub version: String,
    pub uptime_secs: u64,
    pub llm_enabled: bool,
    pub llm_backend: String,
    pub scanner: String,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

/// Client for communicating with quippyd
pub struct QuippyClient {
    base_url: String,
    http: reqwest::Client,
}

impl QuippyClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http: reqwest::Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn scan(&self) -> Result<SystemSnapshot> {
        let response = self
            .http
            .get(format!("{}/api/system", self.base_url))
            .send()
            .await
            .map_err(|e| self.connect_error(e))?;
        decode(response).await
    }

    pub async fn chat(&self, message: &str) -> Result<ChatReply> {
        let response = self
            .http
            .post(format!("{}/api/chat", self.base_url))
            .json(&serde_json::json!({ "message": message }))
            .send()
            .await
            .map_err(|e| self.connect_error(e))?;
        decode(response).await
    }

    pub async fn health(&self) -> Result<DaemonHealth> {
        let response = self
            .http
            .get(format!("{}/v1/health", self.base_url))
            .send()
            .await
            .map_err(|e| self.connect_error(e))?;
        decode(response).await
    }

    fn connect_error(&self, e: reqwest::Error) -> anyhow::Error {
        anyhow!(
            "Cannot reach Quippy daemon at {}: {}\n\n\
             Start it with: quippyd (or quippyd --offline to run without an API key)",
            self.base_url,
            e
        )
    }
}

/// Decode a JSON body, turning `{"error": ...}` replies into errors
async fn decode<T: serde::de::DeserializeOwned>(response: reqwest::Response) -> Result<T> {
    let status = response.status();
    if !status.is_success() {
        let message = response
            .json::<ErrorBody>()
            .await
            .map(|b| b.error)
            .unwrap_or_else(|_| status.to_string());
        return Err(anyhow!(message));
    }
    response
        .json::<T>()
        .await
        .context("Unexpected response from Quippy daemon")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash() {
        let client = QuippyClient::new("http://localhost:7878/");
        assert_eq!(client.base_url(), "http://localhost:7878");
    }

    #[test]
    fn test_chat_reply_parses_acknowledgment() {
        let json = r#"{
            "outcome": "acknowledged",
            "reply": { "kind": "system", "content": "You're welcome", "timestamp": "2026-10-14T09:00:00Z" }
        }"#;
        let reply: ChatReply = serde_json::from_str(json).unwrap();
        assert_eq!(reply.outcome, "acknowledged");
        assert!(reply.source.is_none());
        assert!(reply.system.is_none());
    }
}
