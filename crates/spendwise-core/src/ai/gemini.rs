//! Google Generative Language API backend
//!
//! Calls `models/{model}:generateContent` with a single text part. The default
//! model is `gemma-3-27b-it`.
//!
//! # Configuration
//!
//! Environment variables:
//! - `GOOGLE_API_KEY`: API key (required)
//! - `GEMINI_MODEL`: Model name (default: gemma-3-27b-it)
//! - `GEMINI_HOST`: API base URL (default: https://generativelanguage.googleapis.com)

use std::sync::{Arc, RwLock};
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::prompts::PromptLibrary;

use super::types::{AiError, AiResult};
use super::{http_client, AIBackend};

pub const DEFAULT_GEMINI_HOST: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_GEMINI_MODEL: &str = "gemma-3-27b-it";
const API_KEY_HEADER: &str = "x-goog-api-key";

#[derive(Clone)]
pub struct GeminiBackend {
    http_client: Client,
    base_url: String,
    model: String,
    api_key: String,
    prompts: Arc<RwLock<PromptLibrary>>,
}

impl GeminiBackend {
    pub fn new(base_url: &str, model: &str, api_key: &str, timeout: Duration) -> Self {
        Self {
            http_client: http_client(timeout),
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            api_key: api_key.to_string(),
            prompts: Arc::new(RwLock::new(PromptLibrary::new())),
        }
    }

    /// Create from environment variables
    ///
    /// Required: `GOOGLE_API_KEY`
    pub fn from_env(timeout: Duration) -> AiResult<Self> {
        let api_key = std::env::var("GOOGLE_API_KEY")
            .ok()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| AiError::NotConfigured("GOOGLE_API_KEY is not set".into()))?;
        let host =
            std::env::var("GEMINI_HOST").unwrap_or_else(|_| DEFAULT_GEMINI_HOST.to_string());
        let model =
            std::env::var("GEMINI_MODEL").unwrap_or_else(|_| DEFAULT_GEMINI_MODEL.to_string());
        Ok(Self::new(&host, &model, &api_key, timeout))
    }

    fn model_url(&self, suffix: &str) -> String {
        format!("{}/v1beta/models/{}{}", self.base_url, self.model, suffix)
    }
}

/// generateContent request
#[derive(Debug, Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default)]
    text: String,
}

/// generateContent response
#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[async_trait]
impl AIBackend for GeminiBackend {
    async fn complete(&self, prompt: &str) -> AiResult<String> {
        let request = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
        };

        let response = self
            .http_client
            .post(self.model_url(":generateContent"))
            .header(API_KEY_HEADER, &self.api_key)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(AiError::Api { status, body });
        }

        let generated: GenerateResponse = response.json().await?;
        let text = generated
            .candidates
            .into_iter()
            .filter_map(|c| c.content)
            .flat_map(|c| c.parts)
            .map(|p| p.text)
            .collect::<Vec<_>>()
            .join("");

        if text.trim().is_empty() {
            return Err(AiError::InvalidResponse(
                "Gemini returned no candidates".into(),
            ));
        }
        debug!(model = %self.model, chars = text.len(), "Gemini response");
        Ok(text)
    }

    async fn health_check(&self) -> bool {
        match self
            .http_client
            .get(self.model_url(""))
            .header(API_KEY_HEADER, &self.api_key)
            .send()
            .await
        {
            Ok(resp) => resp.status().is_success(),
            Err(_) => false,
        }
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn host(&self) -> &str {
        &self.base_url
    }

    fn prompts(&self) -> &RwLock<PromptLibrary> {
        &self.prompts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::MockLlmServer;

    #[test]
    fn test_request_serialization() {
        let request = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: "Hello".to_string(),
                }],
            }],
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["contents"][0]["parts"][0]["text"], "Hello");
    }

    #[test]
    fn test_model_url() {
        let backend = GeminiBackend::new(
            "http://localhost:9/",
            "gemma-3-27b-it",
            "k",
            Duration::from_secs(1),
        );
        assert_eq!(
            backend.model_url(":generateContent"),
            "http://localhost:9/v1beta/models/gemma-3-27b-it:generateContent"
        );
    }

    #[tokio::test]
    async fn test_complete_against_mock_server() {
        let server = MockLlmServer::start("Food").await;
        let backend = GeminiBackend::new(&server.url(), "gemma", "key", Duration::from_secs(5));
        assert!(backend.health_check().await);
        assert_eq!(backend.complete("anything").await.unwrap(), "Food");
        assert_eq!(
            backend.suggest_category("Lunch", 10.0).await.unwrap(),
            "Food"
        );
    }

    #[tokio::test]
    async fn test_api_error_status() {
        let server = MockLlmServer::failing(503).await;
        let backend = GeminiBackend::new(&server.url(), "gemma", "key", Duration::from_secs(5));
        match backend.complete("anything").await {
            Err(AiError::Api { status, .. }) => assert_eq!(status, 503),
            other => panic!("expected API error, got {:?}", other.map(|_| ())),
        }
    }

    #[tokio::test]
    async fn test_unreachable_is_http_error() {
        let backend = GeminiBackend::new(
            "http://127.0.0.1:1",
            "gemma",
            "SECRET123",
            Duration::from_secs(2),
        );
        assert!(!backend.health_check().await);

        let err = backend.complete("hi").await.unwrap_err();
        assert!(matches!(err, AiError::Http(_)));
        let logged = format!("{} {:?}", err, err);
        assert!(!logged.contains("SECRET123"), "api key leaked: {}", logged);
    }
}
