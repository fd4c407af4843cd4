//! # UnitXchange Gemini Client
//!
//! File: cli/src/chatbot/gemini.rs
//!
//! ## Overview
//!
//! `LanguageModel` implementation backed by the Gemini `generateContent` REST
//! endpoint. Each call sends the prior turns of the session followed by the new
//! prompt as a `user` turn, and returns the first text part of the first
//! candidate.
//!
//! ## Architecture
//!
//! - The API key is read once at construction from the environment variable named
//!   in `[llm] api_key_env` (`GOOGLE_API_KEY` by default, `.env` files included).
//! - Transport, HTTP status and response-shape failures all surface as
//!   `UnitxError::LanguageModel` and are never retried.
//!
use super::model::{ChatTurn, LanguageModel, ModelChoice, ModelFactory};
use crate::core::error::{Result, UnitxError};
use anyhow::anyhow;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// Default base URL of the Gemini model endpoints.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Gemini REST client bound to one model.
#[derive(Clone)]
pub struct GeminiClient {
    http: Client,
    base_url: String,
    api_key: String,
    model: ModelChoice,
}

impl GeminiClient {
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        model: ModelChoice,
    ) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .map_err(|e| anyhow!(UnitxError::LanguageModel(format!("HTTP client: {}", e))))?;
        Ok(Self {
            http,
            base_url: base_url.into(),
            api_key: api_key.into(),
            model,
        })
    }

    /// Builds a client with the API key taken from `api_key_env`.
    pub fn from_env(base_url: &str, api_key_env: &str, model: ModelChoice) -> Result<Self> {
        let api_key = std::env::var(api_key_env).map_err(|_| {
            anyhow!(UnitxError::LanguageModel(format!(
                "Environment variable {} is not set; it must hold a Gemini API key.",
                api_key_env
            )))
        })?;
        Self::new(base_url, api_key, model)
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/{}:generateContent?key={}",
            self.base_url.trim_end_matches('/'),
            self.model.id(),
            self.api_key
        )
    }
}

#[async_trait]
impl LanguageModel for GeminiClient {
    async fn send_message(&self, history: &[ChatTurn], prompt: &str) -> Result<String> {
        let request = build_request(history, prompt);
        info!(
            "Sending prompt to {} with {} prior turns",
            self.model,
            history.len()
        );

        let response = self
            .http
            .post(self.endpoint())
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                // reqwest includes the URL in its error, which carries the key.
                anyhow!(UnitxError::LanguageModel(format!(
                    "Gemini request failed: {}",
                    e.without_url()
                )))
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow!(UnitxError::LanguageModel(format!(
                "Gemini returned {}: {}",
                status,
                error_message(&body)
            ))));
        }

        let parsed: GenerateContentResponse = response.json().await.map_err(|e| {
            anyhow!(UnitxError::LanguageModel(format!(
                "Failed to parse Gemini response: {}",
                e.without_url()
            )))
        })?;
        let text = extract_text(parsed)?;
        debug!("Gemini replied with {} characters", text.len());
        Ok(text)
    }
}

/// Factory producing a `GeminiClient` per model choice.
///
/// The API key is looked up on every call, so a missing key surfaces as a
/// `LanguageModel` error on the first prompt rather than at startup.
pub fn gemini_factory(base_url: impl Into<String>, api_key_env: impl Into<String>) -> ModelFactory {
    let base_url = base_url.into();
    let api_key_env = api_key_env.into();
    Arc::new(move |choice: ModelChoice| -> Result<Arc<dyn LanguageModel>> {
        let client = GeminiClient::from_env(&base_url, &api_key_env, choice)?;
        Ok(Arc::new(client))
    })
}

#[derive(Serialize, Debug, PartialEq)]
struct GenerateContentRequest {
    contents: Vec<Content>,
}

#[derive(Serialize, Debug, PartialEq)]
struct Content {
    role: String,
    parts: Vec<Part>,
}

#[derive(Serialize, Debug, PartialEq)]
struct Part {
    text: String,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    candidates: Option<Vec<Candidate>>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<ContentResponse>,
}

#[derive(Deserialize)]
struct ContentResponse {
    #[serde(default)]
    parts: Vec<PartResponse>,
}

#[derive(Deserialize)]
struct PartResponse {
    text: Option<String>,
}

#[derive(Deserialize)]
struct ErrorWrapper {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
    status: Option<String>,
}

fn build_request(history: &[ChatTurn], prompt: &str) -> GenerateContentRequest {
    let mut contents: Vec<Content> = history
        .iter()
        .map(|turn| Content {
            role: turn.role.as_str().to_string(),
            parts: vec![Part {
                text: turn.text.clone(),
            }],
        })
        .collect();
    contents.push(Content {
        role: "user".to_string(),
        parts: vec![Part {
            text: prompt.to_string(),
        }],
    });
    GenerateContentRequest { contents }
}

fn extract_text(response: GenerateContentResponse) -> Result<String> {
    response
        .candidates
        .and_then(|candidates| candidates.into_iter().next())
        .and_then(|candidate| candidate.content)
        .and_then(|content| content.parts.into_iter().find_map(|part| part.text))
        .ok_or_else(|| {
            anyhow!(UnitxError::LanguageModel(
                "Gemini returned no text in the response candidates".to_string()
            ))
        })
}

fn error_message(body: &str) -> String {
    serde_json::from_str::<ErrorWrapper>(body)
        .ok()
        .and_then(|wrapper| {
            let message = wrapper.error.message?;
            Some(match wrapper.error.status {
                Some(status) if !status.is_empty() => format!("{}: {}", status, message),
                _ => message,
            })
        })
        .unwrap_or_else(|| body.trim().to_string())
}
