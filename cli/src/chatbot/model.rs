//! # UnitXchange Language-Model Seam
//!
//! File: cli/src/chatbot/model.rs
//!
//! ## Overview
//!
//! Shared chat types plus the `LanguageModel` trait. The responder only ever
//! talks to the trait, so the hosted Gemini client (`gemini.rs`) can be swapped
//! for a scripted fake in tests.
//!
//! Turns are stored with the roles the hosted API understands (`user` and
//! `model`); `Role::display_name` maps `model` to `assistant` for the pages.
//!
use crate::core::error::{Result, UnitxError};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Model,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Model => "model",
        }
    }

    /// Role label shown in the chat stream.
    pub fn display_name(self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Model => "assistant",
        }
    }
}

/// One message in a chat session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: Role,
    pub text: String,
}

impl ChatTurn {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            text: text.into(),
        }
    }

    pub fn model(text: impl Into<String>) -> Self {
        Self {
            role: Role::Model,
            text: text.into(),
        }
    }
}

/// The hosted models offered in the model selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ModelChoice {
    #[serde(rename = "gemini-1.5-flash")]
    Gemini15Flash,
    #[default]
    #[serde(rename = "gemini-2.0-flash")]
    Gemini20Flash,
}

impl ModelChoice {
    pub const ALL: [ModelChoice; 2] = [ModelChoice::Gemini15Flash, ModelChoice::Gemini20Flash];

    pub fn id(self) -> &'static str {
        match self {
            ModelChoice::Gemini15Flash => "gemini-1.5-flash",
            ModelChoice::Gemini20Flash => "gemini-2.0-flash",
        }
    }
}

impl fmt::Display for ModelChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for ModelChoice {
    type Err = UnitxError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        ModelChoice::ALL
            .into_iter()
            .find(|m| m.id() == s.trim())
            .ok_or_else(|| {
                UnitxError::ArgumentParsing(format!(
                    "Unknown model '{}'. Expected one of: gemini-1.5-flash, gemini-2.0-flash",
                    s
                ))
            })
    }
}

/// Lowest creativity setting; selects strict mode.
pub const MIN_TEMPERATURE: f64 = 0.0;
/// Highest creativity setting.
pub const MAX_TEMPERATURE: f64 = 1.0;
/// Creativity setting used when none is configured.
pub const DEFAULT_TEMPERATURE: f64 = 0.7;

/// Validates a creativity setting.
pub fn parse_temperature(value: f64) -> std::result::Result<f64, UnitxError> {
    if (MIN_TEMPERATURE..=MAX_TEMPERATURE).contains(&value) {
        Ok(value)
    } else {
        Err(UnitxError::ArgumentParsing(format!(
            "Temperature {} is outside the range {:.1}..={:.1}",
            value, MIN_TEMPERATURE, MAX_TEMPERATURE
        )))
    }
}

/// A prompt-in, text-out completion service.
///
/// Implementations receive the prior turns of the session and the new prompt,
/// and return the generated text. Failures are returned as errors, never retried.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    async fn send_message(&self, history: &[ChatTurn], prompt: &str) -> Result<String>;
}

/// Builds the client for the currently selected model.
pub type ModelFactory = Arc<dyn Fn(ModelChoice) -> Result<Arc<dyn LanguageModel>> + Send + Sync>;

/// A `LanguageModel` that builds its client through a factory on each request.
///
/// Prompts that never reach the hosted model (strict-mode rejections) then work
/// without an API key.
pub struct DeferredModel {
    factory: ModelFactory,
    choice: ModelChoice,
}

impl DeferredModel {
    pub fn new(factory: ModelFactory, choice: ModelChoice) -> Self {
        Self { factory, choice }
    }
}

#[async_trait]
impl LanguageModel for DeferredModel {
    async fn send_message(&self, history: &[ChatTurn], prompt: &str) -> Result<String> {
        let client = (self.factory)(self.choice)?;
        client.send_message(history, prompt).await
    }
}
