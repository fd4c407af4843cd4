//! # UnitXchange Chat Session State
//!
//! File: cli/src/chatbot/session.rs
//!
//! ## Overview
//!
//! `ChatSessionState` is the explicit state behind the chat page and the `chat`
//! commands: the chat store, the active-chat pointer, and the model and
//! creativity settings. Every action takes `&mut self`, so the owner decides how
//! access is serialised (a `tokio::sync::Mutex` in the web server).
//!
//! ## Lifecycle
//!
//! - **Open**: an empty store gets a fresh chat which becomes active; otherwise
//!   the first stored chat is active.
//! - **New / select / delete**: deleting the active chat clears the pointer.
//! - **Send**: with no active chat a new one is created first. A chat still
//!   named "New Chat" takes its title from the prompt before the model is asked.
//!   The reply is generated from the active chat's prior turns. Only a reply the
//!   model produced is recorded, together with the prompt; refusals and model
//!   failures leave the history untouched.
//!
use super::model::{parse_temperature, ChatTurn, LanguageModel, ModelChoice};
use super::responder::generate_conversion_response;
use super::store::{ChatRecord, ChatStore};
use crate::core::error::{Result, UnitxError};
use anyhow::anyhow;
use chrono::Local;
use tracing::{debug, info};

#[derive(Debug)]
pub struct ChatSessionState {
    store: ChatStore,
    active: Option<String>,
    model: ModelChoice,
    temperature: f64,
}

impl ChatSessionState {
    /// Opens the session over `store`, applying the startup selection policy.
    pub fn open(mut store: ChatStore, model: ModelChoice, temperature: f64) -> Result<Self> {
        let temperature = parse_temperature(temperature)?;
        let active = match store.first_id() {
            Some(id) => id.to_string(),
            None => {
                info!("Chat store is empty, creating a first chat");
                store.create(Local::now())?
            }
        };
        Ok(Self {
            store,
            active: Some(active),
            model,
            temperature,
        })
    }

    pub fn store(&self) -> &ChatStore {
        &self.store
    }

    pub fn active_id(&self) -> Option<&str> {
        self.active.as_deref()
    }

    pub fn active_chat(&self) -> Option<&ChatRecord> {
        self.active.as_deref().and_then(|id| self.store.get(id))
    }

    pub fn model(&self) -> ModelChoice {
        self.model
    }

    pub fn set_model(&mut self, model: ModelChoice) {
        debug!("Model set to {}", model);
        self.model = model;
    }

    pub fn temperature(&self) -> f64 {
        self.temperature
    }

    pub fn set_temperature(&mut self, temperature: f64) -> Result<()> {
        self.temperature = parse_temperature(temperature)?;
        debug!("Temperature set to {}", self.temperature);
        Ok(())
    }

    /// Creates a chat and makes it active.
    pub fn new_chat(&mut self) -> Result<String> {
        let id = self.store.create(Local::now())?;
        self.active = Some(id.clone());
        Ok(id)
    }

    pub fn select(&mut self, id: &str) -> Result<()> {
        if !self.store.contains(id) {
            return Err(anyhow!(UnitxError::Storage(format!(
                "Unknown chat id '{}'",
                id
            ))));
        }
        self.active = Some(id.to_string());
        Ok(())
    }

    /// Deletes a chat, clearing the active pointer when it pointed there.
    pub fn delete(&mut self, id: &str) -> Result<bool> {
        let removed = self.store.delete(id)?;
        if removed && self.active.as_deref() == Some(id) {
            self.active = None;
        }
        Ok(removed)
    }

    /// Answers `prompt` in the active chat and records the exchange.
    pub async fn send(&mut self, llm: &dyn LanguageModel, prompt: &str) -> Result<String> {
        let id = match self.active.clone() {
            Some(id) if self.store.contains(&id) => id,
            _ => self.new_chat()?,
        };
        let history: Vec<ChatTurn> = self
            .store
            .get(&id)
            .map(|chat| chat.history.clone())
            .unwrap_or_default();

        self.store.title_from_prompt(&id, prompt)?;
        let reply = generate_conversion_response(llm, &history, prompt, self.temperature).await?;
        if reply.from_model {
            self.store.record_exchange(&id, prompt, &reply.text)?;
        } else {
            debug!("Prompt refused in chat {}, history unchanged", id);
        }
        Ok(reply.text)
    }
}
