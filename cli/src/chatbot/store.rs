//! # UnitXchange Chat-History Store
//!
//! File: cli/src/chatbot/store.rs
//!
//! ## Overview
//!
//! Persists chat sessions to a single JSON file shaped as
//! `{ "<chat id>": { "name": "...", "history": [{ "role": "user", "text": "..." }] } }`.
//!
//! ## Architecture
//!
//! - The file is read in full at load time and rewritten in full after every
//!   mutation. A missing or unparsable file loads as an empty store and is only
//!   logged.
//! - Writes go through `common::fs::io::write_string_atomically`, so an interrupted
//!   write never leaves a truncated file. There is still no locking: with two
//!   writers the last rewrite wins.
//! - Chat ids are local timestamps with second resolution (`%Y%m%d_%H%M%S`). A
//!   second chat created within the same second gets a `_2`, `_3`, ... suffix.
//! - Chats are kept in a `BTreeMap`, so listing order is id (creation) order.
//!
use super::model::ChatTurn;
use crate::common::fs::io;
use crate::core::error::{Result, UnitxError};
use anyhow::{anyhow, Context};
use chrono::{DateTime, Local};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::OnceLock;
use tracing::{debug, info, warn};

/// Display name of a chat that has not received a prompt yet.
pub const NEW_CHAT_NAME: &str = "New Chat";

const TITLE_MAX_CHARS: usize = 30;
const CHAT_ID_FORMAT: &str = "%Y%m%d_%H%M%S";

static NON_WORD_REGEX: OnceLock<Regex> = OnceLock::new();

/// A stored chat session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRecord {
    pub name: String,
    #[serde(default)]
    pub history: Vec<ChatTurn>,
}

impl ChatRecord {
    pub fn new() -> Self {
        Self {
            name: NEW_CHAT_NAME.to_string(),
            history: Vec::new(),
        }
    }
}

impl Default for ChatRecord {
    fn default() -> Self {
        Self::new()
    }
}

pub type ChatMap = BTreeMap<String, ChatRecord>;

/// Derives a chat title from its first prompt.
///
/// Punctuation and symbols are dropped, the first 30 characters are kept and
/// trimmed, and `...` marks a truncated prompt. An empty title falls back to
/// "New Chat".
pub fn chat_title(prompt: &str) -> String {
    let non_word = NON_WORD_REGEX
        .get_or_init(|| Regex::new(r"[^\w\s]").expect("title regex is valid"));
    let cleaned = non_word.replace_all(prompt, "");

    let mut title = cleaned
        .chars()
        .take(TITLE_MAX_CHARS)
        .collect::<String>()
        .trim()
        .to_string();
    if cleaned.chars().count() > TITLE_MAX_CHARS {
        title.push_str("...");
    }
    if title.is_empty() {
        NEW_CHAT_NAME.to_string()
    } else {
        title
    }
}

/// Timestamp id for a chat created at `now`, unique within `existing`.
pub fn generate_chat_id(now: DateTime<Local>, existing: &ChatMap) -> String {
    let base = now.format(CHAT_ID_FORMAT).to_string();
    if !existing.contains_key(&base) {
        return base;
    }
    (2u32..)
        .map(|n| format!("{}_{}", base, n))
        .find(|candidate| !existing.contains_key(candidate))
        .unwrap_or(base)
}

/// File-backed collection of chat sessions.
#[derive(Debug)]
pub struct ChatStore {
    path: PathBuf,
    chats: ChatMap,
}

impl ChatStore {
    /// Loads the store from `path`. Missing or corrupt files load as empty.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let chats = match std::fs::read_to_string(&path) {
            Ok(raw) => match serde_json::from_str::<ChatMap>(&raw) {
                Ok(chats) => {
                    info!("Loaded {} chats from {}", chats.len(), path.display());
                    chats
                }
                Err(e) => {
                    warn!(
                        "Chat history file {} is not valid, starting empty: {}",
                        path.display(),
                        e
                    );
                    ChatMap::new()
                }
            },
            Err(e) => {
                debug!(
                    "No chat history at {} ({}), starting empty",
                    path.display(),
                    e
                );
                ChatMap::new()
            }
        };
        Self { path, chats }
    }

    pub fn chats(&self) -> &ChatMap {
        &self.chats
    }

    pub fn get(&self, id: &str) -> Option<&ChatRecord> {
        self.chats.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.chats.contains_key(id)
    }

    pub fn is_empty(&self) -> bool {
        self.chats.is_empty()
    }

    pub fn first_id(&self) -> Option<&str> {
        self.chats.keys().next().map(String::as_str)
    }

    /// Rewrites the whole file.
    pub fn save(&self) -> Result<()> {
        let json = serde_json::to_string_pretty(&self.chats)
            .context("Failed to serialize chat histories")?;
        io::write_string_atomically(&self.path, &json).map_err(|e| {
            anyhow!(UnitxError::Storage(format!(
                "Could not save chat histories to {}: {:#}",
                self.path.display(),
                e
            )))
        })
    }

    /// Creates an empty "New Chat" and persists the store.
    pub fn create(&mut self, now: DateTime<Local>) -> Result<String> {
        let id = generate_chat_id(now, &self.chats);
        self.chats.insert(id.clone(), ChatRecord::new());
        self.save()?;
        info!("Created chat {}", id);
        Ok(id)
    }

    /// Removes a chat. Returns false when the id was unknown.
    pub fn delete(&mut self, id: &str) -> Result<bool> {
        if self.chats.remove(id).is_none() {
            return Ok(false);
        }
        self.save()?;
        info!("Deleted chat {}", id);
        Ok(true)
    }

    /// Names a chat still called "New Chat" after `prompt` and persists the store.
    ///
    /// Returns true when the chat was renamed.
    pub fn title_from_prompt(&mut self, id: &str, prompt: &str) -> Result<bool> {
        let chat = self.chat_mut(id)?;
        if chat.name != NEW_CHAT_NAME {
            return Ok(false);
        }
        chat.name = chat_title(prompt);
        debug!("Renamed chat {} to '{}'", id, chat.name);
        self.save()?;
        Ok(true)
    }

    /// Appends a prompt and its reply to chat `id` and persists the store.
    pub fn record_exchange(&mut self, id: &str, prompt: &str, reply: &str) -> Result<()> {
        let chat = self.chat_mut(id)?;
        chat.history.push(ChatTurn::user(prompt));
        chat.history.push(ChatTurn::model(reply));
        self.save()
    }

    fn chat_mut(&mut self, id: &str) -> Result<&mut ChatRecord> {
        self.chats
            .get_mut(id)
            .ok_or_else(|| anyhow!(UnitxError::Storage(format!("Unknown chat id '{}'", id))))
    }
}
