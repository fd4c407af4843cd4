//! # UnitXchange Command Context
//!
//! File: cli/src/commands/context.rs
//!
//! ## Overview
//!
//! Wiring shared by the commands that touch the network or the chat store:
//!
//! - `ChatStoreArgs` / `ModelArgs`: flattened Clap argument groups that override
//!   the `[chat]` section of the loaded configuration.
//! - `rate_cache`: the exchange-rate cache built from `[rates]`.
//! - `model_factory`: the Gemini client factory built from `[llm]`.
//! - `open_chat_session`: a `ChatSessionState` over the resolved history file.
//!
use crate::chatbot::gemini::gemini_factory;
use crate::chatbot::model::{parse_temperature, ModelChoice, ModelFactory};
use crate::chatbot::session::ChatSessionState;
use crate::chatbot::store::ChatStore;
use crate::conversion::currency::{HttpRateSource, RateCache};
use crate::core::config::Config;
use crate::core::error::Result;
use clap::Args;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::debug;

/// Selects the chat-history file.
#[derive(Args, Debug, Clone, Default)]
pub struct ChatStoreArgs {
    /// Chat-history JSON file (overrides `chat.history_file` from the config).
    #[arg(long, global = true, env = "UNITXCHANGE_HISTORY_FILE", value_name = "PATH")]
    pub history_file: Option<PathBuf>,
}

impl ChatStoreArgs {
    pub fn resolve(&self, config: &Config) -> PathBuf {
        self.history_file
            .clone()
            .unwrap_or_else(|| config.chat.history_path())
    }
}

/// Model and creativity overrides.
#[derive(Args, Debug, Clone, Default)]
pub struct ModelArgs {
    /// Creativity from 0.0 (strict conversions only) to 1.0.
    #[arg(long, short = 't', value_parser = temperature_arg)]
    pub temperature: Option<f64>,

    /// Hosted model (gemini-1.5-flash or gemini-2.0-flash).
    #[arg(long, short = 'm')]
    pub model: Option<ModelChoice>,
}

/// Clap value parser enforcing the 0.0..=1.0 creativity range.
pub fn temperature_arg(s: &str) -> std::result::Result<f64, String> {
    let value: f64 = s
        .trim()
        .parse()
        .map_err(|_| format!("'{}' is not a number", s))?;
    parse_temperature(value).map_err(|e| e.to_string())
}

pub fn rate_cache(config: &Config) -> Result<RateCache> {
    let source = HttpRateSource::new(config.rates.endpoint.clone())?;
    Ok(RateCache::new(Arc::new(source), config.rates.ttl()))
}

pub fn model_factory(config: &Config) -> ModelFactory {
    gemini_factory(config.llm.base_url.clone(), config.llm.api_key_env.clone())
}

/// Opens the chat session with CLI overrides applied on top of `config`.
pub fn open_chat_session(
    config: &Config,
    store_args: &ChatStoreArgs,
    model_args: &ModelArgs,
) -> Result<ChatSessionState> {
    let path = store_args.resolve(config);
    debug!("Using chat history file {}", path.display());
    ChatSessionState::open(
        ChatStore::load(path),
        model_args.model.unwrap_or(config.chat.model),
        model_args.temperature.unwrap_or(config.chat.temperature),
    )
}
