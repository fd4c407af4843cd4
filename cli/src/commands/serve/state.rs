//! # UnitXchange Server State
//!
//! File: cli/src/commands/serve/state.rs
//!
//! ## Overview
//!
//! `AppState` is the one piece of state shared by every request. The converter
//! session and the chat session each sit behind a `tokio::sync::Mutex`, so a
//! request holds the lock for the whole action (including the model call for
//! `/chat/send`) and concurrent requests see a consistent sequence of actions.
//!
use crate::chatbot::model::ModelFactory;
use crate::chatbot::session::ChatSessionState;
use crate::conversion::ConverterSession;
use crate::core::error::Result;
use crate::core::templating::PageRenderer;
use std::sync::Arc;
use tokio::sync::Mutex;

pub struct AppState {
    pub converter: Mutex<ConverterSession>,
    pub chat: Mutex<ChatSessionState>,
    pub renderer: PageRenderer,
    pub model_factory: ModelFactory,
    /// Number of recent conversions shown on the converter page.
    pub display_limit: usize,
}

pub type SharedState = Arc<AppState>;

impl AppState {
    pub fn new(
        converter: ConverterSession,
        chat: ChatSessionState,
        model_factory: ModelFactory,
        display_limit: usize,
    ) -> Result<SharedState> {
        Ok(Arc::new(Self {
            converter: Mutex::new(converter),
            chat: Mutex::new(chat),
            renderer: PageRenderer::new()?,
            model_factory,
            display_limit,
        }))
    }
}
