//! # UnitXchange Chatbot
//!
//! File: cli/src/chatbot/mod.rs
//!
//! ## Overview
//!
//! The conversion chatbot behind the chat page and the `ask`/`chat` commands.
//!
//! ## Architecture
//!
//! - `model`: chat turn types, the model selector and the `LanguageModel` trait.
//! - `gemini`: the hosted Gemini REST client implementing `LanguageModel`.
//! - `classifier`: regex templates deciding whether text is a conversion question.
//! - `responder`: strict and creative reply generation on top of the classifier.
//! - `store`: the JSON chat-history file.
//! - `session`: active-chat pointer and settings over the store.
//!
//! ```rust
//! let mut session = ChatSessionState::open(ChatStore::load(path), model, 0.0)?;
//! let llm = DeferredModel::new(gemini_factory(base_url, "GOOGLE_API_KEY"), session.model());
//! let reply = session.send(&llm, "convert 5 km to miles").await?;
//! ```
//!
pub mod classifier;
pub mod gemini;
pub mod model;
pub mod responder;
pub mod session;
pub mod store;
