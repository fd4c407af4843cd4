//! # UnitXchange Ask Command
//!
//! File: cli/src/commands/ask.rs
//!
//! ## Overview
//!
//! `unitxchange ask <PROMPT>` sends one prompt to the conversion chatbot and
//! prints the reply. The exchange is appended to a stored chat, exactly as if it
//! had been typed on the chat page:
//!
//! - `--chat <ID>` picks the chat; otherwise the first stored chat is used (a new
//!   one is created when the store is empty).
//! - At temperature 0 non-conversion prompts are answered with the usage hint
//!   and never reach the hosted model, so no API key is needed for them.
//!
//! ## Examples
//!
//! ```bash
//! unitxchange ask "convert 5 kilometers to miles" --temperature 0
//! unitxchange ask "how many liters fit in a bathtub?" -t 0.9 --model gemini-1.5-flash
//! ```
//!
use super::context::{self, ChatStoreArgs, ModelArgs};
use crate::chatbot::model::DeferredModel;
use crate::core::config;
use crate::core::error::Result;
use clap::Parser;
use tracing::info;

#[derive(Parser, Debug)]
pub struct AskArgs {
    /// The prompt to send.
    pub prompt: String,

    /// Chat id to append the exchange to.
    #[arg(long, short = 'c', value_name = "ID")]
    pub chat: Option<String>,

    #[command(flatten)]
    pub model: ModelArgs,

    #[command(flatten)]
    pub store: ChatStoreArgs,
}

pub async fn handle_ask(args: AskArgs) -> Result<()> {
    info!("Handling ask command with args: {:?}", args);
    let cfg = config::load_config()?;
    let mut session = context::open_chat_session(&cfg, &args.store, &args.model)?;
    if let Some(id) = &args.chat {
        session.select(id)?;
    }

    let llm = DeferredModel::new(context::model_factory(&cfg), session.model());
    let reply = session.send(&llm, &args.prompt).await?;
    println!("{}", reply);
    Ok(())
}
