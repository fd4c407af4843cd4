//! # UnitXchange Chat Command Group
//!
//! File: cli/src/commands/chat.rs
//!
//! ## Overview
//!
//! Manages the chats stored in the chat-history file and runs the interactive
//! chat loop. Every subcommand works on the same JSON file the chat page uses.
//!
//! ## Subcommands
//!
//! - `list`: All chats with their ids and message counts
//! - `new`: Create an empty "New Chat" and print its id
//! - `show <ID>`: Print one chat's transcript
//! - `delete <ID>`: Remove a chat
//! - `talk`: Read prompts from stdin until `bye`
//!
//! ## Examples
//!
//! ```bash
//! unitxchange chat list
//! unitxchange chat --history-file ~/chats.json show 20240309_140507
//! unitxchange chat talk --temperature 0
//! ```
//!
use super::context::{self, ChatStoreArgs, ModelArgs};
use crate::chatbot::model::DeferredModel;
use crate::chatbot::store::{ChatRecord, ChatStore};
use crate::core::config;
use crate::core::error::{Result, UnitxError};
use anyhow::anyhow;
use chrono::Local;
use clap::{Parser, Subcommand};
use std::io::Write;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};

/// Typing this (any case) ends `chat talk`.
const QUIT_WORD: &str = "bye";

#[derive(Parser, Debug)]
pub struct ChatArgs {
    #[command(flatten)]
    store: ChatStoreArgs,

    #[command(subcommand)]
    command: ChatCommand,
}

#[derive(Subcommand, Debug)]
enum ChatCommand {
    /// List stored chats.
    #[command(alias = "ls")]
    List,
    /// Create an empty chat.
    New,
    /// Print a chat transcript.
    Show {
        /// Chat id.
        id: String,
    },
    /// Delete a chat.
    #[command(alias = "rm")]
    Delete {
        /// Chat id.
        id: String,
    },
    /// Interactive conversation on stdin/stdout.
    Talk {
        /// Chat id to continue (defaults to the first stored chat).
        #[arg(long, short = 'c', value_name = "ID")]
        chat: Option<String>,

        #[command(flatten)]
        model: ModelArgs,
    },
}

pub async fn handle_chat(args: ChatArgs) -> Result<()> {
    let cfg = config::load_config()?;
    let path = args.store.resolve(&cfg);
    match args.command {
        ChatCommand::List => {
            for line in list_lines(&ChatStore::load(path)) {
                println!("{}", line);
            }
        }
        ChatCommand::New => {
            let mut store = ChatStore::load(path);
            let id = store.create(Local::now())?;
            println!("{}", id);
        }
        ChatCommand::Show { id } => {
            let store = ChatStore::load(path);
            let chat = store.get(&id).ok_or_else(|| unknown_chat(&id))?;
            for line in transcript_lines(&id, chat) {
                println!("{}", line);
            }
        }
        ChatCommand::Delete { id } => {
            let mut store = ChatStore::load(path);
            if !store.delete(&id)? {
                return Err(unknown_chat(&id));
            }
            println!("Deleted chat {}", id);
        }
        ChatCommand::Talk { chat, model } => {
            talk(&cfg, &args.store, &model, chat.as_deref()).await?;
        }
    }
    Ok(())
}

fn unknown_chat(id: &str) -> anyhow::Error {
    anyhow!(UnitxError::Storage(format!("Unknown chat id '{}'", id)))
}

fn list_lines(store: &ChatStore) -> Vec<String> {
    if store.is_empty() {
        return vec!["No chats yet. Start one with `unitxchange chat new`.".to_string()];
    }
    store
        .chats()
        .iter()
        .map(|(id, chat)| format!("{}  {}  ({} messages)", id, chat.name, chat.history.len()))
        .collect()
}

fn transcript_lines(id: &str, chat: &ChatRecord) -> Vec<String> {
    let mut lines = vec![format!("💬 {} ({})", chat.name, id)];
    lines.extend(
        chat.history
            .iter()
            .map(|turn| format!("{}: {}", turn.role.display_name(), turn.text)),
    );
    lines
}

async fn talk(
    cfg: &config::Config,
    store_args: &ChatStoreArgs,
    model_args: &ModelArgs,
    chat: Option<&str>,
) -> Result<()> {
    let mut session = context::open_chat_session(cfg, store_args, model_args)?;
    if let Some(id) = chat {
        session.select(id)?;
    }
    let llm = DeferredModel::new(context::model_factory(cfg), session.model());
    info!(
        "Chatting in {:?} with {} at temperature {}",
        session.active_id(),
        session.model(),
        session.temperature()
    );
    println!(
        "Ö unitXchange - Bot ({}, temperature {:.1}). Type '{}' to quit.",
        session.model(),
        session.temperature(),
        QUIT_WORD
    );

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("you> ");
        std::io::stdout().flush()?;
        let Some(line) = lines.next_line().await? else {
            break;
        };
        let prompt = line.trim();
        if prompt.is_empty() {
            continue;
        }
        if prompt.eq_ignore_ascii_case(QUIT_WORD) {
            break;
        }
        match session.send(&llm, prompt).await {
            Ok(reply) => println!("assistant> {}", reply),
            Err(e) => {
                // Nothing was recorded; the user can simply try again.
                warn!("Prompt failed: {:?}", e);
                eprintln!("Error: {}", e);
            }
        }
    }
    println!("Goodbye!");
    Ok(())
}
