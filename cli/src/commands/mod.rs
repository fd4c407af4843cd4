//! # UnitXchange Command Modules
//!
//! File: cli/src/commands/mod.rs
//!
//! ## Overview
//!
//! This module aggregates all top-level commands that make up the UnitXchange CLI.
//! It serves as the central point for making the command modules accessible to the
//! main application entry point (`main.rs`).
//!
//! ## Architecture
//!
//! - Each command defines its own `Args` struct (parsed by Clap) and an async
//!   `handle_*` function that carries out the command.
//! - Command groups with several actions (`chat`) define a `Subcommand` enum and
//!   dispatch to one private handler per action.
//! - `context` holds the wiring shared by several commands: configuration
//!   overrides, the rate cache, and the chat session.
//!
//! ## Commands
//!
//! - `convert`: One-off unit conversion
//! - `units`: List categories or the units of one category
//! - `check`: Run the conversion-question classifier on some text
//! - `ask`: Send one prompt to the conversion chatbot
//! - `chat`: Manage stored chats and hold an interactive conversation
//! - `serve`: Run the web front end (converter page, chat page, JSON API)
//!

/// One-off conversion between two units of a category.
pub mod convert;
/// Lists categories and units.
pub mod units;
/// Classifies text as a conversion question or not.
pub mod check;
/// Sends a single prompt to the chatbot.
pub mod ask;
/// Chat-history management and the interactive chat loop.
pub mod chat;
/// The web server.
pub mod serve;

/// Shared command wiring (config overrides, rate cache, chat session).
pub mod context;
