//! # UnitXchange Main Entry Point
//!
//! File: cli/src/main.rs
//!
//! ## Overview
//!
//! This file serves as the main entry point for the UnitXchange CLI application.
//! It handles:
//! - Loading a `.env` file (so `GOOGLE_API_KEY` can live next to the project)
//! - Command-line argument parsing using Clap
//! - Setting up the logging system based on verbosity flags
//! - Routing execution to appropriate command handlers
//!
//! ## Architecture
//!
//! - `conversion`: unit tables, the conversion engine, currency rates, history
//! - `chatbot`: classifier, responder, Gemini client, chat store and session
//! - `commands`: one module per top-level command
//! - `common`: filesystem and network helpers
//! - `core`: configuration, errors, templating
//!
//! All errors are propagated to this level for consistent handling.
//!
//! ## Examples
//!
//! ```bash
//! # Get help
//! unitxchange --help
//!
//! # Convert with debug logging
//! unitxchange -vv convert distance kilometers miles 5
//!
//! # Start the web pages
//! unitxchange serve
//! ```
//!
use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

mod chatbot; // Classifier, responder, language-model client, chat persistence
mod commands; // Handles specific command logic (convert, chat, serve, etc.)
mod common; // Shared utilities (fs, network)
mod conversion; // Unit conversion engine, currency rates, history
mod core; // Core infrastructure (errors, config, templating)

/// Defines the top-level command-line arguments structure using Clap's derive macros.
#[derive(Parser, Debug)]
#[command(
    name = "unitxchange",
    about = "🔄 UnitXchange: unit conversions and a conversion chatbot",
    long_about = "Convert between units of ten categories (with live currency rates),\n\
                  ask the Gemini-backed conversion chatbot, or serve both as web pages.",
    propagate_version = true,
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

/// Enum defining all available top-level commands.
#[derive(Parser, Debug)]
enum Commands {
    /// Convert a value between two units of a category.
    #[command(alias = "c")]
    Convert(commands::convert::ConvertArgs),
    /// List categories, or the units of one category.
    #[command(alias = "u")]
    Units(commands::units::UnitsArgs),
    /// Check whether text is a recognised conversion question.
    Check(commands::check::CheckArgs),
    /// Send one prompt to the conversion chatbot.
    #[command(alias = "a")]
    Ask(commands::ask::AskArgs),
    /// Manage stored chats or talk interactively.
    Chat(commands::chat::ChatArgs),
    /// Serve the converter and chatbot pages.
    #[command(alias = "s")]
    Serve(commands::serve::ServeArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    fmt::Subscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();

    tracing::debug!("Parsed CLI arguments: {:?}", cli);

    let command_result = match cli.command {
        Commands::Convert(args) => commands::convert::handle_convert(args).await,
        Commands::Units(args) => commands::units::handle_units(args).await,
        Commands::Check(args) => commands::check::handle_check(args).await,
        Commands::Ask(args) => commands::ask::handle_ask(args).await,
        Commands::Chat(args) => commands::chat::handle_chat(args).await,
        Commands::Serve(args) => commands::serve::handle_serve(args).await,
    };

    if let Err(e) = command_result {
        tracing::error!("Command execution failed: {:?}", e);
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    Ok(())
}
