//! # UnitXchange Web Server
//!
//! File: cli/src/commands/serve/mod.rs
//!
//! ## Overview
//!
//! `unitxchange serve` runs the web front end:
//! - `GET /` the unit converter, `GET /chat` the conversion chatbot
//! - A small JSON API under `/api`
//!
//! ## Architecture
//!
//! - `state.rs`: the shared `AppState` (converter session, chat session, renderer)
//! - `views.rs`: serializable view models for the Tera pages
//! - `handlers.rs`: Axum handlers for every route
//! - `server_logic.rs`: router construction, port fallback and graceful shutdown
//!
//! ## Examples
//!
//! ```bash
//! # Serve on the configured address (127.0.0.1:8501 by default)
//! unitxchange serve
//!
//! # Listen on all interfaces without CORS headers
//! unitxchange serve --host 0.0.0.0 --port 9000 --no-cors
//! ```
//!
use super::context::{self, ChatStoreArgs, ModelArgs};
use crate::conversion::ConverterSession;
use crate::core::config;
use crate::core::error::Result;
use clap::Parser;
use std::net::IpAddr;
use tracing::info;

pub mod handlers;
pub mod server_logic;
pub mod state;
pub mod views;

use server_logic::ServerSettings;
use state::AppState;

#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Host address to bind (overrides `server.host`).
    #[arg(long)]
    pub host: Option<IpAddr>,

    /// Port to listen on; the next free port is used when it is taken.
    #[arg(long, short)]
    pub port: Option<u16>,

    /// Disable CORS headers.
    #[arg(long)]
    pub no_cors: bool,

    #[command(flatten)]
    pub model: ModelArgs,

    #[command(flatten)]
    pub store: ChatStoreArgs,
}

pub async fn handle_serve(args: ServeArgs) -> Result<()> {
    info!("Handling serve command with args: {:?}", args);
    let cfg = config::load_config()?;
    let settings = ServerSettings {
        host: args.host.unwrap_or(cfg.server.host),
        port: args.port.unwrap_or(cfg.server.port),
        enable_cors: cfg.server.enable_cors && !args.no_cors,
    };
    info!("Effective server settings: {:?}", settings);

    let converter = ConverterSession::new(context::rate_cache(&cfg)?);
    let chat = context::open_chat_session(&cfg, &args.store, &args.model)?;
    let state = AppState::new(
        converter,
        chat,
        context::model_factory(&cfg),
        cfg.history.display_limit,
    )?;
    server_logic::run_server(state, settings).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_serve_args() {
        let args = ServeArgs::try_parse_from([
            "serve", "--host", "0.0.0.0", "--port", "9000", "--no-cors",
        ])
        .unwrap();
        assert_eq!(args.host, Some("0.0.0.0".parse().unwrap()));
        assert_eq!(args.port, Some(9000));
        assert!(args.no_cors);
    }

    #[test]
    fn test_parse_serve_defaults() {
        let args = ServeArgs::try_parse_from(["serve"]).unwrap();
        assert!(args.host.is_none());
        assert!(args.port.is_none());
        assert!(!args.no_cors);
        assert!(ServeArgs::try_parse_from(["serve", "--host", "not-an-ip"]).is_err());
    }
}
