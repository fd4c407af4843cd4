//! # UnitXchange HTTP Server Implementation
//!
//! File: cli/src/commands/serve/server_logic.rs
//!
//! ## Overview
//!
//! This module implements the HTTP server behind `unitxchange serve`:
//! - Port availability checking with automatic fallback
//! - Route table for the converter page, the chat page and the JSON API
//! - Request tracing and an optional permissive CORS layer
//! - Graceful shutdown handling
//!
//! ## Architecture
//!
//! 1. `create_app` builds the Axum router over the shared `AppState`
//! 2. `run_server` finds a free port, binds it and serves until a shutdown signal
//!
//! ```rust
//! let state = AppState::new(converter, chat, factory, display_limit)?;
//! server_logic::run_server(state, settings).await?;
//! ```
//!
use super::handlers;
use super::state::SharedState;
use crate::common::network::{find_available_port, DEFAULT_PORT_ATTEMPTS};
use crate::core::error::Result;
use anyhow::Context;
use axum::{
    routing::{get, post},
    Router,
};
use std::net::IpAddr;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::{error, info, Level};

/// Effective network settings after CLI overrides.
#[derive(Debug, Clone, PartialEq)]
pub struct ServerSettings {
    pub host: IpAddr,
    pub port: u16,
    pub enable_cors: bool,
}

/// # Run HTTP Server (`run_server`)
///
/// Binds the first free port at or after `settings.port` and serves the app
/// until Ctrl+C or SIGTERM.
///
/// ## Errors
///
/// Fails when no port in range is free, when binding fails, or when the server
/// itself stops with an error.
pub async fn run_server(state: SharedState, settings: ServerSettings) -> Result<()> {
    let addr = find_available_port(settings.host, settings.port, DEFAULT_PORT_ATTEMPTS).await?;
    let app = create_app(state, settings.enable_cors);

    println!("\n=================================================================");
    println!("🔄 UnitXchange");
    println!("🌐 Converter:      http://{}/", addr);
    println!("💬 Chatbot:        http://{}/chat", addr);
    println!("🔒 CORS enabled:   {}", settings.enable_cors);
    println!("=================================================================\n");
    info!("Starting server on {}", addr);
    println!("Server starting! Press Ctrl+C to stop.");

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind TCP listener to address {}", addr))?;

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")?;

    println!("\nServer shutdown complete.");
    Ok(())
}

/// Resolves on Ctrl+C, or on SIGTERM on Unix.
async fn shutdown_signal() {
    let ctrl_c = async {
        match tokio::signal::ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, initiating graceful shutdown..."),
            Err(e) => {
                error!("Failed to install Ctrl+C handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut term) => {
                term.recv().await;
                info!("Received SIGTERM, initiating graceful shutdown...");
            }
            Err(e) => {
                error!(
                    "Failed to install SIGTERM handler: {}. Shutdown on SIGTERM might not work.",
                    e
                );
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

/// # Create Axum Application (`create_app`)
///
/// Builds the router with every page and API route, tracing, and (optionally)
/// permissive CORS.
pub fn create_app(state: SharedState, enable_cors: bool) -> Router {
    let cors_layer = if enable_cors {
        info!("CORS middleware enabled (permissive).");
        CorsLayer::permissive()
    } else {
        info!("CORS middleware disabled.");
        CorsLayer::new()
    };

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::default().include_headers(true))
        .on_request(DefaultOnRequest::new().level(Level::INFO))
        .on_response(DefaultOnResponse::new().level(Level::INFO));

    Router::new()
        .route("/", get(handlers::converter_page))
        .route("/convert", post(handlers::convert_action))
        .route("/history/clear", post(handlers::clear_history))
        .route("/rates/refresh", post(handlers::refresh_rates))
        .route("/chat", get(handlers::chat_page))
        .route("/chat/new", post(handlers::new_chat))
        .route("/chat/settings", post(handlers::update_settings))
        .route("/chat/send", post(handlers::send_prompt))
        .route("/chat/{id}/select", post(handlers::select_chat))
        .route("/chat/{id}/delete", post(handlers::delete_chat))
        .route("/api/categories", get(handlers::api_categories))
        .route("/api/convert", post(handlers::api_convert))
        .route("/api/classify", post(handlers::api_classify))
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(trace_layer)
                .layer(cors_layer),
        )
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::super::state::AppState;
    use super::*;
    use crate::chatbot::model::{ChatTurn, LanguageModel, ModelChoice, ModelFactory};
    use crate::chatbot::session::ChatSessionState;
    use crate::chatbot::store::ChatStore;
    use crate::conversion::currency::{RateCache, RateSource};
    use crate::conversion::engine::Rates;
    use crate::conversion::ConverterSession;
    use crate::core::error::UnitxError;
    use async_trait::async_trait;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use axum::response::Response;
    use serde_json::Value;
    use std::sync::Arc;
    use std::time::Duration;
    use tempfile::TempDir;
    use tower::ServiceExt;

    struct StaticRates;

    #[async_trait]
    impl RateSource for StaticRates {
        async fn fetch(&self) -> Result<Rates> {
            Ok(Rates::from([
                ("USD".to_string(), 1.0),
                ("EUR".to_string(), 0.5),
            ]))
        }
    }

    struct UppercaseModel;

    #[async_trait]
    impl LanguageModel for UppercaseModel {
        async fn send_message(&self, _history: &[ChatTurn], prompt: &str) -> Result<String> {
            Ok(prompt.to_uppercase())
        }
    }

    fn test_factory(available: bool) -> ModelFactory {
        Arc::new(move |_: ModelChoice| -> Result<Arc<dyn LanguageModel>> {
            if available {
                Ok(Arc::new(UppercaseModel))
            } else {
                Err(UnitxError::LanguageModel("service unavailable".into()).into())
            }
        })
    }

    fn test_state(dir: &TempDir, model_available: bool, temperature: f64) -> SharedState {
        let converter = ConverterSession::new(RateCache::new(
            Arc::new(StaticRates),
            Duration::from_secs(600),
        ));
        let chat = ChatSessionState::open(
            ChatStore::load(dir.path().join("chats.json")),
            ModelChoice::default(),
            temperature,
        )
        .unwrap();
        AppState::new(converter, chat, test_factory(model_available), 10).unwrap()
    }

    fn form(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn json_request(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    async fn body_text(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_converter_page_defaults_to_distance() {
        let dir = TempDir::new().unwrap();
        let app = create_app(test_state(&dir, true, 0.7), true);
        let response = app.oneshot(get("/")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let html = body_text(response).await;
        assert!(html.contains("🔄 UnitXchange"));
        assert!(html.contains("No conversions yet. Start converting to build your history!"));
        assert!(html.contains(r#"<option value="Distance" selected>"#));
    }

    #[tokio::test]
    async fn test_convert_form_renders_result_and_history() {
        let dir = TempDir::new().unwrap();
        let state = test_state(&dir, true, 0.7);
        let app = create_app(state.clone(), true);
        let response = app
            .oneshot(form(
                "/convert",
                "category=Time&from=Hours&to=Minutes&value=2",
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let html = body_text(response).await;
        assert!(html.contains("2.0 Hours = 120.00 Minutes"));
        assert!(html.contains("➜ 2.0 Hours → 120.00 Minutes"));
        assert_eq!(state.converter.lock().await.history().len(), 1);
    }

    #[tokio::test]
    async fn test_convert_form_reports_bad_value() {
        let dir = TempDir::new().unwrap();
        let app = create_app(test_state(&dir, true, 0.7), true);
        let response = app
            .oneshot(form("/convert", "category=Time&from=Hours&to=Minutes&value=abc"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(body_text(response).await.contains("is not a valid number"));
    }

    #[tokio::test]
    async fn test_clear_history_flash() {
        let dir = TempDir::new().unwrap();
        let state = test_state(&dir, true, 0.7);
        state
            .converter
            .lock()
            .await
            .convert(crate::conversion::units::Category::Data, "Kilobytes", "Bytes", 1.0)
            .await
            .unwrap();
        let app = create_app(state.clone(), true);
        let response = app
            .oneshot(form("/history/clear", "category=Data"))
            .await
            .unwrap();
        let html = body_text(response).await;
        assert!(html.contains("Conversion history cleared!"));
        assert!(state.converter.lock().await.history().is_empty());
    }

    #[tokio::test]
    async fn test_refresh_rates_flash() {
        let dir = TempDir::new().unwrap();
        let app = create_app(test_state(&dir, true, 0.7), true);
        let response = app.oneshot(form("/rates/refresh", "")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_text(response).await.contains("Currency rates updated!"));
    }

    #[tokio::test]
    async fn test_api_convert_currency() {
        let dir = TempDir::new().unwrap();
        let app = create_app(test_state(&dir, true, 0.7), true);
        let response = app
            .oneshot(json_request(
                "/api/convert",
                serde_json::json!({"category": "currency", "from": "usd", "to": "eur", "value": 10.0}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body: Value = serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(body["result"], 5.0);
        assert_eq!(body["factor"], 0.5);
        assert_eq!(body["history_entry"], "10.0 USD → 5.00 EUR");
    }

    #[tokio::test]
    async fn test_api_convert_unknown_unit_is_400() {
        let dir = TempDir::new().unwrap();
        let app = create_app(test_state(&dir, true, 0.7), true);
        let response = app
            .oneshot(json_request(
                "/api/convert",
                serde_json::json!({"category": "Distance", "from": "Leagues", "to": "Meters", "value": 1.0}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: Value = serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(body["error"], "Unknown unit 'Leagues' for category Distance.");
    }

    #[tokio::test]
    async fn test_api_classify_and_categories() {
        let dir = TempDir::new().unwrap();
        let app = create_app(test_state(&dir, true, 0.7), true);
        let response = app
            .clone()
            .oneshot(json_request(
                "/api/classify",
                serde_json::json!({"text": "convert 5 kilometers to miles"}),
            ))
            .await
            .unwrap();
        let body: Value = serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(body["is_conversion_question"], true);

        let response = app.oneshot(get("/api/categories")).await.unwrap();
        let body: Value = serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(body.as_array().unwrap().len(), 10);
        assert_eq!(body[4]["name"], "Currency");
        assert_eq!(body[4]["icon"], "💱");
    }

    #[tokio::test]
    async fn test_chat_send_records_exchange_and_redirects() {
        let dir = TempDir::new().unwrap();
        let state = test_state(&dir, true, 0.7);
        let app = create_app(state.clone(), true);
        let response = app
            .clone()
            .oneshot(form("/chat/send", "prompt=convert+1+kg+to+grams"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);

        let html = body_text(app.oneshot(get("/chat")).await.unwrap()).await;
        assert!(html.contains("convert 1 kg to grams"));
        assert!(html.contains("assistant"));

        let chat = state.chat.lock().await;
        assert_eq!(chat.active_chat().unwrap().history.len(), 2);
    }

    #[tokio::test]
    async fn test_chat_send_model_failure_is_502() {
        let dir = TempDir::new().unwrap();
        let state = test_state(&dir, false, 0.7);
        let app = create_app(state.clone(), true);
        let response = app
            .oneshot(form("/chat/send", "prompt=convert+1+kg+to+grams"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        assert!(body_text(response).await.contains("service unavailable"));
        assert!(state.chat.lock().await.active_chat().unwrap().history.is_empty());
    }

    #[tokio::test]
    async fn test_strict_rejection_needs_no_model() {
        let dir = TempDir::new().unwrap();
        let state = test_state(&dir, false, 0.0);
        let app = create_app(state.clone(), true);
        let response = app
            .oneshot(form("/chat/send", "prompt=tell+me+a+joke"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        let chat = state.chat.lock().await;
        let active = chat.active_chat().unwrap();
        assert!(active.history.is_empty());
        assert_eq!(active.name, "tell me a joke");
    }

    #[tokio::test]
    async fn test_chat_settings_and_unknown_select() {
        let dir = TempDir::new().unwrap();
        let state = test_state(&dir, true, 0.7);
        let app = create_app(state.clone(), true);
        let response = app
            .clone()
            .oneshot(form("/chat/settings", "model=gemini-1.5-flash&temperature=0.2"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        {
            let chat = state.chat.lock().await;
            assert_eq!(chat.model(), ModelChoice::Gemini15Flash);
            assert_eq!(chat.temperature(), 0.2);
        }

        let response = app
            .clone()
            .oneshot(form("/chat/settings", "model=gemini-1.5-flash&temperature=3"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = app
            .oneshot(form("/chat/missing/select", ""))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_chat_new_and_delete() {
        let dir = TempDir::new().unwrap();
        let state = test_state(&dir, true, 0.7);
        let app = create_app(state.clone(), true);
        let first = state.chat.lock().await.active_id().unwrap().to_string();

        let response = app
            .clone()
            .oneshot(form(&format!("/chat/{}/delete", first), ""))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert!(state.chat.lock().await.active_id().is_none());

        let response = app.oneshot(form("/chat/new", "")).await.unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        let chat = state.chat.lock().await;
        assert_eq!(chat.store().chats().len(), 1);
        assert!(chat.active_id().is_some());
    }

    #[tokio::test]
    async fn test_shutdown_signal_creation() {
        let shutdown_future = shutdown_signal();
        drop(shutdown_future);
    }
}
