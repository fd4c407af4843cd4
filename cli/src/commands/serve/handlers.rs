//! # UnitXchange Request Handlers
//!
//! File: cli/src/commands/serve/handlers.rs
//!
//! ## Overview
//!
//! Axum handlers for the two HTML pages and the JSON API.
//!
//! - Converter actions (`/convert`, `/history/clear`, `/rates/refresh`) render
//!   the converter page directly, with a flash message where one applies.
//! - Chat actions that only change state (`/chat/new`, select, delete, settings)
//!   redirect back to `GET /chat`. `/chat/send` redirects on success and renders
//!   the chat page with the error otherwise.
//! - API errors are JSON `{"error": ...}` with the status from `status_for`.
//!
use super::state::SharedState;
use super::views::{
    ChatView, ConversionView, ConverterView, HISTORY_CLEARED, RATES_UNAVAILABLE, RATES_UPDATED,
};
use crate::chatbot::classifier::is_conversion_question;
use crate::chatbot::model::{parse_temperature, DeferredModel, ModelChoice};
use crate::conversion::units::Category;
use crate::core::error::UnitxError;
use crate::core::templating::{PageRenderer, CHAT_PAGE, CONVERTER_PAGE};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    Form, Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{error, info, warn};

/// Maps an application error to the HTTP status reported for it.
pub fn status_for(err: &anyhow::Error) -> StatusCode {
    match err.downcast_ref::<UnitxError>() {
        Some(UnitxError::LanguageModel(_)) => StatusCode::BAD_GATEWAY,
        Some(
            UnitxError::UnknownUnit { .. }
            | UnitxError::UnknownCategory(_)
            | UnitxError::MissingRate { .. }
            | UnitxError::ArgumentParsing(_),
        ) => StatusCode::BAD_REQUEST,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// JSON error body for the API routes.
pub struct ApiError(anyhow::Error);

impl<E> From<E> for ApiError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = status_for(&self.0);
        if status.is_server_error() {
            error!("API request failed: {:?}", self.0);
        }
        (status, Json(json!({ "error": self.0.to_string() }))).into_response()
    }
}

fn render_page<T: Serialize>(
    renderer: &PageRenderer,
    template: &str,
    view: &T,
    status: StatusCode,
) -> Response {
    match renderer.render(template, view) {
        Ok(html) => (status, Html(html)).into_response(),
        Err(e) => {
            error!("{:#}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, format!("Error: {}", e)).into_response()
        }
    }
}

fn parse_value(raw: &str) -> Result<f64, UnitxError> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| UnitxError::ArgumentParsing(format!("'{}' is not a valid number", raw)))
}

// --- Converter page ---

#[derive(Deserialize, Debug, Default)]
pub struct CategoryQuery {
    category: Option<String>,
}

pub async fn converter_page(
    State(state): State<SharedState>,
    Query(query): Query<CategoryQuery>,
) -> Response {
    let converter = state.converter.lock().await;
    let (category, error) = match query.category.as_deref().map(str::parse::<Category>) {
        None => (Category::Distance, None),
        Some(Ok(category)) => (category, None),
        Some(Err(e)) => (Category::Distance, Some(e.to_string())),
    };
    let mut view = ConverterView::new(category, converter.history(), state.display_limit);
    let status = if error.is_some() {
        StatusCode::BAD_REQUEST
    } else {
        StatusCode::OK
    };
    view.error = error;
    render_page(&state.renderer, CONVERTER_PAGE, &view, status)
}

#[derive(Deserialize, Debug)]
pub struct ConvertForm {
    category: String,
    from: String,
    to: String,
    value: String,
}

pub async fn convert_action(
    State(state): State<SharedState>,
    Form(form): Form<ConvertForm>,
) -> Response {
    let mut converter = state.converter.lock().await;
    let category = match form.category.parse::<Category>() {
        Ok(category) => category,
        Err(e) => {
            let mut view =
                ConverterView::new(Category::Distance, converter.history(), state.display_limit);
            view.error = Some(e.to_string());
            return render_page(&state.renderer, CONVERTER_PAGE, &view, StatusCode::BAD_REQUEST);
        }
    };

    let attempt = match parse_value(&form.value) {
        Ok(value) => converter.convert(category, &form.from, &form.to, value).await,
        Err(e) => Err(e),
    };

    let mut view = ConverterView::new(category, converter.history(), state.display_limit);
    view.from_unit = form.from.clone();
    view.to_unit = form.to.clone();
    view.value = form.value.trim().to_string();
    let status = match attempt {
        Ok(outcome) => {
            if outcome.rates_unavailable {
                view.warning = Some(RATES_UNAVAILABLE.to_string());
            }
            view.conversion = Some(ConversionView::from(&outcome.conversion));
            StatusCode::OK
        }
        Err(e) => {
            warn!("Conversion failed: {}", e);
            view.error = Some(e.to_string());
            StatusCode::BAD_REQUEST
        }
    };
    render_page(&state.renderer, CONVERTER_PAGE, &view, status)
}

pub async fn clear_history(
    State(state): State<SharedState>,
    Form(query): Form<CategoryQuery>,
) -> Response {
    let mut converter = state.converter.lock().await;
    converter.clear_history();
    info!("Conversion history cleared");
    let category = query
        .category
        .as_deref()
        .and_then(|c| c.parse().ok())
        .unwrap_or(Category::Distance);
    let mut view = ConverterView::new(category, converter.history(), state.display_limit);
    view.success = Some(HISTORY_CLEARED.to_string());
    render_page(&state.renderer, CONVERTER_PAGE, &view, StatusCode::OK)
}

pub async fn refresh_rates(State(state): State<SharedState>) -> Response {
    let mut converter = state.converter.lock().await;
    let snapshot = converter.refresh_rates().await;
    let mut view = ConverterView::new(Category::Currency, converter.history(), state.display_limit);
    if snapshot.fetch_failed {
        view.warning = Some(RATES_UNAVAILABLE.to_string());
    } else {
        view.success = Some(RATES_UPDATED.to_string());
    }
    render_page(&state.renderer, CONVERTER_PAGE, &view, StatusCode::OK)
}

// --- Chat page ---

pub async fn chat_page(State(state): State<SharedState>) -> Response {
    let chat = state.chat.lock().await;
    render_page(&state.renderer, CHAT_PAGE, &ChatView::new(&chat), StatusCode::OK)
}

fn chat_error_page(state: &SharedState, view: ChatView, err: &anyhow::Error) -> Response {
    let status = status_for(err);
    render_page(&state.renderer, CHAT_PAGE, &view.with_error(err.to_string()), status)
}

pub async fn new_chat(State(state): State<SharedState>) -> Response {
    let mut chat = state.chat.lock().await;
    match chat.new_chat() {
        Ok(_) => Redirect::to("/chat").into_response(),
        Err(e) => chat_error_page(&state, ChatView::new(&chat), &e),
    }
}

pub async fn select_chat(State(state): State<SharedState>, Path(id): Path<String>) -> Response {
    let mut chat = state.chat.lock().await;
    if !chat.store().contains(&id) {
        let view = ChatView::new(&chat).with_error(format!("Unknown chat id '{}'", id));
        return render_page(&state.renderer, CHAT_PAGE, &view, StatusCode::NOT_FOUND);
    }
    match chat.select(&id) {
        Ok(()) => Redirect::to("/chat").into_response(),
        Err(e) => chat_error_page(&state, ChatView::new(&chat), &e),
    }
}

pub async fn delete_chat(State(state): State<SharedState>, Path(id): Path<String>) -> Response {
    let mut chat = state.chat.lock().await;
    match chat.delete(&id) {
        Ok(true) => Redirect::to("/chat").into_response(),
        Ok(false) => {
            let view = ChatView::new(&chat).with_error(format!("Unknown chat id '{}'", id));
            render_page(&state.renderer, CHAT_PAGE, &view, StatusCode::NOT_FOUND)
        }
        Err(e) => chat_error_page(&state, ChatView::new(&chat), &e),
    }
}

#[derive(Deserialize, Debug)]
pub struct SettingsForm {
    model: String,
    temperature: String,
}

pub async fn update_settings(
    State(state): State<SharedState>,
    Form(form): Form<SettingsForm>,
) -> Response {
    let mut chat = state.chat.lock().await;
    let parsed = form.model.parse::<ModelChoice>().and_then(|model| {
        let temperature = form
            .temperature
            .trim()
            .parse::<f64>()
            .map_err(|_| {
                UnitxError::ArgumentParsing(format!("'{}' is not a number", form.temperature))
            })
            .and_then(parse_temperature)?;
        Ok((model, temperature))
    });
    let result = parsed
        .map_err(anyhow::Error::from)
        .and_then(|(model, temperature)| {
            chat.set_model(model);
            chat.set_temperature(temperature)
        });
    match result {
        Ok(()) => Redirect::to("/chat").into_response(),
        Err(e) => chat_error_page(&state, ChatView::new(&chat), &e),
    }
}

#[derive(Deserialize, Debug)]
pub struct SendForm {
    prompt: String,
}

pub async fn send_prompt(
    State(state): State<SharedState>,
    Form(form): Form<SendForm>,
) -> Response {
    let prompt = form.prompt.trim();
    if prompt.is_empty() {
        return Redirect::to("/chat").into_response();
    }
    let mut chat = state.chat.lock().await;
    let llm = DeferredModel::new(state.model_factory.clone(), chat.model());
    match chat.send(&llm, prompt).await {
        Ok(_) => Redirect::to("/chat").into_response(),
        Err(e) => {
            error!("Chat prompt failed: {:?}", e);
            chat_error_page(&state, ChatView::new(&chat), &e)
        }
    }
}

// --- JSON API ---

#[derive(Serialize, Debug)]
pub struct CategoryInfo {
    name: &'static str,
    icon: &'static str,
    units: Vec<&'static str>,
}

pub async fn api_categories() -> Json<Vec<CategoryInfo>> {
    Json(
        Category::ALL
            .iter()
            .map(|c| CategoryInfo {
                name: c.name(),
                icon: c.icon(),
                units: c.units(),
            })
            .collect(),
    )
}

#[derive(Deserialize, Debug)]
pub struct ApiConvertRequest {
    category: String,
    from: String,
    to: String,
    value: f64,
}

#[derive(Serialize, Debug, Deserialize, PartialEq)]
pub struct ApiConvertResponse {
    pub result: f64,
    pub factor: f64,
    pub formula: String,
    pub history_entry: String,
}

pub async fn api_convert(
    State(state): State<SharedState>,
    Json(request): Json<ApiConvertRequest>,
) -> Result<Json<ApiConvertResponse>, ApiError> {
    if !request.value.is_finite() {
        return Err(UnitxError::ArgumentParsing("value must be a finite number".into()).into());
    }
    let category: Category = request.category.parse()?;
    let from = category.resolve_unit(&request.from)?;
    let to = category.resolve_unit(&request.to)?;

    let mut converter = state.converter.lock().await;
    let outcome = converter.convert(category, &from, &to, request.value).await?;
    if outcome.rates_unavailable {
        warn!("{} for API conversion", RATES_UNAVAILABLE);
    }
    let conversion = outcome.conversion;
    Ok(Json(ApiConvertResponse {
        result: conversion.result,
        factor: conversion.factor,
        history_entry: conversion.history_entry(),
        formula: conversion.formula,
    }))
}

#[derive(Deserialize, Debug)]
pub struct ClassifyRequest {
    text: String,
}

pub async fn api_classify(Json(request): Json<ClassifyRequest>) -> Json<serde_json::Value> {
    Json(json!({ "is_conversion_question": is_conversion_question(&request.text) }))
}
