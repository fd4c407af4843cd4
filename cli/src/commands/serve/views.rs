//! # UnitXchange Page View Models
//!
//! File: cli/src/commands/serve/views.rs
//!
//! Serializable structs handed to the Tera templates. Field names match the
//! variables used in `converter.html` and `chat.html`.
//!
use crate::chatbot::model::ModelChoice;
use crate::chatbot::session::ChatSessionState;
use crate::conversion::engine::Conversion;
use crate::conversion::history::HistoryLog;
use crate::conversion::units::Category;
use crate::conversion::CURRENCY_NOTE;
use serde::Serialize;

pub const CONVERTER_TITLE: &str = "🔄 UnitXchange";
pub const CONVERTER_SUBTITLE: &str =
    "Your all-in-one solution for quick and accurate unit conversions";
pub const EMPTY_HISTORY: &str = "No conversions yet. Start converting to build your history!";
pub const HISTORY_CLEARED: &str = "Conversion history cleared!";
pub const RATES_UPDATED: &str = "Currency rates updated!";
pub const RATES_UNAVAILABLE: &str = "Error fetching currency rates";

pub const CHAT_TITLE: &str = "Ö unitXchange - Bot";
pub const CHAT_PLACEHOLDER: &str = "Ask me anything...";
pub const TEMPERATURE_GUIDE: [&str; 3] = [
    "0.0: Only responds to valid unit conversion questions",
    "1.0: Responds to conversion questions with creative answers",
    "Other questions will be ignored",
];

#[derive(Serialize, Debug)]
pub struct CategoryOption {
    pub name: &'static str,
    pub label: String,
    pub selected: bool,
}

#[derive(Serialize, Debug)]
pub struct ConversionView {
    pub formula_line: String,
    pub note: Option<&'static str>,
    pub result_line: String,
}

impl From<&Conversion> for ConversionView {
    fn from(conversion: &Conversion) -> Self {
        Self {
            formula_line: conversion.formula_line(),
            note: (conversion.category == Category::Currency).then_some(CURRENCY_NOTE),
            result_line: conversion.result_line(),
        }
    }
}

#[derive(Serialize, Debug)]
pub struct ConverterView {
    pub title: &'static str,
    pub subtitle: &'static str,
    pub success: Option<String>,
    pub warning: Option<String>,
    pub error: Option<String>,
    pub categories: Vec<CategoryOption>,
    pub category: &'static str,
    pub units: Vec<&'static str>,
    pub from_unit: String,
    pub to_unit: String,
    pub value: String,
    pub conversion: Option<ConversionView>,
    pub history: Vec<String>,
    pub empty_history: &'static str,
}

impl ConverterView {
    /// Page for `category` with the first unit preselected on both sides.
    pub fn new(category: Category, history: &HistoryLog, display_limit: usize) -> Self {
        let units = category.units();
        let first = units.first().copied().unwrap_or_default().to_string();
        Self {
            title: CONVERTER_TITLE,
            subtitle: CONVERTER_SUBTITLE,
            success: None,
            warning: None,
            error: None,
            categories: Category::ALL
                .iter()
                .map(|c| CategoryOption {
                    name: c.name(),
                    label: c.label(),
                    selected: *c == category,
                })
                .collect(),
            category: category.name(),
            units,
            from_unit: first.clone(),
            to_unit: first,
            value: "0.00".to_string(),
            conversion: None,
            history: history
                .recent(display_limit)
                .into_iter()
                .map(str::to_string)
                .collect(),
            empty_history: EMPTY_HISTORY,
        }
    }
}

#[derive(Serialize, Debug)]
pub struct ModelOption {
    pub id: &'static str,
    pub selected: bool,
}

#[derive(Serialize, Debug)]
pub struct ChatItem {
    pub id: String,
    pub name: String,
    pub active: bool,
}

#[derive(Serialize, Debug)]
pub struct TurnView {
    pub role: &'static str,
    pub text: String,
}

#[derive(Serialize, Debug)]
pub struct ChatView {
    pub title: &'static str,
    pub placeholder: &'static str,
    pub error: Option<String>,
    pub models: Vec<ModelOption>,
    pub temperature: f64,
    pub temperature_guide: [&'static str; 3],
    pub chats: Vec<ChatItem>,
    pub turns: Vec<TurnView>,
}

impl ChatView {
    pub fn new(session: &ChatSessionState) -> Self {
        let active = session.active_id();
        Self {
            title: CHAT_TITLE,
            placeholder: CHAT_PLACEHOLDER,
            error: None,
            models: ModelChoice::ALL
                .iter()
                .map(|m| ModelOption {
                    id: m.id(),
                    selected: *m == session.model(),
                })
                .collect(),
            temperature: session.temperature(),
            temperature_guide: TEMPERATURE_GUIDE,
            chats: session
                .store()
                .chats()
                .iter()
                .map(|(id, chat)| ChatItem {
                    id: id.clone(),
                    name: chat.name.clone(),
                    active: active == Some(id.as_str()),
                })
                .collect(),
            turns: session
                .active_chat()
                .map(|chat| {
                    chat.history
                        .iter()
                        .map(|turn| TurnView {
                            role: turn.role.display_name(),
                            text: turn.text.clone(),
                        })
                        .collect()
                })
                .unwrap_or_default(),
        }
    }

    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }
}
