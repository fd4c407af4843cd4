//! # UnitXchange Conversion Responder
//!
//! File: cli/src/chatbot/responder.rs
//!
//! ## Overview
//!
//! Turns a chat prompt into the bot's reply, driven by the creativity setting
//! ("temperature", 0.0 to 1.0).
//!
//! ## Modes
//!
//! - **Strict** (temperature 0): prompts the classifier rejects get a fixed usage
//!   hint. Accepted prompts are wrapped in an instruction asking for only the number
//!   and unit; the reply is scrubbed to letters, digits, whitespace, periods and `°`,
//!   and the first `<number> <unit>` pair is returned.
//! - **Creative** (temperature above 0): prompts without "convert", "how many" or
//!   "what is" are refused. Otherwise a small table of well-known unit pairs supplies
//!   a formula and explanation ahead of the model's answer; unmatched prompts get a
//!   generic lead-in and a request for a detailed explanation.
//!
//! Each call makes at most one model request. Model failures propagate unchanged.
//! A refusal is returned without a model request and is flagged as such in the
//! `BotReply`, so callers can keep it out of the chat history.
//!
use super::classifier::is_conversion_question;
use super::model::{ChatTurn, LanguageModel, MIN_TEMPERATURE};
use crate::core::error::Result;
use regex::Regex;
use std::sync::OnceLock;
use tracing::debug;

/// Strict-mode reply for prompts the classifier rejects.
pub const STRICT_USAGE_HINT: &str = "Invalid format. Use:\n'Convert X units to units'";

/// Creative-mode reply for prompts without a conversion keyword.
pub const CREATIVE_REFUSAL: &str =
    "I only handle conversion questions! Try asking something like 'convert 5 kilometers to miles' 😊";

const STRICT_INSTRUCTION: &str = "Respond with ONLY the number and unit. \
    No explanations, no additional text. \
    Example format: '1000 grams' or '100 meters'. \
    Question: ";

const CREATIVE_KEYWORDS: [&str; 3] = ["convert", "how many", "what is"];

const GENERIC_LEAD_IN: &str = "🔄 Let me help you with that conversion!\n\n";
const DETAIL_REQUEST: &str = "\nProvide a detailed explanation with the conversion.";

struct FormulaHint {
    units: (&'static str, &'static str),
    formula: &'static str,
    explanation: &'static str,
}

const FORMULA_HINTS: [FormulaHint; 4] = [
    FormulaHint {
        units: ("kilo", "gram"),
        formula: "1 kilogram = 1000 grams",
        explanation: "Multiply kilograms by 1000 to get grams",
    },
    FormulaHint {
        units: ("meter", "centimeter"),
        formula: "1 meter = 100 centimeters",
        explanation: "Multiply meters by 100 to get centimeters",
    },
    FormulaHint {
        units: ("celsius", "fahrenheit"),
        formula: "°F = (°C × 9/5) + 32",
        explanation: "First multiply by 9/5, then add 32",
    },
    FormulaHint {
        units: ("mile", "kilometer"),
        formula: "1 mile ≈ 1.60934 kilometers",
        explanation: "Multiply miles by 1.60934 to get kilometers",
    },
];

/// The bot's reply to one prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BotReply {
    pub text: String,
    /// False when the prompt was refused without asking the model.
    pub from_model: bool,
}

impl BotReply {
    fn refusal(text: &str) -> Self {
        Self {
            text: text.to_string(),
            from_model: false,
        }
    }

    fn answer(text: String) -> Self {
        Self {
            text,
            from_model: true,
        }
    }
}

static REPLY_NOISE_REGEX: OnceLock<Regex> = OnceLock::new();
static NUMBER_UNIT_REGEX: OnceLock<Regex> = OnceLock::new();

/// True when the creativity setting selects strict mode.
pub fn is_strict(temperature: f64) -> bool {
    temperature <= MIN_TEMPERATURE
}

/// Produces the bot reply for `prompt`.
///
/// ## Arguments
///
/// * `model` - The completion service; called at most once.
/// * `history` - Prior turns of the active chat, forwarded to the model.
/// * `prompt` - The user's text, unmodified.
/// * `temperature` - Creativity setting; 0.0 selects strict mode.
///
/// ## Returns
///
/// * `Result<BotReply>` - The reply, or the model's error.
pub async fn generate_conversion_response(
    model: &dyn LanguageModel,
    history: &[ChatTurn],
    prompt: &str,
    temperature: f64,
) -> Result<BotReply> {
    if is_strict(temperature) {
        strict_response(model, history, prompt).await
    } else {
        creative_response(model, history, prompt).await
    }
}

async fn strict_response(
    model: &dyn LanguageModel,
    history: &[ChatTurn],
    prompt: &str,
) -> Result<BotReply> {
    if !is_conversion_question(prompt) {
        debug!("Strict mode rejected prompt: {}", prompt);
        return Ok(BotReply::refusal(STRICT_USAGE_HINT));
    }
    let wrapped = format!("{}{}", STRICT_INSTRUCTION, prompt);
    let reply = model.send_message(history, &wrapped).await?;
    Ok(BotReply::answer(extract_number_and_unit(&reply)))
}

async fn creative_response(
    model: &dyn LanguageModel,
    history: &[ChatTurn],
    prompt: &str,
) -> Result<BotReply> {
    let lowered = prompt.to_lowercase();
    if !CREATIVE_KEYWORDS.iter().any(|kw| lowered.contains(kw)) {
        debug!("Creative mode refused prompt without conversion keyword");
        return Ok(BotReply::refusal(CREATIVE_REFUSAL));
    }

    let hint = FORMULA_HINTS
        .iter()
        .find(|hint| lowered.contains(hint.units.0) && lowered.contains(hint.units.1));

    match hint {
        Some(hint) => {
            debug!("Using formula hint for {:?}", hint.units);
            let answer = model.send_message(history, prompt).await?;
            Ok(BotReply::answer(format!(
                "🔢 **Formula:**\n{}\n\n📝 **How to Convert:**\n{}\n\n🎯 **Your Result:**\n{}",
                hint.formula, hint.explanation, answer
            )))
        }
        None => {
            let detailed = format!("{}{}", prompt, DETAIL_REQUEST);
            let answer = model.send_message(history, &detailed).await?;
            Ok(BotReply::answer(format!("{}{}", GENERIC_LEAD_IN, answer)))
        }
    }
}

/// Scrubs a strict-mode reply down to its first `<number> <unit>` pair.
///
/// Falls back to the scrubbed, trimmed text when no pair is present.
pub fn extract_number_and_unit(reply: &str) -> String {
    let noise = REPLY_NOISE_REGEX
        .get_or_init(|| Regex::new(r"[^0-9\s.a-zA-Z°]").expect("reply noise regex is valid"));
    let pair = NUMBER_UNIT_REGEX.get_or_init(|| {
        Regex::new(r"(\d+(?:\.\d+)?)\s*([a-zA-Z°]+)").expect("number-unit regex is valid")
    });

    let cleaned = noise.replace_all(reply, "");
    match pair.captures(&cleaned) {
        Some(caps) => format!("{} {}", &caps[1], &caps[2]),
        None => cleaned.trim().to_string(),
    }
}
