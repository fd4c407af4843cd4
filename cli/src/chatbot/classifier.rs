//! # UnitXchange Conversion-Question Classifier
//!
//! File: cli/src/chatbot/classifier.rs
//!
//! ## Overview
//!
//! Decides whether free text is phrased as a unit-conversion request. Used by the
//! strict (temperature 0) responder mode and by the `check` command.
//!
//! ## Algorithm
//!
//! 1. Lower-case the text and collapse runs of whitespace.
//! 2. Insert a space between a digit and a directly following letter (`5km` → `5 km`).
//! 3. Try eight templates in order: "convert X to Y", "how many X are in Y",
//!    "what is X to Y" and "change X to Y", each with and without a space between
//!    the number and its unit.
//! 4. For a matching template, strip digits, whitespace and periods from every
//!    captured group and count the groups containing a known unit name as a
//!    substring. Two or more accepts the text; otherwise the next template is tried.
//!
//! Matching is intentionally literal. `"5km to miles"` is rejected even though both
//! units are known, because it follows none of the templates.
//!
use regex::Regex;
use std::sync::OnceLock;

/// Recognised unit names and abbreviations, grouped by dimension.
const LENGTH_UNITS: &[&str] = &[
    "kilometer", "kilometre", "meter", "metre", "centimeter", "centimetre", "millimeter",
    "millimetre", "mile", "yard", "foot", "feet", "inch", "km", "m", "cm", "mm", "mi", "yd",
    "ft", "in",
];
const WEIGHT_UNITS: &[&str] = &[
    "kilogram", "kilo", "gram", "milligram", "pound", "ounce", "kg", "g", "mg", "lb", "oz",
    "ton", "tonne",
];
const TEMPERATURE_UNITS: &[&str] = &["celsius", "fahrenheit", "kelvin", "°c", "°f", "k"];
const VOLUME_UNITS: &[&str] = &[
    "liter", "litre", "milliliter", "millilitre", "gallon", "quart", "pint", "cup", "l", "ml",
    "gal", "qt", "pt",
];
const TIME_UNITS: &[&str] = &[
    "second", "minute", "hour", "day", "week", "month", "year", "sec", "min", "hr", "yr",
];

const TEMPLATES: [&str; 8] = [
    r"convert\s+(\d+(?:\.\d+)?)\s*([a-zA-Z°]+)\s+(?:to|into|in)\s+([a-zA-Z°]+)",
    r"how\s+many\s+([a-zA-Z°]+)\s+(?:are|is)\s+(?:in|there\s+in)\s+(\d+(?:\.\d+)?)\s*([a-zA-Z°]+)",
    r"what\s+is\s+(\d+(?:\.\d+)?)\s*([a-zA-Z°]+)\s+(?:to|in|into)\s+([a-zA-Z°]+)",
    r"change\s+(\d+(?:\.\d+)?)\s*([a-zA-Z°]+)\s+(?:to|into|in)\s+([a-zA-Z°]+)",
    r"convert\s+(\d+(?:\.\d+)?)([a-zA-Z°]+)\s+(?:to|into|in)\s+([a-zA-Z°]+)",
    r"how\s+many\s+([a-zA-Z°]+)\s+(?:are|is)\s+(?:in|there\s+in)\s+(\d+(?:\.\d+)?)([a-zA-Z°]+)",
    r"what\s+is\s+(\d+(?:\.\d+)?)([a-zA-Z°]+)\s+(?:to|in|into)\s+([a-zA-Z°]+)",
    r"change\s+(\d+(?:\.\d+)?)([a-zA-Z°]+)\s+(?:to|into|in)\s+([a-zA-Z°]+)",
];

static TEMPLATE_REGEXES: OnceLock<Vec<Regex>> = OnceLock::new();
static DIGIT_LETTER_REGEX: OnceLock<Regex> = OnceLock::new();
static UNIT_NOISE_REGEX: OnceLock<Regex> = OnceLock::new();

fn templates() -> &'static [Regex] {
    TEMPLATE_REGEXES.get_or_init(|| {
        TEMPLATES
            .iter()
            .map(|pattern| Regex::new(pattern).expect("conversion template is a valid regex"))
            .collect()
    })
}

fn all_units() -> impl Iterator<Item = &'static str> {
    LENGTH_UNITS
        .iter()
        .chain(WEIGHT_UNITS)
        .chain(TEMPERATURE_UNITS)
        .chain(VOLUME_UNITS)
        .chain(TIME_UNITS)
        .copied()
}

/// Lower-cases, collapses whitespace and separates `5km` into `5 km`.
pub fn normalize(text: &str) -> String {
    let collapsed = text
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let digit_letter = DIGIT_LETTER_REGEX
        .get_or_init(|| Regex::new(r"(\d)([a-zA-Z])").expect("digit-letter regex is valid"));
    digit_letter.replace_all(&collapsed, "$1 $2").into_owned()
}

/// True when `token` contains any recognised unit name.
fn is_known_unit(token: &str) -> bool {
    !token.is_empty() && all_units().any(|unit| token.contains(unit))
}

/// Returns true when `text` is phrased as a recognised conversion request.
pub fn is_conversion_question(text: &str) -> bool {
    let text = normalize(text);
    let noise = UNIT_NOISE_REGEX
        .get_or_init(|| Regex::new(r"[\d\s.]").expect("unit noise regex is valid"));

    templates().iter().any(|template| {
        let Some(captures) = template.captures(&text) else {
            return false;
        };
        let known_units = captures
            .iter()
            .skip(1)
            .flatten()
            .map(|group| noise.replace_all(group.as_str(), ""))
            .filter(|token| is_known_unit(token))
            .count();
        known_units >= 2
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_standard_phrasings() {
        assert!(is_conversion_question("Convert 5 km to miles"));
        assert!(is_conversion_question("convert 2.5 kilograms into pounds"));
        assert!(is_conversion_question("How many feet are in 3 yards"));
        assert!(is_conversion_question("what is 100 celsius in fahrenheit"));
        assert!(is_conversion_question("Change 2 hours to minutes"));
    }

    #[test]
    fn test_accepts_unit_glued_to_number() {
        assert!(is_conversion_question("convert 5km to miles"));
        assert!(is_conversion_question("what is 10kg in pounds?"));
    }

    #[test]
    fn test_rejects_non_templates() {
        assert!(!is_conversion_question("what is the weather today"));
        assert!(!is_conversion_question("5km to miles"));
        assert!(!is_conversion_question(""));
        assert!(!is_conversion_question("tell me a joke"));
    }

    #[test]
    fn test_rejects_single_recognised_unit() {
        // "xyz" contains no unit name, only "km" counts.
        assert!(!is_conversion_question("convert 5 km to xyz"));
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize("  Convert   5KM\tto  Miles "), "convert 5 km to miles");
        assert_eq!(normalize("2.5kg"), "2.5 kg");
    }
}
