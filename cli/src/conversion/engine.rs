//! # UnitXchange Conversion Engine
//!
//! File: cli/src/conversion/engine.rs
//!
//! ## Overview
//!
//! This module turns a conversion request (category, source unit, target unit,
//! value) into a result, the one-unit factor and the formula line shown to the user.
//!
//! ## Architecture
//!
//! Three transforms back the ten categories:
//! - **Linear** (`linear_convert`): `value * factor[from] / factor[to]` over the
//!   static tables in `units.rs`. Unknown unit names fail with `UnknownUnit`.
//! - **Affine** (`temperature_converter`): Celsius ↔ Fahrenheit only. Every other
//!   pair, same-unit included, returns the input unchanged.
//! - **Rates** (`currency_converter`): `value * rates[to] / rates[from]` over the
//!   fetched USD-relative rate map. A missing code fails with `MissingRate`.
//!
//! `convert` dispatches on the category's `Scale`, derives the factor by converting
//! a single unit, and asks `formula.rs` for the display line.
//!
use super::formula;
use super::units::{Category, Scale};
use crate::core::error::UnitxError;
use serde::Serialize;
use std::collections::HashMap;

/// Currency code → rate relative to the base currency (USD).
pub type Rates = HashMap<String, f64>;

/// Outcome of a single conversion request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Conversion {
    pub category: Category,
    pub from_unit: String,
    pub to_unit: String,
    pub value: f64,
    pub result: f64,
    /// The result of converting exactly one `from_unit`.
    pub factor: f64,
    /// Formula text without the category icon, e.g. `5 Kilometers × 0.6214 = 3.11 Miles`.
    pub formula: String,
}

impl Conversion {
    /// The formula line as displayed, prefixed with the category icon.
    pub fn formula_line(&self) -> String {
        format!("{} Formula: {}", self.category.icon(), self.formula)
    }

    /// The centered result banner, e.g. `5.0 Kilometers = 3.11 Miles`.
    pub fn result_line(&self) -> String {
        format!(
            "{} {} = {:.2} {}",
            formula::display_value(self.value),
            self.from_unit,
            self.result,
            self.to_unit
        )
    }

    /// The entry appended to the conversion history log.
    pub fn history_entry(&self) -> String {
        format!(
            "{} {} → {:.2} {}",
            formula::display_value(self.value),
            self.from_unit,
            self.result,
            self.to_unit
        )
    }
}

/// Converts `value` between two units of a linear category.
pub fn linear_convert(
    category: Category,
    from_unit: &str,
    to_unit: &str,
    value: f64,
) -> Result<f64, UnitxError> {
    let from = category.factor(from_unit)?;
    let to = category.factor(to_unit)?;
    Ok(value * from / to)
}

/// Celsius ↔ Fahrenheit. Any other pair is the identity.
pub fn temperature_converter(from_unit: &str, to_unit: &str, value: f64) -> f64 {
    match (from_unit, to_unit) {
        ("Celsius", "Fahrenheit") => (value * 9.0 / 5.0) + 32.0,
        ("Fahrenheit", "Celsius") => (value - 32.0) * 5.0 / 9.0,
        _ => value,
    }
}

/// Converts between two currency codes using USD-relative `rates`.
///
/// Same-code conversions are trivial and succeed even with an empty rate map.
pub fn currency_converter(
    from_unit: &str,
    to_unit: &str,
    value: f64,
    rates: &Rates,
) -> Result<f64, UnitxError> {
    if from_unit == to_unit {
        return Ok(value);
    }
    let rate = |code: &str| {
        rates.get(code).copied().ok_or_else(|| UnitxError::MissingRate {
            code: code.to_string(),
        })
    };
    let to = rate(to_unit)?;
    let from = rate(from_unit)?;
    Ok(value * to / from)
}

pub fn distance_converter(from_unit: &str, to_unit: &str, value: f64) -> Result<f64, UnitxError> {
    linear_convert(Category::Distance, from_unit, to_unit, value)
}

pub fn data_converter(from_unit: &str, to_unit: &str, value: f64) -> Result<f64, UnitxError> {
    linear_convert(Category::Data, from_unit, to_unit, value)
}

/// Runs one conversion request and builds its formula line.
///
/// ## Arguments
///
/// * `category` - The conversion domain.
/// * `from_unit` / `to_unit` - Unit names scoped to `category` (currency codes for Currency).
/// * `value` - The amount to convert.
/// * `rates` - Exchange rates; only consulted for `Category::Currency`.
///
/// ## Errors
///
/// * `UnknownUnit` for a unit name outside a linear category's table.
/// * `MissingRate` for a currency code absent from `rates`.
pub fn convert(
    category: Category,
    from_unit: &str,
    to_unit: &str,
    value: f64,
    rates: &Rates,
) -> Result<Conversion, UnitxError> {
    let (result, factor) = match category.scale() {
        Scale::Linear(_) => {
            let run = |amount: f64| match category {
                Category::Distance => distance_converter(from_unit, to_unit, amount),
                Category::Data => data_converter(from_unit, to_unit, amount),
                _ => linear_convert(category, from_unit, to_unit, amount),
            };
            (run(value)?, run(1.0)?)
        }
        Scale::Affine => (
            temperature_converter(from_unit, to_unit, value),
            temperature_converter(from_unit, to_unit, 1.0),
        ),
        Scale::Rates => (
            currency_converter(from_unit, to_unit, value, rates)?,
            currency_converter(from_unit, to_unit, 1.0, rates)?,
        ),
    };

    let formula = match category.scale() {
        Scale::Affine => formula::temperature_formula(from_unit, to_unit, value, result),
        _ => formula::linear_formula(from_unit, to_unit, value, factor, result),
    };

    Ok(Conversion {
        category,
        from_unit: from_unit.to_string(),
        to_unit: to_unit.to_string(),
        value,
        result,
        factor,
        formula,
    })
}
