//! # UnitXchange Categories and Unit Tables
//!
//! File: cli/src/conversion/units.rs
//!
//! ## Overview
//!
//! Defines the closed set of conversion categories and the static factor tables
//! for every linear category. Each factor expresses how many base units one unit
//! is worth (Meters for Distance, Kilograms for Weight, Pascals for Pressure,
//! Seconds for Time, Liters for Volume, Square Meters for Area, Meters per second
//! for Speed and Bytes for Data).
//!
//! Temperature has no factor table since it is an affine transform, and Currency
//! takes its factors from the live exchange-rate lookup (see `currency.rs`).
//!
use crate::core::error::UnitxError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A unit-conversion domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Distance,
    Temperature,
    Weight,
    Pressure,
    Currency,
    Time,
    Volume,
    Area,
    Speed,
    Data,
}

/// How values of a category are transformed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Scale {
    /// Multiplicative factor relative to a base unit.
    Linear(&'static [(&'static str, f64)]),
    /// Celsius/Fahrenheit affine transform.
    Affine,
    /// Externally supplied exchange rates relative to USD.
    Rates,
}

const DISTANCE: &[(&str, f64)] = &[
    ("Meters", 1.0),
    ("Kilometers", 1000.0),
    ("Feet", 0.3048),
    ("Miles", 1609.34),
    ("Yards", 0.9144),
    ("Inches", 0.0254),
];

const WEIGHT: &[(&str, f64)] = &[
    ("Kilograms", 1.0),
    ("Grams", 0.001),
    ("Pounds", 0.453592),
    ("Ounces", 0.0283495),
    ("Stones", 6.35029),
];

const PRESSURE: &[(&str, f64)] = &[
    ("Pascals", 1.0),
    ("Hectopascals", 100.0),
    ("Kilopascals", 1000.0),
    ("Bar", 100000.0),
    ("Atmospheres", 101325.0),
];

const TIME: &[(&str, f64)] = &[
    ("Seconds", 1.0),
    ("Minutes", 60.0),
    ("Hours", 3600.0),
    ("Days", 86400.0),
    ("Weeks", 604800.0),
    ("Months", 2628000.0),
];

const VOLUME: &[(&str, f64)] = &[
    ("Liters", 1.0),
    ("Milliliters", 0.001),
    ("Gallons", 3.78541),
    ("Cups", 0.236588),
    ("Cubic Meters", 1000.0),
];

const AREA: &[(&str, f64)] = &[
    ("Square Meters", 1.0),
    ("Square Kilometers", 1e6),
    ("Acres", 4046.86),
    ("Hectares", 10000.0),
];

const SPEED: &[(&str, f64)] = &[
    ("Meters per second", 1.0),
    ("Kilometers per hour", 0.277778),
    ("Miles per hour", 0.44704),
    ("Knots", 0.514444),
];

const DATA: &[(&str, f64)] = &[
    ("Bytes", 1.0),
    ("Kilobytes", 1024.0),
    ("Megabytes", 1_048_576.0),
    ("Gigabytes", 1_073_741_824.0),
    ("Terabytes", 1_099_511_627_776.0),
];

const TEMPERATURE_UNITS: &[&str] = &["Celsius", "Fahrenheit"];

/// Currency codes offered by the converter page.
pub const CURRENCY_CODES: &[&str] = &["USD", "EUR", "INR", "JPY", "GBP", "AUD", "PKR"];

impl Category {
    /// All categories in display order.
    pub const ALL: [Category; 10] = [
        Category::Distance,
        Category::Temperature,
        Category::Weight,
        Category::Pressure,
        Category::Currency,
        Category::Time,
        Category::Volume,
        Category::Area,
        Category::Speed,
        Category::Data,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Category::Distance => "Distance",
            Category::Temperature => "Temperature",
            Category::Weight => "Weight",
            Category::Pressure => "Pressure",
            Category::Currency => "Currency",
            Category::Time => "Time",
            Category::Volume => "Volume",
            Category::Area => "Area",
            Category::Speed => "Speed",
            Category::Data => "Data",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            Category::Distance => "📏",
            Category::Temperature => "🌡️",
            Category::Weight => "⚖️",
            Category::Pressure => "🎯",
            Category::Currency => "💱",
            Category::Time => "⏰",
            Category::Volume => "🧪",
            Category::Area => "📐",
            Category::Speed => "🚀",
            Category::Data => "💾",
        }
    }

    pub fn scale(self) -> Scale {
        match self {
            Category::Distance => Scale::Linear(DISTANCE),
            Category::Weight => Scale::Linear(WEIGHT),
            Category::Pressure => Scale::Linear(PRESSURE),
            Category::Time => Scale::Linear(TIME),
            Category::Volume => Scale::Linear(VOLUME),
            Category::Area => Scale::Linear(AREA),
            Category::Speed => Scale::Linear(SPEED),
            Category::Data => Scale::Linear(DATA),
            Category::Temperature => Scale::Affine,
            Category::Currency => Scale::Rates,
        }
    }

    /// Unit names offered for this category, in display order.
    pub fn units(self) -> Vec<&'static str> {
        match self.scale() {
            Scale::Linear(table) => table.iter().map(|(name, _)| *name).collect(),
            Scale::Affine => TEMPERATURE_UNITS.to_vec(),
            Scale::Rates => CURRENCY_CODES.to_vec(),
        }
    }

    /// Looks up the factor of `unit` relative to the category's base unit.
    ///
    /// Only meaningful for linear categories; returns `UnknownUnit` otherwise.
    pub fn factor(self, unit: &str) -> Result<f64, UnitxError> {
        let unknown = || UnitxError::UnknownUnit {
            category: self.name().to_string(),
            unit: unit.to_string(),
        };
        match self.scale() {
            Scale::Linear(table) => table
                .iter()
                .find(|(name, _)| *name == unit)
                .map(|(_, factor)| *factor)
                .ok_or_else(unknown),
            _ => Err(unknown()),
        }
    }

    /// Maps user-typed unit text onto the canonical unit name.
    ///
    /// Linear units match case-insensitively and must exist. Currency codes are
    /// upper-cased and left for the rate table to judge. Temperature names are
    /// canonicalised when known and passed through otherwise.
    pub fn resolve_unit(self, input: &str) -> Result<String, UnitxError> {
        let wanted = input.trim();
        match self.scale() {
            Scale::Linear(table) => table
                .iter()
                .map(|(name, _)| *name)
                .find(|name| name.eq_ignore_ascii_case(wanted))
                .map(str::to_string)
                .ok_or_else(|| UnitxError::UnknownUnit {
                    category: self.name().to_string(),
                    unit: wanted.to_string(),
                }),
            Scale::Affine => Ok(TEMPERATURE_UNITS
                .iter()
                .find(|name| name.eq_ignore_ascii_case(wanted))
                .map_or_else(|| wanted.to_string(), |name| name.to_string())),
            Scale::Rates => Ok(wanted.to_ascii_uppercase()),
        }
    }

    pub fn label(self) -> String {
        format!("{} {}", self.icon(), self.name())
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Category {
    type Err = UnitxError;

    /// Parses a category name case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Category::ALL
            .into_iter()
            .find(|c| c.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| UnitxError::UnknownCategory(s.to_string()))
    }
}
