//! # UnitXchange Error Types
//!
//! File: cli/src/core/error.rs
//!
//! ## Overview
//!
//! This module defines the error types and error handling mechanisms used throughout
//! the UnitXchange application. It provides a consistent approach to error management
//! with detailed error information and context.
//!
//! ## Architecture
//!
//! The error system consists of two main components:
//! - `UnitxError`: A custom error enum using `thiserror` for specific error types
//! - `Result<T>`: A type alias for `anyhow::Result<T>` for flexible error handling
//!
//! The error types cover various domains:
//! - Unit and category lookups in the conversion engine
//! - Missing exchange rates for currency conversions
//! - Configuration errors
//! - Chat-history storage errors
//! - Hosted language-model failures
//! - Page template rendering
//!
//! ## Examples
//!
//! ```rust
//! // Return a specific error type
//! let factor = table.factor(unit).ok_or_else(|| UnitxError::UnknownUnit {
//!     category: category.to_string(),
//!     unit: unit.to_string(),
//! })?;
//!
//! // Pattern matching on error types at the web layer
//! match err.downcast_ref::<UnitxError>() {
//!     Some(UnitxError::LanguageModel(_)) => StatusCode::BAD_GATEWAY,
//!     _ => StatusCode::BAD_REQUEST,
//! }
//! ```
//!
use thiserror::Error;

/// Custom error type for the UnitXchange application.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum UnitxError {
    #[error("Unknown unit '{unit}' for category {category}.")]
    UnknownUnit { category: String, unit: String },

    #[error("Unknown category '{0}'.")]
    UnknownCategory(String),

    #[error("No exchange rate available for '{code}'.")]
    MissingRate { code: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Chat storage error: {0}")]
    Storage(String),

    #[error("Language model request failed: {0}")]
    LanguageModel(String),

    #[error("Template error: {0}")]
    Template(String),

    #[error("Argument parsing error: {0}")]
    ArgumentParsing(String),
}

/// Type alias for Result using anyhow::Error for broad compatibility.
/// Anyhow allows for easy context addition and flexible error handling.
pub type Result<T> = anyhow::Result<T>;

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let config_err = UnitxError::Config("ttl_secs must be positive".to_string());
        assert_eq!(
            config_err.to_string(),
            "Configuration error: ttl_secs must be positive"
        );

        let unknown_unit = UnitxError::UnknownUnit {
            category: "Distance".into(),
            unit: "Furlongs".into(),
        };
        assert_eq!(
            unknown_unit.to_string(),
            "Unknown unit 'Furlongs' for category Distance."
        );

        let missing_rate = UnitxError::MissingRate { code: "EUR".into() };
        assert_eq!(
            missing_rate.to_string(),
            "No exchange rate available for 'EUR'."
        );
    }

    #[test]
    fn test_error_downcast_through_anyhow() {
        let err: anyhow::Error = UnitxError::LanguageModel("timeout".into()).into();
        let err = err.context("Failed to answer prompt");
        assert!(matches!(
            err.downcast_ref::<UnitxError>(),
            Some(UnitxError::LanguageModel(_))
        ));
    }
}
