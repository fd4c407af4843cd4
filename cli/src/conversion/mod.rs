//! # UnitXchange Conversion Core
//!
//! File: cli/src/conversion/mod.rs
//!
//! ## Overview
//!
//! Everything behind the unit-converter page:
//!
//! - `units`: the `Category` enum and the static factor tables.
//! - `engine`: linear, affine (temperature) and rate-based (currency) conversions.
//! - `formula`: formula-line formatting.
//! - `currency`: the exchange-rate source and its TTL cache.
//! - `history`: the recent-conversions log.
//!
//! `ConverterSession` ties the rate cache and the history log together so a
//! handler can run one convert action against explicit session state.
//!
pub mod currency;
pub mod engine;
pub mod formula;
pub mod history;
pub mod units;

use crate::core::error::UnitxError;
use currency::{RateCache, RateSnapshot};
use engine::Conversion;
use history::HistoryLog;
use tracing::debug;
use units::Category;

/// Note shown below currency conversions.
pub const CURRENCY_NOTE: &str = "Note: Currency rates are fetched in real-time";

/// Outcome of a convert action, including whether the rate lookup degraded.
#[derive(Debug, Clone)]
pub struct ConvertOutcome {
    pub conversion: Conversion,
    pub rates_unavailable: bool,
}

/// Converter state for one user: the rate cache and the history log.
pub struct ConverterSession {
    rates: RateCache,
    history: HistoryLog,
}

impl ConverterSession {
    pub fn new(rates: RateCache) -> Self {
        Self {
            rates,
            history: HistoryLog::new(),
        }
    }

    /// Converts and records the result in the history log.
    ///
    /// Rates are only fetched for the Currency category.
    pub async fn convert(
        &mut self,
        category: Category,
        from_unit: &str,
        to_unit: &str,
        value: f64,
    ) -> Result<ConvertOutcome, UnitxError> {
        let snapshot = if category == Category::Currency {
            self.rates.rates().await
        } else {
            RateSnapshot::default()
        };
        let conversion = engine::convert(category, from_unit, to_unit, value, &snapshot.rates)?;
        self.history.push(conversion.history_entry());
        Ok(ConvertOutcome {
            conversion,
            rates_unavailable: snapshot.fetch_failed,
        })
    }

    pub async fn refresh_rates(&mut self) -> RateSnapshot {
        self.rates.refresh().await
    }

    pub fn history(&self) -> &HistoryLog {
        &self.history
    }

    pub fn clear_history(&mut self) {
        debug!("Clearing {} history entries", self.history.len());
        self.history.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::Result;
    use async_trait::async_trait;
    use currency::RateSource;
    use engine::Rates;
    use std::sync::Arc;
    use std::time::Duration;

    struct FixedRates(Option<Rates>);

    #[async_trait]
    impl RateSource for FixedRates {
        async fn fetch(&self) -> Result<Rates> {
            self.0.clone().ok_or_else(|| anyhow::anyhow!("offline"))
        }
    }

    fn session(rates: Option<Rates>) -> ConverterSession {
        ConverterSession::new(RateCache::new(
            Arc::new(FixedRates(rates)),
            Duration::from_secs(600),
        ))
    }

    #[tokio::test]
    async fn test_convert_appends_history() {
        let mut session = session(None);
        session
            .convert(Category::Time, "Hours", "Minutes", 2.0)
            .await
            .unwrap();
        session
            .convert(Category::Weight, "Kilograms", "Grams", 1.5)
            .await
            .unwrap();
        assert_eq!(
            session.history().recent(10),
            vec!["1.5 Kilograms → 1500.00 Grams", "2.0 Hours → 120.00 Minutes"]
        );
        session.clear_history();
        assert!(session.history().is_empty());
    }

    #[tokio::test]
    async fn test_currency_without_rates_is_missing_rate() {
        let mut session = session(None);
        let err = session
            .convert(Category::Currency, "USD", "EUR", 10.0)
            .await
            .unwrap_err();
        assert!(matches!(err, UnitxError::MissingRate { .. }));
        assert!(session.history().is_empty());
    }

    #[tokio::test]
    async fn test_currency_with_rates() {
        let rates = Rates::from([("USD".to_string(), 1.0), ("EUR".to_string(), 0.9)]);
        let mut session = session(Some(rates));
        let outcome = session
            .convert(Category::Currency, "USD", "EUR", 10.0)
            .await
            .unwrap();
        assert!(!outcome.rates_unavailable);
        assert!((outcome.conversion.result - 9.0).abs() < 1e-9);
        assert_eq!(outcome.conversion.formula, "10.0 USD × 0.9000 = 9.00 EUR");
    }
}
