//! # UnitXchange Currency Rates
//!
//! File: cli/src/conversion/currency.rs
//!
//! ## Overview
//!
//! Supplies the USD-relative exchange rates used by the Currency category.
//!
//! ## Architecture
//!
//! - `RateSource`: async seam for anything that can produce a rate map.
//! - `HttpRateSource`: GETs a public exchange-rate endpoint returning
//!   `{"rates": {"EUR": 0.9, ...}}`. Non-2xx and malformed bodies are errors.
//! - `RateCache`: owns the staleness window. Rates are refetched only once the
//!   cached copy is older than the configured TTL (ten minutes by default). A
//!   failed fetch degrades to an empty rate map flagged with `fetch_failed`, and
//!   is not cached, so the next request tries again.
//!
//! ## Examples
//!
//! ```rust
//! let source = HttpRateSource::new(&cfg.rates.endpoint)?;
//! let mut cache = RateCache::new(Arc::new(source), Duration::from_secs(600));
//! let snapshot = cache.rates().await;
//! if snapshot.fetch_failed {
//!     eprintln!("Error fetching currency rates");
//! }
//! ```
//!
use super::engine::Rates;
use crate::core::error::Result;
use anyhow::Context;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Default public endpoint for USD-relative rates.
pub const DEFAULT_RATES_ENDPOINT: &str = "https://api.exchangerate-api.com/v4/latest/USD";

/// Default staleness window for cached rates.
pub const DEFAULT_TTL: Duration = Duration::from_secs(600);

/// Anything that can produce a USD-relative rate map.
#[async_trait]
pub trait RateSource: Send + Sync {
    async fn fetch(&self) -> Result<Rates>;
}

#[derive(Deserialize)]
struct RatesApiResponse {
    #[serde(default)]
    rates: Rates,
}

/// Fetches rates from an HTTP endpoint.
pub struct HttpRateSource {
    http: Client,
    endpoint: String,
}

impl HttpRateSource {
    pub fn new(endpoint: impl Into<String>) -> Result<Self> {
        let http = Client::builder()
            .user_agent(concat!("unitxchange/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(10))
            .build()
            .context("Failed to build HTTP client for exchange rates")?;
        Ok(Self {
            http,
            endpoint: endpoint.into(),
        })
    }
}

#[async_trait]
impl RateSource for HttpRateSource {
    async fn fetch(&self) -> Result<Rates> {
        info!("Fetching currency rates from {}", self.endpoint);
        let response = self
            .http
            .get(&self.endpoint)
            .send()
            .await
            .with_context(|| format!("Request to {} failed", self.endpoint))?;

        if !response.status().is_success() {
            anyhow::bail!(
                "Exchange-rate endpoint returned status {}",
                response.status()
            );
        }

        let body: RatesApiResponse = response
            .json()
            .await
            .context("Exchange-rate response was not valid JSON")?;
        debug!("Received {} currency rates", body.rates.len());
        Ok(body.rates)
    }
}

/// Rates handed to the conversion engine.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RateSnapshot {
    pub rates: Rates,
    /// True when the last fetch failed and `rates` is the empty fallback.
    pub fetch_failed: bool,
}

struct CachedRates {
    fetched_at: Instant,
    rates: Rates,
}

/// Time-to-live cache in front of a `RateSource`.
pub struct RateCache {
    source: Arc<dyn RateSource>,
    ttl: Duration,
    cached: Option<CachedRates>,
}

impl RateCache {
    pub fn new(source: Arc<dyn RateSource>, ttl: Duration) -> Self {
        Self {
            source,
            ttl,
            cached: None,
        }
    }

    /// Returns cached rates while fresh, otherwise refetches.
    pub async fn rates(&mut self) -> RateSnapshot {
        if let Some(cached) = &self.cached {
            if cached.fetched_at.elapsed() < self.ttl {
                debug!("Using cached currency rates");
                return RateSnapshot {
                    rates: cached.rates.clone(),
                    fetch_failed: false,
                };
            }
            debug!("Cached currency rates are stale");
        }

        match self.source.fetch().await {
            Ok(rates) if !rates.is_empty() => {
                self.cached = Some(CachedRates {
                    fetched_at: Instant::now(),
                    rates: rates.clone(),
                });
                RateSnapshot {
                    rates,
                    fetch_failed: false,
                }
            }
            Ok(_) => {
                warn!("Exchange-rate source returned no rates");
                self.cached = None;
                RateSnapshot {
                    rates: Rates::new(),
                    fetch_failed: true,
                }
            }
            Err(e) => {
                warn!("Error fetching currency rates: {:#}", e);
                self.cached = None;
                RateSnapshot {
                    rates: Rates::new(),
                    fetch_failed: true,
                }
            }
        }
    }

    /// Drops the cached copy and fetches again.
    pub async fn refresh(&mut self) -> RateSnapshot {
        self.cached = None;
        self.rates().await
    }
}
