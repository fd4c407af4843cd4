//! # UnitXchange Convert Command
//!
//! File: cli/src/commands/convert.rs
//!
//! ## Overview
//!
//! `unitxchange convert <CATEGORY> <FROM> <TO> <VALUE>` runs one conversion and
//! prints the formula line and the result line, the same two lines the converter
//! page shows. Unit names are matched case-insensitively; currency codes are
//! upper-cased.
//!
//! Currency conversions fetch live rates first. When that fetch fails the command
//! reports "Error fetching currency rates" on stderr and carries on with whatever
//! rates are available, which for a cold cache means only same-code conversions
//! succeed.
//!
//! ## Examples
//!
//! ```bash
//! unitxchange convert distance kilometers miles 5
//! unitxchange convert temperature celsius fahrenheit -- -40
//! unitxchange convert currency usd eur 100
//! ```
//!
use super::context;
use crate::conversion::engine::{self, Rates};
use crate::conversion::units::Category;
use crate::conversion::CURRENCY_NOTE;
use crate::core::config;
use crate::core::error::{Result, UnitxError};
use anyhow::anyhow;
use clap::Parser;
use tracing::info;

#[derive(Parser, Debug)]
pub struct ConvertArgs {
    /// Category name (Distance, Temperature, Weight, Pressure, Currency, Time, Volume, Area, Speed, Data).
    pub category: String,
    /// Unit to convert from.
    pub from: String,
    /// Unit to convert to.
    pub to: String,
    /// Value to convert.
    #[arg(allow_negative_numbers = true)]
    pub value: f64,
}

pub async fn handle_convert(args: ConvertArgs) -> Result<()> {
    info!("Handling convert command with args: {:?}", args);
    if !args.value.is_finite() {
        return Err(anyhow!(UnitxError::ArgumentParsing(format!(
            "Value must be a finite number, got {}",
            args.value
        ))));
    }

    let category: Category = args.category.parse()?;
    let from = category.resolve_unit(&args.from)?;
    let to = category.resolve_unit(&args.to)?;

    let cfg = config::load_config()?;
    let rates = if category == Category::Currency {
        let snapshot = context::rate_cache(&cfg)?.rates().await;
        if snapshot.fetch_failed {
            eprintln!("⚠️  Error fetching currency rates");
        }
        snapshot.rates
    } else {
        Rates::new()
    };

    let conversion = engine::convert(category, &from, &to, args.value, &rates)?;
    println!("{}", conversion.formula_line());
    if category == Category::Currency {
        println!("{}", CURRENCY_NOTE);
    }
    println!("{}", conversion.result_line());
    Ok(())
}
