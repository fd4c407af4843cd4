//! # UnitXchange CLI Convert Integration Tests
//!
//! File: cli/tests/convert.rs
//!
//! ## Overview
//!
//! Integration tests for `unitxchange convert`. Currency tests point the rate
//! endpoint at an unreachable address through a project config, so they never
//! touch the network.
//!

mod common;
use common::*;
use predicates::prelude::*;

#[test]
fn test_convert_distance() {
    Sandbox::new()
        .cmd()
        .args(["convert", "Distance", "Kilometers", "Miles", "5"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("📏 Formula: 5.0 Kilometers × 0.6214 = 3.11 Miles")
                .and(predicate::str::contains("5.0 Kilometers = 3.11 Miles")),
        );
}

#[test]
fn test_convert_is_case_insensitive() {
    Sandbox::new()
        .cmd()
        .args(["c", "data", "kilobytes", "bytes", "2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2.0 Kilobytes = 2048.00 Bytes"));
}

#[test]
fn test_convert_negative_temperature() {
    Sandbox::new()
        .cmd()
        .args(["convert", "Temperature", "Celsius", "Fahrenheit", "-40"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("(-40.0°C × 9/5) + 32 = -40.00°F")
                .and(predicate::str::contains("-40.0 Celsius = -40.00 Fahrenheit")),
        );
}

#[test]
fn test_convert_unknown_unit() {
    Sandbox::new()
        .cmd()
        .args(["convert", "Weight", "Carats", "Grams", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "Unknown unit 'Carats' for category Weight.",
        ));
}

#[test]
fn test_convert_non_numeric_value() {
    Sandbox::new()
        .cmd()
        .args(["convert", "Distance", "Meters", "Feet", "ten"])
        .assert()
        .failure();
}

#[test]
fn test_currency_same_code_without_rates() {
    let sandbox = Sandbox::new();
    sandbox.write_project_config(&format!(
        "[rates]\nendpoint = \"{}\"\n",
        UNREACHABLE_RATES_ENDPOINT
    ));
    sandbox
        .cmd()
        .args(["convert", "Currency", "usd", "usd", "3"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Error fetching currency rates"))
        .stdout(
            predicate::str::contains("Note: Currency rates are fetched in real-time")
                .and(predicate::str::contains("3.0 USD = 3.00 USD")),
        );
}

#[test]
fn test_currency_without_rates_fails() {
    let sandbox = Sandbox::new();
    sandbox.write_project_config(&format!(
        "[rates]\nendpoint = \"{}\"\n",
        UNREACHABLE_RATES_ENDPOINT
    ));
    sandbox
        .cmd()
        .args(["convert", "Currency", "USD", "EUR", "10"])
        .assert()
        .failure()
        .stderr(
            predicate::str::contains("Error fetching currency rates")
                .and(predicate::str::contains("No exchange rate available for 'EUR'.")),
        );
}
