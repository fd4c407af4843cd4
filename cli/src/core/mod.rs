//! # UnitXchange Core Infrastructure
//!
//! File: cli/src/core/mod.rs
//!
//! ## Overview
//!
//! This module aggregates the core infrastructure components used across the
//! UnitXchange application.
//!
//! ## Architecture
//!
//! - `config`: Configuration loading, merging, and validation
//! - `error`: Error types and the crate-wide `Result` alias
//! - `templating`: Tera rendering for the web pages
//!
//! ```rust
//! use crate::core::config; // For loading configuration
//! use crate::core::error::{Result, UnitxError}; // For error handling
//! use crate::core::templating::PageRenderer; // For page rendering
//! ```
//!
pub mod config;
pub mod error;
pub mod templating;
