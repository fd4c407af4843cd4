//! # UnitXchange Common Utilities (`common`)
//!
//! File: cli/src/common/mod.rs
//!
//! ## Overview
//!
//! Shared utility modules used by the command handlers and the web server,
//! kept apart from command-specific logic (`commands::`) and core infrastructure
//! (`core::`).
//!
//! - **`fs`**: Filesystem helpers (directory creation, reads, atomic writes).
//! - **`network`**: Port probing used when binding the web server.
//!

/// Utilities for filesystem operations.
pub mod fs;
/// Utilities for local network ports.
pub mod network;
