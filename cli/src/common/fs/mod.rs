//! # UnitXchange Filesystem Utilities (`common::fs`)
//!
//! File: cli/src/common/fs/mod.rs
//!
//! ## Overview
//!
//! Filesystem helpers shared by the configuration loader and the chat store.
//! Callers import the submodule directly, e.g.
//! `use crate::common::fs::io::write_string_atomically;`.
//!

/// Basic file I/O: directory creation, reads, and atomic replacement writes.
pub mod io;
