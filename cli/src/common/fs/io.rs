//! # UnitXchange Filesystem I/O Operations
//!
//! File: cli/src/common/fs/io.rs
//!
//! ## Overview
//!
//! This module centralizes the filesystem input/output operations used by
//! UnitXchange. It wraps `std::fs` with contextual errors for reading the
//! configuration files and for persisting the chat-history store.
//!
//! ## Architecture
//!
//! - **`ensure_dir_exists`**: Creates a directory (and parents) if missing, and
//!   fails if the path exists but is not a directory.
//! - **`read_file_to_string`**: `fs::read_to_string` with the path in the error context.
//! - **`write_string_atomically`**: Writes to a sibling temporary file, flushes it to
//!   disk and renames it over the target. Readers see either the old or the new
//!   content, never a truncated file.
//!
//! ## Usage
//!
//! ```rust
//! use crate::common::fs::io;
//!
//! let json = serde_json::to_string_pretty(&chats)?;
//! io::write_string_atomically(Path::new("chat_histories.json"), &json)?;
//! let raw = io::read_file_to_string(Path::new("chat_histories.json"))?;
//! ```
//!
use crate::core::error::{Result, UnitxError};
use anyhow::Context;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Ensures that a directory exists at the specified path.
///
/// # Errors
///
/// Returns an `Err` if the path exists but is not a directory, or if creating
/// the directory fails.
pub fn ensure_dir_exists(path: &Path) -> Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)
            .with_context(|| format!("Failed to create directory {:?}", path))?;
        info!("Created directory: {:?}", path);
    } else if !path.is_dir() {
        anyhow::bail!(UnitxError::Storage(format!(
            "Path exists but is not a directory: {:?}",
            path
        )));
    } else {
        debug!("Directory already exists: {:?}", path);
    }
    Ok(())
}

/// Reads the entire content of a file into a string.
pub fn read_file_to_string(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("Failed to read file {:?}", path))
}

fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

/// Replaces the content of `path` with `content` in a single rename.
///
/// The parent directory is created when missing. The temporary file lives next
/// to the target so the rename never crosses filesystems.
///
/// # Errors
///
/// Returns an `Err` if the parent directory cannot be created, or if writing,
/// syncing or renaming the temporary file fails. The temporary file is removed
/// before a write error is returned.
pub fn write_string_atomically(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        ensure_dir_exists(parent)?;
    }

    let tmp_path = temp_path_for(path);
    let written = write_and_sync(&tmp_path, content).and_then(|()| {
        fs::rename(&tmp_path, path)
            .with_context(|| format!("Failed to move {:?} into place at {:?}", tmp_path, path))
    });
    if let Err(e) = written {
        if let Err(cleanup) = fs::remove_file(&tmp_path) {
            debug!("Could not remove temporary file {:?}: {}", tmp_path, cleanup);
        }
        return Err(e);
    }
    debug!("Wrote {} bytes to {:?}", content.len(), path);
    Ok(())
}

fn write_and_sync(tmp_path: &Path, content: &str) -> Result<()> {
    let mut file = File::create(tmp_path)
        .with_context(|| format!("Failed to create temporary file {:?}", tmp_path))?;
    file.write_all(content.as_bytes())
        .with_context(|| format!("Failed to write temporary file {:?}", tmp_path))?;
    file.sync_all()
        .with_context(|| format!("Failed to sync temporary file {:?}", tmp_path))
}
