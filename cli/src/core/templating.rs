//! # UnitXchange Template System
//!
//! File: cli/src/core/templating.rs
//!
//! ## Overview
//!
//! This module renders the HTML pages served by `unitxchange serve` using the
//! Tera templating engine. The templates live in `cli/templates/` and are
//! compiled into the binary with `include_str!`, so the server needs no files
//! on disk at runtime.
//!
//! ## Architecture
//!
//! - `PageRenderer` owns a `Tera` instance holding every page template.
//!   `base.html` provides the shared layout; pages extend it.
//! - Autoescaping is on for all `.html` templates, so chat text and unit names
//!   are always escaped.
//! - Page data is passed as any `Serialize` value and converted to a
//!   `tera::Context`.
//!
//! ## Examples
//!
//! ```rust
//! let renderer = PageRenderer::new()?;
//! let html = renderer.render(CONVERTER_PAGE, &view)?;
//! ```
//!
use crate::core::error::{Result, UnitxError};
use anyhow::anyhow;
use serde::Serialize;
use tera::{Context, Tera};
use tracing::debug;

/// Template name of the unit-converter page.
pub const CONVERTER_PAGE: &str = "converter.html";
/// Template name of the chatbot page.
pub const CHAT_PAGE: &str = "chat.html";

const TEMPLATES: [(&str, &str); 3] = [
    ("base.html", include_str!("../../templates/base.html")),
    (CONVERTER_PAGE, include_str!("../../templates/converter.html")),
    (CHAT_PAGE, include_str!("../../templates/chat.html")),
];

/// Renders the embedded page templates.
#[derive(Debug)]
pub struct PageRenderer {
    tera: Tera,
}

impl PageRenderer {
    /// Compiles the embedded templates.
    pub fn new() -> Result<Self> {
        let mut tera = Tera::default();
        tera.add_raw_templates(TEMPLATES.to_vec()).map_err(|e| {
            anyhow!(UnitxError::Template(format!(
                "Failed to compile page templates: {}",
                e
            )))
        })?;
        debug!("Compiled {} page templates", TEMPLATES.len());
        Ok(Self { tera })
    }

    /// Renders `template` with the fields of `data` as its context.
    pub fn render<T: Serialize>(&self, template: &str, data: &T) -> Result<String> {
        let context = Context::from_serialize(data).map_err(|e| {
            anyhow!(UnitxError::Template(format!(
                "Invalid context for '{}': {}",
                template, e
            )))
        })?;
        self.tera.render(template, &context).map_err(|e| {
            // Tera keeps the useful detail in the error source chain.
            let mut detail = e.to_string();
            let mut source = std::error::Error::source(&e);
            while let Some(inner) = source {
                detail.push_str(": ");
                detail.push_str(&inner.to_string());
                source = inner.source();
            }
            anyhow!(UnitxError::Template(format!(
                "Rendering '{}' failed: {}",
                template, detail
            )))
        })
    }
}
