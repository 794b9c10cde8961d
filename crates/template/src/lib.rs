//! Cover page templates
//!
//! This crate provides:
//! - Builtin HTML cover templates and a registry for custom ones
//! - `{{ variable }}` placeholder substitution
//! - Template validation
//! - Page geometry style injection
//! - The [`MarkupRenderer`] seam for HTML-to-PDF engines

mod registry;
mod render;
mod style;
mod substitute;
mod validate;

pub use registry::{TemplateRegistry, DEFAULT_TEMPLATE_ID};
pub use render::{render_markup_cover, MarkupRenderer};
pub use style::apply_page_styles;
pub use substitute::{populate_template, Display, TemplateData};
pub use validate::{validate_template, TemplateValidation};

use thiserror::Error;

/// Errors that can occur during template processing
#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("Render error: {0}")]
    RenderError(String),

    #[error("PDF error: {0}")]
    PdfError(#[from] pdf_core::PdfError),
}

/// Result type for template operations
pub type Result<T> = std::result::Result<T, TemplateError>;
