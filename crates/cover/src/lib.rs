//! Cover page assembly for working paper series
//!
//! This crate wires the pieces together:
//! - Paper and series metadata types
//! - Template data assembly with per-series visibility flags
//! - The [`CoverPipeline`] that detects page geometry, renders a cover
//!   from an HTML template, and attaches it to the manuscript
//! - A positioned-field renderer for drawing metadata onto an existing
//!   base PDF

mod fields;
mod model;
mod pipeline;

pub use fields::{
    a4_fields, default_fields, fill_fields, letter_fields, render_field_cover, FieldAlign,
    FieldId, FieldValues, TemplateField,
};
pub use model::{CoverPageSettings, PaperMetadata, SeriesSettings};
pub use pipeline::{build_template_data, with_cover_file_name, CoverPipeline, MergedArtifact};

use thiserror::Error;

/// Errors that can occur while assembling a cover page
#[derive(Debug, Error)]
pub enum CoverError {
    #[error("Invalid template: {}", .0.join("; "))]
    InvalidTemplate(Vec<String>),

    #[error(transparent)]
    Template(#[from] template::TemplateError),

    #[error("PDF error: {0}")]
    Pdf(#[from] pdf_core::PdfError),
}

/// Result type for cover operations
pub type Result<T> = std::result::Result<T, CoverError>;
