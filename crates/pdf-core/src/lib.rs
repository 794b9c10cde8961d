//! PDF Core - Low-level PDF manipulation
//!
//! This crate provides functionality for:
//! - Opening and saving PDF documents
//! - Embedding TrueType fonts
//! - Inserting text at specific coordinates
//! - Wrapping and justifying text against a width budget
//! - Detecting and classifying page geometry
//! - Attaching a cover page to a manuscript
//!
//! # Example
//!
//! ```ignore
//! use pdf_core::{Align, PdfDocument};
//!
//! let mut doc = PdfDocument::open("cover.pdf")?;
//! doc.register_font_family("times", builder)?;
//! doc.set_font("times", 12.0)?;
//! doc.insert_text("Hello, World!", 1, 100.0, 700.0, Align::Left)?;
//! doc.save("output.pdf")?;
//! ```

mod assemble;
mod document;
mod font;
mod geometry;
mod layout;
mod text;

pub use assemble::attach_cover_page;
pub use document::{Color, PdfDocument};
pub use font::{FontData, FontFamily, FontFamilyBuilder, FontVariant};
pub use geometry::{detect_page_size, PageFormat, PageSize};
pub use layout::{wrap_text, WordPosition, WrapResult};
pub use text::{generate_text_operators, sanitize_text, TextRenderContext};

use thiserror::Error;

/// Errors that can occur during PDF operations
#[derive(Debug, Error)]
pub enum PdfError {
    #[error("Failed to open PDF: {0}")]
    OpenError(String),

    #[error("Failed to save PDF: {0}")]
    SaveError(String),

    #[error("Font not found: {0}")]
    FontNotFound(String),

    #[error("Font already exists: {0}")]
    FontAlreadyExists(String),

    #[error("Failed to parse font: {0}")]
    FontParseError(String),

    #[error("Invalid page number: {0} (document has {1} pages)")]
    InvalidPage(usize, usize),

    #[error("Failed to merge PDFs: {0}")]
    MergeError(String),

    #[error("PDF parsing error: {0}")]
    ParseError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Lopdf error: {0}")]
    LopdfError(#[from] lopdf::Error),
}

/// Result type for PDF operations
pub type Result<T> = std::result::Result<T, PdfError>;

/// Text alignment options
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Align {
    #[default]
    Left,
    Center,
    Right,
}
