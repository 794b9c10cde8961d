//! Markup rendering seam

use pdf_core::PageSize;

use crate::style::apply_page_styles;
use crate::substitute::{populate_template, TemplateData};
use crate::{Result, TemplateError};

/// Converts filled HTML markup to a single-page PDF.
///
/// The engine behind this trait owns the rendering surface (a headless
/// browser, a print service, a test stub); this crate only prepares the
/// markup and checks the result. The renderer honors the CSS @page size
/// injected by [`apply_page_styles`], so the returned PDF matches
/// `page_size`.
pub trait MarkupRenderer {
    fn render(&self, html: &str, page_size: PageSize) -> Result<Vec<u8>>;
}

/// Produce a cover page PDF: inject page styles, substitute placeholders,
/// render.
///
/// A renderer returning zero bytes is an error rather than a silently
/// blank cover.
pub fn render_markup_cover<R: MarkupRenderer>(
    renderer: &R,
    template: &str,
    data: &TemplateData,
    page_size: PageSize,
) -> Result<Vec<u8>> {
    let styled = apply_page_styles(template, page_size);
    let html = populate_template(&styled, data);

    let pdf = renderer.render(&html, page_size)?;
    if pdf.is_empty() {
        return Err(TemplateError::RenderError(
            "Renderer produced no output".to_string(),
        ));
    }
    Ok(pdf)
}
