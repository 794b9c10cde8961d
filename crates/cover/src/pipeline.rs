//! End-to-end cover page pipeline
//!
//! Detects the manuscript's page geometry, renders a cover page from a
//! template, and attaches it in front of the manuscript.

use chrono::Local;

use pdf_core::{attach_cover_page, detect_page_size, sanitize_text, PageFormat, PageSize};
use template::{
    render_markup_cover, validate_template, Display, MarkupRenderer, TemplateData,
    TemplateRegistry, DEFAULT_TEMPLATE_ID,
};

use crate::model::{PaperMetadata, SeriesSettings};
use crate::{CoverError, Result};

/// A merged document ready for storage
#[derive(Debug, Clone)]
pub struct MergedArtifact {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

/// Assemble template data from paper metadata and series settings.
///
/// A section is visible only when its series `include_*` flag is set
/// AND the paper actually has the data; the date is gated by the flag
/// alone. Affiliation is reserved and always hidden.
pub fn build_template_data(
    paper: &PaperMetadata,
    series: &SeriesSettings,
    date: &str,
) -> TemplateData {
    let settings = &series.cover_page_settings;

    let authors = split_list(&paper.authors);
    let keywords = split_list(&paper.keywords);
    let jel = split_list(&paper.jel);

    TemplateData {
        title: sanitize_text(&paper.title),
        authors: authors.iter().map(|a| sanitize_text(a)).collect(),
        abstract_text: sanitize_text(&paper.abstract_text),
        institution: sanitize_text(&series.institution),
        series_name: sanitize_text(&series.name),
        date: date.to_string(),
        keywords: keywords.iter().map(|k| sanitize_text(k)).collect(),
        jel: jel.iter().map(|j| sanitize_text(j)).collect(),
        header_text: settings
            .header_text
            .clone()
            .unwrap_or_else(|| "Working Paper".to_string()),
        affiliation: String::new(),
        abstract_display: Display::when(
            settings.include_abstract && !paper.abstract_text.is_empty(),
        ),
        jel_display: Display::when(settings.include_jel && !jel.is_empty()),
        keywords_display: Display::when(settings.include_keywords && !keywords.is_empty()),
        institution_display: Display::when(
            settings.include_institution && !series.institution.is_empty(),
        ),
        series_name_display: Display::when(
            settings.include_series_name && !series.name.is_empty(),
        ),
        date_display: Display::when(settings.include_date),
        affiliation_display: Display::None,
    }
}

/// Derive the artifact name: `paper.pdf` becomes `paper_with_cover.pdf`.
/// The extension match is case-insensitive; other names get the suffix
/// appended.
pub fn with_cover_file_name(file_name: &str) -> String {
    let stem = if file_name.len() >= 4
        && file_name.is_char_boundary(file_name.len() - 4)
        && file_name[file_name.len() - 4..].eq_ignore_ascii_case(".pdf")
    {
        &file_name[..file_name.len() - 4]
    } else {
        file_name
    };
    format!("{stem}_with_cover.pdf")
}

fn current_date() -> String {
    Local::now().format("%B %-d, %Y").to_string()
}

/// Drives cover page creation for uploaded manuscripts.
///
/// The renderer is pluggable so the HTML-to-PDF engine stays out of
/// this crate; the registry supplies templates when a series does not
/// carry its own.
pub struct CoverPipeline<'a, R> {
    registry: &'a TemplateRegistry,
    renderer: R,
}

impl<'a, R: MarkupRenderer> CoverPipeline<'a, R> {
    pub fn new(registry: &'a TemplateRegistry, renderer: R) -> Self {
        Self { registry, renderer }
    }

    /// Render a cover page PDF for the manuscript, dated today
    pub fn create_cover(
        &self,
        manuscript: &[u8],
        paper: &PaperMetadata,
        series: &SeriesSettings,
    ) -> Result<Vec<u8>> {
        self.create_cover_dated(manuscript, paper, series, &current_date())
    }

    /// Render a cover page PDF with an explicit date string
    pub fn create_cover_dated(
        &self,
        manuscript: &[u8],
        paper: &PaperMetadata,
        series: &SeriesSettings,
        date: &str,
    ) -> Result<Vec<u8>> {
        let settings = &series.cover_page_settings;

        let default_size = settings
            .default_page_size
            .as_deref()
            .and_then(PageFormat::parse)
            .map(PageFormat::page_size)
            .unwrap_or_else(PageSize::a4);
        let page_size = detect_page_size(manuscript, default_size);

        let template_html = match &settings.html_template {
            Some(html) => html.clone(),
            None => {
                let id = settings
                    .default_template
                    .as_deref()
                    .unwrap_or(DEFAULT_TEMPLATE_ID);
                self.registry.get(id).to_string()
            }
        };

        let validation = validate_template(&template_html);
        if !validation.valid {
            return Err(CoverError::InvalidTemplate(validation.errors));
        }

        let data = build_template_data(paper, series, date);
        let cover = render_markup_cover(&self.renderer, &template_html, &data, page_size)?;
        Ok(cover)
    }

    /// Render a cover and attach it in front of the manuscript
    pub fn attach_cover(
        &self,
        manuscript: &[u8],
        file_name: &str,
        paper: &PaperMetadata,
        series: &SeriesSettings,
    ) -> Result<MergedArtifact> {
        let cover = self.create_cover(manuscript, paper, series)?;
        let bytes = attach_cover_page(&cover, manuscript)?;
        Ok(MergedArtifact {
            file_name: with_cover_file_name(file_name),
            bytes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn paper() -> PaperMetadata {
        PaperMetadata {
            title: "Growth and Debt".to_string(),
            authors: "Alice, Bob".to_string(),
            abstract_text: "We study growth.".to_string(),
            keywords: "growth, debt".to_string(),
            jel: "E62, H63".to_string(),
        }
    }

    fn series() -> SeriesSettings {
        SeriesSettings {
            name: "WP Series".to_string(),
            institution: "Inst".to_string(),
            cover_page_settings: Default::default(),
        }
    }

    #[test]
    fn test_build_template_data_splits_lists() {
        let data = build_template_data(&paper(), &series(), "May 1, 2026");
        assert_eq!(data.authors, vec!["Alice", "Bob"]);
        assert_eq!(data.keywords, vec!["growth", "debt"]);
        assert_eq!(data.jel, vec!["E62", "H63"]);
        assert_eq!(data.date, "May 1, 2026");
    }

    #[test]
    fn test_split_list_ignores_blank_entries() {
        assert_eq!(split_list("a, , b,,"), vec!["a", "b"]);
        assert!(split_list("").is_empty());
    }

    #[test]
    fn test_display_flags_require_data() {
        let mut p = paper();
        p.jel = String::new();
        let data = build_template_data(&p, &series(), "d");
        assert_eq!(data.jel_display, Display::None);
        assert_eq!(data.keywords_display, Display::Block);
    }

    #[test]
    fn test_display_flags_require_series_opt_in() {
        let mut s = series();
        s.cover_page_settings.include_abstract = false;
        let data = build_template_data(&paper(), &s, "d");
        assert_eq!(data.abstract_display, Display::None);
    }

    #[test]
    fn test_date_display_follows_flag_alone() {
        let mut s = series();
        s.cover_page_settings.include_date = false;
        let data = build_template_data(&paper(), &s, "d");
        assert_eq!(data.date_display, Display::None);

        s.cover_page_settings.include_date = true;
        let data = build_template_data(&paper(), &s, "d");
        assert_eq!(data.date_display, Display::Block);
    }

    #[test]
    fn test_affiliation_always_hidden() {
        let data = build_template_data(&paper(), &series(), "d");
        assert_eq!(data.affiliation_display, Display::None);
        assert_eq!(data.affiliation, "");
    }

    #[test]
    fn test_header_text_default_and_override() {
        let data = build_template_data(&paper(), &series(), "d");
        assert_eq!(data.header_text, "Working Paper");

        let mut s = series();
        s.cover_page_settings.header_text = Some("Discussion Paper".to_string());
        let data = build_template_data(&paper(), &s, "d");
        assert_eq!(data.header_text, "Discussion Paper");
    }

    #[test]
    fn test_sanitizes_metadata() {
        let mut p = paper();
        p.title = "Growth \u{2013} and \u{201C}Debt\u{201D}".to_string();
        let data = build_template_data(&p, &series(), "d");
        assert_eq!(data.title, "Growth - and \"Debt\"");
    }

    #[test]
    fn test_with_cover_file_name() {
        assert_eq!(with_cover_file_name("paper.pdf"), "paper_with_cover.pdf");
        assert_eq!(with_cover_file_name("PAPER.PDF"), "PAPER_with_cover.pdf");
        assert_eq!(with_cover_file_name("draft"), "draft_with_cover.pdf");
        assert_eq!(with_cover_file_name(".pdf"), "_with_cover.pdf");
        assert_eq!(
            with_cover_file_name("nested.pdf.pdf"),
            "nested.pdf_with_cover.pdf"
        );
    }
}
