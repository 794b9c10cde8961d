//! Paper and series metadata

use serde::{Deserialize, Serialize};

/// Metadata of the manuscript receiving a cover page.
///
/// `authors`, `keywords`, and `jel` are stored raw as entered, usually
/// comma-separated; the pipeline splits them when building template
/// data.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PaperMetadata {
    pub title: String,
    pub authors: String,
    #[serde(rename = "abstract")]
    pub abstract_text: String,
    pub keywords: String,
    pub jel: String,
}

/// Settings of the working paper series a paper belongs to
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SeriesSettings {
    pub name: String,
    pub institution: String,
    pub cover_page_settings: CoverPageSettings,
}

/// Per-series cover page configuration.
///
/// `html_template` overrides the registry template entirely;
/// `default_template` picks a registry template by id. The `include_*`
/// flags gate whether a section may appear at all; a section with no
/// data is hidden regardless.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CoverPageSettings {
    pub html_template: Option<String>,
    pub default_template: Option<String>,
    pub header_text: Option<String>,
    pub default_page_size: Option<String>,
    pub include_abstract: bool,
    pub include_keywords: bool,
    pub include_jel: bool,
    pub include_institution: bool,
    pub include_series_name: bool,
    pub include_date: bool,
}

impl Default for CoverPageSettings {
    fn default() -> Self {
        Self {
            html_template: None,
            default_template: None,
            header_text: None,
            default_page_size: None,
            include_abstract: true,
            include_keywords: true,
            include_jel: true,
            include_institution: true,
            include_series_name: true,
            include_date: true,
        }
    }
}
