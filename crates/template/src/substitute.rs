//! Placeholder substitution
//!
//! Templates use `{{ variable }}` placeholders against a closed set of
//! keys. Unknown keys and dotted paths substitute to the empty string,
//! so a typo degrades to a blank field rather than an error.

/// CSS display value substituted for `*Display` placeholders
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Display {
    Block,
    #[default]
    None,
}

impl Display {
    pub fn as_str(self) -> &'static str {
        match self {
            Display::Block => "block",
            Display::None => "none",
        }
    }

    /// Block when the condition holds, None otherwise
    pub fn when(visible: bool) -> Self {
        if visible {
            Display::Block
        } else {
            Display::None
        }
    }
}

/// Values available to template placeholders.
///
/// List fields are joined with ", " at substitution time. The display
/// fields become literal CSS `display` values, which is how templates
/// hide sections whose data is absent.
#[derive(Debug, Clone, Default)]
pub struct TemplateData {
    pub title: String,
    pub authors: Vec<String>,
    pub abstract_text: String,
    pub institution: String,
    pub series_name: String,
    pub date: String,
    pub keywords: Vec<String>,
    pub jel: Vec<String>,
    pub header_text: String,
    pub affiliation: String,
    pub abstract_display: Display,
    pub jel_display: Display,
    pub keywords_display: Display,
    pub institution_display: Display,
    pub series_name_display: Display,
    pub date_display: Display,
    pub affiliation_display: Display,
}

impl TemplateData {
    fn value(&self, key: &str) -> Option<String> {
        let value = match key {
            "title" => self.title.clone(),
            "authors" => self.authors.join(", "),
            "abstract" => self.abstract_text.clone(),
            "institution" => self.institution.clone(),
            "seriesName" => self.series_name.clone(),
            "date" => self.date.clone(),
            "keywords" => self.keywords.join(", "),
            "jel" => self.jel.join(", "),
            "headerText" => self.header_text.clone(),
            "affiliation" => self.affiliation.clone(),
            "abstractDisplay" => self.abstract_display.as_str().to_string(),
            "jelDisplay" => self.jel_display.as_str().to_string(),
            "keywordsDisplay" => self.keywords_display.as_str().to_string(),
            "institutionDisplay" => self.institution_display.as_str().to_string(),
            "seriesNameDisplay" => self.series_name_display.as_str().to_string(),
            "dateDisplay" => self.date_display.as_str().to_string(),
            "affiliationDisplay" => self.affiliation_display.as_str().to_string(),
            _ => return None,
        };
        Some(value)
    }

    /// Resolve a placeholder path. There are no nested members, so any
    /// dotted path resolves empty.
    fn lookup(&self, path: &str) -> String {
        if path.contains('.') {
            return String::new();
        }
        self.value(path).unwrap_or_default()
    }
}

/// Replace every `{{ key }}` placeholder in `template` with the value
/// from `data`. An unterminated `{{` passes through verbatim.
pub fn populate_template(template: &str, data: &TemplateData) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        match after.find("}}") {
            Some(end) => {
                let key = after[..end].trim();
                out.push_str(&data.lookup(key));
                rest = &after[end + 2..];
            }
            None => {
                out.push_str(&rest[start..]);
                rest = "";
            }
        }
    }

    out.push_str(rest);
    out
}
