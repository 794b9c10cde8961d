//! Builtin template registry

use std::collections::HashMap;

/// Template id used when a series does not pick one
pub const DEFAULT_TEMPLATE_ID: &str = "classic";

const CLASSIC_TEMPLATE: &str = include_str!("../data/classic.html");
const MINIMAL_TEMPLATE: &str = include_str!("../data/minimal.html");
const FORMAL_TEMPLATE: &str = include_str!("../data/formal.html");

/// Registry of cover page templates, keyed by id.
///
/// Lookups with an unknown id fall back to the classic template, so a
/// stale template id in stored settings still produces a cover.
pub struct TemplateRegistry {
    templates: HashMap<String, String>,
}

impl TemplateRegistry {
    /// Registry with the builtin templates: classic, minimal, formal
    pub fn builtin() -> Self {
        let mut templates = HashMap::new();
        templates.insert(DEFAULT_TEMPLATE_ID.to_string(), CLASSIC_TEMPLATE.to_string());
        templates.insert("minimal".to_string(), MINIMAL_TEMPLATE.to_string());
        templates.insert("formal".to_string(), FORMAL_TEMPLATE.to_string());
        Self { templates }
    }

    /// Register or replace a template
    pub fn register(&mut self, id: &str, html: String) {
        self.templates.insert(id.to_string(), html);
    }

    /// Look up a template by id, falling back to the default
    pub fn get(&self, id: &str) -> &str {
        self.templates
            .get(id)
            .or_else(|| self.templates.get(DEFAULT_TEMPLATE_ID))
            .map(String::as_str)
            .unwrap_or(CLASSIC_TEMPLATE)
    }

    pub fn ids(&self) -> Vec<&str> {
        self.templates.keys().map(String::as_str).collect()
    }
}

impl Default for TemplateRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}
