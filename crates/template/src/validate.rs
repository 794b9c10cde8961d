//! Template validation
//!
//! Heuristic checks that catch templates which would render to a blank
//! or unstyled page. Validation never rejects unusual but workable
//! markup; it only flags the failure modes users actually hit.

/// Outcome of validating a template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateValidation {
    pub valid: bool,
    pub errors: Vec<String>,
}

/// Validate an HTML template before rendering.
///
/// An empty template short-circuits with a single error; the remaining
/// checks accumulate so the user sees every problem at once.
pub fn validate_template(template: &str) -> TemplateValidation {
    if template.trim().is_empty() {
        return TemplateValidation {
            valid: false,
            errors: vec!["Template cannot be empty".to_string()],
        };
    }

    let mut errors = Vec::new();

    if !template.contains("<html") && !template.contains("<body") {
        errors.push("Template should include basic HTML structure (html, body tags)".to_string());
    }

    if !template.contains("<head") && !template.contains("<style") {
        errors.push("Template should include styling (either a head tag or style tag)".to_string());
    }

    if !template.contains("{{") || !template.contains("}}") {
        errors.push(
            "Template should include at least one placeholder using {{ variable }} syntax"
                .to_string(),
        );
    }

    TemplateValidation {
        valid: errors.is_empty(),
        errors,
    }
}
