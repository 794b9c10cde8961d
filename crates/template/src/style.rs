//! Page style injection
//!
//! The markup renderer honors CSS page geometry, so the template's own
//! styles must never override the detected page size. Every template
//! gets a forced style block pinning the @page size, and templates with
//! no styling at all get a complete default stylesheet.

use pdf_core::PageSize;

/// Inject page geometry styles into a template.
///
/// Existing `!important` flags are stripped first so the forced rules
/// always win. A template without a `<style>` tag or stylesheet link
/// receives the full default stylesheet (and `<html>`/`<head>`/`<body>`
/// scaffolding when missing); otherwise the forced rules are inserted
/// just before `</head>`.
pub fn apply_page_styles(html: &str, page_size: PageSize) -> String {
    let mut html = html.replace("!important", "");

    let width = page_size.width;
    let height = page_size.height;

    let forced_styles = format!(
        r#"
    <style>
      @page {{
        size: {width}pt {height}pt !important;
        margin: 0 !important;
      }}
      html, body {{
        margin: 0 !important;
        padding: 0 !important;
        width: {width}pt !important;
        min-height: {height}pt !important;
        background-color: #ffffff !important;
      }}
    </style>
  "#
    );

    if !html.contains("<style>") && !html.contains(r#"<link rel="stylesheet""#) {
        let default_styles = format!(
            r#"
      <style>
        @page {{
          size: {width}pt {height}pt !important;
          margin: 0 !important;
        }}
        html, body {{
          margin: 0 !important;
          padding: 0 !important;
          font-family: 'Times New Roman', Times, serif;
          width: {width}pt !important;
          min-height: {height}pt !important;
          background-color: #ffffff !important;
          color: #000000 !important;
        }}
        .cover-page {{
          padding: 72pt;
          box-sizing: border-box;
          min-height: {height}pt;
          background-color: #ffffff !important;
          color: #000000 !important;
          position: relative;
        }}
        h1, h2, h3, h4, h5, h6 {{
          color: #000000 !important;
        }}
        p, div, span {{
          color: #000000 !important;
        }}
        h1, .title {{
          font-size: 24pt;
          margin-bottom: 24pt;
          font-weight: bold;
          color: #000000 !important;
        }}
        .authors {{
          font-size: 12pt;
          font-style: italic;
          margin-bottom: 18pt;
          color: #000000 !important;
        }}
        .abstract {{
          font-size: 10pt;
          text-align: justify;
          margin-top: 36pt;
          color: #000000 !important;
        }}
      </style>
    "#
        );

        if !html.contains("<head>") {
            let body = if html.contains("<body>") {
                html
            } else {
                format!("<body>{html}</body></html>")
            };
            html = format!("<html><head>{default_styles}</head>{body}");
        } else {
            html = html.replacen("<head>", &format!("<head>{default_styles}"), 1);
        }
    } else {
        html = html.replacen("</head>", &format!("{forced_styles}</head>"), 1);
    }

    html
}
