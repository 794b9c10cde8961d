//! Positioned field rendering
//!
//! The field renderer draws metadata directly onto an existing PDF
//! page at fixed coordinates, as an alternative to the HTML template
//! path. Coordinates are top-down in points; the underlying document
//! converts to PDF's bottom-up system.

use pdf_core::{
    sanitize_text, wrap_text, Align, Color, FontFamilyBuilder, FontVariant, PdfDocument,
    PageSize,
};
use serde::{Deserialize, Serialize};

use crate::Result;

/// Fields a positioned layout can place
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FieldId {
    Title,
    Authors,
    Institution,
    SeriesName,
    Date,
    Abstract,
    Keywords,
    Jel,
}

/// Horizontal anchoring of a field within its box
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldAlign {
    #[default]
    Left,
    Center,
    Right,
}

/// A positioned field definition
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateField {
    pub id: FieldId,
    pub x: f64,
    /// Distance from the top of the page in points
    pub y: f64,
    pub width: f64,
    pub font_size: f32,
    #[serde(default)]
    pub bold: bool,
    #[serde(default)]
    pub italic: bool,
    #[serde(default)]
    pub justified: bool,
    #[serde(default)]
    pub max_lines: Option<usize>,
    #[serde(default)]
    pub align: FieldAlign,
    #[serde(default)]
    pub color: Option<[f32; 3]>,
    /// Accepted from stored layouts; rendering always draws with the
    /// family passed to [`fill_fields`]
    #[serde(default)]
    pub font_name: Option<String>,
}

fn field(id: FieldId, x: f64, y: f64, width: f64, font_size: f32) -> TemplateField {
    TemplateField {
        id,
        x,
        y,
        width,
        font_size,
        bold: false,
        italic: false,
        justified: false,
        max_lines: None,
        align: FieldAlign::Left,
        color: None,
        font_name: None,
    }
}

/// Default field layout for A4 pages (595 x 842 points)
pub fn a4_fields() -> Vec<TemplateField> {
    vec![
        TemplateField {
            bold: true,
            align: FieldAlign::Center,
            ..field(FieldId::Title, 72.0, 200.0, 451.0, 16.0)
        },
        TemplateField {
            italic: true,
            align: FieldAlign::Center,
            ..field(FieldId::Authors, 72.0, 240.0, 451.0, 12.0)
        },
        TemplateField {
            align: FieldAlign::Center,
            ..field(FieldId::Institution, 72.0, 270.0, 451.0, 12.0)
        },
        field(FieldId::SeriesName, 72.0, 100.0, 451.0, 10.0),
        TemplateField {
            align: FieldAlign::Right,
            ..field(FieldId::Date, 72.0, 300.0, 451.0, 10.0)
        },
        TemplateField {
            justified: true,
            max_lines: Some(15),
            ..field(FieldId::Abstract, 72.0, 350.0, 451.0, 10.0)
        },
        field(FieldId::Keywords, 72.0, 500.0, 451.0, 10.0),
        field(FieldId::Jel, 72.0, 520.0, 451.0, 10.0),
    ]
}

/// Default field layout for US Letter pages (612 x 792 points)
pub fn letter_fields() -> Vec<TemplateField> {
    vec![
        TemplateField {
            bold: true,
            align: FieldAlign::Center,
            ..field(FieldId::Title, 72.0, 180.0, 468.0, 16.0)
        },
        TemplateField {
            italic: true,
            align: FieldAlign::Center,
            ..field(FieldId::Authors, 72.0, 220.0, 468.0, 12.0)
        },
        TemplateField {
            align: FieldAlign::Center,
            ..field(FieldId::Institution, 72.0, 250.0, 468.0, 12.0)
        },
        field(FieldId::SeriesName, 72.0, 100.0, 468.0, 10.0),
        TemplateField {
            align: FieldAlign::Right,
            ..field(FieldId::Date, 72.0, 270.0, 468.0, 10.0)
        },
        TemplateField {
            justified: true,
            max_lines: Some(15),
            ..field(FieldId::Abstract, 72.0, 320.0, 468.0, 10.0)
        },
        field(FieldId::Keywords, 72.0, 480.0, 468.0, 10.0),
        field(FieldId::Jel, 72.0, 500.0, 468.0, 10.0),
    ]
}

/// Pick the default layout for a page size. Pages within 10 points of
/// A4 use the A4 layout; everything else falls back to Letter.
pub fn default_fields(page_size: PageSize) -> Vec<TemplateField> {
    if (page_size.width - 595.0).abs() < 10.0 && (page_size.height - 842.0).abs() < 10.0 {
        a4_fields()
    } else {
        letter_fields()
    }
}

/// Values to draw into positioned fields.
///
/// List fields are joined with ", " when drawn. Empty values resolve
/// to `None` so their fields are skipped entirely.
#[derive(Debug, Clone, Default)]
pub struct FieldValues {
    pub title: String,
    pub authors: String,
    pub institution: String,
    pub series_name: String,
    pub date: String,
    pub abstract_text: String,
    pub keywords: Vec<String>,
    pub jel: Vec<String>,
}

impl FieldValues {
    pub fn get(&self, id: FieldId) -> Option<String> {
        let value = match id {
            FieldId::Title => self.title.clone(),
            FieldId::Authors => self.authors.clone(),
            FieldId::Institution => self.institution.clone(),
            FieldId::SeriesName => self.series_name.clone(),
            FieldId::Date => self.date.clone(),
            FieldId::Abstract => self.abstract_text.clone(),
            FieldId::Keywords => self.keywords.join(", "),
            FieldId::Jel => self.jel.join(", "),
        };
        if value.is_empty() {
            None
        } else {
            Some(value)
        }
    }
}

/// Bold and italic together degrade to regular: the embedded families
/// carry no bold-italic face.
pub(crate) fn variant_for(bold: bool, italic: bool) -> FontVariant {
    match (bold, italic) {
        (true, false) => FontVariant::Bold,
        (false, true) => FontVariant::Italic,
        _ => FontVariant::Regular,
    }
}

pub(crate) fn anchor_x(field: &TemplateField, text_width: f64) -> f64 {
    match field.align {
        FieldAlign::Left => field.x,
        FieldAlign::Center => field.x + (field.width - text_width) / 2.0,
        FieldAlign::Right => field.x + field.width - text_width,
    }
}

/// A field draws on one line when it is not justified and allows at
/// most one line.
pub(crate) fn is_single_line(field: &TemplateField) -> bool {
    !field.justified && field.max_lines.map_or(true, |n| n <= 1)
}

/// Draw `values` into `fields` on the first page of `doc` using the
/// registered font family `family`.
pub fn fill_fields(
    doc: &mut PdfDocument,
    fields: &[TemplateField],
    values: &FieldValues,
    family: &str,
) -> Result<()> {
    doc.set_font(family, 12.0)?;

    for field in fields {
        let value = match values.get(field.id) {
            Some(value) => value,
            None => continue,
        };
        let text = sanitize_text(&value);

        doc.set_font_variant(variant_for(field.bold, field.italic));
        doc.set_font_size(field.font_size);
        doc.set_text_color(field.color.map(Color::from_rgb).unwrap_or_default());

        if is_single_line(field) {
            let text_width = f64::from(doc.get_text_width(&text)?);
            let x = anchor_x(field, text_width);
            doc.insert_text(&text, 1, x, field.y, Align::Left)?;
            continue;
        }

        // Measure the whole field before drawing; drawing mutates the
        // document and invalidates the measuring borrow.
        let wrapped = {
            let measure = |s: &str| doc.get_text_width(s).map(f64::from).unwrap_or(0.0);
            wrap_text(&text, measure, field.width, field.justified)
        };

        let line_height = f64::from(field.font_size) * 1.2;
        let max_lines = field.max_lines.unwrap_or(usize::MAX);

        if field.justified {
            for wp in &wrapped.word_positions {
                if wp.line >= max_lines {
                    break;
                }
                let y = field.y + wp.line as f64 * line_height;
                doc.insert_text(&wp.word, 1, field.x + wp.x, y, Align::Left)?;
            }
        } else {
            for (i, line) in wrapped.lines.iter().take(max_lines).enumerate() {
                let y = field.y + i as f64 * line_height;
                doc.insert_text(line, 1, field.x, y, Align::Left)?;
            }
        }
    }

    Ok(())
}

/// Render a cover by drawing positioned fields onto an existing base
/// PDF, returning the filled document.
pub fn render_field_cover(
    base_pdf: &[u8],
    fields: &[TemplateField],
    values: &FieldValues,
    family: &str,
    builder: FontFamilyBuilder,
) -> Result<Vec<u8>> {
    let mut doc = PdfDocument::open_from_bytes(base_pdf)?;
    doc.register_font_family(family, builder)?;
    fill_fields(&mut doc, fields, values, family)?;
    Ok(doc.to_bytes()?)
}
