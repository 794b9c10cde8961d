//! Page geometry detection and classification

use crate::{PdfError, Result};
use lopdf::{Document, Object, ObjectId};

/// Standard page formats recognized by the classifier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageFormat {
    A4,
    Letter,
    A5,
    Legal,
    Executive,
    B5,
}

/// Classification table in match priority order.
/// A4: 595 x 842 (210 x 297 mm), Letter: 612 x 792 (8.5 x 11 in),
/// A5: 420 x 595, Legal: 612 x 1008, Executive: 522 x 756, B5: 499 x 709.
const STANDARD_SIZES: [(PageFormat, f64, f64); 6] = [
    (PageFormat::A4, 595.0, 842.0),
    (PageFormat::Letter, 612.0, 792.0),
    (PageFormat::A5, 420.0, 595.0),
    (PageFormat::Legal, 612.0, 1008.0),
    (PageFormat::Executive, 522.0, 756.0),
    (PageFormat::B5, 499.0, 709.0),
];

/// Per-dimension tolerance in points when classifying
const SIZE_TOLERANCE: f64 = 5.0;

impl PageFormat {
    /// Parse a format from its case-insensitive name
    pub fn parse(name: &str) -> Option<PageFormat> {
        STANDARD_SIZES
            .iter()
            .find(|(format, _, _)| format.name().eq_ignore_ascii_case(name))
            .map(|(format, _, _)| *format)
    }

    /// Standard (width, height) in points
    pub fn dimensions(self) -> (f64, f64) {
        let (_, width, height) = STANDARD_SIZES
            .iter()
            .find(|(format, _, _)| *format == self)
            .copied()
            .unwrap_or((PageFormat::A4, 595.0, 842.0));
        (width, height)
    }

    pub fn name(self) -> &'static str {
        match self {
            PageFormat::A4 => "A4",
            PageFormat::Letter => "Letter",
            PageFormat::A5 => "A5",
            PageFormat::Legal => "Legal",
            PageFormat::Executive => "Executive",
            PageFormat::B5 => "B5",
        }
    }

    /// The standard PageSize for this format
    pub fn page_size(self) -> PageSize {
        let (width, height) = self.dimensions();
        PageSize {
            width,
            height,
            format: Some(self),
        }
    }
}

/// Physical page geometry in PDF points.
///
/// `format` is derived from the dimensions and never authoritative;
/// the exact dimensions always win.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageSize {
    pub width: f64,
    pub height: f64,
    pub format: Option<PageFormat>,
}

impl PageSize {
    /// Classify the given dimensions against the standard table.
    /// First match in table order wins; no match leaves `format` unset.
    pub fn from_dimensions(width: f64, height: f64) -> Self {
        let format = STANDARD_SIZES
            .iter()
            .find(|(_, w, h)| (width - w).abs() < SIZE_TOLERANCE && (height - h).abs() < SIZE_TOLERANCE)
            .map(|(format, _, _)| *format);

        Self {
            width,
            height,
            format,
        }
    }

    pub fn a4() -> Self {
        PageFormat::A4.page_size()
    }

    pub fn is_portrait(&self) -> bool {
        self.height > self.width
    }

    /// Human-readable label, e.g. "A4 (Portrait)" or
    /// "Custom 500 x 500 points (Landscape)"
    pub fn label(&self) -> String {
        let orientation = if self.is_portrait() {
            "Portrait"
        } else {
            "Landscape"
        };

        match self.format {
            Some(format) => format!("{} ({orientation})", format.name()),
            None => format!(
                "Custom {} x {} points ({orientation})",
                self.width.round(),
                self.height.round()
            ),
        }
    }
}

impl Default for PageSize {
    fn default() -> Self {
        Self::a4()
    }
}

/// Detect the page size of a PDF from its first page MediaBox.
///
/// Detection failures of any kind (unparseable bytes, no pages, missing
/// MediaBox) return the caller-supplied default; detection never blocks
/// the caller.
pub fn detect_page_size(data: &[u8], default: PageSize) -> PageSize {
    match first_page_dimensions(data) {
        Ok((width, height)) => PageSize::from_dimensions(width, height),
        Err(_) => default,
    }
}

fn first_page_dimensions(data: &[u8]) -> Result<(f64, f64)> {
    let doc = Document::load_mem(data).map_err(|e| PdfError::OpenError(e.to_string()))?;

    let pages = doc.get_pages();
    let (_, &page_id) = pages
        .iter()
        .next()
        .ok_or_else(|| PdfError::ParseError("Document has no pages".to_string()))?;

    let media_box = inherited_media_box(&doc, page_id)?;
    media_box_rect(&media_box)
}

/// Get a page's MediaBox, following the Pages parent inheritance chain
pub(crate) fn inherited_media_box(doc: &Document, page_id: ObjectId) -> Result<Vec<Object>> {
    let mut current_id = page_id;

    // Follow parent chain up to 10 levels (safety limit)
    for _ in 0..10 {
        let obj = doc.get_object(current_id)?;
        let dict = obj
            .as_dict()
            .map_err(|_| PdfError::ParseError("Object is not a dictionary".to_string()))?;

        if let Ok(media_box) = dict.get(b"MediaBox").or_else(|_| dict.get(b"CropBox")) {
            let media_box_array = match media_box {
                Object::Array(arr) => arr.clone(),
                Object::Reference(ref_id) => {
                    let referred = doc.get_object(*ref_id)?;
                    referred
                        .as_array()
                        .map_err(|_| {
                            PdfError::ParseError("MediaBox reference is not an array".to_string())
                        })?
                        .clone()
                }
                _ => return Err(PdfError::ParseError("MediaBox is not an array".to_string())),
            };
            return Ok(media_box_array);
        }

        if let Ok(Object::Reference(parent_id)) = dict.get(b"Parent") {
            current_id = *parent_id;
            continue;
        }

        break;
    }

    // Fallback: assume A4
    Ok(vec![
        Object::Integer(0),
        Object::Integer(0),
        Object::Real(595.28),
        Object::Real(841.89),
    ])
}

/// Extract (width, height) from a MediaBox array
pub(crate) fn media_box_rect(media_box: &[Object]) -> Result<(f64, f64)> {
    if media_box.len() < 4 {
        return Err(PdfError::ParseError("Invalid MediaBox format".to_string()));
    }

    let coord = |obj: &Object| -> Result<f64> {
        obj.as_f32()
            .map(|v| v as f64)
            .ok()
            .or_else(|| obj.as_i64().ok().map(|v| v as f64))
            .ok_or_else(|| PdfError::ParseError("Invalid MediaBox coordinate".to_string()))
    };

    let x1 = coord(&media_box[0])?;
    let y1 = coord(&media_box[1])?;
    let x2 = coord(&media_box[2])?;
    let y2 = coord(&media_box[3])?;

    Ok((x2 - x1, y2 - y1))
}
