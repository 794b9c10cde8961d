//! PDF document manipulation

use std::collections::HashMap;
use std::path::Path;

use lopdf::{Dictionary, Document, Object, ObjectId, Stream};

use crate::font::{FontFamily, FontFamilyBuilder, FontVariant};
use crate::geometry::{inherited_media_box, media_box_rect};
use crate::text::{generate_text_operators, TextRenderContext};
use crate::{Align, PdfError, Result};

/// RGB color with components in 0.0..=1.0
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    pub fn from_rgb(rgb: [f32; 3]) -> Self {
        Self {
            r: rgb[0],
            g: rgb[1],
            b: rgb[2],
        }
    }

    pub fn black() -> Self {
        Self::rgb(0.0, 0.0, 0.0)
    }

    pub fn white() -> Self {
        Self::rgb(1.0, 1.0, 1.0)
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::black()
    }
}

/// A PDF document with font embedding and text insertion support.
///
/// Text drawn with `insert_text` is buffered per page and written out,
/// together with the fonts it used, when the document is saved.
pub struct PdfDocument {
    inner: Document,
    font_families: HashMap<String, FontFamily>,
    current_family: Option<String>,
    current_variant: FontVariant,
    current_font_size: f32,
    current_text_color: Color,
    /// Variant font name -> embedded Type0 font object
    embedded_fonts: HashMap<String, ObjectId>,
    /// Page number -> (variant font name -> page resource name)
    page_font_resources: HashMap<usize, HashMap<String, String>>,
    next_font_resource: u32,
    /// Page number -> pending content operators
    page_content_buffer: HashMap<usize, Vec<u8>>,
}

impl PdfDocument {
    /// Open a PDF document from a file
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let inner = Document::load(path).map_err(|e| PdfError::OpenError(e.to_string()))?;
        Ok(Self::from_document(inner))
    }

    /// Open a PDF document from memory
    pub fn open_from_bytes(data: &[u8]) -> Result<Self> {
        let inner = Document::load_mem(data).map_err(|e| PdfError::OpenError(e.to_string()))?;
        Ok(Self::from_document(inner))
    }

    fn from_document(inner: Document) -> Self {
        Self {
            inner,
            font_families: HashMap::new(),
            current_family: None,
            current_variant: FontVariant::Regular,
            current_font_size: 12.0,
            current_text_color: Color::black(),
            embedded_fonts: HashMap::new(),
            page_font_resources: HashMap::new(),
            next_font_resource: 1,
            page_content_buffer: HashMap::new(),
        }
    }

    /// Number of pages in the document
    pub fn page_count(&self) -> usize {
        self.inner.get_pages().len()
    }

    /// Register a font family under the given name
    pub fn register_font_family(&mut self, name: &str, builder: FontFamilyBuilder) -> Result<()> {
        if self.font_families.contains_key(name) {
            return Err(PdfError::FontAlreadyExists(name.to_string()));
        }
        let family = builder.build(name)?;
        self.font_families.insert(name.to_string(), family);
        Ok(())
    }

    /// Select the current font family and size
    pub fn set_font(&mut self, family: &str, size: f32) -> Result<()> {
        if !self.font_families.contains_key(family) {
            return Err(PdfError::FontNotFound(family.to_string()));
        }
        self.current_family = Some(family.to_string());
        self.current_font_size = size;
        Ok(())
    }

    pub fn set_font_size(&mut self, size: f32) {
        self.current_font_size = size;
    }

    pub fn set_font_variant(&mut self, variant: FontVariant) {
        self.current_variant = variant;
    }

    pub fn set_text_color(&mut self, color: Color) {
        self.current_text_color = color;
    }

    /// Width of `text` in points with the current font, size, and variant
    pub fn get_text_width(&self, text: &str) -> Result<f32> {
        let family_name = self
            .current_family
            .as_deref()
            .ok_or_else(|| PdfError::FontNotFound("No font selected".to_string()))?;
        let family = self
            .font_families
            .get(family_name)
            .ok_or_else(|| PdfError::FontNotFound(family_name.to_string()))?;
        let font = family.get_variant(self.current_variant);
        Ok(font.text_width_points(text, self.current_font_size))
    }

    /// Insert text on a page at the given position.
    ///
    /// `page_number` is 1-based. `y` is measured from the top of the page;
    /// it is converted to PDF coordinates using the page height. `align`
    /// places the text relative to `x`: its left edge, center, or right
    /// edge.
    pub fn insert_text(
        &mut self,
        text: &str,
        page_number: usize,
        x: f64,
        y: f64,
        align: Align,
    ) -> Result<()> {
        let page_count = self.page_count();
        if page_number == 0 || page_number > page_count {
            return Err(PdfError::InvalidPage(page_number, page_count));
        }
        if text.is_empty() {
            return Ok(());
        }

        let family_name = self
            .current_family
            .clone()
            .ok_or_else(|| PdfError::FontNotFound("No font selected".to_string()))?;
        let variant = self.current_variant;
        let variant_font_name = {
            let family = self
                .font_families
                .get(&family_name)
                .ok_or_else(|| PdfError::FontNotFound(family_name.clone()))?;
            family.variant_name(&family_name, variant)
        };

        // Record the characters before encoding: the widths array and
        // ToUnicode CMap are generated from used_chars at save time.
        let (width, text_hex) = {
            let family = self
                .font_families
                .get_mut(&family_name)
                .ok_or_else(|| PdfError::FontNotFound(family_name.clone()))?;
            let font = family.get_variant_mut(variant);
            font.add_chars(text);
            (
                font.text_width_points(text, self.current_font_size) as f64,
                font.encode_text_hex(text),
            )
        };

        let page_height = self.get_page_height(page_number)?;
        let pdf_y = page_height - y;

        let start_x = match align {
            Align::Left => x,
            Align::Center => x - width / 2.0,
            Align::Right => x - width,
        };

        let resource_name = self.get_or_create_font_ref(page_number, &variant_font_name);

        let ctx = TextRenderContext {
            font_name: resource_name,
            font_size: self.current_font_size,
            color: self.current_text_color,
        };
        let ops = generate_text_operators(&text_hex, start_x, pdf_y, &ctx);

        self.page_content_buffer
            .entry(page_number)
            .or_default()
            .extend_from_slice(&ops);

        Ok(())
    }

    /// Save the document to a file, embedding fonts and flushing
    /// buffered text.
    pub fn save<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        self.finalize()?;
        self.inner
            .save(path)
            .map_err(|e| PdfError::SaveError(e.to_string()))?;
        Ok(())
    }

    /// Serialize the document to bytes, embedding fonts and flushing
    /// buffered text.
    pub fn to_bytes(&mut self) -> Result<Vec<u8>> {
        self.finalize()?;
        let mut out = Vec::new();
        self.inner
            .save_to(&mut out)
            .map_err(|e| PdfError::SaveError(e.to_string()))?;
        Ok(out)
    }

    /// Height of a page in points, honoring inherited MediaBox entries
    pub fn get_page_height(&self, page_number: usize) -> Result<f64> {
        let page_id = self.page_id(page_number)?;
        let media_box = inherited_media_box(&self.inner, page_id)?;
        let (_, height) = media_box_rect(&media_box)?;
        Ok(height)
    }

    /// Access the underlying lopdf document
    pub fn inner(&self) -> &Document {
        &self.inner
    }

    /// Mutable access to the underlying lopdf document
    pub fn inner_mut(&mut self) -> &mut Document {
        &mut self.inner
    }

    fn page_id(&self, page_number: usize) -> Result<ObjectId> {
        let pages = self.inner.get_pages();
        pages
            .get(&(page_number as u32))
            .copied()
            .ok_or(PdfError::InvalidPage(page_number, pages.len()))
    }

    fn get_or_create_font_ref(&mut self, page_number: usize, font_name: &str) -> String {
        let resources = self.page_font_resources.entry(page_number).or_default();
        if let Some(existing) = resources.get(font_name) {
            return existing.clone();
        }
        let resource_name = format!("F{}", self.next_font_resource);
        self.next_font_resource += 1;
        resources.insert(font_name.to_string(), resource_name.clone());
        resource_name
    }

    fn finalize(&mut self) -> Result<()> {
        self.flush_content_buffers()?;
        self.embed_fonts()?;
        self.finalize_page_font_resources()?;
        Ok(())
    }

    fn flush_content_buffers(&mut self) -> Result<()> {
        let buffers: Vec<(usize, Vec<u8>)> = self.page_content_buffer.drain().collect();
        for (page_number, ops) in buffers {
            let page_id = self.page_id(page_number)?;
            self.append_to_content_stream(page_id, &ops)?;
        }
        Ok(())
    }

    /// Append operators to a page's content, replacing its Contents with
    /// a single fresh stream. Handles inline, referenced, and array-form
    /// content, compressed or not.
    fn append_to_content_stream(&mut self, page_id: ObjectId, ops: &[u8]) -> Result<()> {
        let (existing_content, page_dict) = {
            let page_dict = self.inner.get_object(page_id)?.as_dict().map_err(|_| {
                PdfError::ParseError("Page object is not a dictionary".to_string())
            })?;
            let page_dict_clone = page_dict.clone();

            let existing = match page_dict.get(b"Contents") {
                Ok(Object::Stream(stream)) => stream
                    .decompressed_content()
                    .unwrap_or_else(|_| stream.content.clone()),
                Ok(Object::Reference(ref_id)) => {
                    if let Ok(Object::Stream(stream)) = self.inner.get_object(*ref_id) {
                        stream
                            .decompressed_content()
                            .unwrap_or_else(|_| stream.content.clone())
                    } else {
                        Vec::new()
                    }
                }
                Ok(Object::Array(arr)) => {
                    let mut combined = Vec::new();
                    for obj in arr {
                        let stream = match obj {
                            Object::Reference(ref_id) => {
                                match self.inner.get_object(*ref_id) {
                                    Ok(Object::Stream(stream)) => stream,
                                    _ => continue,
                                }
                            }
                            Object::Stream(stream) => stream,
                            _ => continue,
                        };
                        let data = stream
                            .decompressed_content()
                            .unwrap_or_else(|_| stream.content.clone());
                        combined.extend_from_slice(&data);
                    }
                    combined
                }
                _ => Vec::new(),
            };

            (existing, page_dict_clone)
        };

        let mut new_content = existing_content;
        new_content.push(b'\n');
        new_content.extend_from_slice(ops);

        let stream_id = self
            .inner
            .add_object(Stream::new(Dictionary::new(), new_content));

        let mut new_page_dict = page_dict;
        new_page_dict.set("Contents", Object::Reference(stream_id));
        self.inner
            .objects
            .insert(page_id, Object::Dictionary(new_page_dict));

        Ok(())
    }

    /// Embed every font variant that drew at least one character
    fn embed_fonts(&mut self) -> Result<()> {
        let mut pending = Vec::new();
        for family in self.font_families.values() {
            let mut variants = vec![&family.regular];
            if let Some(bold) = &family.bold {
                variants.push(bold);
            }
            if let Some(italic) = &family.italic {
                variants.push(italic);
            }
            for font in variants {
                if font.used_chars.is_empty() || self.embedded_fonts.contains_key(&font.name) {
                    continue;
                }
                pending.push(font.clone());
            }
        }

        for font in pending {
            let objects = font.to_pdf_objects()?;

            let font_file_id = self
                .inner
                .add_object(Object::Stream(objects.font_file_stream));

            let mut font_descriptor = objects.font_descriptor;
            font_descriptor.set("FontFile2", Object::Reference(font_file_id));
            let descriptor_id = self
                .inner
                .add_object(Object::Dictionary(font_descriptor));

            let mut cid_font = objects.cid_font;
            cid_font.set("FontDescriptor", Object::Reference(descriptor_id));
            let cid_font_id = self.inner.add_object(Object::Dictionary(cid_font));

            let tounicode_id = self
                .inner
                .add_object(Object::Stream(objects.tounicode_stream));

            let mut type0_font = objects.type0_font;
            type0_font.set(
                "DescendantFonts",
                Object::Array(vec![Object::Reference(cid_font_id)]),
            );
            type0_font.set("ToUnicode", Object::Reference(tounicode_id));
            let type0_id = self.inner.add_object(Object::Dictionary(type0_font));

            self.embedded_fonts.insert(font.name.clone(), type0_id);
        }

        Ok(())
    }

    /// Point each page's /Resources /Font entries at the embedded fonts
    fn finalize_page_font_resources(&mut self) -> Result<()> {
        let page_resources: Vec<(usize, HashMap<String, String>)> =
            self.page_font_resources.drain().collect();

        for (page_number, fonts) in page_resources {
            let page_id = self.page_id(page_number)?;

            let mut font_dict = Dictionary::new();
            for (font_name, resource_name) in &fonts {
                let type0_id = self.embedded_fonts.get(font_name).ok_or_else(|| {
                    PdfError::FontNotFound(font_name.clone())
                })?;
                font_dict.set(resource_name.as_bytes(), Object::Reference(*type0_id));
            }

            let page_dict = self.inner.get_object(page_id)?.as_dict()?.clone();

            let (resources_ref, mut inline_resources) = match page_dict.get(b"Resources") {
                Ok(Object::Reference(resources_id)) => (Some(*resources_id), Dictionary::new()),
                Ok(Object::Dictionary(existing)) => (None, existing.clone()),
                _ => (None, Dictionary::new()),
            };

            if let Some(resources_id) = resources_ref {
                // Indirect resources: patch the referenced dictionary
                let resources = self.inner.get_object_mut(resources_id)?.as_dict_mut()?;
                merge_font_dict(resources, font_dict);
            } else {
                merge_font_dict(&mut inline_resources, font_dict);
                let mut new_page_dict = page_dict;
                new_page_dict.set("Resources", Object::Dictionary(inline_resources));
                self.inner
                    .objects
                    .insert(page_id, Object::Dictionary(new_page_dict));
            }
        }

        Ok(())
    }
}

fn merge_font_dict(resources: &mut Dictionary, font_dict: Dictionary) {
    match resources.get_mut(b"Font") {
        Ok(Object::Dictionary(existing)) => {
            for (key, value) in font_dict.iter() {
                existing.set(key.clone(), value.clone());
            }
        }
        _ => {
            resources.set("Font", Object::Dictionary(font_dict));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::dictionary;
    use pretty_assertions::assert_eq;

    fn test_pdf(page_count: usize) -> Vec<u8> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();

        let mut kids = Vec::new();
        for _ in 0..page_count {
            let content = Stream::new(Dictionary::new(), b"0 0 m".to_vec());
            let content_id = doc.add_object(Object::Stream(content));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
                "Contents" => content_id,
            });
            kids.push(Object::Reference(page_id));
        }

        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => page_count as u32,
            }),
        );

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes).unwrap();
        bytes
    }

    #[test]
    fn test_color_default_is_black() {
        assert_eq!(Color::default(), Color::black());
    }

    #[test]
    fn test_color_from_rgb() {
        let color = Color::from_rgb([0.2, 0.4, 0.6]);
        assert_eq!(color, Color::rgb(0.2, 0.4, 0.6));
    }

    #[test]
    fn test_open_from_bytes() {
        let doc = PdfDocument::open_from_bytes(&test_pdf(3)).unwrap();
        assert_eq!(doc.page_count(), 3);
    }

    #[test]
    fn test_open_garbage_fails() {
        assert!(matches!(
            PdfDocument::open_from_bytes(b"not a pdf"),
            Err(PdfError::OpenError(_))
        ));
    }

    #[test]
    fn test_page_height() {
        let doc = PdfDocument::open_from_bytes(&test_pdf(1)).unwrap();
        assert_eq!(doc.get_page_height(1).unwrap(), 842.0);
    }

    #[test]
    fn test_set_font_unknown_family() {
        let mut doc = PdfDocument::open_from_bytes(&test_pdf(1)).unwrap();
        assert!(matches!(
            doc.set_font("missing", 12.0),
            Err(PdfError::FontNotFound(_))
        ));
    }

    #[test]
    fn test_insert_text_invalid_page() {
        let mut doc = PdfDocument::open_from_bytes(&test_pdf(2)).unwrap();
        let result = doc.insert_text("hi", 5, 100.0, 100.0, Align::Left);
        assert!(matches!(result, Err(PdfError::InvalidPage(5, 2))));
    }

    #[test]
    fn test_insert_text_page_zero() {
        let mut doc = PdfDocument::open_from_bytes(&test_pdf(2)).unwrap();
        let result = doc.insert_text("hi", 0, 100.0, 100.0, Align::Left);
        assert!(matches!(result, Err(PdfError::InvalidPage(0, 2))));
    }

    #[test]
    fn test_insert_empty_text_is_noop() {
        let mut doc = PdfDocument::open_from_bytes(&test_pdf(1)).unwrap();
        doc.insert_text("", 1, 100.0, 100.0, Align::Left).unwrap();
        assert!(doc.page_content_buffer.is_empty());
    }

    #[test]
    fn test_insert_text_without_font_fails() {
        let mut doc = PdfDocument::open_from_bytes(&test_pdf(1)).unwrap();
        let result = doc.insert_text("hi", 1, 100.0, 100.0, Align::Left);
        assert!(matches!(result, Err(PdfError::FontNotFound(_))));
    }

    #[test]
    fn test_register_font_family_requires_regular() {
        let mut doc = PdfDocument::open_from_bytes(&test_pdf(1)).unwrap();
        let result = doc.register_font_family("times", FontFamilyBuilder::new());
        assert!(matches!(result, Err(PdfError::FontParseError(_))));
    }

    #[test]
    fn test_to_bytes_round_trips_without_text() {
        let mut doc = PdfDocument::open_from_bytes(&test_pdf(2)).unwrap();
        let bytes = doc.to_bytes().unwrap();
        let reloaded = Document::load_mem(&bytes).unwrap();
        assert_eq!(reloaded.get_pages().len(), 2);
    }
}
