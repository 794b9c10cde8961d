//! Integration tests for pdf-core
//!
//! These tests verify end-to-end functionality with real PDF operations.

use lopdf::{dictionary, Document, Object, Stream};
use pdf_core::{
    attach_cover_page, detect_page_size, Align, FontFamilyBuilder, FontVariant, PageFormat,
    PageSize, PdfDocument, PdfError,
};
use pretty_assertions::assert_eq;

/// Create a minimal valid PDF with the given pages, all of one size.
///
/// Each page carries distinct content so tests can verify that page
/// content survives a merge.
fn create_test_pdf(page_count: usize, width: f64, height: f64) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");

    let pages_id = doc.new_object_id();

    let mut kids = Vec::new();
    for i in 0..page_count {
        let content = format!("% page {i}").into_bytes();
        let contents_id = doc.add_object(Object::Stream(Stream::new(dictionary! {}, content)));

        let page_id = doc.add_object(Object::Dictionary(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![0.into(), 0.into(), width.into(), height.into()],
            "Resources" => dictionary! {},
            "Contents" => contents_id,
        }));
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

    let catalog_id = doc.add_object(Object::Dictionary(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    }));
    doc.trailer.set("Root", catalog_id);

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer).unwrap();
    buffer
}

fn page_contents(data: &[u8]) -> Vec<Vec<u8>> {
    let doc = Document::load_mem(data).unwrap();
    doc.get_pages()
        .values()
        .map(|&page_id| doc.get_page_content(page_id).unwrap())
        .collect()
}

fn read_test_font(file: &str) -> Vec<u8> {
    std::fs::read(format!("../../fonts/{file}")).expect("Failed to read test font file")
}

fn serif_family() -> FontFamilyBuilder {
    FontFamilyBuilder::new()
        .regular(read_test_font("DejaVuSerif.ttf"))
        .bold(read_test_font("DejaVuSerif-Bold.ttf"))
        .italic(read_test_font("DejaVuSerif-Italic.ttf"))
}

fn first_page_ops(data: &[u8]) -> String {
    String::from_utf8_lossy(&page_contents(data)[0]).into_owned()
}

#[test]
fn test_attach_cover_page_counts() {
    let cover = create_test_pdf(1, 595.0, 842.0);
    let manuscript = create_test_pdf(3, 595.0, 842.0);

    let merged = attach_cover_page(&cover, &manuscript).expect("Failed to merge");

    let doc = Document::load_mem(&merged).expect("Failed to re-open merged PDF");
    assert_eq!(doc.get_pages().len(), 4);
}

#[test]
fn test_attach_cover_drops_extra_cover_pages() {
    // HTML rendering can overflow onto a second page; only the first
    // cover page must survive.
    let cover = create_test_pdf(2, 595.0, 842.0);
    let manuscript = create_test_pdf(3, 595.0, 842.0);

    let merged = attach_cover_page(&cover, &manuscript).expect("Failed to merge");

    let doc = Document::load_mem(&merged).expect("Failed to re-open merged PDF");
    assert_eq!(doc.get_pages().len(), 4);
}

#[test]
fn test_attach_cover_page_order() {
    let cover = create_test_pdf(1, 595.0, 842.0);
    let manuscript = create_test_pdf(2, 595.0, 842.0);

    // Distinguish cover content from manuscript content
    let merged = attach_cover_page(&cover, &manuscript).expect("Failed to merge");
    let contents = page_contents(&merged);

    assert_eq!(contents.len(), 3);
    assert_eq!(contents[0], b"% page 0");
    assert_eq!(contents[1], b"% page 0");
    assert_eq!(contents[2], b"% page 1");
}

#[test]
fn test_attach_cover_preserves_manuscript_content() {
    let cover = create_test_pdf(1, 595.0, 842.0);
    let manuscript = create_test_pdf(3, 612.0, 792.0);

    let merged = attach_cover_page(&cover, &manuscript).expect("Failed to merge");
    let contents = page_contents(&merged);

    let original: Vec<Vec<u8>> = page_contents(&manuscript);
    assert_eq!(&contents[1..], &original[..]);
}

#[test]
fn test_attach_cover_empty_cover_fails() {
    let cover = create_test_pdf(0, 595.0, 842.0);
    let manuscript = create_test_pdf(3, 595.0, 842.0);

    let result = attach_cover_page(&cover, &manuscript);
    assert!(matches!(result, Err(PdfError::MergeError(_))));
}

#[test]
fn test_attach_cover_empty_manuscript_fails() {
    let cover = create_test_pdf(1, 595.0, 842.0);
    let manuscript = create_test_pdf(0, 595.0, 842.0);

    let result = attach_cover_page(&cover, &manuscript);
    assert!(matches!(result, Err(PdfError::MergeError(_))));
}

#[test]
fn test_attach_cover_unparseable_input_fails() {
    let manuscript = create_test_pdf(3, 595.0, 842.0);

    let result = attach_cover_page(b"not a pdf", &manuscript);
    assert!(matches!(result, Err(PdfError::OpenError(_))));
}

#[test]
fn test_merged_output_reopens() {
    let cover = create_test_pdf(1, 595.0, 842.0);
    let manuscript = create_test_pdf(2, 595.0, 842.0);

    let merged = attach_cover_page(&cover, &manuscript).expect("Failed to merge");

    // Merge the merged output again to confirm it is well-formed
    let remerged = attach_cover_page(&cover, &merged).expect("Failed to re-merge");
    let doc = Document::load_mem(&remerged).expect("Failed to re-open");
    assert_eq!(doc.get_pages().len(), 4);
}

#[test]
fn test_detect_page_size_a4() {
    let data = create_test_pdf(1, 595.0, 842.0);
    let size = detect_page_size(&data, PageSize::a4());
    assert_eq!(size.format, Some(PageFormat::A4));
}

#[test]
fn test_detect_page_size_letter() {
    let data = create_test_pdf(2, 612.0, 792.0);
    let size = detect_page_size(&data, PageSize::a4());
    assert_eq!(size.format, Some(PageFormat::Letter));
}

#[test]
fn test_detect_page_size_custom() {
    let data = create_test_pdf(1, 500.0, 500.0);
    let size = detect_page_size(&data, PageSize::a4());
    assert_eq!(size.format, None);
    assert_eq!(size.width, 500.0);
    assert_eq!(size.height, 500.0);
}

#[test]
fn test_detect_page_size_garbage_uses_default() {
    let default = PageFormat::Letter.page_size();
    let size = detect_page_size(b"not a pdf", default);
    assert_eq!(size, default);
}

#[test]
fn test_detect_page_size_uses_first_page() {
    // Detection reads the first page only; later pages are irrelevant
    let data = create_test_pdf(5, 612.0, 1008.0);
    let size = detect_page_size(&data, PageSize::a4());
    assert_eq!(size.format, Some(PageFormat::Legal));
}

#[test]
fn test_insert_text_flips_y_top_down() {
    let pdf_data = create_test_pdf(1, 595.0, 842.0);

    let mut doc = PdfDocument::open_from_bytes(&pdf_data).expect("Failed to open PDF");
    doc.register_font_family("serif", serif_family())
        .expect("Failed to register font");
    doc.set_font("serif", 12.0).expect("Failed to set font");
    doc.insert_text("Hello", 1, 100.0, 50.0, Align::Left)
        .expect("Failed to insert text");

    let out = doc.to_bytes().expect("Failed to save PDF");
    let ops = first_page_ops(&out);

    // y = 50 from the top of an 842pt page lands at 792 in PDF space
    assert!(ops.contains("100 792 Td"), "ops: {ops}");
    assert!(ops.contains("/F1 12 Tf"), "ops: {ops}");
    assert!(ops.contains(" Tj"), "ops: {ops}");
}

#[test]
fn test_insert_text_alignment_offsets() {
    let pdf_data = create_test_pdf(1, 595.0, 842.0);

    let mut doc = PdfDocument::open_from_bytes(&pdf_data).expect("Failed to open PDF");
    doc.register_font_family("serif", serif_family())
        .expect("Failed to register font");
    doc.set_font("serif", 12.0).expect("Failed to set font");

    let width = f64::from(doc.get_text_width("Hello").expect("Failed to measure"));
    assert!(width > 0.0);

    doc.insert_text("Hello", 1, 300.0, 50.0, Align::Center)
        .expect("Failed to insert text");
    doc.insert_text("Hello", 1, 300.0, 70.0, Align::Right)
        .expect("Failed to insert text");

    let out = doc.to_bytes().expect("Failed to save PDF");
    let ops = first_page_ops(&out);

    let centered = 300.0 - width / 2.0;
    let right = 300.0 - width;
    assert!(ops.contains(&format!("{centered} 792 Td")), "ops: {ops}");
    assert!(ops.contains(&format!("{right} 772 Td")), "ops: {ops}");
}

#[test]
fn test_insert_text_preserves_existing_content() {
    let pdf_data = create_test_pdf(1, 595.0, 842.0);

    let mut doc = PdfDocument::open_from_bytes(&pdf_data).expect("Failed to open PDF");
    doc.register_font_family("serif", serif_family())
        .expect("Failed to register font");
    doc.set_font("serif", 12.0).expect("Failed to set font");
    doc.insert_text("Hello", 1, 100.0, 50.0, Align::Left)
        .expect("Failed to insert text");

    let out = doc.to_bytes().expect("Failed to save PDF");
    let ops = first_page_ops(&out);

    assert!(ops.starts_with("% page 0"), "ops: {ops}");
}

#[test]
fn test_insert_text_embeds_type0_font() {
    let pdf_data = create_test_pdf(1, 595.0, 842.0);

    let mut doc = PdfDocument::open_from_bytes(&pdf_data).expect("Failed to open PDF");
    doc.register_font_family("serif", serif_family())
        .expect("Failed to register font");
    doc.set_font("serif", 12.0).expect("Failed to set font");
    doc.insert_text("Hello", 1, 100.0, 50.0, Align::Left)
        .expect("Failed to insert text");

    let out = doc.to_bytes().expect("Failed to save PDF");
    let reopened = Document::load_mem(&out).expect("Failed to re-open");
    let page_id = *reopened.get_pages().get(&1).unwrap();
    let page = reopened.get_object(page_id).unwrap().as_dict().unwrap();
    let resources = page.get(b"Resources").unwrap().as_dict().unwrap();
    let fonts = resources.get(b"Font").unwrap().as_dict().unwrap();
    assert_eq!(fonts.len(), 1);

    let (_, font_ref) = fonts.iter().next().unwrap();
    let font = reopened
        .get_object(font_ref.as_reference().unwrap())
        .unwrap()
        .as_dict()
        .unwrap();
    assert_eq!(font.get(b"Subtype").unwrap().as_name().unwrap(), b"Type0");
    assert_eq!(
        font.get(b"Encoding").unwrap().as_name().unwrap(),
        b"Identity-H"
    );
}

#[test]
fn test_insert_text_variants_embed_separate_fonts() {
    let pdf_data = create_test_pdf(1, 595.0, 842.0);

    let mut doc = PdfDocument::open_from_bytes(&pdf_data).expect("Failed to open PDF");
    doc.register_font_family("serif", serif_family())
        .expect("Failed to register font");
    doc.set_font("serif", 12.0).expect("Failed to set font");

    doc.insert_text("Regular", 1, 100.0, 50.0, Align::Left)
        .expect("Failed to insert text");
    doc.set_font_variant(FontVariant::Bold);
    doc.insert_text("Bold", 1, 100.0, 70.0, Align::Left)
        .expect("Failed to insert text");

    let out = doc.to_bytes().expect("Failed to save PDF");
    let reopened = Document::load_mem(&out).expect("Failed to re-open");
    let page_id = *reopened.get_pages().get(&1).unwrap();
    let page = reopened.get_object(page_id).unwrap().as_dict().unwrap();
    let resources = page.get(b"Resources").unwrap().as_dict().unwrap();
    let fonts = resources.get(b"Font").unwrap().as_dict().unwrap();
    assert_eq!(fonts.len(), 2);
}
