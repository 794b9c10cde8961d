//! Cover page assembly
//!
//! Merges the first page of a rendered cover document in front of all
//! pages of a manuscript, producing a single well-formed PDF.

use std::collections::BTreeMap;

use lopdf::{Document, Object, ObjectId};

use crate::{PdfError, Result};

/// Attach the first page of `cover` in front of every page of `manuscript`.
///
/// Extra cover pages (artifacts of HTML rendering overflow) are dropped.
/// Either document having zero pages is an error, as is failing to parse
/// either input.
pub fn attach_cover_page(cover: &[u8], manuscript: &[u8]) -> Result<Vec<u8>> {
    let mut cover_doc =
        Document::load_mem(cover).map_err(|e| PdfError::OpenError(e.to_string()))?;
    let mut manuscript_doc =
        Document::load_mem(manuscript).map_err(|e| PdfError::OpenError(e.to_string()))?;

    let mut max_id = 1;
    let mut documents_pages: BTreeMap<ObjectId, Object> = BTreeMap::new();
    let mut documents_objects: BTreeMap<ObjectId, Object> = BTreeMap::new();

    // Renumber both documents into a single id space. The cover goes
    // first, so its page id sorts ahead of every manuscript page.
    cover_doc.renumber_objects_with(max_id);
    max_id = cover_doc.max_id + 1;

    let cover_pages = cover_doc.get_pages();
    let first_cover_page = cover_pages
        .values()
        .next()
        .copied()
        .ok_or_else(|| PdfError::MergeError("Cover document has no pages".to_string()))?;
    documents_pages.insert(
        first_cover_page,
        cover_doc.get_object(first_cover_page)?.clone(),
    );
    documents_objects.extend(cover_doc.objects.clone());

    manuscript_doc.renumber_objects_with(max_id);

    let manuscript_pages = manuscript_doc.get_pages();
    if manuscript_pages.is_empty() {
        return Err(PdfError::MergeError(
            "Manuscript document has no pages".to_string(),
        ));
    }
    for &page_id in manuscript_pages.values() {
        documents_pages.insert(page_id, manuscript_doc.get_object(page_id)?.clone());
    }
    documents_objects.extend(manuscript_doc.objects.clone());

    let mut merged = Document::with_version("1.5");

    // Fold Catalog and Pages into one of each; copy everything else
    // except page tree nodes, which are rebuilt below.
    let mut catalog_object: Option<(ObjectId, Object)> = None;
    let mut pages_object: Option<(ObjectId, Object)> = None;

    for (object_id, object) in &documents_objects {
        match object_type(object) {
            Some(b"Catalog") => {
                catalog_object = Some((
                    catalog_object.map(|(id, _)| id).unwrap_or(*object_id),
                    object.clone(),
                ));
            }
            Some(b"Pages") => {
                if let Ok(dict) = object.as_dict() {
                    let mut folded = dict.clone();
                    if let Some((_, ref existing)) = pages_object {
                        if let Ok(existing_dict) = existing.as_dict() {
                            for (key, value) in existing_dict.iter() {
                                folded.set(key.clone(), value.clone());
                            }
                        }
                    }
                    pages_object = Some((
                        pages_object.map(|(id, _)| id).unwrap_or(*object_id),
                        Object::Dictionary(folded),
                    ));
                }
            }
            Some(b"Page") => {}
            Some(b"Outlines") | Some(b"Outline") => {}
            _ => {
                merged.objects.insert(*object_id, object.clone());
            }
        }
    }

    let (pages_id, pages_obj) =
        pages_object.ok_or_else(|| PdfError::MergeError("No page tree found".to_string()))?;
    let (catalog_id, catalog_obj) =
        catalog_object.ok_or_else(|| PdfError::MergeError("No catalog found".to_string()))?;

    // Re-parent every kept page under the merged page tree
    for (object_id, object) in &documents_pages {
        if let Ok(dict) = object.as_dict() {
            let mut dict = dict.clone();
            dict.set("Parent", pages_id);
            merged.objects.insert(*object_id, Object::Dictionary(dict));
        }
    }

    if let Ok(dict) = pages_obj.as_dict() {
        let mut dict = dict.clone();
        dict.set("Count", documents_pages.len() as u32);
        dict.set(
            "Kids",
            documents_pages
                .keys()
                .map(|id| Object::Reference(*id))
                .collect::<Vec<_>>(),
        );
        merged.objects.insert(pages_id, Object::Dictionary(dict));
    }

    if let Ok(dict) = catalog_obj.as_dict() {
        let mut dict = dict.clone();
        dict.set("Pages", pages_id);
        dict.remove(b"Outlines");
        merged.objects.insert(catalog_id, Object::Dictionary(dict));
    }

    merged.trailer.set("Root", catalog_id);
    merged.max_id = merged.objects.len() as u32;
    merged.renumber_objects();

    let mut out = Vec::new();
    merged
        .save_to(&mut out)
        .map_err(|e| PdfError::SaveError(e.to_string()))?;
    Ok(out)
}

fn object_type(object: &Object) -> Option<&[u8]> {
    object.as_dict().ok()?.get(b"Type").ok()?.as_name().ok()
}
