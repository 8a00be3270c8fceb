//! Mapping a parsed lopdf document onto [`Document`].

use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use pdfscribe_core::{Document, DocumentInfo, Outline, Page};

use crate::error::BackendError;
use crate::lopdf_backend::{bbox_from_array, resolve, resolve_inherited};

/// US Letter, used when a page has no MediaBox anywhere in its tree.
const DEFAULT_MEDIA_BOX: (f64, f64) = (612.0, 792.0);

pub(crate) fn read_document(path: &Path, bytes: Vec<u8>) -> Result<Document, BackendError> {
    let pdf = lopdf::Document::load_mem(&bytes)
        .map_err(|e| BackendError::Parse(format!("failed to parse PDF: {e}")))?;
    if pdf.is_encrypted() {
        return Err(BackendError::Parse("encrypted documents are not supported".into()));
    }

    let page_ids = pdf.get_pages();
    let mut pages = Vec::with_capacity(page_ids.len());
    for (&number, &page_id) in &page_ids {
        let (width, height) = match resolve_inherited(&pdf, page_id, b"MediaBox")? {
            Some(obj) => {
                let array = resolve(&pdf, obj)
                    .as_array()
                    .map_err(|e| BackendError::Parse(format!("invalid MediaBox: {e}")))?;
                let bbox = bbox_from_array(array)?;
                (bbox.width(), bbox.height())
            }
            None => {
                tracing::debug!(page = number, "page has no MediaBox, assuming US Letter");
                DEFAULT_MEDIA_BOX
            }
        };
        pages.push(Page::existing(width, height, number));
    }

    let info = read_info(&pdf);
    let outlines = read_outlines(&pdf, &page_ids);
    tracing::debug!(
        pages = pages.len(),
        info_entries = info.len(),
        outlines = outlines.len(),
        "parsed PDF"
    );
    Ok(Document::loaded(path, bytes, pages, info, outlines))
}

/// Decode a PDF text string: UTF-16BE with BOM, else UTF-8, else Latin-1.
pub(crate) fn decode_text_string(bytes: &[u8]) -> String {
    if let Some(utf16) = bytes.strip_prefix(&[0xFE, 0xFF]) {
        let units: Vec<u16> = utf16
            .chunks_exact(2)
            .map(|c| u16::from_be_bytes([c[0], c[1]]))
            .collect();
        return String::from_utf16_lossy(&units);
    }
    match std::str::from_utf8(bytes) {
        Ok(s) => s.to_string(),
        Err(_) => bytes.iter().map(|&b| b as char).collect(),
    }
}

fn catalog_entry<'a>(pdf: &'a lopdf::Document, key: &[u8]) -> Option<&'a lopdf::Dictionary> {
    let catalog = resolve(pdf, pdf.trailer.get(b"Root").ok()?).as_dict().ok()?;
    resolve(pdf, catalog.get(key).ok()?).as_dict().ok()
}

/// Every string-valued `/Info` entry.
fn read_info(pdf: &lopdf::Document) -> DocumentInfo {
    let mut info = DocumentInfo::new();
    let Some(dict) = pdf
        .trailer
        .get(b"Info")
        .ok()
        .and_then(|obj| resolve(pdf, obj).as_dict().ok())
    else {
        return info;
    };
    for (key, value) in dict.iter() {
        if let lopdf::Object::String(bytes, _) = resolve(pdf, value) {
            info.set(String::from_utf8_lossy(key), decode_text_string(bytes));
        }
    }
    info
}

/// Flatten the outline tree depth-first.
///
/// Entries whose destination does not resolve to a page are skipped.
fn read_outlines(pdf: &lopdf::Document, page_ids: &BTreeMap<u32, lopdf::ObjectId>) -> Vec<Outline> {
    let mut outlines = Vec::new();
    let Some(root) = catalog_entry(pdf, b"Outlines") else {
        return outlines;
    };
    let Ok(lopdf::Object::Reference(first)) = root.get(b"First") else {
        return outlines;
    };
    let page_index: BTreeMap<lopdf::ObjectId, usize> = page_ids
        .values()
        .enumerate()
        .map(|(index, id)| (*id, index))
        .collect();
    let mut visited = HashSet::new();
    walk_outline_items(pdf, *first, &page_index, &mut visited, &mut outlines);
    outlines
}

fn walk_outline_items(
    pdf: &lopdf::Document,
    first: lopdf::ObjectId,
    page_index: &BTreeMap<lopdf::ObjectId, usize>,
    visited: &mut HashSet<lopdf::ObjectId>,
    outlines: &mut Vec<Outline>,
) {
    let mut current = Some(first);
    while let Some(id) = current {
        if !visited.insert(id) {
            break;
        }
        let Ok(item) = pdf.get_object(id).and_then(|o| o.as_dict()) else {
            break;
        };

        let title = match item.get(b"Title").map(|t| resolve(pdf, t)) {
            Ok(lopdf::Object::String(bytes, _)) => decode_text_string(bytes),
            _ => String::new(),
        };
        match outline_target(pdf, item).and_then(|page| page_index.get(&page)) {
            Some(&index) => outlines.push(Outline {
                title,
                page_index: index,
            }),
            None => tracing::debug!(%title, "skipping outline entry without page destination"),
        }

        if let Ok(lopdf::Object::Reference(child)) = item.get(b"First") {
            walk_outline_items(pdf, *child, page_index, visited, outlines);
        }
        current = match item.get(b"Next") {
            Ok(lopdf::Object::Reference(next)) => Some(*next),
            _ => None,
        };
    }
}

/// Page object referenced by `/Dest` or a GoTo action's `/D`.
fn outline_target(pdf: &lopdf::Document, item: &lopdf::Dictionary) -> Option<lopdf::ObjectId> {
    let dest = match item.get(b"Dest") {
        Ok(dest) => dest,
        Err(_) => {
            let action = resolve(pdf, item.get(b"A").ok()?).as_dict().ok()?;
            if action.get(b"S").and_then(|s| s.as_name()).ok()? != b"GoTo" {
                return None;
            }
            action.get(b"D").ok()?
        }
    };
    match resolve(pdf, dest).as_array().ok()?.first()? {
        lopdf::Object::Reference(page) => Some(*page),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::{Object, StringFormat, dictionary};

    fn two_page_pdf() -> (lopdf::Document, lopdf::ObjectId, Vec<lopdf::ObjectId>) {
        let mut doc = lopdf::Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let page_ids: Vec<_> = [(612, 792), (842, 595)]
            .into_iter()
            .map(|(w, h)| {
                doc.add_object(dictionary! {
                    "Type" => "Page",
                    "Parent" => pages_id,
                    "MediaBox" => vec![0.into(), 0.into(), w.into(), h.into()],
                })
            })
            .collect();
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => page_ids.iter().map(|id| Object::from(*id)).collect::<Vec<_>>(),
                "Count" => page_ids.len() as i64,
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);
        (doc, catalog_id, page_ids)
    }

    fn save(mut doc: lopdf::Document) -> Vec<u8> {
        let mut buf = Vec::new();
        doc.save_to(&mut buf).unwrap();
        buf
    }

    #[test]
    fn reads_page_sizes_in_order() {
        let (doc, _, _) = two_page_pdf();
        let read = read_document(Path::new("two.pdf"), save(doc)).unwrap();
        let sizes: Vec<_> = read.pages().iter().map(|p| (p.width(), p.height())).collect();
        assert_eq!(sizes, vec![(612.0, 792.0), (842.0, 595.0)]);
        assert!(read.is_loaded());
        assert!(read.base().is_some());
    }

    #[test]
    fn reads_info_strings() {
        let (mut doc, _, _) = two_page_pdf();
        let mut title = vec![0xFE, 0xFF];
        for unit in "Résumé".encode_utf16() {
            title.extend_from_slice(&unit.to_be_bytes());
        }
        let info_id = doc.add_object(dictionary! {
            "Author" => Object::string_literal("Ada"),
            "Title" => Object::String(title, StringFormat::Hexadecimal),
            "Trapped" => "False",
        });
        doc.trailer.set("Info", info_id);

        let read = read_document(Path::new("info.pdf"), save(doc)).unwrap();
        assert_eq!(read.info().author(), Some("Ada"));
        assert_eq!(read.info().title(), Some("Résumé"));
        // Names are not text strings.
        assert_eq!(read.info().get("Trapped"), None);
    }

    #[test]
    fn reads_nested_outlines_depth_first() {
        let (mut doc, catalog_id, page_ids) = two_page_pdf();
        let root_id = doc.new_object_id();
        let child_id = doc.add_object(dictionary! {
            "Title" => Object::string_literal("Section 1.1"),
            "Parent" => root_id,
            "Dest" => vec![page_ids[1].into(), "Fit".into()],
        });
        let second_id = doc.new_object_id();
        let first_id = doc.add_object(dictionary! {
            "Title" => Object::string_literal("Chapter 1"),
            "Parent" => root_id,
            "Next" => second_id,
            "First" => child_id,
            "Last" => child_id,
            "Dest" => vec![page_ids[0].into(), "Fit".into()],
        });
        doc.objects.insert(
            second_id,
            Object::Dictionary(dictionary! {
                "Title" => Object::string_literal("Chapter 2"),
                "Parent" => root_id,
                "Prev" => first_id,
                "A" => dictionary! {
                    "S" => "GoTo",
                    "D" => vec![page_ids[1].into(), "Fit".into()],
                },
            }),
        );
        doc.objects.insert(
            root_id,
            Object::Dictionary(dictionary! {
                "Type" => "Outlines",
                "First" => first_id,
                "Last" => second_id,
            }),
        );
        doc.get_object_mut(catalog_id)
            .and_then(|o| o.as_dict_mut())
            .unwrap()
            .set("Outlines", root_id);

        let read = read_document(Path::new("outline.pdf"), save(doc)).unwrap();
        let got: Vec<_> = read
            .outlines()
            .iter()
            .map(|o| (o.title.as_str(), o.page_index))
            .collect();
        assert_eq!(got, vec![("Chapter 1", 0), ("Section 1.1", 1), ("Chapter 2", 1)]);
    }

    #[test]
    fn rejects_garbage() {
        let err = read_document(Path::new("bad.pdf"), b"not a pdf".to_vec()).unwrap_err();
        assert!(matches!(err, BackendError::Parse(_)));
    }

    #[test]
    fn decodes_text_strings() {
        assert_eq!(decode_text_string(b"plain"), "plain");
        assert_eq!(decode_text_string(&[0xFE, 0xFF, 0x00, 0x41, 0x00, 0xE9]), "Aé");
        assert_eq!(decode_text_string(&[0x43, 0x61, 0x66, 0xE9]), "Café");
    }
}
