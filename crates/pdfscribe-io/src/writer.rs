//! Serializing a [`Document`] through lopdf.
//!
//! New pages get a content stream replayed from their [`ContentOp`]s.
//! Pages carried over from a loaded file keep their original objects; they
//! are re-parented under the new page tree with inherited attributes copied
//! onto the page so nothing is lost when intermediate tree nodes drop out.

use std::collections::HashMap;

use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Object, ObjectId, Stream, StringFormat, dictionary};
use pdfscribe_core::{
    ContentOp, Document, Image, ImageKind, PageSource, PaintMode, Shape, StandardFont,
};

use crate::error::BackendError;
use crate::lopdf_backend::{WriteOptions, resolve, resolve_inherited};

/// Page attributes that may be inherited from the page tree.
const INHERITABLE: [&[u8]; 4] = [b"MediaBox", b"Resources", b"CropBox", b"Rotate"];

pub(crate) fn write_document(doc: &Document, options: &WriteOptions) -> Result<Vec<u8>, BackendError> {
    let mut pdf = match doc.base() {
        Some(bytes) => lopdf::Document::load_mem(bytes)?,
        None => lopdf::Document::with_version(options.version.as_str()),
    };
    let existing = pdf.get_pages();
    let base_root = pdf.trailer.get(b"Root").and_then(Object::as_reference).ok();
    let catalog_id = match base_root {
        Some(id) if doc.base().is_some() => id,
        _ => pdf.new_object_id(),
    };
    // Re-use the old root node id so stale references still land on a Pages node.
    let base_pages = pdf
        .get_object(catalog_id)
        .and_then(Object::as_dict)
        .and_then(|catalog| catalog.get(b"Pages"))
        .and_then(Object::as_reference)
        .ok();
    let pages_id = match base_pages {
        Some(id) => id,
        None => pdf.new_object_id(),
    };

    let mut resources = SharedResources::default();
    let mut kids = Vec::with_capacity(doc.page_count());
    for (index, page) in doc.pages().iter().enumerate() {
        let page_id = match page.source() {
            PageSource::Existing { index: number } => {
                let id = *existing.get(&number).ok_or_else(|| {
                    BackendError::Parse(format!("page {number} is missing from the source file"))
                })?;
                reparent_page(&mut pdf, id, pages_id)?;
                id
            }
            PageSource::New => {
                let (content, page_resources) =
                    encode_page(&mut pdf, doc, page.ops(), &mut resources)?;
                let content_id = pdf.add_object(Stream::new(dictionary! {}, content));
                pdf.add_object(dictionary! {
                    "Type" => "Page",
                    "Parent" => pages_id,
                    "MediaBox" => vec![0.into(), 0.into(), real(page.width()), real(page.height())],
                    "Resources" => page_resources,
                    "Contents" => content_id,
                })
            }
        };
        tracing::trace!(page = index + 1, ?page_id, "wrote page");
        kids.push(page_id);
    }

    pdf.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids.iter().map(|id| Object::Reference(*id)).collect::<Vec<_>>(),
            "Count" => kids.len() as i64,
        }),
    );

    let mut catalog = match pdf.get_object(catalog_id).and_then(Object::as_dict) {
        Ok(old) => old.clone(),
        Err(_) => dictionary! { "Type" => "Catalog" },
    };
    catalog.set("Pages", pages_id);
    catalog.remove(b"Outlines");
    if let Some(outlines_id) = write_outlines(&mut pdf, doc, &kids) {
        catalog.set("Outlines", outlines_id);
        catalog.set("PageMode", "UseOutlines");
    }
    pdf.objects.insert(catalog_id, Object::Dictionary(catalog));
    pdf.trailer.set("Root", catalog_id);

    let info_id = pdf.add_object(info_dictionary(doc, options));
    pdf.trailer.set("Info", info_id);

    if options.compress {
        pdf.compress();
    }
    let mut buf = Vec::new();
    pdf.save_to(&mut buf)?;
    Ok(buf)
}

fn real(value: f64) -> Object {
    Object::Real(value as f32)
}

/// Copy inherited attributes onto the page and point it at the new root.
fn reparent_page(pdf: &mut lopdf::Document, page_id: ObjectId, pages_id: ObjectId) -> Result<(), BackendError> {
    let mut inherited = Vec::new();
    for key in INHERITABLE {
        if let Some(value) = resolve_inherited(pdf, page_id, key)? {
            inherited.push((key, value.clone()));
        }
    }
    let page = pdf.get_object_mut(page_id).and_then(Object::as_dict_mut)?;
    for (key, value) in inherited {
        if !page.has(key) {
            page.set(key.to_vec(), value);
        }
    }
    page.set("Parent", pages_id);
    Ok(())
}

/// Fonts and images shared between pages.
#[derive(Default)]
struct SharedResources {
    fonts: HashMap<StandardFont, ObjectId>,
    images: HashMap<usize, ObjectId>,
}

fn font_resource_name(font: StandardFont) -> String {
    let position = StandardFont::ALL.iter().position(|f| *f == font).unwrap_or(0);
    format!("F{}", position + 1)
}

fn font_object(pdf: &mut lopdf::Document, shared: &mut SharedResources, font: StandardFont) -> ObjectId {
    *shared.fonts.entry(font).or_insert_with(|| {
        let mut dict = dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => font.postscript_name(),
        };
        if !font.is_symbolic() {
            dict.set("Encoding", "WinAnsiEncoding");
        }
        pdf.add_object(dict)
    })
}

fn image_object(
    pdf: &mut lopdf::Document,
    shared: &mut SharedResources,
    index: usize,
    image: &Image,
) -> ObjectId {
    *shared.images.entry(index).or_insert_with(|| {
        let mut dict = dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => i64::from(image.pixel_width),
            "Height" => i64::from(image.pixel_height),
            "ColorSpace" => image.color.pdf_name(),
            "BitsPerComponent" => i64::from(image.bits_per_component),
        };
        let stream = match image.kind {
            ImageKind::Jpeg => {
                dict.set("Filter", "DCTDecode");
                Stream::new(dict, image.data.clone()).with_compression(false)
            }
            ImageKind::Png => Stream::new(dict, image.data.clone()),
        };
        pdf.add_object(stream)
    })
}

/// Build the content stream and resource dictionary of a new page.
fn encode_page(
    pdf: &mut lopdf::Document,
    doc: &Document,
    ops: &[ContentOp],
    shared: &mut SharedResources,
) -> Result<(Vec<u8>, Dictionary), BackendError> {
    let mut fonts = Dictionary::new();
    let mut xobjects = Dictionary::new();
    let mut out = Vec::new();

    for op in ops {
        match op {
            ContentOp::SaveState => out.push(Operation::new("q", vec![])),
            ContentOp::RestoreState => out.push(Operation::new("Q", vec![])),
            ContentOp::SetFillGray(gray) => out.push(Operation::new("g", vec![real(*gray)])),
            ContentOp::Translate { tx, ty } => out.push(Operation::new(
                "cm",
                vec![1.into(), 0.into(), 0.into(), 1.into(), real(*tx), real(*ty)],
            )),
            ContentOp::SetFont { font, size } => {
                let name = font_resource_name(*font);
                fonts.set(name.clone(), font_object(pdf, shared, *font));
                out.push(Operation::new("Tf", vec![Object::Name(name.into_bytes()), real(*size)]));
            }
            ContentOp::SetTextRendering(mode) => {
                out.push(Operation::new("Tr", vec![i64::from(*mode).into()]));
            }
            ContentOp::Paint(paint) => match (paint.shape, paint.mode) {
                (Shape::Rect { x, y, width, height }, mode) => {
                    out.push(Operation::new(
                        "re",
                        vec![real(x), real(y), real(width), real(height)],
                    ));
                    let operator = if mode == PaintMode::Fill { "f" } else { "S" };
                    out.push(Operation::new(operator, vec![]));
                }
                (Shape::Line { from, to }, PaintMode::Stroke) => {
                    out.push(Operation::new("m", vec![real(from.x), real(from.y)]));
                    out.push(Operation::new("l", vec![real(to.x), real(to.y)]));
                    out.push(Operation::new("S", vec![]));
                }
                (Shape::Line { .. }, PaintMode::Fill) => {
                    return Err(BackendError::Core(pdfscribe_core::PdfError::Unsupported(
                        "a line has no interior to fill".into(),
                    )));
                }
            },
            ContentOp::Clip { rect, .. } => {
                out.push(Operation::new(
                    "re",
                    vec![real(rect.x0), real(rect.y0), real(rect.width()), real(rect.height())],
                ));
                out.push(Operation::new("W", vec![]));
                out.push(Operation::new("n", vec![]));
            }
            ContentOp::ShowText {
                font,
                size,
                x,
                y,
                text,
                ..
            } => {
                let name = font_resource_name(*font);
                fonts.set(name.clone(), font_object(pdf, shared, *font));
                out.push(Operation::new("BT", vec![]));
                out.push(Operation::new("Tf", vec![Object::Name(name.into_bytes()), real(*size)]));
                out.push(Operation::new("Td", vec![real(*x), real(*y)]));
                out.push(Operation::new(
                    "Tj",
                    vec![Object::String(text.as_bytes().to_vec(), StringFormat::Literal)],
                ));
                out.push(Operation::new("ET", vec![]));
            }
            ContentOp::DrawImage { image, rect } => {
                let index = image.index();
                let data = doc.image(*image).ok_or_else(|| {
                    BackendError::Parse(format!("page references unknown image {index}"))
                })?;
                let name = format!("Im{}", index + 1);
                xobjects.set(name.clone(), image_object(pdf, shared, index, data));
                out.push(Operation::new("q", vec![]));
                out.push(Operation::new(
                    "cm",
                    vec![
                        real(rect.width()),
                        0.into(),
                        0.into(),
                        real(rect.height()),
                        real(rect.x0),
                        real(rect.y0),
                    ],
                ));
                out.push(Operation::new("Do", vec![Object::Name(name.into_bytes())]));
                out.push(Operation::new("Q", vec![]));
            }
        }
    }

    let mut page_resources = Dictionary::new();
    if !fonts.is_empty() {
        page_resources.set("Font", fonts);
    }
    if !xobjects.is_empty() {
        page_resources.set("XObject", xobjects);
    }
    let content = Content { operations: out }.encode()?;
    Ok((content, page_resources))
}

/// Write a flat outline tree and return its root, or `None` without entries.
fn write_outlines(pdf: &mut lopdf::Document, doc: &Document, kids: &[ObjectId]) -> Option<ObjectId> {
    let entries: Vec<_> = doc
        .outlines()
        .iter()
        .filter_map(|outline| kids.get(outline.page_index).map(|page| (outline, *page)))
        .collect();
    if entries.is_empty() {
        return None;
    }

    let root_id = pdf.new_object_id();
    let item_ids: Vec<ObjectId> = entries.iter().map(|_| pdf.new_object_id()).collect();
    for (i, (outline, page_id)) in entries.iter().enumerate() {
        let mut item = dictionary! {
            "Title" => text_string(&outline.title),
            "Parent" => root_id,
            "Dest" => vec![Object::Reference(*page_id), "Fit".into()],
        };
        if i > 0 {
            item.set("Prev", item_ids[i - 1]);
        }
        if let Some(next) = item_ids.get(i + 1) {
            item.set("Next", *next);
        }
        pdf.objects.insert(item_ids[i], Object::Dictionary(item));
    }
    pdf.objects.insert(
        root_id,
        Object::Dictionary(dictionary! {
            "Type" => "Outlines",
            "First" => item_ids[0],
            "Last" => item_ids[item_ids.len() - 1],
            "Count" => item_ids.len() as i64,
        }),
    );
    Some(root_id)
}

fn info_dictionary(doc: &Document, options: &WriteOptions) -> Dictionary {
    let mut dict = Dictionary::new();
    for (key, value) in doc.info().iter() {
        dict.set(key.as_bytes().to_vec(), text_string(value));
    }
    if !dict.has(b"Producer") {
        dict.set("Producer", text_string(&options.producer));
    }
    dict
}

/// A PDF text string: a literal when ASCII, else UTF-16BE with a BOM.
pub(crate) fn text_string(text: &str) -> Object {
    if text.is_ascii() {
        return Object::string_literal(text);
    }
    let mut bytes = vec![0xFE, 0xFF];
    for unit in text.encode_utf16() {
        bytes.extend_from_slice(&unit.to_be_bytes());
    }
    Object::String(bytes, StringFormat::Hexadecimal)
}
