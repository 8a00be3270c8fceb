//! lopdf-based implementation of the [`PdfBackend`] trait.
//!
//! Loading parses the file with lopdf and maps its page tree, `/Info`
//! dictionary and outline tree onto a [`Document`]. Saving builds a fresh
//! page tree (re-using the loaded file's objects for carried-over pages) and
//! serializes it through lopdf.

use std::fs;
use std::path::Path;

use pdfscribe_core::{BBox, Document, PdfBackend, PdfError};

use crate::error::BackendError;
use crate::{reader, writer};

/// Settings applied when writing a document.
#[derive(Debug, Clone, PartialEq)]
pub struct WriteOptions {
    /// PDF header version of newly created files (default: "1.7").
    pub version: String,
    /// Flate-compress content and raw image streams (default: true).
    pub compress: bool,
    /// `/Producer` entry written unless the document sets one (default: "pdfscribe").
    pub producer: String,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            version: "1.7".to_string(),
            compress: true,
            producer: "pdfscribe".to_string(),
        }
    }
}

/// The lopdf-backed PDF reader and writer.
///
/// # Usage
///
/// ```ignore
/// let backend = LopdfBackend::default();
/// let doc = backend.load(Path::new("in.pdf"))?;
/// backend.save(&doc, Path::new("out.pdf"))?;
/// ```
#[derive(Debug, Clone, Default)]
pub struct LopdfBackend {
    options: WriteOptions,
}

impl LopdfBackend {
    pub fn new(options: WriteOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &WriteOptions {
        &self.options
    }

    /// Serialize `doc` to PDF bytes without touching the filesystem.
    pub fn to_bytes(&self, doc: &Document) -> Result<Vec<u8>, PdfError> {
        Ok(writer::write_document(doc, &self.options)?)
    }

    /// Parse PDF bytes; `path` is recorded as the document's source.
    pub fn from_bytes(&self, path: &Path, bytes: Vec<u8>) -> Result<Document, PdfError> {
        Ok(reader::read_document(path, bytes)?)
    }
}

impl PdfBackend for LopdfBackend {
    fn load(&self, path: &Path) -> Result<Document, PdfError> {
        let bytes = fs::read(path).map_err(BackendError::from)?;
        tracing::debug!(path = %path.display(), bytes = bytes.len(), "reading PDF");
        self.from_bytes(path, bytes)
    }

    fn save(&self, doc: &Document, path: &Path) -> Result<(), PdfError> {
        let bytes = self.to_bytes(doc)?;
        fs::write(path, &bytes).map_err(BackendError::from)?;
        tracing::debug!(
            path = %path.display(),
            bytes = bytes.len(),
            pages = doc.page_count(),
            "wrote PDF"
        );
        Ok(())
    }
}

/// Convert a lopdf numeric object (Integer or Real) to f64.
pub(crate) fn object_to_f64(obj: &lopdf::Object) -> Result<f64, BackendError> {
    match obj {
        lopdf::Object::Integer(i) => Ok(*i as f64),
        lopdf::Object::Real(f) => Ok(*f as f64),
        _ => Err(BackendError::Parse(format!("expected number, got {obj:?}"))),
    }
}

/// Extract a normalized [`BBox`] from a lopdf array `[x0, y0, x1, y1]`.
pub(crate) fn bbox_from_array(array: &[lopdf::Object]) -> Result<BBox, BackendError> {
    let [x0, y0, x1, y1] = array else {
        return Err(BackendError::Parse(format!(
            "expected 4-element array for box, got {}",
            array.len()
        )));
    };
    let (x0, y0) = (object_to_f64(x0)?, object_to_f64(y0)?);
    let (x1, y1) = (object_to_f64(x1)?, object_to_f64(y1)?);
    Ok(BBox::from_rect(x0, y0, x1 - x0, y1 - y0))
}

/// Follow an indirect reference, returning other objects unchanged.
pub(crate) fn resolve<'a>(doc: &'a lopdf::Document, obj: &'a lopdf::Object) -> &'a lopdf::Object {
    match obj {
        lopdf::Object::Reference(id) => doc.get_object(*id).unwrap_or(obj),
        other => other,
    }
}

/// Look up a key in the page dictionary, walking up the page tree
/// (via /Parent) if the key is not found on the page itself.
///
/// Returns `None` if the key is not found anywhere in the tree.
pub(crate) fn resolve_inherited<'a>(
    doc: &'a lopdf::Document,
    page_id: lopdf::ObjectId,
    key: &[u8],
) -> Result<Option<&'a lopdf::Object>, BackendError> {
    let mut current_id = page_id;
    // Page trees deeper than this are treated as cyclic.
    for _ in 0..64 {
        let dict = doc
            .get_object(current_id)
            .and_then(|o| o.as_dict())
            .map_err(|e| BackendError::Parse(format!("failed to get page dictionary: {e}")))?;

        if let Ok(value) = dict.get(key) {
            return Ok(Some(value));
        }

        match dict.get(b"Parent") {
            Ok(parent_obj) => {
                current_id = parent_obj
                    .as_reference()
                    .map_err(|e| BackendError::Parse(format!("invalid /Parent reference: {e}")))?;
            }
            Err(_) => return Ok(None),
        }
    }
    Err(BackendError::Parse("page tree is too deep or cyclic".into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::{Object, dictionary};

    #[test]
    fn object_to_f64_accepts_numbers() {
        assert_eq!(object_to_f64(&Object::Integer(612)).unwrap(), 612.0);
        assert_eq!(object_to_f64(&Object::Real(0.5)).unwrap(), 0.5);
        assert!(object_to_f64(&Object::Boolean(true)).is_err());
    }

    #[test]
    fn bbox_from_array_normalizes() {
        let array = vec![612.into(), 792.into(), 0.into(), 0.into()];
        assert_eq!(bbox_from_array(&array).unwrap(), BBox::new(0.0, 0.0, 612.0, 792.0));
    }

    #[test]
    fn bbox_from_array_rejects_wrong_length() {
        let array = vec![0.into(), 0.into(), 612.into()];
        assert!(matches!(bbox_from_array(&array), Err(BackendError::Parse(_))));
    }

    #[test]
    fn resolve_inherited_walks_parents() {
        let mut doc = lopdf::Document::with_version("1.7");
        let pages_id = doc.new_object_id();
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
        });
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => vec![Object::from(page_id)],
                "Count" => 1,
                "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
            }),
        );

        let media = resolve_inherited(&doc, page_id, b"MediaBox").unwrap().unwrap();
        assert_eq!(
            bbox_from_array(media.as_array().unwrap()).unwrap(),
            BBox::new(0.0, 0.0, 595.0, 842.0)
        );
        assert!(resolve_inherited(&doc, page_id, b"Rotate").unwrap().is_none());
    }

    #[test]
    fn default_write_options() {
        let opts = WriteOptions::default();
        assert_eq!(opts.version, "1.7");
        assert!(opts.compress);
        assert_eq!(opts.producer, "pdfscribe");
    }
}
