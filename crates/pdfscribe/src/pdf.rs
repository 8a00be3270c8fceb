//! Session constructors and a read-only view of finished documents.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use pdfscribe_core::{
    Collaborators, Document, DocumentInfo, DocumentOrigin, Outline, Page, PdfBackend, PdfError,
    Session, SessionOptions,
};
use pdfscribe_io::{LopdfBackend, RasterImageLoader, StandardMetrics, WriteOptions};

/// The lopdf backend, built-in standard font metrics and the raster image
/// loader.
pub fn default_collaborators(write: WriteOptions) -> Collaborators {
    Collaborators {
        backend: Box::new(LopdfBackend::new(write)),
        metrics: Arc::new(StandardMetrics::new()),
        images: Box::new(RasterImageLoader::new()),
    }
}

/// Start an authoring session for `path` with default settings.
///
/// An existing file is loaded and its pages are kept; new pages are
/// appended after them. See [`Session::open`].
pub fn create(path: impl Into<PathBuf>) -> Session {
    create_with_options(path, SessionOptions::default(), WriteOptions::default())
}

/// Start an authoring session with explicit layout and output settings.
pub fn create_with_options(
    path: impl Into<PathBuf>,
    options: SessionOptions,
    write: WriteOptions,
) -> Session {
    Session::open(path, default_collaborators(write), options)
}

/// A PDF file opened for inspection.
///
/// Unlike [`create`], opening fails when the file is missing or unreadable.
///
/// # Example
///
/// ```ignore
/// let pdf = Pdf::open_file("out.pdf")?;
/// for page in pdf.pages() {
///     println!("{} x {}", page.width(), page.height());
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Pdf {
    doc: Document,
}

impl Pdf {
    /// Parse the file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`PdfError::NotFound`] when no file exists, otherwise the
    /// backend's I/O or parse error.
    pub fn open_file(path: impl AsRef<Path>) -> Result<Self, PdfError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(PdfError::NotFound(path.display().to_string()));
        }
        let doc = LopdfBackend::default().load(path)?;
        Ok(Self { doc })
    }

    /// Parse PDF bytes held in memory.
    pub fn open(bytes: &[u8]) -> Result<Self, PdfError> {
        let doc = LopdfBackend::default().from_bytes(Path::new(""), bytes.to_vec())?;
        Ok(Self { doc })
    }

    pub fn page_count(&self) -> usize {
        self.doc.page_count()
    }

    pub fn pages(&self) -> &[Page] {
        self.doc.pages()
    }

    /// The page at 0-based `index`.
    pub fn page(&self, index: usize) -> Result<&Page, PdfError> {
        self.doc.pages().get(index).ok_or_else(|| {
            PdfError::NotFound(format!(
                "page {index} (document has {} pages)",
                self.doc.page_count()
            ))
        })
    }

    pub fn info(&self) -> &DocumentInfo {
        self.doc.info()
    }

    /// Outline entries flattened in reading order.
    pub fn outlines(&self) -> &[Outline] {
        self.doc.outlines()
    }

    pub fn origin(&self) -> &DocumentOrigin {
        self.doc.origin()
    }

    pub fn document(&self) -> &Document {
        &self.doc
    }

    pub fn into_document(self) -> Document {
        self.doc
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_file_missing_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = Pdf::open_file(dir.path().join("absent.pdf")).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn open_rejects_garbage_bytes() {
        let err = Pdf::open(b"%PDF-1.7 truncated").unwrap_err();
        assert!(matches!(err, PdfError::ParseError(_)));
    }

    #[test]
    fn create_on_missing_path_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let session = create(dir.path().join("new.pdf"));
        assert_eq!(session.document().origin(), &DocumentOrigin::Created);
        assert_eq!(session.document().page_count(), 0);
    }

    #[test]
    fn page_out_of_range() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("one.pdf");
        let mut session = create(&path);
        session.begin_page(100.0, 200.0).unwrap();
        session.close().unwrap();

        let pdf = Pdf::open_file(&path).unwrap();
        assert_eq!(pdf.page_count(), 1);
        assert_eq!(pdf.page(0).unwrap().height(), 200.0);
        assert!(pdf.page(1).unwrap_err().is_not_found());
    }
}
