//! Collaborator traits consumed by the session.
//!
//! The core never touches PDF object syntax, font files or image codecs.
//! A [`Session`](crate::Session) reaches them through these three traits,
//! bundled as [`Collaborators`].

use std::path::Path;
use std::sync::Arc;

use crate::document::Document;
use crate::error::PdfError;
use crate::font::{FontMetrics, StandardFont};
use crate::image::{Image, ImageKind};

/// Reads and writes whole documents.
///
/// # Usage
///
/// ```ignore
/// let doc = backend.load(Path::new("in.pdf"))?;
/// backend.save(&doc, Path::new("out.pdf"))?;
/// ```
pub trait PdfBackend: Send {
    /// Parse the file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`PdfError::IoError`] if the file cannot be read and
    /// [`PdfError::ParseError`] if it is not a usable PDF.
    fn load(&self, path: &Path) -> Result<Document, PdfError>;

    /// Serialize `doc` and write it to `path`.
    ///
    /// # Errors
    ///
    /// Returns [`PdfError::IoError`] if the file cannot be written.
    fn save(&self, doc: &Document, path: &Path) -> Result<(), PdfError>;
}

/// Supplies glyph metrics for the standard fonts.
pub trait MetricsProvider: Send + Sync {
    /// Load the metrics for `font`.
    ///
    /// # Errors
    ///
    /// Returns [`PdfError::FontError`] when the metrics source is missing or
    /// corrupt.
    fn load_metrics(&self, font: StandardFont) -> Result<FontMetrics, PdfError>;
}

/// Decodes image files for placement.
pub trait ImageLoader: Send {
    /// Read and decode the image at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`PdfError::IoError`] if the file cannot be read and
    /// [`PdfError::ParseError`] if its content does not decode as `kind`.
    fn load(&self, kind: ImageKind, path: &Path) -> Result<Image, PdfError>;
}

/// The collaborators a session is built with.
pub struct Collaborators {
    pub backend: Box<dyn PdfBackend>,
    pub metrics: Arc<dyn MetricsProvider>,
    pub images: Box<dyn ImageLoader>,
}

impl std::fmt::Debug for Collaborators {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Collaborators").finish_non_exhaustive()
    }
}
