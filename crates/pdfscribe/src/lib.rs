//! pdfscribe: PDFlib-style procedural PDF authoring.
//!
//! This is the public API facade crate. It re-exports the model and
//! [`Session`] from pdfscribe-core and wires them to the lopdf writer,
//! standard font metrics and image decoder from pdfscribe-io.
//!
//! # Architecture
//!
//! - **pdfscribe-core**: Backend-independent drawing state, text layout and document model
//! - **pdfscribe-io**: lopdf reader/writer, standard-14 metrics, JPEG/PNG decoding
//! - **pdfscribe** (this crate): Constructors that tie everything together
//!
//! # Example
//!
//! ```ignore
//! let mut session = pdfscribe::create("hello.pdf");
//! session.begin_page(612.0, 792.0)?;
//! session.set_font("Helvetica", 12.0, "host")?;
//! session.show_xy("Hello", 72.0, 720.0)?;
//! session.close()?;
//! ```

mod pdf;

pub use pdf::{Pdf, create, create_with_options, default_collaborators};
pub use pdfscribe_core;
pub use pdfscribe_core::{
    BBox, BoxedLine, BoxedText, ClipRegion, Collaborators, ContentOp, Document, DocumentInfo,
    DocumentOrigin, FontHandle, FontMetrics, FontRegistry, GraphicsState, Image, ImageColor,
    ImageId, ImageKind, ImageLoader, MetricsProvider, Outline, Page, PageSource, PaintMode,
    PaintOp, PdfBackend, PdfError, Phase, Point, Session, SessionOptions, Shape, StandardFont,
    TextBox, wrap_lines,
};
pub use pdfscribe_io;
pub use pdfscribe_io::{
    BackendError, LopdfBackend, RasterImageLoader, StandardMetrics, WriteOptions,
};
