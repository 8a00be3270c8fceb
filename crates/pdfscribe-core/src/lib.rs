//! pdfscribe-core: Backend-independent drawing state, text layout and
//! document model.
//!
//! This crate owns the PDFlib-style [`Session`] state machine and the types
//! it records into a [`Document`]. Serialization, font metrics and image
//! decoding are reached through the traits in [`backend`]; implementations
//! live in `pdfscribe-io`.

pub mod backend;
pub mod document;
pub mod error;
pub mod font;
pub mod geometry;
pub mod graphics_state;
pub mod image;
pub mod options;
pub mod page;
pub mod session;
pub mod shape;
pub mod text;

pub use backend::{Collaborators, ImageLoader, MetricsProvider, PdfBackend};
pub use document::{Document, DocumentInfo, DocumentOrigin, Outline};
pub use error::PdfError;
pub use font::{FontHandle, FontMetrics, FontRegistry, StandardFont};
pub use geometry::{BBox, Point};
pub use graphics_state::{ActiveFont, GraphicsState};
pub use image::{Image, ImageColor, ImageId, ImageKind};
pub use options::SessionOptions;
pub use page::{ContentOp, Page, PageSource};
pub use session::{Phase, Session};
pub use shape::{ClipRegion, PaintMode, PaintOp, Shape};
pub use text::{BoxedLine, BoxedText, TextBox, wrap_lines};
