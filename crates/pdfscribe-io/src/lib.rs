//! pdfscribe-io: lopdf reader/writer, standard font metrics and image
//! decoding for pdfscribe.
//!
//! Implements the collaborator traits declared in
//! [`pdfscribe_core::backend`]: [`LopdfBackend`] loads and saves documents,
//! [`StandardMetrics`] supplies widths for the 14 standard fonts and
//! [`RasterImageLoader`] decodes JPEG and PNG files.

pub mod error;
pub mod image_loader;
pub mod lopdf_backend;
mod reader;
pub mod standard_fonts;
mod writer;

pub use error::BackendError;
pub use image_loader::RasterImageLoader;
pub use lopdf_backend::{LopdfBackend, WriteOptions};
pub use pdfscribe_core;
pub use standard_fonts::StandardMetrics;
