//! Error types for the reader, writer and image loader.
//!
//! Uses [`thiserror`] for ergonomic error derivation. Provides [`BackendError`]
//! that wraps lopdf, `image` and I/O failures and converts them to [`PdfError`].

use pdfscribe_core::PdfError;
use thiserror::Error;

/// Error type for collaborator operations.
#[derive(Debug, Error)]
pub enum BackendError {
    /// Malformed PDF structure or syntax.
    #[error("PDF parse error: {0}")]
    Parse(String),

    /// Reading or writing a file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Font metrics could not be produced.
    #[error("font error: {0}")]
    Font(String),

    /// Image data could not be decoded.
    #[error("image error: {0}")]
    Image(String),

    /// A core library error.
    #[error(transparent)]
    Core(#[from] PdfError),
}

impl From<lopdf::Error> for BackendError {
    fn from(err: lopdf::Error) -> Self {
        BackendError::Parse(err.to_string())
    }
}

impl From<image::ImageError> for BackendError {
    fn from(err: image::ImageError) -> Self {
        match err {
            image::ImageError::IoError(io) => BackendError::Io(io),
            other => BackendError::Image(other.to_string()),
        }
    }
}

impl From<BackendError> for PdfError {
    fn from(err: BackendError) -> Self {
        match err {
            BackendError::Parse(msg) => PdfError::ParseError(msg),
            BackendError::Io(e) => PdfError::IoError(e.to_string()),
            BackendError::Font(msg) => PdfError::FontError(msg),
            BackendError::Image(msg) => PdfError::ParseError(format!("image: {msg}")),
            BackendError::Core(e) => e,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_error_parse() {
        let err = BackendError::Parse("invalid xref table".to_string());
        assert_eq!(err.to_string(), "PDF parse error: invalid xref table");
    }

    #[test]
    fn backend_error_io_from_std() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file missing");
        let err: BackendError = io_err.into();
        assert!(matches!(err, BackendError::Io(_)));
        assert!(err.to_string().contains("file missing"));
    }

    #[test]
    fn lopdf_structure_error_is_parse() {
        let err: BackendError = lopdf::Error::ObjectNotFound((4, 0)).into();
        assert!(matches!(err, BackendError::Parse(_)));
    }

    #[test]
    fn image_error_maps_to_parse_error() {
        let pdf_err: PdfError = BackendError::Image("truncated PNG".into()).into();
        assert_eq!(pdf_err, PdfError::ParseError("image: truncated PNG".into()));
    }

    #[test]
    fn backend_error_to_pdf_error_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let pdf_err: PdfError = BackendError::Io(io_err).into();
        assert!(matches!(pdf_err, PdfError::IoError(_)));
        assert!(pdf_err.to_string().contains("denied"));
    }

    #[test]
    fn backend_error_to_pdf_error_font() {
        let pdf_err: PdfError = BackendError::Font("missing widths".to_string()).into();
        assert_eq!(pdf_err, PdfError::FontError("missing widths".to_string()));
    }

    #[test]
    fn backend_error_to_pdf_error_core_passthrough() {
        let original = PdfError::Unsupported("image kind \"gif\"".to_string());
        let pdf_err: PdfError = BackendError::Core(original.clone()).into();
        assert_eq!(pdf_err, original);
    }
}
