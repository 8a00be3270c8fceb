//! Error type for pdfscribe.
//!
//! Every drawing, text and lifecycle call reports failure through [`PdfError`].
//! None of these conditions abort the process; callers decide how to recover.

use std::fmt;

/// Errors reported by document, drawing and text operations.
///
/// The variants split expected caller-side conditions (an unknown font name,
/// a call made in the wrong lifecycle state) from collaborator failures
/// (metrics, parsing, I/O).
#[derive(Debug, Clone, PartialEq)]
pub enum PdfError {
    /// A font name did not resolve to any standard font.
    NotFound(String),
    /// The call needs an open page, an active font, a pending path or a
    /// saved graphics state, and that precondition is unmet.
    InvalidState(String),
    /// The request is well-formed but cannot be honored, e.g. clipping to a
    /// line or loading an image kind that is not recognized.
    Unsupported(String),
    /// A numeric or handle argument is out of range.
    InvalidArgument(String),
    /// Font metrics for a resolved name could not be loaded.
    FontError(String),
    /// Malformed PDF or image data.
    ParseError(String),
    /// Reading or writing a file failed.
    IoError(String),
}

impl PdfError {
    /// Shorthand for the most common failure: an operation that needs an open page.
    pub(crate) fn no_page() -> Self {
        PdfError::InvalidState("no page is open".to_string())
    }

    /// Returns `true` for [`PdfError::NotFound`].
    pub fn is_not_found(&self) -> bool {
        matches!(self, PdfError::NotFound(_))
    }

    /// Returns `true` for [`PdfError::InvalidState`].
    pub fn is_invalid_state(&self) -> bool {
        matches!(self, PdfError::InvalidState(_))
    }

    /// Returns `true` for [`PdfError::Unsupported`].
    pub fn is_unsupported(&self) -> bool {
        matches!(self, PdfError::Unsupported(_))
    }
}

impl fmt::Display for PdfError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PdfError::NotFound(name) => write!(f, "font not found: {name}"),
            PdfError::InvalidState(msg) => write!(f, "invalid state: {msg}"),
            PdfError::Unsupported(msg) => write!(f, "unsupported: {msg}"),
            PdfError::InvalidArgument(msg) => write!(f, "invalid argument: {msg}"),
            PdfError::FontError(msg) => write!(f, "font error: {msg}"),
            PdfError::ParseError(msg) => write!(f, "parse error: {msg}"),
            PdfError::IoError(msg) => write!(f, "I/O error: {msg}"),
        }
    }
}

impl std::error::Error for PdfError {}

impl From<std::io::Error> for PdfError {
    fn from(err: std::io::Error) -> Self {
        PdfError::IoError(err.to_string())
    }
}
