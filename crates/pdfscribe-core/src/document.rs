//! The in-memory document handed to and received from a [`PdfBackend`].
//!
//! [`PdfBackend`]: crate::PdfBackend

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::image::{Image, ImageId};
use crate::page::Page;

/// Document information dictionary entries.
///
/// Keys are free-form; the five standard keys have typed getters. Setting a
/// key again replaces its value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DocumentInfo {
    entries: BTreeMap<String, String>,
}

impl DocumentInfo {
    pub const AUTHOR: &'static str = "Author";
    pub const CREATOR: &'static str = "Creator";
    pub const SUBJECT: &'static str = "Subject";
    pub const TITLE: &'static str = "Title";
    pub const KEYWORDS: &'static str = "Keywords";

    pub fn new() -> Self {
        Self::default()
    }

    /// Set `key` to `value`, replacing any previous value.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn author(&self) -> Option<&str> {
        self.get(Self::AUTHOR)
    }

    pub fn creator(&self) -> Option<&str> {
        self.get(Self::CREATOR)
    }

    pub fn subject(&self) -> Option<&str> {
        self.get(Self::SUBJECT)
    }

    pub fn title(&self) -> Option<&str> {
        self.get(Self::TITLE)
    }

    pub fn keywords(&self) -> Option<&str> {
        self.get(Self::KEYWORDS)
    }

    /// Entries sorted by key.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A flat outline (bookmark) entry.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Outline {
    pub title: String,
    /// 0-based index of the destination page.
    pub page_index: usize,
}

/// How a document came into being.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DocumentOrigin {
    /// No file existed at the source path.
    Created,
    /// Parsed from an existing file.
    Loaded,
    /// A file existed but could not be parsed; an empty document replaced it.
    Recovered { reason: String },
}

/// An ordered set of pages plus document-level metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    path: PathBuf,
    origin: DocumentOrigin,
    pages: Vec<Page>,
    info: DocumentInfo,
    outlines: Vec<Outline>,
    images: Vec<Image>,
    base: Option<Vec<u8>>,
}

impl Document {
    /// An empty document that will be saved to `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            origin: DocumentOrigin::Created,
            pages: Vec::new(),
            info: DocumentInfo::default(),
            outlines: Vec::new(),
            images: Vec::new(),
            base: None,
        }
    }

    /// An empty document standing in for a file that failed to load.
    pub fn recovered(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self {
            origin: DocumentOrigin::Recovered {
                reason: reason.into(),
            },
            ..Self::new(path)
        }
    }

    /// A document parsed from `bytes`.
    ///
    /// Existing pages keep their content in `bytes`; the writer copies them
    /// from there when saving.
    pub fn loaded(
        path: impl Into<PathBuf>,
        bytes: Vec<u8>,
        pages: Vec<Page>,
        info: DocumentInfo,
        outlines: Vec<Outline>,
    ) -> Self {
        Self {
            origin: DocumentOrigin::Loaded,
            pages,
            info,
            outlines,
            base: Some(bytes),
            ..Self::new(path)
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn origin(&self) -> &DocumentOrigin {
        &self.origin
    }

    /// Whether the document was parsed from an existing file.
    pub fn is_loaded(&self) -> bool {
        self.origin == DocumentOrigin::Loaded
    }

    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn info(&self) -> &DocumentInfo {
        &self.info
    }

    pub fn outlines(&self) -> &[Outline] {
        &self.outlines
    }

    pub fn images(&self) -> &[Image] {
        &self.images
    }

    pub fn image(&self, id: ImageId) -> Option<&Image> {
        self.images.get(id.0)
    }

    /// Raw bytes of the file this document was loaded from.
    pub fn base(&self) -> Option<&[u8]> {
        self.base.as_deref()
    }

    pub(crate) fn info_mut(&mut self) -> &mut DocumentInfo {
        &mut self.info
    }

    pub(crate) fn push_page(&mut self, page: Page) -> usize {
        self.pages.push(page);
        self.pages.len() - 1
    }

    pub(crate) fn page_mut(&mut self, index: usize) -> Option<&mut Page> {
        self.pages.get_mut(index)
    }

    pub(crate) fn push_outline(&mut self, outline: Outline) {
        self.outlines.push(outline);
    }

    pub(crate) fn push_image(&mut self, image: Image) -> ImageId {
        self.images.push(image);
        ImageId(self.images.len() - 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn info_last_write_wins() {
        let mut info = DocumentInfo::new();
        info.set(DocumentInfo::AUTHOR, "first");
        info.set("Author", "second");
        assert_eq!(info.author(), Some("second"));
        assert_eq!(info.len(), 1);
    }

    #[test]
    fn info_accepts_free_form_keys() {
        let mut info = DocumentInfo::new();
        info.set("Department", "Accounts");
        info.set(DocumentInfo::TITLE, "Report");
        let keys: Vec<_> = info.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["Department", "Title"]);
        assert_eq!(info.title(), Some("Report"));
        assert_eq!(info.subject(), None);
    }

    #[test]
    fn new_document_is_created_and_empty() {
        let doc = Document::new("out.pdf");
        assert_eq!(doc.origin(), &DocumentOrigin::Created);
        assert_eq!(doc.page_count(), 0);
        assert!(doc.info().is_empty());
        assert!(doc.base().is_none());
        assert_eq!(doc.path(), Path::new("out.pdf"));
    }

    #[test]
    fn recovered_document_records_reason() {
        let doc = Document::recovered("broken.pdf", "invalid file header");
        assert_eq!(
            doc.origin(),
            &DocumentOrigin::Recovered {
                reason: "invalid file header".to_string()
            }
        );
        assert!(!doc.is_loaded());
        assert_eq!(doc.page_count(), 0);
    }

    #[test]
    fn loaded_document_keeps_pages_and_bytes() {
        let doc = Document::loaded(
            "in.pdf",
            b"%PDF-1.7".to_vec(),
            vec![Page::existing(612.0, 792.0, 1)],
            DocumentInfo::new(),
            vec![Outline {
                title: "Intro".into(),
                page_index: 0,
            }],
        );
        assert!(doc.is_loaded());
        assert_eq!(doc.page_count(), 1);
        assert_eq!(doc.base(), Some(&b"%PDF-1.7"[..]));
        assert_eq!(doc.outlines()[0].title, "Intro");
    }

    #[test]
    fn push_page_returns_index() {
        let mut doc = Document::new("out.pdf");
        assert_eq!(doc.push_page(Page::new(100.0, 100.0)), 0);
        assert_eq!(doc.push_page(Page::new(200.0, 100.0)), 1);
        assert_eq!(doc.page_mut(1).map(|p| p.width()), Some(200.0));
        assert!(doc.page_mut(2).is_none());
    }
}
