//! The procedural drawing API.
//!
//! A [`Session`] owns one [`Document`] and walks it through
//! `open → begin_page … end_page → close`. Every call reports misuse
//! (no open page, no font, no pending path, unbalanced restore, use after
//! close) as an error and leaves the state untouched.

use std::path::{Path, PathBuf};

use crate::backend::{Collaborators, ImageLoader, PdfBackend};
use crate::document::{Document, DocumentInfo, Outline};
use crate::error::PdfError;
use crate::font::FontRegistry;
use crate::geometry::{BBox, Point};
use crate::graphics_state::{ActiveFont, GraphicsState};
use crate::image::{ImageId, ImageKind};
use crate::options::SessionOptions;
use crate::page::{ContentOp, Page};
use crate::shape::{PaintMode, PaintOp, Shape};
use crate::text::TextBox;

/// Where a session is in the document lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Open with no active page.
    Ready,
    /// A page is accepting operations; the value is its index.
    Page(usize),
    /// Saved; no further operations are accepted.
    Closed,
}

/// A document being authored.
pub struct Session {
    doc: Document,
    state: GraphicsState,
    phase: Phase,
    fonts: FontRegistry,
    backend: Box<dyn PdfBackend>,
    images: Box<dyn ImageLoader>,
    options: SessionOptions,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("path", &self.doc.path())
            .field("phase", &self.phase)
            .field("pages", &self.doc.page_count())
            .finish_non_exhaustive()
    }
}

impl Session {
    /// Open the document at `path`.
    ///
    /// An existing file is loaded through the backend. If it cannot be
    /// parsed, the session starts from an empty document whose origin is
    /// [`DocumentOrigin::Recovered`](crate::DocumentOrigin::Recovered). A
    /// missing file yields an empty [`DocumentOrigin::Created`](crate::DocumentOrigin::Created)
    /// document. Either way the file is written on [`close`](Self::close).
    pub fn open(path: impl Into<PathBuf>, collaborators: Collaborators, options: SessionOptions) -> Self {
        let path = path.into();
        let Collaborators {
            backend,
            metrics,
            images,
        } = collaborators;

        let doc = if path.exists() {
            match backend.load(&path) {
                Ok(doc) => {
                    tracing::debug!(path = %path.display(), pages = doc.page_count(), "loaded document");
                    doc
                }
                Err(err) => {
                    tracing::warn!(
                        path = %path.display(),
                        error = %err,
                        "could not load existing document, starting empty"
                    );
                    Document::recovered(path, err.to_string())
                }
            }
        } else {
            tracing::debug!(path = %path.display(), "creating new document");
            Document::new(path)
        };

        Self {
            doc,
            state: GraphicsState::new(),
            phase: Phase::Ready,
            fonts: FontRegistry::new(metrics),
            backend,
            images,
            options,
        }
    }

    // --- accessors ---

    pub fn document(&self) -> &Document {
        &self.doc
    }

    pub fn into_document(self) -> Document {
        self.doc
    }

    pub fn state(&self) -> &GraphicsState {
        &self.state
    }

    pub fn options(&self) -> &SessionOptions {
        &self.options
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn path(&self) -> &Path {
        self.doc.path()
    }

    /// The page currently accepting operations.
    pub fn active_page(&self) -> Option<&Page> {
        match self.phase {
            Phase::Page(index) => self.doc.pages().get(index),
            _ => None,
        }
    }

    fn ensure_open(&self) -> Result<(), PdfError> {
        match self.phase {
            Phase::Closed => Err(PdfError::InvalidState("document is closed".into())),
            _ => Ok(()),
        }
    }

    fn page_index(&self) -> Result<usize, PdfError> {
        match self.phase {
            Phase::Page(index) => Ok(index),
            Phase::Ready => Err(PdfError::no_page()),
            Phase::Closed => Err(PdfError::InvalidState("document is closed".into())),
        }
    }

    fn emit(&mut self, index: usize, op: ContentOp) {
        if let Some(page) = self.doc.page_mut(index) {
            page.push(op);
        }
    }

    fn require_font(&self) -> Result<ActiveFont, PdfError> {
        self.state
            .font()
            .cloned()
            .ok_or_else(|| PdfError::InvalidState("no font is set; call set_font first".into()))
    }

    // --- lifecycle ---

    /// Append a page of `width` × `height` points and make it active.
    ///
    /// # Errors
    ///
    /// [`PdfError::InvalidState`] if a page is already active (call
    /// [`end_page`](Self::end_page) first) or the document is closed;
    /// [`PdfError::InvalidArgument`] unless both sides are positive.
    pub fn begin_page(&mut self, width: f64, height: f64) -> Result<(), PdfError> {
        self.ensure_open()?;
        if let Phase::Page(index) = self.phase {
            return Err(PdfError::InvalidState(format!(
                "page {} is still open; call end_page first",
                index + 1
            )));
        }
        if !(width > 0.0 && width.is_finite() && height > 0.0 && height.is_finite()) {
            return Err(PdfError::InvalidArgument(format!(
                "page size must be positive, got {width} x {height}"
            )));
        }

        self.state.reset_page();
        let index = self.doc.push_page(Page::new(width, height));
        self.phase = Phase::Page(index);
        if let Some(font) = self.state.font().cloned() {
            self.emit(
                index,
                ContentOp::SetFont {
                    font: font.handle.font(),
                    size: font.size,
                },
            );
        }
        tracing::debug!(page = index + 1, width, height, "begin page");
        Ok(())
    }

    /// Finish the active page.
    ///
    /// Outstanding saves are balanced with restores. The pending path,
    /// current point, clip and translation are discarded; the font and text
    /// cursor carry over to the next page.
    pub fn end_page(&mut self) -> Result<(), PdfError> {
        let index = self.page_index()?;
        for _ in 0..self.state.stack_depth() {
            self.emit(index, ContentOp::RestoreState);
        }
        self.state.reset_page();
        self.phase = Phase::Ready;
        tracing::debug!(page = index + 1, "end page");
        Ok(())
    }

    /// End any active page and write the document to its path.
    ///
    /// # Errors
    ///
    /// [`PdfError::InvalidState`] if already closed. Backend failures are
    /// returned as-is and leave the session open, so `close` can be retried.
    pub fn close(&mut self) -> Result<(), PdfError> {
        self.ensure_open()?;
        if matches!(self.phase, Phase::Page(_)) {
            self.end_page()?;
        }
        self.backend.save(&self.doc, self.doc.path())?;
        self.phase = Phase::Closed;
        tracing::debug!(
            path = %self.doc.path().display(),
            pages = self.doc.page_count(),
            "closed document"
        );
        Ok(())
    }

    // --- document info and outlines ---

    /// Set a document info entry. The key is free-form.
    pub fn set_info(&mut self, key: &str, value: &str) -> Result<(), PdfError> {
        self.ensure_open()?;
        if key.is_empty() {
            return Err(PdfError::InvalidArgument("info key must not be empty".into()));
        }
        self.doc.info_mut().set(key, value);
        Ok(())
    }

    pub fn set_info_author(&mut self, author: &str) -> Result<(), PdfError> {
        self.set_info(DocumentInfo::AUTHOR, author)
    }

    pub fn set_info_creator(&mut self, creator: &str) -> Result<(), PdfError> {
        self.set_info(DocumentInfo::CREATOR, creator)
    }

    pub fn set_info_subject(&mut self, subject: &str) -> Result<(), PdfError> {
        self.set_info(DocumentInfo::SUBJECT, subject)
    }

    pub fn set_info_title(&mut self, title: &str) -> Result<(), PdfError> {
        self.set_info(DocumentInfo::TITLE, title)
    }

    pub fn set_info_keywords(&mut self, keywords: &str) -> Result<(), PdfError> {
        self.set_info(DocumentInfo::KEYWORDS, keywords)
    }

    /// Add an outline entry pointing at the active page.
    pub fn add_outline(&mut self, title: &str) -> Result<(), PdfError> {
        let page_index = self.page_index()?;
        self.doc.push_outline(Outline {
            title: title.to_string(),
            page_index,
        });
        Ok(())
    }

    // --- fonts and text ---

    /// Select a standard font by name.
    ///
    /// With no page open the font is remembered and applied when the next
    /// page begins. `encoding` is accepted for compatibility; text is always
    /// written as single-byte codes.
    ///
    /// # Errors
    ///
    /// [`PdfError::NotFound`] for unknown names, leaving the previous font
    /// active; [`PdfError::FontError`] if metrics cannot be loaded;
    /// [`PdfError::InvalidArgument`] unless `size` is positive.
    pub fn set_font(&mut self, name: &str, size: f64, encoding: &str) -> Result<(), PdfError> {
        self.ensure_open()?;
        let handle = self.fonts.load(name)?;
        if !(size > 0.0 && size.is_finite()) {
            return Err(PdfError::InvalidArgument(format!(
                "font size must be positive, got {size}"
            )));
        }
        tracing::debug!(font = handle.font().postscript_name(), size, encoding, "set font");
        let font = handle.font();
        self.state.set_font(ActiveFont { handle, size });
        if let Phase::Page(index) = self.phase {
            self.emit(index, ContentOp::SetFont { font, size });
        }
        Ok(())
    }

    /// Width of `text` in the active font and size.
    ///
    /// Each byte of `text` is measured as one character code.
    pub fn stringwidth(&self, text: &str) -> Result<f64, PdfError> {
        self.ensure_open()?;
        let font = self.require_font()?;
        Ok(font.handle.metrics().text_width(text.as_bytes(), font.size))
    }

    /// Move the text cursor.
    pub fn set_text_pos(&mut self, x: f64, y: f64) -> Result<(), PdfError> {
        self.ensure_open()?;
        self.state.set_text_cursor(Point::new(x, y));
        Ok(())
    }

    /// Draw `text` with its baseline origin at `(x, y)`, then move the text
    /// cursor there.
    pub fn show_xy(&mut self, text: &str, x: f64, y: f64) -> Result<(), PdfError> {
        let index = self.page_index()?;
        let font = self.require_font()?;
        self.emit(
            index,
            ContentOp::ShowText {
                font: font.handle.font(),
                size: font.size,
                x,
                y,
                text: text.to_string(),
                rendering: self.state.text_rendering(),
            },
        );
        self.state.set_text_cursor(Point::new(x, y));
        Ok(())
    }

    /// Draw `text` at the text cursor.
    pub fn show(&mut self, text: &str) -> Result<(), PdfError> {
        let cursor = self.state.text_cursor();
        self.show_xy(text, cursor.x, cursor.y)
    }

    /// Draw `text` one line height below the text cursor.
    pub fn continue_text(&mut self, text: &str) -> Result<(), PdfError> {
        let cursor = self.state.text_cursor();
        self.show_xy(text, cursor.x, cursor.y - self.options.line_height)
    }

    /// Word-wrap `text` into the box whose top-left corner is `(left, top)`.
    ///
    /// Returns the number of characters that did not fit. `mode` and
    /// `feature` are accepted but not applied; lines are left-aligned.
    #[allow(clippy::too_many_arguments)]
    pub fn show_boxed(
        &mut self,
        text: &str,
        left: f64,
        top: f64,
        width: f64,
        height: f64,
        mode: &str,
        feature: &str,
    ) -> Result<usize, PdfError> {
        self.page_index()?;
        let font = self.require_font()?;
        let layout = TextBox {
            left,
            top,
            width,
            height,
            font_size: font.size,
            leading: self.options.box_leading,
            average_char_width: self.options.average_char_width,
        }
        .layout(text);
        tracing::debug!(
            lines = layout.lines.len(),
            overflow = layout.overflow_chars,
            mode,
            feature,
            "show boxed"
        );
        for line in &layout.lines {
            self.show_xy(&line.text, line.x, line.y)?;
        }
        Ok(layout.overflow_chars)
    }

    /// Set the text rendering mode (0 fill … 7 clip) for later text.
    pub fn set_text_rendering(&mut self, mode: i32) -> Result<(), PdfError> {
        let index = self.page_index()?;
        let mode = self.state.set_text_rendering(mode)?;
        self.emit(index, ContentOp::SetTextRendering(mode));
        Ok(())
    }

    // --- color and transform ---

    /// Set the fill gray, clamped to `[0, 1]`.
    pub fn setgray_fill(&mut self, gray: f64) -> Result<(), PdfError> {
        let index = self.page_index()?;
        let gray = self.state.set_fill_gray(gray);
        self.emit(index, ContentOp::SetFillGray(gray));
        Ok(())
    }

    /// Move the origin of user space by `(tx, ty)`.
    pub fn translate(&mut self, tx: f64, ty: f64) -> Result<(), PdfError> {
        let index = self.page_index()?;
        self.state.translate(tx, ty);
        self.emit(index, ContentOp::Translate { tx, ty });
        Ok(())
    }

    /// Push the graphics state.
    pub fn save(&mut self) -> Result<(), PdfError> {
        let index = self.page_index()?;
        self.state.save();
        self.emit(index, ContentOp::SaveState);
        Ok(())
    }

    /// Pop the graphics state pushed by the matching [`save`](Self::save).
    pub fn restore(&mut self) -> Result<(), PdfError> {
        let index = self.page_index()?;
        if !self.state.restore() {
            return Err(PdfError::InvalidState("restore without a matching save".into()));
        }
        self.emit(index, ContentOp::RestoreState);
        Ok(())
    }

    // --- paths ---

    /// Make a rectangle the pending shape.
    pub fn rect(&mut self, x: f64, y: f64, width: f64, height: f64) -> Result<(), PdfError> {
        self.ensure_open()?;
        self.state.rect(x, y, width, height);
        Ok(())
    }

    /// Set the current point.
    pub fn moveto(&mut self, x: f64, y: f64) -> Result<(), PdfError> {
        self.ensure_open()?;
        self.state.move_to(Point::new(x, y));
        Ok(())
    }

    /// Make the segment from the current point to `(x, y)` the pending shape.
    pub fn lineto(&mut self, x: f64, y: f64) -> Result<(), PdfError> {
        self.ensure_open()?;
        self.state.line_to(Point::new(x, y))?;
        Ok(())
    }

    fn pending_shape(&self) -> Result<Shape, PdfError> {
        self.state
            .pending()
            .copied()
            .ok_or_else(|| PdfError::InvalidState("no pending path".into()))
    }

    fn paint(&mut self, mode: PaintMode) -> Result<(), PdfError> {
        let index = self.page_index()?;
        let shape = self.pending_shape()?;
        if mode == PaintMode::Fill && matches!(shape, Shape::Line { .. }) {
            return Err(PdfError::Unsupported("a line has no interior to fill".into()));
        }
        self.state.take_pending();
        self.emit(
            index,
            ContentOp::Paint(PaintOp {
                shape,
                mode,
                gray: self.state.fill_gray(),
                offset: self.state.offset(),
                clip: self.state.clip(),
            }),
        );
        Ok(())
    }

    /// Fill the pending rectangle with the current gray.
    ///
    /// A pending line is left in place and reported as unsupported.
    pub fn fill(&mut self) -> Result<(), PdfError> {
        self.paint(PaintMode::Fill)
    }

    /// Stroke the pending rectangle outline or segment.
    pub fn stroke(&mut self) -> Result<(), PdfError> {
        self.paint(PaintMode::Stroke)
    }

    /// Intersect the clip with the pending rectangle and consume it.
    pub fn clip(&mut self) -> Result<(), PdfError> {
        let index = self.page_index()?;
        let shape = self.pending_shape()?;
        let Some(rect) = shape.as_region() else {
            return Err(PdfError::Unsupported(format!(
                "cannot clip to a {}",
                shape.kind()
            )));
        };
        self.state.take_pending();
        let offset = self.state.offset();
        let device = self.state.intersect_clip(rect);
        tracing::debug!(?device, "clip");
        self.emit(index, ContentOp::Clip { rect, offset });
        Ok(())
    }

    // --- images ---

    /// Load an image file and register it with the document.
    ///
    /// `kind` is `jpeg`, `jpg` or `png`; anything else is
    /// [`PdfError::Unsupported`].
    pub fn load_image(&mut self, kind: &str, path: impl AsRef<Path>) -> Result<ImageId, PdfError> {
        self.ensure_open()?;
        let kind: ImageKind = kind.parse()?;
        let image = self.images.load(kind, path.as_ref())?;
        tracing::debug!(
            path = %path.as_ref().display(),
            %kind,
            width = image.pixel_width,
            height = image.pixel_height,
            "loaded image"
        );
        Ok(self.doc.push_image(image))
    }

    /// Draw a registered image with its lower-left corner at `(x, y)`, one
    /// pixel per `scale` points.
    pub fn place_image(&mut self, image: ImageId, x: f64, y: f64, scale: f64) -> Result<(), PdfError> {
        let index = self.page_index()?;
        let loaded = self
            .doc
            .image(image)
            .ok_or_else(|| PdfError::InvalidArgument(format!("unknown image {}", image.index())))?;
        if !(scale > 0.0 && scale.is_finite()) {
            return Err(PdfError::InvalidArgument(format!(
                "image scale must be positive, got {scale}"
            )));
        }
        let (width, height) = loaded.scaled_size(scale);
        let rect = BBox::from_rect(x, y, width, height);
        self.emit(index, ContentOp::DrawImage { image, rect });
        Ok(())
    }
}
