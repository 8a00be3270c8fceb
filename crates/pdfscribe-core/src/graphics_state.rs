//! Drawing state tracked between calls.
//!
//! Mirrors the parts of the PDF graphics state the session needs to answer
//! questions locally: the current point and pending shape for path calls,
//! the fill gray, font, rendering mode, translation and clip for painting,
//! plus the save/restore stack driven by `q`/`Q`.

use crate::error::PdfError;
use crate::font::FontHandle;
use crate::geometry::{BBox, Point};
use crate::shape::{ClipRegion, Shape};

/// The font selected by `set_font` together with its size.
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveFont {
    pub handle: FontHandle,
    pub size: f64,
}

/// A snapshot pushed by [`GraphicsState::save`].
#[derive(Debug, Clone, PartialEq)]
struct SavedState {
    fill_gray: f64,
    font: Option<ActiveFont>,
    text_rendering: u8,
    offset: Point,
    clip: ClipRegion,
}

/// Graphics and text state of the active page.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GraphicsState {
    current_point: Option<Point>,
    pending: Option<Shape>,
    fill_gray: f64,
    font: Option<ActiveFont>,
    text_cursor: Point,
    text_rendering: u8,
    /// Accumulated translation from user to device space.
    offset: Point,
    /// Clip region in device space.
    clip: ClipRegion,
    stack: Vec<SavedState>,
}

impl GraphicsState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current_point(&self) -> Option<Point> {
        self.current_point
    }

    pub fn pending(&self) -> Option<&Shape> {
        self.pending.as_ref()
    }

    pub fn fill_gray(&self) -> f64 {
        self.fill_gray
    }

    pub fn font(&self) -> Option<&ActiveFont> {
        self.font.as_ref()
    }

    pub fn text_cursor(&self) -> Point {
        self.text_cursor
    }

    pub fn text_rendering(&self) -> u8 {
        self.text_rendering
    }

    pub fn offset(&self) -> Point {
        self.offset
    }

    pub fn clip(&self) -> ClipRegion {
        self.clip
    }

    /// Returns the current stack depth.
    pub fn stack_depth(&self) -> usize {
        self.stack.len()
    }

    // --- path construction ---

    /// Set the current point. The pending shape is left alone.
    pub fn move_to(&mut self, point: Point) {
        self.current_point = Some(point);
    }

    /// Replace the pending shape with a segment from the current point to
    /// `to`, then make `to` the current point.
    ///
    /// # Errors
    ///
    /// Returns [`PdfError::InvalidState`] if there is no current point.
    pub fn line_to(&mut self, to: Point) -> Result<Shape, PdfError> {
        let from = self.current_point.ok_or_else(|| {
            PdfError::InvalidState("lineto requires a current point; call moveto first".into())
        })?;
        let shape = Shape::line(from, to);
        self.pending = Some(shape);
        self.current_point = Some(to);
        Ok(shape)
    }

    /// Replace the pending shape with a rectangle.
    pub fn rect(&mut self, x: f64, y: f64, width: f64, height: f64) -> Shape {
        let shape = Shape::rect(x, y, width, height);
        self.pending = Some(shape);
        shape
    }

    /// Remove the pending shape and clear the current point.
    pub fn take_pending(&mut self) -> Option<Shape> {
        self.current_point = None;
        self.pending.take()
    }

    // --- color, text, transform ---

    /// Set the fill gray, clamped to `[0, 1]`. Returns the stored value.
    pub fn set_fill_gray(&mut self, gray: f64) -> f64 {
        self.fill_gray = if gray.is_nan() { 0.0 } else { gray.clamp(0.0, 1.0) };
        self.fill_gray
    }

    pub fn set_font(&mut self, font: ActiveFont) {
        self.font = Some(font);
    }

    pub fn set_text_cursor(&mut self, point: Point) {
        self.text_cursor = point;
    }

    /// Set the PDF text rendering mode (`Tr` operand).
    ///
    /// # Errors
    ///
    /// Returns [`PdfError::Unsupported`] for modes outside `0..=7`.
    pub fn set_text_rendering(&mut self, mode: i32) -> Result<u8, PdfError> {
        let mode = u8::try_from(mode)
            .ok()
            .filter(|m| *m <= 7)
            .ok_or_else(|| PdfError::Unsupported(format!("text rendering mode {mode}")))?;
        self.text_rendering = mode;
        Ok(mode)
    }

    /// Shift the origin of user space by `(tx, ty)`.
    pub fn translate(&mut self, tx: f64, ty: f64) {
        self.offset = self.offset.translate(tx, ty);
    }

    /// Intersect the clip with `rect`, given in user space. Returns the
    /// rectangle in device space.
    pub fn intersect_clip(&mut self, rect: BBox) -> BBox {
        let device = rect.translate(self.offset.x, self.offset.y);
        self.clip = self.clip.intersect(device);
        device
    }

    // --- save / restore ---

    /// Push the fill gray, font, rendering mode, translation and clip.
    pub fn save(&mut self) {
        self.stack.push(SavedState {
            fill_gray: self.fill_gray,
            font: self.font.clone(),
            text_rendering: self.text_rendering,
            offset: self.offset,
            clip: self.clip,
        });
    }

    /// Pop the most recent snapshot and apply it.
    ///
    /// Returns `false` and changes nothing if the stack is empty.
    pub fn restore(&mut self) -> bool {
        match self.stack.pop() {
            Some(saved) => {
                self.fill_gray = saved.fill_gray;
                self.font = saved.font;
                self.text_rendering = saved.text_rendering;
                self.offset = saved.offset;
                self.clip = saved.clip;
                true
            }
            None => false,
        }
    }

    /// Reset for a new page. The font and text cursor survive.
    pub fn reset_page(&mut self) {
        let font = self.font.take();
        let text_cursor = self.text_cursor;
        *self = Self {
            font,
            text_cursor,
            ..Self::default()
        };
    }
}
