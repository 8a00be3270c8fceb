//! Pages and the content operations recorded on them.

use crate::font::StandardFont;
use crate::geometry::{BBox, Point};
use crate::image::ImageId;
use crate::shape::{PaintMode, PaintOp};

/// One recorded content-stream operation.
///
/// Operations are stored in user space exactly as the caller issued them;
/// the writer replays them in order, so `Translate` and the save/restore
/// pairs carry their usual PDF meaning.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ContentOp {
    /// `q`
    SaveState,
    /// `Q`
    RestoreState,
    /// `g`
    SetFillGray(f64),
    /// `1 0 0 1 tx ty cm`
    Translate { tx: f64, ty: f64 },
    SetFont { font: StandardFont, size: f64 },
    /// `Tr`
    SetTextRendering(u8),
    /// A filled or stroked shape.
    Paint(PaintOp),
    /// Rectangle clip in user space; `offset` is the translation in effect.
    Clip { rect: BBox, offset: Point },
    /// A run of single-byte text with its baseline origin at `(x, y)`.
    ShowText {
        font: StandardFont,
        size: f64,
        x: f64,
        y: f64,
        text: String,
        rendering: u8,
    },
    /// An image drawn into `rect` (user space).
    DrawImage { image: ImageId, rect: BBox },
}

impl ContentOp {
    /// Device-space rectangle of a `Clip`, or `None` for other operations.
    pub fn clip_region(&self) -> Option<BBox> {
        match self {
            ContentOp::Clip { rect, offset } => Some(rect.translate(offset.x, offset.y)),
            _ => None,
        }
    }
}

/// Where a page's content comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PageSource {
    /// Created in this session; content is `Page::ops`.
    New,
    /// Carried over from a loaded file. `index` is the 1-based page number in
    /// that file; its content is written back untouched.
    Existing { index: u32 },
}

/// A single page.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Page {
    width: f64,
    height: f64,
    ops: Vec<ContentOp>,
    source: PageSource,
}

impl Page {
    /// Create an empty page of the given size in points.
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            ops: Vec::new(),
            source: PageSource::New,
        }
    }

    /// A page carried over from an existing file.
    pub fn existing(width: f64, height: f64, index: u32) -> Self {
        Self {
            width,
            height,
            ops: Vec::new(),
            source: PageSource::Existing { index },
        }
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    /// The page's media box with origin at the bottom-left corner.
    pub fn bbox(&self) -> BBox {
        BBox::new(0.0, 0.0, self.width, self.height)
    }

    pub fn source(&self) -> PageSource {
        self.source
    }

    /// Recorded operations in emission order.
    pub fn ops(&self) -> &[ContentOp] {
        &self.ops
    }

    pub(crate) fn push(&mut self, op: ContentOp) {
        self.ops.push(op);
    }

    /// All paint operations in order.
    pub fn paints(&self) -> impl Iterator<Item = &PaintOp> {
        self.ops.iter().filter_map(|op| match op {
            ContentOp::Paint(paint) => Some(paint),
            _ => None,
        })
    }

    /// Paint operations that filled a shape.
    pub fn fills(&self) -> impl Iterator<Item = &PaintOp> {
        self.paints().filter(|paint| paint.mode == PaintMode::Fill)
    }

    /// Device-space area marked by each paint operation after clipping.
    ///
    /// Operations fully suppressed by the clip are omitted.
    pub fn visible_regions(&self) -> Vec<BBox> {
        self.paints().filter_map(PaintOp::visible_region).collect()
    }

    /// Concatenated text of every `ShowText` operation, one run per line.
    pub fn text(&self) -> String {
        self.ops
            .iter()
            .filter_map(|op| match op {
                ContentOp::ShowText { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}
