//! The pending drawable shape and the paint operations applied to it.

use crate::geometry::{BBox, Point};

/// The single shape awaiting `fill`, `stroke` or `clip`.
///
/// Each path-defining call replaces the pending shape wholesale; segments
/// are never accumulated into a polyline.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Shape {
    /// Axis-aligned rectangle with corner `(x, y)`.
    Rect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    },
    /// A single straight segment.
    Line { from: Point, to: Point },
}

impl Shape {
    pub fn rect(x: f64, y: f64, width: f64, height: f64) -> Self {
        Shape::Rect {
            x,
            y,
            width,
            height,
        }
    }

    pub fn line(from: Point, to: Point) -> Self {
        Shape::Line { from, to }
    }

    /// Bounding box of the shape in user space.
    pub fn bbox(&self) -> BBox {
        match *self {
            Shape::Rect {
                x,
                y,
                width,
                height,
            } => BBox::from_rect(x, y, width, height),
            Shape::Line { from, to } => BBox::new(
                from.x.min(to.x),
                from.y.min(to.y),
                from.x.max(to.x),
                from.y.max(to.y),
            ),
        }
    }

    /// The rectangle's region, or `None` for shapes that enclose no area.
    pub fn as_region(&self) -> Option<BBox> {
        match self {
            Shape::Rect { .. } => Some(self.bbox()),
            Shape::Line { .. } => None,
        }
    }

    /// Short name used in error messages and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Shape::Rect { .. } => "rect",
            Shape::Line { .. } => "line",
        }
    }
}

/// How a shape was painted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PaintMode {
    Fill,
    Stroke,
}

/// The clipping region in device space (user space after translation).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ClipRegion {
    /// No clip has been set; the whole page is paintable.
    #[default]
    Unbounded,
    /// Painting is limited to this rectangle.
    Rect(BBox),
    /// Successive clips left no area; nothing is paintable.
    Empty,
}

impl ClipRegion {
    /// Intersect the region with `rect`.
    pub fn intersect(&self, rect: BBox) -> ClipRegion {
        match self {
            ClipRegion::Unbounded => ClipRegion::Rect(rect),
            ClipRegion::Rect(current) => match current.intersection(&rect) {
                Some(overlap) => ClipRegion::Rect(overlap),
                None => ClipRegion::Empty,
            },
            ClipRegion::Empty => ClipRegion::Empty,
        }
    }

    /// The part of `area` that survives this clip.
    ///
    /// Degenerate areas (a horizontal or vertical line) survive when they lie
    /// on or inside the clip rectangle.
    pub fn clip(&self, area: BBox) -> Option<BBox> {
        match self {
            ClipRegion::Unbounded => Some(area),
            ClipRegion::Rect(rect) if area.width() == 0.0 || area.height() == 0.0 => {
                closed_overlap(rect, &area)
            }
            ClipRegion::Rect(rect) => rect.intersection(&area),
            ClipRegion::Empty => None,
        }
    }
}

fn closed_overlap(a: &BBox, b: &BBox) -> Option<BBox> {
    let overlap = BBox::new(a.x0.max(b.x0), a.y0.max(b.y0), a.x1.min(b.x1), a.y1.min(b.y1));
    (overlap.x0 <= overlap.x1 && overlap.y0 <= overlap.y1).then_some(overlap)
}

/// A recorded fill or stroke.
///
/// `shape` is in user space as the caller specified it. `offset` is the
/// translation in effect when it was painted and `clip` the device-space
/// clip region at that moment.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PaintOp {
    pub shape: Shape,
    pub mode: PaintMode,
    pub gray: f64,
    pub offset: Point,
    pub clip: ClipRegion,
}

impl PaintOp {
    /// Bounding box of the painted shape in device space.
    pub fn device_bbox(&self) -> BBox {
        self.shape.bbox().translate(self.offset.x, self.offset.y)
    }

    /// Device-space area actually marked on the page, or `None` when the
    /// clip suppresses the whole operation.
    pub fn visible_region(&self) -> Option<BBox> {
        self.clip.clip(self.device_bbox())
    }
}
