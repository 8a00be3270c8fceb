//! Points and axis-aligned boxes in PDF user space.
//!
//! Coordinates follow the PDF convention: origin at the bottom-left corner of
//! the page, y growing upwards, units in points (1/72 inch).

/// A point in user space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Offset the point by `(dx, dy)`.
    pub fn translate(&self, dx: f64, dy: f64) -> Point {
        Point::new(self.x + dx, self.y + dy)
    }
}

/// Axis-aligned box with bottom-left origin.
///
/// - `x0`: left edge
/// - `y0`: bottom edge
/// - `x1`: right edge
/// - `y1`: top edge
///
/// Boxes built through [`BBox::from_rect`] are always normalized so that
/// `x0 <= x1` and `y0 <= y1`, even for negative widths or heights.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BBox {
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,
}

impl BBox {
    pub fn new(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        Self { x0, y0, x1, y1 }
    }

    /// Box covering `[x, x + width] × [y, y + height]`.
    pub fn from_rect(x: f64, y: f64, width: f64, height: f64) -> Self {
        let (x0, x1) = ordered(x, x + width);
        let (y0, y1) = ordered(y, y + height);
        Self { x0, y0, x1, y1 }
    }

    /// Width of the box.
    pub fn width(&self) -> f64 {
        self.x1 - self.x0
    }

    /// Height of the box.
    pub fn height(&self) -> f64 {
        self.y1 - self.y0
    }

    /// Offset the box by `(dx, dy)`.
    pub fn translate(&self, dx: f64, dy: f64) -> BBox {
        BBox::new(self.x0 + dx, self.y0 + dy, self.x1 + dx, self.y1 + dy)
    }

    /// Compute the union of two bounding boxes.
    pub fn union(&self, other: &BBox) -> BBox {
        BBox {
            x0: self.x0.min(other.x0),
            y0: self.y0.min(other.y0),
            x1: self.x1.max(other.x1),
            y1: self.y1.max(other.y1),
        }
    }

    /// Overlap of two boxes, or `None` when they do not share any area.
    ///
    /// Boxes that only touch along an edge have no area in common.
    pub fn intersection(&self, other: &BBox) -> Option<BBox> {
        let x0 = self.x0.max(other.x0);
        let y0 = self.y0.max(other.y0);
        let x1 = self.x1.min(other.x1);
        let y1 = self.y1.min(other.y1);
        if x0 < x1 && y0 < y1 {
            Some(BBox { x0, y0, x1, y1 })
        } else {
            None
        }
    }

    /// Whether `point` lies inside the box, edges included.
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x0 && point.x <= self.x1 && point.y >= self.y0 && point.y <= self.y1
    }
}

fn ordered(a: f64, b: f64) -> (f64, f64) {
    if a <= b { (a, b) } else { (b, a) }
}
