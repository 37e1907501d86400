//! Points, sizes and rectangles
//!
//! All coordinates are signed pixels. Rectangles use **inclusive** edges:
//! a rect with `left == right` is one pixel wide. A rect whose right edge is
//! left of its left edge (or bottom above top) is empty.
//!
//! ## Example
//!
//! ```
//! use transformed_screen::{Point, Rect};
//!
//! let r = Rect::new(10, 20, 30, 40);
//! assert_eq!(r.right, 39);
//! assert_eq!(r.bottom, 59);
//! assert_eq!(r.top_right(), Point::new(39, 20));
//! assert_eq!(r.area(), 30 * 40);
//! ```

/// A pixel position
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Point {
    /// Column
    pub x: i32,
    /// Row
    pub y: i32,
}

impl Point {
    /// Create a new point
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// A width/height extent in pixels
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Size {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

impl Size {
    /// Create a new size
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Size with width and height exchanged
    pub const fn transposed(self) -> Self {
        Self {
            width: self.height,
            height: self.width,
        }
    }
}

/// Clamp a wide coordinate into `i32`
pub(crate) const fn saturate(v: i64) -> i32 {
    if v > i32::MAX as i64 {
        i32::MAX
    } else if v < i32::MIN as i64 {
        i32::MIN
    } else {
        v as i32
    }
}

/// Inclusive far edge of a span of `extent` pixels starting at `start`
const fn far_edge(start: i32, extent: u32) -> i32 {
    saturate(start as i64 + extent as i64 - 1)
}

/// Pixel count between two inclusive edges, saturating at `u32::MAX`
const fn span(first: i32, last: i32) -> u32 {
    if last < first {
        return 0;
    }
    let n = last as i64 - first as i64 + 1;
    if n > u32::MAX as i64 {
        u32::MAX
    } else {
        n as u32
    }
}

/// Axis-aligned rectangle with inclusive edges
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Rect {
    /// Leftmost column
    pub left: i32,
    /// Topmost row
    pub top: i32,
    /// Rightmost column (inclusive)
    pub right: i32,
    /// Bottom row (inclusive)
    pub bottom: i32,
}

impl Default for Rect {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl Rect {
    /// The canonical empty rect
    pub const EMPTY: Self = Self {
        left: 0,
        top: 0,
        right: -1,
        bottom: -1,
    };

    /// Create a rect from its top-left corner and extent
    ///
    /// A zero extent gives [`Rect::EMPTY`]. Edges past the coordinate range
    /// are clamped to it.
    pub const fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        if width == 0 || height == 0 {
            return Self::EMPTY;
        }
        Self {
            left: x,
            top: y,
            right: far_edge(x, width),
            bottom: far_edge(y, height),
        }
    }

    /// Create a rect from an origin and a [`Size`]
    pub const fn with_size(origin: Point, size: Size) -> Self {
        Self::new(origin.x, origin.y, size.width, size.height)
    }

    /// Create a rect from two corners, as given (not normalized)
    pub const fn from_coords(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Create a normalized rect spanning two arbitrary corner points
    pub fn from_corners(a: Point, b: Point) -> Self {
        Self::from_coords(a.x, a.y, b.x, b.y).normalized()
    }

    /// Reorder the edges so that `left <= right` and `top <= bottom`
    ///
    /// Rotation can swap the order of a rect's edges; every mapped rect passes
    /// through here.
    pub fn normalized(self) -> Self {
        Self {
            left: self.left.min(self.right),
            top: self.top.min(self.bottom),
            right: self.left.max(self.right),
            bottom: self.top.max(self.bottom),
        }
    }

    /// Whether the rect covers no pixels
    pub const fn is_empty(&self) -> bool {
        self.right < self.left || self.bottom < self.top
    }

    /// Width in pixels (0 for empty rects)
    pub const fn width(&self) -> u32 {
        span(self.left, self.right)
    }

    /// Height in pixels (0 for empty rects)
    pub const fn height(&self) -> u32 {
        span(self.top, self.bottom)
    }

    /// Extent of the rect
    pub const fn size(&self) -> Size {
        Size::new(self.width(), self.height())
    }

    /// Number of pixels covered
    pub const fn area(&self) -> u64 {
        self.width() as u64 * self.height() as u64
    }

    /// Top-left corner
    pub const fn top_left(&self) -> Point {
        Point::new(self.left, self.top)
    }

    /// Top-right corner
    pub const fn top_right(&self) -> Point {
        Point::new(self.right, self.top)
    }

    /// Bottom-left corner
    pub const fn bottom_left(&self) -> Point {
        Point::new(self.left, self.bottom)
    }

    /// Bottom-right corner
    pub const fn bottom_right(&self) -> Point {
        Point::new(self.right, self.bottom)
    }

    /// Whether the point lies inside the rect
    pub const fn contains(&self, p: Point) -> bool {
        p.x >= self.left && p.x <= self.right && p.y >= self.top && p.y <= self.bottom
    }

    /// Whether two rects share at least one pixel
    pub const fn intersects(&self, other: &Self) -> bool {
        !self.is_empty()
            && !other.is_empty()
            && self.left <= other.right
            && other.left <= self.right
            && self.top <= other.bottom
            && other.top <= self.bottom
    }

    /// Overlap of two rects, [`Rect::EMPTY`] when disjoint
    pub fn intersection(&self, other: &Self) -> Self {
        if !self.intersects(other) {
            return Self::EMPTY;
        }
        Self {
            left: self.left.max(other.left),
            top: self.top.max(other.top),
            right: self.right.min(other.right),
            bottom: self.bottom.min(other.bottom),
        }
    }

    /// Rect moved by `(dx, dy)`, edges clamped to the coordinate range
    pub const fn translated(&self, dx: i32, dy: i32) -> Self {
        Self {
            left: self.left.saturating_add(dx),
            top: self.top.saturating_add(dy),
            right: self.right.saturating_add(dx),
            bottom: self.bottom.saturating_add(dy),
        }
    }

    /// Split `self` into the parts not covered by `other`
    ///
    /// Yields at most four disjoint rects: full-width bands above and below the
    /// overlap, then the slivers left and right of it.
    pub(crate) fn subtract(&self, other: &Self) -> impl Iterator<Item = Self> {
        let overlap = self.intersection(other);
        let pieces: [Self; 4] = if overlap.is_empty() {
            [*self, Self::EMPTY, Self::EMPTY, Self::EMPTY]
        } else {
            // A band exists only when the overlap stops short of that edge,
            // so the +1/-1 below never leave the coordinate range.
            let above = if overlap.top > self.top {
                Self::from_coords(self.left, self.top, self.right, overlap.top - 1)
            } else {
                Self::EMPTY
            };
            let below = if overlap.bottom < self.bottom {
                Self::from_coords(self.left, overlap.bottom + 1, self.right, self.bottom)
            } else {
                Self::EMPTY
            };
            let left = if overlap.left > self.left {
                Self::from_coords(self.left, overlap.top, overlap.left - 1, overlap.bottom)
            } else {
                Self::EMPTY
            };
            let right = if overlap.right < self.right {
                Self::from_coords(overlap.right + 1, overlap.top, self.right, overlap.bottom)
            } else {
                Self::EMPTY
            };
            [above, below, left, right]
        };
        pieces.into_iter().filter(|r| !r.is_empty())
    }
}

#[cfg(feature = "graphics")]
impl From<embedded_graphics_core::geometry::Point> for Point {
    fn from(p: embedded_graphics_core::geometry::Point) -> Self {
        Self::new(p.x, p.y)
    }
}

#[cfg(feature = "graphics")]
impl From<Point> for embedded_graphics_core::geometry::Point {
    fn from(p: Point) -> Self {
        Self::new(p.x, p.y)
    }
}

#[cfg(feature = "graphics")]
impl From<embedded_graphics_core::geometry::Size> for Size {
    fn from(s: embedded_graphics_core::geometry::Size) -> Self {
        Self::new(s.width, s.height)
    }
}

#[cfg(feature = "graphics")]
impl From<Size> for embedded_graphics_core::geometry::Size {
    fn from(s: Size) -> Self {
        Self::new(s.width, s.height)
    }
}

#[cfg(feature = "graphics")]
impl From<embedded_graphics_core::primitives::Rectangle> for Rect {
    fn from(r: embedded_graphics_core::primitives::Rectangle) -> Self {
        Self::with_size(r.top_left.into(), r.size.into())
    }
}
