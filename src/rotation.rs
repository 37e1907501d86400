//! Coordinate mapping between logical and device space
//!
//! The logical screen is what clients draw on; the device screen is the
//! framebuffer as laid out in memory. A [`Rotation`] is the clockwise
//! transform from the first to the second.
//!
//! Every mapping takes a reference `size`: the extent of the space the input
//! lives in. Going to the device that is the logical size, coming back it is
//! the device size. Mapping a point there and back with the wrong size is a
//! caller error for 90 and 270 degrees, not something detected here.
//!
//! Mapping is total: results that fall outside the `i32` range are clamped
//! to it.
//!
//! ## Point Formulas
//!
//! With `(w, h)` the reference size:
//!
//! | Rotation | To device            | From device          |
//! |----------|----------------------|----------------------|
//! | None     | `(x, y)`             | `(x, y)`             |
//! | Rot90    | `(y, w-x-1)`         | `(h-y-1, x)`         |
//! | Rot180   | `(w-x-1, h-y-1)`     | `(w-x-1, h-y-1)`     |
//! | Rot270   | `(h-y-1, x)`         | `(y, w-x-1)`         |
//!
//! ## Example
//!
//! ```
//! use transformed_screen::{CoordinateMapper, Point, Rotation, Size};
//!
//! let mapper = CoordinateMapper::new(Rotation::Rot90);
//! let logical = Size::new(100, 200);
//!
//! assert_eq!(mapper.map_size_to_device(logical), Size::new(200, 100));
//! let device = mapper.map_point_to_device(Point::new(10, 5), logical);
//! assert_eq!(device, Point::new(5, 89));
//!
//! // Coming back uses the device extent
//! let back = mapper.map_point_from_device(device, Size::new(200, 100));
//! assert_eq!(back, Point::new(10, 5));
//! ```

use crate::config::Rotation;
use crate::geometry::{Point, Rect, Size, saturate};
use crate::region::Region;

/// Maps geometry between logical and device space for one rotation
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CoordinateMapper {
    rotation: Rotation,
}

impl CoordinateMapper {
    /// Create a mapper for `rotation`
    pub const fn new(rotation: Rotation) -> Self {
        Self { rotation }
    }

    /// The rotation this mapper applies
    pub const fn rotation(&self) -> Rotation {
        self.rotation
    }

    /// Device extent of a logical extent
    pub const fn map_size_to_device(&self, size: Size) -> Size {
        if self.rotation.swaps_axes() {
            size.transposed()
        } else {
            size
        }
    }

    /// Logical extent of a device extent
    pub const fn map_size_from_device(&self, size: Size) -> Size {
        self.map_size_to_device(size)
    }

    /// Device position of a logical point; `size` is the logical extent
    pub const fn map_point_to_device(&self, p: Point, size: Size) -> Point {
        let (w, h) = (size.width, size.height);
        match self.rotation {
            Rotation::None => p,
            Rotation::Rot90 => Point::new(p.y, mirror(w, p.x)),
            Rotation::Rot180 => Point::new(mirror(w, p.x), mirror(h, p.y)),
            Rotation::Rot270 => Point::new(mirror(h, p.y), p.x),
        }
    }

    /// Logical position of a device point; `size` is the device extent
    pub const fn map_point_from_device(&self, p: Point, size: Size) -> Point {
        let (w, h) = (size.width, size.height);
        match self.rotation {
            Rotation::None => p,
            Rotation::Rot90 => Point::new(mirror(h, p.y), p.x),
            Rotation::Rot180 => Point::new(mirror(w, p.x), mirror(h, p.y)),
            Rotation::Rot270 => Point::new(p.y, mirror(w, p.x)),
        }
    }

    /// Device rect of a logical rect
    ///
    /// Maps the top-left and bottom-right corners and normalizes. An empty
    /// rect maps to [`Rect::EMPTY`].
    pub fn map_rect_to_device(&self, r: Rect, size: Size) -> Rect {
        if r.is_empty() {
            return Rect::EMPTY;
        }
        Rect::from_corners(
            self.map_point_to_device(r.top_left(), size),
            self.map_point_to_device(r.bottom_right(), size),
        )
    }

    /// Logical rect of a device rect
    pub fn map_rect_from_device(&self, r: Rect, size: Size) -> Rect {
        if r.is_empty() {
            return Rect::EMPTY;
        }
        Rect::from_corners(
            self.map_point_from_device(r.top_left(), size),
            self.map_point_from_device(r.bottom_right(), size),
        )
    }

    /// Device region of a logical region
    pub fn map_region_to_device(&self, region: &Region, size: Size) -> Region {
        if self.rotation == Rotation::None {
            return region.clone();
        }
        region
            .rects()
            .iter()
            .map(|r| self.map_rect_to_device(*r, size))
            .collect()
    }

    /// Logical region of a device region
    pub fn map_region_from_device(&self, region: &Region, size: Size) -> Region {
        if self.rotation == Rotation::None {
            return region.clone();
        }
        region
            .rects()
            .iter()
            .map(|r| self.map_rect_from_device(*r, size))
            .collect()
    }
}

/// `extent - v - 1`, the coordinate `v` reflected across an axis of
/// `extent` pixels
const fn mirror(extent: u32, v: i32) -> i32 {
    saturate(extent as i64 - v as i64 - 1)
}
