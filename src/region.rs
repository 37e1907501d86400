//! Regions: sets of disjoint rectangles
//!
//! A [`Region`] describes non-contiguous screen area, such as the part of the
//! screen touched by a set of window updates. Its rects never overlap, so the
//! region's area is simply the sum of its rects' areas.
//!
//! Union re-tiles as needed: the rect decomposition of a region is not
//! canonical, and two regions compare equal when they cover the same pixels.
//!
//! ## Example
//!
//! ```
//! use transformed_screen::{Rect, Region};
//!
//! let a = Region::from_rect(Rect::new(0, 0, 10, 10));
//! let b = Region::from_rect(Rect::new(5, 5, 10, 10));
//! let both = a.union(&b);
//!
//! assert_eq!(both.area(), 100 + 100 - 25);
//! assert_eq!(both.union(&b), both);
//! ```

use alloc::vec::Vec;

use crate::geometry::{Point, Rect};

/// Set of disjoint, non-empty rects
#[derive(Clone, Debug, Default)]
pub struct Region {
    rects: Vec<Rect>,
}

impl Region {
    /// Create an empty region
    pub const fn new() -> Self {
        Self { rects: Vec::new() }
    }

    /// Create a region covering a single rect
    ///
    /// An empty rect yields an empty region.
    pub fn from_rect(rect: Rect) -> Self {
        let mut region = Self::new();
        region.add_rect(rect);
        region
    }

    /// The rects making up the region
    pub fn rects(&self) -> &[Rect] {
        &self.rects
    }

    /// Whether the region covers no pixels
    pub fn is_empty(&self) -> bool {
        self.rects.is_empty()
    }

    /// Total number of pixels covered
    pub fn area(&self) -> u64 {
        self.rects.iter().map(Rect::area).sum()
    }

    /// Smallest rect containing the whole region
    pub fn bounding_rect(&self) -> Rect {
        self.rects
            .iter()
            .copied()
            .reduce(|acc, r| {
                Rect::from_coords(
                    acc.left.min(r.left),
                    acc.top.min(r.top),
                    acc.right.max(r.right),
                    acc.bottom.max(r.bottom),
                )
            })
            .unwrap_or(Rect::EMPTY)
    }

    /// Whether the point lies in the region
    pub fn contains(&self, p: Point) -> bool {
        self.rects.iter().any(|r| r.contains(p))
    }

    /// Add the pixels of `rect` to the region in place
    ///
    /// Empty rects are ignored. Rects with swapped edges count as empty; map
    /// them through [`Rect::normalized`] first if that is not intended.
    pub fn add_rect(&mut self, rect: Rect) {
        if rect.is_empty() {
            return;
        }
        let mut pending = alloc::vec![rect];
        for existing in &self.rects {
            if pending.is_empty() {
                return;
            }
            pending = pending
                .iter()
                .flat_map(|piece| piece.subtract(existing))
                .collect();
        }
        self.rects.extend(pending);
    }

    /// Union of two regions
    pub fn union(&self, other: &Self) -> Self {
        let mut out = self.clone();
        for r in &other.rects {
            out.add_rect(*r);
        }
        out
    }

    /// Part of the region inside `clip`
    pub fn intersected(&self, clip: &Rect) -> Self {
        Self {
            rects: self
                .rects
                .iter()
                .map(|r| r.intersection(clip))
                .filter(|r| !r.is_empty())
                .collect(),
        }
    }

    /// Part of the region not covered by `other`
    pub fn subtracted(&self, other: &Self) -> Self {
        let mut rects = self.rects.clone();
        for cut in &other.rects {
            rects = rects.iter().flat_map(|r| r.subtract(cut)).collect();
        }
        Self { rects }
    }

    /// Region moved by `(dx, dy)`
    ///
    /// Rects pushed against the edge of the coordinate range are clamped and
    /// re-tiled.
    pub fn translated(&self, dx: i32, dy: i32) -> Self {
        self.rects.iter().map(|r| r.translated(dx, dy)).collect()
    }
}

impl From<Rect> for Region {
    fn from(rect: Rect) -> Self {
        Self::from_rect(rect)
    }
}

impl FromIterator<Rect> for Region {
    fn from_iter<T: IntoIterator<Item = Rect>>(iter: T) -> Self {
        let mut region = Self::new();
        for r in iter {
            region.add_rect(r);
        }
        region
    }
}

impl PartialEq for Region {
    fn eq(&self, other: &Self) -> bool {
        self.area() == other.area() && self.subtracted(other).is_empty()
    }
}

impl Eq for Region {}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_disjoint(region: &Region) {
        let rects = region.rects();
        for (i, a) in rects.iter().enumerate() {
            assert!(!a.is_empty());
            for b in &rects[i + 1..] {
                assert!(!a.intersects(b), "{a:?} overlaps {b:?}");
            }
        }
    }

    #[test]
    fn test_empty_rect_gives_empty_region() {
        assert!(Region::from_rect(Rect::EMPTY).is_empty());
        assert_eq!(Region::new().area(), 0);
        assert_eq!(Region::new().bounding_rect(), Rect::EMPTY);
    }

    #[test]
    fn test_union_overlapping_counts_overlap_once() {
        let a = Region::from_rect(Rect::new(0, 0, 10, 10));
        let b = Region::from_rect(Rect::new(5, 5, 10, 10));
        let u = a.union(&b);
        assert_eq!(u.area(), 175);
        assert_disjoint(&u);
        assert_eq!(u.bounding_rect(), Rect::new(0, 0, 15, 15));
    }

    #[test]
    fn test_union_is_idempotent() {
        let a: Region = [Rect::new(0, 0, 4, 4), Rect::new(10, 0, 4, 4)]
            .into_iter()
            .collect();
        let twice = a.union(&a);
        assert_eq!(twice, a);
        assert_eq!(twice.area(), 32);
    }

    #[test]
    fn test_union_is_commutative_by_coverage() {
        let a = Region::from_rect(Rect::new(0, 0, 6, 3));
        let b = Region::from_rect(Rect::new(2, 1, 6, 6));
        assert_eq!(a.union(&b), b.union(&a));
    }

    #[test]
    fn test_contains() {
        let r: Region = [Rect::new(0, 0, 2, 2), Rect::new(5, 5, 1, 1)]
            .into_iter()
            .collect();
        assert!(r.contains(Point::new(1, 1)));
        assert!(r.contains(Point::new(5, 5)));
        assert!(!r.contains(Point::new(3, 3)));
    }

    #[test]
    fn test_intersected_clips_rects() {
        let r: Region = [Rect::new(0, 0, 10, 10), Rect::new(20, 0, 10, 10)]
            .into_iter()
            .collect();
        let clipped = r.intersected(&Rect::new(5, 0, 20, 5));
        assert_eq!(clipped.area(), 5 * 5 + 5 * 5);
        assert_disjoint(&clipped);
    }

    #[test]
    fn test_subtracted() {
        let a = Region::from_rect(Rect::new(0, 0, 10, 10));
        let hole = Region::from_rect(Rect::new(2, 2, 2, 2));
        let rest = a.subtracted(&hole);
        assert_eq!(rest.area(), 96);
        assert!(!rest.contains(Point::new(2, 2)));
        assert!(a.subtracted(&a).is_empty());
    }

    #[test]
    fn test_equality_ignores_tiling() {
        let whole = Region::from_rect(Rect::new(0, 0, 4, 2));
        let halves: Region = [Rect::new(0, 0, 2, 2), Rect::new(2, 0, 2, 2)]
            .into_iter()
            .collect();
        assert_eq!(whole, halves);
        assert_ne!(whole, Region::from_rect(Rect::new(0, 0, 4, 1)));
    }

    #[test]
    fn test_translated() {
        let r = Region::from_rect(Rect::new(0, 0, 2, 2)).translated(3, 4);
        assert_eq!(r.bounding_rect(), Rect::new(3, 4, 2, 2));
    }
}
