//! Rotated blits into the device framebuffer
//!
//! [`RotatingBlitter`] turns a logical-space blit into rotated copies into
//! device memory:
//!
//! 1. Pick the kernel for the rotation, framebuffer format and source format.
//!    Without one the blit is skipped before any lock is taken.
//! 2. Grab the display lock for the rest of the operation.
//! 3. Add the previous blit's region to the requested one. With two panels
//!    this repaints what the other panel is missing.
//! 4. Clip against the logical screen and the image's footprint.
//! 5. For each clipped rect (the first only, unless [`RectPolicy::All`]),
//!    map its anchor corner to device space and run the kernel there.
//!    Every copy is bounds-checked before the first one is made.
//! 6. Remember the requested region, then show the panel just written. The
//!    panel is flipped even when clipping left nothing to copy.
//!
//! ## Anchor Corners
//!
//! The kernel writes the block's first source pixel at the destination
//! offset it is given. That pixel is the rect's top-left in logical space,
//! but after rotation the copy's top-left in memory comes from another
//! corner:
//!
//! | Rotation | Anchor corner |
//! |----------|---------------|
//! | Rot90    | top-right     |
//! | Rot180   | bottom-right  |
//! | Rot270   | bottom-left   |

use alloc::vec::Vec;

use log::{debug, error, trace};

use crate::config::{PanelGeometry, RectPolicy, Rotation};
use crate::dispatch::{BlitTable, FramebufferFormat};
use crate::error::Error;
use crate::geometry::{Point, Rect};
use crate::image::Image;
use crate::interface::{DisplayLock, NoPageFlip, PageFlip, ScreenBackend};
use crate::memrotate;
use crate::region::Region;
use crate::state::TransformationState;

/// What a blit did
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BlitOutcome {
    /// No rotation: handed to the backend unchanged
    PassThrough,
    /// No kernel for this framebuffer and source format; nothing was written
    Unsupported,
    /// Rotated copy made; carries the logical area written
    Copied(Region),
}

/// Panel toggling for double-buffered output
#[derive(Debug)]
pub struct PageFlipper<P: PageFlip> {
    device: P,
    geometry: PanelGeometry,
    current: u32,
}

impl<P: PageFlip> PageFlipper<P> {
    /// Start writing to panel 0
    pub fn new(device: P, geometry: PanelGeometry) -> Self {
        Self {
            device,
            geometry,
            current: 0,
        }
    }

    /// Panel the next copy goes to
    pub fn current(&self) -> u32 {
        self.current
    }

    /// Panel layout
    pub fn geometry(&self) -> PanelGeometry {
        self.geometry
    }

    /// The control device
    pub fn device(&self) -> &P {
        &self.device
    }

    /// Show the panel just written and move on to the next one
    fn flip(&mut self) -> Result<(), Error<P>> {
        let rows = self.current * self.geometry.rows_per_panel;
        self.current = (self.current + 1) % self.geometry.panel_count;
        self.device.set_y_offset(rows).map_err(|e| {
            error!("Page flip to row {rows} failed: {e:?}");
            Error::PageFlip(e)
        })
    }
}

/// Corner of `rect` whose device position is the copy's first byte
fn anchor(rotation: Rotation, rect: &Rect) -> Point {
    match rotation {
        Rotation::None => rect.top_left(),
        Rotation::Rot90 => rect.top_right(),
        Rotation::Rot180 => rect.bottom_right(),
        Rotation::Rot270 => rect.bottom_left(),
    }
}

/// Rotated blit engine
///
/// Holds the state that must survive between blits: the previous blit's
/// region, the kernel table for the current framebuffer format and the
/// panel toggle.
#[derive(Debug)]
pub struct RotatingBlitter<P: PageFlip = NoPageFlip> {
    table: BlitTable,
    rect_policy: RectPolicy,
    dirty: Region,
    flipper: Option<PageFlipper<P>>,
}

impl<P: PageFlip> RotatingBlitter<P> {
    /// Create a blitter for a framebuffer of the given format
    pub fn new(format: FramebufferFormat, rect_policy: RectPolicy) -> Self {
        Self {
            table: BlitTable::new(format),
            rect_policy,
            dirty: Region::new(),
            flipper: None,
        }
    }

    /// Create a blitter that alternates between panels after every copy
    pub fn with_page_flip(
        format: FramebufferFormat,
        rect_policy: RectPolicy,
        flipper: PageFlipper<P>,
    ) -> Self {
        Self {
            flipper: Some(flipper),
            ..Self::new(format, rect_policy)
        }
    }

    /// Take over the previous blit's region from `other`
    pub(crate) fn inherit_dirty<Q: PageFlip>(&mut self, other: RotatingBlitter<Q>) {
        self.dirty = other.dirty;
    }

    /// Rebuild the kernel table after a framebuffer format change
    pub fn reload_format(&mut self, format: FramebufferFormat) {
        self.table = BlitTable::new(format);
    }

    /// Kernel table in use
    pub fn table(&self) -> &BlitTable {
        &self.table
    }

    /// Region of the previous rotated blit
    pub fn dirty(&self) -> &Region {
        &self.dirty
    }

    /// Rect processing policy
    pub fn rect_policy(&self) -> RectPolicy {
        self.rect_policy
    }

    /// Change the rect processing policy
    pub fn set_rect_policy(&mut self, policy: RectPolicy) {
        self.rect_policy = policy;
    }

    /// Panel toggle, if page flipping is enabled
    pub fn flipper(&self) -> Option<&PageFlipper<P>> {
        self.flipper.as_ref()
    }

    /// Copy `image`, placed at logical `origin`, into the framebuffer over
    /// `region`
    ///
    /// # Errors
    ///
    /// Returns `Error::FramebufferTooSmall` if a copy would run past the
    /// framebuffer, and `Error::PageFlip` if the panel could not be shown.
    pub fn blit<B, L>(
        &mut self,
        backend: &mut B,
        lock: &L,
        state: &TransformationState,
        image: &Image<'_>,
        origin: Point,
        region: &Region,
    ) -> Result<BlitOutcome, Error<P>>
    where
        B: ScreenBackend,
        L: DisplayLock,
    {
        let rotation = state.rotation();
        if rotation == Rotation::None {
            backend.blit(image, origin, region);
            return Ok(BlitOutcome::PassThrough);
        }

        let Some(copy) = self.table.lookup(rotation, image.format()) else {
            debug!(
                "No rotated blit from {:?} to {}bpp, skipped",
                image.format(),
                self.table.format().depth
            );
            return Ok(BlitOutcome::Unsupported);
        };

        let _guard = lock.grab();

        let logical = state.logical_size();
        let bound = Rect::with_size(Point::new(0, 0), logical).intersection(&image.rect_at(origin));
        let clipped = region.union(&self.dirty).intersected(&bound);
        let rects: &[Rect] = match self.rect_policy {
            RectPolicy::FirstOnly => clipped.rects().get(..1).unwrap_or(&[]),
            RectPolicy::All => clipped.rects(),
        };

        let linestep = backend.linestep();
        let panel_offset = self
            .flipper
            .as_ref()
            .map_or(0, |f| f.geometry.byte_offset(f.current, linestep));
        let mapper = state.mapper();
        let src = image.data();
        let fb = backend.framebuffer_mut();

        let mut copies = Vec::with_capacity(rects.len());
        for r in rects {
            let (width, height) = (r.width() as usize, r.height() as usize);
            let src_at = image.offset(r.left.abs_diff(origin.x), r.top.abs_diff(origin.y));
            let src_len = memrotate::source_len(width, height, image.bytes_per_line(), copy.src_bpp);

            let at = mapper.map_point_to_device(anchor(rotation, r), logical);
            let dst_at = panel_offset + at.y as usize * linestep + at.x as usize * copy.dst_bpp;
            let required =
                dst_at + memrotate::destination_len(rotation, width, height, linestep, copy.dst_bpp);
            if required > fb.len() {
                error!("Rotated copy needs {required} framebuffer bytes, have {}", fb.len());
                return Err(Error::FramebufferTooSmall {
                    required,
                    provided: fb.len(),
                });
            }
            copies.push((*r, src_at..src_at + src_len, dst_at..required, at));
        }

        for (r, src_range, dst_range, at) in &copies {
            trace!("Rotated copy {}x{} to device ({}, {})", r.width(), r.height(), at.x, at.y);
            (copy.func)(
                &src[src_range.clone()],
                r.width() as usize,
                r.height() as usize,
                image.bytes_per_line(),
                &mut fb[dst_range.clone()],
                linestep,
            );
        }

        self.dirty = region.clone();

        if let Some(flipper) = self.flipper.as_mut() {
            flipper.flip()?;
        }

        Ok(BlitOutcome::Copied(copies.into_iter().map(|(r, ..)| r).collect()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Size;
    use crate::image::SourceFormat;
    use crate::testing::{CountingLock, FailingFlip, MockBackend, RecordingFlip, pattern};

    fn state(rotation: Rotation, backend: &MockBackend) -> TransformationState {
        TransformationState::new(rotation, backend.size, backend.physical)
    }

    fn blitter<P: PageFlip>(backend: &MockBackend, policy: RectPolicy) -> RotatingBlitter<P> {
        RotatingBlitter::new(backend.format, policy)
    }

    #[test]
    fn test_anchor_corners() {
        let r = Rect::new(1, 2, 3, 4);
        assert_eq!(anchor(Rotation::Rot90, &r), Point::new(3, 2));
        assert_eq!(anchor(Rotation::Rot180, &r), Point::new(3, 5));
        assert_eq!(anchor(Rotation::Rot270, &r), Point::new(1, 5));
    }

    #[test]
    fn test_full_screen_lands_on_mapped_pixels() {
        for rotation in [Rotation::Rot90, Rotation::Rot180, Rotation::Rot270] {
            let mut backend = MockBackend::new(Size::new(6, 4), 32);
            let lock = CountingLock::new();
            let state = state(rotation, &backend);
            let logical = state.logical_size();
            let data = pattern(logical);
            let image = Image::packed(&data, logical.width, logical.height, SourceFormat::Rgb32)
                .unwrap();
            let region = Region::from_rect(Rect::with_size(Point::new(0, 0), logical));

            let mut blitter = blitter::<NoPageFlip>(&backend, RectPolicy::FirstOnly);
            let outcome = blitter
                .blit(&mut backend, &lock, &state, &image, Point::new(0, 0), &region)
                .unwrap();
            assert_eq!(outcome, BlitOutcome::Copied(region.clone()));

            for y in 0..logical.height as i32 {
                for x in 0..logical.width as i32 {
                    let d = state.mapper().map_point_to_device(Point::new(x, y), logical);
                    let expected = 0xFF00_0000 | (y as u32) << 8 | x as u32;
                    assert_eq!(backend.pixel(d.x, d.y), expected, "{rotation:?} ({x}, {y})");
                }
            }
        }
    }

    #[test]
    fn test_partial_rect_touches_only_its_pixels() {
        let mut backend = MockBackend::new(Size::new(2, 4), 32);
        let lock = CountingLock::new();
        let state = state(Rotation::Rot90, &backend);
        let logical = state.logical_size();
        assert_eq!(logical, Size::new(4, 2));
        let data = pattern(logical);
        let image = Image::packed(&data, 4, 2, SourceFormat::Rgb32).unwrap();
        let rect = Rect::new(1, 0, 2, 2);

        let mut blitter = blitter::<NoPageFlip>(&backend, RectPolicy::FirstOnly);
        blitter
            .blit(&mut backend, &lock, &state, &image, Point::new(0, 0), &rect.into())
            .unwrap();

        for y in 0..2 {
            for x in 0..4 {
                let d = state.mapper().map_point_to_device(Point::new(x, y), logical);
                let p = backend.pixel(d.x, d.y);
                if rect.contains(Point::new(x, y)) {
                    assert_eq!(p, 0xFF00_0000 | (y as u32) << 8 | x as u32);
                } else {
                    assert_eq!(p, 0);
                }
            }
        }
    }

    #[test]
    fn test_origin_offsets_source() {
        let mut backend = MockBackend::new(Size::new(8, 8), 32);
        let lock = CountingLock::new();
        let state = state(Rotation::Rot180, &backend);
        let data = pattern(Size::new(2, 2));
        let image = Image::packed(&data, 2, 2, SourceFormat::Rgb32).unwrap();
        let origin = Point::new(3, 4);

        let mut blitter = blitter::<NoPageFlip>(&backend, RectPolicy::FirstOnly);
        let outcome = blitter
            .blit(&mut backend, &lock, &state, &image, origin, &Rect::new(0, 0, 8, 8).into())
            .unwrap();
        assert_eq!(outcome, BlitOutcome::Copied(Rect::new(3, 4, 2, 2).into()));
        // Image pixel (0, 0) sits at logical (3, 4), device (4, 3).
        assert_eq!(backend.pixel(4, 3), 0xFF00_0000);
        assert_eq!(backend.pixel(3, 2), 0xFF00_0101);
    }

    #[test]
    fn test_dirty_region_carried_into_next_blit() {
        let mut backend = MockBackend::new(Size::new(8, 8), 32);
        let lock = CountingLock::new();
        let state = state(Rotation::Rot270, &backend);
        let data = pattern(Size::new(8, 8));
        let image = Image::packed(&data, 8, 8, SourceFormat::Rgb32).unwrap();
        let a = Rect::new(0, 0, 2, 2);
        let b = Rect::new(4, 4, 2, 2);

        let mut blitter = blitter::<NoPageFlip>(&backend, RectPolicy::All);
        blitter
            .blit(&mut backend, &lock, &state, &image, Point::new(0, 0), &a.into())
            .unwrap();
        assert_eq!(blitter.dirty(), &Region::from_rect(a));

        let outcome = blitter
            .blit(&mut backend, &lock, &state, &image, Point::new(0, 0), &b.into())
            .unwrap();
        let both: Region = [a, b].into_iter().collect();
        assert_eq!(outcome, BlitOutcome::Copied(both));
        assert_eq!(blitter.dirty(), &Region::from_rect(b));
    }

    #[test]
    fn test_first_only_policy_copies_one_rect() {
        let mut backend = MockBackend::new(Size::new(8, 8), 32);
        let lock = CountingLock::new();
        let state = state(Rotation::Rot90, &backend);
        let data = pattern(Size::new(8, 8));
        let image = Image::packed(&data, 8, 8, SourceFormat::Rgb32).unwrap();
        let region: Region = [Rect::new(0, 0, 2, 2), Rect::new(4, 4, 2, 2)]
            .into_iter()
            .collect();

        let mut blitter = blitter::<NoPageFlip>(&backend, RectPolicy::FirstOnly);
        let outcome = blitter
            .blit(&mut backend, &lock, &state, &image, Point::new(0, 0), &region)
            .unwrap();
        let copied = match outcome {
            BlitOutcome::Copied(copied) => copied,
            _ => Region::new(),
        };
        assert_eq!(copied.area(), 4);
        assert_eq!(blitter.dirty(), &region);
    }

    #[test]
    fn test_unsupported_depth_writes_nothing() {
        let mut backend = MockBackend::new(Size::new(4, 4), 0);
        let lock = CountingLock::new();
        let state = state(Rotation::Rot90, &backend);
        let data = pattern(Size::new(4, 4));
        let image = Image::packed(&data, 4, 4, SourceFormat::Rgb32).unwrap();

        let mut blitter = blitter::<NoPageFlip>(&backend, RectPolicy::FirstOnly);
        let outcome = blitter
            .blit(&mut backend, &lock, &state, &image, Point::new(0, 0), &Rect::new(0, 0, 4, 4).into())
            .unwrap();
        assert_eq!(outcome, BlitOutcome::Unsupported);
        assert_eq!(lock.grabs(), 0);
        assert_eq!(backend.framebuffer_accesses, 0);
        assert!(blitter.dirty().is_empty());
    }

    #[test]
    fn test_no_rotation_passes_through() {
        let mut backend = MockBackend::new(Size::new(4, 4), 16);
        let lock = CountingLock::new();
        let state = state(Rotation::None, &backend);
        let data = [0u8; 4 * 4 * 2];
        let image = Image::packed(&data, 4, 4, SourceFormat::Rgb16).unwrap();
        let region = Region::from_rect(Rect::new(1, 1, 2, 2));

        let mut blitter = blitter::<NoPageFlip>(&backend, RectPolicy::FirstOnly);
        let outcome = blitter
            .blit(&mut backend, &lock, &state, &image, Point::new(0, 0), &region)
            .unwrap();
        assert_eq!(outcome, BlitOutcome::PassThrough);
        assert_eq!(backend.blits, [(Point::new(0, 0), region)]);
        assert_eq!(lock.grabs(), 0);
    }

    #[test]
    fn test_lock_held_for_writes_and_released() {
        let lock = CountingLock::new();
        let mut backend = MockBackend::new(Size::new(4, 4), 32).watching(&lock);
        let state = state(Rotation::Rot180, &backend);
        let data = pattern(Size::new(4, 4));
        let image = Image::packed(&data, 4, 4, SourceFormat::Rgb32).unwrap();

        let mut blitter = blitter::<NoPageFlip>(&backend, RectPolicy::FirstOnly);
        blitter
            .blit(&mut backend, &lock, &state, &image, Point::new(0, 0), &Rect::new(0, 0, 4, 4).into())
            .unwrap();
        assert_eq!(lock.grabs(), 1);
        assert!(!lock.is_held());
        assert!(backend.framebuffer_accesses > 0);
        assert_eq!(backend.unlocked_accesses, 0);
    }

    #[test]
    fn test_framebuffer_too_small() {
        let lock = CountingLock::new();
        let mut backend = MockBackend::new(Size::new(4, 4), 32);
        backend.fb.truncate(20);
        let state = state(Rotation::Rot90, &backend);
        let data = pattern(Size::new(4, 4));
        let image = Image::packed(&data, 4, 4, SourceFormat::Rgb32).unwrap();

        let mut blitter = blitter::<NoPageFlip>(&backend, RectPolicy::FirstOnly);
        let result =
            blitter.blit(&mut backend, &lock, &state, &image, Point::new(0, 0), &Rect::new(0, 0, 4, 4).into());
        assert!(matches!(
            result,
            Err(Error::FramebufferTooSmall {
                required: 64,
                provided: 20
            })
        ));
        assert!(!lock.is_held());
    }

    #[test]
    fn test_page_flip_alternates_panels() {
        let lock = CountingLock::new();
        let mut backend = MockBackend::new(Size::new(4, 4), 32).with_panels(2);
        let state = state(Rotation::Rot90, &backend);
        let data = pattern(Size::new(4, 4));
        let image = Image::packed(&data, 4, 4, SourceFormat::Rgb32).unwrap();
        let geometry = PanelGeometry::new(4, 2).unwrap();
        let flipper = PageFlipper::new(RecordingFlip::default(), geometry);
        let mut blitter =
            RotatingBlitter::with_page_flip(backend.format, RectPolicy::FirstOnly, flipper);
        let region = Region::from_rect(Rect::new(0, 0, 4, 4));

        for _ in 0..3 {
            blitter
                .blit(&mut backend, &lock, &state, &image, Point::new(0, 0), &region)
                .unwrap();
        }
        let flipper = blitter.flipper().unwrap();
        assert_eq!(flipper.device().offsets, [0, 4, 0]);
        assert_eq!(flipper.current(), 1);

        // Second panel received the same rotated content as the first.
        let half = backend.fb.len() / 2;
        assert_eq!(backend.fb[..half], backend.fb[half..]);
    }

    #[test]
    fn test_page_flip_failure_is_reported() {
        let lock = CountingLock::new();
        let mut backend = MockBackend::new(Size::new(4, 4), 32).with_panels(2);
        let state = state(Rotation::Rot270, &backend);
        let data = pattern(Size::new(4, 4));
        let image = Image::packed(&data, 4, 4, SourceFormat::Rgb32).unwrap();
        let geometry = PanelGeometry::new(4, 2).unwrap();
        let mut blitter = RotatingBlitter::with_page_flip(
            backend.format,
            RectPolicy::FirstOnly,
            PageFlipper::new(FailingFlip, geometry),
        );

        let result =
            blitter.blit(&mut backend, &lock, &state, &image, Point::new(0, 0), &Rect::new(0, 0, 4, 4).into());
        assert!(matches!(result, Err(Error::PageFlip("mode set rejected"))));
        assert!(!lock.is_held());
    }

    #[test]
    fn test_far_origin_clips_to_nothing() {
        let lock = CountingLock::new();
        let mut backend = MockBackend::new(Size::new(8, 8), 32);
        let state = state(Rotation::Rot90, &backend);
        let data = pattern(Size::new(4, 4));
        let image = Image::packed(&data, 4, 4, SourceFormat::Rgb32).unwrap();
        let region = Region::from_rect(Rect::new(0, 0, 8, 8));

        let mut blitter = blitter::<NoPageFlip>(&backend, RectPolicy::All);
        for origin in [Point::new(i32::MAX - 1, 0), Point::new(0, i32::MIN)] {
            let outcome = blitter
                .blit(&mut backend, &lock, &state, &image, origin, &region)
                .unwrap();
            assert_eq!(outcome, BlitOutcome::Copied(Region::new()));
        }
        assert!(backend.fb.iter().all(|&b| b == 0));
        assert!(!lock.is_held());
    }

    #[test]
    fn test_short_framebuffer_writes_nothing() {
        let lock = CountingLock::new();
        let mut backend = MockBackend::new(Size::new(4, 4), 32);
        backend.fb.truncate(32);
        let state = state(Rotation::Rot180, &backend);
        let data = pattern(Size::new(4, 4));
        let image = Image::packed(&data, 4, 4, SourceFormat::Rgb32).unwrap();
        // The bottom row lands at the top of the framebuffer and fits; the
        // top row lands past the end.
        let region: Region = [Rect::new(0, 3, 4, 1), Rect::new(0, 0, 4, 1)]
            .into_iter()
            .collect();

        let mut blitter = blitter::<NoPageFlip>(&backend, RectPolicy::All);
        let result = blitter.blit(&mut backend, &lock, &state, &image, Point::new(0, 0), &region);
        assert!(matches!(
            result,
            Err(Error::FramebufferTooSmall { provided: 32, .. })
        ));
        assert!(backend.fb.iter().all(|&b| b == 0));
        assert!(blitter.dirty().is_empty());
        assert!(!lock.is_held());
    }

    #[test]
    fn test_page_flip_after_empty_copy() {
        let lock = CountingLock::new();
        let mut backend = MockBackend::new(Size::new(4, 4), 32).with_panels(2);
        let state = state(Rotation::Rot90, &backend);
        let data = pattern(Size::new(4, 4));
        let image = Image::packed(&data, 4, 4, SourceFormat::Rgb32).unwrap();
        let geometry = PanelGeometry::new(4, 2).unwrap();
        let flipper = PageFlipper::new(RecordingFlip::default(), geometry);
        let mut blitter =
            RotatingBlitter::with_page_flip(backend.format, RectPolicy::FirstOnly, flipper);

        let offscreen = Region::from_rect(Rect::new(100, 100, 2, 2));
        let outcome = blitter
            .blit(&mut backend, &lock, &state, &image, Point::new(0, 0), &offscreen)
            .unwrap();
        assert_eq!(outcome, BlitOutcome::Copied(Region::new()));

        let flipper = blitter.flipper().unwrap();
        assert_eq!(flipper.device().offsets, [0]);
        assert_eq!(flipper.current(), 1);
    }

    #[test]
    fn test_reload_format() {
        let backend = MockBackend::new(Size::new(4, 4), 0);
        let mut blitter = blitter::<NoPageFlip>(&backend, RectPolicy::FirstOnly);
        assert!(blitter.table().lookup(Rotation::Rot90, SourceFormat::Rgb32).is_none());
        blitter.reload_format(FramebufferFormat::rgb(16));
        assert!(blitter.table().lookup(Rotation::Rot90, SourceFormat::Rgb32).is_some());
    }
}
