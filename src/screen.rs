//! The rotated screen
//!
//! [`TransformedScreen`] is what the window system talks to. It owns the
//! pass-through backend, the display lock, the current transformation and
//! the blitter, and presents everything in logical coordinates.
//!
//! With [`Rotation::None`] every operation is handed to the backend as is.
//!
//! ## Example
//!
//! ```
//! use transformed_screen::{
//!     Builder, Color, FramebufferFormat, Image, Point, Rect, Region, Rotation, ScreenBackend,
//!     Size, SourceFormat, TransformedScreen,
//! };
//!
//! struct Framebuffer {
//!     mem: Vec<u8>,
//! }
//!
//! impl ScreenBackend for Framebuffer {
//!     fn device_size(&self) -> Size { Size::new(320, 240) }
//!     fn physical_size(&self) -> Size { Size::new(64, 48) }
//!     fn format(&self) -> FramebufferFormat { FramebufferFormat::rgb(16) }
//!     fn linestep(&self) -> usize { 640 }
//!     fn framebuffer_mut(&mut self) -> &mut [u8] { &mut self.mem }
//!     fn blit(&mut self, _: &Image<'_>, _: Point, _: &Region) {}
//!     fn solid_fill(&mut self, _: Color, _: &Region) {}
//!     fn expose_region(&mut self, _: &Region, _: i32) {}
//!     fn set_dirty(&mut self, _: Rect) {}
//!     fn region(&self) -> Region { Rect::new(0, 0, 320, 240).into() }
//! }
//!
//! let config = match Builder::new().rotation(Rotation::Rot90).build() {
//!     Ok(config) => config,
//!     Err(_) => return,
//! };
//! let backend = Framebuffer { mem: vec![0; 640 * 240] };
//! let mut screen = TransformedScreen::new(backend, spin::Mutex::new(()), config);
//! assert_eq!(screen.size(), Size::new(240, 320));
//!
//! let pixels = vec![0u8; 240 * 320 * 2];
//! let image = match Image::packed(&pixels, 240, 320, SourceFormat::Rgb16) {
//!     Ok(image) => image,
//!     Err(_) => return,
//! };
//! let result = screen.blit(&image, Point::new(0, 0), &Rect::new(0, 0, 240, 320).into());
//! assert!(result.is_ok());
//! ```

use log::debug;

use crate::blit::{BlitOutcome, PageFlipper, RotatingBlitter};
use crate::color::Color;
use crate::config::{Config, PanelGeometry, Rotation};
use crate::error::{BuilderError, Error};
use crate::geometry::{Point, Rect, Size};
use crate::image::Image;
use crate::interface::{DisplayLock, NoPageFlip, PageFlip, ScreenBackend};
use crate::region::Region;
use crate::state::TransformationState;

/// A screen rotated in software on top of an unrotated framebuffer
///
/// # Type Parameters
///
/// * `B` - Pass-through screen implementing [`ScreenBackend`]
/// * `L` - Display lock implementing [`DisplayLock`]
/// * `P` - Page flip device implementing [`PageFlip`], [`NoPageFlip`] for
///   single-panel output
pub struct TransformedScreen<B, L, P = NoPageFlip>
where
    B: ScreenBackend,
    L: DisplayLock,
    P: PageFlip,
{
    backend: B,
    lock: L,
    state: TransformationState,
    blitter: RotatingBlitter<P>,
    panels: Option<PanelGeometry>,
}

impl<B, L> TransformedScreen<B, L>
where
    B: ScreenBackend,
    L: DisplayLock,
{
    /// Create a single-panel screen
    pub fn new(backend: B, lock: L, config: Config) -> Self {
        let state = TransformationState::new(
            config.rotation,
            backend.device_size(),
            backend.physical_size(),
        );
        let blitter = RotatingBlitter::new(backend.format(), config.rect_policy);
        debug!(
            "Transformed screen on {}x{} device",
            state.device_size().width,
            state.device_size().height
        );
        if let Some(panels) = config.panels {
            debug!(
                "{} panels configured without a page flip device, writing panel 0 only",
                panels.panel_count
            );
        }
        Self {
            backend,
            lock,
            state,
            blitter,
            panels: config.panels,
        }
    }

    /// Switch to double-buffered output using `device` to flip panels
    ///
    /// # Errors
    ///
    /// Returns `BuilderError::MissingPanelGeometry` if the configuration had
    /// no panel geometry.
    pub fn with_page_flip<P: PageFlip>(
        self,
        device: P,
    ) -> Result<TransformedScreen<B, L, P>, BuilderError> {
        let geometry = self.panels.ok_or(BuilderError::MissingPanelGeometry)?;
        let mut blitter = RotatingBlitter::with_page_flip(
            self.backend.format(),
            self.blitter.rect_policy(),
            PageFlipper::new(device, geometry),
        );
        blitter.inherit_dirty(self.blitter);
        debug!(
            "Page flipping across {} panels of {} rows",
            geometry.panel_count, geometry.rows_per_panel
        );
        Ok(TransformedScreen {
            backend: self.backend,
            lock: self.lock,
            state: self.state,
            blitter,
            panels: self.panels,
        })
    }
}

impl<B, L, P> TransformedScreen<B, L, P>
where
    B: ScreenBackend,
    L: DisplayLock,
    P: PageFlip,
{
    /// Current rotation
    pub fn transformation(&self) -> Rotation {
        self.state.rotation()
    }

    /// Change the rotation and recompute the logical extents
    pub fn set_transformation(&mut self, rotation: Rotation) {
        self.state.set_transformation(rotation);
    }

    /// Rotation as its ordinal code, 0 to 3
    pub fn transform_orientation(&self) -> u8 {
        self.state.rotation().ordinal()
    }

    /// Logical width in pixels
    pub fn width(&self) -> u32 {
        self.state.logical_size().width
    }

    /// Logical height in pixels
    pub fn height(&self) -> u32 {
        self.state.logical_size().height
    }

    /// Logical extent in pixels
    pub fn size(&self) -> Size {
        self.state.logical_size()
    }

    /// Logical physical extent, for DPI reporting
    pub fn physical_size(&self) -> Size {
        self.state.logical_physical_size()
    }

    /// Framebuffer extent in pixels
    pub fn device_size(&self) -> Size {
        self.state.device_size()
    }

    /// See [`CoordinateMapper::map_size_to_device`](crate::CoordinateMapper::map_size_to_device)
    pub fn map_size_to_device(&self, size: Size) -> Size {
        self.state.mapper().map_size_to_device(size)
    }

    /// See [`CoordinateMapper::map_size_from_device`](crate::CoordinateMapper::map_size_from_device)
    pub fn map_size_from_device(&self, size: Size) -> Size {
        self.state.mapper().map_size_from_device(size)
    }

    /// See [`CoordinateMapper::map_point_to_device`](crate::CoordinateMapper::map_point_to_device)
    pub fn map_point_to_device(&self, p: Point, size: Size) -> Point {
        self.state.mapper().map_point_to_device(p, size)
    }

    /// See [`CoordinateMapper::map_point_from_device`](crate::CoordinateMapper::map_point_from_device)
    pub fn map_point_from_device(&self, p: Point, size: Size) -> Point {
        self.state.mapper().map_point_from_device(p, size)
    }

    /// See [`CoordinateMapper::map_rect_to_device`](crate::CoordinateMapper::map_rect_to_device)
    pub fn map_rect_to_device(&self, r: Rect, size: Size) -> Rect {
        self.state.mapper().map_rect_to_device(r, size)
    }

    /// See [`CoordinateMapper::map_rect_from_device`](crate::CoordinateMapper::map_rect_from_device)
    pub fn map_rect_from_device(&self, r: Rect, size: Size) -> Rect {
        self.state.mapper().map_rect_from_device(r, size)
    }

    /// See [`CoordinateMapper::map_region_to_device`](crate::CoordinateMapper::map_region_to_device)
    pub fn map_region_to_device(&self, region: &Region, size: Size) -> Region {
        self.state.mapper().map_region_to_device(region, size)
    }

    /// See [`CoordinateMapper::map_region_from_device`](crate::CoordinateMapper::map_region_from_device)
    pub fn map_region_from_device(&self, region: &Region, size: Size) -> Region {
        self.state.mapper().map_region_from_device(region, size)
    }

    /// Copy `image`, placed at logical `origin`, onto the screen over `region`
    ///
    /// See [`RotatingBlitter::blit`] for the steps involved.
    ///
    /// # Errors
    ///
    /// Returns `Error::FramebufferTooSmall` if the backend's framebuffer does
    /// not match its geometry, and `Error::PageFlip` if the new panel could
    /// not be shown.
    pub fn blit(
        &mut self,
        image: &Image<'_>,
        origin: Point,
        region: &Region,
    ) -> Result<BlitOutcome, Error<P>> {
        self.blitter
            .blit(&mut self.backend, &self.lock, &self.state, image, origin, region)
    }

    /// Fill a logical region with `color`
    pub fn solid_fill(&mut self, color: Color, region: &Region) {
        if self.transformation() == Rotation::None {
            self.backend.solid_fill(color, region);
            return;
        }
        let _guard = self.lock.grab();
        let device = self.map_region_to_device(region, self.size());
        self.backend.solid_fill(color, &device);
    }

    /// Recompose and show a logical region
    pub fn expose_region(&mut self, region: &Region, changing: i32) {
        if self.transformation() == Rotation::None {
            self.backend.expose_region(region, changing);
            return;
        }
        let device = self.map_region_to_device(region, self.size());
        self.backend.expose_region(&device, changing);
    }

    /// Mark a logical rect as needing a refresh
    pub fn set_dirty(&mut self, rect: Rect) {
        if self.transformation() == Rotation::None {
            self.backend.set_dirty(rect);
            return;
        }
        let device = self.map_rect_to_device(rect, self.size());
        self.backend.set_dirty(device);
    }

    /// Area covered by the screen, in logical coordinates
    pub fn region(&self) -> Region {
        let region = self.backend.region();
        if self.transformation() == Rotation::None {
            return region;
        }
        self.map_region_from_device(&region, self.device_size())
    }

    /// Re-read the backend's format and extents after a mode change
    pub fn reload_format(&mut self) {
        self.blitter.reload_format(self.backend.format());
        self.state
            .set_device_size(self.backend.device_size(), self.backend.physical_size());
    }

    /// Region written by the previous rotated blit
    pub fn dirty(&self) -> &Region {
        self.blitter.dirty()
    }

    /// The blitter, for inspecting its table and panel state
    pub fn blitter(&self) -> &RotatingBlitter<P> {
        &self.blitter
    }

    /// The pass-through screen
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// The pass-through screen, mutably
    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    /// The display lock
    pub fn lock(&self) -> &L {
        &self.lock
    }

    #[cfg(feature = "graphics")]
    pub(crate) fn state(&self) -> &TransformationState {
        &self.state
    }

    #[cfg(feature = "graphics")]
    pub(crate) fn parts_mut(&mut self) -> (&mut B, &L) {
        (&mut self.backend, &self.lock)
    }
}
