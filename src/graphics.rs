//! Graphics support via embedded-graphics
//!
//! This module provides [`RotatedCanvas`], a
//! [`DrawTarget`](embedded_graphics_core::draw_target::DrawTarget) over the
//! device framebuffer that accepts logical coordinates. Every pixel is mapped
//! to device space and encoded in the framebuffer's format, so anything the
//! embedded-graphics ecosystem can draw appears with the screen's rotation.
//!
//! ## Example
//!
//! ```
//! use embedded_graphics::{
//!     prelude::*,
//!     primitives::{PrimitiveStyle, Rectangle},
//! };
//! use transformed_screen::{Color, FramebufferFormat, RotatedCanvas, Rotation};
//!
//! let mut fb = vec![0u8; 8 * 4 * 2];
//! let device = transformed_screen::Size::new(8, 4);
//! let mut canvas =
//!     match RotatedCanvas::new(&mut fb, FramebufferFormat::rgb(16), 16, Rotation::Rot90, device) {
//!         Some(canvas) => canvas,
//!         None => return,
//!     };
//! assert_eq!(canvas.size(), Size::new(4, 8));
//!
//! let _ = Rectangle::new(Point::new(0, 0), Size::new(4, 2))
//!     .into_styled(PrimitiveStyle::with_fill(Color::WHITE))
//!     .draw(&mut canvas);
//! ```

use core::convert::Infallible;
use embedded_graphics_core::{
    draw_target::DrawTarget,
    geometry::{OriginDimensions, Point, Size},
    prelude::Pixel,
};

use crate::color::Color;
use crate::config::Rotation;
use crate::dispatch::{self, FramebufferFormat};
use crate::geometry;
use crate::interface::{DisplayLock, PageFlip, ScreenBackend};
use crate::rotation::CoordinateMapper;
use crate::screen::TransformedScreen;

/// Draw target writing logical pixels into a device framebuffer
pub struct RotatedCanvas<'a> {
    framebuffer: &'a mut [u8],
    format: FramebufferFormat,
    bytes_per_pixel: usize,
    linestep: usize,
    mapper: CoordinateMapper,
    logical: geometry::Size,
}

impl<'a> RotatedCanvas<'a> {
    /// Wrap a framebuffer of `device_size` pixels
    ///
    /// Returns `None` if the framebuffer format cannot be encoded.
    pub fn new(
        framebuffer: &'a mut [u8],
        format: FramebufferFormat,
        linestep: usize,
        rotation: Rotation,
        device_size: geometry::Size,
    ) -> Option<Self> {
        let bytes_per_pixel = format.bytes_per_pixel()?;
        let mapper = CoordinateMapper::new(rotation);
        Some(Self {
            framebuffer,
            format,
            bytes_per_pixel,
            linestep,
            mapper,
            logical: mapper.map_size_from_device(device_size),
        })
    }

    /// Set one logical pixel; out of range pixels are ignored
    pub fn set_pixel(&mut self, x: u32, y: u32, color: Color) {
        if x >= self.logical.width || y >= self.logical.height {
            return;
        }
        let p = geometry::Point::new(x as i32, y as i32);
        let d = self.mapper.map_point_to_device(p, self.logical);
        let at = d.y as usize * self.linestep + d.x as usize * self.bytes_per_pixel;
        if let Some(out) = self.framebuffer.get_mut(at..) {
            let _ = dispatch::encode(self.format, color, out);
        }
    }
}

impl DrawTarget for RotatedCanvas<'_> {
    type Color = Color;
    type Error = Infallible;

    fn draw_iter<Iter>(&mut self, pixels: Iter) -> Result<(), Self::Error>
    where
        Iter: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(Point { x, y }, color) in pixels {
            if x < 0 || y < 0 {
                continue;
            }
            self.set_pixel(x as u32, y as u32, color);
        }

        Ok(())
    }
}

impl OriginDimensions for RotatedCanvas<'_> {
    fn size(&self) -> Size {
        self.logical.into()
    }
}

impl<B, L, P> TransformedScreen<B, L, P>
where
    B: ScreenBackend,
    L: DisplayLock,
    P: PageFlip,
{
    /// Draw on the screen in logical coordinates while holding the display
    /// lock
    ///
    /// Returns `None` without taking the lock if the framebuffer format
    /// cannot be encoded.
    pub fn draw<R>(&mut self, f: impl FnOnce(&mut RotatedCanvas<'_>) -> R) -> Option<R> {
        let state = *self.state();
        let (backend, lock) = self.parts_mut();
        let format = backend.format();
        if !format.is_supported() {
            return None;
        }
        let linestep = backend.linestep();
        let _guard = lock.grab();
        let mut canvas = RotatedCanvas::new(
            backend.framebuffer_mut(),
            format,
            linestep,
            state.rotation(),
            state.device_size(),
        )?;
        Some(f(&mut canvas))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Builder;
    use crate::testing::{CountingLock, MockBackend};
    use embedded_graphics::{
        prelude::*,
        primitives::{PrimitiveStyle, Rectangle},
    };

    fn screen(rotation: Rotation, depth: u8) -> TransformedScreen<MockBackend, CountingLock> {
        let config = Builder::new().rotation(rotation).build().unwrap();
        let backend = MockBackend::new(geometry::Size::new(8, 4), depth);
        TransformedScreen::new(backend, CountingLock::new(), config)
    }

    #[test]
    fn test_canvas_uses_logical_size() {
        let mut fb = [0u8; 8 * 4];
        let canvas = RotatedCanvas::new(
            &mut fb,
            FramebufferFormat::rgb(8),
            8,
            Rotation::Rot270,
            geometry::Size::new(8, 4),
        )
        .unwrap();
        assert_eq!(canvas.size(), Size::new(4, 8));
    }

    #[test]
    fn test_unsupported_format() {
        let mut fb = [0u8; 16];
        let canvas = RotatedCanvas::new(
            &mut fb,
            FramebufferFormat::rgb(0),
            4,
            Rotation::None,
            geometry::Size::new(4, 4),
        );
        assert!(canvas.is_none());

        let mut s = screen(Rotation::Rot90, 0);
        assert!(s.draw(|_| ()).is_none());
        assert_eq!(s.lock().grabs(), 0);
    }

    #[test]
    fn test_pixel_lands_on_mapped_device_position() {
        let mut s = screen(Rotation::Rot90, 32);
        let drawn = s.draw(|canvas| {
            Pixel(Point::new(0, 0), Color::WHITE).draw(canvas)
        });
        assert!(matches!(drawn, Some(Ok(()))));
        // Logical (0, 0) on a 4x8 screen is device (0, 3).
        assert_eq!(s.backend().pixel(0, 3), 0xFFFF_FFFF);
        assert_eq!(s.backend().pixel(0, 0), 0);
        assert_eq!(s.lock().grabs(), 1);
        assert!(!s.lock().is_held());
    }

    #[test]
    fn test_out_of_bounds_pixels_ignored() {
        let mut s = screen(Rotation::Rot180, 16);
        s.draw(|canvas| {
            let _ = Pixel(Point::new(-1, 0), Color::WHITE).draw(canvas);
            let _ = Pixel(Point::new(8, 0), Color::WHITE).draw(canvas);
            let _ = Pixel(Point::new(0, 4), Color::WHITE).draw(canvas);
        });
        assert!(s.backend().fb.iter().all(|&b| b == 0));
    }

    #[test]
    fn test_filled_rectangle_covers_mapped_rect() {
        let mut s = screen(Rotation::Rot270, 16);
        s.draw(|canvas| {
            let _ = Rectangle::new(Point::new(0, 0), Size::new(4, 2))
                .into_styled(PrimitiveStyle::with_fill(Color::WHITE))
                .draw(canvas);
        });

        let logical = s.size();
        let device = s.map_rect_to_device(crate::Rect::new(0, 0, 4, 2), logical);
        let backend = s.backend();
        for y in 0..4 {
            for x in 0..8 {
                let expected = if device.contains(crate::Point::new(x, y)) { 0xFFFF } else { 0 };
                assert_eq!(backend.pixel(x, y), expected, "({x}, {y})");
            }
        }
    }
}
