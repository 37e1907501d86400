//! Software Screen Rotation for Framebuffer Displays
//!
//! Presents an unrotated linear framebuffer as a logical screen rotated by
//! 0, 90, 180 or 270 degrees. Drawing happens in logical coordinates; this
//! crate maps geometry to device space and copies pixels in with the rotation
//! applied.
//!
//! ## Features
//!
//! - `no_std` compatible (needs `alloc`)
//! - Point, rect, region and size mapping in both directions
//! - Rotated blits for 32, 24, 18, 16, 15, 12 and 8 bpp framebuffers from
//!   RGB32, RGB888, RGB565, RGB555 and RGB444 sources
//! - Double-buffered output with page flipping
//! - `embedded-graphics` integration (with `graphics` feature)
//!
//! ## Usage
//!
//! ```
//! use transformed_screen::{Builder, Point, Rect, Rotation, Size, TransformedScreen};
//! # use transformed_screen::{Color, FramebufferFormat, Image, Region, ScreenBackend};
//! # struct Framebuffer(Vec<u8>);
//! # impl ScreenBackend for Framebuffer {
//! #     fn device_size(&self) -> Size { Size::new(480, 272) }
//! #     fn physical_size(&self) -> Size { Size::new(95, 54) }
//! #     fn format(&self) -> FramebufferFormat { FramebufferFormat::rgb(32) }
//! #     fn linestep(&self) -> usize { 480 * 4 }
//! #     fn framebuffer_mut(&mut self) -> &mut [u8] { &mut self.0 }
//! #     fn blit(&mut self, _: &Image<'_>, _: Point, _: &Region) {}
//! #     fn solid_fill(&mut self, _: Color, _: &Region) {}
//! #     fn expose_region(&mut self, _: &Region, _: i32) {}
//! #     fn set_dirty(&mut self, _: Rect) {}
//! #     fn region(&self) -> Region { Rect::new(0, 0, 480, 272).into() }
//! # }
//! # let backend = Framebuffer(vec![0; 480 * 4 * 272]);
//! let config = match Builder::new().rotation_token("Rot270").build() {
//!     Ok(config) => config,
//!     Err(_) => return,
//! };
//! let screen = TransformedScreen::new(backend, spin::Mutex::new(()), config);
//!
//! assert_eq!(screen.transformation(), Rotation::Rot270);
//! assert_eq!(screen.size(), Size::new(272, 480));
//!
//! // Logical top-left is the framebuffer's top-right
//! let p = screen.map_point_to_device(Point::new(0, 0), screen.size());
//! assert_eq!(p, Point::new(479, 0));
//! ```

#![no_std]

extern crate alloc;

/// Rotated blit orchestration
pub mod blit;
/// Colors and packed pixel conversions
pub mod color;
/// Screen configuration types and builder
pub mod config;
/// Rotate-copy kernel selection
pub mod dispatch;
/// Error types for the screen
pub mod error;
/// Points, sizes and rectangles
pub mod geometry;
/// Borrowed source images
pub mod image;
/// External collaborator abstraction
pub mod interface;
/// Rotated block copy kernels
pub mod memrotate;
/// Pixel storage types
pub mod pixel;
/// Regions made of disjoint rectangles
pub mod region;
/// Coordinate mapping between logical and device space
pub mod rotation;
/// The rotated screen
pub mod screen;
/// Current rotation and derived extents
pub mod state;

/// Graphics support via embedded-graphics (requires `graphics` feature)
#[cfg(feature = "graphics")]
pub mod graphics;

#[cfg(test)]
mod testing;

pub use blit::{BlitOutcome, PageFlipper, RotatingBlitter};
pub use color::Color;
pub use config::{Builder, Config, PanelGeometry, RectPolicy, Rotation};
pub use dispatch::{BlitTable, ChannelOrder, DispatchKey, FramebufferFormat, RotateCopy};
pub use error::{BuilderError, Error, ImageError};
pub use geometry::{Point, Rect, Size};
pub use image::{Image, SourceFormat};
pub use interface::{DisplayLock, NoPageFlip, PageFlip, ScreenBackend};
pub use region::Region;
pub use rotation::CoordinateMapper;
pub use screen::TransformedScreen;
pub use state::TransformationState;

#[cfg(feature = "graphics")]
pub use graphics::RotatedCanvas;
