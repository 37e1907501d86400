//! External collaborator abstraction
//!
//! The transformed screen sits on top of three collaborators it does not own:
//!
//! - a [`ScreenBackend`]: the unrotated, pass-through screen that owns the
//!   framebuffer memory and knows how to blit, fill and track dirty areas in
//!   device space
//! - a [`DisplayLock`]: the display-wide exclusive lock serializing
//!   framebuffer writers across clients
//! - a [`PageFlip`] device: the framebuffer control device that moves the
//!   visible panel in dual-panel mode
//!
//! ## Example
//!
//! ```
//! use transformed_screen::{DisplayLock, NoPageFlip, PageFlip};
//!
//! let lock = spin::Mutex::new(());
//! {
//!     let _guard = lock.grab();
//!     // framebuffer writes go here
//! }
//! assert!(!lock.is_locked());
//!
//! let mut device = NoPageFlip;
//! assert!(device.set_y_offset(864).is_ok());
//! ```

use core::convert::Infallible;
use core::fmt::Debug;

use crate::color::Color;
use crate::dispatch::FramebufferFormat;
use crate::geometry::{Point, Rect, Size};
use crate::image::Image;
use crate::region::Region;

/// Trait for the pass-through screen underneath the rotation layer
///
/// Everything here works in **device** space. Implementations typically wrap
/// a memory-mapped linear framebuffer.
///
/// ## Implementing
///
/// `framebuffer_mut` must return the whole mapping, including every panel
/// when dual-panel output is configured. The rotation layer indexes it with
/// `linestep` and the depth reported by `format`.
pub trait ScreenBackend {
    /// Framebuffer extent in pixels
    fn device_size(&self) -> Size;

    /// Physical extent of the visible area in millimetres, used for DPI
    fn physical_size(&self) -> Size;

    /// Framebuffer depth and channel order
    fn format(&self) -> FramebufferFormat;

    /// Bytes between the starts of consecutive framebuffer rows
    fn linestep(&self) -> usize;

    /// The framebuffer memory
    fn framebuffer_mut(&mut self) -> &mut [u8];

    /// Copy `image` placed at `origin` into the framebuffer, unrotated
    fn blit(&mut self, image: &Image<'_>, origin: Point, region: &Region);

    /// Fill `region` with `color`, unrotated
    fn solid_fill(&mut self, color: Color, region: &Region);

    /// Recompose and show `region`
    fn expose_region(&mut self, region: &Region, changing: i32);

    /// Mark `rect` as needing a refresh
    fn set_dirty(&mut self, rect: Rect);

    /// Area covered by the screen
    fn region(&self) -> Region;
}

/// Trait for the framebuffer control device used in dual-panel mode
pub trait PageFlip {
    /// Error type for mode-set operations
    ///
    /// Must implement [`Debug`] for error reporting.
    type Error: Debug;

    /// Make the panel starting at device row `rows` visible
    ///
    /// # Errors
    ///
    /// Returns an error if the device rejected the mode-set.
    fn set_y_offset(&mut self, rows: u32) -> Result<(), Self::Error>;
}

/// Page flip device for single-panel screens
///
/// Never fails and never does anything.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct NoPageFlip;

impl PageFlip for NoPageFlip {
    type Error = Infallible;

    fn set_y_offset(&mut self, _rows: u32) -> Result<(), Self::Error> {
        Ok(())
    }
}

/// Trait for the display-wide exclusive lock
///
/// `grab` blocks until the lock is held and returns a guard; dropping the
/// guard releases the lock. Every framebuffer write made by the rotation
/// layer happens while a guard is alive.
pub trait DisplayLock {
    /// Guard holding the lock until dropped
    type Guard<'a>
    where
        Self: 'a;

    /// Acquire the lock
    fn grab(&self) -> Self::Guard<'_>;
}

impl DisplayLock for spin::Mutex<()> {
    type Guard<'a> = spin::MutexGuard<'a, ()>;

    fn grab(&self) -> Self::Guard<'_> {
        self.lock()
    }
}
