//! Mock collaborators shared by the unit tests

use alloc::rc::Rc;
use alloc::vec;
use alloc::vec::Vec;
use core::cell::Cell;

use crate::color::Color;
use crate::dispatch::FramebufferFormat;
use crate::geometry::{Point, Rect, Size};
use crate::image::Image;
use crate::interface::{DisplayLock, PageFlip, ScreenBackend};
use crate::region::Region;

/// Packed ARGB32 pixels where pixel `(x, y)` is `0xFF00_0000 | y << 8 | x`
pub fn pattern(size: Size) -> Vec<u8> {
    let mut out = Vec::new();
    for y in 0..size.height {
        for x in 0..size.width {
            out.extend_from_slice(&(0xFF00_0000 | y << 8 | x).to_ne_bytes());
        }
    }
    out
}

/// In-memory pass-through screen recording every call
pub struct MockBackend {
    pub size: Size,
    pub physical: Size,
    pub format: FramebufferFormat,
    pub linestep: usize,
    pub fb: Vec<u8>,
    pub blits: Vec<(Point, Region)>,
    pub fills: Vec<(Color, Region)>,
    pub exposed: Vec<(Region, i32)>,
    pub dirty: Vec<Rect>,
    pub framebuffer_accesses: usize,
    pub unlocked_accesses: usize,
    lock_held: Option<Rc<Cell<bool>>>,
}

impl MockBackend {
    pub fn new(size: Size, depth: u8) -> Self {
        let format = FramebufferFormat::rgb(depth);
        let linestep = size.width as usize * format.bytes_per_pixel().unwrap_or(1);
        Self {
            size,
            physical: Size::new(size.width / 4, size.height / 4),
            format,
            linestep,
            fb: vec![0; linestep * size.height as usize],
            blits: Vec::new(),
            fills: Vec::new(),
            exposed: Vec::new(),
            dirty: Vec::new(),
            framebuffer_accesses: 0,
            unlocked_accesses: 0,
            lock_held: None,
        }
    }

    /// Grow the framebuffer to hold `count` stacked panels
    pub fn with_panels(mut self, count: usize) -> Self {
        self.fb = vec![0; self.linestep * self.size.height as usize * count];
        self
    }

    /// Count framebuffer writes made while `lock` is not held
    pub fn watching(mut self, lock: &CountingLock) -> Self {
        self.lock_held = Some(lock.held.clone());
        self
    }

    /// Device pixel in the first panel, widened to `u32`
    pub fn pixel(&self, x: i32, y: i32) -> u32 {
        let bpp = self.format.bytes_per_pixel().unwrap_or(1);
        let at = y as usize * self.linestep + x as usize * bpp;
        let b = &self.fb[at..at + bpp];
        match bpp {
            4 => u32::from_ne_bytes([b[0], b[1], b[2], b[3]]),
            2 => u32::from(u16::from_ne_bytes([b[0], b[1]])),
            _ => u32::from(b[0]),
        }
    }

    fn note_write(&mut self) {
        self.framebuffer_accesses += 1;
        if self.lock_held.as_ref().is_some_and(|held| !held.get()) {
            self.unlocked_accesses += 1;
        }
    }
}

impl ScreenBackend for MockBackend {
    fn device_size(&self) -> Size {
        self.size
    }

    fn physical_size(&self) -> Size {
        self.physical
    }

    fn format(&self) -> FramebufferFormat {
        self.format
    }

    fn linestep(&self) -> usize {
        self.linestep
    }

    fn framebuffer_mut(&mut self) -> &mut [u8] {
        self.note_write();
        &mut self.fb
    }

    fn blit(&mut self, _image: &Image<'_>, origin: Point, region: &Region) {
        self.blits.push((origin, region.clone()));
    }

    fn solid_fill(&mut self, color: Color, region: &Region) {
        self.note_write();
        self.fills.push((color, region.clone()));
    }

    fn expose_region(&mut self, region: &Region, changing: i32) {
        self.exposed.push((region.clone(), changing));
    }

    fn set_dirty(&mut self, rect: Rect) {
        self.dirty.push(rect);
    }

    fn region(&self) -> Region {
        Region::from_rect(Rect::with_size(Point::new(0, 0), self.size))
    }
}

/// Lock counting grabs and tracking whether it is held
#[derive(Default)]
pub struct CountingLock {
    grabs: Cell<usize>,
    held: Rc<Cell<bool>>,
}

impl CountingLock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn grabs(&self) -> usize {
        self.grabs.get()
    }

    pub fn is_held(&self) -> bool {
        self.held.get()
    }
}

pub struct CountingGuard<'a>(&'a CountingLock);

impl Drop for CountingGuard<'_> {
    fn drop(&mut self) {
        self.0.held.set(false);
    }
}

impl DisplayLock for CountingLock {
    type Guard<'a> = CountingGuard<'a>;

    fn grab(&self) -> Self::Guard<'_> {
        assert!(!self.held.get(), "display lock grabbed twice");
        self.grabs.set(self.grabs.get() + 1);
        self.held.set(true);
        CountingGuard(self)
    }
}

/// Page flip device remembering every offset it was given
#[derive(Debug, Default)]
pub struct RecordingFlip {
    pub offsets: Vec<u32>,
}

impl PageFlip for RecordingFlip {
    type Error = core::convert::Infallible;

    fn set_y_offset(&mut self, rows: u32) -> Result<(), Self::Error> {
        self.offsets.push(rows);
        Ok(())
    }
}

/// Page flip device rejecting every mode-set
#[derive(Debug)]
pub struct FailingFlip;

impl PageFlip for FailingFlip {
    type Error = &'static str;

    fn set_y_offset(&mut self, _rows: u32) -> Result<(), Self::Error> {
        Err("mode set rejected")
    }
}
