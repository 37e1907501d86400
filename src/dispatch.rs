//! Rotate-copy kernel selection
//!
//! A rotated blit needs a kernel that reads the source image's pixel storage
//! and writes the framebuffer's. The choice depends on three things: the
//! rotation, the framebuffer depth (and channel order), and the source
//! format. [`select`] makes that choice for one combination; [`BlitTable`]
//! resolves every combination once per framebuffer format so the blit path is
//! a plain array lookup.
//!
//! ## Framebuffer Storage
//!
//! | Depth   | RGB order  | BGR order  |
//! |---------|------------|------------|
//! | 32      | ARGB32     | ARGB32     |
//! | 24, 18  | RGB888     | RGB888     |
//! | 16      | RGB565     | BGR565     |
//! | 15      | RGB555     | BGR555     |
//! | 12      | RGB444     | RGB444     |
//! | 8       | Index8     | Index8     |
//!
//! Any other depth has no kernels: rotated blits to it are skipped.
//!
//! ## Example
//!
//! ```
//! use transformed_screen::{BlitTable, FramebufferFormat, Rotation, SourceFormat};
//!
//! let table = BlitTable::new(FramebufferFormat::rgb(16));
//! let copy = table.lookup(Rotation::Rot90, SourceFormat::Rgb32);
//! assert!(copy.is_some_and(|c| c.dst_bpp == 2 && c.src_bpp == 4));
//!
//! // Unrotated blits never go through a kernel
//! assert!(table.lookup(Rotation::None, SourceFormat::Rgb32).is_none());
//! ```

use log::debug;

use crate::color::Color;
use crate::config::Rotation;
use crate::image::SourceFormat;
use crate::memrotate::{self, RotateCopyFn};
use crate::pixel::{
    Argb32, Bgr555, Bgr565, Index8, PixelStorage, Rgb444, Rgb555, Rgb565, Rgb888,
};

/// Order of the colour channels in framebuffer pixels
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ChannelOrder {
    /// Red in the high bits
    #[default]
    Rgb,
    /// Blue in the high bits
    Bgr,
}

/// Framebuffer pixel format
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct FramebufferFormat {
    /// Bits per pixel as reported by the device
    pub depth: u8,
    /// Channel order of packed pixels
    pub channel_order: ChannelOrder,
}

impl FramebufferFormat {
    /// Format with RGB channel order
    pub const fn rgb(depth: u8) -> Self {
        Self {
            depth,
            channel_order: ChannelOrder::Rgb,
        }
    }

    /// Format with BGR channel order
    pub const fn bgr(depth: u8) -> Self {
        Self {
            depth,
            channel_order: ChannelOrder::Bgr,
        }
    }

    /// Bytes per framebuffer pixel, or `None` for unsupported depths
    pub const fn bytes_per_pixel(&self) -> Option<usize> {
        match self.depth {
            32 => Some(4),
            24 | 18 => Some(3),
            16 | 15 | 12 => Some(2),
            8 => Some(1),
            _ => None,
        }
    }

    /// Whether rotated blits to this format are possible
    pub const fn is_supported(&self) -> bool {
        self.bytes_per_pixel().is_some()
    }
}

/// Inputs to kernel selection
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct DispatchKey {
    /// Logical to device rotation
    pub rotation: Rotation,
    /// Framebuffer format
    pub destination: FramebufferFormat,
    /// Source image format
    pub source: SourceFormat,
}

/// A resolved rotate-copy kernel with its pixel sizes
#[derive(Clone, Copy, Debug)]
pub struct RotateCopy {
    /// The kernel
    pub func: RotateCopyFn,
    /// Bytes per source pixel
    pub src_bpp: usize,
    /// Bytes per framebuffer pixel
    pub dst_bpp: usize,
}

fn kernel_for<D: PixelStorage>(rotation: Rotation, source: SourceFormat) -> Option<RotateCopy> {
    let func = match source {
        SourceFormat::Rgb32 => memrotate::kernel::<D, Argb32>(rotation),
        SourceFormat::Rgb888 => memrotate::kernel::<D, Rgb888>(rotation),
        SourceFormat::Rgb16 => memrotate::kernel::<D, Rgb565>(rotation),
        SourceFormat::Rgb555 => memrotate::kernel::<D, Rgb555>(rotation),
        SourceFormat::Rgb444 => memrotate::kernel::<D, Rgb444>(rotation),
    }?;
    Some(RotateCopy {
        func,
        src_bpp: source.bytes_per_pixel(),
        dst_bpp: D::BYTES,
    })
}

/// Pick the kernel for one combination
///
/// Returns `None` for [`Rotation::None`] and for unsupported framebuffer
/// depths.
pub fn select(key: DispatchKey) -> Option<RotateCopy> {
    let DispatchKey {
        rotation,
        destination,
        source,
    } = key;
    let bgr = destination.channel_order == ChannelOrder::Bgr;
    match destination.depth {
        32 => kernel_for::<Argb32>(rotation, source),
        24 | 18 => kernel_for::<Rgb888>(rotation, source),
        16 if bgr => kernel_for::<Bgr565>(rotation, source),
        16 => kernel_for::<Rgb565>(rotation, source),
        15 if bgr => kernel_for::<Bgr555>(rotation, source),
        15 => kernel_for::<Rgb555>(rotation, source),
        12 => kernel_for::<Rgb444>(rotation, source),
        8 => kernel_for::<Index8>(rotation, source),
        _ => None,
    }
}

/// Write `color` as one framebuffer pixel at the start of `out`
///
/// Returns the number of bytes written, or `None` if the format is
/// unsupported or `out` is too short.
pub fn encode(format: FramebufferFormat, color: Color, out: &mut [u8]) -> Option<usize> {
    fn put<P: PixelStorage>(color: Color, out: &mut [u8]) -> Option<usize> {
        let out = out.get_mut(..P::BYTES)?;
        P::from_color(color).write(out);
        Some(P::BYTES)
    }

    let bgr = format.channel_order == ChannelOrder::Bgr;
    match format.depth {
        32 => put::<Argb32>(color, out),
        24 | 18 => put::<Rgb888>(color, out),
        16 if bgr => put::<Bgr565>(color, out),
        16 => put::<Rgb565>(color, out),
        15 if bgr => put::<Bgr555>(color, out),
        15 => put::<Rgb555>(color, out),
        12 => put::<Rgb444>(color, out),
        8 => put::<Index8>(color, out),
        _ => None,
    }
}

const ROTATED: [Rotation; 3] = [Rotation::Rot90, Rotation::Rot180, Rotation::Rot270];

/// Kernels for every rotation and source format of one framebuffer format
#[derive(Clone, Copy, Debug)]
pub struct BlitTable {
    format: FramebufferFormat,
    entries: [[Option<RotateCopy>; SourceFormat::ALL.len()]; ROTATED.len()],
}

impl BlitTable {
    /// Resolve all kernels for `format`
    pub fn new(format: FramebufferFormat) -> Self {
        let mut entries = [[None; SourceFormat::ALL.len()]; ROTATED.len()];
        for (row, rotation) in entries.iter_mut().zip(ROTATED) {
            for (slot, source) in row.iter_mut().zip(SourceFormat::ALL) {
                *slot = select(DispatchKey {
                    rotation,
                    destination: format,
                    source,
                });
            }
        }
        if format.is_supported() {
            debug!("Blit table built for {}bpp {:?}", format.depth, format.channel_order);
        } else {
            debug!("No rotated blits for {}bpp framebuffer", format.depth);
        }
        Self { format, entries }
    }

    /// Framebuffer format the table was built for
    pub fn format(&self) -> FramebufferFormat {
        self.format
    }

    /// Kernel for a rotated blit of `source` pixels
    pub fn lookup(&self, rotation: Rotation, source: SourceFormat) -> Option<RotateCopy> {
        match rotation {
            Rotation::None => None,
            _ => self.entries[rotation.ordinal() as usize - 1][source.index()],
        }
    }
}
