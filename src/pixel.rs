//! Pixel storage types
//!
//! Each type here describes how one pixel is laid out in memory and how it
//! converts to and from [`Color`]. Multi-byte pixels use the machine's native
//! byte order, as a memory-mapped framebuffer does; [`Rgb888`] is always three
//! bytes in blue, green, red order.

use crate::color::Color;

/// A pixel layout that can be read from and written to raw bytes
pub trait PixelStorage: Copy {
    /// Bytes occupied by one pixel
    const BYTES: usize;

    /// Read a pixel from the start of `bytes`
    fn read(bytes: &[u8]) -> Self;

    /// Write the pixel to the start of `out`
    fn write(self, out: &mut [u8]);

    /// Widen to ARGB32
    fn to_color(self) -> Color;

    /// Narrow from ARGB32
    fn from_color(color: Color) -> Self;
}

/// 32-bit `0xAARRGGBB`
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Argb32(pub u32);

impl PixelStorage for Argb32 {
    const BYTES: usize = 4;

    fn read(bytes: &[u8]) -> Self {
        Self(u32::from_ne_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    fn write(self, out: &mut [u8]) {
        out[..4].copy_from_slice(&self.0.to_ne_bytes());
    }

    fn to_color(self) -> Color {
        Color::from_argb32(self.0)
    }

    fn from_color(color: Color) -> Self {
        Self(color.argb32())
    }
}

/// 24-bit RGB stored as three bytes: blue, green, red
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgb888(pub [u8; 3]);

impl PixelStorage for Rgb888 {
    const BYTES: usize = 3;

    fn read(bytes: &[u8]) -> Self {
        Self([bytes[0], bytes[1], bytes[2]])
    }

    fn write(self, out: &mut [u8]) {
        out[..3].copy_from_slice(&self.0);
    }

    fn to_color(self) -> Color {
        let [b, g, r] = self.0;
        Color::rgb(r, g, b)
    }

    fn from_color(color: Color) -> Self {
        Self([color.blue(), color.green(), color.red()])
    }
}

/// 8-bit index into the 6×6×6 colour cube
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Index8(pub u8);

impl PixelStorage for Index8 {
    const BYTES: usize = 1;

    fn read(bytes: &[u8]) -> Self {
        Self(bytes[0])
    }

    fn write(self, out: &mut [u8]) {
        out[0] = self.0;
    }

    fn to_color(self) -> Color {
        const STEP: u8 = 0x33;
        let i = self.0.min(215);
        Color::rgb((i / 36) * STEP, (i / 6 % 6) * STEP, (i % 6) * STEP)
    }

    fn from_color(color: Color) -> Self {
        Self(color.to_cube_index())
    }
}

macro_rules! packed16 {
    ($(#[$doc:meta])* $name:ident, $from:path, $to:ident) => {
        $(#[$doc])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq)]
        pub struct $name(pub u16);

        impl PixelStorage for $name {
            const BYTES: usize = 2;

            fn read(bytes: &[u8]) -> Self {
                Self(u16::from_ne_bytes([bytes[0], bytes[1]]))
            }

            fn write(self, out: &mut [u8]) {
                out[..2].copy_from_slice(&self.0.to_ne_bytes());
            }

            fn to_color(self) -> Color {
                $from(self.0)
            }

            fn from_color(color: Color) -> Self {
                Self(color.$to())
            }
        }
    };
}

packed16!(
    /// 16-bit `RRRRRGGGGGGBBBBB`
    Rgb565,
    Color::from_rgb565,
    to_rgb565
);
packed16!(
    /// 16-bit `BBBBBGGGGGGRRRRR`, for BGR-wired panels
    Bgr565,
    bgr565_to_color,
    to_bgr565
);
packed16!(
    /// 15-bit `-RRRRRGGGGGBBBBB`
    Rgb555,
    Color::from_rgb555,
    to_rgb555
);
packed16!(
    /// 15-bit `-BBBBBGGGGGRRRRR`, for BGR-wired panels
    Bgr555,
    bgr555_to_color,
    to_bgr555
);
packed16!(
    /// 12-bit `----RRRRGGGGBBBB`
    Rgb444,
    Color::from_rgb444,
    to_rgb444
);

fn bgr565_to_color(p: u16) -> Color {
    Color::from_rgb565((p & 0x001F) << 11 | (p & 0x07E0) | p >> 11)
}

fn bgr555_to_color(p: u16) -> Color {
    Color::from_rgb555((p & 0x001F) << 10 | (p & 0x03E0) | (p >> 10) & 0x001F)
}
