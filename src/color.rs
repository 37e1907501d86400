//! Colors and packed pixel conversions
//!
//! [`Color`] is a 32-bit ARGB value and the common currency between pixel
//! formats: every conversion between two packed formats goes through it.
//!
//! ## Packed Formats
//!
//! | Format  | Bits | Layout (MSB → LSB)        |
//! |---------|------|---------------------------|
//! | ARGB32  | 32   | `AAAAAAAA RRRRRRRR GGGGGGGG BBBBBBBB` |
//! | RGB565  | 16   | `RRRRRGGG GGGBBBBB`       |
//! | BGR565  | 16   | `BBBBBGGG GGGRRRRR`       |
//! | RGB555  | 15   | `-RRRRRGG GGGBBBBB`       |
//! | BGR555  | 15   | `-BBBBBGG GGGRRRRR`       |
//! | RGB444  | 12   | `----RRRR GGGGBBBB`       |
//! | Index8  | 8    | 6×6×6 colour cube index   |
//!
//! Narrow channels widen by bit replication, so full intensity stays full
//! intensity.
//!
//! ## Example
//!
//! ```
//! use transformed_screen::Color;
//!
//! let orange = Color::rgb(0xFF, 0x80, 0x00);
//! assert_eq!(orange.to_rgb565(), 0xFC00);
//! assert_eq!(Color::from_rgb565(0xF800), Color::rgb(0xFF, 0, 0));
//! assert_eq!(Color::WHITE.to_cube_index(), 215);
//! ```

/// 32-bit ARGB color
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Color(u32);

const fn widen5(v: u32) -> u32 {
    (v << 3) | (v >> 2)
}

const fn widen6(v: u32) -> u32 {
    (v << 2) | (v >> 4)
}

const fn widen4(v: u32) -> u32 {
    (v << 4) | v
}

const fn cube_level(v: u8) -> u8 {
    ((v as u16 + 0x19) / 0x33) as u8
}

impl Color {
    /// Opaque black
    pub const BLACK: Self = Self(0xFF00_0000);
    /// Opaque white
    pub const WHITE: Self = Self(0xFFFF_FFFF);

    /// Opaque color from 8-bit channels
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::argb(0xFF, r, g, b)
    }

    /// Color from 8-bit channels including alpha
    pub const fn argb(a: u8, r: u8, g: u8, b: u8) -> Self {
        Self((a as u32) << 24 | (r as u32) << 16 | (g as u32) << 8 | b as u32)
    }

    /// Color from a packed `0xAARRGGBB` value
    pub const fn from_argb32(value: u32) -> Self {
        Self(value)
    }

    /// Packed `0xAARRGGBB` value
    pub const fn argb32(self) -> u32 {
        self.0
    }

    /// Alpha channel
    pub const fn alpha(self) -> u8 {
        (self.0 >> 24) as u8
    }

    /// Red channel
    pub const fn red(self) -> u8 {
        (self.0 >> 16) as u8
    }

    /// Green channel
    pub const fn green(self) -> u8 {
        (self.0 >> 8) as u8
    }

    /// Blue channel
    pub const fn blue(self) -> u8 {
        self.0 as u8
    }

    /// Expand a packed RGB565 value
    pub const fn from_rgb565(p: u16) -> Self {
        let p = p as u32;
        Self(
            0xFF00_0000
                | widen5((p >> 11) & 0x1F) << 16
                | widen6((p >> 5) & 0x3F) << 8
                | widen5(p & 0x1F),
        )
    }

    /// Pack into RGB565
    pub const fn to_rgb565(self) -> u16 {
        let p = self.0;
        (((p >> 8) & 0xF800) | ((p >> 5) & 0x07E0) | ((p >> 3) & 0x001F)) as u16
    }

    /// Pack into BGR565
    pub const fn to_bgr565(self) -> u16 {
        let p = self.0;
        (((p << 8) & 0xF800) | ((p >> 5) & 0x07E0) | ((p >> 19) & 0x001F)) as u16
    }

    /// Expand a packed RGB555 value
    pub const fn from_rgb555(p: u16) -> Self {
        let p = p as u32;
        Self(
            0xFF00_0000
                | widen5((p >> 10) & 0x1F) << 16
                | widen5((p >> 5) & 0x1F) << 8
                | widen5(p & 0x1F),
        )
    }

    /// Pack into RGB555
    pub const fn to_rgb555(self) -> u16 {
        let p = self.0;
        (((p >> 9) & 0x7C00) | ((p >> 6) & 0x03E0) | ((p >> 3) & 0x001F)) as u16
    }

    /// Pack into BGR555
    pub const fn to_bgr555(self) -> u16 {
        let p = self.0;
        (((p << 7) & 0x7C00) | ((p >> 6) & 0x03E0) | ((p >> 19) & 0x001F)) as u16
    }

    /// Expand a packed RGB444 value
    pub const fn from_rgb444(p: u16) -> Self {
        let p = p as u32;
        Self(
            0xFF00_0000
                | widen4((p >> 8) & 0xF) << 16
                | widen4((p >> 4) & 0xF) << 8
                | widen4(p & 0xF),
        )
    }

    /// Pack into RGB444
    pub const fn to_rgb444(self) -> u16 {
        let p = self.0;
        (((p >> 12) & 0x0F00) | ((p >> 8) & 0x00F0) | ((p >> 4) & 0x000F)) as u16
    }

    /// Index into the 216 entry 6×6×6 colour cube used by 8-bit screens
    pub const fn to_cube_index(self) -> u8 {
        cube_level(self.red()) * 36 + cube_level(self.green()) * 6 + cube_level(self.blue())
    }
}

#[cfg(feature = "graphics")]
impl embedded_graphics_core::prelude::PixelColor for Color {
    type Raw = embedded_graphics_core::pixelcolor::raw::RawU32;
}

#[cfg(feature = "graphics")]
impl From<embedded_graphics_core::pixelcolor::Rgb888> for Color {
    fn from(c: embedded_graphics_core::pixelcolor::Rgb888) -> Self {
        use embedded_graphics_core::pixelcolor::RgbColor;
        Self::rgb(c.r(), c.g(), c.b())
    }
}
