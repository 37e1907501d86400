//! Borrowed source images
//!
//! An [`Image`] is the source side of a blit: pixel rows owned by the caller
//! and borrowed for the duration of the call.
//!
//! ## Example
//!
//! ```
//! use transformed_screen::{Image, SourceFormat};
//!
//! let pixels = [0u8; 4 * 3 * 2];
//! let image = match Image::new(&pixels, 4, 3, 8, SourceFormat::Rgb16) {
//!     Ok(image) => image,
//!     Err(_) => return,
//! };
//! assert_eq!(image.depth(), 16);
//! ```

use crate::error::ImageError;
use crate::geometry::{Point, Rect, Size};

/// Pixel format of a source image
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SourceFormat {
    /// 32-bit ARGB
    Rgb32,
    /// 24-bit RGB, three bytes per pixel
    Rgb888,
    /// 16-bit RGB565
    Rgb16,
    /// 15-bit RGB555 in 16-bit storage
    Rgb555,
    /// 12-bit RGB444 in 16-bit storage
    Rgb444,
}

impl SourceFormat {
    /// All source formats
    pub const ALL: [Self; 5] = [
        Self::Rgb32,
        Self::Rgb888,
        Self::Rgb16,
        Self::Rgb555,
        Self::Rgb444,
    ];

    /// Storage depth in bits
    pub const fn depth(self) -> u8 {
        match self {
            Self::Rgb32 => 32,
            Self::Rgb888 => 24,
            Self::Rgb16 | Self::Rgb555 | Self::Rgb444 => 16,
        }
    }

    /// Bytes per pixel
    pub const fn bytes_per_pixel(self) -> usize {
        self.depth() as usize / 8
    }

    pub(crate) const fn index(self) -> usize {
        self as usize
    }
}

/// Source image borrowed for a blit
#[derive(Clone, Copy, Debug)]
pub struct Image<'a> {
    data: &'a [u8],
    width: u32,
    height: u32,
    bytes_per_line: usize,
    format: SourceFormat,
}

impl<'a> Image<'a> {
    /// Wrap pixel data with its geometry
    ///
    /// # Errors
    ///
    /// Returns `ImageError::StrideTooSmall` if a row of `width` pixels does not
    /// fit in `bytes_per_line`, and `ImageError::BufferTooSmall` if `data`
    /// cannot hold `height` rows.
    pub fn new(
        data: &'a [u8],
        width: u32,
        height: u32,
        bytes_per_line: usize,
        format: SourceFormat,
    ) -> Result<Self, ImageError> {
        let row = width as usize * format.bytes_per_pixel();
        if bytes_per_line < row {
            return Err(ImageError::StrideTooSmall {
                required: row,
                provided: bytes_per_line,
            });
        }
        let required = if height == 0 {
            0
        } else {
            (height as usize - 1) * bytes_per_line + row
        };
        if data.len() < required {
            return Err(ImageError::BufferTooSmall {
                required,
                provided: data.len(),
            });
        }
        Ok(Self {
            data,
            width,
            height,
            bytes_per_line,
            format,
        })
    }

    /// Wrap tightly packed rows
    pub fn packed(
        data: &'a [u8],
        width: u32,
        height: u32,
        format: SourceFormat,
    ) -> Result<Self, ImageError> {
        Self::new(
            data,
            width,
            height,
            width as usize * format.bytes_per_pixel(),
            format,
        )
    }

    /// Raw pixel bytes
    pub fn data(&self) -> &'a [u8] {
        self.data
    }

    /// Width in pixels
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Extent in pixels
    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Rect covered by the image when placed at `origin`
    pub fn rect_at(&self, origin: Point) -> Rect {
        Rect::with_size(origin, self.size())
    }

    /// Row stride in bytes
    pub fn bytes_per_line(&self) -> usize {
        self.bytes_per_line
    }

    /// Pixel format
    pub fn format(&self) -> SourceFormat {
        self.format
    }

    /// Storage depth in bits
    pub fn depth(&self) -> u8 {
        self.format.depth()
    }

    /// Byte offset of pixel `(x, y)` in image coordinates
    pub(crate) fn offset(&self, x: u32, y: u32) -> usize {
        y as usize * self.bytes_per_line + x as usize * self.format.bytes_per_pixel()
    }
}
