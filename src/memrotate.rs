//! Rotated block copy kernels
//!
//! Each kernel copies a `width × height` block of source pixels into the
//! destination, rotated and converted to the destination's pixel storage.
//! Both sides are byte slices starting at the block's first pixel, with
//! explicit row strides.
//!
//! | Kernel      | Source `(x, y)` lands at destination (row, column) |
//! |-------------|----------------------------------------------------|
//! | `rotate90`  | `(width - x - 1, y)`                               |
//! | `rotate180` | `(height - y - 1, width - x - 1)`                  |
//! | `rotate270` | `(x, height - y - 1)`                              |
//!
//! Callers must size the slices with [`source_len`] and [`destination_len`];
//! the kernels index without further checks.

use crate::config::Rotation;
use crate::pixel::PixelStorage;

/// Signature shared by all rotate-copy kernels
///
/// Arguments: `src`, `width`, `height`, `src_stride`, `dst`, `dst_stride`.
pub type RotateCopyFn = fn(&[u8], usize, usize, usize, &mut [u8], usize);

#[inline]
fn copy_pixel<D: PixelStorage, S: PixelStorage>(src: &[u8], dst: &mut [u8]) {
    D::from_color(S::read(src).to_color()).write(dst);
}

/// Copy a block rotated 90 degrees
pub fn rotate90<D: PixelStorage, S: PixelStorage>(
    src: &[u8],
    width: usize,
    height: usize,
    src_stride: usize,
    dst: &mut [u8],
    dst_stride: usize,
) {
    for y in 0..height {
        let row = &src[y * src_stride..];
        for x in 0..width {
            let at = (width - x - 1) * dst_stride + y * D::BYTES;
            copy_pixel::<D, S>(&row[x * S::BYTES..], &mut dst[at..]);
        }
    }
}

/// Copy a block rotated 180 degrees
pub fn rotate180<D: PixelStorage, S: PixelStorage>(
    src: &[u8],
    width: usize,
    height: usize,
    src_stride: usize,
    dst: &mut [u8],
    dst_stride: usize,
) {
    for y in 0..height {
        let row = &src[y * src_stride..];
        let out_row = (height - y - 1) * dst_stride;
        for x in 0..width {
            let at = out_row + (width - x - 1) * D::BYTES;
            copy_pixel::<D, S>(&row[x * S::BYTES..], &mut dst[at..]);
        }
    }
}

/// Copy a block rotated 270 degrees
pub fn rotate270<D: PixelStorage, S: PixelStorage>(
    src: &[u8],
    width: usize,
    height: usize,
    src_stride: usize,
    dst: &mut [u8],
    dst_stride: usize,
) {
    for y in 0..height {
        let row = &src[y * src_stride..];
        let column = (height - y - 1) * D::BYTES;
        for x in 0..width {
            let at = x * dst_stride + column;
            copy_pixel::<D, S>(&row[x * S::BYTES..], &mut dst[at..]);
        }
    }
}

/// Kernel for `rotation`, or `None` for the unrotated case
pub fn kernel<D: PixelStorage, S: PixelStorage>(rotation: Rotation) -> Option<RotateCopyFn> {
    match rotation {
        Rotation::None => None,
        Rotation::Rot90 => Some(rotate90::<D, S> as RotateCopyFn),
        Rotation::Rot180 => Some(rotate180::<D, S> as RotateCopyFn),
        Rotation::Rot270 => Some(rotate270::<D, S> as RotateCopyFn),
    }
}

/// Bytes of source a `width × height` block spans
pub const fn source_len(width: usize, height: usize, stride: usize, bytes_per_pixel: usize) -> usize {
    if width == 0 || height == 0 {
        0
    } else {
        (height - 1) * stride + width * bytes_per_pixel
    }
}

/// Bytes of destination a rotated `width × height` block spans
pub const fn destination_len(
    rotation: Rotation,
    width: usize,
    height: usize,
    stride: usize,
    bytes_per_pixel: usize,
) -> usize {
    if rotation.swaps_axes() {
        source_len(height, width, stride, bytes_per_pixel)
    } else {
        source_len(width, height, stride, bytes_per_pixel)
    }
}
