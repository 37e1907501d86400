//! Error types for the screen
//!
//! This module defines error types for configuration building ([`BuilderError`]),
//! source image construction ([`ImageError`]) and screen operations ([`Error`]).
//!
//! Unsupported pixel formats are deliberately absent: a blit that cannot be
//! dispatched is skipped and reported through
//! [`BlitOutcome::Unsupported`](crate::blit::BlitOutcome::Unsupported).
//!
//! ## Example
//!
//! ```
//! use transformed_screen::{BuilderError, PanelGeometry};
//!
//! // A single panel cannot be page flipped
//! let result = PanelGeometry::new(480, 1);
//! assert!(matches!(result, Err(BuilderError::InvalidPanelGeometry { .. })));
//! ```

use crate::interface::PageFlip;

/// Errors that can occur during screen operations
///
/// Generic over the page flip device to preserve its specific error type.
#[derive(Debug)]
pub enum Error<P: PageFlip> {
    /// Page flip (mode-set) error
    ///
    /// Wraps the error from the [`PageFlip`] device. The framebuffer contents
    /// were written but the display offset could not be moved, so the screen
    /// is no longer under control.
    PageFlip(P::Error),
    /// A rotated copy would run past the end of the framebuffer
    ///
    /// The backend's framebuffer is smaller than its reported size, linestep
    /// and panel geometry imply.
    FramebufferTooSmall {
        /// Required framebuffer size in bytes
        required: usize,
        /// Framebuffer size in bytes
        provided: usize,
    },
}

impl<P: PageFlip> core::fmt::Display for Error<P> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::PageFlip(e) => write!(f, "Page flip failed: {e:?}"),
            Self::FramebufferTooSmall { required, provided } => {
                write!(
                    f,
                    "Framebuffer too small: required {required} bytes, provided {provided}"
                )
            }
        }
    }
}

impl<P: PageFlip + core::fmt::Debug> core::error::Error for Error<P> {}

/// Errors that can occur when building configuration
#[derive(Debug, PartialEq, Eq)]
pub enum BuilderError {
    /// Panel geometry cannot be page flipped
    ///
    /// See [`PanelGeometry::new()`](crate::config::PanelGeometry::new) for constraints.
    InvalidPanelGeometry {
        /// Rows per panel requested
        rows_per_panel: u32,
        /// Number of panels requested
        panel_count: u32,
    },
    /// Page flipping was requested but the configuration has no panel geometry
    ///
    /// [`Builder::panels()`](crate::config::Builder::panels) must be called
    /// before attaching a page flip device.
    MissingPanelGeometry,
}

impl core::fmt::Display for BuilderError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::InvalidPanelGeometry {
                rows_per_panel,
                panel_count,
            } => write!(
                f,
                "Invalid panel geometry: {panel_count} panels of {rows_per_panel} rows (need at least 2 panels of 1 row)"
            ),
            Self::MissingPanelGeometry => write!(f, "Panel geometry must be specified"),
        }
    }
}

impl core::error::Error for BuilderError {}

/// Errors that can occur when wrapping source image data
#[derive(Debug, PartialEq, Eq)]
pub enum ImageError {
    /// Row stride cannot hold one row of pixels
    StrideTooSmall {
        /// Bytes needed for one row
        required: usize,
        /// Stride provided
        provided: usize,
    },
    /// Buffer is too small for the image
    BufferTooSmall {
        /// Required buffer size in bytes
        required: usize,
        /// Provided buffer size in bytes
        provided: usize,
    },
}

impl core::fmt::Display for ImageError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::StrideTooSmall { required, provided } => write!(
                f,
                "Image stride too small: required {required} bytes, provided {provided}"
            ),
            Self::BufferTooSmall { required, provided } => write!(
                f,
                "Image buffer too small: required {required} bytes, provided {provided}"
            ),
        }
    }
}

impl core::error::Error for ImageError {}
