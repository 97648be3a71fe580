//! Error types for pxl-core operations.
//!
//! The [`Error`] enum covers every recoverable failure of the image data
//! model:
//! - Layout construction (zero sizes, stride below the packed minimum)
//! - Buffer allocation and reinterpretation (alignment, size)
//! - Windowing (regions outside the image)
//! - The dynamic/typed boundary (channel count, element size, formats)
//!
//! # Usage
//!
//! ```rust
//! use pxl_core::{Error, Result};
//!
//! fn check_stride(stride: usize, min_stride: usize, width: u32) -> Result<()> {
//!     if stride < min_stride {
//!         return Err(Error::InvalidStride { stride, min_stride, width });
//!     }
//!     Ok(())
//! }
//! assert!(check_stride(8, 12, 4).is_err());
//! ```
//!
//! # Dependencies
//!
//! - [`thiserror`] - For derive macro error implementation

use crate::format::{PixelFormat, SampleFormat};
use thiserror::Error;

/// Result type alias using [`Error`] as the error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while constructing, viewing or casting images.
///
/// # Categories
///
/// - **Layout errors**: [`InvalidDimensions`](Error::InvalidDimensions),
///   [`InvalidStride`](Error::InvalidStride), [`MisalignedStride`](Error::MisalignedStride)
/// - **Buffer errors**: [`AllocationFailed`](Error::AllocationFailed),
///   [`BufferTooSmall`](Error::BufferTooSmall), [`MisalignedBuffer`](Error::MisalignedBuffer)
/// - **Region errors**: [`InvalidRegion`](Error::InvalidRegion),
///   [`DimensionMismatch`](Error::DimensionMismatch)
/// - **Format errors**: [`ChannelMismatch`](Error::ChannelMismatch),
///   [`ElementSizeMismatch`](Error::ElementSizeMismatch),
///   [`SampleFormatMismatch`](Error::SampleFormatMismatch),
///   [`PixelFormatMismatch`](Error::PixelFormatMismatch),
///   [`UnsupportedFormat`](Error::UnsupportedFormat)
#[derive(Debug, Error)]
pub enum Error {
    /// Zero-sized or overflowing image dimensions.
    #[error("invalid dimensions: {width}x{height} ({reason})")]
    InvalidDimensions {
        /// Requested width
        width: u32,
        /// Requested height
        height: u32,
        /// Reason why dimensions are invalid
        reason: String,
    },

    /// Stride is too small for the given width and pixel size.
    ///
    /// The stride must be at least `width * channels * bytes_per_channel`.
    #[error("stride {stride} is less than minimum {min_stride} for width {width}")]
    InvalidStride {
        /// Provided stride
        stride: usize,
        /// Minimum required stride
        min_stride: usize,
        /// Image width
        width: u32,
    },

    /// Stride is not a multiple of the element size of a typed image.
    #[error("stride {stride} is not a multiple of the element size {element_size}")]
    MisalignedStride {
        /// Provided stride
        stride: usize,
        /// Element size in bytes
        element_size: usize,
    },

    /// Byte buffer start is not aligned for the element type.
    #[error("buffer is not aligned to {align} bytes")]
    MisalignedBuffer {
        /// Required alignment
        align: usize,
    },

    /// Byte buffer is shorter than the layout requires.
    #[error("buffer too small: need {needed} bytes, got {actual}")]
    BufferTooSmall {
        /// Bytes required by the layout
        needed: usize,
        /// Bytes provided
        actual: usize,
    },

    /// Memory allocation failed.
    #[error("failed to allocate {requested} bytes: {reason}")]
    AllocationFailed {
        /// Bytes requested
        requested: usize,
        /// Failure reason
        reason: String,
    },

    /// Region extends beyond image bounds.
    #[error("region ({rx}, {ry}, {rw}x{rh}) exceeds image bounds {width}x{height}")]
    InvalidRegion {
        /// Region X origin
        rx: i32,
        /// Region Y origin
        ry: i32,
        /// Region width
        rw: u32,
        /// Region height
        rh: u32,
        /// Image width
        width: u32,
        /// Image height
        height: u32,
    },

    /// Two images that must share a shape do not.
    #[error("dimension mismatch: {a_width}x{a_height} vs {b_width}x{b_height}")]
    DimensionMismatch {
        /// First image width
        a_width: u32,
        /// First image height
        a_height: u32,
        /// Second image width
        b_width: u32,
        /// Second image height
        b_height: u32,
    },

    /// Channel count of a layout disagrees with the pixel type.
    #[error("channel mismatch: expected {expected}, got {got}")]
    ChannelMismatch {
        /// Expected channel count
        expected: u16,
        /// Actual channel count
        got: u16,
    },

    /// Bytes per channel of a layout disagree with the element type.
    #[error("element size mismatch: expected {expected} bytes, got {got}")]
    ElementSizeMismatch {
        /// Expected bytes per channel
        expected: u16,
        /// Actual bytes per channel
        got: u16,
    },

    /// Sample format of a dynamic image disagrees with the element type.
    #[error("sample format mismatch: expected {expected}, got {got}")]
    SampleFormatMismatch {
        /// Expected sample format
        expected: SampleFormat,
        /// Actual sample format
        got: SampleFormat,
    },

    /// Pixel format of a dynamic image disagrees with the pixel type.
    #[error("pixel format mismatch: expected {expected}, got {got}")]
    PixelFormatMismatch {
        /// Expected pixel format
        expected: PixelFormat,
        /// Actual pixel format
        got: PixelFormat,
    },

    /// Format is not supported for this operation.
    #[error("unsupported format: {format}")]
    UnsupportedFormat {
        /// Format name or description
        format: String,
    },
}

impl Error {
    /// Creates an [`Error::InvalidDimensions`] error.
    #[inline]
    pub fn invalid_dimensions(width: u32, height: u32, reason: impl Into<String>) -> Self {
        Self::InvalidDimensions {
            width,
            height,
            reason: reason.into(),
        }
    }

    /// Creates an [`Error::AllocationFailed`] error.
    #[inline]
    pub fn allocation_failed(requested: usize, reason: impl Into<String>) -> Self {
        Self::AllocationFailed {
            requested,
            reason: reason.into(),
        }
    }

    /// Creates an [`Error::InvalidRegion`] error.
    #[inline]
    pub fn invalid_region(rx: i32, ry: i32, rw: u32, rh: u32, width: u32, height: u32) -> Self {
        Self::InvalidRegion {
            rx,
            ry,
            rw,
            rh,
            width,
            height,
        }
    }

    /// Creates an [`Error::DimensionMismatch`] error.
    #[inline]
    pub fn dimension_mismatch(a: (u32, u32), b: (u32, u32)) -> Self {
        Self::DimensionMismatch {
            a_width: a.0,
            a_height: a.1,
            b_width: b.0,
            b_height: b.1,
        }
    }

    /// Creates an [`Error::ChannelMismatch`] error.
    #[inline]
    pub fn channel_mismatch(expected: u16, got: u16) -> Self {
        Self::ChannelMismatch { expected, got }
    }

    /// Creates an [`Error::UnsupportedFormat`] error.
    #[inline]
    pub fn unsupported_format(format: impl Into<String>) -> Self {
        Self::UnsupportedFormat {
            format: format.into(),
        }
    }

    /// Returns `true` if this error stems from an invalid layout or buffer.
    #[inline]
    pub fn is_layout_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidDimensions { .. }
                | Self::InvalidStride { .. }
                | Self::MisalignedStride { .. }
                | Self::MisalignedBuffer { .. }
                | Self::BufferTooSmall { .. }
        )
    }

    /// Returns `true` if this error stems from a format disagreement.
    #[inline]
    pub fn is_format_error(&self) -> bool {
        matches!(
            self,
            Self::ChannelMismatch { .. }
                | Self::ElementSizeMismatch { .. }
                | Self::SampleFormatMismatch { .. }
                | Self::PixelFormatMismatch { .. }
                | Self::UnsupportedFormat { .. }
        )
    }

    /// Returns `true` if this is an allocation error.
    #[inline]
    pub fn is_allocation_error(&self) -> bool {
        matches!(self, Self::AllocationFailed { .. })
    }
}
