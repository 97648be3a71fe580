//! Error types for conversion and sampling operations.

use pxl_core::{PixelFormat, SampleFormat};
use thiserror::Error;

/// Error type for image operations.
#[derive(Error, Debug)]
pub enum OpsError {
    /// Error from the image data model (layout, shape, allocation, casts).
    #[error(transparent)]
    Core(#[from] pxl_core::Error),

    /// The format pair is not in the conversion table.
    #[error("unsupported conversion: {src} -> {dst}")]
    UnsupportedConversion {
        /// Source format
        src: PixelFormat,
        /// Target format
        dst: PixelFormat,
    },

    /// The conversion adds an alpha channel but no alpha value was given.
    #[error("conversion {src} -> {dst} requires an alpha value")]
    AlphaRequired {
        /// Source format
        src: PixelFormat,
        /// Target format
        dst: PixelFormat,
    },

    /// An alpha value was given for a conversion that takes none.
    #[error("conversion {src} -> {dst} takes no alpha value")]
    UnexpectedAlpha {
        /// Source format
        src: PixelFormat,
        /// Target format
        dst: PixelFormat,
    },

    /// No element type matches the runtime sample description.
    #[error("unsupported sample type: {sample_format} with {bytes_per_channel} bytes per channel")]
    UnsupportedSampleType {
        /// Sample format
        sample_format: SampleFormat,
        /// Bytes per channel
        bytes_per_channel: u16,
    },
}

impl OpsError {
    /// Returns `true` for a source/destination shape mismatch.
    pub fn is_shape_mismatch(&self) -> bool {
        matches!(self, Self::Core(pxl_core::Error::DimensionMismatch { .. }))
    }
}

/// Result type for image operations.
pub type OpsResult<T> = Result<T, OpsError>;
