//! Byte layout of a 2D image buffer.
//!
//! An [`ImageLayout`] describes how a grid of pixels maps onto a byte buffer
//! whose rows are contiguous but may be padded:
//!
//! ```text
//! |<-------------- stride --------------->|
//! |<------- row_bytes ------->|           |
//! [ px px px px ... px px px px  padding  ]  row 0
//! [ px px px px ... px px px px  padding  ]  row 1
//! ```
//!
//! The invariant `stride >= width * channels * bytes_per_channel` holds for
//! every layout; constructors reject anything smaller.
//!
//! # Usage
//!
//! ```rust
//! use pxl_core::{ImageLayout, PixelLength, RowAlignment, Stride};
//!
//! let packed = ImageLayout::new(PixelLength(5), PixelLength(2), 3, 1);
//! assert_eq!(packed.stride(), Stride(15));
//! assert!(packed.is_packed());
//!
//! let aligned = ImageLayout::with_alignment(
//!     PixelLength(5), PixelLength(2), 3, 1, RowAlignment::bytes(16),
//! ).unwrap();
//! assert_eq!(aligned.stride(), Stride(16));
//! assert!(!aligned.is_packed());
//!
//! assert!(ImageLayout::with_stride(PixelLength(5), PixelLength(2), 3, 1, Stride(14)).is_err());
//! ```

use crate::error::{Error, Result};
use crate::pixel::PixelType;
use crate::types::{PixelIndex, PixelLength, Stride};

/// Row alignment requested when allocating an image.
///
/// The stride is rounded up to the next multiple of the alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RowAlignment(usize);

impl RowAlignment {
    /// No padding: stride equals the packed row size.
    pub const PACKED: RowAlignment = RowAlignment(1);

    /// Alignment to `n` bytes. Zero is treated as packed.
    #[inline]
    pub const fn bytes(n: usize) -> Self {
        if n == 0 { Self::PACKED } else { Self(n) }
    }

    /// Alignment in bytes.
    #[inline]
    pub const fn get(self) -> usize {
        self.0
    }

    fn align(self, row_bytes: usize) -> Option<usize> {
        row_bytes.div_ceil(self.0).checked_mul(self.0)
    }
}

impl Default for RowAlignment {
    fn default() -> Self {
        Self::PACKED
    }
}

/// Geometry and byte layout of an image.
///
/// Owning images need `stride * height` bytes; views only need the bytes up
/// to the end of the last row (see [`view_bytes`](Self::view_bytes)).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ImageLayout {
    width: PixelLength,
    height: PixelLength,
    channels: u16,
    bytes_per_channel: u16,
    stride: Stride,
}

impl ImageLayout {
    /// Packed layout (no row padding).
    ///
    /// A row size that overflows `usize` saturates the stride to
    /// `usize::MAX`; such a layout fails [`validate`](Self::validate) and
    /// every allocation. Use [`try_new`](Self::try_new) to reject it here.
    pub fn new(width: PixelLength, height: PixelLength, channels: u16, bytes_per_channel: u16) -> Self {
        let row = packed_row_bytes(width, channels, bytes_per_channel).unwrap_or(usize::MAX);
        Self {
            width,
            height,
            channels,
            bytes_per_channel,
            stride: Stride(row),
        }
    }

    /// Packed layout, failing when the row size overflows.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidDimensions`] if `width * channels * bytes_per_channel`
    /// does not fit in `usize`.
    pub fn try_new(width: PixelLength, height: PixelLength, channels: u16, bytes_per_channel: u16) -> Result<Self> {
        let row = packed_row_bytes(width, channels, bytes_per_channel)
            .ok_or_else(|| Error::invalid_dimensions(width.0, height.0, "row size overflows"))?;
        Ok(Self {
            width,
            height,
            channels,
            bytes_per_channel,
            stride: Stride(row),
        })
    }

    /// Layout with an explicit stride.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidStride`] if `stride` is below the packed row size.
    pub fn with_stride(
        width: PixelLength,
        height: PixelLength,
        channels: u16,
        bytes_per_channel: u16,
        stride: Stride,
    ) -> Result<Self> {
        let min_stride = packed_row_bytes(width, channels, bytes_per_channel)
            .ok_or_else(|| Error::invalid_dimensions(width.0, height.0, "row size overflows"))?;
        if stride.0 < min_stride {
            return Err(Error::InvalidStride {
                stride: stride.0,
                min_stride,
                width: width.0,
            });
        }
        Ok(Self {
            width,
            height,
            channels,
            bytes_per_channel,
            stride,
        })
    }

    /// Layout whose stride is the packed row size rounded up to `alignment`.
    pub fn with_alignment(
        width: PixelLength,
        height: PixelLength,
        channels: u16,
        bytes_per_channel: u16,
        alignment: RowAlignment,
    ) -> Result<Self> {
        let stride = packed_row_bytes(width, channels, bytes_per_channel)
            .and_then(|row| alignment.align(row))
            .ok_or_else(|| Error::invalid_dimensions(width.0, height.0, "row size overflows"))?;
        Self::with_stride(width, height, channels, bytes_per_channel, Stride(stride))
    }

    /// Packed layout for pixel type `P`.
    pub fn typed<P: PixelType>(width: PixelLength, height: PixelLength) -> Self {
        let (channels, bpc) = pixel_shape::<P>();
        Self::new(width, height, channels, bpc)
    }

    /// Layout for pixel type `P` with an explicit stride.
    pub fn typed_with_stride<P: PixelType>(
        width: PixelLength,
        height: PixelLength,
        stride: Stride,
    ) -> Result<Self> {
        let (channels, bpc) = pixel_shape::<P>();
        Self::with_stride(width, height, channels, bpc, stride)
    }

    /// The empty layout (all zero).
    #[inline]
    pub const fn empty() -> Self {
        Self {
            width: PixelLength(0),
            height: PixelLength(0),
            channels: 0,
            bytes_per_channel: 0,
            stride: Stride(0),
        }
    }

    /// Same geometry and stride with another pixel shape, validated again.
    pub fn reshaped(&self, channels: u16, bytes_per_channel: u16) -> Result<Self> {
        Self::with_stride(self.width, self.height, channels, bytes_per_channel, self.stride)
    }

    /// Same pixel shape and stride with other dimensions, validated again.
    pub fn resized(&self, width: PixelLength, height: PixelLength) -> Result<Self> {
        Self::with_stride(width, height, self.channels, self.bytes_per_channel, self.stride)
    }

    /// Width in pixels.
    #[inline]
    pub const fn width(&self) -> PixelLength {
        self.width
    }

    /// Height in pixels.
    #[inline]
    pub const fn height(&self) -> PixelLength {
        self.height
    }

    /// Channels per pixel.
    #[inline]
    pub const fn channels(&self) -> u16 {
        self.channels
    }

    /// Bytes per channel.
    #[inline]
    pub const fn bytes_per_channel(&self) -> u16 {
        self.bytes_per_channel
    }

    /// Bytes between consecutive row starts.
    #[inline]
    pub const fn stride(&self) -> Stride {
        self.stride
    }

    /// Bytes per pixel.
    #[inline]
    pub const fn pixel_bytes(&self) -> usize {
        self.channels as usize * self.bytes_per_channel as usize
    }

    /// Bytes of pixel data in one row, excluding padding.
    ///
    /// Saturates at `usize::MAX`; see [`checked_row_bytes`](Self::checked_row_bytes).
    #[inline]
    pub const fn row_bytes(&self) -> usize {
        (self.width.0 as usize).saturating_mul(self.pixel_bytes())
    }

    /// Bytes of pixel data in one row, or `None` on overflow.
    #[inline]
    pub const fn checked_row_bytes(&self) -> Option<usize> {
        (self.width.0 as usize).checked_mul(self.pixel_bytes())
    }

    /// Whether rows carry no padding.
    #[inline]
    pub const fn is_packed(&self) -> bool {
        self.stride.0 == self.row_bytes()
    }

    /// Whether the layout covers no pixels.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.width.0 == 0 || self.height.0 == 0
    }

    /// Bytes owned by an image with this layout: `stride * height`.
    #[inline]
    pub fn total_bytes(&self) -> Option<usize> {
        self.stride.0.checked_mul(self.height.to_usize())
    }

    /// Bytes a view with this layout must reference: up to the end of the
    /// last row, without the trailing padding.
    pub fn view_bytes(&self) -> Option<usize> {
        if self.is_empty() {
            return Some(0);
        }
        self.stride
            .0
            .checked_mul(self.height.to_usize() - 1)?
            .checked_add(self.row_bytes())
    }

    /// Byte offset of the pixel at `(x, y)`, or `None` if outside the layout.
    #[inline]
    pub fn byte_offset(&self, x: PixelIndex, y: PixelIndex) -> Option<usize> {
        if !x.is_within(self.width) || !y.is_within(self.height) {
            return None;
        }
        Some(y.0 as usize * self.stride.0 + x.0 as usize * self.pixel_bytes())
    }

    /// Checks that the layout describes a non-empty, addressable image.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidDimensions`] for zero-sized or overflowing layouts.
    pub fn validate(&self) -> Result<()> {
        if self.is_empty() || self.channels == 0 || self.bytes_per_channel == 0 {
            return Err(Error::invalid_dimensions(
                self.width.0,
                self.height.0,
                "width, height, channels and bytes per channel must be non-zero",
            ));
        }
        let row = self
            .checked_row_bytes()
            .ok_or_else(|| Error::invalid_dimensions(self.width.0, self.height.0, "row size overflows"))?;
        if self.total_bytes().is_none() || self.stride.0 < row {
            return Err(Error::invalid_dimensions(
                self.width.0,
                self.height.0,
                "buffer size overflows",
            ));
        }
        Ok(())
    }
}

impl std::fmt::Display for ImageLayout {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}x{}x{} @ {}B/ch, stride {}",
            self.width, self.height, self.channels, self.bytes_per_channel, self.stride
        )
    }
}

fn packed_row_bytes(width: PixelLength, channels: u16, bytes_per_channel: u16) -> Option<usize> {
    width
        .to_usize()
        .checked_mul(channels as usize)?
        .checked_mul(bytes_per_channel as usize)
}

pub(crate) fn pixel_shape<P: PixelType>() -> (u16, u16) {
    (
        P::CHANNELS as u16,
        std::mem::size_of::<P::Element>() as u16,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pixel::{PixelRgb8, PixelRgbaF32};

    #[test]
    fn test_packed_layout() {
        let l = ImageLayout::new(PixelLength(10), PixelLength(4), 3, 2);
        assert_eq!(l.row_bytes(), 60);
        assert_eq!(l.stride(), Stride(60));
        assert_eq!(l.total_bytes(), Some(240));
        assert!(l.is_packed());
        assert!(l.validate().is_ok());
    }

    #[test]
    fn test_stride_below_packed_fails() {
        let err = ImageLayout::with_stride(PixelLength(10), PixelLength(4), 3, 1, Stride(29)).unwrap_err();
        assert!(matches!(err, Error::InvalidStride { min_stride: 30, .. }));
    }

    #[test]
    fn test_padded_layout() {
        let l = ImageLayout::with_stride(PixelLength(10), PixelLength(4), 3, 1, Stride(32)).unwrap();
        assert!(!l.is_packed());
        assert_eq!(l.total_bytes(), Some(128));
        assert_eq!(l.view_bytes(), Some(32 * 3 + 30));
        assert_eq!(l.byte_offset(PixelIndex(2), PixelIndex(1)), Some(38));
        assert_eq!(l.byte_offset(PixelIndex(10), PixelIndex(0)), None);
    }

    #[test]
    fn test_alignment_rounds_up() {
        let l = ImageLayout::with_alignment(PixelLength(7), PixelLength(2), 1, 1, RowAlignment::bytes(16)).unwrap();
        assert_eq!(l.stride(), Stride(16));
        let l = ImageLayout::with_alignment(PixelLength(8), PixelLength(2), 2, 1, RowAlignment::bytes(16)).unwrap();
        assert_eq!(l.stride(), Stride(16));
        assert_eq!(RowAlignment::bytes(0), RowAlignment::PACKED);
    }

    #[test]
    fn test_typed_layout() {
        let l = ImageLayout::typed::<PixelRgbaF32>(PixelLength(2), PixelLength(2));
        assert_eq!(l.channels(), 4);
        assert_eq!(l.bytes_per_channel(), 4);
        assert_eq!(l.stride(), Stride(32));
        let l = ImageLayout::typed::<PixelRgb8>(PixelLength(3), PixelLength(1));
        assert_eq!(l.pixel_bytes(), 3);
    }

    #[test]
    fn test_empty_layout_is_invalid() {
        assert!(ImageLayout::empty().is_empty());
        assert!(ImageLayout::empty().validate().is_err());
        assert_eq!(ImageLayout::empty().view_bytes(), Some(0));
        let l = ImageLayout::new(PixelLength(0), PixelLength(4), 1, 1);
        assert!(l.validate().unwrap_err().is_layout_error());
    }

    #[test]
    fn test_try_new() {
        let l = ImageLayout::try_new(PixelLength(10), PixelLength(4), 3, 2).unwrap();
        assert_eq!(l, ImageLayout::new(PixelLength(10), PixelLength(4), 3, 2));
        assert_eq!(l.checked_row_bytes(), Some(60));
    }

    // A u32 width times a u16 pixel shape only overflows a 32-bit usize.
    #[cfg(target_pointer_width = "32")]
    #[test]
    fn test_row_overflow_rejected() {
        let err = ImageLayout::try_new(PixelLength(u32::MAX), PixelLength(1), 4, 8).unwrap_err();
        assert!(matches!(err, Error::InvalidDimensions { .. }));

        let l = ImageLayout::new(PixelLength(u32::MAX), PixelLength(1), 4, 8);
        assert_eq!(l.stride(), Stride(usize::MAX));
        assert_eq!(l.row_bytes(), usize::MAX);
        assert_eq!(l.checked_row_bytes(), None);
        assert!(l.validate().is_err());
    }
}
