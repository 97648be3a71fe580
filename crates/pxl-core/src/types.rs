//! Index, length and stride newtypes.
//!
//! Pixel coordinates, pixel counts and byte pitches are kept apart at the
//! type level. A width cannot be passed where a stride is expected, and a
//! coordinate is signed (windows and relative accessors move the origin)
//! while a length is not. Coordinate arithmetic saturates.
//!
//! ```rust
//! use pxl_core::{PixelIndex, PixelLength, Stride};
//!
//! let x = PixelIndex(2) + PixelLength(3);
//! assert_eq!(x, PixelIndex(5));
//! assert_eq!(Stride(12).get(), 12);
//! ```

use std::fmt;
use std::ops::{Add, Neg, Sub};

/// A pixel coordinate along one axis. May be negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PixelIndex(pub i32);

/// A number of pixels along one axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PixelLength(pub u32);

/// Distance in bytes between the starts of two consecutive rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Stride(pub usize);

impl PixelIndex {
    /// Raw coordinate.
    #[inline]
    pub const fn get(self) -> i32 {
        self.0
    }

    /// Coordinate as a buffer offset, or `None` if negative.
    #[inline]
    pub fn to_usize(self) -> Option<usize> {
        usize::try_from(self.0).ok()
    }

    /// Clamps the coordinate into `[0, len)`. `len` must be non-zero.
    #[inline]
    pub fn clamp_to(self, len: PixelLength) -> PixelIndex {
        let max = len.0.saturating_sub(1).min(i32::MAX as u32) as i32;
        PixelIndex(self.0.clamp(0, max))
    }

    /// Whether the coordinate lies in `[0, len)`.
    #[inline]
    pub fn is_within(self, len: PixelLength) -> bool {
        self.0 >= 0 && (self.0 as u32) < len.0
    }
}

impl PixelLength {
    /// Raw length.
    #[inline]
    pub const fn get(self) -> u32 {
        self.0
    }

    /// Length as a count usable for buffer arithmetic.
    #[inline]
    pub const fn to_usize(self) -> usize {
        self.0 as usize
    }

    /// Whether the length is zero.
    #[inline]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }
}

impl Stride {
    /// Raw byte count.
    #[inline]
    pub const fn get(self) -> usize {
        self.0
    }
}

impl Add for PixelIndex {
    type Output = PixelIndex;

    #[inline]
    fn add(self, rhs: PixelIndex) -> PixelIndex {
        PixelIndex(self.0.saturating_add(rhs.0))
    }
}

impl Sub for PixelIndex {
    type Output = PixelIndex;

    #[inline]
    fn sub(self, rhs: PixelIndex) -> PixelIndex {
        PixelIndex(self.0.saturating_sub(rhs.0))
    }
}

impl Neg for PixelIndex {
    type Output = PixelIndex;

    #[inline]
    fn neg(self) -> PixelIndex {
        PixelIndex(self.0.saturating_neg())
    }
}

impl Add<PixelLength> for PixelIndex {
    type Output = PixelIndex;

    #[inline]
    fn add(self, rhs: PixelLength) -> PixelIndex {
        PixelIndex(self.0.saturating_add_unsigned(rhs.0))
    }
}

impl fmt::Display for PixelIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl fmt::Display for PixelLength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl fmt::Display for Stride {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} bytes", self.0)
    }
}
