//! Border policies: what a pixel read outside the image returns.

use pxl_core::{ImageRead, PixelIndex, PixelType};

/// Runtime counterpart of the [`BorderPolicy`] types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BorderAccessMode {
    /// Coordinates must be inside the image; reads outside panic.
    Unchecked,
    /// Reads outside the image return the all-zero pixel.
    ZeroPadding,
    /// Coordinates clamp to the nearest edge pixel.
    #[default]
    Replicated,
}

/// Resolves integer pixel reads against the image bounds.
pub trait BorderPolicy: Copy + Default + Send + Sync + 'static {
    /// Runtime tag of the policy.
    const MODE: BorderAccessMode;

    /// Reads the pixel at `(x, y)`.
    fn access<I: ImageRead>(img: &I, x: PixelIndex, y: PixelIndex) -> I::Pixel;
}

/// No bounds handling. Callers validate coordinates beforehand.
#[derive(Debug, Clone, Copy, Default)]
pub struct Unchecked;

/// Outside reads return zero.
#[derive(Debug, Clone, Copy, Default)]
pub struct ZeroPadding;

/// Outside reads return the nearest edge pixel.
#[derive(Debug, Clone, Copy, Default)]
pub struct Replicated;

impl BorderPolicy for Unchecked {
    const MODE: BorderAccessMode = BorderAccessMode::Unchecked;

    /// # Panics
    ///
    /// Panics if `(x, y)` is outside the image.
    #[inline]
    fn access<I: ImageRead>(img: &I, x: PixelIndex, y: PixelIndex) -> I::Pixel {
        *img.pixel(x, y)
    }
}

impl BorderPolicy for ZeroPadding {
    const MODE: BorderAccessMode = BorderAccessMode::ZeroPadding;

    #[inline]
    fn access<I: ImageRead>(img: &I, x: PixelIndex, y: PixelIndex) -> I::Pixel {
        img.get(x, y).copied().unwrap_or_else(I::Pixel::zero)
    }
}

impl BorderPolicy for Replicated {
    const MODE: BorderAccessMode = BorderAccessMode::Replicated;

    /// Empty images have no edge; they read as zero.
    #[inline]
    fn access<I: ImageRead>(img: &I, x: PixelIndex, y: PixelIndex) -> I::Pixel {
        if img.is_empty() {
            return I::Pixel::zero();
        }
        *img.pixel(x.clamp_to(img.width()), y.clamp_to(img.height()))
    }
}

/// Reads `(x, y)` with a policy chosen at runtime.
///
/// ```rust
/// use pxl_core::prelude::*;
/// use pxl_ops::access::{BorderAccessMode, access_with};
///
/// let img = Image::filled(PixelLength(2), PixelLength(2), PixelY8::new([7])).unwrap();
/// let (x, y) = (PixelIndex(-3), PixelIndex(0));
/// assert_eq!(access_with(BorderAccessMode::Replicated, &img, x, y), 7);
/// assert_eq!(access_with(BorderAccessMode::ZeroPadding, &img, x, y), 0);
/// ```
pub fn access_with<I: ImageRead>(mode: BorderAccessMode, img: &I, x: PixelIndex, y: PixelIndex) -> I::Pixel {
    match mode {
        BorderAccessMode::Unchecked => Unchecked::access(img, x, y),
        BorderAccessMode::ZeroPadding => ZeroPadding::access(img, x, y),
        BorderAccessMode::Replicated => Replicated::access(img, x, y),
    }
}
