//! Image accessors: an image, a border policy and an anchor.

use super::border::{BorderAccessMode, BorderPolicy, Replicated};
use super::interp::{Interpolation, InterpolationMode, sample_with};
use pxl_core::{ImageRead, PixelIndex, PixelType};
use std::fmt;
use std::marker::PhantomData;

/// Integer pixel reads, the input of every [`Interpolation`].
pub trait PixelAccess {
    /// Pixel type returned by reads.
    type Pixel: PixelType;

    /// Reads the pixel at `(x, y)` in this accessor's coordinates.
    fn pixel_at(&self, x: PixelIndex, y: PixelIndex) -> Self::Pixel;
}

/// Reads an image through border policy `B`, with coordinates measured from
/// an anchor pixel.
///
/// A fresh accessor is anchored at `(0, 0)`. [`Accessor::relative`] moves
/// the anchor; the border policy still applies against the bounds of the
/// whole underlying image, not a window around the anchor.
///
/// # Example
///
/// ```rust
/// use pxl_core::prelude::*;
/// use pxl_ops::access::{Accessor, Bilinear, NearestNeighbor};
///
/// let px: Vec<PixelY8> = (1..=9u8).map(|v| PixelY8::new([v * 10])).collect();
/// let img = Image::from_pixels(PixelLength(3), PixelLength(3), &px).unwrap();
///
/// let acc: Accessor<'_, _> = Accessor::new(&img);
/// assert_eq!(acc.sample::<NearestNeighbor>(1.8, 1.6), 90);
/// assert!((acc.sample::<Bilinear>(0.51, 0.0)[0] - 15.1).abs() < 1e-9);
///
/// let shifted = acc.relative(PixelIndex(1), PixelIndex(1));
/// assert_eq!(shifted.sample::<NearestNeighbor>(-1.0, -1.0), 10);
/// ```
pub struct Accessor<'a, I, B = Replicated> {
    image: &'a I,
    anchor_x: PixelIndex,
    anchor_y: PixelIndex,
    _border: PhantomData<B>,
}

impl<'a, I: ImageRead, B: BorderPolicy> Accessor<'a, I, B> {
    /// Accessor over `image`, anchored at `(0, 0)`.
    pub fn new(image: &'a I) -> Self {
        Self {
            image,
            anchor_x: PixelIndex(0),
            anchor_y: PixelIndex(0),
            _border: PhantomData,
        }
    }

    /// The underlying image.
    #[inline]
    pub fn image(&self) -> &'a I {
        self.image
    }

    /// Pixel of the underlying image that this accessor calls `(0, 0)`.
    #[inline]
    pub fn anchor(&self) -> (PixelIndex, PixelIndex) {
        (self.anchor_x, self.anchor_y)
    }

    /// Border policy in effect.
    #[inline]
    pub fn border_mode(&self) -> BorderAccessMode {
        B::MODE
    }

    /// Accessor whose `(x, y)` is this accessor's `(x + ox, y + oy)`.
    ///
    /// Offsets add up, so a relative accessor of a relative accessor is a
    /// single accessor with the combined anchor.
    pub fn relative(&self, ox: PixelIndex, oy: PixelIndex) -> Self {
        Self {
            image: self.image,
            anchor_x: self.anchor_x + ox,
            anchor_y: self.anchor_y + oy,
            _border: PhantomData,
        }
    }

    /// Same image and anchor under another border policy.
    pub fn with_border<C: BorderPolicy>(&self) -> Accessor<'a, I, C> {
        Accessor {
            image: self.image,
            anchor_x: self.anchor_x,
            anchor_y: self.anchor_y,
            _border: PhantomData,
        }
    }

    /// Reads the pixel at integer coordinate `(x, y)`.
    #[inline]
    pub fn get(&self, x: PixelIndex, y: PixelIndex) -> I::Pixel {
        B::access(self.image, x + self.anchor_x, y + self.anchor_y)
    }

    /// Samples at a fractional coordinate with algorithm `M`.
    #[inline]
    pub fn sample<M: Interpolation>(&self, x: f64, y: f64) -> M::Output<I::Pixel> {
        M::interpolate(self, x, y)
    }

    /// Samples with an algorithm chosen at runtime.
    #[inline]
    pub fn sample_with(&self, mode: InterpolationMode, x: f64, y: f64) -> <I::Pixel as PixelType>::WithElement<f64> {
        sample_with(mode, self, x, y)
    }
}

impl<I: ImageRead, B: BorderPolicy> PixelAccess for Accessor<'_, I, B> {
    type Pixel = I::Pixel;

    #[inline]
    fn pixel_at(&self, x: PixelIndex, y: PixelIndex) -> I::Pixel {
        self.get(x, y)
    }
}

impl<I, B> Clone for Accessor<'_, I, B> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<I, B> Copy for Accessor<'_, I, B> {}

impl<I: ImageRead, B: BorderPolicy> fmt::Debug for Accessor<'_, I, B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Accessor")
            .field("layout", self.image.layout())
            .field("anchor", &(self.anchor_x, self.anchor_y))
            .field("border", &B::MODE)
            .finish()
    }
}
