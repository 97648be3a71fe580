//! Pixel and element types.
//!
//! # Types
//!
//! - [`Element`] - Trait for per-channel sample types (u8, u16, f16, f32, ...)
//! - [`Pixel`] - Fixed-size array of `N` elements tagged with a format
//! - [`PixelType`] - Compile-time description `{element, channels, format}`
//!   of anything stored in an image
//!
//! # Design
//!
//! Pixels are parameterized by:
//! 1. **Element** (`T: Element`) - the numeric sample type
//! 2. **Channel count** (`N`) - a const generic
//! 3. **Format tag** (`F: FormatTag`) - compile-time semantic tag
//!
//! ```
//! use pxl_core::prelude::*;
//!
//! let px: PixelRgb8 = Pixel::new([255, 128, 64]);
//! assert_eq!(px[0], 255);
//! assert_eq!(PixelRgb8::FORMAT, PixelFormat::Rgb);
//! assert_eq!(PixelRgb8::CHANNELS, 3);
//! ```
//!
//! # Memory Layout
//!
//! [`Pixel`] is `#[repr(transparent)]` over `[T; N]`, so a row of pixels is
//! exactly a row of interleaved samples. This makes zero-copy
//! reinterpretation of image rows sound (via [`bytemuck`]).

use crate::format::{FormatTag, PixelFormat, SampleFormat, tag};
use bytemuck::{Pod, Zeroable};
use half::f16;
use std::fmt;
use std::marker::PhantomData;
use std::ops::{Index, IndexMut};

/// Trait for per-channel sample types.
///
/// # Required Methods
///
/// - [`to_f64`](Element::to_f64) - Widen to `f64` without normalization
/// - [`from_f64`](Element::from_f64) - Narrow from `f64`; integers round to
///   nearest (half away from zero) and saturate
///
/// # Example
///
/// ```
/// use pxl_core::Element;
///
/// assert_eq!(u8::from_f64(10.69), 11);
/// assert_eq!(u8::from_f64(300.0), 255);
/// assert_eq!(f32::from_f64(0.25), 0.25);
/// ```
pub trait Element:
    Pod + Default + PartialEq + PartialOrd + fmt::Debug + Send + Sync + 'static
{
    /// Runtime sample format tag.
    const SAMPLE_FORMAT: SampleFormat;

    /// Size of one sample in bytes.
    const BYTES: usize = std::mem::size_of::<Self>();

    /// Whether this is a floating-point type.
    const IS_FLOAT: bool;

    /// Widens the sample to `f64`.
    fn to_f64(self) -> f64;

    /// Narrows an `f64` into this sample type.
    fn from_f64(v: f64) -> Self;
}

macro_rules! integer_elements {
    ($($t:ty => $sample:ident),* $(,)?) => {
        $(
            impl Element for $t {
                const SAMPLE_FORMAT: SampleFormat = SampleFormat::$sample;
                const IS_FLOAT: bool = false;

                #[inline]
                fn to_f64(self) -> f64 {
                    self as f64
                }

                #[inline]
                fn from_f64(v: f64) -> Self {
                    // `as` saturates and maps NaN to zero
                    v.round() as $t
                }
            }
        )*
    };
}

integer_elements! {
    u8 => UnsignedInteger,
    u16 => UnsignedInteger,
    u32 => UnsignedInteger,
    i8 => SignedInteger,
    i16 => SignedInteger,
    i32 => SignedInteger,
}

impl Element for f16 {
    const SAMPLE_FORMAT: SampleFormat = SampleFormat::FloatingPoint;
    const IS_FLOAT: bool = true;

    #[inline]
    fn to_f64(self) -> f64 {
        f16::to_f64(self)
    }

    #[inline]
    fn from_f64(v: f64) -> Self {
        f16::from_f64(v)
    }
}

impl Element for f32 {
    const SAMPLE_FORMAT: SampleFormat = SampleFormat::FloatingPoint;
    const IS_FLOAT: bool = true;

    #[inline]
    fn to_f64(self) -> f64 {
        self as f64
    }

    #[inline]
    fn from_f64(v: f64) -> Self {
        v as f32
    }
}

impl Element for f64 {
    const SAMPLE_FORMAT: SampleFormat = SampleFormat::FloatingPoint;
    const IS_FLOAT: bool = true;

    #[inline]
    fn to_f64(self) -> f64 {
        self
    }

    #[inline]
    fn from_f64(v: f64) -> Self {
        v
    }
}

/// Compile-time description of a pixel stored in an image.
///
/// A typed image's runtime layout always has `CHANNELS` channels of
/// `size_of::<Element>()` bytes each.
pub trait PixelType: Pod + PartialEq + fmt::Debug + Send + Sync {
    /// Per-channel sample type.
    type Element: Element;

    /// Compile-time format tag.
    type Format: FormatTag;

    /// Same channel count and format with another element type.
    type WithElement<U: Element>: PixelType<Element = U, Format = Self::Format>;

    /// Number of channels.
    const CHANNELS: usize;

    /// Runtime pixel format.
    const FORMAT: PixelFormat = <Self::Format as FormatTag>::FORMAT;

    /// Channel values in memory order.
    fn channels(&self) -> &[Self::Element];

    /// Mutable channel values in memory order.
    fn channels_mut(&mut self) -> &mut [Self::Element];

    /// The all-zero pixel.
    #[inline]
    fn zero() -> Self {
        <Self as Zeroable>::zeroed()
    }
}

/// A pixel: `N` samples of type `T`, tagged with format `F`.
///
/// Equality is element-wise; the format tag is part of the type, so pixels
/// of different formats never compare.
///
/// # Example
///
/// ```
/// use pxl_core::prelude::*;
///
/// let a: Pixel<u8, 3> = Pixel::new([10, 11, 12]);
/// let b = Pixel::<u8, 3>::from([10, 11, 12]);
/// assert_eq!(a, b);
///
/// let gray: PixelY8 = Pixel::new([42]);
/// assert_eq!(gray, 42);
/// ```
#[repr(transparent)]
#[derive(Clone, Copy)]
pub struct Pixel<T, const N: usize, F = tag::Unknown> {
    data: [T; N],
    _format: PhantomData<F>,
}

impl<T: Element, const N: usize, F: FormatTag> Pixel<T, N, F> {
    /// Creates a pixel from its channel values.
    #[inline]
    pub const fn new(data: [T; N]) -> Self {
        Self {
            data,
            _format: PhantomData,
        }
    }

    /// Creates a pixel with every channel set to `value`.
    #[inline]
    pub fn splat(value: T) -> Self {
        Self::new([value; N])
    }

    /// Returns the channel values as an array reference.
    #[inline]
    pub fn as_array(&self) -> &[T; N] {
        &self.data
    }

    /// Returns the channel values by value.
    #[inline]
    pub fn into_array(self) -> [T; N] {
        self.data
    }

    /// Applies `f` to each channel, producing a pixel of another element type.
    #[inline]
    pub fn map<U: Element>(self, f: impl FnMut(T) -> U) -> Pixel<U, N, F> {
        Pixel::new(self.data.map(f))
    }

    /// Reinterprets the pixel under another format tag with the same channel count.
    #[inline]
    pub fn retag<G: FormatTag>(self) -> Pixel<T, N, G> {
        Pixel::new(self.data)
    }
}

// SAFETY: `Pixel` is `repr(transparent)` over `[T; N]` (PhantomData is a ZST),
// and `[T; N]` is Pod whenever `T` is.
unsafe impl<T: Element, const N: usize, F: FormatTag> Zeroable for Pixel<T, N, F> {}
unsafe impl<T: Element, const N: usize, F: FormatTag> Pod for Pixel<T, N, F> {}

impl<T: Element, const N: usize, F: FormatTag> PixelType for Pixel<T, N, F> {
    type Element = T;
    type Format = F;
    type WithElement<U: Element> = Pixel<U, N, F>;

    const CHANNELS: usize = N;

    #[inline]
    fn channels(&self) -> &[T] {
        &self.data
    }

    #[inline]
    fn channels_mut(&mut self) -> &mut [T] {
        &mut self.data
    }
}

impl<T: Element, const N: usize, F: FormatTag> Default for Pixel<T, N, F> {
    fn default() -> Self {
        Self::new([T::default(); N])
    }
}

impl<T: PartialEq, const N: usize, F> PartialEq for Pixel<T, N, F> {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.data == other.data
    }
}

impl<T: PartialEq, F> PartialEq<T> for Pixel<T, 1, F> {
    #[inline]
    fn eq(&self, other: &T) -> bool {
        self.data[0] == *other
    }
}

impl<T: Element, const N: usize, F: FormatTag> From<[T; N]> for Pixel<T, N, F> {
    #[inline]
    fn from(data: [T; N]) -> Self {
        Self::new(data)
    }
}

impl<T, const N: usize, F> Index<usize> for Pixel<T, N, F> {
    type Output = T;

    #[inline]
    fn index(&self, index: usize) -> &T {
        &self.data[index]
    }
}

impl<T, const N: usize, F> IndexMut<usize> for Pixel<T, N, F> {
    #[inline]
    fn index_mut(&mut self, index: usize) -> &mut T {
        &mut self.data[index]
    }
}

impl<T: fmt::Debug, const N: usize, F: FormatTag> fmt::Debug for Pixel<T, N, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Pixel<{}>", F::FORMAT)?;
        f.debug_list().entries(self.data.iter()).finish()
    }
}

// Type aliases for the common cases.

/// 8-bit grayscale.
pub type PixelY8 = Pixel<u8, 1, tag::Y>;
/// 8-bit grayscale with alpha.
pub type PixelYa8 = Pixel<u8, 2, tag::Ya>;
/// 8-bit RGB.
pub type PixelRgb8 = Pixel<u8, 3, tag::Rgb>;
/// 8-bit BGR.
pub type PixelBgr8 = Pixel<u8, 3, tag::Bgr>;
/// 8-bit RGBA.
pub type PixelRgba8 = Pixel<u8, 4, tag::Rgba>;
/// 8-bit BGRA.
pub type PixelBgra8 = Pixel<u8, 4, tag::Bgra>;
/// 8-bit ARGB.
pub type PixelArgb8 = Pixel<u8, 4, tag::Argb>;
/// 8-bit ABGR.
pub type PixelAbgr8 = Pixel<u8, 4, tag::Abgr>;
/// 16-bit grayscale.
pub type PixelY16 = Pixel<u16, 1, tag::Y>;
/// 16-bit RGB.
pub type PixelRgb16 = Pixel<u16, 3, tag::Rgb>;
/// 16-bit RGBA.
pub type PixelRgba16 = Pixel<u16, 4, tag::Rgba>;
/// 32-bit float grayscale.
pub type PixelYF32 = Pixel<f32, 1, tag::Y>;
/// 32-bit float RGB.
pub type PixelRgbF32 = Pixel<f32, 3, tag::Rgb>;
/// 32-bit float RGBA.
pub type PixelRgbaF32 = Pixel<f32, 4, tag::Rgba>;
/// 8-bit, 1 channel, unknown format.
pub type Pixel8u1 = Pixel<u8, 1>;
/// 8-bit, 2 channels, unknown format.
pub type Pixel8u2 = Pixel<u8, 2>;
/// 8-bit, 3 channels, unknown format.
pub type Pixel8u3 = Pixel<u8, 3>;
/// 8-bit, 4 channels, unknown format.
pub type Pixel8u4 = Pixel<u8, 4>;
/// 16-bit, 1 channel, unknown format.
pub type Pixel16u1 = Pixel<u16, 1>;
/// 16-bit, 3 channels, unknown format.
pub type Pixel16u3 = Pixel<u16, 3>;
/// 32-bit float, 1 channel, unknown format.
pub type Pixel32f1 = Pixel<f32, 1>;
/// 32-bit float, 3 channels, unknown format.
pub type Pixel32f3 = Pixel<f32, 3>;
