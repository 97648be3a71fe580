//! Pixel format conversion.
//!
//! The legal format pairs are encoded as trait implementations on the
//! format tags, so the compiler picks the call signature:
//!
//! - [`DirectConversion<D>`] is implemented by every source tag that converts
//!   to `D` without extra input (use [`convert_pixel`], [`convert_image`])
//! - [`AlphaConversion<D>`] is implemented by every source tag that needs a
//!   supplied alpha value to reach `D` (use [`convert_pixel_alpha`],
//!   [`convert_image_alpha`])
//!
//! Calling the wrong one does not compile:
//!
//! ```compile_fail
//! use pxl_core::prelude::*;
//! use pxl_ops::convert::convert_pixel;
//!
//! let px = PixelRgb8::new([1, 2, 3]);
//! // RGB -> RGBA needs an alpha value
//! let _ = convert_pixel::<_, tag::Rgba>(px);
//! ```
//!
//! ```rust
//! use pxl_core::prelude::*;
//! use pxl_ops::convert::{convert_pixel, convert_pixel_alpha};
//!
//! let px = PixelRgb8::new([10, 11, 12]);
//! assert_eq!(convert_pixel::<_, tag::Y>(px), PixelY8::new([11]));
//! assert_eq!(convert_pixel::<_, tag::Bgr>(px), PixelBgr8::new([12, 11, 10]));
//! assert_eq!(convert_pixel_alpha::<_, tag::Rgba>(px, 192), PixelRgba8::new([10, 11, 12, 192]));
//! ```
//!
//! Images whose formats are known only at runtime go through
//! [`convert_dyn`], which consults the same table and checks alpha arity
//! when called.

mod dynamic;
pub(crate) mod image;
pub mod table;

pub use dynamic::{convert_dyn, convert_dyn_into};
pub use image::{
    convert_image, convert_image_alpha, convert_image_alpha_as, convert_image_alpha_into,
    convert_image_as, convert_image_into,
};
pub use table::{ConversionKind, ConversionPlan, conversion_kind, luma, supported_conversions};

use pxl_core::{KnownFormat, PixelFormat, PixelType, tag};

/// Source tags that convert to `D` without a supplied alpha.
pub trait DirectConversion<D: KnownFormat>: KnownFormat {
    /// Per-channel recipe.
    const PLAN: ConversionPlan;
}

/// Source tags that convert to `D` only with a supplied alpha.
pub trait AlphaConversion<D: KnownFormat>: KnownFormat {
    /// Per-channel recipe.
    const PLAN: ConversionPlan;
}

macro_rules! direct_conversions {
    ($($src:ident => [$($dst:ident),* $(,)?];)*) => {
        $($(
            impl DirectConversion<tag::$dst> for tag::$src {
                const PLAN: ConversionPlan = ConversionPlan::direct(PixelFormat::$src, PixelFormat::$dst);
            }
        )*)*
    };
}

macro_rules! alpha_conversions {
    ($($src:ident => [$($dst:ident),* $(,)?];)*) => {
        $($(
            impl AlphaConversion<tag::$dst> for tag::$src {
                const PLAN: ConversionPlan = ConversionPlan::with_alpha(PixelFormat::$src, PixelFormat::$dst);
            }
        )*)*
    };
}

direct_conversions! {
    Y => [Y, Rgb, Bgr];
    Rgb => [Y, Rgb, Bgr];
    Bgr => [Y, Rgb, Bgr];
    Ya => [Y, Ya, Rgb, Bgr, Rgba, Bgra, Argb, Abgr];
    Rgba => [Y, Ya, Rgb, Bgr, Rgba, Bgra, Argb, Abgr];
    Bgra => [Y, Ya, Rgb, Bgr, Rgba, Bgra, Argb, Abgr];
    Argb => [Y, Ya, Rgb, Bgr, Rgba, Bgra, Argb, Abgr];
    Abgr => [Y, Ya, Rgb, Bgr, Rgba, Bgra, Argb, Abgr];
}

alpha_conversions! {
    Y => [Ya, Rgba, Bgra, Argb, Abgr];
    Rgb => [Ya, Rgba, Bgra, Argb, Abgr];
    Bgr => [Ya, Rgba, Bgra, Argb, Abgr];
}

/// Pixel type with format `D` and the element type of `P`.
pub type Converted<P, D> = <D as KnownFormat>::PixelOf<<P as PixelType>::Element>;

/// Fails compilation when `P` stores a different number of channels than
/// format `F` defines.
#[inline(always)]
pub(crate) fn assert_channels<P: PixelType, F: KnownFormat>() {
    const {
        assert!(
            P::CHANNELS == F::CHANNELS,
            "pixel channel count does not match its format"
        )
    }
}

#[inline]
fn apply_plan<P: PixelType, Q: PixelType<Element = P::Element>>(
    plan: &ConversionPlan,
    px: &P,
    alpha: P::Element,
) -> Q {
    let mut out = Q::zero();
    plan.apply(px.channels(), out.channels_mut(), alpha);
    out
}

/// Converts one pixel to format `D`.
pub fn convert_pixel<P, D>(px: P) -> Converted<P, D>
where
    P: PixelType,
    P::Format: DirectConversion<D>,
    D: KnownFormat,
{
    assert_channels::<P, P::Format>();
    apply_plan(&<P::Format as DirectConversion<D>>::PLAN, &px, Default::default())
}

/// Converts one pixel to format `D`, setting its alpha channel to `alpha`.
pub fn convert_pixel_alpha<P, D>(px: P, alpha: P::Element) -> Converted<P, D>
where
    P: PixelType,
    P::Format: AlphaConversion<D>,
    D: KnownFormat,
{
    assert_channels::<P, P::Format>();
    apply_plan(&<P::Format as AlphaConversion<D>>::PLAN, &px, alpha)
}

/// Converts one pixel, reading it as format `S` regardless of its own tag.
///
/// This is how pixels with an unknown format take part in conversions. The
/// channel count of `P` must equal that of `S`, checked at compile time.
///
/// ```rust
/// use pxl_core::prelude::*;
/// use pxl_ops::convert::convert_pixel_as;
///
/// let px = Pixel8u3::new([10, 11, 12]);
/// assert_eq!(convert_pixel_as::<tag::Rgb, tag::Y, _>(px), PixelY8::new([11]));
/// ```
pub fn convert_pixel_as<S, D, P>(px: P) -> Converted<P, D>
where
    P: PixelType,
    S: DirectConversion<D>,
    D: KnownFormat,
{
    assert_channels::<P, S>();
    apply_plan(&<S as DirectConversion<D>>::PLAN, &px, Default::default())
}

/// Like [`convert_pixel_as`] for pairs that need a supplied alpha.
pub fn convert_pixel_alpha_as<S, D, P>(px: P, alpha: P::Element) -> Converted<P, D>
where
    P: PixelType,
    S: AlphaConversion<D>,
    D: KnownFormat,
{
    assert_channels::<P, S>();
    apply_plan(&<S as AlphaConversion<D>>::PLAN, &px, alpha)
}
