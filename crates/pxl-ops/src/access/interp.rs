//! Sub-pixel interpolation.
//!
//! Pixel `(i, j)` is centred on the integer coordinate `(i, j)`.
//!
//! - [`NearestNeighbor`] reads pixel `(floor(x + 0.5), floor(y + 0.5))` and
//!   returns it unchanged
//! - [`Bilinear`] blends the four pixels around `(x, y)` in `f64` and
//!   returns an `f64` pixel, never rounded back to the source element type
//!
//! Both read through a [`PixelAccess`], so the border policy of the accessor
//! decides what reads outside the image return.

use super::PixelAccess;
use pxl_core::{Element, PixelIndex, PixelType};

/// Runtime counterpart of the [`Interpolation`] types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum InterpolationMode {
    /// Round to the nearest pixel.
    #[default]
    NearestNeighbor,
    /// Weighted blend of the four surrounding pixels.
    Bilinear,
}

/// An interpolation algorithm.
pub trait Interpolation {
    /// Runtime tag of the algorithm.
    const MODE: InterpolationMode;

    /// Pixel type produced when sampling pixels of type `P`.
    type Output<P: PixelType>: PixelType;

    /// Samples `acc` at `(x, y)`.
    fn interpolate<A: PixelAccess>(acc: &A, x: f64, y: f64) -> Self::Output<A::Pixel>;
}

/// Nearest-neighbour sampling.
#[derive(Debug, Clone, Copy, Default)]
pub struct NearestNeighbor;

/// Bilinear sampling.
#[derive(Debug, Clone, Copy, Default)]
pub struct Bilinear;

/// Integer pixel index of an already floored coordinate. Saturates; NaN maps to 0.
#[inline]
fn index(v: f64) -> PixelIndex {
    PixelIndex(v as i32)
}

/// Adds `weight * px` to `acc`, channel by channel.
#[inline]
fn accumulate<P: PixelType>(acc: &mut P::WithElement<f64>, px: &P, weight: f64) {
    for (out, v) in acc.channels_mut().iter_mut().zip(px.channels()) {
        *out += weight * v.to_f64();
    }
}

/// Converts every channel of `px` to `f64`.
#[inline]
pub fn widen<P: PixelType>(px: &P) -> P::WithElement<f64> {
    let mut out = <P::WithElement<f64>>::zero();
    accumulate(&mut out, px, 1.0);
    out
}

impl Interpolation for NearestNeighbor {
    const MODE: InterpolationMode = InterpolationMode::NearestNeighbor;

    type Output<P: PixelType> = P;

    #[inline]
    fn interpolate<A: PixelAccess>(acc: &A, x: f64, y: f64) -> Self::Output<A::Pixel> {
        acc.pixel_at(index((x + 0.5).floor()), index((y + 0.5).floor()))
    }
}

impl Interpolation for Bilinear {
    const MODE: InterpolationMode = InterpolationMode::Bilinear;

    type Output<P: PixelType> = P::WithElement<f64>;

    /// Neighbours whose weight is exactly zero are not read, so sampling at
    /// an integer coordinate touches a single pixel.
    fn interpolate<A: PixelAccess>(acc: &A, x: f64, y: f64) -> Self::Output<A::Pixel> {
        let (x0, y0) = (x.floor(), y.floor());
        let (fx, fy) = (x - x0, y - y0);
        let (ix, iy) = (index(x0), index(y0));
        let (ix1, iy1) = (ix + PixelIndex(1), iy + PixelIndex(1));

        let mut out = <<A::Pixel as PixelType>::WithElement<f64>>::zero();
        accumulate(&mut out, &acc.pixel_at(ix, iy), (1.0 - fx) * (1.0 - fy));
        if fx != 0.0 {
            accumulate(&mut out, &acc.pixel_at(ix1, iy), fx * (1.0 - fy));
        }
        if fy != 0.0 {
            accumulate(&mut out, &acc.pixel_at(ix, iy1), (1.0 - fx) * fy);
            if fx != 0.0 {
                accumulate(&mut out, &acc.pixel_at(ix1, iy1), fx * fy);
            }
        }
        out
    }
}

/// Samples with an algorithm chosen at runtime. Nearest-neighbour results
/// are widened to `f64` so both modes share a return type.
pub fn sample_with<A: PixelAccess>(
    mode: InterpolationMode,
    acc: &A,
    x: f64,
    y: f64,
) -> <A::Pixel as PixelType>::WithElement<f64> {
    match mode {
        InterpolationMode::NearestNeighbor => widen(&NearestNeighbor::interpolate(acc, x, y)),
        InterpolationMode::Bilinear => Bilinear::interpolate(acc, x, y),
    }
}
