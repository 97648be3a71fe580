//! Whole-image conversion for typed images and views.

use super::{AlphaConversion, ConversionPlan, Converted, DirectConversion, assert_channels};
use crate::OpsResult;
use pxl_core::{Error, Image, ImageRead, ImageWrite, KnownFormat, PixelType};
use tracing::debug;

type Elem<I> = <<I as ImageRead>::Pixel as PixelType>::Element;
type Fmt<P> = <P as PixelType>::Format;

/// Applies `plan` to every pixel of `src`, writing row by row into `dst`.
pub(crate) fn convert_rows<I, O>(plan: &ConversionPlan, src: &I, dst: &mut O, alpha: Elem<I>)
where
    I: ImageRead,
    O: ImageWrite,
    O::Pixel: PixelType<Element = Elem<I>>,
{
    for (s_row, d_row) in src.rows().zip(dst.rows_mut()) {
        for (s, d) in s_row.iter().zip(d_row.iter_mut()) {
            plan.apply(s.channels(), d.channels_mut(), alpha);
        }
    }
}

pub(crate) fn check_shape<I: ImageRead, O: ImageRead>(src: &I, dst: &O) -> OpsResult<()> {
    if src.width() != dst.width() || src.height() != dst.height() {
        return Err(Error::dimension_mismatch(
            (src.width().get(), src.height().get()),
            (dst.width().get(), dst.height().get()),
        )
        .into());
    }
    Ok(())
}

fn into_new<I, D>(plan: &ConversionPlan, src: &I, alpha: Elem<I>) -> OpsResult<Image<D::PixelOf<Elem<I>>>>
where
    I: ImageRead,
    D: KnownFormat,
{
    let mut dst = Image::new(src.width(), src.height())?;
    debug!(src = %plan.src(), dst = %plan.dst(), width = %src.width(), height = %src.height(), "convert image");
    convert_rows(plan, src, &mut dst, alpha);
    Ok(dst)
}

/// Converts an image to format `D`, allocating the result.
///
/// # Errors
///
/// Fails if the source is empty or allocation fails.
///
/// # Example
///
/// ```rust
/// use pxl_core::prelude::*;
/// use pxl_ops::convert::convert_image;
///
/// let src = Image::filled(PixelLength(2), PixelLength(2), PixelRgb8::new([10, 11, 12])).unwrap();
/// let gray = convert_image::<tag::Y, _>(&src).unwrap();
/// assert!(gray.pixels().all(|p| *p == PixelY8::new([11])));
/// ```
pub fn convert_image<D, I>(src: &I) -> OpsResult<Image<Converted<I::Pixel, D>>>
where
    D: KnownFormat,
    I: ImageRead,
    Fmt<I::Pixel>: DirectConversion<D>,
{
    assert_channels::<I::Pixel, Fmt<I::Pixel>>();
    into_new::<I, D>(&<Fmt<I::Pixel> as DirectConversion<D>>::PLAN, src, Default::default())
}

/// Converts an image to format `D`, setting every output alpha to `alpha`.
pub fn convert_image_alpha<D, I>(src: &I, alpha: Elem<I>) -> OpsResult<Image<Converted<I::Pixel, D>>>
where
    D: KnownFormat,
    I: ImageRead,
    Fmt<I::Pixel>: AlphaConversion<D>,
{
    assert_channels::<I::Pixel, Fmt<I::Pixel>>();
    into_new::<I, D>(&<Fmt<I::Pixel> as AlphaConversion<D>>::PLAN, src, alpha)
}

/// Converts into a caller-supplied image or view.
///
/// The target format is the format of `dst`'s pixel type. `dst` is never
/// resized.
///
/// # Errors
///
/// [`Error::DimensionMismatch`] if `dst` differs from `src` in width or height.
pub fn convert_image_into<I, O>(src: &I, dst: &mut O) -> OpsResult<()>
where
    I: ImageRead,
    O: ImageWrite,
    O::Pixel: PixelType<Element = Elem<I>>,
    Fmt<O::Pixel>: KnownFormat,
    Fmt<I::Pixel>: DirectConversion<Fmt<O::Pixel>>,
{
    assert_channels::<I::Pixel, Fmt<I::Pixel>>();
    assert_channels::<O::Pixel, Fmt<O::Pixel>>();
    check_shape(src, dst)?;
    convert_rows(
        &<Fmt<I::Pixel> as DirectConversion<Fmt<O::Pixel>>>::PLAN,
        src,
        dst,
        Default::default(),
    );
    Ok(())
}

/// Like [`convert_image_into`] for pairs that need a supplied alpha.
pub fn convert_image_alpha_into<I, O>(src: &I, dst: &mut O, alpha: Elem<I>) -> OpsResult<()>
where
    I: ImageRead,
    O: ImageWrite,
    O::Pixel: PixelType<Element = Elem<I>>,
    Fmt<O::Pixel>: KnownFormat,
    Fmt<I::Pixel>: AlphaConversion<Fmt<O::Pixel>>,
{
    assert_channels::<I::Pixel, Fmt<I::Pixel>>();
    assert_channels::<O::Pixel, Fmt<O::Pixel>>();
    check_shape(src, dst)?;
    convert_rows(
        &<Fmt<I::Pixel> as AlphaConversion<Fmt<O::Pixel>>>::PLAN,
        src,
        dst,
        alpha,
    );
    Ok(())
}

/// Converts an image read as format `S`, whatever its pixel tag says.
///
/// Used for images of unknown format; the channel count of the pixel type
/// must equal that of `S`.
pub fn convert_image_as<S, D, I>(src: &I) -> OpsResult<Image<Converted<I::Pixel, D>>>
where
    S: DirectConversion<D>,
    D: KnownFormat,
    I: ImageRead,
{
    assert_channels::<I::Pixel, S>();
    into_new::<I, D>(&<S as DirectConversion<D>>::PLAN, src, Default::default())
}

/// Like [`convert_image_as`] for pairs that need a supplied alpha.
pub fn convert_image_alpha_as<S, D, I>(src: &I, alpha: Elem<I>) -> OpsResult<Image<Converted<I::Pixel, D>>>
where
    S: AlphaConversion<D>,
    D: KnownFormat,
    I: ImageRead,
{
    assert_channels::<I::Pixel, S>();
    into_new::<I, D>(&<S as AlphaConversion<D>>::PLAN, src, alpha)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::convert::luma;
    use pxl_core::prelude::*;

    fn rgb_image() -> Image<PixelRgb8> {
        let px: Vec<PixelRgb8> = (0..6u8).map(|i| PixelRgb8::new([i, i + 10, i + 20])).collect();
        Image::from_pixels(PixelLength(3), PixelLength(2), &px).unwrap()
    }

    #[test]
    fn test_convert_image_shape() {
        let src = rgb_image();
        let gray = convert_image::<tag::Y, _>(&src.view()).unwrap();
        assert_eq!(gray.layout().channels(), 1);
        let out = convert_image_alpha::<tag::Bgra, _>(&src, 1).unwrap();
        assert_eq!(out.width(), src.width());
        assert_eq!(out.height(), src.height());
        assert_eq!(out.layout().channels(), 4);
        assert_eq!(*out.pixel(PixelIndex(2), PixelIndex(1)), PixelBgra8::new([25, 15, 5, 1]));
    }

    #[test]
    fn test_convert_into_mismatch() {
        let src = rgb_image();
        let mut dst = Image::<PixelBgr8>::new(PixelLength(2), PixelLength(3)).unwrap();
        let err = convert_image_into(&src, &mut dst).unwrap_err();
        assert!(err.is_shape_mismatch());
        assert_eq!(dst.width(), PixelLength(2));
    }

    #[test]
    fn test_convert_into_padded_window() {
        let src = rgb_image();
        let mut dst = Image::<PixelY8>::with_alignment(PixelLength(4), PixelLength(3), RowAlignment::bytes(8)).unwrap();
        let bbox = BoundingBox::new(PixelIndex(1), PixelIndex(1), PixelLength(3), PixelLength(2));
        let mut win = dst.window_mut(bbox).unwrap();
        convert_image_into(&src, &mut win).unwrap();
        assert_eq!(*dst.pixel(PixelIndex(0), PixelIndex(0)), 0);
        let expected = luma(4u8, 14, 24);
        assert_eq!(*dst.pixel(PixelIndex(2), PixelIndex(2)), expected);
    }

    #[test]
    fn test_convert_as_unknown() {
        let px: Vec<Pixel8u3> = vec![Pixel8u3::new([1, 2, 3]); 4];
        let src = Image::from_pixels(PixelLength(2), PixelLength(2), &px).unwrap();
        let out = convert_image_as::<tag::Bgr, tag::Rgb, _>(&src).unwrap();
        assert!(out.pixels().all(|p| *p == PixelRgb8::new([3, 2, 1])));
        let out = convert_image_alpha_as::<tag::Rgb, tag::Argb, _>(&src, 9).unwrap();
        assert!(out.pixels().all(|p| *p == PixelArgb8::new([9, 1, 2, 3])));
    }
}
