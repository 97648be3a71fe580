//! Parallel format conversion using Rayon.
//!
//! Rows are independent, so the destination is split into row chunks and
//! each chunk converted on the pool. Output is identical to the sequential
//! functions in [`crate::convert`].
//!
//! # Example
//!
//! ```rust
//! use pxl_core::prelude::*;
//! use pxl_ops::parallel;
//!
//! let src = Image::filled(PixelLength(64), PixelLength(64), PixelRgb8::new([10, 11, 12])).unwrap();
//! let gray = parallel::convert_image_par::<tag::Y, _>(&src).unwrap();
//! assert!(gray.pixels().all(|p| *p == 11));
//! ```

use crate::OpsResult;
use crate::convert::image::check_shape;
use crate::convert::{AlphaConversion, ConversionPlan, Converted, DirectConversion, assert_channels};
use pxl_core::{Image, ImageRead, ImageWrite, KnownFormat, PixelIndex, PixelType};
use rayon::prelude::*;
use tracing::trace;

type Elem<I> = <<I as ImageRead>::Pixel as PixelType>::Element;
type Fmt<P> = <P as PixelType>::Format;

fn convert_rows_par<I, O>(plan: &ConversionPlan, src: &I, dst: &mut O, alpha: Elem<I>)
where
    I: ImageRead + Sync,
    O: ImageWrite,
    O::Pixel: PixelType<Element = Elem<I>>,
{
    let height = src.height().to_usize();
    let stride = dst.stride().get().max(1);
    let row_bytes = dst.layout().row_bytes();
    trace!(rows = height, src = %plan.src(), dst = %plan.dst(), "parallel convert");

    dst.as_bytes_mut()
        .par_chunks_mut(stride)
        .take(height)
        .enumerate()
        .for_each(|(y, chunk)| {
            let out: &mut [O::Pixel] = bytemuck::cast_slice_mut(&mut chunk[..row_bytes]);
            let row = src.row(PixelIndex(y as i32));
            for (s, d) in row.iter().zip(out.iter_mut()) {
                plan.apply(s.channels(), d.channels_mut(), alpha);
            }
        });
}

/// Parallel [`convert_image`](crate::convert::convert_image).
pub fn convert_image_par<D, I>(src: &I) -> OpsResult<Image<Converted<I::Pixel, D>>>
where
    D: KnownFormat,
    I: ImageRead + Sync,
    Fmt<I::Pixel>: DirectConversion<D>,
{
    assert_channels::<I::Pixel, Fmt<I::Pixel>>();
    let mut dst = Image::new(src.width(), src.height())?;
    convert_rows_par(
        &<Fmt<I::Pixel> as DirectConversion<D>>::PLAN,
        src,
        &mut dst,
        Default::default(),
    );
    Ok(dst)
}

/// Parallel [`convert_image_alpha`](crate::convert::convert_image_alpha).
pub fn convert_image_alpha_par<D, I>(src: &I, alpha: Elem<I>) -> OpsResult<Image<Converted<I::Pixel, D>>>
where
    D: KnownFormat,
    I: ImageRead + Sync,
    Fmt<I::Pixel>: AlphaConversion<D>,
{
    assert_channels::<I::Pixel, Fmt<I::Pixel>>();
    let mut dst = Image::new(src.width(), src.height())?;
    convert_rows_par(&<Fmt<I::Pixel> as AlphaConversion<D>>::PLAN, src, &mut dst, alpha);
    Ok(dst)
}

/// Parallel [`convert_image_into`](crate::convert::convert_image_into).
pub fn convert_image_into_par<I, O>(src: &I, dst: &mut O) -> OpsResult<()>
where
    I: ImageRead + Sync,
    O: ImageWrite,
    O::Pixel: PixelType<Element = Elem<I>>,
    Fmt<O::Pixel>: KnownFormat,
    Fmt<I::Pixel>: DirectConversion<Fmt<O::Pixel>>,
{
    assert_channels::<I::Pixel, Fmt<I::Pixel>>();
    assert_channels::<O::Pixel, Fmt<O::Pixel>>();
    check_shape(src, dst)?;
    convert_rows_par(
        &<Fmt<I::Pixel> as DirectConversion<Fmt<O::Pixel>>>::PLAN,
        src,
        dst,
        Default::default(),
    );
    Ok(())
}

/// Parallel [`convert_image_alpha_into`](crate::convert::convert_image_alpha_into).
pub fn convert_image_alpha_into_par<I, O>(src: &I, dst: &mut O, alpha: Elem<I>) -> OpsResult<()>
where
    I: ImageRead + Sync,
    O: ImageWrite,
    O::Pixel: PixelType<Element = Elem<I>>,
    Fmt<O::Pixel>: KnownFormat,
    Fmt<I::Pixel>: AlphaConversion<Fmt<O::Pixel>>,
{
    assert_channels::<I::Pixel, Fmt<I::Pixel>>();
    assert_channels::<O::Pixel, Fmt<O::Pixel>>();
    check_shape(src, dst)?;
    convert_rows_par(
        &<Fmt<I::Pixel> as AlphaConversion<Fmt<O::Pixel>>>::PLAN,
        src,
        dst,
        alpha,
    );
    Ok(())
}
