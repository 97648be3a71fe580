//! Conversion of images whose formats are known only at runtime.
//!
//! The element type is picked from `(SampleFormat, bytes_per_channel)` and
//! the per-pixel recipe from the conversion table. Alpha arity is checked on
//! each call instead of at compile time.

use super::ConversionPlan;
use crate::{OpsError, OpsResult};
use half::f16;
use pxl_core::{
    DynImage, DynImageView, DynImageViewMut, Element, Error, ImageLayout, ImageSemantics,
    PixelFormat, PixelIndex, SampleFormat,
};
use tracing::{debug, trace};

/// Looks up the plan for `src -> dst` and checks the alpha argument against it.
fn checked_plan(src: PixelFormat, dst: PixelFormat, alpha: Option<f64>) -> OpsResult<ConversionPlan> {
    let plan = ConversionPlan::between(src, dst).ok_or(OpsError::UnsupportedConversion { src, dst })?;
    match (plan.requires_alpha(), alpha.is_some()) {
        (true, false) => Err(OpsError::AlphaRequired { src, dst }),
        (false, true) => Err(OpsError::UnexpectedAlpha { src, dst }),
        _ => Ok(plan),
    }
}

/// Calls `$func::<T>(args)` with `T` chosen from the runtime sample type.
macro_rules! dispatch_element {
    ($sample:expr, $bpc:expr, $func:ident($($arg:expr),* $(,)?)) => {
        match ($sample, $bpc) {
            (SampleFormat::UnsignedInteger, 1) => $func::<u8>($($arg),*),
            (SampleFormat::UnsignedInteger, 2) => $func::<u16>($($arg),*),
            (SampleFormat::UnsignedInteger, 4) => $func::<u32>($($arg),*),
            (SampleFormat::SignedInteger, 1) => $func::<i8>($($arg),*),
            (SampleFormat::SignedInteger, 2) => $func::<i16>($($arg),*),
            (SampleFormat::SignedInteger, 4) => $func::<i32>($($arg),*),
            (SampleFormat::FloatingPoint, 2) => $func::<f16>($($arg),*),
            (SampleFormat::FloatingPoint, 4) => $func::<f32>($($arg),*),
            (SampleFormat::FloatingPoint, 8) => $func::<f64>($($arg),*),
            (sample_format, bytes_per_channel) => Err(OpsError::UnsupportedSampleType {
                sample_format,
                bytes_per_channel,
            }),
        }
    };
}

fn supported<T: Element>() -> OpsResult<()> {
    Ok(())
}

fn cast_row<T: Element>(bytes: &[u8]) -> OpsResult<&[T]> {
    bytemuck::try_cast_slice(bytes).map_err(|_| {
        Error::MisalignedBuffer {
            align: std::mem::align_of::<T>(),
        }
        .into()
    })
}

fn cast_row_mut<T: Element>(bytes: &mut [u8]) -> OpsResult<&mut [T]> {
    bytemuck::try_cast_slice_mut(bytes).map_err(|_| {
        Error::MisalignedBuffer {
            align: std::mem::align_of::<T>(),
        }
        .into()
    })
}

/// Fails unless every row of `bytes` under `layout` starts on a `T` boundary.
fn check_rows_aligned<T: Element>(bytes: &[u8], layout: &ImageLayout) -> OpsResult<()> {
    if layout.is_empty() {
        return Ok(());
    }
    let align = std::mem::align_of::<T>();
    let base_ok = bytes.as_ptr() as usize % align == 0;
    let stride_ok = layout.height().get() == 1 || layout.stride().get() % align == 0;
    if base_ok && stride_ok {
        Ok(())
    } else {
        Err(Error::MisalignedBuffer { align }.into())
    }
}

fn convert_dyn_rows<T: Element>(
    plan: &ConversionPlan,
    src: &DynImageView<'_>,
    dst: &mut DynImageViewMut<'_>,
    alpha: Option<f64>,
) -> OpsResult<()> {
    // Both sides are checked before the first row is written.
    check_rows_aligned::<T>(src.as_bytes(), src.layout())?;
    check_rows_aligned::<T>(dst.as_view().as_bytes(), dst.layout())?;

    let alpha = alpha.map(T::from_f64).unwrap_or_default();
    let src_channels = plan.src().channels() as usize;
    let dst_channels = plan.dst_channels();
    for y in 0..src.height().get() {
        let y = PixelIndex(y as i32);
        let s = cast_row::<T>(src.row(y))?;
        let d = cast_row_mut::<T>(dst.row_mut(y))?;
        for (sp, dp) in s.chunks_exact(src_channels).zip(d.chunks_exact_mut(dst_channels)) {
            plan.apply(sp, dp, alpha);
        }
    }
    trace!(rows = src.height().get(), element = std::any::type_name::<T>(), "converted rows");
    Ok(())
}

/// Converts a dynamic view to `dst_format`, allocating a packed result with
/// the same sample type.
///
/// `alpha` must be `Some` exactly when the pair adds an alpha channel; it is
/// rounded and saturated for integer samples.
///
/// # Errors
///
/// - [`OpsError::UnsupportedConversion`] for pairs outside the table,
///   including any pair with an unknown format
/// - [`OpsError::AlphaRequired`] / [`OpsError::UnexpectedAlpha`] for the
///   wrong alpha arity
/// - [`OpsError::UnsupportedSampleType`] if no element type matches
///
/// # Example
///
/// ```rust
/// use pxl_core::prelude::*;
/// use pxl_ops::convert::convert_dyn;
///
/// let src = Image::filled(PixelLength(2), PixelLength(1), PixelRgb8::new([10, 11, 12])).unwrap();
/// let out = convert_dyn(&src.dyn_view(), PixelFormat::Ya, Some(255.0)).unwrap();
/// assert_eq!(out.pixel_format(), PixelFormat::Ya);
/// assert_eq!(out.as_bytes(), &[11, 255, 11, 255]);
/// ```
pub fn convert_dyn(src: &DynImageView<'_>, dst_format: PixelFormat, alpha: Option<f64>) -> OpsResult<DynImage> {
    let plan = checked_plan(src.pixel_format(), dst_format, alpha)?;
    let bpc = src.layout().bytes_per_channel();
    dispatch_element!(src.sample_format(), bpc, supported())?;

    let layout = ImageLayout::try_new(src.width(), src.height(), dst_format.channels(), bpc)?;
    let mut dst = DynImage::new(layout, ImageSemantics::new(dst_format, src.sample_format()))?;
    debug!(src = %plan.src(), dst = %plan.dst(), %layout, "convert dynamic image");
    let mut view = dst.view_mut();
    dispatch_element!(
        src.sample_format(),
        bpc,
        convert_dyn_rows(&plan, src, &mut view, alpha)
    )?;
    Ok(dst)
}

/// Converts a dynamic view into a caller-supplied dynamic view.
///
/// The target format is `dst`'s pixel format. Both sides must share the
/// sample type; `dst` is never resized.
///
/// # Errors
///
/// As [`convert_dyn`], plus [`Error::DimensionMismatch`] for a shape
/// mismatch and [`Error::SampleFormatMismatch`] /
/// [`Error::ElementSizeMismatch`] when the sample types differ, and
/// [`Error::MisalignedBuffer`] when a row of either side does not start on
/// an element boundary. `dst` is left untouched on every error.
pub fn convert_dyn_into(
    src: &DynImageView<'_>,
    dst: &mut DynImageViewMut<'_>,
    alpha: Option<f64>,
) -> OpsResult<()> {
    let dst_layout = *dst.layout();
    let dst_semantics = dst.semantics();
    let plan = checked_plan(src.pixel_format(), dst_semantics.pixel_format, alpha)?;

    if src.width() != dst_layout.width() || src.height() != dst_layout.height() {
        return Err(Error::dimension_mismatch(
            (src.width().get(), src.height().get()),
            (dst_layout.width().get(), dst_layout.height().get()),
        )
        .into());
    }
    if dst_semantics.sample_format != src.sample_format() {
        return Err(Error::SampleFormatMismatch {
            expected: src.sample_format(),
            got: dst_semantics.sample_format,
        }
        .into());
    }
    let bpc = src.layout().bytes_per_channel();
    if dst_layout.bytes_per_channel() != bpc {
        return Err(Error::ElementSizeMismatch {
            expected: bpc,
            got: dst_layout.bytes_per_channel(),
        }
        .into());
    }

    debug!(src = %plan.src(), dst = %plan.dst(), layout = %dst_layout, "convert dynamic image into view");
    dispatch_element!(src.sample_format(), bpc, convert_dyn_rows(&plan, src, dst, alpha))
}
