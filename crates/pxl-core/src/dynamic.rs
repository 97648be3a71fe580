//! Dynamically typed images for the codec boundary.
//!
//! Codecs know the pixel format and sample type only at runtime. They fill a
//! [`DynImage`] (or write through a [`DynImageViewMut`]); callers then cast
//! it to a typed image with a checked conversion:
//!
//! ```rust
//! use pxl_core::prelude::*;
//!
//! let layout = ImageLayout::new(PixelLength(2), PixelLength(1), 3, 1);
//! let semantics = ImageSemantics::new(PixelFormat::Rgb, SampleFormat::UnsignedInteger);
//! let mut dyn_img = DynImage::new(layout, semantics).unwrap();
//! dyn_img.as_bytes_mut().copy_from_slice(&[1, 2, 3, 4, 5, 6]);
//!
//! // Wrong channel count is rejected
//! assert!(dyn_img.view().typed::<PixelRgba8>(None).is_err());
//!
//! let img = dyn_img.into_typed::<PixelRgb8>(None).unwrap();
//! assert_eq!(*img.pixel(PixelIndex(1), PixelIndex(0)), PixelRgb8::new([4, 5, 6]));
//! ```
//!
//! Going the other way, [`ImageRead::dyn_view`] hands out a read-only
//! dynamic view of a typed image without copying.

use crate::buffer::PixelBuffer;
use crate::error::{Error, Result};
use crate::format::{PixelFormat, SampleFormat};
use crate::image::{Image, ImageRead, ImageView, ImageViewMut, check_pixel_layout, window_region};
use crate::layout::ImageLayout;
use crate::message::{MessageKind, MessageLog, append_message};
use crate::pixel::{Element, PixelType};
use crate::rect::BoundingBox;
use crate::types::{PixelIndex, PixelLength, Stride};
use tracing::debug;

/// Runtime pixel and sample format of a dynamic image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ImageSemantics {
    /// Channel semantics.
    pub pixel_format: PixelFormat,
    /// Per-channel value type.
    pub sample_format: SampleFormat,
}

impl ImageSemantics {
    /// Creates semantics from both tags.
    #[inline]
    pub const fn new(pixel_format: PixelFormat, sample_format: SampleFormat) -> Self {
        Self {
            pixel_format,
            sample_format,
        }
    }

    /// Semantics of pixel type `P`.
    #[inline]
    pub fn of<P: PixelType>() -> Self {
        Self::new(P::FORMAT, <P::Element as Element>::SAMPLE_FORMAT)
    }

    /// Checks that a known pixel format agrees with the layout's channel count.
    fn check(&self, layout: &ImageLayout) -> Result<()> {
        let channels = self.pixel_format.channels();
        if !self.pixel_format.is_unknown() && channels != layout.channels() {
            return Err(Error::channel_mismatch(channels, layout.channels()));
        }
        Ok(())
    }
}

/// Checks that a dynamic image described by `layout`/`semantics` can be read
/// as pixel type `P`.
///
/// An unknown pixel format is accepted for any `P`; when `P` has a known
/// format a warning is appended to `log`.
fn check_cast<P: PixelType>(
    layout: &ImageLayout,
    semantics: ImageSemantics,
    log: Option<&mut MessageLog>,
) -> Result<()> {
    check_pixel_layout::<P>(layout)?;

    let sample = <P::Element as Element>::SAMPLE_FORMAT;
    if semantics.sample_format != SampleFormat::Unknown && semantics.sample_format != sample {
        return Err(Error::SampleFormatMismatch {
            expected: sample,
            got: semantics.sample_format,
        });
    }

    if !P::FORMAT.is_unknown() {
        if semantics.pixel_format.is_unknown() {
            append_message(
                log,
                format!("pixel format of dynamic image is unknown; interpreting as {}", P::FORMAT),
                MessageKind::Warning,
            );
        } else if semantics.pixel_format != P::FORMAT {
            return Err(Error::PixelFormatMismatch {
                expected: P::FORMAT,
                got: semantics.pixel_format,
            });
        }
    }
    Ok(())
}

fn check_alignment<P: PixelType>(bytes: &[u8]) -> Result<()> {
    let align = std::mem::align_of::<P>();
    if bytes.as_ptr() as usize % align != 0 {
        return Err(Error::MisalignedBuffer { align });
    }
    Ok(())
}

fn check_dyn_bytes(bytes: &[u8], layout: &ImageLayout, semantics: ImageSemantics) -> Result<usize> {
    layout.validate()?;
    semantics.check(layout)?;
    let needed = layout.view_bytes().unwrap_or(usize::MAX);
    if bytes.len() < needed {
        return Err(Error::BufferTooSmall {
            needed,
            actual: bytes.len(),
        });
    }
    Ok(needed)
}

fn dyn_row(bytes: &[u8], layout: &ImageLayout, y: PixelIndex) -> std::ops::Range<usize> {
    assert!(
        y.is_within(layout.height()),
        "row {y} out of bounds for height {}",
        layout.height()
    );
    let start = y.0 as usize * layout.stride().get();
    debug_assert!(start + layout.row_bytes() <= bytes.len());
    start..start + layout.row_bytes()
}

/// Owned image whose format is known only at runtime.
#[derive(Clone)]
pub struct DynImage {
    buf: PixelBuffer,
    layout: ImageLayout,
    semantics: ImageSemantics,
}

impl DynImage {
    /// Allocates a zero-filled image.
    ///
    /// # Errors
    ///
    /// Fails for empty layouts, or if a known pixel format disagrees with the
    /// layout's channel count.
    pub fn new(layout: ImageLayout, semantics: ImageSemantics) -> Result<Self> {
        layout.validate()?;
        semantics.check(&layout)?;
        let bytes = layout
            .total_bytes()
            .ok_or_else(|| Error::invalid_dimensions(layout.width().get(), layout.height().get(), "buffer size overflows"))?;
        debug!(%layout, format = %semantics.pixel_format, bytes, "allocating dynamic image");
        Ok(Self {
            buf: PixelBuffer::zeroed(bytes)?,
            layout,
            semantics,
        })
    }

    /// The invalid, zero-sized image.
    pub fn empty() -> Self {
        Self {
            buf: PixelBuffer::default(),
            layout: ImageLayout::empty(),
            semantics: ImageSemantics::default(),
        }
    }

    /// Layout of the image.
    #[inline]
    pub fn layout(&self) -> &ImageLayout {
        &self.layout
    }

    /// Pixel and sample format.
    #[inline]
    pub fn semantics(&self) -> ImageSemantics {
        self.semantics
    }

    /// Pixel format.
    #[inline]
    pub fn pixel_format(&self) -> PixelFormat {
        self.semantics.pixel_format
    }

    /// Sample format.
    #[inline]
    pub fn sample_format(&self) -> SampleFormat {
        self.semantics.sample_format
    }

    /// Width in pixels.
    #[inline]
    pub fn width(&self) -> PixelLength {
        self.layout.width()
    }

    /// Height in pixels.
    #[inline]
    pub fn height(&self) -> PixelLength {
        self.layout.height()
    }

    /// Row pitch in bytes.
    #[inline]
    pub fn stride(&self) -> Stride {
        self.layout.stride()
    }

    /// Whether the image holds pixels.
    #[inline]
    pub fn is_valid(&self) -> bool {
        !self.layout.is_empty() && self.buf.len() > 0
    }

    /// All owned bytes.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        self.buf.as_bytes()
    }

    /// All owned bytes, mutably.
    #[inline]
    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        self.buf.as_bytes_mut()
    }

    /// Resizes the image, reusing the buffer when it is large enough.
    ///
    /// Returns `true` if new memory was allocated. On failure the image is
    /// cleared.
    pub fn maybe_allocate(&mut self, layout: ImageLayout, semantics: ImageSemantics) -> Result<bool> {
        let checked = layout
            .validate()
            .and_then(|_| semantics.check(&layout))
            .and_then(|_| {
                layout.total_bytes().ok_or_else(|| {
                    Error::invalid_dimensions(layout.width().get(), layout.height().get(), "buffer size overflows")
                })
            });
        let result = checked.and_then(|bytes| self.buf.ensure(bytes));
        match result {
            Ok(allocated) => {
                debug!(%layout, allocated, "maybe_allocate (dynamic)");
                self.layout = layout;
                self.semantics = semantics;
                Ok(allocated)
            }
            Err(e) => {
                self.clear();
                Err(e)
            }
        }
    }

    /// Makes the image invalid and zero-sized, keeping capacity.
    pub fn clear(&mut self) {
        self.buf.clear();
        self.layout = ImageLayout::empty();
        self.semantics = ImageSemantics::default();
    }

    /// Read-only dynamic view.
    pub fn view(&self) -> DynImageView<'_> {
        DynImageView {
            bytes: self.buf.as_bytes(),
            layout: self.layout,
            semantics: self.semantics,
        }
    }

    /// Read-write dynamic view.
    pub fn view_mut(&mut self) -> DynImageViewMut<'_> {
        DynImageViewMut {
            bytes: self.buf.as_bytes_mut(),
            layout: self.layout,
            semantics: self.semantics,
        }
    }

    /// Converts into a typed image without copying.
    ///
    /// # Errors
    ///
    /// Channel count, element size, sample format, pixel format or stride
    /// alignment disagreeing with `P`.
    pub fn into_typed<P: PixelType>(self, log: Option<&mut MessageLog>) -> Result<Image<P>> {
        check_cast::<P>(&self.layout, self.semantics, log)?;
        Ok(Image::from_parts(self.buf, self.layout))
    }
}

impl Default for DynImage {
    fn default() -> Self {
        Self::empty()
    }
}

impl std::fmt::Debug for DynImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DynImage")
            .field("layout", &self.layout)
            .field("semantics", &self.semantics)
            .finish()
    }
}

impl<P: PixelType> Image<P> {
    /// Converts into a dynamic image without copying.
    pub fn into_dyn(self) -> DynImage {
        let (buf, layout) = self.into_parts();
        DynImage {
            buf,
            layout,
            semantics: ImageSemantics::of::<P>(),
        }
    }
}

impl<P: PixelType> From<Image<P>> for DynImage {
    fn from(img: Image<P>) -> Self {
        img.into_dyn()
    }
}

/// Read-only view whose format is known only at runtime.
#[derive(Debug, Clone, Copy)]
pub struct DynImageView<'a> {
    bytes: &'a [u8],
    layout: ImageLayout,
    semantics: ImageSemantics,
}

impl<'a> DynImageView<'a> {
    /// Views `bytes` through `layout`.
    ///
    /// # Errors
    ///
    /// Fails for empty layouts, short buffers, or a known pixel format that
    /// disagrees with the channel count.
    pub fn from_bytes(bytes: &'a [u8], layout: ImageLayout, semantics: ImageSemantics) -> Result<Self> {
        let len = check_dyn_bytes(bytes, &layout, semantics)?;
        Ok(Self {
            bytes: &bytes[..len],
            layout,
            semantics,
        })
    }

    pub(crate) fn from_typed<P: PixelType>(bytes: &'a [u8], layout: ImageLayout) -> Self {
        Self {
            bytes,
            layout,
            semantics: ImageSemantics::of::<P>(),
        }
    }

    /// Layout of the view.
    #[inline]
    pub fn layout(&self) -> &ImageLayout {
        &self.layout
    }

    /// Pixel and sample format.
    #[inline]
    pub fn semantics(&self) -> ImageSemantics {
        self.semantics
    }

    /// Pixel format.
    #[inline]
    pub fn pixel_format(&self) -> PixelFormat {
        self.semantics.pixel_format
    }

    /// Sample format.
    #[inline]
    pub fn sample_format(&self) -> SampleFormat {
        self.semantics.sample_format
    }

    /// Width in pixels.
    #[inline]
    pub fn width(&self) -> PixelLength {
        self.layout.width()
    }

    /// Height in pixels.
    #[inline]
    pub fn height(&self) -> PixelLength {
        self.layout.height()
    }

    /// Whether the view covers no pixels.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.layout.is_empty()
    }

    /// Bytes starting at pixel `(0, 0)`.
    #[inline]
    pub fn as_bytes(&self) -> &'a [u8] {
        self.bytes
    }

    /// Pixel bytes of row `y`, without padding.
    ///
    /// # Panics
    ///
    /// Panics if `y` is outside `[0, height)`.
    pub fn row(&self, y: PixelIndex) -> &'a [u8] {
        &self.bytes[dyn_row(self.bytes, &self.layout, y)]
    }

    /// Sub-rectangle sharing this view's stride.
    pub fn window(&self, bbox: BoundingBox) -> Result<DynImageView<'a>> {
        let (start, layout) = window_region(&self.layout, bbox)?;
        let end = start + layout.view_bytes().unwrap_or(0);
        Ok(DynImageView {
            bytes: &self.bytes[start..end],
            layout,
            semantics: self.semantics,
        })
    }

    /// Casts to a typed view.
    ///
    /// # Errors
    ///
    /// Same checks as [`DynImage::into_typed`], plus buffer alignment.
    pub fn typed<P: PixelType>(&self, log: Option<&mut MessageLog>) -> Result<ImageView<'a, P>> {
        check_cast::<P>(&self.layout, self.semantics, log)?;
        check_alignment::<P>(self.bytes)?;
        Ok(ImageView::from_parts(self.bytes, self.layout))
    }
}

/// Read-write view whose format is known only at runtime.
#[derive(Debug)]
pub struct DynImageViewMut<'a> {
    bytes: &'a mut [u8],
    layout: ImageLayout,
    semantics: ImageSemantics,
}

impl<'a> DynImageViewMut<'a> {
    /// Views `bytes` mutably through `layout`. Same checks as
    /// [`DynImageView::from_bytes`].
    pub fn from_bytes(bytes: &'a mut [u8], layout: ImageLayout, semantics: ImageSemantics) -> Result<Self> {
        let len = check_dyn_bytes(bytes, &layout, semantics)?;
        Ok(Self {
            bytes: &mut bytes[..len],
            layout,
            semantics,
        })
    }

    /// Layout of the view.
    #[inline]
    pub fn layout(&self) -> &ImageLayout {
        &self.layout
    }

    /// Pixel and sample format.
    #[inline]
    pub fn semantics(&self) -> ImageSemantics {
        self.semantics
    }

    /// Read-only reborrow.
    pub fn as_view(&self) -> DynImageView<'_> {
        DynImageView {
            bytes: self.bytes,
            layout: self.layout,
            semantics: self.semantics,
        }
    }

    /// Mutable bytes starting at pixel `(0, 0)`.
    #[inline]
    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        self.bytes
    }

    /// Mutable pixel bytes of row `y`, without padding.
    ///
    /// # Panics
    ///
    /// Panics if `y` is outside `[0, height)`.
    pub fn row_mut(&mut self, y: PixelIndex) -> &mut [u8] {
        let range = dyn_row(self.bytes, &self.layout, y);
        &mut self.bytes[range]
    }

    /// Casts to a typed mutable view.
    ///
    /// # Errors
    ///
    /// Same checks as [`DynImageView::typed`].
    pub fn typed_mut<P: PixelType>(self, log: Option<&mut MessageLog>) -> Result<ImageViewMut<'a, P>> {
        check_cast::<P>(&self.layout, self.semantics, log)?;
        check_alignment::<P>(self.bytes)?;
        Ok(ImageViewMut::from_parts(self.bytes, self.layout))
    }
}

impl<'a, P: PixelType> From<ImageViewMut<'a, P>> for DynImageViewMut<'a> {
    fn from(view: ImageViewMut<'a, P>) -> Self {
        let layout = *view.layout();
        Self {
            bytes: view.into_bytes(),
            layout,
            semantics: ImageSemantics::of::<P>(),
        }
    }
}
