//! Typed image containers.
//!
//! This module provides the strongly typed image types:
//! - [`Image`] - Owned image buffer, exclusive owner of its bytes
//! - [`ImageView`] - Read-only view over someone else's bytes
//! - [`ImageViewMut`] - Read-write view over someone else's bytes
//!
//! All three share the read capability [`ImageRead`]; [`Image`] and
//! [`ImageViewMut`] also implement [`ImageWrite`].
//!
//! # Memory Layout
//!
//! Pixels are stored row-major, top-to-bottom, channels interleaved. Rows
//! start `stride` bytes apart and may be padded:
//!
//! ```text
//! Memory: [R G B R G B R G B .. pad]  <- Row 0
//!         [R G B R G B R G B .. pad]  <- Row 1
//! ```
//!
//! # Views
//!
//! Views borrow their bytes, so the borrow checker bounds their lifetime by
//! the owner's. A mutable view can only be made from a mutable borrow; there
//! is no conversion from [`ImageView`] to [`ImageViewMut`].
//!
//! ```rust
//! use pxl_core::prelude::*;
//!
//! let mut img = Image::<PixelY8>::new(PixelLength(4), PixelLength(4)).unwrap();
//! img.fill(PixelY8::new([3]));
//!
//! let bbox = BoundingBox::new(PixelIndex(1), PixelIndex(1), PixelLength(2), PixelLength(2));
//! let mut win = img.window_mut(bbox).unwrap();
//! win.fill(PixelY8::new([9]));
//!
//! assert_eq!(*img.pixel(PixelIndex(0), PixelIndex(0)), 3);
//! assert_eq!(*img.pixel(PixelIndex(2), PixelIndex(2)), 9);
//! ```

use crate::buffer::PixelBuffer;
use crate::dynamic::DynImageView;
use crate::error::{Error, Result};
use crate::layout::{ImageLayout, RowAlignment, pixel_shape};
use crate::pixel::PixelType;
use crate::rect::BoundingBox;
use crate::types::{PixelIndex, PixelLength, Stride};
use std::marker::PhantomData;
use tracing::debug;

/// Read access shared by owned images and views.
pub trait ImageRead {
    /// Pixel type stored in the image.
    type Pixel: PixelType;

    /// Layout of the image.
    fn layout(&self) -> &ImageLayout;

    /// Bytes starting at pixel `(0, 0)`, covering at least every row.
    fn as_bytes(&self) -> &[u8];

    /// Width in pixels.
    #[inline]
    fn width(&self) -> PixelLength {
        self.layout().width()
    }

    /// Height in pixels.
    #[inline]
    fn height(&self) -> PixelLength {
        self.layout().height()
    }

    /// Row pitch in bytes.
    #[inline]
    fn stride(&self) -> Stride {
        self.layout().stride()
    }

    /// Whether the image covers no pixels.
    #[inline]
    fn is_empty(&self) -> bool {
        self.layout().is_empty()
    }

    /// Pixels of row `y`.
    ///
    /// # Panics
    ///
    /// Panics if `y` is outside `[0, height)`.
    fn row(&self, y: PixelIndex) -> &[Self::Pixel] {
        let layout = self.layout();
        assert!(
            y.is_within(layout.height()),
            "row {y} out of bounds for height {}",
            layout.height()
        );
        let start = y.0 as usize * layout.stride().get();
        bytemuck::cast_slice(&self.as_bytes()[start..start + layout.row_bytes()])
    }

    /// Pixel at `(x, y)`.
    ///
    /// # Panics
    ///
    /// Panics if `(x, y)` is outside the image.
    fn pixel(&self, x: PixelIndex, y: PixelIndex) -> &Self::Pixel {
        assert!(
            x.is_within(self.width()),
            "column {x} out of bounds for width {}",
            self.width()
        );
        &self.row(y)[x.0 as usize]
    }

    /// Pixel at `(x, y)`, or `None` outside the image.
    #[inline]
    fn get(&self, x: PixelIndex, y: PixelIndex) -> Option<&Self::Pixel> {
        if x.is_within(self.width()) && y.is_within(self.height()) {
            Some(self.pixel(x, y))
        } else {
            None
        }
    }

    /// Iterates rows top to bottom.
    fn rows(&self) -> impl Iterator<Item = &[Self::Pixel]> + '_ {
        (0..self.height().get()).map(move |y| self.row(PixelIndex(y as i32)))
    }

    /// Iterates pixels in row-major order.
    fn pixels(&self) -> impl Iterator<Item = &Self::Pixel> + '_ {
        self.rows().flatten()
    }

    /// Read-only view of the whole image.
    fn view(&self) -> ImageView<'_, Self::Pixel> {
        ImageView::from_parts(self.as_bytes(), *self.layout())
    }

    /// Read-only view of a sub-rectangle, sharing this image's stride.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidRegion`] if `bbox` is empty or not inside the image.
    fn window(&self, bbox: BoundingBox) -> Result<ImageView<'_, Self::Pixel>> {
        let (start, layout) = window_region(self.layout(), bbox)?;
        let end = start + layout.view_bytes().unwrap_or(0);
        Ok(ImageView::from_parts(&self.as_bytes()[start..end], layout))
    }

    /// Deep copy into a packed owned image.
    fn to_image(&self) -> Result<Image<Self::Pixel>> {
        let mut out = Image::new(self.width(), self.height())?;
        for (dst, src) in out.rows_mut().zip(self.rows()) {
            dst.copy_from_slice(src);
        }
        Ok(out)
    }

    /// Dynamic read-only view of the same bytes, for the codec boundary.
    fn dyn_view(&self) -> DynImageView<'_> {
        DynImageView::from_typed::<Self::Pixel>(self.as_bytes(), *self.layout())
    }
}

/// Write access for owned images and mutable views.
pub trait ImageWrite: ImageRead {
    /// Mutable bytes starting at pixel `(0, 0)`.
    fn as_bytes_mut(&mut self) -> &mut [u8];

    /// Mutable pixels of row `y`.
    ///
    /// # Panics
    ///
    /// Panics if `y` is outside `[0, height)`.
    fn row_mut(&mut self, y: PixelIndex) -> &mut [Self::Pixel] {
        let layout = *self.layout();
        assert!(
            y.is_within(layout.height()),
            "row {y} out of bounds for height {}",
            layout.height()
        );
        let start = y.0 as usize * layout.stride().get();
        bytemuck::cast_slice_mut(&mut self.as_bytes_mut()[start..start + layout.row_bytes()])
    }

    /// Mutable pixel at `(x, y)`.
    ///
    /// # Panics
    ///
    /// Panics if `(x, y)` is outside the image.
    fn pixel_mut(&mut self, x: PixelIndex, y: PixelIndex) -> &mut Self::Pixel {
        let width = self.width();
        assert!(x.is_within(width), "column {x} out of bounds for width {width}");
        &mut self.row_mut(y)[x.0 as usize]
    }

    /// Overwrites the pixel at `(x, y)`.
    #[inline]
    fn set_pixel(&mut self, x: PixelIndex, y: PixelIndex, px: Self::Pixel) {
        *self.pixel_mut(x, y) = px;
    }

    /// Iterates mutable rows top to bottom.
    fn rows_mut(&mut self) -> impl Iterator<Item = &mut [Self::Pixel]> + '_ {
        let layout = *self.layout();
        let row_bytes = layout.row_bytes();
        self.as_bytes_mut()
            .chunks_mut(layout.stride().get().max(1))
            .take(layout.height().to_usize())
            .map(move |chunk| bytemuck::cast_slice_mut(&mut chunk[..row_bytes]))
    }

    /// Sets every pixel to `px`.
    fn fill(&mut self, px: Self::Pixel) {
        for row in self.rows_mut() {
            row.fill(px);
        }
    }

    /// Mutable view of the whole image.
    fn view_mut(&mut self) -> ImageViewMut<'_, Self::Pixel> {
        let layout = *self.layout();
        ImageViewMut::from_parts(self.as_bytes_mut(), layout)
    }

    /// Mutable view of a sub-rectangle, sharing this image's stride.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidRegion`] if `bbox` is empty or not inside the image.
    fn window_mut(&mut self, bbox: BoundingBox) -> Result<ImageViewMut<'_, Self::Pixel>> {
        let (start, layout) = window_region(self.layout(), bbox)?;
        let end = start + layout.view_bytes().unwrap_or(0);
        Ok(ImageViewMut::from_parts(&mut self.as_bytes_mut()[start..end], layout))
    }
}

/// Owned image with compile-time pixel type.
///
/// The image exclusively owns its buffer; `Clone` makes a deep copy. An
/// image built with [`Image::empty`], or one whose allocation failed, is
/// invalid (see [`is_valid`](Self::is_valid)).
///
/// # Example
///
/// ```rust
/// use pxl_core::prelude::*;
///
/// let mut img = Image::<PixelRgb8>::new(PixelLength(2), PixelLength(2)).unwrap();
/// img.set_pixel(PixelIndex(1), PixelIndex(0), PixelRgb8::new([1, 2, 3]));
/// assert_eq!(img.pixel(PixelIndex(1), PixelIndex(0))[2], 3);
/// assert!(img.is_valid());
/// ```
#[derive(Clone)]
pub struct Image<P: PixelType> {
    buf: PixelBuffer,
    layout: ImageLayout,
    _pixel: PhantomData<P>,
}

impl<P: PixelType> Image<P> {
    /// Allocates a packed, zero-filled image.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidDimensions`] for a zero width or height.
    pub fn new(width: PixelLength, height: PixelLength) -> Result<Self> {
        Self::with_layout(ImageLayout::typed::<P>(width, height))
    }

    /// Allocates a zero-filled image with the given layout.
    ///
    /// # Errors
    ///
    /// Fails if the layout's channel count or element size disagree with `P`,
    /// if it is empty, or if the stride is not a multiple of the element size.
    pub fn with_layout(layout: ImageLayout) -> Result<Self> {
        check_pixel_layout::<P>(&layout)?;
        let bytes = layout
            .total_bytes()
            .ok_or_else(|| Error::invalid_dimensions(layout.width().get(), layout.height().get(), "buffer size overflows"))?;
        debug!(%layout, format = %P::FORMAT, bytes, "allocating image");
        Ok(Self {
            buf: PixelBuffer::zeroed(bytes)?,
            layout,
            _pixel: PhantomData,
        })
    }

    /// Allocates an image whose rows are aligned to `alignment` bytes.
    pub fn with_alignment(width: PixelLength, height: PixelLength, alignment: RowAlignment) -> Result<Self> {
        let (channels, bpc) = pixel_shape::<P>();
        Self::with_layout(ImageLayout::with_alignment(width, height, channels, bpc, alignment)?)
    }

    /// Allocates a packed image filled with `px`.
    pub fn filled(width: PixelLength, height: PixelLength, px: P) -> Result<Self> {
        let mut img = Self::new(width, height)?;
        img.fill(px);
        Ok(img)
    }

    /// Builds a packed image from row-major pixels.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidDimensions`] if `pixels` does not hold exactly
    /// `width * height` values, or if that count overflows.
    pub fn from_pixels(width: PixelLength, height: PixelLength, pixels: &[P]) -> Result<Self> {
        let expected = width
            .to_usize()
            .checked_mul(height.to_usize())
            .ok_or_else(|| Error::invalid_dimensions(width.get(), height.get(), "pixel count overflows"))?;
        if pixels.len() != expected {
            return Err(Error::invalid_dimensions(
                width.get(),
                height.get(),
                format!("expected {} pixels, got {}", expected, pixels.len()),
            ));
        }
        let mut img = Self::new(width, height)?;
        img.as_bytes_mut().copy_from_slice(bytemuck::cast_slice(pixels));
        Ok(img)
    }

    /// The invalid, zero-sized image. Holds no memory.
    pub fn empty() -> Self {
        Self {
            buf: PixelBuffer::default(),
            layout: ImageLayout::empty(),
            _pixel: PhantomData,
        }
    }

    /// Whether the image holds pixels.
    #[inline]
    pub fn is_valid(&self) -> bool {
        !self.layout.is_empty() && self.buf.len() > 0
    }

    /// Bytes the image can hold without reallocating.
    #[inline]
    pub fn capacity_bytes(&self) -> usize {
        self.buf.capacity()
    }

    /// Resizes the image to `layout`, reusing the buffer when it is large
    /// enough.
    ///
    /// Returns `true` if new memory was allocated. Pixel contents are
    /// unspecified afterwards. On failure the image is cleared.
    pub fn maybe_allocate(&mut self, layout: ImageLayout) -> Result<bool> {
        if let Err(e) = check_pixel_layout::<P>(&layout) {
            self.clear();
            return Err(e);
        }
        let bytes = match layout.total_bytes() {
            Some(bytes) => bytes,
            None => {
                self.clear();
                return Err(Error::invalid_dimensions(layout.width().get(), layout.height().get(), "buffer size overflows"));
            }
        };
        match self.buf.ensure(bytes) {
            Ok(allocated) => {
                debug!(%layout, allocated, "maybe_allocate");
                self.layout = layout;
                Ok(allocated)
            }
            Err(e) => {
                self.clear();
                Err(e)
            }
        }
    }

    /// Makes the image invalid and zero-sized. Capacity is kept for reuse.
    pub fn clear(&mut self) {
        self.buf.clear();
        self.layout = ImageLayout::empty();
    }

    /// Moves the buffer out together with its layout.
    pub(crate) fn into_parts(self) -> (PixelBuffer, ImageLayout) {
        (self.buf, self.layout)
    }

    /// Rebuilds an image from a buffer whose layout is already checked for `P`.
    pub(crate) fn from_parts(buf: PixelBuffer, layout: ImageLayout) -> Self {
        Self {
            buf,
            layout,
            _pixel: PhantomData,
        }
    }
}

impl<P: PixelType> Default for Image<P> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<P: PixelType> ImageRead for Image<P> {
    type Pixel = P;

    #[inline]
    fn layout(&self) -> &ImageLayout {
        &self.layout
    }

    #[inline]
    fn as_bytes(&self) -> &[u8] {
        self.buf.as_bytes()
    }
}

impl<P: PixelType> ImageWrite for Image<P> {
    #[inline]
    fn as_bytes_mut(&mut self) -> &mut [u8] {
        self.buf.as_bytes_mut()
    }
}

impl<P: PixelType> std::fmt::Debug for Image<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Image")
            .field("layout", &self.layout)
            .field("format", &P::FORMAT)
            .field("capacity", &self.buf.capacity())
            .finish()
    }
}

/// Read-only view into pixel memory owned elsewhere.
///
/// Cheap to copy. Windows of a view keep the parent's stride.
#[derive(Clone, Copy)]
pub struct ImageView<'a, P: PixelType> {
    bytes: &'a [u8],
    layout: ImageLayout,
    _pixel: PhantomData<P>,
}

impl<'a, P: PixelType> ImageView<'a, P> {
    /// Views `bytes` through `layout`.
    ///
    /// # Errors
    ///
    /// Fails if the layout disagrees with `P` or is empty, if `bytes` is
    /// shorter than the layout needs, or if `bytes` or the stride are not
    /// aligned for the element type.
    pub fn from_bytes(bytes: &'a [u8], layout: ImageLayout) -> Result<Self> {
        let len = check_view_bytes::<P>(bytes, &layout)?;
        Ok(Self::from_parts(&bytes[..len], layout))
    }

    pub(crate) fn from_parts(bytes: &'a [u8], layout: ImageLayout) -> Self {
        Self {
            bytes,
            layout,
            _pixel: PhantomData,
        }
    }

    /// Like [`ImageRead::window`], but the result borrows the underlying
    /// bytes rather than this view.
    pub fn into_window(self, bbox: BoundingBox) -> Result<ImageView<'a, P>> {
        let (start, layout) = window_region(&self.layout, bbox)?;
        let end = start + layout.view_bytes().unwrap_or(0);
        Ok(ImageView::from_parts(&self.bytes[start..end], layout))
    }
}

impl<P: PixelType> ImageRead for ImageView<'_, P> {
    type Pixel = P;

    #[inline]
    fn layout(&self) -> &ImageLayout {
        &self.layout
    }

    #[inline]
    fn as_bytes(&self) -> &[u8] {
        self.bytes
    }
}

impl<P: PixelType> std::fmt::Debug for ImageView<'_, P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageView")
            .field("layout", &self.layout)
            .field("format", &P::FORMAT)
            .finish()
    }
}

/// Read-write view into pixel memory owned elsewhere.
pub struct ImageViewMut<'a, P: PixelType> {
    bytes: &'a mut [u8],
    layout: ImageLayout,
    _pixel: PhantomData<P>,
}

impl<'a, P: PixelType> ImageViewMut<'a, P> {
    /// Views `bytes` mutably through `layout`. Same checks as
    /// [`ImageView::from_bytes`].
    pub fn from_bytes(bytes: &'a mut [u8], layout: ImageLayout) -> Result<Self> {
        let len = check_view_bytes::<P>(bytes, &layout)?;
        Ok(Self::from_parts(&mut bytes[..len], layout))
    }

    pub(crate) fn from_parts(bytes: &'a mut [u8], layout: ImageLayout) -> Self {
        Self {
            bytes,
            layout,
            _pixel: PhantomData,
        }
    }

    /// Downgrades into a read-only view with the same lifetime.
    pub fn into_view(self) -> ImageView<'a, P> {
        ImageView::from_parts(self.bytes, self.layout)
    }

    pub(crate) fn into_bytes(self) -> &'a mut [u8] {
        self.bytes
    }
}

impl<P: PixelType> ImageRead for ImageViewMut<'_, P> {
    type Pixel = P;

    #[inline]
    fn layout(&self) -> &ImageLayout {
        &self.layout
    }

    #[inline]
    fn as_bytes(&self) -> &[u8] {
        self.bytes
    }
}

impl<P: PixelType> ImageWrite for ImageViewMut<'_, P> {
    #[inline]
    fn as_bytes_mut(&mut self) -> &mut [u8] {
        self.bytes
    }
}

impl<P: PixelType> std::fmt::Debug for ImageViewMut<'_, P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageViewMut")
            .field("layout", &self.layout)
            .field("format", &P::FORMAT)
            .finish()
    }
}

/// Checks that `layout` can back a typed image of `P`.
pub(crate) fn check_pixel_layout<P: PixelType>(layout: &ImageLayout) -> Result<()> {
    let (channels, bpc) = pixel_shape::<P>();
    if layout.channels() != channels {
        return Err(Error::channel_mismatch(channels, layout.channels()));
    }
    if layout.bytes_per_channel() != bpc {
        return Err(Error::ElementSizeMismatch {
            expected: bpc,
            got: layout.bytes_per_channel(),
        });
    }
    layout.validate()?;
    let align = std::mem::align_of::<P>();
    if layout.stride().get() % align != 0 {
        return Err(Error::MisalignedStride {
            stride: layout.stride().get(),
            element_size: align,
        });
    }
    Ok(())
}

/// Checks borrowed bytes for a typed view; returns the byte length to keep.
fn check_view_bytes<P: PixelType>(bytes: &[u8], layout: &ImageLayout) -> Result<usize> {
    check_pixel_layout::<P>(layout)?;
    let needed = layout.view_bytes().unwrap_or(usize::MAX);
    if bytes.len() < needed {
        return Err(Error::BufferTooSmall {
            needed,
            actual: bytes.len(),
        });
    }
    let align = std::mem::align_of::<P>();
    if bytes.as_ptr() as usize % align != 0 {
        return Err(Error::MisalignedBuffer { align });
    }
    Ok(needed)
}

/// Byte offset and layout of the window `bbox` inside `parent`.
pub(crate) fn window_region(parent: &ImageLayout, bbox: BoundingBox) -> Result<(usize, ImageLayout)> {
    let invalid = || {
        Error::invalid_region(
            bbox.x0.get(),
            bbox.y0.get(),
            bbox.width.get(),
            bbox.height.get(),
            parent.width().get(),
            parent.height().get(),
        )
    };
    if bbox.is_empty() || !bbox.fits_within(parent.width(), parent.height()) {
        return Err(invalid());
    }
    let start = parent.byte_offset(bbox.x0, bbox.y0).ok_or_else(invalid)?;
    let layout = ImageLayout::with_stride(
        bbox.width,
        bbox.height,
        parent.channels(),
        parent.bytes_per_channel(),
        parent.stride(),
    )?;
    Ok((start, layout))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pixel::{Pixel8u1, PixelRgb8, PixelRgb16, PixelY8};

    fn grid() -> Image<PixelY8> {
        let values: Vec<PixelY8> = (1..=9).map(|v| PixelY8::new([v * 10])).collect();
        Image::from_pixels(PixelLength(3), PixelLength(3), &values).unwrap()
    }

    fn idx(x: i32, y: i32) -> (PixelIndex, PixelIndex) {
        (PixelIndex(x), PixelIndex(y))
    }

    #[test]
    fn test_image_new() {
        let img = Image::<PixelRgb8>::new(PixelLength(4), PixelLength(2)).unwrap();
        assert_eq!(img.width(), PixelLength(4));
        assert_eq!(img.height(), PixelLength(2));
        assert!(img.layout().is_packed());
        assert!(img.pixels().all(|p| *p == PixelRgb8::zero()));
    }

    #[test]
    fn test_zero_size_fails() {
        let err = Image::<PixelY8>::new(PixelLength(0), PixelLength(3)).unwrap_err();
        assert!(matches!(err, Error::InvalidDimensions { .. }));
    }

    #[test]
    fn test_stride_below_packed_fails() {
        let err = ImageLayout::typed_with_stride::<PixelRgb8>(PixelLength(4), PixelLength(2), Stride(11));
        assert!(matches!(err, Err(Error::InvalidStride { min_stride: 12, .. })));
    }

    #[test]
    fn test_misaligned_stride_fails() {
        let layout = ImageLayout::typed_with_stride::<PixelRgb16>(PixelLength(2), PixelLength(2), Stride(13)).unwrap();
        let err = Image::<PixelRgb16>::with_layout(layout).unwrap_err();
        assert!(matches!(err, Error::MisalignedStride { .. }));
    }

    #[test]
    fn test_layout_shape_mismatch_fails() {
        let layout = ImageLayout::new(PixelLength(2), PixelLength(2), 3, 1);
        let err = Image::<PixelY8>::with_layout(layout).unwrap_err();
        assert!(matches!(err, Error::ChannelMismatch { expected: 1, got: 3 }));
    }

    #[test]
    fn test_pixel_access() {
        let img = grid();
        let (x, y) = idx(1, 2);
        assert_eq!(*img.pixel(x, y), 80);
        assert_eq!(img.row(PixelIndex(1)), &[PixelY8::new([40]), PixelY8::new([50]), PixelY8::new([60])]);
        assert!(img.get(PixelIndex(3), PixelIndex(0)).is_none());
        assert!(img.get(PixelIndex(-1), PixelIndex(0)).is_none());
    }

    #[test]
    #[should_panic]
    fn test_pixel_out_of_bounds_panics() {
        let img = grid();
        let _ = img.pixel(PixelIndex(0), PixelIndex(3));
    }

    #[test]
    fn test_padded_rows() {
        let mut img = Image::<PixelRgb8>::with_alignment(PixelLength(3), PixelLength(2), RowAlignment::bytes(16)).unwrap();
        assert_eq!(img.stride(), Stride(16));
        img.fill(PixelRgb8::new([1, 2, 3]));
        assert_eq!(img.rows().count(), 2);
        assert!(img.rows().all(|r| r.len() == 3));
        // padding is untouched
        assert_eq!(img.as_bytes()[9..16], [0u8; 7]);
    }

    #[test]
    fn test_window_shares_memory() {
        let mut img = grid();
        let bbox = BoundingBox::new(PixelIndex(1), PixelIndex(1), PixelLength(2), PixelLength(2));
        {
            let win = img.window(bbox).unwrap();
            assert_eq!(win.stride(), Stride(3));
            assert_eq!(*win.pixel(PixelIndex(0), PixelIndex(0)), 50);
            assert_eq!(*win.pixel(PixelIndex(1), PixelIndex(1)), 90);
        }
        let mut win = img.window_mut(bbox).unwrap();
        win.set_pixel(PixelIndex(1), PixelIndex(0), PixelY8::new([0]));
        assert_eq!(*img.pixel(PixelIndex(2), PixelIndex(1)), 0);
    }

    #[test]
    fn test_window_outside_fails() {
        let img = grid();
        let bbox = BoundingBox::new(PixelIndex(2), PixelIndex(0), PixelLength(2), PixelLength(1));
        assert!(matches!(img.window(bbox), Err(Error::InvalidRegion { .. })));
        let bbox = BoundingBox::new(PixelIndex(-1), PixelIndex(0), PixelLength(1), PixelLength(1));
        assert!(img.window(bbox).is_err());
    }

    #[test]
    fn test_nested_window() {
        let img = grid();
        let outer = img
            .view()
            .into_window(BoundingBox::new(PixelIndex(1), PixelIndex(0), PixelLength(2), PixelLength(3)))
            .unwrap();
        let inner = outer
            .into_window(BoundingBox::new(PixelIndex(1), PixelIndex(2), PixelLength(1), PixelLength(1)))
            .unwrap();
        assert_eq!(*inner.pixel(PixelIndex(0), PixelIndex(0)), 90);
    }

    #[test]
    fn test_to_image_packs_window() {
        let img = grid();
        let bbox = BoundingBox::new(PixelIndex(0), PixelIndex(1), PixelLength(2), PixelLength(2));
        let copy = img.window(bbox).unwrap().to_image().unwrap();
        assert!(copy.layout().is_packed());
        let values: Vec<u8> = copy.pixels().map(|p| p[0]).collect();
        assert_eq!(values, vec![40, 50, 70, 80]);
    }

    #[test]
    fn test_clone_is_deep() {
        let mut a = grid();
        let b = a.clone();
        a.fill(PixelY8::new([1]));
        assert_eq!(*b.pixel(PixelIndex(0), PixelIndex(0)), 10);
    }

    #[test]
    fn test_view_from_bytes() {
        let bytes = [1u8, 2, 3, 0, 4, 5, 6, 0];
        let layout = ImageLayout::with_stride(PixelLength(3), PixelLength(2), 1, 1, Stride(4)).unwrap();
        let view = ImageView::<Pixel8u1>::from_bytes(&bytes, layout).unwrap();
        assert_eq!(*view.pixel(PixelIndex(2), PixelIndex(1)), 6);

        let err = ImageView::<Pixel8u1>::from_bytes(&bytes[..6], layout).unwrap_err();
        assert!(matches!(err, Error::BufferTooSmall { needed: 7, actual: 6 }));
    }

    #[test]
    fn test_view_mut_from_bytes() {
        let mut bytes = [0u8; 6];
        let layout = ImageLayout::typed::<PixelRgb8>(PixelLength(2), PixelLength(1));
        let mut view = ImageViewMut::<PixelRgb8>::from_bytes(&mut bytes, layout).unwrap();
        view.fill(PixelRgb8::new([7, 8, 9]));
        let view = view.into_view();
        assert_eq!(*view.pixel(PixelIndex(1), PixelIndex(0)), PixelRgb8::new([7, 8, 9]));
        assert_eq!(bytes, [7, 8, 9, 7, 8, 9]);
    }

    #[test]
    fn test_maybe_allocate_reuses_capacity() {
        let mut img = Image::<PixelY8>::new(PixelLength(8), PixelLength(8)).unwrap();
        let smaller = ImageLayout::typed::<PixelY8>(PixelLength(4), PixelLength(4));
        assert!(!img.maybe_allocate(smaller).unwrap());
        assert_eq!(img.width(), PixelLength(4));
        assert_eq!(img.capacity_bytes(), 64);

        let larger = ImageLayout::typed::<PixelY8>(PixelLength(16), PixelLength(8));
        assert!(img.maybe_allocate(larger).unwrap());
        assert_eq!(img.as_bytes().len(), 128);
    }

    #[test]
    fn test_maybe_allocate_failure_clears() {
        let mut img = grid();
        let bad = ImageLayout::new(PixelLength(4), PixelLength(4), 3, 1);
        assert!(img.maybe_allocate(bad).is_err());
        assert!(!img.is_valid());
        assert!(img.is_empty());
    }

    #[test]
    fn test_clear_keeps_capacity() {
        let mut img = grid();
        img.clear();
        assert!(!img.is_valid());
        assert_eq!(img.rows().count(), 0);
        assert_eq!(img.capacity_bytes(), 16);
        assert!(!Image::<PixelY8>::empty().is_valid());
    }

    #[test]
    fn test_from_pixels_wrong_size() {
        let px = [PixelY8::new([1]); 5];
        assert!(Image::from_pixels(PixelLength(2), PixelLength(2), &px).is_err());
    }

    // The pixel count of two u32 sides only overflows a 32-bit usize.
    #[cfg(target_pointer_width = "32")]
    #[test]
    fn test_from_pixels_count_overflow() {
        let px = [PixelY8::new([1]); 4];
        let err = Image::from_pixels(PixelLength(u32::MAX), PixelLength(u32::MAX), &px).unwrap_err();
        assert!(matches!(err, Error::InvalidDimensions { .. }));
    }
}
