//! Conversion tests for pxl-ops.

use pxl_core::prelude::*;
use pxl_ops::convert::{
    ConversionKind, convert_dyn, convert_dyn_into, convert_image, convert_image_alpha,
    convert_image_into, luma, supported_conversions,
};
use pxl_ops::OpsError;

fn rgb_ramp(width: u32, height: u32) -> Image<PixelRgb8> {
    let px: Vec<PixelRgb8> = (0..width * height)
        .map(|i| {
            let v = (i * 37 % 256) as u8;
            PixelRgb8::new([v, v.wrapping_mul(3), 255 - v])
        })
        .collect();
    Image::from_pixels(PixelLength(width), PixelLength(height), &px).unwrap()
}

fn dyn_source(format: PixelFormat) -> DynImage {
    let layout = ImageLayout::new(PixelLength(5), PixelLength(3), format.channels(), 1);
    let semantics = ImageSemantics::new(format, SampleFormat::UnsignedInteger);
    let mut img = DynImage::new(layout, semantics).unwrap();
    for (i, b) in img.as_bytes_mut().iter_mut().enumerate() {
        *b = (i * 7 % 256) as u8;
    }
    img
}

#[test]
fn test_every_pair_keeps_shape() {
    for (src, dst, kind) in supported_conversions() {
        let img = dyn_source(src);
        let alpha = (kind == ConversionKind::RequiresAlpha).then_some(128.0);
        let out = convert_dyn(&img.view(), dst, alpha).unwrap();
        assert_eq!(out.width(), img.width(), "{src} -> {dst}");
        assert_eq!(out.height(), img.height(), "{src} -> {dst}");
        assert_eq!(out.layout().channels(), dst.channels(), "{src} -> {dst}");
        assert_eq!(out.pixel_format(), dst);
    }
}

#[test]
fn test_identity_pairs_copy() {
    for format in PixelFormat::KNOWN {
        let img = dyn_source(format);
        let out = convert_dyn(&img.view(), format, None).unwrap();
        assert_eq!(out.as_bytes(), img.as_bytes(), "{format}");
    }
}

#[test]
fn test_rgb_bgr_round_trip() {
    let src = rgb_ramp(7, 5);
    let bgr = convert_image::<tag::Bgr, _>(&src).unwrap();
    let back = convert_image::<tag::Rgb, _>(&bgr).unwrap();
    assert!(src.pixels().eq(back.pixels()));

    let p = bgr.pixel(PixelIndex(1), PixelIndex(0));
    let q = src.pixel(PixelIndex(1), PixelIndex(0));
    assert_eq!(p.into_array(), [q[2], q[1], q[0]]);
}

#[test]
fn test_rgb_to_y_formula() {
    let src = rgb_ramp(9, 4);
    let gray = convert_image::<tag::Y, _>(&src).unwrap();
    for (s, g) in src.pixels().zip(gray.pixels()) {
        let expected = (0.299 * s[0] as f64 + 0.587 * s[1] as f64 + 0.114 * s[2] as f64).round() as u8;
        assert_eq!(g[0], expected);
        assert_eq!(g[0], luma(s[0], s[1], s[2]));
    }

    let one = Image::filled(PixelLength(1), PixelLength(1), PixelRgb8::new([10, 11, 12])).unwrap();
    let y = convert_image::<tag::Y, _>(&one).unwrap();
    assert_eq!(*y.pixel(PixelIndex(0), PixelIndex(0)), 11);
}

#[test]
fn test_rgb_to_rgba_alpha() {
    let src = rgb_ramp(6, 6);
    let rgba = convert_image_alpha::<tag::Rgba, _>(&src, 192).unwrap();
    assert_eq!(rgba.layout().channels(), 4);
    for (s, d) in src.pixels().zip(rgba.pixels()) {
        assert_eq!(&d.channels()[..3], s.channels());
        assert_eq!(d[3], 192);
    }
}

#[test]
fn test_alpha_is_kept_when_present() {
    let src = Image::filled(PixelLength(2), PixelLength(2), PixelBgra8::new([1, 2, 3, 4])).unwrap();
    let out = convert_image::<tag::Argb, _>(&src).unwrap();
    assert!(out.pixels().all(|p| *p == PixelArgb8::new([4, 3, 2, 1])));
    let out = convert_image::<tag::Ya, _>(&src).unwrap();
    assert!(out.pixels().all(|p| *p == PixelYa8::new([luma(3, 2, 1), 4])));
}

#[test]
fn test_short_stride_rejected() {
    let err = ImageLayout::with_stride(PixelLength(4), PixelLength(2), 3, 1, Stride(11)).unwrap_err();
    assert!(matches!(err, Error::InvalidStride { .. }));
    assert!(ImageLayout::with_stride(PixelLength(4), PixelLength(2), 3, 1, Stride(12)).is_ok());
}

#[test]
fn test_into_mismatch_does_not_resize() {
    let src = rgb_ramp(4, 4);
    let mut dst = Image::<PixelY8>::filled(PixelLength(4), PixelLength(3), PixelY8::new([9])).unwrap();
    let err = convert_image_into(&src, &mut dst).unwrap_err();
    assert!(err.is_shape_mismatch());
    assert_eq!(dst.height(), PixelLength(3));
    assert!(dst.pixels().all(|p| *p == 9));
}

#[test]
fn test_window_to_window() {
    let src = rgb_ramp(8, 8);
    let mut dst = Image::<PixelBgr8>::new(PixelLength(8), PixelLength(8)).unwrap();
    let bbox = BoundingBox::new(PixelIndex(2), PixelIndex(3), PixelLength(4), PixelLength(2));
    let src_win = src.window(bbox).unwrap();
    {
        let mut dst_win = dst.window_mut(bbox).unwrap();
        convert_image_into(&src_win, &mut dst_win).unwrap();
    }
    let s = src.pixel(PixelIndex(5), PixelIndex(4));
    assert_eq!(dst.pixel(PixelIndex(5), PixelIndex(4)).into_array(), [s[2], s[1], s[0]]);
    assert_eq!(*dst.pixel(PixelIndex(1), PixelIndex(3)), PixelBgr8::default());
    assert_eq!(*dst.pixel(PixelIndex(6), PixelIndex(4)), PixelBgr8::default());
}

#[test]
fn test_decode_boundary() {
    let mut log = MessageLog::new();
    let decoded = dyn_source(PixelFormat::Rgb);
    let rgb = decoded.clone().into_typed::<PixelRgb8>(Some(&mut log)).unwrap();
    assert!(log.is_empty());
    let gray = convert_image::<tag::Y, _>(&rgb).unwrap();

    let encoded = gray.dyn_view();
    assert_eq!(encoded.pixel_format(), PixelFormat::Y);
    assert_eq!(encoded.as_bytes(), gray.as_bytes());

    let err = decoded.into_typed::<PixelRgba8>(None).unwrap_err();
    assert!(matches!(err, Error::ChannelMismatch { expected: 4, got: 3 }));
}

#[test]
fn test_dyn_errors() {
    let img = dyn_source(PixelFormat::Y);
    assert!(matches!(
        convert_dyn(&img.view(), PixelFormat::Unknown, None),
        Err(OpsError::UnsupportedConversion { .. })
    ));
    assert!(matches!(
        convert_dyn(&img.view(), PixelFormat::Ya, None),
        Err(OpsError::AlphaRequired { .. })
    ));
}

fn unsigned(format: PixelFormat) -> ImageSemantics {
    ImageSemantics::new(format, SampleFormat::UnsignedInteger)
}

#[test]
fn test_dyn_padded_stride() {
    // Two RGB rows with two bytes of padding after the first.
    let bytes = [10, 11, 12, 20, 21, 22, 0, 0, 30, 31, 32, 40, 41, 42];
    let layout = ImageLayout::with_stride(PixelLength(2), PixelLength(2), 3, 1, Stride(8)).unwrap();
    let src = DynImageView::from_bytes(&bytes, layout, unsigned(PixelFormat::Rgb)).unwrap();

    let bgr = convert_dyn(&src, PixelFormat::Bgr, None).unwrap();
    assert!(bgr.layout().is_packed());
    assert_eq!(bgr.as_bytes(), &[12, 11, 10, 22, 21, 20, 32, 31, 30, 42, 41, 40]);

    let gray = convert_dyn(&src, PixelFormat::Y, None).unwrap();
    assert_eq!(
        gray.as_bytes(),
        &[luma(10u8, 11, 12), luma(20, 21, 22), luma(30, 31, 32), luma(40, 41, 42)]
    );

    let mut buf = [0xEEu8; 16];
    {
        let mut dst = DynImageViewMut::from_bytes(&mut buf, layout, unsigned(PixelFormat::Bgr)).unwrap();
        convert_dyn_into(&src, &mut dst, None).unwrap();
    }
    assert_eq!(&buf[..6], &[12, 11, 10, 22, 21, 20]);
    assert_eq!(&buf[6..8], &[0xEE, 0xEE]);
    assert_eq!(&buf[8..14], &[32, 31, 30, 42, 41, 40]);
    assert_eq!(&buf[14..], &[0xEE, 0xEE]);
}

#[test]
fn test_dyn_window() {
    let img = dyn_source(PixelFormat::Rgb);
    let view = img.view();
    let bbox = BoundingBox::new(PixelIndex(1), PixelIndex(1), PixelLength(3), PixelLength(2));
    let win = view.window(bbox).unwrap();

    let out = convert_dyn(&win, PixelFormat::Bgr, None).unwrap();
    assert_eq!(out.width(), PixelLength(3));
    assert_eq!(out.height(), PixelLength(2));
    let src = img.as_bytes();
    let dst = out.as_bytes();
    for y in 0..2usize {
        for x in 0..3usize {
            let s = ((y + 1) * 5 + x + 1) * 3;
            let d = (y * 3 + x) * 3;
            assert_eq!(&dst[d..d + 3], &[src[s + 2], src[s + 1], src[s]], "({x}, {y})");
        }
    }
}

#[test]
fn test_dyn_misaligned_rows_leave_destination_untouched() {
    // u16 storage read through an odd byte stride: row 1 starts off a u16 boundary.
    let backing_layout = ImageLayout::new(PixelLength(3), PixelLength(2), 1, 2);
    let mut backing = DynImage::new(backing_layout, unsigned(PixelFormat::Y)).unwrap();
    for word in backing.as_bytes_mut().chunks_exact_mut(2) {
        word.copy_from_slice(&1000u16.to_ne_bytes());
    }
    let layout = ImageLayout::with_stride(PixelLength(2), PixelLength(2), 1, 2, Stride(5)).unwrap();
    let src = DynImageView::from_bytes(backing.as_bytes(), layout, unsigned(PixelFormat::Y)).unwrap();

    let dst_layout = ImageLayout::new(PixelLength(2), PixelLength(2), 3, 2);
    let mut dst = DynImage::new(dst_layout, unsigned(PixelFormat::Rgb)).unwrap();
    dst.as_bytes_mut().fill(0xFF);

    let err = convert_dyn_into(&src, &mut dst.view_mut(), None).unwrap_err();
    assert!(matches!(err, OpsError::Core(Error::MisalignedBuffer { align: 2 })));
    assert!(dst.as_bytes().iter().all(|&b| b == 0xFF));

    let err = convert_dyn(&src, PixelFormat::Rgb, None).unwrap_err();
    assert!(matches!(err, OpsError::Core(Error::MisalignedBuffer { align: 2 })));
}

#[test]
fn test_dyn_errors_leave_destination_untouched() {
    let img = dyn_source(PixelFormat::Rgb);
    let cases = [
        (ImageLayout::new(PixelLength(5), PixelLength(2), 1, 1), unsigned(PixelFormat::Y)),
        (
            ImageLayout::new(PixelLength(5), PixelLength(3), 1, 1),
            ImageSemantics::new(PixelFormat::Y, SampleFormat::SignedInteger),
        ),
        (ImageLayout::new(PixelLength(5), PixelLength(3), 1, 2), unsigned(PixelFormat::Y)),
        (ImageLayout::new(PixelLength(5), PixelLength(3), 4, 1), unsigned(PixelFormat::Rgba)),
    ];
    for (layout, semantics) in cases {
        let mut dst = DynImage::new(layout, semantics).unwrap();
        dst.as_bytes_mut().fill(0x5A);
        assert!(convert_dyn_into(&img.view(), &mut dst.view_mut(), None).is_err(), "{layout}");
        assert!(dst.as_bytes().iter().all(|&b| b == 0x5A), "{layout}");
    }
}
