//! Sampling tests for pxl-ops.

use approx::assert_relative_eq;
use pxl_core::prelude::*;
use pxl_ops::access::{Accessor, Bilinear, NearestNeighbor, Replicated, Unchecked, ZeroPadding};
use pxl_ops::convert::convert_image;
use pxl_ops::InterpolationMode;

/// 3x3 gray image holding 10, 20, ..., 90 in row-major order.
fn grid() -> Image<PixelY8> {
    let px: Vec<PixelY8> = (1..=9u8).map(|v| PixelY8::new([v * 10])).collect();
    Image::from_pixels(PixelLength(3), PixelLength(3), &px).unwrap()
}

#[test]
fn test_nearest_neighbor() {
    let img = grid();
    let acc: Accessor<'_, _> = Accessor::new(&img);
    assert_eq!(acc.sample::<NearestNeighbor>(0.0, 0.0), 10);
    assert_eq!(acc.sample::<NearestNeighbor>(0.51, 0.0), 20);
    assert_eq!(acc.sample::<NearestNeighbor>(1.11, 0.88), 50);
    assert_eq!(acc.sample::<NearestNeighbor>(1.8, 1.6), 90);
}

#[test]
fn test_nearest_at_integers_is_exact() {
    let img = grid();
    let acc: Accessor<'_, _, Unchecked> = Accessor::new(&img);
    for y in 0..3 {
        for x in 0..3 {
            let stored = *img.pixel(PixelIndex(x), PixelIndex(y));
            assert_eq!(acc.sample::<NearestNeighbor>(x as f64, y as f64), stored);
        }
    }
}

#[test]
fn test_bilinear() {
    let img = grid();
    let acc: Accessor<'_, _> = Accessor::new(&img);
    assert_relative_eq!(acc.sample::<Bilinear>(0.0, 0.0)[0], 10.0);
    assert_relative_eq!(acc.sample::<Bilinear>(0.51, 0.0)[0], 15.1, epsilon = 1e-9);
    assert_relative_eq!(acc.sample::<Bilinear>(1.11, 0.88)[0], 47.5, epsilon = 1e-9);
    assert_relative_eq!(acc.sample::<Bilinear>(1.8, 1.6)[0], 76.0, epsilon = 1e-9);
}

#[test]
fn test_bilinear_at_integers_is_exact() {
    let img = grid();
    let acc: Accessor<'_, _, Unchecked> = Accessor::new(&img);
    for y in 0..3 {
        for x in 0..3 {
            let stored = img.pixel(PixelIndex(x), PixelIndex(y))[0] as f64;
            assert_eq!(acc.sample::<Bilinear>(x as f64, y as f64)[0], stored);
        }
    }
}

#[test]
fn test_replicated_border() {
    let img = grid();
    let acc: Accessor<'_, _, Replicated> = Accessor::new(&img);
    assert_eq!(acc.sample::<NearestNeighbor>(-2.0, 1.0), 40);
    assert_eq!(acc.sample::<NearestNeighbor>(0.0, 3.0), 70);
    assert_eq!(
        acc.sample::<NearestNeighbor>(7.3, -4.0),
        acc.sample::<NearestNeighbor>(2.0, 0.0)
    );
    assert_relative_eq!(
        acc.sample::<Bilinear>(-5.0, 1.5)[0],
        acc.sample::<Bilinear>(0.0, 1.5)[0]
    );
}

#[test]
fn test_zero_padding_border() {
    let img = grid();
    let acc: Accessor<'_, _, ZeroPadding> = Accessor::new(&img);
    assert_eq!(acc.sample::<NearestNeighbor>(-1.0, 1.0), 0);
    assert_relative_eq!(acc.sample::<Bilinear>(-0.5, 0.0)[0], 5.0);
}

#[test]
fn test_relative_accessor() {
    let img = grid();
    let base: Accessor<'_, _> = Accessor::new(&img);
    let acc = base.relative(PixelIndex(1), PixelIndex(1));

    assert_eq!(
        acc.sample::<NearestNeighbor>(-1.0, -1.0),
        base.sample::<NearestNeighbor>(0.0, 0.0)
    );
    assert_eq!(acc.sample::<NearestNeighbor>(-1.0, -1.0), 10);
    assert_eq!(acc.sample::<NearestNeighbor>(-0.49, -1.0), 20);
    assert_eq!(acc.sample::<NearestNeighbor>(0.11, -0.12), 50);
    assert_eq!(acc.sample::<NearestNeighbor>(0.8, 0.6), 90);

    assert_relative_eq!(acc.sample::<Bilinear>(-1.0, -1.0)[0], 10.0);
    assert_relative_eq!(acc.sample::<Bilinear>(-0.49, -1.0)[0], 15.1, epsilon = 1e-9);
    assert_relative_eq!(acc.sample::<Bilinear>(0.11, -0.12)[0], 47.5, epsilon = 1e-9);
    assert_relative_eq!(acc.sample::<Bilinear>(0.8, 0.6)[0], 76.0, epsilon = 1e-9);
}

#[test]
fn test_relative_keeps_image_bounds() {
    let img = grid();
    let base: Accessor<'_, _> = Accessor::new(&img);
    let acc = base.relative(PixelIndex(2), PixelIndex(2));
    // (1, 1) relative is (3, 3) absolute, clamped to the real corner.
    assert_eq!(acc.sample::<NearestNeighbor>(1.0, 1.0), 90);
    assert_eq!(acc.sample::<NearestNeighbor>(-2.0, -2.0), 10);
}

#[test]
fn test_runtime_modes_agree() {
    let img = grid();
    let acc: Accessor<'_, _> = Accessor::new(&img);
    for &(x, y) in &[(0.0, 0.0), (0.51, 0.0), (1.11, 0.88), (1.8, 1.6), (-3.0, 4.2)] {
        let n = acc.sample_with(InterpolationMode::NearestNeighbor, x, y);
        assert_eq!(n[0], acc.sample::<NearestNeighbor>(x, y)[0] as f64);
        let b = acc.sample_with(InterpolationMode::Bilinear, x, y);
        assert_eq!(b[0], acc.sample::<Bilinear>(x, y)[0]);
    }
}

#[test]
fn test_sample_converted_rgb() {
    let px: Vec<PixelRgb8> = (0..4u8).map(|i| PixelRgb8::new([i * 40, 100, 200 - i * 40])).collect();
    let img = Image::from_pixels(PixelLength(2), PixelLength(2), &px).unwrap();
    let bgr = convert_image::<tag::Bgr, _>(&img).unwrap();
    let acc: Accessor<'_, _> = Accessor::new(&bgr);
    let v = acc.sample::<Bilinear>(0.5, 0.5);
    assert_relative_eq!(v[0], 140.0);
    assert_relative_eq!(v[1], 100.0);
    assert_relative_eq!(v[2], 60.0);
}

#[test]
fn test_sample_padded_view() {
    let img = grid();
    let mut padded =
        Image::<PixelY8>::with_alignment(PixelLength(3), PixelLength(3), RowAlignment::bytes(16)).unwrap();
    for (dst, src) in padded.rows_mut().zip(img.rows()) {
        dst.copy_from_slice(src);
    }
    assert!(!padded.layout().is_packed());
    let a: Accessor<'_, _> = Accessor::new(&img);
    let b: Accessor<'_, _> = Accessor::new(&padded);
    assert_relative_eq!(
        a.sample::<Bilinear>(1.11, 0.88)[0],
        b.sample::<Bilinear>(1.11, 0.88)[0]
    );
}
