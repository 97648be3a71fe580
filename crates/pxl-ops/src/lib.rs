//! # pxl-ops
//!
//! Pixel format conversion and sub-pixel sampling for [`pxl_core`] images.
//!
//! # Modules
//!
//! - [`convert`] - Conversion table, typed and dynamic format conversion
//! - [`access`] - Border policies, accessors and interpolation
//! - `parallel` - Row-parallel conversion (feature `parallel`)
//!
//! # Example
//!
//! ```rust
//! use pxl_core::prelude::*;
//! use pxl_ops::access::{Accessor, Bilinear};
//! use pxl_ops::convert::{convert_image, convert_image_alpha};
//!
//! let rgb = Image::filled(PixelLength(4), PixelLength(4), PixelRgb8::new([10, 11, 12])).unwrap();
//!
//! // RGB -> Y is direct, RGB -> RGBA needs an alpha value.
//! let gray = convert_image::<tag::Y, _>(&rgb).unwrap();
//! let rgba = convert_image_alpha::<tag::Rgba, _>(&rgb, 255).unwrap();
//! assert_eq!(*rgba.pixel(PixelIndex(0), PixelIndex(0)), PixelRgba8::new([10, 11, 12, 255]));
//!
//! let acc: Accessor<'_, _> = Accessor::new(&gray);
//! let v = acc.sample::<Bilinear>(1.5, 2.25);
//! assert_eq!(v[0], 11.0);
//! ```
//!
//! # Common Operations
//!
//! ## Runtime formats
//!
//! ```rust,ignore
//! use pxl_ops::convert::convert_dyn;
//!
//! let decoded: DynImage = decode(bytes)?;
//! let gray = convert_dyn(&decoded.view(), PixelFormat::Y, None)?;
//! ```
//!
//! ## Relative sampling
//!
//! ```rust,ignore
//! let local = acc.relative(PixelIndex(16), PixelIndex(8));
//! let v = local.sample::<NearestNeighbor>(-0.5, 0.25);
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod error;
pub mod access;
pub mod convert;

#[cfg(feature = "parallel")]
pub mod parallel;

pub use error::{OpsError, OpsResult};
pub use access::{Accessor, BorderAccessMode, InterpolationMode};
pub use convert::{ConversionKind, conversion_kind};
