//! # pxl-core
//!
//! Core image types for the pxl workspace.
//!
//! This crate provides the image data model used throughout pxl:
//!
//! - [`Element`], [`Pixel`], [`PixelType`] - Compile-time pixel description
//!   `{element type, channel count, format}`
//! - [`PixelFormat`], [`SampleFormat`] - Runtime format tags
//! - [`ImageLayout`] - Width, height, channels, element size and stride
//! - [`Image`], [`ImageView`], [`ImageViewMut`] - Typed owned images and views
//! - [`DynImage`], [`DynImageView`], [`DynImageViewMut`] - Runtime-typed
//!   images for the codec boundary
//! - [`BoundingBox`] - Window selection
//! - [`MessageLog`] - Append-only diagnostics
//!
//! ## Design Philosophy
//!
//! The pixel type is part of the image type. An RGB image cannot be read as
//! BGR, and a dynamic image becomes typed only through a checked cast:
//!
//! ```ignore
//! let decoded: DynImage = decode_png(bytes)?;
//! let rgb: Image<PixelRgb8> = decoded.into_typed(Some(&mut log))?;
//! // let bgr: Image<PixelBgr8> = rgb; // Compile error!
//! ```
//!
//! Views borrow their bytes; owned images own them exclusively. Rows may be
//! padded, so everything that walks pixels goes through the stride.
//!
//! ## Crate Structure
//!
//! ```text
//! pxl-core (this crate)
//!    ^
//!    |
//!    +-- pxl-ops (format conversion, sampling)
//!    +-- pxl-bench
//! ```
//!
//! ## Feature Flags
//!
//! - `serde` - Enable serialization for formats, layouts and geometry types

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod buffer;
pub mod dynamic;
pub mod error;
pub mod format;
pub mod image;
pub mod layout;
pub mod message;
pub mod pixel;
pub mod rect;
pub mod types;

// Re-exports for convenience
pub use dynamic::*;
pub use error::*;
pub use format::{FormatTag, KnownFormat, PixelFormat, SampleFormat, tag};
pub use image::*;
pub use layout::*;
pub use message::*;
pub use pixel::*;
pub use rect::*;
pub use types::*;

/// Prelude module for convenient imports.
///
/// # Usage
///
/// ```
/// use pxl_core::prelude::*;
/// ```
pub mod prelude {
    pub use crate::dynamic::{DynImage, DynImageView, DynImageViewMut, ImageSemantics};
    pub use crate::error::{Error, Result};
    pub use crate::format::{FormatTag, KnownFormat, PixelFormat, SampleFormat, tag};
    pub use crate::image::{Image, ImageRead, ImageView, ImageViewMut, ImageWrite};
    pub use crate::layout::{ImageLayout, RowAlignment};
    pub use crate::message::{MessageKind, MessageLog};
    pub use crate::pixel::{
        Element, Pixel, Pixel8u1, Pixel8u2, Pixel8u3, Pixel8u4, Pixel16u1, Pixel16u3, Pixel32f1,
        Pixel32f3, PixelAbgr8, PixelArgb8, PixelBgr8, PixelBgra8, PixelRgb8, PixelRgb16,
        PixelRgbF32, PixelRgba8, PixelRgba16, PixelRgbaF32, PixelType, PixelY8, PixelY16,
        PixelYF32, PixelYa8,
    };
    pub use crate::rect::BoundingBox;
    pub use crate::types::{PixelIndex, PixelLength, Stride};
}
