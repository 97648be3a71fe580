//! Pixel and sample format tags.
//!
//! # Types
//!
//! - [`PixelFormat`] - Runtime tag describing channel semantics and count
//! - [`SampleFormat`] - Runtime tag describing the per-channel value type
//! - [`FormatTag`] / [`KnownFormat`] - Compile-time counterparts, implemented
//!   by the zero-sized markers in [`tag`]
//!
//! # Usage
//!
//! ```rust
//! use pxl_core::format::{PixelFormat, FormatTag, KnownFormat, tag};
//!
//! assert_eq!(PixelFormat::Argb.channels(), 4);
//! assert!(PixelFormat::Ya.has_alpha());
//! assert_eq!(<tag::Bgr as FormatTag>::FORMAT, PixelFormat::Bgr);
//! assert_eq!(<tag::Bgr as KnownFormat>::CHANNELS, 3);
//! ```

use crate::pixel::{Element, Pixel, PixelType};
use std::fmt;

/// Semantic tag assigned to a pixel type or a dynamic image.
///
/// Channel order in memory follows the name: `Argb` stores alpha first,
/// `Bgr` stores blue first. `Unknown` has no fixed channel count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PixelFormat {
    /// Completely unknown pixel format.
    #[default]
    Unknown,
    /// 1-channel format: grayscale.
    Y,
    /// 2-channel format: grayscale and alpha.
    Ya,
    /// 3-channel format: red, green, blue.
    Rgb,
    /// 3-channel format: blue, green, red.
    Bgr,
    /// 4-channel format: red, green, blue, alpha.
    Rgba,
    /// 4-channel format: blue, green, red, alpha.
    Bgra,
    /// 4-channel format: alpha, red, green, blue.
    Argb,
    /// 4-channel format: alpha, blue, green, red.
    Abgr,
}

impl PixelFormat {
    /// The eight formats that take part in conversions.
    pub const KNOWN: [PixelFormat; 8] = [
        Self::Y,
        Self::Ya,
        Self::Rgb,
        Self::Bgr,
        Self::Rgba,
        Self::Bgra,
        Self::Argb,
        Self::Abgr,
    ];

    /// Number of channels, or 0 for `Unknown`.
    #[inline]
    pub const fn channels(&self) -> u16 {
        match self {
            Self::Unknown => 0,
            Self::Y => 1,
            Self::Ya => 2,
            Self::Rgb | Self::Bgr => 3,
            Self::Rgba | Self::Bgra | Self::Argb | Self::Abgr => 4,
        }
    }

    /// Whether the format carries an alpha channel.
    #[inline]
    pub const fn has_alpha(&self) -> bool {
        matches!(
            self,
            Self::Ya | Self::Rgba | Self::Bgra | Self::Argb | Self::Abgr
        )
    }

    /// Whether this is the `Unknown` tag.
    #[inline]
    pub const fn is_unknown(&self) -> bool {
        matches!(self, Self::Unknown)
    }

    /// Whether converting from `src` to `dst` needs an externally supplied
    /// alpha value (the target has alpha, the source does not).
    #[inline]
    pub const fn conversion_requires_alpha(src: PixelFormat, dst: PixelFormat) -> bool {
        !src.has_alpha() && dst.has_alpha()
    }

    /// Short upper-case name.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Unknown => "unknown",
            Self::Y => "Y",
            Self::Ya => "YA",
            Self::Rgb => "RGB",
            Self::Bgr => "BGR",
            Self::Rgba => "RGBA",
            Self::Bgra => "BGRA",
            Self::Argb => "ARGB",
            Self::Abgr => "ABGR",
        }
    }
}

impl fmt::Display for PixelFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Semantic tag for the per-channel value type of a dynamic image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SampleFormat {
    /// Unsigned integer samples.
    UnsignedInteger,
    /// Signed integer samples.
    SignedInteger,
    /// IEEE floating point samples.
    FloatingPoint,
    /// Unknown sample type.
    #[default]
    Unknown,
}

impl SampleFormat {
    /// Short name for display.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::UnsignedInteger => "unsigned integer",
            Self::SignedInteger => "signed integer",
            Self::FloatingPoint => "floating point",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for SampleFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Compile-time pixel format tag.
///
/// Implemented by the zero-sized marker types in [`tag`].
pub trait FormatTag: Copy + Default + Send + Sync + 'static {
    /// Runtime counterpart of this tag.
    const FORMAT: PixelFormat;
}

/// A format tag with a fixed channel count.
///
/// Every tag except [`tag::Unknown`] implements this; `PixelOf<T>` names the
/// canonical pixel type of the format for element type `T`.
pub trait KnownFormat: FormatTag {
    /// Number of channels.
    const CHANNELS: usize;

    /// Pixel type of this format with element type `T`.
    type PixelOf<T: Element>: PixelType<Element = T, Format = Self>;
}

/// Zero-sized format markers.
pub mod tag {
    use super::*;

    macro_rules! format_tags {
        ($($(#[$doc:meta])* $name:ident => $channels:literal),* $(,)?) => {
            $(
                $(#[$doc])*
                #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
                pub struct $name;

                impl FormatTag for $name {
                    const FORMAT: PixelFormat = PixelFormat::$name;
                }

                impl KnownFormat for $name {
                    const CHANNELS: usize = $channels;
                    type PixelOf<T: Element> = Pixel<T, $channels, $name>;
                }
            )*
        };
    }

    format_tags! {
        /// Grayscale.
        Y => 1,
        /// Grayscale and alpha.
        Ya => 2,
        /// Red, green, blue.
        Rgb => 3,
        /// Blue, green, red.
        Bgr => 3,
        /// Red, green, blue, alpha.
        Rgba => 4,
        /// Blue, green, red, alpha.
        Bgra => 4,
        /// Alpha, red, green, blue.
        Argb => 4,
        /// Alpha, blue, green, red.
        Abgr => 4,
    }

    /// Unknown format; pixels carry a channel count but no semantics.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Unknown;

    impl FormatTag for Unknown {
        const FORMAT: PixelFormat = PixelFormat::Unknown;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channels() {
        assert_eq!(PixelFormat::Unknown.channels(), 0);
        assert_eq!(PixelFormat::Y.channels(), 1);
        assert_eq!(PixelFormat::Ya.channels(), 2);
        assert_eq!(PixelFormat::Bgr.channels(), 3);
        assert_eq!(PixelFormat::Abgr.channels(), 4);
    }

    #[test]
    fn test_tags_match_runtime_formats() {
        assert_eq!(<tag::Ya as KnownFormat>::CHANNELS, 2);
        assert_eq!(<tag::Argb as FormatTag>::FORMAT, PixelFormat::Argb);
        assert_eq!(<tag::Unknown as FormatTag>::FORMAT, PixelFormat::Unknown);
        assert_eq!(
            <tag::Rgba as KnownFormat>::CHANNELS,
            PixelFormat::Rgba.channels() as usize
        );
    }

    #[test]
    fn test_requires_alpha() {
        assert!(PixelFormat::conversion_requires_alpha(PixelFormat::Rgb, PixelFormat::Rgba));
        assert!(PixelFormat::conversion_requires_alpha(PixelFormat::Y, PixelFormat::Ya));
        assert!(!PixelFormat::conversion_requires_alpha(PixelFormat::Rgba, PixelFormat::Y));
        assert!(!PixelFormat::conversion_requires_alpha(PixelFormat::Rgba, PixelFormat::Argb));
        assert!(!PixelFormat::conversion_requires_alpha(PixelFormat::Rgb, PixelFormat::Bgr));
    }

    #[test]
    fn test_display() {
        assert_eq!(PixelFormat::Bgra.to_string(), "BGRA");
        assert_eq!(SampleFormat::FloatingPoint.to_string(), "floating point");
    }
}
