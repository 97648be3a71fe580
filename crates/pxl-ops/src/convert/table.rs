//! The conversion table.
//!
//! Every ordered pair of known formats maps to a [`ConversionPlan`]: for each
//! target channel, where its value comes from. The rules are:
//!
//! - a target channel takes the source channel with the same role
//! - gray without a gray source is the luma of red, green and blue
//! - red, green or blue without a colour source replicate gray
//! - alpha without an alpha source is the caller-supplied value
//!
//! A pair needs a supplied alpha exactly when the target has alpha and the
//! source does not. Pairs involving [`PixelFormat::Unknown`] are unsupported.

use pxl_core::{Element, PixelFormat};

/// Luma weight of red.
pub const LUMA_R: f64 = 0.299;
/// Luma weight of green.
pub const LUMA_G: f64 = 0.587;
/// Luma weight of blue.
pub const LUMA_B: f64 = 0.114;

/// Luma of one pixel: `round(0.299 R + 0.587 G + 0.114 B)` for integer
/// elements, unrounded for float elements.
#[inline]
pub fn luma<T: Element>(r: T, g: T, b: T) -> T {
    T::from_f64(LUMA_R * r.to_f64() + LUMA_G * g.to_f64() + LUMA_B * b.to_f64())
}

/// How a format pair converts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConversionKind {
    /// Not in the table.
    Unsupported,
    /// Fixed per-pixel transform.
    Direct,
    /// Transform that needs a supplied alpha value.
    RequiresAlpha,
}

/// Semantic role of a channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Role {
    Gray,
    Red,
    Green,
    Blue,
    Alpha,
}

const fn roles(format: PixelFormat) -> &'static [Role] {
    use Role::*;
    match format {
        PixelFormat::Unknown => &[],
        PixelFormat::Y => &[Gray],
        PixelFormat::Ya => &[Gray, Alpha],
        PixelFormat::Rgb => &[Red, Green, Blue],
        PixelFormat::Bgr => &[Blue, Green, Red],
        PixelFormat::Rgba => &[Red, Green, Blue, Alpha],
        PixelFormat::Bgra => &[Blue, Green, Red, Alpha],
        PixelFormat::Argb => &[Alpha, Red, Green, Blue],
        PixelFormat::Abgr => &[Alpha, Blue, Green, Red],
    }
}

const fn position(roles: &[Role], role: Role) -> Option<u8> {
    let mut i = 0;
    while i < roles.len() {
        if roles[i] as u8 == role as u8 {
            return Some(i as u8);
        }
        i += 1;
    }
    None
}

/// Where a target channel takes its value from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Source {
    Channel(u8),
    Luma { r: u8, g: u8, b: u8 },
    Alpha,
}

/// Per-channel recipe converting one pixel format into another.
///
/// ```rust
/// use pxl_core::PixelFormat;
/// use pxl_ops::convert::ConversionPlan;
///
/// let plan = ConversionPlan::between(PixelFormat::Bgr, PixelFormat::Rgba).unwrap();
/// assert!(plan.requires_alpha());
///
/// let mut out = [0u8; 4];
/// plan.apply(&[3u8, 2, 1], &mut out, 255);
/// assert_eq!(out, [1, 2, 3, 255]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConversionPlan {
    src: PixelFormat,
    dst: PixelFormat,
    sources: [Source; 4],
    requires_alpha: bool,
}

impl ConversionPlan {
    /// Plan for `src -> dst`, or `None` if the pair is unsupported.
    pub const fn between(src: PixelFormat, dst: PixelFormat) -> Option<Self> {
        if src.is_unknown() || dst.is_unknown() {
            return None;
        }
        let s = roles(src);
        let d = roles(dst);
        let mut sources = [Source::Alpha; 4];
        let mut i = 0;
        while i < d.len() {
            sources[i] = match d[i] {
                Role::Gray => match position(s, Role::Gray) {
                    Some(k) => Source::Channel(k),
                    None => match (
                        position(s, Role::Red),
                        position(s, Role::Green),
                        position(s, Role::Blue),
                    ) {
                        (Some(r), Some(g), Some(b)) => Source::Luma { r, g, b },
                        _ => return None,
                    },
                },
                Role::Alpha => match position(s, Role::Alpha) {
                    Some(k) => Source::Channel(k),
                    None => Source::Alpha,
                },
                colour => match position(s, colour) {
                    Some(k) => Source::Channel(k),
                    None => match position(s, Role::Gray) {
                        Some(k) => Source::Channel(k),
                        None => return None,
                    },
                },
            };
            i += 1;
        }
        Some(Self {
            src,
            dst,
            sources,
            requires_alpha: PixelFormat::conversion_requires_alpha(src, dst),
        })
    }

    /// Plan for a pair that must convert without alpha.
    ///
    /// Fails const evaluation for other pairs.
    pub(crate) const fn direct(src: PixelFormat, dst: PixelFormat) -> Self {
        match Self::between(src, dst) {
            Some(plan) if !plan.requires_alpha => plan,
            _ => panic!("format pair is not a direct conversion"),
        }
    }

    /// Plan for a pair that must convert with a supplied alpha.
    ///
    /// Fails const evaluation for other pairs.
    pub(crate) const fn with_alpha(src: PixelFormat, dst: PixelFormat) -> Self {
        match Self::between(src, dst) {
            Some(plan) if plan.requires_alpha => plan,
            _ => panic!("format pair does not take an alpha value"),
        }
    }

    /// Source format.
    #[inline]
    pub const fn src(&self) -> PixelFormat {
        self.src
    }

    /// Target format.
    #[inline]
    pub const fn dst(&self) -> PixelFormat {
        self.dst
    }

    /// Whether the conversion needs a supplied alpha value.
    #[inline]
    pub const fn requires_alpha(&self) -> bool {
        self.requires_alpha
    }

    /// Channels written per pixel.
    #[inline]
    pub const fn dst_channels(&self) -> usize {
        self.dst.channels() as usize
    }

    /// Converts one pixel. `src` holds the source channels, `dst` receives
    /// the target channels; `alpha` is used only where the source has none.
    ///
    /// # Panics
    ///
    /// Panics if the slices are shorter than the formats' channel counts.
    #[inline]
    pub fn apply<T: Element>(&self, src: &[T], dst: &mut [T], alpha: T) {
        for (out, source) in dst[..self.dst_channels()].iter_mut().zip(&self.sources) {
            *out = match *source {
                Source::Channel(k) => src[k as usize],
                Source::Luma { r, g, b } => luma(src[r as usize], src[g as usize], src[b as usize]),
                Source::Alpha => alpha,
            };
        }
    }
}

/// Classifies the pair `src -> dst`.
pub const fn conversion_kind(src: PixelFormat, dst: PixelFormat) -> ConversionKind {
    match ConversionPlan::between(src, dst) {
        None => ConversionKind::Unsupported,
        Some(plan) if plan.requires_alpha => ConversionKind::RequiresAlpha,
        Some(_) => ConversionKind::Direct,
    }
}

/// Every supported pair with its kind, identity pairs included.
pub fn supported_conversions() -> impl Iterator<Item = (PixelFormat, PixelFormat, ConversionKind)> {
    PixelFormat::KNOWN.into_iter().flat_map(|src| {
        PixelFormat::KNOWN
            .into_iter()
            .map(move |dst| (src, dst, conversion_kind(src, dst)))
    })
}
