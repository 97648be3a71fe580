//! Border policies, accessors and sub-pixel interpolation.
//!
//! An [`Accessor`] pairs an image (or view) with a [`BorderPolicy`] chosen at
//! compile time:
//!
//! - [`Unchecked`] - coordinates must be in bounds
//! - [`ZeroPadding`] - outside reads return the zero pixel
//! - [`Replicated`] - outside reads clamp to the nearest edge (default)
//!
//! and samples it at fractional coordinates with an [`Interpolation`]:
//! [`NearestNeighbor`] or [`Bilinear`]. The runtime enums
//! [`BorderAccessMode`] and [`InterpolationMode`] select the same behaviour
//! through [`access_with`] and [`sample_with`].

mod accessor;
mod border;
mod interp;

pub use accessor::{Accessor, PixelAccess};
pub use border::{BorderAccessMode, BorderPolicy, Replicated, Unchecked, ZeroPadding, access_with};
pub use interp::{Bilinear, Interpolation, InterpolationMode, NearestNeighbor, sample_with, widen};
