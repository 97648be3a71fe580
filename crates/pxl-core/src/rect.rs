//! Bounding boxes for windowed views.
//!
//! A [`BoundingBox`] selects the sub-rectangle of an image that a window
//! view aliases. The origin is a signed [`PixelIndex`] so boxes can be
//! described relative to any origin; only boxes that lie inside the image
//! produce a window.
//!
//! # Coordinate System
//!
//! ```text
//! (0,0) ────────► X
//!   │
//!   │   ┌──────────┐
//!   │   │  Window  │
//!   │   └──────────┘
//!   ▼
//!   Y
//! ```
//!
//! # Usage
//!
//! ```rust
//! use pxl_core::{BoundingBox, PixelIndex, PixelLength};
//!
//! let bbox = BoundingBox::new(PixelIndex(1), PixelIndex(1), PixelLength(2), PixelLength(2));
//! assert!(bbox.contains(PixelIndex(2), PixelIndex(2)));
//! assert!(!bbox.contains(PixelIndex(3), PixelIndex(1)));
//! assert!(bbox.fits_within(PixelLength(3), PixelLength(3)));
//! ```

use crate::types::{PixelIndex, PixelLength};

/// Axis-aligned rectangle given by its top-left corner and size.
///
/// Left/top edges are inclusive, right/bottom edges exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BoundingBox {
    /// X coordinate of the left edge
    pub x0: PixelIndex,
    /// Y coordinate of the top edge
    pub y0: PixelIndex,
    /// Width in pixels
    pub width: PixelLength,
    /// Height in pixels
    pub height: PixelLength,
}

impl BoundingBox {
    /// Creates a bounding box from its origin and size.
    #[inline]
    pub const fn new(x0: PixelIndex, y0: PixelIndex, width: PixelLength, height: PixelLength) -> Self {
        Self {
            x0,
            y0,
            width,
            height,
        }
    }

    /// Box at the origin covering `width` x `height`.
    #[inline]
    pub const fn from_size(width: PixelLength, height: PixelLength) -> Self {
        Self::new(PixelIndex(0), PixelIndex(0), width, height)
    }

    /// Exclusive right edge.
    #[inline]
    pub fn x1(&self) -> PixelIndex {
        self.x0 + self.width
    }

    /// Exclusive bottom edge.
    #[inline]
    pub fn y1(&self) -> PixelIndex {
        self.y0 + self.height
    }

    /// Area in pixels.
    #[inline]
    pub const fn area(&self) -> u64 {
        self.width.0 as u64 * self.height.0 as u64
    }

    /// Returns `true` if either dimension is zero.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.width.0 == 0 || self.height.0 == 0
    }

    /// Returns `true` if `(x, y)` lies inside the box.
    #[inline]
    pub fn contains(&self, x: PixelIndex, y: PixelIndex) -> bool {
        x >= self.x0 && x < self.x1() && y >= self.y0 && y < self.y1()
    }

    /// Returns `true` if the box lies inside `[0, width) x [0, height)`.
    ///
    /// Empty boxes fit anywhere inside the bounds, including their far edge.
    pub fn fits_within(&self, width: PixelLength, height: PixelLength) -> bool {
        let (x0, y0) = (self.x0.0 as i64, self.y0.0 as i64);
        x0 >= 0
            && y0 >= 0
            && x0 + self.width.0 as i64 <= width.0 as i64
            && y0 + self.height.0 as i64 <= height.0 as i64
    }

    /// Intersection with another box, or `None` if they do not overlap.
    pub fn intersect(&self, other: &BoundingBox) -> Option<BoundingBox> {
        let x0 = self.x0.max(other.x0);
        let y0 = self.y0.max(other.y0);
        let x1 = self.x1().min(other.x1());
        let y1 = self.y1().min(other.y1());

        if x0 < x1 && y0 < y1 {
            Some(BoundingBox::new(
                x0,
                y0,
                PixelLength((x1.0 - x0.0) as u32),
                PixelLength((y1.0 - y0.0) as u32),
            ))
        } else {
            None
        }
    }

    /// This box moved by `(dx, dy)`.
    #[inline]
    pub fn translate(&self, dx: PixelIndex, dy: PixelIndex) -> BoundingBox {
        BoundingBox::new(self.x0 + dx, self.y0 + dy, self.width, self.height)
    }
}

impl std::fmt::Display for BoundingBox {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "BoundingBox({}, {}, {}x{})",
            self.x0, self.y0, self.width, self.height
        )
    }
}
