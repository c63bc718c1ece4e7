//! Pure geometry helpers shared by the pipeline, the crop editor and the viewport.
//!
//! Nothing in this module holds state and nothing in it can fail: every
//! function is total over its inputs, with degenerate values (zero sizes,
//! non-positive scales) mapped to a sensible result instead of an error.
//!
//! # Coordinate spaces
//!
//! - **Source space**: pixels of the decoded image, before any transform.
//! - **Content space**: pixels of the intermediate raster (after rotation and
//!   flips, before crop and resize). Crop rectangles live here.
//! - **Screen space**: pixels of the display surface that pointer events are
//!   reported in. See [`crate::viewport::ViewTransform`].

use serde::{Deserialize, Serialize};

/// Smallest extent, in content pixels, a crop rectangle may have on either axis.
pub const MIN_CROP_SIZE: f64 = 10.0;

/// Quarter-turn rotation applied in the normalize pass.
///
/// Positive angles turn the image clockwise on screen (y grows downwards).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub enum Rotation {
    #[default]
    Deg0,
    Deg90,
    Deg180,
    Deg270,
}

impl Rotation {
    /// Rotation in whole degrees.
    pub fn degrees(self) -> u16 {
        match self {
            Rotation::Deg0 => 0,
            Rotation::Deg90 => 90,
            Rotation::Deg180 => 180,
            Rotation::Deg270 => 270,
        }
    }

    /// Rotation in radians (degrees * pi / 180).
    pub fn radians(self) -> f64 {
        f64::from(self.degrees()).to_radians()
    }

    /// Returns true if this rotation swaps width and height.
    #[inline]
    pub fn swaps_dimensions(self) -> bool {
        matches!(self, Rotation::Deg90 | Rotation::Deg270)
    }

    /// The next quarter turn clockwise.
    pub fn clockwise(self) -> Self {
        match self {
            Rotation::Deg0 => Rotation::Deg90,
            Rotation::Deg90 => Rotation::Deg180,
            Rotation::Deg180 => Rotation::Deg270,
            Rotation::Deg270 => Rotation::Deg0,
        }
    }

    /// The next quarter turn counter-clockwise.
    pub fn counter_clockwise(self) -> Self {
        match self {
            Rotation::Deg0 => Rotation::Deg270,
            Rotation::Deg90 => Rotation::Deg0,
            Rotation::Deg180 => Rotation::Deg90,
            Rotation::Deg270 => Rotation::Deg180,
        }
    }
}

impl TryFrom<u16> for Rotation {
    type Error = String;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Rotation::Deg0),
            90 => Ok(Rotation::Deg90),
            180 => Ok(Rotation::Deg180),
            270 => Ok(Rotation::Deg270),
            other => Err(format!(
                "rotation must be one of 0, 90, 180 or 270 degrees, got {other}"
            )),
        }
    }
}

impl From<Rotation> for u16 {
    fn from(rotation: Rotation) -> Self {
        rotation.degrees()
    }
}

/// A point in either screen or content space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Width and height of a region, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Size of an integer raster.
    pub fn from_pixels(width: u32, height: u32) -> Self {
        Self {
            width: f64::from(width),
            height: f64::from(height),
        }
    }
}

/// Axis-aligned rectangle. Crop rectangles are expressed in content space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Right edge (x + width).
    #[inline]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Bottom edge (y + height).
    #[inline]
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Width divided by height, or `None` for a degenerate rectangle.
    pub fn aspect_ratio(&self) -> Option<f64> {
        (self.height > 0.0).then(|| self.width / self.height)
    }

    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x && point.x <= self.right() && point.y >= self.y && point.y <= self.bottom()
    }

    /// Checks the crop invariant: inside `[0, bounds]` on both axes and at
    /// least `min_size` wide and tall.
    pub fn is_within(&self, bounds: Size, min_size: f64) -> bool {
        self.x >= 0.0
            && self.y >= 0.0
            && self.right() <= bounds.width
            && self.bottom() <= bounds.height
            && self.width >= min_size
            && self.height >= min_size
    }
}

/// Dimensions of the intermediate raster for a source of `width` x `height`.
///
/// Width and height swap iff the rotation is 90 or 270 degrees.
pub fn transformed_dimensions(width: u32, height: u32, rotation: Rotation) -> (u32, u32) {
    if rotation.swaps_dimensions() {
        (height, width)
    } else {
        (width, height)
    }
}

/// Clamp `rect` into `[0, bounds.width] x [0, bounds.height]` with a minimum
/// extent of `min_size` per axis.
///
/// Edges that overshoot are pulled in, shrinking the rectangle from that side.
/// The rectangle is only translated when growing it back to `min_size` would
/// otherwise push it past the far edge. When the bounds themselves are
/// smaller than `min_size` the rectangle covers the whole axis.
pub fn clamp_rect_to_bounds(rect: Rect, bounds: Size, min_size: f64) -> Rect {
    let (x, width) = clamp_span(rect.x, rect.width, bounds.width, min_size);
    let (y, height) = clamp_span(rect.y, rect.height, bounds.height, min_size);
    Rect {
        x,
        y,
        width,
        height,
    }
}

/// One-dimensional version of [`clamp_rect_to_bounds`].
fn clamp_span(start: f64, extent: f64, bound: f64, min_size: f64) -> (f64, f64) {
    let bound = bound.max(0.0);
    let min_size = min_size.min(bound);

    let mut lo = start.clamp(0.0, bound);
    let mut hi = (start + extent.max(0.0)).clamp(0.0, bound);

    if hi - lo < min_size {
        hi = (lo + min_size).min(bound);
        lo = hi - min_size;
    }

    (lo, hi - lo)
}

/// Convert a pointer movement measured in screen pixels into content pixels.
///
/// Dividing by the view scale keeps handle dragging scale-invariant: the
/// dragged edge follows the pointer at any zoom level.
pub fn screen_delta_to_content_delta(dx: f64, dy: f64, scale: f64) -> (f64, f64) {
    let scale = if scale > 0.0 { scale } else { 1.0 };
    (dx / scale, dy / scale)
}

/// Largest rectangle with aspect `ratio` centred in the container.
///
/// Without a ratio this is the free-crop default: 90% of the container,
/// inset by 5% on every side.
pub fn center_crop_for_ratio(container_width: f64, container_height: f64, ratio: Option<f64>) -> Rect {
    match ratio.filter(|r| r.is_finite() && *r > 0.0) {
        None => Rect {
            x: container_width * 0.05,
            y: container_height * 0.05,
            width: container_width * 0.9,
            height: container_height * 0.9,
        },
        Some(ratio) => {
            let (width, height) = if container_height > 0.0 && container_width / container_height > ratio {
                (container_height * ratio, container_height)
            } else {
                (container_width, container_width / ratio)
            };
            Rect {
                x: (container_width - width) / 2.0,
                y: (container_height - height) / 2.0,
                width,
                height,
            }
        }
    }
}

/// Output dimensions for the crop+resize pass.
///
/// * both targets zero: keep the source size
/// * both targets set: use them verbatim
/// * one target set: with `keep_aspect` the other axis is scaled by the same
///   factor, otherwise it keeps the source extent
///
/// The result is never smaller than 1x1.
pub fn resolve_output_size(
    source_width: u32,
    source_height: u32,
    target_width: u32,
    target_height: u32,
    keep_aspect: bool,
) -> (u32, u32) {
    let scaled = |target: u32, from: u32, to: u32| -> u32 {
        if from == 0 {
            return to;
        }
        (f64::from(target) * f64::from(to) / f64::from(from)).round() as u32
    };

    let (width, height) = match (target_width, target_height) {
        (0, 0) => (source_width, source_height),
        (w, 0) if keep_aspect => (w, scaled(w, source_width, source_height)),
        (0, h) if keep_aspect => (scaled(h, source_height, source_width), h),
        (w, 0) => (w, source_height),
        (0, h) => (source_width, h),
        (w, h) => (w, h),
    };

    (width.max(1), height.max(1))
}


// ============================================================================
// Property-Based Tests
// ============================================================================
