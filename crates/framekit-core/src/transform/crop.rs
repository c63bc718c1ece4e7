//! Crop+resize pass over the intermediate raster.
//!
//! The source region is picked in content space:
//!
//! 1. an explicit `crop_rect`, used verbatim
//! 2. otherwise a centred crop of `crop_ratio`, if it is finite and positive
//! 3. otherwise the whole intermediate raster
//!
//! The region is snapped to whole pixels, copied out, and scaled to the
//! output size resolved by [`resolve_output_size`].

use crate::config::ImageConfiguration;
use crate::decode::{resize, DecodedImage, FilterType, CHANNELS};
use crate::encode::EncodeError;
use crate::geometry::{center_crop_for_ratio, resolve_output_size, Rect};

/// A crop region snapped to whole pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Select the content-space region the final raster is drawn from.
pub fn source_region(intermediate_width: u32, intermediate_height: u32, config: &ImageConfiguration) -> Rect {
    let (w, h) = (f64::from(intermediate_width), f64::from(intermediate_height));
    let ratio = config.crop_ratio.filter(|r| r.is_finite() && *r > 0.0);
    match (config.crop_rect, ratio) {
        (Some(rect), _) => rect,
        (None, Some(ratio)) => center_crop_for_ratio(w, h, Some(ratio)),
        (None, None) => Rect::new(0.0, 0.0, w, h),
    }
}

/// Snap a content-space rectangle to pixel edges inside `width` x `height`.
///
/// Edges are rounded independently, so a rectangle at `x = 100, width = 400`
/// always covers exactly 400 columns. Returns `None` if nothing is left after
/// clamping.
pub fn to_pixel_rect(rect: Rect, width: u32, height: u32) -> Option<PixelRect> {
    let snap = |v: f64, bound: u32| -> u32 {
        if v.is_nan() {
            return 0;
        }
        v.round().clamp(0.0, f64::from(bound)) as u32
    };

    let left = snap(rect.x, width);
    let top = snap(rect.y, height);
    let right = snap(rect.right(), width);
    let bottom = snap(rect.bottom(), height);

    let region = PixelRect {
        x: left,
        y: top,
        width: right.saturating_sub(left),
        height: bottom.saturating_sub(top),
    };
    (region.width > 0 && region.height > 0).then_some(region)
}

/// Copy a pixel region out of `image` into a new raster.
///
/// The region must lie inside the image (as produced by [`to_pixel_rect`]).
pub fn apply_crop(image: &DecodedImage, region: PixelRect) -> DecodedImage {
    // Fast path: full crop returns a clone
    if region.x == 0 && region.y == 0 && region.width == image.width && region.height == image.height {
        return image.clone();
    }

    let src_stride = image.width as usize * CHANNELS;
    let row_len = region.width as usize * CHANNELS;
    let mut output = Vec::with_capacity(row_len * region.height as usize);

    // Copy pixel data row by row for efficiency
    for y in region.y..region.y + region.height {
        let start = y as usize * src_stride + region.x as usize * CHANNELS;
        match image.pixels.get(start..start + row_len) {
            Some(row) => output.extend_from_slice(row),
            None => output.resize(output.len() + row_len, 0),
        }
    }

    DecodedImage {
        width: region.width,
        height: region.height,
        pixels: output,
    }
}

/// Run the crop+resize pass on an intermediate raster.
///
/// # Errors
///
/// Returns `EncodeError::InvalidDimensions` if the selected region is empty
/// after clamping, and `EncodeError::EncodingFailed` if the scaler rejects
/// the destination size.
pub fn crop_and_resize(
    intermediate: &DecodedImage,
    config: &ImageConfiguration,
    filter: FilterType,
) -> Result<DecodedImage, EncodeError> {
    let region = source_region(intermediate.width, intermediate.height, config);
    let pixels = to_pixel_rect(region, intermediate.width, intermediate.height).ok_or(
        EncodeError::InvalidDimensions {
            width: region.width.max(0.0).round() as u32,
            height: region.height.max(0.0).round() as u32,
        },
    )?;

    let (out_w, out_h) = resolve_output_size(
        pixels.width,
        pixels.height,
        config.target_width,
        config.target_height,
        config.keep_aspect,
    );

    let cropped = apply_crop(intermediate, pixels);
    resize(&cropped, out_w, out_h, filter).map_err(|e| EncodeError::EncodingFailed(e.to_string()))
}


// ============================================================================
// Property-Based Tests
// ============================================================================
