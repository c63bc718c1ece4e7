//! Raster transform passes: orientation, then crop and resize.
//!
//! # Transform Order
//!
//! 1. Rotation (clockwise quarter turns)
//! 2. Flips, in the rotated frame
//! 3. Crop, in content (intermediate) space
//! 4. Resize
//!
//! Steps 1-2 form the normalize pass and produce the intermediate raster.
//! Steps 3-4 form the crop+resize pass. See [`crate::pipeline`] for the
//! composed pipeline.
//!
//! # Coordinate System
//!
//! - Crop coordinates are content-space pixels of the intermediate raster
//! - Origin is top-left corner

mod crop;
mod orient;

pub use crop::{apply_crop, crop_and_resize, source_region, to_pixel_rect, PixelRect};
pub use orient::apply_orientation;
