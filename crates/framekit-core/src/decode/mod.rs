//! Image decoding for Framekit.
//!
//! This module provides functionality for:
//! - Decoding JPEG, PNG and WebP bytes into an RGBA raster
//! - Applying the EXIF orientation tag the way browsers do when drawing an image
//! - Resizing rasters for the crop+resize pass
//!
//! # Examples
//!
//! ```ignore
//! use framekit_core::decode::decode_image;
//!
//! let bytes = std::fs::read("photo.jpg").unwrap();
//! let image = decode_image(&bytes).unwrap();
//! println!("Decoded {}x{} image", image.width, image.height);
//! ```

mod reader;
mod resize;
mod types;

pub use reader::decode_image;
pub use resize::resize;
pub use types::{DecodeError, DecodedImage, FilterType, Orientation, CHANNELS};
