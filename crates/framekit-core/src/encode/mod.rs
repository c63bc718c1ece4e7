//! Image encoding for Framekit.
//!
//! This module provides functionality for:
//! - Encoding the final raster to JPEG, PNG or WebP
//! - Packaging the result as an [`EncodedImage`] (bytes + declared MIME type)
//!
//! # Examples
//!
//! ```ignore
//! use framekit_core::config::OutputFormat;
//! use framekit_core::encode::encode_image;
//!
//! let encoded = encode_image(&image, OutputFormat::Jpeg, 0.9).unwrap();
//! println!("Encoded {} bytes as {}", encoded.bytes.len(), encoded.mime_type());
//! ```

mod codec;

pub use codec::{encode_image, jpeg_quality, EncodeError, EncodedImage, MAX_JPEG_DIMENSION};
