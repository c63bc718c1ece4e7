//! Encoders for the configured output format.
//!
//! JPEG honours the quality hint; PNG and WebP are written losslessly and
//! accept the hint without using it, so callers can pass the configuration
//! through uniformly.

use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::codecs::webp::WebPEncoder;
use image::ExtendedColorType;
use image::ImageEncoder;
use std::io::Cursor;
use thiserror::Error;

use crate::config::{OutputFormat, MAX_QUALITY, MIN_QUALITY};
use crate::decode::{DecodedImage, CHANNELS};

/// Errors that can occur while encoding the final raster.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// Pixel data length doesn't match expected dimensions
    #[error("Invalid pixel data: expected {expected} bytes (width * height * 4), got {actual}")]
    InvalidPixelData { expected: usize, actual: usize },

    /// Width or height is zero
    #[error("Invalid dimensions: width ({width}) and height ({height}) must be non-zero")]
    InvalidDimensions { width: u32, height: u32 },

    /// The raster exceeds what the output format can store
    #[error("{format:?} images are limited to {limit} pixels per side, got {width}x{height}")]
    TooLarge {
        format: OutputFormat,
        width: u32,
        height: u32,
        limit: u32,
    },

    /// The underlying encoder failed
    #[error("Encoding failed: {0}")]
    EncodingFailed(String),
}

/// An encoded image artifact, ready for a download or save action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedImage {
    pub bytes: Vec<u8>,
    pub format: OutputFormat,
    pub width: u32,
    pub height: u32,
}

impl EncodedImage {
    pub fn mime_type(&self) -> &'static str {
        self.format.mime_type()
    }

    pub fn extension(&self) -> &'static str {
        self.format.extension()
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// JPEG frame headers store each dimension in 16 bits.
pub const MAX_JPEG_DIMENSION: u32 = 65_535;

/// Map a `[0.1, 1.0]` quality hint onto the JPEG encoder's 1-100 scale.
pub fn jpeg_quality(quality: f32) -> u8 {
    let quality = if quality.is_nan() { MAX_QUALITY } else { quality };
    let scaled = (quality.clamp(MIN_QUALITY, MAX_QUALITY) * 100.0).round() as u8;
    scaled.clamp(1, 100)
}

/// Encode an RGBA raster to the requested format.
///
/// # Errors
///
/// Returns `EncodeError::InvalidDimensions` for a zero-sized raster,
/// `EncodeError::InvalidPixelData` if the buffer does not match the
/// dimensions, `EncodeError::TooLarge` for a JPEG wider or taller than
/// [`MAX_JPEG_DIMENSION`], and `EncodeError::EncodingFailed` if the codec
/// rejects it.
pub fn encode_image(
    image: &DecodedImage,
    format: OutputFormat,
    quality: f32,
) -> Result<EncodedImage, EncodeError> {
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return Err(EncodeError::InvalidDimensions { width, height });
    }

    let expected_len = width as usize * height as usize * CHANNELS;
    if image.pixels.len() != expected_len {
        return Err(EncodeError::InvalidPixelData {
            expected: expected_len,
            actual: image.pixels.len(),
        });
    }

    if format == OutputFormat::Jpeg && (width > MAX_JPEG_DIMENSION || height > MAX_JPEG_DIMENSION) {
        return Err(EncodeError::TooLarge {
            format,
            width,
            height,
            limit: MAX_JPEG_DIMENSION,
        });
    }

    let mut buffer = Cursor::new(Vec::new());

    let result = match format {
        OutputFormat::Jpeg => {
            // JPEG has no alpha channel
            let rgb: Vec<u8> = image
                .pixels
                .chunks_exact(CHANNELS)
                .flat_map(|px| [px[0], px[1], px[2]])
                .collect();
            JpegEncoder::new_with_quality(&mut buffer, jpeg_quality(quality)).write_image(
                &rgb,
                width,
                height,
                ExtendedColorType::Rgb8,
            )
        }
        OutputFormat::Png => PngEncoder::new(&mut buffer).write_image(
            &image.pixels,
            width,
            height,
            ExtendedColorType::Rgba8,
        ),
        OutputFormat::Webp => WebPEncoder::new_lossless(&mut buffer).write_image(
            &image.pixels,
            width,
            height,
            ExtendedColorType::Rgba8,
        ),
    };
    result.map_err(|e| EncodeError::EncodingFailed(e.to_string()))?;

    Ok(EncodedImage {
        bytes: buffer.into_inner(),
        format,
        width,
        height,
    })
}


// ============================================================================
// Property-Based Tests
// ============================================================================
