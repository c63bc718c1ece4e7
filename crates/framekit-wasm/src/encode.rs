//! Image encoding WASM bindings.
//!
//! - [`encode_image`] - Encode a JsDecodedImage as JPEG, PNG or WebP
//! - [`output_mime_type`] - MIME type for a format name
//!
//! ```typescript
//! import { encode_image } from '@framekit/wasm';
//!
//! const encoded = encode_image(image, 'webp', 0.9);
//! const blob = new Blob([encoded.bytes()], { type: encoded.mime_type });
//! ```

use crate::types::{to_js_error, JsDecodedImage, JsEncodedImage};
use framekit_core::{encode, OutputFormat};
use wasm_bindgen::prelude::*;

/// Parse `jpeg`, `png` or `webp` (also accepts `jpg` and full MIME types).
pub(crate) fn parse_format(format: &str) -> Option<OutputFormat> {
    match format.trim().to_ascii_lowercase().as_str() {
        "jpeg" | "jpg" => Some(OutputFormat::Jpeg),
        "png" => Some(OutputFormat::Png),
        "webp" => Some(OutputFormat::Webp),
        other => OutputFormat::from_mime_type(other),
    }
}

/// Encode an image.
///
/// # Arguments
///
/// * `format` - `"jpeg"`, `"png"` or `"webp"`
/// * `quality` - 0.1 to 1.0; only JPEG uses it
///
/// # Errors
///
/// Returns an error for an unknown format, a pixel buffer that does not match
/// the dimensions, or an encoder failure.
#[wasm_bindgen]
pub fn encode_image(image: &JsDecodedImage, format: &str, quality: f32) -> Result<JsEncodedImage, JsValue> {
    let format = parse_format(format).ok_or_else(|| to_js_error(format!("Unsupported format: {format}")))?;
    encode::encode_image(&image.to_decoded(), format, quality)
        .map(JsEncodedImage::from_encoded)
        .map_err(to_js_error)
}

/// MIME type for a format name, or `undefined` if it is not supported.
#[wasm_bindgen]
pub fn output_mime_type(format: &str) -> Option<String> {
    parse_format(format).map(|f| f.mime_type().to_string())
}
