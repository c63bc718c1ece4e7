//! WASM bindings for the render pipeline.
//!
//! Configurations are passed as plain objects with camelCase keys:
//!
//! ```typescript
//! const out = render(source, {
//!   rotation: 90,
//!   flipHorizontal: false,
//!   cropRect: { x: 100, y: 50, width: 400, height: 300 },
//!   targetWidth: 200,
//!   format: 'png',
//! });
//! ```
//!
//! Missing keys take their defaults.

use crate::types::{config_from_js, to_js_error, JsDecodedImage, JsEncodedImage};
use framekit_core::geometry::{self, Rotation};
use framekit_core::pipeline::{self, RenderOutput};
use wasm_bindgen::prelude::*;

/// Raster plus encoded artifact from one pipeline run.
#[wasm_bindgen]
pub struct JsRenderOutput {
    raster: JsDecodedImage,
    encoded: JsEncodedImage,
}

#[wasm_bindgen]
impl JsRenderOutput {
    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.raster.width()
    }

    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.raster.height()
    }

    /// RGBA pixels of the rendered raster (a copy).
    pub fn pixels(&self) -> Vec<u8> {
        self.raster.pixels()
    }

    /// Encoded bytes (a copy).
    pub fn bytes(&self) -> Vec<u8> {
        self.encoded.bytes()
    }

    #[wasm_bindgen(getter)]
    pub fn mime_type(&self) -> String {
        self.encoded.mime_type()
    }
}

impl JsRenderOutput {
    pub(crate) fn from_output(output: RenderOutput) -> Self {
        Self {
            raster: JsDecodedImage::from_decoded(output.raster),
            encoded: JsEncodedImage::from_encoded(output.encoded),
        }
    }
}

/// Render the final raster: orientation, crop, resize and encode.
#[wasm_bindgen]
pub fn render(source: &JsDecodedImage, config: JsValue) -> Result<JsRenderOutput, JsValue> {
    let config = config_from_js(config)?;
    pipeline::render(&source.to_decoded(), &config)
        .map(JsRenderOutput::from_output)
        .map_err(to_js_error)
}

/// Render the intermediate raster: orientation only, crop and resize ignored.
#[wasm_bindgen]
pub fn render_intermediate(source: &JsDecodedImage, config: JsValue) -> Result<JsRenderOutput, JsValue> {
    let config = config_from_js(config)?;
    pipeline::render_intermediate(&source.to_decoded(), &config)
        .map(JsRenderOutput::from_output)
        .map_err(to_js_error)
}

/// Dimensions after a quarter-turn rotation, as `[width, height]`.
///
/// Degrees other than 0, 90, 180 and 270 are rejected.
#[wasm_bindgen]
pub fn transformed_dimensions(width: u32, height: u32, degrees: u16) -> Result<Vec<u32>, JsValue> {
    let rotation = Rotation::try_from(degrees).map_err(to_js_error)?;
    let (w, h) = geometry::transformed_dimensions(width, height, rotation);
    Ok(vec![w, h])
}

#[cfg(test)]
mod tests {
    use super::*;
    use framekit_core::{DecodedImage, ImageConfiguration, OutputFormat};

    #[test]
    fn test_transformed_dimensions() {
        assert_eq!(transformed_dimensions(800, 600, 90).ok(), Some(vec![600, 800]));
        assert_eq!(transformed_dimensions(800, 600, 180).ok(), Some(vec![800, 600]));
    }

    #[test]
    fn test_render_output_wrapper() {
        let source = DecodedImage::new(4, 2, vec![50u8; 32]);
        let config = ImageConfiguration::new()
            .with_format(OutputFormat::Png)
            .with_rotation(Rotation::Deg90);
        let output = JsRenderOutput::from_output(pipeline::render(&source, &config).unwrap());

        assert_eq!((output.width(), output.height()), (2, 4));
        assert_eq!(output.pixels().len(), 32);
        assert_eq!(output.mime_type(), "image/png");
        assert!(!output.bytes().is_empty());
    }
}
