//! The two-pass render pipeline.
//!
//! `render` is a pure function of the source raster and the configuration:
//! every pass allocates a fresh raster and drops it once the next pass has
//! consumed it, so the same inputs always produce the same bytes and nothing
//! is shared between calls.

use thiserror::Error;

use crate::config::ImageConfiguration;
use crate::decode::{decode_image, DecodeError, DecodedImage, FilterType};
use crate::encode::{encode_image, EncodeError, EncodedImage};
use crate::transform::{apply_orientation, crop_and_resize};

/// A failed render. The caller keeps whatever it rendered last.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Encode(#[from] EncodeError),
}

/// Result of one pipeline invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOutput {
    /// The raster that was encoded.
    pub raster: DecodedImage,
    /// The encoded artifact.
    pub encoded: EncodedImage,
}

impl RenderOutput {
    pub fn dimensions(&self) -> (u32, u32) {
        self.raster.dimensions()
    }
}

/// Normalize pass only: rotation and flips baked in, no encoding.
pub fn normalize(source: &DecodedImage, config: &ImageConfiguration) -> DecodedImage {
    apply_orientation(source, config.rotation, config.flip_horizontal, config.flip_vertical)
}

/// Render the final raster with the default resampling filter.
pub fn render(source: &DecodedImage, config: &ImageConfiguration) -> Result<RenderOutput, RenderError> {
    render_with_filter(source, config, FilterType::default())
}

/// Render the intermediate raster: `render` with crop and resize cleared.
pub fn render_intermediate(
    source: &DecodedImage,
    config: &ImageConfiguration,
) -> Result<RenderOutput, RenderError> {
    render_with_filter(source, &config.intermediate(), FilterType::default())
}

/// Decode `bytes` and render them.
pub fn render_bytes(bytes: &[u8], config: &ImageConfiguration) -> Result<RenderOutput, RenderError> {
    let source = decode_image(bytes)?;
    render(&source, config)
}

/// Render the final raster, resampling with `filter` in the resize step.
///
/// # Errors
///
/// `RenderError::Decode` if the source has no drawable area and
/// `RenderError::Encode` if the destination cannot be produced or encoded.
pub fn render_with_filter(
    source: &DecodedImage,
    config: &ImageConfiguration,
    filter: FilterType,
) -> Result<RenderOutput, RenderError> {
    if source.is_empty() {
        return Err(DecodeError::InvalidDimensions {
            width: source.width,
            height: source.height,
        }
        .into());
    }

    let intermediate = normalize(source, config);
    render_from_intermediate(&intermediate, config, filter)
}

/// Run only the crop+resize pass and encode, starting from an intermediate
/// raster that already has `config`'s orientation baked in.
///
/// Used by the editor, which keeps the intermediate cached between renders.
pub fn render_from_intermediate(
    intermediate: &DecodedImage,
    config: &ImageConfiguration,
    filter: FilterType,
) -> Result<RenderOutput, RenderError> {
    let raster = crop_and_resize(intermediate, config, filter)?;
    let encoded = encode_image(&raster, config.format, config.quality)?;

    log::debug!(
        "rendered {}x{} -> {}x{} {} ({} bytes)",
        intermediate.width,
        intermediate.height,
        raster.width,
        raster.height,
        encoded.mime_type(),
        encoded.len()
    );

    Ok(RenderOutput { raster, encoded })
}
