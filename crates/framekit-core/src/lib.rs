//! Framekit Core - Image framing library
//!
//! This crate provides the core functionality for Framekit, a single-image
//! editor: rotation and flips, interactive cropping, resizing, and
//! re-encoding to JPEG, PNG or WebP.
//!
//! The render pipeline is a pure function of a source raster and an
//! [`ImageConfiguration`]. Everything interactive (the crop editor, the
//! viewport, debouncing) lives on top of it in [`EditorSession`].

pub mod analysis;
pub mod config;
pub mod crop_editor;
pub mod decode;
pub mod encode;
pub mod geometry;
pub mod pipeline;
pub mod scheduler;
pub mod session;
pub mod transform;
pub mod viewport;

pub use analysis::{download_filename, AnalysisError, AnalysisResult, AnalysisStatus, ImageAnalyzer};
pub use config::{EditorSettings, ImageConfiguration, OutputFormat, CROP_RATIO_PRESETS};
pub use crop_editor::{CropEditor, DragHandle, PointerEvent};
pub use decode::{decode_image, DecodeError, DecodedImage, FilterType};
pub use encode::{encode_image, EncodeError, EncodedImage};
pub use geometry::{
    center_crop_for_ratio, clamp_rect_to_bounds, resolve_output_size, screen_delta_to_content_delta,
    transformed_dimensions, Point, Rect, Rotation, Size, MIN_CROP_SIZE,
};
pub use pipeline::{render, render_intermediate, RenderError, RenderOutput};
pub use scheduler::RenderScheduler;
pub use session::EditorSession;
pub use viewport::ViewTransform;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_four_quarter_turns_restore_dimensions() {
        let mut rotation = Rotation::Deg0;
        let mut dims = (640, 480);
        for _ in 0..4 {
            rotation = rotation.clockwise();
            dims = transformed_dimensions(dims.0, dims.1, Rotation::Deg90);
        }
        assert_eq!(rotation, Rotation::Deg0);
        assert_eq!(dims, (640, 480));
    }

    #[test]
    fn test_public_pipeline_round_trip() {
        let source = DecodedImage::new(6, 4, vec![200; 6 * 4 * 4]);
        let config = ImageConfiguration::new()
            .with_format(OutputFormat::Png)
            .with_rotation(Rotation::Deg270);

        let output = render(&source, &config).unwrap();
        let decoded = decode_image(&output.encoded.bytes).unwrap();
        assert_eq!(decoded.dimensions(), (4, 6));
        assert_eq!(decoded.pixels, output.raster.pixels);
    }
}
