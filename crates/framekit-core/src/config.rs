//! Editor configuration values.
//!
//! [`ImageConfiguration`] describes one edit of one image. It is treated as an
//! immutable value: every edit produces a new configuration through the
//! `with_*` methods, which is what lets the render scheduler and the editor
//! session compare and hand configurations around without shared mutation.

use serde::{Deserialize, Serialize};

use crate::decode::FilterType;
use crate::geometry::{Rect, MIN_CROP_SIZE};

pub use crate::geometry::Rotation;

/// Lowest accepted encoder quality hint.
pub const MIN_QUALITY: f32 = 0.1;
/// Highest accepted encoder quality hint.
pub const MAX_QUALITY: f32 = 1.0;
/// Encoder quality used for freshly loaded images.
pub const DEFAULT_QUALITY: f32 = 0.9;

/// Output encoding for the final raster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Jpeg,
    Png,
    Webp,
}

impl OutputFormat {
    pub const ALL: [OutputFormat; 3] = [OutputFormat::Jpeg, OutputFormat::Png, OutputFormat::Webp];

    /// MIME type declared for the encoded artifact.
    pub fn mime_type(self) -> &'static str {
        match self {
            OutputFormat::Jpeg => "image/jpeg",
            OutputFormat::Png => "image/png",
            OutputFormat::Webp => "image/webp",
        }
    }

    /// File extension without the leading dot.
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Jpeg => "jpg",
            OutputFormat::Png => "png",
            OutputFormat::Webp => "webp",
        }
    }

    /// Lossless formats ignore the quality hint.
    pub fn is_lossless(self) -> bool {
        !matches!(self, OutputFormat::Jpeg)
    }

    /// Parse a MIME type such as `image/png`.
    pub fn from_mime_type(mime: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.mime_type().eq_ignore_ascii_case(mime))
    }
}

/// Crop aspect-ratio presets offered by the editor (width / height).
pub const CROP_RATIO_PRESETS: [(&str, Option<f64>); 5] = [
    ("Free", None),
    ("1:1", Some(1.0)),
    ("16:9", Some(16.0 / 9.0)),
    ("9:16", Some(9.0 / 16.0)),
    ("4:3", Some(4.0 / 3.0)),
];

/// One edit of one image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ImageConfiguration {
    /// Clockwise quarter-turn rotation, applied first.
    pub rotation: Rotation,
    /// Mirror left-right, applied after rotation in the rotated frame.
    pub flip_horizontal: bool,
    /// Mirror top-bottom, applied after rotation in the rotated frame.
    pub flip_vertical: bool,
    /// Crop region in content (intermediate) space. Authoritative when set.
    pub crop_rect: Option<Rect>,
    /// Aspect ratio used to seed `crop_rect`, and as a centred-crop fallback
    /// when no rectangle has been committed yet.
    pub crop_ratio: Option<f64>,
    /// Output width; 0 derives it from the crop.
    pub target_width: u32,
    /// Output height; 0 derives it from the crop.
    pub target_height: u32,
    /// Scale a zero target axis proportionally to the other one.
    pub keep_aspect: bool,
    /// Encoder quality hint in `[0.1, 1.0]`.
    pub quality: f32,
    pub format: OutputFormat,
}

impl Default for ImageConfiguration {
    fn default() -> Self {
        Self {
            rotation: Rotation::Deg0,
            flip_horizontal: false,
            flip_vertical: false,
            crop_rect: None,
            crop_ratio: None,
            target_width: 0,
            target_height: 0,
            keep_aspect: true,
            quality: DEFAULT_QUALITY,
            format: OutputFormat::Jpeg,
        }
    }
}

impl ImageConfiguration {
    /// Configuration for a freshly loaded image.
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if this configuration leaves the image untouched (apart from re-encoding).
    pub fn is_identity(&self) -> bool {
        self.rotation == Rotation::Deg0
            && !self.flip_horizontal
            && !self.flip_vertical
            && self.crop_rect.is_none()
            && self.crop_ratio.is_none()
            && self.target_width == 0
            && self.target_height == 0
    }

    /// Same configuration with crop and resize cleared: the intermediate render.
    pub fn intermediate(&self) -> Self {
        Self {
            crop_rect: None,
            crop_ratio: None,
            target_width: 0,
            target_height: 0,
            ..self.clone()
        }
    }

    pub fn with_rotation(&self, rotation: Rotation) -> Self {
        Self {
            rotation,
            ..self.clone()
        }
    }

    pub fn with_flips(&self, flip_horizontal: bool, flip_vertical: bool) -> Self {
        Self {
            flip_horizontal,
            flip_vertical,
            ..self.clone()
        }
    }

    pub fn with_crop_rect(&self, crop_rect: Option<Rect>) -> Self {
        Self {
            crop_rect,
            ..self.clone()
        }
    }

    /// Non-finite or non-positive ratios are treated as "free".
    pub fn with_crop_ratio(&self, crop_ratio: Option<f64>) -> Self {
        Self {
            crop_ratio: crop_ratio.filter(|r| r.is_finite() && *r > 0.0),
            ..self.clone()
        }
    }

    pub fn with_target_size(&self, target_width: u32, target_height: u32) -> Self {
        Self {
            target_width,
            target_height,
            ..self.clone()
        }
    }

    pub fn with_keep_aspect(&self, keep_aspect: bool) -> Self {
        Self {
            keep_aspect,
            ..self.clone()
        }
    }

    /// Quality is clamped into `[0.1, 1.0]`; NaN falls back to the default.
    pub fn with_quality(&self, quality: f32) -> Self {
        let quality = if quality.is_nan() {
            DEFAULT_QUALITY
        } else {
            quality.clamp(MIN_QUALITY, MAX_QUALITY)
        };
        Self {
            quality,
            ..self.clone()
        }
    }

    pub fn with_format(&self, format: OutputFormat) -> Self {
        Self {
            format,
            ..self.clone()
        }
    }

    /// Rotation changes the content frame, so any committed crop is dropped.
    pub fn rotated_clockwise(&self) -> Self {
        Self {
            rotation: self.rotation.clockwise(),
            crop_rect: None,
            ..self.clone()
        }
    }

    /// Rotation changes the content frame, so any committed crop is dropped.
    pub fn rotated_counter_clockwise(&self) -> Self {
        Self {
            rotation: self.rotation.counter_clockwise(),
            crop_rect: None,
            ..self.clone()
        }
    }
}

/// Tunables for the interactive editor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EditorSettings {
    /// Quiescence window before a configuration change triggers a render.
    pub debounce_ms: u64,
    /// Minimum crop extent per axis, in content pixels.
    pub min_crop_size: f64,
    /// Padding, in screen pixels, left around content when fitting the view.
    pub fit_padding: f64,
    /// Scale change applied by the discrete zoom controls.
    pub zoom_step: f64,
    /// Scale change per wheel delta unit.
    pub wheel_sensitivity: f64,
    /// Corner handle hit radius, in screen pixels.
    pub handle_radius: f64,
    /// Resampling filter for the resize pass.
    pub resize_filter: FilterType,
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            debounce_ms: 300,
            min_crop_size: MIN_CROP_SIZE,
            fit_padding: 40.0,
            zoom_step: 0.1,
            wheel_sensitivity: 0.001,
            handle_radius: 12.0,
            resize_filter: FilterType::Bilinear,
        }
    }
}
