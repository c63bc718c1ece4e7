//! Contract for the external image-analysis collaborator.
//!
//! The editor never talks to an analysis service itself. Hosts implement
//! [`ImageAnalyzer`] (typically over a network call) and feed the result
//! back; failures surface as an [`AnalysisStatus`] flag and never touch the
//! render pipeline.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::OutputFormat;
use crate::encode::EncodedImage;

/// Stem used when no usable filename was suggested.
pub const DEFAULT_FILE_STEM: &str = "edited-image";

const MAX_STEM_LEN: usize = 80;

/// Failure reported by an analysis collaborator.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AnalysisError {
    #[error("Image analysis is not available")]
    Unavailable,

    #[error("Analysis request failed: {0}")]
    Request(String),

    #[error("Invalid analysis response: {0}")]
    InvalidResponse(String),
}

/// Structured description of an image.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AnalysisResult {
    pub title: String,
    pub description: String,
    pub tags: Vec<String>,
    pub suggested_filename: String,
}

/// Where an analysis request stands, for display.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum AnalysisStatus {
    /// Nothing requested
    #[default]
    Idle,
    /// Request in flight
    Pending,
    /// Request succeeded
    Done(AnalysisResult),
    /// Request failed; the message is user-facing
    Failed(String),
}

impl AnalysisStatus {
    pub fn from_result(result: Result<AnalysisResult, AnalysisError>) -> Self {
        match result {
            Ok(analysis) => Self::Done(analysis),
            Err(e) => {
                log::warn!("image analysis failed: {e}");
                Self::Failed(e.to_string())
            }
        }
    }

    pub fn result(&self) -> Option<&AnalysisResult> {
        match self {
            Self::Done(analysis) => Some(analysis),
            _ => None,
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }
}

/// An analysis collaborator.
///
/// `image` is the encoded artifact as it would be downloaded; its
/// [`EncodedImage::mime_type`] tells the collaborator how to read the bytes.
/// `language` is a BCP 47 tag for the returned text.
pub trait ImageAnalyzer {
    fn analyze(&self, image: &EncodedImage, language: &str) -> Result<AnalysisResult, AnalysisError>;
}

/// Run `analyzer` and fold the outcome into a status.
pub fn run_analysis<A: ImageAnalyzer + ?Sized>(analyzer: &A, image: &EncodedImage, language: &str) -> AnalysisStatus {
    if image.is_empty() {
        return AnalysisStatus::Failed(AnalysisError::InvalidResponse("empty image".to_string()).to_string());
    }
    AnalysisStatus::from_result(analyzer.analyze(image, language))
}

/// Reduce a free-form suggestion to a safe lowercase file stem.
///
/// A trailing image extension is dropped, runs of anything other than ASCII
/// letters and digits become a single dash, and the result is capped at
/// 80 characters. Returns `None` if nothing usable is left.
pub fn sanitize_file_stem(suggested: &str) -> Option<String> {
    let trimmed = suggested.trim();
    let without_ext = match trimmed.rsplit_once('.') {
        Some((stem, ext)) if is_image_extension(ext) => stem,
        _ => trimmed,
    };

    let mut stem = String::with_capacity(without_ext.len());
    let mut prev_dash = true;
    for c in without_ext.chars() {
        if c.is_ascii_alphanumeric() {
            stem.push(c.to_ascii_lowercase());
            prev_dash = false;
        } else if !prev_dash {
            stem.push('-');
            prev_dash = true;
        }
    }

    if stem.len() > MAX_STEM_LEN {
        stem.truncate(MAX_STEM_LEN);
    }
    let stem = stem.trim_matches('-');

    (!stem.is_empty()).then(|| stem.to_string())
}

fn is_image_extension(ext: &str) -> bool {
    matches!(
        ext.to_ascii_lowercase().as_str(),
        "jpg" | "jpeg" | "png" | "webp"
    )
}

/// Filename for a download of `format`, built from an optional suggestion.
pub fn download_filename(suggested: Option<&str>, format: OutputFormat) -> String {
    let stem = suggested
        .and_then(sanitize_file_stem)
        .unwrap_or_else(|| DEFAULT_FILE_STEM.to_string());
    format!("{stem}.{}", format.extension())
}
