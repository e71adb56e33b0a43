//! Type definitions shared across the re-identification pipeline

use crate::error::Result;
use centroidtrack::BoundingBox;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Single detector output for one frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    /// Detected box in pixel corner coordinates
    pub bbox: BoundingBox,
    /// Class label assigned by the detector
    pub label: String,
    /// Detection confidence score (0-1)
    #[serde(default)]
    pub confidence: f32,
}

impl Detection {
    /// Create new detection
    pub fn new(bbox: BoundingBox, label: impl Into<String>, confidence: f32) -> Self {
        Self {
            bbox,
            label: label.into(),
            confidence,
        }
    }

    /// Case-insensitive label comparison, matching detector conventions
    pub fn has_label(&self, label: &str) -> bool {
        self.label.eq_ignore_ascii_case(label)
    }
}

/// Load per-frame detection lists from a JSON file.
///
/// The file holds one list of detections per frame, in frame order,
/// as produced by the external detector.
pub fn load_detections(path: impl AsRef<Path>) -> Result<Vec<Vec<Detection>>> {
    let raw = fs::read_to_string(path.as_ref())?;
    let frames = serde_json::from_str(&raw)?;
    Ok(frames)
}
