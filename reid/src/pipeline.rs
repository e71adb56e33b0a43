//! End-to-end orchestration
//!
//! Runs the per-camera tracking stage over externally supplied detections,
//! then reconciles two cameras' archives into a single identity mapping.

use centroidtrack::{BoundingBox, CentroidTracker};

use crate::error::Result;
use crate::features::extract_signatures;
use crate::frames::FrameSource;
use crate::mapper::{map_identities, IdentityMapping};
use crate::records::{FrameRecord, TrackArchive};
use crate::types::Detection;

/// Per-camera tracking configuration
#[derive(Debug, Clone)]
pub struct TrackingConfig {
    /// Detection label kept for tracking; everything else is discarded
    pub target_label: String,
    /// Consecutive missed frames tolerated before a track is dropped
    pub max_disappeared: u32,
}

impl Default for TrackingConfig {
    fn default() -> Self {
        Self {
            target_label: "player".to_string(),
            max_disappeared: 15,
        }
    }
}

/// Run the per-frame tracker over one camera's detections.
///
/// Keeps only detections carrying the configured label and truncates their
/// corners to integer pixels before tracking, so a centroid recomputed from
/// any recorded box equals the centroid the tracker stored for it. Every
/// input frame produces exactly one record, detections or not; coasting
/// tracks stay in the record at their last known centroid.
pub fn run_tracker(frames: &[Vec<Detection>], config: &TrackingConfig) -> TrackArchive {
    let mut tracker = CentroidTracker::new(config.max_disappeared);
    let mut archive = TrackArchive::new();

    for (frame_idx, detections) in frames.iter().enumerate() {
        let boxes: Vec<[i32; 4]> = detections
            .iter()
            .filter(|det| det.has_label(&config.target_label))
            .map(|det| det.bbox.to_corners())
            .collect();

        let truncated: Vec<BoundingBox> = boxes
            .iter()
            .map(|&corners| BoundingBox::from_corners(corners))
            .collect();

        let objects = tracker.update(&truncated);

        archive.push(FrameRecord {
            frame: frame_idx as u64,
            objects: objects.clone(),
            boxes,
        });
    }

    log::info!(
        "tracked {} frames, {} distinct '{}' identities",
        archive.len(),
        archive.identities().len(),
        config.target_label
    );
    archive
}

/// Reconcile two cameras' track archives into one identity mapping.
///
/// Extracts appearance signatures for both cameras in parallel, then pairs
/// identities by optimal assignment over signature distances. The mapping
/// is keyed by camera-B identity.
pub fn reconcile<A, B>(
    archive_a: &TrackArchive,
    frames_a: &mut A,
    archive_b: &TrackArchive,
    frames_b: &mut B,
) -> Result<IdentityMapping>
where
    A: FrameSource + Send,
    B: FrameSource + Send,
{
    let (signatures_a, signatures_b) = rayon::join(
        || extract_signatures(archive_a, frames_a),
        || extract_signatures(archive_b, frames_b),
    );

    Ok(map_identities(&signatures_a?, &signatures_b?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frames::MemoryFrames;
    use centroidtrack::Centroid;
    use image::{Rgb, RgbImage};

    fn det(x1: f32, y1: f32, x2: f32, y2: f32, label: &str) -> Detection {
        Detection::new(BoundingBox::new(x1, y1, x2, y2), label, 0.9)
    }

    #[test]
    fn test_default_config() {
        let config = TrackingConfig::default();
        assert_eq!(config.target_label, "player");
        assert_eq!(config.max_disappeared, 15);
    }

    #[test]
    fn test_run_tracker_filters_by_label() {
        let frames = vec![vec![
            det(0.0, 0.0, 10.0, 10.0, "player"),
            det(50.0, 50.0, 60.0, 60.0, "ball"),
            det(80.0, 80.0, 90.0, 90.0, "Player"),
        ]];

        let archive = run_tracker(&frames, &TrackingConfig::default());

        assert_eq!(archive.len(), 1);
        assert_eq!(archive.records[0].boxes.len(), 2);
        assert_eq!(archive.records[0].objects.len(), 2);
    }

    #[test]
    fn test_recorded_boxes_match_stored_centroids() {
        let frames = vec![vec![det(10.7, 20.3, 30.9, 40.1, "player")]];

        let archive = run_tracker(&frames, &TrackingConfig::default());
        let record = &archive.records[0];

        assert_eq!(record.boxes[0], [10, 20, 30, 40]);
        assert_eq!(record.objects[&0], Centroid::new(20, 30));
        assert_eq!(
            BoundingBox::from_corners(record.boxes[0]).centroid(),
            record.objects[&0]
        );
    }

    #[test]
    fn test_identity_follows_moving_box() {
        let frames = vec![
            vec![det(0.0, 0.0, 10.0, 10.0, "player")],
            vec![det(4.0, 0.0, 14.0, 10.0, "player")],
            vec![det(8.0, 0.0, 18.0, 10.0, "player")],
        ];

        let archive = run_tracker(&frames, &TrackingConfig::default());

        assert_eq!(archive.identities(), vec![0]);
        assert_eq!(archive.records[0].objects[&0], Centroid::new(5, 5));
        assert_eq!(archive.records[2].objects[&0], Centroid::new(13, 5));
    }

    #[test]
    fn test_coasting_track_stays_in_record() {
        let frames = vec![vec![det(0.0, 0.0, 10.0, 10.0, "player")], vec![]];

        let archive = run_tracker(&frames, &TrackingConfig::default());
        let coasting = &archive.records[1];

        assert!(coasting.boxes.is_empty());
        assert_eq!(coasting.objects[&0], Centroid::new(5, 5));
    }

    #[test]
    fn test_reconcile_single_frame_cameras() {
        let mut frame_a = RgbImage::from_pixel(32, 32, Rgb([0, 0, 0]));
        let mut frame_b = RgbImage::from_pixel(32, 32, Rgb([0, 0, 0]));
        for y in 4..12 {
            for x in 4..12 {
                frame_a.put_pixel(x, y, Rgb([255, 0, 0]));
                frame_b.put_pixel(x + 16, y, Rgb([255, 0, 0]));
            }
        }

        let archive_a = run_tracker(
            &[vec![det(4.0, 4.0, 12.0, 12.0, "player")]],
            &TrackingConfig::default(),
        );
        let archive_b = run_tracker(
            &[vec![det(20.0, 4.0, 28.0, 12.0, "player")]],
            &TrackingConfig::default(),
        );

        let mut frames_a = MemoryFrames::new(vec![frame_a]);
        let mut frames_b = MemoryFrames::new(vec![frame_b]);

        let mapping = reconcile(&archive_a, &mut frames_a, &archive_b, &mut frames_b).unwrap();

        assert_eq!(mapping.len(), 1);
        assert_eq!(mapping.get(0), Some(0));
    }
}
