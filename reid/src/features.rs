//! Appearance signatures from color-distribution histograms
//!
//! Crops each recorded box out of its decoded frame, bins the crop into an
//! 8x8x8 HSV histogram (OpenCV 8-bit conventions: H in [0,180), S and V in
//! [0,256)), L2-normalizes, and averages per identity across every frame
//! the identity appeared in.

use crate::error::Result;
use crate::frames::FrameSource;
use crate::records::TrackArchive;
use centroidtrack::BoundingBox;
use image::RgbImage;
use ndarray::Array1;
use std::collections::BTreeMap;

/// Bins per HSV channel.
pub const HIST_BINS: usize = 8;

/// Flattened histogram length.
pub const SIGNATURE_LEN: usize = HIST_BINS * HIST_BINS * HIST_BINS;

/// Per-identity appearance feature vector.
pub type Signature = Array1<f32>;

/// 8-bit HSV with H halved into [0,180), matching OpenCV's CV_8U layout.
fn rgb_to_hsv8(r: u8, g: u8, b: u8) -> (u8, u8, u8) {
    let (rf, gf, bf) = (r as f32, g as f32, b as f32);
    let v = rf.max(gf).max(bf);
    let m = rf.min(gf).min(bf);

    let s = if v == 0.0 { 0.0 } else { 255.0 * (v - m) / v };

    let h = if v == m {
        0.0
    } else if v == rf {
        60.0 * (gf - bf) / (v - m)
    } else if v == gf {
        120.0 + 60.0 * (bf - rf) / (v - m)
    } else {
        240.0 + 60.0 * (rf - gf) / (v - m)
    };
    let h = if h < 0.0 { h + 360.0 } else { h };

    (((h / 2.0).round()).min(179.0) as u8, s.round() as u8, v as u8)
}

/// Flat bin index for one pixel, H-major like a flattened [H][S][V] cube.
fn bin_index(h: u8, s: u8, v: u8) -> usize {
    let h_bin = h as usize * HIST_BINS / 180;
    let s_bin = s as usize * HIST_BINS / 256;
    let v_bin = v as usize * HIST_BINS / 256;
    (h_bin * HIST_BINS + s_bin) * HIST_BINS + v_bin
}

/// L2-normalized HSV color histogram over a box crop.
///
/// The crop is clamped to the frame; a crop that is empty after clamping
/// (degenerate or fully out-of-bounds box) yields an all-zero histogram.
pub fn color_histogram(frame: &RgbImage, corners: [i32; 4]) -> Signature {
    let (width, height) = frame.dimensions();
    let x1 = corners[0].clamp(0, width as i32) as u32;
    let y1 = corners[1].clamp(0, height as i32) as u32;
    let x2 = corners[2].clamp(0, width as i32) as u32;
    let y2 = corners[3].clamp(0, height as i32) as u32;

    let mut hist = Array1::<f32>::zeros(SIGNATURE_LEN);
    for y in y1..y2 {
        for x in x1..x2 {
            let pixel = frame.get_pixel(x, y);
            let (h, s, v) = rgb_to_hsv8(pixel[0], pixel[1], pixel[2]);
            hist[bin_index(h, s, v)] += 1.0;
        }
    }

    let norm = hist
        .iter()
        .map(|&count| count as f64 * count as f64)
        .sum::<f64>()
        .sqrt();
    if norm > 0.0 {
        hist.mapv_inplace(|count| (count as f64 / norm) as f32);
    }
    hist
}

/// Mean appearance signature per identity for one camera.
///
/// Walks the archive in order, fetching each record's frame by index.
/// Extraction stops quietly once the source runs out of frames. Within a
/// record, each identity claims the first unconsumed box whose centroid
/// equals the identity's recorded centroid; coasting identities have no
/// such box and simply contribute nothing for that frame. Identities with
/// zero observations are absent from the result.
pub fn extract_signatures<F: FrameSource>(
    archive: &TrackArchive,
    source: &mut F,
) -> Result<BTreeMap<u32, Signature>> {
    let mut sums: BTreeMap<u32, (Array1<f64>, usize)> = BTreeMap::new();

    for (position, record) in archive.records.iter().enumerate() {
        let Some(frame) = source.frame(record.frame as usize)? else {
            log::warn!(
                "frame source ended at index {}, ignoring {} remaining records",
                record.frame,
                archive.len() - position
            );
            break;
        };

        let mut consumed = vec![false; record.boxes.len()];
        for (&track_id, centroid) in &record.objects {
            let matched = record.boxes.iter().enumerate().find(|(slot, &corners)| {
                !consumed[*slot] && BoundingBox::from_corners(corners).centroid() == *centroid
            });
            let Some((slot, &corners)) = matched else {
                continue;
            };
            consumed[slot] = true;

            let hist = color_histogram(&frame, corners);
            let entry = sums
                .entry(track_id)
                .or_insert_with(|| (Array1::zeros(SIGNATURE_LEN), 0));
            entry.0.zip_mut_with(&hist, |acc, &count| *acc += count as f64);
            entry.1 += 1;
        }
    }

    let signatures: BTreeMap<u32, Signature> = sums
        .into_iter()
        .map(|(track_id, (sum, count))| {
            let mean = sum.mapv(|value| (value / count as f64) as f32);
            (track_id, mean)
        })
        .collect();

    log::debug!("extracted signatures for {} identities", signatures.len());
    Ok(signatures)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frames::MemoryFrames;
    use crate::records::FrameRecord;
    use approx::assert_abs_diff_eq;
    use image::Rgb;

    const RED_BIN: usize = 63; // h 0, s 7, v 7
    const GREEN_BIN: usize = 191; // h 2, s 7, v 7
    const BLUE_BIN: usize = 383; // h 5, s 7, v 7

    fn solid(width: u32, height: u32, color: [u8; 3]) -> RgbImage {
        RgbImage::from_pixel(width, height, Rgb(color))
    }

    fn record(frame: u64, entries: &[(u32, [i32; 4])]) -> FrameRecord {
        FrameRecord {
            frame,
            objects: entries
                .iter()
                .map(|(id, corners)| (*id, BoundingBox::from_corners(*corners).centroid()))
                .collect(),
            boxes: entries.iter().map(|(_, corners)| *corners).collect(),
        }
    }

    #[test]
    fn test_hsv_known_colors() {
        assert_eq!(rgb_to_hsv8(255, 0, 0), (0, 255, 255));
        assert_eq!(rgb_to_hsv8(0, 255, 0), (60, 255, 255));
        assert_eq!(rgb_to_hsv8(0, 0, 255), (120, 255, 255));
        assert_eq!(rgb_to_hsv8(255, 255, 255), (0, 0, 255));
        assert_eq!(rgb_to_hsv8(0, 0, 0), (0, 0, 0));
        assert_eq!(rgb_to_hsv8(128, 128, 128), (0, 0, 128));
    }

    #[test]
    fn test_uniform_crop_lands_in_one_bin() {
        let frame = solid(4, 4, [255, 0, 0]);
        let hist = color_histogram(&frame, [0, 0, 4, 4]);

        assert_abs_diff_eq!(hist[RED_BIN], 1.0, epsilon = 1e-6);
        assert_abs_diff_eq!(hist.sum(), 1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_two_color_crop_l2_normalized() {
        let mut frame = solid(8, 4, [255, 0, 0]);
        for y in 0..4 {
            for x in 4..8 {
                frame.put_pixel(x, y, Rgb([0, 0, 255]));
            }
        }
        let hist = color_histogram(&frame, [0, 0, 8, 4]);

        let expected = 1.0 / 2.0_f32.sqrt();
        assert_abs_diff_eq!(hist[RED_BIN], expected, epsilon = 1e-6);
        assert_abs_diff_eq!(hist[BLUE_BIN], expected, epsilon = 1e-6);
    }

    #[test]
    fn test_degenerate_crop_is_zero() {
        let frame = solid(4, 4, [255, 0, 0]);
        let hist = color_histogram(&frame, [3, 3, 1, 1]);
        assert_abs_diff_eq!(hist.sum(), 0.0, epsilon = 1e-9);
    }

    #[test]
    fn test_out_of_bounds_crop_clamped() {
        let frame = solid(4, 4, [0, 255, 0]);
        let hist = color_histogram(&frame, [-10, -10, 2, 2]);
        assert_abs_diff_eq!(hist[GREEN_BIN], 1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_signatures_are_per_identity_means() {
        // Identity 0 is red in frame 0 and blue in frame 1.
        let archive = TrackArchive {
            records: vec![
                record(0, &[(0, [0, 0, 4, 4])]),
                record(1, &[(0, [0, 0, 4, 4])]),
            ],
        };
        let mut source = MemoryFrames::new(vec![solid(4, 4, [255, 0, 0]), solid(4, 4, [0, 0, 255])]);

        let signatures = extract_signatures(&archive, &mut source).unwrap();
        let signature = &signatures[&0];
        assert_abs_diff_eq!(signature[RED_BIN], 0.5, epsilon = 1e-6);
        assert_abs_diff_eq!(signature[BLUE_BIN], 0.5, epsilon = 1e-6);
    }

    #[test]
    fn test_aggregation_is_order_invariant() {
        let records = vec![
            record(0, &[(0, [0, 0, 4, 4])]),
            record(1, &[(0, [1, 0, 4, 4])]),
            record(2, &[(0, [0, 1, 4, 4])]),
        ];
        let frames = vec![
            solid(4, 4, [255, 0, 0]),
            solid(4, 4, [0, 0, 255]),
            solid(4, 4, [0, 255, 0]),
        ];

        let forward = extract_signatures(
            &TrackArchive {
                records: records.clone(),
            },
            &mut MemoryFrames::new(frames.clone()),
        )
        .unwrap();

        let mut reversed_records = records;
        reversed_records.reverse();
        let reversed = extract_signatures(
            &TrackArchive {
                records: reversed_records,
            },
            &mut MemoryFrames::new(frames),
        )
        .unwrap();

        for (bin, value) in forward[&0].iter().enumerate() {
            assert_abs_diff_eq!(*value, reversed[&0][bin], epsilon = 1e-6);
        }
    }

    #[test]
    fn test_extraction_stops_at_video_end() {
        // Three records but only two decodable frames; the trailing red
        // observation must be ignored.
        let archive = TrackArchive {
            records: vec![
                record(0, &[(0, [0, 0, 4, 4])]),
                record(1, &[(0, [0, 0, 4, 4])]),
                record(2, &[(0, [0, 0, 4, 4])]),
            ],
        };
        let mut source = MemoryFrames::new(vec![solid(4, 4, [0, 0, 255]), solid(4, 4, [0, 0, 255])]);

        let signatures = extract_signatures(&archive, &mut source).unwrap();
        assert_abs_diff_eq!(signatures[&0][BLUE_BIN], 1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_coasting_identity_contributes_nothing() {
        // Identity 1 coasts at its stale centroid with no matching box.
        let mut objects = std::collections::BTreeMap::new();
        objects.insert(0, BoundingBox::from_corners([0, 0, 4, 4]).centroid());
        objects.insert(1, centroidtrack::Centroid::new(50, 50));
        let archive = TrackArchive {
            records: vec![FrameRecord {
                frame: 0,
                objects,
                boxes: vec![[0, 0, 4, 4]],
            }],
        };
        let mut source = MemoryFrames::new(vec![solid(4, 4, [255, 0, 0])]);

        let signatures = extract_signatures(&archive, &mut source).unwrap();
        assert!(signatures.contains_key(&0));
        assert!(!signatures.contains_key(&1));
    }

    #[test]
    fn test_duplicate_boxes_consumed_once_each() {
        let archive = TrackArchive {
            records: vec![record(0, &[(0, [0, 0, 4, 4]), (1, [0, 0, 4, 4])])],
        };
        let mut source = MemoryFrames::new(vec![solid(4, 4, [255, 0, 0])]);

        let signatures = extract_signatures(&archive, &mut source).unwrap();
        assert_abs_diff_eq!(signatures[&0][RED_BIN], 1.0, epsilon = 1e-6);
        assert_abs_diff_eq!(signatures[&1][RED_BIN], 1.0, epsilon = 1e-6);
    }
}
