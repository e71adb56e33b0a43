//! Greedy centroid-distance tracker
//! Matches each frame's detections to live tracks by nearest centroid

use crate::bbox::{centroid_distances, BoundingBox, Centroid};
use ndarray::prelude::*;
use std::collections::{BTreeMap, HashSet};

/// Default number of consecutive missed frames before a track is dropped.
pub const DEFAULT_MAX_DISAPPEARED: u32 = 10;

/// Per-frame incremental tracker assigning persistent integer identities.
///
/// Identities are monotonically increasing and never reused. One instance
/// owns the tracks of exactly one camera; `update` calls must arrive in
/// frame order.
#[derive(Debug, Clone)]
pub struct CentroidTracker {
    /// Consecutive missed frames tolerated before a track is deregistered.
    pub max_disappeared: u32,
    next_track_id: u32,
    objects: BTreeMap<u32, Centroid>,
    disappeared: BTreeMap<u32, u32>,
}

impl Default for CentroidTracker {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_DISAPPEARED)
    }
}

impl CentroidTracker {
    pub fn new(max_disappeared: u32) -> Self {
        CentroidTracker {
            max_disappeared,
            next_track_id: 0,
            objects: BTreeMap::new(),
            disappeared: BTreeMap::new(),
        }
    }

    fn register(&mut self, centroid: Centroid) {
        self.objects.insert(self.next_track_id, centroid);
        self.disappeared.insert(self.next_track_id, 0);
        self.next_track_id += 1;
    }

    fn deregister(&mut self, track_id: u32) {
        self.objects.remove(&track_id);
        self.disappeared.remove(&track_id);
    }

    /// Increment the missed-frame counter, evicting past the threshold.
    fn mark_disappeared(&mut self, track_id: u32) {
        let count = match self.disappeared.get_mut(&track_id) {
            Some(count) => {
                *count += 1;
                *count
            }
            None => return,
        };
        if count > self.max_disappeared {
            self.deregister(track_id);
        }
    }

    /// Process one frame of detection boxes, in frame order.
    ///
    /// Greedy nearest-centroid matching: rows (live tracks) are visited in
    /// ascending order of their minimum distance and each takes its argmin
    /// column (new detection). A row whose column was already consumed by a
    /// closer row stays unmatched for this frame; it does not retry with its
    /// second-best column. Unmatched columns register new tracks, unmatched
    /// rows coast on their last centroid until `max_disappeared` is exceeded.
    ///
    /// Returns the live identity to centroid mapping after the update. The
    /// reference points at internal state and is only valid until the next
    /// call.
    pub fn update(&mut self, detections: &[BoundingBox]) -> &BTreeMap<u32, Centroid> {
        if detections.is_empty() {
            let track_ids: Vec<u32> = self.disappeared.keys().copied().collect();
            for track_id in track_ids {
                self.mark_disappeared(track_id);
            }
            return &self.objects;
        }

        let incoming: Vec<Centroid> = detections.iter().map(BoundingBox::centroid).collect();

        if self.objects.is_empty() {
            for centroid in incoming {
                self.register(centroid);
            }
            return &self.objects;
        }

        let track_ids: Vec<u32> = self.objects.keys().copied().collect();
        let tracked: Vec<Centroid> = self.objects.values().copied().collect();
        let dist = centroid_distances(&tracked, &incoming);

        // Rows sorted by their minimum achievable distance; ties keep
        // ascending row order (stable sort).
        let row_minima: Vec<f64> = dist
            .rows()
            .into_iter()
            .map(|row| row.iter().copied().fold(f64::INFINITY, f64::min))
            .collect();
        let mut row_order: Vec<usize> = (0..dist.nrows()).collect();
        row_order.sort_by(|&a, &b| row_minima[a].total_cmp(&row_minima[b]));

        let mut used_rows: HashSet<usize> = HashSet::new();
        let mut used_cols: HashSet<usize> = HashSet::new();

        for &row in &row_order {
            let col = argmin(dist.row(row));
            if used_rows.contains(&row) || used_cols.contains(&col) {
                continue;
            }
            let track_id = track_ids[row];
            self.objects.insert(track_id, incoming[col]);
            self.disappeared.insert(track_id, 0);
            used_rows.insert(row);
            used_cols.insert(col);
        }

        for col in 0..dist.ncols() {
            if !used_cols.contains(&col) {
                self.register(incoming[col]);
            }
        }
        for row in 0..dist.nrows() {
            if !used_rows.contains(&row) {
                self.mark_disappeared(track_ids[row]);
            }
        }

        &self.objects
    }

    /// Live identity to centroid mapping.
    pub fn objects(&self) -> &BTreeMap<u32, Centroid> {
        &self.objects
    }

    /// Current number of live tracks.
    pub fn num_tracks(&self) -> usize {
        self.objects.len()
    }

    /// Missed-frame count for a live track, `None` once deregistered.
    pub fn disappeared_frames(&self, track_id: u32) -> Option<u32> {
        self.disappeared.get(&track_id).copied()
    }

    /// Drop all tracks and reset the identity counter.
    pub fn clear(&mut self) {
        self.objects.clear();
        self.disappeared.clear();
        self.next_track_id = 0;
    }
}

/// Index of the first minimum in a row.
fn argmin(row: ArrayView1<f64>) -> usize {
    let mut best = 0;
    for (j, &value) in row.iter().enumerate() {
        if value < row[best] {
            best = j;
        }
    }
    best
}
