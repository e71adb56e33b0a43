//! Pure Rust greedy centroid tracking library
//!
//! Converts a stream of per-frame detection boxes into stable track
//! identities by nearest-centroid matching, with no Python bindings and
//! no detector or video dependencies.
//!
//! # Example
//!
//! ```rust
//! use centroidtrack::{BoundingBox, CentroidTracker};
//!
//! let mut tracker = CentroidTracker::default();
//!
//! // One frame's worth of already-filtered detection boxes.
//! let detections = vec![BoundingBox::new(10.0, 10.0, 50.0, 50.0)];
//! let objects = tracker.update(&detections);
//! assert_eq!(objects.len(), 1);
//! ```

pub mod bbox;
pub mod tracker;

pub use bbox::{centroid_distances, BoundingBox, Centroid};
pub use tracker::{CentroidTracker, DEFAULT_MAX_DISAPPEARED};
