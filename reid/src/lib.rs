//! Cross-Camera Player Re-Identification Library
//!
//! Tracks players through two independently recorded views of the same
//! scene and reconciles the resulting track identities, so that a player
//! carries one consistent identifier across both cameras. Detection is
//! external; this library consumes per-frame detection lists, assigns
//! per-camera track identities, summarizes each identity's appearance as
//! a color histogram signature, and pairs identities across cameras with
//! an optimal assignment.

pub mod assignment;
pub mod error;
pub mod features;
pub mod frames;
pub mod mapper;
pub mod pipeline;
pub mod records;
pub mod types;

pub use assignment::{AssignmentResult, AssignmentSolver};
pub use error::{ReidError, Result};
pub use features::{color_histogram, extract_signatures, Signature, SIGNATURE_LEN};
pub use frames::{FrameSource, ImageSequence, MemoryFrames};
pub use mapper::{map_identities, signature_distance, IdentityMapping};
pub use pipeline::{reconcile, run_tracker, TrackingConfig};
pub use records::{FrameRecord, TrackArchive};
pub use types::{load_detections, Detection};

/// Get library version information
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
