//! Cross-camera identity mapping
//!
//! Compares per-identity appearance signatures from two cameras and pairs
//! them up with a globally optimal assignment over Euclidean distances.
//! The resulting mapping translates camera-B track identifiers into
//! camera-A track identifiers.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::assignment::AssignmentSolver;
use crate::error::Result;
use crate::features::Signature;

/// Euclidean distance between two appearance signatures.
///
/// Accumulates in f64 so that 512 squared terms lose no precision.
pub fn signature_distance(a: &Signature, b: &Signature) -> f64 {
    a.iter()
        .zip(b.iter())
        .map(|(&x, &y)| {
            let diff = f64::from(x) - f64::from(y);
            diff * diff
        })
        .sum::<f64>()
        .sqrt()
}

/// Identity correspondence between two cameras, keyed by camera-B track id
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IdentityMapping {
    #[serde(with = "id_pairs")]
    pairs: BTreeMap<u32, u32>,
}

impl IdentityMapping {
    /// Camera-A identity paired with the given camera-B identity, if any.
    pub fn get(&self, camera_b_id: u32) -> Option<u32> {
        self.pairs.get(&camera_b_id).copied()
    }

    /// Number of matched identity pairs.
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Matched pairs as (camera-B id, camera-A id), ascending by camera-B id.
    pub fn iter(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        self.pairs.iter().map(|(&from, &to)| (from, to))
    }

    /// Write the mapping as pretty-printed JSON, creating parent
    /// directories as needed.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        log::info!("saved {} identity pairs to {}", self.len(), path.display());
        Ok(())
    }

    /// Read a mapping back from JSON.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let mapping: Self = serde_json::from_str(&fs::read_to_string(path)?)?;
        log::debug!(
            "loaded {} identity pairs from {}",
            mapping.len(),
            path.display()
        );
        Ok(mapping)
    }
}

/// Pair up identities from two cameras by appearance.
///
/// Builds the full distance matrix between camera-A and camera-B
/// signatures and solves it optimally, so min(A, B) pairs come back and
/// surplus identities on the larger side stay unmapped. Either side empty
/// yields an empty mapping.
pub fn map_identities(
    signatures_a: &BTreeMap<u32, Signature>,
    signatures_b: &BTreeMap<u32, Signature>,
) -> IdentityMapping {
    if signatures_a.is_empty() || signatures_b.is_empty() {
        log::warn!(
            "cannot map identities: {} signatures from camera A, {} from camera B",
            signatures_a.len(),
            signatures_b.len()
        );
        return IdentityMapping::default();
    }

    let ids_a: Vec<u32> = signatures_a.keys().copied().collect();
    let ids_b: Vec<u32> = signatures_b.keys().copied().collect();

    let costs = Array2::from_shape_fn((ids_a.len(), ids_b.len()), |(i, j)| {
        signature_distance(&signatures_a[&ids_a[i]], &signatures_b[&ids_b[j]])
    });

    let result = AssignmentSolver::solve(costs.view());

    let mut mapping = IdentityMapping::default();
    for &(i, j) in &result.assignments {
        mapping.pairs.insert(ids_b[j], ids_a[i]);
    }

    log::info!(
        "matched {} identity pairs across cameras (total distance {:.4})",
        mapping.len(),
        result.total_cost
    );
    mapping
}

/// String-keyed, string-valued JSON representation of the pair map
mod id_pairs {
    use std::collections::BTreeMap;

    use serde::de::Error;
    use serde::ser::SerializeMap;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(pairs: &BTreeMap<u32, u32>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(pairs.len()))?;
        for (from, to) in pairs {
            map.serialize_entry(&from.to_string(), &to.to_string())?;
        }
        map.end()
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<BTreeMap<u32, u32>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = BTreeMap::<String, String>::deserialize(deserializer)?;
        raw.into_iter()
            .map(|(from, to)| {
                let from = from.parse::<u32>().map_err(D::Error::custom)?;
                let to = to.parse::<u32>().map_err(D::Error::custom)?;
                Ok((from, to))
            })
            .collect()
    }
}
