//! Per-frame track records and their JSON persistence

use crate::error::{ReidError, Result};
use centroidtrack::Centroid;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;

/// Snapshot of one camera's tracker state after processing one frame.
///
/// `objects` is keyed by track identity; `boxes` keeps the raw detections
/// in the order they were supplied that frame. The two are serialized
/// independently, identity keys become strings only on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameRecord {
    /// 0-based frame index, strictly increasing within an archive.
    pub frame: u64,
    /// Live track identities with their centroids at this frame.
    #[serde(with = "id_keys")]
    pub objects: BTreeMap<u32, Centroid>,
    /// Integer detection boxes in supply order.
    pub boxes: Vec<[i32; 4]>,
}

/// Append-only sequence of frame records for one camera.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrackArchive {
    pub records: Vec<FrameRecord>,
}

impl TrackArchive {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: FrameRecord) {
        self.records.push(record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// All identities that ever appeared, ascending.
    pub fn identities(&self) -> Vec<u32> {
        let mut ids: BTreeSet<u32> = BTreeSet::new();
        for record in &self.records {
            ids.extend(record.objects.keys().copied());
        }
        ids.into_iter().collect()
    }

    /// Write the archive as a JSON array, creating parent directories.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        log::info!("Tracking results saved to {}", path.display());
        Ok(())
    }

    /// Read an archive back, rejecting out-of-order frame indices.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path)?;
        let archive: Self = serde_json::from_str(&raw)?;
        archive.validate()?;
        log::debug!(
            "Loaded {} frame records from {}",
            archive.len(),
            path.display()
        );
        Ok(archive)
    }

    fn validate(&self) -> Result<()> {
        for pair in self.records.windows(2) {
            if pair[1].frame <= pair[0].frame {
                return Err(ReidError::archive(format!(
                    "frame indices must be strictly increasing, found {} after {}",
                    pair[1].frame, pair[0].frame
                )));
            }
        }
        Ok(())
    }
}

/// Identity keys are integers in memory and strings on the wire.
mod id_keys {
    use centroidtrack::Centroid;
    use serde::de::Error as DeError;
    use serde::ser::SerializeMap;
    use serde::{Deserialize, Deserializer, Serializer};
    use std::collections::BTreeMap;

    pub fn serialize<S>(map: &BTreeMap<u32, Centroid>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut out = serializer.serialize_map(Some(map.len()))?;
        for (track_id, centroid) in map {
            out.serialize_entry(&track_id.to_string(), centroid)?;
        }
        out.end()
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<BTreeMap<u32, Centroid>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = BTreeMap::<String, Centroid>::deserialize(deserializer)?;
        raw.into_iter()
            .map(|(key, centroid)| {
                key.parse::<u32>()
                    .map(|track_id| (track_id, centroid))
                    .map_err(|_| D::Error::custom(format!("invalid track identity key: {}", key)))
            })
            .collect()
    }
}
