//! Bounding box and centroid operations

use ndarray::prelude::*;
use rayon::prelude::*;
use std::fmt;

/// Axis-aligned detection box in corner format.
///
/// `x1 < x2` and `y1 < y2` are expected but not enforced; a degenerate
/// box still yields a computable (if meaningless) centroid.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(from = "[f32; 4]", into = "[f32; 4]"))]
pub struct BoundingBox {
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
}

impl BoundingBox {
    pub fn new(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    pub fn width(&self) -> f32 {
        self.x2 - self.x1
    }

    pub fn height(&self) -> f32 {
        self.y2 - self.y1
    }

    pub fn area(&self) -> f32 {
        self.width() * self.height()
    }

    /// Integer center point, each coordinate truncated toward zero.
    pub fn centroid(&self) -> Centroid {
        Centroid {
            x: ((self.x1 + self.x2) / 2.0) as i32,
            y: ((self.y1 + self.y2) / 2.0) as i32,
        }
    }

    /// Truncate to integer corners [x1, y1, x2, y2].
    pub fn to_corners(&self) -> [i32; 4] {
        [
            self.x1 as i32,
            self.y1 as i32,
            self.x2 as i32,
            self.y2 as i32,
        ]
    }

    pub fn from_corners(corners: [i32; 4]) -> Self {
        Self {
            x1: corners[0] as f32,
            y1: corners[1] as f32,
            x2: corners[2] as f32,
            y2: corners[3] as f32,
        }
    }
}

impl From<[f32; 4]> for BoundingBox {
    fn from(c: [f32; 4]) -> Self {
        Self::new(c[0], c[1], c[2], c[3])
    }
}

impl From<BoundingBox> for [f32; 4] {
    fn from(b: BoundingBox) -> Self {
        [b.x1, b.y1, b.x2, b.y2]
    }
}

impl fmt::Display for BoundingBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "BoundingBox({}, {}, {}, {})",
            self.x1, self.y1, self.x2, self.y2
        )
    }
}

/// Integer center point of a bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(from = "[i32; 2]", into = "[i32; 2]"))]
pub struct Centroid {
    pub x: i32,
    pub y: i32,
}

impl Centroid {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another centroid.
    pub fn distance(&self, other: &Centroid) -> f64 {
        let dx = (self.x - other.x) as f64;
        let dy = (self.y - other.y) as f64;
        (dx * dx + dy * dy).sqrt()
    }
}

impl From<[i32; 2]> for Centroid {
    fn from(c: [i32; 2]) -> Self {
        Self { x: c[0], y: c[1] }
    }
}

impl From<Centroid> for [i32; 2] {
    fn from(c: Centroid) -> Self {
        [c.x, c.y]
    }
}

impl fmt::Display for Centroid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Compute the pairwise Euclidean distance matrix with parallel processing
/// Returns: (n_tracked, n_incoming) distance matrix
pub fn centroid_distances(tracked: &[Centroid], incoming: &[Centroid]) -> Array2<f64> {
    let n_tracked = tracked.len();
    let n_incoming = incoming.len();

    if n_tracked == 0 || n_incoming == 0 {
        return Array2::zeros((n_tracked, n_incoming));
    }

    let dist_data: Vec<f64> = (0..n_tracked)
        .into_par_iter()
        .flat_map(|i| {
            incoming
                .iter()
                .map(|c| tracked[i].distance(c))
                .collect::<Vec<_>>()
        })
        .collect();

    Array2::from_shape_vec((n_tracked, n_incoming), dist_data).unwrap()
}
