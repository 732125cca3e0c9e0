use serde::{Deserialize, Serialize};

use crate::vertex::{VertexXy, VertexXyzm};

/// Axis-aligned bounding box in 2D.
#[derive(Debug, Copy, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtentXy {
    /// Lower-left corner.
    pub min: VertexXy,
    /// Upper-right corner.
    pub max: VertexXy,
}

impl ExtentXy {
    /// Creates an extent from its corners.
    pub fn new(min: VertexXy, max: VertexXy) -> Self {
        Self { min, max }
    }

    /// The empty extent: min at +∞ and max at −∞, so that merging any vertex
    /// into it produces that vertex's extent.
    pub fn smallest() -> Self {
        Self {
            min: VertexXy::new(f64::MAX, f64::MAX),
            max: VertexXy::new(f64::MIN, f64::MIN),
        }
    }

    /// The zero extent with both corners at the origin.
    pub fn zero() -> Self {
        Self::default()
    }

    /// Returns true if the vertex lies inside or on the boundary.
    pub fn contains(&self, other: &VertexXy) -> bool {
        self.min.x <= other.x && self.max.x >= other.x && self.min.y <= other.y && self.max.y >= other.y
    }

    /// Returns true if the extents share at least one point.
    pub fn intersects(&self, other: &ExtentXy) -> bool {
        !(self.min.x > other.max.x
            || self.max.x < other.min.x
            || self.min.y > other.max.y
            || self.max.y < other.min.y)
    }

    /// Grows the extent to cover the vertex.
    pub fn expand(&mut self, vertex: &VertexXy) {
        self.min.x = self.min.x.min(vertex.x);
        self.min.y = self.min.y.min(vertex.y);
        self.max.x = self.max.x.max(vertex.x);
        self.max.y = self.max.y.max(vertex.y);
    }

    /// Grows the extent to cover another extent.
    pub fn merge(&mut self, other: &ExtentXy) {
        self.min.x = self.min.x.min(other.min.x);
        self.min.y = self.min.y.min(other.min.y);
        self.max.x = self.max.x.max(other.max.x);
        self.max.y = self.max.y.max(other.max.y);
    }

    /// Euclidean distance from the box to a vertex, 0 when contained.
    pub fn distance_to(&self, other: &VertexXy) -> f64 {
        if self.contains(other) {
            return 0.0;
        }
        let dx = (self.min.x - other.x).max(other.x - self.max.x);
        let dy = (self.min.y - other.y).max(other.y - self.max.y);
        (dx * dx + dy * dy).sqrt()
    }

    /// Squared euclidean distance between two boxes, 0 when they overlap.
    pub fn distance_to_sq(&self, other: &ExtentXy) -> f64 {
        let dx = 0.0_f64.max((self.min.x - other.max.x).max(other.min.x - self.max.x));
        let dy = 0.0_f64.max((self.min.y - other.max.y).max(other.min.y - self.max.y));
        dx * dx + dy * dy
    }

    /// Euclidean distance between two boxes, 0 when they overlap.
    pub fn distance_to_extent(&self, other: &ExtentXy) -> f64 {
        self.distance_to_sq(other).sqrt()
    }

    /// Area of the box, 0 when inverted or flat.
    pub fn area(&self) -> f64 {
        if self.min.x >= self.max.x || self.min.y >= self.max.y {
            return 0.0;
        }
        (self.max.x - self.min.x) * (self.max.y - self.min.y)
    }
}

/// Axis-aligned bounding box over all four ordinates.
#[derive(Debug, Copy, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtentXyzm {
    /// Per-ordinate minima.
    pub min: VertexXyzm,
    /// Per-ordinate maxima.
    pub max: VertexXyzm,
}

impl ExtentXyzm {
    /// The empty extent: minima at +∞ and maxima at −∞.
    pub fn smallest() -> Self {
        Self {
            min: VertexXyzm::new(f64::MAX, f64::MAX, f64::MAX, f64::MAX),
            max: VertexXyzm::new(f64::MIN, f64::MIN, f64::MIN, f64::MIN),
        }
    }

    /// The zero extent with both corners at the origin.
    pub fn zero() -> Self {
        Self::default()
    }

    /// Grows the extent to cover the vertex in all four ordinates.
    pub fn expand(&mut self, vertex: &VertexXyzm) {
        self.min.x = self.min.x.min(vertex.x);
        self.min.y = self.min.y.min(vertex.y);
        self.min.z = self.min.z.min(vertex.z);
        self.min.m = self.min.m.min(vertex.m);
        self.max.x = self.max.x.max(vertex.x);
        self.max.y = self.max.y.max(vertex.y);
        self.max.z = self.max.z.max(vertex.z);
        self.max.m = self.max.m.max(vertex.m);
    }
}
