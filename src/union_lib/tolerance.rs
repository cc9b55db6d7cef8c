// src/union_lib/tolerance.rs

use crate::geometry::{collection_bounds, Point2, Polygon};

pub const DEFAULT_RELATIVE_TOLERANCE: f64 = 1e-9;

/// Absolute distance below which two coordinates are treated as identical.
/// Scales with the largest coordinate magnitude of the input.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tolerance {
    pub eps: f64,
}

impl Tolerance {
    pub fn for_collection(polygons: &[Polygon], relative: f64) -> Self {
        let magnitude = collection_bounds(polygons)
            .map(|b| b.magnitude())
            .filter(|m| m.is_finite())
            .unwrap_or(1.0)
            .max(1.0);
        Self {
            eps: relative * magnitude,
        }
    }

    pub fn same_point(&self, a: &Point2, b: &Point2) -> bool {
        a.distance(b) <= self.eps
    }

    /// Areas at or below this value are treated as zero for a shape of the given extent.
    pub fn area_eps(&self, extent: f64) -> f64 {
        self.eps * extent.max(self.eps)
    }
}
