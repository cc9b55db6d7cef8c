// src/union_lib/mod.rs

pub mod arrangement;
pub mod assemble;
pub mod classify;
pub mod tolerance;
pub mod trace;
pub mod validate;

use serde::{Deserialize, Serialize};

use crate::error::{GeometryError, Result};
use crate::geometry::{Point2, Polygon};
use tolerance::{Tolerance, DEFAULT_RELATIVE_TOLERANCE};

/// Disjoint polygons covering exactly the union of the input shapes, in
/// canonical order.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UnionResult {
    polygons: Vec<Polygon>,
}

impl UnionResult {
    pub fn polygons(&self) -> &[Polygon] {
        &self.polygons
    }

    pub fn into_polygons(self) -> Vec<Polygon> {
        self.polygons
    }

    pub fn len(&self) -> usize {
        self.polygons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.polygons.is_empty()
    }

    pub fn area(&self) -> f64 {
        self.polygons.iter().map(Polygon::area).sum()
    }

    pub fn hole_count(&self) -> usize {
        self.polygons.iter().map(|p| p.interiors().len()).sum()
    }

    pub fn contains_point(&self, point: &Point2) -> bool {
        self.polygons.iter().any(|p| p.contains_point(point))
    }
}

/// Planar union of simple polygons: arrangement, coverage classification,
/// face tracing, then hole nesting.
#[derive(Clone, Copy, Debug)]
pub struct PolygonUnion {
    relative_tolerance: f64,
}

impl Default for PolygonUnion {
    fn default() -> Self {
        Self::new()
    }
}

impl PolygonUnion {
    pub fn new() -> Self {
        Self {
            relative_tolerance: DEFAULT_RELATIVE_TOLERANCE,
        }
    }

    /// Engine with a custom relative tolerance, e.g. to retry a union that
    /// failed with a consistency error.
    pub fn with_tolerance(relative_tolerance: f64) -> Result<Self> {
        if !relative_tolerance.is_finite() || relative_tolerance <= 0.0 {
            return Err(GeometryError::invalid_config(format!(
                "relative tolerance must be finite and positive, got {relative_tolerance}"
            )));
        }
        Ok(Self { relative_tolerance })
    }

    pub fn relative_tolerance(&self) -> f64 {
        self.relative_tolerance
    }

    pub fn union(&self, polygons: &[Polygon]) -> Result<UnionResult> {
        if polygons.is_empty() {
            return Ok(UnionResult::default());
        }
        let tol = Tolerance::for_collection(polygons, self.relative_tolerance);
        let prepared = validate::prepare(polygons, &tol)?;

        let arr = arrangement::build(&prepared, &tol);
        let boundary = classify::boundary_edges(&arr);
        let result = trace::trace_rings(&arr.vertices, &boundary)
            .and_then(|cycles| assemble::assemble(&arr.vertices, &cycles, &tol));

        match result {
            Ok(polygons) => {
                log::debug!(
                    "union of {} shapes produced {} polygons",
                    prepared.len(),
                    polygons.len()
                );
                Ok(UnionResult { polygons })
            }
            Err(err) => {
                log::warn!("union aborted (eps = {:e}): {}", tol.eps, err);
                Err(err)
            }
        }
    }
}
