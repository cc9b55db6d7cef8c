// src/covering.rs

use crate::error::{GeometryError, Result};
use crate::geometry::{collection_bounds, Polygon};

/// Padding added around the collection's bounding box.
pub const DEFAULT_MARGIN: f64 = 5.0;

/// Axis-aligned rectangle enclosing every vertex of `shapes`, grown by `margin`
/// on each side.
pub fn covering_rectangle(shapes: &[Polygon], margin: f64) -> Result<Polygon> {
    if !margin.is_finite() || margin <= 0.0 {
        return Err(GeometryError::invalid_config(format!(
            "covering margin must be positive, got {margin}"
        )));
    }
    let bounds = collection_bounds(shapes).ok_or(GeometryError::EmptyInput)?;
    Ok(bounds.expanded(margin).to_polygon())
}
