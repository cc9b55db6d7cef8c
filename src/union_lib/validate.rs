// src/union_lib/validate.rs

use crate::error::{GeometryError, Result};
use crate::geometry::{orient, Point2, Polygon, Ring};
use crate::union_lib::arrangement::{crossing, segment_distance, segments_touch};
use crate::union_lib::tolerance::Tolerance;

/// Drops consecutive vertices closer than the tolerance, including across the
/// closing edge.
fn distinct_vertices(ring: &Ring, tol: &Tolerance) -> Vec<Point2> {
    let mut points: Vec<Point2> = Vec::with_capacity(ring.len());
    for p in ring.vertices() {
        if points.last().map_or(true, |last| !tol.same_point(last, p)) {
            points.push(*p);
        }
    }
    while points.len() > 1 && tol.same_point(&points[0], &points[points.len() - 1]) {
        points.pop();
    }
    points
}

/// Non-adjacent edges must not touch and adjacent edges must not fold back
/// onto each other.
fn is_simple(points: &[Point2], tol: &Tolerance) -> bool {
    let n = points.len();
    for i in 0..n {
        let (a, b, c) = (points[i], points[(i + 1) % n], points[(i + 2) % n]);
        let ab = b.to_vec() - a.to_vec();
        let bc = c.to_vec() - b.to_vec();
        if orient(&a, &b, &c).abs() <= tol.eps * (ab.length() + bc.length()) && ab.dot(bc) < 0.0 {
            return false;
        }
    }
    for i in 0..n {
        for j in (i + 2)..n {
            if i == 0 && j == n - 1 {
                continue;
            }
            let (a, b) = (points[i], points[(i + 1) % n]);
            let (c, d) = (points[j], points[(j + 1) % n]);
            if segments_touch(&a, &b, &c, &d, tol) {
                return false;
            }
        }
    }
    true
}

fn clean_ring(ring: &Ring, tol: &Tolerance) -> std::result::Result<Ring, String> {
    if ring.vertices().iter().any(|p| !p.is_finite()) {
        return Err("non-finite coordinate".to_string());
    }
    let points = distinct_vertices(ring, tol);
    if points.len() < 3 {
        return Err(format!("{} distinct vertices, at least 3 required", points.len()));
    }
    let cleaned = Ring::from_vec(points);
    let extent = cleaned
        .bounds()
        .map(|b| b.width().hypot(b.height()))
        .unwrap_or(0.0);
    if cleaned.area() <= tol.area_eps(extent) {
        return Err("zero enclosed area".to_string());
    }
    Ok(cleaned)
}

/// a-b and c-d run along the same line for longer than the tolerance.
fn collinear_overlap(a: &Point2, b: &Point2, c: &Point2, d: &Point2, tol: &Tolerance) -> bool {
    let ab = b.to_vec() - a.to_vec();
    let len = ab.length();
    if len <= tol.eps || orient(a, b, c).abs() > tol.eps * len || orient(a, b, d).abs() > tol.eps * len {
        return false;
    }
    let dir = ab / len;
    let s0 = (c.to_vec() - a.to_vec()).dot(dir);
    let s1 = (d.to_vec() - a.to_vec()).dot(dir);
    s0.max(s1).min(len) - s0.min(s1).max(0.0) > tol.eps
}

/// Two rings whose boundaries cross or share a stretch of edge. Meeting at
/// isolated points is allowed.
fn boundaries_cross(first: &Ring, second: &Ring, tol: &Tolerance) -> bool {
    first.edges().any(|(a, b)| {
        second.edges().any(|(c, d)| {
            let proper = crossing(&a, &b, &c, &d, tol)
                .is_some_and(|(p, _, _)| [a, b, c, d].iter().all(|q| !tol.same_point(q, &p)));
            proper || collinear_overlap(&a, &b, &c, &d, tol)
        })
    })
}

fn on_boundary(p: &Point2, ring: &Ring, tol: &Tolerance) -> bool {
    ring.edges().any(|(a, b)| segment_distance(p, &a, &b) <= tol.eps)
}

/// Vertices and edge midpoints of `ring`.
fn sample_points(ring: &Ring) -> impl Iterator<Item = Point2> + '_ {
    ring.edges().flat_map(|(a, b)| [a, a.midpoint(&b)])
}

/// Places every interior ring inside the exterior and apart from its siblings.
fn check_holes(exterior: &Ring, holes: &[Ring], tol: &Tolerance) -> std::result::Result<(), String> {
    for (k, hole) in holes.iter().enumerate() {
        if !is_simple(hole.vertices(), tol) {
            return Err(format!("self-intersecting interior ring {k}"));
        }
        if boundaries_cross(hole, exterior, tol) {
            return Err(format!("interior ring {k} crosses the exterior ring"));
        }
        if sample_points(hole).any(|p| !exterior.contains_point(&p) && !on_boundary(&p, exterior, tol)) {
            return Err(format!("interior ring {k} lies outside the exterior ring"));
        }
    }
    for (j, first) in holes.iter().enumerate() {
        for (k, second) in holes.iter().enumerate().skip(j + 1) {
            let reaches_into = |inner: &Ring, outer: &Ring| {
                sample_points(inner).any(|p| outer.contains_point(&p) && !on_boundary(&p, outer, tol))
            };
            if boundaries_cross(first, second, tol) || reaches_into(first, second) || reaches_into(second, first) {
                return Err(format!("interior rings {j} and {k} overlap"));
            }
        }
    }
    Ok(())
}

/// Checks every input polygon and returns copies with exterior rings
/// counter-clockwise and holes clockwise, so each ring edge adds +1 to the
/// winding number on its left.
pub fn prepare(polygons: &[Polygon], tol: &Tolerance) -> Result<Vec<Polygon>> {
    let mut prepared = Vec::with_capacity(polygons.len());
    for (index, polygon) in polygons.iter().enumerate() {
        let exterior = clean_ring(polygon.exterior(), tol)
            .map_err(|reason| GeometryError::invalid_shape(index, format!("exterior ring: {reason}")))?;
        if !is_simple(exterior.vertices(), tol) {
            return Err(GeometryError::invalid_shape(index, "self-intersecting exterior ring"));
        }

        let mut interiors = Vec::with_capacity(polygon.interiors().len());
        for (k, hole) in polygon.interiors().iter().enumerate() {
            let hole = clean_ring(hole, tol).map_err(|reason| {
                GeometryError::invalid_shape(index, format!("interior ring {k}: {reason}"))
            })?;
            interiors.push(hole.oriented(false));
        }
        check_holes(&exterior, &interiors, tol).map_err(|reason| GeometryError::invalid_shape(index, reason))?;

        let normalized = Polygon::new(exterior.oriented(true), interiors);
        if normalized.area() <= 0.0 {
            return Err(GeometryError::invalid_shape(index, "non-positive polygon area"));
        }
        prepared.push(normalized);
    }
    Ok(prepared)
}
