// src/union_lib/assemble.rs

use std::cmp::Ordering;

use crate::error::{GeometryError, Result};
use crate::geometry::{orient, Bounds, Point2, Polygon, Ring};
use crate::union_lib::tolerance::Tolerance;

struct TracedRing {
    ring: Ring,
    area: f64,
    bounds: Bounds,
    /// Midpoint of an arrangement edge of this ring. It never lies on another
    /// ring, so containment tests against it are unambiguous.
    probe: Point2,
}

fn traced(vertices: &[Point2], cycle: &[usize], tol: &Tolerance) -> Result<TracedRing> {
    let points: Vec<Point2> = cycle.iter().map(|&id| vertices[id]).collect();
    let probe = points[0].midpoint(&points[1]);
    let ring = Ring::from_vec(points);
    let bounds = ring
        .bounds()
        .ok_or_else(|| GeometryError::consistency("empty traced ring"))?;
    let area = ring.signed_area();
    if area.abs() <= tol.area_eps(bounds.width().hypot(bounds.height())) {
        return Err(GeometryError::consistency(format!(
            "traced ring starting at ({}, {}) encloses no area",
            ring.vertices()[0].x,
            ring.vertices()[0].y
        )));
    }
    Ok(TracedRing {
        ring,
        area,
        bounds,
        probe,
    })
}

fn bounds_within(inner: &Bounds, outer: &Bounds) -> bool {
    inner.min_x >= outer.min_x
        && inner.min_y >= outer.min_y
        && inner.max_x <= outer.max_x
        && inner.max_y <= outer.max_y
}

/// Removes vertices that sit on the straight line between their neighbours.
fn drop_collinear(ring: &Ring, tol: &Tolerance) -> Ring {
    let mut points = ring.vertices().to_vec();
    let mut changed = true;
    while changed && points.len() > 3 {
        changed = false;
        let n = points.len();
        for i in 0..n {
            let prev = points[(i + n - 1) % n];
            let here = points[i];
            let next = points[(i + 1) % n];
            let span = prev.distance(&next);
            let forward = (here.to_vec() - prev.to_vec()).dot(next.to_vec() - here.to_vec()) > 0.0;
            if forward && orient(&prev, &here, &next).abs() <= tol.eps * span {
                points.remove(i);
                changed = true;
                break;
            }
        }
    }
    Ring::from_vec(points)
}

pub fn ring_cmp(a: &Ring, b: &Ring) -> Ordering {
    a.vertices()
        .iter()
        .zip(b.vertices())
        .map(|(p, q)| p.lex_cmp(q))
        .find(|o| o.is_ne())
        .unwrap_or_else(|| a.len().cmp(&b.len()))
}

fn canonical(ring: &Ring, ccw: bool, tol: &Tolerance) -> Ring {
    drop_collinear(ring, tol).oriented(ccw).rotated_to_min_vertex()
}

/// Groups traced cycles into polygons: counter-clockwise cycles are exteriors,
/// clockwise cycles are holes owned by the smallest exterior that contains
/// them. Output is in canonical, deterministic order.
pub fn assemble(vertices: &[Point2], cycles: &[Vec<usize>], tol: &Tolerance) -> Result<Vec<Polygon>> {
    let mut exteriors = Vec::new();
    let mut holes = Vec::new();
    for cycle in cycles {
        let ring = traced(vertices, cycle, tol)?;
        if ring.area > 0.0 {
            exteriors.push(ring);
        } else {
            holes.push(ring);
        }
    }

    // Smallest first, so a hole is paired with the innermost exterior around it.
    exteriors.sort_by(|a, b| a.area.total_cmp(&b.area));
    let mut owned: Vec<Vec<Ring>> = vec![Vec::new(); exteriors.len()];
    for hole in &holes {
        let owner = exteriors
            .iter()
            .position(|ext| bounds_within(&hole.bounds, &ext.bounds) && ext.ring.contains_point(&hole.probe))
            .ok_or_else(|| {
                GeometryError::consistency(format!(
                    "hole ring near ({}, {}) has no enclosing exterior ring",
                    hole.probe.x, hole.probe.y
                ))
            })?;
        owned[owner].push(canonical(&hole.ring, false, tol));
    }

    let mut polygons: Vec<Polygon> = exteriors
        .iter()
        .zip(owned)
        .map(|(ext, mut interiors)| {
            interiors.sort_by(ring_cmp);
            Polygon::new(canonical(&ext.ring, true, tol), interiors)
        })
        .collect();
    polygons.sort_by(|a, b| ring_cmp(a.exterior(), b.exterior()));

    if let Some(bad) = polygons.iter().flat_map(Polygon::rings).find(|r| r.len() < 3) {
        return Err(GeometryError::consistency(format!(
            "ring collapsed to {} vertices after simplification",
            bad.len()
        )));
    }
    Ok(polygons)
}
