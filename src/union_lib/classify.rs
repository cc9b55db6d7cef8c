// src/union_lib/classify.rs

use glam::DVec2;

use crate::geometry::Point2;
use crate::union_lib::arrangement::Arrangement;

/// Arrangement edge that separates covered from uncovered space, directed so
/// the covered side is on its left.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BoundaryEdge {
    pub from: usize,
    pub to: usize,
}

/// Buckets arrangement edges into strips along one axis. An axis-aligned ray
/// at coordinate `v` can only cross edges listed in the strip holding `v`.
struct StripIndex {
    vertical: bool,
    min: f64,
    width: f64,
    strips: Vec<Vec<usize>>,
}

impl StripIndex {
    /// `vertical` strips index x extents and serve rays running along y.
    fn new(arr: &Arrangement, vertical: bool) -> Self {
        let coord = |p: &Point2| if vertical { p.x } else { p.y };
        let count = ((arr.edges.len() as f64).sqrt().ceil() as usize).clamp(1, 1024);
        let (min, max) = arr
            .vertices
            .iter()
            .map(coord)
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)));
        let mut index = Self {
            vertical,
            min: if min.is_finite() { min } else { 0.0 },
            width: ((max - min) / count as f64).max(f64::MIN_POSITIVE),
            strips: vec![Vec::new(); count],
        };
        for (k, edge) in arr.edges.iter().enumerate() {
            let a = coord(&arr.vertices[edge.from]);
            let b = coord(&arr.vertices[edge.to]);
            let (lo, hi) = (index.strip_of(a.min(b)), index.strip_of(a.max(b)));
            for strip in &mut index.strips[lo..=hi] {
                strip.push(k);
            }
        }
        index
    }

    fn strip_of(&self, v: f64) -> usize {
        let strip = ((v - self.min) / self.width).floor().max(0.0) as usize;
        strip.min(self.strips.len() - 1)
    }

    fn candidates(&self, origin: DVec2) -> &[usize] {
        let v = if self.vertical { origin.x } else { origin.y };
        &self.strips[self.strip_of(v)]
    }
}

/// Winding number just beside `origin` in direction `dir`, counted by casting
/// the open ray origin + t*dir (t > 0) against `candidates`, except `skip`.
/// Vertices on the ray's line are assigned to its right side, so a ray
/// through a vertex is counted once.
fn ray_winding(arr: &Arrangement, candidates: &[usize], origin: DVec2, dir: DVec2, skip: usize) -> i32 {
    let mut winding = 0;
    for &k in candidates {
        if k == skip {
            continue;
        }
        let edge = &arr.edges[k];
        let a = arr.vertices[edge.from].to_vec();
        let b = arr.vertices[edge.to].to_vec();
        let sa = dir.perp_dot(a - origin);
        let sb = dir.perp_dot(b - origin);
        if (sa > 0.0) == (sb > 0.0) {
            continue;
        }
        let hit = a + (b - a) * (sa / (sa - sb));
        if (hit - origin).dot(dir) <= 0.0 {
            continue;
        }
        // from->to passing right-to-left of the ray winds counter-clockwise around the origin.
        if sb > 0.0 {
            winding += edge.winding;
        } else {
            winding -= edge.winding;
        }
    }
    winding
}

/// Keeps the edges with coverage (winding > 0) on exactly one side. Each edge
/// casts an axis-aligned ray from its midpoint into its left side, along
/// whichever axis is closest to the left normal.
pub fn boundary_edges(arr: &Arrangement) -> Vec<BoundaryEdge> {
    let columns = StripIndex::new(arr, true);
    let rows = StripIndex::new(arr, false);

    let mut boundary = Vec::new();
    for (k, edge) in arr.edges.iter().enumerate() {
        let u = arr.vertices[edge.from].to_vec();
        let v = arr.vertices[edge.to].to_vec();
        let mid = (u + v) * 0.5;
        let normal = (v - u).perp();
        let (dir, index) = if normal.x.abs() >= normal.y.abs() {
            (DVec2::new(normal.x.signum(), 0.0), &rows)
        } else {
            (DVec2::new(0.0, normal.y.signum()), &columns)
        };

        let left = ray_winding(arr, index.candidates(mid), mid, dir, k);
        let right = left - edge.winding;
        match (left > 0, right > 0) {
            (true, false) => boundary.push(BoundaryEdge {
                from: edge.from,
                to: edge.to,
            }),
            (false, true) => boundary.push(BoundaryEdge {
                from: edge.to,
                to: edge.from,
            }),
            _ => {}
        }
    }
    log::debug!(
        "classification kept {} of {} arrangement edges",
        boundary.len(),
        arr.edges.len()
    );
    boundary
}
