// src/union_lib/arrangement.rs

use std::collections::{BTreeMap, HashMap};

use crate::geometry::{orient, Point2, Polygon};
use crate::union_lib::tolerance::Tolerance;

/// Undirected arrangement edge stored with `from < to`. `winding` is the net
/// number of input edges running from -> to (opposite runs count -1); the
/// winding number left of the edge exceeds the one on its right by this amount.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ArrangementEdge {
    pub from: usize,
    pub to: usize,
    pub winding: i32,
}

/// Planar graph whose edges only meet at shared vertices.
#[derive(Debug, Default)]
pub struct Arrangement {
    pub vertices: Vec<Point2>,
    pub edges: Vec<ArrangementEdge>,
}

/// Parameter of `p` along a->b when `p` lies on the segment's interior, away
/// from both endpoints.
pub(crate) fn interior_param(p: &Point2, a: &Point2, b: &Point2, tol: &Tolerance) -> Option<f64> {
    let ab = b.to_vec() - a.to_vec();
    let len2 = ab.length_squared();
    if len2 <= tol.eps * tol.eps {
        return None;
    }
    let t = (p.to_vec() - a.to_vec()).dot(ab) / len2;
    if t <= 0.0 || t >= 1.0 {
        return None;
    }
    let closest = a.to_vec() + ab * t;
    if closest.distance(p.to_vec()) > tol.eps || tol.same_point(p, a) || tol.same_point(p, b) {
        return None;
    }
    Some(t)
}

fn ranges_overlap(a: f64, b: f64, c: f64, d: f64, eps: f64) -> bool {
    a.min(b) <= c.max(d) + eps && c.min(d) <= a.max(b) + eps
}

/// Distance from `p` to the closed segment a-b.
pub(crate) fn segment_distance(p: &Point2, a: &Point2, b: &Point2) -> f64 {
    let ab = b.to_vec() - a.to_vec();
    let len2 = ab.length_squared();
    let t = if len2 > 0.0 {
        ((p.to_vec() - a.to_vec()).dot(ab) / len2).clamp(0.0, 1.0)
    } else {
        0.0
    };
    (a.to_vec() + ab * t).distance(p.to_vec())
}

/// Proper crossing of a->b and c->d: each segment's endpoints lie strictly on
/// opposite sides of the other's line. Returns the point with its parameters
/// along both segments. Nearly parallel pairs whose two parametric points do
/// not agree within the tolerance are rejected.
pub(crate) fn crossing(
    a: &Point2,
    b: &Point2,
    c: &Point2,
    d: &Point2,
    tol: &Tolerance,
) -> Option<(Point2, f64, f64)> {
    if !ranges_overlap(a.x, b.x, c.x, d.x, tol.eps) || !ranges_overlap(a.y, b.y, c.y, d.y, tol.eps) {
        return None;
    }
    let oa = orient(c, d, a);
    let ob = orient(c, d, b);
    let oc = orient(a, b, c);
    let od = orient(a, b, d);
    let straddles = |p: f64, q: f64| (p > 0.0 && q < 0.0) || (p < 0.0 && q > 0.0);
    if !straddles(oa, ob) || !straddles(oc, od) {
        return None;
    }
    let t = oa / (oa - ob);
    let u = oc / (oc - od);
    let on_ab = a.to_vec() + (b.to_vec() - a.to_vec()) * t;
    let on_cd = c.to_vec() + (d.to_vec() - c.to_vec()) * u;
    if on_ab.distance(on_cd) > tol.eps {
        return None;
    }
    Some((Point2::from(on_ab), t, u))
}

/// True when the closed segments a-b and c-d share at least one point.
pub(crate) fn segments_touch(
    a: &Point2,
    b: &Point2,
    c: &Point2,
    d: &Point2,
    tol: &Tolerance,
) -> bool {
    if tol.same_point(a, c) || tol.same_point(a, d) || tol.same_point(b, c) || tol.same_point(b, d) {
        return true;
    }
    interior_param(c, a, b, tol).is_some()
        || interior_param(d, a, b, tol).is_some()
        || interior_param(a, c, d, tol).is_some()
        || interior_param(b, c, d, tol).is_some()
        || crossing(a, b, c, d, tol).is_some()
}

/// Merges points closer than the tolerance into one vertex id. Lookups go
/// through a uniform grid so only neighbouring cells are scanned.
struct VertexPool {
    points: Vec<Point2>,
    grid: HashMap<(i64, i64), Vec<usize>>,
    cell: f64,
    tol: Tolerance,
}

impl VertexPool {
    fn new(tol: Tolerance) -> Self {
        Self {
            points: Vec::new(),
            grid: HashMap::new(),
            cell: (tol.eps * 4.0).max(f64::MIN_POSITIVE),
            tol,
        }
    }

    fn cell_of(&self, p: &Point2) -> (i64, i64) {
        ((p.x / self.cell).floor() as i64, (p.y / self.cell).floor() as i64)
    }

    fn insert(&mut self, p: Point2) -> usize {
        let (cx, cy) = self.cell_of(&p);
        for dx in -1..=1 {
            for dy in -1..=1 {
                if let Some(ids) = self.grid.get(&(cx + dx, cy + dy)) {
                    if let Some(&id) = ids.iter().find(|&&id| self.tol.same_point(&self.points[id], &p)) {
                        return id;
                    }
                }
            }
        }
        let id = self.points.len();
        self.points.push(p);
        self.grid.entry((cx, cy)).or_default().push(id);
        id
    }
}

struct InputSegment {
    a: Point2,
    b: Point2,
    splits: Vec<(f64, Point2)>,
}

impl InputSegment {
    fn min_x(&self) -> f64 {
        self.a.x.min(self.b.x)
    }

    fn max_x(&self) -> f64 {
        self.a.x.max(self.b.x)
    }

    fn y_overlaps(&self, other: &InputSegment, eps: f64) -> bool {
        self.a.y.min(self.b.y) <= other.a.y.max(other.b.y) + eps
            && other.a.y.min(other.b.y) <= self.a.y.max(self.b.y) + eps
    }
}

/// Records every point where segment `i` and segment `j` meet: T-junctions,
/// collinear overlaps (through the endpoint checks) and proper crossings.
fn split_pair(segments: &mut [InputSegment], i: usize, j: usize, tol: &Tolerance) {
    let (a, b) = (segments[i].a, segments[i].b);
    let (c, d) = (segments[j].a, segments[j].b);

    for p in [c, d] {
        if let Some(t) = interior_param(&p, &a, &b, tol) {
            segments[i].splits.push((t, p));
        }
    }
    for p in [a, b] {
        if let Some(u) = interior_param(&p, &c, &d, tol) {
            segments[j].splits.push((u, p));
        }
    }

    if let Some((p, t, u)) = crossing(&a, &b, &c, &d, tol) {
        if !tol.same_point(&p, &a) && !tol.same_point(&p, &b) {
            segments[i].splits.push((t, p));
        }
        if !tol.same_point(&p, &c) && !tol.same_point(&p, &d) {
            segments[j].splits.push((u, p));
        }
    }
}

/// Builds the arrangement of every ring edge of `polygons`. Rings are expected
/// in normalised orientation (exteriors counter-clockwise, holes clockwise).
pub fn build(polygons: &[Polygon], tol: &Tolerance) -> Arrangement {
    let mut segments: Vec<InputSegment> = polygons
        .iter()
        .flat_map(|poly| poly.rings())
        .flat_map(|ring| ring.edges())
        .filter(|(a, b)| !tol.same_point(a, b))
        .map(|(a, b)| InputSegment {
            a,
            b,
            splits: Vec::new(),
        })
        .collect();

    // Sort-and-sweep over x extents: only pairs whose x intervals overlap are tested.
    let mut order: Vec<usize> = (0..segments.len()).collect();
    order.sort_by(|&i, &j| segments[i].min_x().total_cmp(&segments[j].min_x()));
    let mut candidate_pairs = 0usize;
    for (k, &i) in order.iter().enumerate() {
        let reach = segments[i].max_x() + tol.eps;
        for &j in &order[k + 1..] {
            if segments[j].min_x() > reach {
                break;
            }
            if segments[i].y_overlaps(&segments[j], tol.eps) {
                candidate_pairs += 1;
                split_pair(&mut segments, i, j, tol);
            }
        }
    }

    let mut pool = VertexPool::new(*tol);
    let mut windings: BTreeMap<(usize, usize), i32> = BTreeMap::new();
    for segment in &mut segments {
        segment.splits.sort_by(|x, y| x.0.total_cmp(&y.0));
        let mut ids = Vec::with_capacity(segment.splits.len() + 2);
        ids.push(pool.insert(segment.a));
        for &(_, p) in &segment.splits {
            ids.push(pool.insert(p));
        }
        ids.push(pool.insert(segment.b));

        for pair in ids.windows(2) {
            let (u, v) = (pair[0], pair[1]);
            if u == v {
                continue;
            }
            if u < v {
                *windings.entry((u, v)).or_insert(0) += 1;
            } else {
                *windings.entry((v, u)).or_insert(0) -= 1;
            }
        }
    }

    let edges: Vec<ArrangementEdge> = windings
        .into_iter()
        .filter(|&(_, winding)| winding != 0)
        .map(|((from, to), winding)| ArrangementEdge { from, to, winding })
        .collect();

    log::debug!(
        "arrangement: {} input segments, {} candidate pairs, {} vertices, {} edges",
        segments.len(),
        candidate_pairs,
        pool.points.len(),
        edges.len()
    );

    Arrangement {
        vertices: pool.points,
        edges,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Ring;

    fn tol() -> Tolerance {
        Tolerance { eps: 1e-9 }
    }

    fn edge_between(arr: &Arrangement, p: Point2, q: Point2) -> Option<ArrangementEdge> {
        let find = |pt: Point2| arr.vertices.iter().position(|v| tol().same_point(v, &pt));
        let (i, j) = (find(p)?, find(q)?);
        let key = (i.min(j), i.max(j));
        arr.edges.iter().copied().find(|e| (e.from, e.to) == key)
    }

    #[test]
    fn crossing_squares_are_split_at_intersections() {
        let shapes = vec![
            Polygon::rectangle(0.0, 0.0, 10.0, 10.0),
            Polygon::rectangle(5.0, 5.0, 10.0, 10.0),
        ];
        let arr = build(&shapes, &tol());
        // 8 corners plus the crossings at (10,5) and (5,10).
        assert_eq!(arr.vertices.len(), 10);
        assert_eq!(arr.edges.len(), 12);
        assert!(edge_between(&arr, Point2::new(10.0, 0.0), Point2::new(10.0, 5.0)).is_some());
        assert!(edge_between(&arr, Point2::new(10.0, 0.0), Point2::new(10.0, 10.0)).is_none());
    }

    #[test]
    fn t_junction_splits_the_long_edge() {
        let shapes = vec![
            Polygon::rectangle(0.0, 0.0, 10.0, 2.0),
            Polygon::rectangle(4.0, 2.0, 2.0, 2.0),
        ];
        let arr = build(&shapes, &tol());
        assert!(edge_between(&arr, Point2::new(0.0, 2.0), Point2::new(4.0, 2.0)).is_some());
        assert!(edge_between(&arr, Point2::new(6.0, 2.0), Point2::new(10.0, 2.0)).is_some());
        // Shared boundary carries opposite directions and cancels out.
        assert!(edge_between(&arr, Point2::new(4.0, 2.0), Point2::new(6.0, 2.0)).is_none());
    }

    #[test]
    fn coincident_edges_accumulate_winding() {
        let square = Polygon::rectangle(0.0, 0.0, 1.0, 1.0);
        let arr = build(&[square.clone(), square], &tol());
        assert_eq!(arr.edges.len(), 4);
        assert!(arr.edges.iter().all(|e| e.winding.abs() == 2));
    }

    #[test]
    fn collinear_overlap_is_subdivided() {
        let a = Polygon::from_exterior(Ring::from_points(&[
            Point2::new(0.0, 0.0),
            Point2::new(10.0, 0.0),
            Point2::new(10.0, 1.0),
            Point2::new(0.0, 1.0),
        ]));
        let b = Polygon::rectangle(5.0, 0.0, 10.0, 1.0);
        let arr = build(&[a, b], &tol());
        let shared = edge_between(&arr, Point2::new(5.0, 0.0), Point2::new(10.0, 0.0)).unwrap();
        assert_eq!(shared.winding.abs(), 2);
    }

    #[test]
    fn touching_primitives() {
        let t = tol();
        let (a, b) = (Point2::new(0.0, 0.0), Point2::new(4.0, 0.0));
        assert!(segments_touch(&a, &b, &Point2::new(2.0, 0.0), &Point2::new(2.0, 3.0), &t));
        assert!(segments_touch(&a, &b, &Point2::new(2.0, -1.0), &Point2::new(2.0, 1.0), &t));
        assert!(!segments_touch(&a, &b, &Point2::new(5.0, -1.0), &Point2::new(5.0, 1.0), &t));
        assert!(interior_param(&Point2::new(4.0, 0.0), &a, &b, &t).is_none());
    }

    #[test]
    fn nearly_collinear_disjoint_segments_do_not_cross() {
        let t = Tolerance { eps: 5e-8 };
        let (a, b) = (Point2::new(21.3, 35.8), Point2::new(22.4808, 37.6973));
        let dir = b.to_vec() - a.to_vec();
        // Continues the same line past a gap, bent by far less than the tolerance.
        let c = Point2::from(b.to_vec() + dir * 0.087 + dir.perp() * 1e-12);
        let d = Point2::from(b.to_vec() + dir * 0.9 - dir.perp() * 1e-12);
        assert!(crossing(&a, &b, &c, &d, &t).is_none());
        assert!(crossing(&c, &d, &a, &b, &t).is_none());
        assert!(!segments_touch(&a, &b, &c, &d, &t));

        // Side by side with overlapping boxes, lines meeting far outside both.
        let (c, d) = (Point2::new(21.5, 35.9601), Point2::new(22.3, 37.3413));
        assert!(crossing(&a, &b, &c, &d, &t).is_none());
        assert!(!segments_touch(&a, &b, &c, &d, &t));
    }

    #[test]
    fn proper_crossing_reports_parameters() {
        let (p, t, u) = crossing(
            &Point2::new(0.0, 0.0),
            &Point2::new(4.0, 4.0),
            &Point2::new(0.0, 4.0),
            &Point2::new(4.0, 0.0),
            &tol(),
        )
        .unwrap();
        assert!(tol().same_point(&p, &Point2::new(2.0, 2.0)));
        assert!((t - 0.5).abs() < 1e-12 && (u - 0.5).abs() < 1e-12);
    }
}
