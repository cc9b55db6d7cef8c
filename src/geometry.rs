// src/geometry.rs

use std::cmp::Ordering;

use glam::{DAffine2, DVec2};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct Point2 {
    pub x: f64,
    pub y: f64,
}

impl Point2 {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn to_vec(self) -> DVec2 {
        DVec2::new(self.x, self.y)
    }

    pub fn distance(&self, other: &Point2) -> f64 {
        self.to_vec().distance(other.to_vec())
    }

    pub fn midpoint(&self, other: &Point2) -> Point2 {
        Point2::new((self.x + other.x) * 0.5, (self.y + other.y) * 0.5)
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Lexicographic order on (x, y), used wherever output must be deterministic.
    pub fn lex_cmp(&self, other: &Point2) -> Ordering {
        self.x.total_cmp(&other.x).then(self.y.total_cmp(&other.y))
    }
}

impl From<DVec2> for Point2 {
    fn from(v: DVec2) -> Self {
        Point2::new(v.x, v.y)
    }
}

impl From<[f64; 2]> for Point2 {
    fn from(xy: [f64; 2]) -> Self {
        Point2::new(xy[0], xy[1])
    }
}

impl From<Point2> for [f64; 2] {
    fn from(p: Point2) -> Self {
        [p.x, p.y]
    }
}

/// Twice the signed area of the triangle (a, b, c); positive when c lies left of a->b.
pub fn orient(a: &Point2, b: &Point2, c: &Point2) -> f64 {
    (b.to_vec() - a.to_vec()).perp_dot(c.to_vec() - a.to_vec())
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Bounds {
    pub fn of_points<'a, I>(points: I) -> Option<Bounds>
    where
        I: IntoIterator<Item = &'a Point2>,
    {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let mut bounds = Bounds {
            min_x: first.x,
            min_y: first.y,
            max_x: first.x,
            max_y: first.y,
        };
        for p in iter {
            bounds.include(p);
        }
        Some(bounds)
    }

    pub fn include(&mut self, p: &Point2) {
        self.min_x = self.min_x.min(p.x);
        self.min_y = self.min_y.min(p.y);
        self.max_x = self.max_x.max(p.x);
        self.max_y = self.max_y.max(p.y);
    }

    pub fn union(&self, other: &Bounds) -> Bounds {
        Bounds {
            min_x: self.min_x.min(other.min_x),
            min_y: self.min_y.min(other.min_y),
            max_x: self.max_x.max(other.max_x),
            max_y: self.max_y.max(other.max_y),
        }
    }

    pub fn expanded(&self, margin: f64) -> Bounds {
        Bounds {
            min_x: self.min_x - margin,
            min_y: self.min_y - margin,
            max_x: self.max_x + margin,
            max_y: self.max_y + margin,
        }
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    pub fn center(&self) -> Point2 {
        Point2::new(
            (self.min_x + self.max_x) * 0.5,
            (self.min_y + self.max_y) * 0.5,
        )
    }

    /// Largest absolute coordinate touched by these bounds.
    pub fn magnitude(&self) -> f64 {
        self.min_x
            .abs()
            .max(self.min_y.abs())
            .max(self.max_x.abs())
            .max(self.max_y.abs())
    }

    pub fn to_polygon(&self) -> Polygon {
        Polygon::rectangle(self.min_x, self.min_y, self.width(), self.height())
    }
}

/// A closed ring stored without the repeated closing vertex.
#[derive(Clone, Debug, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "Vec<Point2>", into = "Vec<Point2>")]
pub struct Ring {
    points: Vec<Point2>,
}

impl From<Vec<Point2>> for Ring {
    fn from(points: Vec<Point2>) -> Self {
        Ring::from_vec(points)
    }
}

impl From<Ring> for Vec<Point2> {
    fn from(ring: Ring) -> Self {
        ring.points
    }
}

impl Ring {
    pub fn from_points(points: &[Point2]) -> Self {
        Self::from_vec(points.to_vec())
    }

    /// Accepts both the open form and the closed form (last point equal to the first).
    pub fn from_vec(mut points: Vec<Point2>) -> Self {
        if points.len() > 1 && points.first() == points.last() {
            points.pop();
        }
        Self { points }
    }

    pub fn vertices(&self) -> &[Point2] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Directed edges (a, b) including the closing edge.
    pub fn edges(&self) -> impl Iterator<Item = (Point2, Point2)> + '_ {
        let n = self.points.len();
        (0..n).map(move |i| (self.points[i], self.points[(i + 1) % n]))
    }

    pub fn signed_area(&self) -> f64 {
        if self.points.len() < 3 {
            return 0.0;
        }
        let mut area = 0.0;
        for (a, b) in self.edges() {
            area += a.x * b.y;
            area -= b.x * a.y;
        }
        area / 2.0
    }

    pub fn area(&self) -> f64 {
        self.signed_area().abs()
    }

    pub fn is_ccw(&self) -> bool {
        self.signed_area() > 0.0
    }

    pub fn reversed(&self) -> Ring {
        let mut points = self.points.clone();
        points.reverse();
        Ring { points }
    }

    pub fn oriented(&self, ccw: bool) -> Ring {
        if self.is_ccw() == ccw {
            self.clone()
        } else {
            self.reversed()
        }
    }

    /// Rotates the vertex sequence so it starts at the lexicographically smallest vertex.
    pub fn rotated_to_min_vertex(&self) -> Ring {
        let start = self
            .points
            .iter()
            .enumerate()
            .min_by(|(_, a), (_, b)| a.lex_cmp(b))
            .map(|(i, _)| i)
            .unwrap_or(0);
        let mut points = Vec::with_capacity(self.points.len());
        points.extend_from_slice(&self.points[start..]);
        points.extend_from_slice(&self.points[..start]);
        Ring { points }
    }

    pub fn bounds(&self) -> Option<Bounds> {
        Bounds::of_points(&self.points)
    }

    /// Winding number of the ring around `point`. Undefined when the point is on the ring.
    pub fn winding_number(&self, point: &Point2) -> i32 {
        let mut wn = 0;
        for (p1, p2) in self.edges() {
            if p1.y <= point.y {
                if p2.y > point.y && orient(&p1, &p2, point) > 0.0 {
                    wn += 1;
                }
            } else if p2.y <= point.y && orient(&p1, &p2, point) < 0.0 {
                wn -= 1;
            }
        }
        wn
    }

    pub fn contains_point(&self, point: &Point2) -> bool {
        self.winding_number(point) != 0
    }

    /// Area and first moments of the ring taken with counter-clockwise orientation.
    fn moments(&self) -> (f64, f64, f64) {
        let sign = if self.is_ccw() { 1.0 } else { -1.0 };
        let (mut a, mut mx, mut my) = (0.0, 0.0, 0.0);
        for (p, q) in self.edges() {
            let cross = p.x * q.y - q.x * p.y;
            a += cross;
            mx += (p.x + q.x) * cross;
            my += (p.y + q.y) * cross;
        }
        (sign * a / 2.0, sign * mx / 6.0, sign * my / 6.0)
    }

    pub fn transformed(&self, transform: &DAffine2) -> Ring {
        Ring {
            points: self
                .points
                .iter()
                .map(|p| Point2::from(transform.transform_point2(p.to_vec())))
                .collect(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct Polygon {
    exterior: Ring,
    #[serde(default)]
    interiors: Vec<Ring>,
}

impl Polygon {
    pub fn new(exterior: Ring, interiors: Vec<Ring>) -> Self {
        Self { exterior, interiors }
    }

    pub fn from_exterior(exterior: Ring) -> Self {
        Self::new(exterior, Vec::new())
    }

    /// Axis-aligned rectangle with corners (x, y), (x+w, y), (x+w, y+h), (x, y+h).
    pub fn rectangle(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self::from_exterior(Ring::from_points(&[
            Point2::new(x, y),
            Point2::new(x + width, y),
            Point2::new(x + width, y + height),
            Point2::new(x, y + height),
        ]))
    }

    pub fn exterior(&self) -> &Ring {
        &self.exterior
    }

    pub fn interiors(&self) -> &[Ring] {
        &self.interiors
    }

    pub fn rings(&self) -> impl Iterator<Item = &Ring> + '_ {
        std::iter::once(&self.exterior).chain(self.interiors.iter())
    }

    pub fn area(&self) -> f64 {
        self.exterior.area() - self.interiors.iter().map(Ring::area).sum::<f64>()
    }

    pub fn bounds(&self) -> Option<Bounds> {
        Bounds::of_points(self.rings().flat_map(|r| r.vertices()))
    }

    /// Inside the exterior ring and outside every hole.
    pub fn contains_point(&self, point: &Point2) -> bool {
        self.exterior.contains_point(point)
            && !self.interiors.iter().any(|hole| hole.contains_point(point))
    }

    pub fn centroid(&self) -> Option<Point2> {
        let (mut a, mut mx, mut my) = self.exterior.moments();
        for hole in &self.interiors {
            let (ha, hx, hy) = hole.moments();
            a -= ha;
            mx -= hx;
            my -= hy;
        }
        if a.abs() <= f64::EPSILON {
            return None;
        }
        Some(Point2::new(mx / a, my / a))
    }

    /// Counter-clockwise rotation by `angle_deg` degrees about the polygon's centroid.
    pub fn rotated(&self, angle_deg: f64) -> Polygon {
        let Some(center) = self.centroid() else {
            return self.clone();
        };
        let c = center.to_vec();
        let transform = DAffine2::from_translation(c)
            * DAffine2::from_angle(angle_deg.to_radians())
            * DAffine2::from_translation(-c);
        Polygon {
            exterior: self.exterior.transformed(&transform),
            interiors: self
                .interiors
                .iter()
                .map(|r| r.transformed(&transform))
                .collect(),
        }
    }
}

pub fn collection_bounds(polygons: &[Polygon]) -> Option<Bounds> {
    polygons
        .iter()
        .filter_map(Polygon::bounds)
        .reduce(|acc, b| acc.union(&b))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_square() -> Ring {
        Ring::from_points(&[
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(1.0, 1.0),
            Point2::new(0.0, 1.0),
        ])
    }

    #[test]
    fn closed_form_drops_repeated_vertex() {
        let ring = Ring::from_vec(vec![
            Point2::new(0.0, 0.0),
            Point2::new(2.0, 0.0),
            Point2::new(2.0, 2.0),
            Point2::new(0.0, 0.0),
        ]);
        assert_eq!(ring.len(), 3);
        assert_eq!(ring.area(), 2.0);
    }

    #[test]
    fn orientation_follows_vertex_order() {
        let square = unit_square();
        assert!(square.is_ccw());
        assert_eq!(square.signed_area(), 1.0);
        assert!(!square.reversed().is_ccw());
        assert!(square.reversed().oriented(true).is_ccw());
    }

    #[test]
    fn winding_number_inside_and_outside() {
        let square = unit_square();
        assert_eq!(square.winding_number(&Point2::new(0.5, 0.5)), 1);
        assert_eq!(square.reversed().winding_number(&Point2::new(0.5, 0.5)), -1);
        assert!(!square.contains_point(&Point2::new(1.5, 0.5)));
    }

    #[test]
    fn polygon_area_subtracts_holes() {
        let hole = Ring::from_points(&[
            Point2::new(1.0, 1.0),
            Point2::new(1.0, 2.0),
            Point2::new(2.0, 2.0),
            Point2::new(2.0, 1.0),
        ]);
        let outer = Polygon::rectangle(0.0, 0.0, 3.0, 3.0);
        let donut = Polygon::new(outer.exterior().clone(), vec![hole]);
        assert_eq!(donut.area(), 8.0);
        assert!(!donut.contains_point(&Point2::new(1.5, 1.5)));
        assert!(donut.contains_point(&Point2::new(0.5, 1.5)));
    }

    #[test]
    fn rotation_about_centroid_keeps_area_and_center() {
        let rect = Polygon::rectangle(2.0, 4.0, 6.0, 2.0);
        let rotated = rect.rotated(90.0);
        assert!((rotated.area() - 12.0).abs() < 1e-9);
        let c = rotated.centroid().unwrap();
        assert!((c.x - 5.0).abs() < 1e-9 && (c.y - 5.0).abs() < 1e-9);
        let b = rotated.bounds().unwrap();
        assert!((b.width() - 2.0).abs() < 1e-9);
        assert!((b.height() - 6.0).abs() < 1e-9);
    }

    #[test]
    fn rotated_to_min_vertex_starts_lexicographically() {
        let ring = Ring::from_points(&[
            Point2::new(1.0, 1.0),
            Point2::new(0.0, 1.0),
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
        ]);
        assert_eq!(ring.rotated_to_min_vertex().vertices()[0], Point2::new(0.0, 0.0));
    }

    #[test]
    fn collection_bounds_spans_all_polygons() {
        let shapes = vec![
            Polygon::rectangle(0.0, 0.0, 1.0, 1.0),
            Polygon::rectangle(5.0, -2.0, 1.0, 1.0),
        ];
        let b = collection_bounds(&shapes).unwrap();
        assert_eq!((b.min_x, b.min_y, b.max_x, b.max_y), (0.0, -2.0, 6.0, 1.0));
        assert!(collection_bounds(&[]).is_none());
    }
}
