// tests/random_collections.rs
//
// Property checks on seeded random rotated collections. Coverage is sampled on
// a grid and compared point by point against the inputs.

use contour_union::generator::{GeneratorConfig, RectangleGenerator};
use contour_union::geometry::{collection_bounds, Point2, Polygon};
use contour_union::scenario::{Scenario, ScenarioConfig};
use contour_union::union_lib::{PolygonUnion, UnionResult};
use rand::rngs::StdRng;
use rand::SeedableRng;

const GRID: usize = 160;
const EDGE_CLEARANCE: f64 = 1e-6;

fn random_collection(seed: u64, num_rects: usize) -> Vec<Polygon> {
    let config = GeneratorConfig {
        num_rects,
        ..GeneratorConfig::default()
    };
    let mut rng = StdRng::seed_from_u64(seed);
    RectangleGenerator::generate_random(&config, &mut rng).unwrap()
}

fn segment_distance(p: &Point2, a: &Point2, b: &Point2) -> f64 {
    let (dx, dy) = (b.x - a.x, b.y - a.y);
    let len2 = dx * dx + dy * dy;
    let t = if len2 > 0.0 {
        (((p.x - a.x) * dx + (p.y - a.y) * dy) / len2).clamp(0.0, 1.0)
    } else {
        0.0
    };
    p.distance(&Point2::new(a.x + t * dx, a.y + t * dy))
}

fn near_any_edge(p: &Point2, polygons: &[Polygon]) -> bool {
    polygons
        .iter()
        .flat_map(|poly| poly.rings())
        .flat_map(|ring| ring.edges())
        .any(|(a, b)| segment_distance(p, &a, &b) < EDGE_CLEARANCE)
}

/// Samples a slightly offset grid over the collection bounds, skipping points
/// that sit on an input or output edge.
fn sample_points(shapes: &[Polygon], result: &UnionResult) -> Vec<Point2> {
    let bounds = collection_bounds(shapes).unwrap().expanded(1.0);
    let (step_x, step_y) = (bounds.width() / GRID as f64, bounds.height() / GRID as f64);
    let mut points = Vec::with_capacity(GRID * GRID);
    for i in 0..GRID {
        for j in 0..GRID {
            let p = Point2::new(
                bounds.min_x + (i as f64 + 0.5137) * step_x,
                bounds.min_y + (j as f64 + 0.4721) * step_y,
            );
            if !near_any_edge(&p, shapes) && !near_any_edge(&p, result.polygons()) {
                points.push(p);
            }
        }
    }
    points
}

fn check_coverage(shapes: &[Polygon]) {
    let result = PolygonUnion::new().union(shapes).unwrap();
    let points = sample_points(shapes, &result);
    assert!(points.len() > GRID * GRID / 2);

    for p in &points {
        let covered = shapes.iter().any(|s| s.contains_point(p));
        assert_eq!(result.contains_point(p), covered, "coverage differs at {p:?}");
        let owners = result.polygons().iter().filter(|poly| poly.contains_point(p)).count();
        assert!(owners <= 1, "{owners} output polygons overlap at {p:?}");
    }

    let total: f64 = shapes.iter().map(Polygon::area).sum();
    let largest = shapes.iter().map(Polygon::area).fold(0.0, f64::max);
    assert!(result.area() <= total + 1e-6);
    assert!(result.area() >= largest - 1e-6);

    let bounds = collection_bounds(shapes).unwrap().expanded(1.0);
    let cell = bounds.width() * bounds.height() / (GRID * GRID) as f64;
    let sampled = points.iter().filter(|p| result.contains_point(p)).count() as f64 * cell;
    let tolerance = 0.03 * bounds.width() * bounds.height();
    assert!(
        (sampled - result.area()).abs() < tolerance,
        "sampled area {sampled} vs exact {}",
        result.area()
    );
}

#[test]
fn random_rotated_collections_cover_the_right_points() {
    for seed in [1, 7, 42, 2024] {
        check_coverage(&random_collection(seed, 25));
    }
}

#[test]
fn dense_collections_cover_the_right_points() {
    check_coverage(&random_collection(99, 60));
}

#[test]
fn union_results_union_back_to_themselves() {
    for (num_rects, seeds) in [(25, 0..40u64), (60, 0..15), (150, 0..5)] {
        for seed in seeds {
            let config = ScenarioConfig {
                seed: Some(seed),
                include_covering: seed % 2 == 1,
                generator: GeneratorConfig {
                    num_rects,
                    ..GeneratorConfig::default()
                },
                ..ScenarioConfig::default()
            };
            let first = Scenario::build(&config).unwrap().union().unwrap();
            let second = PolygonUnion::new()
                .union(first.polygons())
                .unwrap_or_else(|e| panic!("n={num_rects} seed={seed}: {e}"));

            assert_eq!(second.len(), first.len(), "n={num_rects} seed={seed}");
            assert_eq!(second.hole_count(), first.hole_count(), "n={num_rects} seed={seed}");
            assert!((second.area() - first.area()).abs() < 1e-6, "n={num_rects} seed={seed}");
        }
    }
}

#[test]
fn output_rings_are_canonical() {
    let result = PolygonUnion::new().union(&random_collection(5, 30)).unwrap();
    for polygon in result.polygons() {
        let exterior = polygon.exterior();
        assert!(exterior.is_ccw());
        assert!(exterior.vertices().iter().all(|v| exterior.vertices()[0].lex_cmp(v).is_le()));
        assert!(polygon.interiors().iter().all(|hole| !hole.is_ccw()));
    }
    let firsts: Vec<Point2> = result.polygons().iter().map(|p| p.exterior().vertices()[0]).collect();
    assert!(firsts.windows(2).all(|w| w[0].lex_cmp(&w[1]).is_le()));
}

#[test]
fn output_exteriors_do_not_reach_into_each_other() {
    let result = PolygonUnion::new().union(&random_collection(11, 40)).unwrap();
    let polygons = result.polygons();
    for (i, a) in polygons.iter().enumerate() {
        for (j, b) in polygons.iter().enumerate() {
            if i == j {
                continue;
            }
            for v in a.exterior().vertices() {
                assert!(
                    !b.contains_point(v) || near_any_edge(v, std::slice::from_ref(b)),
                    "vertex {v:?} of polygon {i} lies inside polygon {j}"
                );
            }
        }
    }
}

#[test]
fn seeded_scenario_with_covering_is_one_rectangle() {
    let config = ScenarioConfig {
        seed: Some(3),
        include_covering: true,
        ..ScenarioConfig::default()
    };
    let scenario = Scenario::build(&config).unwrap();
    let result = scenario.union().unwrap();
    assert_eq!(result.polygons(), std::slice::from_ref(scenario.covering().unwrap()));
}
