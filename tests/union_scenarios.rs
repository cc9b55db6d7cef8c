// tests/union_scenarios.rs

use contour_union::covering::covering_rectangle;
use contour_union::encoding;
use contour_union::generator::RectangleGenerator;
use contour_union::geometry::{Point2, Polygon, Ring};
use contour_union::union_lib::PolygonUnion;
use contour_union::GeometryError;

fn union(shapes: &[Polygon]) -> Vec<Polygon> {
    PolygonUnion::new().union(shapes).unwrap().into_polygons()
}

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[test]
fn overlapping_squares_merge_into_one_polygon() {
    let result = PolygonUnion::new()
        .union(&[
            Polygon::rectangle(0.0, 0.0, 10.0, 10.0),
            Polygon::rectangle(5.0, 5.0, 10.0, 10.0),
        ])
        .unwrap();

    assert_eq!(result.len(), 1);
    assert_eq!(result.hole_count(), 0);
    assert!(approx(result.area(), 175.0));
    assert_eq!(
        result.polygons()[0].exterior().vertices(),
        &[
            Point2::new(0.0, 0.0),
            Point2::new(10.0, 0.0),
            Point2::new(10.0, 5.0),
            Point2::new(15.0, 5.0),
            Point2::new(15.0, 15.0),
            Point2::new(5.0, 15.0),
            Point2::new(5.0, 10.0),
            Point2::new(0.0, 10.0),
        ]
    );
}

#[test]
fn square_frame_encloses_one_hole() {
    let frame = [
        Polygon::rectangle(0.0, 0.0, 30.0, 10.0),
        Polygon::rectangle(0.0, 20.0, 30.0, 10.0),
        Polygon::rectangle(0.0, 10.0, 10.0, 10.0),
        Polygon::rectangle(20.0, 10.0, 10.0, 10.0),
    ];
    let result = union(&frame);

    assert_eq!(result.len(), 1);
    let polygon = &result[0];
    assert_eq!(polygon.exterior().len(), 4);
    assert!(approx(polygon.exterior().area(), 900.0));
    assert_eq!(polygon.interiors().len(), 1);

    let hole = &polygon.interiors()[0];
    assert!(!hole.is_ccw());
    assert!(approx(hole.area(), 100.0));
    assert_eq!(hole.vertices()[0], Point2::new(10.0, 10.0));
    assert!(!polygon.contains_point(&Point2::new(15.0, 15.0)));
    assert!(polygon.contains_point(&Point2::new(5.0, 15.0)));
}

#[test]
fn covering_rectangle_swallows_everything() {
    let mut shapes = RectangleGenerator::predefined();
    let cover = covering_rectangle(&shapes, 5.0).unwrap();
    shapes.push(cover.clone());

    assert_eq!(union(&shapes), vec![cover]);
}

#[test]
fn single_rectangle_is_returned_unchanged() {
    let rect = Polygon::rectangle(2.0, 3.0, 4.0, 5.0);
    assert_eq!(union(&[rect.clone()]), vec![rect]);
}

#[test]
fn clockwise_input_comes_back_counter_clockwise() {
    let rect = Polygon::rectangle(2.0, 3.0, 4.0, 5.0);
    let clockwise = Polygon::from_exterior(rect.exterior().reversed());
    assert_eq!(union(&[clockwise]), vec![rect]);
}

#[test]
fn disjoint_rectangles_stay_separate() {
    let a = Polygon::rectangle(0.0, 0.0, 4.0, 4.0);
    let b = Polygon::rectangle(10.0, 1.0, 3.0, 6.0);
    assert_eq!(union(&[b.clone(), a.clone()]), vec![a, b]);
}

#[test]
fn shared_edge_merges_without_seam_vertices() {
    let result = union(&[
        Polygon::rectangle(0.0, 0.0, 10.0, 10.0),
        Polygon::rectangle(10.0, 0.0, 10.0, 10.0),
    ]);
    assert_eq!(result, vec![Polygon::rectangle(0.0, 0.0, 20.0, 10.0)]);
}

#[test]
fn corner_contact_keeps_two_polygons() {
    let result = union(&[
        Polygon::rectangle(0.0, 0.0, 10.0, 10.0),
        Polygon::rectangle(10.0, 10.0, 10.0, 10.0),
    ]);
    assert_eq!(result.len(), 2);
    assert!(result.iter().all(|p| approx(p.area(), 100.0) && p.interiors().is_empty()));
}

#[test]
fn identical_rectangles_collapse() {
    let rect = Polygon::rectangle(1.0, 1.0, 5.0, 5.0);
    assert_eq!(union(&[rect.clone(), rect.clone(), rect.clone()]), vec![rect]);
}

#[test]
fn empty_collection_gives_empty_result() {
    let result = PolygonUnion::new().union(&[]).unwrap();
    assert!(result.is_empty());
    assert_eq!(result.area(), 0.0);
}

#[test]
fn bowtie_is_rejected_with_its_index() {
    let bowtie = Polygon::from_exterior(Ring::from_points(&[
        Point2::new(0.0, 0.0),
        Point2::new(4.0, 4.0),
        Point2::new(4.0, 0.0),
        Point2::new(0.0, 4.0),
    ]));
    let err = PolygonUnion::new()
        .union(&[Polygon::rectangle(0.0, 0.0, 1.0, 1.0), bowtie])
        .unwrap_err();
    assert!(err.is_invalid_shape());
    assert!(matches!(err, GeometryError::InvalidShape { index: 1, .. }));
}

#[test]
fn non_finite_coordinates_are_rejected() {
    let bad = Polygon::from_exterior(Ring::from_points(&[
        Point2::new(0.0, 0.0),
        Point2::new(f64::NAN, 0.0),
        Point2::new(1.0, 1.0),
    ]));
    let err = PolygonUnion::new().union(&[bad]).unwrap_err();
    assert!(matches!(err, GeometryError::InvalidShape { index: 0, .. }));
}

#[test]
fn misplaced_holes_are_rejected_instead_of_erasing_coverage() {
    let outer = Polygon::rectangle(0.0, 0.0, 10.0, 10.0).exterior().clone();
    let square = |x: f64, y: f64, size: f64| Polygon::rectangle(x, y, size, size).exterior().clone();

    let overlapping = Polygon::new(outer.clone(), vec![square(2.0, 2.0, 4.0), square(4.0, 4.0, 4.0)]);
    let err = PolygonUnion::new()
        .union(&[Polygon::rectangle(4.5, 4.5, 1.0, 1.0), overlapping])
        .unwrap_err();
    assert!(matches!(err, GeometryError::InvalidShape { index: 1, .. }));

    let outside = Polygon::new(outer, vec![square(20.0, 0.0, 5.0)]);
    let err = PolygonUnion::new()
        .union(&[outside, Polygon::rectangle(21.0, 1.0, 2.0, 2.0)])
        .unwrap_err();
    assert!(matches!(err, GeometryError::InvalidShape { index: 0, .. }));
}

#[test]
fn covering_rectangle_needs_shapes() {
    assert!(matches!(covering_rectangle(&[], 5.0), Err(GeometryError::EmptyInput)));
}

#[test]
fn union_of_a_result_is_the_same_result() {
    let frame = [
        Polygon::rectangle(0.0, 0.0, 30.0, 10.0),
        Polygon::rectangle(0.0, 20.0, 30.0, 10.0),
        Polygon::rectangle(0.0, 10.0, 10.0, 10.0),
        Polygon::rectangle(20.0, 10.0, 10.0, 10.0),
        Polygon::rectangle(40.0, 0.0, 5.0, 5.0),
    ];
    let first = union(&frame);
    assert_eq!(union(&first), first);
}

#[test]
fn result_encodes_as_nested_lists() {
    let result = PolygonUnion::new()
        .union(&[Polygon::rectangle(0.0, 0.0, 2.0, 2.0)])
        .unwrap();
    let json = serde_json::to_string(&result).unwrap();
    assert_eq!(
        json,
        r#"[{"exterior":[[0.0,0.0],[2.0,0.0],[2.0,2.0],[0.0,2.0]],"interiors":[]}]"#
    );
    assert_eq!(encoding::from_json(&json).unwrap(), result.into_polygons());
}
