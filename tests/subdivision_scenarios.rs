//! End-to-end subdivision scenarios: construction fixtures, nesting,
//! overlay, and round trips.

use tessella::subdivision::{LocatorStrategy, UNBOUNDED_FACE};
use tessella::{point, Point, Subdivision};

fn init_logging() {
    use std::sync::Once;
    static LOG_SETUP: Once = Once::new();
    LOG_SETUP.call_once(|| {
        pretty_env_logger::init();
    });
}

const SQUARE: [Point; 4] = [
    Point { x: -1.0, y: -2.0 },
    Point { x: -1.0, y: 2.0 },
    Point { x: 1.0, y: 2.0 },
    Point { x: 1.0, y: -2.0 },
];

#[test]
fn square_subdivision_counts_and_area() {
    init_logging();
    let sub = Subdivision::from_polygons(&[&SQUARE[..]], 0.).unwrap();
    assert_eq!(sub.edge_count(), 8);
    assert_eq!(sub.face_count(), 2);
    assert_eq!(sub.vertex_count(), 4);

    let inner = sub
        .faces()
        .find(|(k, _)| *k != UNBOUNDED_FACE)
        .map(|(k, _)| k)
        .unwrap();
    assert_eq!(sub.face_area(inner), Some(8.0));
    // the outer face has no boundary of its own, only the square's hull
    let unbounded = sub.get_face(UNBOUNDED_FACE).unwrap();
    assert!(unbounded.outer_edge().is_none());
    assert_eq!(unbounded.inner_edges().len(), 1);
    sub.validate().unwrap();
}

#[test]
fn triforce_nested_triangles() {
    let outer = [point!(-5.0, -4.0), point!(0.0, 6.0), point!(5.0, -4.0)];
    let inner = [point!(0.0, 0.0), point!(-1.0, 2.0), point!(1.0, 2.0)];
    let sub = Subdivision::from_polygons(&[&outer[..], &inner[..]], 0.).unwrap();

    assert_eq!(sub.face_count(), 3);
    assert_eq!(sub.edge_count(), 12);
    assert_eq!(sub.vertex_count(), 6);

    let mut areas: Vec<f64> = sub.faces().filter_map(|(k, _)| sub.face_area(k)).collect();
    areas.sort_by(|a, b| a.partial_cmp(b).unwrap());
    assert_eq!(areas, vec![2.0, 50.0]);

    // the unbounded face holds exactly the outer triangle's hull boundary
    let unbounded = sub.get_face(UNBOUNDED_FACE).unwrap();
    assert_eq!(unbounded.inner_edges().len(), 1);
    let hull_cycle = unbounded.inner_edges()[0];
    assert!(sub.cycle_area(hull_cycle) > 0.);
    assert_eq!(sub.cycle(hull_cycle).len(), 3);

    // the big triangle's face carries the small triangle's hull as a hole
    let big = sub
        .faces()
        .find(|(k, _)| sub.face_area(*k) == Some(50.0))
        .map(|(k, _)| k)
        .unwrap();
    assert_eq!(sub.get_face(big).unwrap().inner_edges().len(), 1);
    sub.validate().unwrap();
}

#[test]
fn square_star_overlay_face_mapping() {
    init_logging();
    // a diamond inscribed in the square, its tips on the edge midpoints
    let star = [
        point!(-1.0, 0.0),
        point!(0.0, 2.0),
        point!(1.0, 0.0),
        point!(0.0, -2.0),
    ];
    let a = Subdivision::from_polygons(&[&SQUARE[..]], 0.).unwrap();
    let b = Subdivision::from_polygons(&[&star[..]], 0.).unwrap();
    let square_face = a
        .faces()
        .find(|(k, _)| *k != UNBOUNDED_FACE)
        .map(|(k, _)| k)
        .unwrap();
    let star_face = b
        .faces()
        .find(|(k, _)| *k != UNBOUNDED_FACE)
        .map(|(k, _)| k)
        .unwrap();

    let overlay = Subdivision::intersection(&a, &b).unwrap();
    let sub = &overlay.subdivision;
    sub.validate().unwrap();

    // the diamond tips split each square side: eight boundary pieces plus
    // four diamond edges, cutting the square into the diamond and four
    // corner triangles
    assert_eq!(sub.vertex_count(), 8);
    assert_eq!(sub.edge_count(), 24);
    assert_eq!(sub.face_count(), 6);

    let bounded: Vec<_> = sub
        .faces()
        .filter(|(k, _)| *k != UNBOUNDED_FACE)
        .map(|(k, _)| k)
        .collect();
    assert_eq!(bounded.len(), 5);

    // every bounded result face lies inside the square, none outside
    for &key in &bounded {
        assert_eq!(overlay.face_keys1[key.0 as usize], square_face);
    }
    assert_eq!(overlay.face_keys1[0], UNBOUNDED_FACE);
    assert_eq!(overlay.face_keys2[0], UNBOUNDED_FACE);

    // exactly one result face (the diamond) lies inside the star
    let in_star = bounded
        .iter()
        .filter(|k| overlay.face_keys2[k.0 as usize] == star_face)
        .count();
    assert_eq!(in_star, 1);

    // areas: four corner triangles of area 1 and the diamond of area 4
    let mut areas: Vec<f64> = bounded
        .iter()
        .filter_map(|&k| sub.face_area(k))
        .collect();
    areas.sort_by(|x, y| x.partial_cmp(y).unwrap());
    assert_eq!(areas, vec![1.0, 1.0, 1.0, 1.0, 4.0]);
}

#[test]
fn lines_round_trip_preserves_structure() {
    // a diamond nested strictly inside the square
    let star = [
        point!(-0.5, 0.0),
        point!(0.0, 1.0),
        point!(0.5, 0.0),
        point!(0.0, -1.0),
    ];
    let sub = Subdivision::from_polygons(&[&SQUARE[..], &star[..]], 0.).unwrap();
    let rebuilt = Subdivision::from_lines(&sub.to_lines(), 0.).unwrap();
    assert!(sub.structure_equals(&rebuilt));
    assert_eq!(sub, rebuilt);

    use std::collections::hash_map::DefaultHasher;
    use std::hash::{Hash, Hasher};
    let mut h1 = DefaultHasher::new();
    let mut h2 = DefaultHasher::new();
    sub.hash(&mut h1);
    rebuilt.hash(&mut h2);
    assert_eq!(h1.finish(), h2.finish());
}

#[test]
fn signed_area_parity_over_all_cycles() {
    // the sum of all cycle areas is zero: every half-edge pair contributes
    // opposite terms
    let star = [
        point!(-0.5, 0.0),
        point!(0.0, 1.0),
        point!(0.5, 0.0),
        point!(0.0, -1.0),
    ];
    let sub = Subdivision::from_polygons(&[&SQUARE[..], &star[..]], 0.).unwrap();
    let mut total = 0.;
    for (_, face) in sub.faces() {
        for start in face.outer_edge().iter().chain(face.inner_edges()) {
            total += sub.cycle_area(*start);
        }
    }
    assert!(total.abs() < 1e-9, "cycle areas sum to {total}");
}

#[test]
fn point_location_strategies_agree_after_edits() {
    init_logging();
    let mut sub = Subdivision::from_polygons(&[&SQUARE[..]], 0.).unwrap();
    sub.add_edge(point!(-1.0, -2.0), point!(1.0, 2.0)).unwrap();
    let diagonal_key = sub.find_edge(point!(-1.0, -2.0), point!(1.0, 2.0)).unwrap();
    sub.split_edge(diagonal_key).unwrap();
    sub.validate().unwrap();

    for strategy in [LocatorStrategy::Ordered, LocatorStrategy::Randomized(99)] {
        let locator = sub.locator(strategy);
        let mut q = 0.37_f64;
        for _ in 0..100 {
            q = (q * 47.9).fract();
            let p = point!(q * 4.0 - 2.0, ((q * 17.3).fract()) * 6.0 - 3.0);
            assert_eq!(locator.locate(p), sub.find_face(p), "at {p:?}");
        }
    }
}
