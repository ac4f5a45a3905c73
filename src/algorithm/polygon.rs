//! Polygon predicates and constructions: point containment, signed area,
//! centroid, and the convex hull.

use crate::geometry::{Line, Point};
use crate::kernels::{orient2d, Orientation};

/// The position of a point relative to a polygon.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PolygonLocation {
    Inside,
    Outside,
    /// On a polygon edge, away from its endpoints.
    Edge,
    /// Coincides with a polygon vertex.
    Vertex,
}

/// Locates `q` relative to the (not necessarily convex) polygon given as a
/// vertex ring without a closing duplicate.
///
/// The test casts an axis-parallel ray toward +x and counts edge
/// crossings. Vertex and edge incidences take priority over the
/// inside/outside verdict; `epsilon` widens the vertex and edge bands.
///
/// # Examples
///
/// ```
/// use tessella::algorithm::polygon::{point_in_polygon, PolygonLocation};
/// use tessella::point;
///
/// let triangle = [point!(0.0, 0.0), point!(1.0, 1.0), point!(2.0, 0.0)];
/// assert_eq!(point_in_polygon(point!(1.0, 0.5), &triangle, 0.0), PolygonLocation::Inside);
/// assert_eq!(point_in_polygon(point!(1.0, 0.0), &triangle, 0.0), PolygonLocation::Edge);
/// assert_eq!(point_in_polygon(point!(0.0, 0.0), &triangle, 0.0), PolygonLocation::Vertex);
/// assert_eq!(point_in_polygon(point!(1.0, -0.1), &triangle, 0.2), PolygonLocation::Edge);
/// ```
pub fn point_in_polygon(q: Point, polygon: &[Point], epsilon: f64) -> PolygonLocation {
    debug_assert!(epsilon >= 0.);
    if polygon.is_empty() {
        return PolygonLocation::Outside;
    }

    for &v in polygon {
        if v == q || (epsilon > 0. && v.distance(q) <= epsilon) {
            return PolygonLocation::Vertex;
        }
    }

    let mut crossings = 0usize;
    for (i, &a) in polygon.iter().enumerate() {
        let b = polygon[(i + 1) % polygon.len()];
        if Line::new(a, b).locate_with(q, epsilon).is_on_segment() {
            return PolygonLocation::Edge;
        }
        // half-open rule: each edge owns its lower endpoint, so a ray
        // through a vertex is counted exactly once
        if (a.y > q.y) != (b.y > q.y) {
            let x_hit = a.x + (b.x - a.x) * (q.y - a.y) / (b.y - a.y);
            if q.x < x_hit {
                crossings += 1;
            }
        }
    }
    if crossings % 2 == 1 {
        PolygonLocation::Inside
    } else {
        PolygonLocation::Outside
    }
}

/// Signed area of a vertex ring (shoelace formula, half the summed cross
/// products). Under this crate's screen convention a clockwise-on-screen
/// ring yields a negative value.
pub fn polygon_area(polygon: &[Point]) -> f64 {
    if polygon.len() < 3 {
        return 0.;
    }
    let mut sum = 0.;
    for (i, &a) in polygon.iter().enumerate() {
        let b = polygon[(i + 1) % polygon.len()];
        sum += a.cross(b);
    }
    sum / 2.
}

/// Area centroid of a vertex ring. Degenerate rings (zero area) fall back
/// to the vertex average.
pub fn polygon_centroid(polygon: &[Point]) -> Option<Point> {
    if polygon.is_empty() {
        return None;
    }
    let area = polygon_area(polygon);
    if area == 0. {
        let sum = polygon
            .iter()
            .fold(Point::new(0., 0.), |acc, &p| acc + p);
        return Some(sum / polygon.len() as f64);
    }
    let mut cx = 0.;
    let mut cy = 0.;
    for (i, &a) in polygon.iter().enumerate() {
        let b = polygon[(i + 1) % polygon.len()];
        let w = a.cross(b);
        cx += (a.x + b.x) * w;
        cy += (a.y + b.y) * w;
    }
    Some(Point::new(cx / (6. * area), cy / (6. * area)))
}

/// Convex hull of a point set by a monotone-chain sweep.
///
/// Returns the hull vertices in counter-clockwise order (mathematical
/// convention). Collinear points on the hull boundary are discarded, as
/// are duplicates. Sets of two or fewer unique points are returned as
/// themselves.
///
/// # Examples
///
/// ```
/// use tessella::algorithm::polygon::convex_hull;
/// use tessella::point;
///
/// let hull = convex_hull(&[
///     point!(0.0, 0.0),
///     point!(4.0, 0.0),
///     point!(2.0, 1.0), // interior
///     point!(2.0, 0.0), // collinear on the bottom edge
///     point!(2.0, 4.0),
/// ]);
/// assert_eq!(hull, vec![point!(0.0, 0.0), point!(4.0, 0.0), point!(2.0, 4.0)]);
/// ```
pub fn convex_hull(points: &[Point]) -> Vec<Point> {
    let mut sorted: Vec<Point> = points.to_vec();
    sorted.sort_by(|a, b| {
        a.x.partial_cmp(&b.x)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.y.partial_cmp(&b.y).unwrap_or(std::cmp::Ordering::Equal))
    });
    sorted.dedup();
    if sorted.len() <= 2 {
        return sorted;
    }

    // lower hull, then upper hull; strict counter-clockwise turns only
    let mut hull: Vec<Point> = Vec::with_capacity(sorted.len() + 1);
    for &p in sorted.iter() {
        while hull.len() >= 2
            && orient2d(hull[hull.len() - 2], hull[hull.len() - 1], p)
                != Orientation::CounterClockwise
        {
            hull.pop();
        }
        hull.push(p);
    }
    let lower_len = hull.len() + 1;
    for &p in sorted.iter().rev() {
        while hull.len() >= lower_len
            && orient2d(hull[hull.len() - 2], hull[hull.len() - 1], p)
                != Orientation::CounterClockwise
        {
            hull.pop();
        }
        hull.push(p);
    }
    hull.pop(); // the first point is repeated at the end
    hull
}

/// Splits a simple vertex ring into triangles by ear clipping. Returns
/// `None` for rings with fewer than three vertices or when no ear can be
/// found (self-intersecting input).
///
/// The ring may wind either way; triangles are emitted in ring order.
pub fn triangulate(polygon: &[Point]) -> Option<Vec<[Point; 3]>> {
    if polygon.len() < 3 {
        return None;
    }
    let winding = if polygon_area(polygon) >= 0. {
        Orientation::CounterClockwise
    } else {
        Orientation::Clockwise
    };
    let mut ring: Vec<Point> = polygon.to_vec();
    let mut triangles = Vec::with_capacity(ring.len() - 2);
    'clip: while ring.len() > 3 {
        for i in 0..ring.len() {
            let prev = ring[(i + ring.len() - 1) % ring.len()];
            let cur = ring[i];
            let next = ring[(i + 1) % ring.len()];
            if orient2d(prev, cur, next) != winding {
                continue;
            }
            let ear = [prev, cur, next];
            let blocked = ring.iter().any(|&p| {
                p != prev
                    && p != cur
                    && p != next
                    && point_in_polygon(p, &ear, 0.) == PolygonLocation::Inside
            });
            if !blocked {
                triangles.push(ear);
                ring.remove(i);
                continue 'clip;
            }
        }
        return None;
    }
    triangles.push([ring[0], ring[1], ring[2]]);
    Some(triangles)
}
