//! Orientation predicates shared by the hull, polygon, and subdivision code.

use crate::geometry::Point;

/// The turn direction of an ordered point triple.
///
/// Directions are named for the mathematical convention (y grows upward).
/// Under the screen convention used by [`Subdivision`](crate::Subdivision)
/// (y grows downward) the visual sense is mirrored, but all predicates in
/// this crate agree on the sign of the underlying cross product, so the two
/// views never mix.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Copy)]
pub enum Orientation {
    CounterClockwise,
    Clockwise,
    Collinear,
}

/// Exact orientation of the triple `(p, q, r)`, computed with an adaptive
/// precision predicate.
///
/// # Examples
///
/// ```
/// use tessella::kernels::{orient2d, Orientation};
/// use tessella::point;
///
/// let p = point!(0.0, 0.0);
/// let q = point!(2.0, 0.0);
/// assert_eq!(orient2d(p, q, point!(1.0, 1.0)), Orientation::CounterClockwise);
/// assert_eq!(orient2d(p, q, point!(1.0, -1.0)), Orientation::Clockwise);
/// assert_eq!(orient2d(p, q, point!(7.0, 0.0)), Orientation::Collinear);
/// ```
pub fn orient2d(p: Point, q: Point, r: Point) -> Orientation {
    use robust::{orient2d, Coord};

    let sign = orient2d(
        Coord { x: p.x, y: p.y },
        Coord { x: q.x, y: q.y },
        Coord { x: r.x, y: r.y },
    );

    if sign > 0. {
        Orientation::CounterClockwise
    } else if sign < 0. {
        Orientation::Clockwise
    } else {
        Orientation::Collinear
    }
}

/// Orientation of `(p, q, r)` with an absolute tolerance band.
///
/// The signed cross product of the direction vectors `q - p` and `r - p` is
/// compared against `epsilon`; triples within the band collapse to
/// [`Orientation::Collinear`]. With `epsilon == 0` this is the plain
/// floating-point predicate, which is faster but less reliable than
/// [`orient2d`] for nearly collinear inputs.
pub fn orient2d_with(p: Point, q: Point, r: Point, epsilon: f64) -> Orientation {
    debug_assert!(epsilon >= 0.);
    let cross = (q.x - p.x) * (r.y - p.y) - (q.y - p.y) * (r.x - p.x);
    if cross > epsilon {
        Orientation::CounterClockwise
    } else if cross < -epsilon {
        Orientation::Clockwise
    } else {
        Orientation::Collinear
    }
}

/// Squared euclidean distance between two points.
#[inline]
pub fn square_distance(p: Point, q: Point) -> f64 {
    (p.x - q.x) * (p.x - q.x) + (p.y - q.y) * (p.y - q.y)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::point;

    #[test]
    fn robust_predicate_handles_near_collinear() {
        // A triple that plain floating-point evaluation misclassifies.
        let p = point!(0.5, 0.5);
        let q = point!(12.0, 12.0);
        let r = point!(24.0, 24.0);
        assert_eq!(orient2d(p, q, r), Orientation::Collinear);
    }

    #[test]
    fn epsilon_band_collapses_to_collinear() {
        let p = point!(0.0, 0.0);
        let q = point!(10.0, 0.0);
        let r = point!(5.0, 0.4);
        assert_eq!(orient2d_with(p, q, r, 0.0), Orientation::CounterClockwise);
        // cross product is 4.0; a band of 5.0 swallows it
        assert_eq!(orient2d_with(p, q, r, 5.0), Orientation::Collinear);
    }

    #[test]
    fn square_distance_is_symmetric() {
        let p = point!(1.0, 2.0);
        let q = point!(4.0, 6.0);
        assert_eq!(square_distance(p, q), 25.0);
        assert_eq!(square_distance(q, p), 25.0);
    }
}
