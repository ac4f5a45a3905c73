use crate::error::GeometryError;
use crate::geometry::Point;
use std::cmp::Ordering;

/// The primary axis of a lexicographic point ordering.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
}

/// A lexicographic point comparator with an absolute tolerance.
///
/// Coordinates whose difference does not exceed the tolerance compare
/// equal on that axis; ties fall through to the secondary axis. Note that
/// a tolerance greater than zero is not transitive, so this comparator is
/// not a total order in the strict sense; ordered containers should
/// cluster keys at insertion instead (see
/// [`PointMap`](crate::collections::PointMap)), and [`Self::sort_unique`]
/// detects inputs on which the tolerance is unsound.
///
/// # Examples
///
/// ```
/// use tessella::geometry::PointOrder;
/// use tessella::point;
/// use std::cmp::Ordering;
///
/// let order = PointOrder::y_primary(0.5).unwrap();
/// assert_eq!(order.compare(point!(1.0, 3.0), point!(9.0, 3.4)), Ordering::Less);
/// assert_eq!(order.compare(point!(1.0, 3.0), point!(1.2, 3.4)), Ordering::Equal);
/// ```
#[derive(Clone, Copy, Debug)]
pub struct PointOrder {
    axis: Axis,
    epsilon: f64,
}

impl PointOrder {
    /// An x-then-y ordering with the given tolerance.
    pub fn x_primary(epsilon: f64) -> Result<Self, GeometryError> {
        Self::with_axis(Axis::X, epsilon)
    }

    /// A y-then-x ordering with the given tolerance. This is the ordering
    /// the subdivision vertex map uses.
    pub fn y_primary(epsilon: f64) -> Result<Self, GeometryError> {
        Self::with_axis(Axis::Y, epsilon)
    }

    pub fn with_axis(axis: Axis, epsilon: f64) -> Result<Self, GeometryError> {
        if !(epsilon >= 0.) {
            return Err(GeometryError::InvalidEpsilon);
        }
        Ok(Self { axis, epsilon })
    }

    #[inline]
    pub fn axis(&self) -> Axis {
        self.axis
    }

    #[inline]
    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    /// Compares two points, treating per-axis differences within the
    /// tolerance as ties.
    pub fn compare(&self, a: Point, b: Point) -> Ordering {
        let (pa, pb, sa, sb) = match self.axis {
            Axis::X => (a.x, b.x, a.y, b.y),
            Axis::Y => (a.y, b.y, a.x, b.x),
        };
        compare_with(pa, pb, self.epsilon).then_with(|| compare_with(sa, sb, self.epsilon))
    }

    /// Exact lexicographic comparison along `axis`, ignoring any tolerance.
    pub fn compare_exact(axis: Axis, a: Point, b: Point) -> Ordering {
        let (pa, pb, sa, sb) = match axis {
            Axis::X => (a.x, b.x, a.y, b.y),
            Axis::Y => (a.y, b.y, a.x, b.x),
        };
        total_cmp(pa, pb).then_with(|| total_cmp(sa, sb))
    }

    /// Whether the two points compare equal under the tolerance.
    #[inline]
    pub fn eq(&self, a: Point, b: Point) -> bool {
        self.compare(a, b) == Ordering::Equal
    }

    /// Sorts points lexicographically, refusing inputs on which the
    /// tolerance conflates points that are not identical.
    ///
    /// A post-sort scan reports [`GeometryError::ToleranceOverlap`] when
    /// two adjacent, non-identical points compare equal; such inputs would
    /// make every downstream tolerance comparison ambiguous, so they are
    /// rejected eagerly.
    pub fn sort_unique(&self, points: &mut [Point]) -> Result<(), GeometryError> {
        points.sort_by(|a, b| {
            self.compare(*a, *b)
                .then_with(|| Self::compare_exact(self.axis, *a, *b))
        });
        for pair in points.windows(2) {
            if self.eq(pair[0], pair[1]) && pair[0] != pair[1] {
                return Err(GeometryError::ToleranceOverlap);
            }
        }
        Ok(())
    }

    /// Index of the point nearest to `q` in euclidean distance, on a slice
    /// sorted by this ordering.
    ///
    /// The scan starts at the lexicographic position of `q` and walks
    /// outward in both directions, stopping as soon as the primary-axis
    /// distance alone exceeds the best euclidean distance found.
    pub fn find_nearest(&self, points: &[Point], q: Point) -> Option<usize> {
        if points.is_empty() {
            return None;
        }
        let pivot = points.partition_point(|p| self.compare(*p, q) == Ordering::Less);
        let primary = |p: Point| match self.axis {
            Axis::X => p.x,
            Axis::Y => p.y,
        };
        let q_primary = primary(q);

        let mut best = None;
        let mut best_dist = f64::INFINITY;

        // walk forward and backward in lockstep; each direction stops once
        // the primary-axis gap alone rules out an improvement
        let mut fwd = pivot;
        let mut bwd = pivot;
        loop {
            let fwd_open =
                fwd < points.len() && (primary(points[fwd]) - q_primary) - self.epsilon <= best_dist;
            if fwd_open {
                let d = points[fwd].distance(q);
                if d < best_dist {
                    best_dist = d;
                    best = Some(fwd);
                }
                fwd += 1;
            }
            let bwd_open =
                bwd > 0 && (q_primary - primary(points[bwd - 1])) - self.epsilon <= best_dist;
            if bwd_open {
                bwd -= 1;
                let d = points[bwd].distance(q);
                if d < best_dist {
                    best_dist = d;
                    best = Some(bwd);
                }
            }
            if !fwd_open && !bwd_open {
                break;
            }
        }
        best
    }
}

/// Exact lexicographic y-then-x comparison, the crate's canonical point
/// order (matches the sweep direction of the intersection and Voronoi
/// engines).
#[inline]
pub fn lexicographic_cmp(a: Point, b: Point) -> Ordering {
    PointOrder::compare_exact(Axis::Y, a, b)
}

#[inline]
fn compare_with(a: f64, b: f64, epsilon: f64) -> Ordering {
    if (a - b).abs() <= epsilon {
        Ordering::Equal
    } else {
        total_cmp(a, b)
    }
}

#[inline]
fn total_cmp(a: f64, b: f64) -> Ordering {
    a.partial_cmp(&b).unwrap_or(Ordering::Equal)
}
