use crate::error::GeometryError;
use crate::geometry::{Line, Point};
use crate::{point, CoordNum};

#[cfg(feature = "use-serde")]
use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle described by its minimum and maximum corners.
///
/// The corner order `min <= max` on both axes is an invariant:
/// [`Rect::try_new`] rejects inverted corners and [`Rect::from_corners`]
/// normalizes an arbitrary pair.
///
/// # Examples
///
/// ```
/// use tessella::{point, Rect};
///
/// let rect = Rect::new(point!(0.0, 4.0), point!(3.0, 10.0));
/// assert_eq!(rect.width(), 3.0);
/// assert_eq!(rect.height(), 6.0);
/// assert_eq!(rect.center(), point!(1.5, 7.0));
/// ```
#[derive(Eq, PartialEq, Clone, Copy, Debug, Hash)]
#[cfg_attr(feature = "use-serde", derive(Serialize, Deserialize))]
pub struct Rect<T: CoordNum = f64> {
    min: Point<T>,
    max: Point<T>,
}

impl<T: CoordNum> Rect<T> {
    /// Creates a rectangle from ordered corners, rejecting `min > max`.
    pub fn try_new<P: Into<Point<T>>>(min: P, max: P) -> Result<Self, GeometryError> {
        let (min, max) = (min.into(), max.into());
        if min.x > max.x || min.y > max.y {
            return Err(GeometryError::InvalidRectangle);
        }
        Ok(Self { min, max })
    }

    /// Creates a rectangle from ordered corners.
    ///
    /// # Panics
    ///
    /// Panics unless `min <= max` on both axes.
    pub fn new<P: Into<Point<T>>>(min: P, max: P) -> Self {
        Self::try_new(min, max).expect("rectangle corners must be ordered")
    }

    /// Creates the smallest rectangle covering two arbitrary corners.
    pub fn from_corners<P: Into<Point<T>>>(a: P, b: P) -> Self {
        let (a, b) = (a.into(), b.into());
        let (min_x, max_x) = if a.x < b.x { (a.x, b.x) } else { (b.x, a.x) };
        let (min_y, max_y) = if a.y < b.y { (a.y, b.y) } else { (b.y, a.y) };
        Self {
            min: point!(min_x, min_y),
            max: point!(max_x, max_y),
        }
    }

    #[inline]
    pub fn min(self) -> Point<T> {
        self.min
    }

    #[inline]
    pub fn max(self) -> Point<T> {
        self.max
    }

    #[inline]
    pub fn width(self) -> T {
        self.max.x - self.min.x
    }

    #[inline]
    pub fn height(self) -> T {
        self.max.y - self.min.y
    }

    /// Whether the closed rectangle contains `q`.
    #[inline]
    pub fn contains(self, q: Point<T>) -> bool {
        q.x >= self.min.x && q.x <= self.max.x && q.y >= self.min.y && q.y <= self.max.y
    }

    /// Whether the open rectangle contains `q` (boundary excluded).
    #[inline]
    pub fn contains_open(self, q: Point<T>) -> bool {
        q.x > self.min.x && q.x < self.max.x && q.y > self.min.y && q.y < self.max.y
    }

    /// Whether `other` lies entirely inside the closed rectangle.
    pub fn contains_rect(self, other: Rect<T>) -> bool {
        self.contains(other.min) && self.contains(other.max)
    }

    /// Whether the two closed rectangles share any point.
    pub fn intersects(self, other: Rect<T>) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
    }

    /// The smallest rectangle covering both operands.
    pub fn union(self, other: Rect<T>) -> Rect<T> {
        Rect {
            min: point!(
                if self.min.x < other.min.x { self.min.x } else { other.min.x },
                if self.min.y < other.min.y { self.min.y } else { other.min.y }
            ),
            max: point!(
                if self.max.x > other.max.x { self.max.x } else { other.max.x },
                if self.max.y > other.max.y { self.max.y } else { other.max.y }
            ),
        }
    }

    /// The overlap of the two closed rectangles, if any.
    pub fn intersection(self, other: Rect<T>) -> Option<Rect<T>> {
        let min = point!(
            if self.min.x > other.min.x { self.min.x } else { other.min.x },
            if self.min.y > other.min.y { self.min.y } else { other.min.y }
        );
        let max = point!(
            if self.max.x < other.max.x { self.max.x } else { other.max.x },
            if self.max.y < other.max.y { self.max.y } else { other.max.y }
        );
        (min.x <= max.x && min.y <= max.y).then_some(Rect { min, max })
    }

    /// The four corners in ring order, starting at `min`.
    pub fn to_polygon(self) -> [Point<T>; 4] {
        [
            self.min,
            point!(self.min.x, self.max.y),
            self.max,
            point!(self.max.x, self.min.y),
        ]
    }

    /// The four boundary segments in ring order, starting at `min`.
    pub fn to_lines(self) -> [Line<T>; 4] {
        let [a, b, c, d] = self.to_polygon();
        [
            Line::new(a, b),
            Line::new(b, c),
            Line::new(c, d),
            Line::new(d, a),
        ]
    }
}

impl Rect<f64> {
    #[inline]
    pub fn center(self) -> Point {
        (self.min + self.max) / 2.
    }

    /// Whether the rectangle inflated by `epsilon` on all sides contains `q`.
    pub fn contains_with(self, q: Point, epsilon: f64) -> bool {
        q.x >= self.min.x - epsilon
            && q.x <= self.max.x + epsilon
            && q.y >= self.min.y - epsilon
            && q.y <= self.max.y + epsilon
    }

    /// The rectangle grown by `amount` on every side. Shrinking past a
    /// degenerate rectangle collapses to the center.
    pub fn inflate(self, amount: f64) -> Rect {
        let min = self.min - point!(amount, amount);
        let max = self.max + point!(amount, amount);
        if min.x > max.x || min.y > max.y {
            let c = self.center();
            return Rect { min: c, max: c };
        }
        Rect { min, max }
    }

    /// Displacement from `q` to the nearest point of the closed rectangle;
    /// zero for points inside.
    ///
    /// ```
    /// use tessella::{point, Rect};
    ///
    /// let rect = Rect::new(point!(0.0, 0.0), point!(4.0, 4.0));
    /// assert_eq!(rect.distance_vector(point!(1.0, 2.0)), point!(0.0, 0.0));
    /// assert_eq!(rect.distance_vector(point!(6.0, -1.0)), point!(-2.0, 1.0));
    /// ```
    pub fn distance_vector(self, q: Point) -> Point {
        point!(
            q.x.clamp(self.min.x, self.max.x) - q.x,
            q.y.clamp(self.min.y, self.max.y) - q.y
        )
    }

    /// Clips a segment to the rectangle with the Liang–Barsky parametric
    /// test. Returns `None` when the segment misses the rectangle.
    pub fn clip_line(self, line: &Line) -> Option<Line> {
        let d = line.delta();
        let mut t0 = 0.0_f64;
        let mut t1 = 1.0_f64;
        // each pair is (denominator, numerator) for one boundary
        let checks = [
            (-d.x, line.start.x - self.min.x),
            (d.x, self.max.x - line.start.x),
            (-d.y, line.start.y - self.min.y),
            (d.y, self.max.y - line.start.y),
        ];
        for (p, q) in checks {
            if p == 0. {
                if q < 0. {
                    return None;
                }
            } else {
                let r = q / p;
                if p < 0. {
                    if r > t1 {
                        return None;
                    }
                    if r > t0 {
                        t0 = r;
                    }
                } else {
                    if r < t0 {
                        return None;
                    }
                    if r < t1 {
                        t1 = r;
                    }
                }
            }
        }
        Some(Line::new(
            line.start.lerp(line.end, t0),
            line.start.lerp(line.end, t1),
        ))
    }

    /// Clips a polygon to the rectangle with Sutherland–Hodgman, one
    /// half-plane at a time. The result is empty when the polygon lies
    /// entirely outside.
    pub fn clip_polygon(self, polygon: &[Point]) -> Vec<Point> {
        // inside test and boundary intercept per clip edge
        fn clip_half_plane(
            ring: &[Point],
            inside: impl Fn(Point) -> bool,
            intercept: impl Fn(Point, Point) -> Point,
        ) -> Vec<Point> {
            let mut out = Vec::with_capacity(ring.len() + 2);
            for (i, &p) in ring.iter().enumerate() {
                let prev = ring[(i + ring.len() - 1) % ring.len()];
                match (inside(prev), inside(p)) {
                    (true, true) => out.push(p),
                    (true, false) => out.push(intercept(prev, p)),
                    (false, true) => {
                        out.push(intercept(prev, p));
                        out.push(p);
                    }
                    (false, false) => {}
                }
            }
            out
        }

        let at_x = |x: f64| {
            move |a: Point, b: Point| {
                let t = (x - a.x) / (b.x - a.x);
                point!(x, a.y + (b.y - a.y) * t)
            }
        };
        let at_y = |y: f64| {
            move |a: Point, b: Point| {
                let t = (y - a.y) / (b.y - a.y);
                point!(a.x + (b.x - a.x) * t, y)
            }
        };

        let mut ring = polygon.to_vec();
        ring = clip_half_plane(&ring, |p| p.x >= self.min.x, at_x(self.min.x));
        if ring.is_empty() {
            return ring;
        }
        ring = clip_half_plane(&ring, |p| p.x <= self.max.x, at_x(self.max.x));
        if ring.is_empty() {
            return ring;
        }
        ring = clip_half_plane(&ring, |p| p.y >= self.min.y, at_y(self.min.y));
        if ring.is_empty() {
            return ring;
        }
        clip_half_plane(&ring, |p| p.y <= self.max.y, at_y(self.max.y))
    }
}
