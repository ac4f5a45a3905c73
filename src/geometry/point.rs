use crate::error::GeometryError;
use crate::{CoordFloat, CoordNum};
use num_traits::{CheckedAdd, CheckedMul, CheckedSub, NumCast, Zero};

#[cfg(feature = "use-serde")]
use serde::{Deserialize, Serialize};

/// A location on the two-dimensional Cartesian plane.
///
/// This type implements the vector space operations [`Add`], [`Sub`],
/// [`Neg`], [`Zero`], scalar [`Mul`] and [`Div`].
///
/// The scalar defaults to `f64`, which every algorithm in this crate
/// operates on. Integer points (`Point<i32>` and friends) are supported for
/// exact input data; their [checked operations](Self::try_add) detect
/// overflow instead of wrapping.
///
/// # Examples
///
/// ```
/// use tessella::point;
///
/// let p = point!(1.25, 2.5);
/// let q = point!(0.75, 0.5);
/// assert_eq!(p + q, point!(2.0, 3.0));
/// assert_eq!(p * 2.0, point!(2.5, 5.0));
/// ```
#[derive(Eq, PartialEq, Clone, Copy, Debug, Hash, Default)]
#[cfg_attr(feature = "use-serde", derive(Serialize, Deserialize))]
pub struct Point<T: CoordNum = f64> {
    pub x: T,
    pub y: T,
}

/// Creates a [`Point`] from x/y components.
///
/// ```
/// use tessella::point;
///
/// let p = point!(40.02, 116.34);
/// assert_eq!(p.x, 40.02);
/// ```
#[macro_export]
macro_rules! point {
    ($x:expr, $y:expr $(,)?) => {
        $crate::Point { x: $x, y: $y }
    };
}

impl<T: CoordNum> Point<T> {
    #[inline]
    pub fn new(x: T, y: T) -> Self {
        Self { x, y }
    }

    /// Returns the x and y components as a tuple.
    #[inline]
    pub fn x_y(&self) -> (T, T) {
        (self.x, self.y)
    }

    /// Dot product with another point treated as a vector.
    #[inline]
    pub fn dot(self, rhs: Self) -> T {
        self.x * rhs.x + self.y * rhs.y
    }

    /// Z component of the cross product with another point treated as a
    /// vector. Zero exactly when the two vectors are parallel.
    #[inline]
    pub fn cross(self, rhs: Self) -> T {
        self.x * rhs.y - self.y * rhs.x
    }

    /// Converts to another scalar type, failing with
    /// [`GeometryError::ArithmeticOverflow`] when a component does not fit.
    ///
    /// ```
    /// use tessella::point;
    ///
    /// let p = point!(3.0, -2.0);
    /// assert_eq!(p.try_cast::<i32>().unwrap(), point!(3, -2));
    /// assert!(point!(1.0e300, 0.0).try_cast::<i32>().is_err());
    /// ```
    pub fn try_cast<U: CoordNum>(self) -> Result<Point<U>, GeometryError> {
        match (NumCast::from(self.x), NumCast::from(self.y)) {
            (Some(x), Some(y)) => Ok(Point { x, y }),
            _ => Err(GeometryError::ArithmeticOverflow),
        }
    }
}

impl<T: CoordNum + CheckedAdd + CheckedSub + CheckedMul> Point<T> {
    /// Component-wise addition that fails with
    /// [`GeometryError::ArithmeticOverflow`] instead of wrapping.
    pub fn try_add(self, rhs: Self) -> Result<Self, GeometryError> {
        match (self.x.checked_add(&rhs.x), self.y.checked_add(&rhs.y)) {
            (Some(x), Some(y)) => Ok(Self { x, y }),
            _ => Err(GeometryError::ArithmeticOverflow),
        }
    }

    /// Component-wise subtraction with overflow detection.
    pub fn try_sub(self, rhs: Self) -> Result<Self, GeometryError> {
        match (self.x.checked_sub(&rhs.x), self.y.checked_sub(&rhs.y)) {
            (Some(x), Some(y)) => Ok(Self { x, y }),
            _ => Err(GeometryError::ArithmeticOverflow),
        }
    }

    /// Scalar multiplication with overflow detection.
    pub fn try_mul(self, rhs: T) -> Result<Self, GeometryError> {
        match (self.x.checked_mul(&rhs), self.y.checked_mul(&rhs)) {
            (Some(x), Some(y)) => Ok(Self { x, y }),
            _ => Err(GeometryError::ArithmeticOverflow),
        }
    }
}

impl<T: CoordFloat> Point<T> {
    /// Euclidean length of the vector from the origin.
    #[inline]
    pub fn length(self) -> T {
        self.dot(self).sqrt()
    }

    /// Polar angle in radians, in `(-pi, pi]`.
    #[inline]
    pub fn angle(self) -> T {
        self.y.atan2(self.x)
    }

    /// Euclidean distance to another point.
    #[inline]
    pub fn distance(self, other: Self) -> T {
        (other - self).length()
    }

    /// Squared euclidean distance to another point.
    #[inline]
    pub fn distance_squared(self, other: Self) -> T {
        let d = other - self;
        d.dot(d)
    }

    /// Linear interpolation toward `other`; `t == 0` yields `self`.
    pub fn lerp(self, other: Self, t: T) -> Self {
        Self {
            x: self.x + (other.x - self.x) * t,
            y: self.y + (other.y - self.y) * t,
        }
    }

    /// Whether both components are finite numbers.
    #[inline]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl<T: CoordNum> From<(T, T)> for Point<T> {
    #[inline]
    fn from(xy: (T, T)) -> Self {
        point!(xy.0, xy.1)
    }
}

impl<T: CoordNum> From<[T; 2]> for Point<T> {
    #[inline]
    fn from(xy: [T; 2]) -> Self {
        point!(xy[0], xy[1])
    }
}

impl<T: CoordNum> From<Point<T>> for (T, T) {
    #[inline]
    fn from(p: Point<T>) -> Self {
        (p.x, p.y)
    }
}

use std::ops::{Add, Div, Mul, Neg, Sub};

impl<T> Neg for Point<T>
where
    T: CoordNum + Neg<Output = T>,
{
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        point!(-self.x, -self.y)
    }
}

impl<T: CoordNum> Add for Point<T> {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self {
        point!(self.x + rhs.x, self.y + rhs.y)
    }
}

impl<T: CoordNum> Sub for Point<T> {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: Self) -> Self {
        point!(self.x - rhs.x, self.y - rhs.y)
    }
}

impl<T: CoordNum> Mul<T> for Point<T> {
    type Output = Self;

    #[inline]
    fn mul(self, rhs: T) -> Self {
        point!(self.x * rhs, self.y * rhs)
    }
}

impl<T: CoordNum> Div<T> for Point<T> {
    type Output = Self;

    #[inline]
    fn div(self, rhs: T) -> Self {
        point!(self.x / rhs, self.y / rhs)
    }
}

impl<T: CoordNum> Zero for Point<T> {
    #[inline]
    fn zero() -> Self {
        point!(T::zero(), T::zero())
    }

    #[inline]
    fn is_zero(&self) -> bool {
        self.x.is_zero() && self.y.is_zero()
    }
}

use approx::{AbsDiffEq, RelativeEq};

impl<T: CoordNum + AbsDiffEq> AbsDiffEq for Point<T>
where
    T::Epsilon: Copy,
{
    type Epsilon = T::Epsilon;

    #[inline]
    fn default_epsilon() -> T::Epsilon {
        T::default_epsilon()
    }

    #[inline]
    fn abs_diff_eq(&self, other: &Self, epsilon: T::Epsilon) -> bool {
        T::abs_diff_eq(&self.x, &other.x, epsilon) && T::abs_diff_eq(&self.y, &other.y, epsilon)
    }
}

impl<T: CoordNum + RelativeEq> RelativeEq for Point<T>
where
    T::Epsilon: Copy,
{
    #[inline]
    fn default_max_relative() -> T::Epsilon {
        T::default_max_relative()
    }

    #[inline]
    fn relative_eq(&self, other: &Self, epsilon: T::Epsilon, max_relative: T::Epsilon) -> bool {
        T::relative_eq(&self.x, &other.x, epsilon, max_relative)
            && T::relative_eq(&self.y, &other.y, epsilon, max_relative)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vector_ops() {
        let p = point!(1.5, 2.5);
        let q = point!(0.5, -0.5);
        assert_eq!(p + q, point!(2.0, 2.0));
        assert_eq!(p - q, point!(1.0, 3.0));
        assert_eq!(-q, point!(-0.5, 0.5));
        assert_eq!(p * 2.0, point!(3.0, 5.0));
        assert_eq!(p / 0.5, point!(3.0, 5.0));
    }

    #[test]
    fn dot_and_cross() {
        let p = point!(3.0, 4.0);
        let q = point!(-4.0, 3.0);
        assert_eq!(p.dot(q), 0.0);
        assert_eq!(p.cross(q), 25.0);
        assert_eq!(p.cross(p), 0.0);
    }

    #[test]
    fn length_and_angle() {
        assert_eq!(point!(3.0, 4.0).length(), 5.0);
        assert_eq!(point!(0.0, 1.0).angle(), std::f64::consts::FRAC_PI_2);
        assert_eq!(point!(1.0, 1.0).distance_squared(point!(4.0, 5.0)), 25.0);
    }

    #[test]
    fn checked_integer_arithmetic_detects_overflow() {
        let p = point!(i32::MAX, 0);
        assert_eq!(
            p.try_add(point!(1, 0)),
            Err(GeometryError::ArithmeticOverflow)
        );
        assert_eq!(p.try_add(point!(0, 1)), Ok(point!(i32::MAX, 1)));
        assert_eq!(
            point!(i32::MIN, 0).try_sub(point!(1, 0)),
            Err(GeometryError::ArithmeticOverflow)
        );
        assert_eq!(
            point!(1 << 20, 1).try_mul(1 << 12),
            Err(GeometryError::ArithmeticOverflow)
        );
    }

    #[test]
    fn cast_detects_overflow() {
        assert_eq!(point!(1.9, -1.9).try_cast::<i32>(), Ok(point!(1, -1)));
        assert!(point!(<f64 as From<i32>>::from(i32::MAX) * 2.0, 0.0)
            .try_cast::<i32>()
            .is_err());
        assert_eq!(point!(7i32, -3).try_cast::<f64>(), Ok(point!(7.0, -3.0)));
    }
}
