use crate::error::GeometryError;
use crate::CoordNum;
use num_traits::{CheckedAdd, CheckedMul, NumCast};

#[cfg(feature = "use-serde")]
use serde::{Deserialize, Serialize};

/// A non-negative two-dimensional extent.
///
/// Constructed through [`Size::try_new`], which rejects negative
/// components, or [`Size::new`], which panics on them.
#[derive(Eq, PartialEq, Clone, Copy, Debug, Hash, Default)]
#[cfg_attr(feature = "use-serde", derive(Serialize, Deserialize))]
pub struct Size<T: CoordNum = f64> {
    width: T,
    height: T,
}

impl<T: CoordNum> Size<T> {
    /// Creates a size, rejecting negative extents.
    pub fn try_new(width: T, height: T) -> Result<Self, GeometryError> {
        if width < T::zero() || height < T::zero() {
            return Err(GeometryError::InvalidSize);
        }
        Ok(Self { width, height })
    }

    /// Creates a size.
    ///
    /// # Panics
    ///
    /// Panics if either extent is negative.
    pub fn new(width: T, height: T) -> Self {
        Self::try_new(width, height).expect("size extents must be non-negative")
    }

    #[inline]
    pub fn width(self) -> T {
        self.width
    }

    #[inline]
    pub fn height(self) -> T {
        self.height
    }

    #[inline]
    pub fn area(self) -> T {
        self.width * self.height
    }

    pub fn try_cast<U: CoordNum>(self) -> Result<Size<U>, GeometryError> {
        match (NumCast::from(self.width), NumCast::from(self.height)) {
            (Some(width), Some(height)) => Ok(Size { width, height }),
            _ => Err(GeometryError::ArithmeticOverflow),
        }
    }
}

impl<T: CoordNum + CheckedAdd + CheckedMul> Size<T> {
    /// Component-wise addition with overflow detection.
    pub fn try_add(self, rhs: Self) -> Result<Self, GeometryError> {
        match (
            self.width.checked_add(&rhs.width),
            self.height.checked_add(&rhs.height),
        ) {
            (Some(width), Some(height)) => Ok(Self { width, height }),
            _ => Err(GeometryError::ArithmeticOverflow),
        }
    }

    /// Scalar multiplication with overflow detection; negative factors are
    /// rejected as they would produce a negative extent.
    pub fn try_mul(self, rhs: T) -> Result<Self, GeometryError> {
        if rhs < T::zero() {
            return Err(GeometryError::InvalidSize);
        }
        match (
            self.width.checked_mul(&rhs),
            self.height.checked_mul(&rhs),
        ) {
            (Some(width), Some(height)) => Ok(Self { width, height }),
            _ => Err(GeometryError::ArithmeticOverflow),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_negative_extents() {
        assert_eq!(Size::try_new(-1.0, 2.0), Err(GeometryError::InvalidSize));
        assert_eq!(Size::try_new(1.0, -2.0), Err(GeometryError::InvalidSize));
        assert!(Size::try_new(0.0, 0.0).is_ok());
    }

    #[test]
    fn checked_arithmetic() {
        let s = Size::new(i32::MAX, 1);
        assert_eq!(
            s.try_add(Size::new(1, 0)),
            Err(GeometryError::ArithmeticOverflow)
        );
        assert_eq!(
            Size::new(2, 3).try_mul(4),
            Ok(Size::new(8, 12))
        );
        assert_eq!(
            Size::new(2, 3).try_mul(-1),
            Err(GeometryError::InvalidSize)
        );
    }

    #[test]
    fn area() {
        assert_eq!(Size::new(3.0, 4.0).area(), 12.0);
    }
}
