use std::fmt;

/// Errors raised by geometric constructors and arithmetic.
///
/// Construction errors (`InvalidRectangle`, `InvalidSize`, ...) indicate an
/// argument that violates a documented precondition and are never recovered
/// locally. `ArithmeticOverflow` is returned by the checked integer
/// operations on [`Point`](crate::Point) and [`Size`](crate::Size) instead
/// of silently wrapping.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GeometryError {
    /// Rectangle corners are out of order (`min > max` on some axis).
    InvalidRectangle,
    /// Size with a negative width or height.
    InvalidSize,
    /// Negative comparison tolerance.
    InvalidEpsilon,
    /// Visibility threshold outside `[0, 1]`.
    InvalidThreshold,
    /// Grid element with an unsupported side count, a non-positive length,
    /// or a shift that is illegal for its shape.
    InvalidElement,
    /// Zero-length line where a proper segment is required.
    DegenerateLine,
    /// Integer arithmetic exceeded the representable range.
    ArithmeticOverflow,
    /// Two distinct points are indistinguishable under the active tolerance.
    ToleranceOverlap,
}

impl fmt::Display for GeometryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GeometryError::InvalidRectangle => {
                write!(f, "rectangle corners are out of order")
            }
            GeometryError::InvalidSize => write!(f, "size has a negative extent"),
            GeometryError::InvalidEpsilon => write!(f, "comparison tolerance is negative"),
            GeometryError::InvalidThreshold => {
                write!(f, "visibility threshold is outside [0, 1]")
            }
            GeometryError::InvalidElement => {
                write!(f, "grid element has an unsupported shape or shift")
            }
            GeometryError::DegenerateLine => {
                write!(f, "line has coincident start and end points")
            }
            GeometryError::ArithmeticOverflow => {
                write!(f, "integer arithmetic exceeded the representable range")
            }
            GeometryError::ToleranceOverlap => {
                write!(f, "distinct points compare equal under the active tolerance")
            }
        }
    }
}

impl std::error::Error for GeometryError {}
