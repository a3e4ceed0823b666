use std::fmt;
use std::num::NonZeroU32;

use super::PrimitiveError;

/// CSG operation a primitive contributes to the composite shape.
///
/// The composite is `((∩ Intersection) ∪ (∪ Union)) − (∪ Subtraction)`.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Operation {
    Union,
    Intersection,
    Subtraction,
}

impl Operation {
    /// Whether the visible part of this primitive is its front (outer) surface.
    ///
    /// Subtracted primitives show their back surface: the inner wall of the
    /// hole they cut.
    #[inline]
    pub fn shows_front_faces(self) -> bool {
        !matches!(self, Operation::Subtraction)
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Operation::Union => "union",
            Operation::Intersection => "intersection",
            Operation::Subtraction => "subtraction",
        })
    }
}

/// Maximum number of front faces any view ray crosses on a solid.
///
/// `1` for convex solids; `k` for a solid made of `k` non-overlapping convex
/// pieces. Compositors rely on it for correctness.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct Convexity(NonZeroU32);

impl Convexity {
    pub const CONVEX: Convexity = Convexity(NonZeroU32::MIN);

    /// Validates `value`; zero, negative and out-of-range values are rejected.
    pub fn new(value: i64) -> Result<Self, PrimitiveError> {
        u32::try_from(value)
            .ok()
            .and_then(NonZeroU32::new)
            .map(Convexity)
            .ok_or(PrimitiveError::InvalidConvexity { value })
    }

    #[inline]
    pub fn get(self) -> u32 {
        self.0.get()
    }

    #[inline]
    pub fn is_convex(self) -> bool {
        self == Self::CONVEX
    }
}

impl Default for Convexity {
    fn default() -> Self {
        Self::CONVEX
    }
}

impl fmt::Display for Convexity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
