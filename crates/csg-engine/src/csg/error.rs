use std::fmt;

/// Error returned when constructing a primitive.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum PrimitiveError {
    /// Convexity must be at least 1.
    InvalidConvexity { value: i64 },
}

impl fmt::Display for PrimitiveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PrimitiveError::InvalidConvexity { value } => {
                write!(f, "invalid convexity {value}: must be at least 1")
            }
        }
    }
}

impl std::error::Error for PrimitiveError {}
