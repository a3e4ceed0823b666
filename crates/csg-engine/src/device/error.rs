use std::fmt;

/// Error returned by [`Gpu::compile_list`](super::Gpu::compile_list).
#[derive(Debug, Clone, PartialEq)]
pub enum CompileError {
    /// The device already holds `limit` live display lists.
    ListLimitReached { limit: usize },
    /// A recorded command could not be compiled (degenerate shape or transform,
    /// unbalanced matrix stack).
    InvalidGeometry { reason: String },
}

impl fmt::Display for CompileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompileError::ListLimitReached { limit } => {
                write!(f, "display list limit reached ({limit} live lists)")
            }
            CompileError::InvalidGeometry { reason } => {
                write!(f, "invalid display list geometry: {reason}")
            }
        }
    }
}

impl std::error::Error for CompileError {}
