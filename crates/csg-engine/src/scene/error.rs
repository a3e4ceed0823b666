use std::fmt;

/// Error returned by [`SceneCache`](super::SceneCache) operations.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum SceneError {
    /// The cache was shut down and accepts no further rebuilds.
    ShutDown,
}

impl fmt::Display for SceneError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SceneError::ShutDown => f.write_str("scene cache has been shut down"),
        }
    }
}

impl std::error::Error for SceneError {}
