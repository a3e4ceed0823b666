use std::fmt;

/// Failure of a compositing pass. The depth buffer is left unchanged.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum CompositeError {
    /// The selected options cannot be honored for this primitive sequence.
    UnsupportedConfiguration { reason: String },
    /// A layered pass needs more surface layers than the compositor can address.
    LayerLimitExceeded { required: usize, limit: usize },
}

impl fmt::Display for CompositeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompositeError::UnsupportedConfiguration { reason } => {
                write!(f, "unsupported compositor configuration: {reason}")
            }
            CompositeError::LayerLimitExceeded { required, limit } => {
                write!(f, "composite needs {required} surface layers, limit is {limit}")
            }
        }
    }
}

impl std::error::Error for CompositeError {}
