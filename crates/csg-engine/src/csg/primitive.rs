use std::fmt;

use super::{Convexity, Operation};

/// One solid taking part in a CSG composite.
///
/// Implementations own whatever device resources `render` draws from and free
/// them when dropped. Dropping is the release: it happens exactly once, and a
/// released primitive can no longer be rendered.
pub trait Primitive {
    fn operation(&self) -> Operation;

    fn convexity(&self) -> Convexity;

    /// Draws the solid's closed surface with the device's current state.
    ///
    /// May be called any number of times; compositors call it repeatedly with
    /// different depth and capture state.
    fn render(&self);
}

impl fmt::Debug for dyn Primitive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Primitive")
            .field("operation", &self.operation())
            .field("convexity", &self.convexity())
            .finish_non_exhaustive()
    }
}
