use crate::device::DisplayList;

use super::{Convexity, Operation, Primitive, PrimitiveError};

/// Primitive that renders itself by calling a compiled display list.
///
/// The list is owned: dropping (or [`release`](Self::release)-ing) the primitive
/// deletes it.
#[derive(Debug)]
pub struct DisplayListPrimitive {
    list: DisplayList,
    operation: Operation,
    convexity: Convexity,
}

impl DisplayListPrimitive {
    /// Wraps `list`. On an invalid convexity the list is dropped (and deleted)
    /// together with the error.
    pub fn new(
        list: DisplayList,
        operation: Operation,
        convexity: i64,
    ) -> Result<Self, PrimitiveError> {
        let convexity = Convexity::new(convexity)?;
        Ok(Self {
            list,
            operation,
            convexity,
        })
    }

    #[inline]
    pub fn display_list(&self) -> &DisplayList {
        &self.list
    }

    /// Replaces the display list, handing the previous one back to the caller.
    pub fn replace_display_list(&mut self, list: DisplayList) -> DisplayList {
        std::mem::replace(&mut self.list, list)
    }

    /// Releases the display list now.
    pub fn release(self) {
        log::trace!("releasing {} primitive {}", self.operation, self.list.id());
    }
}

impl Primitive for DisplayListPrimitive {
    #[inline]
    fn operation(&self) -> Operation {
        self.operation
    }

    #[inline]
    fn convexity(&self) -> Convexity {
        self.convexity
    }

    #[inline]
    fn render(&self) {
        self.list.call();
    }
}
