use anyhow::Result;

use crate::csg::{DisplayListPrimitive, Operation, Primitive};
use crate::device::{Gpu, ListBuilder};

/// Append-only view of the sequence being built during a rebuild.
///
/// Primitives keep the order in which they are pushed.
pub struct SceneBuilder<'a> {
    items: &'a mut Vec<Box<dyn Primitive>>,
}

impl<'a> SceneBuilder<'a> {
    pub(crate) fn new(items: &'a mut Vec<Box<dyn Primitive>>) -> Self {
        Self { items }
    }

    #[inline]
    pub fn push<P: Primitive + 'static>(&mut self, primitive: P) {
        self.items.push(Box::new(primitive));
    }

    #[inline]
    pub fn push_boxed(&mut self, primitive: Box<dyn Primitive>) {
        self.items.push(primitive);
    }

    /// Compiles a display list on `gpu` and appends it as a primitive.
    pub fn push_display_list<F>(
        &mut self,
        gpu: &Gpu,
        operation: Operation,
        convexity: i64,
        record: F,
    ) -> Result<()>
    where
        F: FnOnce(&mut ListBuilder),
    {
        let list = gpu.compile_list(record)?;
        self.push(DisplayListPrimitive::new(list, operation, convexity)?);
        Ok(())
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
