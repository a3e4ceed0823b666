use super::Gpu;

/// Depth comparison applied to incoming fragments.
///
/// The incoming depth is compared against the stored depth; smaller is closer.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub enum DepthFunc {
    #[default]
    Less,
    LessEqual,
    Equal,
    Always,
}

impl DepthFunc {
    #[inline]
    pub fn passes(self, incoming: f32, stored: f32) -> bool {
        match self {
            DepthFunc::Less => incoming < stored,
            DepthFunc::LessEqual => incoming <= stored,
            DepthFunc::Equal => incoming == stored,
            DepthFunc::Always => true,
        }
    }
}

/// Restores the depth function that was active when the guard was created.
///
/// Obtained from [`Gpu::scoped_depth_func`]. The restore runs on drop, so it
/// also happens on early returns and during unwinding.
#[must_use = "the previous depth function is restored when the guard is dropped"]
pub struct DepthFuncGuard<'a> {
    gpu: &'a Gpu,
    restore: DepthFunc,
}

impl<'a> DepthFuncGuard<'a> {
    pub(crate) fn new(gpu: &'a Gpu, restore: DepthFunc) -> Self {
        Self { gpu, restore }
    }

    /// Changes the active depth function without affecting what is restored.
    #[inline]
    pub fn set(&self, func: DepthFunc) {
        self.gpu.set_depth_func(func);
    }

    /// Depth function that will be restored on drop.
    #[inline]
    pub fn restores_to(&self) -> DepthFunc {
        self.restore
    }
}

impl Drop for DepthFuncGuard<'_> {
    fn drop(&mut self) {
        self.gpu.set_depth_func(self.restore);
    }
}
