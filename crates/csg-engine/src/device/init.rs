use crate::coords::{OrthoView, Viewport};
use crate::paint::Color;

/// Initialization parameters for the raster device.
#[derive(Debug, Clone)]
pub struct GpuInit {
    /// Render target extent in pixels. Both dimensions must be non-zero.
    pub viewport: Viewport,

    /// View used to turn pixels into rays.
    pub view: OrthoView,

    /// Color written by [`Gpu::clear`](super::Gpu::clear).
    pub clear_color: Color,

    /// Maximum number of live display lists.
    ///
    /// Compiling past this limit fails with `CompileError::ListLimitReached`.
    pub max_display_lists: usize,
}

impl Default for GpuInit {
    fn default() -> Self {
        Self {
            viewport: Viewport::new(256, 256),
            view: OrthoView::default(),
            clear_color: Color::BLACK,
            max_display_lists: 1024,
        }
    }
}
