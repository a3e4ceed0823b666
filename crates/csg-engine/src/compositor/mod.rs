//! Visible-surface compositing for CSG primitive sequences.
//!
//! This module is responsible for:
//! - the `Compositor` seam the frame protocol drives
//! - process-wide compositor options (algorithm, depth complexity, offscreen storage)
//! - `RasterCompositor`, the implementation for the software raster device
//!
//! A compositor leaves the device depth buffer holding, per pixel, the depth of
//! the nearest surface of the CSG composite, so that only fragments of that
//! surface pass a following `Equal` depth test.

mod error;
mod offscreen;
mod options;
mod raster;
mod resolve;

pub use error::CompositeError;
pub use options::{
    Algorithm, CompositorOptions, DepthComplexity, OffscreenType, OptionSetting, options,
    reset_options, set_option,
};
pub use raster::{DEFAULT_MAX_LAYERS, RasterCompositor};

use crate::csg::Primitive;

/// Summary of one compositing pass.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct CompositeReport {
    /// Algorithm actually run (never `Automatic`).
    pub algorithm: Algorithm,
    pub primitives: usize,
    /// Layer-count mode applied; `None` for SCS, which has no layers.
    pub depth_complexity: Option<DepthComplexity>,
    /// Most surface layers processed for any primitive.
    pub max_layers: usize,
    /// Pixels whose depth the pass brought closer.
    pub surfaces_written: usize,
}

/// Populates the depth buffer with the visible surface of a CSG composite.
///
/// `primitives` is the ordered sequence of the current scene; its order must not
/// affect the result. The color buffer and the depth function are left as found.
pub trait Compositor {
    fn composite(
        &mut self,
        primitives: &[Box<dyn Primitive>],
    ) -> Result<CompositeReport, CompositeError>;
}
