use std::sync::{PoisonError, RwLock};

/// Visible-surface algorithm used by a compositor.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub enum Algorithm {
    /// `Scs` when every primitive is convex, `Goldfeather` otherwise.
    #[default]
    Automatic,
    /// General method: handles primitives of any convexity.
    Goldfeather,
    /// Sequenced convex subtraction: fast path that is only correct for convex
    /// primitives.
    Scs,
}

/// How a layered algorithm learns how many surface layers to process.
///
/// Only Goldfeather passes consult this. SCS reduces every primitive to a single
/// interval per pixel and needs no layer count, so the mode is ignored there and
/// [`CompositeReport::depth_complexity`](super::CompositeReport) is `None`.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub enum DepthComplexity {
    /// Trust each primitive's convexity.
    #[default]
    NoDepthComplexitySampling,
    /// Process layers until a query reports an empty layer.
    OcclusionQuery,
    /// Measure the scene's depth complexity once and process that many layers.
    DepthComplexitySampling,
}

/// Storage for intermediate per-primitive results.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub enum OffscreenType {
    #[default]
    Automatic,
    /// Persistent storage reused across frames.
    FrameBufferObject,
    /// Fresh storage every frame.
    PBuffer,
}

impl OffscreenType {
    /// Concrete storage kind; `Automatic` prefers `FrameBufferObject`.
    #[inline]
    pub fn resolve(self) -> OffscreenType {
        match self {
            OffscreenType::Automatic => OffscreenType::FrameBufferObject,
            other => other,
        }
    }
}

/// Full compositor configuration.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub struct CompositorOptions {
    pub algorithm: Algorithm,
    pub depth_complexity: DepthComplexity,
    pub offscreen: OffscreenType,
}

impl CompositorOptions {
    pub const DEFAULT: CompositorOptions = CompositorOptions {
        algorithm: Algorithm::Automatic,
        depth_complexity: DepthComplexity::NoDepthComplexitySampling,
        offscreen: OffscreenType::Automatic,
    };

    /// Returns a copy with `setting` applied.
    #[must_use]
    pub fn with(mut self, setting: OptionSetting) -> Self {
        match setting {
            OptionSetting::Algorithm(a) => self.algorithm = a,
            OptionSetting::DepthComplexity(d) => self.depth_complexity = d,
            OptionSetting::Offscreen(o) => self.offscreen = o,
        }
        self
    }
}

/// A single option change for [`set_option`].
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum OptionSetting {
    Algorithm(Algorithm),
    DepthComplexity(DepthComplexity),
    Offscreen(OffscreenType),
}

static OPTIONS: RwLock<CompositorOptions> = RwLock::new(CompositorOptions::DEFAULT);

/// Changes one process-wide compositor option.
///
/// Compositors that are not pinned to explicit options read these at the start
/// of every frame.
pub fn set_option(setting: OptionSetting) {
    let mut options = OPTIONS.write().unwrap_or_else(PoisonError::into_inner);
    *options = options.with(setting);
    log::debug!("compositor option set: {setting:?}");
}

/// Current process-wide compositor options.
pub fn options() -> CompositorOptions {
    *OPTIONS.read().unwrap_or_else(PoisonError::into_inner)
}

/// Restores the process-wide options to [`CompositorOptions::DEFAULT`].
pub fn reset_options() {
    *OPTIONS.write().unwrap_or_else(PoisonError::into_inner) = CompositorOptions::DEFAULT;
}
