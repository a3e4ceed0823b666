use anyhow::Result;

use crate::compositor::Compositor;
use crate::device::Gpu;
use crate::scene::{SceneBuilder, SceneCache};

use super::{FrameError, FrameReport, render_csg_frame};

/// Owns the device handle, the compositor and the scene for a frame loop.
///
/// Each [`frame`](Self::frame) clears the target and runs the two-pass CSG
/// render. Scene changes go through [`rebuild`](Self::rebuild) between frames.
#[derive(Debug)]
pub struct FrameDriver<C> {
    gpu: Gpu,
    compositor: C,
    scene: SceneCache,
    frames: u64,
}

impl<C: Compositor> FrameDriver<C> {
    pub fn new(gpu: Gpu, compositor: C) -> Self {
        Self {
            gpu,
            compositor,
            scene: SceneCache::new(),
            frames: 0,
        }
    }

    #[inline]
    pub fn gpu(&self) -> &Gpu {
        &self.gpu
    }

    #[inline]
    pub fn scene(&self) -> &SceneCache {
        &self.scene
    }

    #[inline]
    pub fn compositor_mut(&mut self) -> &mut C {
        &mut self.compositor
    }

    /// Frames rendered so far, failed ones included.
    #[inline]
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Replaces the scene. See [`SceneCache::rebuild`].
    pub fn rebuild<F>(&mut self, builder: F) -> Result<()>
    where
        F: FnOnce(&Gpu, &mut SceneBuilder<'_>) -> Result<()>,
    {
        let gpu = &self.gpu;
        self.scene.rebuild(|b| builder(gpu, b))
    }

    /// Clears the target and renders one CSG frame.
    pub fn frame(&mut self) -> Result<FrameReport, FrameError> {
        self.frames += 1;
        self.gpu.clear();
        render_csg_frame(&self.gpu, &mut self.compositor, &self.scene)
    }

    /// Releases the scene. Later rebuilds fail; frames render nothing.
    pub fn shutdown(&mut self) {
        self.scene.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec3;

    use super::*;
    use crate::compositor::{CompositorOptions, RasterCompositor};
    use crate::coords::Viewport;
    use crate::csg::Operation;
    use crate::device::GpuInit;
    use crate::scene::SceneError;

    fn driver() -> FrameDriver<RasterCompositor> {
        let gpu = Gpu::new(GpuInit {
            viewport: Viewport::new(17, 17),
            ..GpuInit::default()
        })
        .unwrap();
        let compositor = RasterCompositor::with_options(gpu.clone(), CompositorOptions::DEFAULT);
        FrameDriver::new(gpu, compositor)
    }

    fn two_spheres(gpu: &Gpu, b: &mut SceneBuilder<'_>) -> Result<()> {
        b.push_display_list(gpu, Operation::Intersection, 1, |l| {
            l.sphere(1.0);
        })?;
        b.push_display_list(gpu, Operation::Subtraction, 1, |l| {
            l.translate(Vec3::new(0.5, 0.0, 0.0)).sphere(0.5);
        })
    }

    #[test]
    fn frames_repeat_identically() {
        let mut d = driver();
        d.rebuild(two_spheres).unwrap();

        let first = d.frame().unwrap();
        let pixels = d.gpu().read_color();
        let second = d.frame().unwrap();

        assert_eq!(first, second);
        assert_eq!(d.gpu().read_color(), pixels);
        assert_eq!(d.frames(), 2);
    }

    #[test]
    fn rebuild_swaps_device_lists() {
        let mut d = driver();
        d.rebuild(two_spheres).unwrap();
        assert_eq!(d.gpu().live_lists(), 2);

        d.rebuild(|_, _| Ok(())).unwrap();
        assert_eq!(d.gpu().live_lists(), 0);
        assert_eq!(d.frame().unwrap().primitives, 0);
    }

    #[test]
    fn shutdown_releases_and_blocks_rebuilds() {
        let mut d = driver();
        d.rebuild(two_spheres).unwrap();
        d.shutdown();
        d.shutdown();

        assert_eq!(d.gpu().live_lists(), 0);
        let err = d.rebuild(two_spheres).unwrap_err();
        assert_eq!(err.downcast_ref::<SceneError>(), Some(&SceneError::ShutDown));
        assert_eq!(d.frame().unwrap().primitives, 0);
    }
}
