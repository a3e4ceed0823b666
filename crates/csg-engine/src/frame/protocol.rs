use std::fmt;

use crate::compositor::{CompositeError, CompositeReport, Compositor};
use crate::device::{DepthFunc, Gpu};
use crate::scene::SceneCache;

/// What one CSG frame did on the device.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct FrameReport {
    pub primitives: usize,
    /// Draw calls issued while compositing.
    pub composite_draw_calls: u64,
    /// Draw calls issued while shading.
    pub shading_draw_calls: u64,
    /// Fragments that passed the `Equal` test and received color.
    pub fragments_shaded: u64,
    /// `None` when the frame had nothing to composite.
    pub composite: Option<CompositeReport>,
}

/// Error returned by [`render_csg_frame`].
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum FrameError {
    /// Compositing failed; nothing was shaded.
    Composite(CompositeError),
}

impl fmt::Display for FrameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FrameError::Composite(_) => f.write_str("CSG compositing pass failed"),
        }
    }
}

impl std::error::Error for FrameError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FrameError::Composite(e) => Some(e),
        }
    }
}

impl From<CompositeError> for FrameError {
    fn from(e: CompositeError) -> Self {
        FrameError::Composite(e)
    }
}

/// Renders the scene's CSG composite in two passes.
///
/// 1. Compositing: `compositor` fills the depth buffer with the visible surface.
/// 2. Shading: every primitive is drawn again, in scene order, with the depth
///    test set to `Equal`, so only fragments on that surface receive color.
///
/// The depth test is `Less` when this returns, on every path. An empty scene
/// draws nothing and does not call the compositor.
pub fn render_csg_frame<C>(
    gpu: &Gpu,
    compositor: &mut C,
    scene: &SceneCache,
) -> Result<FrameReport, FrameError>
where
    C: Compositor + ?Sized,
{
    let entry = gpu.depth_func();
    if entry != DepthFunc::Less {
        log::warn!("CSG frame entered with depth test {entry:?}; forcing Less");
        gpu.set_depth_func(DepthFunc::Less);
    }

    let primitives = scene.primitives();
    if primitives.is_empty() {
        log::trace!("empty scene: nothing to composite");
        return Ok(FrameReport::default());
    }

    // Installed before compositing so every exit path restores `Less`.
    let guard = gpu.scoped_depth_func(DepthFunc::Less);

    let before = gpu.stats();
    let composite = compositor.composite(primitives)?;
    let composited = gpu.stats();

    guard.set(DepthFunc::Equal);
    for primitive in primitives {
        primitive.render();
    }
    drop(guard);

    // A compositor may reset the device counters mid-frame.
    let shaded = gpu.stats();
    let report = FrameReport {
        primitives: primitives.len(),
        composite_draw_calls: composited.draw_calls.saturating_sub(before.draw_calls),
        shading_draw_calls: shaded.draw_calls.saturating_sub(composited.draw_calls),
        fragments_shaded: shaded
            .fragments_shaded
            .saturating_sub(composited.fragments_shaded),
        composite: Some(composite),
    };
    log::trace!("CSG frame: {report:?}");
    Ok(report)
}

#[cfg(test)]
mod tests {
    use glam::Vec3;

    use super::*;
    use crate::compositor::{Algorithm, CompositorOptions, RasterCompositor};
    use crate::coords::{OrthoView, Viewport};
    use crate::csg::{Operation, Primitive};
    use crate::device::GpuInit;
    use crate::paint::{Color, Material};

    const RED: Color = Color::rgb(1.0, 0.0, 0.0);
    const GREEN: Color = Color::rgb(0.0, 1.0, 0.0);

    fn gpu() -> Gpu {
        Gpu::new(GpuInit {
            viewport: Viewport::new(33, 33),
            view: OrthoView::looking_along(Vec3::NEG_Z, Vec3::Y, 2.0),
            ..GpuInit::default()
        })
        .unwrap()
    }

    fn compositor(gpu: &Gpu) -> RasterCompositor {
        RasterCompositor::with_options(gpu.clone(), CompositorOptions::DEFAULT)
    }

    fn is_red(c: Color) -> bool {
        c.r > 0.0 && c.g == 0.0
    }

    fn is_green(c: Color) -> bool {
        c.g > 0.0 && c.r == 0.0
    }

    /// Records calls and the depth test it saw, then hands back a fixed result.
    struct ScriptedCompositor {
        gpu: Gpu,
        calls: usize,
        depth_seen: Vec<DepthFunc>,
        fail: bool,
        reset_stats: bool,
    }

    impl ScriptedCompositor {
        fn new(gpu: &Gpu) -> Self {
            Self {
                gpu: gpu.clone(),
                calls: 0,
                depth_seen: Vec::new(),
                fail: false,
                reset_stats: false,
            }
        }
    }

    impl Compositor for ScriptedCompositor {
        fn composite(
            &mut self,
            primitives: &[Box<dyn Primitive>],
        ) -> Result<CompositeReport, CompositeError> {
            self.calls += 1;
            self.depth_seen.push(self.gpu.depth_func());
            if self.reset_stats {
                self.gpu.reset_stats();
            }
            if self.fail {
                return Err(CompositeError::UnsupportedConfiguration {
                    reason: "scripted failure".into(),
                });
            }
            Ok(CompositeReport {
                algorithm: Algorithm::Goldfeather,
                primitives: primitives.len(),
                depth_complexity: None,
                max_layers: 0,
                surfaces_written: 0,
            })
        }
    }

    fn one_sphere(gpu: &Gpu) -> SceneCache {
        let mut scene = SceneCache::new();
        scene
            .rebuild(|b| {
                b.push_display_list(gpu, Operation::Intersection, 1, |l| {
                    l.sphere(1.0);
                })
            })
            .unwrap();
        scene
    }

    #[test]
    fn empty_scene_draws_nothing() {
        let gpu = gpu();
        let scene = SceneCache::new();
        let mut c = ScriptedCompositor::new(&gpu);

        let report = render_csg_frame(&gpu, &mut c, &scene).unwrap();

        assert_eq!(report, FrameReport::default());
        assert_eq!(c.calls, 0);
        assert_eq!(gpu.stats().draw_calls, 0);
        assert!(gpu.read_color().iter().all(|&px| px == gpu.clear_color()));
        assert_eq!(gpu.depth_func(), DepthFunc::Less);
    }

    #[test]
    fn single_intersection_is_shaded_exactly_on_its_silhouette() {
        let gpu = gpu();
        let mut scene = SceneCache::new();
        scene
            .rebuild(|b| {
                b.push_display_list(&gpu, Operation::Intersection, 1, |l| {
                    l.material(Material::new(RED)).sphere(1.0);
                })
            })
            .unwrap();

        let report = render_csg_frame(&gpu, &mut compositor(&gpu), &scene).unwrap();
        assert_eq!(report.primitives, 1);
        assert_eq!(report.composite_draw_calls, 1);
        assert_eq!(report.shading_draw_calls, 1);
        assert_eq!(report.composite.map(|c| c.algorithm), Some(Algorithm::Scs));

        let viewport = gpu.viewport();
        let view = gpu.view();
        let mut covered = 0u64;
        for (x, y, _) in viewport.pixels() {
            let ray = view.ray(viewport, x, y);
            let inside = ray.origin.truncate().length() < 1.0;
            let color = gpu.color_at(x, y).unwrap();
            assert_eq!(is_red(color), inside, "pixel ({x}, {y})");
            covered += u64::from(inside);
        }
        assert_eq!(report.fragments_shaded, covered);
        assert_eq!(gpu.depth_func(), DepthFunc::Less);
    }

    #[test]
    fn subtracted_sphere_carves_the_box() {
        let gpu = gpu();
        let mut scene = SceneCache::new();
        scene
            .rebuild(|b| {
                b.push_display_list(&gpu, Operation::Intersection, 1, |l| {
                    l.material(Material::new(RED)).cube(2.0);
                })?;
                // Encloses the box's front face around the center of the image.
                b.push_display_list(&gpu, Operation::Subtraction, 1, |l| {
                    l.material(Material::new(GREEN))
                        .translate(Vec3::new(0.0, 0.0, 1.0))
                        .sphere(0.8);
                })
            })
            .unwrap();

        render_csg_frame(&gpu, &mut compositor(&gpu), &scene).unwrap();

        // Center: the box front (z = 1) is inside the sphere; the sphere's inner
        // surface at z = 0.2 is visible instead.
        let center = gpu.color_at(16, 16).unwrap();
        assert!(is_green(center), "{center:?}");
        let depth = gpu.depth_at(16, 16).unwrap();
        assert!((depth - (gpu.view().eye_distance - 0.2)).abs() < 1e-3);

        // Near the box edge, outside the sphere: the box itself.
        let edge = gpu.color_at(9, 16).unwrap();
        assert!(is_red(edge), "{edge:?}");

        // Outside the box: untouched.
        assert_eq!(gpu.color_at(0, 0), Some(gpu.clear_color()));
        assert_eq!(gpu.depth_func(), DepthFunc::Less);
    }

    #[test]
    fn failing_compositor_skips_shading_and_restores_less() {
        let gpu = gpu();
        let scene = one_sphere(&gpu);

        let mut c = ScriptedCompositor { fail: true, ..ScriptedCompositor::new(&gpu) };
        let err = render_csg_frame(&gpu, &mut c, &scene).unwrap_err();

        assert!(matches!(err, FrameError::Composite(_)));
        assert_eq!(c.calls, 1);
        assert_eq!(gpu.stats().draw_calls, 0);
        assert_eq!(gpu.depth_func(), DepthFunc::Less);
    }

    #[test]
    fn compositing_starts_with_less() {
        let gpu = gpu();
        let scene = one_sphere(&gpu);
        let mut c = ScriptedCompositor::new(&gpu);

        render_csg_frame(&gpu, &mut c, &scene).unwrap();
        assert_eq!(c.depth_seen, [DepthFunc::Less]);
    }

    #[test]
    fn entry_depth_state_is_normalized() {
        let gpu = gpu();
        let mut c = ScriptedCompositor::new(&gpu);

        gpu.set_depth_func(DepthFunc::Always);
        render_csg_frame(&gpu, &mut c, &SceneCache::new()).unwrap();
        assert_eq!(gpu.depth_func(), DepthFunc::Less);

        let scene = one_sphere(&gpu);
        gpu.set_depth_func(DepthFunc::Equal);
        render_csg_frame(&gpu, &mut c, &scene).unwrap();
        assert_eq!(c.depth_seen, [DepthFunc::Less]);
        assert_eq!(gpu.depth_func(), DepthFunc::Less);
    }

    #[test]
    fn compositor_resetting_stats_does_not_break_the_report() {
        let gpu = gpu();
        let scene = one_sphere(&gpu);
        scene.primitives()[0].render();
        assert_eq!(gpu.stats().draw_calls, 1);

        let mut c = ScriptedCompositor { reset_stats: true, ..ScriptedCompositor::new(&gpu) };
        let report = render_csg_frame(&gpu, &mut c, &scene).unwrap();

        assert_eq!(report.composite_draw_calls, 0);
        assert_eq!(report.shading_draw_calls, 1);
        assert_eq!(gpu.depth_func(), DepthFunc::Less);
    }

    #[test]
    fn depth_is_less_after_every_frame() {
        let gpu = gpu();
        let mut scene = SceneCache::new();
        let mut c = compositor(&gpu);

        for n in 0..3 {
            scene
                .rebuild(|b| {
                    for i in 0..n {
                        let x = i as f32 * 0.5;
                        b.push_display_list(&gpu, Operation::Intersection, 1, |l| {
                            l.translate(Vec3::new(x, 0.0, 0.0)).sphere(1.0);
                        })?;
                    }
                    Ok(())
                })
                .unwrap();

            gpu.clear();
            assert_eq!(gpu.depth_func(), DepthFunc::Less);
            render_csg_frame(&gpu, &mut c, &scene).unwrap();
            assert_eq!(gpu.depth_func(), DepthFunc::Less);
        }
    }

    #[test]
    fn error_exposes_its_source() {
        let err = FrameError::from(CompositeError::LayerLimitExceeded { required: 3, limit: 2 });
        let source = std::error::Error::source(&err).map(|s| s.to_string());
        assert_eq!(source.as_deref(), Some("composite needs 3 surface layers, limit is 2"));
    }
}
