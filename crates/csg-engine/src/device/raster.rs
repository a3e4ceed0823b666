use glam::Vec3;

use crate::coords::{OrthoView, Viewport};

use super::list::CompiledSolid;

/// Fragment generated by rasterizing one solid at one pixel.
#[derive(Debug, Copy, Clone)]
pub(crate) struct Fragment {
    pub depth: f32,
    /// World-space unit normal.
    pub normal: Vec3,
    pub front_facing: bool,
}

/// Emits every front and back face fragment of `solid`, pixel by pixel.
///
/// Faces behind the eye plane are clipped. Depth is the ray parameter, which is
/// a pure function of `(solid, view, pixel)`.
pub(crate) fn rasterize(
    solid: &CompiledSolid,
    view: &OrthoView,
    viewport: Viewport,
    mut emit: impl FnMut(usize, Fragment),
) {
    for (x, y, index) in viewport.pixels() {
        let ray = view.ray(viewport, x, y).transformed(&solid.world_to_object);
        let Some(span) = solid.shape.intersect(&ray) else {
            continue;
        };

        for (hit, front_facing) in [(span.enter, true), (span.exit, false)] {
            if hit.t < 0.0 {
                continue;
            }
            emit(
                index,
                Fragment {
                    depth: hit.t,
                    normal: (solid.normal_matrix * hit.normal).normalize_or_zero(),
                    front_facing,
                },
            );
        }
    }
}
