use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use anyhow::Result;

use crate::coords::{OrthoView, Viewport};
use crate::paint::Color;

use super::capture::{FragmentCapture, Surface};
use super::list::{CompiledSolid, DisplayList, ListBuilder, ListId};
use super::raster;
use super::{CompileError, DepthFunc, DepthFuncGuard, GpuInit};

/// Counters accumulated by the device since creation or the last
/// [`Gpu::reset_stats`].
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct GpuStats {
    /// Solids drawn, shaded or captured.
    pub draw_calls: u64,
    /// Fragments that passed the depth test and wrote color.
    pub fragments_shaded: u64,
    /// Fragments recorded while in capture mode.
    pub fragments_captured: u64,
    pub lists_compiled: u64,
    pub lists_deleted: u64,
    /// Calls or deletes naming a list that does not exist.
    pub invalid_list_ops: u64,
}

/// Software raster device.
///
/// Owns a color buffer, a depth buffer, the depth test state and a table of
/// compiled display lists. Cloning yields another handle to the same device;
/// the device is single-threaded (`!Send`).
///
/// Depth is cleared to `+inf`; the default depth function is [`DepthFunc::Less`].
#[derive(Clone)]
pub struct Gpu {
    shared: Rc<GpuShared>,
}

struct GpuShared {
    viewport: Viewport,
    view: OrthoView,
    clear_color: Color,
    max_display_lists: usize,

    state: RefCell<DeviceState>,
    lists: RefCell<ListTable>,

    /// Active capture target. While set, draws record surfaces instead of shading.
    capture: RefCell<Option<FragmentCapture>>,
}

struct DeviceState {
    color: Vec<Color>,
    depth: Vec<f32>,
    depth_func: DepthFunc,
    stats: GpuStats,
}

#[derive(Default)]
struct ListTable {
    next_id: u32,
    entries: HashMap<ListId, Rc<[CompiledSolid]>>,
}

impl Gpu {
    /// Creates a device with cleared buffers.
    pub fn new(init: GpuInit) -> Result<Self> {
        let GpuInit {
            viewport,
            view,
            clear_color,
            max_display_lists,
        } = init;

        anyhow::ensure!(viewport.is_valid(), "render target has zero size ({viewport:?})");
        anyhow::ensure!(max_display_lists > 0, "max_display_lists must be at least 1");
        anyhow::ensure!(
            view.half_height.is_finite() && view.half_height > 0.0,
            "view half height must be finite and positive, got {}",
            view.half_height
        );

        let pixels = viewport.pixel_count();
        let state = DeviceState {
            color: vec![clear_color; pixels],
            depth: vec![f32::INFINITY; pixels],
            depth_func: DepthFunc::Less,
            stats: GpuStats::default(),
        };

        log::debug!(
            "raster device created: {}x{}, {} display lists max",
            viewport.width,
            viewport.height,
            max_display_lists
        );

        Ok(Self {
            shared: Rc::new(GpuShared {
                viewport,
                view,
                clear_color,
                max_display_lists,
                state: RefCell::new(state),
                lists: RefCell::new(ListTable::default()),
                capture: RefCell::new(None),
            }),
        })
    }

    #[inline]
    pub fn viewport(&self) -> Viewport {
        self.shared.viewport
    }

    #[inline]
    pub fn view(&self) -> OrthoView {
        self.shared.view
    }

    #[inline]
    pub fn clear_color(&self) -> Color {
        self.shared.clear_color
    }

    /// Returns `true` when both handles refer to the same device.
    #[inline]
    pub fn same_device(&self, other: &Gpu) -> bool {
        Rc::ptr_eq(&self.shared, &other.shared)
    }

    /// Clears color to the configured clear color and depth to `+inf`.
    pub fn clear(&self) {
        let mut state = self.shared.state.borrow_mut();
        let clear_color = self.shared.clear_color;
        state.color.fill(clear_color);
        state.depth.fill(f32::INFINITY);
    }

    /// Clears only the depth buffer.
    pub fn clear_depth(&self) {
        self.shared.state.borrow_mut().depth.fill(f32::INFINITY);
    }

    #[inline]
    pub fn depth_func(&self) -> DepthFunc {
        self.shared.state.borrow().depth_func
    }

    #[inline]
    pub fn set_depth_func(&self, func: DepthFunc) {
        self.shared.state.borrow_mut().depth_func = func;
    }

    /// Sets `func` and returns a guard that restores the current function on drop.
    pub fn scoped_depth_func(&self, func: DepthFunc) -> DepthFuncGuard<'_> {
        let restore = self.depth_func();
        self.set_depth_func(func);
        DepthFuncGuard::new(self, restore)
    }

    /// Records and compiles a display list.
    ///
    /// Fails when the device already holds its maximum number of lists or when a
    /// recorded command is invalid. Nothing is allocated on failure.
    pub fn compile_list<F>(&self, record: F) -> Result<DisplayList, CompileError>
    where
        F: FnOnce(&mut ListBuilder),
    {
        let limit = self.shared.max_display_lists;
        if self.live_lists() >= limit {
            log::warn!("cannot compile display list: {limit} lists already live");
            return Err(CompileError::ListLimitReached { limit });
        }

        let mut builder = ListBuilder::new();
        record(&mut builder);
        let solids = builder.finish()?;
        let count = solids.len();

        let id = {
            let mut lists = self.shared.lists.borrow_mut();
            lists.next_id += 1;
            let id = ListId(lists.next_id);
            lists.entries.insert(id, solids.into());
            id
        };
        self.shared.state.borrow_mut().stats.lists_compiled += 1;

        log::trace!("compiled {id} ({count} solids)");
        Ok(DisplayList::new(id, self.clone()))
    }

    /// Number of display lists currently alive on the device.
    #[inline]
    pub fn live_lists(&self) -> usize {
        self.shared.lists.borrow().entries.len()
    }

    #[inline]
    pub fn stats(&self) -> GpuStats {
        self.shared.state.borrow().stats
    }

    pub fn reset_stats(&self) {
        self.shared.state.borrow_mut().stats = GpuStats::default();
    }

    pub fn color_at(&self, x: u32, y: u32) -> Option<Color> {
        let i = self.shared.viewport.index(x, y)?;
        Some(self.shared.state.borrow().color[i])
    }

    pub fn depth_at(&self, x: u32, y: u32) -> Option<f32> {
        let i = self.shared.viewport.index(x, y)?;
        Some(self.shared.state.borrow().depth[i])
    }

    /// Copy of the color buffer, row-major.
    pub fn read_color(&self) -> Vec<Color> {
        self.shared.state.borrow().color.clone()
    }

    /// Copy of the depth buffer, row-major.
    pub fn read_depth(&self) -> Vec<f32> {
        self.shared.state.borrow().depth.clone()
    }

    /// Overwrites the depth buffer. Ignored (with a warning) on size mismatch.
    pub fn write_depth(&self, depth: &[f32]) {
        let mut state = self.shared.state.borrow_mut();
        if depth.len() != state.depth.len() {
            log::warn!(
                "write_depth: expected {} values, got {}; ignored",
                state.depth.len(),
                depth.len()
            );
            return;
        }
        state.depth.copy_from_slice(depth);
    }

    /// Color buffer as tightly packed RGBA8 bytes, row-major.
    pub fn read_rgba8(&self) -> Vec<u8> {
        let texels: Vec<[u8; 4]> = self
            .shared
            .state
            .borrow()
            .color
            .iter()
            .map(|c| c.to_rgba8())
            .collect();
        bytemuck::cast_slice(&texels).to_vec()
    }

    /// Runs `draw` with the device in capture mode, recording every fragment
    /// into `target` instead of shading it.
    ///
    /// `target` is reset to the device extent first and sorted front to back
    /// afterwards. Color, depth and depth function are left untouched.
    pub fn capture_into<F>(&self, target: &mut FragmentCapture, draw: F)
    where
        F: FnOnce(),
    {
        target.reset(self.shared.viewport);
        let outer = self.shared.capture.replace(Some(std::mem::take(target)));

        draw();

        let captured = self.shared.capture.replace(outer);
        *target = captured.unwrap_or_default();
        target.finish();
    }

    pub(crate) fn call_list(&self, id: ListId) {
        let solids = self.shared.lists.borrow().entries.get(&id).cloned();
        let Some(solids) = solids else {
            log::warn!("call of unknown {id}");
            self.shared.state.borrow_mut().stats.invalid_list_ops += 1;
            return;
        };

        for solid in solids.iter() {
            self.draw_solid(solid);
        }
    }

    pub(crate) fn delete_list(&self, id: ListId) {
        let removed = self.shared.lists.borrow_mut().entries.remove(&id).is_some();

        let mut state = self.shared.state.borrow_mut();
        if removed {
            state.stats.lists_deleted += 1;
            log::trace!("deleted {id}");
        } else {
            state.stats.invalid_list_ops += 1;
            log::warn!("delete of unknown {id}");
        }
    }

    fn draw_solid(&self, solid: &CompiledSolid) {
        let shared = &*self.shared;
        let (viewport, view) = (shared.viewport, shared.view);

        if let Some(target) = shared.capture.borrow_mut().as_mut() {
            let mut captured = 0u64;
            raster::rasterize(solid, &view, viewport, |index, frag| {
                target.push(
                    index,
                    Surface {
                        depth: frag.depth,
                        front_facing: frag.front_facing,
                    },
                );
                captured += 1;
            });

            let mut state = shared.state.borrow_mut();
            state.stats.draw_calls += 1;
            state.stats.fragments_captured += captured;
            return;
        }

        let forward = view.forward();
        let mut state = shared.state.borrow_mut();
        let DeviceState {
            color,
            depth,
            depth_func,
            stats,
        } = &mut *state;

        let func = *depth_func;
        stats.draw_calls += 1;

        raster::rasterize(solid, &view, viewport, |index, frag| {
            if func.passes(frag.depth, depth[index]) {
                depth[index] = frag.depth;
                color[index] = solid.material.shade(frag.normal, forward);
                stats.fragments_shaded += 1;
            }
        });
    }
}

impl fmt::Debug for Gpu {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Gpu")
            .field("viewport", &self.shared.viewport)
            .field("depth_func", &self.depth_func())
            .field("live_lists", &self.live_lists())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec3;

    use super::*;
    use crate::paint::Material;

    fn small_gpu(max_display_lists: usize) -> Gpu {
        Gpu::new(GpuInit {
            viewport: Viewport::new(32, 32),
            max_display_lists,
            ..GpuInit::default()
        })
        .unwrap()
    }

    #[test]
    fn new_rejects_zero_extent() {
        let err = Gpu::new(GpuInit {
            viewport: Viewport::new(0, 32),
            ..GpuInit::default()
        })
        .unwrap_err();
        assert!(err.to_string().contains("zero size"));
    }

    #[test]
    fn fresh_device_is_cleared() {
        let gpu = small_gpu(4);
        assert_eq!(gpu.color_at(5, 5), Some(Color::BLACK));
        assert_eq!(gpu.depth_at(5, 5), Some(f32::INFINITY));
        assert_eq!(gpu.depth_func(), DepthFunc::Less);
        assert_eq!(gpu.color_at(32, 0), None);
    }

    #[test]
    fn dropping_list_deletes_it_once() {
        let gpu = small_gpu(4);
        let list = gpu.compile_list(|l| {
            l.sphere(1.0);
        })
        .unwrap();
        assert_eq!(gpu.live_lists(), 1);

        drop(list);
        assert_eq!(gpu.live_lists(), 0);
        let stats = gpu.stats();
        assert_eq!(stats.lists_compiled, 1);
        assert_eq!(stats.lists_deleted, 1);
        assert_eq!(stats.invalid_list_ops, 0);
    }

    #[test]
    fn list_limit_is_enforced_and_freed_on_drop() {
        let gpu = small_gpu(2);
        let a = gpu.compile_list(|l| {
            l.sphere(1.0);
        })
        .unwrap();
        let _b = gpu.compile_list(|l| {
            l.cube(1.0);
        })
        .unwrap();

        let err = gpu.compile_list(|l| {
            l.cube(1.0);
        })
        .unwrap_err();
        assert_eq!(err, CompileError::ListLimitReached { limit: 2 });

        drop(a);
        assert!(gpu.compile_list(|l| {
            l.cube(1.0);
        })
        .is_ok());
    }

    #[test]
    fn invalid_geometry_allocates_nothing() {
        let gpu = small_gpu(4);
        let err = gpu.compile_list(|l| {
            l.cylinder(0.0, 1.0);
        })
        .unwrap_err();
        assert!(matches!(err, CompileError::InvalidGeometry { .. }));
        assert_eq!(gpu.live_lists(), 0);
        assert_eq!(gpu.stats().lists_compiled, 0);
    }

    #[test]
    fn list_ids_are_unique_and_non_zero() {
        let gpu = small_gpu(4);
        let a = gpu.compile_list(|_| {}).unwrap();
        let b = gpu.compile_list(|_| {}).unwrap();
        assert_ne!(a.id(), b.id());
        assert!(a.id().get() > 0);
    }

    #[test]
    fn calling_a_list_shades_nearest_surface() {
        let gpu = small_gpu(4);
        let red = Material::new(Color::rgb(1.0, 0.0, 0.0));
        let list = gpu.compile_list(|l| {
            l.material(red).sphere(1.0);
        })
        .unwrap();

        list.call();

        // Center pixel sees the front of the sphere head-on.
        let center = gpu.color_at(16, 16).unwrap();
        assert!(center.r > 0.9 && center.g == 0.0);
        let depth = gpu.depth_at(16, 16).unwrap();
        assert!((depth - (gpu.view().eye_distance - 1.0)).abs() < 0.01);

        // Corner is outside the silhouette.
        assert_eq!(gpu.color_at(0, 0), Some(Color::BLACK));
        assert_eq!(gpu.stats().draw_calls, 1);
    }

    #[test]
    fn equal_depth_test_only_passes_matching_fragments() {
        let gpu = small_gpu(4);
        let list = gpu.compile_list(|l| {
            l.sphere(1.0);
        })
        .unwrap();

        // Depth stays at +inf: nothing can be equal.
        gpu.set_depth_func(DepthFunc::Equal);
        list.call();
        assert_eq!(gpu.stats().fragments_shaded, 0);

        gpu.set_depth_func(DepthFunc::Less);
        list.call();
        let first = gpu.stats().fragments_shaded;
        assert!(first > 0);

        gpu.clear();
        gpu.reset_stats();
        gpu.set_depth_func(DepthFunc::Less);
        list.call();
        let depth = gpu.read_depth();
        gpu.clear();
        gpu.write_depth(&depth);
        gpu.reset_stats();
        gpu.set_depth_func(DepthFunc::Equal);
        list.call();
        assert_eq!(gpu.stats().fragments_shaded, first);
    }

    #[test]
    fn capture_records_both_faces_without_shading() {
        let gpu = small_gpu(4);
        let list = gpu.compile_list(|l| {
            l.translate(Vec3::new(0.0, 0.0, -0.5)).cube(1.0);
        })
        .unwrap();

        let mut capture = FragmentCapture::default();
        gpu.capture_into(&mut capture, || list.call());

        let center = gpu.viewport().index(16, 16).unwrap();
        let surfaces = capture.surfaces(center);
        assert_eq!(surfaces.len(), 2);
        assert!(surfaces[0].front_facing && !surfaces[1].front_facing);
        assert!(surfaces[0].depth < surfaces[1].depth);

        assert_eq!(gpu.color_at(16, 16), Some(Color::BLACK));
        assert_eq!(gpu.depth_at(16, 16), Some(f32::INFINITY));
        assert_eq!(gpu.stats().fragments_shaded, 0);
        assert!(gpu.stats().fragments_captured > 0);
    }

    #[test]
    fn rgba8_readback_has_four_bytes_per_pixel() {
        let gpu = small_gpu(4);
        let bytes = gpu.read_rgba8();
        assert_eq!(bytes.len(), 32 * 32 * 4);
        assert_eq!(&bytes[..4], &[0, 0, 0, 255]);
    }

    #[test]
    fn write_depth_rejects_wrong_length() {
        let gpu = small_gpu(4);
        gpu.write_depth(&[1.0; 3]);
        assert_eq!(gpu.depth_at(0, 0), Some(f32::INFINITY));
    }
}
