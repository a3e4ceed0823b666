use crate::coords::Viewport;

/// One captured surface crossing at a pixel.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Surface {
    pub depth: f32,
    pub front_facing: bool,
}

/// Per-pixel surface lists recorded while the device is in capture mode.
///
/// Captured depths are bit-identical to the depths the same draw produces when
/// it is shaded, so they can be written back for an `Equal` depth test.
#[derive(Debug, Clone, Default)]
pub struct FragmentCapture {
    viewport: Viewport,
    pixels: Vec<Vec<Surface>>,
}

impl FragmentCapture {
    pub fn new(viewport: Viewport) -> Self {
        let mut capture = Self::default();
        capture.reset(viewport);
        capture
    }

    #[inline]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Surfaces at pixel `index`, sorted front to back.
    #[inline]
    pub fn surfaces(&self, index: usize) -> &[Surface] {
        self.pixels.get(index).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn fragment_count(&self) -> usize {
        self.pixels.iter().map(Vec::len).sum()
    }

    /// Largest number of surfaces with the given facing on any single pixel.
    pub fn max_depth_complexity(&self, front_facing: bool) -> usize {
        self.pixels
            .iter()
            .map(|p| p.iter().filter(|s| s.front_facing == front_facing).count())
            .max()
            .unwrap_or(0)
    }

    /// Empties every pixel list, keeping allocations when the extent matches.
    pub(crate) fn reset(&mut self, viewport: Viewport) {
        if self.viewport != viewport {
            self.viewport = viewport;
            self.pixels = vec![Vec::new(); viewport.pixel_count()];
        } else {
            self.pixels.iter_mut().for_each(Vec::clear);
        }
    }

    #[inline]
    pub(crate) fn push(&mut self, index: usize, surface: Surface) {
        if let Some(p) = self.pixels.get_mut(index) {
            p.push(surface);
        }
    }

    pub(crate) fn finish(&mut self) {
        for p in &mut self.pixels {
            p.sort_by(|a, b| a.depth.total_cmp(&b.depth));
        }
    }
}
