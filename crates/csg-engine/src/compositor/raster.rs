use crate::csg::{Operation, Primitive};
use crate::device::{FragmentCapture, Gpu, Surface};

use super::offscreen::OffscreenPool;
use super::resolve::{self, Composite};
use super::{
    Algorithm, CompositeError, CompositeReport, Compositor, CompositorOptions, DepthComplexity,
};

/// Layers a layered pass can address by default (an 8-bit counter).
pub const DEFAULT_MAX_LAYERS: usize = 255;

/// Compositor running on the software raster device.
///
/// Every primitive is captured into its own offscreen target, the visible CSG
/// surface is resolved per pixel, and the result is merged into the device depth
/// buffer with a `Less` comparison. The color buffer is never touched.
#[derive(Debug)]
pub struct RasterCompositor {
    gpu: Gpu,
    pinned: Option<CompositorOptions>,
    max_layers: usize,
    pool: OffscreenPool,
}

impl RasterCompositor {
    /// Compositor following the process-wide options.
    pub fn new(gpu: Gpu) -> Self {
        Self {
            gpu,
            pinned: None,
            max_layers: DEFAULT_MAX_LAYERS,
            pool: OffscreenPool::default(),
        }
    }

    /// Compositor pinned to `options`, ignoring the process-wide ones.
    pub fn with_options(gpu: Gpu, options: CompositorOptions) -> Self {
        Self {
            pinned: Some(options),
            ..Self::new(gpu)
        }
    }

    /// Pins (`Some`) or unpins (`None`) the options.
    pub fn pin_options(&mut self, options: Option<CompositorOptions>) {
        self.pinned = options;
    }

    /// Options the next frame will use.
    pub fn effective_options(&self) -> CompositorOptions {
        self.pinned.unwrap_or_else(super::options)
    }

    /// Limits the number of surface layers a Goldfeather pass may process.
    #[must_use]
    pub fn with_max_layers(mut self, max_layers: usize) -> Self {
        self.max_layers = max_layers;
        self
    }

    #[inline]
    pub fn gpu(&self) -> &Gpu {
        &self.gpu
    }

    /// Offscreen targets allocated so far.
    #[inline]
    pub fn offscreen_allocations(&self) -> u64 {
        self.pool.allocations()
    }

    fn select_algorithm(
        options: &CompositorOptions,
        primitives: &[Box<dyn Primitive>],
    ) -> Result<Algorithm, CompositeError> {
        let all_convex = primitives.iter().all(|p| p.convexity().is_convex());
        match options.algorithm {
            Algorithm::Automatic if all_convex => Ok(Algorithm::Scs),
            Algorithm::Automatic => Ok(Algorithm::Goldfeather),
            Algorithm::Scs if !all_convex => Err(CompositeError::UnsupportedConfiguration {
                reason: "the SCS algorithm requires every primitive to be convex".into(),
            }),
            explicit => Ok(explicit),
        }
    }

    /// Per-primitive layer counts for a Goldfeather pass.
    fn layer_counts(
        depth_complexity: DepthComplexity,
        primitives: &[Box<dyn Primitive>],
        captures: &[FragmentCapture],
    ) -> Vec<usize> {
        let wanted = |i: usize| {
            captures[i].max_depth_complexity(primitives[i].operation().shows_front_faces())
        };

        match depth_complexity {
            DepthComplexity::NoDepthComplexitySampling => primitives
                .iter()
                .map(|p| p.convexity().get() as usize)
                .collect(),
            DepthComplexity::OcclusionQuery => (0..primitives.len()).map(wanted).collect(),
            DepthComplexity::DepthComplexitySampling => {
                let sampled = (0..primitives.len()).map(wanted).max().unwrap_or(0);
                vec![sampled; primitives.len()]
            }
        }
    }
}

impl Compositor for RasterCompositor {
    fn composite(
        &mut self,
        primitives: &[Box<dyn Primitive>],
    ) -> Result<CompositeReport, CompositeError> {
        let options = self.effective_options();
        let algorithm = Self::select_algorithm(&options, primitives)?;

        let captures = self.pool.acquire(options.offscreen, primitives.len());
        for (primitive, capture) in primitives.iter().zip(captures.iter_mut()) {
            self.gpu.capture_into(capture, || primitive.render());
        }

        let layers = match algorithm {
            Algorithm::Goldfeather => {
                let layers = Self::layer_counts(options.depth_complexity, primitives, captures);
                let required = layers.iter().copied().max().unwrap_or(0);
                if required > self.max_layers {
                    log::warn!(
                        "goldfeather pass needs {required} layers, limit is {}",
                        self.max_layers
                    );
                    return Err(CompositeError::LayerLimitExceeded {
                        required,
                        limit: self.max_layers,
                    });
                }
                layers
            }
            _ => vec![1; primitives.len()],
        };

        let ops: Vec<Operation> = primitives.iter().map(|p| p.operation()).collect();
        let composite = Composite::new(&ops);
        let mut depth = self.gpu.read_depth();
        let mut surfaces_written = 0usize;
        let mut per_pixel: Vec<&[Surface]> = Vec::with_capacity(captures.len());

        for (index, stored) in depth.iter_mut().enumerate() {
            per_pixel.clear();
            per_pixel.extend(captures.iter().map(|c| c.surfaces(index)));

            let nearest = match algorithm {
                Algorithm::Goldfeather => resolve::goldfeather(&composite, &per_pixel, &layers),
                _ => resolve::scs(&composite, &per_pixel),
            };

            if let Some(z) = nearest.filter(|z| *z < *stored) {
                *stored = z;
                surfaces_written += 1;
            }
        }

        self.gpu.write_depth(&depth);

        let report = CompositeReport {
            algorithm,
            primitives: primitives.len(),
            depth_complexity: (algorithm == Algorithm::Goldfeather)
                .then_some(options.depth_complexity),
            max_layers: layers.iter().copied().max().unwrap_or(0),
            surfaces_written,
        };
        log::debug!("composited {report:?}");
        Ok(report)
    }
}
