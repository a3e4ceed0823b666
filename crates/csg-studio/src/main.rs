mod scene;

use std::path::Path;

use anyhow::{Context, Result};
use glam::Vec3;

use csg_engine::compositor::RasterCompositor;
use csg_engine::coords::{OrthoView, Viewport};
use csg_engine::device::{Gpu, GpuInit};
use csg_engine::frame::FrameDriver;
use csg_engine::logging::{LoggingConfig, init_logging};

use scene::{SceneParams, build_basic};

const OUTPUT: &str = "csg-studio.png";

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    let gpu = Gpu::new(GpuInit {
        viewport: Viewport::new(800, 800),
        // Same direction as an eye at (5, 5, 10) looking at the origin.
        view: OrthoView::looking_along(Vec3::new(-5.0, -5.0, -10.0), Vec3::Y, 2.0),
        ..GpuInit::default()
    })
    .context("failed to create raster device")?;

    let compositor = RasterCompositor::new(gpu.clone());
    let mut driver = FrameDriver::new(gpu, compositor);

    let params = SceneParams::default();
    driver
        .rebuild(|gpu, b| build_basic(gpu, b, &params))
        .context("failed to build the basic scene")?;

    let report = driver.frame().context("failed to render frame")?;
    log::info!(
        "rendered {} primitives: {} composite draws, {} shading draws, {} fragments shaded",
        report.primitives,
        report.composite_draw_calls,
        report.shading_draw_calls,
        report.fragments_shaded
    );
    if let Some(composite) = report.composite {
        log::info!("compositor used {:?}", composite.algorithm);
    }

    save_png(driver.gpu(), Path::new(OUTPUT))?;
    log::info!("wrote {OUTPUT}");

    driver.shutdown();
    Ok(())
}

fn save_png(gpu: &Gpu, path: &Path) -> Result<()> {
    let Viewport { width, height } = gpu.viewport();
    let image = image::RgbaImage::from_raw(width, height, gpu.read_rgba8())
        .context("color buffer does not match the render target size")?;
    image
        .save(path)
        .with_context(|| format!("failed to write {}", path.display()))
}
