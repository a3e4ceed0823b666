//! Software raster device.
//!
//! This module is responsible for:
//! - owning color/depth buffers and the depth test state
//! - compiling draw commands into display lists and deleting them (RAII handles)
//! - executing display lists, either shaded or into a fragment capture

mod capture;
mod depth;
mod error;
mod gpu;
mod init;
mod list;
mod raster;

pub use capture::{FragmentCapture, Surface};
pub use depth::{DepthFunc, DepthFuncGuard};
pub use error::CompileError;
pub use gpu::{Gpu, GpuStats};
pub use init::GpuInit;
pub use list::{DisplayList, ListBuilder, ListId};
