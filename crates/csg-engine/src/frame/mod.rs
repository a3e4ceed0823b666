//! Two-pass CSG frame rendering.
//!
//! This module is responsible for:
//! - running the compositing pass and then the `Equal`-depth shading pass
//! - restoring the `Less` depth test on every exit path
//! - a small driver owning device, compositor and scene for a frame loop

mod driver;
mod protocol;

pub use driver::FrameDriver;
pub use protocol::{FrameError, FrameReport, render_csg_frame};
