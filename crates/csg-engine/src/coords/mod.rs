//! Image-space types: pixel extents and the view that maps pixels to rays.
//!
//! Canonical pixel space:
//! - origin top-left
//! - +X right, +Y down
//! - row-major buffers

mod view;
mod viewport;

pub use view::OrthoView;
pub use viewport::Viewport;
