//! CSG engine crate.
//!
//! Scene management and two-pass image-based CSG rendering on a software
//! raster device: display-list backed primitives, a scene cache that owns
//! them, compositors that resolve the visible CSG surface into the depth
//! buffer, and the frame protocol that shades exactly that surface.

pub mod compositor;
pub mod coords;
pub mod csg;
pub mod device;
pub mod frame;
pub mod geometry;
pub mod logging;
pub mod paint;
pub mod scene;
