//! Analytic solids and ray queries used by the raster device.
//!
//! Every shape here is convex, so a ray crosses it in at most one [`Span`].
//! Non-convex solids are built by compiling several shapes into one display list.

mod ray;
mod shape;

pub use ray::Ray;
pub use shape::{Hit, Shape, Span};
