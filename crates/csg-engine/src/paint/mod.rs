//! Colors and materials written into the device color buffer.
//!
//! Geometry types live in `geometry`; view types in `coords`.

mod color;
mod material;

pub use color::Color;
pub use material::Material;
