//! Scene cache: the ordered primitive sequence rendered each frame.
//!
//! Responsibilities:
//! - own every primitive (and through it, every display list) of the current scene
//! - replace the whole sequence on scene change, releasing the previous one first
//! - keep partially built sequences tracked so nothing is leaked on failure

mod builder;
mod cache;
mod error;

pub use builder::SceneBuilder;
pub use cache::SceneCache;
pub use error::SceneError;
