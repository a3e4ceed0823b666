//! CSG primitives: the operation/convexity tags and the `Primitive` trait.

mod display_list;
mod error;
mod operation;
mod primitive;

pub use display_list::DisplayListPrimitive;
pub use error::PrimitiveError;
pub use operation::{Convexity, Operation};
pub use primitive::Primitive;
