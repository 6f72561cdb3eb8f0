//! Mathematical utilities: transforms, tolerance comparison and pose decomposition.

pub mod decompose;
pub mod transform;

pub use decompose::*;
pub use transform::*;
