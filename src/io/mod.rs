//! Input/output helpers.
//!
//! - matrix-list JSON load/write (`matrices`)
//! - offset result JSON read/write (`offsets`)
//! - whole-file replacement shared by both writers (`replace`)

pub mod matrices;
pub mod offsets;
pub mod replace;

pub use matrices::*;
pub use offsets::*;
