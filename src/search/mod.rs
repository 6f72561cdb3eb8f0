//! Offset search engine.
//!
//! Responsibilities:
//!
//! - whole-set consistency policy (anchor on model 0, O(M·N²))
//! - pairwise translation-offset policy (every pair, O(M·N))
//! - parallel dispatch with pre-sized, disjoint output slots

pub mod engine;
pub mod pairwise;
pub mod whole_set;

pub use engine::*;
pub use pairwise::*;
pub use whole_set::*;
