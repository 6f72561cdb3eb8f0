//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - configuration enums and structs (`Policy`, `MatrixLayout`, `SearchConfig`, `RunConfig`)
//! - search outputs (`OffsetMatch`)
//! - the on-disk result schema (`OffsetFile`)

pub mod types;

pub use types::*;
