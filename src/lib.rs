//! `offset-finder` library crate.
//!
//! The binary (`offsets`) is a thin wrapper around this library so that:
//!
//! - the search engine is testable without spawning processes
//! - loaders, the engine and the pose decomposition are reusable by other
//!   front-ends (a renderer, a service, notebooks)

pub mod app;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod io;
pub mod math;
pub mod report;
pub mod search;
