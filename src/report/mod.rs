//! Reporting utilities: search summaries and pose tables for the terminal.

pub mod format;

pub use format::*;
