//! Shared domain types.
//!
//! These types are intentionally kept lightweight so they can be:
//!
//! - used in-memory during the search
//! - exported to JSON
//! - reloaded later for comparisons

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use clap::ValueEnum;
use nalgebra::{UnitQuaternion, Vector3};
use serde::{Deserialize, Serialize};

use crate::math::{DEFAULT_EPSILON, Transform};

/// Offset acceptance policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Policy {
    /// Anchor on model 0; an offset is accepted only if it maps *every* model
    /// transform onto some space transform. O(M·N²).
    WholeSet,
    /// Every (model, space) pair; the offset is the pure translation between
    /// the two, accepted if it reproduces the space transform. O(M·N).
    Pairwise,
}

impl Policy {
    pub fn display_name(self) -> &'static str {
        match self {
            Policy::WholeSet => "whole-set",
            Policy::Pairwise => "pairwise",
        }
    }
}

/// How a flat 16-number matrix literal is ordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum MatrixLayout {
    RowMajor,
    ColumnMajor,
}

/// Engine settings for a single search.
#[derive(Debug, Clone)]
pub struct SearchConfig {
    pub policy: Policy,
    /// Absolute per-element tolerance (same units as the coordinates).
    pub epsilon: f64,
    /// Minimum number of consecutive work items handed to one worker.
    pub batch_size: usize,
    /// Dedicated pool size; `None` uses the global rayon pool.
    pub threads: Option<usize>,
    /// Upper bound on the flattened index space (output slots).
    pub max_work_items: usize,
}

/// Default batch granularity.
pub const DEFAULT_BATCH_SIZE: usize = 64;

/// Default cap on output slots (~67M).
pub const DEFAULT_MAX_WORK_ITEMS: usize = 1 << 26;

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            policy: Policy::WholeSet,
            epsilon: DEFAULT_EPSILON,
            batch_size: DEFAULT_BATCH_SIZE,
            threads: None,
            max_work_items: DEFAULT_MAX_WORK_ITEMS,
        }
    }
}

impl SearchConfig {
    pub fn with_policy(policy: Policy) -> Self {
        Self {
            policy,
            ..Self::default()
        }
    }
}

/// An accepted offset and the pair it was derived from.
///
/// For `Policy::WholeSet` the model index is always the anchor (0).
#[derive(Debug, Clone, PartialEq)]
pub struct OffsetMatch {
    pub model_index: usize,
    pub space_index: usize,
    pub offset: Transform,
}

/// Position / orientation / scale view of a transform, as consumed by a renderer.
#[derive(Debug, Clone, PartialEq)]
pub struct PoseDecomposition {
    pub position: Vector3<f64>,
    pub orientation: UnitQuaternion<f64>,
    pub scale: Vector3<f64>,
}

/// Summary of a loaded matrix set, shown by `inspect`.
#[derive(Debug, Clone, PartialEq)]
pub struct MatrixSetStats {
    pub count: usize,
    pub position_min: Vector3<f64>,
    pub position_max: Vector3<f64>,
    /// Transforms whose bottom row is not exactly `[0, 0, 0, 1]`.
    pub non_affine: usize,
}

/// A full search run as understood by the pipeline.
///
/// This is derived from CLI flags (plus env/defaults).
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub model_path: PathBuf,
    pub space_path: PathBuf,
    pub output_path: PathBuf,
    pub layout: MatrixLayout,
    pub search: SearchConfig,
    /// How many accepted offsets to print in the terminal summary.
    pub print_limit: usize,
}

/// Settings for the synthetic dataset generator.
#[derive(Debug, Clone)]
pub struct GenerateConfig {
    pub model_path: PathBuf,
    pub space_path: PathBuf,
    pub layout: MatrixLayout,
    /// Number of model poses (each has an image in the space set).
    pub count: usize,
    /// Extra random space poses with no model counterpart.
    pub distractors: usize,
    /// Uniform per-element noise amplitude added to space poses.
    pub noise: f64,
    /// Half-width of the cube poses and the global translation are drawn from.
    pub extent: f64,
    pub seed: u64,
}

/// One accepted offset as stored on disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OffsetRecord {
    pub model_index: usize,
    pub space_index: usize,
    /// Row-major 4×4.
    pub matrix: [[f64; 4]; 4],
}

/// A saved search result (JSON).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OffsetFile {
    pub tool: String,
    pub generated_at: DateTime<Utc>,
    pub policy: Policy,
    pub epsilon: f64,
    pub model_count: usize,
    pub space_count: usize,
    pub offsets: Vec<OffsetRecord>,
}
