//! Read/write offset JSON files.
//!
//! An offset file is the portable record of one search:
//! - run metadata (policy, epsilon, input sizes, timestamp)
//! - every accepted offset with the (model, space) pair it came from
//!
//! The schema is defined by `domain::OffsetFile`.

use std::fs::File;
use std::path::Path;

use chrono::Utc;

use crate::domain::{OffsetFile, OffsetRecord};
use crate::error::AppError;
use crate::io::replace::replace_file;
use crate::math::{Transform, from_rows, to_rows};
use crate::search::SearchOutcome;

/// Build the on-disk document for a finished search.
pub fn offset_file(outcome: &SearchOutcome) -> OffsetFile {
    OffsetFile {
        tool: "offsets".to_string(),
        generated_at: Utc::now(),
        policy: outcome.policy,
        epsilon: outcome.epsilon,
        model_count: outcome.model_count,
        space_count: outcome.space_count,
        offsets: outcome
            .matches
            .iter()
            .map(|m| OffsetRecord {
                model_index: m.model_index,
                space_index: m.space_index,
                matrix: to_rows(&m.offset),
            })
            .collect(),
    }
}

impl OffsetFile {
    /// Accepted offsets in file order.
    pub fn transforms(&self) -> Vec<Transform> {
        self.offsets.iter().map(|r| from_rows(&r.matrix)).collect()
    }
}

/// Write an offset JSON file, replacing any existing file.
///
/// The previous file survives unless the new one is written completely.
pub fn write_offsets_json(path: &Path, file: &OffsetFile) -> Result<(), AppError> {
    let bytes = serde_json::to_vec_pretty(file)
        .map_err(|e| AppError::io(format!("Failed to encode offsets JSON: {e}")))?;
    replace_file(path, &bytes)
}

/// Read an offset JSON file.
pub fn read_offsets_json(path: &Path) -> Result<OffsetFile, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::load(format!("Failed to open offsets JSON '{}': {e}", path.display())))?;
    let parsed: OffsetFile =
        serde_json::from_reader(file).map_err(|e| AppError::load(format!("Invalid offsets JSON: {e}")))?;
    Ok(parsed)
}
