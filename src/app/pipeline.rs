//! Shared "search pipeline" logic used by the CLI commands and integration tests.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! load model -> load space -> search (parallel) -> write offsets
//!
//! Loading and writing are sequential and happen strictly before and after the
//! parallel phase. Nothing is written if any step before it fails.
//!
//! The cancel flag is checked after loading, by the search itself, and once more
//! right before writing, so Ctrl-C at any point leaves the output untouched.

use std::sync::atomic::{AtomicBool, Ordering};

use crate::data::{SyntheticDataset, generate_dataset};
use crate::domain::{GenerateConfig, OffsetFile, RunConfig};
use crate::error::{AppError, ErrorKind};
use crate::io::{load_matrices, offset_file, write_matrices, write_offsets_json};
use crate::math::Transform;
use crate::search::{SearchOutcome, search_with_cancel};

/// All computed outputs of a single `offsets search` run.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub model: Vec<Transform>,
    pub space: Vec<Transform>,
    pub outcome: SearchOutcome,
    pub written: OffsetFile,
}

/// Load both matrix sets named by `config`.
pub fn load_inputs(config: &RunConfig) -> Result<(Vec<Transform>, Vec<Transform>), AppError> {
    let model = load_matrices(&config.model_path, config.layout)?;
    log::info!("loaded {} model transforms from {}", model.len(), config.model_path.display());

    let space = load_matrices(&config.space_path, config.layout)?;
    log::info!("loaded {} space transforms from {}", space.len(), config.space_path.display());

    Ok((model, space))
}

/// Execute the full search pipeline and return the computed outputs.
pub fn run_search(config: &RunConfig, cancel: &AtomicBool) -> Result<RunOutput, AppError> {
    let (model, space) = load_inputs(config)?;
    ensure_not_cancelled(cancel)?;

    let outcome = search_with_cancel(&model, &space, &config.search, cancel)?;
    let written = write_results(config, &outcome, cancel)?;

    Ok(RunOutput {
        model,
        space,
        outcome,
        written,
    })
}

/// Serialize a finished search to `config.output_path`, unless cancelled first.
pub fn write_results(config: &RunConfig, outcome: &SearchOutcome, cancel: &AtomicBool) -> Result<OffsetFile, AppError> {
    let written = offset_file(outcome);
    ensure_not_cancelled(cancel)?;

    write_offsets_json(&config.output_path, &written)?;
    log::info!(
        "wrote {} offsets to {}",
        written.offsets.len(),
        config.output_path.display()
    );

    Ok(written)
}

fn ensure_not_cancelled(cancel: &AtomicBool) -> Result<(), AppError> {
    if cancel.load(Ordering::SeqCst) {
        return Err(AppError::new(
            ErrorKind::Cancelled,
            "Run cancelled; no offsets were written.",
        ));
    }
    Ok(())
}

/// Generate a synthetic dataset and write both matrix files.
pub fn write_dataset(config: &GenerateConfig) -> Result<SyntheticDataset, AppError> {
    let dataset = generate_dataset(config)?;

    for path in [&config.model_path, &config.space_path] {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| {
                AppError::io(format!("Failed to create directory '{}': {e}", parent.display()))
            })?;
        }
    }

    write_matrices(&config.model_path, &dataset.model, config.layout)?;
    write_matrices(&config.space_path, &dataset.space, config.layout)?;
    log::info!(
        "wrote {} model / {} space transforms (anchor image at space[{}])",
        dataset.model.len(),
        dataset.space.len(),
        dataset.anchor_space_index
    );

    Ok(dataset)
}
