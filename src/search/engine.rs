//! Offset search orchestration.
//!
//! Responsibilities:
//!
//! - validate inputs and settings before any parallel work is scheduled
//! - size the index space (N for whole-set, M·N for pairwise) with overflow checks
//! - fan out over the index space, one output slot per work item
//! - join, then either return every accepted offset in index order or, if the
//!   search was cancelled, nothing at all

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use rayon::prelude::*;

use crate::domain::{OffsetMatch, Policy, SearchConfig};
use crate::error::{AppError, ErrorKind};
use crate::math::Transform;
use crate::search::pairwise::PairwiseKernel;
use crate::search::whole_set::{ANCHOR_INDEX, WholeSetKernel};

/// Result of a completed (not cancelled) search.
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    pub policy: Policy,
    pub epsilon: f64,
    pub model_count: usize,
    pub space_count: usize,
    /// Size of the index space that was evaluated.
    pub work_items: usize,
    /// Accepted offsets, ascending by work index.
    pub matches: Vec<OffsetMatch>,
    pub elapsed: Duration,
}

/// Run a search that cannot be cancelled.
pub fn search(model: &[Transform], space: &[Transform], config: &SearchConfig) -> Result<SearchOutcome, AppError> {
    let never = AtomicBool::new(false);
    search_with_cancel(model, space, config, &never)
}

/// Run a search that aborts as a whole once `cancel` is set.
///
/// Work items check the flag before evaluating; after the join the flag is read
/// again and any cancellation discards every slot.
pub fn search_with_cancel(
    model: &[Transform],
    space: &[Transform],
    config: &SearchConfig,
    cancel: &AtomicBool,
) -> Result<SearchOutcome, AppError> {
    validate_config(config)?;
    let work_items = work_space_size(config.policy, model.len(), space.len(), config.max_work_items)?;

    log::debug!(
        "search: policy={} model={} space={} work_items={} batch={} threads={:?}",
        config.policy.display_name(),
        model.len(),
        space.len(),
        work_items,
        config.batch_size,
        config.threads
    );

    let started = Instant::now();
    let slots = match config.policy {
        Policy::WholeSet => {
            let anchor = &model[ANCHOR_INDEX];
            let anchor_inverse = anchor.try_inverse().ok_or_else(|| {
                AppError::new(
                    ErrorKind::SingularAnchor,
                    "Anchor model transform (index 0) is not invertible.",
                )
            })?;
            let kernel = WholeSetKernel {
                model,
                space,
                anchor_inverse,
                epsilon: config.epsilon,
            };
            run_parallel(config, work_items, cancel, |i| kernel.evaluate(i))?
        }
        Policy::Pairwise => {
            let kernel = PairwiseKernel {
                model,
                space,
                epsilon: config.epsilon,
            };
            run_parallel(config, work_items, cancel, |k| kernel.evaluate(k))?
        }
    };
    let elapsed = started.elapsed();

    let matches: Vec<OffsetMatch> = slots.into_iter().flatten().collect();

    log::info!(
        "search finished: {} accepted of {} candidates in {:.1?}",
        matches.len(),
        work_items,
        elapsed
    );

    Ok(SearchOutcome {
        policy: config.policy,
        epsilon: config.epsilon,
        model_count: model.len(),
        space_count: space.len(),
        work_items,
        matches,
        elapsed,
    })
}

fn validate_config(config: &SearchConfig) -> Result<(), AppError> {
    if !(config.epsilon.is_finite() && config.epsilon >= 0.0) {
        return Err(AppError::config(format!(
            "Invalid epsilon: {} (must be finite and >= 0).",
            config.epsilon
        )));
    }
    if config.batch_size == 0 {
        return Err(AppError::config("Batch size must be >= 1."));
    }
    if config.threads == Some(0) {
        return Err(AppError::config("Thread count must be >= 1."));
    }
    Ok(())
}

/// Number of output slots for `policy`, rejecting empty inputs and oversized
/// index spaces before anything is allocated.
pub fn work_space_size(policy: Policy, model_len: usize, space_len: usize, cap: usize) -> Result<usize, AppError> {
    if model_len == 0 || space_len == 0 {
        return Err(AppError::new(
            ErrorKind::EmptyInput,
            format!("No input: model set has {model_len} transforms, space set has {space_len}."),
        ));
    }

    let size = match policy {
        Policy::WholeSet => Some(space_len),
        Policy::Pairwise => model_len.checked_mul(space_len),
    };

    match size {
        Some(n) if n <= cap => Ok(n),
        Some(n) => Err(AppError::new(
            ErrorKind::WorkSpaceTooLarge,
            format!("Search needs {n} work items; the limit is {cap}."),
        )),
        None => Err(AppError::new(
            ErrorKind::WorkSpaceTooLarge,
            format!("Pair index space {model_len}×{space_len} overflows usize."),
        )),
    }
}

fn run_parallel<F>(
    config: &SearchConfig,
    work_items: usize,
    cancel: &AtomicBool,
    evaluate: F,
) -> Result<Vec<Option<OffsetMatch>>, AppError>
where
    F: Fn(usize) -> Option<OffsetMatch> + Sync,
{
    let fan_out = || {
        (0..work_items)
            .into_par_iter()
            .with_min_len(config.batch_size)
            .map(|idx| {
                if cancel.load(Ordering::Relaxed) {
                    return None;
                }
                evaluate(idx)
            })
            .collect::<Vec<_>>()
    };

    let slots = match config.threads {
        Some(n) => rayon::ThreadPoolBuilder::new()
            .num_threads(n)
            .build()
            .map_err(|e| AppError::config(format!("Failed to build thread pool: {e}")))?
            .install(fan_out),
        None => fan_out(),
    };

    if cancel.load(Ordering::SeqCst) {
        return Err(AppError::new(
            ErrorKind::Cancelled,
            "Search cancelled; no offsets were produced.",
        ));
    }

    Ok(slots)
}
