//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - initializes logging and `.env` configuration
//! - parses CLI arguments
//! - runs the search / inspect / generate commands
//! - prints reports

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use clap::Parser;

use crate::cli::{AssetArgs, Command, GenerateArgs, InspectArgs, SearchArgs};
use crate::domain::{GenerateConfig, RunConfig, SearchConfig};
use crate::error::AppError;

pub mod pipeline;

/// Environment variable naming the default assets directory.
pub const ASSETS_DIR_ENV: &str = "OFFSETS_ASSETS_DIR";

/// Assets directory used when neither the flag nor the environment sets one.
pub const DEFAULT_ASSETS_DIR: &str = "assets";

/// Entry point for the `offsets` binary.
pub fn run() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    init_logging();

    let cli = crate::cli::Cli::parse();

    match cli.command {
        Command::Search(args) => handle_search(args),
        Command::Inspect(args) => handle_inspect(args),
        Command::Generate(args) => handle_generate(args),
    }
}

fn init_logging() {
    // `RUST_LOG` wins; otherwise progress messages at info go to stderr.
    let env = env_logger::Env::default().default_filter_or("info");
    let _ = env_logger::Builder::from_env(env).format_timestamp(None).try_init();
}

fn handle_search(args: SearchArgs) -> Result<(), AppError> {
    let config = run_config_from_args(&args);
    let cancel = cancel_on_ctrl_c();

    let run = pipeline::run_search(&config, &cancel)?;
    println!("{}", crate::report::format_search_summary(&run.outcome, &config));

    Ok(())
}

fn handle_inspect(args: InspectArgs) -> Result<(), AppError> {
    let path = resolve_assets_dir(args.assets_dir).join(&args.file);
    let transforms = crate::io::load_matrices(&path, args.layout)?;

    if let Some(stats) = crate::io::matrix_set_stats(&transforms) {
        print!("{}", crate::report::format_set_stats(&stats));
    }
    println!(
        "{}",
        crate::report::format_pose_table(&path.display().to_string(), &transforms)
    );
    Ok(())
}

fn handle_generate(args: GenerateArgs) -> Result<(), AppError> {
    let config = generate_config_from_args(&args);
    let dataset = pipeline::write_dataset(&config)?;

    println!(
        "Wrote {} model poses to {} and {} space poses to {}",
        dataset.model.len(),
        config.model_path.display(),
        dataset.space.len(),
        config.space_path.display()
    );
    println!("Global transform (anchor image at space[{}]):", dataset.anchor_space_index);
    print!("{}", crate::report::format_matrix(&dataset.global, "    "));

    Ok(())
}

/// Resolve the assets directory: flag, then `$OFFSETS_ASSETS_DIR`, then `assets`.
pub fn resolve_assets_dir(flag: Option<PathBuf>) -> PathBuf {
    flag.or_else(|| std::env::var_os(ASSETS_DIR_ENV).map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_ASSETS_DIR))
}

fn input_paths(assets: &AssetArgs) -> (PathBuf, PathBuf, PathBuf) {
    let dir = resolve_assets_dir(assets.assets_dir.clone());
    let model = dir.join(&assets.model);
    let space = dir.join(&assets.space);
    (dir, model, space)
}

pub fn run_config_from_args(args: &SearchArgs) -> RunConfig {
    let (dir, model_path, space_path) = input_paths(&args.assets);
    RunConfig {
        model_path,
        space_path,
        output_path: resolve_in(&dir, &args.output),
        layout: args.assets.layout,
        search: SearchConfig {
            policy: args.policy,
            epsilon: args.epsilon,
            batch_size: args.batch,
            threads: args.threads,
            max_work_items: args.max_work_items,
        },
        print_limit: args.top,
    }
}

pub fn generate_config_from_args(args: &GenerateArgs) -> GenerateConfig {
    let (_, model_path, space_path) = input_paths(&args.assets);
    GenerateConfig {
        model_path,
        space_path,
        layout: args.assets.layout,
        count: args.count,
        distractors: args.distractors,
        noise: args.noise,
        extent: args.extent,
        seed: args.seed,
    }
}

fn resolve_in(dir: &Path, file: &Path) -> PathBuf {
    // `join` keeps absolute paths as-is.
    dir.join(file)
}

/// A flag that flips to `true` on Ctrl-C.
///
/// The search checks it per work item and discards everything once it is set.
fn cancel_on_ctrl_c() -> Arc<AtomicBool> {
    let flag = Arc::new(AtomicBool::new(false));
    let handler_flag = Arc::clone(&flag);
    if let Err(e) = ctrlc::set_handler(move || handler_flag.store(true, Ordering::SeqCst)) {
        log::warn!("Ctrl-C handler not installed: {e}");
    }
    flag
}
