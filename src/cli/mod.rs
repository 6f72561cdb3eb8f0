//! Command-line parsing for the offset finder.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the matching/math code.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::domain::{DEFAULT_BATCH_SIZE, DEFAULT_MAX_WORK_ITEMS, MatrixLayout, Policy};
use crate::math::DEFAULT_EPSILON;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "offsets", version, about = "Brute-force transform offset search between two matrix sets")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Search for offsets mapping the model set onto the space set and write them to JSON.
    Search(SearchArgs),
    /// Print position / orientation / scale of every transform in a matrix file.
    Inspect(InspectArgs),
    /// Write a seeded synthetic model/space pair related by one global transform.
    Generate(GenerateArgs),
}

/// Where input/output files live.
#[derive(Debug, Args, Clone)]
pub struct AssetArgs {
    /// Assets directory (defaults to `$OFFSETS_ASSETS_DIR`, then `assets`).
    #[arg(long, value_name = "DIR")]
    pub assets_dir: Option<PathBuf>,

    /// Model matrix file, relative to the assets directory.
    #[arg(long, default_value = "model.json")]
    pub model: PathBuf,

    /// Space matrix file, relative to the assets directory.
    #[arg(long, default_value = "space.json")]
    pub space: PathBuf,

    /// Ordering of flat 16-number matrix literals.
    #[arg(long, value_enum, default_value_t = MatrixLayout::RowMajor)]
    pub layout: MatrixLayout,
}

#[derive(Debug, Parser, Clone)]
pub struct SearchArgs {
    #[command(flatten)]
    pub assets: AssetArgs,

    /// Output file, relative to the assets directory (overwritten).
    #[arg(long, default_value = "offsets.json")]
    pub output: PathBuf,

    /// Offset acceptance policy.
    #[arg(long, value_enum, default_value_t = Policy::WholeSet)]
    pub policy: Policy,

    /// Absolute per-element tolerance (same units as the coordinates).
    #[arg(long, default_value_t = DEFAULT_EPSILON)]
    pub epsilon: f64,

    /// Minimum work items per parallel batch.
    #[arg(long, default_value_t = DEFAULT_BATCH_SIZE)]
    pub batch: usize,

    /// Worker threads (defaults to one per logical CPU).
    #[arg(long)]
    pub threads: Option<usize>,

    /// Refuse searches with more work items than this.
    #[arg(long, default_value_t = DEFAULT_MAX_WORK_ITEMS)]
    pub max_work_items: usize,

    /// Accepted offsets to print.
    #[arg(long, default_value_t = 20)]
    pub top: usize,
}

#[derive(Debug, Parser)]
pub struct InspectArgs {
    /// Matrix file to decompose (absolute, or relative to the assets directory).
    #[arg(value_name = "JSON")]
    pub file: PathBuf,

    /// Assets directory (defaults to `$OFFSETS_ASSETS_DIR`, then `assets`).
    #[arg(long, value_name = "DIR")]
    pub assets_dir: Option<PathBuf>,

    /// Ordering of flat 16-number matrix literals.
    #[arg(long, value_enum, default_value_t = MatrixLayout::RowMajor)]
    pub layout: MatrixLayout,
}

#[derive(Debug, Parser)]
pub struct GenerateArgs {
    #[command(flatten)]
    pub assets: AssetArgs,

    /// Number of model poses.
    #[arg(short = 'n', long, default_value_t = 32)]
    pub count: usize,

    /// Extra space poses with no model counterpart.
    #[arg(long, default_value_t = 0)]
    pub distractors: usize,

    /// Uniform per-element noise added to space poses (keep below epsilon to stay matchable).
    #[arg(long, default_value_t = 0.0)]
    pub noise: f64,

    /// Half-width of the cube that positions are drawn from.
    #[arg(long, default_value_t = 10.0)]
    pub extent: f64,

    /// Random seed.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_defaults() {
        let cli = Cli::parse_from(["offsets", "search"]);
        let Command::Search(args) = cli.command else {
            panic!("expected search");
        };
        assert_eq!(args.policy, Policy::WholeSet);
        assert_eq!(args.epsilon, DEFAULT_EPSILON);
        assert_eq!(args.assets.model, PathBuf::from("model.json"));
        assert_eq!(args.output, PathBuf::from("offsets.json"));
        assert!(args.assets.assets_dir.is_none());
    }

    #[test]
    fn search_flags() {
        let cli = Cli::parse_from([
            "offsets",
            "search",
            "--policy",
            "pairwise",
            "--epsilon",
            "0.01",
            "--layout",
            "column-major",
            "--threads",
            "2",
        ]);
        let Command::Search(args) = cli.command else {
            panic!("expected search");
        };
        assert_eq!(args.policy, Policy::Pairwise);
        assert_eq!(args.epsilon, 0.01);
        assert_eq!(args.assets.layout, MatrixLayout::ColumnMajor);
        assert_eq!(args.threads, Some(2));
    }
}
