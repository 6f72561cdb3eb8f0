use std::path::Path;
use std::sync::atomic::AtomicBool;

use nalgebra::{Isometry3, Vector3};

use offset_finder::app::pipeline::{run_search, write_dataset, write_results};
use offset_finder::domain::{GenerateConfig, MatrixLayout, Policy, RunConfig, SearchConfig};
use offset_finder::error::ErrorKind;
use offset_finder::io::read_offsets_json;
use offset_finder::math::{Transform, approx_eq, translate};
use offset_finder::search::search;

fn run_config(dir: &Path, policy: Policy) -> RunConfig {
    RunConfig {
        model_path: dir.join("model.json"),
        space_path: dir.join("space.json"),
        output_path: dir.join("offsets.json"),
        layout: MatrixLayout::RowMajor,
        search: SearchConfig::with_policy(policy),
        print_limit: 10,
    }
}

fn write_json(path: &Path, text: &str) {
    std::fs::write(path, text).unwrap();
}

#[test]
fn identity_against_two_targets_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    write_json(&dir.path().join("model.json"), "[[1,0,0,0, 0,1,0,0, 0,0,1,0, 0,0,0,1]]");
    write_json(
        &dir.path().join("space.json"),
        "[[1,0,0,0, 0,1,0,0, 0,0,1,0, 0,0,0,1], [1,0,0,1, 0,1,0,0, 0,0,1,0, 0,0,0,1]]",
    );

    let config = run_config(dir.path(), Policy::Pairwise);
    let never = AtomicBool::new(false);
    let run = run_search(&config, &never).unwrap();
    assert_eq!(run.outcome.matches.len(), 2);

    let saved = read_offsets_json(&config.output_path).unwrap();
    let pairs: Vec<_> = saved.offsets.iter().map(|r| (r.model_index, r.space_index)).collect();
    assert_eq!(pairs, vec![(0, 0), (0, 1)]);

    let transforms = saved.transforms();
    assert_eq!(transforms[0], Transform::identity());
    assert_eq!(transforms[1], translate(&Vector3::new(1.0, 0.0, 0.0)));
}

#[test]
fn generated_dataset_round_trips_through_search() {
    let dir = tempfile::tempdir().unwrap();
    let gen_config = GenerateConfig {
        model_path: dir.path().join("model.json"),
        space_path: dir.path().join("space.json"),
        layout: MatrixLayout::ColumnMajor,
        count: 12,
        distractors: 4,
        noise: 1e-7,
        extent: 5.0,
        seed: 2024,
    };
    let dataset = write_dataset(&gen_config).unwrap();

    let mut config = run_config(dir.path(), Policy::WholeSet);
    config.layout = MatrixLayout::ColumnMajor;
    let never = AtomicBool::new(false);
    let run = run_search(&config, &never).unwrap();

    assert_eq!(run.model.len(), 12);
    assert_eq!(run.space.len(), 16);

    let hit = run
        .outcome
        .matches
        .iter()
        .find(|m| m.space_index == dataset.anchor_space_index)
        .expect("anchor image accepted");
    assert!(approx_eq(&hit.offset, &dataset.global, 1e-4));

    let saved = read_offsets_json(&config.output_path).unwrap();
    assert_eq!(saved.offsets.len(), run.outcome.matches.len());
    assert_eq!(saved.model_count, 12);
}

#[test]
fn repeated_runs_write_identical_offsets() {
    let dir = tempfile::tempdir().unwrap();
    let a = Isometry3::new(Vector3::new(1.0, 2.0, 3.0), Vector3::new(0.1, 0.0, 0.4)).to_homogeneous();
    let b = Isometry3::new(Vector3::new(-1.0, 0.0, 2.0), Vector3::new(0.0, 0.9, 0.0)).to_homogeneous();
    let g = translate(&Vector3::new(0.0, 0.0, 10.0));

    let model = serde_json::to_string(&[flat(&a), flat(&b)]).unwrap();
    let space = serde_json::to_string(&[flat(&(g * b)), flat(&(g * a)), flat(&a)]).unwrap();
    write_json(&dir.path().join("model.json"), &model);
    write_json(&dir.path().join("space.json"), &space);

    let never = AtomicBool::new(false);
    for policy in [Policy::WholeSet, Policy::Pairwise] {
        let config = run_config(dir.path(), policy);
        let first = read_back(&config, &never);
        let second = read_back(&config, &never);
        assert_eq!(first, second, "{policy:?}");
        assert!(!first.is_empty());
    }
}

#[test]
fn empty_input_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    write_json(&dir.path().join("model.json"), "[]");
    write_json(&dir.path().join("space.json"), "[[1,0,0,0, 0,1,0,0, 0,0,1,0, 0,0,0,1]]");

    let config = run_config(dir.path(), Policy::WholeSet);
    let never = AtomicBool::new(false);
    let err = run_search(&config, &never).unwrap_err();

    assert_eq!(err.kind(), ErrorKind::EmptyInput);
    assert!(!config.output_path.exists());
}

#[test]
fn malformed_input_is_a_load_error() {
    let dir = tempfile::tempdir().unwrap();
    write_json(&dir.path().join("model.json"), "[[1, 2, 3]]");
    write_json(&dir.path().join("space.json"), "[]");

    let config = run_config(dir.path(), Policy::Pairwise);
    let never = AtomicBool::new(false);
    let err = run_search(&config, &never).unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Load);
    assert!(!config.output_path.exists());
}

#[test]
fn cancelled_run_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    write_json(&dir.path().join("model.json"), "[[1,0,0,0, 0,1,0,0, 0,0,1,0, 0,0,0,1]]");
    write_json(&dir.path().join("space.json"), "[[1,0,0,0, 0,1,0,0, 0,0,1,0, 0,0,0,1]]");

    let config = run_config(dir.path(), Policy::WholeSet);
    let cancelled = AtomicBool::new(true);
    let err = run_search(&config, &cancelled).unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Cancelled);
    assert!(!config.output_path.exists());
}

#[test]
fn cancel_during_load_wins_over_input_errors() {
    let dir = tempfile::tempdir().unwrap();
    write_json(&dir.path().join("model.json"), "[]");
    write_json(&dir.path().join("space.json"), "[]");

    let config = run_config(dir.path(), Policy::Pairwise);
    let cancelled = AtomicBool::new(true);
    let err = run_search(&config, &cancelled).unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Cancelled);
    assert!(!config.output_path.exists());
}

#[test]
fn cancel_after_search_skips_the_write() {
    let dir = tempfile::tempdir().unwrap();
    let config = run_config(dir.path(), Policy::Pairwise);
    let identity = vec![Transform::identity()];
    let outcome = search(&identity, &identity, &config.search).unwrap();
    assert_eq!(outcome.matches.len(), 1);

    let cancelled = AtomicBool::new(true);
    let err = write_results(&config, &outcome, &cancelled).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Cancelled);
    assert!(!config.output_path.exists());

    let never = AtomicBool::new(false);
    let written = write_results(&config, &outcome, &never).unwrap();
    assert_eq!(written.offsets.len(), 1);
    assert_eq!(read_offsets_json(&config.output_path).unwrap().offsets.len(), 1);
}

fn flat(t: &Transform) -> Vec<f64> {
    t.transpose().iter().copied().collect()
}

fn read_back(config: &RunConfig, cancel: &AtomicBool) -> Vec<(usize, usize, [[f64; 4]; 4])> {
    run_search(config, cancel).unwrap();
    read_offsets_json(&config.output_path)
        .unwrap()
        .offsets
        .into_iter()
        .map(|r| (r.model_index, r.space_index, r.matrix))
        .collect()
}
