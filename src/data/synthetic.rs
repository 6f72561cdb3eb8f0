//! Seeded synthetic model/space datasets.
//!
//! The space set is the model set moved by one global rigid transform, with
//! optional bounded noise and distractor poses, then shuffled. Because the
//! ground truth is known, the output is handy for demos and for checking that
//! the whole-set policy recovers the global transform.

use std::f64::consts::PI;

use nalgebra::{Isometry3, Matrix4, Vector3};
use rand::prelude::*;
use rand::rngs::StdRng;

use crate::domain::GenerateConfig;
use crate::error::AppError;
use crate::math::Transform;

/// Range of per-axis scale factors for model poses.
const SCALE_RANGE: std::ops::RangeInclusive<f64> = 0.5..=2.0;

#[derive(Debug, Clone)]
pub struct SyntheticDataset {
    pub model: Vec<Transform>,
    pub space: Vec<Transform>,
    /// The rigid transform applied to every model pose.
    pub global: Transform,
    /// Where the anchor's image (model 0) ended up after shuffling.
    pub anchor_space_index: usize,
}

pub fn generate_dataset(config: &GenerateConfig) -> Result<SyntheticDataset, AppError> {
    if config.count == 0 {
        return Err(AppError::config("Pose count must be > 0."));
    }
    if !(config.noise.is_finite() && config.noise >= 0.0) {
        return Err(AppError::config("Noise must be finite and >= 0."));
    }
    if !(config.extent.is_finite() && config.extent > 0.0) {
        return Err(AppError::config("Extent must be finite and > 0."));
    }

    let mut rng = StdRng::seed_from_u64(config.seed);

    let model: Vec<Transform> = (0..config.count)
        .map(|_| {
            let scale = Vector3::new(
                rng.gen_range(SCALE_RANGE),
                rng.gen_range(SCALE_RANGE),
                rng.gen_range(SCALE_RANGE),
            );
            random_rigid(&mut rng, config.extent) * Matrix4::new_nonuniform_scaling(&scale)
        })
        .collect();

    let global = random_rigid(&mut rng, config.extent);

    // Tag each space pose with its source model index (None for distractors).
    let mut tagged: Vec<(Option<usize>, Transform)> = model
        .iter()
        .enumerate()
        .map(|(i, m)| (Some(i), add_noise(&mut rng, global * m, config.noise)))
        .collect();
    for _ in 0..config.distractors {
        tagged.push((None, random_rigid(&mut rng, config.extent)));
    }
    tagged.shuffle(&mut rng);

    let anchor_space_index = tagged
        .iter()
        .position(|(src, _)| *src == Some(0))
        .unwrap_or_default();
    let space = tagged.into_iter().map(|(_, t)| t).collect();

    Ok(SyntheticDataset {
        model,
        space,
        global,
        anchor_space_index,
    })
}

fn random_rigid(rng: &mut StdRng, extent: f64) -> Transform {
    let translation = Vector3::new(
        rng.gen_range(-extent..=extent),
        rng.gen_range(-extent..=extent),
        rng.gen_range(-extent..=extent),
    );
    let axis = random_unit_vector(rng);
    let angle = rng.gen_range(-PI..PI);
    Isometry3::new(translation, axis * angle).to_homogeneous()
}

fn random_unit_vector(rng: &mut StdRng) -> Vector3<f64> {
    loop {
        let v = Vector3::new(
            rng.gen_range(-1.0..=1.0),
            rng.gen_range(-1.0..=1.0),
            rng.gen_range(-1.0..=1.0),
        );
        let norm = v.norm();
        if norm > 1e-3 && norm <= 1.0 {
            return v / norm;
        }
    }
}

/// Uniform noise on the top three rows; the bottom row stays exact.
fn add_noise(rng: &mut StdRng, mut t: Transform, amplitude: f64) -> Transform {
    if amplitude == 0.0 {
        return t;
    }
    for r in 0..3 {
        for c in 0..4 {
            t[(r, c)] += rng.gen_range(-amplitude..=amplitude);
        }
    }
    t
}
