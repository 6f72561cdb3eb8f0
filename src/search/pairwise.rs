//! Pairwise translation-offset policy.
//!
//! Every (model, space) pair is one work item, flattened as
//! `k = model_index * N + space_index`. The trial offset is the pure
//! translation `d = space.t - model.t`; the pair is accepted when
//! `translate(d) * model` matches the space transform on all 16 elements.
//!
//! Inputs need not be affine. Left-multiplying by `translate(d)` adds
//! `d * model.row(3)` to the top three rows, so for a model whose bottom row
//! is `[0, 0, 0, 1]` the translation column lands on `space.t` exactly and the
//! verdict rests on the rotation/scale block and the space's bottom row. Any
//! other bottom row spreads `d` across further elements; the full comparison
//! still decides, nothing is assumed.

use crate::domain::OffsetMatch;
use crate::math::{Transform, approx_eq, translate, translation};

/// Read-only inputs shared by every work item.
pub struct PairwiseKernel<'a> {
    pub model: &'a [Transform],
    pub space: &'a [Transform],
    pub epsilon: f64,
}

impl PairwiseKernel<'_> {
    /// Evaluate flattened pair index `k`.
    ///
    /// The pair is accepted only if every element of `translate(d) * model`
    /// is within epsilon of the space transform, whatever the bottom rows hold.
    ///
    /// Callers guarantee `space` is non-empty and `k < model.len() * space.len()`.
    pub fn evaluate(&self, k: usize) -> Option<OffsetMatch> {
        let n = self.space.len();
        let (model_index, space_index) = (k / n, k % n);

        let m = &self.model[model_index];
        let s = &self.space[space_index];

        let offset = translate(&(translation(s) - translation(m)));
        let moved = offset * m;

        approx_eq(&moved, s, self.epsilon).then_some(OffsetMatch {
            model_index,
            space_index,
            offset,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::{Isometry3, Vector3};

    #[test]
    fn decomposes_flat_index() {
        let model = vec![Transform::identity(); 2];
        let space = vec![Transform::identity(); 3];
        let kernel = PairwiseKernel {
            model: &model,
            space: &space,
            epsilon: 1e-3,
        };
        let hit = kernel.evaluate(5).unwrap();
        assert_eq!((hit.model_index, hit.space_index), (1, 2));
    }

    #[test]
    fn recovers_translation_between_rotated_poses() {
        let pose = Isometry3::new(Vector3::new(1.0, 2.0, 3.0), Vector3::new(0.3, -0.2, 0.9)).to_homogeneous();
        let d = Vector3::new(-4.0, 0.5, 7.25);
        let model = vec![pose];
        let space = vec![translate(&d) * pose];
        let kernel = PairwiseKernel {
            model: &model,
            space: &space,
            epsilon: 1e-9,
        };

        let hit = kernel.evaluate(0).unwrap();
        assert_relative_eq!(translation(&hit.offset), d, epsilon = 1e-12);
    }

    #[test]
    fn rejects_pairs_with_different_rotation() {
        let model = vec![Transform::identity()];
        let space = vec![Isometry3::new(Vector3::zeros(), Vector3::new(0.0, 0.0, 0.1)).to_homogeneous()];
        let kernel = PairwiseKernel {
            model: &model,
            space: &space,
            epsilon: 1e-3,
        };
        assert!(kernel.evaluate(0).is_none());
    }

    #[test]
    fn non_affine_bottom_row_is_compared_not_assumed() {
        // Same bottom row [0, 0, 0, 2] on both sides, but translate(d) scales
        // into the translation column, so it no longer lines up.
        let mut m = translate(&Vector3::new(1.0, 0.0, 0.0));
        m[(3, 3)] = 2.0;
        let mut s = translate(&Vector3::new(3.0, 0.0, 0.0));
        s[(3, 3)] = 2.0;

        let model = vec![m];
        let space = vec![s];
        let kernel = PairwiseKernel {
            model: &model,
            space: &space,
            epsilon: 1e-3,
        };
        assert!(kernel.evaluate(0).is_none());

        // The trial offset is read off the raw translation columns, so even a
        // space built as translate(d) * model is not recovered here.
        let d = Vector3::new(2.0, 0.0, 0.0);
        let space = vec![translate(&d) * m];
        let kernel = PairwiseKernel {
            model: &model,
            space: &space,
            epsilon: 1e-3,
        };
        assert!(kernel.evaluate(0).is_none());
    }
}
