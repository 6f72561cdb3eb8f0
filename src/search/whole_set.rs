//! Whole-set consistency policy.
//!
//! One trial offset per space transform: `offset = space[i] * anchor⁻¹`, where
//! the anchor is model 0. The offset is accepted only if, for every model
//! transform `m`, `offset * m` lands within epsilon of *some* space transform.
//! Each work item is O(M·N), so the whole search is O(M·N²).

use crate::domain::OffsetMatch;
use crate::math::{Transform, approx_eq};

/// Index of the model transform every trial offset is anchored on.
pub const ANCHOR_INDEX: usize = 0;

/// Read-only inputs shared by every work item.
pub struct WholeSetKernel<'a> {
    pub model: &'a [Transform],
    pub space: &'a [Transform],
    pub anchor_inverse: Transform,
    pub epsilon: f64,
}

impl WholeSetKernel<'_> {
    /// Evaluate the trial offset for space index `space_index`.
    pub fn evaluate(&self, space_index: usize) -> Option<OffsetMatch> {
        let offset = self.space[space_index] * self.anchor_inverse;

        maps_whole_set(&offset, self.model, self.space, self.epsilon).then_some(OffsetMatch {
            model_index: ANCHOR_INDEX,
            space_index,
            offset,
        })
    }
}

/// True if `offset` maps every model transform onto some space transform.
pub fn maps_whole_set(offset: &Transform, model: &[Transform], space: &[Transform], epsilon: f64) -> bool {
    model.iter().all(|m| {
        let moved = offset * m;
        space.iter().any(|s| approx_eq(s, &moved, epsilon))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::translate;
    use nalgebra::Vector3;

    #[test]
    fn offset_must_cover_every_model_pose() {
        let model = vec![Transform::identity(), translate(&Vector3::new(0.0, 1.0, 0.0))];
        let shift = translate(&Vector3::new(5.0, 0.0, 0.0));

        // Only the anchor's image is present.
        let space = vec![shift];
        assert!(!maps_whole_set(&shift, &model, &space, 1e-3));

        // Both images present.
        let space = vec![shift, shift * model[1]];
        assert!(maps_whole_set(&shift, &model, &space, 1e-3));
    }

    #[test]
    fn kernel_reports_anchor_as_model_index() {
        let model = vec![Transform::identity()];
        let space = vec![Transform::identity()];
        let kernel = WholeSetKernel {
            model: &model,
            space: &space,
            anchor_inverse: Transform::identity(),
            epsilon: 1e-3,
        };
        let hit = kernel.evaluate(0).unwrap();
        assert_eq!(hit.model_index, ANCHOR_INDEX);
        assert_eq!(hit.space_index, 0);
        assert_eq!(hit.offset, Transform::identity());
    }
}
