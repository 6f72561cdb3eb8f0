//! Split a transform into position, orientation and non-uniform scale.
//!
//! This is what a renderer needs to place an object for each pose; the
//! decomposition itself is pure and knows nothing about scenes.
//!
//! Numerical notes:
//! - Scale is the length of each basis column of the 3×3 block.
//! - A negative determinant (mirroring) is folded into the x scale so the
//!   remaining basis is a proper rotation.
//! - A degenerate column (near-zero length) leaves no usable rotation; the
//!   orientation then falls back to identity.

use nalgebra::{Matrix3, Rotation3, UnitQuaternion, Vector3};

use crate::domain::PoseDecomposition;
use crate::math::transform::{Transform, translation};

/// Column length below which the basis is treated as degenerate.
const DEGENERATE_SCALE: f64 = 1e-12;

pub fn decompose(t: &Transform) -> PoseDecomposition {
    let position = translation(t);
    let basis: Matrix3<f64> = t.fixed_view::<3, 3>(0, 0).into_owned();

    let mut scale = Vector3::new(
        basis.column(0).norm(),
        basis.column(1).norm(),
        basis.column(2).norm(),
    );

    if scale.iter().any(|s| !s.is_finite() || *s < DEGENERATE_SCALE) {
        return PoseDecomposition {
            position,
            orientation: UnitQuaternion::identity(),
            scale,
        };
    }

    if basis.determinant() < 0.0 {
        scale.x = -scale.x;
    }

    let mut rot = basis;
    for c in 0..3 {
        let s = scale[c];
        rot.column_mut(c).unscale_mut(s);
    }

    let orientation = UnitQuaternion::from_rotation_matrix(&Rotation3::from_matrix_unchecked(rot));

    PoseDecomposition {
        position,
        orientation,
        scale,
    }
}
