//! 4×4 homogeneous transforms and the tolerance model used to compare them.
//!
//! Convention: column vectors, so a transform maps `p' = T * p` and the
//! translation lives in column 3 (rows 0..3). Composition `a * b` applies `b`
//! first.
//!
//! Equality is always approximate: two transforms are "equal" when every one of
//! the 16 elements differs by at most `epsilon` in absolute terms. There is no
//! relative/normalized error, so `epsilon` has the same units as the
//! coordinates in use.

use nalgebra::{Matrix4, Vector3};

/// Homogeneous rigid/affine transform.
pub type Transform = Matrix4<f64>;

/// Default absolute per-element tolerance.
pub const DEFAULT_EPSILON: f64 = 0.001;

/// Element-wise absolute comparison of two transforms.
///
/// Any non-finite difference (NaN or ±Inf on either side) counts as a
/// mismatch, so NaN inputs can never be accepted.
pub fn approx_eq(a: &Transform, b: &Transform, epsilon: f64) -> bool {
    a.iter().zip(b.iter()).all(|(&x, &y)| within(x, y, epsilon))
}

#[inline]
fn within(a: f64, b: f64, epsilon: f64) -> bool {
    let diff = (a - b).abs();
    diff.is_finite() && diff <= epsilon
}

/// Translation component (column 3, rows 0..3).
pub fn translation(t: &Transform) -> Vector3<f64> {
    Vector3::new(t[(0, 3)], t[(1, 3)], t[(2, 3)])
}

/// Pure translation transform.
pub fn translate(d: &Vector3<f64>) -> Transform {
    Transform::new_translation(d)
}

/// Row-major 4×4 literal, as written to JSON.
pub fn to_rows(t: &Transform) -> [[f64; 4]; 4] {
    let mut rows = [[0.0; 4]; 4];
    for (r, row) in rows.iter_mut().enumerate() {
        for (c, v) in row.iter_mut().enumerate() {
            *v = t[(r, c)];
        }
    }
    rows
}

/// Build a transform from row-major rows.
pub fn from_rows(rows: &[[f64; 4]; 4]) -> Transform {
    Transform::from_fn(|r, c| rows[r][c])
}
