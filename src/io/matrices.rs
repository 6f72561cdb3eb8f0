//! Matrix-list JSON read/write.
//!
//! An input file is a JSON array of 4×4 matrices. Each element may be written as:
//!
//! - a flat array of 16 numbers, ordered per `MatrixLayout`
//! - a nested array of 4 rows of 4 numbers
//! - an object with `e00`..`e33` fields (row, column), as game engines export
//!   their matrix structs; any extra fields are ignored
//!
//! Any malformed element makes the whole file a load error; nothing is skipped.

use std::path::Path;

use nalgebra::Vector3;
use serde::Deserialize;
use serde_json::Value;

use crate::domain::{MatrixLayout, MatrixSetStats};
use crate::error::AppError;
use crate::io::replace::replace_file;
use crate::math::{Transform, from_rows, translation};

#[derive(Debug)]
enum MatrixLiteral {
    Flat(Vec<f64>),
    Nested(Vec<Vec<f64>>),
    Fields(FieldMatrix),
}

#[derive(Debug, Deserialize)]
struct FieldMatrix {
    e00: f64,
    e01: f64,
    e02: f64,
    e03: f64,
    e10: f64,
    e11: f64,
    e12: f64,
    e13: f64,
    e20: f64,
    e21: f64,
    e22: f64,
    e23: f64,
    e30: f64,
    e31: f64,
    e32: f64,
    e33: f64,
}

impl MatrixLiteral {
    /// Pick the element shape from its JSON type, keeping serde's reason on failure.
    fn from_value(item: Value) -> Result<Self, String> {
        match item {
            Value::Array(values) if values.first().is_some_and(Value::is_array) => {
                serde_json::from_value(Value::Array(values))
                    .map(MatrixLiteral::Nested)
                    .map_err(|e| format!("invalid 4×4 rows: {e}"))
            }
            Value::Array(values) => serde_json::from_value(Value::Array(values))
                .map(MatrixLiteral::Flat)
                .map_err(|e| format!("invalid 16-number array: {e}")),
            Value::Object(fields) => serde_json::from_value(Value::Object(fields))
                .map(MatrixLiteral::Fields)
                .map_err(|e| format!("invalid e00..e33 object: {e}")),
            other => Err(format!(
                "expected a 16-number array, 4×4 rows, or e00..e33 object, got {}",
                json_type(&other)
            )),
        }
    }

    fn into_transform(self, layout: MatrixLayout) -> Result<Transform, String> {
        match self {
            MatrixLiteral::Flat(values) => {
                if values.len() != 16 {
                    return Err(format!("expected 16 numbers, got {}", values.len()));
                }
                Ok(match layout {
                    MatrixLayout::RowMajor => Transform::from_row_slice(&values),
                    MatrixLayout::ColumnMajor => Transform::from_column_slice(&values),
                })
            }
            MatrixLiteral::Nested(rows) => {
                if rows.len() != 4 {
                    return Err(format!("expected 4 rows, got {}", rows.len()));
                }
                let mut out = [[0.0; 4]; 4];
                for (r, row) in rows.iter().enumerate() {
                    if row.len() != 4 {
                        return Err(format!("row {r}: expected 4 numbers, got {}", row.len()));
                    }
                    out[r].copy_from_slice(row);
                }
                Ok(from_rows(&out))
            }
            MatrixLiteral::Fields(m) => Ok(from_rows(&[
                [m.e00, m.e01, m.e02, m.e03],
                [m.e10, m.e11, m.e12, m.e13],
                [m.e20, m.e21, m.e22, m.e23],
                [m.e30, m.e31, m.e32, m.e33],
            ])),
        }
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Parse a matrix list from JSON text.
pub fn parse_matrices(text: &str, layout: MatrixLayout) -> Result<Vec<Transform>, String> {
    // Strip a UTF-8 BOM; some editors add one and serde_json rejects it.
    let text = text.trim_start_matches('\u{feff}');
    let items: Vec<Value> = serde_json::from_str(text).map_err(|e| format!("expected a JSON array: {e}"))?;

    items
        .into_iter()
        .enumerate()
        .map(|(idx, item)| {
            MatrixLiteral::from_value(item)
                .and_then(|literal| literal.into_transform(layout))
                .map_err(|e| format!("matrix #{idx}: {e}"))
        })
        .collect()
}

/// Load a matrix list file.
pub fn load_matrices(path: &Path, layout: MatrixLayout) -> Result<Vec<Transform>, AppError> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| AppError::load(format!("Failed to read matrix file '{}': {e}", path.display())))?;
    parse_matrices(&text, layout)
        .map_err(|e| AppError::load(format!("Invalid matrix file '{}': {e}", path.display())))
}

/// Write a matrix list file as flat 16-number arrays in `layout` order.
pub fn write_matrices(path: &Path, matrices: &[Transform], layout: MatrixLayout) -> Result<(), AppError> {
    let flat: Vec<Vec<f64>> = matrices
        .iter()
        .map(|m| match layout {
            MatrixLayout::RowMajor => m.transpose().iter().copied().collect(),
            MatrixLayout::ColumnMajor => m.iter().copied().collect(),
        })
        .collect();

    let bytes = serde_json::to_vec_pretty(&flat)
        .map_err(|e| AppError::io(format!("Failed to encode matrix file '{}': {e}", path.display())))?;
    replace_file(path, &bytes)
}

/// Counts and translation extents of a matrix set.
///
/// Returns `None` for an empty set or when any translation is not finite.
pub fn matrix_set_stats(transforms: &[Transform]) -> Option<MatrixSetStats> {
    let mut position_min = Vector3::repeat(f64::INFINITY);
    let mut position_max = Vector3::repeat(f64::NEG_INFINITY);
    let mut non_affine = 0;

    for t in transforms {
        let p = translation(t);
        position_min = position_min.inf(&p);
        position_max = position_max.sup(&p);
        if t.row(3).iter().copied().ne([0.0, 0.0, 0.0, 1.0]) {
            non_affine += 1;
        }
    }

    if !position_min.iter().chain(position_max.iter()).all(|x| x.is_finite()) {
        return None;
    }

    Some(MatrixSetStats {
        count: transforms.len(),
        position_min,
        position_max,
        non_affine,
    })
}
