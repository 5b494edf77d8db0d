//! Dataset loading for the NEURA9 trainer.
//!
//! The expected file is comma-separated with a header row, 72 numeric
//! feature columns, and a trailing integer class label in 0-9:
//!
//! ```text
//! f0,f1,...,f71,label
//! 0.1,0.0,...,3.2,4
//! ```
//!
//! Rows that do not match the schema are rejected with the offending line
//! number rather than clipped or imputed.

use crate::error::{Neura9Error, Result};
use crate::labels::NUM_CLASSES;
use crate::primitives::Matrix;
use std::fs;
use std::path::Path;

/// Number of feature columns every sample carries.
///
/// Fixed by the on-device feature extractor; the classifier input layer is
/// sized to match.
pub const NUM_FEATURES: usize = 72;

/// Loads a dataset file into a feature matrix and a label vector.
///
/// The header row is skipped. Blank lines are ignored.
///
/// # Errors
///
/// Returns [`Neura9Error::Io`] if the file cannot be read, and
/// [`Neura9Error::MalformedRow`] for rows with the wrong field count,
/// non-numeric features, or labels outside 0-9.
///
/// # Examples
///
/// ```no_run
/// use neura9::dataset::load_dataset;
/// use std::path::Path;
///
/// let (x, y) = load_dataset(Path::new("ai/dataset/neura9_dataset.csv")).unwrap();
/// assert_eq!(x.n_cols(), 72);
/// assert_eq!(x.n_rows(), y.len());
/// ```
pub fn load_dataset(path: &Path) -> Result<(Matrix<f32>, Vec<usize>)> {
    let contents = fs::read_to_string(path)?;
    parse_dataset(&contents)
}

fn parse_dataset(contents: &str) -> Result<(Matrix<f32>, Vec<usize>)> {
    let mut features = Vec::new();
    let mut labels = Vec::new();
    let mut n_rows = 0;

    // Line 1 is the header.
    for (idx, line) in contents.lines().enumerate().skip(1) {
        let line_no = idx + 1;
        if line.trim().is_empty() {
            continue;
        }

        let fields: Vec<&str> = line.split(',').collect();
        if fields.len() != NUM_FEATURES + 1 {
            return Err(Neura9Error::MalformedRow {
                line: line_no,
                message: format!(
                    "expected {} fields, got {}",
                    NUM_FEATURES + 1,
                    fields.len()
                ),
            });
        }

        for field in &fields[..NUM_FEATURES] {
            let value: f32 = field.trim().parse().map_err(|_| Neura9Error::MalformedRow {
                line: line_no,
                message: format!("non-numeric feature value {:?}", field.trim()),
            })?;
            features.push(value);
        }

        labels.push(parse_label(fields[NUM_FEATURES], line_no)?);
        n_rows += 1;
    }

    let x = Matrix::from_vec(n_rows, NUM_FEATURES, features)
        .map_err(|e| Neura9Error::Other(e.to_string()))?;
    Ok((x, labels))
}

/// Parses the trailing label column.
///
/// Accepts integer-valued floats ("4" and "4.0" both mean class 4) since
/// upstream tools commonly write the column as a float.
fn parse_label(field: &str, line_no: usize) -> Result<usize> {
    let raw: f64 = field.trim().parse().map_err(|_| Neura9Error::MalformedRow {
        line: line_no,
        message: format!("non-numeric label {:?}", field.trim()),
    })?;
    let class = raw as i64;
    if raw.fract() != 0.0 || class < 0 || class as usize >= NUM_CLASSES {
        return Err(Neura9Error::MalformedRow {
            line: line_no,
            message: format!("label {raw} outside 0-{}", NUM_CLASSES - 1),
        });
    }
    Ok(class as usize)
}
