//! Labelled square score matrices and their CSV form.

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::SimilarityError;
use crate::similarity::Weights;

/// Header of the label column.
const LABEL_HEADER: &str = "Model";

/// An N×N table of scores keyed by model id on both axes.
#[derive(Debug, Clone, PartialEq)]
pub struct SimilarityMatrix {
    labels: Vec<String>,
    values: Vec<Vec<f64>>,
}

impl SimilarityMatrix {
    /// Create a zero-filled matrix over `labels`.
    pub fn new(labels: Vec<String>) -> Self {
        let n = labels.len();
        Self {
            labels,
            values: vec![vec![0.0; n]; n],
        }
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn values(&self) -> &[Vec<f64>] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Score at `(i, j)`, or `None` when out of range.
    pub fn get(&self, i: usize, j: usize) -> Option<f64> {
        self.values.get(i).and_then(|row| row.get(j)).copied()
    }

    /// Score between two models looked up by id.
    pub fn get_by_label(&self, a: &str, b: &str) -> Option<f64> {
        let i = self.labels.iter().position(|l| l == a)?;
        let j = self.labels.iter().position(|l| l == b)?;
        self.get(i, j)
    }

    /// Write `value` at `(i, j)` and `(j, i)`. Out-of-range indices are ignored.
    pub fn set_pair(&mut self, i: usize, j: usize, value: f64) {
        let n = self.len();
        if i >= n || j >= n {
            return;
        }
        self.values[i][j] = value;
        self.values[j][i] = value;
    }

    pub fn is_symmetric(&self) -> bool {
        let n = self.len();
        (0..n).all(|i| (i + 1..n).all(|j| self.values[i][j] == self.values[j][i]))
    }

    /// Render as CSV: a `Model,<id>,...` header, then one row per model.
    pub fn to_csv_string(&self) -> String {
        let mut out = String::from(LABEL_HEADER);
        for label in &self.labels {
            out.push(',');
            out.push_str(label);
        }
        out.push('\n');

        for (label, row) in self.labels.iter().zip(&self.values) {
            out.push_str(label);
            for value in row {
                let _ = write!(out, ",{:?}", value);
            }
            out.push('\n');
        }
        out
    }

    /// Write the CSV form to `path`, creating parent directories.
    pub fn write_csv(&self, path: impl AsRef<Path>) -> Result<(), SimilarityError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| SimilarityError::io(parent, e))?;
        }
        fs::write(path, self.to_csv_string()).map_err(|e| SimilarityError::io(path, e))?;
        tracing::info!(path = %path.display(), models = self.len(), "matrix written");
        Ok(())
    }
}

/// Output path of one sweep step: `out/max_sim.csv` becomes
/// `out/max_sim_wStruct_0.3.csv`.
pub fn sweep_output_path(base: impl AsRef<Path>, weights: Weights) -> PathBuf {
    let base = base.as_ref();
    let stem = base
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let extension = base
        .extension()
        .map(|e| e.to_string_lossy().into_owned())
        .unwrap_or_else(|| "csv".to_string());

    base.with_file_name(format!(
        "{}_wStruct_{:?}.{}",
        stem, weights.structural, extension
    ))
}
