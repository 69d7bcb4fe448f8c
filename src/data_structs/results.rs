//! Cached results of analyses run outside this crate.
//!
//! Both results are defined with respect to a fixed cell sequence, so the
//! owning [`Dataset`](crate::data_structs::Dataset) drops them whenever its
//! cell axis changes.

use itertools::Itertools;
use ndarray::Array2;
use serde::{
    Deserialize,
    Serialize,
};

use crate::error::{
    DatasetError,
    Result,
};
use crate::getter_fn;

/// Dimensionality-reduction output: per-cell scores on each component.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PcaResult {
    cell_ids: Vec<String>,
    scores: Array2<f64>,
    variance_explained: Vec<f64>,
}

impl PcaResult {
    getter_fn!(scores, Array2<f64>);

    /// `scores` is cells x components; `variance_explained` has one entry per
    /// component.
    pub fn try_new(
        cell_ids: Vec<String>,
        scores: Array2<f64>,
        variance_explained: Vec<f64>,
    ) -> Result<Self> {
        let (n_cells, n_components) = scores.dim();
        if n_cells != cell_ids.len() {
            return Err(DatasetError::Shape(format!(
                "PCA scores have {n_cells} rows but {} cell identifiers",
                cell_ids.len()
            )));
        }
        if n_components != variance_explained.len() {
            return Err(DatasetError::Shape(format!(
                "PCA scores have {n_components} components but {} variance values",
                variance_explained.len()
            )));
        }
        Ok(Self {
            cell_ids,
            scores,
            variance_explained,
        })
    }

    pub fn cell_ids(&self) -> &[String] {
        &self.cell_ids
    }

    pub fn variance_explained(&self) -> &[f64] {
        &self.variance_explained
    }

    pub fn n_components(&self) -> usize {
        self.variance_explained.len()
    }
}

/// Clustering output: one label per cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterResult {
    cell_ids: Vec<String>,
    labels: Vec<String>,
}

impl ClusterResult {
    pub fn try_new(
        cell_ids: Vec<String>,
        labels: Vec<String>,
    ) -> Result<Self> {
        if cell_ids.len() != labels.len() {
            return Err(DatasetError::Shape(format!(
                "{} cell identifiers but {} cluster labels",
                cell_ids.len(),
                labels.len()
            )));
        }
        Ok(Self { cell_ids, labels })
    }

    pub fn cell_ids(&self) -> &[String] {
        &self.cell_ids
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Distinct labels in order of first appearance.
    pub fn unique_labels(&self) -> Vec<&str> {
        self.labels.iter().map(String::as_str).unique().collect()
    }
}
