use itertools::Itertools;
use ndarray::{
    Array2,
    Axis,
};
use polars::prelude::*;

use crate::data_structs::schema::GeneInfoColumns;
use crate::error::{
    DatasetError,
    Result,
};
use crate::{
    getter_fn,
    plsmallstr,
};

/// Dense expression matrix with genes on rows and cells on columns.
///
/// Row and column labels are kept alongside the values so that slicing by
/// position always carries the identifiers with it.
#[derive(Debug, Clone, PartialEq)]
pub struct ExprMatrix {
    values: Array2<f64>,
    gene_ids: Vec<String>,
    cell_ids: Vec<String>,
}

/// Requested representation of the expression matrix.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Default)]
pub enum ExprFormat {
    /// Labeled [`ExprMatrix`].
    #[default]
    Matrix,
    /// [`DataFrame`] with a gene identifier column and one column per cell.
    DataFrame,
}

/// Expression matrix in the representation requested by [`ExprFormat`].
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    Matrix(ExprMatrix),
    DataFrame(DataFrame),
}

impl ExprMatrix {
    getter_fn!(values, Array2<f64>);

    /// Creates a matrix, checking that labels match both dimensions.
    pub fn try_new(
        values: Array2<f64>,
        gene_ids: Vec<String>,
        cell_ids: Vec<String>,
    ) -> Result<Self> {
        let (n_genes, n_cells) = values.dim();
        if n_genes != gene_ids.len() {
            return Err(DatasetError::Shape(format!(
                "matrix has {n_genes} rows but {} gene identifiers",
                gene_ids.len()
            )));
        }
        if n_cells != cell_ids.len() {
            return Err(DatasetError::Shape(format!(
                "matrix has {n_cells} columns but {} cell identifiers",
                cell_ids.len()
            )));
        }
        Ok(Self {
            values,
            gene_ids,
            cell_ids,
        })
    }

    /// Creates a matrix from gene-major rows.
    pub fn from_rows(
        rows: Vec<Vec<f64>>,
        gene_ids: Vec<String>,
        cell_ids: Vec<String>,
    ) -> Result<Self> {
        let n_cells = cell_ids.len();
        if let Some((gene, row)) = rows
            .iter()
            .enumerate()
            .find(|(_, r)| r.len() != n_cells)
        {
            return Err(DatasetError::Shape(format!(
                "row {gene} has {} values, expected {n_cells}",
                row.len()
            )));
        }
        let flat = rows.into_iter().flatten().collect_vec();
        let values = Array2::from_shape_vec((gene_ids.len(), n_cells), flat)
            .map_err(|e| DatasetError::Shape(e.to_string()))?;
        Self::try_new(values, gene_ids, cell_ids)
    }

    pub fn gene_ids(&self) -> &[String] {
        &self.gene_ids
    }

    pub fn cell_ids(&self) -> &[String] {
        &self.cell_ids
    }

    pub fn n_genes(&self) -> usize {
        self.gene_ids.len()
    }

    pub fn n_cells(&self) -> usize {
        self.cell_ids.len()
    }

    /// Value for a gene and cell pair, looked up by identifier.
    pub fn get(
        &self,
        gene_id: &str,
        cell_id: &str,
    ) -> Option<f64> {
        let row = self.gene_ids.iter().position(|g| g == gene_id)?;
        let column = self.cell_ids.iter().position(|c| c == cell_id)?;
        self.values.get((row, column)).copied()
    }

    /// Keeps the given columns in the given order. Row order is preserved.
    pub fn select_cells(
        &self,
        columns: &[usize],
    ) -> Self {
        Self {
            values: self.values.select(Axis(1), columns),
            gene_ids: self.gene_ids.clone(),
            cell_ids: columns
                .iter()
                .map(|&c| self.cell_ids[c].clone())
                .collect(),
        }
    }

    /// Keeps the given rows in the given order. Column order is preserved.
    pub fn select_genes(
        &self,
        rows: &[usize],
    ) -> Self {
        Self {
            values: self.values.select(Axis(0), rows),
            gene_ids: rows
                .iter()
                .map(|&r| self.gene_ids[r].clone())
                .collect(),
            cell_ids: self.cell_ids.clone(),
        }
    }

    /// Tabular view: a gene identifier column followed by one `f64` column
    /// per cell, in matrix order.
    pub fn to_frame(&self) -> PolarsResult<DataFrame> {
        let mut columns = Vec::with_capacity(self.n_cells() + 1);
        columns.push(Column::new(
            plsmallstr!(GeneInfoColumns::GeneId.as_str()),
            self.gene_ids.as_slice(),
        ));
        for (cell_id, values) in self
            .cell_ids
            .iter()
            .zip(self.values.columns())
        {
            columns.push(Column::new(plsmallstr!(cell_id.as_str()), values.to_vec()));
        }
        DataFrame::new(columns)
    }
}
