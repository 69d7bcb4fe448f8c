//! The [`Dataset`] aggregate: an expression matrix with its cell and gene
//! metadata, control gene groups, cached analysis results and an operation
//! log.
//!
//! A `Dataset` is never changed in place through the public API. Accessors
//! borrow the slots, replacement calls and transformations return a new value.
//! Code that swaps slots is expected to finish with [`Dataset::sync_slots`],
//! which re-establishes the axis invariant:
//!
//! - matrix columns and the cell metadata barcode column hold the same
//!   identifiers in the same order;
//! - matrix rows and the gene metadata identifier column hold the same
//!   identifiers in the same order;
//! - control groups only reference genes present in the matrix.

mod builder;
mod config;


pub use builder::DatasetBuilder;
pub use config::DatasetConfig;
use hashbrown::{
    HashMap,
    HashSet,
};
use indexmap::IndexMap;
use log::{
    debug,
    warn,
};
use polars::prelude::*;

use crate::data_structs::matrix::{
    ExprFormat,
    ExprMatrix,
    Expression,
};
use crate::data_structs::oplog::{
    LogEntry,
    OperationLog,
};
use crate::data_structs::results::{
    ClusterResult,
    PcaResult,
};
use crate::data_structs::schema::{
    CellInfoColumns as CellCol,
    GeneInfoColumns as GeneCol,
};
use crate::error::{
    DatasetError,
    Result,
};
use crate::utils::{
    has_column,
    identifier_column,
    position_map,
    take_rows,
};
use crate::{
    getter_fn,
    plsmallstr,
};

/// Control gene groups, keyed by group name.
pub type Controls = IndexMap<String, Vec<String>>;

#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    expression: ExprMatrix,
    cell_info:  DataFrame,
    gene_info:  DataFrame,
    controls:   Controls,
    pca:        Option<PcaResult>,
    clusters:   Option<ClusterResult>,
    log:        OperationLog,
    config:     DatasetConfig,
}

impl Dataset {
    getter_fn!(cell_info, DataFrame);

    getter_fn!(gene_info, DataFrame);

    getter_fn!(controls, Controls);

    getter_fn!(log, OperationLog);

    getter_fn!(config, DatasetConfig);

    /// Assembles a dataset from slots that are already known to be
    /// consistent.
    pub(crate) fn from_parts(
        expression: ExprMatrix,
        cell_info: DataFrame,
        gene_info: DataFrame,
        controls: Controls,
        config: DatasetConfig,
    ) -> Self {
        Self {
            expression,
            cell_info,
            gene_info,
            controls,
            pca: None,
            clusters: None,
            log: OperationLog::default(),
            config,
        }
    }

    // ACCESSORS
    pub fn expression_matrix(&self) -> &ExprMatrix {
        &self.expression
    }

    /// Expression values in the requested representation.
    pub fn expression(
        &self,
        format: ExprFormat,
    ) -> Result<Expression> {
        match format {
            ExprFormat::Matrix => Ok(Expression::Matrix(self.expression.clone())),
            ExprFormat::DataFrame => {
                Ok(Expression::DataFrame(self.expression.to_frame()?))
            },
        }
    }

    pub fn pca(&self) -> Option<&PcaResult> {
        self.pca.as_ref()
    }

    pub fn clusters(&self) -> Option<&ClusterResult> {
        self.clusters.as_ref()
    }

    pub fn cell_ids(&self) -> &[String] {
        self.expression.cell_ids()
    }

    pub fn gene_ids(&self) -> &[String] {
        self.expression.gene_ids()
    }

    pub fn n_cells(&self) -> usize {
        self.expression.n_cells()
    }

    pub fn n_genes(&self) -> usize {
        self.expression.n_genes()
    }

    /// Whether a cluster column is present in the cell metadata.
    pub fn is_clustered(&self) -> bool {
        has_column(&self.cell_info, CellCol::Cluster.as_str())
    }

    // REPLACEMENT
    /// Copy with the matrix slot replaced. Metadata is not re-synchronized.
    pub fn replace_expression_matrix(
        &self,
        expression: ExprMatrix,
    ) -> Self {
        self.replace_cell_slots(expression, self.cell_info.clone())
    }

    /// Copy with the cell metadata slot replaced. Nothing else is
    /// re-synchronized.
    pub fn replace_cell_info(
        &self,
        cell_info: DataFrame,
    ) -> Self {
        self.replace_cell_slots(self.expression.clone(), cell_info)
    }

    pub fn with_config(
        mut self,
        config: DatasetConfig,
    ) -> Self {
        self.config = config;
        self
    }

    /// Copy with a PCA result attached. The result must have been computed
    /// for the current cell sequence.
    pub fn with_pca(
        &self,
        pca: PcaResult,
    ) -> Result<Self> {
        if pca.cell_ids() != self.cell_ids() {
            return Err(DatasetError::Inconsistent(
                "PCA result was computed for a different cell sequence".into(),
            ));
        }
        let mut new = self.clone();
        new.pca = Some(pca);
        Ok(new)
    }

    /// Copy with a clustering result attached. The labels are also written
    /// into the cluster column of the cell metadata.
    pub fn with_clusters(
        &self,
        clusters: ClusterResult,
    ) -> Result<Self> {
        if clusters.cell_ids() != self.cell_ids() {
            return Err(DatasetError::Inconsistent(
                "clustering result was computed for a different cell sequence".into(),
            ));
        }
        // Cell metadata follows matrix order, so labels line up row by row.
        let mut new = self.clone();
        new.cell_info.with_column(Column::new(
            plsmallstr!(CellCol::Cluster.as_str()),
            clusters.labels(),
        ))?;
        new.clusters = Some(clusters);
        Ok(new)
    }

    // SYNCHRONIZATION
    /// Re-establishes the axis invariant across all slots.
    ///
    /// Cell metadata rows are reordered to the matrix column order and gene
    /// metadata rows to the matrix row order. Control groups are pruned to
    /// genes present in the matrix, and cached results computed for another
    /// cell sequence are dropped.
    ///
    /// Fails with [`DatasetError::Inconsistent`] if the cell metadata lacks a
    /// required column, or if the identifier sets differ, or contain nulls or
    /// duplicates.
    pub fn sync_slots(mut self) -> Result<Self> {
        for name in CellCol::required() {
            if !has_column(&self.cell_info, name) {
                return Err(DatasetError::Inconsistent(format!(
                    "cell metadata lacks required column '{name}'"
                )));
            }
        }
        self.cell_info = align_frame(
            &self.cell_info,
            CellCol::Barcode.as_str(),
            self.expression.cell_ids(),
            "cell",
        )?;
        self.gene_info = align_frame(
            &self.gene_info,
            GeneCol::GeneId.as_str(),
            self.expression.gene_ids(),
            "gene",
        )?;

        {
            let genes: HashSet<&str> = self
                .expression
                .gene_ids()
                .iter()
                .map(String::as_str)
                .collect();
            for (group, ids) in self.controls.iter_mut() {
                let before = ids.len();
                ids.retain(|g| genes.contains(g.as_str()));
                if ids.len() != before {
                    debug!(
                        "Pruned {} genes absent from the matrix from control group '{}'",
                        before - ids.len(),
                        group
                    );
                }
            }
        }

        let cells = self.expression.cell_ids();
        if self.pca.as_ref().is_some_and(|p| p.cell_ids() != cells) {
            warn!("Dropping PCA result computed for a different cell sequence");
            self.pca = None;
        }
        if self
            .clusters
            .as_ref()
            .is_some_and(|c| c.cell_ids() != cells)
        {
            warn!("Dropping clustering result computed for a different cell sequence");
            self.clusters = None;
        }
        Ok(self)
    }

    /// Clears results that depend on the current cell or gene set.
    pub(crate) fn invalidate_derived(&mut self) {
        if self.pca.is_some() || self.clusters.is_some() {
            debug!("Invalidating cached PCA and clustering results");
        }
        self.pca = None;
        self.clusters = None;
    }

    pub(crate) fn push_log(
        &mut self,
        entry: LogEntry,
    ) {
        self.log.push(entry);
    }

    pub(crate) fn replace_cell_slots(
        &self,
        expression: ExprMatrix,
        cell_info: DataFrame,
    ) -> Self {
        Self {
            expression,
            cell_info,
            gene_info: self.gene_info.clone(),
            controls: self.controls.clone(),
            pca: self.pca.clone(),
            clusters: self.clusters.clone(),
            log: self.log.clone(),
            config: self.config,
        }
    }

    pub(crate) fn replace_gene_slots(
        &self,
        expression: ExprMatrix,
        gene_info: DataFrame,
        controls: Controls,
    ) -> Self {
        Self {
            expression,
            cell_info: self.cell_info.clone(),
            gene_info,
            controls,
            pca: self.pca.clone(),
            clusters: self.clusters.clone(),
            log: self.log.clone(),
            config: self.config,
        }
    }
}

/// Reorders `df` so that its `key` column follows `ids`.
fn align_frame(
    df: &DataFrame,
    key: &str,
    ids: &[String],
    axis: &str,
) -> Result<DataFrame> {
    if !has_column(df, key) {
        return Err(DatasetError::Inconsistent(format!(
            "{axis} metadata has no '{key}' column"
        )));
    }
    let frame_ids = identifier_column(df, key)?;
    if frame_ids.len() != ids.len() {
        return Err(DatasetError::Inconsistent(format!(
            "{axis} metadata has {} rows but the matrix has {} {axis}s",
            frame_ids.len(),
            ids.len()
        )));
    }
    let positions = position_map(&frame_ids).map_err(|dup| {
        DatasetError::Inconsistent(format!("duplicated {axis} identifier '{dup}' in metadata"))
    })?;
    position_map(ids).map_err(|dup| {
        DatasetError::Inconsistent(format!("duplicated {axis} identifier '{dup}' in matrix"))
    })?;

    let order = ids
        .iter()
        .map(|id| {
            positions.get(id.as_str()).copied().ok_or_else(|| {
                DatasetError::Inconsistent(format!(
                    "{axis} '{id}' is in the matrix but not in the metadata"
                ))
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let mut aligned = if order.iter().enumerate().all(|(i, &p)| i == p) {
        df.clone()
    }
    else {
        debug!("Reordering {axis} metadata to follow the matrix");
        take_rows(df, &order)?
    };
    aligned.rechunk_mut();
    Ok(aligned)
}

/// Position of every cell identifier on the matrix column axis.
pub(crate) fn cell_positions(dataset: &Dataset) -> Result<HashMap<&str, usize>> {
    position_map(dataset.cell_ids()).map_err(|dup| {
        DatasetError::Inconsistent(format!("duplicated cell identifier '{dup}' in matrix"))
    })
}
