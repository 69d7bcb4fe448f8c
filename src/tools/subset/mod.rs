//! Cell-axis subsetting.
//!
//! Every operation follows the same steps:
//!
//! 1. validate the selector against the cell metadata;
//! 2. compute the retained cells, as a filtered (and possibly reordered) cell
//!    metadata table;
//! 3. slice the matrix columns to the same cells, keeping gene order;
//! 4. drop cached PCA and clustering results;
//! 5. re-synchronize slots;
//! 6. append a provenance entry to the operation log.
//!
//! The input dataset is never modified. On error nothing is returned and the
//! partially built copy is discarded.


use indexmap::IndexSet;
use itertools::Itertools;
use log::{
    debug,
    info,
    warn,
};
use polars::prelude::*;

use crate::data_structs::dataset::cell_positions;
use crate::data_structs::oplog::LogEntry;
use crate::data_structs::schema::CellInfoColumns as CellCol;
use crate::data_structs::Dataset;
use crate::error::{
    DatasetError,
    Result,
};
use crate::utils::{
    has_column,
    identifier_column,
    position_map,
    selector_series,
    selector_strings,
    take_rows,
};

impl Dataset {
    /// Keeps cells flagged by any of the named boolean condition columns.
    ///
    /// Cells are retained in accumulation order: those flagged by the first
    /// condition in metadata order, then newly flagged cells of the second
    /// condition, and so on. Unless disabled in
    /// [`DatasetConfig`](crate::data_structs::DatasetConfig), the cell
    /// metadata is narrowed to the barcode, batch and selected condition
    /// columns.
    pub fn subset_conditions<S: AsRef<str>>(
        &self,
        conditions: &[S],
    ) -> Result<Dataset> {
        let cell_info = self.cell_info();
        let requested: Vec<&str> = conditions.iter().map(|c| c.as_ref()).collect();
        let (present, missing): (Vec<&str>, Vec<&str>) = requested
            .into_iter()
            .unique()
            .partition(|name| has_column(cell_info, name));

        if present.is_empty() {
            return Err(DatasetError::nothing_selected("conditions"));
        }
        if !missing.is_empty() {
            if self.config().strict_conditions {
                return Err(DatasetError::Argument(format!(
                    "condition columns not found in cell metadata: {}",
                    missing.join(", ")
                )));
            }
            warn!(
                "Skipping condition columns not found in cell metadata: {}",
                missing.join(", ")
            );
        }

        let barcodes = identifier_column(cell_info, CellCol::Barcode.as_str())?;
        let mut retained: IndexSet<&str> = IndexSet::new();
        for name in present.iter() {
            let flags = cell_info.column(name)?.bool().map_err(|_| {
                DatasetError::Argument(format!("condition column '{name}' is not boolean"))
            })?;
            let before = retained.len();
            retained.extend(
                barcodes
                    .iter()
                    .zip(flags.into_iter())
                    .filter(|(_, flag)| *flag == Some(true))
                    .map(|(barcode, _)| barcode.as_str()),
            );
            debug!(
                "Condition '{}' contributed {} new cells",
                name,
                retained.len() - before
            );
        }
        if retained.is_empty() {
            return Err(DatasetError::Selection(
                "no cells are flagged by the requested conditions".into(),
            ));
        }

        let rows_by_barcode = position_map(&barcodes).map_err(|dup| {
            DatasetError::Inconsistent(format!("duplicated cell identifier '{dup}' in metadata"))
        })?;
        let rows = retained
            .iter()
            .map(|barcode| rows_by_barcode[barcode])
            .collect_vec();
        let mut subset = take_rows(cell_info, &rows)?;
        if self.config().narrow_condition_columns {
            let keep: IndexSet<&str> = [CellCol::Barcode.as_str(), CellCol::Batch.as_str()]
                .into_iter()
                .chain(present.iter().copied())
                .collect();
            subset = subset.select(keep)?;
        }

        let entry = LogEntry::new("SubsetByConditions")
            .with_param("SubsettedConditions", selector_strings(conditions));
        self.finish_cell_subset(subset, entry)
    }

    /// Keeps cells whose batch label is one of `batches`.
    ///
    /// A null batch label never matches, so such cells are dropped even when
    /// every batch is requested.
    pub fn subset_batches<S: AsRef<str>>(
        &self,
        batches: &[S],
    ) -> Result<Dataset> {
        let subset = self.filter_labels(CellCol::Batch, batches)?;
        if subset.height() == 0 {
            return Err(DatasetError::nothing_selected("batches"));
        }

        let entry = LogEntry::new("SubsetByBatches")
            .with_param("SubsettedBatches", selector_strings(batches));
        self.finish_cell_subset(subset, entry)
    }

    /// Keeps cells whose cluster label is one of `clusters`. Requires the
    /// cell metadata to carry a cluster column.
    pub fn subset_clusters<S: AsRef<str>>(
        &self,
        clusters: &[S],
    ) -> Result<Dataset> {
        if clusters.is_empty() {
            return Err(DatasetError::Argument(
                "at least one cluster must be specified".into(),
            ));
        }
        if !self.is_clustered() {
            return Err(DatasetError::Precondition(
                "cell metadata has no cluster column, run clustering first".into(),
            ));
        }
        let subset = self.filter_labels(CellCol::Cluster, clusters)?;
        if subset.height() == 0 {
            return Err(DatasetError::nothing_selected("clusters"));
        }

        let entry = LogEntry::new("SubsetByClusters")
            .with_param("SubsettedClusters", selector_strings(clusters));
        self.finish_cell_subset(subset, entry)
    }

    /// Keeps the listed cells. Identifiers absent from the matrix are
    /// ignored; retained cells keep their metadata order.
    pub fn subset_cells<S: AsRef<str>>(
        &self,
        cells: &[S],
    ) -> Result<Dataset> {
        let positions = cell_positions(self)?;
        let requested: Vec<&str> = cells.iter().map(|c| c.as_ref()).collect();
        let (present, absent): (Vec<&str>, Vec<&str>) = requested
            .into_iter()
            .partition(|c| positions.contains_key(c));
        let present = present.into_iter().unique().collect_vec();
        let n_absent = absent.len();
        if n_absent > 0 {
            debug!("Ignoring {n_absent} requested cells absent from the matrix");
        }
        if present.is_empty() {
            return Err(DatasetError::nothing_selected("cells"));
        }

        let subset = self.filter_labels(CellCol::Barcode, &present)?;
        let entry = LogEntry::new("SubsetByCells")
            .with_param("SubsettedCells", selector_strings(cells));
        self.finish_cell_subset(subset, entry)
    }
}

// Private methods
impl Dataset {
    /// Cell metadata rows whose `column` label is in `values`, in metadata
    /// order.
    fn filter_labels<S: AsRef<str>>(
        &self,
        column: CellCol,
        values: &[S],
    ) -> Result<DataFrame> {
        let selector = selector_series(column.as_str(), values);
        let filtered = self
            .cell_info()
            .clone()
            .lazy()
            .filter(column.label_col().is_in(lit(selector)))
            .collect()?;
        Ok(filtered)
    }

    /// Slices the matrix to the cells of `cell_info`, in its row order, and
    /// assembles the resulting dataset.
    fn finish_cell_subset(
        &self,
        cell_info: DataFrame,
        entry: LogEntry,
    ) -> Result<Dataset> {
        let barcodes = identifier_column(&cell_info, CellCol::Barcode.as_str())?;
        let positions = cell_positions(self)?;
        let columns = barcodes
            .iter()
            .map(|barcode| {
                positions.get(barcode.as_str()).copied().ok_or_else(|| {
                    DatasetError::Inconsistent(format!(
                        "cell '{barcode}' is in the metadata but not in the matrix"
                    ))
                })
            })
            .collect::<Result<Vec<_>>>()?;
        let expression = self.expression_matrix().select_cells(&columns);

        let mut subset = self.replace_cell_slots(expression, cell_info);
        subset.invalidate_derived();
        let mut subset = subset.sync_slots()?;
        info!(
            "{} retained {} of {} cells",
            entry.operation().unwrap_or("Subset"),
            subset.n_cells(),
            self.n_cells()
        );
        subset.push_log(entry);
        Ok(subset)
    }
}
