use log::{
    debug,
    warn,
};
use polars::prelude::*;

use super::{
    Controls,
    Dataset,
    DatasetConfig,
};
use crate::data_structs::matrix::ExprMatrix;
use crate::data_structs::schema::{
    CellInfoColumns as CellCol,
    GeneInfoColumns as GeneCol,
};
use crate::error::{
    DatasetError,
    Result,
};
use crate::utils::has_column;
use crate::{
    plsmallstr,
    with_field_fn,
};

/// Builder for constructing and validating a [`Dataset`].
#[derive(Debug, Clone)]
pub struct DatasetBuilder {
    check_nulls:       bool,
    check_duplicates:  bool,
    check_consistency: bool,
    rechunk:           bool,
    gene_info:         Option<DataFrame>,
    controls:          Controls,
    config:            DatasetConfig,
}

impl Default for DatasetBuilder {
    fn default() -> Self {
        Self::all_checks()
    }
}

// Public methods
impl DatasetBuilder {
    with_field_fn!(check_nulls, bool);

    with_field_fn!(check_duplicates, bool);

    with_field_fn!(check_consistency, bool);

    with_field_fn!(rechunk, bool);

    with_field_fn!(controls, Controls);

    with_field_fn!(config, DatasetConfig);

    /// Creates a builder with all data validation checks enabled.
    pub fn all_checks() -> Self {
        Self {
            check_nulls:       true,
            check_duplicates:  true,
            check_consistency: true,
            rechunk:           true,
            gene_info:         None,
            controls:          Controls::new(),
            config:            DatasetConfig::default(),
        }
    }

    /// Creates a builder with all validation checks disabled.
    ///
    /// The caller is responsible for passing slots that already satisfy the
    /// axis invariant.
    pub fn no_checks() -> Self {
        Self {
            check_nulls: false,
            check_duplicates: false,
            check_consistency: false,
            rechunk: false,
            ..Self::all_checks()
        }
    }

    /// Sets the gene metadata. When absent, a table holding only the matrix
    /// gene identifiers is generated.
    pub fn with_gene_info(
        mut self,
        gene_info: DataFrame,
    ) -> Self {
        self.gene_info = Some(gene_info);
        self
    }

    /// Adds a control gene group.
    pub fn with_control_group<S: Into<String>>(
        mut self,
        name: S,
        gene_ids: Vec<String>,
    ) -> Self {
        self.controls.insert(name.into(), gene_ids);
        self
    }

    /// Validates the slots and assembles the dataset.
    pub fn build(
        self,
        expression: ExprMatrix,
        cell_info: DataFrame,
    ) -> Result<Dataset> {
        for name in CellCol::required() {
            if !has_column(&cell_info, name) {
                return Err(DatasetError::Argument(format!(
                    "cell metadata lacks required column '{name}'"
                )));
            }
        }
        let gene_info = match self.gene_info {
            Some(ref df) => {
                if !has_column(df, GeneCol::GeneId.as_str()) {
                    return Err(DatasetError::Argument(format!(
                        "gene metadata lacks required column '{}'",
                        GeneCol::GeneId.as_str()
                    )));
                }
                df.clone()
            },
            None => {
                debug!("No gene metadata supplied, deriving it from the matrix");
                DataFrame::new(vec![Column::new(
                    plsmallstr!(GeneCol::GeneId.as_str()),
                    expression.gene_ids(),
                )])?
            },
        };

        self.run_checks(&cell_info, CellCol::Barcode.as_str())?;
        self.run_checks(&gene_info, GeneCol::GeneId.as_str())?;
        for (group, ids) in self.controls.iter() {
            if ids.is_empty() {
                warn!("Control group '{group}' is empty");
            }
        }

        let dataset = Dataset::from_parts(
            expression,
            cell_info,
            gene_info,
            self.controls.clone(),
            self.config,
        );
        let mut dataset = if self.check_consistency {
            dataset.sync_slots()?
        }
        else {
            dataset
        };
        if self.rechunk {
            dataset.cell_info.rechunk_mut();
            dataset.gene_info.rechunk_mut();
        }
        debug!(
            "Built dataset with {} genes and {} cells",
            dataset.n_genes(),
            dataset.n_cells()
        );
        Ok(dataset)
    }
}

// Private methods
impl DatasetBuilder {
    /// Performs identifier validation based on builder settings.
    fn run_checks(
        &self,
        data: &DataFrame,
        key: &str,
    ) -> Result<()> {
        let column = data.column(key)?;
        if self.check_nulls && column.null_count() > 0 {
            return Err(DatasetError::Inconsistent(format!(
                "nulls not allowed in '{key}' column"
            )));
        }
        if self.check_duplicates && column.n_unique()? != data.height() {
            return Err(DatasetError::Inconsistent(format!(
                "duplicated identifiers in '{key}' column"
            )));
        }
        Ok(())
    }
}
