use hashbrown::HashSet;
use itertools::Itertools;
use log::info;
use polars::prelude::*;

use crate::data_structs::oplog::LogEntry;
use crate::data_structs::schema::GeneInfoColumns as GeneCol;
use crate::data_structs::Dataset;
use crate::error::{
    DatasetError,
    Result,
};
use crate::utils::{
    selector_series,
    selector_strings,
};

impl Dataset {
    /// Removes the genes of the named control groups from the matrix and the
    /// gene metadata, and forgets those groups.
    ///
    /// Cached PCA and clustering results are dropped since they were computed
    /// on the full gene set.
    pub fn exclude_controls<S: AsRef<str>>(
        &self,
        groups: &[S],
    ) -> Result<Dataset> {
        if groups.is_empty() {
            return Err(DatasetError::Argument(
                "at least one control group must be specified".into(),
            ));
        }
        let requested: Vec<&str> = groups.iter().map(|g| g.as_ref()).collect();
        let present = requested
            .into_iter()
            .unique()
            .filter(|g| self.controls().contains_key(*g))
            .collect_vec();
        if present.is_empty() {
            return Err(DatasetError::nothing_selected("control groups"));
        }

        let excluded: HashSet<&str> = present
            .iter()
            .flat_map(|g| self.controls()[*g].iter().map(String::as_str))
            .collect();
        let rows = self
            .gene_ids()
            .iter()
            .enumerate()
            .filter(|(_, gene)| !excluded.contains(gene.as_str()))
            .map(|(row, _)| row)
            .collect_vec();
        if rows.is_empty() {
            return Err(DatasetError::Selection(
                "excluding the requested control groups would remove every gene".into(),
            ));
        }

        let expression = self.expression_matrix().select_genes(&rows);
        let excluded_ids = excluded.iter().copied().collect_vec();
        let gene_info = self
            .gene_info()
            .clone()
            .lazy()
            .filter(
                col(GeneCol::GeneId.as_str())
                    .cast(DataType::String)
                    .is_in(lit(selector_series(GeneCol::GeneId.as_str(), &excluded_ids)))
                    .not(),
            )
            .collect()?;
        let mut controls = self.controls().clone();
        for group in present.iter() {
            controls.shift_remove(*group);
        }

        let mut subset = self.replace_gene_slots(expression, gene_info, controls);
        subset.invalidate_derived();
        let mut subset = subset.sync_slots()?;
        info!(
            "Excluded {} control genes, {} of {} genes retained",
            self.n_genes() - subset.n_genes(),
            subset.n_genes(),
            self.n_genes()
        );
        subset.push_log(
            LogEntry::new("ExcludeControls")
                .with_param("ExcludedControls", selector_strings(groups)),
        );
        Ok(subset)
    }
}
