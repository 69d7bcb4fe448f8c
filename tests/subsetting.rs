mod common;

use common::{
    assert_consistent,
    cell_column,
    init_logger,
    DemoDatasetBuilder,
};
use emset::prelude::*;
use itertools::Itertools;
use rstest::rstest;

#[rstest]
#[case(1)]
#[case(7)]
#[case(123)]
fn test_batch_subsets_partition_cells(#[case] seed: u64) -> anyhow::Result<()> {
    init_logger();
    let dataset = DemoDatasetBuilder::default().with_seed(seed).build();
    let batch = cell_column(&dataset, "batch");
    let labels = batch.iter().flatten().unique().cloned().collect_vec();

    let mut seen = Vec::new();
    for label in labels.iter() {
        let subset = dataset.subset_batches(&[label])?;
        assert_consistent(&subset);
        assert!(cell_column(&subset, "batch")
            .iter()
            .all(|b| b.as_ref() == Some(label)));
        let expected = dataset
            .cell_ids()
            .iter()
            .zip(batch.iter())
            .filter(|(_, b)| b.as_ref() == Some(label))
            .map(|(c, _)| c.clone())
            .collect_vec();
        assert_eq!(subset.cell_ids(), expected.as_slice());
        seen.extend(subset.cell_ids().iter().cloned());
    }
    assert_eq!(
        seen.into_iter().sorted().collect_vec(),
        dataset.cell_ids().iter().cloned().sorted().collect_vec()
    );

    let everything = dataset.subset_batches(&labels)?;
    assert_eq!(everything.cell_ids(), dataset.cell_ids());
    assert_eq!(everything.expression_matrix(), dataset.expression_matrix());
    Ok(())
}

#[rstest]
fn test_subsets_clear_cached_results() -> anyhow::Result<()> {
    init_logger();
    let dataset = DemoDatasetBuilder::default().with_clusters(4).build();
    assert!(dataset.pca().is_some());
    assert!(dataset.clusters().is_some());

    let first_batch = cell_column(&dataset, "batch")[0].clone().unwrap();
    let first_cluster = cell_column(&dataset, "cluster")[0].clone().unwrap();
    let results = [
        dataset.subset_batches(&[first_batch])?,
        dataset.subset_clusters(&[first_cluster])?,
        dataset.subset_conditions(&["stim", "ctrl"])?,
        dataset.subset_cells(&dataset.cell_ids()[..10])?,
    ];
    for subset in results.iter() {
        assert_consistent(subset);
        assert!(subset.pca().is_none());
        assert!(subset.clusters().is_none());
        assert_eq!(subset.log().len(), dataset.log().len() + 1);
    }
    assert!(dataset.pca().is_some());
    Ok(())
}

#[rstest]
fn test_conditions_select_union() -> anyhow::Result<()> {
    let dataset = DemoDatasetBuilder::default().with_n_cells(200).build();
    let stim = cell_column(&dataset, "stim");
    let ctrl = cell_column(&dataset, "ctrl");

    let subset = dataset.subset_conditions(&["stim", "ctrl"])?;
    assert_consistent(&subset);
    let expected = dataset
        .cell_ids()
        .iter()
        .zip(stim.iter().zip(ctrl.iter()))
        .filter(|(_, (s, c))| s.as_deref() == Some("true") || c.as_deref() == Some("true"))
        .map(|(cell, _)| cell.clone())
        .sorted()
        .collect_vec();
    assert_eq!(
        subset.cell_ids().iter().cloned().sorted().collect_vec(),
        expected
    );
    // Every `stim` cell precedes every `ctrl`-only cell
    let n_stim = stim.iter().filter(|s| s.as_deref() == Some("true")).count();
    assert!(cell_column(&subset, "stim")[..n_stim]
        .iter()
        .all(|s| s.as_deref() == Some("true")));
    Ok(())
}

#[rstest]
fn test_cell_list_with_unknown_ids() -> anyhow::Result<()> {
    let dataset = DemoDatasetBuilder::default().build();
    let mut requested = dataset.cell_ids()[5..15].to_vec();
    requested.push("TTTT9999-1".into());
    requested.reverse();

    let subset = dataset.subset_cells(&requested)?;
    assert_consistent(&subset);
    assert_eq!(subset.cell_ids(), &dataset.cell_ids()[5..15]);

    let unknown = ["TTTT9999-1", "GGGG0000-1"];
    assert!(matches!(
        dataset.subset_cells(&unknown),
        Err(DatasetError::Selection(_))
    ));
    Ok(())
}

#[rstest]
fn test_cluster_subset_requires_clustering() {
    let dataset = DemoDatasetBuilder::default().build();
    assert!(matches!(
        dataset.subset_clusters(&["0"]),
        Err(DatasetError::Precondition(_))
    ));
}

#[rstest]
fn test_chain_with_control_exclusion() -> anyhow::Result<()> {
    let dataset = DemoDatasetBuilder::default().with_clusters(3).build();
    let res = dataset
        .exclude_controls(&["Mt"])?
        .subset_conditions(&["stim"])?;
    assert_consistent(&res);
    assert_eq!(res.n_genes(), dataset.n_genes() - 2);
    assert_eq!(
        res.log()
            .iter()
            .filter_map(LogEntry::operation)
            .collect_vec(),
        vec!["ExcludeControls", "SubsetByConditions"]
    );
    Ok(())
}
