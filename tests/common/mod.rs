#![allow(dead_code)]

use emset::prelude::*;
use ndarray::Array2;
use polars::prelude::*;
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

pub fn init_logger() {
    let _ = pretty_env_logger::try_init();
}

/// Generates random datasets with reproducible content.
pub struct DemoDatasetBuilder {
    n_cells:    usize,
    n_genes:    usize,
    batches:    Vec<String>,
    conditions: Vec<String>,
    n_clusters: Option<usize>,
    seed:       u64,
}

impl Default for DemoDatasetBuilder {
    fn default() -> Self {
        Self {
            n_cells:    50,
            n_genes:    20,
            batches:    vec!["A".into(), "B".into(), "C".into()],
            conditions: vec!["stim".into(), "ctrl".into()],
            n_clusters: None,
            seed:       42,
        }
    }
}

impl DemoDatasetBuilder {
    pub fn with_n_cells(
        mut self,
        n: usize,
    ) -> Self {
        self.n_cells = n;
        self
    }

    pub fn with_seed(
        mut self,
        seed: u64,
    ) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_clusters(
        mut self,
        n: usize,
    ) -> Self {
        self.n_clusters = Some(n);
        self
    }

    pub fn build(self) -> Dataset {
        let mut rng = ChaCha8Rng::seed_from_u64(self.seed);
        let cells = (0..self.n_cells)
            .map(|i| format!("AAAC{i:04}-1"))
            .collect::<Vec<_>>();
        let genes = (0..self.n_genes)
            .map(|i| format!("ENSG{i:011}"))
            .collect::<Vec<_>>();

        let values = Array2::from_shape_fn((self.n_genes, self.n_cells), |_| {
            rng.gen_range(0..20) as f64
        });
        let matrix = ExprMatrix::try_new(values, genes.clone(), cells.clone()).unwrap();

        let batch = (0..self.n_cells)
            .map(|_| self.batches[rng.gen_range(0..self.batches.len())].clone())
            .collect::<Vec<_>>();
        let mut columns = vec![
            Column::new("cell_barcode".into(), cells.clone()),
            Column::new("batch".into(), batch),
        ];
        for name in self.conditions.iter() {
            let flags = (0..self.n_cells)
                .map(|_| rng.gen_bool(0.3))
                .collect::<Vec<_>>();
            columns.push(Column::new(name.as_str().into(), flags));
        }
        let cell_info = DataFrame::new(columns).unwrap();

        let dataset = DatasetBuilder::all_checks()
            .with_control_group("Mt", genes[..2].to_vec())
            .build(matrix, cell_info)
            .unwrap();

        match self.n_clusters {
            Some(n) => {
                let labels = (0..self.n_cells)
                    .map(|_| rng.gen_range(0..n).to_string())
                    .collect::<Vec<_>>();
                let clusters = ClusterResult::try_new(cells.clone(), labels).unwrap();
                let pca = PcaResult::try_new(
                    cells,
                    Array2::from_shape_fn((self.n_cells, 3), |_| rng.gen::<f64>()),
                    vec![0.5, 0.3, 0.1],
                )
                .unwrap();
                dataset
                    .with_clusters(clusters)
                    .and_then(|d| d.with_pca(pca))
                    .unwrap()
            },
            None => dataset,
        }
    }
}

/// Reads a cell metadata column as strings.
pub fn cell_column(
    dataset: &Dataset,
    name: &str,
) -> Vec<Option<String>> {
    emset::utils::column_as_strings(dataset.cell_info(), name).unwrap()
}

/// Checks the matrix and metadata axes agree.
pub fn assert_consistent(dataset: &Dataset) {
    let barcodes = emset::utils::identifier_column(
        dataset.cell_info(),
        CellInfoColumns::Barcode.as_str(),
    )
    .unwrap();
    assert_eq!(barcodes, dataset.cell_ids());
    let genes = emset::utils::identifier_column(
        dataset.gene_info(),
        GeneInfoColumns::GeneId.as_str(),
    )
    .unwrap();
    assert_eq!(genes, dataset.gene_ids());
}
