//! # emset
//!
//! `emset` manipulates single-cell gene-expression datasets held as a single
//! aggregate value, [`Dataset`]: an expression matrix (genes x cells), per-cell
//! metadata and per-gene metadata as Polars frames, named control gene groups,
//! cached analysis results and an append-only operation log.
//!
//! Transformations never modify their input. Each one validates its
//! selector, slices the matrix and metadata together, re-synchronizes the
//! slots so that matrix axes and metadata rows stay aligned, drops cached
//! results that no longer apply and records what it did.
//!
//! ## Structure
//!
//! * [`data_structs`]: the [`Dataset`] aggregate, its builder and config, the
//!   labeled [`ExprMatrix`], cached results and the operation log.
//! * [`tools`]: subsetting by condition, batch, cluster or cell identifier, and
//!   control gene exclusion.
//! * [`error`]: the [`DatasetError`] taxonomy.
//! * [`utils`]: frame helpers and builder macros.
//!
//! ## Example
//!
//! ```
//! use emset::prelude::*;
//! use polars::prelude::*;
//!
//! let matrix = ExprMatrix::from_rows(
//!     vec![vec![1.0, 0.0, 3.0], vec![0.0, 2.0, 1.0]],
//!     vec!["g1".into(), "g2".into()],
//!     vec!["c1".into(), "c2".into(), "c3".into()],
//! )
//! .unwrap();
//! let cell_info = df!(
//!     "cell_barcode" => ["c1", "c2", "c3"],
//!     "batch" => ["A", "A", "B"],
//! )
//! .unwrap();
//! let dataset = DatasetBuilder::all_checks().build(matrix, cell_info).unwrap();
//!
//! let batch_a = dataset.subset_batches(&["A"]).unwrap();
//! assert_eq!(batch_a.cell_ids(), &["c1", "c2"]);
//! assert_eq!(dataset.n_cells(), 3);
//! ```

pub mod data_structs;
pub mod error;
pub mod prelude;
pub mod tools;
pub mod utils;

pub use data_structs::{
    Dataset,
    ExprMatrix,
};
pub use error::DatasetError;
