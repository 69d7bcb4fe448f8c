//! This module contains the core data structures of the `emset` crate.
//!
//! - [`matrix`]: the labeled expression matrix ([`ExprMatrix`]) and its
//!   tabular representation.
//! - [`dataset`]: the [`Dataset`] aggregate tying the matrix to its cell and
//!   gene metadata, with the [`DatasetBuilder`] that validates new datasets
//!   and the [`DatasetConfig`] switches.
//! - [`results`]: cached outputs of external analyses ([`PcaResult`],
//!   [`ClusterResult`]).
//! - [`oplog`]: the append-only [`OperationLog`].
//! - [`schema`]: well-known metadata column names.

pub mod dataset;
pub mod matrix;
pub mod oplog;
pub mod results;
pub mod schema;

pub use dataset::{
    Controls,
    Dataset,
    DatasetBuilder,
    DatasetConfig,
};
pub use matrix::{
    ExprFormat,
    ExprMatrix,
    Expression,
};
pub use oplog::{
    LogEntry,
    OperationLog,
};
pub use results::{
    ClusterResult,
    PcaResult,
};
pub use schema::{
    CellInfoColumns,
    GeneInfoColumns,
};
