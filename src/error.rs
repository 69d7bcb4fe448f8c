//! Error types returned by dataset construction and transformation.

use polars::error::PolarsError;
use thiserror::Error;

/// Unified error type for all dataset operations.
#[derive(Debug, Error)]
pub enum DatasetError {
    /// A required selector is missing, empty or malformed.
    #[error("argument error: {0}")]
    Argument(String),

    /// A required prior computation (e.g. clustering) has not been run.
    #[error("precondition error: {0}")]
    Precondition(String),

    /// The selector matches nothing in the dataset.
    #[error("selection error: {0}")]
    Selection(String),

    /// Matrix and metadata slots disagree on their identifiers.
    #[error("inconsistent dataset: {0}")]
    Inconsistent(String),

    /// Matrix values do not fit the supplied labels.
    #[error("shape error: {0}")]
    Shape(String),

    #[error(transparent)]
    Polars(#[from] PolarsError),
}

impl DatasetError {
    pub(crate) fn nothing_selected(what: &str) -> Self {
        DatasetError::Selection(format!(
            "none of the requested {what} are present in the dataset"
        ))
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, DatasetError>;
