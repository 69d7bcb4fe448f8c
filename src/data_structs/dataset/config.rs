use serde::{
    Deserialize,
    Serialize,
};

use crate::with_field_fn;

/// Behaviour switches for transformations applied to a
/// [`Dataset`](super::Dataset).
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatasetConfig {
    /// Condition subsetting keeps only the barcode, batch and selected
    /// condition columns of the cell metadata.
    pub narrow_condition_columns: bool,
    /// Reject condition selectors naming columns absent from the cell
    /// metadata instead of skipping them.
    pub strict_conditions:        bool,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            narrow_condition_columns: true,
            strict_conditions:        false,
        }
    }
}

impl DatasetConfig {
    with_field_fn!(narrow_condition_columns, bool);
    with_field_fn!(strict_conditions, bool);
}
