//! This module contains utility functions and helper macros used throughout
//! the emset crate.
//!
//! Key functionalities include:
//!
//! - Extraction of identifier and label columns from Polars frames as owned
//!   strings, regardless of the physical column type.
//! - Index lookups from identifiers to their position on an axis.
//! - Row gathering by explicit positions.
//! - Macros for common struct operations (getter functions, builder-style
//!   `with_*` methods).

use hashbrown::HashMap;
use itertools::Itertools;
use polars::prelude::*;

use crate::error::{
    DatasetError,
    Result,
};

#[macro_export]
macro_rules! plsmallstr {
    ($string: expr) => {
        PlSmallStr::from($string)
    };
    () => {
        PlSmallStr::from("")
    };
}

#[macro_export]
macro_rules! getter_fn {
    ($field_name: ident, $field_type: ty) => {
        pub fn $field_name(&self) -> &$field_type {
            &self.$field_name
        }
    };
}

#[macro_export]
macro_rules! with_field_fn {
    ($field_name: ident, $field_type: ty) => {
        paste::paste! {
            pub fn [<with_$field_name>](mut self, value: $field_type) -> Self {
            self.$field_name = value;
            self
            }
        }
    };
}

/// Returns true if the frame has a column with the given name.
pub fn has_column(
    df: &DataFrame,
    name: &str,
) -> bool {
    df.get_column_index(name).is_some()
}

/// Reads a column as optional strings, casting non-string columns.
pub fn column_as_strings(
    df: &DataFrame,
    name: &str,
) -> Result<Vec<Option<String>>> {
    let casted = df.column(name)?.cast(&DataType::String)?;
    let values = casted
        .str()?
        .into_iter()
        .map(|v| v.map(str::to_string))
        .collect_vec();
    Ok(values)
}

/// Reads an identifier column. Nulls are not allowed in identifier columns.
pub fn identifier_column(
    df: &DataFrame,
    name: &str,
) -> Result<Vec<String>> {
    column_as_strings(df, name)?
        .into_iter()
        .enumerate()
        .map(|(row, v)| {
            v.ok_or_else(|| {
                DatasetError::Inconsistent(format!(
                    "null identifier in column '{name}' at row {row}"
                ))
            })
        })
        .collect()
}

/// Maps each identifier to its position. Returns the first duplicate on
/// failure.
pub fn position_map(ids: &[String]) -> std::result::Result<HashMap<&str, usize>, &str> {
    let mut map = HashMap::with_capacity(ids.len());
    for (idx, id) in ids.iter().enumerate() {
        if map.insert(id.as_str(), idx).is_some() {
            return Err(id.as_str());
        }
    }
    Ok(map)
}

/// Gathers rows of a frame in the given order.
pub fn take_rows(
    df: &DataFrame,
    rows: &[usize],
) -> PolarsResult<DataFrame> {
    let idx = IdxCa::from_vec(
        plsmallstr!("idx"),
        rows.iter().map(|&r| r as IdxSize).collect_vec(),
    );
    df.take(&idx)
}

/// Builds a string series named `name` from the selector values.
pub fn selector_series<S: AsRef<str>>(
    name: &str,
    values: &[S],
) -> Series {
    Series::new(
        plsmallstr!(name),
        values.iter().map(|v| v.as_ref()).collect_vec(),
    )
}

/// Collects selector values into owned strings for logging.
pub fn selector_strings<S: AsRef<str>>(values: &[S]) -> Vec<String> {
    values.iter().map(|v| v.as_ref().to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_map_detects_duplicates() {
        let ids = vec!["a".to_string(), "b".to_string(), "a".to_string()];
        assert_eq!(position_map(&ids).unwrap_err(), "a");

        let ids = vec!["a".to_string(), "b".to_string()];
        let map = position_map(&ids).unwrap();
        assert_eq!(map["b"], 1);
    }

    #[test]
    fn test_column_as_strings_casts_integers() -> anyhow::Result<()> {
        let df = df!("cluster" => [Some(1i32), None, Some(3)])?;
        let values = column_as_strings(&df, "cluster")?;
        assert_eq!(values, vec![Some("1".to_string()), None, Some("3".to_string())]);
        Ok(())
    }

    #[test]
    fn test_identifier_column_rejects_nulls() -> anyhow::Result<()> {
        let df = df!("cell_barcode" => [Some("c1"), None])?;
        assert!(matches!(
            identifier_column(&df, "cell_barcode"),
            Err(DatasetError::Inconsistent(_))
        ));
        Ok(())
    }

    #[test]
    fn test_take_rows_reorders() -> anyhow::Result<()> {
        let df = df!("x" => ["a", "b", "c"])?;
        let taken = take_rows(&df, &[2, 0])?;
        assert_eq!(identifier_column(&taken, "x")?, vec!["c", "a"]);
        Ok(())
    }
}
