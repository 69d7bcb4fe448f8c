use polars::prelude::*;

/// Well-known columns of the cell metadata table.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum CellInfoColumns {
    Barcode,
    Batch,
    Cluster,
}

impl CellInfoColumns {
    /// Returns the string representation of the column name.
    pub const fn as_str(&self) -> &'static str {
        match self {
            CellInfoColumns::Barcode => "cell_barcode",
            CellInfoColumns::Batch => "batch",
            CellInfoColumns::Cluster => "cluster",
        }
    }

    /// Columns every cell metadata table must carry.
    pub const fn required() -> [&'static str; 2] {
        [
            CellInfoColumns::Barcode.as_str(),
            CellInfoColumns::Batch.as_str(),
        ]
    }

    /// Creates a Polars expression referencing this column.
    #[inline(always)]
    pub fn col(&self) -> Expr {
        col(self.as_str())
    }

    /// Same as [`Self::col`], cast to strings so labels of any physical type
    /// compare against string selectors.
    #[inline(always)]
    pub fn label_col(&self) -> Expr {
        self.col().cast(DataType::String)
    }
}

/// Well-known columns of the gene metadata table.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum GeneInfoColumns {
    GeneId,
}

impl GeneInfoColumns {
    pub const fn as_str(&self) -> &'static str {
        match self {
            GeneInfoColumns::GeneId => "gene_id",
        }
    }
}
