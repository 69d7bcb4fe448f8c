pub use crate::data_structs::{
    CellInfoColumns,
    ClusterResult,
    Controls,
    Dataset,
    DatasetBuilder,
    DatasetConfig,
    ExprFormat,
    ExprMatrix,
    Expression,
    GeneInfoColumns,
    LogEntry,
    OperationLog,
    PcaResult,
};
pub use crate::error::DatasetError;
