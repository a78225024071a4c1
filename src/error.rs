//! Error type shared by the loader and the aggregation queries.

use std::path::PathBuf;
use thiserror::Error;

/// Result alias for dashboard operations.
pub type Result<T> = std::result::Result<T, DashboardError>;

#[derive(Error, Debug)]
pub enum DashboardError {
    #[error("input file not found: {}", path.display())]
    SourceNotFound { path: PathBuf },

    #[error("unsupported input format: {} (expected .xlsx, .xlsm, .xlsb, .xls, .ods or .csv)", path.display())]
    UnsupportedFormat { path: PathBuf },

    #[error("worksheet not found: {sheet}")]
    SheetNotFound { sheet: String },

    #[error("failed to read workbook: {0}")]
    Workbook(#[from] calamine::Error),

    #[error("failed to read csv: {0}")]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("row {row}, column '{column}': cannot convert {value:?} ({reason})")]
    UnparseableCell {
        row: usize,
        column: &'static str,
        value: String,
        reason: String,
    },

    #[error("no inquiries loaded")]
    EmptyTable,

    #[error("no satisfaction scores present, net promoter score is undefined")]
    EmptyDenominator,

    #[error("invalid time format pattern: {pattern:?}")]
    InvalidTimeFormat { pattern: String },

    #[error("invalid time of day: {input:?} (expected HH:MM or HH:MM:SS)")]
    InvalidTime { input: String },

    #[error("invalid config file {}: {reason}", path.display())]
    Config { path: PathBuf, reason: String },
}
