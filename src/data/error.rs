use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading a campaign dataset or configuring aggregation.
///
/// Everything downstream of loading (cleaning, filtering, aggregation) is
/// total and never produces one of these.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("missing expected column(s): {}", missing.join(", "))]
    Schema { missing: Vec<String> },

    #[error("row {row}, column '{column}': {reason}")]
    Parse {
        row: usize,
        column: String,
        reason: String,
    },

    #[error("unsupported file extension: .{0}")]
    UnsupportedFormat(String),

    #[error("invalid bucket layout: {0}")]
    InvalidBuckets(String),

    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("malformed parquet: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    #[error("arrow: {0}")]
    Arrow(#[from] arrow::error::ArrowError),
}

impl DataError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        DataError::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn parse(row: usize, column: &str, reason: impl Into<String>) -> Self {
        DataError::Parse {
            row,
            column: column.to_string(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, DataError>;
