use std::path::PathBuf;

use thiserror::Error;

/// Reasons a dataset cannot be loaded.  Every variant is fatal for the
/// dashboard: nothing is rendered from a partially loaded file.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Data file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Unsupported file extension: .{0}")]
    UnsupportedFormat(String),

    #[error("Dataset is missing the '{column}' column")]
    MissingColumn { column: String },

    #[error("Row {row}: invalid {column} value '{value}'")]
    Malformed {
        row: usize,
        column: String,
        value: String,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type LoadResult<T> = Result<T, LoadError>;

impl LoadError {
    pub(crate) fn missing(column: &str) -> Self {
        LoadError::MissingColumn {
            column: column.to_string(),
        }
    }

    pub(crate) fn malformed(row: usize, column: &str, value: impl Into<String>) -> Self {
        LoadError::Malformed {
            row,
            column: column.to_string(),
            value: value.into(),
        }
    }
}
