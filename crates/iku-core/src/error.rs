//! Error types for aggregation and breakdown building.

use iku_ingest::IngestError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    // === Input Errors ===
    /// A metric spreadsheet could not be loaded.
    #[error(transparent)]
    Ingest(#[from] IngestError),

    /// A column the recipe groups or joins on is absent.
    #[error("column '{column}' not found in {table}")]
    MissingColumn { column: String, table: String },

    // === DataFrame Errors ===
    /// Failed DataFrame operation.
    #[error("DataFrame operation failed: {message}")]
    DataFrame { message: String },
}

impl CoreError {
    pub(crate) fn missing_column(column: &str, table: impl Into<String>) -> Self {
        Self::MissingColumn {
            column: column.to_string(),
            table: table.into(),
        }
    }

    /// Whether the error comes from an absent input spreadsheet.
    pub fn is_missing_input(&self) -> bool {
        matches!(self, CoreError::Ingest(IngestError::FileNotFound { .. }))
    }
}

impl From<polars::prelude::PolarsError> for CoreError {
    fn from(err: polars::prelude::PolarsError) -> Self {
        Self::DataFrame {
            message: err.to_string(),
        }
    }
}

/// Result type for aggregation operations.
pub type Result<T> = std::result::Result<T, CoreError>;
