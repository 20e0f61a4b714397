//! Error types for the scoring pipeline.

use std::collections::BTreeSet;
use std::path::PathBuf;
use thiserror::Error;

/// Raised when an uploaded dataset lacks columns the model requires.
///
/// Recoverable and surfaced to the caller; a table that fails schema
/// validation must not reach model inference.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("dataset is missing required columns: {missing_columns:?}")]
pub struct SchemaError {
    /// Names of the required columns absent from the input.
    pub missing_columns: BTreeSet<String>,
}

impl SchemaError {
    pub fn new(missing_columns: BTreeSet<String>) -> Self {
        Self { missing_columns }
    }
}

/// Error ingesting a tabular dataset.
#[derive(Debug, Error)]
pub enum TableError {
    /// Error reading or accessing a file.
    #[error("IO error for '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Error from the CSV library.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}
