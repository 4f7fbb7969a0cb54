//! Error types for output generation.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while writing or re-reading an output table.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum OutputError {
    /// Failed to create a directory, or to move a finished file into place.
    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to encode a CSV record.
    #[error("failed to write CSV {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// Failed to read a previously written table.
    #[error(transparent)]
    Read(#[from] mvh_ingest::IngestError),

    /// Polars DataFrame operation error.
    #[error("DataFrame error: {0}")]
    Polars(#[from] polars::error::PolarsError),
}

/// Result type for output operations.
pub type Result<T> = std::result::Result<T, OutputError>;
