//! Source ingestion for the reconciliation pipeline.
//!
//! This crate reads each configured source file into an untyped Polars
//! `DataFrame`: every column is a String column, exactly as found on disk.
//! Typing is left to the per-source normalizers, which know which columns are
//! keys (strict) and which are metrics (lenient).
//!
//! # Example
//!
//! ```ignore
//! use mvh_ingest::load_source;
//! use mvh_model::{SourceConfig, SourceKind};
//!
//! let config = SourceConfig::with_data_dir("data");
//! let raw = load_source(&config, SourceKind::Energy)?;
//! println!("{} rows from {}", raw.frame.height(), raw.path.display());
//! ```

mod delimited;
mod error;
mod loader;
mod spreadsheet;

// === Error Types ===
pub use error::{IngestError, Result};

// === Readers ===
pub use delimited::{MAX_FILE_SIZE, check_file_size, read_delimited, validate_encoding};
pub use spreadsheet::read_spreadsheet;

// === Loader ===
pub use loader::{RawTable, load_source, read_table};
