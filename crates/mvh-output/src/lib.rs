//! Output generation for the reconciliation pipeline.
//!
//! Tables are written as comma-separated text with a header row. Floats are
//! written without trailing zeros, non-finite values as `inf`, `-inf` and
//! `NaN`, and missing values as empty fields. Each file is written to a
//! temporary sibling and renamed into place, so a failed run never leaves a
//! truncated table behind.

mod error;
mod reader;
mod writer;

pub use error::{OutputError, Result};
pub use reader::read_reconciled;
pub use writer::{ENGINEERED_FILE, RECONCILED_FILE, OutputPaths, write_table, write_tables};
