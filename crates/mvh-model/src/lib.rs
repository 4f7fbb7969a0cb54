//! Data model shared by every stage of the reconciliation pipeline.
//!
//! - **source**: the eleven recognized sources, their formats and join order
//! - **columns**: canonical column names and the fixed column lists
//! - **config**: explicit source-path configuration passed into the loader

pub mod columns;
pub mod config;
pub mod error;
pub mod source;

pub use config::{DuplicateKeyPolicy, SourceConfig};
pub use error::{ConfigError, Result};
pub use source::{FileFormat, NormalizerCategory, SourceKind};
