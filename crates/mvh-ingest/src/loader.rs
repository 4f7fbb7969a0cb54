//! Loading configured sources.

use std::path::{Path, PathBuf};
use std::time::Instant;

use mvh_model::{FileFormat, SourceConfig, SourceKind};
use polars::prelude::DataFrame;
use tracing::{debug, info, warn};

use crate::delimited::read_delimited;
use crate::error::{IngestError, Result};
use crate::spreadsheet::read_spreadsheet;

/// One source as read from disk. Consumed once by its normalizer.
#[derive(Debug, Clone)]
pub struct RawTable {
    pub source: SourceKind,
    pub path: PathBuf,
    pub frame: DataFrame,
}

/// Reads a table, choosing the reader from the file extension.
pub fn read_table(path: &Path) -> Result<DataFrame> {
    match FileFormat::from_path(path) {
        Some(FileFormat::Delimited { separator }) => read_delimited(path, separator),
        Some(FileFormat::Spreadsheet) => read_spreadsheet(path),
        None => Err(IngestError::UnsupportedFormat {
            path: path.to_path_buf(),
        }),
    }
}

/// Loads one configured source.
///
/// Fails on a missing file, an unreadable file, or a table with no rows.
pub fn load_source(config: &SourceConfig, source: SourceKind) -> Result<RawTable> {
    let path = config.path_for(source);
    let start = Instant::now();
    debug!(source = %source, path = %path.display(), "loading source");

    let frame = read_table(&path)?;
    if frame.height() == 0 {
        return Err(IngestError::EmptyTable { path });
    }
    if frame.width() > 500 {
        warn!(
            source = %source,
            columns = frame.width(),
            "source has more than 500 columns"
        );
    }

    info!(
        source = %source,
        rows = frame.height(),
        columns = frame.width(),
        duration_ms = start.elapsed().as_millis(),
        "source loaded"
    );
    Ok(RawTable {
        source,
        path,
        frame,
    })
}
