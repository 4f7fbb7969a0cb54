//! Re-reading a written table for the feature and describe stages.

use std::path::Path;

use mvh_common::{column_f64, float_column};
use mvh_ingest::read_table;
use mvh_model::columns::{COUNTRY, REGIME_TYPE};
use polars::prelude::{Column, DataFrame};
use tracing::debug;

use crate::error::Result;

/// Reads a reconciled or engineered table.
///
/// `Country` and `Regime type` stay text. Every other column whose non-empty
/// cells all parse as numbers becomes Float64; anything else stays text.
pub fn read_reconciled(path: &Path) -> Result<DataFrame> {
    let raw = read_table(path)?;
    let mut typed = Vec::with_capacity(raw.width());
    for column in raw.get_columns() {
        typed.push(type_column(column)?);
    }
    let df = DataFrame::new(typed)?;
    debug!(path = %path.display(), rows = df.height(), "reconciled table read");
    Ok(df)
}

fn type_column(column: &Column) -> Result<Column> {
    let name = column.name().as_str();
    if name == COUNTRY || name == REGIME_TYPE {
        return Ok(column.clone());
    }
    let values = column_f64(column)?;
    let numeric = values
        .iter()
        .zip(0..)
        .all(|(value, idx)| value.is_some() || is_empty(column, idx));
    if numeric {
        Ok(float_column(name, values))
    } else {
        Ok(column.clone())
    }
}

fn is_empty(column: &Column, idx: usize) -> bool {
    column
        .get(idx)
        .map(|v| v.get_str().is_none_or(|s| s.trim().is_empty()))
        .unwrap_or(true)
}
