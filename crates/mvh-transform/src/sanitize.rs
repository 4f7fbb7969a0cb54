//! Numeric coercion of the required columns and removal of incomplete rows.

use std::collections::BTreeMap;

use mvh_common::{any_to_f64, any_to_i64_exact, float_column};
use mvh_model::columns::YEAR;
use polars::prelude::{BooleanChunked, Column, DataFrame, IntoColumn, NamedFrom, NewChunkedArray, Series};
use tracing::{debug, info};

use crate::error::{Result, TransformError};

/// What the sanitizer did to a table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SanitizeReport {
    pub rows_in: usize,
    pub rows_out: usize,
    /// Per required column: cells that were present but not numeric.
    pub coerced_to_missing: BTreeMap<String, usize>,
    /// Per required column: cells missing after coercion.
    pub missing: BTreeMap<String, usize>,
}

impl SanitizeReport {
    pub fn rows_dropped(&self) -> usize {
        self.rows_in - self.rows_out
    }
}

/// Coerces every `required` column to numeric, then drops each row with a
/// missing value in any of them.
///
/// `Year` becomes Int64 (non-integer values are missing); every other
/// required column becomes Float64. `NaN` counts as missing.
///
/// # Errors
///
/// A required column absent from `df` is a schema error.
pub fn sanitize(df: DataFrame, required: &[&str]) -> Result<(DataFrame, SanitizeReport)> {
    let rows_in = df.height();
    let mut df = df;
    let mut report = SanitizeReport {
        rows_in,
        ..SanitizeReport::default()
    };
    let mut complete = vec![true; rows_in];

    for name in required {
        let column = df
            .column(name)
            .map_err(|_| TransformError::schema("reconciled", name))?;
        let (coerced, present, coerced_missing) = coerce(column, name)?;
        let missing = present.iter().filter(|p| !**p).count();
        for (keep, is_present) in complete.iter_mut().zip(&present) {
            *keep &= *is_present;
        }
        if coerced_missing > 0 {
            debug!(column = *name, values = coerced_missing, "non-numeric values coerced to missing");
        }
        report.coerced_to_missing.insert(name.to_string(), coerced_missing);
        report.missing.insert(name.to_string(), missing);
        df.with_column(coerced)?;
    }

    let mask = BooleanChunked::from_slice("complete".into(), &complete);
    let df = df.filter(&mask)?;
    report.rows_out = df.height();

    info!(
        rows_in,
        rows_out = report.rows_out,
        dropped = report.rows_dropped(),
        "numeric sanitization complete"
    );
    Ok((df, report))
}

/// Returns the coerced column, per-row presence, and how many non-empty cells
/// failed to parse.
fn coerce(column: &Column, name: &str) -> Result<(Column, Vec<bool>, usize)> {
    let mut present = Vec::with_capacity(column.len());
    let mut failed = 0;

    if name == YEAR {
        let mut values: Vec<Option<i64>> = Vec::with_capacity(column.len());
        for idx in 0..column.len() {
            let cell = column.get(idx)?;
            let was_null = cell.is_null() || is_blank(&cell);
            let value = any_to_i64_exact(cell);
            if value.is_none() && !was_null {
                failed += 1;
            }
            present.push(value.is_some());
            values.push(value);
        }
        let column = Series::new(name.into(), values).into_column();
        return Ok((column, present, failed));
    }

    let mut values = Vec::with_capacity(column.len());
    for idx in 0..column.len() {
        let cell = column.get(idx)?;
        let was_null = cell.is_null() || is_blank(&cell);
        let value = any_to_f64(cell).filter(|v| !v.is_nan());
        if value.is_none() && !was_null {
            failed += 1;
        }
        present.push(value.is_some());
        values.push(value);
    }
    Ok((float_column(name, values), present, failed))
}

fn is_blank(cell: &polars::prelude::AnyValue<'_>) -> bool {
    cell.get_str().is_some_and(|s| s.trim().is_empty())
}
