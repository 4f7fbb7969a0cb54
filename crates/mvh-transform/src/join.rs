//! Ordered inner join of the normalized tables.
//!
//! The join is a fold: the first table is the accumulator and every later
//! table is folded in with the same reduction, an inner join on
//! `(Country, Year)`. Adding a source means adding a table to the input list.

use mvh_model::SourceKind;
use mvh_model::columns::{COUNTRY, STRAY_COLUMNS, YEAR};
use polars::prelude::*;
use tracing::{debug, info};

use crate::error::{Result, TransformError};
use crate::normalize::NormalizedTable;

const KEYS: [&str; 2] = [COUNTRY, YEAR];

/// Row counts around one fold step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinStep {
    pub source: SourceKind,
    pub rows_before: usize,
    pub source_rows: usize,
    pub rows_after: usize,
}

/// Result of [`join_sources`].
#[derive(Debug, Clone)]
pub struct JoinOutcome {
    /// The reconciled table, sorted by country then year.
    pub frame: DataFrame,
    pub steps: Vec<JoinStep>,
    /// Stray columns that were present and removed.
    pub dropped_columns: Vec<String>,
}

/// Folds the tables into one with inner joins on `(Country, Year)`.
///
/// Table order fixes column order in the output. A non-key column that
/// appears in two tables is an error.
pub fn join_sources(tables: Vec<NormalizedTable>) -> Result<JoinOutcome> {
    let mut tables = tables.into_iter();
    let first = tables.next().ok_or(TransformError::NothingToJoin)?;
    debug!(source = %first.source, rows = first.frame.height(), "join base");

    let mut steps = Vec::new();
    let joined = tables.try_fold(first.frame, |acc, table| {
        let rows_before = acc.height();
        let source_rows = table.frame.height();
        let out = join_on_keys(acc, table.source, table.frame)?;
        debug!(
            source = %table.source,
            rows_before,
            source_rows,
            rows_after = out.height(),
            "joined source"
        );
        steps.push(JoinStep {
            source: table.source,
            rows_before,
            source_rows,
            rows_after: out.height(),
        });
        Ok::<_, TransformError>(out)
    })?;

    let (frame, dropped_columns) = drop_stray_columns(joined)?;
    let frame = frame.sort(KEYS, SortMultipleOptions::default())?;
    info!(
        rows = frame.height(),
        columns = frame.width(),
        "sources joined"
    );
    Ok(JoinOutcome {
        frame,
        steps,
        dropped_columns,
    })
}

/// The reduction: inner join of `right` into `left`.
fn join_on_keys(left: DataFrame, source: SourceKind, right: DataFrame) -> Result<DataFrame> {
    for name in right.get_column_names_str() {
        if !KEYS.contains(&name) && left.get_column_index(name).is_some() {
            return Err(TransformError::ColumnClash {
                table: source.key().to_string(),
                column: name.to_string(),
            });
        }
    }

    let keys = [col(COUNTRY), col(YEAR)];
    Ok(left
        .lazy()
        .join(
            right.lazy(),
            keys.clone(),
            keys,
            JoinArgs::new(JoinType::Inner),
        )
        .collect()?)
}

fn drop_stray_columns(mut df: DataFrame) -> Result<(DataFrame, Vec<String>)> {
    let mut dropped = Vec::new();
    for name in STRAY_COLUMNS {
        if df.get_column_index(name).is_some() {
            df = df.drop(name)?;
            dropped.push(name.to_string());
        }
    }
    if !dropped.is_empty() {
        debug!(columns = ?dropped, "dropped stray columns");
    }
    Ok((df, dropped))
}
