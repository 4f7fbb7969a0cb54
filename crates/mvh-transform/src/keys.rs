//! Key canonicalization and uniqueness.
//!
//! Every normalized table is keyed by `(Country, Year)`. Country names are
//! reduced to alphanumerics and inner whitespace so that `U.S.A.` and `USA`
//! meet in the join; years must be integer-like.

use std::collections::{HashMap, HashSet};

use mvh_common::{any_to_i64_exact, any_to_string, int_column, string_column};
use mvh_model::DuplicateKeyPolicy;
use mvh_model::columns::{COUNTRY, YEAR};
use polars::prelude::{AnyValue, BooleanChunked, Column, DataFrame, NewChunkedArray};
use tracing::warn;

use crate::error::{Result, TransformError};

/// Removes every character that is neither alphanumeric nor whitespace, then
/// trims.
///
/// Idempotent: `canonicalize_country(&canonicalize_country(s)) ==
/// canonicalize_country(s)`.
///
/// # Examples
///
/// ```
/// use mvh_transform::canonicalize_country;
///
/// assert_eq!(canonicalize_country("U.S.A."), "USA");
/// assert_eq!(canonicalize_country("  Côte d'Ivoire "), "Côte dIvoire");
/// ```
pub fn canonicalize_country(raw: &str) -> String {
    let kept: String = raw
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace())
        .collect();
    kept.trim().to_string()
}

/// Canonical country for one cell. Missing or empty-after-canonicalization
/// values are key errors.
pub(crate) fn country_key(value: AnyValue<'_>, table: &str, row: usize) -> Result<String> {
    let raw = any_to_string(value);
    let country = canonicalize_country(&raw);
    if country.is_empty() {
        return Err(TransformError::EmptyCountry {
            table: table.to_string(),
            row,
            value: raw,
        });
    }
    Ok(country)
}

/// Strict integer year for one cell.
pub(crate) fn year_key(value: AnyValue<'_>, table: &str, row: usize, column: &str) -> Result<i64> {
    let raw = value.clone();
    any_to_i64_exact(value).ok_or_else(|| TransformError::KeyParse {
        table: table.to_string(),
        row,
        column: column.to_string(),
        value: any_to_string(raw),
    })
}

/// Builds canonical `Country` (String) and `Year` (Int64) columns from the
/// named source columns.
pub(crate) fn key_columns(
    df: &DataFrame,
    table: &str,
    country_column: &str,
    year_column: &str,
) -> Result<[Column; 2]> {
    let countries = df.column(country_column)?;
    let years = df.column(year_column)?;

    let mut country_values = Vec::with_capacity(df.height());
    let mut year_values = Vec::with_capacity(df.height());
    for row in 0..df.height() {
        country_values.push(Some(country_key(countries.get(row)?, table, row)?));
        year_values.push(year_key(years.get(row)?, table, row, year_column)?);
    }

    Ok([
        string_column(COUNTRY, country_values),
        int_column(YEAR, year_values),
    ])
}

/// A `(Country, Year)` pair that occurs more than once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateKey {
    pub country: String,
    pub year: i64,
    pub count: usize,
    /// Row index of the first occurrence.
    pub first_row: usize,
}

/// Finds every duplicated key, ordered by first occurrence.
pub fn duplicate_keys(df: &DataFrame) -> Result<Vec<DuplicateKey>> {
    let keys = read_keys(df)?;
    let mut counts: HashMap<&(String, i64), (usize, usize)> = HashMap::new();
    for (row, key) in keys.iter().enumerate() {
        counts.entry(key).or_insert((row, 0)).1 += 1;
    }

    let mut duplicates: Vec<DuplicateKey> = counts
        .into_iter()
        .filter(|(_, (_, count))| *count > 1)
        .map(|((country, year), (first_row, count))| DuplicateKey {
            country: country.clone(),
            year: *year,
            count,
            first_row,
        })
        .collect();
    duplicates.sort_by_key(|dup| dup.first_row);
    Ok(duplicates)
}

/// Applies the duplicate-key policy to a normalized table.
///
/// Returns the table and the number of rows removed. `Reject` fails on the
/// first duplicated key; `KeepFirst` keeps the first row of each key.
pub fn enforce_unique_keys(
    df: DataFrame,
    table: &str,
    policy: DuplicateKeyPolicy,
) -> Result<(DataFrame, usize)> {
    let duplicates = duplicate_keys(&df)?;
    let Some(first) = duplicates.first() else {
        return Ok((df, 0));
    };

    match policy {
        DuplicateKeyPolicy::Reject => Err(TransformError::DuplicateKey {
            table: table.to_string(),
            country: first.country.clone(),
            year: first.year,
            count: first.count,
        }),
        DuplicateKeyPolicy::KeepFirst => {
            let keys = read_keys(&df)?;
            let mut seen = HashSet::with_capacity(keys.len());
            let mask: Vec<bool> = keys.iter().map(|key| seen.insert(key)).collect();
            let dropped = mask.iter().filter(|keep| !**keep).count();
            let filtered = df.filter(&BooleanChunked::from_slice("keep".into(), &mask))?;
            warn!(
                source = table,
                keys = duplicates.len(),
                dropped,
                "duplicate keys resolved by keeping the first row"
            );
            Ok((filtered, dropped))
        }
    }
}

fn read_keys(df: &DataFrame) -> Result<Vec<(String, i64)>> {
    let countries = df.column(COUNTRY)?;
    let years = df.column(YEAR)?;
    let mut keys = Vec::with_capacity(df.height());
    for row in 0..df.height() {
        let country = any_to_string(countries.get(row)?);
        let year = year_key(years.get(row)?, "key", row, YEAR)?;
        keys.push((country, year));
    }
    Ok(keys)
}
