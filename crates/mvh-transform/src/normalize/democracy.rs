//! Democracy index: one column per year, unpivoted to one row per
//! `(Country, Year)`.

use mvh_common::{any_to_f64, any_to_string, float_column, int_column, parse_i64_exact, string_column};
use mvh_model::SourceKind;
use mvh_model::columns::{COUNTRY, DEMOCRACY_INDEX, REGIME_TYPE, YEAR};
use polars::prelude::{DataFrame, SortMultipleOptions};
use tracing::debug;

use super::SourceNormalizer;
use crate::error::{Result, TransformError};
use crate::keys::country_key;

/// Years dropped during the reshape. 2006 is a data-collection gap in the
/// published index.
pub const EXCLUDED_YEARS: [i64; 1] = [2006];

const ID_COLUMNS: [&str; 2] = [COUNTRY, REGIME_TYPE];

/// Unpivots the year columns into `(Year, Democracy_Index)` pairs.
///
/// `Country` and `Regime type` are identifier columns; every other column
/// header must be an integer year. Output is sorted by country, then year.
#[derive(Debug, Clone, Copy, Default)]
pub struct DemocracyReshape;

impl SourceNormalizer for DemocracyReshape {
    fn source(&self) -> SourceKind {
        SourceKind::Tedi
    }

    fn required_columns(&self) -> Vec<&'static str> {
        ID_COLUMNS.to_vec()
    }

    fn normalize(&self, raw: &DataFrame) -> Result<DataFrame> {
        let table = self.source().key();

        let mut year_columns = Vec::new();
        for name in raw.get_column_names_str() {
            if ID_COLUMNS.contains(&name) {
                continue;
            }
            let year = parse_i64_exact(name).ok_or_else(|| TransformError::YearHeader {
                table: table.to_string(),
                column: name.to_string(),
            })?;
            if EXCLUDED_YEARS.contains(&year) {
                debug!(source = table, year, "excluding year column");
                continue;
            }
            year_columns.push((raw.column(name)?, year));
        }

        let countries = raw.column(COUNTRY)?;
        let regimes = raw.column(REGIME_TYPE)?;
        let capacity = raw.height() * year_columns.len();
        let mut out_country = Vec::with_capacity(capacity);
        let mut out_regime = Vec::with_capacity(capacity);
        let mut out_year = Vec::with_capacity(capacity);
        let mut out_index = Vec::with_capacity(capacity);

        for row in 0..raw.height() {
            let country = country_key(countries.get(row)?, table, row)?;
            let regime = any_to_string(regimes.get(row)?);
            let regime = (!regime.trim().is_empty()).then_some(regime);
            for (column, year) in &year_columns {
                out_country.push(Some(country.clone()));
                out_regime.push(regime.clone());
                out_year.push(*year);
                out_index.push(any_to_f64(column.get(row)?));
            }
        }

        let long = DataFrame::new(vec![
            string_column(COUNTRY, out_country),
            int_column(YEAR, out_year),
            string_column(REGIME_TYPE, out_regime),
            float_column(DEMOCRACY_INDEX, out_index),
        ])?;
        Ok(long.sort([COUNTRY, YEAR], SortMultipleOptions::default())?)
    }
}
