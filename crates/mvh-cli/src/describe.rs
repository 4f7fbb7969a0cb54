//! Country and year filters over an output table, and per-column statistics.

use anyhow::{Context, Result};
use mvh_common::{any_to_i64_exact, column_f64, column_strings};
use mvh_model::columns::{COUNTRY, YEAR};
use mvh_transform::canonicalize_country;
use polars::prelude::{BooleanChunked, DataFrame, DataType, NewChunkedArray};

/// Row filter. Empty `countries` keeps every country; year bounds are inclusive.
#[derive(Debug, Clone, Default)]
pub struct DescribeFilter {
    pub countries: Vec<String>,
    pub from_year: Option<i64>,
    pub to_year: Option<i64>,
}

/// Descriptive statistics of one numeric column. NaN and missing cells are
/// not counted.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnStats {
    pub column: String,
    pub count: usize,
    pub mean: Option<f64>,
    /// Sample standard deviation; needs at least two values.
    pub std: Option<f64>,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

/// Keeps the rows matching `filter`. Country names are compared in canonical form.
pub fn filter_rows(df: &DataFrame, filter: &DescribeFilter) -> Result<DataFrame> {
    let wanted: Vec<String> = filter
        .countries
        .iter()
        .map(|name| canonicalize_country(name))
        .collect();
    let countries = column_strings(df, COUNTRY).context("read Country column")?;
    let years = df.column(YEAR).context("read Year column")?;

    let mut keep = Vec::with_capacity(df.height());
    for (idx, country) in countries.iter().enumerate() {
        let country_ok = wanted.is_empty()
            || country
                .as_deref()
                .is_some_and(|c| wanted.iter().any(|w| w == c));
        let year = any_to_i64_exact(years.get(idx)?);
        let year_ok = match year {
            Some(year) => {
                filter.from_year.is_none_or(|from| year >= from)
                    && filter.to_year.is_none_or(|to| year <= to)
            }
            None => filter.from_year.is_none() && filter.to_year.is_none(),
        };
        keep.push(country_ok && year_ok);
    }
    let mask = BooleanChunked::from_slice("keep".into(), &keep);
    Ok(df.filter(&mask)?)
}

/// Statistics for every numeric column except `Year`, in table order.
pub fn describe(df: &DataFrame) -> Result<Vec<ColumnStats>> {
    let mut stats = Vec::new();
    for column in df.get_columns() {
        let name = column.name().as_str();
        if name == YEAR || !is_numeric(column.dtype()) {
            continue;
        }
        let values: Vec<f64> = column_f64(column)?
            .into_iter()
            .flatten()
            .filter(|v| !v.is_nan())
            .collect();
        stats.push(summarize(name, &values));
    }
    Ok(stats)
}

fn is_numeric(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Float64 | DataType::Float32 | DataType::Int64 | DataType::Int32
    )
}

fn summarize(name: &str, values: &[f64]) -> ColumnStats {
    let count = values.len();
    if count == 0 {
        return ColumnStats {
            column: name.to_string(),
            count,
            mean: None,
            std: None,
            min: None,
            max: None,
        };
    }
    let mean = values.iter().sum::<f64>() / count as f64;
    let std = (count > 1).then(|| {
        let squares: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
        (squares / (count - 1) as f64).sqrt()
    });
    ColumnStats {
        column: name.to_string(),
        count,
        mean: Some(mean),
        std,
        min: values.iter().copied().reduce(f64::min),
        max: values.iter().copied().reduce(f64::max),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mvh_common::{float_column, int_column, string_column};

    fn table() -> DataFrame {
        DataFrame::new(vec![
            string_column(
                COUNTRY,
                ["Norway", "Norway", "USA", "Chad"]
                    .map(|c| Some(c.to_string()))
                    .to_vec(),
            ),
            int_column(YEAR, vec![2018, 2019, 2019, 2020]),
            float_column("Life Ladder", vec![Some(7.0), Some(8.0), Some(6.0), None]),
            string_column("Regime type", vec![None; 4]),
        ])
        .unwrap()
    }

    #[test]
    fn filters_by_canonical_country_and_year_range() {
        let filter = DescribeFilter {
            countries: vec!["U.S.A.".to_string(), "Norway".to_string()],
            from_year: Some(2019),
            to_year: None,
        };
        let out = filter_rows(&table(), &filter).unwrap();
        assert_eq!(
            column_strings(&out, COUNTRY).unwrap(),
            vec![Some("Norway".to_string()), Some("USA".to_string())]
        );
    }

    #[test]
    fn empty_filter_keeps_everything() {
        let out = filter_rows(&table(), &DescribeFilter::default()).unwrap();
        assert_eq!(out.height(), 4);
    }

    #[test]
    fn statistics_skip_text_year_and_missing_values() {
        let stats = describe(&table()).unwrap();
        assert_eq!(stats.len(), 1);
        let ladder = &stats[0];
        assert_eq!(ladder.column, "Life Ladder");
        assert_eq!(ladder.count, 3);
        assert_eq!(ladder.mean, Some(7.0));
        assert_eq!(ladder.std, Some(1.0));
        assert_eq!(ladder.min, Some(6.0));
        assert_eq!(ladder.max, Some(8.0));
    }

    #[test]
    fn single_value_has_no_deviation() {
        let stats = summarize("x", &[2.5]);
        assert_eq!(stats.mean, Some(2.5));
        assert_eq!(stats.std, None);
    }
}
