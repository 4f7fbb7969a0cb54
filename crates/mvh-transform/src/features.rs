//! Derived indicator columns.
//!
//! Eight features are per-row formulas. `Hedonic_Growth_Rate` is a
//! per-country first difference of GDP ordered by year, divided by the
//! current Life Ladder. Zero denominators are not guarded except in
//! `Positivity_Ratio`: they produce IEEE infinities or NaN, which are counted
//! and reported so a caller can see them.

use std::cmp::Ordering;

use mvh_common::{column_f64, column_strings, float_column};
use mvh_model::columns::*;
use polars::prelude::DataFrame;
use tracing::{info, warn};

use crate::error::{Result, TransformError};

/// Added to `Negative affect` in the `Positivity_Ratio` denominator.
pub const POSITIVITY_EPSILON: f64 = 1e-6;

/// Outcome of [`engineer_features`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeatureReport {
    pub rows: usize,
    /// Non-finite values per derived column, in output order.
    pub non_finite: Vec<(&'static str, usize)>,
}

impl FeatureReport {
    pub fn total_non_finite(&self) -> usize {
        self.non_finite.iter().map(|(_, count)| count).sum()
    }
}

type Values = Vec<Option<f64>>;

/// Appends the nine derived columns to a sanitized table.
///
/// # Errors
///
/// A missing input column is a schema error.
pub fn engineer_features(df: DataFrame) -> Result<(DataFrame, FeatureReport)> {
    for name in FEATURE_INPUTS {
        if df.get_column_index(name).is_none() {
            return Err(TransformError::schema("reconciled", name));
        }
    }

    let read = |name: &str| -> Result<Values> { Ok(column_f64(df.column(name)?)?) };
    let ladder = read(LIFE_LADDER)?;
    let gdp = read(LOG_GDP)?;
    let social = read(SOCIAL_SUPPORT)?;
    let freedom = read(FREEDOM_CHOICE)?;
    let generosity = read(GENEROSITY)?;
    let corruption = read(CORRUPTION)?;
    let positive = read(POSITIVE_AFFECT)?;
    let negative = read(NEGATIVE_AFFECT)?;
    let emissions = read(TOTAL_EMISSIONS)?;
    let urban = read(URBAN_POPULATION)?;
    let years = read(YEAR)?;
    let countries = column_strings(&df, COUNTRY)?;

    let features: [(&'static str, Values); 9] = [
        (FREEDOM_INDEX, zip(&gdp, &freedom, |g, f| g * f)),
        (GENEROSITY_PER_DOLLAR, zip(&generosity, &gdp, |giving, g| giving / g)),
        (TRUST_FACTOR, zip(&corruption, &ladder, |c, l| (1.0 - c) * l)),
        (SOCIAL_CUSHION_INDEX, zip(&social, &ladder, |s, l| s * l)),
        (URBAN_STRESS_BALANCE, zip(&urban, &negative, |u, n| u * n)),
        (
            HEDONIC_GROWTH_RATE,
            hedonic_growth(&countries, &years, &gdp, &ladder),
        ),
        (ENVIRONMENTAL_BONUS, zip(&ladder, &emissions, |l, e| l / (1.0 + e))),
        (
            POSITIVITY_RATIO,
            zip(&positive, &negative, |p, n| p / (n + POSITIVITY_EPSILON)),
        ),
        (TRADE_OFF_INDEX, zip(&gdp, &ladder, |g, l| g / l)),
    ];

    let mut df = df;
    let mut report = FeatureReport {
        rows: df.height(),
        non_finite: Vec::with_capacity(features.len()),
    };
    for (name, values) in features {
        let count = values
            .iter()
            .filter(|v| v.is_some_and(|v| !v.is_finite()))
            .count();
        if count > 0 {
            warn!(feature = name, values = count, "non-finite feature values");
        }
        report.non_finite.push((name, count));
        df.with_column(float_column(name, values))?;
    }

    info!(
        rows = report.rows,
        non_finite = report.total_non_finite(),
        "features derived"
    );
    Ok((df, report))
}

fn zip(a: &[Option<f64>], b: &[Option<f64>], f: impl Fn(f64, f64) -> f64) -> Values {
    a.iter()
        .zip(b)
        .map(|(x, y)| Some(f((*x)?, (*y)?)))
        .collect()
}

/// `(gdp[t] - gdp[t-1]) / ladder[t]` within each country, rows visited in
/// `(Country, Year)` order and written back to their original positions.
/// The first year of each country is missing.
fn hedonic_growth(
    countries: &[Option<String>],
    years: &[Option<f64>],
    gdp: &[Option<f64>],
    ladder: &[Option<f64>],
) -> Values {
    let mut order: Vec<usize> = (0..countries.len()).collect();
    order.sort_by(|&a, &b| {
        countries[a]
            .cmp(&countries[b])
            .then_with(|| compare_years(years[a], years[b]))
    });

    let mut out = vec![None; countries.len()];
    let mut previous: Option<usize> = None;
    for idx in order {
        if let Some(prev) = previous.filter(|&p| countries[p] == countries[idx]) {
            out[idx] = match (gdp[idx], gdp[prev], ladder[idx]) {
                (Some(current), Some(before), Some(l)) => Some((current - before) / l),
                _ => None,
            };
        }
        previous = Some(idx);
    }
    out
}

fn compare_years(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.total_cmp(&b),
        (a, b) => a.is_some().cmp(&b.is_some()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mvh_common::{int_column, string_column};

    /// One row per `(country, year, gdp)`, every other input set to 1.
    fn reconciled(rows: &[(&str, i64, f64)]) -> DataFrame {
        let ones = || rows.iter().map(|_| Some(1.0)).collect::<Values>();
        let mut columns = vec![
            string_column(COUNTRY, rows.iter().map(|(c, _, _)| Some(c.to_string())).collect()),
            int_column(YEAR, rows.iter().map(|(_, y, _)| *y).collect()),
            float_column(LOG_GDP, rows.iter().map(|(_, _, g)| Some(*g)).collect()),
        ];
        for name in FEATURE_INPUTS {
            if ![COUNTRY, YEAR, LOG_GDP].contains(&name) {
                columns.push(float_column(name, ones()));
            }
        }
        DataFrame::new(columns).unwrap()
    }

    fn feature(df: &DataFrame, name: &str) -> Values {
        column_f64(df.column(name).unwrap()).unwrap()
    }

    #[test]
    fn appends_derived_columns_in_order() {
        let (out, report) = engineer_features(reconciled(&[("Peru", 2019, 9.0)])).unwrap();
        let names = out.get_column_names_str();
        assert_eq!(&names[names.len() - 9..], &DERIVED[..]);
        assert_eq!(report.rows, 1);
        assert_eq!(report.total_non_finite(), 0);
        assert_eq!(feature(&out, FREEDOM_INDEX), vec![Some(9.0)]);
        assert_eq!(feature(&out, TRUST_FACTOR), vec![Some(0.0)]);
        assert_eq!(feature(&out, ENVIRONMENTAL_BONUS), vec![Some(0.5)]);
    }

    #[test]
    fn zero_gdp_yields_infinite_generosity_per_dollar() {
        let mut df = reconciled(&[("Peru", 2019, 0.0)]);
        df.with_column(float_column(GENEROSITY, vec![Some(0.2)])).unwrap();
        let (out, report) = engineer_features(df).unwrap();

        let value = feature(&out, GENEROSITY_PER_DOLLAR)[0].unwrap();
        assert!(value.is_infinite() && value > 0.0);
        let counts: std::collections::HashMap<_, _> = report.non_finite.into_iter().collect();
        assert_eq!(counts[GENEROSITY_PER_DOLLAR], 1);
        assert_eq!(counts[TRADE_OFF_INDEX], 0);
    }

    #[test]
    fn positivity_ratio_survives_zero_negative_affect() {
        let mut df = reconciled(&[("Peru", 2019, 1.0)]);
        df.with_column(float_column(NEGATIVE_AFFECT, vec![Some(0.0)])).unwrap();
        let (out, _) = engineer_features(df).unwrap();
        let ratio = feature(&out, POSITIVITY_RATIO)[0].unwrap();
        assert!(ratio.is_finite());
        assert!((ratio - 1.0 / POSITIVITY_EPSILON).abs() < 1e-3);
    }

    #[test]
    fn hedonic_growth_follows_year_order_within_country() {
        let df = reconciled(&[
            ("Peru", 2020, 9.5),
            ("Chad", 2019, 7.0),
            ("Peru", 2018, 9.0),
            ("Peru", 2019, 9.25),
        ]);
        let (out, _) = engineer_features(df).unwrap();
        assert_eq!(
            feature(&out, HEDONIC_GROWTH_RATE),
            vec![Some(0.25), None, None, Some(0.25)]
        );
    }

    #[test]
    fn missing_input_is_a_schema_error() {
        let df = reconciled(&[("Peru", 2019, 9.0)]).drop(URBAN_POPULATION).unwrap();
        let err = engineer_features(df).unwrap_err();
        assert!(matches!(err, TransformError::Schema { ref column, .. } if column == URBAN_POPULATION));
    }
}
