//! Property tests for the invariants that hold over every input.

use std::collections::{BTreeMap, BTreeSet};

use mvh_common::{column_f64, float_column, int_column, string_column};
use mvh_model::columns::*;
use mvh_model::{DuplicateKeyPolicy, SourceKind};
use mvh_transform::{canonicalize_country, duplicate_keys, engineer_features, normalize_source};
use polars::prelude::DataFrame;
use proptest::prelude::*;

const COUNTRIES: [&str; 4] = ["Norway", "Chad", "Peru", "Oman"];

/// Sanitized-shaped table with the given keys and negative affect values.
fn reconciled(keys: &[(usize, i64)], negative: &[f64]) -> DataFrame {
    let height = keys.len();
    let mut columns = vec![
        string_column(
            COUNTRY,
            keys.iter().map(|(c, _)| Some(COUNTRIES[*c].to_string())).collect(),
        ),
        int_column(YEAR, keys.iter().map(|(_, y)| *y).collect()),
        float_column(NEGATIVE_AFFECT, negative.iter().copied().map(Some).collect()),
    ];
    for name in FEATURE_INPUTS {
        if ![COUNTRY, YEAR, NEGATIVE_AFFECT].contains(&name) {
            columns.push(float_column(name, vec![Some(1.5); height]));
        }
    }
    DataFrame::new(columns).unwrap()
}

proptest! {
    #[test]
    fn positivity_ratio_is_finite_for_non_negative_affect(
        negative in prop::collection::vec(0.0f64..1.0e6, 1..20)
    ) {
        let keys: Vec<(usize, i64)> = (0..negative.len()).map(|i| (0, 2000 + i as i64)).collect();
        let (out, _) = engineer_features(reconciled(&keys, &negative)).unwrap();
        let ratios = column_f64(out.column(POSITIVITY_RATIO).unwrap()).unwrap();
        prop_assert!(ratios.iter().all(|r| r.is_some_and(f64::is_finite)));
    }

    #[test]
    fn hedonic_growth_is_missing_only_for_first_year(
        keys in prop::collection::btree_set((0usize..4, 2005i64..2025), 1..40)
    ) {
        let keys: Vec<(usize, i64)> = keys.into_iter().rev().collect();
        let negative = vec![0.5; keys.len()];
        let (out, _) = engineer_features(reconciled(&keys, &negative)).unwrap();
        let growth = column_f64(out.column(HEDONIC_GROWTH_RATE).unwrap()).unwrap();

        let mut first_year: BTreeMap<usize, i64> = BTreeMap::new();
        for (country, year) in &keys {
            let entry = first_year.entry(*country).or_insert(*year);
            *entry = (*entry).min(*year);
        }
        for ((country, year), value) in keys.iter().zip(&growth) {
            prop_assert_eq!(value.is_none(), first_year[country] == *year);
        }
    }

    #[test]
    fn normalized_keys_are_unique(
        rows in prop::collection::vec((0usize..4, 2015i64..2019, "[ .,']{0,2}"), 1..30)
    ) {
        let raw = DataFrame::new(vec![
            string_column(
                "Entity",
                rows.iter().map(|(c, _, noise)| Some(format!("{}{noise}", COUNTRIES[*c]))).collect(),
            ),
            string_column(YEAR, rows.iter().map(|(_, y, _)| Some(y.to_string())).collect()),
            string_column(HDI, rows.iter().map(|_| Some("0.5".to_string())).collect()),
        ])
        .unwrap();
        let table = normalize_source(SourceKind::Hdi, &raw, DuplicateKeyPolicy::KeepFirst).unwrap();
        prop_assert!(duplicate_keys(&table.frame).unwrap().is_empty());

        let distinct: BTreeSet<(usize, i64)> = rows.iter().map(|(c, y, _)| (*c, *y)).collect();
        prop_assert_eq!(table.frame.height(), distinct.len());
    }

    #[test]
    fn canonical_country_has_no_punctuation(raw in "\\PC{0,24}") {
        let canonical = canonicalize_country(&raw);
        prop_assert!(canonical.chars().all(|c| c.is_alphanumeric() || c.is_whitespace()));
        prop_assert_eq!(canonical.trim(), canonical.as_str());
    }
}
