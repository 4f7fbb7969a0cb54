//! Sources that only need a column selection and renames.

use mvh_model::SourceKind;
use mvh_model::columns::*;
use polars::prelude::DataFrame;

use super::{SourceNormalizer, metric};
use crate::error::Result;
use crate::keys::key_columns;

/// Selects the key columns plus a fixed list of `(input, output)` metrics.
#[derive(Debug, Clone, Copy)]
pub struct RenameSelect {
    pub source: SourceKind,
    pub country: &'static str,
    pub year: &'static str,
    pub metrics: &'static [(&'static str, &'static str)],
}

pub(super) const WHR: RenameSelect = RenameSelect {
    source: SourceKind::Whr,
    country: "Country name",
    year: "year",
    metrics: &[
        (LIFE_LADDER, LIFE_LADDER),
        (LOG_GDP, LOG_GDP),
        (SOCIAL_SUPPORT, SOCIAL_SUPPORT),
        (HEALTHY_LIFE_EXPECTANCY, HEALTHY_LIFE_EXPECTANCY),
        (FREEDOM_CHOICE, FREEDOM_CHOICE),
        (GENEROSITY, GENEROSITY),
        (CORRUPTION, CORRUPTION),
        (POSITIVE_AFFECT, POSITIVE_AFFECT),
        (NEGATIVE_AFFECT, NEGATIVE_AFFECT),
    ],
};

pub(super) const FOOD: RenameSelect = RenameSelect {
    source: SourceKind::Food,
    country: COUNTRY,
    year: YEAR,
    metrics: &[
        (FOOD_KCAL, FOOD_KCAL),
        (FOOD_PROTEIN, FOOD_PROTEIN),
        (FOOD_FAT, FOOD_FAT),
    ],
};

pub(super) const DEATHS_SOURCE: RenameSelect = RenameSelect {
    source: SourceKind::Deaths,
    country: "Entity",
    year: YEAR,
    metrics: &[(
        "Deaths in ongoing conflicts in a country (best estimate) - Conflict type: all",
        DEATHS,
    )],
};

pub(super) const HDI_SOURCE: RenameSelect = RenameSelect {
    source: SourceKind::Hdi,
    country: "Entity",
    year: YEAR,
    metrics: &[(HDI, HDI)],
};

pub(super) const RULE_OF_LAW_SOURCE: RenameSelect = RenameSelect {
    source: SourceKind::RuleOfLaw,
    country: "Entity",
    year: YEAR,
    metrics: &[(
        "Rule of Law index (best estimate, aggregate: average)",
        RULE_OF_LAW,
    )],
};

pub(super) const MEDIAN_AGE_SOURCE: RenameSelect = RenameSelect {
    source: SourceKind::MedianAge,
    country: "Entity",
    year: YEAR,
    metrics: &[(
        "Median age - Sex: all - Age: all - Variant: estimates",
        MEDIAN_AGE,
    )],
};

pub(super) const URBAN_POPULATION_SOURCE: RenameSelect = RenameSelect {
    source: SourceKind::UrbanPopulation,
    country: "Entity",
    year: YEAR,
    metrics: &[(
        "Urban population (% of total population)",
        URBAN_POPULATION,
    )],
};

pub(super) const TAX_REVENUE_SOURCE: RenameSelect = RenameSelect {
    source: SourceKind::TaxRevenue,
    country: "Entity",
    year: YEAR,
    metrics: &[(
        "Taxes including social contributions (as a share of GDP)",
        TAX_REVENUE,
    )],
};

impl SourceNormalizer for RenameSelect {
    fn source(&self) -> SourceKind {
        self.source
    }

    fn required_columns(&self) -> Vec<&'static str> {
        let mut columns = vec![self.country, self.year];
        columns.extend(self.metrics.iter().map(|(input, _)| *input));
        columns
    }

    fn normalize(&self, raw: &DataFrame) -> Result<DataFrame> {
        let mut columns = Vec::with_capacity(self.metrics.len() + 2);
        columns.extend(key_columns(raw, self.source.key(), self.country, self.year)?);
        for (input, output) in self.metrics {
            columns.push(metric(raw, input, output)?);
        }
        Ok(DataFrame::new(columns)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::string_frame as raw;
    use mvh_common::{column_f64, column_strings};

    #[test]
    fn renames_and_drops_other_columns() {
        let df = raw(vec![
            ("Entity", vec!["Norway", "Chile"]),
            ("Code", vec!["NOR", "CHL"]),
            ("Year", vec!["2019", "2019"]),
            (HDI, vec!["0.957", "n/a"]),
        ]);
        let out = HDI_SOURCE.normalize(&df).unwrap();
        assert_eq!(out.get_column_names_str(), vec![COUNTRY, YEAR, HDI]);
        assert_eq!(
            column_f64(out.column(HDI).unwrap()).unwrap(),
            vec![Some(0.957), None]
        );
    }

    #[test]
    fn whr_uses_report_headers() {
        let mut columns = vec![("Country name", vec!["Costa Rica"]), ("year", vec!["2018.0"])];
        for (input, _) in WHR.metrics {
            columns.push((*input, vec!["1"]));
        }
        let out = WHR.normalize(&raw(columns)).unwrap();
        assert_eq!(out.width(), 11);
        assert_eq!(
            column_strings(&out, COUNTRY).unwrap(),
            vec![Some("Costa Rica".to_string())]
        );
        assert_eq!(out.column(YEAR).unwrap().i64().unwrap().get(0), Some(2018));
    }

    #[test]
    fn required_columns_list_inputs() {
        assert_eq!(
            TAX_REVENUE_SOURCE.required_columns(),
            vec![
                "Entity",
                YEAR,
                "Taxes including social contributions (as a share of GDP)"
            ]
        );
    }
}
