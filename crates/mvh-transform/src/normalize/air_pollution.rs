//! Air pollution: six pollutant series collapsed into one total.

use mvh_common::float_column;
use mvh_model::SourceKind;
use mvh_model::columns::{TOTAL_EMISSIONS, YEAR};
use polars::prelude::DataFrame;

use super::{SourceNormalizer, sum_columns};
use crate::error::Result;
use crate::keys::key_columns;

/// Pollutant columns summed into `Total_Emissions`.
pub const POLLUTANT_COLUMNS: [&str; 6] = [
    "Nitrogen oxide (NOx)",
    "Sulphur dioxide (SO₂) emissions",
    "Carbon monoxide (CO) emissions",
    "Black carbon (BC) emissions",
    "Ammonia (NH₃) emissions",
    "Non-methane volatile organic compounds (NMVOC) emissions",
];

const ENTITY: &str = "Entity";

#[derive(Debug, Clone, Copy, Default)]
pub struct AirPollutionTotal;

impl SourceNormalizer for AirPollutionTotal {
    fn source(&self) -> SourceKind {
        SourceKind::AirPollution
    }

    fn required_columns(&self) -> Vec<&'static str> {
        let mut columns = vec![ENTITY, YEAR];
        columns.extend(POLLUTANT_COLUMNS);
        columns
    }

    fn normalize(&self, raw: &DataFrame) -> Result<DataFrame> {
        let [country, year] = key_columns(raw, self.source().key(), ENTITY, YEAR)?;
        let total = sum_columns(raw, &POLLUTANT_COLUMNS)?;
        Ok(DataFrame::new(vec![
            country,
            year,
            float_column(TOTAL_EMISSIONS, total),
        ])?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::{normalize_source, require_columns};
    use crate::test_support::string_frame;
    use crate::TransformError;
    use mvh_common::column_f64;
    use mvh_model::DuplicateKeyPolicy;

    fn pollution(values: [&'static str; 6]) -> DataFrame {
        let mut columns = vec![
            (ENTITY, vec!["India"]),
            ("Code", vec!["IND"]),
            (YEAR, vec!["2015"]),
        ];
        for (name, value) in POLLUTANT_COLUMNS.into_iter().zip(values) {
            columns.push((name, vec![value]));
        }
        string_frame(columns)
    }

    #[test]
    fn sums_pollutants_into_total() {
        let raw = pollution(["10", "5", "20", "0.5", "1", "1"]);
        let out = AirPollutionTotal.normalize(&raw).unwrap();
        assert_eq!(out.width(), 3);
        assert_eq!(
            column_f64(out.column(TOTAL_EMISSIONS).unwrap()).unwrap(),
            vec![Some(37.5)]
        );
    }

    #[test]
    fn missing_pollutant_column_names_source_and_column() {
        let raw = pollution(["10", "5", "20", "0.5", "1", "1"])
            .drop("Black carbon (BC) emissions")
            .unwrap();
        let err = require_columns(&raw, SourceKind::AirPollution, &AirPollutionTotal.required_columns())
            .unwrap_err();
        assert!(matches!(
            err,
            TransformError::Schema { ref table, ref column }
                if table == "air_pollution" && column == "Black carbon (BC) emissions"
        ));

        let err = normalize_source(SourceKind::AirPollution, &raw, DuplicateKeyPolicy::Reject)
            .unwrap_err();
        assert!(err.to_string().contains("Black carbon (BC) emissions"));
    }
}
