//! Reconciliation core: from raw source tables to one engineered table.
//!
//! - **keys**: country/year canonicalization and key uniqueness
//! - **normalize**: one normalizer per source, behind a shared trait
//! - **join**: ordered inner-join fold on `(Country, Year)`
//! - **sanitize**: numeric coercion and missing-row removal
//! - **features**: derived indicator columns
//!
//! Data flows strictly forward: each stage consumes the previous stage's
//! table and returns a new one.

pub mod error;
pub mod features;
pub mod join;
pub mod keys;
pub mod normalize;
pub mod sanitize;

pub use error::{Result, TransformError};
pub use features::{FeatureReport, POSITIVITY_EPSILON, engineer_features};
pub use join::{JoinOutcome, JoinStep, join_sources};
pub use keys::{canonicalize_country, duplicate_keys, enforce_unique_keys};
pub use normalize::{
    NormalizedTable, NormalizerRegistry, SourceNormalizer, default_registry, normalize_source,
};
pub use sanitize::{SanitizeReport, sanitize};

#[cfg(test)]
pub(crate) mod test_support {
    use mvh_common::string_column;
    use polars::prelude::DataFrame;

    /// All-string frame, as the readers produce it.
    pub(crate) fn string_frame(columns: Vec<(&str, Vec<&str>)>) -> DataFrame {
        DataFrame::new(
            columns
                .into_iter()
                .map(|(name, values)| {
                    string_column(name, values.into_iter().map(|v| Some(v.to_string())).collect())
                })
                .collect(),
        )
        .unwrap()
    }
}
