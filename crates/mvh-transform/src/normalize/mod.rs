//! Per-source normalizers and their registry.
//!
//! Each source has one [`SourceNormalizer`] that projects its raw table to the
//! canonical shape: `Country`, `Year`, then the source's metric columns. Every
//! other column is dropped.
//!
//! # Architecture
//!
//! Normalizers are registered in a [`NormalizerRegistry`] keyed by
//! [`SourceKind`]. [`normalize_source`] looks the normalizer up, checks the
//! required columns, runs it and finally applies the duplicate-key policy, so
//! every normalized table leaves this module with unique keys.
//!
//! ```ignore
//! use mvh_transform::normalize_source;
//!
//! let table = normalize_source(raw.source, &raw.frame, config.duplicate_keys)?;
//! ```

mod air_pollution;
mod democracy;
mod energy;
mod rename_select;

use std::collections::BTreeMap;
use std::sync::OnceLock;
use std::time::Instant;

use mvh_common::{column_f64, float_column};
use mvh_model::{DuplicateKeyPolicy, SourceKind};
use polars::prelude::{Column, DataFrame};
use tracing::{debug, debug_span};

use crate::error::{Result, TransformError};
use crate::keys::enforce_unique_keys;

pub use air_pollution::{AirPollutionTotal, POLLUTANT_COLUMNS};
pub use democracy::{DemocracyReshape, EXCLUDED_YEARS};
pub use energy::{ENERGY_SCHEMA_V1, EnergyAction, EnergyAggregate, EnergySchema};
pub use rename_select::RenameSelect;

/// Source-specific projection to the canonical `(Country, Year, metrics...)`
/// shape.
///
/// Implementations produce `Country` as canonical strings and `Year` as Int64
/// (see [`crate::keys`]); key uniqueness is enforced by the caller.
pub trait SourceNormalizer: Send + Sync {
    /// The source this normalizer handles.
    fn source(&self) -> SourceKind;

    /// Columns that must exist in the raw table.
    fn required_columns(&self) -> Vec<&'static str>;

    /// Projects the raw table.
    ///
    /// # Errors
    ///
    /// Returns a key error for rows whose country or year cannot be
    /// canonicalized.
    fn normalize(&self, raw: &DataFrame) -> Result<DataFrame>;
}

/// Registry of normalizers indexed by source.
pub struct NormalizerRegistry {
    normalizers: BTreeMap<SourceKind, Box<dyn SourceNormalizer>>,
}

impl NormalizerRegistry {
    pub fn new() -> Self {
        Self {
            normalizers: BTreeMap::new(),
        }
    }

    /// Registers a normalizer for its source, replacing any previous one.
    pub fn register(&mut self, normalizer: Box<dyn SourceNormalizer>) {
        self.normalizers.insert(normalizer.source(), normalizer);
    }

    pub fn get(&self, source: SourceKind) -> Option<&dyn SourceNormalizer> {
        self.normalizers.get(&source).map(|n| n.as_ref())
    }

    pub fn len(&self) -> usize {
        self.normalizers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.normalizers.is_empty()
    }

    /// Registered sources in join order.
    pub fn sources(&self) -> impl Iterator<Item = SourceKind> + '_ {
        self.normalizers.keys().copied()
    }

    /// Runs the full normalizer contract for one source.
    pub fn normalize(
        &self,
        source: SourceKind,
        raw: &DataFrame,
        policy: DuplicateKeyPolicy,
    ) -> Result<NormalizedTable> {
        let normalizer = self
            .get(source)
            .ok_or_else(|| TransformError::NoNormalizer {
                table: source.key().to_string(),
            })?;

        let span = debug_span!("normalize_source", source = %source);
        let _guard = span.enter();
        let start = Instant::now();

        require_columns(raw, source, &normalizer.required_columns())?;
        let projected = normalizer.normalize(raw)?;
        let (frame, duplicates_dropped) = enforce_unique_keys(projected, source.key(), policy)?;

        debug!(
            source = %source,
            rows_in = raw.height(),
            rows = frame.height(),
            columns = frame.width(),
            duration_ms = start.elapsed().as_millis(),
            "source normalized"
        );
        Ok(NormalizedTable {
            source,
            frame,
            rows_in: raw.height(),
            duplicates_dropped,
        })
    }
}

impl Default for NormalizerRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// A source after normalization: canonical columns, unique keys.
#[derive(Debug, Clone)]
pub struct NormalizedTable {
    pub source: SourceKind,
    pub frame: DataFrame,
    /// Raw rows before projection.
    pub rows_in: usize,
    /// Rows removed by the keep-first duplicate policy.
    pub duplicates_dropped: usize,
}

static DEFAULT_REGISTRY: OnceLock<NormalizerRegistry> = OnceLock::new();

/// Returns the registry with a normalizer for every [`SourceKind`].
pub fn default_registry() -> &'static NormalizerRegistry {
    DEFAULT_REGISTRY.get_or_init(build_default_registry)
}

fn build_default_registry() -> NormalizerRegistry {
    let mut registry = NormalizerRegistry::new();
    registry.register(Box::new(rename_select::WHR));
    registry.register(Box::new(DemocracyReshape));
    registry.register(Box::new(EnergyAggregate::new(&ENERGY_SCHEMA_V1)));
    registry.register(Box::new(rename_select::FOOD));
    registry.register(Box::new(rename_select::DEATHS_SOURCE));
    registry.register(Box::new(AirPollutionTotal));
    registry.register(Box::new(rename_select::HDI_SOURCE));
    registry.register(Box::new(rename_select::RULE_OF_LAW_SOURCE));
    registry.register(Box::new(rename_select::MEDIAN_AGE_SOURCE));
    registry.register(Box::new(rename_select::URBAN_POPULATION_SOURCE));
    registry.register(Box::new(rename_select::TAX_REVENUE_SOURCE));
    registry
}

/// Normalizes one source with the default registry.
pub fn normalize_source(
    source: SourceKind,
    raw: &DataFrame,
    policy: DuplicateKeyPolicy,
) -> Result<NormalizedTable> {
    default_registry().normalize(source, raw, policy)
}

/// Fails with a schema error naming the first absent column.
pub(crate) fn require_columns(df: &DataFrame, source: SourceKind, columns: &[&str]) -> Result<()> {
    match columns
        .iter()
        .find(|name| df.get_column_index(name).is_none())
    {
        Some(missing) => Err(TransformError::schema(source, missing)),
        None => Ok(()),
    }
}

/// Reads a metric column leniently and renames it.
pub(crate) fn metric(df: &DataFrame, input: &str, output: &str) -> Result<Column> {
    let values = column_f64(df.column(input)?)?;
    Ok(float_column(output, values))
}

/// Row-wise sum of named columns. A missing addend makes the total missing.
pub(crate) fn sum_columns(df: &DataFrame, inputs: &[&str]) -> Result<Vec<Option<f64>>> {
    let mut columns = Vec::with_capacity(inputs.len());
    for name in inputs {
        columns.push(column_f64(df.column(name)?)?);
    }
    Ok(sum_rows(df.height(), &columns))
}

pub(crate) fn sum_rows(height: usize, addends: &[Vec<Option<f64>>]) -> Vec<Option<f64>> {
    (0..height)
        .map(|row| addends.iter().map(|values| values[row]).sum())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_registry_covers_every_source() {
        let registry = default_registry();
        assert_eq!(registry.len(), SourceKind::ALL.len());
        assert_eq!(
            registry.sources().collect::<Vec<_>>(),
            SourceKind::ALL.to_vec()
        );
        for kind in SourceKind::ALL {
            assert_eq!(registry.get(kind).map(|n| n.source()), Some(kind));
        }
    }

    #[test]
    fn sum_propagates_missing() {
        let sums = sum_rows(
            3,
            &[
                vec![Some(1.0), None, Some(2.0)],
                vec![Some(4.0), Some(1.0), Some(0.5)],
            ],
        );
        assert_eq!(sums, vec![Some(5.0), None, Some(2.5)]);
    }

    #[test]
    fn empty_registry_reports_missing_normalizer() {
        let registry = NormalizerRegistry::default();
        assert!(registry.is_empty());
        let err = registry
            .normalize(SourceKind::Hdi, &DataFrame::empty(), DuplicateKeyPolicy::Reject)
            .unwrap_err();
        assert!(matches!(err, TransformError::NoNormalizer { .. }));
    }
}
