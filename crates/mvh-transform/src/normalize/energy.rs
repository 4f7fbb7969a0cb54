//! Energy: per-technology columns summed into totals.
//!
//! The column set is managed by an explicit, versioned mapping table. Every
//! source column the normalizer knows about has exactly one action.

use mvh_common::float_column;
use mvh_model::SourceKind;
use mvh_model::columns::{
    COUNTRY, NON_RENEWABLES_CONSUMPTION, NON_RENEWABLES_PRODUCTION, RENEWABLES_CONSUMPTION,
    RENEWABLES_PRODUCTION, TOTAL_CONSUMPTION, TOTAL_PRODUCTION, YEAR,
};
use polars::prelude::DataFrame;
use tracing::debug;

use super::{SourceNormalizer, sum_columns, sum_rows};
use crate::error::{Result, TransformError};
use crate::keys::key_columns;

/// What happens to one source column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnergyAction {
    /// Key column, renamed to the target.
    Key(&'static str),
    /// Added into the target total.
    SumInto(&'static str),
    /// Removed. May be absent from the source.
    Drop,
}

/// A named `source_column -> action` mapping.
#[derive(Debug)]
pub struct EnergySchema {
    pub name: &'static str,
    pub version: u32,
    pub entries: &'static [(&'static str, EnergyAction)],
}

impl EnergySchema {
    pub fn action(&self, column: &str) -> Option<EnergyAction> {
        self.entries
            .iter()
            .find(|(name, _)| *name == column)
            .map(|(_, action)| *action)
    }

    /// Source column mapped to a key target.
    pub fn key_source(&self, target: &str) -> Option<&'static str> {
        self.entries.iter().find_map(|(name, action)| match action {
            EnergyAction::Key(t) if *t == target => Some(*name),
            _ => None,
        })
    }

    /// Source columns summed into a target, in mapping order.
    pub fn inputs_for(&self, target: &str) -> Vec<&'static str> {
        self.entries
            .iter()
            .filter_map(|(name, action)| match action {
                EnergyAction::SumInto(t) if *t == target => Some(*name),
                _ => None,
            })
            .collect()
    }

    /// Key and summed columns. Dropped columns are optional.
    pub fn required_columns(&self) -> Vec<&'static str> {
        self.entries
            .iter()
            .filter(|(_, action)| !matches!(action, EnergyAction::Drop))
            .map(|(name, _)| *name)
            .collect()
    }
}

use EnergyAction::{Drop, Key, SumInto};

/// Subtotals in output order.
const SUBTOTALS: [&str; 4] = [
    RENEWABLES_CONSUMPTION,
    NON_RENEWABLES_CONSUMPTION,
    RENEWABLES_PRODUCTION,
    NON_RENEWABLES_PRODUCTION,
];

pub static ENERGY_SCHEMA_V1: EnergySchema = EnergySchema {
    name: "owid-energy",
    version: 1,
    entries: &[
        ("country", Key(COUNTRY)),
        ("year", Key(YEAR)),
        ("biofuel_consumption", SumInto(RENEWABLES_CONSUMPTION)),
        ("hydro_consumption", SumInto(RENEWABLES_CONSUMPTION)),
        ("solar_consumption", SumInto(RENEWABLES_CONSUMPTION)),
        ("wind_consumption", SumInto(RENEWABLES_CONSUMPTION)),
        ("other_renewable_consumption", SumInto(RENEWABLES_CONSUMPTION)),
        ("coal_consumption", SumInto(NON_RENEWABLES_CONSUMPTION)),
        ("gas_consumption", SumInto(NON_RENEWABLES_CONSUMPTION)),
        ("oil_consumption", SumInto(NON_RENEWABLES_CONSUMPTION)),
        ("nuclear_consumption", SumInto(NON_RENEWABLES_CONSUMPTION)),
        ("biofuel_electricity", SumInto(RENEWABLES_PRODUCTION)),
        ("hydro_electricity", SumInto(RENEWABLES_PRODUCTION)),
        ("solar_electricity", SumInto(RENEWABLES_PRODUCTION)),
        ("wind_electricity", SumInto(RENEWABLES_PRODUCTION)),
        ("other_renewable_electricity", SumInto(RENEWABLES_PRODUCTION)),
        ("coal_electricity", SumInto(NON_RENEWABLES_PRODUCTION)),
        ("gas_electricity", SumInto(NON_RENEWABLES_PRODUCTION)),
        ("oil_electricity", SumInto(NON_RENEWABLES_PRODUCTION)),
        ("nuclear_electricity", SumInto(NON_RENEWABLES_PRODUCTION)),
        // Published totals, recomputed from the technology columns.
        ("renewables_consumption", Drop),
        ("renewables_electricity", Drop),
        ("iso_code", Drop),
        ("population", Drop),
        ("gdp", Drop),
        ("biofuel_cons_change_pct", Drop),
        ("biofuel_cons_change_twh", Drop),
        ("biofuel_cons_per_capita", Drop),
        ("biofuel_share_elec", Drop),
        ("biofuel_share_energy", Drop),
        ("carbon_intensity_elec", Drop),
        ("coal_cons_change_pct", Drop),
        ("coal_cons_change_twh", Drop),
        ("coal_cons_per_capita", Drop),
        ("coal_prod_change_pct", Drop),
        ("coal_prod_change_twh", Drop),
        ("coal_prod_per_capita", Drop),
        ("coal_share_elec", Drop),
        ("coal_share_energy", Drop),
        ("electricity_demand", Drop),
        ("electricity_generation", Drop),
        ("electricity_share_energy", Drop),
        ("energy_cons_change_pct", Drop),
        ("energy_cons_change_twh", Drop),
        ("energy_per_capita", Drop),
        ("energy_per_gdp", Drop),
        ("fossil_cons_change_pct", Drop),
        ("fossil_cons_change_twh", Drop),
        ("fossil_elec_per_capita", Drop),
        ("fossil_electricity", Drop),
        ("fossil_energy_per_capita", Drop),
        ("fossil_fuel_consumption", Drop),
        ("fossil_share_elec", Drop),
        ("fossil_share_energy", Drop),
        ("gas_cons_change_pct", Drop),
        ("gas_cons_change_twh", Drop),
        ("gas_elec_per_capita", Drop),
        ("gas_energy_per_capita", Drop),
        ("gas_prod_change_pct", Drop),
        ("gas_prod_change_twh", Drop),
        ("gas_prod_per_capita", Drop),
        ("gas_share_elec", Drop),
        ("gas_share_energy", Drop),
        ("greenhouse_gas_emissions", Drop),
        ("hydro_cons_change_pct", Drop),
        ("hydro_cons_change_twh", Drop),
        ("hydro_elec_per_capita", Drop),
        ("hydro_energy_per_capita", Drop),
        ("hydro_share_elec", Drop),
        ("hydro_share_energy", Drop),
        ("low_carbon_cons_change_pct", Drop),
        ("low_carbon_cons_change_twh", Drop),
        ("low_carbon_consumption", Drop),
        ("low_carbon_elec_per_capita", Drop),
        ("low_carbon_energy_per_capita", Drop),
        ("low_carbon_share_elec", Drop),
        ("low_carbon_share_energy", Drop),
        ("net_elec_imports", Drop),
        ("net_elec_imports_share_demand", Drop),
        ("nuclear_cons_change_pct", Drop),
        ("nuclear_cons_change_twh", Drop),
        ("nuclear_elec_per_capita", Drop),
        ("nuclear_energy_per_capita", Drop),
        ("nuclear_share_elec", Drop),
        ("nuclear_share_energy", Drop),
        ("oil_cons_change_pct", Drop),
        ("oil_cons_change_twh", Drop),
        ("oil_elec_per_capita", Drop),
        ("oil_energy_per_capita", Drop),
        ("oil_prod_change_pct", Drop),
        ("oil_prod_change_twh", Drop),
        ("oil_prod_per_capita", Drop),
        ("oil_share_elec", Drop),
        ("oil_share_energy", Drop),
        ("other_renewable_exc_biofuel_electricity", Drop),
        ("other_renewables_cons_change_pct", Drop),
        ("other_renewables_cons_change_twh", Drop),
        ("other_renewables_elec_per_capita", Drop),
        ("other_renewables_share_elec", Drop),
        ("other_renewables_share_energy", Drop),
        ("per_capita_electricity", Drop),
        ("primary_energy_consumption", Drop),
        ("renewables_cons_change_pct", Drop),
        ("renewables_cons_change_twh", Drop),
        ("renewables_elec_per_capita", Drop),
        ("renewables_energy_per_capita", Drop),
        ("renewables_share_elec", Drop),
        ("renewables_share_energy", Drop),
        ("solar_cons_change_pct", Drop),
        ("solar_cons_change_twh", Drop),
        ("solar_elec_per_capita", Drop),
        ("solar_energy_per_capita", Drop),
        ("solar_share_elec", Drop),
        ("solar_share_energy", Drop),
        ("wind_cons_change_pct", Drop),
        ("wind_cons_change_twh", Drop),
        ("wind_elec_per_capita", Drop),
        ("wind_energy_per_capita", Drop),
        ("wind_share_elec", Drop),
        ("wind_share_energy", Drop),
    ],
};

/// Aggregate-then-drop normalizer driven by an [`EnergySchema`].
#[derive(Debug, Clone, Copy)]
pub struct EnergyAggregate {
    schema: &'static EnergySchema,
}

impl EnergyAggregate {
    pub fn new(schema: &'static EnergySchema) -> Self {
        Self { schema }
    }

    fn key(&self, target: &str) -> Result<&'static str> {
        self.schema
            .key_source(target)
            .ok_or_else(|| TransformError::schema(self.schema.name, target))
    }
}

impl SourceNormalizer for EnergyAggregate {
    fn source(&self) -> SourceKind {
        SourceKind::Energy
    }

    fn required_columns(&self) -> Vec<&'static str> {
        self.schema.required_columns()
    }

    fn normalize(&self, raw: &DataFrame) -> Result<DataFrame> {
        let table = self.source().key();
        let unmapped: Vec<&str> = raw
            .get_column_names_str()
            .into_iter()
            .filter(|name| self.schema.action(name).is_none())
            .collect();
        if !unmapped.is_empty() {
            debug!(
                source = table,
                schema = self.schema.name,
                version = self.schema.version,
                count = unmapped.len(),
                columns = ?unmapped,
                "dropping columns absent from the energy mapping"
            );
        }

        let mut columns = Vec::with_capacity(SUBTOTALS.len() + 4);
        columns.extend(key_columns(raw, table, self.key(COUNTRY)?, self.key(YEAR)?)?);

        let mut subtotals = Vec::with_capacity(SUBTOTALS.len());
        for target in SUBTOTALS {
            let values = sum_columns(raw, &self.schema.inputs_for(target))?;
            columns.push(float_column(target, values.clone()));
            subtotals.push(values);
        }

        let height = raw.height();
        let consumption = sum_rows(height, &subtotals[0..2]);
        let production = sum_rows(height, &subtotals[2..4]);
        columns.push(float_column(TOTAL_CONSUMPTION, consumption));
        columns.push(float_column(TOTAL_PRODUCTION, production));

        Ok(DataFrame::new(columns)?)
    }
}
