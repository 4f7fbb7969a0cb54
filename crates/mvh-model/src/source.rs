//! The fixed catalogue of input sources.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::error::ConfigError;

/// A recognized input source, keyed by its logical name.
///
/// Variant order is the join order: the happiness report first, then every
/// other source folded in sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SourceKind {
    Whr,
    Tedi,
    Energy,
    Food,
    Deaths,
    AirPollution,
    Hdi,
    RuleOfLaw,
    MedianAge,
    UrbanPopulation,
    TaxRevenue,
}

/// How a source's raw table is projected to the canonical shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NormalizerCategory {
    /// Select a fixed column list and rename some of it.
    RenameSelect,
    /// Unpivot one-column-per-year into `(Year, value)` rows.
    Reshape,
    /// Sum technology columns into totals, drop everything else.
    AggregateDrop,
    /// Sum named columns into one derived total.
    DerivedTotal,
}

impl NormalizerCategory {
    pub fn label(self) -> &'static str {
        match self {
            Self::RenameSelect => "rename+select",
            Self::Reshape => "reshape",
            Self::AggregateDrop => "aggregate-then-drop",
            Self::DerivedTotal => "derived total",
        }
    }
}

/// Accepted on-disk table formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    /// Delimited text with the given field separator.
    Delimited { separator: u8 },
    /// Excel or OpenDocument workbook; the first sheet is read.
    Spreadsheet,
}

impl FileFormat {
    /// Chooses a format from the file extension (case-insensitive).
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "csv" | "txt" => Some(Self::Delimited { separator: b',' }),
            "tsv" => Some(Self::Delimited { separator: b'\t' }),
            "xls" | "xlsx" | "xlsm" | "xlsb" | "ods" => Some(Self::Spreadsheet),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Delimited { .. } => "delimited",
            Self::Spreadsheet => "spreadsheet",
        }
    }
}

impl SourceKind {
    /// Every source, in join order.
    pub const ALL: [SourceKind; 11] = [
        Self::Whr,
        Self::Tedi,
        Self::Energy,
        Self::Food,
        Self::Deaths,
        Self::AirPollution,
        Self::Hdi,
        Self::RuleOfLaw,
        Self::MedianAge,
        Self::UrbanPopulation,
        Self::TaxRevenue,
    ];

    /// Logical key used in configuration files and log fields.
    pub fn key(self) -> &'static str {
        match self {
            Self::Whr => "whr",
            Self::Tedi => "tedi",
            Self::Energy => "energy",
            Self::Food => "food",
            Self::Deaths => "deaths",
            Self::AirPollution => "air_pollution",
            Self::Hdi => "hdi",
            Self::RuleOfLaw => "rule_of_law",
            Self::MedianAge => "median_age",
            Self::UrbanPopulation => "urban_population",
            Self::TaxRevenue => "tax_revenue",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Self::Whr => "World Happiness Report",
            Self::Tedi => "The Economist Democracy Index",
            Self::Energy => "Energy consumption and production",
            Self::Food => "Food supply",
            Self::Deaths => "Deaths in armed conflicts",
            Self::AirPollution => "Long-run air pollution",
            Self::Hdi => "Human Development Index",
            Self::RuleOfLaw => "Rule of Law index",
            Self::MedianAge => "Median age",
            Self::UrbanPopulation => "Urban population share",
            Self::TaxRevenue => "Tax revenue as share of GDP",
        }
    }

    /// File name looked up under the data directory when not configured.
    pub fn default_file(self) -> &'static str {
        match self {
            Self::Whr => "world_happiness_report.xls",
            Self::Tedi => "TheEconomistDemocracyIndex.xlsx",
            Self::Energy => "energy.csv",
            Self::Food => "food_supply.csv",
            Self::Deaths => "deaths-in-armed-conflicts-based-on-where-they-occurred.csv",
            Self::AirPollution => "long-run-air-pollution.csv",
            Self::Hdi => "human-development-index.csv",
            Self::RuleOfLaw => "rule-of-law-index.csv",
            Self::MedianAge => "median-age.csv",
            Self::UrbanPopulation => "share-urban-and-rural-population.csv",
            Self::TaxRevenue => "tax-revenues-as-a-share-of-gdp-unu-wider.csv",
        }
    }

    pub fn category(self) -> NormalizerCategory {
        match self {
            Self::Tedi => NormalizerCategory::Reshape,
            Self::Energy => NormalizerCategory::AggregateDrop,
            Self::AirPollution => NormalizerCategory::DerivedTotal,
            _ => NormalizerCategory::RenameSelect,
        }
    }

    fn expected_keys() -> String {
        Self::ALL
            .iter()
            .map(|kind| kind.key())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for SourceKind {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let key = value.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|kind| kind.key().eq_ignore_ascii_case(key))
            .ok_or_else(|| ConfigError::UnknownSource {
                key: key.to_string(),
                expected: Self::expected_keys(),
            })
    }
}
