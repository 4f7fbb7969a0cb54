//! Canonical column names.
//!
//! Names match the published dataset headers exactly, including spaces and
//! parentheses, because downstream consumers select columns by these strings.

pub const COUNTRY: &str = "Country";
pub const YEAR: &str = "Year";

// World Happiness Report
pub const LIFE_LADDER: &str = "Life Ladder";
pub const LOG_GDP: &str = "Log GDP per capita";
pub const SOCIAL_SUPPORT: &str = "Social support";
pub const HEALTHY_LIFE_EXPECTANCY: &str = "Healthy life expectancy at birth";
pub const FREEDOM_CHOICE: &str = "Freedom to make life choices";
pub const GENEROSITY: &str = "Generosity";
pub const CORRUPTION: &str = "Perceptions of corruption";
pub const POSITIVE_AFFECT: &str = "Positive affect";
pub const NEGATIVE_AFFECT: &str = "Negative affect";

// Democracy index
pub const REGIME_TYPE: &str = "Regime type";
pub const DEMOCRACY_INDEX: &str = "Democracy_Index";

// Energy totals
pub const RENEWABLES_CONSUMPTION: &str = "renewables_consumption";
pub const NON_RENEWABLES_CONSUMPTION: &str = "non_renewables_consumption";
pub const RENEWABLES_PRODUCTION: &str = "renewables_production";
pub const NON_RENEWABLES_PRODUCTION: &str = "non_renewables_production";
pub const TOTAL_CONSUMPTION: &str = "total_consumption";
pub const TOTAL_PRODUCTION: &str = "total_production";

// Food supply
pub const FOOD_KCAL: &str = "Food supply (kcal per capita per day)";
pub const FOOD_PROTEIN: &str = "Food supply (Protein g per capita per day)";
pub const FOOD_FAT: &str = "Food supply (Fat g per capita per day)";

pub const DEATHS: &str = "Deaths";
pub const TOTAL_EMISSIONS: &str = "Total_Emissions";
pub const HDI: &str = "Human Development Index";
pub const RULE_OF_LAW: &str = "Rule_of_Law_Index";
pub const MEDIAN_AGE: &str = "Median Age";
pub const URBAN_POPULATION: &str = "Urban Population (%)";
pub const TAX_REVENUE: &str = "Tax_Revenue";

// Derived indicators
pub const FREEDOM_INDEX: &str = "Freedom_Index";
pub const GENEROSITY_PER_DOLLAR: &str = "Generosity_Per_Dollar";
pub const TRUST_FACTOR: &str = "Trust_Factor";
pub const SOCIAL_CUSHION_INDEX: &str = "Social_Cushion_Index";
pub const URBAN_STRESS_BALANCE: &str = "Urban_Stress_Balance";
pub const HEDONIC_GROWTH_RATE: &str = "Hedonic_Growth_Rate";
pub const ENVIRONMENTAL_BONUS: &str = "Environmental_Bonus";
pub const POSITIVITY_RATIO: &str = "Positivity_Ratio";
pub const TRADE_OFF_INDEX: &str = "Trade_Off_Index";

/// Columns that must be present and numeric in every reconciled row.
pub const REQUIRED_NUMERIC: [&str; 17] = [
    YEAR,
    LIFE_LADDER,
    LOG_GDP,
    SOCIAL_SUPPORT,
    HEALTHY_LIFE_EXPECTANCY,
    FREEDOM_CHOICE,
    GENEROSITY,
    CORRUPTION,
    POSITIVE_AFFECT,
    NEGATIVE_AFFECT,
    DEMOCRACY_INDEX,
    TOTAL_EMISSIONS,
    HDI,
    RULE_OF_LAW,
    MEDIAN_AGE,
    URBAN_POPULATION,
    TAX_REVENUE,
];

/// Inputs the feature engine reads.
pub const FEATURE_INPUTS: [&str; 12] = [
    COUNTRY,
    YEAR,
    LIFE_LADDER,
    LOG_GDP,
    SOCIAL_SUPPORT,
    FREEDOM_CHOICE,
    GENEROSITY,
    CORRUPTION,
    POSITIVE_AFFECT,
    NEGATIVE_AFFECT,
    TOTAL_EMISSIONS,
    URBAN_POPULATION,
];

/// Derived columns, in the order they are appended.
pub const DERIVED: [&str; 9] = [
    FREEDOM_INDEX,
    GENEROSITY_PER_DOLLAR,
    TRUST_FACTOR,
    SOCIAL_CUSHION_INDEX,
    URBAN_STRESS_BALANCE,
    HEDONIC_GROWTH_RATE,
    ENVIRONMENTAL_BONUS,
    POSITIVITY_RATIO,
    TRADE_OFF_INDEX,
];

/// Columns that leak through partial overlaps in energy naming and are
/// removed after the join.
pub const STRAY_COLUMNS: [&str; 3] = [
    "other_renewables_elec_per_capita_exc_biofuel",
    "other_renewables_energy_per_capita",
    "other_renewables_share_elec_exc_biofuel",
];
