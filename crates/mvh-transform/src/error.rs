//! Error types for the transformation stages.

use thiserror::Error;

/// Errors that can occur while normalizing, joining, sanitizing or deriving.
///
/// `table` names where the problem was found: a source key such as `energy`,
/// or a stage such as `reconciled`.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum TransformError {
    /// An expected column is absent.
    #[error("schema error in {table}: missing column '{column}'")]
    Schema { table: String, column: String },

    /// A key field cannot be coerced.
    #[error("key error in {table} row {row}: {column} value '{value}' is not an integer year")]
    KeyParse {
        table: String,
        row: usize,
        column: String,
        value: String,
    },

    /// A year column header of a wide table is not a year.
    #[error("key error in {table}: column header '{column}' is not an integer year")]
    YearHeader { table: String, column: String },

    /// A country identifier is missing or empty after canonicalization.
    #[error("key error in {table} row {row}: country '{value}' is empty after canonicalization")]
    EmptyCountry {
        table: String,
        row: usize,
        value: String,
    },

    /// A `(Country, Year)` pair occurs more than once in a normalized table.
    #[error("duplicate key in {table}: ({country}, {year}) occurs {count} times")]
    DuplicateKey {
        table: String,
        country: String,
        year: i64,
        count: usize,
    },

    /// Two joined tables carry the same non-key column.
    #[error("column '{column}' from {table} already exists in the joined table")]
    ColumnClash { table: String, column: String },

    /// No normalizer is registered for a source.
    #[error("no normalizer registered for {table}")]
    NoNormalizer { table: String },

    /// The joiner was given nothing to join.
    #[error("no normalized tables to join")]
    NothingToJoin,

    /// Polars DataFrame operation error.
    #[error("DataFrame error: {0}")]
    Polars(#[from] polars::error::PolarsError),
}

impl TransformError {
    pub(crate) fn schema(table: impl ToString, column: impl ToString) -> Self {
        Self::Schema {
            table: table.to_string(),
            column: column.to_string(),
        }
    }
}

/// Result type for transformation operations.
pub type Result<T> = std::result::Result<T, TransformError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_error_names_table_and_column() {
        let err = TransformError::schema("air_pollution", "Black carbon (BC) emissions");
        assert_eq!(
            err.to_string(),
            "schema error in air_pollution: missing column 'Black carbon (BC) emissions'"
        );
    }

    #[test]
    fn key_parse_error_names_row() {
        let err = TransformError::KeyParse {
            table: "energy".to_string(),
            row: 12,
            column: "year".to_string(),
            value: "20x0".to_string(),
        };
        assert!(err.to_string().contains("row 12"));
        assert!(err.to_string().contains("'20x0'"));
    }
}
