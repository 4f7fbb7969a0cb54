//! Shared utilities for the money-vs-happiness crates.
//!
//! This crate provides the Polars helpers used across the workspace:
//! `AnyValue` conversions and typed column extraction/construction.

pub mod polars;

pub use polars::{
    any_to_f64, any_to_i64_exact, any_to_string, column_f64, column_strings, float_column,
    format_numeric, int_column, parse_f64, parse_i64_exact, string_column,
};
