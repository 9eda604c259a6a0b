//! Shared utilities for hirematch crates.
//!
//! This crate provides common utilities used across the hirematch workspace,
//! including Polars DataFrame helpers.

pub mod frame;
pub mod polars;

pub use frame::{column_value_string, string_values};
pub use polars::{any_to_f64, any_to_string, any_to_string_non_empty, format_numeric, parse_f64};
