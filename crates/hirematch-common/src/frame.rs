//! DataFrame cell access helpers.

use polars::prelude::{AnyValue, DataFrame};

use crate::polars::any_to_string;

/// Get a string value from a DataFrame column at the given row index.
///
/// Returns an empty string when the column does not exist or the cell is null.
pub fn column_value_string(df: &DataFrame, name: &str, idx: usize) -> String {
    match df.column(name) {
        Ok(column) => any_to_string(column.get(idx).unwrap_or(AnyValue::Null)),
        Err(_) => String::new(),
    }
}

/// Extract all string values from a DataFrame column, nulls as empty strings.
///
/// Returns `None` when the column does not exist.
pub fn string_values(df: &DataFrame, name: &str) -> Option<Vec<String>> {
    let column = df.column(name).ok()?;
    let mut values = Vec::with_capacity(df.height());
    for idx in 0..df.height() {
        values.push(any_to_string(column.get(idx).unwrap_or(AnyValue::Null)));
    }
    Some(values)
}
