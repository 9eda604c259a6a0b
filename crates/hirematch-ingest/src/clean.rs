//! Blanket missing-value normalization.
//!
//! Applied uniformly to every flattened table: empty strings and the all-zero
//! date sentinel become missing, missing text becomes the "not informed"
//! placeholder, missing numbers become zero. Column-specific imputation only
//! happens much later, on the final numeric feature matrix.

use polars::prelude::*;

use hirematch_model::Result;

/// Placeholder for missing text fields.
pub const MISSING_TEXT: &str = "Não informado";

/// All-zero date sentinel treated as missing.
pub const DATE_SENTINEL: &str = "0000-00-00";

/// Normalize missing values across the whole frame.
///
/// Returns a new frame; the input is not mutated, so each stage stays
/// independently testable.
pub fn clean_frame(df: &DataFrame) -> Result<DataFrame> {
    let mut columns: Vec<Column> = Vec::with_capacity(df.width());
    for column in df.get_columns() {
        if column.dtype() == &DataType::String {
            columns.push(clean_string_column(column)?);
        } else if column.dtype().is_primitive_numeric() {
            let filled = column
                .as_materialized_series()
                .fill_null(FillNullStrategy::Zero)?;
            columns.push(filled.into());
        } else {
            columns.push(column.clone());
        }
    }
    Ok(DataFrame::new(columns)?)
}

fn clean_string_column(column: &Column) -> Result<Column> {
    let name = column.name().clone();
    let chunked = column.str()?;
    let values: Vec<String> = chunked
        .into_iter()
        .map(|value| match value {
            Some(text) if !text.is_empty() && text != DATE_SENTINEL => text.to_string(),
            _ => MISSING_TEXT.to_string(),
        })
        .collect();
    Ok(Series::new(name, values).into())
}
