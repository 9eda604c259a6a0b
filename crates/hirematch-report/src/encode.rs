//! Scoring-time numeric encoding, aligned to the persisted feature schema.
//!
//! One-hot encoding here keeps every category (no dropped baseline); the
//! schema alignment afterwards discards whatever the model was not trained
//! on and zero-fills what is missing, so drift between the table and the
//! schema degrades scores instead of failing them.

use std::collections::BTreeSet;

use polars::prelude::*;
use tracing::{debug, warn};

use hirematch_common::string_values;
use hirematch_features::TARGET_COLUMN;
use hirematch_model::{FeatureSchema, Result};

const NAN_CATEGORY: &str = "nan";

fn one_hot_all(name: &str, values: &[String]) -> Vec<Column> {
    let categories: BTreeSet<&str> = values
        .iter()
        .map(|value| {
            if value.is_empty() {
                NAN_CATEGORY
            } else {
                value.as_str()
            }
        })
        .collect();
    categories
        .into_iter()
        .map(|category| {
            let indicators: Vec<i64> = values
                .iter()
                .map(|value| {
                    let observed = if value.is_empty() { NAN_CATEGORY } else { value };
                    i64::from(observed == category)
                })
                .collect();
            Series::new(format!("{name}_{category}").into(), indicators).into()
        })
        .collect()
}

/// One-hot encode string columns and keep numeric ones, dropping the label.
pub fn numeric_encode(df: &DataFrame) -> Result<DataFrame> {
    let mut columns: Vec<Column> = Vec::new();
    for column in df.get_columns() {
        let name = column.name().to_string();
        if name == TARGET_COLUMN {
            continue;
        }
        if column.dtype() == &DataType::String {
            let values = string_values(df, &name).unwrap_or_default();
            columns.extend(one_hot_all(&name, &values));
        } else if column.dtype().is_primitive_numeric() || column.dtype() == &DataType::Boolean {
            columns.push(column.cast(&DataType::Float64)?);
        }
    }
    Ok(DataFrame::new(columns)?)
}

/// Encode the table and align it to the model's feature schema.
pub fn encode_for_model(df: &DataFrame, schema: &FeatureSchema) -> Result<DataFrame> {
    let encoded = numeric_encode(df)?;
    let (aligned, report) = schema.align(&encoded)?;
    if report.dropped > 0 || report.filled > 0 {
        warn!(
            dropped = report.dropped,
            zero_filled = report.filled,
            "feature drift between table and model schema"
        );
    } else {
        debug!(columns = aligned.width(), "table matches model schema");
    }
    Ok(aligned)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strings_expand_and_label_is_dropped() {
        let df = DataFrame::new(vec![
            Series::new("sexo".into(), ["a", "b", ""]).into(),
            Series::new("x".into(), [1i64, 2, 3]).into(),
            Series::new(TARGET_COLUMN.into(), [0i64, 1, 0]).into(),
        ])
        .unwrap();
        let encoded = numeric_encode(&df).unwrap();
        let names = encoded.get_column_names();
        assert!(names.iter().any(|n| n.as_str() == "sexo_a"));
        assert!(names.iter().any(|n| n.as_str() == "sexo_b"));
        assert!(names.iter().any(|n| n.as_str() == "sexo_nan"));
        assert!(names.iter().any(|n| n.as_str() == "x"));
        assert!(!names.iter().any(|n| n.as_str() == TARGET_COLUMN));
    }

    #[test]
    fn alignment_recovers_the_schema_order() {
        let schema =
            FeatureSchema::new(vec!["x".to_string(), "sexo_b".to_string()]).unwrap();
        let df = DataFrame::new(vec![
            Series::new("sexo".into(), ["a", "b"]).into(),
            Series::new("x".into(), [1i64, 2]).into(),
        ])
        .unwrap();
        let aligned = encode_for_model(&df, &schema).unwrap();
        let names: Vec<String> = aligned
            .get_column_names()
            .iter()
            .map(|n| n.to_string())
            .collect();
        assert_eq!(names, vec!["x", "sexo_b"]);
    }
}
