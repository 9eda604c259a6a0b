//! Tests for feature-schema alignment.

use hirematch_model::FeatureSchema;
use polars::prelude::*;

fn frame() -> DataFrame {
    DataFrame::new(vec![
        Series::new("a".into(), [1.0f64, 2.0, 3.0]).into(),
        Series::new("b".into(), [10.0f64, 20.0, 30.0]).into(),
        Series::new("extra".into(), [7.0f64, 8.0, 9.0]).into(),
    ])
    .unwrap()
}

#[test]
fn align_drops_exactly_the_extra_columns() {
    let schema = FeatureSchema::new(vec!["a".to_string(), "b".to_string()]).unwrap();
    let df = frame();
    let (aligned, report) = schema.align(&df).unwrap();
    assert_eq!(aligned.get_column_names(), ["a", "b"]);
    assert_eq!(aligned.height(), 3);
    assert_eq!(report.dropped, 1);
    assert_eq!(report.filled, 0);
    let a = aligned.column("a").unwrap().f64().unwrap();
    assert_eq!(a.get(0), Some(1.0));
    assert_eq!(a.get(2), Some(3.0));
}

#[test]
fn align_zero_fills_missing_schema_columns() {
    let schema = FeatureSchema::new(vec![
        "a".to_string(),
        "b".to_string(),
        "absent".to_string(),
    ])
    .unwrap();
    let (aligned, report) = schema.align(&frame()).unwrap();
    assert_eq!(report.filled, 1);
    let absent = aligned.column("absent").unwrap().f64().unwrap();
    for idx in 0..3 {
        assert_eq!(absent.get(idx), Some(0.0));
    }
}

#[test]
fn align_is_deterministic() {
    let schema = FeatureSchema::new(vec!["b".to_string(), "a".to_string()]).unwrap();
    let df = frame();
    let (first, _) = schema.align(&df).unwrap();
    let (second, _) = schema.align(&df).unwrap();
    assert!(first.equals(&second));
    assert_eq!(first.get_column_names(), ["b", "a"]);
}

#[test]
fn align_preserves_row_order() {
    let schema = FeatureSchema::new(vec!["a".to_string()]).unwrap();
    let (aligned, _) = schema.align(&frame()).unwrap();
    let a = aligned.column("a").unwrap().f64().unwrap();
    let values: Vec<f64> = a.into_no_null_iter().collect();
    assert_eq!(values, vec![1.0, 2.0, 3.0]);
}

#[test]
fn schema_columns_are_unique_strings() {
    let schema =
        FeatureSchema::new(vec!["x".to_string(), "y".to_string(), "z".to_string()]).unwrap();
    assert_eq!(schema.len(), 3);
    let mut sorted: Vec<&String> = schema.columns().iter().collect();
    sorted.dedup();
    assert_eq!(sorted.len(), 3);
}
