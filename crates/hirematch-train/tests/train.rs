//! End-to-end training on synthetic data with a known signal.

use hirematch_features::TARGET_COLUMN;
use hirematch_train::{TrainConfig, train_model};
use polars::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Synthetic dataset where the label depends on the feature sum plus noise.
fn synthetic_frame(rows: usize, seed: u64) -> DataFrame {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut features: Vec<Vec<f64>> = vec![Vec::with_capacity(rows); 6];
    let mut labels: Vec<i64> = Vec::with_capacity(rows);
    for _ in 0..rows {
        let mut signal = 0.0;
        for column in features.iter_mut() {
            let value: f64 = rng.gen_range(0.0..1.0);
            signal += value;
            column.push(value);
        }
        let noise: f64 = rng.gen_range(-0.5..0.5);
        labels.push(i64::from(signal + noise > 3.0));
    }
    let mut columns: Vec<Column> = features
        .into_iter()
        .enumerate()
        .map(|(idx, values)| Series::new(format!("signal_{idx}").into(), values).into())
        .collect();
    columns.push(Series::new(TARGET_COLUMN.into(), labels).into());
    DataFrame::new(columns).unwrap()
}

#[test]
fn training_learns_an_informative_signal() {
    let df = synthetic_frame(1200, 42);
    let config = TrainConfig {
        trials: 4,
        seed: 42,
    };
    let outcome = train_model(&df, &config).unwrap();

    assert!(outcome.validation_auc > 0.5, "auc = {}", outcome.validation_auc);
    assert!((0.10..0.90).contains(&outcome.threshold.threshold));
    assert_eq!(outcome.feature_count, 6);
    assert_eq!(outcome.schema.len(), 6);
    assert_eq!(outcome.model.meta.feature_count, 6);
    assert!(outcome.scale_pos_weight > 0.0);
    assert_eq!(outcome.search.trials.len(), 4);

    // The persisted metadata mirrors the winning draw.
    let params = &outcome.model.meta.params;
    assert!(params.contains_key("n_estimators"));
    assert!(params.contains_key("reg_lambda"));
}

#[test]
fn small_datasets_still_train_with_a_warning() {
    let df = synthetic_frame(400, 7);
    let config = TrainConfig {
        trials: 2,
        seed: 42,
    };
    let outcome = train_model(&df, &config).unwrap();
    assert_eq!(outcome.rows, 400);
    assert!((0.0..=1.0).contains(&outcome.accuracy));
}

#[test]
fn predictions_are_probabilities() {
    let df = synthetic_frame(400, 3);
    let config = TrainConfig {
        trials: 2,
        seed: 42,
    };
    let outcome = train_model(&df, &config).unwrap();
    let rows = vec![vec![0.5f32; 6], vec![0.9f32; 6]];
    let probabilities = outcome.model.predict_proba(&rows);
    assert_eq!(probabilities.len(), 2);
    for p in probabilities {
        assert!((0.0..=1.0).contains(&p), "probability out of range: {p}");
    }
}
