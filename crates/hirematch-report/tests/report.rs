//! Evaluation and ranking against a freshly trained model.

use hirematch_features::TARGET_COLUMN;
use hirematch_report::{
    CONFUSION_FILE, METRICS_FILE, PR_CURVE_FILE, PROBABILITY_FILE, ROC_CURVE_FILE,
    evaluate_model, rank_candidates, write_reports,
};
use hirematch_train::{TrainConfig, TrainOutcome, train_model};
use polars::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn synthetic_frame(rows: usize, seed: u64) -> DataFrame {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut features: Vec<Vec<f64>> = vec![Vec::with_capacity(rows); 6];
    let mut labels: Vec<i64> = Vec::with_capacity(rows);
    let mut job_ids: Vec<String> = Vec::with_capacity(rows);
    let mut applicant_ids: Vec<String> = Vec::with_capacity(rows);
    for row in 0..rows {
        let mut signal = 0.0;
        for column in features.iter_mut() {
            let value: f64 = rng.gen_range(0.0..1.0);
            signal += value;
            column.push(value);
        }
        labels.push(i64::from(signal > 3.0));
        job_ids.push(format!("job-{}", row % 3));
        applicant_ids.push(format!("cand-{row}"));
    }
    let mut columns: Vec<Column> = features
        .into_iter()
        .enumerate()
        .map(|(idx, values)| Series::new(format!("signal_{idx}").into(), values).into())
        .collect();
    columns.push(Series::new("job_id".into(), job_ids).into());
    columns.push(Series::new("applicant_id".into(), applicant_ids).into());
    columns.push(Series::new(TARGET_COLUMN.into(), labels).into());
    DataFrame::new(columns).unwrap()
}

fn trained(df: &DataFrame) -> TrainOutcome {
    let config = TrainConfig {
        trials: 2,
        seed: 42,
    };
    train_model(df, &config).unwrap()
}

#[test]
fn evaluation_scores_the_held_out_partition() {
    let df = synthetic_frame(600, 42);
    let outcome = trained(&df);
    let evaluation = evaluate_model(&df, &outcome.model, &outcome.schema, 42).unwrap();

    assert_eq!(evaluation.metrics.rows_evaluated, 120);
    assert_eq!(evaluation.probabilities.len(), 120);
    assert!(evaluation.metrics.auc > 0.5, "auc = {}", evaluation.metrics.auc);
    assert!((0.0..=1.0).contains(&evaluation.metrics.accuracy));
    let confusion = &evaluation.metrics.confusion;
    assert_eq!(
        confusion.true_positives
            + confusion.false_positives
            + confusion.true_negatives
            + confusion.false_negatives,
        120
    );
}

#[test]
fn report_files_are_written() {
    let df = synthetic_frame(300, 7);
    let outcome = trained(&df);
    let evaluation = evaluate_model(&df, &outcome.model, &outcome.schema, 42).unwrap();

    let dir = tempfile::tempdir().unwrap();
    write_reports(&evaluation, dir.path()).unwrap();
    for file in [
        METRICS_FILE,
        ROC_CURVE_FILE,
        PR_CURVE_FILE,
        PROBABILITY_FILE,
        CONFUSION_FILE,
    ] {
        assert!(dir.path().join(file).exists(), "missing {file}");
    }
    let metrics: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(dir.path().join(METRICS_FILE)).unwrap())
            .unwrap();
    assert!(metrics["auc"].is_number());
    assert!(metrics["confusion"]["true_positives"].is_number());
}

#[test]
fn ranking_filters_sorts_and_truncates() {
    let df = synthetic_frame(300, 11);
    let outcome = trained(&df);

    let ranked =
        rank_candidates(&df, &outcome.model, &outcome.schema, "job-1", 0.0, 5).unwrap();
    assert!(ranked.len() <= 5);
    assert!(!ranked.is_empty());
    for pair in ranked.windows(2) {
        assert!(pair[0].score >= pair[1].score);
    }
    for candidate in &ranked {
        assert!(candidate.applicant_id.starts_with("cand-"));
        assert_eq!(
            candidate.recommended,
            candidate.score > outcome.model.meta.threshold
        );
    }

    // A floor above every probability leaves nothing.
    let none =
        rank_candidates(&df, &outcome.model, &outcome.schema, "job-1", 1.1, 5).unwrap();
    assert!(none.is_empty());

    let unknown =
        rank_candidates(&df, &outcome.model, &outcome.schema, "job-999", 0.0, 5).unwrap();
    assert!(unknown.is_empty());
}
