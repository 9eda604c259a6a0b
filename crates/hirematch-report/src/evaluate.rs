//! Held-out evaluation of a trained model, with plot-ready data artifacts.

use std::fs;
use std::path::Path;

use polars::prelude::*;
use serde::Serialize;
use tracing::{info, info_span};

use hirematch_features::TARGET_COLUMN;
use hirematch_ingest::write_table;
use hirematch_model::{FeatureSchema, MatchModel, PipelineError, Result};
use hirematch_train::{
    ConfusionMatrix, Split, classify, roc_auc, select_threshold, stratified_split, to_matrix,
};

use crate::curves::{pr_points, roc_points};
use crate::encode::encode_for_model;

/// File names written into the report directory.
pub const METRICS_FILE: &str = "metrics.json";
pub const ROC_CURVE_FILE: &str = "roc_curve.csv";
pub const PR_CURVE_FILE: &str = "precision_recall_curve.csv";
pub const PROBABILITY_FILE: &str = "probability_distribution.csv";
pub const CONFUSION_FILE: &str = "confusion_matrix.csv";

/// Fraction of rows held out, matching the training split.
const VALIDATION_FRACTION: f64 = 0.2;

/// Scalar metrics of one evaluation run.
#[derive(Debug, Clone, Serialize)]
pub struct EvaluationMetrics {
    pub auc: f64,
    pub accuracy: f64,
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    pub threshold: f64,
    pub confusion: ConfusionMatrix,
    pub rows_evaluated: usize,
}

/// Metrics plus the raw held-out predictions behind them.
#[derive(Debug, Clone)]
pub struct Evaluation {
    pub metrics: EvaluationMetrics,
    pub labels: Vec<i64>,
    pub probabilities: Vec<f64>,
}

/// Score the held-out partition of the engineered table.
///
/// The split is re-derived with the training seed, so the evaluated rows are
/// the same ones training never saw. The threshold is re-scanned on the
/// held-out predictions, mirroring how the operating point was chosen.
pub fn evaluate_model(
    df: &DataFrame,
    model: &MatchModel,
    schema: &FeatureSchema,
    seed: u64,
) -> Result<Evaluation> {
    let span = info_span!("evaluate", rows = df.height());
    let _guard = span.enter();

    let labels_column = df
        .column(TARGET_COLUMN)
        .map_err(|_| PipelineError::MissingColumn(TARGET_COLUMN.to_string()))?;
    let labels: Vec<i64> = labels_column
        .cast(&DataType::Int64)?
        .i64()?
        .into_iter()
        .map(|label| label.unwrap_or(0))
        .collect();

    let aligned = encode_for_model(df, schema)?;
    let matrix = to_matrix(&aligned)?;

    let split = stratified_split(&labels, VALIDATION_FRACTION, seed);
    let held_rows = Split::select(&split.validation, &matrix);
    let held_labels = Split::select(&split.validation, &labels);

    let probabilities = model.predict_proba(&held_rows);
    let auc = roc_auc(&held_labels, &probabilities);
    let choice = select_threshold(&held_labels, &probabilities);
    let predictions = classify(&probabilities, choice.threshold);
    let confusion = ConfusionMatrix::from_predictions(&held_labels, &predictions);

    let metrics = EvaluationMetrics {
        auc,
        accuracy: confusion.accuracy(),
        precision: confusion.precision(),
        recall: confusion.recall(),
        f1: confusion.f1(),
        threshold: choice.threshold,
        confusion,
        rows_evaluated: held_labels.len(),
    };
    info!(
        auc = metrics.auc,
        f1 = metrics.f1,
        accuracy = metrics.accuracy,
        threshold = metrics.threshold,
        rows = metrics.rows_evaluated,
        "evaluation finished"
    );
    Ok(Evaluation {
        metrics,
        labels: held_labels,
        probabilities,
    })
}

/// Write `metrics.json` and the four curve/distribution CSVs into `dir`.
pub fn write_reports(evaluation: &Evaluation, dir: &Path) -> Result<()> {
    fs::create_dir_all(dir)?;
    let json = serde_json::to_string_pretty(&evaluation.metrics)?;
    fs::write(dir.join(METRICS_FILE), json)?;

    let roc = roc_points(&evaluation.labels, &evaluation.probabilities);
    let mut roc_df = DataFrame::new(vec![
        Series::new(
            "false_positive_rate".into(),
            roc.iter().map(|p| p.false_positive_rate).collect::<Vec<_>>(),
        )
        .into(),
        Series::new(
            "true_positive_rate".into(),
            roc.iter().map(|p| p.true_positive_rate).collect::<Vec<_>>(),
        )
        .into(),
    ])?;
    write_table(&mut roc_df, &dir.join(ROC_CURVE_FILE))?;

    let pr = pr_points(&evaluation.labels, &evaluation.probabilities);
    let mut pr_df = DataFrame::new(vec![
        Series::new(
            "recall".into(),
            pr.iter().map(|p| p.recall).collect::<Vec<_>>(),
        )
        .into(),
        Series::new(
            "precision".into(),
            pr.iter().map(|p| p.precision).collect::<Vec<_>>(),
        )
        .into(),
    ])?;
    write_table(&mut pr_df, &dir.join(PR_CURVE_FILE))?;

    let thresholds = vec![evaluation.metrics.threshold; evaluation.labels.len()];
    let mut probability_df = DataFrame::new(vec![
        Series::new("probability".into(), evaluation.probabilities.clone()).into(),
        Series::new("label".into(), evaluation.labels.clone()).into(),
        Series::new("threshold".into(), thresholds).into(),
    ])?;
    write_table(&mut probability_df, &dir.join(PROBABILITY_FILE))?;

    let confusion = &evaluation.metrics.confusion;
    let mut confusion_df = DataFrame::new(vec![
        Series::new("actual".into(), ["negative", "negative", "positive", "positive"]).into(),
        Series::new("predicted".into(), ["negative", "positive", "negative", "positive"])
            .into(),
        Series::new(
            "count".into(),
            [
                confusion.true_negatives as i64,
                confusion.false_positives as i64,
                confusion.false_negatives as i64,
                confusion.true_positives as i64,
            ],
        )
        .into(),
    ])?;
    write_table(&mut confusion_df, &dir.join(CONFUSION_FILE))?;

    info!(dir = %dir.display(), "evaluation reports written");
    Ok(())
}
