//! End-to-end training: matrix preparation, search, final fit, threshold.

use polars::prelude::DataFrame;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use tracing::{info, info_span};

use hirematch_model::{FeatureSchema, MatchModel, ModelMetadata, Result};

use crate::metrics::{ConfusionMatrix, classify, roc_auc};
use crate::prep::{PreparedDataset, prepare_features, to_matrix};
use crate::search::{
    DEFAULT_TRIALS, SearchData, SearchOutcome, TrialParams, fit_booster, validation_auc,
};
use crate::split::{Split, scale_pos_weight, stratified_split};
use crate::threshold::{ThresholdChoice, select_threshold};

/// Fraction of rows held out for validation.
const VALIDATION_FRACTION: f64 = 0.2;
/// Folds for the quick pre-search cross-validation estimate.
const CV_FOLDS: usize = 3;

/// Knobs for a training run.
#[derive(Debug, Clone, Copy)]
pub struct TrainConfig {
    pub trials: usize,
    pub seed: u64,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            trials: DEFAULT_TRIALS,
            seed: 42,
        }
    }
}

/// Everything a training run produces, before persistence.
pub struct TrainOutcome {
    pub model: MatchModel,
    pub schema: FeatureSchema,
    pub search: SearchOutcome,
    pub threshold: ThresholdChoice,
    pub validation_auc: f64,
    pub accuracy: f64,
    pub confusion: ConfusionMatrix,
    pub rows: usize,
    pub feature_count: usize,
    pub scale_pos_weight: f64,
}

/// Baseline parameters for the pre-search cross-validation estimate.
fn baseline_params() -> TrialParams {
    TrialParams {
        n_estimators: 100,
        learning_rate: 0.1,
        max_depth: 6,
        subsample: 1.0,
        colsample: 1.0,
        reg_alpha: 0.0,
        reg_lambda: 0.0,
        min_child_samples: 20,
    }
}

/// Stratified fold assignment for each row, seeded and deterministic.
fn fold_assignment(labels: &[i64], folds: usize, seed: u64) -> Vec<usize> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut assignment = vec![0usize; labels.len()];
    let mut classes: Vec<i64> = labels.to_vec();
    classes.sort_unstable();
    classes.dedup();
    for class in classes {
        let mut indices: Vec<usize> = labels
            .iter()
            .enumerate()
            .filter(|(_, label)| **label == class)
            .map(|(idx, _)| idx)
            .collect();
        indices.shuffle(&mut rng);
        for (position, idx) in indices.into_iter().enumerate() {
            assignment[idx] = position % folds;
        }
    }
    assignment
}

/// Quick k-fold AUC with baseline parameters, logged as a sanity reference
/// before the search spends its budget.
pub fn cross_validation_auc(
    rows: &[Vec<f32>],
    labels: &[i64],
    pos_weight: f64,
    seed: u64,
) -> Vec<f64> {
    let assignment = fold_assignment(labels, CV_FOLDS, seed);
    let params = baseline_params();
    let mut scores = Vec::with_capacity(CV_FOLDS);
    for fold in 0..CV_FOLDS {
        let train_idx: Vec<usize> = (0..labels.len())
            .filter(|idx| assignment[*idx] != fold)
            .collect();
        let held_idx: Vec<usize> = (0..labels.len())
            .filter(|idx| assignment[*idx] == fold)
            .collect();
        let train_rows = Split::select(&train_idx, rows);
        let train_labels = Split::select(&train_idx, labels);
        let held_rows = Split::select(&held_idx, rows);
        let held_labels = Split::select(&held_idx, labels);
        let data = SearchData {
            train_rows: &train_rows,
            train_labels: &train_labels,
            validation_rows: &held_rows,
            validation_labels: &held_labels,
            scale_pos_weight: pos_weight,
        };
        let booster = fit_booster(&data, &params, params.n_estimators);
        scores.push(validation_auc(&data, &booster));
    }
    scores
}

/// Train the match classifier on the engineered table.
pub fn train_model(df: &DataFrame, config: &TrainConfig) -> Result<TrainOutcome> {
    let span = info_span!("train", rows = df.height(), trials = config.trials);
    let _guard = span.enter();

    let PreparedDataset { features, labels } = prepare_features(df)?;
    let matrix = to_matrix(&features)?;

    let split = stratified_split(&labels, VALIDATION_FRACTION, config.seed);
    let train_rows = Split::select(&split.train, &matrix);
    let train_labels = Split::select(&split.train, &labels);
    let validation_rows = Split::select(&split.validation, &matrix);
    let validation_labels = Split::select(&split.validation, &labels);
    let pos_weight = scale_pos_weight(&train_labels);

    let cv_scores = cross_validation_auc(&matrix, &labels, pos_weight, config.seed);
    let cv_mean = cv_scores.iter().sum::<f64>() / cv_scores.len() as f64;
    info!(folds = cv_scores.len(), mean_auc = cv_mean, scores = ?cv_scores,
        "cross-validation baseline");

    let data = SearchData {
        train_rows: &train_rows,
        train_labels: &train_labels,
        validation_rows: &validation_rows,
        validation_labels: &validation_labels,
        scale_pos_weight: pos_weight,
    };
    let search = crate::search::run_search(&data, config.trials, config.seed);

    let booster = fit_booster(&data, &search.best_params, search.best_params.n_estimators);
    let probabilities: Vec<f64> = booster
        .predict(
            &validation_rows
                .iter()
                .map(|row| {
                    gbdt::decision_tree::Data::new_test_data(row.clone(), None)
                })
                .collect(),
        )
        .into_iter()
        .map(f64::from)
        .collect();
    let final_auc = roc_auc(&validation_labels, &probabilities);
    let threshold = select_threshold(&validation_labels, &probabilities);
    let predictions = classify(&probabilities, threshold.threshold);
    let confusion = ConfusionMatrix::from_predictions(&validation_labels, &predictions);

    let schema = FeatureSchema::new(
        features
            .get_column_names()
            .iter()
            .map(|name| name.to_string())
            .collect(),
    )?;
    let meta = ModelMetadata {
        threshold: threshold.threshold,
        scale_pos_weight: pos_weight,
        validation_auc: final_auc,
        params: search.best_params.to_map(),
        feature_count: schema.len(),
    };
    info!(
        auc = final_auc,
        f1 = threshold.f1,
        accuracy = confusion.accuracy(),
        threshold = threshold.threshold,
        features = schema.len(),
        "training finished"
    );
    Ok(TrainOutcome {
        model: MatchModel::new(booster, meta),
        schema,
        search,
        threshold,
        validation_auc: final_auc,
        accuracy: confusion.accuracy(),
        confusion,
        rows: features.height(),
        feature_count: features.width(),
        scale_pos_weight: pos_weight,
    })
}
