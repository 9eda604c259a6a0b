//! Seeded random hyperparameter search with probe-fit pruning.
//!
//! Thirty trials drawn from fixed ranges, scored by validation AUC. Instead
//! of fitting the full tree budget for every draw, each trial first fits a
//! quarter-budget probe; draws whose probe score falls below the running
//! median of earlier probes are discarded without a full fit. Everything is
//! a pure function of the seed, so a search is reproducible bit for bit.

use std::collections::BTreeMap;

use gbdt::config::Config;
use gbdt::decision_tree::{Data, DataVec};
use gbdt::gradient_boost::GBDT;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info};

use crate::metrics::roc_auc;

/// Default number of search trials.
pub const DEFAULT_TRIALS: usize = 30;

/// Probe fits use this fraction of the sampled tree budget.
const PROBE_BUDGET_DIVISOR: usize = 4;
/// Pruning needs this many probe scores before the median is trusted.
const MIN_PROBES_BEFORE_PRUNING: usize = 5;

/// One sampled hyperparameter draw.
///
/// The regularization terms are sampled and recorded for every trial even
/// though the booster does not apply them; they keep trial records
/// comparable across search runs.
#[derive(Debug, Clone, PartialEq)]
pub struct TrialParams {
    pub n_estimators: usize,
    pub learning_rate: f64,
    pub max_depth: u32,
    pub subsample: f64,
    pub colsample: f64,
    pub reg_alpha: f64,
    pub reg_lambda: f64,
    pub min_child_samples: usize,
}

impl TrialParams {
    /// Draw one parameter set from the fixed search ranges.
    pub fn sample(rng: &mut StdRng) -> Self {
        let log_low = 1e-8f64.ln();
        let log_high = 10.0f64.ln();
        Self {
            n_estimators: rng.gen_range(1..=10) * 100,
            learning_rate: rng.gen_range(0.01..=0.2),
            max_depth: rng.gen_range(3..=10),
            subsample: rng.gen_range(0.6..=1.0),
            colsample: rng.gen_range(0.6..=1.0),
            reg_alpha: rng.gen_range(log_low..=log_high).exp(),
            reg_lambda: rng.gen_range(log_low..=log_high).exp(),
            min_child_samples: rng.gen_range(5..=100),
        }
    }

    /// Parameter values by name, for the persisted model metadata.
    pub fn to_map(&self) -> BTreeMap<String, f64> {
        BTreeMap::from([
            ("n_estimators".to_string(), self.n_estimators as f64),
            ("learning_rate".to_string(), self.learning_rate),
            ("max_depth".to_string(), f64::from(self.max_depth)),
            ("subsample".to_string(), self.subsample),
            ("colsample_bytree".to_string(), self.colsample),
            ("reg_alpha".to_string(), self.reg_alpha),
            ("reg_lambda".to_string(), self.reg_lambda),
            (
                "min_child_samples".to_string(),
                self.min_child_samples as f64,
            ),
        ])
    }
}

/// The matrices and labels a search runs against.
#[derive(Debug, Clone, Copy)]
pub struct SearchData<'a> {
    pub train_rows: &'a [Vec<f32>],
    pub train_labels: &'a [i64],
    pub validation_rows: &'a [Vec<f32>],
    pub validation_labels: &'a [i64],
    pub scale_pos_weight: f64,
}

/// Per-trial record kept for the search report.
#[derive(Debug, Clone)]
pub struct TrialReport {
    pub index: usize,
    pub params: TrialParams,
    pub probe_auc: f64,
    pub validation_auc: Option<f64>,
}

/// The winning draw and the full trial history.
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    pub best_params: TrialParams,
    pub best_auc: f64,
    pub trials: Vec<TrialReport>,
}

impl SearchOutcome {
    pub fn pruned_count(&self) -> usize {
        self.trials
            .iter()
            .filter(|trial| trial.validation_auc.is_none())
            .count()
    }
}

fn training_data(rows: &[Vec<f32>], labels: &[i64], pos_weight: f64) -> DataVec {
    rows.iter()
        .zip(labels)
        .map(|(row, label)| {
            // LogLikelyhood expects +1/-1 labels; positives carry the class
            // weight.
            let (target, weight) = if *label == 1 {
                (1.0, pos_weight as f32)
            } else {
                (-1.0, 1.0)
            };
            Data::new_training_data(row.clone(), weight, target, None)
        })
        .collect()
}

fn test_data(rows: &[Vec<f32>]) -> DataVec {
    rows.iter()
        .map(|row| Data::new_test_data(row.clone(), None))
        .collect()
}

/// Fit one booster with the supported subset of the sampled parameters.
pub fn fit_booster(data: &SearchData<'_>, params: &TrialParams, iterations: usize) -> GBDT {
    let feature_size = data.train_rows.first().map(Vec::len).unwrap_or(0);
    let mut config = Config::new();
    config.set_feature_size(feature_size);
    config.set_max_depth(params.max_depth);
    config.set_iterations(iterations);
    config.set_shrinkage(params.learning_rate as f32);
    config.set_data_sample_ratio(params.subsample);
    config.set_feature_sample_ratio(params.colsample);
    config.set_min_leaf_size(params.min_child_samples);
    config.set_loss("LogLikelyhood");
    config.set_training_optimization_level(2);

    let mut training = training_data(data.train_rows, data.train_labels, data.scale_pos_weight);
    let mut booster = GBDT::new(&config);
    booster.fit(&mut training);
    booster
}

/// Validation AUC of a fitted booster.
pub fn validation_auc(data: &SearchData<'_>, booster: &GBDT) -> f64 {
    let predictions: Vec<f64> = booster
        .predict(&test_data(data.validation_rows))
        .into_iter()
        .map(f64::from)
        .collect();
    roc_auc(data.validation_labels, &predictions)
}

fn running_median(sorted: &[f64]) -> f64 {
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 1 {
        sorted[mid]
    } else {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    }
}

/// Run the randomized search and return the best draw by validation AUC.
pub fn run_search(data: &SearchData<'_>, trials: usize, seed: u64) -> SearchOutcome {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut reports = Vec::with_capacity(trials);
    let mut probe_scores: Vec<f64> = Vec::with_capacity(trials);
    let mut best: Option<(TrialParams, f64)> = None;

    for index in 0..trials {
        let params = TrialParams::sample(&mut rng);
        let probe_iterations =
            (params.n_estimators / PROBE_BUDGET_DIVISOR).max(1);
        let probe = fit_booster(data, &params, probe_iterations);
        let probe_auc = validation_auc(data, &probe);

        let prune = probe_scores.len() >= MIN_PROBES_BEFORE_PRUNING
            && probe_auc < running_median(&probe_scores);
        let insert_at = probe_scores
            .binary_search_by(|score| score.total_cmp(&probe_auc))
            .unwrap_or_else(|pos| pos);
        probe_scores.insert(insert_at, probe_auc);

        if prune {
            debug!(trial = index, probe_auc, "trial pruned");
            reports.push(TrialReport {
                index,
                params,
                probe_auc,
                validation_auc: None,
            });
            continue;
        }

        let booster = fit_booster(data, &params, params.n_estimators);
        let auc = validation_auc(data, &booster);
        debug!(trial = index, probe_auc, auc, "trial evaluated");
        if best.as_ref().map(|(_, best_auc)| auc > *best_auc).unwrap_or(true) {
            best = Some((params.clone(), auc));
        }
        reports.push(TrialReport {
            index,
            params,
            probe_auc,
            validation_auc: Some(auc),
        });
    }

    // Trials >= 1 and the first trial is never pruned, so best is set.
    let (best_params, best_auc) = best.unwrap_or_else(|| {
        (
            TrialParams::sample(&mut StdRng::seed_from_u64(seed)),
            0.5,
        )
    });
    let outcome = SearchOutcome {
        best_params,
        best_auc,
        trials: reports,
    };
    info!(
        trials,
        pruned = outcome.pruned_count(),
        best_auc = outcome.best_auc,
        "hyperparameter search finished"
    );
    outcome
}
