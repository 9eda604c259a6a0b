//! F1-optimal decision threshold scan.

use tracing::debug;

use crate::metrics::{ConfusionMatrix, classify};

const GRID_START: f64 = 0.10;
const GRID_STEPS: usize = 80;
const GRID_STEP: f64 = 0.01;

/// The chosen threshold and the F1 it achieved on the scan data.
#[derive(Debug, Clone, Copy)]
pub struct ThresholdChoice {
    pub threshold: f64,
    pub f1: f64,
}

/// Scan 0.10..=0.89 in 0.01 steps and keep the F1 maximum.
///
/// Ties resolve to the lowest threshold, so repeated runs on identical
/// predictions pick the same operating point.
pub fn select_threshold(labels: &[i64], probabilities: &[f64]) -> ThresholdChoice {
    let mut best = ThresholdChoice {
        threshold: GRID_START,
        f1: f64::MIN,
    };
    for step in 0..GRID_STEPS {
        let threshold = GRID_START + step as f64 * GRID_STEP;
        let predictions = classify(probabilities, threshold);
        let f1 = ConfusionMatrix::from_predictions(labels, &predictions).f1();
        if f1 > best.f1 {
            best = ThresholdChoice { threshold, f1 };
        }
    }
    debug!(threshold = best.threshold, f1 = best.f1, "threshold selected");
    best
}
