//! Deterministic stratified train/validation split.

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use tracing::debug;

/// Row indices of the two partitions.
#[derive(Debug, Clone)]
pub struct Split {
    pub train: Vec<usize>,
    pub validation: Vec<usize>,
}

impl Split {
    pub fn select<T: Clone>(indices: &[usize], values: &[T]) -> Vec<T> {
        indices.iter().map(|&idx| values[idx].clone()).collect()
    }
}

/// Split row indices by label so both partitions keep the class balance.
///
/// Each class is shuffled with its own draw from the seeded generator and
/// the first `validation_fraction` of it goes to validation. The result is a
/// pure function of `(labels, validation_fraction, seed)`.
pub fn stratified_split(labels: &[i64], validation_fraction: f64, seed: u64) -> Split {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut classes: Vec<i64> = labels.to_vec();
    classes.sort_unstable();
    classes.dedup();

    let mut train = Vec::new();
    let mut validation = Vec::new();
    for class in classes {
        let mut indices: Vec<usize> = labels
            .iter()
            .enumerate()
            .filter(|(_, label)| **label == class)
            .map(|(idx, _)| idx)
            .collect();
        indices.shuffle(&mut rng);
        let held_out = ((indices.len() as f64) * validation_fraction).round() as usize;
        validation.extend_from_slice(&indices[..held_out]);
        train.extend_from_slice(&indices[held_out..]);
    }
    train.sort_unstable();
    validation.sort_unstable();
    debug!(
        train = train.len(),
        validation = validation.len(),
        "stratified split"
    );
    Split { train, validation }
}

/// Positive-class weight: negatives over positives on the given labels.
///
/// Degenerate single-class data weights to 1.0 so training can still proceed
/// on toy inputs.
pub fn scale_pos_weight(labels: &[i64]) -> f64 {
    let positives = labels.iter().filter(|label| **label == 1).count();
    let negatives = labels.len() - positives;
    if positives == 0 || negatives == 0 {
        1.0
    } else {
        negatives as f64 / positives as f64
    }
}
