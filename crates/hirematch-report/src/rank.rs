//! Per-job candidate ranking, the query the dashboard runs.

use polars::prelude::*;
use tracing::debug;

use hirematch_common::{column_value_string, string_values};
use hirematch_model::{FeatureSchema, MatchModel, Result};
use hirematch_train::to_matrix;

use crate::encode::encode_for_model;

/// One scored candidate for a job, in rank order.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedCandidate {
    pub applicant_id: String,
    pub name: String,
    pub score: f64,
    /// Whether the score clears the model's decision threshold.
    pub recommended: bool,
}

/// Score every candidate of `job_id` and return the top matches.
///
/// Candidates are filtered to `min_score` (inclusive), sorted by descending
/// score, and truncated to `top_n`. Ties keep their table order, so repeated
/// queries return the same ranking. An unknown job id yields an empty list.
pub fn rank_candidates(
    features: &DataFrame,
    model: &MatchModel,
    schema: &FeatureSchema,
    job_id: &str,
    min_score: f64,
    top_n: usize,
) -> Result<Vec<RankedCandidate>> {
    let Some(job_ids) = string_values(features, "job_id") else {
        debug!("job_id column missing, nothing to rank");
        return Ok(Vec::new());
    };
    let row_indices: Vec<usize> = job_ids
        .iter()
        .enumerate()
        .filter(|(_, id)| id.as_str() == job_id)
        .map(|(idx, _)| idx)
        .collect();
    if row_indices.is_empty() {
        debug!(job_id, "no candidates for job");
        return Ok(Vec::new());
    }

    let index_series = IdxCa::from_vec(
        "rows".into(),
        row_indices.iter().map(|idx| *idx as IdxSize).collect(),
    );
    let job_rows = features.take(&index_series)?;
    let aligned = encode_for_model(&job_rows, schema)?;
    let matrix = to_matrix(&aligned)?;
    let scores = model.predict_proba(&matrix);

    let mut candidates: Vec<RankedCandidate> = scores
        .iter()
        .enumerate()
        .filter(|(_, score)| **score >= min_score)
        .map(|(idx, score)| RankedCandidate {
            applicant_id: column_value_string(&job_rows, "applicant_id", idx),
            name: column_value_string(&job_rows, "nome", idx),
            score: *score,
            recommended: model.decide(*score),
        })
        .collect();
    candidates.sort_by(|a, b| b.score.total_cmp(&a.score));
    candidates.truncate(top_n);
    debug!(
        job_id,
        candidates = candidates.len(),
        "candidates ranked"
    );
    Ok(candidates)
}
