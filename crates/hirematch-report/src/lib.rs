//! Evaluation reports and ranking queries over a trained match model.

pub mod curves;
pub mod encode;
pub mod evaluate;
pub mod rank;

pub use curves::{PrPoint, RocPoint, pr_points, roc_points};
pub use encode::{encode_for_model, numeric_encode};
pub use evaluate::{
    CONFUSION_FILE, Evaluation, EvaluationMetrics, METRICS_FILE, PR_CURVE_FILE,
    PROBABILITY_FILE, ROC_CURVE_FILE, evaluate_model, write_reports,
};
pub use rank::{RankedCandidate, rank_candidates};
