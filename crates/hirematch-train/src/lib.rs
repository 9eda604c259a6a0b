//! Model training for the candidate/job match pipeline.
//!
//! The flow is prepare, split, search, fit, threshold: the engineered table
//! becomes a numeric matrix, a seeded stratified split holds out the
//! validation rows, a randomized search picks the booster parameters by
//! validation AUC, and a final grid scan fixes the F1-optimal decision
//! threshold.

pub mod metrics;
pub mod prep;
pub mod search;
pub mod split;
pub mod threshold;
pub mod trainer;

pub use metrics::{ConfusionMatrix, classify, roc_auc};
pub use prep::{
    DROP_COLUMNS, MIN_FEATURE_COLUMNS, MIN_RELIABLE_ROWS, PreparedDataset, prepare_features,
    to_matrix,
};
pub use search::{DEFAULT_TRIALS, SearchOutcome, TrialParams, run_search};
pub use split::{Split, scale_pos_weight, stratified_split};
pub use threshold::{ThresholdChoice, select_threshold};
pub use trainer::{TrainConfig, TrainOutcome, cross_validation_auc, train_model};
