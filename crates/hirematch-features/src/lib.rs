//! Feature construction for the candidate/job match pipeline.
//!
//! Four stages live here: résumé text features, categorical
//! encoding/normalization, dataset assembly with label derivation, and the
//! interaction/target-encoding pass that produces the training table.

pub mod assemble;
pub mod cv;
pub mod encode;
pub mod engineering;

pub use assemble::{TARGET_COLUMN, assemble_dataset, derive_target};
pub use cv::{SKILL_KEYWORDS, english_level, experience_years, extract_cv_features, skill_count};
pub use encode::{
    DEFAULT_CATEGORICAL_COLS, DEFAULT_NUMERICAL_COLS, FittedTransforms, LabelEncoding,
    MinMaxScaler, fit_encode_normalize,
};
pub use engineering::{
    EngineeredFeatures, TargetEncoding, bin_value, engineer_features, engineer_features_at,
};
