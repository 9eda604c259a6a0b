//! Trained classifier artifact.
//!
//! A [`MatchModel`] pairs the fitted gradient-boosted booster with the
//! metadata chosen during training (decision threshold, class weight, best
//! hyperparameters). It is only consumed through probability prediction and
//! is immutable after training. The model and its [`FeatureSchema`] are a
//! unit: scoring with a frame aligned to a different schema is a contract
//! violation, which is why [`load_artifacts`] refuses to load one without
//! the other.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use gbdt::decision_tree::{Data, DataVec};
use gbdt::gradient_boost::GBDT;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{PipelineError, Result};
use crate::schema::FeatureSchema;

/// File name of the serialized booster inside an artifact directory.
pub const MODEL_FILE: &str = "model.json";
/// File name of the persisted feature-column schema.
pub const SCHEMA_FILE: &str = "model_columns.json";
/// File name of the training metadata.
pub const META_FILE: &str = "model_meta.json";

/// Metadata fixed at the end of training.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelMetadata {
    /// F1-optimal decision threshold found on the validation split.
    pub threshold: f64,
    /// Positive-class weight (negatives / positives on the training split).
    pub scale_pos_weight: f64,
    /// Validation AUC of the final fit.
    pub validation_auc: f64,
    /// Best hyperparameters found by the search, by name.
    pub params: BTreeMap<String, f64>,
    /// Number of feature columns the booster was fitted on.
    pub feature_count: usize,
}

/// A trained candidate/job match classifier.
pub struct MatchModel {
    booster: GBDT,
    pub meta: ModelMetadata,
}

impl MatchModel {
    pub fn new(booster: GBDT, meta: ModelMetadata) -> Self {
        Self { booster, meta }
    }

    /// Predict the positive-class probability for each feature row.
    ///
    /// Rows must follow the column order of the schema the model was trained
    /// with; see [`FeatureSchema::align`].
    pub fn predict_proba(&self, rows: &[Vec<f32>]) -> Vec<f64> {
        let data: DataVec = rows
            .iter()
            .map(|row| Data::new_test_data(row.clone(), None))
            .collect();
        self.booster
            .predict(&data)
            .into_iter()
            .map(f64::from)
            .collect()
    }

    /// Apply the stored decision threshold to a probability.
    pub fn decide(&self, probability: f64) -> bool {
        probability > self.meta.threshold
    }

    /// Persist the booster and metadata into `dir`.
    ///
    /// The feature schema is written separately by the caller, under
    /// [`SCHEMA_FILE`] in the same directory.
    pub fn save(&self, dir: &Path) -> Result<()> {
        fs::create_dir_all(dir)?;
        let model_path = dir.join(MODEL_FILE);
        self.booster
            .save_model(&model_path.to_string_lossy())
            .map_err(|error| PipelineError::Model(format!("save booster: {error}")))?;
        let meta_json = serde_json::to_string_pretty(&self.meta)?;
        fs::write(dir.join(META_FILE), meta_json)?;
        debug!(dir = %dir.display(), "model artifacts written");
        Ok(())
    }

    /// Load the booster and metadata from `dir`.
    pub fn load(dir: &Path) -> Result<Self> {
        let model_path = dir.join(MODEL_FILE);
        let booster = GBDT::load_model(&model_path.to_string_lossy())
            .map_err(|error| PipelineError::Model(format!("load booster: {error}")))?;
        let meta_json = fs::read_to_string(dir.join(META_FILE))?;
        let meta: ModelMetadata = serde_json::from_str(&meta_json)?;
        Ok(Self { booster, meta })
    }
}

/// Load the model together with its feature schema.
///
/// # Errors
///
/// Fails when either artifact is missing; a model without its column schema
/// cannot produce an aligned feature matrix and must not be scored.
pub fn load_artifacts(dir: &Path) -> Result<(MatchModel, FeatureSchema)> {
    let schema_path = dir.join(SCHEMA_FILE);
    if !schema_path.exists() {
        return Err(PipelineError::Message(format!(
            "feature schema not found: {} (run training first)",
            schema_path.display()
        )));
    }
    let schema = FeatureSchema::load(&schema_path)?;
    let model = MatchModel::load(dir)?;
    Ok((model, schema))
}
