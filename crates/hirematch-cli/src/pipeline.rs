//! The match pipeline with explicit stages.
//!
//! The pipeline follows these stages in order:
//! 1. **Preprocess**: Flatten the raw JSON exports, clean them, derive CV
//!    features, encode applicant categoricals, assemble the labelled table
//! 2. **Features**: Interaction features and target encoding
//! 3. **Train**: Feature matrix, hyperparameter search, final fit, threshold
//! 4. **Evaluate**: Held-out metrics and report artifacts
//! 5. **Rank**: Score and order candidates for one vacancy
//!
//! Each stage reads the table the previous stage wrote, so stages can be run
//! individually and intermediate tables inspected. Tables and artifacts are
//! also uploaded to the configured object store on a best-effort basis.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use polars::prelude::DataFrame;
use tracing::{info, info_span, warn};

use hirematch_features::{
    DEFAULT_CATEGORICAL_COLS, DEFAULT_NUMERICAL_COLS, TARGET_COLUMN, assemble_dataset,
    engineer_features, extract_cv_features, fit_encode_normalize,
};
use hirematch_ingest::{
    clean_frame, flatten_applicants, flatten_jobs, flatten_prospects, load_json_map, read_table,
    write_table,
};
use hirematch_model::{MatchModel, SCHEMA_FILE, load_artifacts};
use hirematch_report::{
    EvaluationMetrics, METRICS_FILE, RankedCandidate, evaluate_model, rank_candidates,
    write_reports,
};
use hirematch_storage::{FsStore, ObjectStore, StorageConfig};
use hirematch_train::{TrainConfig, TrainOutcome, train_model};

/// Raw export file names inside the data directory.
pub const APPLICANTS_JSON: &str = "applicants.json";
pub const PROSPECTS_JSON: &str = "prospects.json";
pub const VAGAS_JSON: &str = "vagas.json";

/// Intermediate table file names inside the work directory.
pub const PREPROCESSED_TABLE: &str = "preprocessed_data.csv";
pub const FEATURED_TABLE: &str = "feature_engineered_data.csv";

/// Best-effort uploader to the configured object store.
///
/// Upload failures warn and continue: the local files remain the source of
/// truth, the store is a mirror for the dashboard.
pub struct Uploader {
    store: Option<FsStore>,
}

impl Uploader {
    /// Build from the environment, or a disabled uploader when skipped.
    ///
    /// A missing bucket variable is a hard error unless uploads were
    /// explicitly skipped; silently keeping everything local would hide a
    /// misconfigured deployment.
    pub fn from_env(no_upload: bool) -> Result<Self> {
        if no_upload {
            info!("uploads disabled");
            return Ok(Self { store: None });
        }
        let config = StorageConfig::from_env().context("storage configuration")?;
        info!(bucket = %config.bucket, "uploads enabled");
        Ok(Self {
            store: Some(FsStore::new(&config)),
        })
    }

    /// Uploader that never uploads, for tests and offline runs.
    pub fn disabled() -> Self {
        Self { store: None }
    }

    fn upload_file(&self, path: &Path, key: &str) {
        let Some(store) = &self.store else {
            return;
        };
        let result = std::fs::read(path)
            .map_err(|error| error.to_string())
            .and_then(|bytes| {
                store
                    .put_bytes(key, &bytes)
                    .map_err(|error| error.to_string())
            });
        match result {
            Ok(()) => info!(key, "uploaded"),
            Err(error) => warn!(key, error, "upload failed, keeping local copy"),
        }
    }
}

/// Result of the preprocess stage.
#[derive(Debug)]
pub struct PreprocessResult {
    pub rows: usize,
    pub columns: usize,
    pub positives: usize,
    pub table: PathBuf,
}

/// Flatten, clean, and assemble the raw exports into the labelled table.
pub fn preprocess(
    data_dir: &Path,
    work_dir: &Path,
    uploader: &Uploader,
) -> Result<PreprocessResult> {
    let span = info_span!("preprocess", data_dir = %data_dir.display());
    let _guard = span.enter();
    let started = Instant::now();

    let applicants_raw = load_json_map(&data_dir.join(APPLICANTS_JSON));
    let prospects_raw = load_json_map(&data_dir.join(PROSPECTS_JSON));
    let vagas_raw = load_json_map(&data_dir.join(VAGAS_JSON));
    info!(
        applicants = applicants_raw.len(),
        prospect_jobs = prospects_raw.len(),
        vagas = vagas_raw.len(),
        "raw exports loaded"
    );

    let applicants = clean_frame(&flatten_applicants(&applicants_raw)?)?;
    let prospects = clean_frame(&flatten_prospects(&prospects_raw)?)?;
    let vagas = clean_frame(&flatten_jobs(&vagas_raw)?)?;

    let applicants = extract_cv_features(&applicants, "cv_pt")?;
    let (applicants, _transforms) = fit_encode_normalize(
        &applicants,
        &DEFAULT_CATEGORICAL_COLS,
        &DEFAULT_NUMERICAL_COLS,
    )?;

    let mut dataset = assemble_dataset(&prospects, &applicants, &vagas)?;
    let positives = dataset
        .column(TARGET_COLUMN)?
        .i64()?
        .into_no_null_iter()
        .filter(|label| *label == 1)
        .count();

    let table = work_dir.join(PREPROCESSED_TABLE);
    write_table(&mut dataset, &table)?;
    uploader.upload_file(&table, &format!("data/processed/{PREPROCESSED_TABLE}"));

    info!(
        rows = dataset.height(),
        columns = dataset.width(),
        positives,
        duration_ms = started.elapsed().as_millis() as u64,
        "preprocess stage finished"
    );
    Ok(PreprocessResult {
        rows: dataset.height(),
        columns: dataset.width(),
        positives,
        table,
    })
}

/// Result of the feature-engineering stage.
#[derive(Debug)]
pub struct FeaturesResult {
    pub rows: usize,
    pub columns: usize,
    pub target_encoded: usize,
    pub table: PathBuf,
}

/// Build the engineered feature table from the preprocessed table.
pub fn build_features(work_dir: &Path, uploader: &Uploader) -> Result<FeaturesResult> {
    let span = info_span!("features", work_dir = %work_dir.display());
    let _guard = span.enter();
    let started = Instant::now();

    let source = work_dir.join(PREPROCESSED_TABLE);
    let df = read_table(&source)
        .with_context(|| format!("read {} (run preprocess first)", source.display()))?;
    let engineered = engineer_features(&df)?;
    let mut frame = engineered.frame;

    let table = work_dir.join(FEATURED_TABLE);
    write_table(&mut frame, &table)?;
    uploader.upload_file(&table, &format!("data/processed/{FEATURED_TABLE}"));

    info!(
        rows = frame.height(),
        columns = frame.width(),
        target_encoded = engineered.encodings.len(),
        duration_ms = started.elapsed().as_millis() as u64,
        "features stage finished"
    );
    Ok(FeaturesResult {
        rows: frame.height(),
        columns: frame.width(),
        target_encoded: engineered.encodings.len(),
        table,
    })
}

/// Result of the training stage.
pub struct TrainResult {
    pub outcome: TrainOutcome,
    pub artifacts_dir: PathBuf,
}

/// Train the classifier and persist its artifacts.
pub fn train(
    work_dir: &Path,
    artifacts_dir: &Path,
    trials: usize,
    seed: u64,
    uploader: &Uploader,
) -> Result<TrainResult> {
    let span = info_span!("train_stage", trials, seed);
    let _guard = span.enter();
    let started = Instant::now();

    let df = load_featured_table(work_dir)?;
    let config = TrainConfig { trials, seed };
    let outcome = train_model(&df, &config)?;

    outcome.model.save(artifacts_dir)?;
    outcome.schema.save(&artifacts_dir.join(SCHEMA_FILE))?;
    for file in [
        hirematch_model::MODEL_FILE,
        hirematch_model::META_FILE,
        SCHEMA_FILE,
    ] {
        uploader.upload_file(&artifacts_dir.join(file), &format!("models/{file}"));
    }

    info!(
        duration_ms = started.elapsed().as_millis() as u64,
        artifacts = %artifacts_dir.display(),
        "train stage finished"
    );
    Ok(TrainResult {
        outcome,
        artifacts_dir: artifacts_dir.to_path_buf(),
    })
}

/// Result of the evaluation stage.
#[derive(Debug)]
pub struct EvaluateResult {
    pub metrics: EvaluationMetrics,
    pub reports_dir: PathBuf,
}

/// Evaluate the persisted model on the held-out partition.
pub fn evaluate(
    work_dir: &Path,
    artifacts_dir: &Path,
    reports_dir: &Path,
    seed: u64,
    uploader: &Uploader,
) -> Result<EvaluateResult> {
    let span = info_span!("evaluate_stage", seed);
    let _guard = span.enter();
    let started = Instant::now();

    let df = load_featured_table(work_dir)?;
    let (model, schema) = load_artifacts(artifacts_dir)?;
    let evaluation = evaluate_model(&df, &model, &schema, seed)?;
    write_reports(&evaluation, reports_dir)?;
    uploader.upload_file(
        &reports_dir.join(METRICS_FILE),
        &format!("reports/metrics/{METRICS_FILE}"),
    );

    info!(
        duration_ms = started.elapsed().as_millis() as u64,
        reports = %reports_dir.display(),
        "evaluate stage finished"
    );
    Ok(EvaluateResult {
        metrics: evaluation.metrics,
        reports_dir: reports_dir.to_path_buf(),
    })
}

/// Load the model and rank candidates for one vacancy.
///
/// Display names come from the preprocessed table; in the engineered table
/// the name column has been target-encoded to a numeric score.
pub fn rank(
    work_dir: &Path,
    artifacts_dir: &Path,
    job_id: &str,
    min_score: f64,
    top_n: usize,
) -> Result<(MatchModel, Vec<RankedCandidate>)> {
    let span = info_span!("rank_stage", job_id);
    let _guard = span.enter();

    let df = load_featured_table(work_dir)?;
    let (model, schema) = load_artifacts(artifacts_dir)?;
    let mut candidates = rank_candidates(&df, &model, &schema, job_id, min_score, top_n)?;

    let names = match read_table(&work_dir.join(PREPROCESSED_TABLE)) {
        Ok(processed) => applicant_names(&processed),
        Err(_) => BTreeMap::new(),
    };
    for candidate in &mut candidates {
        if let Some(name) = names.get(&candidate.applicant_id) {
            candidate.name = name.clone();
        }
    }
    Ok((model, candidates))
}

/// First name seen per applicant id in the preprocessed table.
fn applicant_names(df: &DataFrame) -> BTreeMap<String, String> {
    let mut names = BTreeMap::new();
    let (Some(ids), Some(applicant_names)) = (
        hirematch_common::string_values(df, "applicant_id"),
        hirematch_common::string_values(df, "nome"),
    ) else {
        return names;
    };
    for (id, name) in ids.into_iter().zip(applicant_names) {
        if !id.is_empty() && !name.is_empty() {
            names.entry(id).or_insert(name);
        }
    }
    names
}

fn load_featured_table(work_dir: &Path) -> Result<DataFrame> {
    let source = work_dir.join(FEATURED_TABLE);
    read_table(&source)
        .with_context(|| format!("read {} (run features first)", source.display()))
}
