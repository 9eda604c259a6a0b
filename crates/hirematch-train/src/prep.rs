//! Turns the engineered table into a purely numeric feature matrix.
//!
//! The order of operations matters: identifiers and free text are dropped
//! first, then string columns that cannot be one-hot encoded sensibly, then
//! the survivors are dummy-encoded, and only the numeric residue is kept.
//! Constant columns carry no signal for tree splits and are removed before
//! imputation.

use polars::prelude::*;
use tracing::{debug, warn};

use hirematch_common::string_values;
use hirematch_features::TARGET_COLUMN;
use hirematch_model::{PipelineError, Result};

/// Identifier, free-text, and leakage columns never used as features.
pub const DROP_COLUMNS: [&str; 23] = [
    "job_id",
    "codigo",
    "applicant_id",
    "nome",
    "data_candidatura",
    "ultima_atualizacao",
    "comentario",
    "recrutador",
    "titulo_vaga",
    "cv_pt",
    "cv_en",
    "situacao_candidado",
    "informacoes_pessoais_nome",
    "informacoes_pessoais_email",
    "informacoes_pessoais_cpf",
    "informacoes_pessoais_telefone_celular",
    "informacoes_basicas_titulo_vaga",
    "informacoes_basicas_vaga_sap",
    "infos_basicas",
    "informacoes_pessoais",
    "informacoes_profissionais",
    "formacao_e_idiomas",
    "cargo_atual",
];

/// String columns above this distinct count are dropped, not one-hot encoded.
const MAX_ONE_HOT_CARDINALITY: usize = 50;
/// String columns whose sample value is longer than this are free text.
const MAX_SAMPLE_LENGTH: usize = 100;
/// Minimum feature columns required for a meaningful fit.
pub const MIN_FEATURE_COLUMNS: usize = 5;
/// Below this row count the fit is allowed but flagged as unreliable.
pub const MIN_RELIABLE_ROWS: usize = 1000;

/// Dummy category name for missing values in one-hot encoding.
const NAN_CATEGORY: &str = "nan";

/// The numeric feature matrix and its labels, ready for the booster.
#[derive(Debug, Clone)]
pub struct PreparedDataset {
    pub features: DataFrame,
    pub labels: Vec<i64>,
}

impl PreparedDataset {
    pub fn feature_names(&self) -> Vec<String> {
        self.features
            .get_column_names()
            .iter()
            .map(|name| name.to_string())
            .collect()
    }
}

fn labels_from(df: &DataFrame) -> Result<Vec<i64>> {
    let column = df
        .column(TARGET_COLUMN)
        .map_err(|_| PipelineError::MissingColumn(TARGET_COLUMN.to_string()))?;
    let series = column.cast(&DataType::Int64)?;
    Ok(series
        .i64()?
        .into_iter()
        .map(|label| label.unwrap_or(0))
        .collect())
}

fn first_non_empty(values: &[String]) -> Option<&String> {
    values.iter().find(|value| !value.is_empty())
}

fn looks_structured(sample: &str) -> bool {
    sample.starts_with('{') || sample.starts_with('[')
}

/// Whether a string column should be dropped instead of one-hot encoded.
fn unencodable(df: &DataFrame, name: &str, values: &[String]) -> Result<bool> {
    let distinct = df.column(name)?.as_materialized_series().n_unique()?;
    if distinct > MAX_ONE_HOT_CARDINALITY {
        return Ok(true);
    }
    match first_non_empty(values) {
        Some(sample) => Ok(sample.len() > MAX_SAMPLE_LENGTH || looks_structured(sample)),
        None => Ok(true),
    }
}

/// One-hot encode a string column: sorted categories, first dropped, plus an
/// explicit missing-value category.
fn one_hot_columns(name: &str, values: &[String]) -> Vec<Column> {
    let mut categories: Vec<&str> = values
        .iter()
        .map(|value| {
            if value.is_empty() {
                NAN_CATEGORY
            } else {
                value.as_str()
            }
        })
        .collect::<std::collections::BTreeSet<&str>>()
        .into_iter()
        .collect();
    if !categories.contains(&NAN_CATEGORY) {
        categories.push(NAN_CATEGORY);
    }
    categories
        .iter()
        .skip(1)
        .map(|category| {
            let indicators: Vec<i64> = values
                .iter()
                .map(|value| {
                    let observed = if value.is_empty() { NAN_CATEGORY } else { value };
                    i64::from(observed == *category)
                })
                .collect();
            Series::new(format!("{name}_{category}").into(), indicators).into()
        })
        .collect()
}

fn is_constant(column: &Column) -> Result<bool> {
    let series = column.as_materialized_series();
    let non_null = series.drop_nulls();
    Ok(non_null.n_unique()? <= 1)
}

fn fill_median(column: &Column) -> Result<Column> {
    if column.null_count() == 0 {
        return Ok(column.clone());
    }
    let name = column.name().clone();
    let cast = column.cast(&DataType::Float64)?;
    let values = cast.f64()?;
    let median = values.median().unwrap_or(0.0);
    let filled: Vec<f64> = values
        .into_iter()
        .map(|value| value.unwrap_or(median))
        .collect();
    Ok(Series::new(name, filled).into())
}

/// Build the numeric feature matrix from the engineered table.
///
/// # Errors
///
/// Fails when the label column is missing or fewer than
/// [`MIN_FEATURE_COLUMNS`] feature columns survive the cleanup.
pub fn prepare_features(df: &DataFrame) -> Result<PreparedDataset> {
    let labels = labels_from(df)?;

    let mut kept: Vec<Column> = Vec::new();
    let mut dropped: Vec<String> = Vec::new();
    for column in df.get_columns() {
        let name = column.name().to_string();
        if name == TARGET_COLUMN || DROP_COLUMNS.contains(&name.as_str()) {
            continue;
        }
        if column.dtype() == &DataType::String {
            let values = string_values(df, &name).unwrap_or_default();
            if unencodable(df, &name, &values)? {
                dropped.push(name);
                continue;
            }
            kept.extend(one_hot_columns(&name, &values));
        } else if column.dtype().is_primitive_numeric() || column.dtype() == &DataType::Boolean {
            kept.push(column.cast(&DataType::Float64)?);
        } else {
            dropped.push(name);
        }
    }
    if !dropped.is_empty() {
        debug!(count = dropped.len(), columns = ?dropped, "unencodable columns dropped");
    }

    let mut columns: Vec<Column> = Vec::with_capacity(kept.len());
    for column in kept {
        if is_constant(&column)? {
            continue;
        }
        columns.push(fill_median(&column)?);
    }

    if columns.len() < MIN_FEATURE_COLUMNS {
        return Err(PipelineError::TooFewFeatures {
            found: columns.len(),
            minimum: MIN_FEATURE_COLUMNS,
        });
    }
    let features = DataFrame::new(columns)?;
    if features.height() < MIN_RELIABLE_ROWS {
        warn!(
            rows = features.height(),
            minimum = MIN_RELIABLE_ROWS,
            "few training rows, expect an unstable fit"
        );
    }
    debug!(
        rows = features.height(),
        columns = features.width(),
        "feature matrix prepared"
    );
    Ok(PreparedDataset { features, labels })
}

/// Row-major `f32` matrix for the booster, schema column order.
pub fn to_matrix(features: &DataFrame) -> Result<Vec<Vec<f32>>> {
    let mut column_values: Vec<Vec<f32>> = Vec::with_capacity(features.width());
    for column in features.get_columns() {
        let series = column.cast(&DataType::Float64)?;
        column_values.push(
            series
                .f64()?
                .into_iter()
                .map(|value| value.unwrap_or(0.0) as f32)
                .collect(),
        );
    }
    let mut rows = vec![Vec::with_capacity(features.width()); features.height()];
    for values in &column_values {
        for (row, value) in rows.iter_mut().zip(values) {
            row.push(*value);
        }
    }
    Ok(rows)
}
