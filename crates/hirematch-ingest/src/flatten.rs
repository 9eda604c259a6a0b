//! Flattening of the three nested JSON sources into tabular frames.
//!
//! All columns are string-typed at this stage; numeric features are derived
//! later. Absent fields are nulls, filled by the cleaning pass.

use std::collections::{BTreeMap, BTreeSet};

use polars::prelude::*;
use serde_json::Value;
use tracing::debug;

use hirematch_model::Result;

use crate::json::value_to_cell;

/// Nested applicant sections flattened into `section_field` columns.
const APPLICANT_SECTIONS: [&str; 5] = [
    "infos_basicas",
    "informacoes_pessoais",
    "informacoes_profissionais",
    "formacao_e_idiomas",
    "cargo_atual",
];

/// Nested job-posting sections flattened into `section_field` columns.
const JOB_SECTIONS: [&str; 3] = ["informacoes_basicas", "perfil_vaga", "beneficios"];

type RowMap = BTreeMap<String, String>;

/// One row per applicant, keyed by `applicant_id`.
///
/// Known nested sections flatten into prefixed columns; top-level scalars
/// (the résumé fields `cv_pt`/`cv_en` among them) keep their own name.
pub fn flatten_applicants(source: &BTreeMap<String, Value>) -> Result<DataFrame> {
    let mut rows = Vec::with_capacity(source.len());
    for (applicant_id, data) in source {
        let mut row = RowMap::new();
        row.insert("applicant_id".to_string(), applicant_id.clone());
        let Value::Object(fields) = data else {
            rows.push(row);
            continue;
        };
        for (key, value) in fields {
            if APPLICANT_SECTIONS.contains(&key.as_str()) {
                flatten_section(&mut row, key, value);
            } else if let Some(cell) = value_to_cell(value) {
                row.insert(key.clone(), cell);
            }
        }
        rows.push(row);
    }
    let df = rows_to_frame(&rows)?;
    debug!(rows = df.height(), columns = df.width(), "applicants flattened");
    Ok(df)
}

/// One row per job posting, keyed by `job_id`.
///
/// Only the basic-info, profile, and benefits sections contribute columns;
/// other keys are ignored.
pub fn flatten_jobs(source: &BTreeMap<String, Value>) -> Result<DataFrame> {
    let mut rows = Vec::with_capacity(source.len());
    for (job_id, data) in source {
        let mut row = RowMap::new();
        row.insert("job_id".to_string(), job_id.clone());
        if let Value::Object(fields) = data {
            for section in JOB_SECTIONS {
                if let Some(value) = fields.get(section) {
                    flatten_section(&mut row, section, value);
                }
            }
        }
        rows.push(row);
    }
    let df = rows_to_frame(&rows)?;
    debug!(rows = df.height(), columns = df.width(), "jobs flattened");
    Ok(df)
}

/// One row per (job, prospect) pair.
///
/// Each row carries the parent `job_id` plus the job title and modality for
/// display convenience. Jobs without prospects contribute zero rows.
pub fn flatten_prospects(source: &BTreeMap<String, Value>) -> Result<DataFrame> {
    let mut rows = Vec::new();
    for (job_id, data) in source {
        let Value::Object(fields) = data else {
            continue;
        };
        let titulo = fields
            .get("titulo")
            .and_then(value_to_cell)
            .unwrap_or_default();
        let modalidade = fields
            .get("modalidade")
            .and_then(value_to_cell)
            .unwrap_or_default();
        let Some(Value::Array(prospects)) = fields.get("prospects") else {
            continue;
        };
        for prospect in prospects {
            let Value::Object(prospect_fields) = prospect else {
                continue;
            };
            let mut row = RowMap::new();
            for (key, value) in prospect_fields {
                if let Some(cell) = value_to_cell(value) {
                    row.insert(key.clone(), cell);
                }
            }
            row.insert("job_id".to_string(), job_id.clone());
            row.insert("titulo_vaga".to_string(), titulo.clone());
            row.insert("modalidade_vaga".to_string(), modalidade.clone());
            rows.push(row);
        }
    }
    let df = rows_to_frame(&rows)?;
    debug!(rows = df.height(), columns = df.width(), "prospects flattened");
    Ok(df)
}

fn flatten_section(row: &mut RowMap, section: &str, value: &Value) {
    let Value::Object(fields) = value else {
        return;
    };
    for (key, field_value) in fields {
        if let Some(cell) = value_to_cell(field_value) {
            row.insert(format!("{section}_{key}"), cell);
        }
    }
}

/// Build a string-typed DataFrame from row maps.
///
/// Columns are the sorted union of keys across rows; cells absent from a row
/// become nulls.
fn rows_to_frame(rows: &[RowMap]) -> Result<DataFrame> {
    if rows.is_empty() {
        return Ok(DataFrame::default());
    }
    let mut names = BTreeSet::new();
    for row in rows {
        for key in row.keys() {
            names.insert(key.clone());
        }
    }
    let mut columns: Vec<Column> = Vec::with_capacity(names.len());
    for name in names {
        let values: Vec<Option<String>> = rows.iter().map(|row| row.get(&name).cloned()).collect();
        columns.push(Series::new(name.as_str().into(), values).into());
    }
    Ok(DataFrame::new(columns)?)
}
