//! Interaction features and target encoding on the assembled dataset.
//!
//! Every interaction feature is guarded on its input columns: when a source
//! column is absent the feature is skipped rather than failing, since the
//! upstream JSON shape is not under our control. The label column itself is
//! the one hard precondition.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate, Utc};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use hirematch_common::string_values;
use hirematch_ingest::MISSING_TEXT;
use hirematch_model::{PipelineError, Result};

use crate::assemble::TARGET_COLUMN;

/// Seniority order used for the level-match feature.
const LEVEL_MAP: [(&str, i64); 4] = [
    ("Júnior", 1),
    ("Pleno", 2),
    ("Sênior", 3),
    ("Especialista", 4),
];

/// Experience bin edges in years, left-inclusive.
const EXPERIENCE_CUTS: [f64; 6] = [0.0, 1.0, 3.0, 5.0, 10.0, 30.0];
/// Skill-count bin edges, left-inclusive.
const SKILLS_CUTS: [f64; 6] = [0.0, 3.0, 6.0, 10.0, 20.0, 50.0];

/// String columns with more distinct values than this are target-encoded.
const TARGET_ENCODING_CARDINALITY: usize = 10;

const BIRTH_DATE_FORMATS: [&str; 4] = ["%Y-%m-%d", "%d-%m-%Y", "%d/%m/%Y", "%Y/%m/%d"];

/// Per-category mean-label replacement for one high-cardinality column.
///
/// `prior` is the global label mean, used for categories unseen at fit time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetEncoding {
    pub column: String,
    pub prior: f64,
    means: BTreeMap<String, f64>,
}

impl TargetEncoding {
    pub fn fit(column: &str, values: &[String], labels: &[i64]) -> Self {
        let mut sums: BTreeMap<&str, (f64, usize)> = BTreeMap::new();
        for (value, label) in values.iter().zip(labels) {
            let entry = sums.entry(value.as_str()).or_insert((0.0, 0));
            entry.0 += *label as f64;
            entry.1 += 1;
        }
        let prior = if labels.is_empty() {
            0.0
        } else {
            labels.iter().sum::<i64>() as f64 / labels.len() as f64
        };
        let means = sums
            .into_iter()
            .map(|(value, (sum, count))| (value.to_string(), sum / count as f64))
            .collect();
        Self {
            column: column.to_string(),
            prior,
            means,
        }
    }

    pub fn encode(&self, value: &str) -> f64 {
        self.means.get(value).copied().unwrap_or(self.prior)
    }

    pub fn cardinality(&self) -> usize {
        self.means.len()
    }
}

/// The engineered frame plus the fitted target encodings.
#[derive(Debug, Clone)]
pub struct EngineeredFeatures {
    pub frame: DataFrame,
    pub encodings: Vec<TargetEncoding>,
}

fn level_code(value: &str) -> Option<i64> {
    LEVEL_MAP
        .iter()
        .find(|(name, _)| *name == value)
        .map(|(_, code)| *code)
}

/// Left-inclusive bin index for `value`, `None` outside the cut range.
pub fn bin_value(value: f64, cuts: &[f64]) -> Option<u32> {
    cuts.windows(2)
        .position(|edge| value >= edge[0] && value < edge[1])
        .map(|idx| idx as u32)
}

fn parse_birth_year(value: &str) -> Option<i32> {
    for format in BIRTH_DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(value, format) {
            return Some(date.year());
        }
    }
    None
}

fn numeric_values(df: &DataFrame, name: &str) -> Result<Option<Vec<Option<f64>>>> {
    match df.column(name) {
        Ok(column) => {
            let series = column.cast(&DataType::Float64)?;
            Ok(Some(series.f64()?.into_iter().collect()))
        }
        Err(_) => Ok(None),
    }
}

fn add_level_match(df: &mut DataFrame) -> Result<bool> {
    let (Some(job_levels), Some(cand_levels)) = (
        string_values(df, "perfil_vaga_nivel_profissional"),
        string_values(df, "informacoes_profissionais_nivel_profissional"),
    ) else {
        return Ok(false);
    };
    // Unmapped or missing levels on either side count as no match.
    let matches: Vec<i64> = job_levels
        .iter()
        .zip(&cand_levels)
        .map(|(job, cand)| match (level_code(job), level_code(cand)) {
            (Some(job_code), Some(cand_code)) => i64::from(cand_code >= job_code),
            _ => 0,
        })
        .collect();
    df.with_column(Series::new("match_nivel_profissional".into(), matches))?;
    Ok(true)
}

fn add_city_match(df: &mut DataFrame) -> Result<bool> {
    let (Some(job_cities), Some(locations)) = (
        string_values(df, "perfil_vaga_cidade"),
        string_values(df, "informacoes_pessoais_local"),
    ) else {
        return Ok(false);
    };
    // The candidate location reads "Cidade, Estado"; compare the city token.
    // Two missing-value sentinels never count as a match.
    let matches: Vec<i64> = job_cities
        .iter()
        .zip(&locations)
        .map(|(job_city, location)| {
            if job_city == MISSING_TEXT || location == MISSING_TEXT {
                return 0;
            }
            let cand_city = location.split(',').next().unwrap_or("").trim();
            i64::from(
                !cand_city.is_empty()
                    && job_city.trim().to_lowercase() == cand_city.to_lowercase(),
            )
        })
        .collect();
    df.with_column(Series::new("match_cidade".into(), matches))?;
    Ok(true)
}

fn add_bin(df: &mut DataFrame, source: &str, output: &str, cuts: &[f64]) -> Result<bool> {
    let Some(values) = numeric_values(df, source)? else {
        return Ok(false);
    };
    let bins: Vec<Option<u32>> = values
        .iter()
        .map(|value| value.and_then(|v| bin_value(v, cuts)))
        .collect();
    df.with_column(Series::new(output.into(), bins))?;
    Ok(true)
}

fn add_cv_complexity(df: &mut DataFrame) -> Result<bool> {
    let (Some(words), Some(skills)) = (
        numeric_values(df, "cv_word_count")?,
        numeric_values(df, "cv_total_skills")?,
    ) else {
        return Ok(false);
    };
    let complexity: Vec<f64> = words
        .iter()
        .zip(&skills)
        .map(|(w, s)| w.unwrap_or(0.0) * s.unwrap_or(0.0))
        .collect();
    df.with_column(Series::new("cv_complexity".into(), complexity))?;
    Ok(true)
}

fn add_age(df: &mut DataFrame, current_year: i32) -> Result<bool> {
    let Some(birth_dates) = string_values(df, "informacoes_pessoais_data_nascimento") else {
        return Ok(false);
    };
    let ages: Vec<Option<i64>> = birth_dates
        .iter()
        .map(|value| parse_birth_year(value).map(|year| i64::from(current_year - year)))
        .collect();
    df.with_column(Series::new("idade".into(), ages))?;
    Ok(true)
}

fn target_labels(df: &DataFrame) -> Result<Vec<i64>> {
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

fn apply_target_encoding(df: &mut DataFrame, labels: &[i64]) -> Result<Vec<TargetEncoding>> {
    let candidates: Vec<String> = df
        .get_columns()
        .iter()
        .filter(|column| column.dtype() == &DataType::String)
        .filter(|column| column.name().as_str() != TARGET_COLUMN)
        .filter(|column| {
            column
                .as_materialized_series()
                .n_unique()
                .map(|n| n > TARGET_ENCODING_CARDINALITY)
                .unwrap_or(false)
        })
        .map(|column| column.name().to_string())
        .collect();

    let mut encodings = Vec::with_capacity(candidates.len());
    for name in candidates {
        let Some(values) = string_values(df, &name) else {
            continue;
        };
        let encoding = TargetEncoding::fit(&name, &values, labels);
        let encoded: Vec<f64> = values.iter().map(|value| encoding.encode(value)).collect();
        df.with_column(Series::new(name.as_str().into(), encoded))?;
        encodings.push(encoding);
    }
    Ok(encodings)
}

/// Run the full feature-engineering pass over the assembled dataset.
///
/// Fails with [`PipelineError::MissingColumn`] when the label column is
/// absent, since the target encodings cannot be fitted without it.
pub fn engineer_features(df: &DataFrame) -> Result<EngineeredFeatures> {
    engineer_features_at(df, Utc::now().year())
}

/// [`engineer_features`] with an explicit reference year for the age feature.
pub fn engineer_features_at(df: &DataFrame, current_year: i32) -> Result<EngineeredFeatures> {
    let labels = target_labels(df)?;
    let mut frame = df.clone();

    let level = add_level_match(&mut frame)?;
    let city = add_city_match(&mut frame)?;
    let experience = add_bin(
        &mut frame,
        "cv_experience_years",
        "experience_bin",
        &EXPERIENCE_CUTS,
    )?;
    let skills = add_bin(&mut frame, "cv_total_skills", "skills_bin", &SKILLS_CUTS)?;
    let complexity = add_cv_complexity(&mut frame)?;
    let age = add_age(&mut frame, current_year)?;
    debug!(
        level,
        city, experience, skills, complexity, age, "interaction features added"
    );

    let encodings = apply_target_encoding(&mut frame, &labels)?;
    info!(
        rows = frame.height(),
        columns = frame.width(),
        target_encoded = encodings.len(),
        "feature engineering finished"
    );
    Ok(EngineeredFeatures { frame, encodings })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bin_edges_are_left_inclusive() {
        assert_eq!(bin_value(0.0, &EXPERIENCE_CUTS), Some(0));
        assert_eq!(bin_value(1.0, &EXPERIENCE_CUTS), Some(1));
        assert_eq!(bin_value(2.9, &EXPERIENCE_CUTS), Some(1));
        assert_eq!(bin_value(10.0, &EXPERIENCE_CUTS), Some(4));
        assert_eq!(bin_value(29.9, &EXPERIENCE_CUTS), Some(4));
        assert_eq!(bin_value(30.0, &EXPERIENCE_CUTS), None);
        assert_eq!(bin_value(-1.0, &EXPERIENCE_CUTS), None);
    }

    #[test]
    fn birth_year_parses_common_formats() {
        assert_eq!(parse_birth_year("1990-01-05"), Some(1990));
        assert_eq!(parse_birth_year("05-01-1990"), Some(1990));
        assert_eq!(parse_birth_year("05/01/1990"), Some(1990));
        assert_eq!(parse_birth_year(MISSING_TEXT), None);
        assert_eq!(parse_birth_year("not a date"), None);
    }

    #[test]
    fn target_encoding_falls_back_to_prior() {
        let values: Vec<String> = ["a", "a", "b", "b"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let labels = vec![1, 1, 0, 1];
        let encoding = TargetEncoding::fit("col", &values, &labels);
        assert_eq!(encoding.encode("a"), 1.0);
        assert_eq!(encoding.encode("b"), 0.5);
        assert_eq!(encoding.encode("unseen"), 0.75);
    }
}
