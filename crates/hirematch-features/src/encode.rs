//! Label encoding and min-max scaling, fit once and returned as artifacts.
//!
//! The fitted objects are explicit values threaded through calls, never
//! module state. The current pipeline does not reuse them at serving time;
//! callers that need to must persist them alongside the other artifacts.

use std::collections::{BTreeMap, BTreeSet};

use polars::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use hirematch_common::string_values;
use hirematch_model::Result;

/// Default applicant columns label-encoded during preprocessing.
pub const DEFAULT_CATEGORICAL_COLS: [&str; 4] = [
    "informacoes_pessoais_sexo",
    "formacao_e_idiomas_nivel_ingles",
    "formacao_e_idiomas_nivel_espanhol",
    "informacoes_profissionais_area_atuacao",
];

/// Default applicant columns min-max scaled during preprocessing.
pub const DEFAULT_NUMERICAL_COLS: [&str; 4] = [
    "cv_word_count",
    "cv_char_count",
    "cv_experience_years",
    "cv_total_skills",
];

/// Integer codes for one categorical column, in sorted category order.
///
/// Values are string-coerced before fitting, so the missing-value marker is
/// itself a valid category.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabelEncoding {
    pub column: String,
    mapping: BTreeMap<String, u32>,
}

impl LabelEncoding {
    pub fn fit(column: &str, values: &[String]) -> Self {
        let categories: BTreeSet<&String> = values.iter().collect();
        let mapping = categories
            .into_iter()
            .enumerate()
            .map(|(code, category)| (category.clone(), code as u32))
            .collect();
        Self {
            column: column.to_string(),
            mapping,
        }
    }

    pub fn encode(&self, value: &str) -> Option<u32> {
        self.mapping.get(value).copied()
    }

    pub fn cardinality(&self) -> usize {
        self.mapping.len()
    }
}

/// One shared min-max scaler over the requested numeric columns.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MinMaxScaler {
    ranges: BTreeMap<String, (f64, f64)>,
}

impl MinMaxScaler {
    fn fit(df: &DataFrame, columns: &[String]) -> Result<Self> {
        let mut ranges = BTreeMap::new();
        for name in columns {
            let series = df.column(name)?.cast(&DataType::Float64)?;
            let values = series.f64()?;
            let min = values.min().unwrap_or(0.0);
            let max = values.max().unwrap_or(0.0);
            ranges.insert(name.clone(), (min, max));
        }
        Ok(Self { ranges })
    }

    pub fn columns(&self) -> impl Iterator<Item = &String> {
        self.ranges.keys()
    }

    /// Scale a value into `[0, 1]`; constant columns scale to 0.
    pub fn scale(&self, column: &str, value: f64) -> Option<f64> {
        let (min, max) = self.ranges.get(column)?;
        if (max - min).abs() < f64::EPSILON {
            Some(0.0)
        } else {
            Some((value - min) / (max - min))
        }
    }
}

/// The fitted encoders and scaler produced by [`fit_encode_normalize`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FittedTransforms {
    pub encodings: Vec<LabelEncoding>,
    pub scaler: Option<MinMaxScaler>,
}

/// Label-encode the requested categoricals and min-max scale the requested
/// numeric columns, returning the transformed frame plus the fitted
/// artifacts.
///
/// Requested columns absent from the frame are skipped silently.
pub fn fit_encode_normalize(
    df: &DataFrame,
    categorical: &[&str],
    numerical: &[&str],
) -> Result<(DataFrame, FittedTransforms)> {
    let mut out = df.clone();
    let mut encodings = Vec::new();
    for name in categorical {
        let Some(values) = string_values(&out, name) else {
            continue;
        };
        let encoding = LabelEncoding::fit(name, &values);
        let codes: Vec<u32> = values
            .iter()
            .map(|value| encoding.encode(value).unwrap_or(0))
            .collect();
        out.with_column(Series::new((*name).into(), codes))?;
        encodings.push(encoding);
    }

    let present: Vec<String> = numerical
        .iter()
        .filter(|name| out.column(name).is_ok())
        .map(|name| (*name).to_string())
        .collect();
    let scaler = if present.is_empty() {
        None
    } else {
        let scaler = MinMaxScaler::fit(&out, &present)?;
        for name in &present {
            let series = out.column(name)?.cast(&DataType::Float64)?;
            let scaled: Vec<Option<f64>> = series
                .f64()?
                .into_iter()
                .map(|value| value.and_then(|v| scaler.scale(name, v)))
                .collect();
            out.with_column(Series::new(name.as_str().into(), scaled))?;
        }
        Some(scaler)
    };
    debug!(
        encoded = encodings.len(),
        scaled = present.len(),
        "categorical encoding and normalization fitted"
    );
    Ok((
        out,
        FittedTransforms { encodings, scaler },
    ))
}
