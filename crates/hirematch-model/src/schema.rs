//! The ordered feature-column schema persisted next to the trained model.
//!
//! The schema is fixed the moment training ends. Any frame scored later is
//! projected onto it: columns the model never saw are dropped, columns the
//! frame lacks are zero-filled. Alignment never fails; drift is surfaced
//! through [`AlignReport`] so operators can notice diverging schemas.

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use polars::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::{PipelineError, Result};

/// Ordered, duplicate-free list of feature column names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureSchema {
    columns: Vec<String>,
}

/// Diagnostic counts from an alignment pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AlignReport {
    /// Columns present in the frame but absent from the schema.
    pub dropped: usize,
    /// Schema columns absent from the frame, zero-filled.
    pub filled: usize,
}

impl FeatureSchema {
    /// Build a schema from an ordered column list.
    ///
    /// # Errors
    ///
    /// Returns an error when the list contains duplicate names.
    pub fn new(columns: Vec<String>) -> Result<Self> {
        let mut seen = BTreeSet::new();
        for name in &columns {
            if !seen.insert(name.as_str()) {
                return Err(PipelineError::Message(format!(
                    "duplicate column in feature schema: {name}"
                )));
            }
        }
        Ok(Self { columns })
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Persist the schema as a JSON array of column names.
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(&self.columns)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Load a schema previously written by [`FeatureSchema::save`].
    pub fn load(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path)?;
        let columns: Vec<String> = serde_json::from_str(&json)?;
        Self::new(columns)
    }

    /// Project a frame onto this schema.
    ///
    /// The result has exactly the schema's columns, in schema order, all
    /// `Float64`. Extra frame columns are dropped, missing schema columns are
    /// filled with zero for every row, and row count/order is preserved.
    pub fn align(&self, df: &DataFrame) -> Result<(DataFrame, AlignReport)> {
        let height = df.height();
        let schema_set: BTreeSet<&str> = self.columns.iter().map(String::as_str).collect();
        let mut report = AlignReport::default();
        let mut columns: Vec<Column> = Vec::with_capacity(self.columns.len());
        for name in &self.columns {
            match df.column(name) {
                Ok(column) => {
                    columns.push(column.cast(&DataType::Float64)?);
                }
                Err(_) => {
                    report.filled += 1;
                    columns
                        .push(Series::new(name.as_str().into(), vec![0.0f64; height]).into());
                }
            }
        }
        report.dropped = df
            .get_column_names()
            .iter()
            .filter(|name| !schema_set.contains(name.as_str()))
            .count();
        let aligned = DataFrame::new(columns)?;
        Ok((aligned, report))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_duplicate_columns() {
        let result = FeatureSchema::new(vec!["a".to_string(), "a".to_string()]);
        assert!(result.is_err());
    }

    #[test]
    fn save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model_columns.json");
        let schema = FeatureSchema::new(vec!["a".to_string(), "b".to_string()]).unwrap();
        schema.save(&path).unwrap();
        let loaded = FeatureSchema::load(&path).unwrap();
        assert_eq!(schema, loaded);
    }
}
