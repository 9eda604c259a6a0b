//! Persisted table artifacts (CSV, UTF-8, header row).

use std::fs::{self, File};
use std::path::Path;

use polars::prelude::*;

use hirematch_model::Result;

/// Read a table artifact previously written by [`write_table`].
pub fn read_table(path: &Path) -> Result<DataFrame> {
    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(1000))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))?
        .finish()?;
    Ok(df)
}

/// Write a table artifact, creating parent directories as needed.
pub fn write_table(df: &mut DataFrame, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = File::create(path)?;
    CsvWriter::new(file).include_header(true).finish(df)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_a_frame() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("processed").join("data.csv");
        let mut df = DataFrame::new(vec![
            Series::new("codigo".into(), ["1", "2"]).into(),
            Series::new("target".into(), [1i64, 0]).into(),
        ])
        .unwrap();
        write_table(&mut df, &path).unwrap();
        let loaded = read_table(&path).unwrap();
        assert_eq!(loaded.height(), 2);
        assert_eq!(loaded.width(), 2);
    }
}
