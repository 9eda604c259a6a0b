//! The `ObjectStore` trait and its filesystem implementation.

use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};

use polars::prelude::*;
use tracing::debug;

use crate::config::StorageConfig;
use crate::error::{Result, StorageError};

/// Key/value object storage with CSV table helpers.
///
/// Keys are slash-separated paths inside the configured bucket. The table
/// helpers round-trip DataFrames through UTF-8 CSV with a header row, so
/// any implementation that moves bytes faithfully also moves tables
/// faithfully.
pub trait ObjectStore {
    fn put_bytes(&self, key: &str, bytes: &[u8]) -> Result<()>;

    fn get_bytes(&self, key: &str) -> Result<Vec<u8>>;

    fn store_table(&self, key: &str, df: &mut DataFrame) -> Result<()> {
        let mut buffer = Vec::new();
        CsvWriter::new(&mut buffer)
            .include_header(true)
            .finish(df)
            .map_err(|source| StorageError::Table {
                key: key.to_string(),
                source,
            })?;
        self.put_bytes(key, &buffer)
    }

    fn load_table(&self, key: &str) -> Result<DataFrame> {
        let bytes = self.get_bytes(key)?;
        CsvReadOptions::default()
            .with_has_header(true)
            .into_reader_with_file_handle(Cursor::new(bytes))
            .finish()
            .map_err(|source| StorageError::Table {
                key: key.to_string(),
                source,
            })
    }
}

/// Object store rooted in a local directory, one file per key.
///
/// Stands in for a remote bucket in development and in tests; the key
/// layout matches what a remote implementation would use.
pub struct FsStore {
    root: PathBuf,
}

impl FsStore {
    pub fn new(config: &StorageConfig) -> Self {
        Self {
            root: config.bucket_root(),
        }
    }

    pub fn at(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn object_path(&self, key: &str) -> PathBuf {
        // Keys are relative slash paths; keep them inside the root.
        let sanitized: PathBuf = Path::new(key)
            .components()
            .filter(|part| matches!(part, std::path::Component::Normal(_)))
            .collect();
        self.root.join(sanitized)
    }
}

impl ObjectStore for FsStore {
    fn put_bytes(&self, key: &str, bytes: &[u8]) -> Result<()> {
        let path = self.object_path(key);
        let io_error = |source| StorageError::Io {
            key: key.to_string(),
            source,
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(io_error)?;
        }
        fs::write(&path, bytes).map_err(io_error)?;
        debug!(key, bytes = bytes.len(), "object stored");
        Ok(())
    }

    fn get_bytes(&self, key: &str) -> Result<Vec<u8>> {
        let path = self.object_path(key);
        if !path.exists() {
            return Err(StorageError::NotFound(key.to_string()));
        }
        fs::read(&path).map_err(|source| StorageError::Io {
            key: key.to_string(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bytes_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsStore::at(dir.path());
        store.put_bytes("models/model.json", b"payload").unwrap();
        assert_eq!(store.get_bytes("models/model.json").unwrap(), b"payload");
    }

    #[test]
    fn missing_key_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsStore::at(dir.path());
        let err = store.get_bytes("absent").unwrap_err();
        assert!(matches!(err, StorageError::NotFound(key) if key == "absent"));
    }

    #[test]
    fn tables_round_trip_through_csv() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsStore::at(dir.path());
        let mut df = DataFrame::new(vec![
            Series::new("nome".into(), ["Ana", "Bruno"]).into(),
            Series::new("score".into(), [0.9f64, 0.3]).into(),
        ])
        .unwrap();
        store.store_table("data/processed/scores.csv", &mut df).unwrap();
        let loaded = store.load_table("data/processed/scores.csv").unwrap();
        assert_eq!(loaded.shape(), (2, 2));
        assert_eq!(
            loaded.column("nome").unwrap().str().unwrap().get(0),
            Some("Ana")
        );
    }

    #[test]
    fn keys_cannot_escape_the_root() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsStore::at(dir.path().join("bucket"));
        store.put_bytes("../escape.txt", b"x").unwrap();
        assert!(dir.path().join("bucket/escape.txt").exists());
        assert!(!dir.path().join("escape.txt").exists());
    }
}
