//! Storage configuration from the environment.

use std::env;
use std::path::PathBuf;

use crate::error::{Result, StorageError};

/// Environment variable naming the bucket. Required.
pub const BUCKET_ENV: &str = "HIREMATCH_BUCKET";
/// Environment variable for the local storage root. Optional.
pub const ROOT_ENV: &str = "HIREMATCH_STORAGE_ROOT";
/// Environment variable for a key prefix inside the bucket. Optional.
pub const PREFIX_ENV: &str = "HIREMATCH_PREFIX";

const DEFAULT_ROOT: &str = ".hirematch-storage";

/// Where objects live: a root directory, a bucket name, an optional prefix.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub root: PathBuf,
    pub bucket: String,
    pub prefix: Option<String>,
}

impl StorageConfig {
    /// Read the configuration from the environment.
    ///
    /// # Errors
    ///
    /// Fails with [`StorageError::MissingBucket`] when [`BUCKET_ENV`] is not
    /// set; uploads without a bucket would silently go nowhere.
    pub fn from_env() -> Result<Self> {
        let bucket = env::var(BUCKET_ENV)
            .ok()
            .filter(|value| !value.is_empty())
            .ok_or(StorageError::MissingBucket(BUCKET_ENV))?;
        let root = env::var(ROOT_ENV)
            .ok()
            .filter(|value| !value.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_ROOT));
        let prefix = env::var(PREFIX_ENV).ok().filter(|value| !value.is_empty());
        Ok(Self {
            root,
            bucket,
            prefix,
        })
    }

    /// Directory the bucket maps to on the local filesystem.
    pub fn bucket_root(&self) -> PathBuf {
        let mut path = self.root.join(&self.bucket);
        if let Some(prefix) = &self.prefix {
            path = path.join(prefix);
        }
        path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bucket_root_includes_bucket_and_prefix() {
        let config = StorageConfig {
            root: PathBuf::from("/tmp/store"),
            bucket: "hirematch".to_string(),
            prefix: Some("prod".to_string()),
        };
        assert_eq!(
            config.bucket_root(),
            PathBuf::from("/tmp/store/hirematch/prod")
        );
    }

    #[test]
    fn prefix_is_optional() {
        let config = StorageConfig {
            root: PathBuf::from("/tmp/store"),
            bucket: "hirematch".to_string(),
            prefix: None,
        };
        assert_eq!(config.bucket_root(), PathBuf::from("/tmp/store/hirematch"));
    }
}
