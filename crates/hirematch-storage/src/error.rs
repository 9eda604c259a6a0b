//! Storage error types.

use thiserror::Error;

/// Errors from the object-storage boundary, distinct from pipeline errors so
/// callers can tell configuration problems from data problems.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The bucket environment variable is not set.
    #[error("bucket not configured: set {0}")]
    MissingBucket(&'static str),

    /// The requested key does not exist in the store.
    #[error("object not found: {0}")]
    NotFound(String),

    /// An I/O failure while reading or writing an object.
    #[error("storage i/o for {key}: {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },

    /// A table could not be encoded to or decoded from CSV.
    #[error("table codec for {key}: {source}")]
    Table {
        key: String,
        #[source]
        source: polars::error::PolarsError,
    },
}

pub type Result<T> = std::result::Result<T, StorageError>;
