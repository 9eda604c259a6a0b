//! Object storage boundary for pipeline tables and model artifacts.
//!
//! The pipeline writes its intermediate CSVs and trained artifacts through
//! the [`ObjectStore`] trait. [`FsStore`] is the only implementation here, a
//! directory tree laid out like a remote bucket, which keeps the upload
//! call sites honest without a network dependency.

pub mod config;
pub mod error;
pub mod store;

pub use config::{BUCKET_ENV, PREFIX_ENV, ROOT_ENV, StorageConfig};
pub use error::{Result, StorageError};
pub use store::{FsStore, ObjectStore};
