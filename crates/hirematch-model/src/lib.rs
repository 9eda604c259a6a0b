pub mod error;
pub mod model;
pub mod schema;

pub use error::{PipelineError, Result};
pub use model::{META_FILE, MODEL_FILE, MatchModel, ModelMetadata, SCHEMA_FILE, load_artifacts};
pub use schema::{AlignReport, FeatureSchema};
