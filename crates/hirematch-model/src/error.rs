use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("dataframe error: {0}")]
    Polars(#[from] polars::error::PolarsError),
    #[error("artifact error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("model error: {0}")]
    Model(String),
    #[error("missing required column: {0}")]
    MissingColumn(String),
    #[error("too few usable features: {found} (minimum {minimum})")]
    TooFewFeatures { found: usize, minimum: usize },
    #[error("{0}")]
    Message(String),
}

pub type Result<T> = std::result::Result<T, PipelineError>;
