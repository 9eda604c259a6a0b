//! CLI library components for the match pipeline.

pub mod logging;
pub mod pipeline;
