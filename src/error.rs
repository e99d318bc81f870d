// Pipeline error taxonomy
use std::path::PathBuf;
use thiserror::Error;

/// Hard failures of the ingestion-to-artifact pipeline.
///
/// Row-level format problems are not part of this taxonomy: malformed rows
/// are dropped with a warning during decoding, and only a batch with zero
/// surviving samples becomes an `EmptyBatch` failure.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("source not found: {0}")]
    SourceNotFound(PathBuf),

    #[error("invalid batch payload: {0}")]
    Decode(String),

    #[error("no valid samples in batch")]
    EmptyBatch,

    #[error("map rendering failed: {0}")]
    Render(String),

    #[error("failed to persist batch: {0}")]
    Store(#[from] std::io::Error),
}
