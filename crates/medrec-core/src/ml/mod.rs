//! Pretrained model artifacts: feature transforms, classifier and labels.
//!
//! These are fitted offline and consumed read-only. Loading is best-effort:
//! the pipeline falls back to match-only ranking when the bundle is missing
//! or inconsistent.

mod artifact;
mod classifier;
mod labels;
mod transform;

pub use artifact::*;
pub use classifier::*;
pub use labels::*;
pub use transform::*;

use std::path::PathBuf;

use thiserror::Error;

/// Model errors.
#[derive(Error, Debug)]
pub enum ModelError {
    #[error("Model artifact not found: {path}")]
    Missing { path: PathBuf },

    #[error("Failed to read model artifact {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed model artifact {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid model artifact: {0}")]
    InvalidArtifact(String),

    #[error("Dimension mismatch in {stage}: expected width {expected}, got {found}")]
    DimensionMismatch {
        stage: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("Predicted class id {class_id} is outside the label mapping ({known} known classes)")]
    UnknownClassId { class_id: usize, known: usize },
}

pub type ModelResult<T> = Result<T, ModelError>;
