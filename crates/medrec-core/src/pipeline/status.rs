use serde::{Deserialize, Serialize};

use crate::models::RankingMode;

/// Snapshot returned by `get_pipeline_status`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PipelineStatus {
    pub data_loaded: bool,
    pub total_medicines: usize,
    pub feature_width: usize,
    pub total_clusters: usize,
    pub models_loaded: bool,
    /// SHA-256 of the model artifact files, when loaded from disk
    pub model_fingerprint: Option<String>,
    /// Whether a text generation backend can be called
    pub gemini_available: bool,
    /// Backend name, or "template"
    pub explanation_backend: String,
    pub mode: RankingMode,
}
