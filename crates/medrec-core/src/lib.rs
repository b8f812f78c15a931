//! Medrec Core Library
//!
//! Symptom-driven medicine recommendation with a separate contraindication
//! safety check.
//!
//! # Architecture
//!
//! ```text
//! symptoms ──► Symptom Matcher ──► candidates (≤ max_candidates)
//!                                       │
//!                       ┌───────────────┴───────────────┐
//!                       │ models loaded?                │
//!                       ▼                               ▼
//!          Feature Transformer                     match score only
//!          (reducer → scaler)                           │
//!                       │                               │
//!                       ▼                               │
//!          Classifier (confidence, class)               │
//!                       │                               │
//!                       └───────────────┬───────────────┘
//!                                       ▼
//!                      Fusion / Ranking (top-k, alternatives,
//!                      cluster context, template explanation)
//!                                       │
//!                                       ▼
//!                      Explanation Generator (optional, timed)
//!                                       │
//!                                       ▼
//!                            ranked Recommendation list
//!
//! patient profile ──► Contraindication Checker ──► safety verdict
//! ```
//!
//! # Core Principle
//!
//! **Ranking is deterministic given the query and the artifacts.** Generated
//! text may be appended to an explanation but never changes an ordering.
//!
//! # Modules
//!
//! - [`store`]: Catalog records and row-aligned feature vectors
//! - [`ml`]: Pretrained transforms, classifier and label mapping
//! - [`clusters`]: Cluster index (and offline Ward clustering)
//! - [`ranking`]: Symptom matching and fusion
//! - [`safety`]: Contraindication rules and checker
//! - [`explain`]: Template and generated explanations
//! - [`pipeline`]: Orchestration and status
//! - [`export`]: JSON and CSV export of recommendation runs

pub mod clusters;
pub mod config;
pub mod explain;
pub mod export;
pub mod logging;
pub mod ml;
pub mod models;
pub mod pipeline;
pub mod ranking;
pub mod safety;
pub mod store;

#[cfg(test)]
pub(crate) mod fixtures;

// Re-export commonly used types
pub use clusters::{build_cluster_index, ClusterIndex};
pub use config::PipelineConfig;
pub use explain::{ServiceError, TextGenerator};
pub use export::RecommendationExport;
pub use ml::ModelBundle;
pub use models::{
    ContraindicationResult, MedicineRecord, PatientProfile, RankingMode, Recommendation,
    RecommendationSet, SafetyStatus,
};
pub use pipeline::{Pipeline, PipelineContext, PipelineError, PipelineStatus};
pub use safety::{ContraindicationChecker, RuleTable};
pub use store::CatalogStore;
