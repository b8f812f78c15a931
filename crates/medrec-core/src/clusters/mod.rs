//! Cluster index over the medicine catalog.
//!
//! Clusters are computed offline (see [`build_cluster_index`]) and loaded as a
//! read-only artifact. The index only enriches recommendations with a
//! purity signal; it never changes a classifier decision.

mod build;
mod summarize;
mod ward;

pub use build::*;
pub use summarize::*;
pub use ward::*;

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

use crate::ml::ModelError;
use crate::models::ClusterSummary;
use crate::store::{read_json, StoreError};

/// Cluster errors.
#[derive(Error, Debug)]
pub enum ClusterError {
    #[error("Got {labels} cluster labels for {records} medicines")]
    LabelCount { labels: usize, records: usize },

    #[error("Cluster label {label} is outside 0..{k}")]
    LabelOutOfRange { label: usize, k: usize },

    #[error("Cannot form {k} clusters from {n} points")]
    InvalidK { k: usize, n: usize },

    #[error("Duplicate cluster id {0}")]
    DuplicateId(usize),

    #[error("Cluster id {id} is outside 0..{k}")]
    IdOutOfRange { id: usize, k: usize },

    #[error("Cluster sizes sum to {clustered} but the catalog has {medicines} medicines")]
    SizeMismatch { clustered: usize, medicines: usize },

    #[error("Failed to write cluster artifact {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Model(#[from] ModelError),
}

pub type ClusterResult<T> = Result<T, ClusterError>;

/// Read-only set of cluster summaries with lookup by primary class.
#[derive(Debug, Clone)]
pub struct ClusterIndex {
    /// Ordered by size descending, then cluster id ascending
    summaries: Vec<ClusterSummary>,
    /// Lower-cased primary class -> position of the first non-empty cluster
    by_class: HashMap<String, usize>,
}

impl ClusterIndex {
    /// Build an index, checking that ids are `0..K` without duplicates and
    /// that sizes account for every medicine exactly once.
    pub fn new(mut summaries: Vec<ClusterSummary>, total_medicines: usize) -> ClusterResult<Self> {
        let k = summaries.len();
        let mut seen = HashSet::new();
        for summary in &summaries {
            if summary.cluster_id >= k {
                return Err(ClusterError::IdOutOfRange {
                    id: summary.cluster_id,
                    k,
                });
            }
            if !seen.insert(summary.cluster_id) {
                return Err(ClusterError::DuplicateId(summary.cluster_id));
            }
        }

        let clustered: usize = summaries.iter().map(|s| s.size).sum();
        if clustered != total_medicines {
            return Err(ClusterError::SizeMismatch {
                clustered,
                medicines: total_medicines,
            });
        }

        summaries.sort_by(|a, b| b.size.cmp(&a.size).then(a.cluster_id.cmp(&b.cluster_id)));

        let mut by_class = HashMap::new();
        for (pos, summary) in summaries.iter().enumerate() {
            if summary.size == 0 {
                continue;
            }
            by_class
                .entry(summary.primary_class.trim().to_lowercase())
                .or_insert(pos);
        }

        Ok(Self {
            summaries,
            by_class,
        })
    }

    /// Load summaries from a JSON artifact.
    pub fn load(path: &Path, total_medicines: usize) -> ClusterResult<Self> {
        let summaries: Vec<ClusterSummary> = read_json(path)?;
        debug!(path = %path.display(), clusters = summaries.len(), "loaded cluster summaries");
        Self::new(summaries, total_medicines)
    }

    /// Write summaries as a JSON artifact.
    pub fn save(&self, path: &Path) -> ClusterResult<()> {
        let json = serde_json::to_string_pretty(&self.summaries)?;
        std::fs::write(path, json).map_err(|source| ClusterError::Write {
            path: path.to_path_buf(),
            source,
        })
    }

    /// First cluster (largest first) whose primary class matches `class`,
    /// compared case-insensitively.
    pub fn find_by_class(&self, class: &str) -> Option<&ClusterSummary> {
        self.by_class
            .get(&class.trim().to_lowercase())
            .map(|&pos| &self.summaries[pos])
    }

    /// Number of clusters.
    pub fn len(&self) -> usize {
        self.summaries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.summaries.is_empty()
    }

    /// All summaries, largest first.
    pub fn summaries(&self) -> &[ClusterSummary] {
        &self.summaries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(id: usize, size: usize, class: &str) -> ClusterSummary {
        ClusterSummary {
            cluster_id: id,
            size,
            primary_class: class.into(),
            n_classes: 1,
            sample_medicines: vec![],
        }
    }

    #[test]
    fn test_first_cluster_by_class_is_largest() {
        let index = ClusterIndex::new(
            vec![
                summary(0, 2, "RESPIRATORY"),
                summary(1, 5, "RESPIRATORY"),
                summary(2, 3, "PAIN ANALGESICS"),
            ],
            10,
        )
        .unwrap();

        assert_eq!(index.find_by_class("respiratory").unwrap().cluster_id, 1);
        assert_eq!(index.find_by_class("PAIN ANALGESICS").unwrap().size, 3);
        assert!(index.find_by_class("CARDIAC").is_none());
        assert_eq!(index.summaries()[0].cluster_id, 1);
    }

    #[test]
    fn test_size_mismatch_rejected() {
        let result = ClusterIndex::new(vec![summary(0, 2, "A"), summary(1, 2, "B")], 5);
        assert!(matches!(
            result,
            Err(ClusterError::SizeMismatch {
                clustered: 4,
                medicines: 5
            })
        ));
    }

    #[test]
    fn test_bad_ids_rejected() {
        assert!(matches!(
            ClusterIndex::new(vec![summary(0, 1, "A"), summary(0, 1, "B")], 2),
            Err(ClusterError::DuplicateId(0))
        ));
        assert!(matches!(
            ClusterIndex::new(vec![summary(3, 1, "A")], 1),
            Err(ClusterError::IdOutOfRange { id: 3, k: 1 })
        ));
    }

    #[test]
    fn test_empty_clusters_not_indexed() {
        let index =
            ClusterIndex::new(vec![summary(0, 0, "A"), summary(1, 2, "B")], 2).unwrap();
        assert!(index.find_by_class("A").is_none());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("clusters.json");
        let index = ClusterIndex::new(vec![summary(0, 2, "A"), summary(1, 1, "B")], 3).unwrap();
        index.save(&path).unwrap();

        let loaded = ClusterIndex::load(&path, 3).unwrap();
        assert_eq!(loaded.summaries(), index.summaries());
        assert!(matches!(
            ClusterIndex::load(&path, 4),
            Err(ClusterError::SizeMismatch { .. })
        ));
    }
}
