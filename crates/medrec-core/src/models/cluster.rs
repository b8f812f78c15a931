//! Cluster summary models.

use serde::{Deserialize, Serialize};

/// Label used for clusters with no members.
pub const UNKNOWN_CLASS: &str = "Unknown";

/// Summary of one offline-computed cluster of medicines.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClusterSummary {
    /// Cluster ID in `0..K`
    pub cluster_id: usize,
    /// Number of member medicines
    pub size: usize,
    /// Most common therapeutic class among members
    pub primary_class: String,
    /// Number of distinct therapeutic classes among members
    pub n_classes: usize,
    /// A few member names, in catalog order
    #[serde(default, alias = "top_medicines")]
    pub sample_medicines: Vec<String>,
}

impl ClusterSummary {
    /// Class purity in `[0, 1]`: 1.0 when every member shares one class,
    /// approaching 0 as the number of classes approaches the size.
    pub fn purity(&self) -> f64 {
        if self.size == 0 {
            return 0.0;
        }
        1.0 - (self.n_classes.saturating_sub(1) as f64 / self.size as f64)
    }
}

/// Cluster context attached to a recommendation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClusterContext {
    pub cluster_id: usize,
    pub size: usize,
    pub n_classes: usize,
    pub purity: f64,
}

impl From<&ClusterSummary> for ClusterContext {
    fn from(summary: &ClusterSummary) -> Self {
        Self {
            cluster_id: summary.cluster_id,
            size: summary.size,
            n_classes: summary.n_classes,
            purity: summary.purity(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(size: usize, n_classes: usize) -> ClusterSummary {
        ClusterSummary {
            cluster_id: 0,
            size,
            primary_class: "RESPIRATORY".into(),
            n_classes,
            sample_medicines: vec![],
        }
    }

    #[test]
    fn test_purity() {
        assert_eq!(summary(10, 1).purity(), 1.0);
        assert!((summary(10, 6).purity() - 0.5).abs() < 1e-9);
        assert_eq!(summary(0, 0).purity(), 0.0);
    }

    #[test]
    fn test_top_medicines_alias() {
        let json = r#"{"cluster_id":3,"size":2,"primary_class":"GASTRO INTESTINAL","n_classes":1,"top_medicines":["Pan 40","Omez"]}"#;
        let summary: ClusterSummary = serde_json::from_str(json).unwrap();
        assert_eq!(summary.sample_medicines, vec!["Pan 40", "Omez"]);
    }
}
