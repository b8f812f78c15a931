//! Recommendation models produced per query.

use serde::{Deserialize, Serialize};

use super::cluster::ClusterContext;

/// Which ranking strategy produced a result.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RankingMode {
    /// Matcher, transforms, classifier and cluster enrichment
    FullFusion,
    /// Lexical match score only (model artifacts unavailable)
    MatchOnly,
}

impl RankingMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            RankingMode::FullFusion => "full_fusion",
            RankingMode::MatchOnly => "match_only",
        }
    }
}

/// One ranked medicine recommendation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Recommendation {
    /// 1-based rank
    pub rank: usize,
    pub medicine_name: String,
    /// Classifier confidence; absent in match-only mode
    pub confidence: Option<f64>,
    /// Predicted class (full fusion) or catalog class (match-only)
    pub therapeutic_class: String,
    pub manufacturer: String,
    pub explanation: String,
    pub side_effects: Vec<String>,
    /// Same-class medicines, best first
    pub alternatives: Vec<String>,
    /// Number of query terms found in the usage text
    pub match_score: usize,
    /// Row index in the catalog
    pub catalog_row: usize,
    /// Cluster context for the recommended class, when known
    pub cluster: Option<ClusterContext>,
}

/// Output of one `recommend` call, as persisted by the export layer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecommendationSet {
    /// Unique run ID
    pub run_id: String,
    /// Generation timestamp (RFC 3339)
    pub generated_at: String,
    /// Normalized symptom terms used for matching
    pub symptoms: Vec<String>,
    pub mode: RankingMode,
    /// Number of candidates produced by the matcher
    pub candidate_count: usize,
    pub recommendations: Vec<Recommendation>,
}

impl RecommendationSet {
    /// Create an empty set for a query.
    pub fn new(symptoms: Vec<String>, mode: RankingMode) -> Self {
        Self {
            run_id: uuid::Uuid::new_v4().to_string(),
            generated_at: chrono::Utc::now().to_rfc3339(),
            symptoms,
            mode,
            candidate_count: 0,
            recommendations: Vec::new(),
        }
    }

    /// True when the matcher found nothing for the query.
    pub fn is_empty(&self) -> bool {
        self.recommendations.is_empty()
    }
}
