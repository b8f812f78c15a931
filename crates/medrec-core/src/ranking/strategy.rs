//! Ranking strategy selected from model availability.

use ndarray::ArrayView1;

use crate::ml::{ModelBundle, ModelResult, Prediction};
use crate::models::RankingMode;
use crate::store::CatalogStore;

/// How candidates are scored.
#[derive(Debug, Default)]
pub enum RankingStrategy {
    /// Transforms + classifier confidence, cluster context, ML-ranked alternatives
    FullFusion(ModelBundle),
    /// Match score only
    #[default]
    MatchOnly,
}

impl RankingStrategy {
    pub fn mode(&self) -> RankingMode {
        match self {
            RankingStrategy::FullFusion(_) => RankingMode::FullFusion,
            RankingStrategy::MatchOnly => RankingMode::MatchOnly,
        }
    }

    /// Loaded model bundle, if any.
    pub fn models(&self) -> Option<&ModelBundle> {
        match self {
            RankingStrategy::FullFusion(bundle) => Some(bundle),
            RankingStrategy::MatchOnly => None,
        }
    }

    /// Classify catalog row `row`. `Ok(None)` in match-only mode.
    pub fn predict(&self, store: &CatalogStore, row: usize) -> ModelResult<Option<Prediction>> {
        match self {
            RankingStrategy::FullFusion(bundle) => {
                let empty: &[f64] = &[];
                let raw = store
                    .feature_row(row)
                    .unwrap_or_else(|| ArrayView1::from(empty));
                bundle.predict(raw).map(Some)
            }
            RankingStrategy::MatchOnly => Ok(None),
        }
    }
}
