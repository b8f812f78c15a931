//! Fuses match scores, classifier output and cluster context into ranked
//! recommendations.

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use tracing::debug;

use crate::clusters::ClusterIndex;
use crate::explain::template_explanation;
use crate::ml::{ModelResult, Prediction};
use crate::models::{ClusterContext, Recommendation};
use crate::store::CatalogStore;

use super::{Candidate, MatchScores, RankingStrategy, SymptomQuery};

/// Number of alternatives to include per recommendation.
pub const DEFAULT_MAX_ALTERNATIVES: usize = 3;

/// A candidate with its ranking signals.
#[derive(Debug, Clone)]
struct Scored {
    row: usize,
    match_score: usize,
    prediction: Option<Prediction>,
}

impl Scored {
    fn confidence(&self) -> Option<f64> {
        self.prediction.as_ref().map(|p| p.confidence)
    }
}

/// Confidence descending, then match score descending, then catalog row
/// ascending. Without a classifier every confidence is absent and the match
/// score decides.
fn compare(a: &Scored, b: &Scored) -> Ordering {
    b.confidence()
        .partial_cmp(&a.confidence())
        .unwrap_or(Ordering::Equal)
        .then(b.match_score.cmp(&a.match_score))
        .then(a.row.cmp(&b.row))
}

/// Ranks candidates for one query.
pub struct Fusion<'a> {
    store: &'a CatalogStore,
    clusters: &'a ClusterIndex,
    strategy: &'a RankingStrategy,
    max_alternatives: usize,
}

impl<'a> Fusion<'a> {
    pub fn new(
        store: &'a CatalogStore,
        clusters: &'a ClusterIndex,
        strategy: &'a RankingStrategy,
    ) -> Self {
        Self {
            store,
            clusters,
            strategy,
            max_alternatives: DEFAULT_MAX_ALTERNATIVES,
        }
    }

    pub fn with_max_alternatives(mut self, max_alternatives: usize) -> Self {
        self.max_alternatives = max_alternatives;
        self
    }

    /// Rank `candidates` and build the top `top_k` recommendations.
    ///
    /// Classifier failures (dimension mismatch, unknown class id) abort the
    /// whole call.
    pub fn rank(
        &self,
        query: &SymptomQuery,
        scores: &MatchScores,
        candidates: &[Candidate],
        top_k: usize,
    ) -> ModelResult<Vec<Recommendation>> {
        let mut predictions: HashMap<usize, Option<Prediction>> = HashMap::new();

        let mut scored = candidates
            .iter()
            .map(|c| self.score(c.row, c.match_score, &mut predictions))
            .collect::<ModelResult<Vec<_>>>()?;
        scored.sort_by(compare);
        scored.truncate(top_k);

        debug!(
            candidates = candidates.len(),
            kept = scored.len(),
            mode = self.strategy.mode().as_str(),
            "ranked candidates"
        );

        scored
            .iter()
            .enumerate()
            .map(|(i, s)| self.build(i + 1, s, query, scores, &mut predictions))
            .collect()
    }

    fn score(
        &self,
        row: usize,
        match_score: usize,
        predictions: &mut HashMap<usize, Option<Prediction>>,
    ) -> ModelResult<Scored> {
        let prediction = match predictions.get(&row) {
            Some(cached) => cached.clone(),
            None => {
                let p = self.strategy.predict(self.store, row)?;
                predictions.insert(row, p.clone());
                p
            }
        };
        Ok(Scored {
            row,
            match_score,
            prediction,
        })
    }

    fn build(
        &self,
        rank: usize,
        scored: &Scored,
        query: &SymptomQuery,
        scores: &MatchScores,
        predictions: &mut HashMap<usize, Option<Prediction>>,
    ) -> ModelResult<Recommendation> {
        let record = &self.store.records()[scored.row];

        let class = scored
            .prediction
            .as_ref()
            .map(|p| p.class_name.clone())
            .unwrap_or_else(|| record.therapeutic_class.clone());

        let cluster = match self.strategy.models() {
            Some(_) => self
                .clusters
                .find_by_class(&class)
                .or_else(|| self.clusters.find_by_class(&record.therapeutic_class))
                .map(ClusterContext::from),
            None => None,
        };

        let alternatives = self.alternatives(scored.row, scores, predictions)?;
        let matched = query.matched_terms(self.store.usage_text(scored.row));
        let explanation = template_explanation(
            &record.name,
            &class,
            &matched,
            query.terms().len(),
            scored.confidence(),
            cluster.as_ref(),
        );

        Ok(Recommendation {
            rank,
            medicine_name: record.name.clone(),
            confidence: scored.confidence(),
            therapeutic_class: class,
            manufacturer: record.manufacturer_or_unknown().to_string(),
            explanation,
            side_effects: record.side_effects.clone(),
            alternatives,
            match_score: scored.match_score,
            catalog_row: scored.row,
            cluster,
        })
    }

    /// Other medicines in the same catalog class, ranked by the same
    /// criterion as the main list, one entry per distinct name.
    fn alternatives(
        &self,
        row: usize,
        scores: &MatchScores,
        predictions: &mut HashMap<usize, Option<Prediction>>,
    ) -> ModelResult<Vec<String>> {
        if self.max_alternatives == 0 {
            return Ok(Vec::new());
        }

        let record = &self.store.records()[row];
        let own_name = record.name.trim().to_lowercase();

        let mut peers = self
            .store
            .rows_in_class(&record.therapeutic_class)
            .iter()
            .copied()
            .filter(|&r| r != row)
            .filter(|&r| self.store.records()[r].name.trim().to_lowercase() != own_name)
            .map(|r| self.score(r, scores.get(r), predictions))
            .collect::<ModelResult<Vec<_>>>()?;
        peers.sort_by(compare);

        let mut seen = HashSet::new();
        Ok(peers
            .into_iter()
            .map(|s| self.store.records()[s.row].name.clone())
            .filter(|name| seen.insert(name.trim().to_lowercase()))
            .take(self.max_alternatives)
            .collect())
    }
}
