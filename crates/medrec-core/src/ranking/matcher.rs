//! Lexical symptom matching against indexed usage text.

use crate::store::CatalogStore;

/// Default number of candidates kept after matching.
pub const DEFAULT_MAX_CANDIDATES: usize = 20;

/// Normalized symptom terms for one query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymptomQuery {
    terms: Vec<String>,
}

impl SymptomQuery {
    /// Trim and lower-case each term, drop blanks and collapse duplicates
    /// (first occurrence wins).
    pub fn new<S: AsRef<str>>(symptoms: &[S]) -> Self {
        let mut terms: Vec<String> = Vec::with_capacity(symptoms.len());
        for symptom in symptoms {
            let term = symptom.as_ref().trim().to_lowercase();
            if !term.is_empty() && !terms.contains(&term) {
                terms.push(term);
            }
        }
        Self { terms }
    }

    /// Split a comma-separated line such as `"fever, cough,cold"`.
    pub fn parse(line: &str) -> Self {
        let parts: Vec<&str> = line.split(',').collect();
        Self::new(&parts)
    }

    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Number of terms that occur in `usage_text` (already lower-cased).
    pub fn score(&self, usage_text: &str) -> usize {
        self.terms
            .iter()
            .filter(|t| usage_text.contains(t.as_str()))
            .count()
    }

    /// Terms that occur in `usage_text`, in query order.
    pub fn matched_terms<'a>(&'a self, usage_text: &str) -> Vec<&'a str> {
        self.terms
            .iter()
            .filter(|t| usage_text.contains(t.as_str()))
            .map(String::as_str)
            .collect()
    }

    /// Terms joined for display.
    pub fn display(&self) -> String {
        self.terms.join(", ")
    }
}

/// A medicine that matched at least one term.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Candidate {
    pub row: usize,
    pub match_score: usize,
}

/// Per-row match scores for one query. Owned by the call, never stored in
/// the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchScores(Vec<usize>);

impl MatchScores {
    pub fn get(&self, row: usize) -> usize {
        self.0.get(row).copied().unwrap_or(0)
    }

    pub fn as_slice(&self) -> &[usize] {
        &self.0
    }
}

/// Result of matching a query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchOutcome {
    /// Best matches, score descending, catalog order within equal scores
    Candidates(Vec<Candidate>),
    /// Nothing matched (or the query was empty)
    NoCandidates,
}

impl MatchOutcome {
    pub fn candidates(&self) -> &[Candidate] {
        match self {
            MatchOutcome::Candidates(c) => c,
            MatchOutcome::NoCandidates => &[],
        }
    }
}

/// Scores medicines by symptom term overlap.
#[derive(Debug, Clone)]
pub struct SymptomMatcher {
    max_candidates: usize,
}

impl Default for SymptomMatcher {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_CANDIDATES)
    }
}

impl SymptomMatcher {
    pub fn new(max_candidates: usize) -> Self {
        Self { max_candidates }
    }

    /// Score every medicine in the catalog.
    pub fn score_catalog(&self, store: &CatalogStore, query: &SymptomQuery) -> MatchScores {
        MatchScores(
            (0..store.len())
                .map(|row| query.score(store.usage_text(row)))
                .collect(),
        )
    }

    /// Keep the best `max_candidates` rows with a positive score.
    pub fn select(&self, scores: &MatchScores) -> MatchOutcome {
        let mut candidates: Vec<Candidate> = scores
            .as_slice()
            .iter()
            .enumerate()
            .filter(|(_, &score)| score > 0)
            .map(|(row, &match_score)| Candidate { row, match_score })
            .collect();

        if candidates.is_empty() {
            return MatchOutcome::NoCandidates;
        }

        // Stable sort keeps catalog order within equal scores
        candidates.sort_by(|a, b| b.match_score.cmp(&a.match_score));
        candidates.truncate(self.max_candidates);
        MatchOutcome::Candidates(candidates)
    }

    /// Score and select in one step.
    pub fn match_symptoms(
        &self,
        store: &CatalogStore,
        query: &SymptomQuery,
    ) -> (MatchScores, MatchOutcome) {
        let scores = self.score_catalog(store, query);
        let outcome = self.select(&scores);
        (scores, outcome)
    }
}
