//! Pipeline orchestration.
//!
//! [`Pipeline`] owns the configuration, the read-only [`PipelineContext`],
//! the ranking strategy and the explanation backend. `recommend` and
//! `check_contraindications` take `&self`; per-call state never leaves the
//! call.

mod context;
mod status;

pub use context::*;
pub use status::*;

use std::path::Path;
use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::clusters::ClusterError;
use crate::config::{ConfigError, PipelineConfig};
use crate::explain::{ExplanationGenerator, TextGenerator};
use crate::export::{ExportError, RecommendationExport};
use crate::ml::{ModelBundle, ModelError};
use crate::models::{ContraindicationResult, PatientProfile, Recommendation, RecommendationSet};
use crate::ranking::{Fusion, MatchOutcome, RankingStrategy, SymptomMatcher, SymptomQuery};
use crate::safety::{ContraindicationChecker, RuleTable};
use crate::store::StoreError;

/// Errors surfaced by the pipeline.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Initialization failed: {0}")]
    Store(#[from] StoreError),

    #[error("Initialization failed: {0}")]
    Cluster(#[from] ClusterError),

    #[error("Model error: {0}")]
    Model(#[from] ModelError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Export error: {0}")]
    Export(#[from] ExportError),

    #[error("Pipeline is not initialized")]
    NotInitialized,

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

pub type PipelineResult<T> = Result<T, PipelineError>;

/// The recommendation pipeline.
#[derive(Debug)]
pub struct Pipeline {
    config: PipelineConfig,
    context: Option<PipelineContext>,
    strategy: RankingStrategy,
    checker: ContraindicationChecker,
    explainer: ExplanationGenerator,
}

impl Pipeline {
    /// Create an uninitialized pipeline.
    pub fn new(config: PipelineConfig) -> Self {
        let explainer = ExplanationGenerator::template_only()
            .timeout(config.explanation.timeout())
            .max_chars(config.explanation.max_chars);
        Self {
            config,
            context: None,
            strategy: RankingStrategy::MatchOnly,
            checker: ContraindicationChecker::default(),
            explainer,
        }
    }

    /// Create a pipeline around data that is already loaded.
    pub fn with_context(config: PipelineConfig, context: PipelineContext) -> Self {
        let mut pipeline = Self::new(config);
        pipeline.context = Some(context);
        pipeline
    }

    /// Use `backend` for generated explanations. Ignored when explanations
    /// are disabled in the configuration.
    pub fn with_generator(mut self, backend: Arc<dyn TextGenerator>) -> Self {
        if !self.config.explanation.enabled {
            debug!(backend = backend.name(), "explanations disabled, backend ignored");
            return self;
        }
        self.explainer = ExplanationGenerator::with_backend(backend)
            .timeout(self.config.explanation.timeout())
            .max_chars(self.config.explanation.max_chars);
        self
    }

    /// Replace the contraindication rules.
    pub fn with_rules(mut self, rules: RuleTable) -> Self {
        self.checker = ContraindicationChecker::new(rules);
        self
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn context(&self) -> Option<&PipelineContext> {
        self.context.as_ref()
    }

    pub fn is_initialized(&self) -> bool {
        self.context.is_some()
    }

    /// Load data, rules and (best-effort) models.
    ///
    /// Missing or malformed catalog, feature or cluster artifacts are fatal.
    /// Calling again after success does nothing.
    pub fn initialize(&mut self) -> PipelineResult<()> {
        if self.context.is_some() {
            debug!("pipeline already initialized");
            return Ok(());
        }

        let context = PipelineContext::load(&self.config.data)?;
        if let Some(path) = &self.config.safety.rules_path {
            self.checker = ContraindicationChecker::new(RuleTable::load(path)?);
            info!(path = %path.display(), "loaded contraindication rules");
        }
        self.context = Some(context);

        self.load_trained_models();
        info!(mode = self.strategy.mode().as_str(), "pipeline initialized");
        Ok(())
    }

    /// Try to load the model bundle from the configured directory.
    ///
    /// Returns whether models are now loaded. Missing or inconsistent
    /// artifacts leave the pipeline in match-only mode.
    pub fn load_trained_models(&mut self) -> bool {
        let dir = self.config.data.models_dir.clone();
        match ModelBundle::load(&dir) {
            Ok(bundle) => {
                if let Some(context) = &self.context {
                    let width = context.store().features().width();
                    if bundle.input_width() != width {
                        warn!(
                            expected = bundle.input_width(),
                            found = width,
                            "model input width does not match catalog features, using match-only ranking"
                        );
                        self.strategy = RankingStrategy::MatchOnly;
                        return false;
                    }
                }
                info!(
                    dir = %dir.display(),
                    fingerprint = bundle.fingerprint().unwrap_or("-"),
                    "trained models loaded"
                );
                self.strategy = RankingStrategy::FullFusion(bundle);
                true
            }
            Err(e) => {
                warn!(error = %e, "trained models unavailable, using match-only ranking");
                self.strategy = RankingStrategy::MatchOnly;
                false
            }
        }
    }

    /// Use an already assembled model bundle.
    pub fn install_models(&mut self, bundle: ModelBundle) {
        self.strategy = RankingStrategy::FullFusion(bundle);
    }

    /// Drop loaded models and rank by match score only.
    pub fn clear_models(&mut self) {
        self.strategy = RankingStrategy::MatchOnly;
    }

    pub fn get_pipeline_status(&self) -> PipelineStatus {
        let models = self.strategy.models();
        PipelineStatus {
            data_loaded: self.context.is_some(),
            total_medicines: self.context.as_ref().map_or(0, |c| c.store().len()),
            feature_width: self
                .context
                .as_ref()
                .map_or(0, |c| c.store().features().width()),
            total_clusters: self.context.as_ref().map_or(0, |c| c.clusters().len()),
            models_loaded: models.is_some(),
            model_fingerprint: models.and_then(|m| m.fingerprint()).map(str::to_string),
            gemini_available: self.explainer.is_available(),
            explanation_backend: self.explainer.backend_name().to_string(),
            mode: self.strategy.mode(),
        }
    }

    /// Recommend up to `top_k` medicines for `symptoms`.
    ///
    /// An empty list means nothing matched.
    pub fn recommend<S: AsRef<str>>(
        &self,
        symptoms: &[S],
        top_k: usize,
    ) -> PipelineResult<Vec<Recommendation>> {
        self.recommend_set(symptoms, top_k)
            .map(|set| set.recommendations)
    }

    /// Like [`Pipeline::recommend`] with the configured default `top_k`.
    pub fn recommend_default<S: AsRef<str>>(
        &self,
        symptoms: &[S],
    ) -> PipelineResult<Vec<Recommendation>> {
        self.recommend(symptoms, self.config.ranking.default_top_k)
    }

    /// Recommend and keep run metadata for export.
    pub fn recommend_set<S: AsRef<str>>(
        &self,
        symptoms: &[S],
        top_k: usize,
    ) -> PipelineResult<RecommendationSet> {
        if top_k == 0 {
            return Err(PipelineError::InvalidInput(
                "top_k must be at least 1".to_string(),
            ));
        }
        let context = self.context.as_ref().ok_or(PipelineError::NotInitialized)?;
        let store = context.store();

        let query = SymptomQuery::new(symptoms);
        let mut set = RecommendationSet::new(query.terms().to_vec(), self.strategy.mode());

        let matcher = SymptomMatcher::new(self.config.ranking.max_candidates);
        let (scores, outcome) = matcher.match_symptoms(store, &query);
        let candidates = match outcome {
            MatchOutcome::Candidates(candidates) => candidates,
            MatchOutcome::NoCandidates => {
                info!(symptoms = %query.display(), "no medicines matched");
                return Ok(set);
            }
        };
        set.candidate_count = candidates.len();

        let fusion = Fusion::new(store, context.clusters(), &self.strategy)
            .with_max_alternatives(self.config.ranking.max_alternatives);
        set.recommendations = fusion.rank(&query, &scores, &candidates, top_k)?;

        // Generated text only ever enriches the top result
        if let Some(top) = set.recommendations.first_mut() {
            if let Some(record) = store.record(top.catalog_row) {
                self.explainer.enrich(top, query.terms(), record);
            }
        }

        info!(
            symptoms = %query.display(),
            candidates = set.candidate_count,
            returned = set.recommendations.len(),
            mode = set.mode.as_str(),
            "recommendation complete"
        );
        Ok(set)
    }

    /// Check a patient's medicines against their allergies and conditions.
    pub fn check_contraindications(
        &self,
        profile: &PatientProfile,
    ) -> PipelineResult<ContraindicationResult> {
        let context = self.context.as_ref().ok_or(PipelineError::NotInitialized)?;
        let result = self.checker.check(context.store(), profile);
        info!(
            safe = result.safe,
            status = result.status.as_str(),
            warnings = result.warnings.len(),
            "contraindication check"
        );
        Ok(result)
    }

    /// Save a recommendation run as JSON (or CSV for a `.csv` path).
    pub fn save_recommendations(&self, set: &RecommendationSet, path: &Path) -> PipelineResult<()> {
        let fingerprint = self.strategy.models().and_then(|m| m.fingerprint());
        RecommendationExport::from_set(set, fingerprint).save(path)?;
        Ok(())
    }
}
