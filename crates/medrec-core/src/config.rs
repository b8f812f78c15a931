//! Pipeline configuration with layered resolution.
//!
//! Resolution order (highest priority first):
//! 1. Environment variables (`MEDREC_*`)
//! 2. Config file (`medrec.toml`)
//! 3. Compiled defaults

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ranking::{DEFAULT_MAX_ALTERNATIVES, DEFAULT_MAX_CANDIDATES};

/// Default config file name.
pub const CONFIG_FILE: &str = "medrec.toml";

/// Configuration errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Config file not found: {path}")]
    FileNotFound { path: String },

    #[error("Failed to parse {path}: {message}")]
    ParseError { path: String, message: String },

    #[error("Invalid value for {field}: {message}")]
    ValidationFailed { field: String, message: String },
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Artifact locations.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DataConfig {
    /// Catalog records (JSON array)
    pub catalog_path: PathBuf,
    /// Feature rows aligned with the catalog (JSON array of arrays)
    pub features_path: PathBuf,
    /// Cluster summaries (JSON array)
    pub clusters_path: PathBuf,
    /// Directory holding the model artifact bundle
    pub models_dir: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            catalog_path: PathBuf::from("data/catalog.json"),
            features_path: PathBuf::from("data/features.json"),
            clusters_path: PathBuf::from("data/clusters.json"),
            models_dir: PathBuf::from("models"),
        }
    }
}

/// Ranking limits.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RankingConfig {
    pub max_candidates: usize,
    pub max_alternatives: usize,
    pub default_top_k: usize,
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            max_candidates: DEFAULT_MAX_CANDIDATES,
            max_alternatives: DEFAULT_MAX_ALTERNATIVES,
            default_top_k: 3,
        }
    }
}

/// Generated explanation settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ExplanationConfig {
    /// Allow a text generation backend to be used
    pub enabled: bool,
    pub timeout_ms: u64,
    pub max_chars: usize,
}

impl Default for ExplanationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            timeout_ms: 8_000,
            max_chars: 300,
        }
    }
}

impl ExplanationConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// Contraindication rule source.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct SafetyConfig {
    /// TOML rule table; built-in rules when unset
    pub rules_path: Option<PathBuf>,
}

/// Top-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct PipelineConfig {
    pub data: DataConfig,
    pub ranking: RankingConfig,
    pub explanation: ExplanationConfig,
    pub safety: SafetyConfig,
}

impl PipelineConfig {
    /// Resolve configuration: defaults, then `path` if it exists, then
    /// environment overrides, then validation.
    pub fn load(path: Option<&Path>) -> ConfigResult<Self> {
        let mut config = match path {
            Some(p) => Self::from_file(p)?,
            None => {
                let default_path = Path::new(CONFIG_FILE);
                if default_path.exists() {
                    Self::from_file(default_path)?
                } else {
                    Self::default()
                }
            }
        };

        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Read a TOML file. Missing keys take their defaults.
    pub fn from_file(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
            path: path.display().to_string(),
        })?;
        toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }

    /// Load configuration from a TOML string (for testing).
    pub fn from_toml(toml_str: &str) -> ConfigResult<Self> {
        toml::from_str(toml_str).map_err(|e| ConfigError::ParseError {
            path: "<string>".to_string(),
            message: e.to_string(),
        })
    }

    /// Apply environment variable overrides.
    /// Pattern: `MEDREC_DATA_CATALOG_PATH`, `MEDREC_RANKING_MAX_CANDIDATES`, etc.
    /// Unparseable values are ignored.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(val) = var("MEDREC_DATA_CATALOG_PATH") {
            self.data.catalog_path = PathBuf::from(val);
        }
        if let Some(val) = var("MEDREC_DATA_FEATURES_PATH") {
            self.data.features_path = PathBuf::from(val);
        }
        if let Some(val) = var("MEDREC_DATA_CLUSTERS_PATH") {
            self.data.clusters_path = PathBuf::from(val);
        }
        if let Some(val) = var("MEDREC_DATA_MODELS_DIR") {
            self.data.models_dir = PathBuf::from(val);
        }
        if let Some(v) = var("MEDREC_RANKING_MAX_CANDIDATES").and_then(|s| s.parse().ok()) {
            self.ranking.max_candidates = v;
        }
        if let Some(v) = var("MEDREC_RANKING_MAX_ALTERNATIVES").and_then(|s| s.parse().ok()) {
            self.ranking.max_alternatives = v;
        }
        if let Some(v) = var("MEDREC_RANKING_DEFAULT_TOP_K").and_then(|s| s.parse().ok()) {
            self.ranking.default_top_k = v;
        }
        if let Some(v) = var("MEDREC_EXPLANATION_ENABLED").and_then(|s| s.parse().ok()) {
            self.explanation.enabled = v;
        }
        if let Some(v) = var("MEDREC_EXPLANATION_TIMEOUT_MS").and_then(|s| s.parse().ok()) {
            self.explanation.timeout_ms = v;
        }
        if let Some(v) = var("MEDREC_EXPLANATION_MAX_CHARS").and_then(|s| s.parse().ok()) {
            self.explanation.max_chars = v;
        }
        if let Some(val) = var("MEDREC_SAFETY_RULES_PATH") {
            self.safety.rules_path = Some(PathBuf::from(val));
        }
    }

    /// Validate the configuration values.
    pub fn validate(&self) -> ConfigResult<()> {
        let positive = [
            ("ranking.max_candidates", self.ranking.max_candidates),
            ("ranking.default_top_k", self.ranking.default_top_k),
            ("explanation.max_chars", self.explanation.max_chars),
        ];
        for (field, value) in positive {
            if value == 0 {
                return Err(ConfigError::ValidationFailed {
                    field: field.to_string(),
                    message: "must be greater than 0".to_string(),
                });
            }
        }
        if self.explanation.timeout_ms == 0 {
            return Err(ConfigError::ValidationFailed {
                field: "explanation.timeout_ms".to_string(),
                message: "must be greater than 0".to_string(),
            });
        }
        Ok(())
    }
}
