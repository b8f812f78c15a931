//! Loading and fingerprinting the model artifact bundle.

use std::fs;
use std::path::Path;

use ndarray::ArrayView1;
use serde::de::DeserializeOwned;
use sha2::{Digest, Sha256};
use tracing::{debug, info};

use super::{
    Classifier, ClassifierArtifact, FeatureTransformer, LabelMapping, ModelError, ModelResult,
    PcaReducer, Prediction, ReducerArtifact, ScalerArtifact, StandardScaler,
};

/// Reducer artifact file name.
pub const REDUCER_FILE: &str = "reducer.json";
/// Scaler artifact file name.
pub const SCALER_FILE: &str = "scaler.json";
/// Classifier artifact file name.
pub const CLASSIFIER_FILE: &str = "classifier.json";
/// Label mapping artifact file name.
pub const LABELS_FILE: &str = "labels.json";

const ARTIFACT_FILES: [&str; 4] = [REDUCER_FILE, SCALER_FILE, CLASSIFIER_FILE, LABELS_FILE];

/// Everything needed to turn a raw feature vector into a prediction.
#[derive(Debug)]
pub struct ModelBundle {
    transformer: FeatureTransformer,
    classifier: Classifier,
    fingerprint: Option<String>,
}

impl ModelBundle {
    /// Assemble a bundle, checking that transform output feeds the classifier.
    pub fn new(transformer: FeatureTransformer, classifier: Classifier) -> ModelResult<Self> {
        if transformer.output_width() != classifier.n_features() {
            return Err(ModelError::InvalidArtifact(format!(
                "transforms produce width {} but classifier expects {}",
                transformer.output_width(),
                classifier.n_features()
            )));
        }
        Ok(Self {
            transformer,
            classifier,
            fingerprint: None,
        })
    }

    /// Load `reducer.json`, `scaler.json`, `classifier.json` and `labels.json`
    /// from a directory.
    pub fn load(dir: &Path) -> ModelResult<Self> {
        for name in ARTIFACT_FILES {
            let path = dir.join(name);
            if !path.is_file() {
                return Err(ModelError::Missing { path });
            }
        }

        let reducer: ReducerArtifact = read_artifact(&dir.join(REDUCER_FILE))?;
        let scaler: ScalerArtifact = read_artifact(&dir.join(SCALER_FILE))?;
        let artifact: ClassifierArtifact = read_artifact(&dir.join(CLASSIFIER_FILE))?;
        let labels: LabelMapping = read_artifact(&dir.join(LABELS_FILE))?;

        let transformer = FeatureTransformer::new(
            PcaReducer::from_artifact(reducer)?,
            StandardScaler::from_artifact(scaler)?,
        )?;
        let classifier = Classifier::new(artifact.into_model()?, labels);
        let mut bundle = Self::new(transformer, classifier)?;
        bundle.fingerprint = Some(fingerprint_dir(dir)?);

        info!(
            dir = %dir.display(),
            input_width = bundle.input_width(),
            classes = bundle.classifier.labels().len(),
            "loaded model bundle"
        );
        Ok(bundle)
    }

    /// Width of raw feature vectors the bundle accepts.
    pub fn input_width(&self) -> usize {
        self.transformer.input_width()
    }

    /// SHA-256 over the artifact files, when loaded from disk.
    pub fn fingerprint(&self) -> Option<&str> {
        self.fingerprint.as_deref()
    }

    pub fn classifier(&self) -> &Classifier {
        &self.classifier
    }

    /// Transform a raw feature vector and classify it.
    pub fn predict(&self, raw: ArrayView1<'_, f64>) -> ModelResult<Prediction> {
        let transformed = self.transformer.transform(raw)?;
        self.classifier.predict(transformed.view())
    }
}

fn read_artifact<T: DeserializeOwned>(path: &Path) -> ModelResult<T> {
    let content = fs::read_to_string(path).map_err(|source| ModelError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| ModelError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Hash artifact files in a fixed order: name, NUL, length, bytes.
pub fn fingerprint_dir(dir: &Path) -> ModelResult<String> {
    let mut hasher = Sha256::new();
    for name in ARTIFACT_FILES {
        let path = dir.join(name);
        let bytes = fs::read(&path).map_err(|source| ModelError::Io {
            path: path.clone(),
            source,
        })?;
        hasher.update(name.as_bytes());
        hasher.update([0u8]);
        hasher.update((bytes.len() as u64).to_le_bytes());
        hasher.update(&bytes);
    }
    let digest = hex::encode(hasher.finalize());
    debug!(dir = %dir.display(), %digest, "fingerprinted model artifacts");
    Ok(digest)
}
