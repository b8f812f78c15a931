//! Therapeutic class classifier.
//!
//! A fitted model produces class probabilities; the predicted class is the
//! argmax, decoded through the label mapping. Confidence is the maximum
//! probability.

use std::fmt::Debug;

use ndarray::{Array1, Array2, ArrayView1};
use serde::{Deserialize, Serialize};

use super::{matrix_from_rows, LabelMapping, ModelError, ModelResult};

/// A fitted model that produces a probability per internal class id.
pub trait ProbabilisticClassifier: Debug + Send + Sync {
    /// Width of accepted (transformed) vectors.
    fn n_features(&self) -> usize;

    /// Number of internal classes.
    fn n_classes(&self) -> usize;

    /// Class probabilities for one vector; sums to 1.
    fn predict_proba(&self, x: ArrayView1<'_, f64>) -> ModelResult<Array1<f64>>;
}

/// Multinomial linear model: `softmax(W·x + b)`.
#[derive(Debug, Clone, PartialEq)]
pub struct SoftmaxClassifier {
    /// One weight row per class
    weights: Array2<f64>,
    /// One intercept per class
    intercepts: Array1<f64>,
}

impl SoftmaxClassifier {
    pub fn new(weights: Array2<f64>, intercepts: Array1<f64>) -> ModelResult<Self> {
        if weights.nrows() == 0 {
            return Err(ModelError::InvalidArtifact("classifier has no classes".into()));
        }
        if weights.nrows() != intercepts.len() {
            return Err(ModelError::InvalidArtifact(format!(
                "classifier has {} weight rows but {} intercepts",
                weights.nrows(),
                intercepts.len()
            )));
        }
        Ok(Self {
            weights,
            intercepts,
        })
    }
}

impl ProbabilisticClassifier for SoftmaxClassifier {
    fn n_features(&self) -> usize {
        self.weights.ncols()
    }

    fn n_classes(&self) -> usize {
        self.weights.nrows()
    }

    fn predict_proba(&self, x: ArrayView1<'_, f64>) -> ModelResult<Array1<f64>> {
        if x.len() != self.n_features() {
            return Err(ModelError::DimensionMismatch {
                stage: "classifier",
                expected: self.n_features(),
                found: x.len(),
            });
        }

        let logits = self.weights.dot(&x) + &self.intercepts;

        // Shift by max for numerical stability
        let max = logits.fold(f64::NEG_INFINITY, |m, &l| m.max(l));
        let exps = logits.mapv(|l| (l - max).exp());
        let total = exps.sum();
        Ok(exps / total)
    }
}

/// On-disk form of a softmax model.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SoftmaxArtifact {
    pub weights: Vec<Vec<f64>>,
    pub intercepts: Vec<f64>,
}

/// Serialized classifier artifact.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ClassifierArtifact {
    Softmax(SoftmaxArtifact),
}

impl ClassifierArtifact {
    /// Validate and turn into a usable model.
    pub fn into_model(self) -> ModelResult<Box<dyn ProbabilisticClassifier>> {
        match self {
            ClassifierArtifact::Softmax(artifact) => {
                let weights = matrix_from_rows(&artifact.weights, "classifier weight")?;
                let model = SoftmaxClassifier::new(weights, Array1::from(artifact.intercepts))?;
                Ok(Box::new(model))
            }
        }
    }
}

/// Decoded classifier output for one medicine.
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    pub class_id: usize,
    pub class_name: String,
    /// Maximum class probability
    pub confidence: f64,
}

/// A fitted model together with its label mapping.
#[derive(Debug)]
pub struct Classifier {
    model: Box<dyn ProbabilisticClassifier>,
    labels: LabelMapping,
}

impl Classifier {
    pub fn new(model: Box<dyn ProbabilisticClassifier>, labels: LabelMapping) -> Self {
        Self { model, labels }
    }

    pub fn n_features(&self) -> usize {
        self.model.n_features()
    }

    pub fn labels(&self) -> &LabelMapping {
        &self.labels
    }

    /// Predict the class of a transformed vector.
    ///
    /// Fails with `UnknownClassId` when the model predicts an id the label
    /// mapping does not know.
    pub fn predict(&self, x: ArrayView1<'_, f64>) -> ModelResult<Prediction> {
        let probabilities = self.model.predict_proba(x)?;

        // Argmax, ties go to the lowest id
        let (class_id, confidence) = probabilities.indexed_iter().fold(
            (0usize, f64::NEG_INFINITY),
            |best, (id, &p)| if p > best.1 { (id, p) } else { best },
        );
        if !confidence.is_finite() {
            return Err(ModelError::InvalidArtifact(
                "classifier produced no finite probability".into(),
            ));
        }

        let class_name = self.labels.decode(class_id)?.to_string();
        Ok(Prediction {
            class_id,
            class_name,
            confidence: confidence.clamp(0.0, 1.0),
        })
    }
}
