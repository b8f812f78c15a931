//! Fitted feature transforms: dimensionality reduction, then standardization.

use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis};
use serde::{Deserialize, Serialize};

use super::{ModelError, ModelResult};

/// On-disk form of a fitted PCA projection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReducerArtifact {
    /// Per-feature mean of the training data
    pub mean: Vec<f64>,
    /// Principal axes, one row per output component
    pub components: Vec<Vec<f64>>,
}

/// On-disk form of a fitted standardizer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScalerArtifact {
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
}

/// Stack equal-width rows into a matrix.
pub(crate) fn matrix_from_rows(rows: &[Vec<f64>], what: &str) -> ModelResult<Array2<f64>> {
    let width = rows.first().map(Vec::len).unwrap_or(0);
    if let Some(bad) = rows.iter().position(|r| r.len() != width) {
        return Err(ModelError::InvalidArtifact(format!(
            "{} row {} has width {}, expected {}",
            what,
            bad,
            rows[bad].len(),
            width
        )));
    }
    Ok(Array2::from_shape_fn((rows.len(), width), |(i, j)| rows[i][j]))
}

/// A fitted PCA projection.
///
/// `transform(x) = components · (x - mean)`
#[derive(Debug, Clone, PartialEq)]
pub struct PcaReducer {
    mean: Array1<f64>,
    components: Array2<f64>,
}

impl PcaReducer {
    pub fn new(mean: Array1<f64>, components: Array2<f64>) -> ModelResult<Self> {
        if components.nrows() == 0 {
            return Err(ModelError::InvalidArtifact(
                "reducer has no components".into(),
            ));
        }
        if components.ncols() != mean.len() {
            return Err(ModelError::InvalidArtifact(format!(
                "reducer components have width {}, expected {}",
                components.ncols(),
                mean.len()
            )));
        }
        Ok(Self { mean, components })
    }

    pub fn from_artifact(artifact: ReducerArtifact) -> ModelResult<Self> {
        let components = matrix_from_rows(&artifact.components, "reducer component")?;
        Self::new(Array1::from(artifact.mean), components)
    }

    /// Width of vectors this reducer accepts.
    pub fn n_features_in(&self) -> usize {
        self.mean.len()
    }

    /// Width of vectors this reducer produces.
    pub fn n_components(&self) -> usize {
        self.components.nrows()
    }

    /// Project one vector.
    pub fn transform(&self, x: ArrayView1<'_, f64>) -> ModelResult<Array1<f64>> {
        if x.len() != self.n_features_in() {
            return Err(ModelError::DimensionMismatch {
                stage: "reducer",
                expected: self.n_features_in(),
                found: x.len(),
            });
        }
        let centered = &x - &self.mean;
        Ok(self.components.dot(&centered))
    }
}

/// A fitted standardizer: `(x - mean) / scale`. Zero scales act as 1.
#[derive(Debug, Clone, PartialEq)]
pub struct StandardScaler {
    mean: Array1<f64>,
    scale: Array1<f64>,
}

impl StandardScaler {
    pub fn new(mean: Array1<f64>, scale: Array1<f64>) -> ModelResult<Self> {
        if mean.len() != scale.len() {
            return Err(ModelError::InvalidArtifact(format!(
                "scaler mean has width {} but scale has width {}",
                mean.len(),
                scale.len()
            )));
        }
        let scale = scale.mapv(|s| if s == 0.0 { 1.0 } else { s });
        Ok(Self { mean, scale })
    }

    pub fn from_artifact(artifact: ScalerArtifact) -> ModelResult<Self> {
        Self::new(Array1::from(artifact.mean), Array1::from(artifact.scale))
    }

    /// Fit on rows using population standard deviation. Constant columns
    /// get a scale of 1.0.
    pub fn fit(rows: ArrayView2<'_, f64>) -> ModelResult<Self> {
        let mean = rows.mean_axis(Axis(0)).ok_or_else(|| {
            ModelError::InvalidArtifact("cannot fit scaler on zero rows".into())
        })?;
        let scale = rows
            .std_axis(Axis(0), 0.0)
            .mapv(|sd| if sd > f64::EPSILON { sd } else { 1.0 });
        Self::new(mean, scale)
    }

    /// Width of vectors this scaler accepts.
    pub fn width(&self) -> usize {
        self.mean.len()
    }

    pub fn mean(&self) -> ArrayView1<'_, f64> {
        self.mean.view()
    }

    pub fn scale(&self) -> ArrayView1<'_, f64> {
        self.scale.view()
    }

    /// Standardize one vector.
    pub fn transform(&self, x: ArrayView1<'_, f64>) -> ModelResult<Array1<f64>> {
        if x.len() != self.width() {
            return Err(ModelError::DimensionMismatch {
                stage: "scaler",
                expected: self.width(),
                found: x.len(),
            });
        }
        Ok((&x - &self.mean) / &self.scale)
    }

    /// Standardize every row of a matrix.
    pub fn transform_rows(&self, rows: ArrayView2<'_, f64>) -> ModelResult<Array2<f64>> {
        if rows.ncols() != self.width() {
            return Err(ModelError::DimensionMismatch {
                stage: "scaler",
                expected: self.width(),
                found: rows.ncols(),
            });
        }
        Ok((&rows - &self.mean) / &self.scale)
    }
}

/// Reducer followed by scaler, in that fixed order.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureTransformer {
    reducer: PcaReducer,
    scaler: StandardScaler,
}

impl FeatureTransformer {
    /// Combine a reducer and scaler, checking that their widths chain.
    pub fn new(reducer: PcaReducer, scaler: StandardScaler) -> ModelResult<Self> {
        if reducer.n_components() != scaler.width() {
            return Err(ModelError::InvalidArtifact(format!(
                "reducer outputs {} components but scaler expects {}",
                reducer.n_components(),
                scaler.width()
            )));
        }
        Ok(Self { reducer, scaler })
    }

    /// Width of raw vectors accepted.
    pub fn input_width(&self) -> usize {
        self.reducer.n_features_in()
    }

    /// Width of transformed vectors.
    pub fn output_width(&self) -> usize {
        self.scaler.width()
    }

    /// Reduce, then standardize.
    pub fn transform(&self, raw: ArrayView1<'_, f64>) -> ModelResult<Array1<f64>> {
        let reduced = self.reducer.transform(raw)?;
        self.scaler.transform(reduced.view())
    }
}
