//! Loading catalog artifacts from JSON files.

use std::fs;
use std::path::Path;

use serde::de::DeserializeOwned;
use tracing::debug;

use super::{CatalogStore, FeatureMatrix, StoreError, StoreResult};
use crate::models::MedicineRecord;

/// Read and deserialize a JSON artifact.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> StoreResult<T> {
    let content = fs::read_to_string(path).map_err(|source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| StoreError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Load medicine records (a JSON array of records).
pub fn load_catalog(path: &Path) -> StoreResult<Vec<MedicineRecord>> {
    let records: Vec<MedicineRecord> = read_json(path)?;
    debug!(path = %path.display(), records = records.len(), "loaded catalog records");
    Ok(records)
}

/// Load the feature table (a JSON array of numeric rows).
pub fn load_features(path: &Path) -> StoreResult<FeatureMatrix> {
    let rows: Vec<Vec<f64>> = read_json(path)?;
    let matrix = FeatureMatrix::from_rows(rows)?;
    debug!(
        path = %path.display(),
        rows = matrix.rows(),
        width = matrix.width(),
        "loaded feature table"
    );
    Ok(matrix)
}

impl CatalogStore {
    /// Load catalog and feature files and build an aligned store.
    pub fn load(catalog_path: &Path, features_path: &Path) -> StoreResult<Self> {
        let records = load_catalog(catalog_path)?;
        let features = load_features(features_path)?;
        Self::new(records, features)
    }
}
