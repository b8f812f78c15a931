//! Catalog store: row-aligned medicine records and feature vectors.
//!
//! The store is built once and is read-only afterwards. Row `i` of the
//! feature matrix always describes record `i`.

mod features;
mod loader;

pub use features::*;
pub use loader::*;

use std::collections::HashMap;
use std::path::PathBuf;

use ndarray::ArrayView1;
use thiserror::Error;

use crate::models::MedicineRecord;

/// Catalog store errors.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Catalog has {records} records but feature table has {features} rows")]
    RowMisalignment { records: usize, features: usize },

    #[error("Feature row {row} has width {found}, expected {expected}")]
    RaggedFeatures {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("Feature row {row}, column {col} is not a finite number")]
    NonFinite { row: usize, col: usize },

    #[error("Catalog is empty")]
    EmptyCatalog,
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Immutable medicine catalog with its aligned feature matrix.
#[derive(Debug, Clone)]
pub struct CatalogStore {
    records: Vec<MedicineRecord>,
    features: FeatureMatrix,
    /// Lower-cased usage text per row
    usage_index: Vec<String>,
    /// Lower-cased name -> first row with that name
    name_index: HashMap<String, usize>,
    /// Lower-cased class -> rows in catalog order
    class_index: HashMap<String, Vec<usize>>,
}

impl CatalogStore {
    /// Build a store, enforcing the row-alignment invariant.
    pub fn new(records: Vec<MedicineRecord>, features: FeatureMatrix) -> StoreResult<Self> {
        if records.is_empty() {
            return Err(StoreError::EmptyCatalog);
        }
        if records.len() != features.rows() {
            return Err(StoreError::RowMisalignment {
                records: records.len(),
                features: features.rows(),
            });
        }

        let usage_index = records.iter().map(MedicineRecord::usage_text).collect();

        let mut name_index = HashMap::new();
        let mut class_index: HashMap<String, Vec<usize>> = HashMap::new();
        for (row, record) in records.iter().enumerate() {
            name_index
                .entry(normalize_key(&record.name))
                .or_insert(row);
            class_index
                .entry(normalize_key(&record.therapeutic_class))
                .or_default()
                .push(row);
        }

        Ok(Self {
            records,
            features,
            usage_index,
            name_index,
            class_index,
        })
    }

    /// Number of medicines.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Always false for a constructed store; kept for API symmetry.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// All records in catalog order.
    pub fn records(&self) -> &[MedicineRecord] {
        &self.records
    }

    /// Record at `row`.
    pub fn record(&self, row: usize) -> Option<&MedicineRecord> {
        self.records.get(row)
    }

    /// The feature matrix.
    pub fn features(&self) -> &FeatureMatrix {
        &self.features
    }

    /// Raw feature vector at `row`.
    pub fn feature_row(&self, row: usize) -> Option<ArrayView1<'_, f64>> {
        self.features.row(row)
    }

    /// Indexed (lower-cased) usage text at `row`.
    pub fn usage_text(&self, row: usize) -> &str {
        self.usage_index.get(row).map(String::as_str).unwrap_or("")
    }

    /// Rows whose therapeutic class equals `class` (case-insensitive), in catalog order.
    pub fn rows_in_class(&self, class: &str) -> &[usize] {
        self.class_index
            .get(&normalize_key(class))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Find a medicine by name.
    ///
    /// Tries an exact case-insensitive match first, then the first record
    /// whose name starts with the query at a word boundary
    /// ("Augmentin" finds "Augmentin 625 Duo Tablet").
    pub fn find_by_name(&self, name: &str) -> Option<usize> {
        let key = normalize_key(name);
        if key.is_empty() {
            return None;
        }
        if let Some(&row) = self.name_index.get(&key) {
            return Some(row);
        }

        self.records.iter().position(|record| {
            let candidate = record.name.trim().to_lowercase();
            candidate
                .strip_prefix(&key)
                .map(|rest| rest.starts_with(|c: char| !c.is_alphanumeric()))
                .unwrap_or(false)
        })
    }

    /// Names of all records, in catalog order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.records.iter().map(|r| r.name.as_str())
    }
}

fn normalize_key(s: &str) -> String {
    s.trim().to_lowercase()
}
