//! Shared test catalog and artifact writers.

#![allow(dead_code)]

use std::fs;
use std::path::Path;

use ndarray::{Array1, Array2};
use serde_json::json;

use medrec_core::ml::{
    Classifier, FeatureTransformer, LabelMapping, ModelBundle, PcaReducer, SoftmaxClassifier,
    StandardScaler,
};
use medrec_core::models::{ClusterSummary, MedicineRecord};
use medrec_core::store::FeatureMatrix;
use medrec_core::{CatalogStore, ClusterIndex, Pipeline, PipelineConfig, PipelineContext};

pub const CLASSES: [&str; 4] = [
    "PAIN ANALGESICS",
    "RESPIRATORY",
    "PENICILLIN ANTIBIOTICS",
    "GASTRO INTESTINAL",
];

/// (name, class index, uses, composition, feature magnitude)
pub const CATALOG: [(&str, usize, &[&str], &str, f64); 8] = [
    ("Crocin Advance Tablet", 0, &["Fever", "Pain relief"], "Paracetamol (500mg)", 1.0),
    (
        "Sinarest Tablet",
        1,
        &["Common cold", "Fever", "Runny nose"],
        "Paracetamol + Phenylephrine + Chlorpheniramine",
        1.4,
    ),
    ("Benadryl Cough Syrup", 1, &["Cough", "Common cold"], "Diphenhydramine", 1.2),
    ("Ascoril LS Syrup", 1, &["Cough with mucus"], "Ambroxol + Guaifenesin", 0.9),
    (
        "Augmentin 625 Duo Tablet",
        2,
        &["Bacterial infections"],
        "Amoxycillin + Clavulanic Acid",
        1.0,
    ),
    ("Pan 40 Tablet", 3, &["Acidity"], "Pantoprazole (40mg)", 1.0),
    ("Dolo 650 Tablet", 0, &["Fever", "Headache"], "Paracetamol (650mg)", 0.8),
    ("Allegra 120mg Tablet", 1, &["Sneezing", "Runny nose"], "Fexofenadine", 1.0),
];

pub fn records() -> Vec<MedicineRecord> {
    CATALOG
        .iter()
        .map(|(name, class, uses, composition, _)| {
            let mut record = MedicineRecord::new(*name, CLASSES[*class]);
            record.uses = uses.iter().map(|u| u.to_string()).collect();
            record.side_effects = vec!["Nausea".to_string()];
            record.manufacturer = Some("Acme Pharma".to_string());
            record.composition = Some(composition.to_string());
            record
        })
        .collect()
}

/// One-hot class features scaled by each row's magnitude.
pub fn feature_rows() -> Vec<Vec<f64>> {
    CATALOG
        .iter()
        .map(|(_, class, _, _, magnitude)| {
            let mut row = vec![0.0; CLASSES.len()];
            row[*class] = *magnitude;
            row
        })
        .collect()
}

/// One cluster per class.
pub fn cluster_summaries() -> Vec<ClusterSummary> {
    let records = records();
    CLASSES
        .iter()
        .enumerate()
        .map(|(id, class)| {
            let members: Vec<String> = records
                .iter()
                .filter(|r| r.therapeutic_class == *class)
                .map(|r| r.name.clone())
                .collect();
            ClusterSummary {
                cluster_id: id,
                size: members.len(),
                primary_class: class.to_string(),
                n_classes: 1,
                sample_medicines: members.into_iter().take(3).collect(),
            }
        })
        .collect()
}

/// `Array2::eye(n)` as nested rows, the artifact file layout.
fn identity(n: usize) -> Vec<Vec<f64>> {
    Array2::<f64>::eye(n)
        .outer_iter()
        .map(|row| row.to_vec())
        .collect()
}

/// Identity transforms of `width` and a diagonal softmax with `labels`.
pub fn bundle(width: usize, labels: &[&str]) -> ModelBundle {
    let reducer = PcaReducer::new(Array1::zeros(width), Array2::eye(width)).unwrap();
    let scaler = StandardScaler::new(Array1::zeros(width), Array1::ones(width)).unwrap();
    let model = SoftmaxClassifier::new(Array2::<f64>::eye(width) * 3.0, Array1::zeros(width)).unwrap();
    let labels = LabelMapping::new(labels.iter().map(|l| l.to_string()).collect()).unwrap();
    let transformer = FeatureTransformer::new(reducer, scaler).unwrap();
    ModelBundle::new(transformer, Classifier::new(Box::new(model), labels)).unwrap()
}

/// Pipeline over the in-memory catalog, without models.
pub fn in_memory_pipeline() -> Pipeline {
    let features = FeatureMatrix::from_rows(feature_rows()).unwrap();
    let store = CatalogStore::new(records(), features).unwrap();
    let clusters = ClusterIndex::new(cluster_summaries(), store.len()).unwrap();
    Pipeline::with_context(PipelineConfig::default(), PipelineContext::new(store, clusters))
}

/// Write catalog, features and clusters; returns a config pointing at them.
pub fn write_data(dir: &Path, features: &[Vec<f64>]) -> PipelineConfig {
    let mut config = PipelineConfig::default();
    config.data.catalog_path = dir.join("catalog.json");
    config.data.features_path = dir.join("features.json");
    config.data.clusters_path = dir.join("clusters.json");
    config.data.models_dir = dir.join("models");

    fs::write(
        &config.data.catalog_path,
        serde_json::to_string_pretty(&records()).unwrap(),
    )
    .unwrap();
    fs::write(
        &config.data.features_path,
        serde_json::to_string(features).unwrap(),
    )
    .unwrap();
    fs::write(
        &config.data.clusters_path,
        serde_json::to_string_pretty(&cluster_summaries()).unwrap(),
    )
    .unwrap();
    config
}

/// Write an identity/diagonal model bundle into `config.data.models_dir`.
pub fn write_models(config: &PipelineConfig, width: usize, labels: &[&str]) {
    let dir = &config.data.models_dir;
    fs::create_dir_all(dir).unwrap();

    let weights: Vec<Vec<f64>> = identity(width)
        .into_iter()
        .map(|row| row.into_iter().map(|w| w * 3.0).collect())
        .collect();

    fs::write(
        dir.join("reducer.json"),
        json!({ "mean": vec![0.0; width], "components": identity(width) }).to_string(),
    )
    .unwrap();
    fs::write(
        dir.join("scaler.json"),
        json!({ "mean": vec![0.0; width], "scale": vec![1.0; width] }).to_string(),
    )
    .unwrap();
    fs::write(
        dir.join("classifier.json"),
        json!({ "kind": "softmax", "weights": weights, "intercepts": vec![0.0; width] })
            .to_string(),
    )
    .unwrap();
    fs::write(dir.join("labels.json"), json!(labels).to_string()).unwrap();
}
