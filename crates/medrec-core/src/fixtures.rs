//! Small synthetic catalog shared by unit tests.
//!
//! Features are one-hot on the catalog class with a per-row magnitude, so an
//! identity transform plus a diagonal softmax predicts each row's own class
//! with a row-specific confidence.

use ndarray::{Array1, Array2};

use crate::clusters::ClusterIndex;
use crate::ml::{
    Classifier, FeatureTransformer, LabelMapping, ModelBundle, PcaReducer, SoftmaxClassifier,
    StandardScaler,
};
use crate::models::{ClusterSummary, MedicineRecord};
use crate::store::{CatalogStore, FeatureMatrix};

pub const CLASSES: [&str; 5] = [
    "PAIN ANALGESICS",
    "RESPIRATORY",
    "PENICILLIN ANTIBIOTICS",
    "GASTRO INTESTINAL",
    "BLOOD RELATED",
];

struct Row {
    name: &'static str,
    class: usize,
    uses: &'static [&'static str],
    side_effects: &'static [&'static str],
    manufacturer: &'static str,
    composition: &'static str,
    contraindications: &'static [&'static str],
    magnitude: f64,
}

const ROWS: [Row; 10] = [
    Row {
        name: "Crocin Advance Tablet",
        class: 0,
        uses: &["Fever", "Pain relief"],
        side_effects: &["Nausea"],
        manufacturer: "GlaxoSmithKline",
        composition: "Paracetamol (500mg)",
        contraindications: &[],
        magnitude: 1.0,
    },
    Row {
        name: "Dolo 650 Tablet",
        class: 0,
        uses: &["Fever", "Headache"],
        side_effects: &["Nausea", "Liver damage"],
        manufacturer: "Micro Labs",
        composition: "Paracetamol (650mg)",
        contraindications: &[],
        magnitude: 0.9,
    },
    Row {
        name: "Ascoril LS Syrup",
        class: 1,
        uses: &["Cough with mucus"],
        side_effects: &["Tremors", "Headache"],
        manufacturer: "Glenmark",
        composition: "Ambroxol + Levosalbutamol + Guaifenesin",
        contraindications: &[],
        magnitude: 1.1,
    },
    Row {
        name: "Sinarest Tablet",
        class: 1,
        uses: &["Common cold", "Fever", "Runny nose"],
        side_effects: &["Sleepiness", "Nausea"],
        manufacturer: "Centaur",
        composition: "Paracetamol + Phenylephrine + Chlorpheniramine",
        contraindications: &[],
        magnitude: 1.3,
    },
    Row {
        name: "Benadryl Cough Syrup",
        class: 1,
        uses: &["Cough", "Common cold"],
        side_effects: &["Sleepiness"],
        manufacturer: "Johnson & Johnson",
        composition: "Diphenhydramine",
        contraindications: &[],
        magnitude: 0.8,
    },
    Row {
        name: "Augmentin 625 Duo Tablet",
        class: 2,
        uses: &["Bacterial infections"],
        side_effects: &["Diarrhea", "Vomiting"],
        manufacturer: "GlaxoSmithKline",
        composition: "Amoxycillin (500mg) + Clavulanic Acid (125mg)",
        contraindications: &[],
        magnitude: 1.0,
    },
    Row {
        name: "Moxikind-CV 625 Tablet",
        class: 2,
        uses: &["Bacterial infections"],
        side_effects: &["Diarrhea"],
        manufacturer: "Mankind",
        composition: "Amoxycillin (500mg) + Clavulanic Acid (125mg)",
        contraindications: &[],
        magnitude: 0.9,
    },
    Row {
        name: "Pan 40 Tablet",
        class: 3,
        uses: &["Acidity", "Peptic ulcer disease"],
        side_effects: &["Headache"],
        manufacturer: "Alkem",
        composition: "Pantoprazole (40mg)",
        contraindications: &[],
        magnitude: 1.0,
    },
    Row {
        name: "Brufen 400 Tablet",
        class: 0,
        uses: &["Pain relief", "Fever"],
        side_effects: &["Heartburn"],
        manufacturer: "Abbott",
        composition: "Ibuprofen (400mg)",
        contraindications: &["peptic ulcer", "kidney disease"],
        magnitude: 1.2,
    },
    Row {
        name: "Ecosprin 75 Tablet",
        class: 4,
        uses: &["Prevention of heart attack"],
        side_effects: &["Bleeding"],
        manufacturer: "USV",
        composition: "Aspirin (75mg)",
        contraindications: &["bleeding disorder"],
        magnitude: 1.0,
    },
];

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

pub fn records() -> Vec<MedicineRecord> {
    ROWS.iter()
        .map(|row| MedicineRecord {
            name: row.name.into(),
            therapeutic_class: CLASSES[row.class].into(),
            uses: strings(row.uses),
            side_effects: strings(row.side_effects),
            manufacturer: Some(row.manufacturer.into()),
            composition: Some(row.composition.into()),
            contraindications: strings(row.contraindications),
        })
        .collect()
}

pub fn feature_rows() -> Vec<Vec<f64>> {
    ROWS.iter()
        .map(|row| {
            let mut v = vec![0.0; CLASSES.len()];
            v[row.class] = row.magnitude;
            v
        })
        .collect()
}

pub fn store() -> CatalogStore {
    let features = FeatureMatrix::from_rows(feature_rows()).unwrap();
    CatalogStore::new(records(), features).unwrap()
}

/// One cluster per class, ids in class order.
pub fn clusters(store: &CatalogStore) -> ClusterIndex {
    let summaries = CLASSES
        .iter()
        .enumerate()
        .map(|(id, class)| {
            let rows = store.rows_in_class(class);
            ClusterSummary {
                cluster_id: id,
                size: rows.len(),
                primary_class: class.to_string(),
                n_classes: 1,
                sample_medicines: rows
                    .iter()
                    .take(3)
                    .map(|&r| store.records()[r].name.clone())
                    .collect(),
            }
        })
        .collect();
    ClusterIndex::new(summaries, store.len()).unwrap()
}

/// Identity transforms and a diagonal softmax over `CLASSES`.
pub fn bundle() -> ModelBundle {
    let n = CLASSES.len();
    let reducer = PcaReducer::new(Array1::zeros(n), Array2::eye(n)).unwrap();
    let scaler = StandardScaler::new(Array1::zeros(n), Array1::ones(n)).unwrap();
    let model = SoftmaxClassifier::new(Array2::<f64>::eye(n) * 3.0, Array1::zeros(n)).unwrap();
    let labels = LabelMapping::new(strings(&CLASSES)).unwrap();

    let transformer = FeatureTransformer::new(reducer, scaler).unwrap();
    ModelBundle::new(transformer, Classifier::new(Box::new(model), labels)).unwrap()
}
