//! Medicine catalog models.

use serde::{Deserialize, Serialize};

/// A single medicine in the catalog.
///
/// Records are immutable once the catalog store is built; the row index of a
/// record is its identity inside the pipeline.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MedicineRecord {
    /// Brand or product name
    pub name: String,
    /// Therapeutic class label (e.g., "ANTI INFECTIVES")
    pub therapeutic_class: String,
    /// Usage indications, in catalog order
    #[serde(default)]
    pub uses: Vec<String>,
    /// Known side effects, in catalog order
    #[serde(default)]
    pub side_effects: Vec<String>,
    /// Manufacturer name
    #[serde(default)]
    pub manufacturer: Option<String>,
    /// Active ingredients (e.g., "Amoxycillin (500mg) + Clavulanic Acid (125mg)")
    #[serde(default)]
    pub composition: Option<String>,
    /// Explicit contraindication flags (e.g., ["pregnancy", "renal impairment"])
    #[serde(default)]
    pub contraindications: Vec<String>,
}

impl MedicineRecord {
    /// Create a new record with required fields.
    pub fn new(name: impl Into<String>, therapeutic_class: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            therapeutic_class: therapeutic_class.into(),
            uses: Vec::new(),
            side_effects: Vec::new(),
            manufacturer: None,
            composition: None,
            contraindications: Vec::new(),
        }
    }

    /// Lower-cased concatenation of all usage entries, used for symptom matching.
    pub fn usage_text(&self) -> String {
        self.uses
            .iter()
            .map(|u| u.trim().to_lowercase())
            .filter(|u| !u.is_empty())
            .collect::<Vec<_>>()
            .join(" | ")
    }

    /// First usage entry, if any.
    pub fn primary_use(&self) -> Option<&str> {
        self.uses.iter().map(|u| u.trim()).find(|u| !u.is_empty())
    }

    /// Manufacturer for display, falling back to "Unknown".
    pub fn manufacturer_or_unknown(&self) -> &str {
        self.manufacturer
            .as_deref()
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .unwrap_or("Unknown")
    }

    /// Check whether this record carries a therapeutic class equal to `class`
    /// (case-insensitive).
    pub fn is_class(&self, class: &str) -> bool {
        self.therapeutic_class.trim().eq_ignore_ascii_case(class.trim())
    }
}
