//! Patient profile models.

use serde::{Deserialize, Serialize};

/// What a patient reports about themselves for a safety check.
///
/// All lists are free text as supplied by the caller.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PatientProfile {
    /// Medicines the patient currently takes
    #[serde(default)]
    pub medicines: Vec<String>,
    /// Declared allergies (e.g., "Penicillin")
    #[serde(default)]
    pub allergies: Vec<String>,
    /// Existing conditions (e.g., "Hypertension")
    #[serde(default)]
    pub conditions: Vec<String>,
}

impl PatientProfile {
    /// Create a profile from the three lists.
    pub fn new(medicines: Vec<String>, allergies: Vec<String>, conditions: Vec<String>) -> Self {
        Self {
            medicines,
            allergies,
            conditions,
        }
    }

    /// Current medicines with blank entries removed.
    pub fn current_medicines(&self) -> impl Iterator<Item = &str> {
        non_blank(&self.medicines)
    }

    /// Allergies with blank entries removed.
    pub fn declared_allergies(&self) -> impl Iterator<Item = &str> {
        non_blank(&self.allergies)
    }

    /// Conditions with blank entries removed.
    pub fn declared_conditions(&self) -> impl Iterator<Item = &str> {
        non_blank(&self.conditions)
    }
}

fn non_blank(items: &[String]) -> impl Iterator<Item = &str> {
    items.iter().map(|s| s.trim()).filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_entries_skipped() {
        let profile = PatientProfile::new(
            vec!["Aspirin".into(), "  ".into()],
            vec!["".into(), " Penicillin ".into()],
            vec![],
        );

        assert_eq!(profile.current_medicines().collect::<Vec<_>>(), vec!["Aspirin"]);
        assert_eq!(profile.declared_allergies().collect::<Vec<_>>(), vec!["Penicillin"]);
        assert_eq!(profile.declared_conditions().count(), 0);
    }

    #[test]
    fn test_deserialize_partial_profile() {
        let profile: PatientProfile =
            serde_json::from_str(r#"{"allergies":["Sulfa"]}"#).unwrap();
        assert!(profile.medicines.is_empty());
        assert_eq!(profile.allergies, vec!["Sulfa".to_string()]);
    }
}
