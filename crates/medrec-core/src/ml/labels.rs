//! Closed-set label mapping between internal class ids and class names.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::{ModelError, ModelResult};

/// Injective mapping from class id (position) to therapeutic class name.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct LabelMapping {
    labels: Vec<String>,
}

impl LabelMapping {
    /// Build a mapping; labels must be non-empty and unique.
    pub fn new(labels: Vec<String>) -> ModelResult<Self> {
        if labels.is_empty() {
            return Err(ModelError::InvalidArtifact("label mapping is empty".into()));
        }
        let mut seen = HashSet::new();
        for label in &labels {
            if !seen.insert(label.as_str()) {
                return Err(ModelError::InvalidArtifact(format!(
                    "duplicate label in mapping: {}",
                    label
                )));
            }
        }
        Ok(Self { labels })
    }

    /// Number of known classes.
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Decode an internal class id.
    pub fn decode(&self, class_id: usize) -> ModelResult<&str> {
        self.labels
            .get(class_id)
            .map(String::as_str)
            .ok_or(ModelError::UnknownClassId {
                class_id,
                known: self.labels.len(),
            })
    }

    /// Encode a class name back to its id.
    pub fn encode(&self, label: &str) -> Option<usize> {
        self.labels.iter().position(|l| l == label)
    }
}

impl TryFrom<Vec<String>> for LabelMapping {
    type Error = ModelError;

    fn try_from(labels: Vec<String>) -> Result<Self, Self::Error> {
        Self::new(labels)
    }
}

impl From<LabelMapping> for Vec<String> {
    fn from(mapping: LabelMapping) -> Self {
        mapping.labels
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_and_encode() {
        let mapping = LabelMapping::new(vec!["CARDIAC".into(), "RESPIRATORY".into()]).unwrap();
        assert_eq!(mapping.decode(1).unwrap(), "RESPIRATORY");
        assert_eq!(mapping.encode("CARDIAC"), Some(0));
        assert_eq!(mapping.encode("DERMA"), None);
    }

    #[test]
    fn test_out_of_domain_id() {
        let mapping = LabelMapping::new(vec!["CARDIAC".into()]).unwrap();
        assert!(matches!(
            mapping.decode(4),
            Err(ModelError::UnknownClassId {
                class_id: 4,
                known: 1
            })
        ));
    }

    #[test]
    fn test_duplicates_rejected() {
        let result = LabelMapping::new(vec!["A".into(), "B".into(), "A".into()]);
        assert!(matches!(result, Err(ModelError::InvalidArtifact(_))));
    }

    #[test]
    fn test_deserialize_validates() {
        assert!(serde_json::from_str::<LabelMapping>(r#"["A","B"]"#).is_ok());
        assert!(serde_json::from_str::<LabelMapping>(r#"["A","A"]"#).is_err());
        assert!(serde_json::from_str::<LabelMapping>("[]").is_err());
    }
}
