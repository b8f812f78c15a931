//! Contraindication rule data.
//!
//! Rules are plain data, loaded from TOML or taken from [`RuleTable::builtin`].
//! All matching is case-insensitive substring matching.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::config::{ConfigError, ConfigResult};

/// Catalog fields a rule can inspect.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum CatalogField {
    Name,
    TherapeuticClass,
    Composition,
    Contraindications,
}

impl CatalogField {
    pub fn as_str(&self) -> &'static str {
        match self {
            CatalogField::Name => "name",
            CatalogField::TherapeuticClass => "class",
            CatalogField::Composition => "composition",
            CatalogField::Contraindications => "contraindication flags",
        }
    }

    pub fn all() -> Vec<CatalogField> {
        vec![
            CatalogField::Name,
            CatalogField::TherapeuticClass,
            CatalogField::Composition,
            CatalogField::Contraindications,
        ]
    }

    /// Fields that describe what a medicine must not be given with.
    ///
    /// Name and class describe what it treats, so a condition found there
    /// is usually an indication.
    pub fn condition_default() -> Vec<CatalogField> {
        vec![CatalogField::Composition, CatalogField::Contraindications]
    }
}

/// Interaction severity.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Monitor for effects
    Minor,
    /// Use with caution
    Moderate,
    /// Avoid combination if possible
    Major,
    /// Never combine
    Contraindicated,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Minor => "minor",
            Severity::Moderate => "moderate",
            Severity::Major => "major",
            Severity::Contraindicated => "contraindicated",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Expands a declared allergy or condition into extra search terms.
///
/// Applies when `trigger` occurs in the declared text, e.g. trigger
/// `"penicillin"` with terms `["amoxycillin", "ampicillin"]`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct KeywordRule {
    pub trigger: String,
    pub terms: Vec<String>,
}

/// Pairwise interaction between two current medicines.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InteractionRule {
    /// Term identifying the first medicine
    pub a: String,
    /// Term identifying the second medicine
    pub b: String,
    pub severity: Severity,
    pub description: String,
}

/// Complete rule set consulted by the contraindication checker.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RuleTable {
    /// Search for the declared allergy or condition text itself
    pub keyword_baseline: bool,
    /// Catalog fields inspected for allergies
    #[serde(alias = "fields")]
    pub allergy_fields: Vec<CatalogField>,
    /// Catalog fields inspected for conditions
    pub condition_fields: Vec<CatalogField>,
    pub allergy_rules: Vec<KeywordRule>,
    pub condition_rules: Vec<KeywordRule>,
    pub interactions: Vec<InteractionRule>,
    /// Flag two current medicines sharing a therapeutic class
    pub duplicate_therapy: bool,
}

impl Default for RuleTable {
    fn default() -> Self {
        Self::builtin()
    }
}

impl RuleTable {
    /// Keyword baseline only, no expansions or interactions.
    pub fn baseline() -> Self {
        Self {
            keyword_baseline: true,
            allergy_fields: CatalogField::all(),
            condition_fields: CatalogField::condition_default(),
            allergy_rules: Vec::new(),
            condition_rules: Vec::new(),
            interactions: Vec::new(),
            duplicate_therapy: false,
        }
    }

    /// Built-in rules: keyword baseline plus a small set of common
    /// expansions and interactions.
    pub fn builtin() -> Self {
        fn keyword(trigger: &str, terms: &[&str]) -> KeywordRule {
            KeywordRule {
                trigger: trigger.into(),
                terms: terms.iter().map(|t| t.to_string()).collect(),
            }
        }
        fn interaction(a: &str, b: &str, severity: Severity, description: &str) -> InteractionRule {
            InteractionRule {
                a: a.into(),
                b: b.into(),
                severity,
                description: description.into(),
            }
        }

        Self {
            allergy_rules: vec![
                keyword(
                    "penicillin",
                    &["amoxycillin", "amoxicillin", "ampicillin", "cloxacillin", "piperacillin"],
                ),
                keyword("sulfa", &["sulfamethoxazole", "sulfasalazine", "sulphonamide"]),
                keyword("aspirin", &["acetylsalicylic", "salicylate"]),
                keyword("nsaid", &["ibuprofen", "diclofenac", "naproxen", "aceclofenac", "aspirin"]),
            ],
            condition_rules: vec![
                keyword("hypertension", &["pseudoephedrine", "phenylephrine"]),
                keyword("ulcer", &["aspirin", "ibuprofen", "diclofenac", "naproxen", "aceclofenac"]),
                keyword("asthma", &["propranolol", "atenolol", "aspirin"]),
                keyword("pregnan", &["isotretinoin", "warfarin", "misoprostol"]),
                keyword("kidney", &["ibuprofen", "diclofenac", "naproxen"]),
            ],
            interactions: vec![
                interaction(
                    "aspirin",
                    "ibuprofen",
                    Severity::Moderate,
                    "Combined NSAIDs raise gastrointestinal bleeding risk.",
                ),
                interaction(
                    "warfarin",
                    "aspirin",
                    Severity::Major,
                    "Antiplatelet effect adds to anticoagulation; bleeding risk.",
                ),
                interaction(
                    "clopidogrel",
                    "omeprazole",
                    Severity::Moderate,
                    "Omeprazole reduces activation of clopidogrel.",
                ),
                interaction(
                    "sildenafil",
                    "nitroglycerin",
                    Severity::Contraindicated,
                    "Severe hypotension.",
                ),
            ],
            duplicate_therapy: true,
            ..Self::baseline()
        }
    }

    /// Parse a rule table from TOML. Missing sections take built-in values.
    pub fn from_toml(toml_str: &str) -> ConfigResult<Self> {
        toml::from_str(toml_str).map_err(|e| ConfigError::ParseError {
            path: "<string>".to_string(),
            message: e.to_string(),
        })
    }

    /// Read a rule table from a TOML file.
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
            path: path.display().to_string(),
        })?;
        toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }

    /// Lower-cased search terms for a declared allergy.
    pub fn allergy_terms(&self, allergy: &str) -> Vec<String> {
        expand(allergy, self.keyword_baseline, &self.allergy_rules)
    }

    /// Lower-cased search terms for a declared condition.
    pub fn condition_terms(&self, condition: &str) -> Vec<String> {
        expand(condition, self.keyword_baseline, &self.condition_rules)
    }
}

fn expand(declared: &str, baseline: bool, rules: &[KeywordRule]) -> Vec<String> {
    let declared = declared.trim().to_lowercase();
    let mut terms = Vec::new();
    if baseline && !declared.is_empty() {
        terms.push(declared.clone());
    }
    for rule in rules {
        let trigger = rule.trigger.trim().to_lowercase();
        if trigger.is_empty() || !declared.contains(&trigger) {
            continue;
        }
        for term in &rule.terms {
            let term = term.trim().to_lowercase();
            if !term.is_empty() && !terms.contains(&term) {
                terms.push(term);
            }
        }
    }
    terms
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_with_baseline() {
        let rules = RuleTable::builtin();
        let terms = rules.allergy_terms("Penicillin");
        assert_eq!(terms[0], "penicillin");
        assert!(terms.contains(&"amoxycillin".to_string()));
    }

    #[test]
    fn test_expand_without_baseline() {
        let mut rules = RuleTable::builtin();
        rules.keyword_baseline = false;
        assert!(rules.condition_terms("Migraine").is_empty());
        assert!(rules
            .condition_terms("Peptic ulcer disease")
            .contains(&"ibuprofen".to_string()));
    }

    #[test]
    fn test_toml_rules() {
        let rules = RuleTable::from_toml(
            r#"
            keyword_baseline = true
            allergy_fields = ["therapeutic_class", "composition"]
            duplicate_therapy = false
            condition_rules = []

            [[allergy_rules]]
            trigger = "latex"
            terms = ["natural rubber"]

            [[interactions]]
            a = "metformin"
            b = "contrast"
            severity = "major"
            description = "Risk of lactic acidosis."
            "#,
        )
        .unwrap();

        assert_eq!(
            rules.allergy_fields,
            vec![CatalogField::TherapeuticClass, CatalogField::Composition]
        );
        assert_eq!(rules.condition_fields, CatalogField::condition_default());
        assert!(!rules.duplicate_therapy);
        assert_eq!(rules.interactions.len(), 1);
        assert_eq!(rules.interactions[0].severity, Severity::Major);
        assert_eq!(rules.allergy_terms("Latex"), vec!["latex", "natural rubber"]);
    }

    #[test]
    fn test_legacy_fields_key_sets_allergy_fields() {
        let rules = RuleTable::from_toml(r#"fields = ["name"]"#).unwrap();
        assert_eq!(rules.allergy_fields, vec![CatalogField::Name]);
        assert_eq!(rules.condition_fields, CatalogField::condition_default());
    }

    #[test]
    fn test_condition_fields_skip_name_and_class() {
        let rules = RuleTable::builtin();
        assert!(!rules.condition_fields.contains(&CatalogField::Name));
        assert!(!rules.condition_fields.contains(&CatalogField::TherapeuticClass));
        assert_eq!(rules.allergy_fields, CatalogField::all());
    }

    #[test]
    fn test_bad_toml() {
        assert!(matches!(
            RuleTable::from_toml("severity = [unclosed"),
            Err(ConfigError::ParseError { .. })
        ));
    }
}
