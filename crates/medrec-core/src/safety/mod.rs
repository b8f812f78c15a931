//! Contraindication checking against a patient profile.
//!
//! Each current medicine is looked up in the catalog and its fields are
//! searched for the patient's declared allergies and conditions, expanded
//! through the [`RuleTable`]. Medicines missing from the catalog produce an
//! "unknown, cannot verify" finding instead of an error.

mod rules;

pub use rules::*;

use strsim::jaro_winkler;
use tracing::debug;

use crate::models::{
    ContraindicationResult, FindingKind, MedicineRecord, PatientProfile, SafetyFinding,
};
use crate::store::CatalogStore;

/// Minimum Jaro-Winkler similarity for a "did you mean" hint.
pub const SUGGESTION_THRESHOLD: f64 = 0.88;

/// A current medicine resolved against the catalog.
struct Resolved<'a> {
    declared: &'a str,
    record: Option<&'a MedicineRecord>,
    /// Lower-cased declared name, catalog name and composition, for
    /// interaction rules
    search_text: String,
}

impl Resolved<'_> {
    fn display_name(&self) -> &str {
        self.record.map_or(self.declared, |r| r.name.as_str())
    }
}

/// Checks patient profiles against the catalog.
#[derive(Debug, Clone, Default)]
pub struct ContraindicationChecker {
    rules: RuleTable,
}

impl ContraindicationChecker {
    pub fn new(rules: RuleTable) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &RuleTable {
        &self.rules
    }

    /// Run all rules for `profile`.
    pub fn check(&self, store: &CatalogStore, profile: &PatientProfile) -> ContraindicationResult {
        let resolved = self.resolve(store, profile);
        let allergies: Vec<&str> = profile.declared_allergies().collect();
        let conditions: Vec<&str> = profile.declared_conditions().collect();

        let mut findings = Vec::new();
        for medicine in &resolved {
            let Some(record) = medicine.record else {
                findings.push(unverifiable(store, medicine.declared));
                continue;
            };

            for &allergy in &allergies {
                let terms = self.rules.allergy_terms(allergy);
                if let Some((field, term)) =
                    find_term(record, &self.rules.allergy_fields, &terms)
                {
                    findings.push(SafetyFinding {
                        kind: FindingKind::Allergy,
                        medicine: record.name.clone(),
                        trigger: Some(allergy.to_string()),
                        message: format!(
                            "{} conflicts with declared allergy '{}': {} contains '{}'",
                            record.name,
                            allergy,
                            field.as_str(),
                            term
                        ),
                    });
                }
            }

            for &condition in &conditions {
                let terms = self.rules.condition_terms(condition);
                if let Some((field, term)) =
                    find_term(record, &self.rules.condition_fields, &terms)
                {
                    findings.push(SafetyFinding {
                        kind: FindingKind::Condition,
                        medicine: record.name.clone(),
                        trigger: Some(condition.to_string()),
                        message: format!(
                            "{} may be unsuitable with condition '{}': {} contains '{}'",
                            record.name,
                            condition,
                            field.as_str(),
                            term
                        ),
                    });
                }
            }
        }

        findings.extend(self.interactions(&resolved));
        if self.rules.duplicate_therapy {
            findings.extend(duplicate_therapy(&resolved));
        }

        debug!(
            medicines = resolved.len(),
            findings = findings.len(),
            "contraindication check complete"
        );
        ContraindicationResult::from_findings(findings)
    }

    fn resolve<'a>(&self, store: &'a CatalogStore, profile: &'a PatientProfile) -> Vec<Resolved<'a>> {
        let mut seen = Vec::new();
        let mut resolved = Vec::new();
        for declared in profile.current_medicines() {
            let key = declared.to_lowercase();
            if seen.contains(&key) {
                continue;
            }
            seen.push(key.clone());

            let record = store.find_by_name(declared).and_then(|row| store.record(row));
            let mut search_text = key;
            if let Some(record) = record {
                // Flags and class name other drugs, not what this one contains
                for field in [CatalogField::Name, CatalogField::Composition] {
                    search_text.push_str(" | ");
                    search_text.push_str(&field_text(record, field));
                }
            }
            resolved.push(Resolved {
                declared,
                record,
                search_text,
            });
        }
        resolved
    }

    fn interactions(&self, resolved: &[Resolved<'_>]) -> Vec<SafetyFinding> {
        let mut findings = Vec::new();
        for (i, first) in resolved.iter().enumerate() {
            for second in &resolved[i + 1..] {
                for rule in &self.rules.interactions {
                    let a = rule.a.trim().to_lowercase();
                    let b = rule.b.trim().to_lowercase();
                    if a.is_empty() || b.is_empty() {
                        continue;
                    }
                    let forward = first.search_text.contains(&a) && second.search_text.contains(&b);
                    let reverse = first.search_text.contains(&b) && second.search_text.contains(&a);
                    if forward || reverse {
                        findings.push(SafetyFinding {
                            kind: FindingKind::Interaction,
                            medicine: first.display_name().to_string(),
                            trigger: Some(second.display_name().to_string()),
                            message: format!(
                                "{} + {}: {} interaction. {}",
                                first.display_name(),
                                second.display_name(),
                                rule.severity,
                                rule.description
                            ),
                        });
                    }
                }
            }
        }
        findings
    }
}

/// First of `fields` containing any of `terms`.
fn find_term<'t>(
    record: &MedicineRecord,
    fields: &[CatalogField],
    terms: &'t [String],
) -> Option<(CatalogField, &'t str)> {
    for &field in fields {
        let text = field_text(record, field);
        if let Some(term) = terms.iter().find(|t| text.contains(t.as_str())) {
            return Some((field, term.as_str()));
        }
    }
    None
}

fn field_text(record: &MedicineRecord, field: CatalogField) -> String {
    match field {
        CatalogField::Name => record.name.to_lowercase(),
        CatalogField::TherapeuticClass => record.therapeutic_class.to_lowercase(),
        CatalogField::Composition => record
            .composition
            .as_deref()
            .unwrap_or("")
            .to_lowercase(),
        CatalogField::Contraindications => record.contraindications.join(" | ").to_lowercase(),
    }
}

fn duplicate_therapy(resolved: &[Resolved<'_>]) -> Vec<SafetyFinding> {
    let mut findings = Vec::new();
    for (i, first) in resolved.iter().enumerate() {
        let Some(a) = first.record else { continue };
        for second in &resolved[i + 1..] {
            let Some(b) = second.record else { continue };
            if std::ptr::eq(a, b) || !a.is_class(&b.therapeutic_class) {
                continue;
            }
            findings.push(SafetyFinding {
                kind: FindingKind::DuplicateTherapy,
                medicine: a.name.clone(),
                trigger: Some(b.name.clone()),
                message: format!(
                    "{} + {}: duplicate therapy, both are {}",
                    a.name, b.name, a.therapeutic_class
                ),
            });
        }
    }
    findings
}

fn unverifiable(store: &CatalogStore, declared: &str) -> SafetyFinding {
    let mut message = format!("{} is unknown, cannot verify", declared);
    if let Some(suggestion) = suggest(store, declared) {
        message.push_str(&format!(" (did you mean '{}'?)", suggestion));
    }
    SafetyFinding {
        kind: FindingKind::UnverifiableMedicine,
        medicine: declared.to_string(),
        trigger: None,
        message,
    }
}

/// Closest catalog name by Jaro-Winkler, if similar enough.
fn suggest<'a>(store: &'a CatalogStore, declared: &str) -> Option<&'a str> {
    let query = declared.trim().to_lowercase();
    let mut best: Option<(&str, f64)> = None;
    for name in store.names() {
        let score = jaro_winkler(&query, &name.to_lowercase());
        if score >= SUGGESTION_THRESHOLD && best.map_or(true, |(_, s)| score > s) {
            best = Some((name, score));
        }
    }
    best.map(|(name, _)| name)
}
