//! Golden tests for the contraindication checker with built-in rules.

mod common;

use medrec_core::models::FindingKind;
use medrec_core::{PatientProfile, SafetyStatus};

/// Test case from golden table.
struct GoldenCase {
    id: &'static str,
    medicines: &'static [&'static str],
    allergies: &'static [&'static str],
    conditions: &'static [&'static str],
    expected_status: SafetyStatus,
    expected_kinds: &'static [FindingKind],
}

fn get_golden_cases() -> Vec<GoldenCase> {
    vec![
        GoldenCase {
            id: "empty-profile",
            medicines: &[],
            allergies: &[],
            conditions: &[],
            expected_status: SafetyStatus::Clear,
            expected_kinds: &[],
        },
        GoldenCase {
            id: "penicillin-class",
            medicines: &["Augmentin"],
            allergies: &["Penicillin"],
            conditions: &[],
            expected_status: SafetyStatus::Conflicts,
            expected_kinds: &[FindingKind::Allergy],
        },
        GoldenCase {
            id: "decongestant-hypertension",
            medicines: &["Sinarest Tablet"],
            allergies: &[],
            conditions: &["Hypertension"],
            expected_status: SafetyStatus::Conflicts,
            expected_kinds: &[FindingKind::Condition],
        },
        GoldenCase {
            id: "painkiller-for-pain",
            medicines: &["Crocin Advance Tablet"],
            allergies: &[],
            conditions: &["Pain", "Common cold"],
            expected_status: SafetyStatus::Clear,
            expected_kinds: &[],
        },
        GoldenCase {
            id: "unknown-only",
            medicines: &["Aspirin"],
            allergies: &["Penicillin"],
            conditions: &["Hypertension"],
            expected_status: SafetyStatus::Unverified,
            expected_kinds: &[FindingKind::UnverifiableMedicine],
        },
        GoldenCase {
            id: "nsaid-pair-unknown",
            medicines: &["Aspirin", "Ibuprofen"],
            allergies: &["Penicillin"],
            conditions: &["Hypertension"],
            expected_status: SafetyStatus::Conflicts,
            expected_kinds: &[
                FindingKind::UnverifiableMedicine,
                FindingKind::UnverifiableMedicine,
                FindingKind::Interaction,
            ],
        },
        GoldenCase {
            id: "two-paracetamol-brands",
            medicines: &["Crocin Advance Tablet", "Dolo 650"],
            allergies: &[],
            conditions: &[],
            expected_status: SafetyStatus::Conflicts,
            expected_kinds: &[FindingKind::DuplicateTherapy],
        },
        GoldenCase {
            id: "unrelated-allergy",
            medicines: &["Pan 40 Tablet", "Augmentin 625 Duo Tablet"],
            allergies: &["Sulfa"],
            conditions: &["Asthma"],
            expected_status: SafetyStatus::Clear,
            expected_kinds: &[],
        },
    ]
}

fn owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[test]
fn test_golden_cases() {
    let pipeline = common::in_memory_pipeline();

    for case in get_golden_cases() {
        let profile = PatientProfile::new(
            owned(case.medicines),
            owned(case.allergies),
            owned(case.conditions),
        );
        let result = pipeline.check_contraindications(&profile).unwrap();
        let kinds: Vec<FindingKind> = result.findings.iter().map(|f| f.kind).collect();

        assert_eq!(result.status, case.expected_status, "case {}", case.id);
        assert_eq!(kinds, case.expected_kinds, "case {}", case.id);
        assert_eq!(result.safe, case.expected_kinds.is_empty(), "case {}", case.id);
        assert_eq!(result.warnings.len(), result.findings.len(), "case {}", case.id);
    }
}

#[test]
fn test_warning_names_conflicting_medicine() {
    let pipeline = common::in_memory_pipeline();
    let profile = PatientProfile::new(owned(&["Augmentin"]), owned(&["Penicillin"]), vec![]);
    let result = pipeline.check_contraindications(&profile).unwrap();

    assert!(result.warnings[0].contains("Augmentin 625 Duo Tablet"));
    assert!(result.warnings[0].contains("Penicillin"));
}

#[test]
fn test_result_serializes_status_marker() {
    let pipeline = common::in_memory_pipeline();
    let result = pipeline
        .check_contraindications(&PatientProfile::default())
        .unwrap();
    let json = serde_json::to_value(&result).unwrap();

    assert_eq!(json["safe"], true);
    assert_eq!(json["status"], "clear");
    assert_eq!(json["warnings"], serde_json::json!([]));
}
