//! Contraindication check results.

use serde::{Deserialize, Serialize};

/// Overall verdict marker of a contraindication check.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SafetyStatus {
    /// No warnings
    Clear,
    /// At least one conflict was detected
    Conflicts,
    /// No conflicts, but some medicines could not be verified
    Unverified,
}

impl SafetyStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SafetyStatus::Clear => "clear",
            SafetyStatus::Conflicts => "conflicts",
            SafetyStatus::Unverified => "unverified",
        }
    }
}

/// What triggered a finding.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FindingKind {
    Allergy,
    Condition,
    Interaction,
    DuplicateTherapy,
    UnverifiableMedicine,
}

/// A single structured finding.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SafetyFinding {
    pub kind: FindingKind,
    /// The patient's medicine the finding is about
    pub medicine: String,
    /// The allergy, condition or other medicine that triggered it
    pub trigger: Option<String>,
    /// Human readable warning
    pub message: String,
}

/// Result of `check_contraindications`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ContraindicationResult {
    pub safe: bool,
    pub warnings: Vec<String>,
    pub status: SafetyStatus,
    pub findings: Vec<SafetyFinding>,
}

impl ContraindicationResult {
    /// Build a result from findings; `safe` is true only when there are none.
    pub fn from_findings(findings: Vec<SafetyFinding>) -> Self {
        let warnings: Vec<String> = findings.iter().map(|f| f.message.clone()).collect();
        let status = if findings.is_empty() {
            SafetyStatus::Clear
        } else if findings
            .iter()
            .all(|f| f.kind == FindingKind::UnverifiableMedicine)
        {
            SafetyStatus::Unverified
        } else {
            SafetyStatus::Conflicts
        };

        Self {
            safe: warnings.is_empty(),
            warnings,
            status,
            findings,
        }
    }
}
