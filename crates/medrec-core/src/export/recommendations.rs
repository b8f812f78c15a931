//! Recommendation export to JSON and CSV.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::models::{RankingMode, RecommendationSet};

use super::{ExportError, ExportResult};

/// Export of a single recommendation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationExport {
    /// Export metadata
    pub metadata: ExportMetadata,
    /// Ranked rows
    pub rows: Vec<RecommendationRow>,
}

/// Recommendation export metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportMetadata {
    /// Run ID for traceability
    pub run_id: String,
    /// When the recommendations were generated
    pub generated_at: String,
    /// Export timestamp
    pub exported_at: String,
    /// Normalized query terms
    pub symptoms: Vec<String>,
    /// Ranking mode used
    pub mode: RankingMode,
    /// Model artifact fingerprint (if models were loaded)
    pub model_fingerprint: Option<String>,
}

/// Single exported recommendation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationRow {
    pub rank: usize,
    pub medicine_name: String,
    pub therapeutic_class: String,
    /// Classifier confidence (absent in match-only mode)
    pub confidence: Option<f64>,
    pub match_score: usize,
    pub manufacturer: String,
    pub cluster_id: Option<usize>,
    pub alternatives: Vec<String>,
    pub side_effects: Vec<String>,
    pub explanation: String,
}

impl RecommendationExport {
    /// Create an export from a recommendation set.
    pub fn from_set(set: &RecommendationSet, model_fingerprint: Option<&str>) -> Self {
        let rows = set
            .recommendations
            .iter()
            .map(|rec| RecommendationRow {
                rank: rec.rank,
                medicine_name: rec.medicine_name.clone(),
                therapeutic_class: rec.therapeutic_class.clone(),
                confidence: rec.confidence,
                match_score: rec.match_score,
                manufacturer: rec.manufacturer.clone(),
                cluster_id: rec.cluster.as_ref().map(|c| c.cluster_id),
                alternatives: rec.alternatives.clone(),
                side_effects: rec.side_effects.clone(),
                explanation: rec.explanation.clone(),
            })
            .collect();

        Self {
            metadata: ExportMetadata {
                run_id: set.run_id.clone(),
                generated_at: set.generated_at.clone(),
                exported_at: chrono::Utc::now().to_rfc3339(),
                symptoms: set.symptoms.clone(),
                mode: set.mode,
                model_fingerprint: model_fingerprint.map(str::to_string),
            },
            rows,
        }
    }

    /// Export to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Export to CSV format. List fields are joined with "; ".
    pub fn to_csv(&self) -> String {
        let mut csv = String::new();

        // Header
        csv.push_str("run_id,mode,symptoms,rank,medicine_name,therapeutic_class,confidence,match_score,manufacturer,cluster_id,alternatives,side_effects,explanation\n");

        let symptoms = self.metadata.symptoms.join("; ");
        for row in &self.rows {
            csv.push_str(&format!(
                "{},{},{},{},{},{},{},{},{},{},{},{},{}\n",
                escape_csv(&self.metadata.run_id),
                self.metadata.mode.as_str(),
                escape_csv(&symptoms),
                row.rank,
                escape_csv(&row.medicine_name),
                escape_csv(&row.therapeutic_class),
                row.confidence.map(|c| format!("{:.4}", c)).unwrap_or_default(),
                row.match_score,
                escape_csv(&row.manufacturer),
                row.cluster_id.map(|c| c.to_string()).unwrap_or_default(),
                escape_csv(&row.alternatives.join("; ")),
                escape_csv(&row.side_effects.join("; ")),
                escape_csv(&row.explanation),
            ));
        }

        csv
    }

    /// Write the export to `path`, as CSV when the extension is `csv` and
    /// JSON otherwise.
    pub fn save(&self, path: &Path) -> ExportResult<()> {
        let is_csv = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("csv"));
        let body = if is_csv { self.to_csv() } else { self.to_json()? };

        std::fs::write(path, body).map_err(|source| ExportError::Write {
            path: path.to_path_buf(),
            source,
        })?;
        info!(
            path = %path.display(),
            run_id = %self.metadata.run_id,
            rows = self.rows.len(),
            "saved recommendations"
        );
        Ok(())
    }
}

/// Escape a string for CSV output.
fn escape_csv(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}
