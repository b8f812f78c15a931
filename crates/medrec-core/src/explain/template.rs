//! Deterministic explanation text.

use crate::models::ClusterContext;

/// Build the explanation attached to every recommendation.
///
/// Only depends on its arguments, so equal inputs always give equal text.
pub fn template_explanation(
    medicine: &str,
    class: &str,
    matched: &[&str],
    total_terms: usize,
    confidence: Option<f64>,
    cluster: Option<&ClusterContext>,
) -> String {
    let mut text = if matched.is_empty() {
        format!("{} ({}) is listed for related uses.", medicine, class)
    } else {
        format!(
            "{} ({}) is indicated for {}, matching {} of {} reported symptoms.",
            medicine,
            class,
            matched.join(", "),
            matched.len(),
            total_terms
        )
    };

    if let Some(confidence) = confidence {
        text.push_str(&format!(
            " The classifier assigns this class with {:.0}% confidence.",
            confidence * 100.0
        ));
    }

    if let Some(cluster) = cluster {
        text.push_str(&format!(
            " Its cluster groups {} medicines across {} classes (purity {:.2}).",
            cluster.size, cluster.n_classes, cluster.purity
        ));
    }

    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_match_only_text() {
        let text = template_explanation("Crocin", "PAIN ANALGESICS", &["fever"], 3, None, None);
        assert_eq!(
            text,
            "Crocin (PAIN ANALGESICS) is indicated for fever, matching 1 of 3 reported symptoms."
        );
    }

    #[test]
    fn test_full_fusion_text() {
        let cluster = ClusterContext {
            cluster_id: 2,
            size: 40,
            n_classes: 3,
            purity: 0.95,
        };
        let text = template_explanation(
            "Ascoril",
            "RESPIRATORY",
            &["cough", "cold"],
            2,
            Some(0.874),
            Some(&cluster),
        );
        assert!(text.contains("87% confidence"));
        assert!(text.contains("40 medicines across 3 classes (purity 0.95)"));
    }

    #[test]
    fn test_deterministic() {
        let a = template_explanation("A", "B", &["x"], 1, Some(0.5), None);
        let b = template_explanation("A", "B", &["x"], 1, Some(0.5), None);
        assert_eq!(a, b);
    }
}
