//! Prompt construction for generated explanations.

use crate::models::Recommendation;

/// Maximum characters of the primary use quoted in a prompt.
pub const USE_EXCERPT_CHARS: usize = 100;

/// Build the explanation prompt for one recommendation.
pub fn explanation_prompt(symptoms: &[String], rec: &Recommendation, primary_use: &str) -> String {
    let excerpt: String = primary_use.chars().take(USE_EXCERPT_CHARS).collect();
    format!(
        "Based on symptoms: {symptoms}\n\
         \n\
         Top recommended medicine: {name}\n\
         Class: {class}\n\
         Uses: {excerpt}\n\
         \n\
         Provide a brief medical explanation (2-3 sentences) why this is recommended.",
        symptoms = symptoms.join(", "),
        name = rec.medicine_name,
        class = rec.therapeutic_class,
        excerpt = excerpt,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec() -> Recommendation {
        Recommendation {
            rank: 1,
            medicine_name: "Crocin Advance".into(),
            confidence: Some(0.9),
            therapeutic_class: "PAIN ANALGESICS".into(),
            manufacturer: "GSK".into(),
            explanation: String::new(),
            side_effects: vec![],
            alternatives: vec![],
            match_score: 1,
            catalog_row: 0,
            cluster: None,
        }
    }

    #[test]
    fn test_prompt_contents() {
        let prompt = explanation_prompt(&["fever".into(), "headache".into()], &rec(), "Fever");
        assert!(prompt.starts_with("Based on symptoms: fever, headache\n"));
        assert!(prompt.contains("Top recommended medicine: Crocin Advance"));
        assert!(prompt.contains("Class: PAIN ANALGESICS"));
        assert!(prompt.contains("Uses: Fever\n"));
    }

    #[test]
    fn test_use_excerpt_is_bounded() {
        let long = "x".repeat(500);
        let prompt = explanation_prompt(&["fever".into()], &rec(), &long);
        assert!(prompt.contains(&format!("Uses: {}\n", "x".repeat(USE_EXCERPT_CHARS))));
        assert!(!prompt.contains(&"x".repeat(USE_EXCERPT_CHARS + 1)));
    }
}
