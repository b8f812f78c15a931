//! Prompt settings for explanation generation.
//!
//! The per-recommendation user prompt is built by
//! `medrec_core::explain::explanation_prompt`; this module holds what is
//! specific to calling a hosted model.

/// System instruction sent with every explanation request.
pub const SYSTEM_INSTRUCTION: &str = r#"You are a pharmacology assistant writing short justifications for medicine suggestions.

Rules:
- Answer in 2-3 plain sentences, no lists, no markdown.
- Explain how the medicine's listed uses relate to the reported symptoms.
- Do not give dosing instructions.
- Do not claim the suggestion is a diagnosis; it is informational only."#;

/// Sampling temperature. Low, since explanations should be factual.
pub const TEMPERATURE: f32 = 0.3;

/// Upper bound on generated tokens; the pipeline truncates further.
pub const MAX_OUTPUT_TOKENS: u32 = 256;
