//! Parsing of `generateContent` responses.

use serde::{Deserialize, Serialize};

use medrec_core::ServiceError;

/// Response body of a `generateContent` call.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateResponse {
    #[serde(default)]
    pub candidates: Vec<ResponseCandidate>,
    #[serde(default)]
    pub prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseCandidate {
    #[serde(default)]
    pub content: Option<Content>,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

/// A message: a role and its text parts.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub parts: Vec<Part>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Part {
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptFeedback {
    #[serde(default)]
    pub block_reason: Option<String>,
}

/// Parse a response body and return the cleaned text of the first candidate.
pub fn parse_response(body: &str) -> Result<String, ServiceError> {
    let response: GenerateResponse = serde_json::from_str(body)
        .map_err(|e| ServiceError::InvalidResponse(e.to_string()))?;
    extract_text(&response)
}

/// Cleaned text of the first candidate.
pub fn extract_text(response: &GenerateResponse) -> Result<String, ServiceError> {
    if let Some(reason) = response
        .prompt_feedback
        .as_ref()
        .and_then(|f| f.block_reason.as_deref())
    {
        return Err(ServiceError::InvalidResponse(format!(
            "prompt blocked: {}",
            reason
        )));
    }

    let text: String = response
        .candidates
        .first()
        .and_then(|c| c.content.as_ref())
        .map(|content| {
            content
                .parts
                .iter()
                .map(|p| p.text.as_str())
                .collect::<Vec<_>>()
                .join("")
        })
        .unwrap_or_default();

    let cleaned = clean_text(&text);
    if cleaned.is_empty() {
        return Err(ServiceError::EmptyResponse);
    }
    Ok(cleaned)
}

/// Strip markdown decoration and collapse whitespace.
pub fn clean_text(text: &str) -> String {
    let lines: Vec<String> = text
        .lines()
        .map(|line| {
            let line = line.trim();
            let line = line.trim_start_matches('#').trim_start();
            let line = line
                .strip_prefix("- ")
                .or_else(|| line.strip_prefix("* "))
                .unwrap_or(line);
            line.replace("**", "").replace('`', "").replace("__", "")
        })
        .filter(|line| !line.is_empty())
        .collect();

    lines
        .join(" ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
