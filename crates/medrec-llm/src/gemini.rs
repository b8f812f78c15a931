//! Gemini `generateContent` backend.
//!
//! The HTTP client is only compiled with the `gemini` feature. Without it,
//! or without an API key, the backend reports itself unavailable and the
//! pipeline keeps its template explanations.

use std::time::Duration;

use serde::Serialize;
use tracing::debug;

use medrec_core::{ServiceError, TextGenerator};

use crate::prompts::{MAX_OUTPUT_TOKENS, SYSTEM_INSTRUCTION, TEMPERATURE};
use crate::response::{Content, Part};

/// Environment variable holding the API key.
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";
/// Environment variable overriding the model name.
pub const MODEL_ENV: &str = "GEMINI_MODEL";
/// Model used when `GEMINI_MODEL` is unset.
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
/// REST endpoint base.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Gemini connection settings.
#[derive(Clone)]
pub struct GeminiConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
    /// HTTP timeout; the pipeline applies its own timeout on top
    pub timeout: Duration,
}

impl std::fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(10),
        }
    }
}

impl GeminiConfig {
    /// Read `GEMINI_API_KEY` and `GEMINI_MODEL`.
    pub fn from_env() -> Self {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    fn from_vars(var: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        config.api_key = var(API_KEY_ENV)
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty());
        if let Some(model) = var(MODEL_ENV).map(|m| m.trim().to_string()).filter(|m| !m.is_empty()) {
            config.model = model;
        }
        config
    }

    pub fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        )
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    system_instruction: Content,
    contents: Vec<Content>,
    generation_config: GenerationConfig<'a>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig<'a> {
    temperature: f32,
    max_output_tokens: u32,
    response_mime_type: &'a str,
}

#[cfg_attr(not(feature = "gemini"), allow(dead_code))]
fn build_request(prompt: &str) -> GenerateRequest<'static> {
    GenerateRequest {
        system_instruction: Content {
            role: None,
            parts: vec![Part {
                text: SYSTEM_INSTRUCTION.to_string(),
            }],
        },
        contents: vec![Content {
            role: Some("user".to_string()),
            parts: vec![Part {
                text: prompt.to_string(),
            }],
        }],
        generation_config: GenerationConfig {
            temperature: TEMPERATURE,
            max_output_tokens: MAX_OUTPUT_TOKENS,
            response_mime_type: "text/plain",
        },
    }
}

/// Text generator backed by the Gemini REST API.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    config: GeminiConfig,
}

impl GeminiClient {
    pub fn new(config: GeminiConfig) -> Self {
        Self { config }
    }

    pub fn from_env() -> Self {
        Self::new(GeminiConfig::from_env())
    }

    pub fn config(&self) -> &GeminiConfig {
        &self.config
    }

    #[cfg(feature = "gemini")]
    fn post(&self, api_key: &str, prompt: &str) -> Result<String, ServiceError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(self.config.timeout)
            .build()
            .map_err(|e| ServiceError::Request(e.to_string()))?;

        let response = client
            .post(self.config.endpoint())
            .header("x-goog-api-key", api_key)
            .json(&build_request(prompt))
            .send()
            .map_err(|e| {
                if e.is_timeout() {
                    ServiceError::Timeout(self.config.timeout)
                } else {
                    ServiceError::Request(e.to_string())
                }
            })?;

        let status = response.status();
        let body = response
            .text()
            .map_err(|e| ServiceError::Request(e.to_string()))?;
        if !status.is_success() {
            let snippet: String = body.chars().take(200).collect();
            return Err(ServiceError::Request(format!("HTTP {}: {}", status, snippet)));
        }
        crate::response::parse_response(&body)
    }

    #[cfg(not(feature = "gemini"))]
    fn post(&self, _api_key: &str, _prompt: &str) -> Result<String, ServiceError> {
        Err(ServiceError::Unavailable("gemini feature not enabled".into()))
    }
}

impl TextGenerator for GeminiClient {
    fn name(&self) -> &str {
        "gemini"
    }

    fn is_available(&self) -> bool {
        cfg!(feature = "gemini") && self.config.api_key.is_some()
    }

    fn generate(&self, prompt: &str) -> Result<String, ServiceError> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or_else(|| ServiceError::Unavailable(format!("{} is not set", API_KEY_ENV)))?;

        debug!(model = %self.config.model, prompt_chars = prompt.len(), "requesting explanation");
        self.post(api_key, prompt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_config_from_vars() {
        let vars: HashMap<&str, &str> = [(API_KEY_ENV, " secret "), (MODEL_ENV, "gemini-2.0-pro")]
            .into_iter()
            .collect();
        let config = GeminiConfig::from_vars(|k| vars.get(k).map(|v| v.to_string()));

        assert_eq!(config.api_key.as_deref(), Some("secret"));
        assert_eq!(config.model, "gemini-2.0-pro");
        assert_eq!(
            config.endpoint(),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.0-pro:generateContent"
        );
        assert!(!format!("{:?}", config).contains("secret"));
    }

    #[test]
    fn test_defaults_without_env() {
        let config = GeminiConfig::from_vars(|_| None);
        assert!(config.api_key.is_none());
        assert_eq!(config.model, DEFAULT_MODEL);
    }

    #[test]
    fn test_without_key_is_unavailable() {
        let client = GeminiClient::new(GeminiConfig::default());
        assert!(!client.is_available());
        assert!(matches!(
            client.generate("prompt"),
            Err(ServiceError::Unavailable(_))
        ));
    }

    #[test]
    fn test_request_shape() {
        let json = serde_json::to_value(build_request("Based on symptoms: fever")).unwrap();
        assert_eq!(json["contents"][0]["role"], "user");
        assert_eq!(json["contents"][0]["parts"][0]["text"], "Based on symptoms: fever");
        assert!(json["systemInstruction"]["parts"][0]["text"]
            .as_str()
            .unwrap()
            .contains("2-3 plain sentences"));
        assert_eq!(json["generationConfig"]["maxOutputTokens"], MAX_OUTPUT_TOKENS);
        assert!(json["systemInstruction"].get("role").is_none());
    }

    #[cfg(not(feature = "gemini"))]
    #[test]
    fn test_feature_disabled_reports_unavailable() {
        let client = GeminiClient::new(GeminiConfig {
            api_key: Some("key".into()),
            ..GeminiConfig::default()
        });
        assert!(!client.is_available());
        assert!(matches!(
            client.generate("prompt"),
            Err(ServiceError::Unavailable(_))
        ));
    }
}
