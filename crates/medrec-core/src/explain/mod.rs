//! Recommendation explanations.
//!
//! Every recommendation carries a deterministic template explanation. When a
//! [`TextGenerator`] backend is configured, [`ExplanationGenerator`] may
//! append generated text to the top recommendation; any backend failure
//! leaves the template text in place.

mod prompt;
mod template;
mod text;

pub use prompt::*;
pub use template::*;
pub use text::*;

use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use thiserror::Error;
use tracing::{debug, warn};

use crate::models::{MedicineRecord, Recommendation};

/// Default time allowed for one generation call.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(8);

/// Default cap on generated text length, in characters.
pub const DEFAULT_MAX_CHARS: usize = 300;

/// Errors from an external text generation service.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ServiceError {
    #[error("Text generation unavailable: {0}")]
    Unavailable(String),

    #[error("Text generation request failed: {0}")]
    Request(String),

    #[error("Text generation timed out after {0:?}")]
    Timeout(Duration),

    #[error("Text generation returned no text")]
    EmptyResponse,

    #[error("Malformed text generation response: {0}")]
    InvalidResponse(String),
}

/// Backend that turns a prompt into free text.
pub trait TextGenerator: Send + Sync {
    /// Short backend name for status reporting.
    fn name(&self) -> &str;

    /// Whether the backend is configured to make calls.
    fn is_available(&self) -> bool {
        true
    }

    fn generate(&self, prompt: &str) -> Result<String, ServiceError>;
}

/// Attaches generated text to recommendations, bounded in time and length.
#[derive(Clone)]
pub struct ExplanationGenerator {
    backend: Option<Arc<dyn TextGenerator>>,
    timeout: Duration,
    max_chars: usize,
}

impl std::fmt::Debug for ExplanationGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExplanationGenerator")
            .field("backend", &self.backend_name())
            .field("timeout", &self.timeout)
            .field("max_chars", &self.max_chars)
            .finish()
    }
}

impl Default for ExplanationGenerator {
    fn default() -> Self {
        Self::template_only()
    }
}

impl ExplanationGenerator {
    /// Template explanations only.
    pub fn template_only() -> Self {
        Self {
            backend: None,
            timeout: DEFAULT_TIMEOUT,
            max_chars: DEFAULT_MAX_CHARS,
        }
    }

    pub fn with_backend(backend: Arc<dyn TextGenerator>) -> Self {
        Self {
            backend: Some(backend),
            ..Self::template_only()
        }
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn max_chars(mut self, max_chars: usize) -> Self {
        self.max_chars = max_chars;
        self
    }

    /// True when a backend is configured and reports itself available.
    pub fn is_available(&self) -> bool {
        self.backend.as_ref().is_some_and(|b| b.is_available())
    }

    pub fn backend_name(&self) -> &str {
        self.backend.as_deref().map_or("template", |b| b.name())
    }

    /// Run the backend on `prompt`, giving up after the configured timeout.
    ///
    /// A timed-out call keeps running on its worker thread; its result is
    /// discarded.
    pub fn generate(&self, prompt: &str) -> Result<String, ServiceError> {
        let backend = match &self.backend {
            Some(b) if b.is_available() => Arc::clone(b),
            Some(b) => return Err(ServiceError::Unavailable(b.name().to_string())),
            None => return Err(ServiceError::Unavailable("no backend configured".into())),
        };

        let (tx, rx) = mpsc::channel();
        let prompt = prompt.to_string();
        thread::Builder::new()
            .name("medrec-explain".into())
            .spawn(move || {
                // Receiver may be gone after a timeout
                let _ = tx.send(backend.generate(&prompt));
            })
            .map_err(|e| ServiceError::Request(e.to_string()))?;

        let raw = match rx.recv_timeout(self.timeout) {
            Ok(result) => result?,
            Err(RecvTimeoutError::Timeout) => return Err(ServiceError::Timeout(self.timeout)),
            Err(RecvTimeoutError::Disconnected) => {
                return Err(ServiceError::Request("generation worker exited".into()))
            }
        };

        let cleaned = tidy(&raw, self.max_chars);
        if cleaned.is_empty() {
            return Err(ServiceError::EmptyResponse);
        }
        Ok(cleaned)
    }

    /// Append generated text to `rec.explanation`.
    ///
    /// Returns whether text was added. Failures are logged and leave the
    /// recommendation unchanged.
    pub fn enrich(&self, rec: &mut Recommendation, symptoms: &[String], record: &MedicineRecord) -> bool {
        if self.backend.is_none() {
            return false;
        }

        let prompt = explanation_prompt(symptoms, rec, record.primary_use().unwrap_or(""));
        match self.generate(&prompt) {
            Ok(text) => {
                debug!(
                    backend = self.backend_name(),
                    medicine = %rec.medicine_name,
                    chars = text.chars().count(),
                    "generated explanation"
                );
                rec.explanation.push(' ');
                rec.explanation.push_str(&text);
                true
            }
            Err(e) => {
                warn!(
                    backend = self.backend_name(),
                    medicine = %rec.medicine_name,
                    error = %e,
                    "explanation generation failed, keeping template text"
                );
                false
            }
        }
    }
}
