//! Generators for testing without a hosted model.

use std::thread;
use std::time::Duration;

use medrec_core::{ServiceError, TextGenerator};

/// Returns a fixed text for every prompt.
#[derive(Debug, Clone)]
pub struct CannedGenerator {
    text: String,
}

impl CannedGenerator {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

impl TextGenerator for CannedGenerator {
    fn name(&self) -> &str {
        "canned"
    }

    fn generate(&self, _prompt: &str) -> Result<String, ServiceError> {
        Ok(self.text.clone())
    }
}

/// Builds a justification from the prompt's medicine and class lines, the
/// way a model would answer.
#[derive(Debug, Clone, Default)]
pub struct EchoGenerator;

impl TextGenerator for EchoGenerator {
    fn name(&self) -> &str {
        "echo"
    }

    fn generate(&self, prompt: &str) -> Result<String, ServiceError> {
        let field = |label: &str| {
            prompt
                .lines()
                .find_map(|line| line.strip_prefix(label))
                .map(str::trim)
                .unwrap_or("")
                .to_string()
        };
        let medicine = field("Top recommended medicine:");
        let class = field("Class:");
        let symptoms = field("Based on symptoms:");
        if medicine.is_empty() {
            return Err(ServiceError::InvalidResponse("prompt names no medicine".into()));
        }
        Ok(format!(
            "{} belongs to {} and is commonly used for {}.",
            medicine, class, symptoms
        ))
    }
}

/// Always fails with the given error.
#[derive(Debug, Clone)]
pub struct FailingGenerator {
    error: ServiceError,
}

impl FailingGenerator {
    pub fn new(error: ServiceError) -> Self {
        Self { error }
    }
}

impl TextGenerator for FailingGenerator {
    fn name(&self) -> &str {
        "failing"
    }

    fn generate(&self, _prompt: &str) -> Result<String, ServiceError> {
        Err(self.error.clone())
    }
}

/// Sleeps before answering, for timeout tests.
#[derive(Debug, Clone)]
pub struct SlowGenerator {
    delay: Duration,
    text: String,
}

impl SlowGenerator {
    pub fn new(delay: Duration, text: impl Into<String>) -> Self {
        Self {
            delay,
            text: text.into(),
        }
    }
}

impl TextGenerator for SlowGenerator {
    fn name(&self) -> &str {
        "slow"
    }

    fn generate(&self, _prompt: &str) -> Result<String, ServiceError> {
        thread::sleep(self.delay);
        Ok(self.text.clone())
    }
}
