//! Language-model explanation backends for medrec.
//!
//! Implementations of [`medrec_core::TextGenerator`]: a Gemini REST client
//! (HTTP only with the `gemini` feature) and mock generators for tests.

pub mod gemini;
pub mod mock;
pub mod prompts;
pub mod response;

pub use gemini::*;
pub use mock::*;
pub use prompts::*;
pub use response::*;
