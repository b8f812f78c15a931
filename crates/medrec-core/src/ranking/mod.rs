//! Symptom matching and recommendation ranking.
//!
//! Matching is lexical: a medicine scores one point per query term found in
//! its usage text. Ranking then fuses that score with classifier confidence
//! when model artifacts are loaded.

mod fusion;
mod matcher;
mod strategy;

pub use fusion::*;
pub use matcher::*;
pub use strategy::*;
