//! Domain models for the medrec pipeline.

mod catalog;
mod cluster;
mod patient;
mod recommendation;
mod safety;

pub use catalog::*;
pub use cluster::*;
pub use patient::*;
pub use recommendation::*;
pub use safety::*;
