//! Deterministic project-understanding engine for RepoLens.
//!
//! Turns a [`NormalizedProject`](repolens_protocol::NormalizedProject) into a
//! [`CanonicalContext`](repolens_protocol::CanonicalContext) through a fixed
//! chain of pure stages:
//!
//! scan → signals → evidence → intent → structure → classifier → blueprint →
//! rules → confidence → scope → proposal → assemble
//!
//! The same input always yields byte-identical output. Every confidence value
//! lies in `[0, MAX_CONFIDENCE]`.

mod assemble;
mod catalog;
mod error;
mod layout;
mod manifest;
mod pipeline;
mod scoring;

pub mod blueprint;
pub mod classifier;
pub mod confidence;
pub mod evidence;
pub mod intent;
pub mod output;
pub mod proposal;
pub mod rules;
pub mod scan;
pub mod scope;
pub mod signals;
pub mod structure;
pub mod taxonomy;

/// Upper bound for every confidence the engine reports.
pub const MAX_CONFIDENCE: f64 = 0.95;

pub use assemble::{ENGINE_NAME, ENGINE_VERSION};
pub use error::{AnalysisError, Result};
pub use output::{render, to_public, CanonicalOutput};
pub use pipeline::{analyze, fingerprint, AnalysisReport, Diagnostics};
