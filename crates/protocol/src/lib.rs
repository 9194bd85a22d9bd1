//! Wire contract for RepoLens.
//!
//! - [`NormalizedProject`]: what an ingestion collaborator hands to the engine.
//! - [`CanonicalContext`]: the deterministic, schema-stable engine output.
//! - [`PublicContext`]: the allow-listed projection safe to show outside the engine.

use anyhow::Result;
use serde::Serialize;

pub mod context;
pub mod paths;
pub mod project;
pub mod public;

pub use context::{
    AudienceProfile, Blueprint, CanonicalContext, Complexity, ConfidenceLevel, EngineInfo,
    FrameworkInfo, Intent, ProjectProfile, ProposalSection, RepositoryType, RoutingModel,
    SourceInfo, Statefulness, StructureSummary, TechnicalLevel, TechnicalStack, ANALYSIS_TYPE,
    ENGINE_MODE, NOT_DETECTED, SOURCE_METHOD,
};
pub use project::NormalizedProject;
pub use public::{PublicContext, PublicProject, PublicSource};

pub fn serialize_json_pretty<T: Serialize>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).map_err(Into::into)
}

/// JSON Schema of the canonical record.
pub fn canonical_schema() -> Result<serde_json::Value> {
    serde_json::to_value(schemars::schema_for!(CanonicalContext)).map_err(Into::into)
}

/// JSON Schema of the public projection.
pub fn public_schema() -> Result<serde_json::Value> {
    serde_json::to_value(schemars::schema_for!(PublicContext)).map_err(Into::into)
}

/// JSON Schema of the ingestion contract.
pub fn input_schema() -> Result<serde_json::Value> {
    serde_json::to_value(schemars::schema_for!(NormalizedProject)).map_err(Into::into)
}
