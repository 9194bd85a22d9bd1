use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::context::{
    Complexity, Intent, ProposalSection, RepositoryType, Statefulness, StructureSummary,
    TechnicalLevel, TechnicalStack,
};

/// Redacted projection of a canonical context for external consumers.
///
/// Every field here is explicitly allow-listed. Engine metadata, archetype
/// names, risk flags and numeric scores have no representation in this type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct PublicContext {
    pub project: PublicProject,
    /// Human roles this project is built for.
    pub audience: Vec<String>,
    pub technical_level: TechnicalLevel,
    pub proposal: ProposalSection,
    pub technical_stack: TechnicalStack,
    pub structure: StructureSummary,
    pub capabilities: Vec<String>,
    pub limitations: Vec<String>,
    pub excluded_concepts: Vec<String>,
    pub source: PublicSource,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct PublicProject {
    pub name: String,
    pub repository_type: RepositoryType,
    pub intent: Intent,
    pub complexity: Complexity,
    pub statefulness: Statefulness,
    pub seo_relevant: bool,
    pub auth_required: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct PublicSource {
    pub method: String,
}
