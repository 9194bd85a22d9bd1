use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Inferred primary purpose of a project.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Intent {
    Inform,
    Present,
    Convert,
    Operate,
}

impl Intent {
    pub const ALL: [Intent; 4] = [
        Intent::Inform,
        Intent::Present,
        Intent::Convert,
        Intent::Operate,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Intent::Inform => "INFORM",
            Intent::Present => "PRESENT",
            Intent::Convert => "CONVERT",
            Intent::Operate => "OPERATE",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum RepositoryType {
    Static,
    Frontend,
    Backend,
    Fullstack,
}

impl RepositoryType {
    pub fn as_str(self) -> &'static str {
        match self {
            RepositoryType::Static => "static",
            RepositoryType::Frontend => "frontend",
            RepositoryType::Backend => "backend",
            RepositoryType::Fullstack => "fullstack",
        }
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum Complexity {
    Low,
    Medium,
    High,
}

impl Complexity {
    pub fn as_str(self) -> &'static str {
        match self {
            Complexity::Low => "low",
            Complexity::Medium => "medium",
            Complexity::High => "high",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Statefulness {
    Stateless,
    Stateful,
}

impl Statefulness {
    pub fn as_str(self) -> &'static str {
        match self {
            Statefulness::Stateless => "stateless",
            Statefulness::Stateful => "stateful",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum ConfidenceLevel {
    High,
    Medium,
    Low,
}

impl ConfidenceLevel {
    pub fn from_score(score: f64) -> Self {
        if score >= 0.75 {
            ConfidenceLevel::High
        } else if score >= 0.5 {
            ConfidenceLevel::Medium
        } else {
            ConfidenceLevel::Low
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub enum TechnicalLevel {
    NonTechnical,
    Mixed,
    Technical,
}

impl TechnicalLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            TechnicalLevel::NonTechnical => "non-technical",
            TechnicalLevel::Mixed => "mixed",
            TechnicalLevel::Technical => "technical",
        }
    }
}

/// Named project archetype. Declaration order is also the scoring tie-break order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
pub enum Blueprint {
    #[serde(rename = "ContentSiteBlueprint")]
    ContentSite,
    #[serde(rename = "LandingCROBlueprint")]
    LandingCro,
    #[serde(rename = "SaaSAppBlueprint")]
    SaasApp,
    #[serde(rename = "DashboardBlueprint")]
    Dashboard,
    #[serde(rename = "EcommerceBlueprint")]
    Ecommerce,
    #[serde(rename = "PortfolioBlueprint")]
    Portfolio,
    #[serde(rename = "DocumentationBlueprint")]
    Documentation,
    #[serde(rename = "InternalToolBlueprint")]
    InternalTool,
    #[serde(rename = "APIServiceBlueprint")]
    ApiService,
    #[serde(rename = "AutomationScriptBlueprint")]
    AutomationScript,
}

impl Blueprint {
    pub const ALL: [Blueprint; 10] = [
        Blueprint::ContentSite,
        Blueprint::LandingCro,
        Blueprint::SaasApp,
        Blueprint::Dashboard,
        Blueprint::Ecommerce,
        Blueprint::Portfolio,
        Blueprint::Documentation,
        Blueprint::InternalTool,
        Blueprint::ApiService,
        Blueprint::AutomationScript,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Blueprint::ContentSite => "ContentSiteBlueprint",
            Blueprint::LandingCro => "LandingCROBlueprint",
            Blueprint::SaasApp => "SaaSAppBlueprint",
            Blueprint::Dashboard => "DashboardBlueprint",
            Blueprint::Ecommerce => "EcommerceBlueprint",
            Blueprint::Portfolio => "PortfolioBlueprint",
            Blueprint::Documentation => "DocumentationBlueprint",
            Blueprint::InternalTool => "InternalToolBlueprint",
            Blueprint::ApiService => "APIServiceBlueprint",
            Blueprint::AutomationScript => "AutomationScriptBlueprint",
        }
    }
}

impl std::fmt::Display for Blueprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "kebab-case")]
pub enum RoutingModel {
    AppRouter,
    PagesRouter,
    Sveltekit,
    NuxtPages,
    Remix,
    FileBased,
    StaticHtml,
    ServerRoutes,
    #[serde(rename = "none")]
    #[default]
    NotDetected,
}

impl RoutingModel {
    pub fn as_str(self) -> &'static str {
        match self {
            RoutingModel::AppRouter => "app-router",
            RoutingModel::PagesRouter => "pages-router",
            RoutingModel::Sveltekit => "sveltekit",
            RoutingModel::NuxtPages => "nuxt-pages",
            RoutingModel::Remix => "remix",
            RoutingModel::FileBased => "file-based",
            RoutingModel::StaticHtml => "static-html",
            RoutingModel::ServerRoutes => "server-routes",
            RoutingModel::NotDetected => "none",
        }
    }
}

pub const ENGINE_MODE: &str = "deterministic";
pub const ANALYSIS_TYPE: &str = "static";
pub const SOURCE_METHOD: &str = "static-analysis";
pub const NOT_DETECTED: &str = "Not detected";

/// Final immutable record of one analysis run. Field order is the wire order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct CanonicalContext {
    pub engine: EngineInfo,
    pub project: ProjectProfile,
    pub audience: AudienceProfile,
    pub proposal: ProposalSection,
    pub technical_stack: TechnicalStack,
    pub structure: StructureSummary,
    pub capabilities: Vec<String>,
    pub limitations: Vec<String>,
    pub excluded_concepts: Vec<String>,
    pub risk_flags: Vec<String>,
    pub source: SourceInfo,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct EngineInfo {
    pub name: String,
    pub version: String,
    pub mode: String,
    pub confidence_level: ConfidenceLevel,
    pub analysis_type: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ProjectProfile {
    pub name: String,
    pub repository_type: RepositoryType,
    pub blueprint: Blueprint,
    pub intent: Intent,
    pub complexity: Complexity,
    pub statefulness: Statefulness,
    pub seo_relevant: bool,
    pub auth_required: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct AudienceProfile {
    pub primary: String,
    pub technical_level: TechnicalLevel,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ProposalSection {
    pub what_it_is: Vec<String>,
    pub what_it_does: Vec<String>,
    pub what_it_does_not_do: Vec<String>,
    pub core_value_proposition: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct FrameworkInfo {
    pub name: Option<String>,
    pub version: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct TechnicalStack {
    pub framework: FrameworkInfo,
    pub language: Vec<String>,
    pub styling: Vec<String>,
    pub ui_libraries: Vec<String>,
    pub animation: Vec<String>,
    pub state_management: Vec<String>,
    pub auth: Option<String>,
    pub database: Option<String>,
    pub cms: Option<String>,
    pub deployment: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct StructureSummary {
    pub routing_model: RoutingModel,
    pub folder_structure: Vec<String>,
    pub entry_point: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SourceInfo {
    pub method: String,
    pub confidence: f64,
}
