//! Stage 11: merge stage records into the canonical context.

use repolens_protocol::paths::depth;
use repolens_protocol::{
    CanonicalContext, ConfidenceLevel, EngineInfo, FrameworkInfo, NormalizedProject,
    ProjectProfile, SourceInfo, StructureSummary, TechnicalStack, ANALYSIS_TYPE, ENGINE_MODE,
    NOT_DETECTED, SOURCE_METHOD,
};

use crate::blueprint::BlueprintSelection;
use crate::classifier::Classification;
use crate::confidence::ConfidenceBreakdown;
use crate::evidence::EvidenceGraph;
use crate::proposal::Proposal;
use crate::rules::RuleResult;
use crate::scan::ScanResult;
use crate::scope::ScopeDefinition;
use crate::structure::StructureValidation;

pub const ENGINE_NAME: &str = "repolens";
pub const ENGINE_VERSION: &str = env!("CARGO_PKG_VERSION");

const LOW_CONFIDENCE: f64 = 0.5;

/// Borrowed view of every stage result the canonical record is built from.
pub(crate) struct Stages<'a> {
    pub project: &'a NormalizedProject,
    pub scan: &'a ScanResult,
    pub evidence: &'a EvidenceGraph,
    pub structure: &'a StructureValidation,
    pub classification: &'a Classification,
    pub blueprint: &'a BlueprintSelection,
    pub rules: &'a RuleResult,
    pub confidence: &'a ConfidenceBreakdown,
    pub scope: &'a ScopeDefinition,
    pub proposal: &'a Proposal,
}

pub(crate) fn assemble(stages: &Stages<'_>) -> CanonicalContext {
    let evidence = stages.evidence;
    let rules = stages.rules;
    let overall = stages.confidence.overall;

    let name = stages
        .project
        .repo_name
        .clone()
        .or_else(|| stages.scan.manifest_name.clone())
        .unwrap_or_else(|| NOT_DETECTED.to_string());

    CanonicalContext {
        engine: EngineInfo {
            name: ENGINE_NAME.to_string(),
            version: ENGINE_VERSION.to_string(),
            mode: ENGINE_MODE.to_string(),
            confidence_level: ConfidenceLevel::from_score(overall),
            analysis_type: ANALYSIS_TYPE.to_string(),
        },
        project: ProjectProfile {
            name,
            repository_type: rules.repository_type,
            blueprint: stages.blueprint.primary,
            intent: rules.intent,
            complexity: rules.complexity,
            statefulness: rules.statefulness,
            seo_relevant: rules.seo_relevant,
            auth_required: rules.auth_required,
        },
        audience: stages.proposal.audience.clone(),
        proposal: stages.proposal.section.clone(),
        technical_stack: TechnicalStack {
            framework: FrameworkInfo {
                name: evidence.framework.clone(),
                version: evidence.framework_version.clone(),
            },
            language: evidence.languages.clone(),
            styling: evidence.styling.clone(),
            ui_libraries: evidence.ui_libraries.clone(),
            animation: evidence.animation.clone(),
            state_management: evidence.state_libraries.clone(),
            auth: evidence.auth_provider.clone(),
            database: evidence.database.clone().or_else(|| evidence.orm.clone()),
            cms: evidence.cms.clone(),
            deployment: evidence.deployment_target.clone(),
        },
        structure: StructureSummary {
            routing_model: evidence.routing_model,
            folder_structure: top_level_folders(stages.project),
            entry_point: evidence.entry_point.clone(),
        },
        capabilities: stages.scope.capabilities.clone(),
        limitations: stages.scope.limitations.clone(),
        excluded_concepts: stages.scope.excluded_concepts.clone(),
        risk_flags: risk_flags(stages),
        source: SourceInfo {
            method: SOURCE_METHOD.to_string(),
            confidence: overall,
        },
    }
}

fn top_level_folders(project: &NormalizedProject) -> Vec<String> {
    project
        .folders
        .iter()
        .filter(|folder| depth(folder) == 1 && !folder.starts_with('.'))
        .cloned()
        .collect()
}

fn risk_flags(stages: &Stages<'_>) -> Vec<String> {
    let e = stages.evidence;
    let flags = [
        (
            "auth_library_without_usage",
            e.has_auth_library && !e.has_auth_usage,
        ),
        (
            "checkout_without_payment_provider",
            e.has_checkout && !e.has_payment_provider,
        ),
        (
            "database_without_migrations",
            e.has_database && !e.has_migrations,
        ),
        ("no_automated_tests", !e.has_tests),
        (
            "structure_override_applied",
            stages.structure.should_override_intent && stages.structure.forced_intent.is_some(),
        ),
        (
            "classification_divergence",
            stages.classification.intent != stages.rules.intent,
        ),
        (
            "low_confidence",
            stages.confidence.overall < LOW_CONFIDENCE,
        ),
    ];
    flags
        .iter()
        .filter(|(_, raised)| *raised)
        .map(|(flag, _)| flag.to_string())
        .collect()
}
