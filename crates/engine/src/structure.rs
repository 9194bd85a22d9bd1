//! Stage 5: structural dominance and intent override.

use repolens_protocol::Intent;
use serde::Serialize;

use crate::intent::IntentResult;
use crate::scoring::clamp_confidence;
use crate::signals::{MutationFrequency, ProjectSignals};
use crate::taxonomy::{Domain, ProjectType};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DominantStructure {
    Editorial,
    Presentational,
    Operational,
    Hybrid,
}

impl DominantStructure {
    /// The only intent this structure is compatible with, if any.
    fn implied_intent(self) -> Option<Intent> {
        match self {
            DominantStructure::Editorial => Some(Intent::Inform),
            DominantStructure::Operational => Some(Intent::Operate),
            DominantStructure::Presentational | DominantStructure::Hybrid => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StructureValidation {
    pub dominant_structure: DominantStructure,
    pub structural_confidence: f64,
    pub forced_intent: Option<Intent>,
    pub forced_domain: Option<Domain>,
    pub forced_type: Option<ProjectType>,
    pub should_override_intent: bool,
    pub reason: String,
}

struct StructureRule {
    structure: DominantStructure,
    confidence: f64,
    intent: Intent,
    domain: Domain,
    project_type: ProjectType,
    reason: &'static str,
    matches: fn(&ProjectSignals) -> bool,
}

/// Evaluated in order; the first match wins.
const STRUCTURE_RULES: &[StructureRule] = &[
    StructureRule {
        structure: DominantStructure::Editorial,
        confidence: 0.9,
        intent: Intent::Inform,
        domain: Domain::Content,
        project_type: ProjectType::Blog,
        reason: "blog posts with editorial flow, frequent content changes and dynamic routes",
        matches: |s| {
            s.has_blog_posts
                && s.has_editorial_flow
                && s.mutation_is(MutationFrequency::High)
                && s.dynamic_routes
        },
    },
    StructureRule {
        structure: DominantStructure::Editorial,
        confidence: 0.85,
        intent: Intent::Inform,
        domain: Domain::Content,
        project_type: ProjectType::Blog,
        reason: "blog posts with editorial flow",
        matches: |s| {
            s.has_blog_posts
                && s.has_editorial_flow
                && s.content_mutation_frequency.is_some()
                && !s.mutation_is(MutationFrequency::Low)
        },
    },
    StructureRule {
        structure: DominantStructure::Presentational,
        confidence: 0.85,
        intent: Intent::Present,
        domain: Domain::Product,
        project_type: ProjectType::Landing,
        reason: "single page with static content",
        matches: |s| {
            s.one_page
                && s.mutation_is(MutationFrequency::Low)
                && !s.has_editorial_flow
                && !s.has_blog_posts
        },
    },
    StructureRule {
        structure: DominantStructure::Operational,
        confidence: 0.9,
        intent: Intent::Operate,
        domain: Domain::Service,
        project_type: ProjectType::Saas,
        reason: "authenticated dashboard with application state",
        matches: |s| s.has_dashboard_ui && s.auth_usage_detected == Some(true) && s.app_state,
    },
    StructureRule {
        structure: DominantStructure::Operational,
        confidence: 0.8,
        intent: Intent::Operate,
        domain: Domain::Service,
        project_type: ProjectType::Saas,
        reason: "authenticated dashboard",
        matches: |s| s.has_dashboard_ui && s.auth_usage_detected == Some(true),
    },
];

const HYBRID_CONFIDENCE: f64 = 0.6;

pub fn validate_structure(signals: &ProjectSignals, intent: &IntentResult) -> StructureValidation {
    let validation = match STRUCTURE_RULES.iter().find(|rule| (rule.matches)(signals)) {
        Some(rule) => StructureValidation {
            dominant_structure: rule.structure,
            structural_confidence: rule.confidence,
            forced_intent: Some(rule.intent),
            forced_domain: Some(rule.domain),
            forced_type: Some(rule.project_type),
            should_override_intent: should_override(rule.structure, rule.confidence, intent),
            reason: rule.reason.to_string(),
        },
        None => StructureValidation {
            dominant_structure: DominantStructure::Hybrid,
            structural_confidence: HYBRID_CONFIDENCE,
            forced_intent: None,
            forced_domain: None,
            forced_type: None,
            should_override_intent: false,
            reason: "no dominant structure".to_string(),
        },
    };
    log::debug!(
        "structure: {:?} at {:.2}, override={}",
        validation.dominant_structure,
        validation.structural_confidence,
        validation.should_override_intent
    );
    validation
}

fn should_override(structure: DominantStructure, confidence: f64, intent: &IntentResult) -> bool {
    let strong = confidence >= 0.8 && intent.confidence < 0.7;
    let contradicts = structure
        .implied_intent()
        .is_some_and(|implied| implied != intent.primary_intent);
    strong || contradicts
}

/// The intent downstream stages should use once any override is applied.
pub fn apply_override(intent: &IntentResult, validation: &StructureValidation) -> IntentResult {
    match validation.forced_intent {
        Some(forced) if validation.should_override_intent => IntentResult {
            scores: intent.scores,
            primary_intent: forced,
            secondary_intent: (intent.primary_intent != forced).then_some(intent.primary_intent),
            confidence: clamp_confidence(validation.structural_confidence),
        },
        _ => intent.clone(),
    }
}
