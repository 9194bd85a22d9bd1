use repolens_protocol::{CanonicalContext, NormalizedProject};
use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::assemble::{assemble, Stages};
use crate::blueprint::{select_blueprint, BlueprintSelection};
use crate::classifier::{classify, Classification};
use crate::confidence::{compute_confidence, ConfidenceBreakdown};
use crate::error::{AnalysisError, Result};
use crate::evidence::{build_evidence, EvidenceGraph};
use crate::intent::{detect_intent, IntentResult};
use crate::layout::is_analyzable;
use crate::proposal::build_proposal;
use crate::rules::{apply_rules, RuleResult};
use crate::scan::{scan, ScanResult};
use crate::scope::define_scope;
use crate::signals::{collect_signals, ProjectSignals};
use crate::structure::{apply_override, validate_structure, StructureValidation};

/// Every intermediate stage record. Internal only; never rendered publicly.
#[derive(Debug, Clone, Serialize)]
pub struct Diagnostics {
    /// SHA-256 of the canonical input.
    pub fingerprint: String,
    pub scan: ScanResult,
    pub signals: ProjectSignals,
    pub evidence: EvidenceGraph,
    pub intent: IntentResult,
    pub effective_intent: IntentResult,
    pub structure: StructureValidation,
    pub classification: Classification,
    pub blueprint: BlueprintSelection,
    pub rules: RuleResult,
    pub confidence: ConfidenceBreakdown,
}

#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub canonical: CanonicalContext,
    pub diagnostics: Diagnostics,
}

/// SHA-256 over the canonical JSON form of `project`.
pub fn fingerprint(project: &NormalizedProject) -> Result<String> {
    let bytes = serde_json::to_vec(project)?;
    let mut hasher = Sha256::new();
    hasher.update(&bytes);
    Ok(format!("{:x}", hasher.finalize()))
}

/// Run every stage over `project` and assemble the canonical context.
pub fn analyze(project: &NormalizedProject) -> Result<AnalysisReport> {
    let project = project.clone().canonicalize();
    if project.is_empty() {
        return Err(AnalysisError::EmptyProject);
    }
    if !project.files.iter().any(|f| is_analyzable(f)) {
        return Err(AnalysisError::NoAnalyzableFiles {
            files: project.files.len(),
        });
    }
    let fingerprint = fingerprint(&project)?;
    log::debug!("analyzing {} files ({fingerprint})", project.files.len());

    let scan = scan(&project);
    let signals = collect_signals(&project, &scan);
    let evidence = build_evidence(&project, &scan, &signals);
    let intent = detect_intent(&signals);
    let structure = validate_structure(&signals, &intent);
    let effective_intent = apply_override(&intent, &structure);
    let classification = classify(&project);
    let blueprint = select_blueprint(&signals, &effective_intent, &structure, &classification);
    let rules = apply_rules(&evidence);
    let confidence = compute_confidence(
        &structure,
        &intent.scores,
        intent.scores.get(effective_intent.primary_intent),
        &signals,
    );
    let scope = define_scope(&evidence);
    let proposal = build_proposal(
        blueprint.primary,
        rules.intent,
        rules.repository_type,
        &evidence,
        &scope,
    );

    let canonical = assemble(&Stages {
        project: &project,
        scan: &scan,
        evidence: &evidence,
        structure: &structure,
        classification: &classification,
        blueprint: &blueprint,
        rules: &rules,
        confidence: &confidence,
        scope: &scope,
        proposal: &proposal,
    });
    log::debug!(
        "canonical: {} {} ({:.2})",
        canonical.project.intent.as_str(),
        canonical.project.blueprint,
        canonical.source.confidence
    );

    Ok(AnalysisReport {
        canonical,
        diagnostics: Diagnostics {
            fingerprint,
            scan,
            signals,
            evidence,
            intent,
            effective_intent,
            structure,
            classification,
            blueprint,
            rules,
            confidence,
        },
    })
}
