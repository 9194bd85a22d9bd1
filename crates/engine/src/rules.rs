//! Stage 7: evidence rules.
//!
//! Reads only the evidence graph. Its fields become the canonical project
//! profile; the reasoning lines stay in diagnostics.

use repolens_protocol::{Complexity, Intent, RepositoryType, Statefulness};
use serde::Serialize;

use crate::evidence::EvidenceGraph;

const LOW_COMPLEXITY_MAX: usize = 5;
const MEDIUM_COMPLEXITY_MAX: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleResult {
    pub repository_type: RepositoryType,
    pub intent: Intent,
    pub complexity: Complexity,
    pub complexity_score: usize,
    pub statefulness: Statefulness,
    pub seo_relevant: bool,
    pub auth_required: bool,
    pub reasoning: Vec<String>,
}

pub fn apply_rules(evidence: &EvidenceGraph) -> RuleResult {
    let mut reasoning = Vec::new();

    let repository_type = if evidence.has_backend && evidence.has_database {
        reasoning.push("repository_type: backend and database present => fullstack".to_string());
        RepositoryType::Fullstack
    } else if evidence.has_backend {
        reasoning.push("repository_type: backend without database => backend".to_string());
        RepositoryType::Backend
    } else if evidence.framework.is_none() {
        reasoning.push("repository_type: no framework detected => static".to_string());
        RepositoryType::Static
    } else if !evidence.has_api_routes && !evidence.has_database {
        reasoning.push("repository_type: no api routes and no database => static".to_string());
        RepositoryType::Static
    } else {
        reasoning
            .push("repository_type: framework with api routes or data => frontend".to_string());
        RepositoryType::Frontend
    };

    let intent = if evidence.has_checkout || evidence.has_products {
        reasoning.push("intent: checkout or products present => CONVERT".to_string());
        Intent::Convert
    } else if evidence.has_dashboard && evidence.has_auth_usage {
        reasoning.push("intent: dashboard with auth usage => OPERATE".to_string());
        Intent::Operate
    } else if (evidence.has_seo_files || evidence.has_head_metadata) && evidence.has_blog_structure
    {
        reasoning.push("intent: seo surface with blog structure => INFORM".to_string());
        Intent::Inform
    } else {
        reasoning.push("intent: no stronger rule matched => PRESENT".to_string());
        Intent::Present
    };

    let complexity_score =
        evidence.route_count + evidence.integration_count + evidence.external_service_count;
    let complexity = match complexity_score {
        n if n <= LOW_COMPLEXITY_MAX => Complexity::Low,
        n if n <= MEDIUM_COMPLEXITY_MAX => Complexity::Medium,
        _ => Complexity::High,
    };
    reasoning.push(format!(
        "complexity: {} routes + {} integrations + {} external services = {complexity_score} => {}",
        evidence.route_count,
        evidence.integration_count,
        evidence.external_service_count,
        complexity.as_str()
    ));

    let statefulness = if evidence.has_database || evidence.has_global_state {
        Statefulness::Stateful
    } else {
        Statefulness::Stateless
    };
    reasoning.push(format!(
        "statefulness: database={} global_state={} => {}",
        evidence.has_database,
        evidence.has_global_state,
        statefulness.as_str()
    ));

    let seo_relevant = evidence.has_head_metadata && evidence.has_open_graph;
    reasoning.push(format!(
        "seo_relevant: head_metadata={} open_graph={} => {seo_relevant}",
        evidence.has_head_metadata, evidence.has_open_graph
    ));

    let auth_required = evidence.has_auth_library || evidence.has_auth_usage;
    reasoning.push(format!(
        "auth_required: library={} usage={} => {auth_required}",
        evidence.has_auth_library, evidence.has_auth_usage
    ));

    log::debug!(
        "rules: {} {} {} {}",
        repository_type.as_str(),
        intent.as_str(),
        complexity.as_str(),
        statefulness.as_str()
    );

    RuleResult {
        repository_type,
        intent,
        complexity,
        complexity_score,
        statefulness,
        seo_relevant,
        auth_required,
        reasoning,
    }
}
