//! Stage 10: proposal and audience templates.
//!
//! Text is assembled from fixed fragments keyed by blueprint, intent and
//! evidence; nothing is generated free-form.

use repolens_protocol::{
    AudienceProfile, Blueprint, Intent, ProposalSection, RepositoryType, TechnicalLevel,
};
use serde::Serialize;

use crate::evidence::EvidenceGraph;
use crate::scope::ScopeDefinition;

struct Template {
    what_it_is: &'static str,
    value: &'static str,
    roles: &'static [&'static str],
    technical_level: TechnicalLevel,
}

fn template(blueprint: Blueprint) -> Template {
    match blueprint {
        Blueprint::ContentSite => Template {
            what_it_is: "A content website for publishing articles",
            value: "Publishes written content",
            roles: &["Readers", "Subscribers"],
            technical_level: TechnicalLevel::NonTechnical,
        },
        Blueprint::LandingCro => Template {
            what_it_is: "A marketing landing page",
            value: "Presents a product on a focused page",
            roles: &["Prospective customers", "Marketing teams"],
            technical_level: TechnicalLevel::NonTechnical,
        },
        Blueprint::SaasApp => Template {
            what_it_is: "A software-as-a-service web application",
            value: "Gives signed-in users a hosted tool",
            roles: &["Registered users", "Account administrators"],
            technical_level: TechnicalLevel::Mixed,
        },
        Blueprint::Dashboard => Template {
            what_it_is: "A dashboard application",
            value: "Puts operational data on one screen",
            roles: &["Operators", "Analysts"],
            technical_level: TechnicalLevel::Mixed,
        },
        Blueprint::Ecommerce => Template {
            what_it_is: "An online store",
            value: "Sells products on the web",
            roles: &["Shoppers", "Store administrators"],
            technical_level: TechnicalLevel::NonTechnical,
        },
        Blueprint::Portfolio => Template {
            what_it_is: "A personal portfolio website",
            value: "Showcases a person and their work",
            roles: &["Recruiters", "Hiring managers", "Potential clients"],
            technical_level: TechnicalLevel::NonTechnical,
        },
        Blueprint::Documentation => Template {
            what_it_is: "A documentation website",
            value: "Explains how to use a product",
            roles: &["Developers", "Technical writers"],
            technical_level: TechnicalLevel::Technical,
        },
        Blueprint::InternalTool => Template {
            what_it_is: "An internal operations tool",
            value: "Supports day-to-day internal work",
            roles: &["Internal staff", "Operations teams"],
            technical_level: TechnicalLevel::Mixed,
        },
        Blueprint::ApiService => Template {
            what_it_is: "A backend API service",
            value: "Serves data and operations over HTTP",
            roles: &["API consumers", "Integrating developers"],
            technical_level: TechnicalLevel::Technical,
        },
        Blueprint::AutomationScript => Template {
            what_it_is: "An automation script",
            value: "Automates a repetitive task",
            roles: &["Developers", "DevOps engineers"],
            technical_level: TechnicalLevel::Technical,
        },
    }
}

fn intent_clause(intent: Intent) -> &'static str {
    match intent {
        Intent::Inform => "so visitors can find information quickly",
        Intent::Present => "so visitors understand what is being presented",
        Intent::Convert => "to turn visitors into customers",
        Intent::Operate => "so users can get their work done",
    }
}

fn repository_phrase(repository_type: RepositoryType) -> &'static str {
    match repository_type {
        RepositoryType::Static => "Static site without a server component",
        RepositoryType::Frontend => "Frontend application",
        RepositoryType::Backend => "Backend service",
        RepositoryType::Fullstack => "Full-stack application with a database",
    }
}

/// Human roles a blueprint is built for, most important first.
pub fn audience_roles(blueprint: Blueprint) -> Vec<String> {
    template(blueprint)
        .roles
        .iter()
        .map(|role| role.to_string())
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Proposal {
    pub section: ProposalSection,
    pub audience: AudienceProfile,
}

pub fn build_proposal(
    blueprint: Blueprint,
    intent: Intent,
    repository_type: RepositoryType,
    evidence: &EvidenceGraph,
    scope: &ScopeDefinition,
) -> Proposal {
    let template = template(blueprint);

    let mut what_it_is = vec![
        template.what_it_is.to_string(),
        repository_phrase(repository_type).to_string(),
    ];
    if let Some(framework) = &evidence.framework {
        what_it_is.push(format!("Built with {framework}"));
    } else if !evidence.languages.is_empty() {
        what_it_is.push(format!("Written in {}", evidence.languages.join(", ")));
    }

    let mut value = format!("{} {}", template.value, intent_clause(intent));
    if evidence.has_payment_provider && intent == Intent::Convert {
        value.push_str(", with online payments");
    }
    value.push('.');

    let roles = template.roles;
    Proposal {
        section: ProposalSection {
            what_it_is,
            what_it_does: scope.what_it_does.clone(),
            what_it_does_not_do: scope.what_it_does_not_do.clone(),
            core_value_proposition: value,
        },
        audience: AudienceProfile {
            primary: roles.first().map(|r| r.to_string()).unwrap_or_default(),
            technical_level: template.technical_level,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn portfolio_targets_recruiters() {
        assert_eq!(
            audience_roles(Blueprint::Portfolio),
            vec!["Recruiters", "Hiring managers", "Potential clients"]
        );
        let proposal = build_proposal(
            Blueprint::ApiService,
            Intent::Operate,
            RepositoryType::Backend,
            &EvidenceGraph::default(),
            &ScopeDefinition::default(),
        );
        assert_eq!(proposal.audience.technical_level, TechnicalLevel::Technical);
    }

    #[test]
    fn proposal_is_assembled_from_fragments() {
        let evidence = EvidenceGraph {
            framework: Some("Next.js".to_string()),
            has_payment_provider: true,
            ..EvidenceGraph::default()
        };
        let scope = ScopeDefinition {
            what_it_does: vec!["Lists products".to_string()],
            ..ScopeDefinition::default()
        };
        let proposal = build_proposal(
            Blueprint::Ecommerce,
            Intent::Convert,
            RepositoryType::Frontend,
            &evidence,
            &scope,
        );
        assert_eq!(
            proposal.section.what_it_is,
            vec!["An online store", "Frontend application", "Built with Next.js"]
        );
        assert_eq!(
            proposal.section.core_value_proposition,
            "Sells products on the web to turn visitors into customers, with online payments."
        );
        assert_eq!(proposal.section.what_it_does, vec!["Lists products"]);
        assert_eq!(proposal.audience.primary, "Shoppers");
    }

    #[test]
    fn languages_stand_in_for_a_missing_framework() {
        let evidence = EvidenceGraph {
            languages: vec!["Python".to_string()],
            ..EvidenceGraph::default()
        };
        let proposal = build_proposal(
            Blueprint::AutomationScript,
            Intent::Operate,
            RepositoryType::Static,
            &evidence,
            &ScopeDefinition::default(),
        );
        assert_eq!(proposal.section.what_it_is[2], "Written in Python");
    }
}
