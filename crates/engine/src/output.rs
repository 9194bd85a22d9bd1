//! Stage 12: public projection and renderings.

use repolens_protocol::{
    CanonicalContext, PublicContext, PublicProject, PublicSource, RoutingModel, NOT_DETECTED,
};
use serde::Serialize;

use crate::error::Result;
use crate::proposal::audience_roles;

const PROMPT_INSTRUCTIONS: &str = "\
You are describing a software project to a reader who has not seen its code.
Answer only from the facts in the JSON below.
Do not infer features, integrations or audiences that are not listed.
Anything listed under excluded_concepts is absent from the project; never describe it as present.
If a question asks about something the facts do not cover, answer \"Not detected\".";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CanonicalOutput {
    pub public: PublicContext,
    pub public_json: String,
    pub markdown: String,
    pub prompt: String,
}

/// Allow-listed projection: every public field is copied by name.
pub fn to_public(context: &CanonicalContext) -> PublicContext {
    let project = &context.project;
    PublicContext {
        project: PublicProject {
            name: project.name.clone(),
            repository_type: project.repository_type,
            intent: project.intent,
            complexity: project.complexity,
            statefulness: project.statefulness,
            seo_relevant: project.seo_relevant,
            auth_required: project.auth_required,
        },
        audience: audience_roles(project.blueprint),
        technical_level: context.audience.technical_level,
        proposal: context.proposal.clone(),
        technical_stack: context.technical_stack.clone(),
        structure: context.structure.clone(),
        capabilities: context.capabilities.clone(),
        limitations: context.limitations.clone(),
        excluded_concepts: context.excluded_concepts.clone(),
        source: PublicSource {
            method: context.source.method.clone(),
        },
    }
}

pub fn render(context: &CanonicalContext) -> Result<CanonicalOutput> {
    let public = to_public(context);
    let public_json = serde_json::to_string(&public)?;
    let markdown = render_markdown(&public);
    let prompt = render_prompt(&public)?;
    Ok(CanonicalOutput {
        public,
        public_json,
        markdown,
        prompt,
    })
}

pub fn render_prompt(public: &PublicContext) -> Result<String> {
    let json = serde_json::to_string_pretty(public)?;
    Ok(format!("{PROMPT_INSTRUCTIONS}\n\n```json\n{json}\n```\n"))
}

fn or_not_detected(value: Option<&str>) -> &str {
    value.filter(|v| !v.is_empty()).unwrap_or(NOT_DETECTED)
}

fn joined(values: &[String]) -> String {
    if values.is_empty() {
        NOT_DETECTED.to_string()
    } else {
        values.join(", ")
    }
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "yes"
    } else {
        "no"
    }
}

fn push_list(md: &mut String, title: &str, items: &[String]) {
    md.push_str(&format!("## {title}\n\n"));
    if items.is_empty() {
        md.push_str(&format!("- {NOT_DETECTED}\n"));
    }
    for item in items {
        md.push_str(&format!("- {item}\n"));
    }
    md.push('\n');
}

pub fn render_markdown(public: &PublicContext) -> String {
    let project = &public.project;
    let stack = &public.technical_stack;
    let structure = &public.structure;

    let mut md = String::new();
    md.push_str(&format!("# {}\n\n", project.name));

    md.push_str("## Overview\n\n");
    if public.proposal.what_it_is.is_empty() {
        md.push_str(&format!("{NOT_DETECTED}\n"));
    }
    for line in &public.proposal.what_it_is {
        md.push_str(&format!("- {line}\n"));
    }
    md.push_str(&format!(
        "\n{}\n\n",
        or_not_detected(Some(public.proposal.core_value_proposition.as_str()))
    ));

    md.push_str("## Audience\n\n");
    md.push_str(&format!("- Roles: {}\n", joined(&public.audience)));
    md.push_str(&format!(
        "- Technical level: {}\n\n",
        public.technical_level.as_str()
    ));

    md.push_str("## Project Profile\n\n");
    md.push_str(&format!(
        "- Repository type: {}\n",
        project.repository_type.as_str()
    ));
    md.push_str(&format!("- Intent: {}\n", project.intent.as_str()));
    md.push_str(&format!("- Complexity: {}\n", project.complexity.as_str()));
    md.push_str(&format!(
        "- Statefulness: {}\n",
        project.statefulness.as_str()
    ));
    md.push_str(&format!("- SEO relevant: {}\n", yes_no(project.seo_relevant)));
    md.push_str(&format!(
        "- Auth required: {}\n\n",
        yes_no(project.auth_required)
    ));

    md.push_str("## Technical Stack\n\n");
    md.push_str(&format!(
        "- Framework: {}\n",
        or_not_detected(stack.framework.name.as_deref())
    ));
    md.push_str(&format!(
        "- Framework version: {}\n",
        or_not_detected(stack.framework.version.as_deref())
    ));
    md.push_str(&format!("- Languages: {}\n", joined(&stack.language)));
    md.push_str(&format!("- Styling: {}\n", joined(&stack.styling)));
    md.push_str(&format!("- UI libraries: {}\n", joined(&stack.ui_libraries)));
    md.push_str(&format!("- Animation: {}\n", joined(&stack.animation)));
    md.push_str(&format!(
        "- State management: {}\n",
        joined(&stack.state_management)
    ));
    md.push_str(&format!("- Auth: {}\n", or_not_detected(stack.auth.as_deref())));
    md.push_str(&format!(
        "- Database: {}\n",
        or_not_detected(stack.database.as_deref())
    ));
    md.push_str(&format!("- CMS: {}\n", or_not_detected(stack.cms.as_deref())));
    md.push_str(&format!(
        "- Deployment: {}\n\n",
        or_not_detected(stack.deployment.as_deref())
    ));

    md.push_str("## Structure\n\n");
    let routing = match structure.routing_model {
        RoutingModel::NotDetected => NOT_DETECTED,
        model => model.as_str(),
    };
    md.push_str(&format!("- Routing model: {routing}\n"));
    md.push_str(&format!(
        "- Entry point: {}\n",
        or_not_detected(structure.entry_point.as_deref())
    ));
    md.push_str(&format!(
        "- Top-level folders: {}\n\n",
        joined(&structure.folder_structure)
    ));

    push_list(&mut md, "What It Does", &public.proposal.what_it_does);
    push_list(&mut md, "What It Does Not Do", &public.proposal.what_it_does_not_do);
    push_list(&mut md, "Capabilities", &public.capabilities);
    push_list(&mut md, "Limitations", &public.limitations);
    push_list(&mut md, "Excluded Concepts", &public.excluded_concepts);

    md.push_str("## Source\n\n");
    md.push_str(&format!("- Method: {}\n", public.source.method));
    md
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use repolens_protocol::{
        Complexity, Intent, ProposalSection, RepositoryType, Statefulness, StructureSummary,
        TechnicalLevel, TechnicalStack,
    };

    fn bare_public() -> PublicContext {
        PublicContext {
            project: PublicProject {
                name: "demo".to_string(),
                repository_type: RepositoryType::Static,
                intent: Intent::Present,
                complexity: Complexity::Low,
                statefulness: Statefulness::Stateless,
                seo_relevant: false,
                auth_required: false,
            },
            audience: Vec::new(),
            technical_level: TechnicalLevel::NonTechnical,
            proposal: ProposalSection::default(),
            technical_stack: TechnicalStack::default(),
            structure: StructureSummary {
                routing_model: RoutingModel::NotDetected,
                folder_structure: Vec::new(),
                entry_point: None,
            },
            capabilities: Vec::new(),
            limitations: Vec::new(),
            excluded_concepts: vec!["Payment systems".to_string()],
            source: PublicSource {
                method: "static-analysis".to_string(),
            },
        }
    }

    #[test]
    fn markdown_sections_follow_fixed_order() {
        let md = render_markdown(&bare_public());
        let headings: Vec<&str> = md.lines().filter(|l| l.starts_with('#')).collect();
        assert_eq!(
            headings,
            vec![
                "# demo",
                "## Overview",
                "## Audience",
                "## Project Profile",
                "## Technical Stack",
                "## Structure",
                "## What It Does",
                "## What It Does Not Do",
                "## Capabilities",
                "## Limitations",
                "## Excluded Concepts",
                "## Source",
            ]
        );
    }

    #[test]
    fn missing_values_render_not_detected() {
        let md = render_markdown(&bare_public());
        assert!(md.contains("- Framework: Not detected\n"));
        assert!(md.contains("- Routing model: Not detected\n"));
        assert!(md.contains("## Capabilities\n\n- Not detected\n"));
        assert!(md.contains("## Excluded Concepts\n\n- Payment systems\n"));
    }

    #[test]
    fn prompt_wraps_pretty_json() {
        let prompt = render_prompt(&bare_public()).unwrap();
        assert!(prompt.starts_with("You are describing a software project"));
        assert!(prompt.contains("```json\n{\n  \"project\": {"));
        assert!(prompt.ends_with("```\n"));
    }
}
