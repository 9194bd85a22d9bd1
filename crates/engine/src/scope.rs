//! Stage 9: scope tables.
//!
//! Additive only. Every line is gated by one evidence fact and emitted in
//! table order.

use serde::Serialize;

use crate::evidence::EvidenceGraph;

struct Gated {
    applies: fn(&EvidenceGraph) -> bool,
    text: &'static str,
}

/// A missing fact that rules something out.
struct Absence {
    applies: fn(&EvidenceGraph) -> bool,
    does_not_do: Option<&'static str>,
    excluded: Option<&'static str>,
}

const WHAT_IT_DOES: &[Gated] = &[
    Gated {
        applies: |e| e.has_blog_structure,
        text: "Publishes articles and posts",
    },
    Gated {
        applies: |e| e.has_products,
        text: "Lists products",
    },
    Gated {
        applies: |e| e.has_checkout,
        text: "Takes orders through a checkout flow",
    },
    Gated {
        applies: |e| e.has_dashboard,
        text: "Shows account data in a dashboard",
    },
    Gated {
        applies: |e| e.has_admin,
        text: "Offers administrative screens",
    },
    Gated {
        applies: |e| e.has_auth_usage,
        text: "Restricts parts of the application to signed-in users",
    },
    Gated {
        applies: |e| e.has_forms,
        text: "Collects input through forms",
    },
    Gated {
        applies: |e| e.has_newsletter,
        text: "Collects newsletter subscriptions",
    },
    Gated {
        applies: |e| e.has_api_routes,
        text: "Exposes HTTP API endpoints",
    },
    Gated {
        applies: |e| e.has_database,
        text: "Stores application data",
    },
    Gated {
        applies: |e| e.has_search,
        text: "Lets visitors search content",
    },
];

const CAPABILITIES: &[Gated] = &[
    Gated {
        applies: |e| e.has_auth_library,
        text: "User authentication",
    },
    Gated {
        applies: |e| e.has_database,
        text: "Persistent data storage",
    },
    Gated {
        applies: |e| e.has_payment_provider,
        text: "Online payments",
    },
    Gated {
        applies: |e| e.has_cart,
        text: "Shopping cart",
    },
    Gated {
        applies: |e| e.has_dashboard,
        text: "Dashboard interface",
    },
    Gated {
        applies: |e| e.has_markdown_content,
        text: "Markdown content",
    },
    Gated {
        applies: |e| e.cms.is_some(),
        text: "CMS-managed content",
    },
    Gated {
        applies: |e| e.has_backend,
        text: "Server-side logic",
    },
    Gated {
        applies: |e| e.has_api_routes,
        text: "API endpoints",
    },
    Gated {
        applies: |e| e.has_dynamic_routes,
        text: "Dynamic routing",
    },
    Gated {
        applies: |e| e.has_forms,
        text: "Form handling",
    },
    Gated {
        applies: |e| e.has_email_service,
        text: "Transactional email",
    },
    Gated {
        applies: |e| e.has_realtime,
        text: "Real-time updates",
    },
    Gated {
        applies: |e| e.has_file_uploads,
        text: "File uploads",
    },
    Gated {
        applies: |e| e.has_search,
        text: "Search",
    },
    Gated {
        applies: |e| e.has_i18n,
        text: "Internationalization",
    },
    Gated {
        applies: |e| e.has_analytics,
        text: "Usage analytics",
    },
    Gated {
        applies: |e| e.has_charts,
        text: "Data visualization",
    },
    Gated {
        applies: |e| e.has_head_metadata,
        text: "Search engine metadata",
    },
    Gated {
        applies: |e| e.has_open_graph,
        text: "Social sharing previews",
    },
];

const LIMITATIONS: &[Gated] = &[
    Gated {
        applies: |e| !e.has_tests,
        text: "No automated tests detected",
    },
    Gated {
        applies: |e| !e.has_ci,
        text: "No continuous integration configuration detected",
    },
    Gated {
        applies: |e| e.deployment_target.is_none(),
        text: "Deployment target not detected",
    },
    Gated {
        applies: |e| e.has_database && !e.has_migrations,
        text: "No database migrations detected",
    },
    Gated {
        applies: |e| e.has_auth_library && !e.has_auth_usage,
        text: "Authentication library present but no usage found in sampled code",
    },
    Gated {
        applies: |e| !e.has_seo_files,
        text: "No sitemap or robots file",
    },
    Gated {
        applies: |e| !e.has_env_example,
        text: "No environment variable template",
    },
];

const ABSENCES: &[Absence] = &[
    Absence {
        applies: |e| !e.has_backend,
        does_not_do: Some("Backend business logic"),
        excluded: None,
    },
    // Framework API routes are still an API surface.
    Absence {
        applies: |e| !e.has_backend && !e.has_api_routes,
        does_not_do: None,
        excluded: Some("Backend APIs"),
    },
    Absence {
        applies: |e| !e.has_database,
        does_not_do: Some("Persisting data in a database"),
        excluded: Some("Database storage"),
    },
    Absence {
        applies: |e| !e.has_auth_library && !e.has_auth_usage,
        does_not_do: Some("User sign-in or account management"),
        excluded: Some("User accounts"),
    },
    Absence {
        applies: |e| !e.has_payment_provider,
        does_not_do: Some("Processing payments"),
        excluded: Some("Payment systems"),
    },
    Absence {
        applies: |e| !e.has_checkout && !e.has_cart,
        does_not_do: Some("Selling products online"),
        excluded: Some("E-commerce"),
    },
    Absence {
        applies: |e| !e.has_dashboard && !e.has_admin,
        does_not_do: Some("Administrative dashboards"),
        excluded: Some("Admin dashboards"),
    },
    Absence {
        applies: |e| !e.has_realtime,
        does_not_do: Some("Real-time collaboration or live updates"),
        excluded: Some("Real-time features"),
    },
    Absence {
        applies: |e| !e.has_email_service,
        does_not_do: Some("Sending email"),
        excluded: Some("Email delivery"),
    },
    Absence {
        applies: |e| !e.has_i18n,
        does_not_do: None,
        excluded: Some("Internationalization"),
    },
    Absence {
        applies: |e| !e.has_file_uploads,
        does_not_do: None,
        excluded: Some("File uploads"),
    },
    Absence {
        applies: |e| !e.has_search,
        does_not_do: None,
        excluded: Some("Search"),
    },
    Absence {
        applies: |e| e.cms.is_none(),
        does_not_do: None,
        excluded: Some("Content management system"),
    },
    Absence {
        applies: |e| !e.has_analytics,
        does_not_do: None,
        excluded: Some("Analytics tracking"),
    },
];

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScopeDefinition {
    pub what_it_does: Vec<String>,
    pub what_it_does_not_do: Vec<String>,
    pub capabilities: Vec<String>,
    pub limitations: Vec<String>,
    pub excluded_concepts: Vec<String>,
}

fn collect(table: &[Gated], evidence: &EvidenceGraph) -> Vec<String> {
    table
        .iter()
        .filter(|rule| (rule.applies)(evidence))
        .map(|rule| rule.text.to_string())
        .collect()
}

pub fn define_scope(evidence: &EvidenceGraph) -> ScopeDefinition {
    let absent: Vec<&Absence> = ABSENCES
        .iter()
        .filter(|rule| (rule.applies)(evidence))
        .collect();
    let scope = ScopeDefinition {
        what_it_does: collect(WHAT_IT_DOES, evidence),
        what_it_does_not_do: absent
            .iter()
            .filter_map(|rule| rule.does_not_do.map(str::to_string))
            .collect(),
        capabilities: collect(CAPABILITIES, evidence),
        limitations: collect(LIMITATIONS, evidence),
        excluded_concepts: absent
            .iter()
            .filter_map(|rule| rule.excluded.map(str::to_string))
            .collect(),
    };
    log::debug!(
        "scope: {} capabilities, {} exclusions",
        scope.capabilities.len(),
        scope.excluded_concepts.len()
    );
    scope
}
