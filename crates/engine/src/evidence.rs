//! Stage 2: the evidence graph.
//!
//! A flat record of facts. Each field is one expression over dependency names,
//! path shapes or small content checks, and never reads another evidence field.

use once_cell::sync::Lazy;
use regex::Regex;
use repolens_protocol::paths::{depth, file_name, file_stem};
use repolens_protocol::{NormalizedProject, RoutingModel};
use serde::Serialize;

use crate::catalog::{self, Deps};
use crate::layout::{
    has_file_named, has_file_prefixed, has_folder_named, has_segment, is_markdown, sources,
};
use crate::scan::ScanResult;
use crate::signals::{
    ProjectSignals, BLOG_SEGMENTS, CHECKOUT_SEGMENTS, DASHBOARD_SEGMENTS, PRODUCT_SEGMENTS,
};

static HEAD_METADATA: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"export\s+(const|async\s+function|function)\s+(metadata|generateMetadata)\b|<Head>|next/head|<head>|<title>|<svelte:head>|useHead\(|useSeoMeta\(|<Helmet|<meta\s+name=["']description"#,
    )
    .expect("valid regex")
});

static OPEN_GRAPH: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"og:[a-z]|openGraph|twitter:card").expect("valid regex"));

static ANALYTICS_SNIPPET: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"googletagmanager\.com|gtag\(|plausible\.io/js|umami\.is|cloud\.umami")
        .expect("valid regex")
});

static FORM_MARKUP: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<form[\s>]|onSubmit=|@submit").expect("valid regex"));

static PRISMA_PROVIDER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"datasource\s+\w+\s*\{[^}]*provider\s*=\s*"(\w+)""#).expect("valid regex")
});

const README_NAMES: &[&str] = &[
    "readme",
    "changelog",
    "license",
    "contributing",
    "code_of_conduct",
    "security",
];

const DEPLOYMENT_MARKERS: &[(&str, &str)] = &[
    ("vercel.json", "Vercel"),
    ("netlify.toml", "Netlify"),
    ("fly.toml", "Fly.io"),
    ("render.yaml", "Render"),
    ("railway.json", "Railway"),
    ("railway.toml", "Railway"),
    ("wrangler.toml", "Cloudflare"),
    ("firebase.json", "Firebase Hosting"),
    ("amplify.yml", "AWS Amplify"),
    ("serverless.yml", "AWS Lambda"),
    ("app.yaml", "Google App Engine"),
    ("Procfile", "Heroku"),
    ("Dockerfile", "Docker"),
];

const CI_FILES: &[&str] = &[
    ".gitlab-ci.yml",
    ".travis.yml",
    "azure-pipelines.yml",
    "Jenkinsfile",
    "bitbucket-pipelines.yml",
];

const TEST_CONFIG_MARKERS: &[(&str, &str)] = &[
    ("vitest.config.", "Vitest"),
    ("jest.config.", "Jest"),
    ("playwright.config.", "Playwright"),
    ("cypress.config.", "Cypress"),
    ("pytest.ini", "pytest"),
];

const COMPONENT_EXTENSIONS: &[&str] = &["tsx", "jsx", "vue", "svelte", "astro"];

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EvidenceGraph {
    // framework
    pub framework: Option<String>,
    pub framework_version: Option<String>,
    pub is_nextjs: bool,
    pub is_react: bool,
    pub is_vue: bool,
    pub is_nuxt: bool,
    pub is_svelte: bool,
    pub is_sveltekit: bool,
    pub is_astro: bool,
    pub is_gatsby: bool,
    pub is_remix: bool,
    pub is_angular: bool,
    pub is_static_html: bool,
    pub uses_typescript: bool,
    pub languages: Vec<String>,

    // routing
    pub routing_model: RoutingModel,
    pub uses_app_router: bool,
    pub uses_pages_router: bool,
    pub has_api_routes: bool,
    pub has_dynamic_routes: bool,
    pub has_middleware: bool,
    pub entry_point: Option<String>,

    // backend
    pub has_backend: bool,
    pub server_framework: Option<String>,
    pub has_database: bool,
    pub database: Option<String>,
    pub orm: Option<String>,
    pub has_migrations: bool,

    // auth
    pub has_auth_library: bool,
    pub auth_provider: Option<String>,
    pub has_auth_usage: bool,

    // styling and UI
    pub has_tailwind: bool,
    pub has_css_modules: bool,
    pub has_sass: bool,
    pub has_styled_components: bool,
    pub has_emotion: bool,
    pub has_shadcn: bool,
    pub has_mui: bool,
    pub has_chakra: bool,
    pub has_radix: bool,
    pub has_bootstrap: bool,
    pub has_framer_motion: bool,
    pub has_gsap: bool,
    pub styling: Vec<String>,
    pub ui_libraries: Vec<String>,
    pub animation: Vec<String>,

    // state
    pub has_redux: bool,
    pub has_zustand: bool,
    pub has_jotai: bool,
    pub has_recoil: bool,
    pub has_mobx: bool,
    pub has_pinia: bool,
    pub has_vuex: bool,
    pub has_react_query: bool,
    pub has_global_state: bool,
    pub state_libraries: Vec<String>,

    // content and SEO
    pub cms: Option<String>,
    pub has_mdx: bool,
    pub has_markdown_content: bool,
    pub has_blog_structure: bool,
    pub has_seo_files: bool,
    pub has_head_metadata: bool,
    pub has_open_graph: bool,
    pub has_i18n: bool,
    pub has_analytics: bool,
    pub analytics_provider: Option<String>,

    // commerce
    pub has_checkout: bool,
    pub has_cart: bool,
    pub has_products: bool,
    pub has_payment_provider: bool,
    pub payment_provider: Option<String>,

    // dashboard
    pub has_dashboard: bool,
    pub has_admin: bool,
    pub has_charts: bool,

    // interaction
    pub has_forms: bool,
    pub has_email_service: bool,
    pub has_newsletter: bool,
    pub has_realtime: bool,
    pub has_file_uploads: bool,
    pub has_search: bool,

    // delivery
    pub deployment_target: Option<String>,
    pub has_dockerfile: bool,
    pub has_ci: bool,
    pub has_tests: bool,
    pub test_framework: Option<String>,
    pub has_env_example: bool,

    // counters
    pub file_count: usize,
    pub route_count: usize,
    pub component_count: usize,
    pub integration_count: usize,
    pub external_service_count: usize,
}

fn has_dep(deps: &Deps, names: &[&str]) -> bool {
    names.iter().any(|name| deps.contains_key(*name))
}

fn any_source(project: &NormalizedProject, pattern: &Regex) -> bool {
    sources(project).any(|(_, text)| pattern.is_match(text))
}

fn labels(table: &[catalog::Entry], deps: &Deps) -> Vec<String> {
    catalog::labels(table, deps)
        .into_iter()
        .map(str::to_string)
        .collect()
}

fn label(table: &[catalog::Entry], deps: &Deps) -> Option<String> {
    catalog::first_label(table, deps).map(str::to_string)
}

pub fn build_evidence(
    project: &NormalizedProject,
    scan: &ScanResult,
    signals: &ProjectSignals,
) -> EvidenceGraph {
    let deps = &scan.dependencies;
    let files = &project.files;
    let has_framework = |name: &str| scan.frameworks.iter().any(|f| f == name);

    let prisma_database = project
        .file_map
        .iter()
        .filter(|(path, _)| file_name(path) == "schema.prisma")
        .find_map(|(_, text)| PRISMA_PROVIDER.captures(text))
        .and_then(|caps| match &caps[1] {
            "postgresql" | "postgres" => Some("PostgreSQL"),
            "mysql" => Some("MySQL"),
            "sqlite" => Some("SQLite"),
            "mongodb" => Some("MongoDB"),
            "sqlserver" => Some("SQL Server"),
            "cockroachdb" => Some("CockroachDB"),
            _ => None,
        });

    let has_migrations = has_folder_named(project, &["migrations", "migrate", "alembic"])
        || files.iter().any(|f| f.ends_with(".sql") && f.contains("migration"));

    let mut styling = labels(catalog::STYLING, deps);
    if has_file_prefixed(project, &["tailwind.config"])
        && !styling.iter().any(|s| s == "Tailwind CSS")
    {
        styling.insert(0, "Tailwind CSS".to_string());
    }
    let has_css_modules = files
        .iter()
        .any(|f| f.ends_with(".module.css") || f.ends_with(".module.scss"));
    if has_css_modules {
        styling.push("CSS Modules".to_string());
    }

    let has_shadcn = has_file_named(project, &["components.json"])
        || (deps.contains_key("class-variance-authority")
            && project.folders.iter().any(|f| f.ends_with("components/ui")));
    let mut ui_libraries = Vec::new();
    if has_shadcn {
        ui_libraries.push("shadcn/ui".to_string());
    }
    ui_libraries.extend(labels(catalog::UI_LIBRARIES, deps));

    let test_framework = label(catalog::TEST_FRAMEWORKS, deps).or_else(|| {
        TEST_CONFIG_MARKERS
            .iter()
            .find(|&&(prefix, _)| has_file_prefixed(project, &[prefix]))
            .map(|(_, name)| name.to_string())
    });

    // One hit per integration category; a database and its ORM count once.
    let integration_hits = [
        catalog::any(catalog::AUTH_LIBRARIES, deps),
        catalog::any(catalog::DATABASES, deps) || catalog::any(catalog::ORMS, deps),
        catalog::any(catalog::CMS, deps),
        catalog::any(catalog::PAYMENTS, deps),
        catalog::any(catalog::ANALYTICS, deps),
        catalog::any(catalog::EMAIL, deps),
        catalog::any(catalog::NEWSLETTER, deps),
        catalog::any(catalog::REALTIME, deps),
        catalog::any(catalog::FILE_UPLOADS, deps),
        catalog::any(catalog::SEARCH, deps),
    ];

    let evidence = EvidenceGraph {
        framework: scan.primary_framework.clone(),
        framework_version: scan.framework_version.clone(),
        is_nextjs: has_framework("Next.js"),
        is_react: has_dep(deps, &["react"]) || has_framework("React"),
        is_vue: has_dep(deps, &["vue"]) || files.iter().any(|f| f.ends_with(".vue")),
        is_nuxt: has_framework("Nuxt"),
        is_svelte: has_dep(deps, &["svelte"]) || files.iter().any(|f| f.ends_with(".svelte")),
        is_sveltekit: has_framework("SvelteKit"),
        is_astro: has_framework("Astro"),
        is_gatsby: has_framework("Gatsby"),
        is_remix: has_framework("Remix"),
        is_angular: has_framework("Angular"),
        is_static_html: scan.routing_model == RoutingModel::StaticHtml,
        uses_typescript: has_dep(deps, &["typescript"])
            || files.iter().any(|f| f.ends_with(".ts") || f.ends_with(".tsx")),
        languages: scan.languages.clone(),

        routing_model: scan.routing_model,
        uses_app_router: scan.routing_model == RoutingModel::AppRouter,
        uses_pages_router: scan.routing_model == RoutingModel::PagesRouter,
        has_api_routes: scan.has_api_routes,
        has_dynamic_routes: signals.dynamic_routes,
        has_middleware: files.iter().any(|f| {
            matches!(
                f.as_str(),
                "middleware.ts" | "middleware.js" | "src/middleware.ts" | "src/middleware.js"
            )
        }) || has_folder_named(project, &["middleware", "middlewares"]),
        entry_point: scan.entry_point.clone(),

        has_backend: scan.server_framework.is_some()
            || has_folder_named(project, &["server", "backend", "controllers"]),
        server_framework: scan.server_framework.clone(),
        has_database: catalog::any(catalog::DATABASES, deps)
            || catalog::any(catalog::ORMS, deps)
            || has_file_named(project, &["schema.prisma"])
            || has_migrations,
        database: label(catalog::DATABASES, deps).or(prisma_database.map(str::to_string)),
        orm: label(catalog::ORMS, deps),
        has_migrations,

        has_auth_library: catalog::any(catalog::AUTH_LIBRARIES, deps),
        auth_provider: label(catalog::AUTH_LIBRARIES, deps),
        has_auth_usage: signals.auth_usage_detected == Some(true),

        has_tailwind: has_dep(deps, &["tailwindcss"])
            || has_file_prefixed(project, &["tailwind.config"]),
        has_css_modules,
        has_sass: has_dep(deps, &["sass", "node-sass"])
            || files.iter().any(|f| f.ends_with(".scss") || f.ends_with(".sass")),
        has_styled_components: has_dep(deps, &["styled-components"]),
        has_emotion: has_dep(deps, &["@emotion/react", "@emotion/styled"]),
        has_shadcn,
        has_mui: has_dep(deps, &["@mui/material", "@material-ui/core"]),
        has_chakra: has_dep(deps, &["@chakra-ui/react"]),
        has_radix: deps.keys().any(|k| k.starts_with("@radix-ui/")),
        has_bootstrap: has_dep(deps, &["bootstrap", "react-bootstrap"]),
        has_framer_motion: has_dep(deps, &["framer-motion", "motion"]),
        has_gsap: has_dep(deps, &["gsap"]),
        styling,
        ui_libraries,
        animation: labels(catalog::ANIMATION, deps),

        has_redux: has_dep(deps, &["redux", "@reduxjs/toolkit", "react-redux"]),
        has_zustand: has_dep(deps, &["zustand"]),
        has_jotai: has_dep(deps, &["jotai"]),
        has_recoil: has_dep(deps, &["recoil"]),
        has_mobx: has_dep(deps, &["mobx", "mobx-react-lite"]),
        has_pinia: has_dep(deps, &["pinia"]),
        has_vuex: has_dep(deps, &["vuex"]),
        has_react_query: has_dep(deps, &["@tanstack/react-query", "react-query"]),
        has_global_state: signals.app_state,
        state_libraries: labels(catalog::STATE_LIBRARIES, deps),

        cms: label(catalog::CMS, deps),
        has_mdx: files.iter().any(|f| f.ends_with(".mdx"))
            || catalog::first_label(catalog::MARKDOWN_TOOLING, deps) == Some("MDX"),
        has_markdown_content: files.iter().any(|f| {
            is_markdown(f)
                && (depth(f) > 1
                    || !README_NAMES.contains(&file_stem(f).to_ascii_lowercase().as_str()))
        }),
        has_blog_structure: has_segment(project, BLOG_SEGMENTS),
        has_seo_files: has_file_named(
            project,
            &["robots.txt", "sitemap.xml", "sitemap.ts", "sitemap.js", "robots.ts", "robots.js"],
        ) || has_file_prefixed(project, &["next-sitemap.config"]),
        has_head_metadata: any_source(project, &HEAD_METADATA)
            || has_dep(deps, &["next-seo", "react-helmet", "react-helmet-async", "@unhead/vue"]),
        has_open_graph: any_source(project, &OPEN_GRAPH)
            || has_file_prefixed(project, &["opengraph-image", "twitter-image"]),
        has_i18n: catalog::any(catalog::I18N, deps)
            || has_folder_named(project, &["locales", "locale", "i18n", "lang"])
            || files.iter().any(|f| f.contains("[locale]") || f.contains("[lang]")),
        has_analytics: catalog::any(catalog::ANALYTICS, deps)
            || any_source(project, &ANALYTICS_SNIPPET),
        analytics_provider: label(catalog::ANALYTICS, deps),

        has_checkout: has_segment(project, &["checkout"]),
        has_cart: has_segment(project, &CHECKOUT_SEGMENTS[1..]),
        has_products: has_segment(project, PRODUCT_SEGMENTS),
        has_payment_provider: catalog::any(catalog::PAYMENTS, deps),
        payment_provider: label(catalog::PAYMENTS, deps),

        has_dashboard: has_segment(project, &DASHBOARD_SEGMENTS[..1]),
        has_admin: has_segment(project, &DASHBOARD_SEGMENTS[1..]),
        has_charts: catalog::any(catalog::CHARTS, deps),

        has_forms: catalog::any(catalog::FORMS, deps) || any_source(project, &FORM_MARKUP),
        has_email_service: catalog::any(catalog::EMAIL, deps),
        has_newsletter: catalog::any(catalog::NEWSLETTER, deps)
            || has_segment(project, &["newsletter"]),
        has_realtime: catalog::any(catalog::REALTIME, deps),
        has_file_uploads: catalog::any(catalog::FILE_UPLOADS, deps),
        has_search: catalog::any(catalog::SEARCH, deps) || has_segment(project, &["search"]),

        deployment_target: DEPLOYMENT_MARKERS
            .iter()
            .find(|(name, _)| project.has_file(name))
            .map(|(_, target)| target.to_string()),
        has_dockerfile: has_file_named(
            project,
            &["Dockerfile", "docker-compose.yml", "docker-compose.yaml", "compose.yaml"],
        ),
        has_ci: project
            .folders
            .iter()
            .any(|f| f == ".github/workflows" || f == ".circleci")
            || has_file_named(project, CI_FILES),
        has_tests: scan.has_tests || catalog::any(catalog::TEST_FRAMEWORKS, deps),
        test_framework,
        has_env_example: has_file_named(
            project,
            &[".env.example", ".env.sample", ".env.template", ".env.local.example"],
        ),

        file_count: files.len(),
        route_count: scan.page_routes.len() + scan.api_routes.len(),
        component_count: files
            .iter()
            .filter(|f| {
                f.split('/').any(|seg| seg == "components")
                    && COMPONENT_EXTENSIONS.iter().any(|ext| f.ends_with(&format!(".{ext}")))
            })
            .count(),
        integration_count: integration_hits.iter().filter(|hit| **hit).count(),
        external_service_count: catalog::labels(catalog::EXTERNAL_SERVICES, deps).len(),
    };
    log::debug!(
        "evidence: framework={:?} backend={} database={:?} auth={:?} routes={}",
        evidence.framework,
        evidence.has_backend,
        evidence.database,
        evidence.auth_provider,
        evidence.route_count
    );
    evidence
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scan::scan;
    use crate::signals::collect_signals;
    use pretty_assertions::assert_eq;

    fn evidence_for(files: &[&str], contents: &[(&str, &str)]) -> EvidenceGraph {
        let project = NormalizedProject::new(
            files.iter().map(|f| f.to_string()),
            Vec::new(),
            contents.iter().map(|(p, t)| (p.to_string(), t.to_string())),
            None,
        );
        let scan = scan(&project);
        let signals = collect_signals(&project, &scan);
        build_evidence(&project, &scan, &signals)
    }

    #[test]
    fn absent_data_yields_false_and_none() {
        let e = evidence_for(&["notes.txt"], &[]);
        assert_eq!(e.framework, None);
        assert!(!e.has_backend);
        assert!(!e.has_database);
        assert_eq!(e.auth_provider, None);
        assert_eq!(e.deployment_target, None);
        assert_eq!(e.integration_count, 0);
        assert_eq!(e.file_count, 1);
    }

    #[test]
    fn fullstack_saas_facts() {
        let e = evidence_for(
            &[
                "package.json",
                "tailwind.config.ts",
                "vercel.json",
                "prisma/schema.prisma",
                "prisma/migrations/001_init/migration.sql",
                "app/dashboard/page.tsx",
                "app/api/billing/route.ts",
                "components/ui/button.tsx",
                "components.json",
                ".github/workflows/ci.yml",
            ],
            &[
                (
                    "package.json",
                    r#"{"dependencies":{"next":"14.2.0","react":"18.2.0","next-auth":"4.24.0","@prisma/client":"5.0.0","stripe":"14.0.0","zustand":"4.5.0","recharts":"2.0.0","resend":"3.0.0"}}"#,
                ),
                (
                    "prisma/schema.prisma",
                    "datasource db {\n  provider = \"postgresql\"\n  url = env(\"DATABASE_URL\")\n}\n",
                ),
            ],
        );
        assert!(e.is_nextjs);
        assert!(e.is_react);
        assert!(e.uses_app_router);
        assert!(e.has_api_routes);
        assert!(e.has_database);
        assert_eq!(e.database.as_deref(), Some("PostgreSQL"));
        assert_eq!(e.orm.as_deref(), Some("Prisma"));
        assert!(e.has_migrations);
        assert_eq!(e.auth_provider.as_deref(), Some("NextAuth.js"));
        assert!(e.has_tailwind);
        assert!(e.has_shadcn);
        assert_eq!(e.styling, vec!["Tailwind CSS"]);
        assert_eq!(e.ui_libraries, vec!["shadcn/ui"]);
        assert!(e.has_zustand);
        assert!(e.has_global_state);
        assert!(e.has_dashboard);
        assert!(e.has_charts);
        assert_eq!(e.payment_provider.as_deref(), Some("Stripe"));
        assert_eq!(e.deployment_target.as_deref(), Some("Vercel"));
        assert!(e.has_ci);
        assert_eq!(e.component_count, 1);
        assert_eq!(e.route_count, 2);
        // auth, database, payments, email
        assert_eq!(e.integration_count, 4);
        // Stripe, Resend
        assert_eq!(e.external_service_count, 2);
    }

    #[test]
    fn seo_facts_come_from_files_and_content() {
        let e = evidence_for(
            &["public/robots.txt", "app/layout.tsx", "app/page.tsx"],
            &[(
                "app/layout.tsx",
                "export const metadata = { openGraph: { title: 'x' } }",
            )],
        );
        assert!(e.has_seo_files);
        assert!(e.has_head_metadata);
        assert!(e.has_open_graph);
    }

    #[test]
    fn readme_alone_is_not_markdown_content() {
        let e = evidence_for(&["README.md", "src/main.rs"], &[]);
        assert!(!e.has_markdown_content);
        let e = evidence_for(&["README.md", "content/about.md"], &[]);
        assert!(e.has_markdown_content);
    }
}
