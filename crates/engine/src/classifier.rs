//! Folder-name classifier.
//!
//! Runs alongside the evidence rule engine. Its type nudges blueprint scoring
//! and its intent is compared against the rule engine's to raise
//! `classification_divergence`; neither field reaches the canonical record.

use repolens_protocol::{Complexity, Intent, NormalizedProject, Statefulness};
use serde::Serialize;

use crate::layout::{has_file_named, has_folder_named};
use crate::taxonomy::{Domain, ProjectType};

const DASHBOARD_FOLDERS: &[&str] = &["dashboard", "admin"];
const COMMERCE_FOLDERS: &[&str] = &["checkout", "cart", "shop", "products"];
const CONTENT_FOLDERS: &[&str] = &["blog", "posts", "articles"];
const DOCS_FOLDERS: &[&str] = &["docs"];
const SHOWCASE_FOLDERS: &[&str] = &["projects", "portfolio"];
const SERVICE_FOLDERS: &[&str] = &["api", "controllers", "routes"];
const SCRIPT_FOLDERS: &[&str] = &["scripts", "bin", "cli"];
const PAGE_FOLDERS: &[&str] = &["pages", "app", "views"];
const UI_FOLDERS: &[&str] = &["components"];
const STATE_FOLDERS: &[&str] = &[
    "store",
    "stores",
    "state",
    "redux",
    "context",
    "prisma",
    "migrations",
    "models",
    "db",
    "database",
];
const AUTH_FOLDERS: &[&str] = &["auth", "login", "signin", "signup", "register", "account"];
const SEO_FILES: &[&str] = &["robots.txt", "sitemap.xml", "sitemap.ts", "sitemap.js"];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Classification {
    pub intent: Intent,
    pub domain: Domain,
    pub project_type: ProjectType,
    pub complexity: Complexity,
    pub statefulness: Statefulness,
    pub auth_required: bool,
    pub seo_relevant: bool,
}

pub fn classify(project: &NormalizedProject) -> Classification {
    let has = |names: &[&str]| has_folder_named(project, names);
    let auth_required = has(AUTH_FOLDERS);
    let no_pages = !has(PAGE_FOLDERS);

    let (intent, domain, project_type) = if has(DASHBOARD_FOLDERS) {
        let project_type = if auth_required {
            ProjectType::Saas
        } else {
            ProjectType::Dashboard
        };
        (Intent::Operate, Domain::Service, project_type)
    } else if has(COMMERCE_FOLDERS) {
        (Intent::Convert, Domain::Commerce, ProjectType::Ecommerce)
    } else if has(CONTENT_FOLDERS) {
        (Intent::Inform, Domain::Content, ProjectType::Blog)
    } else if has(DOCS_FOLDERS) {
        (Intent::Inform, Domain::DeveloperTools, ProjectType::Docs)
    } else if has(SHOWCASE_FOLDERS) {
        (Intent::Present, Domain::Personal, ProjectType::Portfolio)
    } else if has(SERVICE_FOLDERS) && no_pages && !has(UI_FOLDERS) {
        (Intent::Operate, Domain::Service, ProjectType::Api)
    } else if has(SCRIPT_FOLDERS) && no_pages {
        (Intent::Operate, Domain::DeveloperTools, ProjectType::Script)
    } else {
        (Intent::Present, Domain::Product, ProjectType::Landing)
    };

    let complexity = match project.files.len() {
        n if n < 20 => Complexity::Low,
        n if n < 100 => Complexity::Medium,
        _ => Complexity::High,
    };
    let statefulness = if has(STATE_FOLDERS) {
        Statefulness::Stateful
    } else {
        Statefulness::Stateless
    };

    let classification = Classification {
        intent,
        domain,
        project_type,
        complexity,
        statefulness,
        auth_required,
        seo_relevant: has_file_named(project, SEO_FILES),
    };
    log::debug!(
        "classifier: {:?}/{:?}/{:?}",
        classification.intent,
        classification.domain,
        classification.project_type
    );
    classification
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn project(files: &[&str]) -> NormalizedProject {
        NormalizedProject::new(
            files.iter().map(|f| f.to_string()),
            Vec::new(),
            Vec::new(),
            None,
        )
    }

    #[test]
    fn dashboard_with_auth_folders_is_saas() {
        let c = classify(&project(&[
            "app/dashboard/page.tsx",
            "app/login/page.tsx",
            "store/session.ts",
        ]));
        assert_eq!(c.intent, Intent::Operate);
        assert_eq!(c.project_type, ProjectType::Saas);
        assert_eq!(c.statefulness, Statefulness::Stateful);
        assert!(c.auth_required);
    }

    #[test]
    fn dashboard_wins_over_commerce() {
        let c = classify(&project(&["admin/index.ts", "products/list.ts"]));
        assert_eq!(c.project_type, ProjectType::Dashboard);
    }

    #[test]
    fn posts_folder_is_a_blog() {
        let c = classify(&project(&["posts/hello.mdx", "public/robots.txt"]));
        assert_eq!(c.intent, Intent::Inform);
        assert_eq!(c.domain, Domain::Content);
        assert!(c.seo_relevant);
        assert_eq!(c.complexity, Complexity::Low);
    }

    #[test]
    fn routes_without_pages_are_an_api() {
        let c = classify(&project(&["src/routes/users.js", "src/server.js"]));
        assert_eq!(c.project_type, ProjectType::Api);

        let with_ui = classify(&project(&["src/routes/users.js", "src/components/Nav.tsx"]));
        assert_eq!(with_ui.project_type, ProjectType::Landing);
    }

    #[test]
    fn scripts_folder_is_a_script() {
        let c = classify(&project(&["scripts/sync.py"]));
        assert_eq!(c.project_type, ProjectType::Script);
        assert_eq!(c.domain, Domain::DeveloperTools);
    }

    #[test]
    fn file_count_drives_complexity() {
        let files: Vec<String> = (0..120).map(|i| format!("src/f{i}.ts")).collect();
        let refs: Vec<&str> = files.iter().map(String::as_str).collect();
        assert_eq!(classify(&project(&refs)).complexity, Complexity::High);
        assert_eq!(classify(&project(&refs[..40])).complexity, Complexity::Medium);
    }
}
