//! Stage 1: coarse technology and layout detection.

use repolens_protocol::paths::{extension, file_name, file_stem, is_under};
use repolens_protocol::{NormalizedProject, RoutingModel};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

use crate::catalog::{self, Deps, Entry};
use crate::layout::{has_file_named, has_file_prefixed, has_folder_named, is_code};
use crate::manifest::{self, clean_version};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScanResult {
    pub languages: Vec<String>,
    /// Detected frameworks, most specific first.
    pub frameworks: Vec<String>,
    pub primary_framework: Option<String>,
    pub framework_version: Option<String>,
    pub server_framework: Option<String>,
    pub docs_framework: Option<String>,
    pub dependencies: BTreeMap<String, String>,
    pub manifest_name: Option<String>,
    pub package_manager: Option<String>,
    pub routing_model: RoutingModel,
    pub entry_point: Option<String>,
    pub page_routes: Vec<String>,
    pub api_routes: Vec<String>,
    pub has_components: bool,
    pub has_pages: bool,
    pub has_services: bool,
    pub has_controllers: bool,
    pub has_models: bool,
    pub has_api_routes: bool,
    pub has_tests: bool,
    pub has_hooks: bool,
    pub has_layouts: bool,
}

const LANGUAGES: &[(&[&str], &str)] = &[
    (&["ts", "tsx", "mts", "cts"], "TypeScript"),
    (&["js", "jsx", "mjs", "cjs"], "JavaScript"),
    (&["py"], "Python"),
    (&["rs"], "Rust"),
    (&["go"], "Go"),
    (&["rb"], "Ruby"),
    (&["php"], "PHP"),
    (&["java"], "Java"),
    (&["kt"], "Kotlin"),
    (&["cs"], "C#"),
    (&["swift"], "Swift"),
    (&["vue"], "Vue"),
    (&["svelte"], "Svelte"),
    (&["astro"], "Astro"),
    (&["html", "htm"], "HTML"),
    (&["css"], "CSS"),
    (&["scss", "sass"], "SCSS"),
    (&["mdx"], "MDX"),
    (&["md", "markdown"], "Markdown"),
    (&["sh"], "Shell"),
];

// Config files that identify a framework without a manifest entry.
const CONFIG_MARKERS: &[(&str, &str)] = &[
    ("next.config.", "Next.js"),
    ("nuxt.config.", "Nuxt"),
    ("astro.config.", "Astro"),
    ("gatsby-config.", "Gatsby"),
    ("remix.config.", "Remix"),
    ("docusaurus.config.", "Docusaurus"),
    ("mkdocs.yml", "MkDocs"),
    ("angular.json", "Angular"),
];

const LOCKFILES: &[(&str, &str)] = &[
    ("pnpm-lock.yaml", "pnpm"),
    ("yarn.lock", "yarn"),
    ("bun.lockb", "bun"),
    ("package-lock.json", "npm"),
    ("Cargo.lock", "cargo"),
    ("poetry.lock", "poetry"),
    ("Pipfile.lock", "pipenv"),
    ("go.sum", "go"),
    ("Gemfile.lock", "bundler"),
    ("composer.lock", "composer"),
    ("package.json", "npm"),
    ("Cargo.toml", "cargo"),
    ("pyproject.toml", "pip"),
    ("requirements.txt", "pip"),
    ("go.mod", "go"),
    ("Gemfile", "bundler"),
    ("composer.json", "composer"),
];

const ENTRY_POINTS: &[&str] = &[
    "src/app/layout.tsx",
    "src/app/layout.jsx",
    "app/layout.tsx",
    "app/layout.jsx",
    "app/layout.js",
    "src/app/page.tsx",
    "app/page.tsx",
    "pages/_app.tsx",
    "pages/_app.jsx",
    "pages/_app.js",
    "src/pages/_app.tsx",
    "src/pages/_app.js",
    "pages/index.tsx",
    "pages/index.jsx",
    "pages/index.js",
    "app/root.tsx",
    "src/routes/+layout.svelte",
    "src/routes/+page.svelte",
    "app.vue",
    "src/pages/index.astro",
    "src/main.tsx",
    "src/main.ts",
    "src/main.js",
    "src/index.tsx",
    "src/index.ts",
    "src/index.js",
    "index.html",
    "manage.py",
    "main.py",
    "app.py",
    "app/main.py",
    "src/main.rs",
    "src/lib.rs",
    "main.go",
    "cmd/main.go",
    "server.js",
    "server.ts",
    "index.js",
    "index.ts",
    "app.js",
];

// Framework precedence: meta-frameworks, docs generators, view layers, servers.
const FRAMEWORK_TABLES: [&[Entry]; 4] = [
    catalog::FRONTEND_FRAMEWORKS,
    catalog::DOCS_FRAMEWORKS,
    catalog::VIEW_LIBRARIES,
    catalog::SERVER_FRAMEWORKS,
];

const PAGE_EXTENSIONS: &[&str] = &["tsx", "jsx", "ts", "js", "mdx", "md"];
const HANDLER_EXTENSIONS: &[&str] = &["ts", "js", "tsx", "jsx", "mjs"];

pub fn scan(project: &NormalizedProject) -> ScanResult {
    let manifests = manifest::collect(project);
    let deps = manifests.dependencies;

    let frameworks = detect_frameworks(project, &deps);
    let primary_framework = frameworks.first().cloned();
    let framework_version = primary_framework
        .as_deref()
        .and_then(|label| framework_version(label, &deps));
    let server_framework = frameworks
        .iter()
        .find(|f| {
            catalog::SERVER_FRAMEWORKS
                .iter()
                .any(|entry| entry.label == f.as_str())
        })
        .cloned();
    let docs_framework = catalog::first_label(catalog::DOCS_FRAMEWORKS, &deps)
        .or_else(|| {
            frameworks
                .iter()
                .find(|f| f.as_str() == "Docusaurus" || f.as_str() == "MkDocs")
                .map(String::as_str)
        })
        .map(str::to_string);

    let routing_model = detect_routing_model(project, &frameworks, server_framework.is_some());
    let (page_routes, api_routes) = collect_routes(project, routing_model);

    let has_api_routes = !api_routes.is_empty() || has_folder_named(project, &["api"]);
    let has_pages = !page_routes.is_empty()
        || has_folder_named(project, &["pages", "views", "screens", "routes"]);

    let result = ScanResult {
        languages: detect_languages(project),
        framework_version,
        server_framework,
        docs_framework,
        manifest_name: manifests.name,
        package_manager: detect_package_manager(project),
        routing_model,
        entry_point: ENTRY_POINTS
            .iter()
            .find(|candidate| project.has_file(candidate))
            .map(|c| c.to_string()),
        has_components: has_folder_named(project, &["components", "component"]),
        has_pages,
        has_services: has_folder_named(project, &["services", "service"]),
        has_controllers: has_folder_named(project, &["controllers", "controller", "handlers"]),
        has_models: has_folder_named(project, &["models", "model", "entities"]),
        has_api_routes,
        has_tests: detect_tests(project),
        has_hooks: has_folder_named(project, &["hooks", "composables"]),
        has_layouts: has_folder_named(project, &["layouts", "layout"])
            || project.files.iter().any(|f| {
                matches!(file_stem(f), "layout" | "_layout" | "+layout")
            }),
        page_routes,
        api_routes,
        primary_framework,
        frameworks,
        dependencies: deps,
    };
    log::debug!(
        "scan: framework={:?} routing={} pages={} api={}",
        result.primary_framework,
        result.routing_model.as_str(),
        result.page_routes.len(),
        result.api_routes.len()
    );
    result
}

fn detect_languages(project: &NormalizedProject) -> Vec<String> {
    let mut found = BTreeSet::new();
    for file in &project.files {
        let Some(ext) = extension(file) else {
            continue;
        };
        if let Some((_, name)) = LANGUAGES
            .iter()
            .find(|(exts, _)| exts.contains(&ext.as_str()))
        {
            found.insert(*name);
        }
    }
    found.into_iter().map(str::to_string).collect()
}

fn detect_frameworks(project: &NormalizedProject, deps: &Deps) -> Vec<String> {
    let mut detected: BTreeSet<&str> = BTreeSet::new();
    for table in FRAMEWORK_TABLES {
        detected.extend(catalog::labels(table, deps));
    }
    for &(prefix, label) in CONFIG_MARKERS {
        if has_file_prefixed(project, &[prefix]) {
            detected.insert(label);
        }
    }
    if has_file_named(project, &["manage.py"]) {
        detected.insert("Django");
    }

    let mut ordered: Vec<String> = Vec::new();
    for table in FRAMEWORK_TABLES {
        for entry in table.iter() {
            if detected.contains(entry.label) && !ordered.iter().any(|l| l == entry.label) {
                ordered.push(entry.label.to_string());
            }
        }
    }
    ordered
}

fn framework_version(label: &str, deps: &Deps) -> Option<String> {
    FRAMEWORK_TABLES
        .iter()
        .find_map(|table| catalog::matched_name(table, label, deps))
        .and_then(|name| deps.get(name))
        .and_then(|spec| clean_version(spec))
}

fn detect_package_manager(project: &NormalizedProject) -> Option<String> {
    LOCKFILES
        .iter()
        .find(|(name, _)| project.has_file(name))
        .map(|(_, manager)| manager.to_string())
}

fn detect_tests(project: &NormalizedProject) -> bool {
    has_folder_named(
        project,
        &["tests", "test", "__tests__", "spec", "e2e", "cypress"],
    ) || project.files.iter().any(|f| {
        let name = file_name(f);
        name.contains(".test.")
            || name.contains(".spec.")
            || name.ends_with("_test.go")
            || (name.starts_with("test_") && name.ends_with(".py"))
    })
}

fn under_any<'a>(roots: &[&str], path: &'a str) -> Option<&'a str> {
    roots
        .iter()
        .find(|root| is_under(root, path) && path.len() > root.len())
        .map(|root| &path[root.len() + 1..])
}

fn ext_in(path: &str, allowed: &[&str]) -> bool {
    extension(path).is_some_and(|ext| allowed.contains(&ext.as_str()))
}

fn is_app_router_page(path: &str) -> bool {
    under_any(&["app", "src/app"], path).is_some()
        && file_stem(path) == "page"
        && ext_in(path, PAGE_EXTENSIONS)
}

fn is_pages_router_file(path: &str) -> bool {
    under_any(&["pages", "src/pages"], path).is_some() && ext_in(path, PAGE_EXTENSIONS)
}

fn detect_routing_model(
    project: &NormalizedProject,
    frameworks: &[String],
    has_server_framework: bool,
) -> RoutingModel {
    let has = |label: &str| frameworks.iter().any(|f| f == label);
    let files = &project.files;
    let any_app_page = files.iter().any(|f| is_app_router_page(f));
    let any_pages_file = files.iter().any(|f| is_pages_router_file(f));

    if has("Next.js") {
        if any_app_page || (!any_pages_file && has_folder_named(project, &["app"])) {
            return RoutingModel::AppRouter;
        }
        return RoutingModel::PagesRouter;
    }
    if has("Nuxt") {
        return RoutingModel::NuxtPages;
    }
    if has("SvelteKit") {
        return RoutingModel::Sveltekit;
    }
    if has("Remix") {
        return RoutingModel::Remix;
    }
    if has("Astro") || has("Gatsby") {
        return RoutingModel::FileBased;
    }

    if any_app_page {
        RoutingModel::AppRouter
    } else if files
        .iter()
        .any(|f| is_under("src/routes", f) && file_name(f).starts_with("+page"))
    {
        RoutingModel::Sveltekit
    } else if any_pages_file {
        RoutingModel::PagesRouter
    } else if frameworks.is_empty() && files.iter().any(|f| ext_in(f, &["html", "htm"])) {
        RoutingModel::StaticHtml
    } else if has_server_framework
        || has_folder_named(project, &["controllers", "handlers"])
    {
        RoutingModel::ServerRoutes
    } else {
        RoutingModel::NotDetected
    }
}

/// Page and API route files for the given routing model.
fn collect_routes(project: &NormalizedProject, model: RoutingModel) -> (Vec<String>, Vec<String>) {
    let mut pages = Vec::new();
    let mut api = Vec::new();
    for file in &project.files {
        let path = file.as_str();
        match classify_route(path, model) {
            Some(RouteKind::Page) => pages.push(file.clone()),
            Some(RouteKind::Api) => api.push(file.clone()),
            None => {}
        }
    }
    (pages, api)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RouteKind {
    Page,
    Api,
}

fn classify_route(path: &str, model: RoutingModel) -> Option<RouteKind> {
    let name = file_name(path);
    match model {
        RoutingModel::AppRouter => {
            under_any(&["app", "src/app"], path)?;
            match file_stem(path) {
                "page" if ext_in(path, PAGE_EXTENSIONS) => Some(RouteKind::Page),
                "route" if ext_in(path, HANDLER_EXTENSIONS) => Some(RouteKind::Api),
                _ => None,
            }
        }
        RoutingModel::PagesRouter => {
            let rest = under_any(&["pages", "src/pages"], path)?;
            if !ext_in(path, PAGE_EXTENSIONS) {
                return None;
            }
            if is_under("api", rest) {
                Some(RouteKind::Api)
            } else if name.starts_with('_') {
                None
            } else {
                Some(RouteKind::Page)
            }
        }
        RoutingModel::NuxtPages => {
            if is_under("server/api", path) && ext_in(path, HANDLER_EXTENSIONS) {
                return Some(RouteKind::Api);
            }
            under_any(&["pages", "src/pages"], path)?;
            ext_in(path, &["vue"]).then_some(RouteKind::Page)
        }
        RoutingModel::Sveltekit => {
            under_any(&["src/routes"], path)?;
            if name.starts_with("+page.") && ext_in(path, &["svelte"]) {
                Some(RouteKind::Page)
            } else if name.starts_with("+server.") {
                Some(RouteKind::Api)
            } else {
                None
            }
        }
        RoutingModel::Remix => {
            let rest = under_any(&["app/routes"], path)?;
            if !ext_in(path, &["tsx", "jsx", "ts", "js"]) {
                return None;
            }
            if rest.starts_with("api.") || is_under("api", rest) {
                Some(RouteKind::Api)
            } else {
                Some(RouteKind::Page)
            }
        }
        RoutingModel::FileBased => {
            let rest = under_any(&["src/pages"], path)?;
            if is_under("api", rest) {
                ext_in(path, HANDLER_EXTENSIONS).then_some(RouteKind::Api)
            } else {
                ext_in(path, &["astro", "md", "mdx", "tsx", "jsx", "js", "html"])
                    .then_some(RouteKind::Page)
            }
        }
        RoutingModel::StaticHtml => ext_in(path, &["html", "htm"]).then_some(RouteKind::Page),
        RoutingModel::ServerRoutes => {
            let in_route_dir = path
                .split('/')
                .rev()
                .skip(1)
                .any(|seg| matches!(seg, "routes" | "controllers" | "handlers" | "api"));
            (in_route_dir && is_code(path)).then_some(RouteKind::Api)
        }
        RoutingModel::NotDetected => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn project(files: &[&str], contents: &[(&str, &str)]) -> NormalizedProject {
        NormalizedProject::new(
            files.iter().map(|f| f.to_string()),
            Vec::new(),
            contents
                .iter()
                .map(|(p, t)| (p.to_string(), t.to_string())),
            None,
        )
    }

    #[test]
    fn next_app_router_project() {
        let p = project(
            &[
                "package.json",
                "pnpm-lock.yaml",
                "app/layout.tsx",
                "app/page.tsx",
                "app/blog/[slug]/page.tsx",
                "app/api/posts/route.ts",
                "components/Hero.tsx",
            ],
            &[(
                "package.json",
                r#"{"name":"site","dependencies":{"next":"^14.1.0","react":"18.2.0"}}"#,
            )],
        );
        let scan = scan(&p);
        assert_eq!(scan.frameworks, vec!["Next.js", "React"]);
        assert_eq!(scan.primary_framework.as_deref(), Some("Next.js"));
        assert_eq!(scan.framework_version.as_deref(), Some("14.1.0"));
        assert_eq!(scan.routing_model, RoutingModel::AppRouter);
        assert_eq!(scan.page_routes, vec!["app/blog/[slug]/page.tsx", "app/page.tsx"]);
        assert_eq!(scan.api_routes, vec!["app/api/posts/route.ts"]);
        assert_eq!(scan.entry_point.as_deref(), Some("app/layout.tsx"));
        assert_eq!(scan.package_manager.as_deref(), Some("pnpm"));
        assert_eq!(scan.manifest_name.as_deref(), Some("site"));
        assert_eq!(scan.languages, vec!["TypeScript"]);
        assert!(scan.has_components);
        assert!(scan.has_api_routes);
        assert!(scan.has_layouts);
    }

    #[test]
    fn pages_router_skips_special_files() {
        let p = project(
            &[
                "pages/_app.tsx",
                "pages/index.tsx",
                "pages/posts/[slug].tsx",
                "pages/api/hello.ts",
            ],
            &[],
        );
        let scan = scan(&p);
        assert_eq!(scan.routing_model, RoutingModel::PagesRouter);
        assert_eq!(scan.page_routes, vec!["pages/index.tsx", "pages/posts/[slug].tsx"]);
        assert_eq!(scan.api_routes, vec!["pages/api/hello.ts"]);
    }

    #[test]
    fn plain_html_is_static() {
        let p = project(&["index.html", "about.html", "css/site.css"], &[]);
        let scan = scan(&p);
        assert_eq!(scan.routing_model, RoutingModel::StaticHtml);
        assert_eq!(scan.page_routes.len(), 2);
        assert_eq!(scan.languages, vec!["CSS", "HTML"]);
    }

    #[test]
    fn server_project_uses_server_routes() {
        let p = project(
            &["package.json", "src/routes/users.js", "src/controllers/users.js"],
            &[(
                "package.json",
                r#"{"dependencies":{"express":"4.18.2"}}"#,
            )],
        );
        let scan = scan(&p);
        assert_eq!(scan.server_framework.as_deref(), Some("Express"));
        assert_eq!(scan.routing_model, RoutingModel::ServerRoutes);
        assert_eq!(scan.api_routes.len(), 2);
        assert!(scan.page_routes.is_empty());
        assert!(scan.has_controllers);
    }

    #[test]
    fn config_marker_detects_framework_without_manifest() {
        let p = project(&["astro.config.mjs", "src/pages/index.astro"], &[]);
        let scan = scan(&p);
        assert_eq!(scan.primary_framework.as_deref(), Some("Astro"));
        assert_eq!(scan.framework_version, None);
        assert_eq!(scan.routing_model, RoutingModel::FileBased);
        assert_eq!(scan.page_routes, vec!["src/pages/index.astro"]);
    }

    #[test]
    fn empty_project_detects_nothing() {
        let scan = scan(&NormalizedProject::default());
        assert_eq!(scan.routing_model, RoutingModel::NotDetected);
        assert!(scan.frameworks.is_empty());
        assert_eq!(scan.entry_point, None);
    }
}
