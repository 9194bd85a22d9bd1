//! Stage 3: observations used for scoring.
//!
//! Content-dependent signals are tri-state: `None` means neither a path marker
//! nor any sampled source could decide them. `None` scores as `false` and
//! counts as missing for completeness.

use once_cell::sync::Lazy;
use regex::Regex;
use repolens_protocol::paths::{extension, file_stem};
use repolens_protocol::{NormalizedProject, RoutingModel};
use serde::Serialize;

use crate::catalog;
use crate::layout::{
    folder_segments, has_file_named, has_file_prefixed, has_folder_named, has_segment, is_code,
    is_markdown, segments, sources,
};
use crate::scan::ScanResult;

pub(crate) const BLOG_SEGMENTS: &[&str] = &[
    "blog", "blogs", "posts", "post", "articles", "article", "news", "journal", "writing",
    "stories", "_posts",
];
pub(crate) const PROJECT_SEGMENTS: &[&str] =
    &["projects", "portfolio", "work", "case-studies", "showcase"];
pub(crate) const DASHBOARD_SEGMENTS: &[&str] = &["dashboard", "admin", "backoffice"];
pub(crate) const CHECKOUT_SEGMENTS: &[&str] = &["checkout", "cart", "basket"];
pub(crate) const PRODUCT_SEGMENTS: &[&str] =
    &["products", "product", "shop", "catalog", "collections"];
const PERSONAL_SEGMENTS: &[&str] = &["about", "about-me", "resume", "cv"];
const AUTH_ROUTE_SEGMENTS: &[&str] = &[
    "login", "signin", "sign-in", "signup", "sign-up", "register", "logout", "auth",
];
const CONTENT_SEGMENTS: &[&str] = &["content", "_posts"];
const DOCS_SEGMENTS: &[&str] = &["docs", "documentation"];
const STATE_FOLDERS: &[&str] = &["store", "stores", "redux"];
const SEO_FILES: &[&str] = &[
    "robots.txt",
    "sitemap.xml",
    "sitemap.ts",
    "sitemap.js",
    "robots.ts",
    "robots.js",
];
const INDEX_STEMS: &[&str] = &["index", "page", "+page", "_index"];
const ROUTING_ROOTS: &[&str] = &[
    "src/app/",
    "app/routes/",
    "app/",
    "src/pages/",
    "pages/",
    "src/routes/",
];

static DYNAMIC_SEGMENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[[^\]/]+\]|(^|/)\$[^/]+").expect("valid regex"));

static SLUG_SEGMENT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\[\[?(\.\.\.)?[^\]/]*slug[^\]/]*\]\]?|\[\[?\.\.\.[^\]/]+\]\]?|\$slug|(^|/)_slug\.")
        .expect("valid regex")
});

static CTA_TEXT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(get started|sign up (now|free|today)|start (your )?free trial|book a (demo|call)|request a demo|join (now|the waitlist)|try (it )?for free|buy now|subscribe now|contact sales|get in touch|hire me|download now)\b",
    )
    .expect("valid regex")
});

static AUTH_USAGE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"getServerSession\(|useSession\(|getSession\(|\bauth\(\)|currentUser\(|useUser\(|withAuth\(|requireAuth|isAuthenticated|signIn\(|signOut\(|login_required|passport\.authenticate|jwt\.verify|supabase\.auth\.|clerkMiddleware|authMiddleware|@UseGuards|authenticate_user!",
    )
    .expect("valid regex")
});

static PERSONAL_TEXT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(i(?:'|’)?m an? |i am an? |my name is|about me|my portfolio|my projects|my resume|my cv)",
    )
    .expect("valid regex")
});

// Distinct SEO markers; two or more in sampled sources marks the project SEO-heavy.
static SEO_MARKERS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"export\s+(const|async\s+function|function)\s+(metadata|generateMetadata)\b",
        r"<Head>|next/head|<svelte:head>|useHead\(|useSeoMeta\(|<Helmet",
        r"og:[a-z]|openGraph",
        r#"name=["']description["']|twitter:card"#,
        r"application/ld\+json|schema\.org",
        r#"<link\s+rel=["']canonical|alternates:\s*\{"#,
    ]
    .iter()
    .map(|pattern| Regex::new(pattern).expect("valid regex"))
    .collect()
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MutationFrequency {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProjectSignals {
    pub one_page: bool,
    pub has_primary_cta: Option<bool>,
    pub has_checkout: bool,
    pub auth_lib_present: bool,
    pub auth_usage_detected: Option<bool>,
    pub has_dashboard_ui: bool,
    pub has_blog_posts: bool,
    pub has_editorial_flow: bool,
    pub dynamic_routes: bool,
    pub page_count: usize,
    pub content_mutation_frequency: Option<MutationFrequency>,
    pub seo_heavy: Option<bool>,
    pub app_state: bool,
    pub personal_identity: Option<bool>,
    pub has_projects: bool,
    pub docs_site: bool,
    pub api_only: bool,
    pub script_only: bool,
}

/// Boolean view of a signal for the scoring tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    OnePage,
    HasPrimaryCta,
    HasCheckout,
    AuthLibPresent,
    AuthUsageDetected,
    HasDashboardUi,
    HasBlogPosts,
    HasEditorialFlow,
    DynamicRoutes,
    SeoHeavy,
    AppState,
    PersonalIdentity,
    HasProjects,
    DocsSite,
    ApiOnly,
    ScriptOnly,
}

impl ProjectSignals {
    pub fn flag(&self, signal: Signal) -> bool {
        match signal {
            Signal::OnePage => self.one_page,
            Signal::HasPrimaryCta => self.has_primary_cta.unwrap_or(false),
            Signal::HasCheckout => self.has_checkout,
            Signal::AuthLibPresent => self.auth_lib_present,
            Signal::AuthUsageDetected => self.auth_usage_detected.unwrap_or(false),
            Signal::HasDashboardUi => self.has_dashboard_ui,
            Signal::HasBlogPosts => self.has_blog_posts,
            Signal::HasEditorialFlow => self.has_editorial_flow,
            Signal::DynamicRoutes => self.dynamic_routes,
            Signal::SeoHeavy => self.seo_heavy.unwrap_or(false),
            Signal::AppState => self.app_state,
            Signal::PersonalIdentity => self.personal_identity.unwrap_or(false),
            Signal::HasProjects => self.has_projects,
            Signal::DocsSite => self.docs_site,
            Signal::ApiOnly => self.api_only,
            Signal::ScriptOnly => self.script_only,
        }
    }

    pub fn mutation_is(&self, frequency: MutationFrequency) -> bool {
        self.content_mutation_frequency == Some(frequency)
    }

    /// Definedness of the nine signals completeness is measured on.
    pub fn required_defined(&self) -> [bool; 9] {
        [
            true, // one_page
            self.has_primary_cta.is_some(),
            true, // has_checkout
            self.auth_usage_detected.is_some(),
            true, // has_dashboard_ui
            true, // has_blog_posts
            true, // dynamic_routes
            self.content_mutation_frequency.is_some(),
            self.seo_heavy.is_some(),
        ]
    }
}

pub fn collect_signals(project: &NormalizedProject, scan: &ScanResult) -> ProjectSignals {
    let deps = &scan.dependencies;
    let has_sources = sources(project).next().is_some();

    let dynamic_routes = scan
        .page_routes
        .iter()
        .any(|route| is_dynamic_route(route, scan.routing_model));
    let page_count = scan.page_routes.len();

    let one_page = !dynamic_routes
        && (page_count <= 1
            || (page_count <= 3 && scan.page_routes.iter().all(|r| route_depth(r) <= 1)));

    let has_blog_segment = has_segment(project, BLOG_SEGMENTS);
    let has_cms = catalog::any(catalog::CMS, deps);
    let blog_route = scan
        .page_routes
        .iter()
        .any(|r| segments(r).any(|s| BLOG_SEGMENTS.contains(&s.as_str())));
    let has_blog_posts = project.files.iter().any(|f| {
        is_markdown(f) && folder_segments(f).any(|s| BLOG_SEGMENTS.contains(&s.as_str()))
    }) || (has_cms && blog_route);

    let slug_route = scan.page_routes.iter().any(|r| SLUG_SEGMENT.is_match(r));
    let has_editorial_flow = dynamic_routes && has_blog_segment && slug_route;

    let content_documents = project
        .files
        .iter()
        .filter(|f| {
            is_markdown(f)
                && folder_segments(f).any(|s| {
                    BLOG_SEGMENTS.contains(&s.as_str()) || CONTENT_SEGMENTS.contains(&s.as_str())
                })
        })
        .count();
    let content_mutation_frequency = if has_cms || content_documents >= 10 {
        Some(MutationFrequency::High)
    } else if content_documents >= 3 {
        Some(MutationFrequency::Medium)
    } else if page_count > 0 || content_documents > 0 {
        Some(MutationFrequency::Low)
    } else {
        None
    };

    let has_primary_cta = if project.files.iter().any(|f| is_cta_component(f)) {
        Some(true)
    } else if has_sources {
        Some(sources(project).any(|(_, text)| CTA_TEXT.is_match(text)))
    } else {
        None
    };

    let auth_route = scan
        .page_routes
        .iter()
        .chain(&scan.api_routes)
        .any(|r| segments(r).any(|s| AUTH_ROUTE_SEGMENTS.contains(&s.as_str())));
    let auth_usage_detected = if auth_route {
        Some(true)
    } else if has_sources {
        Some(sources(project).any(|(_, text)| AUTH_USAGE.is_match(text)))
    } else {
        None
    };

    let seo_heavy = if has_file_named(project, SEO_FILES)
        || has_file_prefixed(project, &["next-sitemap.config"])
        || catalog::any(catalog::SEO_PACKAGES, deps)
    {
        Some(true)
    } else if has_sources {
        let hits = SEO_MARKERS
            .iter()
            .filter(|marker| sources(project).any(|(_, text)| marker.is_match(text)))
            .count();
        Some(hits >= 2)
    } else {
        None
    };

    let personal_identity = if has_segment(project, PERSONAL_SEGMENTS) {
        Some(true)
    } else if has_sources {
        Some(sources(project).any(|(_, text)| PERSONAL_TEXT.is_match(text)))
    } else {
        None
    };

    let docs_markdown = project
        .files
        .iter()
        .filter(|f| {
            is_markdown(f) && folder_segments(f).any(|s| DOCS_SEGMENTS.contains(&s.as_str()))
        })
        .count();
    let docs_site = scan.docs_framework.is_some() || (docs_markdown >= 5 && page_count <= 1);

    let api_only = (scan.server_framework.is_some() || scan.has_controllers)
        && page_count == 0
        && !scan.has_components;
    let script_only = page_count == 0
        && !scan.has_components
        && scan.frameworks.is_empty()
        && !scan.has_controllers
        && !docs_site
        && project.files.iter().any(|f| is_code(f));

    let signals = ProjectSignals {
        one_page,
        has_primary_cta,
        has_checkout: has_segment(project, CHECKOUT_SEGMENTS)
            || (catalog::any(catalog::PAYMENTS, deps) && has_segment(project, PRODUCT_SEGMENTS)),
        auth_lib_present: catalog::any(catalog::AUTH_LIBRARIES, deps),
        auth_usage_detected,
        has_dashboard_ui: has_segment(project, DASHBOARD_SEGMENTS),
        has_blog_posts,
        has_editorial_flow,
        dynamic_routes,
        page_count,
        content_mutation_frequency,
        seo_heavy,
        app_state: catalog::any(catalog::STATE_LIBRARIES, deps)
            || has_folder_named(project, STATE_FOLDERS),
        personal_identity,
        has_projects: has_segment(project, PROJECT_SEGMENTS),
        docs_site,
        api_only,
        script_only,
    };
    log::debug!("signals: {signals:?}");
    signals
}

fn is_dynamic_route(route: &str, model: RoutingModel) -> bool {
    if DYNAMIC_SEGMENT.is_match(route) {
        return true;
    }
    // Nuxt 2 style `_id.vue`.
    model == RoutingModel::NuxtPages && file_stem(route).starts_with('_')
}

fn is_cta_component(path: &str) -> bool {
    if !extension(path).is_some_and(|ext| {
        matches!(ext.as_str(), "tsx" | "jsx" | "vue" | "svelte" | "astro" | "html")
    }) {
        return false;
    }
    let stem = file_stem(path).to_ascii_lowercase();
    stem.contains("hero")
        || stem == "cta"
        || stem.starts_with("cta")
        || stem.ends_with("cta")
        || stem.contains("calltoaction")
        || stem.contains("call-to-action")
}

/// URL depth of a page route: `pages/index.tsx` → 0, `app/about/page.tsx` → 1,
/// `pages/blog/first.md` → 2. Route groups like `(marketing)` do not count.
fn route_depth(route: &str) -> usize {
    let rest = ROUTING_ROOTS
        .iter()
        .find_map(|root| route.strip_prefix(root))
        .unwrap_or(route);
    let mut parts: Vec<&str> = rest
        .split('/')
        .filter(|p| !(p.starts_with('(') && p.ends_with(')')))
        .collect();
    if let Some(last) = parts.pop() {
        let stem = last.split('.').next().unwrap_or(last);
        if !INDEX_STEMS.contains(&stem) && !last.starts_with("+page") {
            parts.push(stem);
        }
    }
    parts.len()
}
