//! Dependency manifests: package.json, requirements.txt, pyproject.toml,
//! Cargo.toml, go.mod, Gemfile, composer.json.

use once_cell::sync::Lazy;
use regex::Regex;
use repolens_protocol::paths::{depth, file_name};
use repolens_protocol::NormalizedProject;

use crate::catalog::Deps;

static GEM_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?m)^\s*gem\s+['"]([^'"]+)['"](?:\s*,\s*['"]([^'"]+)['"])?"#)
        .expect("valid regex")
});

static PEP508_NAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*([A-Za-z0-9][A-Za-z0-9._-]*)(.*)$").expect("valid regex")
});

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct Manifests {
    pub dependencies: Deps,
    /// Project name from the shallowest manifest that declares one.
    pub name: Option<String>,
}

#[derive(Clone, Copy)]
enum Kind {
    PackageJson,
    Requirements,
    PyProject,
    Cargo,
    GoMod,
    Gemfile,
    Composer,
}

fn kind_of(path: &str) -> Option<Kind> {
    let name = file_name(path);
    match name {
        "package.json" => Some(Kind::PackageJson),
        "pyproject.toml" => Some(Kind::PyProject),
        "Cargo.toml" => Some(Kind::Cargo),
        "go.mod" => Some(Kind::GoMod),
        "Gemfile" => Some(Kind::Gemfile),
        "composer.json" => Some(Kind::Composer),
        _ if name.starts_with("requirements") && name.ends_with(".txt") => {
            Some(Kind::Requirements)
        }
        _ => None,
    }
}

/// Merge every sampled manifest. Shallow manifests are read first, so on a
/// name clash the root declaration wins.
pub(crate) fn collect(project: &NormalizedProject) -> Manifests {
    let mut sources: Vec<(&str, Kind, &str)> = project
        .file_map
        .iter()
        .filter_map(|(path, text)| kind_of(path).map(|kind| (path.as_str(), kind, text.as_str())))
        .collect();
    sources.sort_by(|a, b| depth(a.0).cmp(&depth(b.0)).then_with(|| a.0.cmp(b.0)));

    let mut manifests = Manifests::default();
    for (path, kind, text) in sources {
        let deps = &mut manifests.dependencies;
        let name = match kind {
            Kind::PackageJson => parse_package_json(text, deps),
            Kind::Requirements => {
                parse_requirements(text, deps);
                None
            }
            Kind::PyProject => parse_pyproject(text, deps),
            Kind::Cargo => parse_cargo(text, deps),
            Kind::GoMod => {
                parse_go_mod(text, deps);
                None
            }
            Kind::Gemfile => {
                parse_gemfile(text, deps);
                None
            }
            Kind::Composer => parse_composer(text, deps),
        };
        if manifests.name.is_none() {
            manifests.name = name.filter(|n| !n.trim().is_empty());
        }
        log::trace!("Parsed manifest {path}");
    }
    manifests
}

fn insert(deps: &mut Deps, name: &str, version: &str) {
    let name = name.trim();
    if name.is_empty() {
        return;
    }
    deps.entry(name.to_string())
        .or_insert_with(|| version.trim().to_string());
}

fn parse_package_json(text: &str, deps: &mut Deps) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(text).ok()?;
    for section in [
        "dependencies",
        "devDependencies",
        "peerDependencies",
        "optionalDependencies",
    ] {
        if let Some(map) = value.get(section).and_then(|v| v.as_object()) {
            for (name, version) in map {
                insert(deps, name, version.as_str().unwrap_or_default());
            }
        }
    }
    value
        .get("name")
        .and_then(|v| v.as_str())
        .map(str::to_string)
}

fn parse_composer(text: &str, deps: &mut Deps) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(text).ok()?;
    for section in ["require", "require-dev"] {
        if let Some(map) = value.get(section).and_then(|v| v.as_object()) {
            for (name, version) in map {
                insert(deps, name, version.as_str().unwrap_or_default());
            }
        }
    }
    value
        .get("name")
        .and_then(|v| v.as_str())
        .map(str::to_string)
}

fn insert_pep508(deps: &mut Deps, requirement: &str) {
    if let Some(caps) = PEP508_NAME.captures(requirement) {
        let name = caps[1].to_ascii_lowercase();
        let rest = caps.get(2).map_or("", |m| m.as_str());
        let version = rest.split(';').next().unwrap_or_default();
        let version = version.trim_start_matches(|c: char| c == '[' || c.is_alphanumeric());
        insert(deps, &name, version.trim_start_matches(']'));
    }
}

fn parse_requirements(text: &str, deps: &mut Deps) {
    for line in text.lines() {
        let line = line.split(" #").next().unwrap_or_default().trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with('-') {
            continue;
        }
        insert_pep508(deps, line);
    }
}

fn parse_pyproject(text: &str, deps: &mut Deps) -> Option<String> {
    let value: toml::Value = toml::from_str(text).ok()?;
    if let Some(list) = value
        .get("project")
        .and_then(|p| p.get("dependencies"))
        .and_then(|d| d.as_array())
    {
        for item in list.iter().filter_map(|v| v.as_str()) {
            insert_pep508(deps, item);
        }
    }
    if let Some(table) = value
        .get("tool")
        .and_then(|t| t.get("poetry"))
        .and_then(|p| p.get("dependencies"))
        .and_then(|d| d.as_table())
    {
        for (name, spec) in table {
            if name == "python" {
                continue;
            }
            insert(deps, &name.to_ascii_lowercase(), toml_version(spec));
        }
    }
    value
        .get("project")
        .and_then(|p| p.get("name"))
        .or_else(|| {
            value
                .get("tool")
                .and_then(|t| t.get("poetry"))
                .and_then(|p| p.get("name"))
        })
        .and_then(|n| n.as_str())
        .map(str::to_string)
}

fn toml_version(spec: &toml::Value) -> &str {
    match spec {
        toml::Value::String(s) => s.as_str(),
        toml::Value::Table(t) => t.get("version").and_then(|v| v.as_str()).unwrap_or(""),
        _ => "",
    }
}

fn parse_cargo(text: &str, deps: &mut Deps) -> Option<String> {
    let value: toml::Value = toml::from_str(text).ok()?;
    let workspace_deps = value.get("workspace").and_then(|w| w.get("dependencies"));
    for table in [
        value.get("dependencies"),
        value.get("dev-dependencies"),
        value.get("build-dependencies"),
        workspace_deps,
    ]
    .into_iter()
    .flatten()
    .filter_map(|t| t.as_table())
    {
        for (name, spec) in table {
            insert(deps, name, toml_version(spec));
        }
    }
    value
        .get("package")
        .and_then(|p| p.get("name"))
        .and_then(|n| n.as_str())
        .map(str::to_string)
}

fn parse_go_mod(text: &str, deps: &mut Deps) {
    let mut in_block = false;
    for raw in text.lines() {
        let line = raw.split("//").next().unwrap_or_default().trim();
        if in_block {
            if line == ")" {
                in_block = false;
            } else {
                insert_go_requirement(deps, line);
            }
        } else if line.starts_with("require (") || line == "require(" {
            in_block = true;
        } else if let Some(rest) = line.strip_prefix("require ") {
            insert_go_requirement(deps, rest);
        }
    }
}

fn insert_go_requirement(deps: &mut Deps, line: &str) {
    let mut parts = line.split_whitespace();
    if let Some(module) = parts.next() {
        insert(deps, module, parts.next().unwrap_or_default());
    }
}

fn parse_gemfile(text: &str, deps: &mut Deps) {
    for caps in GEM_LINE.captures_iter(text) {
        insert(deps, &caps[1], caps.get(2).map_or("", |m| m.as_str()));
    }
}

/// `^14.1.0` → `14.1.0`. Empty specs normalise to `None`.
pub(crate) fn clean_version(spec: &str) -> Option<String> {
    let cleaned = spec
        .trim()
        .trim_start_matches(|c: char| {
            matches!(c, '^' | '~' | '=' | '>' | '<' | 'v') || c.is_whitespace()
        })
        .trim();
    (!cleaned.is_empty()).then(|| cleaned.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::BTreeMap;

    fn project(entries: &[(&str, &str)]) -> NormalizedProject {
        NormalizedProject::new(
            entries.iter().map(|(p, _)| p.to_string()),
            Vec::new(),
            entries
                .iter()
                .map(|(p, t)| (p.to_string(), t.to_string()))
                .collect::<BTreeMap<_, _>>(),
            None,
        )
    }

    #[test]
    fn merges_package_json_sections_and_prefers_root_name() {
        let p = project(&[
            (
                "apps/web/package.json",
                r#"{"name":"web","dependencies":{"next":"13.0.0"}}"#,
            ),
            (
                "package.json",
                r#"{"name":"shop","dependencies":{"next":"^14.1.0"},"devDependencies":{"vitest":"1.0.0"}}"#,
            ),
        ]);
        let manifests = collect(&p);
        assert_eq!(manifests.name.as_deref(), Some("shop"));
        assert_eq!(
            manifests.dependencies.get("next").map(String::as_str),
            Some("^14.1.0")
        );
        assert!(manifests.dependencies.contains_key("vitest"));
    }

    #[test]
    fn parses_python_manifests() {
        let p = project(&[
            (
                "requirements.txt",
                "# web\nDjango==4.2.1\npsycopg2-binary>=2.9 # db\n-r base.txt\n",
            ),
            (
                "pyproject.toml",
                "[project]\nname = \"svc\"\ndependencies = [\"fastapi[all]>=0.100\", \"SQLAlchemy\"]\n",
            ),
        ]);
        let manifests = collect(&p);
        let deps = &manifests.dependencies;
        assert_eq!(deps.get("django").map(String::as_str), Some("==4.2.1"));
        assert_eq!(deps.get("psycopg2-binary").map(String::as_str), Some(">=2.9"));
        assert_eq!(deps.get("fastapi").map(String::as_str), Some(">=0.100"));
        assert!(deps.contains_key("sqlalchemy"));
        assert_eq!(manifests.name.as_deref(), Some("svc"));
    }

    #[test]
    fn parses_cargo_go_and_gemfile() {
        let p = project(&[
            (
                "Cargo.toml",
                "[package]\nname = \"api\"\n[dependencies]\naxum = \"0.7\"\nserde = { version = \"1\", features = [\"derive\"] }\n",
            ),
            (
                "go.mod",
                "module x\n\nrequire (\n\tgithub.com/gin-gonic/gin v1.9.1\n)\nrequire github.com/lib/pq v1.10.9 // indirect\n",
            ),
            ("Gemfile", "source 'https://rubygems.org'\ngem 'rails', '~> 7.1'\ngem \"devise\"\n"),
        ]);
        let deps = collect(&p).dependencies;
        assert_eq!(deps.get("axum").map(String::as_str), Some("0.7"));
        assert_eq!(deps.get("serde").map(String::as_str), Some("1"));
        assert_eq!(
            deps.get("github.com/gin-gonic/gin").map(String::as_str),
            Some("v1.9.1")
        );
        assert!(deps.contains_key("github.com/lib/pq"));
        assert_eq!(deps.get("rails").map(String::as_str), Some("~> 7.1"));
        assert!(deps.contains_key("devise"));
    }

    #[test]
    fn malformed_manifests_are_ignored() {
        let p = project(&[("package.json", "{not json"), ("Cargo.toml", "[[[")]);
        assert_eq!(collect(&p), Manifests::default());
    }

    #[test]
    fn clean_version_strips_range_operators() {
        assert_eq!(clean_version("^14.1.0").as_deref(), Some("14.1.0"));
        assert_eq!(clean_version(">= 2.9").as_deref(), Some("2.9"));
        assert_eq!(clean_version("v1.9.1").as_deref(), Some("1.9.1"));
        assert_eq!(clean_version("  "), None);
    }
}
