use globset::{Glob, GlobSet, GlobSetBuilder};
use ignore::WalkBuilder;
use repolens_protocol::paths::{extension, file_name, normalize_path};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use crate::cancel::CancelToken;
use crate::error::{IngestError, Result};

/// One listed file with the size reported by the filesystem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScannedFile {
    pub rel_path: String,
    pub size: u64,
}

/// Result of walking a project tree: every kept file and folder, repo-relative and sorted.
#[derive(Debug, Clone, Default)]
pub struct ScanOutcome {
    pub files: Vec<ScannedFile>,
    pub folders: Vec<String>,
}

/// Walks a project tree (.gitignore aware) and lists what the engine may look at.
pub struct FileScanner {
    root: PathBuf,
    exclude: Option<GlobSet>,
    max_files: usize,
}

impl FileScanner {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            exclude: None,
            max_files: usize::MAX,
        }
    }

    /// Skip paths matching any of these repo-relative globs.
    pub fn with_excludes(mut self, patterns: &[String]) -> Result<Self> {
        let patterns: Vec<&str> = patterns
            .iter()
            .map(|p| p.trim())
            .filter(|p| !p.is_empty())
            .collect();
        if patterns.is_empty() {
            self.exclude = None;
            return Ok(self);
        }
        let mut builder = GlobSetBuilder::new();
        for pattern in patterns {
            builder.add(Glob::new(pattern)?);
        }
        self.exclude = Some(builder.build()?);
        Ok(self)
    }

    /// Abort with [`IngestError::TooManyFiles`] once more than `max_files` files are listed.
    pub fn with_max_files(mut self, max_files: usize) -> Self {
        self.max_files = max_files;
        self
    }

    pub fn scan(&self, cancel: &CancelToken) -> Result<ScanOutcome> {
        let mut files = Vec::new();
        let mut folders = BTreeSet::new();

        let root = self.root.clone();
        let mut builder = WalkBuilder::new(&self.root);
        builder
            .hidden(false) // .github/ and similar carry evidence
            .git_ignore(true)
            .git_global(false)
            .git_exclude(false)
            .require_git(false)
            .follow_links(false)
            .sort_by_file_name(|a, b| a.cmp(b));
        builder.filter_entry(move |entry| !FileScanner::is_ignored_scope(entry.path(), &root));

        for result in builder.build() {
            if cancel.is_cancelled() {
                return Err(IngestError::Cancelled);
            }
            let entry = match result {
                Ok(entry) => entry,
                Err(e) => {
                    log::warn!("Failed to read entry: {e}");
                    continue;
                }
            };
            let Some(file_type) = entry.file_type() else {
                continue;
            };
            let Some(rel) = self.relative(entry.path()) else {
                continue;
            };
            if rel.is_empty() || self.is_excluded(&rel) {
                continue;
            }

            if file_type.is_dir() {
                folders.insert(rel);
                continue;
            }
            if !file_type.is_file() || Self::is_noise_file(&rel) {
                continue;
            }

            let size = match entry.metadata() {
                Ok(meta) => meta.len(),
                Err(e) => {
                    log::warn!("Failed to stat {}: {e}", entry.path().display());
                    continue;
                }
            };
            files.push(ScannedFile {
                rel_path: rel,
                size,
            });
            if files.len() > self.max_files {
                return Err(IngestError::TooManyFiles {
                    limit: self.max_files,
                });
            }
        }

        files.sort_by(|a, b| a.rel_path.cmp(&b.rel_path));
        log::info!(
            "Scanned {} files in {} folders under {}",
            files.len(),
            folders.len(),
            self.root.display()
        );
        Ok(ScanOutcome {
            files,
            folders: folders.into_iter().collect(),
        })
    }

    fn relative(&self, path: &Path) -> Option<String> {
        let rel = path.strip_prefix(&self.root).ok()?;
        Some(normalize_path(&rel.to_string_lossy()))
    }

    fn is_excluded(&self, rel: &str) -> bool {
        self.exclude.as_ref().is_some_and(|set| set.is_match(rel))
    }

    fn is_ignored_scope(path: &Path, root: &Path) -> bool {
        if let Ok(relative) = path.strip_prefix(root) {
            for component in relative.components() {
                if let std::path::Component::Normal(name) = component {
                    let lowered = name.to_string_lossy().to_lowercase();
                    if IGNORED_SCOPES.iter().any(|ignored| ignored == &lowered) {
                        return true;
                    }
                }
            }
        }
        false
    }

    fn is_noise_file(rel: &str) -> bool {
        let name = file_name(rel);
        NOISE_FILE_NAMES
            .iter()
            .any(|candidate| name.eq_ignore_ascii_case(candidate))
    }

    /// Whether a listed file is worth sampling as text.
    pub fn is_content_candidate(rel: &str) -> bool {
        let name = file_name(rel);
        if LOCKFILE_NAMES
            .iter()
            .any(|candidate| name.eq_ignore_ascii_case(candidate))
        {
            return false;
        }
        if TEXT_FILE_NAMES
            .iter()
            .any(|candidate| name.eq_ignore_ascii_case(candidate))
        {
            return true;
        }
        extension(rel)
            .is_some_and(|ext| TEXT_EXTENSIONS.iter().any(|candidate| *candidate == ext))
    }

    /// Manifests and configs are sampled before anything else when the content cap bites.
    pub fn content_priority(rel: &str) -> u8 {
        let name = file_name(rel).to_ascii_lowercase();
        if MANIFEST_NAMES.iter().any(|m| *m == name) {
            return 0;
        }
        if name.contains(".config.") || name.starts_with("tsconfig") {
            return 1;
        }
        2
    }
}

const IGNORED_SCOPES: &[&str] = &[
    // VCS / tooling
    ".git",
    ".hg",
    ".svn",
    ".idea",
    ".vscode",
    ".cursor",
    ".husky",
    ".yarn",
    ".npm",
    // caches / builds
    ".cache",
    "node_modules",
    ".next",
    ".turbo",
    ".parcel-cache",
    ".output",
    ".nuxt",
    ".vite",
    ".vercel",
    ".netlify",
    ".svelte-kit",
    ".astro",
    ".docusaurus",
    "dist",
    "coverage",
    "storybook-static",
    "target",
    ".terraform",
    ".venv",
    "venv",
    "__pycache__",
    ".pytest_cache",
    ".mypy_cache",
    // vendor
    "vendor",
    "bower_components",
];

const NOISE_FILE_NAMES: &[&str] = &[".ds_store", "thumbs.db", "desktop.ini"];

const LOCKFILE_NAMES: &[&str] = &[
    "package-lock.json",
    "pnpm-lock.yaml",
    "yarn.lock",
    "bun.lockb",
    "cargo.lock",
    "poetry.lock",
    "pipfile.lock",
    "composer.lock",
    "gemfile.lock",
    "go.sum",
];

const MANIFEST_NAMES: &[&str] = &[
    "package.json",
    "cargo.toml",
    "pyproject.toml",
    "requirements.txt",
    "go.mod",
    "gemfile",
    "composer.json",
];

const TEXT_FILE_NAMES: &[&str] = &[
    "Dockerfile",
    "Makefile",
    "Gemfile",
    "Procfile",
    "Pipfile",
    ".env.example",
    ".env.sample",
    "robots.txt",
];

const TEXT_EXTENSIONS: &[&str] = &[
    // Web
    "js", "mjs", "cjs", "jsx", "ts", "mts", "cts", "tsx", "vue", "svelte", "astro", "html",
    "htm", "css", "scss", "sass", "less",
    // General purpose languages
    "rs", "py", "go", "rb", "php", "java", "kt", "cs", "swift", "ex", "exs", "sh", "bash",
    // Docs
    "md", "mdx", "markdown", "rst", "txt",
    // Config / data
    "json", "toml", "yaml", "yml", "xml", "ini", "cfg", "conf", "env", "graphql", "gql",
    "prisma", "sql",
];

#[cfg(test)]
mod tests {
    use super::FileScanner;
    use crate::cancel::CancelToken;
    use crate::error::IngestError;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::tempdir;

    fn rels(outcome: &super::ScanOutcome) -> Vec<&str> {
        outcome.files.iter().map(|f| f.rel_path.as_str()).collect()
    }

    #[test]
    fn skips_ignored_directories() {
        let temp = tempdir().unwrap();
        let modules = temp.path().join("node_modules").join("react");
        fs::create_dir_all(&modules).unwrap();
        fs::write(modules.join("index.js"), b"module.exports = {}").unwrap();
        fs::create_dir_all(temp.path().join("src")).unwrap();
        fs::write(temp.path().join("src/main.ts"), b"export {}").unwrap();

        let outcome = FileScanner::new(temp.path())
            .scan(&CancelToken::new())
            .unwrap();

        assert_eq!(rels(&outcome), vec!["src/main.ts"]);
        assert_eq!(outcome.folders, vec!["src"]);
    }

    #[test]
    fn honours_gitignore_outside_git_repos() {
        let temp = tempdir().unwrap();
        fs::create_dir_all(temp.path().join("generated")).unwrap();
        fs::write(temp.path().join("generated/out.js"), b"x").unwrap();
        fs::write(temp.path().join("index.html"), b"<html></html>").unwrap();
        fs::write(temp.path().join(".gitignore"), b"/generated\n").unwrap();

        let outcome = FileScanner::new(temp.path())
            .scan(&CancelToken::new())
            .unwrap();

        assert_eq!(rels(&outcome), vec![".gitignore", "index.html"]);
    }

    #[test]
    fn keeps_hidden_ci_config() {
        let temp = tempdir().unwrap();
        let workflows = temp.path().join(".github").join("workflows");
        fs::create_dir_all(&workflows).unwrap();
        fs::write(workflows.join("ci.yml"), b"on: push").unwrap();

        let outcome = FileScanner::new(temp.path())
            .scan(&CancelToken::new())
            .unwrap();

        assert_eq!(rels(&outcome), vec![".github/workflows/ci.yml"]);
        assert_eq!(outcome.folders, vec![".github", ".github/workflows"]);
    }

    #[test]
    fn applies_exclude_globs() {
        let temp = tempdir().unwrap();
        fs::create_dir_all(temp.path().join("fixtures")).unwrap();
        fs::write(temp.path().join("fixtures/big.json"), b"{}").unwrap();
        fs::write(temp.path().join("app.py"), b"print(1)").unwrap();

        let outcome = FileScanner::new(temp.path())
            .with_excludes(&["fixtures/**".to_string(), "fixtures".to_string()])
            .unwrap()
            .scan(&CancelToken::new())
            .unwrap();

        assert_eq!(rels(&outcome), vec!["app.py"]);
    }

    #[test]
    fn fails_fast_over_file_limit() {
        let temp = tempdir().unwrap();
        for idx in 0..4 {
            fs::write(temp.path().join(format!("f{idx}.txt")), b"x").unwrap();
        }

        let err = FileScanner::new(temp.path())
            .with_max_files(3)
            .scan(&CancelToken::new())
            .unwrap_err();

        assert!(matches!(err, IngestError::TooManyFiles { limit: 3 }));
    }

    #[test]
    fn cancelled_scan_returns_typed_error() {
        let temp = tempdir().unwrap();
        fs::write(temp.path().join("a.txt"), b"x").unwrap();
        let cancel = CancelToken::new();
        cancel.cancel();

        let err = FileScanner::new(temp.path()).scan(&cancel).unwrap_err();
        assert!(matches!(err, IngestError::Cancelled));
    }

    #[test]
    fn content_candidates_skip_lockfiles_and_binaries() {
        assert!(FileScanner::is_content_candidate("package.json"));
        assert!(FileScanner::is_content_candidate("src/app/page.tsx"));
        assert!(FileScanner::is_content_candidate("Dockerfile"));
        assert!(!FileScanner::is_content_candidate("package-lock.json"));
        assert!(!FileScanner::is_content_candidate("public/og.png"));
        assert_eq!(FileScanner::content_priority("apps/web/package.json"), 0);
        assert_eq!(FileScanner::content_priority("next.config.js"), 1);
        assert_eq!(FileScanner::content_priority("src/index.ts"), 2);
    }
}
