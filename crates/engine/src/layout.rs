//! Path vocabulary shared by the detection stages.

use repolens_protocol::paths::{extension, file_name, file_stem};
use repolens_protocol::NormalizedProject;

pub(crate) const MARKDOWN_EXTENSIONS: &[&str] = &["md", "mdx", "markdown"];

const CODE_EXTENSIONS: &[&str] = &[
    "ts", "tsx", "mts", "cts", "js", "jsx", "mjs", "cjs", "vue", "svelte", "astro", "py", "rb",
    "php", "go", "rs", "java", "kt", "cs", "swift", "sh",
];

const MARKUP_EXTENSIONS: &[&str] = &["html", "htm", "mdx"];

const STYLE_EXTENSIONS: &[&str] = &["css", "scss", "sass", "less"];

const CONFIG_EXTENSIONS: &[&str] = &["json", "toml", "yaml", "yml", "xml", "ini", "env"];

pub(crate) fn is_markdown(path: &str) -> bool {
    extension(path).is_some_and(|ext| MARKDOWN_EXTENSIONS.contains(&ext.as_str()))
}

pub(crate) fn is_code(path: &str) -> bool {
    extension(path).is_some_and(|ext| CODE_EXTENSIONS.contains(&ext.as_str()))
}

/// Files whose sampled text can carry UI copy, markup or handler logic.
pub(crate) fn is_source(path: &str) -> bool {
    extension(path).is_some_and(|ext| {
        CODE_EXTENSIONS.contains(&ext.as_str()) || MARKUP_EXTENSIONS.contains(&ext.as_str())
    })
}

/// Source, markup, style, config or docs.
pub(crate) fn is_analyzable(path: &str) -> bool {
    if matches!(
        file_name(path),
        "Dockerfile" | "Makefile" | "Gemfile" | "Procfile" | "go.mod"
    ) {
        return true;
    }
    extension(path).is_some_and(|ext| {
        let ext = ext.as_str();
        CODE_EXTENSIONS.contains(&ext)
            || MARKUP_EXTENSIONS.contains(&ext)
            || STYLE_EXTENSIONS.contains(&ext)
            || CONFIG_EXTENSIONS.contains(&ext)
            || MARKDOWN_EXTENSIONS.contains(&ext)
            || ext == "txt"
    })
}

/// Lowercased path components with the final one reduced to its stem:
/// `app/Checkout/page.tsx` → `app`, `checkout`, `page`.
pub(crate) fn segments(path: &str) -> impl Iterator<Item = String> + '_ {
    let (dirs, _) = path.rsplit_once('/').unwrap_or(("", path));
    dirs.split('/')
        .filter(|s| !s.is_empty())
        .chain(std::iter::once(file_stem(path)))
        .map(str::to_ascii_lowercase)
}

/// Lowercased folder components of a file path, without the file itself.
pub(crate) fn folder_segments(path: &str) -> impl Iterator<Item = String> + '_ {
    let (dirs, _) = path.rsplit_once('/').unwrap_or(("", path));
    dirs.split('/')
        .filter(|s| !s.is_empty())
        .map(str::to_ascii_lowercase)
}

/// True when any listed file or folder has a component in `names`.
pub(crate) fn has_segment(project: &NormalizedProject, names: &[&str]) -> bool {
    let hit = |seg: String| names.contains(&seg.as_str());
    project
        .folders
        .iter()
        .any(|f| f.split('/').map(str::to_ascii_lowercase).any(hit))
        || project.files.iter().any(|f| segments(f).any(hit))
}

/// True when some folder's last component is one of `names`.
pub(crate) fn has_folder_named(project: &NormalizedProject, names: &[&str]) -> bool {
    project.folders.iter().any(|f| {
        let last = file_name(f).to_ascii_lowercase();
        names.contains(&last.as_str())
    })
}

pub(crate) fn has_file_named(project: &NormalizedProject, names: &[&str]) -> bool {
    project
        .files
        .iter()
        .any(|f| names.contains(&file_name(f)))
}

/// True when some file name starts with one of `prefixes`
/// (`next.config` matches `next.config.mjs`).
pub(crate) fn has_file_prefixed(project: &NormalizedProject, prefixes: &[&str]) -> bool {
    project.files.iter().any(|f| {
        let name = file_name(f);
        prefixes.iter().any(|p| name.starts_with(p))
    })
}

/// Sampled source texts, in path order.
pub(crate) fn sources(project: &NormalizedProject) -> impl Iterator<Item = (&str, &str)> {
    project
        .file_map
        .iter()
        .filter(|(path, _)| is_source(path))
        .map(|(path, text)| (path.as_str(), text.as_str()))
}
