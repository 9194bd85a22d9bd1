//! Repo-relative path helpers shared by ingestion and analysis.
//!
//! Every path crossing the input contract is stored in one canonical form:
//! forward slashes, no leading `./` or `/`, no trailing `/`.

pub fn normalize_path(raw: &str) -> String {
    let mut value = raw.trim().replace('\\', "/");
    while value.starts_with("./") {
        value = value[2..].to_string();
    }
    let value = value.trim_matches('/');
    if value == "." {
        return String::new();
    }
    let mut out = String::with_capacity(value.len());
    for part in value.split('/').filter(|p| !p.is_empty() && *p != ".") {
        if !out.is_empty() {
            out.push('/');
        }
        out.push_str(part);
    }
    out
}

/// True when `path` equals `prefix` or lives below it (component-wise, not string-wise).
pub fn is_under(prefix: &str, path: &str) -> bool {
    if path == prefix {
        return true;
    }

    if !path.starts_with(prefix) {
        return false;
    }

    path.as_bytes().get(prefix.len()) == Some(&b'/')
}

/// Every ancestor folder of `path`, outermost first (`a/b/c.md` → `a`, `a/b`).
pub fn parent_folders(path: &str) -> impl Iterator<Item = &str> {
    path.match_indices('/').map(move |(idx, _)| &path[..idx])
}

pub fn file_name(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

/// Lowercased extension of the final component, if any.
pub fn extension(path: &str) -> Option<String> {
    let name = file_name(path);
    let (stem, ext) = name.rsplit_once('.')?;
    if stem.is_empty() || ext.is_empty() {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}

/// File name without its final extension (`Hero.test.tsx` → `Hero.test`).
pub fn file_stem(path: &str) -> &str {
    let name = file_name(path);
    match name.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem,
        _ => name,
    }
}

pub fn depth(path: &str) -> usize {
    if path.is_empty() {
        return 0;
    }
    path.matches('/').count() + 1
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn normalize_strips_prefixes_and_separators() {
        assert_eq!(normalize_path("./src/app/page.tsx"), "src/app/page.tsx");
        assert_eq!(normalize_path("src\\pages\\index.js"), "src/pages/index.js");
        assert_eq!(normalize_path("/docs//intro.md/"), "docs/intro.md");
        assert_eq!(normalize_path("./././a/./b"), "a/b");
        assert_eq!(normalize_path("."), "");
        assert_eq!(normalize_path("   "), "");
    }

    #[test]
    fn is_under_is_component_aware() {
        assert!(is_under("src", "src/main.rs"));
        assert!(is_under("src", "src"));
        assert!(!is_under("src", "srcs/main.rs"));
        assert!(!is_under("src/app", "src/application/x.ts"));
    }

    #[test]
    fn parent_folders_lists_ancestors_outermost_first() {
        let parents: Vec<&str> = parent_folders("a/b/c.md").collect();
        assert_eq!(parents, vec!["a", "a/b"]);
        assert_eq!(parent_folders("README.md").count(), 0);
    }

    #[test]
    fn extension_and_stem() {
        assert_eq!(extension("src/App.TSX").as_deref(), Some("tsx"));
        assert_eq!(extension(".gitignore"), None);
        assert_eq!(extension("Makefile"), None);
        assert_eq!(file_stem("components/Hero.test.tsx"), "Hero.test");
        assert_eq!(file_stem("Dockerfile"), "Dockerfile");
        assert_eq!(depth("a/b/c"), 3);
        assert_eq!(depth(""), 0);
    }
}
