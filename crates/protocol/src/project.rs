use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::paths::{normalize_path, parent_folders};

/// Capped, ignore-filtered view of a project tree.
///
/// This is the only input the analysis engine accepts. It is produced by an
/// ingestion collaborator (the `repolens-ingest` crate, or any external tool
/// that emits the same JSON shape) and is read-only afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedProject {
    /// Repo-relative file paths, sorted and deduplicated.
    #[serde(default)]
    pub files: Vec<String>,
    /// Repo-relative folder paths, sorted and deduplicated.
    #[serde(default)]
    pub folders: Vec<String>,
    /// Sampled textual content keyed by repo-relative path.
    #[serde(default)]
    pub file_map: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repo_name: Option<String>,
}

impl NormalizedProject {
    /// Build a project in canonical form.
    ///
    /// Paths are normalized, sorted and deduplicated; ancestor folders of every
    /// file are added; content entries for paths not listed in `files` are dropped.
    pub fn new(
        files: impl IntoIterator<Item = String>,
        folders: impl IntoIterator<Item = String>,
        file_map: impl IntoIterator<Item = (String, String)>,
        repo_name: Option<String>,
    ) -> Self {
        let files: BTreeSet<String> = files
            .into_iter()
            .map(|f| normalize_path(&f))
            .filter(|f| !f.is_empty())
            .collect();

        let mut folders: BTreeSet<String> = folders
            .into_iter()
            .map(|f| normalize_path(&f))
            .filter(|f| !f.is_empty())
            .collect();
        for file in &files {
            for parent in parent_folders(file) {
                folders.insert(parent.to_string());
            }
        }

        let file_map: BTreeMap<String, String> = file_map
            .into_iter()
            .map(|(path, text)| (normalize_path(&path), text))
            .filter(|(path, _)| files.contains(path))
            .collect();

        let repo_name = repo_name
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty());

        Self {
            files: files.into_iter().collect(),
            folders: folders.into_iter().collect(),
            file_map,
            repo_name,
        }
    }

    /// Re-canonicalise a value that arrived over the wire.
    pub fn canonicalize(self) -> Self {
        Self::new(self.files, self.folders, self.file_map, self.repo_name)
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn content(&self, path: &str) -> Option<&str> {
        self.file_map.get(path).map(String::as_str)
    }

    pub fn has_file(&self, path: &str) -> bool {
        self.files.binary_search_by(|f| f.as_str().cmp(path)).is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn new_canonicalizes_paths_and_derives_folders() {
        let project = NormalizedProject::new(
            vec![
                "./src/app/page.tsx".to_string(),
                "src\\app\\page.tsx".to_string(),
                "README.md".to_string(),
                String::new(),
            ],
            vec!["public/".to_string()],
            vec![
                ("./README.md".to_string(), "# Demo".to_string()),
                ("ghost.txt".to_string(), "not listed".to_string()),
            ],
            Some("  demo  ".to_string()),
        );

        assert_eq!(project.files, vec!["README.md", "src/app/page.tsx"]);
        assert_eq!(project.folders, vec!["public", "src", "src/app"]);
        assert_eq!(project.file_map.len(), 1);
        assert_eq!(project.content("README.md"), Some("# Demo"));
        assert_eq!(project.repo_name.as_deref(), Some("demo"));
        assert!(project.has_file("src/app/page.tsx"));
        assert!(!project.has_file("ghost.txt"));
    }

    #[test]
    fn deserializes_camel_case_contract() {
        let raw = r##"{
            "files": ["posts/hello.mdx"],
            "folders": ["posts"],
            "fileMap": {"posts/hello.mdx": "# Hello"},
            "repoName": "blog"
        }"##;
        let project: NormalizedProject = serde_json::from_str(raw).unwrap();
        let project = project.canonicalize();
        assert_eq!(project.files, vec!["posts/hello.mdx"]);
        assert_eq!(project.repo_name.as_deref(), Some("blog"));
        assert_eq!(project.content("posts/hello.mdx"), Some("# Hello"));
    }

    #[test]
    fn missing_fields_default_to_empty() {
        let project: NormalizedProject = serde_json::from_str("{}").unwrap();
        assert!(project.is_empty());
        assert!(project.file_map.is_empty());
        assert_eq!(project.repo_name, None);
    }
}
