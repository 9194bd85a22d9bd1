use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

use crate::error::{IngestError, Result};
use crate::limits::IngestLimits;

pub const ENV_TIMEOUT_MS: &str = "REPOLENS_TIMEOUT_MS";
const MAX_TIMEOUT_MS: u64 = 30 * 60 * 1000;

/// Everything the normalizer needs besides the root path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IngestOptions {
    pub limits: IngestLimits,
    /// Extra glob patterns (repo-relative) to skip, on top of `.gitignore` and built-in scopes.
    pub exclude: Vec<String>,
    pub timeout: Option<Duration>,
    /// Overrides the name derived from the root directory.
    pub repo_name: Option<String>,
}

/// On-disk configuration (`repolens.toml`).
///
/// ```toml
/// [ingest]
/// max_files = 5000
/// max_file_bytes = 262144
/// timeout_ms = 20000
/// exclude = ["fixtures/**"]
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    #[serde(default)]
    pub ingest: IngestSection,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IngestSection {
    pub max_files: Option<usize>,
    pub max_file_bytes: Option<u64>,
    pub max_total_bytes: Option<u64>,
    pub max_content_files: Option<usize>,
    pub workers: Option<usize>,
    pub timeout_ms: Option<u64>,
    #[serde(default)]
    pub exclude: Vec<String>,
}

impl ConfigFile {
    pub fn parse(raw: &str) -> Result<Self> {
        toml::from_str(raw).map_err(|err| IngestError::Config(err.to_string()))
    }

    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|err| {
            IngestError::Config(format!("failed to read {}: {err}", path.display()))
        })?;
        Self::parse(&raw)
    }
}

impl IngestOptions {
    /// Defaults, then the config file (if any), then `REPOLENS_*` environment variables.
    pub fn resolve(config: Option<&ConfigFile>) -> Self {
        let mut options = Self::default();
        if let Some(config) = config {
            options = options.apply_file(config);
        }
        options.apply_env(|key| std::env::var(key).ok())
    }

    pub fn apply_file(mut self, config: &ConfigFile) -> Self {
        let section = &config.ingest;
        let limits = &mut self.limits;
        if let Some(v) = section.max_files {
            limits.max_files = v;
        }
        if let Some(v) = section.max_file_bytes {
            limits.max_file_bytes = v;
        }
        if let Some(v) = section.max_total_bytes {
            limits.max_total_bytes = v;
        }
        if let Some(v) = section.max_content_files {
            limits.max_content_files = v;
        }
        if let Some(v) = section.workers {
            limits.workers = v;
        }
        self.limits = self.limits.clamped();
        if let Some(ms) = section.timeout_ms {
            self.timeout = Some(Duration::from_millis(ms.clamp(1, MAX_TIMEOUT_MS)));
        }
        self.exclude.extend(section.exclude.iter().cloned());
        self
    }

    pub fn apply_env(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        self.limits = self.limits.apply_env(&lookup);
        if let Some(ms) = lookup(ENV_TIMEOUT_MS)
            .as_deref()
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .and_then(|v| v.parse::<u64>().ok())
        {
            self.timeout = Some(Duration::from_millis(ms.clamp(1, MAX_TIMEOUT_MS)));
        }
        self
    }
}
