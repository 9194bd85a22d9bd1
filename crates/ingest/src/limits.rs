use std::str::FromStr;

const DEFAULT_MAX_FILES: usize = 5_000;
const MAX_MAX_FILES: usize = 200_000;
const DEFAULT_MAX_FILE_BYTES: u64 = 256 * 1024;
const MAX_MAX_FILE_BYTES: u64 = 16 * 1024 * 1024;
const DEFAULT_MAX_TOTAL_BYTES: u64 = 32 * 1024 * 1024;
const MAX_MAX_TOTAL_BYTES: u64 = 1024 * 1024 * 1024;
const DEFAULT_MAX_CONTENT_FILES: usize = 2_000;
const MAX_MAX_CONTENT_FILES: usize = 50_000;
const MAX_WORKERS: usize = 16;

pub const ENV_MAX_FILES: &str = "REPOLENS_MAX_FILES";
pub const ENV_MAX_FILE_BYTES: &str = "REPOLENS_MAX_FILE_BYTES";
pub const ENV_MAX_TOTAL_BYTES: &str = "REPOLENS_MAX_TOTAL_BYTES";
pub const ENV_MAX_CONTENT_FILES: &str = "REPOLENS_MAX_CONTENT_FILES";
pub const ENV_WORKERS: &str = "REPOLENS_WORKERS";

/// Hard caps applied while normalizing an untrusted project tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IngestLimits {
    /// Listing more files than this aborts ingestion.
    pub max_files: usize,
    /// Files larger than this are listed but their content is not sampled.
    pub max_file_bytes: u64,
    /// Sampled content larger than this in total aborts ingestion.
    pub max_total_bytes: u64,
    /// At most this many files have their content sampled.
    pub max_content_files: usize,
    /// Concurrent file readers.
    pub workers: usize,
}

impl Default for IngestLimits {
    fn default() -> Self {
        Self {
            max_files: DEFAULT_MAX_FILES,
            max_file_bytes: DEFAULT_MAX_FILE_BYTES,
            max_total_bytes: DEFAULT_MAX_TOTAL_BYTES,
            max_content_files: DEFAULT_MAX_CONTENT_FILES,
            workers: default_workers(),
        }
    }
}

impl IngestLimits {
    /// Apply overrides from an arbitrary lookup; blank or unparsable values keep the current value.
    pub fn apply_env(self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            max_files: parse_bounded(
                lookup(ENV_MAX_FILES).as_deref(),
                self.max_files,
                1,
                MAX_MAX_FILES,
            ),
            max_file_bytes: parse_bounded(
                lookup(ENV_MAX_FILE_BYTES).as_deref(),
                self.max_file_bytes,
                1,
                MAX_MAX_FILE_BYTES,
            ),
            max_total_bytes: parse_bounded(
                lookup(ENV_MAX_TOTAL_BYTES).as_deref(),
                self.max_total_bytes,
                1,
                MAX_MAX_TOTAL_BYTES,
            ),
            max_content_files: parse_bounded(
                lookup(ENV_MAX_CONTENT_FILES).as_deref(),
                self.max_content_files,
                1,
                MAX_MAX_CONTENT_FILES,
            ),
            workers: parse_bounded(lookup(ENV_WORKERS).as_deref(), self.workers, 1, MAX_WORKERS),
        }
    }

    /// Clamp every cap into its supported range.
    pub fn clamped(self) -> Self {
        Self {
            max_files: self.max_files.clamp(1, MAX_MAX_FILES),
            max_file_bytes: self.max_file_bytes.clamp(1, MAX_MAX_FILE_BYTES),
            max_total_bytes: self.max_total_bytes.clamp(1, MAX_MAX_TOTAL_BYTES),
            max_content_files: self.max_content_files.clamp(1, MAX_MAX_CONTENT_FILES),
            workers: self.workers.clamp(1, MAX_WORKERS),
        }
    }
}

fn default_workers() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
        .clamp(1, 8)
}

pub(crate) fn parse_bounded<T>(raw: Option<&str>, default_value: T, min: T, max: T) -> T
where
    T: FromStr + Ord,
{
    raw.map(str::trim)
        .filter(|v| !v.is_empty())
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default_value)
        .clamp(min, max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn parse_bounded_defaults_and_clamps() {
        assert_eq!(parse_bounded(None, 7usize, 1, 16), 7);
        assert_eq!(parse_bounded(Some(""), 7usize, 1, 16), 7);
        assert_eq!(parse_bounded(Some("   "), 7usize, 1, 16), 7);
        assert_eq!(parse_bounded(Some("2"), 7usize, 1, 16), 2);
        assert_eq!(parse_bounded(Some("0"), 7usize, 1, 16), 1);
        assert_eq!(parse_bounded(Some("999"), 7usize, 1, 16), 16);
        assert_eq!(parse_bounded(Some("abc"), 7usize, 1, 16), 7);
        assert_eq!(parse_bounded(Some(" 5 "), 7usize, 1, 16), 5);
    }

    #[test]
    fn env_overrides_apply_per_key() {
        let env: HashMap<&str, &str> = HashMap::from([
            (ENV_MAX_FILES, "10"),
            (ENV_MAX_FILE_BYTES, "not-a-number"),
            (ENV_WORKERS, "64"),
        ]);
        let base = IngestLimits {
            workers: 2,
            ..IngestLimits::default()
        };
        let limits = base.apply_env(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(limits.max_files, 10);
        assert_eq!(limits.max_file_bytes, DEFAULT_MAX_FILE_BYTES);
        assert_eq!(limits.max_total_bytes, DEFAULT_MAX_TOTAL_BYTES);
        assert_eq!(limits.workers, MAX_WORKERS);
    }

    #[test]
    fn clamped_keeps_caps_positive() {
        let limits = IngestLimits {
            max_files: 0,
            max_file_bytes: 0,
            max_total_bytes: 0,
            max_content_files: 0,
            workers: 0,
        }
        .clamped();
        assert_eq!(limits.max_files, 1);
        assert_eq!(limits.workers, 1);
        assert_eq!(limits.max_total_bytes, 1);
    }
}
