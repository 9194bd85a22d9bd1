//! # RepoLens Ingest
//!
//! Turns a project directory into the engine's input contract.
//!
//! ## Pipeline
//!
//! ```text
//! Directory
//!     │
//!     ├──> File Scanner (.gitignore aware, built-in ignore scopes, exclude globs)
//!     │      └─> Listed files + folders      (fails over max_files)
//!     │
//!     ├──> Content selection (manifests first, size caps)
//!     │      └─> Files to sample             (fails over max_total_bytes)
//!     │
//!     └──> Bounded reader pool
//!            └─> NormalizedProject
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use repolens_ingest::{normalize_with_timeout, CancelToken, IngestOptions};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let options = IngestOptions::resolve(None);
//!     let project =
//!         normalize_with_timeout("/path/to/project".as_ref(), &options, &CancelToken::new())
//!             .await?;
//!     println!("{} files, {} sampled", project.files.len(), project.file_map.len());
//!     Ok(())
//! }
//! ```

mod cancel;
mod config;
mod error;
mod limits;
mod reader;
mod scanner;

pub use cancel::CancelToken;
pub use config::{ConfigFile, IngestOptions, IngestSection, ENV_TIMEOUT_MS};
pub use error::{IngestError, Result};
pub use limits::{
    IngestLimits, ENV_MAX_CONTENT_FILES, ENV_MAX_FILES, ENV_MAX_FILE_BYTES, ENV_MAX_TOTAL_BYTES,
    ENV_WORKERS,
};
pub use scanner::{FileScanner, ScanOutcome, ScannedFile};

use repolens_protocol::NormalizedProject;
use std::path::Path;

/// Walk `root`, apply caps, sample content, and build the normalized view.
pub async fn normalize_project(
    root: &Path,
    options: &IngestOptions,
    cancel: &CancelToken,
) -> Result<NormalizedProject> {
    if !root.is_dir() {
        return Err(IngestError::InvalidPath(root.display().to_string()));
    }
    let limits = options.limits.clamped();

    let scanner = FileScanner::new(root)
        .with_excludes(&options.exclude)?
        .with_max_files(limits.max_files);
    let scan_cancel = cancel.clone();
    let outcome = tokio::task::spawn_blocking(move || scanner.scan(&scan_cancel))
        .await
        .map_err(|err| IngestError::Other(format!("scanner task failed: {err}")))??;

    if outcome.files.is_empty() {
        return Err(IngestError::EmptyProject);
    }

    let selected = reader::select_content(&outcome.files, &limits);
    reader::enforce_total_bytes(&selected, &limits)?;
    let contents = reader::read_contents(root, selected, &limits, cancel).await?;

    let repo_name = options.repo_name.clone().or_else(|| {
        root.canonicalize()
            .ok()
            .and_then(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
    });

    log::info!(
        "Normalized {} files ({} sampled) from {}",
        outcome.files.len(),
        contents.len(),
        root.display()
    );
    Ok(NormalizedProject::new(
        outcome.files.into_iter().map(|f| f.rel_path),
        outcome.folders,
        contents,
        repo_name,
    ))
}

/// [`normalize_project`] bounded by `options.timeout`.
///
/// On expiry the token is cancelled so in-flight workers stop, and
/// [`IngestError::Timeout`] is returned instead of a partial project.
pub async fn normalize_with_timeout(
    root: &Path,
    options: &IngestOptions,
    cancel: &CancelToken,
) -> Result<NormalizedProject> {
    let Some(timeout) = options.timeout else {
        return normalize_project(root, options, cancel).await;
    };
    match tokio::time::timeout(timeout, normalize_project(root, options, cancel)).await {
        Ok(result) => result,
        Err(_) => {
            cancel.cancel();
            Err(IngestError::Timeout {
                ms: timeout.as_millis() as u64,
            })
        }
    }
}
