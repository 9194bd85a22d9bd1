use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use crate::cancel::CancelToken;
use crate::error::{IngestError, Result};
use crate::limits::IngestLimits;
use crate::scanner::{FileScanner, ScannedFile};

/// Pick which listed files get their content sampled.
///
/// Deterministic: candidates are ranked (manifests first), then ordered by path,
/// then cut at `max_content_files`. Oversized files are never sampled.
pub(crate) fn select_content(files: &[ScannedFile], limits: &IngestLimits) -> Vec<ScannedFile> {
    let mut candidates: Vec<&ScannedFile> = files
        .iter()
        .filter(|f| f.size <= limits.max_file_bytes)
        .filter(|f| FileScanner::is_content_candidate(&f.rel_path))
        .collect();
    candidates.sort_by(|a, b| {
        FileScanner::content_priority(&a.rel_path)
            .cmp(&FileScanner::content_priority(&b.rel_path))
            .then_with(|| a.rel_path.cmp(&b.rel_path))
    });
    candidates
        .into_iter()
        .take(limits.max_content_files)
        .cloned()
        .collect()
}

/// Fail before reading anything if the selected content would exceed the total cap.
pub(crate) fn enforce_total_bytes(selected: &[ScannedFile], limits: &IngestLimits) -> Result<()> {
    let total: u64 = selected.iter().map(|f| f.size).sum();
    if total > limits.max_total_bytes {
        return Err(IngestError::TotalSizeExceeded {
            limit: limits.max_total_bytes,
        });
    }
    Ok(())
}

/// Read the selected files with at most `limits.workers` reads in flight.
///
/// Unreadable or non-UTF-8 files are skipped; cancellation aborts the whole read.
pub(crate) async fn read_contents(
    root: &Path,
    selected: Vec<ScannedFile>,
    limits: &IngestLimits,
    cancel: &CancelToken,
) -> Result<BTreeMap<String, String>> {
    let permits = Arc::new(Semaphore::new(limits.workers.max(1)));
    let mut tasks: JoinSet<Option<(String, String)>> = JoinSet::new();

    for file in selected {
        if cancel.is_cancelled() {
            tasks.abort_all();
            return Err(IngestError::Cancelled);
        }
        let permits = Arc::clone(&permits);
        let cancel = cancel.clone();
        let abs: PathBuf = root.join(&file.rel_path);
        let max_bytes = limits.max_file_bytes;
        tasks.spawn(async move {
            // The semaphore is never closed.
            let _permit = permits.acquire_owned().await.ok()?;
            if cancel.is_cancelled() {
                return None;
            }
            read_text(&abs, max_bytes)
                .await
                .map(|text| (file.rel_path, text))
        });
    }

    let mut contents = BTreeMap::new();
    while let Some(joined) = tasks.join_next().await {
        if cancel.is_cancelled() {
            tasks.abort_all();
            return Err(IngestError::Cancelled);
        }
        match joined {
            Ok(Some((rel, text))) => {
                contents.insert(rel, text);
            }
            Ok(None) => {}
            Err(err) => return Err(IngestError::Other(format!("reader task failed: {err}"))),
        }
    }
    log::debug!("Sampled content of {} files", contents.len());
    Ok(contents)
}

async fn read_text(path: &Path, max_bytes: u64) -> Option<String> {
    let bytes = match tokio::fs::read(path).await {
        Ok(bytes) => bytes,
        Err(err) => {
            log::warn!("Failed to read {}: {err}", path.display());
            return None;
        }
    };
    // The file may have grown since it was listed.
    if bytes.len() as u64 > max_bytes {
        log::debug!("Skipping {} (grew past {max_bytes} bytes)", path.display());
        return None;
    }
    match String::from_utf8(bytes) {
        Ok(text) => Some(text),
        Err(_) => {
            log::debug!("Skipping non-UTF-8 file {}", path.display());
            None
        }
    }
}
