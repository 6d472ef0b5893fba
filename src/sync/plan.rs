//! Upload plan generation

use crate::error::{Error, Result};
use crate::types::{LocalFile, RemoteEntry, UploadTask};
use std::collections::{HashMap, HashSet};

/// A complete upload plan
#[derive(Debug, Default)]
pub struct SyncPlan {
    /// Uploads in scan order
    pub tasks: Vec<UploadTask>,
    /// Total bytes to upload
    pub total_bytes: u64,
    /// Number of files the scan found
    pub files_scanned: usize,
}

impl SyncPlan {
    /// Create a plan from tasks
    pub fn new(tasks: Vec<UploadTask>, files_scanned: usize) -> Self {
        let total_bytes = tasks.iter().map(|t| t.size).sum();
        Self {
            tasks,
            total_bytes,
            files_scanned,
        }
    }

    /// Number of files that already match the destination
    pub fn files_skipped(&self) -> usize {
        self.files_scanned.saturating_sub(self.tasks.len())
    }

    /// Whether there is nothing to upload
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

/// Replace every `\` with `/`
pub fn normalize_key(key: &str) -> String {
    key.replace('\\', "/")
}

/// Join the destination prefix and a relative path into an object key
pub fn destination_key(prefix: &str, relative_path: &str) -> String {
    let prefix = normalize_key(prefix);
    let relative = normalize_key(relative_path);
    let prefix = prefix.trim_end_matches('/');
    let relative = relative.trim_start_matches('/');

    if prefix.is_empty() {
        relative.to_string()
    } else {
        format!("{}/{}", prefix, relative)
    }
}

/// Decide which local files need uploading.
///
/// A file is planned when no remote object exists at its destination key, or
/// the remote size differs from the file's current size. Sizes are taken from
/// a fresh stat, one file at a time. Entries without a reported size count as
/// missing. Same-size content changes are not detected.
///
/// Two local files can map to one key (a literal `\` in a Unix file name, or
/// names that are not valid UTF-8). Only the first in scan order is planned;
/// the others are skipped with a warning.
pub async fn plan(
    local_files: &[LocalFile],
    existing_remote: &[RemoteEntry],
    destination_prefix: &str,
) -> Result<Vec<UploadTask>> {
    let remote_sizes: HashMap<&str, u64> = existing_remote
        .iter()
        .filter_map(|entry| entry.size.map(|size| (entry.key.as_str(), size)))
        .collect();

    let mut tasks = Vec::new();
    let mut seen = HashSet::new();

    for file in local_files {
        let key = destination_key(destination_prefix, &file.relative_path);
        if !seen.insert(key.clone()) {
            tracing::warn!(
                key = %key,
                path = %file.absolute_path.display(),
                "Skipping file that maps to an already planned key"
            );
            continue;
        }

        let size = tokio::fs::metadata(&file.absolute_path)
            .await
            .map_err(|e| Error::scan(&file.absolute_path, e))?
            .len();

        match remote_sizes.get(key.as_str()) {
            Some(&remote_size) if remote_size == size => {
                tracing::debug!(key = %key, size, "Skipping unchanged file");
            }
            remote_size => {
                tracing::debug!(key = %key, size, remote_size = ?remote_size, "Planning upload");
                tasks.push(UploadTask {
                    absolute_path: file.absolute_path.clone(),
                    destination_key: key,
                    size,
                });
            }
        }
    }

    Ok(tasks)
}
