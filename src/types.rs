//! Core domain types for cloud-archive

use std::path::PathBuf;

/// A regular file discovered under the scan root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalFile {
    /// Path usable to open or stat the file
    pub absolute_path: PathBuf,

    /// Path relative to the scan root, always `/`-separated
    pub relative_path: String,
}

impl LocalFile {
    /// Create a new local file entry
    pub fn new(absolute_path: impl Into<PathBuf>, relative_path: impl Into<String>) -> Self {
        Self {
            absolute_path: absolute_path.into(),
            relative_path: relative_path.into(),
        }
    }
}

/// An object currently present in the store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteEntry {
    /// Full object key
    pub key: String,

    /// Object size in bytes. `None` when the store did not report one,
    /// which the planner treats as "object does not exist".
    pub size: Option<u64>,
}

impl RemoteEntry {
    /// Create a remote entry with a known size
    pub fn new(key: impl Into<String>, size: u64) -> Self {
        Self {
            key: key.into(),
            size: Some(size),
        }
    }

    /// Create a remote entry whose size is unknown
    pub fn without_size(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            size: None,
        }
    }
}

/// One planned transfer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadTask {
    /// Local source file
    pub absolute_path: PathBuf,

    /// Destination key (prefix joined with the relative path)
    pub destination_key: String,

    /// Local size in bytes at planning time
    pub size: u64,
}

/// Outcome of a sync run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncResult {
    /// Keys that were uploaded successfully, in the order attempted
    pub uploaded_files: Vec<String>,

    /// Number of successful uploads, always `uploaded_files.len()`
    pub total_files_uploaded: usize,
}

impl SyncResult {
    /// Record a successful upload
    pub fn record(&mut self, key: impl Into<String>) {
        self.uploaded_files.push(key.into());
        self.total_files_uploaded = self.uploaded_files.len();
    }
}
