//! Progress events and terminal display for sync runs

use crate::format::display_file_size;
use indicatif::{ProgressBar, ProgressStyle};
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

/// A progress notification emitted by the sync engine.
///
/// Events arrive strictly in engine order: one `ScanStarted`, one `Planned`,
/// then for every planned upload an `UploadStarted` followed by either
/// `UploadCompleted` or `UploadFailed`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncEvent {
    /// Emitted before the local tree is walked
    ScanStarted { root: PathBuf },

    /// Emitted once the upload plan is known
    Planned {
        files_scanned: usize,
        total_files: usize,
        total_bytes: u64,
    },

    /// Emitted before an upload begins (`index` is 1-based)
    UploadStarted {
        index: usize,
        total_files: usize,
        key: String,
        size: u64,
    },

    /// Emitted after an upload succeeded
    UploadCompleted {
        file_count: usize,
        total_files: usize,
        key: String,
        bytes_uploaded: u64,
        total_bytes: u64,
    },

    /// Emitted after an upload failed; the run continues
    UploadFailed {
        index: usize,
        total_files: usize,
        key: String,
        error: String,
    },
}

impl fmt::Display for SyncEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyncEvent::ScanStarted { root } => {
                write!(f, "Scanning {}...", root.display())
            }
            SyncEvent::Planned {
                files_scanned,
                total_files,
                total_bytes,
            } => write!(
                f,
                "Found {} files, {} to upload ({})",
                files_scanned,
                total_files,
                display_file_size(*total_bytes)
            ),
            SyncEvent::UploadStarted {
                index,
                total_files,
                key,
                size,
            } => write!(
                f,
                "Uploading {} of {}: {} ({})",
                index,
                total_files,
                key,
                display_file_size(*size)
            ),
            SyncEvent::UploadCompleted {
                file_count,
                total_files,
                bytes_uploaded,
                total_bytes,
                ..
            } => write!(
                f,
                "Uploaded {} of {}. Size: {}/{}",
                file_count,
                total_files,
                display_file_size(*bytes_uploaded),
                display_file_size(*total_bytes)
            ),
            SyncEvent::UploadFailed {
                index,
                total_files,
                key,
                error,
            } => write!(
                f,
                "Failed {} of {}: {}: {}",
                index, total_files, key, error
            ),
        }
    }
}

/// Progress display for sync operations.
///
/// With bars enabled the byte volume drives a single progress bar; otherwise
/// every event is printed as a line.
pub struct ProgressTracker {
    bar: ProgressBar,
    enabled: bool,
}

impl ProgressTracker {
    /// Create a new progress tracker
    pub fn new(enabled: bool) -> Self {
        let bar = if enabled {
            let pb = ProgressBar::new(0);
            pb.set_style(
                ProgressStyle::default_bar()
                    .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({bytes_per_sec}) {msg:.dim}")
                    .unwrap_or_else(|_| ProgressStyle::default_bar())
                    .progress_chars("=>-"),
            );
            pb.enable_steady_tick(Duration::from_millis(100));
            pb
        } else {
            ProgressBar::hidden()
        };

        Self { bar, enabled }
    }

    /// Feed one engine event into the display
    pub fn handle(&self, event: &SyncEvent) {
        if !self.enabled {
            println!("{}", event);
            return;
        }

        match event {
            SyncEvent::ScanStarted { .. } => self.bar.set_message(event.to_string()),
            SyncEvent::Planned { total_bytes, .. } => {
                self.bar.set_length(*total_bytes);
                self.bar.println(event.to_string());
            }
            SyncEvent::UploadStarted { key, .. } => {
                self.bar.set_message(truncate_key(key, 30));
            }
            SyncEvent::UploadCompleted { bytes_uploaded, .. } => {
                self.bar.set_position(*bytes_uploaded);
            }
            SyncEvent::UploadFailed { .. } => self.bar.println(event.to_string()),
        }
    }

    /// Finish the progress bar
    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

impl Default for ProgressTracker {
    fn default() -> Self {
        Self::new(true)
    }
}

/// Truncate a key for display, keeping the tail
fn truncate_key(key: &str, max_len: usize) -> String {
    let count = key.chars().count();
    if count <= max_len {
        key.to_string()
    } else {
        let tail: String = key.chars().skip(count - max_len + 3).collect();
        format!("...{}", tail)
    }
}
