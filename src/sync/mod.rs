//! Sync engine and orchestration
//!
//! A run is a single linear pass: scan the local tree, list the destination
//! prefix once, plan, then upload sequentially.

pub mod execute;
pub mod plan;
pub mod scan;

use crate::error::Result;
use crate::progress::SyncEvent;
use crate::storage::ObjectStore;
use crate::types::SyncResult;
use plan::SyncPlan;
use std::path::PathBuf;
use std::sync::Arc;

pub use plan::{destination_key, normalize_key};

/// The main sync engine
pub struct SyncEngine {
    /// Local directory to archive
    local_root: PathBuf,
    /// Key prefix objects are placed under
    destination_prefix: String,
    /// Destination store
    store: Arc<dyn ObjectStore>,
}

impl SyncEngine {
    /// Create a new sync engine
    pub fn new(
        local_root: impl Into<PathBuf>,
        destination_prefix: impl Into<String>,
        store: Arc<dyn ObjectStore>,
    ) -> Self {
        Self {
            local_root: local_root.into(),
            destination_prefix: normalize_key(&destination_prefix.into()),
            store,
        }
    }

    /// Destination prefix, `/`-normalized
    pub fn destination_prefix(&self) -> &str {
        &self.destination_prefix
    }

    /// Upload every file that is missing remotely or differs in size.
    ///
    /// Fails only if the scan or the remote listing fails; individual upload
    /// failures are reported through `on_progress` and left out of the result.
    pub async fn sync<F>(&self, mut on_progress: F) -> Result<SyncResult>
    where
        F: FnMut(&SyncEvent),
    {
        let plan = self.build_plan(&mut on_progress).await?;

        let result = execute::execute_plan(&plan, self.store.as_ref(), &mut on_progress).await;

        tracing::info!(
            uploaded = result.total_files_uploaded,
            planned = plan.tasks.len(),
            failed = plan.tasks.len() - result.total_files_uploaded,
            "Sync complete"
        );

        Ok(result)
    }

    /// Scan, list and plan without uploading anything
    pub async fn plan_only(&self) -> Result<SyncPlan> {
        self.build_plan(&mut |_: &SyncEvent| {}).await
    }

    async fn build_plan<F>(&self, on_progress: &mut F) -> Result<SyncPlan>
    where
        F: FnMut(&SyncEvent),
    {
        on_progress(&SyncEvent::ScanStarted {
            root: self.local_root.clone(),
        });
        tracing::info!(root = %self.local_root.display(), "Scanning files...");
        let local_files = scan::scan(&self.local_root).await?;

        tracing::info!(
            prefix = %self.destination_prefix,
            backend = self.store.name(),
            "Listing destination..."
        );
        let remote = self.store.list(&self.destination_prefix).await?;

        tracing::info!(
            local_files = local_files.len(),
            remote_files = remote.len(),
            "Computing differences..."
        );
        let tasks = plan::plan(&local_files, &remote, &self.destination_prefix).await?;
        let plan = SyncPlan::new(tasks, local_files.len());

        tracing::info!(
            uploads = plan.tasks.len(),
            skips = plan.files_skipped(),
            bytes = plan.total_bytes,
            "Plan complete"
        );
        on_progress(&SyncEvent::Planned {
            files_scanned: plan.files_scanned,
            total_files: plan.tasks.len(),
            total_bytes: plan.total_bytes,
        });

        Ok(plan)
    }
}
