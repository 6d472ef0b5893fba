//! Upload plan execution

use super::plan::SyncPlan;
use crate::progress::SyncEvent;
use crate::storage::ObjectStore;
use crate::types::SyncResult;

/// Upload every planned file, one at a time, in plan order.
///
/// A failed upload is reported through `on_progress` and the loop moves on;
/// the returned result only lists the keys that succeeded.
pub async fn execute_plan<F>(
    plan: &SyncPlan,
    store: &dyn ObjectStore,
    on_progress: &mut F,
) -> SyncResult
where
    F: FnMut(&SyncEvent),
{
    let mut result = SyncResult::default();
    let total_files = plan.tasks.len();
    let mut bytes_uploaded = 0u64;

    for (i, task) in plan.tasks.iter().enumerate() {
        let key = &task.destination_key;

        on_progress(&SyncEvent::UploadStarted {
            index: i + 1,
            total_files,
            key: key.clone(),
            size: task.size,
        });
        tracing::info!(key = %key, size = task.size, backend = store.name(), "Uploading");

        match store.upload(&task.absolute_path, key).await {
            Ok(()) => {
                bytes_uploaded += task.size;
                result.record(key.clone());

                on_progress(&SyncEvent::UploadCompleted {
                    file_count: result.total_files_uploaded,
                    total_files,
                    key: key.clone(),
                    bytes_uploaded,
                    total_bytes: plan.total_bytes,
                });
            }
            Err(e) => {
                tracing::error!(key = %key, error = %e, "Upload failed");

                on_progress(&SyncEvent::UploadFailed {
                    index: i + 1,
                    total_files,
                    key: key.clone(),
                    error: e.to_string(),
                });
            }
        }
    }

    result
}
