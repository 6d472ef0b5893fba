//! Sync engine tests against an in-memory store

mod common;

use cloud_archive::error::Error;
use cloud_archive::progress::SyncEvent;
use cloud_archive::sync::SyncEngine;
use common::{create_file, sample_tree, MemoryStore};
use pretty_assertions::assert_eq;
use std::sync::Arc;
use tempfile::TempDir;

const PREFIX: &str = "backups/2024";

fn engine(dir: &TempDir, store: &Arc<MemoryStore>) -> SyncEngine {
    SyncEngine::new(dir.path(), PREFIX, store.clone())
}

#[tokio::test]
async fn test_uploads_whole_tree_to_empty_prefix() {
    let dir = sample_tree();
    let store = Arc::new(MemoryStore::new());

    let result = engine(&dir, &store).sync(|_| {}).await.unwrap();

    assert_eq!(
        result.uploaded_files,
        vec![
            "backups/2024/file1.txt",
            "backups/2024/file2.txt",
            "backups/2024/subdir/file3.txt",
        ]
    );
    assert_eq!(result.total_files_uploaded, 3);

    assert_eq!(store.list_calls(), vec![PREFIX.to_string()]);
    assert_eq!(
        store.upload_calls(),
        vec![
            (dir.path().join("file1.txt"), "backups/2024/file1.txt".to_string()),
            (dir.path().join("file2.txt"), "backups/2024/file2.txt".to_string()),
            (
                dir.path().join("subdir/file3.txt"),
                "backups/2024/subdir/file3.txt".to_string()
            ),
        ]
    );
    assert_eq!(store.object_size("backups/2024/subdir/file3.txt"), Some(15));
}

#[tokio::test]
async fn test_second_run_uploads_nothing() {
    let dir = sample_tree();
    let store = Arc::new(MemoryStore::new());
    let engine = engine(&dir, &store);

    assert_eq!(engine.sync(|_| {}).await.unwrap().total_files_uploaded, 3);

    let second = engine.sync(|_| {}).await.unwrap();
    assert_eq!(second.total_files_uploaded, 0);
    assert!(second.uploaded_files.is_empty());
    assert_eq!(store.upload_calls().len(), 3);
    assert_eq!(store.list_calls().len(), 2);
}

#[tokio::test]
async fn test_skips_existing_files_with_same_size() {
    let dir = sample_tree();
    let store = Arc::new(MemoryStore::new());
    store.insert("backups/2024/file1.txt", Some(15));
    store.insert("backups/2024/subdir/file3.txt", Some(15));

    let result = engine(&dir, &store).sync(|_| {}).await.unwrap();

    assert_eq!(result.uploaded_files, vec!["backups/2024/file2.txt"]);
    assert_eq!(result.total_files_uploaded, 1);
    assert_eq!(
        store.upload_calls(),
        vec![(dir.path().join("file2.txt"), "backups/2024/file2.txt".to_string())]
    );
}

#[tokio::test]
async fn test_size_change_triggers_reupload() {
    let dir = sample_tree();
    let store = Arc::new(MemoryStore::new());
    store.insert("backups/2024/file1.txt", Some(16));
    store.insert("backups/2024/file2.txt", Some(15));
    store.insert("backups/2024/subdir/file3.txt", Some(15));

    let result = engine(&dir, &store).sync(|_| {}).await.unwrap();

    assert_eq!(result.uploaded_files, vec!["backups/2024/file1.txt"]);
    assert_eq!(store.object_size("backups/2024/file1.txt"), Some(15));
}

#[tokio::test]
async fn test_local_edit_detected_on_next_run() {
    let dir = sample_tree();
    let store = Arc::new(MemoryStore::new());
    let engine = engine(&dir, &store);
    engine.sync(|_| {}).await.unwrap();

    create_file(&dir, "subdir/file3.txt", b"a longer replacement body\n");
    create_file(&dir, "subdir/new.txt", b"new");

    let result = engine.sync(|_| {}).await.unwrap();
    assert_eq!(
        result.uploaded_files,
        vec!["backups/2024/subdir/file3.txt", "backups/2024/subdir/new.txt"]
    );
}

#[tokio::test]
async fn test_remote_entry_without_size_is_reuploaded() {
    let dir = sample_tree();
    let store = Arc::new(MemoryStore::new());
    store.insert("backups/2024/file1.txt", None);
    store.insert("backups/2024/file2.txt", Some(15));
    store.insert("backups/2024/subdir/file3.txt", Some(15));

    let result = engine(&dir, &store).sync(|_| {}).await.unwrap();
    assert_eq!(result.uploaded_files, vec!["backups/2024/file1.txt"]);
}

#[tokio::test]
async fn test_single_failure_does_not_abort_run() {
    let dir = sample_tree();
    let store = Arc::new(MemoryStore::new());
    store.fail_uploads_to("backups/2024/file2.txt");

    let mut failures = Vec::new();
    let result = engine(&dir, &store)
        .sync(|event| {
            if let SyncEvent::UploadFailed { key, error, .. } = event {
                failures.push((key.clone(), error.clone()));
            }
        })
        .await
        .unwrap();

    assert_eq!(store.upload_calls().len(), 3);
    assert_eq!(result.total_files_uploaded, 2);
    assert_eq!(
        result.uploaded_files,
        vec!["backups/2024/file1.txt", "backups/2024/subdir/file3.txt"]
    );
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].0, "backups/2024/file2.txt");
    assert!(failures[0].1.contains("Upload failed"));
}

#[tokio::test]
async fn test_failed_file_retried_on_next_run() {
    let dir = sample_tree();
    let store = Arc::new(MemoryStore::new());
    store.fail_uploads_to("backups/2024/file2.txt");
    let engine = engine(&dir, &store);

    engine.sync(|_| {}).await.unwrap();
    let second = engine.sync(|_| {}).await.unwrap();

    // still failing, but it is the only file attempted again
    assert_eq!(second.total_files_uploaded, 0);
    assert_eq!(store.upload_calls().len(), 4);
    assert_eq!(store.upload_calls()[3].1, "backups/2024/file2.txt");
}

#[tokio::test]
async fn test_progress_events_in_order() {
    let dir = sample_tree();
    let store = Arc::new(MemoryStore::new());
    store.insert("backups/2024/file1.txt", Some(15));
    store.fail_uploads_to("backups/2024/subdir/file3.txt");

    let mut events = Vec::new();
    engine(&dir, &store)
        .sync(|event| events.push(event.clone()))
        .await
        .unwrap();

    assert_eq!(
        events,
        vec![
            SyncEvent::ScanStarted {
                root: dir.path().to_path_buf(),
            },
            SyncEvent::Planned {
                files_scanned: 3,
                total_files: 2,
                total_bytes: 30,
            },
            SyncEvent::UploadStarted {
                index: 1,
                total_files: 2,
                key: "backups/2024/file2.txt".to_string(),
                size: 15,
            },
            SyncEvent::UploadCompleted {
                file_count: 1,
                total_files: 2,
                key: "backups/2024/file2.txt".to_string(),
                bytes_uploaded: 15,
                total_bytes: 30,
            },
            SyncEvent::UploadStarted {
                index: 2,
                total_files: 2,
                key: "backups/2024/subdir/file3.txt".to_string(),
                size: 15,
            },
            SyncEvent::UploadFailed {
                index: 2,
                total_files: 2,
                key: "backups/2024/subdir/file3.txt".to_string(),
                error: "Failed to upload 'backups/2024/subdir/file3.txt': Upload failed"
                    .to_string(),
            },
        ]
    );
}

#[tokio::test]
async fn test_listing_failure_is_fatal() {
    let dir = sample_tree();
    let store = Arc::new(MemoryStore::failing_list());

    let err = engine(&dir, &store).sync(|_| {}).await.unwrap_err();

    assert!(matches!(err, Error::StoreList { ref prefix, .. } if prefix == PREFIX));
    assert!(err.is_fatal());
    assert!(store.upload_calls().is_empty());
}

#[tokio::test]
async fn test_missing_source_is_fatal() {
    let dir = TempDir::new().unwrap();
    let store = Arc::new(MemoryStore::new());
    let engine = SyncEngine::new(dir.path().join("nope"), PREFIX, store.clone());

    let mut events = Vec::new();
    let err = engine.sync(|e| events.push(e.clone())).await.unwrap_err();

    assert!(matches!(err, Error::Scan { .. }));
    assert!(store.list_calls().is_empty());
    assert_eq!(events.len(), 1);
}

#[tokio::test]
async fn test_empty_prefix_uses_relative_paths_as_keys() {
    let dir = sample_tree();
    let store = Arc::new(MemoryStore::new());

    let result = SyncEngine::new(dir.path(), "", store.clone())
        .sync(|_| {})
        .await
        .unwrap();

    assert_eq!(
        result.uploaded_files,
        vec!["file1.txt", "file2.txt", "subdir/file3.txt"]
    );
    assert_eq!(store.list_calls(), vec![String::new()]);
}

#[tokio::test]
async fn test_backslash_prefix_normalized() {
    let dir = sample_tree();
    let store = Arc::new(MemoryStore::new());

    let engine = SyncEngine::new(dir.path(), "backups\\2024\\", store.clone());
    assert_eq!(engine.destination_prefix(), "backups/2024/");

    let result = engine.sync(|_| {}).await.unwrap();
    assert!(result.uploaded_files.iter().all(|k| !k.contains('\\')));
    assert_eq!(result.uploaded_files[2], "backups/2024/subdir/file3.txt");
}

#[tokio::test]
async fn test_plan_only_uploads_nothing() {
    let dir = sample_tree();
    let store = Arc::new(MemoryStore::new());
    store.insert("backups/2024/file2.txt", Some(15));

    let plan = engine(&dir, &store).plan_only().await.unwrap();

    let keys: Vec<_> = plan.tasks.iter().map(|t| t.destination_key.as_str()).collect();
    assert_eq!(keys, vec!["backups/2024/file1.txt", "backups/2024/subdir/file3.txt"]);
    assert_eq!(plan.total_bytes, 30);
    assert_eq!(plan.files_skipped(), 1);
    assert!(store.upload_calls().is_empty());
}
