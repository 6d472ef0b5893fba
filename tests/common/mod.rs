//! Shared helpers for integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use cloud_archive::error::{Error, Result};
use cloud_archive::storage::ObjectStore;
use cloud_archive::types::RemoteEntry;
use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tempfile::TempDir;

/// In-memory store recording every call, with injectable failures
#[derive(Default)]
pub struct MemoryStore {
    objects: Mutex<BTreeMap<String, Option<u64>>>,
    list_calls: Mutex<Vec<String>>,
    upload_calls: Mutex<Vec<(PathBuf, String)>>,
    failing_keys: Mutex<HashSet<String>>,
    fail_list: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose listing always fails
    pub fn failing_list() -> Self {
        Self {
            fail_list: true,
            ..Self::default()
        }
    }

    /// Seed an object as if it had been uploaded earlier
    pub fn insert(&self, key: &str, size: Option<u64>) {
        self.objects.lock().unwrap().insert(key.to_string(), size);
    }

    /// Make every upload to `key` fail
    pub fn fail_uploads_to(&self, key: &str) {
        self.failing_keys.lock().unwrap().insert(key.to_string());
    }

    pub fn list_calls(&self) -> Vec<String> {
        self.list_calls.lock().unwrap().clone()
    }

    pub fn upload_calls(&self) -> Vec<(PathBuf, String)> {
        self.upload_calls.lock().unwrap().clone()
    }

    pub fn object_size(&self, key: &str) -> Option<u64> {
        self.objects.lock().unwrap().get(key).copied().flatten()
    }

    pub fn keys(&self) -> Vec<String> {
        self.objects.lock().unwrap().keys().cloned().collect()
    }
}

#[async_trait]
impl ObjectStore for MemoryStore {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn list(&self, prefix: &str) -> Result<Vec<RemoteEntry>> {
        self.list_calls.lock().unwrap().push(prefix.to_string());
        if self.fail_list {
            return Err(Error::store_list(prefix, "permission denied"));
        }

        Ok(self
            .objects
            .lock()
            .unwrap()
            .iter()
            .filter(|(key, _)| key.starts_with(prefix))
            .map(|(key, size)| RemoteEntry {
                key: key.clone(),
                size: *size,
            })
            .collect())
    }

    async fn upload(&self, local_path: &Path, key: &str) -> Result<()> {
        self.upload_calls
            .lock()
            .unwrap()
            .push((local_path.to_path_buf(), key.to_string()));

        if self.failing_keys.lock().unwrap().contains(key) {
            return Err(Error::store_upload(key, "Upload failed"));
        }

        let size = fs::metadata(local_path)
            .map_err(|e| Error::store_upload(key, e))?
            .len();
        self.insert(key, Some(size));
        Ok(())
    }
}

/// Create a file (and its parents) under `dir`
pub fn create_file(dir: &TempDir, name: &str, content: &[u8]) -> PathBuf {
    let path = dir.path().join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&path, content).unwrap();
    path
}

/// The three-file tree used across the sync tests (15 bytes each)
pub fn sample_tree() -> TempDir {
    let dir = TempDir::new().unwrap();
    create_file(&dir, "file1.txt", b"test content 1\n");
    create_file(&dir, "file2.txt", b"test content 2\n");
    create_file(&dir, "subdir/file3.txt", b"test content 3\n");
    dir
}
