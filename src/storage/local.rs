//! Local directory acting as a bucket

use super::ObjectStore;
use crate::error::{Error, Result};
use crate::types::RemoteEntry;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Stores objects as files under a root directory; the key is the
/// `/`-separated path below the root.
#[derive(Debug, Clone)]
pub struct LocalStore {
    /// Root directory of the store
    root: PathBuf,
}

impl LocalStore {
    /// Create a new local store rooted at `root`
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// Resolve a key to a path below the root
    fn resolve(&self, key: &str) -> PathBuf {
        key.split('/')
            .filter(|segment| !segment.is_empty())
            .fold(self.root.clone(), |path, segment| path.join(segment))
    }
}

#[async_trait]
impl ObjectStore for LocalStore {
    fn name(&self) -> &'static str {
        "local"
    }

    async fn list(&self, prefix: &str) -> Result<Vec<RemoteEntry>> {
        let root = self.root.clone();

        // An archive that has never been written to is simply empty
        let exists = fs::try_exists(&root)
            .await
            .map_err(|e| Error::store_list(prefix, e))?;
        if !exists {
            return Ok(Vec::new());
        }

        let list_prefix = prefix.to_string();
        let entries = tokio::task::spawn_blocking(move || -> Result<Vec<RemoteEntry>> {
            let mut results = Vec::new();

            for entry in jwalk::WalkDir::new(&root)
                .sort(true)
                .skip_hidden(false)
                .follow_links(false)
            {
                let entry = entry.map_err(|e| Error::store_list(list_prefix.as_str(), e))?;
                if !entry.file_type().is_file() {
                    continue;
                }

                let path = entry.path();
                let relative = path.strip_prefix(&root).unwrap_or(&path);
                let key = relative
                    .components()
                    .map(|c| c.as_os_str().to_string_lossy())
                    .collect::<Vec<_>>()
                    .join("/");
                let size = entry
                    .metadata()
                    .map_err(|e| Error::store_list(list_prefix.as_str(), e))?
                    .len();

                results.push(RemoteEntry::new(key, size));
            }

            Ok(results)
        })
        .await
        .map_err(|e| Error::store_list(prefix, e))??;

        Ok(entries
            .into_iter()
            .filter(|entry| entry.key.starts_with(prefix))
            .collect())
    }

    async fn upload(&self, local_path: &Path, key: &str) -> Result<()> {
        let target = self.resolve(key);

        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| Error::store_upload(key, e))?;
        }

        fs::copy(local_path, &target)
            .await
            .map_err(|e| Error::store_upload(key, e))?;

        tracing::debug!(key, target = %target.display(), "Stored file");
        Ok(())
    }
}
