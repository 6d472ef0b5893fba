//! Local tree scanning
//!
//! The walk runs on jwalk's rayon pool inside `spawn_blocking`; results are
//! sorted per directory so the output order is depth-first and stable for a
//! given directory state.

use crate::error::{Error, Result};
use crate::types::LocalFile;
use std::path::Path;

/// Walk `root` and return every regular file below it.
///
/// Directories are not returned and symlinks are not followed. Any unreadable
/// entry aborts the whole scan.
pub async fn scan(root: &Path) -> Result<Vec<LocalFile>> {
    let metadata = tokio::fs::metadata(root)
        .await
        .map_err(|e| Error::scan(root, e))?;
    if !metadata.is_dir() {
        return Err(Error::scan(root, "not a directory"));
    }

    let root = root.to_path_buf();
    let error_root = root.clone();

    tokio::task::spawn_blocking(move || walk(&root))
        .await
        .map_err(|e| Error::scan(error_root, e))?
}

fn walk(root: &Path) -> Result<Vec<LocalFile>> {
    let mut files = Vec::new();

    for entry in jwalk::WalkDir::new(root)
        .sort(true)
        .skip_hidden(false)
        .follow_links(false)
        .parallelism(jwalk::Parallelism::RayonNewPool(num_cpus::get()))
    {
        let entry = entry.map_err(|e| {
            let path = e.path().map(Path::to_path_buf).unwrap_or_else(|| root.to_path_buf());
            Error::scan(path, e)
        })?;

        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        let relative = path
            .strip_prefix(root)
            .map_err(|e| Error::scan(&path, e))?;

        files.push(LocalFile::new(path.clone(), relative_key(relative)));
    }

    tracing::debug!(root = %root.display(), files = files.len(), "Scan complete");
    Ok(files)
}

/// Join the components of a relative path with `/`
fn relative_key(relative: &Path) -> String {
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
