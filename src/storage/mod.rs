//! Object stores that can receive an archive

pub mod gcs;
pub mod local;
pub mod s3;

use crate::config::Config;
use crate::error::Result;
use crate::types::RemoteEntry;
use crate::uri::Location;
use async_trait::async_trait;
use std::path::Path;
use std::sync::Arc;

pub use gcs::GcsStore;
pub use local::LocalStore;
pub use s3::S3Store;

/// Cache-control directive set on uploaded objects unless configured otherwise
pub const DEFAULT_CACHE_CONTROL: &str = "public, max-age=31536000";

/// A bucket-like store addressed by slash-separated keys.
///
/// The sync engine only needs these two operations, which keeps it testable
/// against an in-memory store.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Short backend name for logging
    fn name(&self) -> &'static str;

    /// List every object whose key starts with `prefix`
    async fn list(&self, prefix: &str) -> Result<Vec<RemoteEntry>>;

    /// Upload the whole file at `local_path` to `key`, replacing any existing object
    async fn upload(&self, local_path: &Path, key: &str) -> Result<()>;
}

/// Build the store for a destination location.
///
/// Returns the store together with the key prefix inside it.
pub async fn create_store(
    location: &Location,
    config: &Config,
) -> Result<(Arc<dyn ObjectStore>, String)> {
    let store: Arc<dyn ObjectStore> = match location {
        Location::Local(path) => Arc::new(LocalStore::new(path.clone())),
        Location::Gcs { bucket, .. } => Arc::new(GcsStore::new(bucket.clone(), config)?),
        Location::S3 { bucket, .. } => Arc::new(S3Store::new(bucket.clone(), config).await?),
    };

    Ok((store, location.prefix().to_string()))
}
