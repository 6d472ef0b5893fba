//! Google Cloud Storage store using the object_store crate

use super::ObjectStore;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::types::RemoteEntry;
use async_trait::async_trait;
use bytes::Bytes;
use futures::StreamExt;
use object_store::gcp::GoogleCloudStorageBuilder;
use object_store::path::Path as ObjectPath;
use object_store::{Attribute, Attributes, ObjectStore as _, PutOptions, PutPayload};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Environment variable naming the service-account key file
pub const CREDENTIALS_ENV: &str = "GOOGLE_APPLICATION_CREDENTIALS";

/// Google Cloud Storage bucket
#[derive(Clone)]
pub struct GcsStore {
    /// Object store instance
    store: Arc<dyn object_store::ObjectStore>,
    /// Bucket name (for logging)
    bucket: String,
    /// Cache-control directive for uploads
    cache_control: String,
}

impl GcsStore {
    /// Create a store for `bucket`, failing early when no usable
    /// service-account key is configured
    pub fn new(bucket: String, config: &Config) -> Result<Self> {
        let credentials = resolve_credentials(config.credentials_path.clone())?;

        let store = GoogleCloudStorageBuilder::from_env()
            .with_bucket_name(&bucket)
            .with_application_credentials(credentials.to_string_lossy())
            .build()
            .map_err(|e| Error::credentials(format!("Failed to create GCS client: {}", e)))?;

        Ok(Self {
            store: Arc::new(store),
            bucket,
            cache_control: config.cache_control.clone(),
        })
    }
}

/// Find the service-account key: explicit config first, then the environment.
/// The file must exist.
fn resolve_credentials(configured: Option<PathBuf>) -> Result<PathBuf> {
    let path = configured
        .or_else(|| std::env::var_os(CREDENTIALS_ENV).map(PathBuf::from))
        .ok_or_else(|| {
            Error::credentials(format!(
                "{} environment variable is not set. \
                 Please set it to the path of your service account key file.",
                CREDENTIALS_ENV
            ))
        })?;

    if !path.is_file() {
        return Err(Error::credentials(format!(
            "Credentials file not found at {}. Please check the {} environment variable.",
            path.display(),
            CREDENTIALS_ENV
        )));
    }

    Ok(path)
}

#[async_trait]
impl ObjectStore for GcsStore {
    fn name(&self) -> &'static str {
        "gcs"
    }

    async fn list(&self, prefix: &str) -> Result<Vec<RemoteEntry>> {
        let prefix_path = if prefix.is_empty() {
            None
        } else {
            Some(ObjectPath::parse(prefix).map_err(|e| Error::store_list(prefix, e))?)
        };
        let mut stream = self.store.list(prefix_path.as_ref());
        let mut entries = Vec::new();

        while let Some(result) = stream.next().await {
            let meta = result.map_err(|e| Error::store_list(prefix, e))?;
            entries.push(RemoteEntry::new(meta.location.to_string(), meta.size as u64));
        }

        tracing::debug!(bucket = %self.bucket, prefix, count = entries.len(), "Listed objects");
        Ok(entries)
    }

    async fn upload(&self, local_path: &Path, key: &str) -> Result<()> {
        // Keys are stored verbatim so listings round-trip to the planned key
        let location = ObjectPath::parse(key).map_err(|e| Error::store_upload(key, e))?;
        let data = tokio::fs::read(local_path)
            .await
            .map_err(|e| Error::store_upload(key, e))?;

        let mut attributes = Attributes::new();
        attributes.insert(Attribute::CacheControl, self.cache_control.clone().into());
        let options = PutOptions {
            attributes,
            ..Default::default()
        };

        self.store
            .put_opts(&location, PutPayload::from(Bytes::from(data)), options)
            .await
            .map_err(|e| Error::store_upload(key, e))?;

        tracing::debug!(bucket = %self.bucket, key, "Uploaded object");
        Ok(())
    }
}
