//! AWS S3 (and S3-compatible) store

use super::ObjectStore;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::types::RemoteEntry;
use async_trait::async_trait;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;
use std::path::Path;

/// AWS S3 bucket
#[derive(Clone)]
pub struct S3Store {
    /// S3 client
    client: Client,
    /// Bucket name
    bucket: String,
    /// Cache-control directive for uploads
    cache_control: String,
}

impl S3Store {
    /// Create a new S3 store, honoring a custom endpoint from the config
    pub async fn new(bucket: String, config: &Config) -> Result<Self> {
        let sdk_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;

        let client = match &config.s3_endpoint {
            Some(endpoint) => {
                tracing::debug!(endpoint = %endpoint, "Using custom S3 endpoint");
                let s3_config = aws_sdk_s3::config::Builder::from(&sdk_config)
                    .endpoint_url(endpoint)
                    .force_path_style(true)
                    .build();
                Client::from_conf(s3_config)
            }
            None => Client::new(&sdk_config),
        };

        Ok(Self {
            client,
            bucket,
            cache_control: config.cache_control.clone(),
        })
    }
}

#[async_trait]
impl ObjectStore for S3Store {
    fn name(&self) -> &'static str {
        "s3"
    }

    async fn list(&self, prefix: &str) -> Result<Vec<RemoteEntry>> {
        let mut entries = Vec::new();

        let mut paginator = self
            .client
            .list_objects_v2()
            .bucket(&self.bucket)
            .prefix(prefix)
            .into_paginator()
            .send();

        while let Some(page) = paginator.next().await {
            let output = page.map_err(|e| Error::store_list(prefix, e))?;

            for obj in output.contents() {
                if let Some(key) = obj.key() {
                    entries.push(RemoteEntry {
                        key: key.to_string(),
                        size: obj.size().and_then(|s| u64::try_from(s).ok()),
                    });
                }
            }
        }

        tracing::debug!(bucket = %self.bucket, prefix, count = entries.len(), "Listed objects");
        Ok(entries)
    }

    async fn upload(&self, local_path: &Path, key: &str) -> Result<()> {
        let body = ByteStream::from_path(local_path)
            .await
            .map_err(|e| Error::store_upload(key, e))?;

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .cache_control(&self.cache_control)
            .body(body)
            .send()
            .await
            .map_err(|e| Error::store_upload(key, e))?;

        tracing::debug!(bucket = %self.bucket, key, "Uploaded object");
        Ok(())
    }
}
