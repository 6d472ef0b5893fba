//! URI parsing for archive destinations

use crate::error::{Error, Result};
use std::path::PathBuf;
use url::Url;

/// Where an archive is written
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Location {
    /// Local directory used as a bucket
    Local(PathBuf),

    /// AWS S3 bucket and key prefix
    S3 { bucket: String, prefix: String },

    /// Google Cloud Storage bucket and key prefix
    Gcs { bucket: String, prefix: String },
}

impl Location {
    /// Parse a location string into a Location enum
    pub fn parse(s: &str) -> Result<Self> {
        if let Some((scheme, _)) = s.split_once("://") {
            match scheme.to_lowercase().as_str() {
                "s3" => {
                    let (bucket, prefix) = parse_bucket_uri(s)?;
                    return Ok(Location::S3 { bucket, prefix });
                }
                "gs" => {
                    let (bucket, prefix) = parse_bucket_uri(s)?;
                    return Ok(Location::Gcs { bucket, prefix });
                }
                "file" => {
                    let path = s.strip_prefix("file://").unwrap_or(s);
                    return Ok(Location::Local(PathBuf::from(path)));
                }
                other => {
                    return Err(Error::InvalidUri {
                        uri: s.to_string(),
                        reason: format!("unsupported scheme '{}'", other),
                    })
                }
            }
        }

        Ok(Location::Local(PathBuf::from(s)))
    }

    /// Key prefix inside the store (empty for local directories)
    pub fn prefix(&self) -> &str {
        match self {
            Location::Local(_) => "",
            Location::S3 { prefix, .. } | Location::Gcs { prefix, .. } => prefix.as_str(),
        }
    }

    /// Get the scheme/protocol name
    pub fn scheme(&self) -> &'static str {
        match self {
            Location::Local(_) => "file",
            Location::S3 { .. } => "s3",
            Location::Gcs { .. } => "gs",
        }
    }

    /// Convert back to a URI string
    pub fn to_uri(&self) -> String {
        match self {
            Location::Local(path) => path.display().to_string(),
            Location::S3 { bucket, prefix } | Location::Gcs { bucket, prefix } => {
                if prefix.is_empty() {
                    format!("{}://{}", self.scheme(), bucket)
                } else {
                    format!("{}://{}/{}", self.scheme(), bucket, prefix)
                }
            }
        }
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_uri())
    }
}

/// Split `scheme://bucket/some/prefix/` into bucket and a prefix without
/// surrounding slashes.
///
/// The bucket is validated by `Url`; the prefix is taken from the raw string
/// so object keys keep spaces, `#`, `?` and non-ASCII characters as written.
fn parse_bucket_uri(s: &str) -> Result<(String, String)> {
    let url = Url::parse(s).map_err(|e| Error::InvalidUri {
        uri: s.to_string(),
        reason: e.to_string(),
    })?;

    let bucket = url
        .host_str()
        .filter(|h| !h.is_empty())
        .ok_or_else(|| Error::InvalidUri {
            uri: s.to_string(),
            reason: "missing bucket name".to_string(),
        })?
        .to_string();

    let prefix = s
        .split_once("://")
        .and_then(|(_, rest)| rest.split_once('/'))
        .map(|(_, path)| path.trim_matches('/').to_string())
        .unwrap_or_default();

    Ok((bucket, prefix))
}
