//! Object storage for rendered envelopes.

pub mod s3;

use std::path::Path;

use anyhow::Result;
use async_trait::async_trait;

pub use s3::S3Storage;

#[async_trait]
pub trait ObjectStorage: Send + Sync {
    async fn upload(&self, file: &Path, bucket: &str, key: &str) -> Result<()>;

    async fn tag(&self, bucket: &str, key: &str, name: &str, value: &str) -> Result<()>;
}

/// Object key for `file_name` under `prefix`, joined with a single `/`.
pub fn object_key(prefix: &str, file_name: &str) -> String {
    if prefix.is_empty() {
        file_name.to_string()
    } else if prefix.ends_with('/') {
        format!("{prefix}{file_name}")
    } else {
        format!("{prefix}/{file_name}")
    }
}
