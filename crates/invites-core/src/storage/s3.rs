use std::path::Path;

use anyhow::{Context, Result};
use async_trait::async_trait;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::types::{Tag, Tagging};
use aws_sdk_s3::Client;
use tracing::debug;

use super::ObjectStorage;

/// S3 client configured from the standard AWS environment.
pub struct S3Storage {
    client: Client,
}

impl S3Storage {
    pub async fn from_env() -> Self {
        let config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
        Self {
            client: Client::new(&config),
        }
    }
}

#[async_trait]
impl ObjectStorage for S3Storage {
    async fn upload(&self, file: &Path, bucket: &str, key: &str) -> Result<()> {
        let body = ByteStream::from_path(file)
            .await
            .with_context(|| format!("Failed to read {}", file.display()))?;

        self.client
            .put_object()
            .bucket(bucket)
            .key(key)
            .body(body)
            .send()
            .await
            .with_context(|| format!("Failed to upload s3://{bucket}/{key}"))?;

        debug!(bucket, key, "Uploaded object");
        Ok(())
    }

    async fn tag(&self, bucket: &str, key: &str, name: &str, value: &str) -> Result<()> {
        let tagging = Tagging::builder()
            .tag_set(Tag::builder().key(name).value(value).build()?)
            .build()?;

        self.client
            .put_object_tagging()
            .bucket(bucket)
            .key(key)
            .tagging(tagging)
            .send()
            .await
            .with_context(|| format!("Failed to tag s3://{bucket}/{key}"))?;

        Ok(())
    }
}
