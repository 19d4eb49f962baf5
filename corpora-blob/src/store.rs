use crate::error::map_s3_error;
use async_trait::async_trait;
use aws_sdk_s3::presigning::PresigningConfig;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;
use corpora_core::CoreError;
use futures::StreamExt;
use std::time::Duration;

/// Metadata for an object already in the store.
#[derive(Debug, Clone)]
pub struct BlobMeta {
    pub key: String,
    pub size_bytes: i64,
}

#[async_trait]
pub trait BlobStore: Send + Sync {
    async fn put(&self, key: &str, bytes: Vec<u8>, content_type: &str) -> Result<(), CoreError>;
    async fn get(&self, key: &str) -> Result<Vec<u8>, CoreError>;
    async fn head(&self, key: &str) -> Result<Option<BlobMeta>, CoreError>;
    async fn delete(&self, key: &str) -> Result<(), CoreError>;
    async fn presigned_url(&self, key: &str, ttl: Duration) -> Result<String, CoreError>;
    async fn list_by_prefix(&self, prefix: &str) -> Result<Vec<String>, CoreError>;
}

/// Maximum lifetime for a presigned URL. Anything longer is clamped — a
/// long-lived signed link is effectively a public one.
const MAX_PRESIGN_TTL: Duration = Duration::from_secs(3600);

pub struct S3BlobStore {
    client: Client,
    bucket: String,
}

impl S3BlobStore {
    #[must_use]
    pub fn new(client: Client, bucket: impl Into<String>) -> Self {
        Self {
            client,
            bucket: bucket.into(),
        }
    }

    pub async fn from_env(bucket: impl Into<String>) -> Self {
        let config = aws_config::load_from_env().await;
        Self::new(Client::new(&config), bucket)
    }
}

#[async_trait]
impl BlobStore for S3BlobStore {
    async fn put(&self, key: &str, bytes: Vec<u8>, content_type: &str) -> Result<(), CoreError> {
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(ByteStream::from(bytes))
            .content_type(content_type)
            .send()
            .await
            .map_err(|e| map_s3_error("put", e))?;
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Vec<u8>, CoreError> {
        let output = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| map_s3_error("get", e))?;
        let bytes = output
            .body
            .collect()
            .await
            .map_err(|e| map_s3_error("get body", e))?;
        Ok(bytes.into_bytes().to_vec())
    }

    async fn head(&self, key: &str) -> Result<Option<BlobMeta>, CoreError> {
        match self
            .client
            .head_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
        {
            Ok(output) => Ok(Some(BlobMeta {
                key: key.to_string(),
                size_bytes: output.content_length().unwrap_or(0),
            })),
            Err(err) => {
                if err
                    .as_service_error()
                    .map(|e| e.is_not_found())
                    .unwrap_or(false)
                {
                    Ok(None)
                } else {
                    Err(map_s3_error("head", err))
                }
            }
        }
    }

    async fn delete(&self, key: &str) -> Result<(), CoreError> {
        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| map_s3_error("delete", e))?;
        Ok(())
    }

    async fn presigned_url(&self, key: &str, ttl: Duration) -> Result<String, CoreError> {
        let ttl = ttl.min(MAX_PRESIGN_TTL);
        let presign_config = PresigningConfig::expires_in(ttl)
            .map_err(|e| CoreError::internal(format!("invalid presign ttl: {e}")))?;
        let presigned = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .presigned(presign_config)
            .await
            .map_err(|e| map_s3_error("presign", e))?;
        Ok(presigned.uri().to_string())
    }

    async fn list_by_prefix(&self, prefix: &str) -> Result<Vec<String>, CoreError> {
        let mut keys = Vec::new();
        let mut stream = self
            .client
            .list_objects_v2()
            .bucket(&self.bucket)
            .prefix(prefix)
            .into_paginator()
            .send();
        while let Some(page) = stream.next().await {
            let page = page.map_err(|e| map_s3_error("list", e))?;
            for obj in page.contents() {
                if let Some(key) = obj.key() {
                    keys.push(key.to_string());
                }
            }
        }
        Ok(keys)
    }
}
