use crate::store::{BlobMeta, BlobStore};
use async_trait::async_trait;
use corpora_core::CoreError;
use dashmap::DashMap;
use std::time::Duration;

/// In-process stand-in for [`S3BlobStore`](crate::S3BlobStore), used by
/// callers that want to exercise upload/fetch/delete flows without a real
/// bucket.
#[derive(Default)]
pub struct InMemoryBlobStore {
    objects: DashMap<String, Vec<u8>>,
}

impl InMemoryBlobStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BlobStore for InMemoryBlobStore {
    async fn put(&self, key: &str, bytes: Vec<u8>, _content_type: &str) -> Result<(), CoreError> {
        self.objects.insert(key.to_string(), bytes);
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Vec<u8>, CoreError> {
        self.objects
            .get(key)
            .map(|v| v.clone())
            .ok_or_else(|| CoreError::not_found(format!("blob not found: {key}")))
    }

    async fn head(&self, key: &str) -> Result<Option<BlobMeta>, CoreError> {
        Ok(self.objects.get(key).map(|v| BlobMeta {
            key: key.to_string(),
            size_bytes: v.len() as i64,
        }))
    }

    async fn delete(&self, key: &str) -> Result<(), CoreError> {
        self.objects.remove(key);
        Ok(())
    }

    async fn presigned_url(&self, key: &str, ttl: Duration) -> Result<String, CoreError> {
        Ok(format!("memory://{key}?ttl={}", ttl.as_secs()))
    }

    async fn list_by_prefix(&self, prefix: &str) -> Result<Vec<String>, CoreError> {
        Ok(self
            .objects
            .iter()
            .map(|entry| entry.key().clone())
            .filter(|k| k.starts_with(prefix))
            .collect())
    }
}
