use std::collections::HashMap;

use async_trait::async_trait;
use bytes::Bytes;
use tokio::sync::RwLock;

use crate::errors::StorageError;
use crate::storage::store::ObjectStore;

/// プロセス内に保持するオブジェクトストア
#[derive(Default)]
pub struct MemoryStore {
    objects: RwLock<HashMap<String, StoredObject>>,
}

#[derive(Debug, Clone)]
pub struct StoredObject {
    pub data: Bytes,
    pub content_type: String,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, key: &str, data: impl Into<Bytes>, content_type: &str) {
        self.objects.write().await.insert(
            key.to_string(),
            StoredObject {
                data: data.into(),
                content_type: content_type.to_string(),
            },
        );
    }

    pub async fn get(&self, key: &str) -> Option<StoredObject> {
        self.objects.read().await.get(key).cloned()
    }

    pub async fn contains(&self, key: &str) -> bool {
        self.objects.read().await.contains_key(key)
    }

    pub async fn keys(&self) -> Vec<String> {
        let mut keys: Vec<_> = self.objects.read().await.keys().cloned().collect();
        keys.sort();
        keys
    }
}

#[async_trait]
impl ObjectStore for MemoryStore {
    async fn get_object(&self, key: &str) -> Result<Bytes, StorageError> {
        self.objects
            .read()
            .await
            .get(key)
            .map(|obj| obj.data.clone())
            .ok_or_else(|| StorageError::NotFound {
                key: key.to_string(),
            })
    }

    async fn put_object(
        &self,
        key: &str,
        data: Bytes,
        content_type: &str,
    ) -> Result<(), StorageError> {
        self.insert(key, data, content_type).await;
        Ok(())
    }

    async fn delete_object_if_exists(&self, key: &str) -> Result<bool, StorageError> {
        Ok(self.objects.write().await.remove(key).is_some())
    }
}
