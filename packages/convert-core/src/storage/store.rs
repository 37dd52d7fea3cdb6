use async_trait::async_trait;
use bytes::Bytes;

use crate::errors::StorageError;

/// コンテナ内のオブジェクトに対する操作
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// オブジェクトを取得する。存在しない場合は `StorageError::NotFound`
    async fn get_object(&self, key: &str) -> Result<Bytes, StorageError>;

    /// オブジェクトを書き込む。既存のオブジェクトは無条件に上書きされる
    async fn put_object(&self, key: &str, data: Bytes, content_type: &str)
        -> Result<(), StorageError>;

    /// オブジェクトが存在すれば削除する。削除した場合は true
    async fn delete_object_if_exists(&self, key: &str) -> Result<bool, StorageError>;
}
