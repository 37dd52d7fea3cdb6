use async_trait::async_trait;
use bytes::Bytes;
use reqwest::{header, Client, RequestBuilder, StatusCode};

use crate::constants::CONTAINER;
use crate::errors::{ConfigError, StorageError};
use crate::storage::connection::{ConnectionConfig, Credentials};
use crate::storage::store::ObjectStore;

/// Storage Proxy クライアント
///
/// Storage Proxy に HTTP リクエストを送信して、固定コンテナ内の
/// オブジェクトを取得・書き込み・削除する
#[derive(Clone)]
pub struct StorageProxyClient {
    client: Client,
    base_url: String,
    credentials: Option<Credentials>,
}

impl StorageProxyClient {
    /// 接続設定から StorageProxyClient を作成する
    pub fn new(config: ConnectionConfig) -> Self {
        Self {
            client: Client::new(),
            base_url: config.endpoint.trim_end_matches('/').to_string(),
            credentials: config.credentials,
        }
    }

    /// 環境変数 STORAGE_CONNECTION から StorageProxyClient を作成する
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self::new(ConnectionConfig::from_env()?))
    }

    /// オブジェクトの URL。キーはセグメントごとにパーセントエンコードする
    fn object_url(&self, key: &str) -> String {
        let encoded: Vec<_> = key.split('/').map(urlencoding::encode).collect();
        format!("{}/{}/{}", self.base_url, CONTAINER, encoded.join("/"))
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.credentials {
            Some(c) => request
                .header("CF-Access-Client-Id", &c.client_id)
                .header("CF-Access-Client-Secret", &c.client_secret),
            None => request,
        }
    }

    async fn send(&self, request: RequestBuilder) -> Result<reqwest::Response, StorageError> {
        self.authorize(request)
            .send()
            .await
            .map_err(|e| StorageError::Internal(e.to_string()))
    }
}

/// 成功以外のステータスを StorageError に変換する
fn status_error(key: &str, status: StatusCode) -> StorageError {
    match status {
        StatusCode::NOT_FOUND => StorageError::NotFound {
            key: key.to_string(),
        },
        StatusCode::FORBIDDEN => {
            tracing::error!(key = %key, "access denied by Storage Proxy");
            StorageError::Forbidden
        }
        status => {
            tracing::error!(key = %key, status = %status, "unexpected response from Storage Proxy");
            StorageError::Internal(format!("unexpected status: {status}"))
        }
    }
}

#[async_trait]
impl ObjectStore for StorageProxyClient {
    async fn get_object(&self, key: &str) -> Result<Bytes, StorageError> {
        let response = self.send(self.client.get(self.object_url(key))).await?;

        let status = response.status();
        if !status.is_success() {
            return Err(status_error(key, status));
        }

        response
            .bytes()
            .await
            .map_err(|e| StorageError::Internal(e.to_string()))
    }

    async fn put_object(
        &self,
        key: &str,
        data: Bytes,
        content_type: &str,
    ) -> Result<(), StorageError> {
        let request = self
            .client
            .put(self.object_url(key))
            .header(header::CONTENT_TYPE, content_type)
            .body(data);
        let response = self.send(request).await?;

        let status = response.status();
        if !status.is_success() {
            return Err(status_error(key, status));
        }
        Ok(())
    }

    async fn delete_object_if_exists(&self, key: &str) -> Result<bool, StorageError> {
        let response = self.send(self.client.delete(self.object_url(key))).await?;

        match response.status() {
            status if status.is_success() => Ok(true),
            StatusCode::NOT_FOUND => Ok(false),
            status => Err(status_error(key, status)),
        }
    }
}
