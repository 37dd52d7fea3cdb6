use axum::extract::{DefaultBodyLimit, Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use bytes::Bytes;
use serde::Deserialize;

use crate::process::{self, Outcome, ProcessError};
use crate::AppState;
use convert_core::{StorageError, TransformError};

/// 受け付ける本文の最大サイズ
const MAX_INPUT_SIZE: usize = 256 * 1024 * 1024;

/// 名前のみを運ぶ通知
#[derive(Debug, Deserialize)]
pub struct BlobEvent {
    pub name: String,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/blobs/{*name}", post(receive_blob))
        .route("/events", post(receive_event))
        .layer(DefaultBodyLimit::max(MAX_INPUT_SIZE))
        .with_state(state)
}

pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}

/// 内容付きの blob 作成通知
pub async fn receive_blob(
    State(state): State<AppState>,
    Path(name): Path<String>,
    body: Bytes,
) -> Result<Json<Outcome>, AppError> {
    let outcome = process::process_blob(state.store.as_ref(), &name, body).await?;
    Ok(Json(outcome))
}

/// 名前のみの blob 作成通知
pub async fn receive_event(
    State(state): State<AppState>,
    Json(event): Json<BlobEvent>,
) -> Result<Json<Outcome>, AppError> {
    let outcome = process::process_notification(state.store.as_ref(), &event.name).await?;
    Ok(Json(outcome))
}

/// 非 2xx を返すことで、ホスト側のトリガーに再配信を委ねる
#[derive(Debug)]
pub enum AppError {
    BadRequest(String),
    NotFound(String),
    TransformFailed(String),
    StorageUnavailable(String),
    Internal(String),
}

impl From<ProcessError> for AppError {
    fn from(err: ProcessError) -> Self {
        let message = err.to_string();
        match err {
            // 名前付きのログは process 側で出力済み
            ProcessError::Validation { .. } => AppError::BadRequest(message),
            ProcessError::Fetch {
                source: StorageError::NotFound { .. },
                ..
            } => AppError::NotFound(message),
            ProcessError::Convert {
                source: TransformError::Encode(_),
                ..
            } => AppError::Internal(message),
            ProcessError::Convert { .. } => AppError::TransformFailed(message),
            ProcessError::Fetch { .. } | ProcessError::Upload { .. } | ProcessError::Delete { .. } => {
                AppError::StorageUnavailable(message)
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::TransformFailed(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg),
            AppError::StorageUnavailable(msg) => {
                tracing::error!(error = %msg, "storage unavailable");
                (StatusCode::BAD_GATEWAY, "storage unavailable".to_string())
            }
            AppError::Internal(msg) => {
                tracing::error!(error = %msg, "internal server error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_string(),
                )
            }
        };

        let body = serde_json::json!({ "error": message });
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::tests::{png_bytes, FailingStore};
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request};
    use convert_core::MemoryStore;
    use std::sync::Arc;
    use tower::ServiceExt;

    fn app() -> (Router, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        let state = AppState {
            store: store.clone(),
        };
        (router(state), store)
    }

    #[tokio::test]
    async fn test_health() {
        let (app, _) = app();
        let response = app
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_receive_blob_converts() {
        let (app, store) = app();
        let png = png_bytes(6, 6);
        store.insert("2024/photo.png", png.clone(), "image/png").await;

        let response = app
            .oneshot(
                Request::post("/blobs/2024/photo.png")
                    .body(Body::from(png))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(store.keys().await, vec!["2024/photo.jpg".to_string()]);
    }

    #[tokio::test]
    async fn test_receive_blob_skip() {
        let (app, store) = app();

        let response = app
            .oneshot(
                Request::post("/blobs/notes.txt")
                    .body(Body::from("hello"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(store.keys().await.is_empty());
    }

    #[tokio::test]
    async fn test_receive_blob_invalid_image() {
        let (app, store) = app();
        store.insert("bad.png", b"garbage".to_vec(), "image/png").await;

        let response = app
            .oneshot(
                Request::post("/blobs/bad.png")
                    .body(Body::from("garbage"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(store.keys().await, vec!["bad.png".to_string()]);
    }

    #[tokio::test]
    async fn test_receive_event_missing_source() {
        let (app, _) = app();

        let response = app
            .oneshot(
                Request::post("/events")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(r#"{"name":"missing.png"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_receive_event_converts() {
        let (app, store) = app();
        store.insert("pic.PNG", png_bytes(3, 9), "image/png").await;

        let response = app
            .oneshot(
                Request::post("/events")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(r#"{"name":"pic.PNG"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(store.keys().await, vec!["pic.jpg".to_string()]);
    }

    async fn error_message(response: Response) -> String {
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        json["error"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn test_storage_failure_hides_details() {
        let store = Arc::new(FailingStore {
            inner: MemoryStore::new(),
            fail_put: true,
            fail_delete: false,
        });
        let app = router(AppState { store });

        let response = app
            .oneshot(
                Request::post("/blobs/a.png")
                    .body(Body::from(png_bytes(4, 4)))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        let message = error_message(response).await;
        assert_eq!(message, "storage unavailable");
        assert!(!message.contains("put rejected"));
    }

    #[tokio::test]
    async fn test_invalid_name_returns_bad_request() {
        let (app, store) = app();

        let response = app
            .oneshot(
                Request::post("/blobs/a/%2E%2E/b.png")
                    .body(Body::from(png_bytes(2, 2)))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(error_message(response).await.contains("a/../b.png"));
        assert!(store.keys().await.is_empty());
    }

    #[tokio::test]
    async fn test_receive_blob_literal_percent_name() {
        let (app, store) = app();
        let png = png_bytes(5, 5);
        store.insert("%FF.png", png.clone(), "image/png").await;

        // パスの %25 は '%' にデコードされる
        let response = app
            .oneshot(
                Request::post("/blobs/%25FF.png")
                    .body(Body::from(png))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(store.keys().await, vec!["%FF.jpg".to_string()]);
    }
}
