use bytes::Bytes;
use serde::Serialize;

use convert_core::{
    convert_to_jpeg, is_convertible, target_name, validate_key, MediaError, ObjectStore,
    StorageError, TransformError,
};

const JPEG_CONTENT_TYPE: &str = "image/jpeg";

/// 1 回の起動の結果
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum Outcome {
    /// PNG 以外のため何もしなかった
    Skipped { source: String },
    /// 変換・保存・元オブジェクト削除まで完了した
    Converted { source: String, target: String },
}

/// 処理の失敗。どの段階で止まったかを表し、残りの段階は実行されない
#[derive(Debug, thiserror::Error)]
pub enum ProcessError {
    #[error("invalid object name {name:?}: {reason}")]
    Validation { name: String, reason: String },

    #[error("failed to fetch {name}: {source}")]
    Fetch { name: String, source: StorageError },

    #[error("failed to convert {name}: {source}")]
    Convert { name: String, source: TransformError },

    #[error("failed to upload {target} (source {name}): {source}")]
    Upload {
        name: String,
        target: String,
        source: StorageError,
    },

    #[error("failed to delete {name} after upload: {source}")]
    Delete { name: String, source: StorageError },
}

/// 名前を検証する。不正な名前ではストレージに一切触れない
fn check_name(name: &str) -> Result<(), ProcessError> {
    validate_key(name).map_err(|err| {
        let reason = match err {
            MediaError::Validation(reason) => reason,
            MediaError::Storage(e) => e.to_string(),
            MediaError::Transform(e) => e.to_string(),
        };
        tracing::warn!(name = %name, error = %reason, "invalid object name");
        ProcessError::Validation {
            name: name.to_string(),
            reason,
        }
    })
}

/// 内容付きの通知を処理する
pub async fn process_blob(
    store: &dyn ObjectStore,
    name: &str,
    input: Bytes,
) -> Result<Outcome, ProcessError> {
    tracing::info!(name = %name, size = input.len(), "blob trigger received");

    check_name(name)?;

    if !is_convertible(name) {
        return Ok(skip(name));
    }

    convert_and_commit(store, name, &input)
        .await
        .inspect_err(|e| tracing::error!(name = %name, error = %e, "error processing blob"))
}

/// 名前のみの通知を処理する。内容はストレージから取得する
pub async fn process_notification(
    store: &dyn ObjectStore,
    name: &str,
) -> Result<Outcome, ProcessError> {
    tracing::info!(name = %name, "blob notification received");

    check_name(name)?;

    if !is_convertible(name) {
        return Ok(skip(name));
    }

    let result = async {
        let input = store
            .get_object(name)
            .await
            .map_err(|source| ProcessError::Fetch {
                name: name.to_string(),
                source,
            })?;
        convert_and_commit(store, name, &input).await
    }
    .await;

    result.inspect_err(|e| tracing::error!(name = %name, error = %e, "error processing blob"))
}

fn skip(name: &str) -> Outcome {
    tracing::info!(name = %name, "blob is not a PNG file, no action taken");
    Outcome::Skipped {
        source: name.to_string(),
    }
}

/// 変換 → 書き込み → 元オブジェクト削除
///
/// 失敗した時点で停止し、それまでの変更は巻き戻さない。
/// 同名への同時起動は調停しない（後勝ちで上書きされ、削除は冪等）。
async fn convert_and_commit(
    store: &dyn ObjectStore,
    name: &str,
    input: &[u8],
) -> Result<Outcome, ProcessError> {
    let target = target_name(name);

    let output = convert_to_jpeg(input).map_err(|source| ProcessError::Convert {
        name: name.to_string(),
        source,
    })?;

    store
        .put_object(&target, output, JPEG_CONTENT_TYPE)
        .await
        .map_err(|source| ProcessError::Upload {
            name: name.to_string(),
            target: target.clone(),
            source,
        })?;
    tracing::info!(name = %name, target = %target, "converted and saved successfully");

    let deleted = store
        .delete_object_if_exists(name)
        .await
        .map_err(|source| ProcessError::Delete {
            name: name.to_string(),
            source,
        })?;
    if deleted {
        tracing::info!(name = %name, "deleted original PNG blob");
    } else {
        tracing::info!(name = %name, "original PNG blob already absent");
    }

    Ok(Outcome::Converted {
        source: name.to_string(),
        target,
    })
}
