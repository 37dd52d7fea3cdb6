use thiserror::Error;

/// メディア処理の統合エラー型
#[derive(Debug, Error)]
pub enum MediaError {
    #[error("validation error: {0}")]
    Validation(String),

    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("transform error: {0}")]
    Transform(#[from] TransformError),
}

/// ストレージアクセスエラー
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("object not found: {key}")]
    NotFound { key: String },

    #[error("access denied")]
    Forbidden,

    #[error("storage error: {0}")]
    Internal(String),
}

/// 画像変換エラー
#[derive(Debug, Error)]
pub enum TransformError {
    #[error("decode failed: {0}")]
    Decode(String),

    #[error("encode failed: {0}")]
    Encode(String),

    #[error("image resolution exceeds maximum ({width}x{height})")]
    ResolutionTooLarge { width: u32, height: u32 },
}

/// 接続設定エラー
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} is not set")]
    MissingVar(&'static str),

    #[error("connection string is missing {0}")]
    MissingKey(&'static str),

    #[error("malformed connection string segment: {0}")]
    Malformed(String),
}
