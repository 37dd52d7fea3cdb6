/// 画像の最大ピクセル数（1GP = 実質無制限、極端な攻撃のみ防止）
pub const MAX_PIXELS: u64 = 1_000_000_000;

/// JPEG 出力品質（0-100、固定）
pub const JPEG_QUALITY: u8 = 75;

/// 変換対象の拡張子
pub const SOURCE_EXTENSION: &str = "png";

/// 出力の拡張子
pub const TARGET_EXTENSION: &str = "jpg";

/// 監視対象のコンテナ名
pub const CONTAINER: &str = "images";

/// 接続文字列を保持する環境変数
pub const CONNECTION_ENV: &str = "STORAGE_CONNECTION";

/// オブジェクト名の最大長
pub const MAX_KEY_LENGTH: usize = 1024;
