use std::borrow::Cow;

use crate::constants::MAX_KEY_LENGTH;
use crate::errors::MediaError;

/// オブジェクト名を検証する
/// パストラバーサル攻撃を防止し、制御文字を検出する
///
/// 名前はデコード済みとして扱う。'%' を含む名前も有効で、
/// URL デコードはエンコードされたトラバーサルの検出にのみ使う。
pub fn validate_key(key: &str) -> Result<(), MediaError> {
    // 空文字チェック
    if key.is_empty() {
        return Err(MediaError::Validation("key is empty".to_string()));
    }

    if key.len() > MAX_KEY_LENGTH {
        return Err(MediaError::Validation(format!(
            "key is too long (max {MAX_KEY_LENGTH})"
        )));
    }

    // UTF-8 として解釈できない場合は名前そのものを検査する
    let decoded = urlencoding::decode(key).unwrap_or(Cow::Borrowed(key));

    for candidate in [key, decoded.as_ref()] {
        // パストラバーサル防止
        if candidate.split('/').any(|segment| segment == "..")
            || candidate.starts_with('/')
            || candidate.contains("//")
            || candidate.contains('\\')
        {
            return Err(MediaError::Validation("path traversal detected".to_string()));
        }

        if candidate.chars().any(char::is_control) {
            return Err(MediaError::Validation("control characters in key".to_string()));
        }
    }

    Ok(())
}
