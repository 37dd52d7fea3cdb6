use crate::constants::{SOURCE_EXTENSION, TARGET_EXTENSION};

/// 最後のパス区切り以降（ファイル名部分）の開始位置
fn file_name_start(name: &str) -> usize {
    name.rfind('/').map(|i| i + 1).unwrap_or(0)
}

/// ファイル名部分の最後のドットの位置（name 全体でのインデックス）
fn extension_dot(name: &str) -> Option<usize> {
    let start = file_name_start(name);
    name[start..].rfind('.').map(|i| start + i)
}

/// オブジェクト名の拡張子を返す（ドットを含まない）
///
/// 拡張子がない、または末尾がドットの場合は None
pub fn extension(name: &str) -> Option<&str> {
    let dot = extension_dot(name)?;
    let ext = &name[dot + 1..];
    (!ext.is_empty()).then_some(ext)
}

/// 変換対象かどうか（拡張子が png、大文字小文字を区別しない）
pub fn is_convertible(name: &str) -> bool {
    extension(name).is_some_and(|ext| ext.eq_ignore_ascii_case(SOURCE_EXTENSION))
}

/// 拡張子を jpg に置き換えた出力名を返す
///
/// 拡張子がない場合は末尾に付与する。ディレクトリ部分は保持される。
pub fn target_name(name: &str) -> String {
    let stem = match extension_dot(name) {
        Some(dot) => &name[..dot],
        None => name,
    };
    format!("{stem}.{TARGET_EXTENSION}")
}
