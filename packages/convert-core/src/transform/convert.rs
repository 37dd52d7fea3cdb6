use bytes::Bytes;

use crate::constants::JPEG_QUALITY;
use crate::errors::TransformError;
use crate::transform::{apply_orientation, decode_image, encode_jpeg};

/// 画像バイト列を JPEG に変換する。
///
/// デコード → EXIF Orientation 適用 → JPEG (品質 75) の順で固定。
/// Orientation は画素に焼き込まれ、メタデータはエンコードで削除されるため
/// 出力は表示側の回転に依存しない。
pub fn convert_to_jpeg(input: &[u8]) -> Result<Bytes, TransformError> {
    let decoded = decode_image(input)?;
    let img = apply_orientation(decoded.image, decoded.orientation);

    let output = encode_jpeg(&img, JPEG_QUALITY)?;

    Ok(Bytes::from(output))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::fixtures::{png_bytes, png_header_only, png_with_orientation};
    use crate::transform::read_orientation;

    #[test]
    fn test_convert_png_to_jpeg() {
        let output = convert_to_jpeg(&png_bytes(30, 20)).unwrap();

        assert_eq!(&output[0..2], &[0xFF, 0xD8]);
        let decoded = image::load_from_memory(&output).unwrap();
        assert_eq!(decoded.width(), 30);
        assert_eq!(decoded.height(), 20);
    }

    #[test]
    fn test_convert_applies_orientation() {
        let output = convert_to_jpeg(&png_with_orientation(30, 20, 6)).unwrap();

        let decoded = image::load_from_memory(&output).unwrap();
        assert_eq!(decoded.width(), 20);
        assert_eq!(decoded.height(), 30);
        // 出力に EXIF は残らない
        assert_eq!(read_orientation(&output), None);
    }

    #[test]
    fn test_convert_rejects_oversized_image() {
        let result = convert_to_jpeg(&png_header_only(50_000, 30_000));
        assert!(matches!(
            result,
            Err(TransformError::ResolutionTooLarge {
                width: 50_000,
                height: 30_000
            })
        ));
    }

    #[test]
    fn test_convert_rejects_non_image() {
        let result = convert_to_jpeg(b"not a png at all");
        assert!(matches!(result, Err(TransformError::Decode(_))));
    }
}
