use crate::constants::MAX_PIXELS;
use crate::errors::TransformError;
use crate::transform::orientation::{orientation_from_exif, read_orientation, Orientation};
use image::{DynamicImage, ImageDecoder, ImageReader, Limits};
use std::io::Cursor;

/// デコード結果。Orientation はまだ画素に適用されていない
#[derive(Debug)]
pub struct DecodedImage {
    pub image: DynamicImage,
    pub orientation: Orientation,
}

/// 画像バイト列をデコードする
///
/// フォーマットはファイル名ではなく先頭バイトから推測する。
/// 画素数はヘッダの寸法で確認し、上限を超える場合は画素データを読まない。
pub fn decode_image(input: &[u8]) -> Result<DecodedImage, TransformError> {
    let mut reader = ImageReader::new(Cursor::new(input))
        .with_guessed_format()
        .map_err(|e| TransformError::Decode(format!("failed to guess format: {e}")))?;

    if reader.format().is_none() {
        return Err(TransformError::Decode("unrecognized image format".to_string()));
    }

    // メモリ上限は MAX_PIXELS の検証で代替する
    reader.limits(Limits::no_limits());

    let mut decoder = reader
        .into_decoder()
        .map_err(|e| TransformError::Decode(e.to_string()))?;

    let (width, height) = decoder.dimensions();
    validate_source_dimensions(width, height)?;

    // PNG の eXIf はデコーダから、それ以外はコンテナから読む
    let orientation = decoder
        .exif_metadata()
        .ok()
        .flatten()
        .and_then(orientation_from_exif)
        .or_else(|| read_orientation(input))
        .unwrap_or_default();

    let image = DynamicImage::from_decoder(decoder)
        .map_err(|e| TransformError::Decode(e.to_string()))?;

    Ok(DecodedImage { image, orientation })
}

/// ソース画像の総ピクセル数を検証し、メモリ枯渇を防ぐ
fn validate_source_dimensions(width: u32, height: u32) -> Result<(), TransformError> {
    let total_pixels = width as u64 * height as u64;
    if total_pixels > MAX_PIXELS {
        return Err(TransformError::ResolutionTooLarge { width, height });
    }
    Ok(())
}
