use image::DynamicImage;

/// EXIF Orientation タグの値
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[repr(u16)]
pub enum Orientation {
    #[default]
    Normal = 1,
    FlipHorizontal = 2,
    Rotate180 = 3,
    FlipVertical = 4,
    Transpose = 5,
    Rotate90 = 6,
    Transverse = 7,
    Rotate270 = 8,
}

impl Orientation {
    /// タグ値から Orientation を作成。範囲外は None
    pub fn from_u16(value: u16) -> Option<Self> {
        let orientation = match value {
            1 => Self::Normal,
            2 => Self::FlipHorizontal,
            3 => Self::Rotate180,
            4 => Self::FlipVertical,
            5 => Self::Transpose,
            6 => Self::Rotate90,
            7 => Self::Transverse,
            8 => Self::Rotate270,
            _ => return None,
        };
        Some(orientation)
    }

    /// 幅と高さが入れ替わるかどうか
    pub fn swaps_dimensions(self) -> bool {
        matches!(
            self,
            Self::Transpose | Self::Rotate90 | Self::Transverse | Self::Rotate270
        )
    }
}

/// Orientation を画素に焼き込む。結果は Normal として表示すればよい
pub fn apply_orientation(img: DynamicImage, orientation: Orientation) -> DynamicImage {
    use Orientation::*;

    match orientation {
        Normal => img,
        FlipHorizontal => img.fliph(),
        FlipVertical => img.flipv(),
        Rotate90 => img.rotate90(),
        Rotate180 => img.rotate180(),
        Rotate270 => img.rotate270(),
        // 左上-右下の対角線で反転
        Transpose => img.rotate90().fliph(),
        // 右上-左下の対角線で反転
        Transverse => img.rotate270().fliph(),
    }
}

/// デコーダが取り出した生の EXIF (TIFF ヘッダから始まる) から Orientation を読む
///
/// PNG の eXIf チャンクはこの形式で渡される
pub fn orientation_from_exif(raw: Vec<u8>) -> Option<Orientation> {
    let exif = exif::Reader::new().read_raw(raw).ok()?;
    primary_orientation(&exif)
}

/// 画像コンテナ全体（JPEG の APP1、TIFF など）から Orientation を読む
pub fn read_orientation(data: &[u8]) -> Option<Orientation> {
    let mut cursor = std::io::Cursor::new(data);
    let exif = exif::Reader::new().read_from_container(&mut cursor).ok()?;
    primary_orientation(&exif)
}

fn primary_orientation(exif: &exif::Exif) -> Option<Orientation> {
    let field = exif.get_field(exif::Tag::Orientation, exif::In::PRIMARY)?;
    let value = field.value.get_uint(0)?;
    u16::try_from(value).ok().and_then(Orientation::from_u16)
}
