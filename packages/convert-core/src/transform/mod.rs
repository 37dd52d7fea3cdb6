pub mod convert;
pub mod decode;
pub mod encode;
pub mod orientation;

pub use convert::convert_to_jpeg;
pub use decode::{decode_image, DecodedImage};
pub use encode::encode_jpeg;
pub use orientation::{apply_orientation, orientation_from_exif, read_orientation, Orientation};
