pub mod constants;
pub mod errors;
pub mod naming;
pub mod storage;
pub mod transform;
pub mod validation;

// 公開API
pub use constants::{CONNECTION_ENV, CONTAINER, JPEG_QUALITY, MAX_PIXELS};
pub use errors::{ConfigError, MediaError, StorageError, TransformError};
pub use naming::{extension, is_convertible, target_name};
pub use storage::{ConnectionConfig, MemoryStore, ObjectStore, StorageProxyClient};
pub use transform::{
    apply_orientation, convert_to_jpeg, decode_image, encode_jpeg, orientation_from_exif,
    read_orientation, DecodedImage, Orientation,
};
pub use validation::validate_key;
