pub mod types;

pub use types::{ConfigError, MediaError, StorageError, TransformError};
