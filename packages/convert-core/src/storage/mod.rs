pub mod client;
pub mod connection;
pub mod memory;
pub mod store;

pub use client::StorageProxyClient;
pub use connection::ConnectionConfig;
pub use memory::MemoryStore;
pub use store::ObjectStore;
// StorageError は errors モジュールで定義済み
pub use crate::errors::StorageError;
