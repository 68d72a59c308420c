pub mod error;
pub mod json_file;
pub mod memory;

pub use error::{StorageError, StorageResult};
pub use json_file::{DEFAULT_STORE_FILE_NAME, JsonFileStore};
pub use memory::MemoryStore;

/// Durable string-to-string slot map, modeled on a browser's local storage.
///
/// Values are opaque text; callers own their encoding. Implementations must be
/// shareable across the UI thread and the async runtime.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> StorageResult<Option<String>>;
    fn set(&self, key: &str, value: String) -> StorageResult<()>;
}
