//! App-scoped key-value storage for the session record.

mod file;
mod memory;

pub use file::FileTokenStore;
pub use memory::MemoryTokenStore;

use async_trait::async_trait;

use crate::error::StoreError;

/// Single well-known key holding the serialized session.
pub const SESSION_STORAGE_KEY: &str = "mipi-user-data";

#[async_trait]
pub trait TokenStore: Send + Sync {
    async fn get_item(&self, key: &str) -> Result<Option<String>, StoreError>;
    async fn set_item(&self, key: &str, value: &str) -> Result<(), StoreError>;
    /// Deleting a missing key is not an error.
    async fn delete_item(&self, key: &str) -> Result<(), StoreError>;
}
