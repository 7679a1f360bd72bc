//! Durable key-value storage backing the notification log and theme preference.

mod memory_store;
mod schema;
mod sqlite_store;

pub use memory_store::MemoryKeyValueStore;
pub use schema::KV_VERSIONED_SCHEMAS;
pub use sqlite_store::SqliteKeyValueStore;

use anyhow::Result;

/// Storage key holding the JSON-encoded notification log.
pub const NOTIFICATIONS_KEY: &str = "notifications";
/// Storage key holding the plain-string theme preference.
pub const THEME_KEY: &str = "theme";

/// Origin-scoped string store. Every write is synchronous and durable once
/// `set` returns.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
    fn delete(&self, key: &str) -> Result<()>;
}
