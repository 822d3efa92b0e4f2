mod memory;
mod redis;

pub use self::memory::MemoryStore;
pub use self::redis::RedisStore;

use crate::error::Result;
use async_trait::async_trait;
use std::time::Duration;

/// Defines the contract for lock-record storage backends.
///
/// Both operations must be atomic at the store: the conditional write is the
/// entire mutual-exclusion primitive, and the compare-and-delete must not
/// decompose into a separate read and delete.
#[async_trait]
pub trait LockStore: Send + Sync {
    /// Write `value` under `key` with the given expiry, only if the key does
    /// not currently exist. Returns whether the write was applied.
    async fn put_if_absent(&self, key: &str, value: &str, ttl: Duration) -> Result<bool>;

    /// Delete `key` only if it still holds `value`, as one indivisible step.
    /// Returns the number of records removed (0 or 1).
    async fn delete_if_match(&self, key: &str, value: &str) -> Result<u64>;
}
