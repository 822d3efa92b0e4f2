use crate::error::Result;
use crate::store::LockStore;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;
use tokio::time::Instant;

struct Entry {
    value: String,
    expires_at: Instant,
}

/// In-process lock store.
///
/// Keeps lock records in a mutex-guarded map and applies expiry lazily on
/// access. Atomicity of both conditional operations comes from holding the
/// mutex across the check and the write. Useful for single-process callers
/// and as the store double in tests.
#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, Entry>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LockStore for MemoryStore {
    async fn put_if_absent(&self, key: &str, value: &str, ttl: Duration) -> Result<bool> {
        let now = Instant::now();
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);

        if let Some(entry) = entries.get(key) {
            if entry.expires_at > now {
                return Ok(false);
            }
        }

        entries.insert(
            key.to_string(),
            Entry {
                value: value.to_string(),
                expires_at: now + ttl,
            },
        );
        Ok(true)
    }

    async fn delete_if_match(&self, key: &str, value: &str) -> Result<u64> {
        let now = Instant::now();
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);

        if let Some(entry) = entries.get(key) {
            if entry.expires_at <= now {
                // Expired records no longer exist as far as callers can tell
                entries.remove(key);
                return Ok(0);
            }
            if entry.value == value {
                entries.remove(key);
                return Ok(1);
            }
        }
        Ok(0)
    }
}
