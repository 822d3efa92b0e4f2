use crate::error::Result;
use crate::key::{lock_key, Token};
use crate::store::LockStore;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

/// Capability to release one specific acquisition.
///
/// Produced only by a successful acquisition and bound to exactly the
/// (resource name, token) pair that won it. Releasing through the handle can
/// therefore never remove a record written by a later holder.
pub struct ReleaseHandle<S: LockStore> {
    name: String,
    token: Token,
    store: Arc<S>,
}

impl<S: LockStore> ReleaseHandle<S> {
    pub(crate) fn new(name: &str, token: Token, store: Arc<S>) -> Self {
        Self {
            name: name.to_string(),
            token,
            store,
        }
    }

    /// The resource name this handle was acquired for.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The ownership token minted by the acquisition that produced this
    /// handle.
    pub fn token(&self) -> &Token {
        &self.token
    }

    /// Release the lock, returning the number of records removed (0 or 1).
    ///
    /// 0 means the record was already gone: the TTL elapsed, possibly
    /// followed by another caller acquiring the key. That is a normal
    /// outcome, not an error.
    pub async fn release(self) -> Result<u64> {
        let key = lock_key(&self.name);
        let deleted = self
            .store
            .delete_if_match(&key, self.token.as_str())
            .await?;
        if deleted == 0 {
            warn!("Lock already gone on release: {}", key);
        } else {
            debug!("Lock released: {}", key);
        }
        Ok(deleted)
    }
}

impl<S: LockStore> fmt::Debug for ReleaseHandle<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReleaseHandle")
            .field("name", &self.name)
            .field("token", &self.token)
            .finish()
    }
}
