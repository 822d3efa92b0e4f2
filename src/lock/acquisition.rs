use crate::error::{Result, WardenError};
use crate::key::{lock_key, Token};
use crate::lock::ReleaseHandle;
use crate::store::LockStore;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Outcome of a single acquisition attempt.
pub enum Acquisition<S: LockStore> {
    /// The conditional write was applied. The caller holds the lock until
    /// the TTL elapses or the handle is released.
    Acquired(ReleaseHandle<S>),
    /// Another holder's record is live under this key. The minted token is
    /// reported for diagnostics; it grants no ownership.
    Contended { token: Token },
}

impl<S: LockStore> Acquisition<S> {
    pub fn is_acquired(&self) -> bool {
        matches!(self, Acquisition::Acquired(_))
    }

    /// The token minted for this attempt, whether or not it won.
    pub fn token(&self) -> &Token {
        match self {
            Acquisition::Acquired(handle) => handle.token(),
            Acquisition::Contended { token } => token,
        }
    }

    pub fn into_handle(self) -> Option<ReleaseHandle<S>> {
        match self {
            Acquisition::Acquired(handle) => Some(handle),
            Acquisition::Contended { .. } => None,
        }
    }
}

impl<S: LockStore> fmt::Debug for Acquisition<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Acquisition::Acquired(handle) => f.debug_tuple("Acquired").field(handle).finish(),
            Acquisition::Contended { token } => {
                f.debug_struct("Contended").field("token", token).finish()
            }
        }
    }
}

/// Lock client over a shared store.
///
/// Holds no mutual-exclusion state of its own: every call externalizes
/// ownership into the store's key space, so any number of processes pointed
/// at the same store coordinate without talking to each other.
pub struct Warden<S: LockStore> {
    store: Arc<S>,
}

impl<S: LockStore> Warden<S> {
    pub fn new(store: S) -> Self {
        Self {
            store: Arc::new(store),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Attempt to acquire the lock for `name` with the given time-to-live.
    ///
    /// One atomic conditional write decides the winner: among any number of
    /// simultaneous callers, exactly one observes [`Acquisition::Acquired`];
    /// the rest observe [`Acquisition::Contended`], which is a normal result
    /// and not an error. `ttl` is forwarded to the store unvalidated.
    pub async fn lock(&self, name: &str, ttl: Duration) -> Result<Acquisition<S>> {
        if name.is_empty() {
            return Err(WardenError::InvalidName);
        }

        let token = Token::mint();
        let key = lock_key(name);
        debug!("Acquiring lock: {} (ttl: {:?})", key, ttl);

        let applied = self.store.put_if_absent(&key, token.as_str(), ttl).await?;
        if applied {
            debug!("Lock acquired: {}", key);
            Ok(Acquisition::Acquired(ReleaseHandle::new(
                name,
                token,
                Arc::clone(&self.store),
            )))
        } else {
            debug!("Lock contended: {}", key);
            Ok(Acquisition::Contended { token })
        }
    }

    /// Release the lock for `name`, provided it is still owned by `token`.
    ///
    /// Returns the number of records removed (0 or 1). The comparison and
    /// the delete run as one indivisible step at the store, so a stale token
    /// can never remove a newer holder's record; that case reports 0.
    pub async fn unlock(&self, name: &str, token: &str) -> Result<u64> {
        if name.is_empty() {
            return Err(WardenError::InvalidName);
        }

        let key = lock_key(name);
        let deleted = self.store.delete_if_match(&key, token).await?;
        debug!("Unlock: {} (deleted: {})", key, deleted);
        Ok(deleted)
    }

    /// Acquire with bounded retry, waiting out contention.
    ///
    /// Each attempt is a fresh [`Warden::lock`] call with a fresh token. On
    /// contention the loop sleeps a fixed `wait` between attempts; there is
    /// no jitter and no backoff growth. Store errors abort immediately and
    /// are never retried. Once `max_attempts` attempts have all come back
    /// contended the loop fails with [`WardenError::AttemptsExhausted`].
    pub async fn optimistic(
        &self,
        name: &str,
        ttl: Duration,
        max_attempts: u32,
        wait: Duration,
    ) -> Result<ReleaseHandle<S>> {
        let mut attempts = 0u32;
        loop {
            attempts += 1;
            match self.lock(name, ttl).await? {
                Acquisition::Acquired(handle) => return Ok(handle),
                Acquisition::Contended { .. } => {
                    if attempts >= max_attempts {
                        warn!(
                            "Failed to acquire lock on {} after {} attempts",
                            name, attempts
                        );
                        return Err(WardenError::AttemptsExhausted {
                            name: name.to_string(),
                            ttl,
                            max_attempts,
                            wait,
                        });
                    }
                    debug!(
                        "Lock contended: {} (attempt {}/{}), retrying in {:?}",
                        name, attempts, max_attempts, wait
                    );
                    tokio::time::sleep(wait).await;
                }
            }
        }
    }
}

impl<S: LockStore> Clone for Warden<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}
