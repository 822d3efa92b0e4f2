//! Mutual-exclusion locks coordinated through a shared key-value store

pub mod error;
pub mod key;
pub mod lock;
pub mod store;

pub use error::{Result, WardenError};
pub use key::Token;
pub use lock::{Acquisition, ReleaseHandle, Warden};
pub use store::{LockStore, MemoryStore, RedisStore};
