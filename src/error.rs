use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WardenError {
    #[error("Lock name must not be empty")]
    InvalidName,

    #[error("Failed to acquire lock on {name}: gave up after {max_attempts} attempts (ttl: {ttl:?}, wait: {wait:?})")]
    AttemptsExhausted {
        name: String,
        ttl: Duration,
        max_attempts: u32,
        wait: Duration,
    },

    #[error("Store operation failed: {source}")]
    Store {
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl WardenError {
    pub fn store(source: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        WardenError::Store {
            source: source.into(),
        }
    }
}

impl From<redis::RedisError> for WardenError {
    fn from(e: redis::RedisError) -> Self {
        WardenError::Store { source: Box::new(e) }
    }
}

pub type Result<T> = std::result::Result<T, WardenError>;
