use crate::error::Result;
use crate::store::LockStore;
use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::Script;
use std::time::Duration;

// Runs server-side so the equality check and the delete cannot interleave
// with an expiry or a new acquisition.
const DELETE_IF_MATCH: &str = r#"
if redis.call("get", KEYS[1]) == ARGV[1] then
    return redis.call("del", KEYS[1])
else
    return 0
end
"#;

/// Redis-backed lock store.
///
/// The conditional write maps to `SET key value PX ttl NX`; the
/// compare-and-delete runs as a Lua script. The connection manager is owned
/// by the caller's runtime and reconnects on its own; this store only issues
/// commands over it.
#[derive(Clone)]
pub struct RedisStore {
    conn: ConnectionManager,
    unlock_script: Script,
}

impl RedisStore {
    /// Wrap an existing connection manager.
    pub fn new(conn: ConnectionManager) -> Self {
        Self {
            conn,
            unlock_script: Script::new(DELETE_IF_MATCH),
        }
    }

    /// Open a client for `url` and build a connection manager for it.
    pub async fn connect(url: &str) -> Result<Self> {
        let client = redis::Client::open(url)?;
        let conn = ConnectionManager::new(client).await?;
        Ok(Self::new(conn))
    }
}

#[async_trait]
impl LockStore for RedisStore {
    async fn put_if_absent(&self, key: &str, value: &str, ttl: Duration) -> Result<bool> {
        let mut conn = self.conn.clone();
        let reply: Option<String> = redis::cmd("SET")
            .arg(key)
            .arg(value)
            .arg("PX")
            .arg(ttl.as_millis() as u64)
            .arg("NX")
            .query_async(&mut conn)
            .await?;
        Ok(reply.is_some())
    }

    async fn delete_if_match(&self, key: &str, value: &str) -> Result<u64> {
        let mut conn = self.conn.clone();
        let deleted: u64 = self
            .unlock_script
            .key(key)
            .arg(value)
            .invoke_async(&mut conn)
            .await?;
        Ok(deleted)
    }
}
