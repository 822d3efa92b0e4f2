use async_trait::async_trait;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;
use tokio::time::Instant;
use warden::{LockStore, MemoryStore, Result, Warden, WardenError};

/// Store whose key is never free; every acquisition attempt loses.
#[derive(Default)]
struct HeldStore {
    puts: AtomicU32,
}

#[async_trait]
impl LockStore for HeldStore {
    async fn put_if_absent(&self, _key: &str, _value: &str, _ttl: Duration) -> Result<bool> {
        self.puts.fetch_add(1, Ordering::SeqCst);
        Ok(false)
    }

    async fn delete_if_match(&self, _key: &str, _value: &str) -> Result<u64> {
        Ok(0)
    }
}

/// Store that reports contention for a fixed number of attempts, then
/// grants the write.
struct EventuallyFreeStore {
    contended_attempts: u32,
    puts: AtomicU32,
}

#[async_trait]
impl LockStore for EventuallyFreeStore {
    async fn put_if_absent(&self, _key: &str, _value: &str, _ttl: Duration) -> Result<bool> {
        let attempt = self.puts.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(attempt > self.contended_attempts)
    }

    async fn delete_if_match(&self, _key: &str, _value: &str) -> Result<u64> {
        Ok(1)
    }
}

/// Store that fails every operation, as a severed connection would.
#[derive(Default)]
struct FailingStore {
    puts: AtomicU32,
}

#[async_trait]
impl LockStore for FailingStore {
    async fn put_if_absent(&self, _key: &str, _value: &str, _ttl: Duration) -> Result<bool> {
        self.puts.fetch_add(1, Ordering::SeqCst);
        Err(WardenError::store("connection refused"))
    }

    async fn delete_if_match(&self, _key: &str, _value: &str) -> Result<u64> {
        Err(WardenError::store("connection refused"))
    }
}

#[tokio::test]
async fn test_optimistic_succeeds_immediately_when_free() {
    let warden = Warden::new(MemoryStore::new());

    let handle = warden
        .optimistic("report", Duration::from_secs(5), 3, Duration::from_millis(50))
        .await
        .unwrap();
    assert_eq!(handle.name(), "report");
}

#[tokio::test(start_paused = true)]
async fn test_optimistic_exhausts_after_max_attempts() {
    let warden = Warden::new(HeldStore::default());
    let start = Instant::now();

    let err = warden
        .optimistic(
            "busy",
            Duration::from_millis(1000),
            3,
            Duration::from_millis(50),
        )
        .await
        .unwrap_err();

    // Three attempts, two fixed 50ms waits between them
    assert_eq!(warden.store().puts.load(Ordering::SeqCst), 3);
    let elapsed = start.elapsed();
    assert!(elapsed >= Duration::from_millis(100));
    assert!(elapsed < Duration::from_millis(150));

    match err {
        WardenError::AttemptsExhausted {
            name,
            ttl,
            max_attempts,
            wait,
        } => {
            assert_eq!(name, "busy");
            assert_eq!(ttl, Duration::from_millis(1000));
            assert_eq!(max_attempts, 3);
            assert_eq!(wait, Duration::from_millis(50));
        }
        other => panic!("expected AttemptsExhausted, got: {other}"),
    }
}

#[tokio::test(start_paused = true)]
async fn test_optimistic_wins_once_contention_clears() {
    let warden = Warden::new(EventuallyFreeStore {
        contended_attempts: 2,
        puts: AtomicU32::new(0),
    });

    let handle = warden
        .optimistic(
            "report",
            Duration::from_secs(5),
            5,
            Duration::from_millis(50),
        )
        .await
        .unwrap();

    assert_eq!(warden.store().puts.load(Ordering::SeqCst), 3);
    assert_eq!(handle.release().await.unwrap(), 1);
}

#[tokio::test]
async fn test_optimistic_aborts_on_store_error_without_retrying() {
    let warden = Warden::new(FailingStore::default());

    let err = warden
        .optimistic(
            "report",
            Duration::from_secs(5),
            5,
            Duration::from_millis(50),
        )
        .await
        .unwrap_err();

    assert!(matches!(err, WardenError::Store { .. }));
    assert_eq!(
        warden.store().puts.load(Ordering::SeqCst),
        1,
        "store errors are fatal, not contention"
    );
}

#[tokio::test]
async fn test_optimistic_with_zero_max_attempts_still_tries_once() {
    let warden = Warden::new(HeldStore::default());

    let err = warden
        .optimistic("busy", Duration::from_secs(1), 0, Duration::from_millis(10))
        .await
        .unwrap_err();

    assert!(matches!(err, WardenError::AttemptsExhausted { .. }));
    assert_eq!(warden.store().puts.load(Ordering::SeqCst), 1);
}
