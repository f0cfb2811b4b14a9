//! Distributed lock tests

use crate::test_utils::UnavailableStore;
use kvg_application::use_cases::DistributedLockService;
use kvg_domain::error::Error;
use kvg_domain::ports::{KeyValueStore, LockProvider};
use kvg_domain::value_objects::{LockGuard, LockToken};
use kvg_providers::store::MemoryKeyValueStore;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

const TTL: Duration = Duration::from_secs(5);

fn service() -> (Arc<MemoryKeyValueStore>, DistributedLockService) {
    let store = Arc::new(MemoryKeyValueStore::new());
    let locks = DistributedLockService::new(store.clone());
    (store, locks)
}

#[tokio::test]
async fn test_acquire_then_release() {
    let (store, locks) = service();

    let guard = locks.try_acquire("lock:a", TTL).await.unwrap().unwrap();
    assert_eq!(guard.key, "lock:a");
    assert_eq!(
        store.get("lock:a").await.unwrap().as_deref(),
        Some(guard.token.as_str())
    );

    assert!(locks.release(&guard).await.unwrap());
    assert!(store.get("lock:a").await.unwrap().is_none());
    assert!(!locks.release(&guard).await.unwrap(), "second release is a no-op");
}

#[tokio::test]
async fn test_second_acquire_fails_without_waiting() {
    let (_store, locks) = service();

    let _held = locks.try_acquire("lock:a", TTL).await.unwrap().unwrap();
    let started = std::time::Instant::now();
    assert!(locks.try_acquire("lock:a", TTL).await.unwrap().is_none());
    assert!(started.elapsed() < Duration::from_secs(1));
}

#[tokio::test]
async fn test_tokens_are_unique_per_acquisition() {
    let (_store, locks) = service();

    let first = locks.try_acquire("lock:a", TTL).await.unwrap().unwrap();
    locks.release(&first).await.unwrap();
    let second = locks.try_acquire("lock:a", TTL).await.unwrap().unwrap();

    assert_ne!(first.token, second.token);
}

#[tokio::test]
async fn test_foreign_guard_cannot_release() {
    let (store, locks) = service();
    let owner = locks.try_acquire("lock:a", TTL).await.unwrap().unwrap();

    let impostor = LockGuard::new("lock:a", LockToken::generate());
    assert!(!locks.release(&impostor).await.unwrap());
    assert_eq!(
        store.get("lock:a").await.unwrap().as_deref(),
        Some(owner.token.as_str()),
        "a mismatched release must not touch the store"
    );
}

#[tokio::test(start_paused = true)]
async fn test_abandoned_lock_heals_after_ttl() {
    let (_store, locks) = service();
    let crashed = locks
        .try_acquire("lock:a", Duration::from_secs(2))
        .await
        .unwrap()
        .unwrap();

    tokio::time::advance(Duration::from_millis(1999)).await;
    assert!(locks.try_acquire("lock:a", TTL).await.unwrap().is_none());

    tokio::time::advance(Duration::from_millis(2)).await;
    let successor = locks.try_acquire("lock:a", TTL).await.unwrap().unwrap();

    // The crashed holder waking up late must not free the successor's lock.
    assert!(!locks.release(&crashed).await.unwrap());
    assert!(locks.release(&successor).await.unwrap());
}

#[tokio::test(start_paused = true)]
async fn test_renew_extends_ownership() {
    let (_store, locks) = service();
    let guard = locks
        .try_acquire("lock:a", Duration::from_secs(2))
        .await
        .unwrap()
        .unwrap();

    tokio::time::advance(Duration::from_secs(1)).await;
    assert!(locks.renew(&guard, Duration::from_secs(10)).await.unwrap());

    tokio::time::advance(Duration::from_secs(5)).await;
    assert!(locks.try_acquire("lock:a", TTL).await.unwrap().is_none());
    assert!(locks.release(&guard).await.unwrap());
}

#[tokio::test(start_paused = true)]
async fn test_renew_after_expiry_reacquires_with_same_token() {
    let (store, locks) = service();
    let guard = locks
        .try_acquire("lock:a", Duration::from_secs(1))
        .await
        .unwrap()
        .unwrap();

    tokio::time::advance(Duration::from_secs(2)).await;
    assert!(locks.renew(&guard, TTL).await.unwrap());
    assert_eq!(
        store.get("lock:a").await.unwrap().as_deref(),
        Some(guard.token.as_str())
    );
    assert!(locks.release(&guard).await.unwrap(), "renewed guard can still release");
}

#[tokio::test(start_paused = true)]
async fn test_renew_fails_when_someone_else_holds_the_lock() {
    let (_store, locks) = service();
    let stale = locks
        .try_acquire("lock:a", Duration::from_secs(1))
        .await
        .unwrap()
        .unwrap();
    tokio::time::advance(Duration::from_secs(2)).await;
    let current = locks.try_acquire("lock:a", TTL).await.unwrap().unwrap();

    assert!(!locks.renew(&stale, TTL).await.unwrap());
    assert!(locks.release(&current).await.unwrap());
}

#[tokio::test]
async fn test_with_lock_releases_after_work() {
    let (store, locks) = service();

    let value = locks
        .with_lock("lock:a", TTL, || async { Ok(7) })
        .await
        .unwrap();
    assert_eq!(value, Some(7));
    assert!(store.get("lock:a").await.unwrap().is_none());
}

#[tokio::test]
async fn test_with_lock_releases_after_failed_work() {
    let (store, locks) = service();

    let result: kvg_domain::Result<Option<()>> = locks
        .with_lock("lock:a", TTL, || async {
            Err(Error::internal("work blew up"))
        })
        .await;
    assert!(matches!(result, Err(Error::Internal { .. })));
    assert!(store.get("lock:a").await.unwrap().is_none());
}

#[tokio::test]
async fn test_with_lock_skips_work_when_busy() {
    let (_store, locks) = service();
    let _held = locks.try_acquire("lock:a", TTL).await.unwrap().unwrap();
    let ran = Arc::new(AtomicUsize::new(0));

    let counter = ran.clone();
    let value = locks
        .with_lock("lock:a", TTL, move || async move {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(())
        })
        .await
        .unwrap();

    assert!(value.is_none());
    assert_eq!(ran.load(Ordering::SeqCst), 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn test_mutual_exclusion_under_contention() {
    let (_store, locks) = service();
    let inside = Arc::new(AtomicUsize::new(0));
    let max_inside = Arc::new(AtomicUsize::new(0));
    let entered = Arc::new(AtomicUsize::new(0));

    let workers = (0..16).map(|_| {
        let locks = locks.clone();
        let inside = inside.clone();
        let max_inside = max_inside.clone();
        let entered = entered.clone();
        tokio::spawn(async move {
            for _ in 0..20 {
                if let Some(guard) = locks.try_acquire("lock:shared", TTL).await.unwrap() {
                    let now = inside.fetch_add(1, Ordering::SeqCst) + 1;
                    max_inside.fetch_max(now, Ordering::SeqCst);
                    entered.fetch_add(1, Ordering::SeqCst);
                    tokio::task::yield_now().await;
                    inside.fetch_sub(1, Ordering::SeqCst);
                    assert!(locks.release(&guard).await.unwrap());
                }
                tokio::task::yield_now().await;
            }
        })
    });
    for worker in futures::future::join_all(workers).await {
        worker.unwrap();
    }

    assert_eq!(max_inside.load(Ordering::SeqCst), 1);
    assert!(entered.load(Ordering::SeqCst) >= 1);
}

#[tokio::test]
async fn test_store_fault_is_an_error_not_contention() {
    let locks = DistributedLockService::new(Arc::new(UnavailableStore));

    let err = locks.try_acquire("lock:a", TTL).await.unwrap_err();
    assert!(matches!(err, Error::StoreUnavailable { .. }));

    let guard = LockGuard::new("lock:a", LockToken::generate());
    assert!(locks.release(&guard).await.unwrap_err().is_transient());
}
