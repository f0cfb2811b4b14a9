//! Seckill workflow tests

use crate::test_utils::UnavailableStore;
use futures::future::join_all;
use kvg_application::use_cases::{DistributedLockService, SeckillService, SeckillSettings};
use kvg_domain::error::Error;
use kvg_domain::ports::{KeyValueStore, LockProvider};
use kvg_domain::value_objects::{DecrementOutcome, RetryPolicy};
use kvg_providers::store::MemoryKeyValueStore;
use proptest::prelude::*;
use std::sync::Arc;
use std::time::Duration;

const STOCK: &str = "seckill:stock:1";
const LOCK: &str = "lock:seckill:1";
const LOCK_TTL: Duration = Duration::from_secs(5);

fn service(work_delay: Duration) -> (Arc<MemoryKeyValueStore>, SeckillService) {
    let store = Arc::new(MemoryKeyValueStore::new());
    let settings = SeckillSettings {
        work_delay,
        ..SeckillSettings::default()
    };
    let seckill = SeckillService::with_settings(store.clone(), settings);
    (store, seckill)
}

fn patient() -> RetryPolicy {
    RetryPolicy::new(1_000, Duration::from_millis(1), Duration::from_millis(5))
}

#[derive(Debug, Default, PartialEq, Eq)]
struct Tally {
    succeeded: usize,
    lock_busy: usize,
    depleted: usize,
}

fn tally(outcomes: impl IntoIterator<Item = DecrementOutcome>) -> Tally {
    let mut tally = Tally::default();
    for outcome in outcomes {
        match outcome {
            DecrementOutcome::Success { .. } => tally.succeeded += 1,
            DecrementOutcome::LockBusy => tally.lock_busy += 1,
            DecrementOutcome::Depleted => tally.depleted += 1,
        }
    }
    tally
}

/// `remaining` of every successful purchase, ascending
fn sold_remaining(outcomes: &[DecrementOutcome]) -> Vec<i64> {
    let mut remaining: Vec<i64> = outcomes
        .iter()
        .filter_map(|outcome| match outcome {
            DecrementOutcome::Success { remaining } => Some(*remaining),
            _ => None,
        })
        .collect();
    remaining.sort_unstable();
    remaining
}

#[tokio::test]
async fn test_init_and_read_stock() {
    let (_store, seckill) = service(Duration::ZERO);

    assert_eq!(seckill.stock(STOCK).await.unwrap(), None);
    seckill.init_stock(STOCK, 100).await.unwrap();
    assert_eq!(seckill.stock(STOCK).await.unwrap(), Some(100));
}

#[tokio::test]
async fn test_single_buyer_takes_one_unit() {
    let (store, seckill) = service(Duration::ZERO);
    seckill.init_stock(STOCK, 2).await.unwrap();

    let outcome = seckill
        .decrement_if_positive(STOCK, LOCK, LOCK_TTL)
        .await
        .unwrap();

    assert_eq!(outcome, DecrementOutcome::Success { remaining: 1 });
    assert_eq!(store.get(STOCK).await.unwrap().as_deref(), Some("1"));
    assert!(store.get(LOCK).await.unwrap().is_none(), "lock released");
}

#[tokio::test]
async fn test_depleted_stock_is_not_decremented() {
    let (store, seckill) = service(Duration::ZERO);
    seckill.init_stock(STOCK, 0).await.unwrap();

    let outcome = seckill
        .decrement_if_positive(STOCK, LOCK, LOCK_TTL)
        .await
        .unwrap();

    assert_eq!(outcome, DecrementOutcome::Depleted);
    assert_eq!(seckill.stock(STOCK).await.unwrap(), Some(0));
    assert!(store.get(LOCK).await.unwrap().is_none());
}

#[tokio::test]
async fn test_absent_stock_counts_as_depleted() {
    let (store, seckill) = service(Duration::ZERO);

    let outcome = seckill
        .decrement_if_positive(STOCK, LOCK, LOCK_TTL)
        .await
        .unwrap();

    assert_eq!(outcome, DecrementOutcome::Depleted);
    assert!(store.get(STOCK).await.unwrap().is_none(), "no counter is invented");
}

#[tokio::test]
async fn test_corrupt_stock_is_reported_and_lock_released() {
    let (store, seckill) = service(Duration::ZERO);
    store.set_persistent(STOCK, "plenty").await.unwrap();

    let err = seckill
        .decrement_if_positive(STOCK, LOCK, LOCK_TTL)
        .await
        .unwrap_err();

    assert!(matches!(err, Error::InvalidData { ref key, .. } if key == STOCK), "got {err:?}");
    assert!(store.get(LOCK).await.unwrap().is_none());
    assert_eq!(store.get(STOCK).await.unwrap().as_deref(), Some("plenty"));
}

#[tokio::test]
async fn test_busy_lock_turns_buyer_away() {
    let (store, seckill) = service(Duration::ZERO);
    seckill.init_stock(STOCK, 5).await.unwrap();
    let other = DistributedLockService::new(store.clone());
    let held = other.try_acquire(LOCK, LOCK_TTL).await.unwrap().unwrap();

    let outcome = seckill
        .decrement_if_positive(STOCK, LOCK, LOCK_TTL)
        .await
        .unwrap();

    assert_eq!(outcome, DecrementOutcome::LockBusy);
    assert!(outcome.is_retryable());
    assert_eq!(seckill.stock(STOCK).await.unwrap(), Some(5));
    assert!(other.release(&held).await.unwrap(), "foreign lock left alone");
}

#[tokio::test(start_paused = true)]
async fn test_five_buyers_three_units_single_attempt() {
    let (_store, seckill) = service(Duration::from_millis(100));
    seckill.init_stock(STOCK, 3).await.unwrap();

    let buyers = (0..5).map(|_| seckill.decrement_if_positive(STOCK, LOCK, LOCK_TTL));
    let outcomes: Vec<_> = join_all(buyers)
        .await
        .into_iter()
        .map(|r| r.unwrap())
        .collect();

    assert_eq!(sold_remaining(&outcomes), vec![2]);
    assert_eq!(
        tally(outcomes),
        Tally {
            succeeded: 1,
            lock_busy: 4,
            depleted: 0
        }
    );
    assert_eq!(seckill.stock(STOCK).await.unwrap(), Some(2));
}

#[tokio::test(start_paused = true)]
async fn test_five_buyers_three_units_with_retry() {
    let (_store, seckill) = service(Duration::from_millis(100));
    seckill.init_stock(STOCK, 3).await.unwrap();
    let policy = RetryPolicy::new(50, Duration::from_millis(10), Duration::from_millis(200));

    let buyers = (0..5).map(|_| seckill.purchase_with_retry(STOCK, LOCK, LOCK_TTL, &policy));
    let outcomes: Vec<_> = join_all(buyers)
        .await
        .into_iter()
        .map(|r| r.unwrap())
        .collect();

    assert_eq!(sold_remaining(&outcomes), vec![0, 1, 2], "each unit sold once");
    assert_eq!(
        tally(outcomes),
        Tally {
            succeeded: 3,
            lock_busy: 0,
            depleted: 2
        }
    );
    assert_eq!(seckill.stock(STOCK).await.unwrap(), Some(0));
}

#[tokio::test(start_paused = true)]
async fn test_retry_gives_up_after_policy_attempts() {
    let (store, seckill) = service(Duration::ZERO);
    seckill.init_stock(STOCK, 1).await.unwrap();
    let other = DistributedLockService::new(store.clone());
    let _held = other
        .try_acquire(LOCK, Duration::from_secs(60))
        .await
        .unwrap()
        .unwrap();
    let policy = RetryPolicy::new(4, Duration::from_millis(10), Duration::from_millis(40));

    let started = tokio::time::Instant::now();
    let outcome = seckill
        .purchase_with_retry(STOCK, LOCK, LOCK_TTL, &policy)
        .await
        .unwrap();

    assert_eq!(outcome, DecrementOutcome::LockBusy);
    // 10 + 20 + 40 between the four attempts
    let waited = started.elapsed();
    assert!(waited >= Duration::from_millis(70) && waited < Duration::from_millis(80), "{waited:?}");
    assert_eq!(seckill.stock(STOCK).await.unwrap(), Some(1));
}

#[tokio::test(start_paused = true)]
async fn test_expired_stock_lock_does_not_block_forever() {
    let (store, seckill) = service(Duration::ZERO);
    seckill.init_stock(STOCK, 1).await.unwrap();
    let crashed = DistributedLockService::new(store.clone());
    let _abandoned = crashed
        .try_acquire(LOCK, Duration::from_millis(500))
        .await
        .unwrap()
        .unwrap();

    tokio::time::advance(Duration::from_millis(501)).await;

    let outcome = seckill
        .decrement_if_positive(STOCK, LOCK, LOCK_TTL)
        .await
        .unwrap();
    assert_eq!(outcome, DecrementOutcome::Success { remaining: 0 });
}

#[tokio::test]
async fn test_store_outage_is_an_error_not_an_outcome() {
    let seckill = SeckillService::new(Arc::new(UnavailableStore));

    let err = seckill
        .decrement_if_positive(STOCK, LOCK, LOCK_TTL)
        .await
        .unwrap_err();

    assert!(matches!(err, Error::StoreUnavailable { .. }));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn test_contended_buyers_on_many_threads_sell_each_unit_once() {
    let (_store, seckill) = service(Duration::from_millis(1));
    seckill.init_stock(STOCK, 20).await.unwrap();
    let policy = patient();

    let buyers = (0..40).map(|_| {
        let seckill = seckill.clone();
        tokio::spawn(async move {
            seckill
                .purchase_with_retry(STOCK, LOCK, LOCK_TTL, &policy)
                .await
        })
    });
    let outcomes: Vec<_> = join_all(buyers)
        .await
        .into_iter()
        .map(|joined| joined.unwrap().unwrap())
        .collect();

    assert_eq!(sold_remaining(&outcomes), (0..20).collect::<Vec<_>>());
    assert_eq!(
        tally(outcomes),
        Tally {
            succeeded: 20,
            lock_busy: 0,
            depleted: 20
        }
    );
    assert_eq!(seckill.stock(STOCK).await.unwrap(), Some(0));
}

fn paused_runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .start_paused(true)
        .build()
        .unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn prop_patient_buyers_drain_stock_exactly(stock in 0i64..20, buyers in 0usize..30) {
        let (sold, succeeded, remaining) = paused_runtime().block_on(async {
            let (_store, seckill) = service(Duration::from_millis(1));
            seckill.init_stock(STOCK, stock).await.unwrap();
            let policy = patient();

            let attempts = (0..buyers).map(|_| seckill.purchase_with_retry(STOCK, LOCK, LOCK_TTL, &policy));
            let outcomes: Vec<_> = join_all(attempts).await.into_iter().map(|r| r.unwrap()).collect();
            let sold = sold_remaining(&outcomes);
            let tally = tally(outcomes);
            (sold, tally.succeeded, seckill.stock(STOCK).await.unwrap().unwrap())
        });

        let left = (stock - buyers as i64).max(0);
        prop_assert_eq!(succeeded as i64, stock.min(buyers as i64));
        prop_assert_eq!(remaining, left);
        prop_assert_eq!(sold, (left..stock).collect::<Vec<_>>());
    }

    #[test]
    fn prop_impatient_buyers_never_oversell(stock in 0i64..20, buyers in 0usize..30) {
        let (tally, remaining) = paused_runtime().block_on(async {
            let (_store, seckill) = service(Duration::from_millis(1));
            seckill.init_stock(STOCK, stock).await.unwrap();

            let attempts = (0..buyers).map(|_| seckill.decrement_if_positive(STOCK, LOCK, LOCK_TTL));
            let outcomes = join_all(attempts).await.into_iter().map(|r| r.unwrap());
            (tally(outcomes), seckill.stock(STOCK).await.unwrap().unwrap())
        });

        prop_assert!(remaining >= 0);
        prop_assert_eq!(tally.succeeded as i64 + remaining, stock);
        prop_assert_eq!(tally.succeeded + tally.lock_busy + tally.depleted, buyers);
    }
}
