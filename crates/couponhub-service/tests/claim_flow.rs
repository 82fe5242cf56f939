//! End-to-end tests for the claim protocol over the in-memory backends.
//!
//! Everything here runs the real orchestrator, reconciler, and lock
//! coordinator; only the stores are in-memory.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use couponhub_core::error::{AppError, ErrorKind};
use couponhub_core::result::AppResult;
use couponhub_database::{CouponLedger, MemoryCouponLedger, MemoryUserDirectory, UserDirectory};
use couponhub_entity::{Coupon, CreateCoupon, CreateUser};
use couponhub_lock::{LeaseStore, LockCoordinator, LockOptions, MemoryLeaseStore};
use couponhub_service::{ClaimCoupon, ClaimService};

/// Lease store standing in for an unreachable coordination store.
#[derive(Debug)]
struct UnreachableLeaseStore;

#[async_trait]
impl LeaseStore for UnreachableLeaseStore {
    async fn try_acquire(&self, _key: &str, _token: &str, _ttl: Duration) -> AppResult<bool> {
        Err(AppError::lock("Connection refused"))
    }

    async fn release(&self, _key: &str, _token: &str) -> AppResult<bool> {
        Err(AppError::lock("Connection refused"))
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(false)
    }
}

struct TestHarness {
    ledger: Arc<MemoryCouponLedger>,
    users: Arc<MemoryUserDirectory>,
    claims: Arc<ClaimService>,
}

impl TestHarness {
    fn new() -> Self {
        Self::with_store(Arc::new(MemoryLeaseStore::new()))
    }

    fn with_store(store: Arc<dyn LeaseStore>) -> Self {
        let users = Arc::new(MemoryUserDirectory::new());
        let ledger = Arc::new(MemoryCouponLedger::new(users.clone()));

        // Generous retry budget so contended tests exercise retries
        // instead of flaking on them.
        let options = LockOptions::default()
            .with_retry_count(100)
            .with_retry_delay(Duration::from_millis(2));
        let coordinator = LockCoordinator::new(store, options.clone());

        let claims = Arc::new(ClaimService::new(
            ledger.clone() as Arc<dyn CouponLedger>,
            users.clone() as Arc<dyn UserDirectory>,
            coordinator,
            options,
        ));

        Self {
            ledger,
            users,
            claims,
        }
    }

    async fn seed_user(&self, username: &str) {
        self.users
            .create(&CreateUser {
                username: username.to_string(),
                display_name: None,
            })
            .await
            .unwrap();
    }

    async fn seed_coupon(&self, name: &str, amount: i64) -> Coupon {
        self.ledger
            .create_coupon(&CreateCoupon {
                name: name.to_string(),
                amount,
            })
            .await
            .unwrap()
    }

    async fn remaining(&self, name: &str) -> i64 {
        self.ledger
            .find_by_name(name)
            .await
            .unwrap()
            .unwrap()
            .remaining_amount
    }
}

fn claim(username: &str, coupon_name: &str) -> ClaimCoupon {
    ClaimCoupon {
        username: username.to_string(),
        coupon_name: coupon_name.to_string(),
    }
}

#[tokio::test]
async fn test_single_claim_succeeds_and_decrements() {
    let harness = TestHarness::new();
    harness.seed_user("alice").await;
    harness.seed_coupon("SUMMER10", 5).await;

    harness.claims.claim(&claim("alice", "summer10")).await.unwrap();

    assert_eq!(harness.remaining("SUMMER10").await, 4);
    let coupon = harness
        .ledger
        .find_by_name("SUMMER10")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(harness.ledger.count_claims(coupon.id).await.unwrap(), 1);
}

#[tokio::test]
async fn test_two_users_one_stock_exactly_one_wins() {
    let harness = TestHarness::new();
    harness.seed_user("alice").await;
    harness.seed_user("bob").await;
    harness.seed_coupon("SUMMER10", 1).await;

    let (alice, bob) = tokio::join!(
        {
            let claims = harness.claims.clone();
            async move { claims.claim(&claim("alice", "SUMMER10")).await }
        },
        {
            let claims = harness.claims.clone();
            async move { claims.claim(&claim("bob", "SUMMER10")).await }
        },
    );

    let failures: Vec<ErrorKind> = [&alice, &bob]
        .iter()
        .filter_map(|r| r.as_ref().err().map(|e| e.kind))
        .collect();

    assert_eq!(failures.len(), 1, "exactly one attempt must fail");
    assert!(matches!(
        failures[0],
        ErrorKind::BusinessRule | ErrorKind::Conflict
    ));
    assert_eq!(harness.remaining("SUMMER10").await, 0);
}

#[tokio::test]
async fn test_concurrent_claims_never_oversell() {
    let stock = 5;
    let attempts = 20;

    let harness = TestHarness::new();
    for i in 0..attempts {
        harness.seed_user(&format!("user_{i}")).await;
    }
    let coupon = harness.seed_coupon("FLASH_SALE", stock).await;

    let mut handles = Vec::new();
    for i in 0..attempts {
        let claims = harness.claims.clone();
        handles.push(tokio::spawn(async move {
            claims.claim(&claim(&format!("user_{i}"), "FLASH_SALE")).await
        }));
    }

    let mut successes = 0;
    let mut failures = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(()) => successes += 1,
            Err(e) => {
                assert!(
                    matches!(e.kind, ErrorKind::BusinessRule | ErrorKind::Conflict),
                    "unexpected failure kind: {e}"
                );
                failures += 1;
            }
        }
    }

    assert_eq!(successes, stock);
    assert_eq!(failures, attempts - stock);
    assert_eq!(harness.remaining("FLASH_SALE").await, 0);
    assert_eq!(
        harness.ledger.count_claims(coupon.id).await.unwrap(),
        stock as u64
    );
}

#[tokio::test]
async fn test_double_claim_conflicts_and_keeps_counter() {
    let harness = TestHarness::new();
    harness.seed_user("alice").await;
    harness.seed_coupon("SUMMER10", 5).await;

    harness.claims.claim(&claim("alice", "SUMMER10")).await.unwrap();
    assert_eq!(harness.remaining("SUMMER10").await, 4);

    let err = harness
        .claims
        .claim(&claim("alice", "SUMMER10"))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Conflict);
    assert_eq!(harness.remaining("SUMMER10").await, 4);
}

#[tokio::test]
async fn test_unknown_coupon_is_not_found_without_writes() {
    let harness = TestHarness::new();
    harness.seed_user("alice").await;

    let err = harness
        .claims
        .claim(&claim("alice", "NO_SUCH_COUPON"))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
}

#[tokio::test]
async fn test_unknown_user_is_not_found_without_writes() {
    let harness = TestHarness::new();
    harness.seed_coupon("SUMMER10", 5).await;

    let err = harness
        .claims
        .claim(&claim("nobody", "SUMMER10"))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
    assert_eq!(harness.remaining("SUMMER10").await, 5);
}

#[tokio::test]
async fn test_unreachable_lock_store_fails_without_writes() {
    let harness = TestHarness::with_store(Arc::new(UnreachableLeaseStore));
    harness.seed_user("alice").await;
    let coupon = harness.seed_coupon("SUMMER10", 5).await;

    let err = harness
        .claims
        .claim(&claim("alice", "SUMMER10"))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::LockAcquire);

    assert_eq!(harness.remaining("SUMMER10").await, 5);
    assert_eq!(harness.ledger.count_claims(coupon.id).await.unwrap(), 0);
}

#[tokio::test]
async fn test_corrupted_counter_resyncs_before_usability_check() {
    let harness = TestHarness::new();
    for name in ["alice", "bob", "carol", "dave"] {
        harness.seed_user(name).await;
    }
    let coupon = harness.seed_coupon("SUMMER10", 10).await;

    for name in ["alice", "bob", "carol"] {
        harness.claims.claim(&claim(name, "SUMMER10")).await.unwrap();
    }
    assert_eq!(harness.remaining("SUMMER10").await, 7);

    // Corrupt the cache the way a manual edit or migration would.
    harness.ledger.update_remaining(coupon.id, 100).await.unwrap();

    harness.claims.claim(&claim("dave", "SUMMER10")).await.unwrap();
    assert_eq!(harness.remaining("SUMMER10").await, 6);
}

#[tokio::test]
async fn test_exhausted_coupon_heals_upward_too() {
    let harness = TestHarness::new();
    harness.seed_user("alice").await;
    let coupon = harness.seed_coupon("SUMMER10", 3).await;

    // Cache stuck at zero even though no claims exist.
    harness.ledger.update_remaining(coupon.id, 0).await.unwrap();

    harness.claims.claim(&claim("alice", "SUMMER10")).await.unwrap();
    assert_eq!(harness.remaining("SUMMER10").await, 2);
}

#[tokio::test]
async fn test_remaining_matches_claim_count_after_storm() {
    let attempts = 12;
    let harness = TestHarness::new();
    for i in 0..attempts {
        harness.seed_user(&format!("user_{i}")).await;
    }
    let coupon = harness.seed_coupon("INVARIANT", 7).await;

    let mut handles = Vec::new();
    for i in 0..attempts {
        let claims = harness.claims.clone();
        handles.push(tokio::spawn(async move {
            claims.claim(&claim(&format!("user_{i}"), "INVARIANT")).await
        }));
    }
    for handle in handles {
        let _ = handle.await.unwrap();
    }

    let claim_count = harness.ledger.count_claims(coupon.id).await.unwrap() as i64;
    let remaining = harness.remaining("INVARIANT").await;
    assert_eq!(remaining, coupon.amount - claim_count);
    assert!(remaining >= 0);
}

#[tokio::test]
async fn test_name_variants_contend_on_the_same_coupon() {
    let harness = TestHarness::new();
    harness.seed_user("alice").await;
    harness.seed_coupon("SUMMER_10", 1).await;

    harness.claims.claim(&claim("alice", "  summer -- 10 ")).await.unwrap();
    assert_eq!(harness.remaining("SUMMER_10").await, 0);
}
