//! Integration tests for the request / cancel / fire lifecycle.
//!
//! Wires the public in-memory adapters behind the real service, worker
//! and dispatcher, and drives time with a `FixedClock`.

use std::sync::Arc;

use chrono::Duration;
use proptest::prelude::*;

use account_lifecycle::adapters::{
    FixedClock, InMemoryAccountStore, InMemoryIdentityProvider, InMemoryObjectStore,
    InMemoryPrimaryStore, InMemoryScheduler,
};
use account_lifecycle::application::{
    AccountLifecycleService, DeletionError, DeletionWorker, LifecycleSettings, ScheduleDispatcher,
};
use account_lifecycle::domain::account::{Account, ScheduleName};
use account_lifecycle::domain::foundation::{AccountId, Timestamp};
use account_lifecycle::ports::SchedulerGateway;

// =============================================================================
// Test Infrastructure
// =============================================================================

const GROUP: &str = "account-deletion";

struct Harness {
    clock: FixedClock,
    accounts: Arc<InMemoryAccountStore>,
    scheduler: Arc<InMemoryScheduler>,
    identity: Arc<InMemoryIdentityProvider>,
    primary: Arc<InMemoryPrimaryStore>,
    objects: Arc<InMemoryObjectStore>,
    service: Arc<AccountLifecycleService>,
    dispatcher: ScheduleDispatcher,
}

impl Harness {
    fn new() -> Self {
        let clock = FixedClock::new(t0());
        let accounts = Arc::new(InMemoryAccountStore::new());
        let scheduler = Arc::new(InMemoryScheduler::new());
        let identity = Arc::new(InMemoryIdentityProvider::new());
        let primary = Arc::new(InMemoryPrimaryStore::new(
            accounts.clone(),
            Arc::new(clock.clone()),
        ));
        let objects = Arc::new(InMemoryObjectStore::new());

        let service = Arc::new(AccountLifecycleService::new(
            accounts.clone(),
            scheduler.clone(),
            Arc::new(clock.clone()),
            LifecycleSettings::default(),
        ));
        let worker = Arc::new(DeletionWorker::new(
            identity.clone(),
            primary.clone(),
            objects.clone(),
        ));
        let dispatcher =
            ScheduleDispatcher::new(scheduler.clone(), worker, Arc::new(clock.clone()));

        Self {
            clock,
            accounts,
            scheduler,
            identity,
            primary,
            objects,
            service,
            dispatcher,
        }
    }

    /// Registers a user in every store.
    async fn add_user(&self, user: &str) -> AccountId {
        let user_id = id(user);
        self.accounts.insert(Account::new(user_id.clone())).await;
        self.identity.add_user(user_id.clone()).await;
        self.primary.add_owned_item(user_id.clone(), "profile").await;
        self.objects
            .put_object(format!("avatars/{}", user), vec![0x89, 0x50])
            .await;
        user_id
    }

    async fn is_fully_present(&self, user_id: &AccountId) -> bool {
        self.accounts.account(user_id).await.is_some()
            && self.identity.has_user(user_id).await
            && self.objects.contains(&format!("avatars/{}", user_id)).await
    }

    async fn is_fully_purged(&self, user_id: &AccountId) -> bool {
        self.accounts.account(user_id).await.is_none()
            && !self.identity.has_user(user_id).await
            && !self.objects.contains(&format!("avatars/{}", user_id)).await
            && self.primary.owned_items(user_id).await.is_empty()
            && self.primary.tombstone(user_id).await.is_some()
    }
}

fn t0() -> Timestamp {
    Timestamp::from_unix_secs(1_700_000_000).unwrap()
}

fn id(s: &str) -> AccountId {
    AccountId::new(s).unwrap()
}

// =============================================================================
// Scenarios
// =============================================================================

#[tokio::test]
async fn deletion_fires_after_thirty_days() {
    let h = Harness::new();
    let u1 = h.add_user("u1").await;

    h.service.request_deletion(&u1, &u1).await.unwrap();

    let account = h.accounts.account(&u1).await.unwrap();
    assert_eq!(account.pending_deletion_at, Some(t0().add(Duration::days(30))));
    assert_eq!(h.scheduler.schedule_count().await, 1);

    h.clock.advance(Duration::days(29));
    let report = h.dispatcher.dispatch_due().await.unwrap();
    assert_eq!(report.completed, 0);
    assert!(h.is_fully_present(&u1).await);

    h.clock.advance(Duration::days(1));
    let report = h.dispatcher.dispatch_due().await.unwrap();
    assert_eq!(report.completed, 1);
    assert!(h.is_fully_purged(&u1).await);
    assert_eq!(h.scheduler.schedule_count().await, 0);
    assert_eq!(
        h.primary.tombstone(&u1).await,
        Some(t0().add(Duration::days(30)))
    );
}

#[tokio::test]
async fn cancelled_deletion_never_fires() {
    let h = Harness::new();
    let u1 = h.add_user("u1").await;

    h.service.request_deletion(&u1, &u1).await.unwrap();
    h.clock.advance(Duration::days(10));
    h.service.cancel_deletion(&u1, &u1).await.unwrap();

    h.clock.advance(Duration::days(60));
    let report = h.dispatcher.dispatch_due().await.unwrap();

    assert_eq!(report.completed, 0);
    assert!(h.is_fully_present(&u1).await);
    assert_eq!(h.accounts.account(&u1).await, Some(Account::new(u1)));
}

#[tokio::test]
async fn request_after_cancel_starts_a_fresh_grace_period() {
    let h = Harness::new();
    let u1 = h.add_user("u1").await;

    h.service.request_deletion(&u1, &u1).await.unwrap();
    h.clock.advance(Duration::days(10));
    h.service.cancel_deletion(&u1, &u1).await.unwrap();
    h.service.request_deletion(&u1, &u1).await.unwrap();

    let account = h.accounts.account(&u1).await.unwrap();
    assert_eq!(account.pending_deletion_at, Some(t0().add(Duration::days(40))));

    h.clock.advance(Duration::days(25));
    assert_eq!(h.dispatcher.dispatch_due().await.unwrap().completed, 0);
    assert!(h.is_fully_present(&u1).await);
}

#[tokio::test]
async fn repeated_request_keeps_original_fire_time() {
    let h = Harness::new();
    let u1 = h.add_user("u1").await;

    h.service.request_deletion(&u1, &u1).await.unwrap();
    h.clock.advance(Duration::days(3));
    h.service.request_deletion(&u1, &u1).await.unwrap();

    let account = h.accounts.account(&u1).await.unwrap();
    assert_eq!(account.pending_deletion_at, Some(t0().add(Duration::days(30))));
    assert_eq!(h.scheduler.schedule_count().await, 1);
}

#[tokio::test]
async fn other_users_cannot_touch_the_account() {
    let h = Harness::new();
    let u1 = h.add_user("u1").await;
    let u2 = h.add_user("u2").await;

    assert_eq!(
        h.service.request_deletion(&u2, &u1).await,
        Err(DeletionError::Forbidden)
    );
    assert_eq!(h.scheduler.schedule_count().await, 0);

    h.service.request_deletion(&u1, &u1).await.unwrap();
    assert_eq!(
        h.service.cancel_deletion(&u2, &u1).await,
        Err(DeletionError::Forbidden)
    );
    assert_eq!(h.scheduler.schedule_count().await, 1);
}

#[tokio::test]
async fn only_the_requesting_user_is_purged() {
    let h = Harness::new();
    let u1 = h.add_user("u1").await;
    let u2 = h.add_user("u2").await;

    h.service.request_deletion(&u1, &u1).await.unwrap();
    h.clock.advance(Duration::days(31));
    h.dispatcher.dispatch_due().await.unwrap();

    assert!(h.is_fully_purged(&u1).await);
    assert!(h.is_fully_present(&u2).await);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_requests_create_one_schedule() {
    let h = Harness::new();
    let u1 = h.add_user("u1").await;

    let mut tasks = Vec::new();
    for _ in 0..16 {
        let service = h.service.clone();
        let user = u1.clone();
        tasks.push(tokio::spawn(async move {
            service.request_deletion(&user, &user).await
        }));
    }
    for task in tasks {
        assert!(task.await.unwrap().is_ok());
    }

    assert_eq!(h.scheduler.schedule_count().await, 1);
    let schedule = h
        .scheduler
        .get(GROUP, &ScheduleName::for_account(&u1))
        .await
        .unwrap()
        .unwrap();
    let account = h.accounts.account(&u1).await.unwrap();
    assert_eq!(account.pending_deletion_at, Some(schedule.fire_at));
    assert_eq!(account.schedule_handle, Some(schedule.handle()));
}

#[tokio::test]
async fn cancel_after_fire_is_harmless() {
    let h = Harness::new();
    let u1 = h.add_user("u1").await;

    h.service.request_deletion(&u1, &u1).await.unwrap();
    h.clock.advance(Duration::days(30));
    h.dispatcher.dispatch_due().await.unwrap();

    assert!(h.service.cancel_deletion(&u1, &u1).await.is_ok());
    assert!(h.service.request_deletion(&u1, &u1).await.is_ok());
    assert_eq!(h.scheduler.schedule_count().await, 0);
}

// =============================================================================
// Paired marker invariant
// =============================================================================

#[derive(Debug, Clone)]
enum Op {
    Request,
    Cancel,
    AdvanceDays(i64),
    Dispatch,
    SchedulerOutage(bool),
    StoreOutage(bool),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => Just(Op::Request),
        3 => Just(Op::Cancel),
        2 => (1i64..20).prop_map(Op::AdvanceDays),
        2 => Just(Op::Dispatch),
        1 => any::<bool>().prop_map(Op::SchedulerOutage),
        1 => any::<bool>().prop_map(Op::StoreOutage),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Property: whatever the interleaving of requests, cancels, outages
    /// and fired schedules, the marker fields are set or cleared together.
    /// Unless an account store write has failed, a pending marker also
    /// points at a live schedule with the same fire time.
    #[test]
    fn prop_marker_fields_stay_paired(ops in prop::collection::vec(op_strategy(), 1..40)) {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_time()
            .build()
            .unwrap();

        runtime.block_on(async {
            let h = Harness::new();
            let u1 = h.add_user("u1").await;
            let mut store_faulted = false;

            for op in ops {
                match op {
                    Op::Request => { let _ = h.service.request_deletion(&u1, &u1).await; }
                    Op::Cancel => { let _ = h.service.cancel_deletion(&u1, &u1).await; }
                    Op::AdvanceDays(days) => h.clock.advance(Duration::days(days)),
                    Op::Dispatch => { let _ = h.dispatcher.dispatch_due().await; }
                    Op::SchedulerOutage(down) => {
                        h.scheduler.fail_creates(down);
                        h.scheduler.fail_deletes(down);
                    }
                    Op::StoreOutage(down) => {
                        store_faulted |= down;
                        h.accounts.fail_writes(down);
                    }
                }

                let Some(account) = h.accounts.account(&u1).await else {
                    prop_assert!(h.primary.tombstone(&u1).await.is_some());
                    continue;
                };

                prop_assert!(account.marker_is_consistent(), "drifted marker: {:?}", account);

                if store_faulted {
                    continue;
                }
                if let (Some(fire_at), Some(handle)) =
                    (account.pending_deletion_at, account.schedule_handle.clone())
                {
                    let name = handle.schedule_name().unwrap();
                    let live = h.scheduler.get(GROUP, &name).await.unwrap();
                    prop_assert!(live.is_some(), "marker without schedule: {:?}", account);
                    prop_assert_eq!(live.unwrap().fire_at, fire_at);
                }
            }
            Ok::<(), TestCaseError>(())
        })?;
    }
}
