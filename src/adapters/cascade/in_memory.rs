//! In-memory cascade targets.
//!
//! Each target counts its calls and can be switched into a simulated
//! outage, which is how redelivery behaviour is exercised in tests.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::{AccountId, Timestamp};
use crate::ports::{AccountStore, CascadeTargetError, Clock, IdentityProvider, ObjectStore, PrimaryStore};

/// Outage switch and call counter shared by the in-memory targets.
#[derive(Debug, Default)]
struct Availability {
    unavailable: AtomicBool,
    calls: AtomicUsize,
}

impl Availability {
    fn enter(&self, target: &'static str) -> Result<(), CascadeTargetError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(CascadeTargetError::new(target, "Simulated outage"));
        }
        Ok(())
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Identity provider
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Default)]
pub struct InMemoryIdentityProvider {
    users: Arc<RwLock<HashSet<AccountId>>>,
    availability: Arc<Availability>,
}

impl InMemoryIdentityProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn add_user(&self, user_id: AccountId) {
        self.users.write().await.insert(user_id);
    }

    pub async fn has_user(&self, user_id: &AccountId) -> bool {
        self.users.read().await.contains(user_id)
    }

    pub fn set_unavailable(&self, unavailable: bool) {
        self.availability.unavailable.store(unavailable, Ordering::SeqCst);
    }

    pub fn delete_calls(&self) -> usize {
        self.availability.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl IdentityProvider for InMemoryIdentityProvider {
    async fn delete_user(&self, user_id: &AccountId) -> Result<(), CascadeTargetError> {
        self.availability.enter("identity_provider")?;
        self.users.write().await.remove(user_id);
        Ok(())
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Primary store
// ════════════════════════════════════════════════════════════════════════════

/// Primary store over an [`AccountStore`] plus in-memory owned data.
///
/// The account record itself lives in the wrapped account store, so a
/// purge here is visible to the lifecycle handlers.
#[derive(Clone)]
pub struct InMemoryPrimaryStore {
    accounts: Arc<dyn AccountStore>,
    clock: Arc<dyn Clock>,
    owned_data: Arc<RwLock<HashMap<AccountId, Vec<String>>>>,
    tombstones: Arc<RwLock<HashMap<AccountId, Timestamp>>>,
    availability: Arc<Availability>,
}

impl InMemoryPrimaryStore {
    pub fn new(accounts: Arc<dyn AccountStore>, clock: Arc<dyn Clock>) -> Self {
        Self {
            accounts,
            clock,
            owned_data: Arc::new(RwLock::new(HashMap::new())),
            tombstones: Arc::new(RwLock::new(HashMap::new())),
            availability: Arc::new(Availability::default()),
        }
    }

    /// Attaches an owned item (profile row, avatar reference) to an account.
    pub async fn add_owned_item(&self, account_id: AccountId, item: impl Into<String>) {
        self.owned_data
            .write()
            .await
            .entry(account_id)
            .or_default()
            .push(item.into());
    }

    pub async fn owned_items(&self, account_id: &AccountId) -> Vec<String> {
        self.owned_data
            .read()
            .await
            .get(account_id)
            .cloned()
            .unwrap_or_default()
    }

    /// When the account was first tombstoned, if ever.
    pub async fn tombstone(&self, account_id: &AccountId) -> Option<Timestamp> {
        self.tombstones.read().await.get(account_id).copied()
    }

    pub fn set_unavailable(&self, unavailable: bool) {
        self.availability.unavailable.store(unavailable, Ordering::SeqCst);
    }

    pub fn delete_calls(&self) -> usize {
        self.availability.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PrimaryStore for InMemoryPrimaryStore {
    async fn delete_account_and_related_data(
        &self,
        user_id: &AccountId,
    ) -> Result<(), CascadeTargetError> {
        self.availability.enter("primary_store")?;

        let now = self.clock.now();
        self.tombstones
            .write()
            .await
            .entry(user_id.clone())
            .or_insert(now);
        self.owned_data.write().await.remove(user_id);

        self.accounts
            .delete_account_record(user_id)
            .await
            .map_err(|e| CascadeTargetError::new("primary_store", e.to_string()))
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Object store
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Default)]
pub struct InMemoryObjectStore {
    objects: Arc<RwLock<HashMap<String, Vec<u8>>>>,
    availability: Arc<Availability>,
}

impl InMemoryObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn put_object(&self, key: impl Into<String>, bytes: Vec<u8>) {
        self.objects.write().await.insert(key.into(), bytes);
    }

    pub async fn contains(&self, key: &str) -> bool {
        self.objects.read().await.contains_key(key)
    }

    pub fn set_unavailable(&self, unavailable: bool) {
        self.availability.unavailable.store(unavailable, Ordering::SeqCst);
    }

    pub fn delete_calls(&self) -> usize {
        self.availability.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ObjectStore for InMemoryObjectStore {
    async fn delete_object(&self, key: &str) -> Result<(), CascadeTargetError> {
        self.availability.enter("object_store")?;
        self.objects.write().await.remove(key);
        Ok(())
    }
}
