// Test doubles shared by the cache test modules.

#![allow(clippy::unwrap_used)]

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Notify;

use super::ReconciliationCache;
use crate::config::CacheConfig;
use crate::discovery::DiscoveryInvoker;
use crate::model::{DeviceRecord, DiscoveredEndpoint, MacAddress, ScanMethod};
use crate::store::{FavoriteStore, SqliteFavoriteStore, StoreError};

pub(crate) fn mac(raw: &str) -> MacAddress {
    MacAddress::parse(raw).unwrap()
}

pub(crate) fn endpoint(ip: &str, raw_mac: &str) -> DiscoveredEndpoint {
    DiscoveredEndpoint {
        ip: ip.parse().unwrap(),
        mac: mac(raw_mac),
        vendor: Some("Acme".into()),
    }
}

pub(crate) fn favorite(raw_mac: &str, name: &str) -> DeviceRecord {
    DeviceRecord {
        name: Some(name.into()),
        is_favorite: true,
        scan_method: ScanMethod::Manual,
        ..DeviceRecord::new(mac(raw_mac))
    }
}

/// A cache over an in-memory store and `discovery`.
pub(crate) fn cache_with(
    discovery: &StubDiscovery,
) -> (ReconciliationCache, Arc<SqliteFavoriteStore>) {
    let store = Arc::new(SqliteFavoriteStore::open_in_memory().unwrap());
    let cache = ReconciliationCache::new(
        Arc::clone(&store) as Arc<dyn FavoriteStore>,
        Arc::new(discovery.clone()),
        CacheConfig::default(),
    );
    (cache, store)
}

#[derive(Default)]
struct Gate {
    entered: Notify,
    release: Notify,
}

#[derive(Default)]
struct StubState {
    response: Mutex<Vec<DiscoveredEndpoint>>,
    calls: AtomicUsize,
    gate: Option<Gate>,
}

/// Scripted discovery that counts invocations and can block mid-sweep.
#[derive(Clone, Default)]
pub(crate) struct StubDiscovery {
    state: Arc<StubState>,
}

impl StubDiscovery {
    pub(crate) fn returning(response: Vec<DiscoveredEndpoint>) -> Self {
        Self {
            state: Arc::new(StubState {
                response: Mutex::new(response),
                ..StubState::default()
            }),
        }
    }

    /// Each sweep signals entry, then waits for [`release`](Self::release).
    pub(crate) fn gated(response: Vec<DiscoveredEndpoint>) -> Self {
        Self {
            state: Arc::new(StubState {
                response: Mutex::new(response),
                gate: Some(Gate::default()),
                ..StubState::default()
            }),
        }
    }

    pub(crate) fn set(&self, response: Vec<DiscoveredEndpoint>) {
        *self.state.response.lock().unwrap() = response;
    }

    pub(crate) fn calls(&self) -> usize {
        self.state.calls.load(Ordering::SeqCst)
    }

    pub(crate) async fn wait_entered(&self) {
        if let Some(gate) = &self.state.gate {
            gate.entered.notified().await;
        }
    }

    pub(crate) fn release(&self) {
        if let Some(gate) = &self.state.gate {
            gate.release.notify_one();
        }
    }
}

#[async_trait]
impl DiscoveryInvoker for StubDiscovery {
    async fn discover(&self, _timeout: Duration) -> Vec<DiscoveredEndpoint> {
        self.state.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = &self.state.gate {
            gate.entered.notify_one();
            gate.release.notified().await;
        }
        let response = self.state.response.lock().unwrap().clone();
        response
    }
}

/// A store whose every operation fails.
#[derive(Default)]
pub(crate) struct FailingStore;

fn unavailable() -> StoreError {
    StoreError::Io(std::io::Error::other("store unavailable"))
}

#[async_trait]
impl FavoriteStore for FailingStore {
    async fn find_by_mac(&self, _mac: &MacAddress) -> Result<Option<DeviceRecord>, StoreError> {
        Err(unavailable())
    }

    async fn get_all(&self) -> Result<Vec<DeviceRecord>, StoreError> {
        Err(unavailable())
    }

    async fn save(&self, _record: &DeviceRecord) -> Result<(), StoreError> {
        Err(unavailable())
    }

    async fn delete_by_mac(&self, _mac: &MacAddress) -> Result<usize, StoreError> {
        Err(unavailable())
    }

    async fn clear_non_favorites(&self) -> Result<usize, StoreError> {
        Err(unavailable())
    }
}

/// Reads from an in-memory store; writes fail once `fail_saves` is set.
pub(crate) struct SaveFailingStore {
    inner: SqliteFavoriteStore,
    pub(crate) fail_saves: AtomicBool,
}

impl SaveFailingStore {
    pub(crate) fn new() -> Self {
        Self {
            inner: SqliteFavoriteStore::open_in_memory().unwrap(),
            fail_saves: AtomicBool::new(false),
        }
    }
}

#[async_trait]
impl FavoriteStore for SaveFailingStore {
    async fn find_by_mac(&self, mac: &MacAddress) -> Result<Option<DeviceRecord>, StoreError> {
        self.inner.find_by_mac(mac).await
    }

    async fn get_all(&self) -> Result<Vec<DeviceRecord>, StoreError> {
        self.inner.get_all().await
    }

    async fn save(&self, record: &DeviceRecord) -> Result<(), StoreError> {
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(StoreError::Poisoned);
        }
        self.inner.save(record).await
    }

    async fn delete_by_mac(&self, mac: &MacAddress) -> Result<usize, StoreError> {
        self.inner.delete_by_mac(mac).await
    }

    async fn clear_non_favorites(&self) -> Result<usize, StoreError> {
        self.inner.clear_non_favorites().await
    }
}
