// ── Reconciliation cache ──
//
// Owns the current device view and drives discovery, merge, and
// persistence. Readers load the last published snapshot and never see a
// half-merged view. At most one scan runs per instance; a caller that
// loses the race gets the current view back immediately.

mod favorites;
mod refresh;

#[cfg(test)]
pub(crate) mod testing;

pub use favorites::WakeTarget;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use arc_swap::ArcSwap;
use chrono::{DateTime, TimeDelta, Utc};
use serde::Serialize;
use tokio::sync::{Mutex, watch};
use tracing::{debug, info, warn};

use crate::config::CacheConfig;
use crate::discovery::DiscoveryInvoker;
use crate::error::CoreError;
use crate::merge;
use crate::model::{DeviceRecord, DiscoveredEndpoint, MacAddress};
use crate::store::{FavoriteStore, StoreError};

/// The view and the time of the scan that produced it, swapped as a unit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewSnapshot {
    pub devices: Vec<DeviceRecord>,
    pub last_scan_at: Option<DateTime<Utc>>,
}

/// Result of [`ReconciliationCache::get_view`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceView {
    pub devices: Vec<DeviceRecord>,
    pub last_scan_at: Option<DateTime<Utc>>,
    pub scan_in_progress: bool,
}

/// Result of [`ReconciliationCache::clear_non_favorites`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClearOutcome {
    pub devices: Vec<DeviceRecord>,
    pub deleted_count: usize,
}

struct CacheInner {
    store: Arc<dyn FavoriteStore>,
    discovery: Arc<dyn DiscoveryInvoker>,
    config: CacheConfig,
    view: ArcSwap<ViewSnapshot>,
    scan_in_progress: AtomicBool,
    /// Serializes read-modify-write of the view and the store.
    mutation: Mutex<()>,
    snapshot_tx: watch::Sender<Arc<ViewSnapshot>>,
}

/// Handle to the device view. Cloning is cheap and shares state.
#[derive(Clone)]
pub struct ReconciliationCache {
    inner: Arc<CacheInner>,
}

impl std::fmt::Debug for ReconciliationCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReconciliationCache")
            .field("config", &self.inner.config)
            .field("devices", &self.inner.view.load().devices.len())
            .field("scan_in_progress", &self.is_scanning())
            .finish_non_exhaustive()
    }
}

/// Clears the scan flag when dropped, including on panic or cancellation.
struct ScanGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> ScanGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self { flag })
    }
}

impl Drop for ScanGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

impl ReconciliationCache {
    pub fn new(
        store: Arc<dyn FavoriteStore>,
        discovery: Arc<dyn DiscoveryInvoker>,
        config: CacheConfig,
    ) -> Self {
        let initial = Arc::new(ViewSnapshot::default());
        let (snapshot_tx, _) = watch::channel(Arc::clone(&initial));

        Self {
            inner: Arc::new(CacheInner {
                store,
                discovery,
                config,
                view: ArcSwap::new(initial),
                scan_in_progress: AtomicBool::new(false),
                mutation: Mutex::new(()),
                snapshot_tx,
            }),
        }
    }

    pub fn config(&self) -> &CacheConfig {
        &self.inner.config
    }

    /// The last published view, without touching the store or the network.
    pub fn snapshot(&self) -> Arc<ViewSnapshot> {
        self.inner.view.load_full()
    }

    pub fn is_scanning(&self) -> bool {
        self.inner.scan_in_progress.load(Ordering::Acquire)
    }

    /// Receive every published snapshot.
    pub fn subscribe(&self) -> watch::Receiver<Arc<ViewSnapshot>> {
        self.inner.snapshot_tx.subscribe()
    }

    /// Look up one device in the current view.
    pub fn device(&self, mac: &MacAddress) -> Option<DeviceRecord> {
        self.inner
            .view
            .load()
            .devices
            .iter()
            .find(|d| d.mac == *mac)
            .cloned()
    }

    /// Return the device view, scanning first when it is stale.
    ///
    /// A full scan runs when `force_scan` is set, no scan has completed,
    /// the view is empty, or the last scan is older than `ttl`. Otherwise
    /// stored favorites are spliced over the cached view and discovery is
    /// not invoked.
    pub async fn get_view(&self, force_scan: bool, ttl: Duration) -> Result<DeviceView, CoreError> {
        if force_scan || is_stale(&self.snapshot(), ttl, Utc::now()) {
            self.scan_and_update_devices().await;
        } else {
            self.refresh_favorites().await?;
        }

        let snapshot = self.snapshot();
        Ok(DeviceView {
            devices: snapshot.devices.clone(),
            last_scan_at: snapshot.last_scan_at,
            scan_in_progress: self.is_scanning(),
        })
    }

    /// Run discovery, merge it with favorites and the previous view,
    /// persist favorites, and publish the result.
    ///
    /// Never fails. If a scan is already running the current view is
    /// returned without invoking discovery. Storage failures leave the
    /// previous view in place and return it.
    pub async fn scan_and_update_devices(&self) -> Vec<DeviceRecord> {
        let Some(_guard) = ScanGuard::acquire(&self.inner.scan_in_progress) else {
            debug!("scan already in progress, serving current view");
            return self.snapshot().devices.clone();
        };

        let discovered = self
            .inner
            .discovery
            .discover(self.inner.config.scan_timeout)
            .await;

        match self.apply_scan(&discovered).await {
            Ok(devices) => devices,
            Err(e) => {
                warn!(error = %e, "scan reconciliation failed, keeping previous view");
                self.snapshot().devices.clone()
            }
        }
    }

    /// Drop the view and forget the last scan time.
    pub fn clear_cache(&self) {
        info!("clearing device cache");
        self.publish(ViewSnapshot::default());
    }

    /// Remove stored rows not flagged as favorite, clear the cache, and
    /// rebuild the view with one full scan.
    pub async fn clear_non_favorites(&self) -> Result<ClearOutcome, CoreError> {
        let deleted_count = self.inner.store.clear_non_favorites().await?;
        self.clear_cache();
        let devices = self.scan_and_update_devices().await;
        Ok(ClearOutcome {
            devices,
            deleted_count,
        })
    }

    async fn apply_scan(
        &self,
        discovered: &[DiscoveredEndpoint],
    ) -> Result<Vec<DeviceRecord>, StoreError> {
        let _lock = self.inner.mutation.lock().await;

        let favorites = self.inner.store.get_all().await?;
        let previous = self.snapshot();
        let now = Utc::now();
        let devices = merge::reconcile(&favorites, discovered, &previous.devices, now);

        for record in devices.iter().filter(|r| r.is_favorite) {
            self.inner.store.save(record).await?;
        }

        let online = devices.iter().filter(|d| d.is_online()).count();
        info!(
            devices = devices.len(),
            online,
            discovered = discovered.len(),
            favorites = favorites.len(),
            "scan reconciled"
        );

        self.publish(ViewSnapshot {
            devices: devices.clone(),
            last_scan_at: Some(now),
        });
        Ok(devices)
    }

    async fn refresh_favorites(&self) -> Result<(), CoreError> {
        let _lock = self.inner.mutation.lock().await;

        let favorites = self.inner.store.get_all().await?;
        let current = self.snapshot();
        let devices = merge::splice_favorites(&current.devices, &favorites);
        if devices != current.devices {
            debug!(devices = devices.len(), "favorites spliced into cached view");
            self.publish(ViewSnapshot {
                devices,
                last_scan_at: current.last_scan_at,
            });
        }
        Ok(())
    }

    /// Put `record` where `replaces` (or its own MAC) sat in the view,
    /// appending if neither is present. Keeps the last scan time.
    fn place_in_view(&self, replaces: &MacAddress, record: DeviceRecord) {
        let current = self.snapshot();
        let key = record.mac.clone();
        let mut pending = Some(record);
        let mut devices = Vec::with_capacity(current.devices.len() + 1);

        for device in &current.devices {
            if device.mac == *replaces || device.mac == key {
                devices.extend(pending.take());
            } else {
                devices.push(device.clone());
            }
        }
        devices.extend(pending);

        self.publish(ViewSnapshot {
            devices,
            last_scan_at: current.last_scan_at,
        });
    }

    /// Re-key a favorite from `old` to `record.mac`. The record takes the
    /// first slot of either MAC; the old hardware stays, demoted, right after.
    fn move_in_view(&self, old: &MacAddress, record: DeviceRecord) {
        let current = self.snapshot();
        let key = record.mac.clone();
        let mut pending = Some(record);
        let mut devices = Vec::with_capacity(current.devices.len() + 1);

        for device in &current.devices {
            if device.mac == *old {
                devices.extend(pending.take());
                devices.push(device.clone().into_discovered());
            } else if device.mac == key {
                devices.extend(pending.take());
            } else {
                devices.push(device.clone());
            }
        }
        devices.extend(pending);

        self.publish(ViewSnapshot {
            devices,
            last_scan_at: current.last_scan_at,
        });
    }

    fn publish(&self, snapshot: ViewSnapshot) {
        let snapshot = Arc::new(snapshot);
        self.inner.view.store(Arc::clone(&snapshot));
        self.inner.snapshot_tx.send_replace(snapshot);
    }
}

fn is_stale(snapshot: &ViewSnapshot, ttl: Duration, now: DateTime<Utc>) -> bool {
    let Some(last_scan_at) = snapshot.last_scan_at else {
        return true;
    };
    if snapshot.devices.is_empty() {
        return true;
    }
    // A TTL too large to represent never expires.
    TimeDelta::from_std(ttl).is_ok_and(|ttl| now - last_scan_at > ttl)
}
