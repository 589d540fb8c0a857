//! Device discovery reconciliation cache.
//!
//! Turns noisy, short-lived network sweeps into a stable view of the
//! devices on the local network, merged against a small set of
//! user-curated favorites that are the only state ever persisted.
//!
//! - **[`ReconciliationCache`]**: Cloneable handle owning the current
//!   view. [`get_view()`](ReconciliationCache::get_view) serves cached data
//!   and scans only when the view is stale;
//!   [`scan_and_update_devices()`](ReconciliationCache::scan_and_update_devices)
//!   runs at most one sweep at a time per instance. Favorite lifecycle
//!   operations (add, edit, remove, promote) live on the same handle.
//!
//! - **[`merge`]**: Pure reconciliation of favorites, discovered endpoints,
//!   and the previous view into exactly one record per MAC.
//!
//! - **[`FavoriteStore`]**: Durable favorites, implemented over SQLite by
//!   [`SqliteFavoriteStore`]. Corrupt rows are deleted on read.
//!
//! - **[`DiscoveryInvoker`]**: Live sweep that never fails upward;
//!   [`ArpScanDiscovery`] wraps `netroster-scan`.
//!
//! - **Domain model** ([`model`]): [`DeviceRecord`] and the canonical
//!   [`MacAddress`] identity.

pub mod cache;
pub mod config;
pub mod discovery;
pub mod error;
pub mod merge;
pub mod model;
pub mod store;

// ── Primary re-exports ──────────────────────────────────────────────
pub use cache::{ClearOutcome, DeviceView, ReconciliationCache, ViewSnapshot, WakeTarget};
pub use config::CacheConfig;
pub use discovery::{ArpScanDiscovery, DiscoveryInvoker};
pub use error::CoreError;
pub use store::{FavoriteStore, SqliteFavoriteStore, StoreError};

pub use model::{
    DeviceRecord, DeviceStatus, DiscoveredEndpoint, FavoriteUpdate, MacAddress, MacError,
    NewFavorite, ScanMethod,
};
