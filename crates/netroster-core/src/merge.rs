// ── Reconciliation ──
//
// Pure merge of stored favorites, a fresh discovery sweep, and the
// previously cached view into one view with exactly one record per MAC.
// No I/O happens here; the cache decides what to persist.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use indexmap::map::Entry;

use crate::model::{
    DeviceRecord, DeviceStatus, DiscoveredEndpoint, MacAddress, ScanMethod, UNKNOWN_VENDOR,
};

/// Merge favorites, discovered endpoints, and the previous view.
///
/// Emission order is: observed favorites, newly observed non-favorites,
/// unobserved favorites, unobserved cached entries. A MAC emitted by
/// an earlier step is never emitted again, and duplicate MACs within any
/// single input collapse to their first occurrence.
///
/// Every record with `is_favorite == true` in the result is favorite-derived
/// and must be persisted by the caller. A cached entry flagged favorite
/// whose row is gone is carried forward demoted, as on the fast path.
pub fn reconcile(
    favorites: &[DeviceRecord],
    discovered: &[DiscoveredEndpoint],
    previous: &[DeviceRecord],
    now: DateTime<Utc>,
) -> Vec<DeviceRecord> {
    let favorites_by_mac = index_first(favorites.iter().map(|f| (&f.mac, f)));
    let previous_by_mac: HashMap<&MacAddress, &DeviceRecord> =
        index_first(previous.iter().map(|p| (&p.mac, p)))
            .into_iter()
            .collect();
    let discovered_by_mac = index_first(discovered.iter().map(|d| (&d.mac, d)));

    let mut view: IndexMap<MacAddress, DeviceRecord> =
        IndexMap::with_capacity(favorites_by_mac.len() + discovered_by_mac.len() + previous.len());

    // 1. Observed favorites.
    for (mac, endpoint) in &discovered_by_mac {
        if let Some(favorite) = favorites_by_mac.get(mac) {
            emit(&mut view, observed_favorite(favorite, endpoint, now));
        }
    }

    // 2. Observed non-favorites, seeded from the cache.
    for (mac, endpoint) in &discovered_by_mac {
        if !favorites_by_mac.contains_key(mac) {
            let cached = previous_by_mac.get(mac).copied();
            emit(&mut view, observed_discovered(cached, endpoint, now));
        }
    }

    // 3. Favorites that did not answer.
    for (mac, favorite) in &favorites_by_mac {
        if !discovered_by_mac.contains_key(mac) {
            emit(&mut view, offline_favorite(favorite, now));
        }
    }

    // 4. Cached entries that did not answer and are not stored favorites.
    for cached in previous {
        if !discovered_by_mac.contains_key(&cached.mac) {
            emit(&mut view, offline_discovered(cached, now));
        }
    }

    view.into_values().collect()
}

/// Fast-path refresh: overlay the stored favorites on a cached view.
///
/// Same-MAC entries are replaced by the stored favorite, favorites missing
/// from the view are appended, and cached non-favorites are kept as they
/// are. A cached entry still flagged as favorite but no longer stored is
/// demoted to a plain discovered record.
pub fn splice_favorites(view: &[DeviceRecord], favorites: &[DeviceRecord]) -> Vec<DeviceRecord> {
    let mut stored = index_first(favorites.iter().map(|f| (&f.mac, f)));
    let mut out: IndexMap<MacAddress, DeviceRecord> =
        IndexMap::with_capacity(view.len() + stored.len());

    for cached in view {
        let record = match stored.shift_remove(&cached.mac) {
            Some(favorite) => favorite.clone(),
            None if cached.is_favorite => cached.clone().into_discovered(),
            None => cached.clone(),
        };
        emit(&mut out, record);
    }

    for favorite in stored.into_values() {
        emit(&mut out, favorite.clone());
    }

    out.into_values().collect()
}

// ── Per-step record builders ─────────────────────────────────────────

fn observed_favorite(
    favorite: &DeviceRecord,
    endpoint: &DiscoveredEndpoint,
    now: DateTime<Utc>,
) -> DeviceRecord {
    DeviceRecord {
        mac: favorite.mac.clone(),
        name: favorite.name.clone(),
        description: favorite.description.clone(),
        ip: Some(endpoint.ip),
        vendor: fallback_vendor(endpoint.vendor.as_deref(), Some(&favorite.vendor)),
        status: DeviceStatus::Online,
        is_favorite: true,
        last_seen: Some(now),
        last_scanned: Some(now),
        scan_method: ScanMethod::ArpScan,
    }
}

fn observed_discovered(
    cached: Option<&DeviceRecord>,
    endpoint: &DiscoveredEndpoint,
    now: DateTime<Utc>,
) -> DeviceRecord {
    let mut record = cached.map_or_else(
        || DeviceRecord::new(endpoint.mac.clone()),
        |c| c.clone().into_discovered(),
    );
    record.ip = Some(endpoint.ip);
    record.vendor = fallback_vendor(
        endpoint.vendor.as_deref(),
        cached.map(|c| c.vendor.as_str()),
    );
    record.status = DeviceStatus::Online;
    record.last_seen = Some(now);
    record.last_scanned = Some(now);
    record.scan_method = ScanMethod::ArpScan;
    record
}

fn offline_favorite(favorite: &DeviceRecord, now: DateTime<Utc>) -> DeviceRecord {
    DeviceRecord {
        status: DeviceStatus::Offline,
        is_favorite: true,
        last_scanned: Some(now),
        ..favorite.clone()
    }
}

fn offline_discovered(cached: &DeviceRecord, now: DateTime<Utc>) -> DeviceRecord {
    DeviceRecord {
        status: DeviceStatus::Offline,
        last_scanned: Some(now),
        ..cached.clone().into_discovered()
    }
}

// ── Helpers ──────────────────────────────────────────────────────────

/// Scanned vendor, else the cached one, else [`UNKNOWN_VENDOR`].
fn fallback_vendor(scanned: Option<&str>, cached: Option<&str>) -> String {
    scanned
        .into_iter()
        .chain(cached)
        .map(str::trim)
        .find(|v| !v.is_empty() && *v != UNKNOWN_VENDOR)
        .unwrap_or(UNKNOWN_VENDOR)
        .to_owned()
}

/// Insert only if the MAC has not been emitted yet.
fn emit(view: &mut IndexMap<MacAddress, DeviceRecord>, record: DeviceRecord) {
    if let Entry::Vacant(slot) = view.entry(record.mac.clone()) {
        slot.insert(record);
    }
}

/// Build an ordered index keeping the first value for each MAC.
fn index_first<'a, T>(
    items: impl Iterator<Item = (&'a MacAddress, &'a T)>,
) -> IndexMap<&'a MacAddress, &'a T> {
    let mut index = IndexMap::new();
    for (mac, item) in items {
        index.entry(mac).or_insert(item);
    }
    index
}
