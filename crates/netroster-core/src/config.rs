// ── Cache configuration ──
//
// Runtime knobs handed to the cache at construction. Loading from files
// and the environment lives in `netroster-config`.

use std::time::Duration;

/// Tuning for a [`ReconciliationCache`](crate::ReconciliationCache).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheConfig {
    /// Hard limit on one discovery sweep.
    pub scan_timeout: Duration,
    /// Age after which [`get_view`](crate::ReconciliationCache::get_view)
    /// runs a full scan instead of the fast path.
    pub view_ttl: Duration,
    /// Period of the background refresh task; `None` disables it.
    pub auto_refresh: Option<Duration>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            scan_timeout: Duration::from_secs(30),
            view_ttl: Duration::from_secs(300),
            auto_refresh: None,
        }
    }
}
