// ── Background refresh ──

use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use super::ReconciliationCache;

const MIN_PERIOD: Duration = Duration::from_millis(10);

impl ReconciliationCache {
    /// Run a full scan every `period` until `cancel` fires.
    ///
    /// The first scan happens one period after spawning. Ticks that land
    /// while a scan is still running are delayed, not bunched.
    pub fn spawn_refresh_task(&self, period: Duration, cancel: CancellationToken) -> JoinHandle<()> {
        tokio::spawn(refresh_task(self.clone(), period.max(MIN_PERIOD), cancel))
    }
}

async fn refresh_task(cache: ReconciliationCache, period: Duration, cancel: CancellationToken) {
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    interval.tick().await; // consume the immediate first tick

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            _ = interval.tick() => {
                let devices = cache.scan_and_update_devices().await;
                debug!(devices = devices.len(), "periodic scan complete");
            }
        }
    }
    debug!("refresh task stopped");
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::super::testing::{StubDiscovery, cache_with};
    use super::*;

    #[tokio::test]
    async fn scans_periodically_until_cancelled() {
        let discovery = StubDiscovery::returning(Vec::new());
        let (cache, _) = cache_with(&discovery);
        let cancel = CancellationToken::new();

        let handle = cache.spawn_refresh_task(Duration::from_millis(50), cancel.clone());
        tokio::time::sleep(Duration::from_millis(300)).await;
        cancel.cancel();
        handle.await.unwrap();

        let calls = discovery.calls();
        assert!(calls >= 2, "expected at least two scans, got {calls}");

        tokio::time::sleep(Duration::from_millis(120)).await;
        assert_eq!(discovery.calls(), calls, "no scans after cancellation");
    }
}
