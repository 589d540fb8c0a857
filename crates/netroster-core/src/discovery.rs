// ── Discovery invoker ──
//
// The cache only needs "who answered within the timeout". Every failure
// mode of the underlying sweep collapses to an empty result here.

use std::time::Duration;

use async_trait::async_trait;
use netroster_scan::{ArpScanner, RawEndpoint};
use tracing::{debug, warn};

use crate::model::{DiscoveredEndpoint, MacAddress, MacError};

/// A live network sweep. Never fails: errors are logged and reported as
/// zero devices.
#[async_trait]
pub trait DiscoveryInvoker: Send + Sync {
    async fn discover(&self, timeout: Duration) -> Vec<DiscoveredEndpoint>;
}

impl TryFrom<&RawEndpoint> for DiscoveredEndpoint {
    type Error = MacError;

    fn try_from(raw: &RawEndpoint) -> Result<Self, Self::Error> {
        Ok(Self {
            ip: raw.ip,
            mac: MacAddress::parse(&raw.mac)?,
            vendor: raw.vendor.clone(),
        })
    }
}

/// [`DiscoveryInvoker`] backed by the `arp-scan` binary.
#[derive(Debug, Clone, Default)]
pub struct ArpScanDiscovery {
    scanner: ArpScanner,
}

impl ArpScanDiscovery {
    pub fn new(scanner: ArpScanner) -> Self {
        Self { scanner }
    }
}

#[async_trait]
impl DiscoveryInvoker for ArpScanDiscovery {
    async fn discover(&self, timeout: Duration) -> Vec<DiscoveredEndpoint> {
        let raw = match self.scanner.scan(timeout).await {
            Ok(raw) => raw,
            Err(e) if e.is_timeout() => {
                warn!(?timeout, "discovery timed out, treating as zero devices");
                return Vec::new();
            }
            Err(e) => {
                warn!(error = %e, "discovery failed, treating as zero devices");
                return Vec::new();
            }
        };

        raw.iter()
            .filter_map(|endpoint| match DiscoveredEndpoint::try_from(endpoint) {
                Ok(ep) => Some(ep),
                Err(e) => {
                    debug!(mac = %endpoint.mac, error = %e, "dropping endpoint with bad MAC");
                    None
                }
            })
            .collect()
    }
}

#[cfg(all(test, unix))]
#[allow(clippy::unwrap_used)]
mod tests {
    use netroster_scan::ScanConfig;

    use super::*;
    use pretty_assertions::assert_eq;

    fn shell(script: &str) -> ArpScanDiscovery {
        ArpScanDiscovery::new(ArpScanner::new(ScanConfig {
            command: "sh".into(),
            args: vec!["-c".into(), script.into()],
            interface: None,
        }))
    }

    #[tokio::test]
    async fn normalizes_scanned_macs() {
        let discovery = shell("printf '10.0.0.5\\tAA:BB:CC:DD:EE:FF\\tAcme\\n'");
        let found = discovery.discover(Duration::from_secs(10)).await;
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].mac.as_str(), "aabbccddeeff");
        assert_eq!(found[0].vendor.as_deref(), Some("Acme"));
    }

    #[tokio::test]
    async fn timeout_yields_no_devices() {
        let discovery = shell("sleep 5");
        assert!(discovery.discover(Duration::from_millis(100)).await.is_empty());
    }

    #[tokio::test]
    async fn failing_scanner_yields_no_devices() {
        let discovery = shell("exit 2");
        assert!(discovery.discover(Duration::from_secs(10)).await.is_empty());
    }
}
