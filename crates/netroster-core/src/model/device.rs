// ── Device domain types ──

use std::net::IpAddr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use super::mac::MacAddress;

/// Vendor shown when neither the scan nor the cache knows better.
pub const UNKNOWN_VENDOR: &str = "Unknown";

/// Whether the device answered the most recently completed scan.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum DeviceStatus {
    Online,
    #[default]
    Offline,
}

impl DeviceStatus {
    pub fn is_online(self) -> bool {
        matches!(self, Self::Online)
    }
}

/// How a record's network metadata was obtained.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum ScanMethod {
    #[default]
    ArpScan,
    Manual,
}

/// The single entity of the cache.
///
/// Favorites (`is_favorite == true`) are the only records ever written to
/// the store; everything else lives in the in-memory view. `name` and
/// `description` are only ever set on favorites.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceRecord {
    pub mac: MacAddress,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub ip: Option<IpAddr>,
    #[serde(default = "unknown_vendor")]
    pub vendor: String,
    #[serde(default)]
    pub status: DeviceStatus,
    #[serde(default)]
    pub is_favorite: bool,
    #[serde(default)]
    pub last_seen: Option<DateTime<Utc>>,
    #[serde(default)]
    pub last_scanned: Option<DateTime<Utc>>,
    #[serde(default)]
    pub scan_method: ScanMethod,
}

fn unknown_vendor() -> String {
    UNKNOWN_VENDOR.into()
}

impl DeviceRecord {
    /// A bare record for `mac` with nothing observed yet.
    pub fn new(mac: MacAddress) -> Self {
        Self {
            mac,
            name: None,
            description: None,
            ip: None,
            vendor: unknown_vendor(),
            status: DeviceStatus::Offline,
            is_favorite: false,
            last_seen: None,
            last_scanned: None,
            scan_method: ScanMethod::ArpScan,
        }
    }

    pub fn is_online(&self) -> bool {
        self.status.is_online()
    }

    /// Drop user metadata and the favorite flag, keeping network state.
    pub fn into_discovered(mut self) -> Self {
        self.is_favorite = false;
        self.name = None;
        self.description = None;
        self
    }

    /// `Device AABBCC`, used when a record is promoted without a name.
    pub fn placeholder_name(mac: &MacAddress) -> String {
        format!("Device {}", mac.short_suffix())
    }
}

/// One endpoint observed by a discovery sweep, already normalized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredEndpoint {
    pub ip: IpAddr,
    pub mac: MacAddress,
    pub vendor: Option<String>,
}
