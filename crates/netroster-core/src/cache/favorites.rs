// ── Favorite lifecycle ──
//
// User-driven edits to the favorite set. Each operation validates first,
// then updates the store and the view under the mutation lock so a
// concurrent scan cannot interleave with it.

use std::net::{IpAddr, Ipv4Addr};

use serde::Serialize;
use tracing::info;

use super::ReconciliationCache;
use crate::error::CoreError;
use crate::model::{
    DeviceRecord, DeviceStatus, FavoriteUpdate, MacAddress, NewFavorite, ScanMethod, validate_name,
};

/// Everything needed to address a wake packet to one device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WakeTarget {
    pub mac: MacAddress,
    pub name: Option<String>,
    pub ip: Option<IpAddr>,
    /// Directed broadcast assuming a /24, when the last IP is IPv4.
    pub broadcast: Option<Ipv4Addr>,
    pub status: DeviceStatus,
}

impl WakeTarget {
    fn from_record(record: &DeviceRecord) -> Self {
        let broadcast = match record.ip {
            Some(IpAddr::V4(v4)) => {
                let [a, b, c, _] = v4.octets();
                Some(Ipv4Addr::new(a, b, c, 255))
            }
            _ => None,
        };
        Self {
            mac: record.mac.clone(),
            name: record.name.clone(),
            ip: record.ip,
            broadcast,
            status: record.status,
        }
    }

    /// Magic packet payload: six `0xFF` bytes then the MAC sixteen times.
    pub fn magic_packet(&self) -> Vec<u8> {
        let octets = self.mac.octets();
        let mut packet = Vec::with_capacity(6 + 16 * octets.len());
        packet.extend_from_slice(&[0xFF; 6]);
        for _ in 0..16 {
            packet.extend_from_slice(&octets);
        }
        packet
    }
}

impl ReconciliationCache {
    /// Create a favorite, seeding network state from the view when the
    /// device has already been seen.
    pub async fn add_favorite(&self, new: NewFavorite) -> Result<DeviceRecord, CoreError> {
        let _lock = self.inner.mutation.lock().await;

        if self.inner.store.find_by_mac(&new.mac).await?.is_some() {
            return Err(CoreError::AlreadyFavorite {
                mac: new.mac.to_string(),
            });
        }

        let seen = self.device(&new.mac);
        let record = DeviceRecord {
            name: Some(new.name),
            description: new.description,
            is_favorite: true,
            scan_method: ScanMethod::Manual,
            ..seen.unwrap_or_else(|| DeviceRecord::new(new.mac))
        };

        self.inner.store.save(&record).await?;
        info!(mac = %record.mac, "favorite added");
        self.place_in_view(&record.mac, record.clone());
        Ok(record)
    }

    /// Edit an existing favorite. A MAC change moves the row and re-keys
    /// the view entry; the old MAC stays in the view as a discovered device.
    pub async fn update_favorite(
        &self,
        mac: &MacAddress,
        update: FavoriteUpdate,
    ) -> Result<DeviceRecord, CoreError> {
        let _lock = self.inner.mutation.lock().await;

        let Some(mut record) = self.inner.store.find_by_mac(mac).await? else {
            return Err(CoreError::DeviceNotFound {
                mac: mac.to_string(),
            });
        };

        if let Some(name) = update.name {
            record.name = Some(name);
        }
        if let Some(description) = update.description {
            record.description = description;
        }

        let Some(new_mac) = update.mac.filter(|m| m != mac) else {
            self.inner.store.save(&record).await?;
            info!(mac = %record.mac, "favorite updated");
            self.place_in_view(mac, record.clone());
            return Ok(record);
        };

        if self.inner.store.find_by_mac(&new_mac).await?.is_some() {
            return Err(CoreError::AlreadyFavorite {
                mac: new_mac.to_string(),
            });
        }

        // Network state belongs to the hardware, not the favorite.
        let seen = self
            .device(&new_mac)
            .unwrap_or_else(|| DeviceRecord::new(new_mac.clone()));
        let record = DeviceRecord {
            mac: new_mac,
            name: record.name,
            description: record.description,
            is_favorite: true,
            scan_method: ScanMethod::Manual,
            ..seen
        };

        self.inner.store.save(&record).await?;
        self.inner.store.delete_by_mac(mac).await?;
        info!(old = %mac, new = %record.mac, "favorite moved to new MAC");
        self.move_in_view(mac, record.clone());
        Ok(record)
    }

    /// Un-favorite a device. Its view entry stays, without user metadata.
    pub async fn remove_favorite(&self, mac: &MacAddress) -> Result<Option<DeviceRecord>, CoreError> {
        let _lock = self.inner.mutation.lock().await;

        if self.inner.store.delete_by_mac(mac).await? == 0 {
            return Err(CoreError::DeviceNotFound {
                mac: mac.to_string(),
            });
        }
        info!(%mac, "favorite removed");

        let demoted = self.device(mac).map(DeviceRecord::into_discovered);
        if let Some(ref record) = demoted {
            self.place_in_view(mac, record.clone());
        }
        Ok(demoted)
    }

    /// Promote a discovered device to a favorite. Without a name, a
    /// placeholder derived from the MAC is used.
    pub async fn promote(
        &self,
        mac: &MacAddress,
        name: Option<&str>,
    ) -> Result<DeviceRecord, CoreError> {
        let name = name.map(validate_name).transpose()?;
        let _lock = self.inner.mutation.lock().await;

        let Some(seen) = self.device(mac) else {
            return Err(CoreError::DeviceNotFound {
                mac: mac.to_string(),
            });
        };
        if seen.is_favorite || self.inner.store.find_by_mac(mac).await?.is_some() {
            return Err(CoreError::AlreadyFavorite {
                mac: mac.to_string(),
            });
        }

        let record = DeviceRecord {
            name: Some(name.unwrap_or_else(|| DeviceRecord::placeholder_name(mac))),
            description: None,
            is_favorite: true,
            ..seen
        };

        self.inner.store.save(&record).await?;
        info!(%mac, name = record.name.as_deref(), "device promoted to favorite");
        self.place_in_view(mac, record.clone());
        Ok(record)
    }

    /// Identify the device a wake packet should be addressed to. Favorites
    /// missing from the view are looked up in the store.
    pub async fn wake_target(&self, mac: &MacAddress) -> Result<WakeTarget, CoreError> {
        let record = match self.device(mac) {
            Some(record) => record,
            None => self
                .inner
                .store
                .find_by_mac(mac)
                .await?
                .ok_or_else(|| CoreError::DeviceNotFound {
                    mac: mac.to_string(),
                })?,
        };
        Ok(WakeTarget::from_record(&record))
    }
}
