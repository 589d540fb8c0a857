// ── Domain model ──
//
// Device records, canonical MAC identity, and validated favorite input.

pub mod device;
pub mod favorite;
pub mod mac;

pub use device::{DeviceRecord, DeviceStatus, DiscoveredEndpoint, ScanMethod, UNKNOWN_VENDOR};
pub use favorite::{FavoriteUpdate, NewFavorite, validate_description, validate_name};
pub use mac::{MacAddress, MacError};
