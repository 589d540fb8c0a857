// ── Favorite persistence ──
//
// Only favorites are ever written. Each row is keyed by canonical MAC and
// carries the JSON-serialized record as its payload.

mod schema;
mod sqlite;

pub use sqlite::SqliteFavoriteStore;

use async_trait::async_trait;
use thiserror::Error;

use crate::model::{DeviceRecord, MacAddress};

/// Storage failures. These propagate to callers and are never retried.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Failed to serialize record: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Connection lock poisoned")]
    Poisoned,

    #[error("Blocking store task failed: {0}")]
    Join(#[from] tokio::task::JoinError),

    #[error("Store path error: {0}")]
    Io(#[from] std::io::Error),
}

/// Durable storage for favorite devices.
///
/// Reads self-heal: a row that cannot be decoded is deleted and treated as
/// absent rather than surfaced as an error.
#[async_trait]
pub trait FavoriteStore: Send + Sync {
    async fn find_by_mac(&self, mac: &MacAddress) -> Result<Option<DeviceRecord>, StoreError>;

    async fn get_all(&self) -> Result<Vec<DeviceRecord>, StoreError>;

    /// Upsert by MAC. Records with `is_favorite == false` are skipped.
    async fn save(&self, record: &DeviceRecord) -> Result<(), StoreError>;

    /// Returns the number of rows removed (0 or 1).
    async fn delete_by_mac(&self, mac: &MacAddress) -> Result<usize, StoreError>;

    /// Delete every row not flagged as favorite. Returns the number removed.
    async fn clear_non_favorites(&self) -> Result<usize, StoreError>;
}
