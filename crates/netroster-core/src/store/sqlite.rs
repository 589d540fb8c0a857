// ── SQLite favorite store ──
//
// A single connection behind a std mutex. Every call hops onto the
// blocking pool so the async cache never stalls a runtime worker on disk I/O.

use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use rusqlite::{Connection, OptionalExtension, params};
use tracing::{debug, warn};

use super::schema::SCHEMA_SQL;
use super::{FavoriteStore, StoreError};
use crate::model::{DeviceRecord, MacAddress};

const FAVORITE_ROWS: &str = "COALESCE(is_favorite, 0) != 0";

/// Decoded payload column of one row.
#[derive(Debug)]
enum RowPayload {
    Valid(DeviceRecord),
    Corrupt { reason: String },
}

impl RowPayload {
    /// A row is valid only if its payload decodes and names the row's own key.
    fn decode(key: &str, payload: Option<&str>) -> Self {
        let Some(payload) = payload else {
            return Self::Corrupt {
                reason: "payload is not text".into(),
            };
        };
        match serde_json::from_str::<DeviceRecord>(payload) {
            Ok(record) if record.mac.as_str() == key => Self::Valid(DeviceRecord {
                is_favorite: true,
                ..record
            }),
            Ok(record) => Self::Corrupt {
                reason: format!("payload MAC {} does not match key", record.mac),
            },
            Err(e) => Self::Corrupt {
                reason: e.to_string(),
            },
        }
    }
}

/// [`FavoriteStore`] backed by a single SQLite database file.
#[derive(Clone)]
pub struct SqliteFavoriteStore {
    conn: Arc<Mutex<Connection>>,
}

impl std::fmt::Debug for SqliteFavoriteStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteFavoriteStore").finish_non_exhaustive()
    }
}

impl SqliteFavoriteStore {
    /// Open or create the database at `path`, creating parent directories.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        debug!(path = %path.display(), "opening favorite store");
        Self::initialize(Connection::open(path)?)
    }

    /// Open an in-memory database (tests and throwaway sessions).
    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::initialize(Connection::open_in_memory()?)
    }

    fn initialize(conn: Connection) -> Result<Self, StoreError> {
        conn.execute_batch(SCHEMA_SQL)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Run `f` against the connection on the blocking pool.
    async fn with_conn<T, F>(&self, f: F) -> Result<T, StoreError>
    where
        T: Send + 'static,
        F: FnOnce(&Connection) -> Result<T, StoreError> + Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let guard = conn.lock().map_err(|_| StoreError::Poisoned)?;
            f(&guard)
        })
        .await?
    }

    /// Write a row verbatim, bypassing validation.
    #[cfg(test)]
    pub(crate) async fn insert_raw(
        &self,
        mac: &str,
        payload: &str,
        is_favorite: Option<bool>,
    ) -> Result<(), StoreError> {
        let (mac, payload) = (mac.to_owned(), payload.to_owned());
        self.with_conn(move |conn| {
            conn.execute(
                "INSERT OR REPLACE INTO favorite_devices (mac, payload, is_favorite) \
                 VALUES (?1, ?2, ?3)",
                params![mac, payload, is_favorite],
            )?;
            Ok(())
        })
        .await
    }

    #[cfg(test)]
    pub(crate) async fn row_count(&self) -> Result<usize, StoreError> {
        self.with_conn(|conn| {
            let n: i64 = conn.query_row("SELECT COUNT(*) FROM favorite_devices", [], |r| r.get(0))?;
            Ok(usize::try_from(n).unwrap_or_default())
        })
        .await
    }
}

fn delete_corrupt(conn: &Connection, key: &str, reason: &str) -> Result<(), StoreError> {
    warn!(mac = key, reason, "deleting corrupt favorite row");
    conn.execute("DELETE FROM favorite_devices WHERE mac = ?1", params![key])?;
    Ok(())
}

#[async_trait]
impl FavoriteStore for SqliteFavoriteStore {
    async fn find_by_mac(&self, mac: &MacAddress) -> Result<Option<DeviceRecord>, StoreError> {
        let key = mac.as_str().to_owned();
        self.with_conn(move |conn| {
            let payload = conn
                .query_row(
                    &format!("SELECT payload FROM favorite_devices WHERE mac = ?1 AND {FAVORITE_ROWS}"),
                    params![key],
                    |row| Ok(row.get_ref(0)?.as_str().ok().map(str::to_owned)),
                )
                .optional()?;

            let Some(payload) = payload else {
                return Ok(None);
            };
            match RowPayload::decode(&key, payload.as_deref()) {
                RowPayload::Valid(record) => Ok(Some(record)),
                RowPayload::Corrupt { reason } => {
                    delete_corrupt(conn, &key, &reason)?;
                    Ok(None)
                }
            }
        })
        .await
    }

    async fn get_all(&self) -> Result<Vec<DeviceRecord>, StoreError> {
        self.with_conn(|conn| {
            let rows = {
                let mut stmt = conn.prepare(&format!(
                    "SELECT mac, payload FROM favorite_devices WHERE {FAVORITE_ROWS} ORDER BY mac"
                ))?;
                stmt.query_map([], |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get_ref(1)?.as_str().ok().map(str::to_owned),
                    ))
                })?
                .collect::<Result<Vec<_>, _>>()?
            };

            let mut records = Vec::with_capacity(rows.len());
            for (key, payload) in rows {
                match RowPayload::decode(&key, payload.as_deref()) {
                    RowPayload::Valid(record) => records.push(record),
                    RowPayload::Corrupt { reason } => delete_corrupt(conn, &key, &reason)?,
                }
            }
            debug!(favorites = records.len(), "loaded favorites");
            Ok(records)
        })
        .await
    }

    async fn save(&self, record: &DeviceRecord) -> Result<(), StoreError> {
        if !record.is_favorite {
            warn!(mac = %record.mac, "refusing to persist a non-favorite record");
            return Ok(());
        }

        let key = record.mac.as_str().to_owned();
        let payload = serde_json::to_string(record)?;
        let updated_at = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);

        self.with_conn(move |conn| {
            conn.execute(
                "INSERT INTO favorite_devices (mac, payload, is_favorite, updated_at) \
                 VALUES (?1, ?2, 1, ?3) \
                 ON CONFLICT(mac) DO UPDATE SET \
                     payload = excluded.payload, \
                     is_favorite = excluded.is_favorite, \
                     updated_at = excluded.updated_at",
                params![key, payload, updated_at],
            )?;
            Ok(())
        })
        .await
    }

    async fn delete_by_mac(&self, mac: &MacAddress) -> Result<usize, StoreError> {
        let key = mac.as_str().to_owned();
        self.with_conn(move |conn| {
            Ok(conn.execute("DELETE FROM favorite_devices WHERE mac = ?1", params![key])?)
        })
        .await
    }

    async fn clear_non_favorites(&self) -> Result<usize, StoreError> {
        self.with_conn(|conn| {
            let deleted = conn.execute(
                "DELETE FROM favorite_devices WHERE is_favorite IS NULL OR is_favorite = 0",
                [],
            )?;
            if deleted > 0 {
                warn!(deleted, "removed non-favorite rows from favorite store");
            }
            Ok(deleted)
        })
        .await
    }
}
