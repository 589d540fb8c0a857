//! SQLite schema for the favorites table.

pub(super) const SCHEMA_SQL: &str = r"
CREATE TABLE IF NOT EXISTS favorite_devices (
    mac         TEXT PRIMARY KEY NOT NULL,
    payload     TEXT NOT NULL,
    is_favorite INTEGER,
    updated_at  TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
);

CREATE INDEX IF NOT EXISTS idx_favorite_devices_flag
    ON favorite_devices(is_favorite);
";
