// ── Core error types ──
//
// Only storage failures and rejected input reach callers. Discovery
// failures and corrupt stored rows are absorbed below this layer.

use thiserror::Error;

use crate::model::MacError;
use crate::store::StoreError;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Input errors ─────────────────────────────────────────────────
    #[error("Invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    // ── Data errors ──────────────────────────────────────────────────
    #[error("Device not found: {mac}")]
    DeviceNotFound { mac: String },

    #[error("Device {mac} is already a favorite")]
    AlreadyFavorite { mac: String },

    // ── Storage errors ───────────────────────────────────────────────
    #[error("Favorite store error: {0}")]
    Store(#[from] StoreError),
}

impl CoreError {
    /// Returns `true` for errors caused by caller input rather than the system.
    pub fn is_rejected_input(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }
}

impl From<MacError> for CoreError {
    fn from(err: MacError) -> Self {
        Self::Validation {
            field: "mac".into(),
            reason: err.to_string(),
        }
    }
}
