use thiserror::Error;

/// Everything that can go wrong while running a discovery sweep.
///
/// Callers in `netroster-core` never surface these to users; a failed
/// sweep degrades to "no devices found".
#[derive(Debug, Error)]
pub enum ScanError {
    /// The scanner binary could not be started (missing, not executable).
    #[error("failed to spawn `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// The sweep did not finish within the configured budget.
    #[error("scan timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    /// The scanner exited unsuccessfully.
    #[error("`{command}` exited with {status}: {stderr}")]
    ExitStatus {
        command: String,
        status: String,
        stderr: String,
    },

    /// Reading the child's output failed.
    #[error("scan I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ScanError {
    /// Returns `true` if the sweep was cut short by the timeout.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }
}
