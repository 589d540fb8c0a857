// ── arp-scan process runner ──
//
// Spawns the scanner, waits for it under a hard timeout, and hands the
// captured stdout to the parser. The child is killed if the timeout fires.

use std::process::Stdio;
use std::time::Duration;

use tokio::process::Command;
use tracing::{debug, trace};

use crate::error::ScanError;
use crate::parse::{RawEndpoint, parse_output};

/// How to invoke the scanner binary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanConfig {
    /// Executable name or path (default `arp-scan`).
    pub command: String,
    /// Arguments passed after the optional interface flag.
    pub args: Vec<String>,
    /// Network interface to sweep; `None` lets arp-scan pick one.
    pub interface: Option<String>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            command: "arp-scan".into(),
            args: vec!["--localnet".into()],
            interface: None,
        }
    }
}

/// Runs one arp-scan sweep per [`scan`](Self::scan) call.
#[derive(Debug, Clone, Default)]
pub struct ArpScanner {
    config: ScanConfig,
}

impl ArpScanner {
    pub fn new(config: ScanConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    /// Full argument vector handed to the scanner.
    pub fn command_args(&self) -> Vec<String> {
        let mut args = Vec::with_capacity(self.config.args.len() + 1);
        if let Some(ref iface) = self.config.interface {
            args.push(format!("--interface={iface}"));
        }
        args.extend(self.config.args.iter().cloned());
        args
    }

    /// Run a sweep and parse its output.
    ///
    /// A zero-length `timeout` is treated literally and will almost always
    /// time out.
    pub async fn scan(&self, timeout: Duration) -> Result<Vec<RawEndpoint>, ScanError> {
        let args = self.command_args();
        debug!(command = %self.config.command, ?args, ?timeout, "starting discovery sweep");

        let child = Command::new(&self.config.command)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| ScanError::Spawn {
                command: self.config.command.clone(),
                source,
            })?;

        // Dropping the wait future on timeout drops the child, which kills it.
        let output = tokio::time::timeout(timeout, child.wait_with_output())
            .await
            .map_err(|_| ScanError::Timeout {
                timeout_ms: u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
            })??;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_owned();
            return Err(ScanError::ExitStatus {
                command: self.config.command.clone(),
                status: output.status.to_string(),
                stderr,
            });
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        trace!(bytes = stdout.len(), "scanner output captured");

        let endpoints = parse_output(&stdout);
        debug!(found = endpoints.len(), "discovery sweep complete");
        Ok(endpoints)
    }
}
