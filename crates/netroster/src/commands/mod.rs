//! Command dispatch: bridges CLI args -> cache operations -> output formatting.

pub mod cache;
pub mod config_cmd;
pub mod devices;
pub mod favorites;
pub mod scan;
pub mod wake;

use std::time::Duration;

use netroster_core::{MacAddress, ReconciliationCache};

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch a cache-bound command to the appropriate handler.
pub async fn dispatch(
    cmd: Command,
    cache: &ReconciliationCache,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::Devices(args) => devices::handle(cache, args, global).await,
        Command::Scan => scan::handle(cache, global).await,
        Command::Favorites(args) => favorites::handle(cache, args, global).await,
        Command::Cache(args) => cache::handle(cache, args, global).await,
        Command::Wake(args) => wake::handle(cache, args, global).await,
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => Ok(()),
    }
}

pub(crate) fn parse_mac(raw: &str) -> Result<MacAddress, CliError> {
    MacAddress::parse(raw).map_err(|e| CliError::Validation {
        field: "mac".into(),
        reason: e.to_string(),
    })
}

/// Populate the view for commands that look devices up by MAC.
pub(crate) async fn warm_view(cache: &ReconciliationCache) -> Result<(), CliError> {
    cache.get_view(false, cache.config().view_ttl).await?;
    Ok(())
}

pub(crate) fn ttl_or_default(cache: &ReconciliationCache, secs: Option<u64>) -> Duration {
    secs.map_or(cache.config().view_ttl, Duration::from_secs)
}
