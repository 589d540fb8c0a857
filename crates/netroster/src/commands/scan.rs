//! `scan`: one forced discovery sweep.

use netroster_core::ReconciliationCache;

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output::{self, DeviceRow};

pub async fn handle(cache: &ReconciliationCache, global: &GlobalOpts) -> Result<(), CliError> {
    let devices = cache.scan_and_update_devices().await;
    let color = output::should_color(&global.color);
    let out = output::render_list(
        &global.output,
        &devices,
        |d| DeviceRow::new(d, color),
        output::mac_id,
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}
