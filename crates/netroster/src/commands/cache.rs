//! Cache maintenance handlers.

use netroster_core::ReconciliationCache;

use crate::cli::{CacheArgs, CacheCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

pub async fn handle(
    cache: &ReconciliationCache,
    args: CacheArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        CacheCommand::ClearNonFavorites => {
            let outcome = cache.clear_non_favorites().await?;
            if !global.quiet {
                eprintln!("Removed {} non-favorite row(s)", outcome.deleted_count);
            }
            let color = output::should_color(&global.color);
            let out = output::render_single(
                &global.output,
                &outcome,
                |o| output::device_table(&o.devices, color),
                |o| o.deleted_count.to_string(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}
