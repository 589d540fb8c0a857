//! Device view handlers.

use std::future::Future;
use std::time::Duration;

use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use netroster_core::ReconciliationCache;

use crate::cli::{DevicesArgs, DevicesCommand, GlobalOpts};
use crate::error::CliError;
use crate::output::{self, DeviceRow};

use super::{parse_mac, ttl_or_default};

const MIN_WATCH_INTERVAL: Duration = Duration::from_millis(10);

/// How `devices watch` reads the view.
#[derive(Debug, Clone, Copy)]
struct WatchPlan {
    /// Time between reads of the view.
    interval: Duration,
    /// A read rescans only when the view is older than this.
    ttl: Duration,
    /// Forced scans in the background, from `scan.auto_refresh_secs`.
    auto_refresh: Option<Duration>,
}

pub async fn handle(
    cache: &ReconciliationCache,
    args: DevicesArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let color = output::should_color(&global.color);

    match args.command {
        DevicesCommand::List { favorites } => {
            let view = cache.get_view(false, cache.config().view_ttl).await?;
            let devices: Vec<_> = view
                .devices
                .into_iter()
                .filter(|d| !favorites || d.is_favorite)
                .collect();
            let out = output::render_list(
                &global.output,
                &devices,
                |d| DeviceRow::new(d, color),
                output::mac_id,
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        DevicesCommand::Get { mac } => {
            let mac = parse_mac(&mac)?;
            super::warm_view(cache).await?;
            let device = cache.device(&mac).ok_or_else(|| CliError::NotFound {
                resource_type: "device".into(),
                identifier: mac.colon_form(),
                list_command: "devices list".into(),
            })?;
            let out = output::render_single(
                &global.output,
                &device,
                |d| output::device_detail(d, color),
                output::mac_id,
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        DevicesCommand::Watch { interval, ttl } => {
            let plan = WatchPlan {
                interval: Duration::from_secs(interval).max(MIN_WATCH_INTERVAL),
                ttl: ttl_or_default(cache, ttl),
                auto_refresh: cache.config().auto_refresh,
            };
            let shutdown = async {
                let _ = tokio::signal::ctrl_c().await;
            };
            watch(cache, plan, global, color, shutdown).await
        }
    }
}

/// Serve the view on every tick until `shutdown` resolves, printing each
/// published snapshot. Fresh reads take the fast path; stale ones rescan.
async fn watch(
    cache: &ReconciliationCache,
    plan: WatchPlan,
    global: &GlobalOpts,
    color: bool,
    shutdown: impl Future<Output = ()>,
) -> Result<(), CliError> {
    let mut rx = cache.subscribe();
    let cancel = CancellationToken::new();
    let refresh = plan
        .auto_refresh
        .map(|period| cache.spawn_refresh_task(period, cancel.clone()));

    let mut ticker = tokio::time::interval(plan.interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    tokio::pin!(shutdown);

    let result = loop {
        tokio::select! {
            biased;
            () = &mut shutdown => break Ok(()),
            changed = rx.changed() => {
                if changed.is_err() {
                    break Ok(());
                }
                let snapshot = rx.borrow_and_update().clone();
                let out = match output::render_list(
                    &global.output,
                    &snapshot.devices,
                    |d| DeviceRow::new(d, color),
                    output::mac_id,
                ) {
                    Ok(out) => out,
                    Err(e) => break Err(e),
                };
                output::print_output(&out, global.quiet);
            }
            _ = ticker.tick() => {
                if let Err(e) = cache.get_view(false, plan.ttl).await {
                    break Err(e.into());
                }
            }
        }
    };

    cancel.cancel();
    if let Some(task) = refresh {
        let _ = task.await;
    }
    result
}
