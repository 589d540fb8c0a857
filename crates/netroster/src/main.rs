mod cli;
mod commands;
mod error;
mod output;

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use netroster_config::Config;
use netroster_core::{ArpScanDiscovery, ReconciliationCache, SqliteFavoriteStore};
use netroster_scan::ArpScanner;

use crate::cli::{Cli, Command, GlobalOpts};
use crate::error::CliError;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    init_tracing(cli.global.verbose);

    if let Err(err) = run(cli).await {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}

fn init_tracing(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        // Config commands never open the store
        Command::Config(args) => commands::config_cmd::handle(args, &cli.global),

        Command::Completions(args) => {
            use clap::CommandFactory;
            use clap_complete::generate;

            let mut cmd = Cli::command();
            generate(args.shell, &mut cmd, "netroster", &mut std::io::stdout());
            Ok(())
        }

        cmd => {
            let config = load_config(&cli.global)?;
            let cache = build_cache(&config)?;

            tracing::debug!(command = ?cmd, "dispatching command");
            commands::dispatch(cmd, &cache, &cli.global).await
        }
    }
}

pub(crate) fn config_file(global: &GlobalOpts) -> PathBuf {
    global
        .config
        .clone()
        .unwrap_or_else(netroster_config::config_path)
}

pub(crate) fn load_config(global: &GlobalOpts) -> Result<Config, CliError> {
    Ok(netroster_config::load_config(&config_file(global))?)
}

/// Wire the store, the arp-scan invoker, and the cache from config.
fn build_cache(config: &Config) -> Result<ReconciliationCache, CliError> {
    let cache_config = config.to_cache_config()?;
    let scanner = ArpScanner::new(config.scan_config()?);
    let store = SqliteFavoriteStore::open(config.store_path())?;

    Ok(ReconciliationCache::new(
        Arc::new(store),
        Arc::new(ArpScanDiscovery::new(scanner)),
        cache_config,
    ))
}
