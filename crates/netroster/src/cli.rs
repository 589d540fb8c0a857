//! Clap derive structures for the `netroster` CLI.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// netroster -- a stable roster of the devices on your LAN
#[derive(Debug, Parser)]
#[command(
    name = "netroster",
    version,
    about = "Track the devices on your local network",
    long_about = "Discovers devices with arp-scan, merges each sweep into a cached view,\n\
        and keeps user-curated favorites (names, descriptions) across scans.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Config file (defaults to the platform config directory)
    #[arg(long, env = "NETROSTER_CONFIG", global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "NETROSTER_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one MAC per line (scripting)
    Plain,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show the device view
    #[command(alias = "dev", alias = "d")]
    Devices(DevicesArgs),

    /// Run a discovery sweep now and print the merged view
    Scan,

    /// Manage favorite devices
    #[command(alias = "fav", alias = "f")]
    Favorites(FavoritesArgs),

    /// Cache maintenance
    Cache(CacheArgs),

    /// Identify the target of a wake-on-LAN packet
    Wake(WakeArgs),

    /// Inspect configuration
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Devices ──────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct DevicesArgs {
    #[command(subcommand)]
    pub command: DevicesCommand,
}

#[derive(Debug, Subcommand)]
pub enum DevicesCommand {
    /// Scan and list devices
    #[command(alias = "ls")]
    List {
        /// Only show favorites
        #[arg(long)]
        favorites: bool,
    },

    /// Show one device
    Get {
        /// MAC address (any separator style)
        #[arg(value_name = "MAC")]
        mac: String,
    },

    /// Keep the view in memory and print it on every change until
    /// interrupted. Reads rescan only once the view is older than the TTL.
    Watch {
        /// Seconds between reads of the view
        #[arg(long, value_name = "SECS", default_value_t = 60)]
        interval: u64,

        /// Staleness threshold in seconds (overrides scan.cache_ttl_secs)
        #[arg(long, value_name = "SECS")]
        ttl: Option<u64>,
    },
}

// ── Favorites ────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct FavoritesArgs {
    #[command(subcommand)]
    pub command: FavoritesCommand,
}

#[derive(Debug, Subcommand)]
pub enum FavoritesCommand {
    /// Create a favorite
    Add {
        #[arg(value_name = "MAC")]
        mac: String,

        /// Display name (1-100 characters)
        #[arg(long, short = 'n')]
        name: String,

        /// Free-form description (up to 500 characters)
        #[arg(long, short = 'd')]
        description: Option<String>,
    },

    /// Edit a favorite
    Edit {
        #[arg(value_name = "MAC")]
        mac: String,

        /// Move the favorite to a different MAC
        #[arg(long = "mac", value_name = "NEW_MAC")]
        new_mac: Option<String>,

        #[arg(long, short = 'n')]
        name: Option<String>,

        /// New description; an empty string clears it
        #[arg(long, short = 'd')]
        description: Option<String>,
    },

    /// Un-favorite a device (it stays in the view)
    #[command(alias = "rm")]
    Remove {
        #[arg(value_name = "MAC")]
        mac: String,
    },

    /// Promote a discovered device to a favorite
    Promote {
        #[arg(value_name = "MAC")]
        mac: String,

        /// Display name (defaults to "Device <MAC suffix>")
        #[arg(long, short = 'n')]
        name: Option<String>,
    },
}

// ── Cache ────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CacheArgs {
    #[command(subcommand)]
    pub command: CacheCommand,
}

#[derive(Debug, Subcommand)]
pub enum CacheCommand {
    /// Purge non-favorite rows from the store, then rescan
    ClearNonFavorites,
}

// ── Wake ─────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct WakeArgs {
    #[arg(value_name = "MAC")]
    pub mac: String,

    /// Also print the magic packet as hex
    #[arg(long)]
    pub packet: bool,
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Display the resolved configuration
    Show,

    /// Print the config file path
    Path,

    /// Write a config file with default values
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
