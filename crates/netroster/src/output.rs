//! Output formatting: table, JSON, YAML, plain.
//!
//! Renders data in the format selected by `--output`. Table uses `tabled`,
//! structured formats use serde, plain emits one identifier per line.

use std::io::{self, IsTerminal, Write};

use owo_colors::OwoColorize;
use tabled::{Table, Tabled, settings::Style};

use netroster_core::{DeviceRecord, DeviceStatus};

use crate::cli::{ColorMode, OutputFormat};
use crate::error::CliError;

// ── Color helpers ────────────────────────────────────────────────────

/// Determine whether color output should be enabled.
pub fn should_color(mode: &ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => io::stdout().is_terminal() && std::env::var("NO_COLOR").is_err(),
    }
}

pub fn paint_status(status: DeviceStatus, color: bool) -> String {
    match (status, color) {
        (DeviceStatus::Online, true) => status.green().to_string(),
        (DeviceStatus::Offline, true) => status.dimmed().to_string(),
        (_, false) => status.to_string(),
    }
}

// ── Device rows ──────────────────────────────────────────────────────

#[derive(Tabled)]
pub struct DeviceRow {
    #[tabled(rename = "")]
    star: &'static str,
    #[tabled(rename = "MAC")]
    mac: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "IP")]
    ip: String,
    #[tabled(rename = "Vendor")]
    vendor: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Last Seen")]
    last_seen: String,
}

impl DeviceRow {
    pub fn new(d: &DeviceRecord, color: bool) -> Self {
        Self {
            star: if d.is_favorite { "★" } else { "" },
            mac: d.mac.colon_form(),
            name: d.name.clone().unwrap_or_default(),
            ip: d.ip.map(|ip| ip.to_string()).unwrap_or_default(),
            vendor: d.vendor.clone(),
            status: paint_status(d.status, color),
            last_seen: d
                .last_seen
                .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
                .unwrap_or_default(),
        }
    }
}

pub fn device_detail(d: &DeviceRecord, color: bool) -> String {
    let stamp = |t: Option<chrono::DateTime<chrono::Utc>>| {
        t.map_or_else(|| "-".into(), |t| t.to_rfc3339())
    };
    [
        format!("MAC:          {}", d.mac.colon_form()),
        format!("Name:         {}", d.name.as_deref().unwrap_or("-")),
        format!("Description:  {}", d.description.as_deref().unwrap_or("-")),
        format!(
            "IP:           {}",
            d.ip.map_or_else(|| "-".into(), |ip| ip.to_string())
        ),
        format!("Vendor:       {}", d.vendor),
        format!("Status:       {}", paint_status(d.status, color)),
        format!("Favorite:     {}", if d.is_favorite { "yes" } else { "no" }),
        format!("Last Seen:    {}", stamp(d.last_seen)),
        format!("Last Scanned: {}", stamp(d.last_scanned)),
        format!("Scan Method:  {}", d.scan_method),
    ]
    .join("\n")
}

pub fn device_table(devices: &[DeviceRecord], color: bool) -> String {
    let rows: Vec<DeviceRow> = devices.iter().map(|d| DeviceRow::new(d, color)).collect();
    render_table(&rows)
}

pub fn mac_id(d: &DeviceRecord) -> String {
    d.mac.colon_form()
}

// ── Render dispatchers ───────────────────────────────────────────────

/// Render a list of serde-serializable + tabled items in the chosen format.
pub fn render_list<T, R>(
    format: &OutputFormat,
    data: &[T],
    to_row: impl Fn(&T) -> R,
    id_fn: impl Fn(&T) -> String,
) -> Result<String, CliError>
where
    T: serde::Serialize,
    R: Tabled,
{
    Ok(match format {
        OutputFormat::Table => {
            let rows: Vec<R> = data.iter().map(to_row).collect();
            render_table(&rows)
        }
        OutputFormat::Json => serde_json::to_string_pretty(data)?,
        OutputFormat::JsonCompact => serde_json::to_string(data)?,
        OutputFormat::Yaml => serde_yaml::to_string(data)?,
        OutputFormat::Plain => data.iter().map(&id_fn).collect::<Vec<_>>().join("\n"),
    })
}

/// Render a single serde-serializable item in the chosen format.
pub fn render_single<T>(
    format: &OutputFormat,
    data: &T,
    detail_fn: impl Fn(&T) -> String,
    id_fn: impl Fn(&T) -> String,
) -> Result<String, CliError>
where
    T: serde::Serialize,
{
    Ok(match format {
        OutputFormat::Table => detail_fn(data),
        OutputFormat::Json => serde_json::to_string_pretty(data)?,
        OutputFormat::JsonCompact => serde_json::to_string(data)?,
        OutputFormat::Yaml => serde_yaml::to_string(data)?,
        OutputFormat::Plain => id_fn(data),
    })
}

/// Print the rendered output to stdout, respecting quiet mode.
pub fn print_output(output: &str, quiet: bool) {
    if quiet || output.is_empty() {
        return;
    }
    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{output}");
}

fn render_table<R: Tabled>(rows: &[R]) -> String {
    if rows.is_empty() {
        return "No devices.".into();
    }
    Table::new(rows).with(Style::rounded()).to_string()
}
