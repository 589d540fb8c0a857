//! `wake`: resolve the wake-on-LAN target for a MAC.

use std::fmt::Write as _;

use netroster_core::{ReconciliationCache, WakeTarget};

use crate::cli::{GlobalOpts, WakeArgs};
use crate::error::CliError;
use crate::output;

use super::{parse_mac, warm_view};

fn detail(t: &WakeTarget, color: bool, packet: bool) -> String {
    let mut lines = vec![
        format!("MAC:       {}", t.mac.colon_form()),
        format!("Name:      {}", t.name.as_deref().unwrap_or("-")),
        format!(
            "IP:        {}",
            t.ip.map_or_else(|| "-".into(), |ip| ip.to_string())
        ),
        format!(
            "Broadcast: {}",
            t.broadcast.map_or_else(|| "-".into(), |b| b.to_string())
        ),
        format!("Status:    {}", output::paint_status(t.status, color)),
    ];
    if packet {
        lines.push(format!("Packet:    {}", hex(&t.magic_packet())));
    }
    lines.join("\n")
}

fn hex(bytes: &[u8]) -> String {
    bytes.iter().fold(String::with_capacity(bytes.len() * 2), |mut s, b| {
        let _ = write!(s, "{b:02x}");
        s
    })
}

pub async fn handle(
    cache: &ReconciliationCache,
    args: WakeArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let mac = parse_mac(&args.mac)?;
    warm_view(cache).await?;
    let target = cache.wake_target(&mac).await?;

    let color = output::should_color(&global.color);
    let out = output::render_single(
        &global.output,
        &target,
        |t| detail(t, color, args.packet),
        |t| t.mac.colon_form(),
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::hex;

    #[test]
    fn hex_is_lowercase_and_padded() {
        assert_eq!(hex(&[0x00, 0xab, 0x0f]), "00ab0f");
    }
}
