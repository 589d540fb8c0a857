// ── arp-scan output parsing ──
//
// arp-scan prints one tab-separated line per responding host, framed by a
// header ("Interface: ...", "Starting arp-scan ...") and a footer
// ("N packets received ...", "Ending arp-scan ..."). Anything that is not
// a host line is ignored.

use std::collections::HashSet;
use std::net::IpAddr;

/// One host as reported by the scanner, before MAC normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawEndpoint {
    pub ip: IpAddr,
    /// Colon-separated, lowercased (`aa:bb:cc:dd:ee:ff`).
    pub mac: String,
    /// `None` when the OUI lookup produced nothing useful.
    pub vendor: Option<String>,
}

/// Parse the full stdout of an arp-scan run.
///
/// Duplicate responses (`(DUP: n)` lines, or the same MAC answering twice)
/// collapse to the first occurrence.
pub fn parse_output(stdout: &str) -> Vec<RawEndpoint> {
    let mut seen = HashSet::new();
    let mut endpoints = Vec::new();

    for line in stdout.lines() {
        let Some(endpoint) = parse_line(line) else {
            continue;
        };
        if seen.insert(endpoint.mac.clone()) {
            endpoints.push(endpoint);
        }
    }

    endpoints
}

/// Parse a single host line. Returns `None` for header, footer, blank,
/// duplicate-response, or otherwise malformed lines.
pub fn parse_line(line: &str) -> Option<RawEndpoint> {
    if line.contains("(DUP:") {
        return None;
    }

    let mut fields = line.split('\t');
    let ip: IpAddr = fields.next()?.trim().parse().ok()?;
    let mac = fields.next()?.trim();
    if !is_colon_mac(mac) {
        return None;
    }

    let vendor = fields
        .collect::<Vec<_>>()
        .join(" ")
        .trim()
        .to_owned();

    Some(RawEndpoint {
        ip,
        mac: mac.to_ascii_lowercase(),
        vendor: clean_vendor(&vendor),
    })
}

fn clean_vendor(raw: &str) -> Option<String> {
    if raw.is_empty() || raw.starts_with("(Unknown") {
        None
    } else {
        Some(raw.to_owned())
    }
}

/// `xx:xx:xx:xx:xx:xx` with hex octets, any case.
fn is_colon_mac(s: &str) -> bool {
    let octets: Vec<&str> = s.split(':').collect();
    octets.len() == 6
        && octets
            .iter()
            .all(|o| o.len() == 2 && o.chars().all(|c| c.is_ascii_hexdigit()))
}
