// ── Canonical device identity ──
//
// Every device is keyed by its MAC address reduced to 12 lowercase hex
// digits with no separators. Parsing accepts the common separator styles
// (colon, dash, Cisco dot notation, whitespace) in any case.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

const MAC_HEX_DIGITS: usize = 12;

/// Why a caller-supplied MAC was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MacError {
    #[error("MAC address '{raw}' has {digits} hex digits, expected 12")]
    InvalidLength { raw: String, digits: usize },

    #[error("MAC address '{raw}' contains invalid character '{ch}'")]
    InvalidCharacter { raw: String, ch: char },
}

/// Normalized MAC address (`aabbccddeeff`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MacAddress(String);

impl MacAddress {
    /// Normalize any common MAC spelling.
    pub fn parse(raw: impl AsRef<str>) -> Result<Self, MacError> {
        let raw = raw.as_ref();
        let mut normalized = String::with_capacity(MAC_HEX_DIGITS);

        for ch in raw.trim().chars() {
            if matches!(ch, ':' | '-' | '.') || ch.is_whitespace() {
                continue;
            }
            if !ch.is_ascii_hexdigit() {
                return Err(MacError::InvalidCharacter {
                    raw: raw.to_owned(),
                    ch,
                });
            }
            normalized.push(ch.to_ascii_lowercase());
        }

        if normalized.len() != MAC_HEX_DIGITS {
            return Err(MacError::InvalidLength {
                raw: raw.to_owned(),
                digits: normalized.len(),
            });
        }

        Ok(Self(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `aa:bb:cc:dd:ee:ff`, the form scanners and wake tools expect.
    pub fn colon_form(&self) -> String {
        self.0
            .as_bytes()
            .chunks(2)
            .map(|pair| String::from_utf8_lossy(pair).into_owned())
            .collect::<Vec<_>>()
            .join(":")
    }

    /// The six raw octets.
    pub fn octets(&self) -> [u8; 6] {
        let mut out = [0u8; 6];
        for (slot, pair) in out.iter_mut().zip(self.0.as_bytes().chunks(2)) {
            *slot = pair
                .iter()
                .filter_map(|b| char::from(*b).to_digit(16))
                .fold(0u8, |acc, d| (acc << 4) | u8::try_from(d).unwrap_or(0));
        }
        out
    }

    /// Last three octets in upper case, used for placeholder names.
    pub fn short_suffix(&self) -> String {
        self.0[MAC_HEX_DIGITS - 6..].to_ascii_uppercase()
    }
}

impl fmt::Display for MacAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for MacAddress {
    type Err = MacError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for MacAddress {
    type Error = MacError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(s)
    }
}

impl From<MacAddress> for String {
    fn from(mac: MacAddress) -> Self {
        mac.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_colon_form() {
        let mac = MacAddress::parse("AA:BB:CC:DD:EE:FF").unwrap();
        assert_eq!(mac.as_str(), "aabbccddeeff");
    }

    #[test]
    fn normalizes_dash_dot_and_bare_forms() {
        for raw in [
            "aa-bb-cc-dd-ee-ff",
            "aabb.ccdd.eeff",
            "AABBCCDDEEFF",
            " aa:bb:cc:dd:ee:ff ",
            "aa bb cc dd ee ff",
        ] {
            assert_eq!(MacAddress::parse(raw).unwrap().as_str(), "aabbccddeeff", "{raw}");
        }
    }

    #[test]
    fn normalization_is_idempotent() {
        for raw in ["00:11:22:33:44:55", "00-11-22-AA-BB-CC", "0011.22aa.bbcc"] {
            let once = MacAddress::parse(raw).unwrap();
            let twice = MacAddress::parse(once.as_str()).unwrap();
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn rejects_wrong_length() {
        let err = MacAddress::parse("aa:bb:cc:dd:ee").unwrap_err();
        assert_eq!(
            err,
            MacError::InvalidLength {
                raw: "aa:bb:cc:dd:ee".into(),
                digits: 10
            }
        );
        assert!(MacAddress::parse("").is_err());
        assert!(MacAddress::parse("aa:bb:cc:dd:ee:ff:00").is_err());
    }

    #[test]
    fn rejects_non_hex() {
        let err = MacAddress::parse("gg:bb:cc:dd:ee:ff").unwrap_err();
        assert!(matches!(err, MacError::InvalidCharacter { ch: 'g', .. }));
        assert!(MacAddress::parse("aa_bb_cc_dd_ee_ff").is_err());
    }

    #[test]
    fn renders_colon_form_and_octets() {
        let mac = MacAddress::parse("001122AABBCC").unwrap();
        assert_eq!(mac.colon_form(), "00:11:22:aa:bb:cc");
        assert_eq!(mac.octets(), [0x00, 0x11, 0x22, 0xaa, 0xbb, 0xcc]);
        assert_eq!(mac.short_suffix(), "AABBCC");
    }

    #[test]
    fn serde_rejects_unnormalizable_values() {
        let ok: MacAddress = serde_json::from_str("\"AA:BB:CC:DD:EE:FF\"").unwrap();
        assert_eq!(ok.as_str(), "aabbccddeeff");
        assert!(serde_json::from_str::<MacAddress>("\"nope\"").is_err());
        assert_eq!(serde_json::to_string(&ok).unwrap(), "\"aabbccddeeff\"");
    }
}
