// netroster-scan: runs arp-scan and turns its text output into endpoints.

pub mod error;
pub mod parse;
pub mod scanner;

pub use error::ScanError;
pub use parse::{RawEndpoint, parse_output};
pub use scanner::{ArpScanner, ScanConfig};
