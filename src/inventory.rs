//! Inventory records produced by a scan

use crate::discovery::{NeighborEntry, UNRESOLVED_HOSTNAME};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Point-in-time record for one discovered host
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HostEntry {
    pub ip: String,
    pub mac_addr: Option<String>,
    pub hostname: String,
    pub scan_time: DateTime<Utc>,
    pub state: String,
    pub ping: bool,
    /// Hostname of the machine that ran the scan
    pub generate_on: String,
}

impl HostEntry {
    /// Combine a parsed neighbor line with its hostname and liveness flag.
    pub fn merge(neighbor: NeighborEntry, hostname: String, alive: bool, context: &ScanContext) -> Self {
        Self {
            ip: neighbor.ip,
            mac_addr: neighbor.mac_addr,
            hostname,
            scan_time: context.scan_time,
            state: neighbor.state,
            ping: alive,
            generate_on: context.scanner_host.clone(),
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.hostname != UNRESOLVED_HOSTNAME
    }
}

/// Values fixed once per scan and shared by every record
#[derive(Debug, Clone, PartialEq)]
pub struct ScanContext {
    pub scan_time: DateTime<Utc>,
    pub scanner_host: String,
}

impl ScanContext {
    pub fn new(scan_time: DateTime<Utc>, scanner_host: impl Into<String>) -> Self {
        Self {
            scan_time,
            scanner_host: scanner_host.into(),
        }
    }

    /// Capture the current time and the local hostname
    pub fn capture() -> Self {
        Self::new(Utc::now(), local_hostname())
    }
}

/// Hostname of this machine, or the unresolved sentinel
pub fn local_hostname() -> String {
    match whoami::fallible::hostname() {
        Ok(name) if !name.is_empty() => name,
        Ok(_) => UNRESOLVED_HOSTNAME.to_string(),
        Err(e) => {
            log::warn!("Cannot determine local hostname: {}", e);
            UNRESOLVED_HOSTNAME.to_string()
        }
    }
}
