//! Neighbor table reader and line parser
//!
//! `ip neigh` prints one entry per line, e.g.
//!
//! ```text
//! 192.168.178.1 dev eth0 lladdr 3c:a6:2f:01:02:03 REACHABLE
//! 192.168.178.40 dev eth0 FAILED
//! ```
//!
//! Parsing is positional: field 0 is the address, field 4 the link-layer
//! address and the state token sits at field 5, or at field 3 for entries
//! without a link-layer address.

use super::{run_tool, NeighborSource};
use crate::{Result, ScanError};
use serde::{Deserialize, Serialize};

/// State recorded when the line is too short to carry one
pub const DEFAULT_STATE: &str = "FAILED";

/// One parsed neighbor table line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NeighborEntry {
    pub ip: String,
    pub mac_addr: Option<String>,
    pub state: String,
    /// Number of whitespace-separated fields on the source line
    pub field_count: usize,
}

/// Parse one line of neighbor table output.
///
/// Returns a [`ScanError::ParseError`] for a line without any fields.
pub fn parse_neighbor_line(line: &str) -> Result<NeighborEntry> {
    let fields: Vec<&str> = line.split_whitespace().collect();

    if fields.is_empty() {
        return Err(ScanError::ParseError(format!("empty neighbor line {:?}", line)));
    }

    let state = match fields.len() {
        n if n > 5 => fields[5],
        n if n > 3 => fields[3],
        _ => DEFAULT_STATE,
    };

    Ok(NeighborEntry {
        ip: fields[0].to_string(),
        mac_addr: fields.get(4).map(|mac| mac.to_string()),
        state: state.to_string(),
        field_count: fields.len(),
    })
}

/// Neighbor source backed by `ip neigh`
#[derive(Debug, Clone)]
pub struct IpNeighborTable {
    command: String,
}

impl IpNeighborTable {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }
}

impl Default for IpNeighborTable {
    fn default() -> Self {
        Self::new("ip")
    }
}

#[async_trait::async_trait]
impl NeighborSource for IpNeighborTable {
    async fn dump(&self) -> Result<Vec<u8>> {
        let output = run_tool(&self.command, &["neigh".to_string()]).await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ScanError::CommandError(format!(
                "{} neigh exited with {}: {}",
                self.command,
                output.status,
                stderr.trim()
            )));
        }

        log::debug!("{} neigh returned {} bytes", self.command, output.stdout.len());
        Ok(output.stdout)
    }

    fn source_name(&self) -> &str {
        "ip-neigh"
    }
}
