//! Host discovery sources - neighbor table, liveness sweep, reverse DNS, host probe
//!
//! Each source is an async trait so the merge in [`crate::scanner`] never
//! depends on how the data was collected. The default implementations shell
//! out to `ip`, `fping` and `ping` and resolve names through the system
//! resolver.

pub mod liveness;
pub mod neighbor;
pub mod probe;
pub mod resolver;

use std::process::Output;
use tokio::process::Command;

pub use liveness::{FpingSweep, LivenessMap, LivenessStatus};
pub use neighbor::{parse_neighbor_line, IpNeighborTable, NeighborEntry, DEFAULT_STATE};
pub use probe::PingProbe;
pub use resolver::{DnsResolver, UNRESOLVED_HOSTNAME};

use crate::Result;
use ipnetwork::IpNetwork;

/// Source of the raw neighbor table dump
#[async_trait::async_trait]
pub trait NeighborSource: Send + Sync {
    /// Dump the neighbor table as line-oriented text
    async fn dump(&self) -> Result<Vec<u8>>;
    fn source_name(&self) -> &str;
}

/// Source of per-address reachability for a whole subnet
#[async_trait::async_trait]
pub trait LivenessSource: Send + Sync {
    /// Sweep the subnet and return the completed map
    async fn sweep(&self, subnet: &IpNetwork) -> Result<LivenessMap>;
    fn source_name(&self) -> &str;
}

/// Reverse name lookup for a discovered address
#[async_trait::async_trait]
pub trait HostnameResolver: Send + Sync {
    async fn resolve(&self, ip: &str) -> Result<String>;
}

/// Single-host reachability check
#[async_trait::async_trait]
pub trait HostProbe: Send + Sync {
    /// `Ok(true)` when the host answered
    async fn probe(&self, ip: &str) -> Result<bool>;
}

/// Run an external tool to completion and capture its output.
///
/// Only a failure to start the process is an error here; callers decide what
/// a non-zero exit status means for their tool.
pub(crate) async fn run_tool(program: &str, args: &[String]) -> Result<Output> {
    log::debug!("Running {} {}", program, args.join(" "));
    Command::new(program)
        .args(args)
        .kill_on_drop(true)
        .output()
        .await
        .map_err(|e| crate::ScanError::spawn_failed(program, e))
}
