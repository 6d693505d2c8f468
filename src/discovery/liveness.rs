//! Subnet liveness sweep via fping

use super::{run_tool, LivenessSource};
use crate::Result;
use ipnetwork::IpNetwork;
use std::collections::HashMap;

/// Status token reported by the sweep for one address
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LivenessStatus {
    Alive,
    Unreachable,
}

impl LivenessStatus {
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "alive" => Some(LivenessStatus::Alive),
            "unreachable" => Some(LivenessStatus::Unreachable),
            _ => None,
        }
    }

    pub fn is_alive(self) -> bool {
        matches!(self, LivenessStatus::Alive)
    }
}

/// Completed result of one liveness sweep, keyed by IP address
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LivenessMap {
    states: HashMap<String, bool>,
}

impl LivenessMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a map from sweep output of the shape `<ip> <gap> <status> ...`.
    ///
    /// Short lines and unknown status tokens are logged and skipped.
    pub fn parse(output: &str) -> Self {
        let mut map = Self::new();
        for line in output.lines() {
            map.record_line(line);
        }
        map
    }

    /// Record one sweep line; returns whether it was understood
    pub fn record_line(&mut self, line: &str) -> bool {
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() < 3 {
            if !fields.is_empty() {
                log::warn!("Short sweep line skipped: {:?}", line);
            }
            return false;
        }

        match LivenessStatus::from_token(fields[2]) {
            Some(status) => {
                log::debug!("{} -> {:?}", fields[0], status);
                self.insert(fields[0], status.is_alive());
                true
            }
            None => {
                log::warn!("Unknown sweep output {:?}", fields);
                false
            }
        }
    }

    pub fn insert(&mut self, ip: impl Into<String>, alive: bool) {
        self.states.insert(ip.into(), alive);
    }

    /// Liveness flag for an address; `false` when the sweep never saw it
    pub fn is_alive(&self, ip: &str) -> bool {
        self.states.get(ip).copied().unwrap_or(false)
    }

    /// Whether the sweep reported the address at all
    pub fn contains(&self, ip: &str) -> bool {
        self.states.contains_key(ip)
    }

    pub fn alive_count(&self) -> usize {
        self.states.values().filter(|alive| **alive).count()
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}

/// Liveness source backed by `fping -g <subnet> -r <retries>`
#[derive(Debug, Clone)]
pub struct FpingSweep {
    command: String,
    retries: u32,
}

impl FpingSweep {
    pub fn new(command: impl Into<String>, retries: u32) -> Self {
        Self {
            command: command.into(),
            retries,
        }
    }

    fn args(&self, subnet: &IpNetwork) -> Vec<String> {
        vec![
            "-g".to_string(),
            subnet.to_string(),
            "-r".to_string(),
            self.retries.to_string(),
        ]
    }
}

impl Default for FpingSweep {
    fn default() -> Self {
        Self::new("fping", 1)
    }
}

#[async_trait::async_trait]
impl LivenessSource for FpingSweep {
    async fn sweep(&self, subnet: &IpNetwork) -> Result<LivenessMap> {
        log::info!("Sweeping {} with {}", subnet, self.command);
        let output = run_tool(&self.command, &self.args(subnet)).await?;

        // fping exits non-zero as soon as one target is unreachable
        if !output.status.success() {
            log::debug!("{} exited with {}", self.command, output.status);
        }

        let map = LivenessMap::parse(&String::from_utf8_lossy(&output.stdout));
        log::info!(
            "Sweep of {} finished: {} reported, {} alive",
            subnet,
            map.len(),
            map.alive_count()
        );
        Ok(map)
    }

    fn source_name(&self) -> &str {
        "fping"
    }
}
