//! Configuration module for the intranet scanner

use crate::storage::TableLayout;
use ipnetwork::IpNetwork;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Subnet swept for liveness when nothing else is configured
pub const DEFAULT_SUBNET: &str = "192.168.178.0/24";

/// Table the inventory rows are written to
pub const DEFAULT_TABLE_NAME: &str = "ScanIntranet";

/// Main configuration structure for one scan
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// CIDR range handed to the liveness sweep
    pub subnet: String,

    /// Target table for inventory rows
    pub table_name: String,

    /// Column set written per row
    pub layout: TableLayout,

    /// Create the table before scanning
    pub create_table: bool,

    /// Probe hosts the sweep did not report with a single-host ping
    pub ping_hosts: bool,

    /// Print records instead of writing them to the database
    pub dry_run: bool,

    /// Neighbor table tool
    pub ip_command: String,

    /// Subnet sweep tool
    pub fping_command: String,

    /// Retries per address passed to the sweep tool (`-r`)
    pub fping_retries: u32,

    /// Single-host probe tool
    pub ping_command: String,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            subnet: DEFAULT_SUBNET.to_string(),
            table_name: DEFAULT_TABLE_NAME.to_string(),
            layout: TableLayout::Extended,
            create_table: false,
            ping_hosts: false,
            dry_run: false,
            ip_command: "ip".to_string(),
            fping_command: "fping".to_string(),
            fping_retries: 1,
            ping_command: "ping".to_string(),
        }
    }
}

impl ScanConfig {
    /// Create a new scan configuration for a subnet
    pub fn new(subnet: String) -> Self {
        Self {
            subnet,
            ..Default::default()
        }
    }

    /// Set the subnet to sweep
    pub fn with_subnet(mut self, subnet: String) -> Self {
        self.subnet = subnet;
        self
    }

    /// Set the target table
    pub fn with_table_name(mut self, table_name: String) -> Self {
        self.table_name = table_name;
        self
    }

    /// Set the table layout
    pub fn with_layout(mut self, layout: TableLayout) -> Self {
        self.layout = layout;
        self
    }

    /// Request table creation before scanning
    pub fn with_create_table(mut self, create_table: bool) -> Self {
        self.create_table = create_table;
        self
    }

    /// Enable or disable per-host ping probing
    pub fn with_ping_hosts(mut self, ping_hosts: bool) -> Self {
        self.ping_hosts = ping_hosts;
        self
    }

    /// Enable or disable dry-run output
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Parsed form of the configured subnet
    pub fn network(&self) -> crate::Result<IpNetwork> {
        self.subnet
            .parse::<IpNetwork>()
            .map_err(|e| crate::ScanError::InvalidTarget(format!("{}: {}", self.subnet, e)))
    }

    /// Load configuration from TOML file
    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> crate::Result<Self> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| {
            crate::ScanError::ConfigError(format!(
                "Failed to read config file {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;

        let config: ScanConfig = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load configuration from the default location
    ///
    /// Reads `~/.scanintranet.toml` when it exists and parses; falls back to
    /// the built-in defaults otherwise.
    pub fn load_default_config() -> Self {
        let home_dir = dirs::home_dir().unwrap_or_else(|| std::path::PathBuf::from("."));
        let config_path = home_dir.join(".scanintranet.toml");

        if config_path.exists() {
            match Self::from_toml_file(&config_path) {
                Ok(config) => {
                    log::info!("Loaded config from {}", config_path.display());
                    return config;
                }
                Err(e) => log::warn!("Ignoring {}: {}", config_path.display(), e),
            }
        }

        Self::default()
    }

    /// Validate the configuration
    pub fn validate(&self) -> crate::Result<()> {
        self.network()?;

        if self.table_name.is_empty() {
            return Err(crate::ScanError::ConfigError("Table name cannot be empty".to_string()));
        }

        if !self
            .table_name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_')
        {
            return Err(crate::ScanError::ConfigError(format!(
                "Table name {:?} may only contain ASCII letters, digits and '_'",
                self.table_name
            )));
        }

        for (key, value) in [
            ("ip_command", &self.ip_command),
            ("fping_command", &self.fping_command),
            ("ping_command", &self.ping_command),
        ] {
            if value.trim().is_empty() {
                return Err(crate::ScanError::ConfigError(format!("{} cannot be empty", key)));
            }
        }

        Ok(())
    }
}
