//! Persistence of inventory records
//!
//! A scan writes through an [`InventorySink`]. The sink owns its table name
//! and [`TableLayout`]; the layout decides which [`Column`]s each row carries.

pub mod console;
pub mod location;
pub mod postgres;

pub use console::ConsoleSink;
pub use location::DatabaseLocation;
pub use postgres::PostgresSink;

use crate::inventory::HostEntry;
use crate::Result;
use serde::{Deserialize, Serialize};

/// Destination for inventory rows
#[async_trait::async_trait]
pub trait InventorySink: Send + Sync {
    /// Create the table for this sink's layout if it does not exist yet
    async fn create_table(&self) -> Result<()>;

    /// Append one row
    async fn insert(&self, entry: &HostEntry) -> Result<()>;

    fn table_name(&self) -> &str;
}

/// One column of the inventory table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    Ip,
    MacAddr,
    Hostname,
    ScanTime,
    State,
    Ping,
    GenerateOn,
}

impl Column {
    /// Column name as stored in the database
    pub fn name(self) -> &'static str {
        match self {
            Column::Ip => "IP",
            Column::MacAddr => "MACADDR",
            Column::Hostname => "Hostname",
            Column::ScanTime => "ScanTime",
            Column::State => "State",
            Column::Ping => "Ping",
            Column::GenerateOn => "Generateon",
        }
    }

    /// Value of this column for an entry, as JSON
    pub fn json_value(self, entry: &HostEntry) -> serde_json::Value {
        use serde_json::Value;
        match self {
            Column::Ip => Value::from(entry.ip.as_str()),
            Column::MacAddr => entry
                .mac_addr
                .as_deref()
                .map_or(Value::Null, Value::from),
            Column::Hostname => Value::from(entry.hostname.as_str()),
            Column::ScanTime => Value::from(entry.scan_time.to_rfc3339()),
            Column::State => Value::from(entry.state.as_str()),
            Column::Ping => Value::from(entry.ping),
            Column::GenerateOn => Value::from(entry.generate_on.as_str()),
        }
    }
}

/// Column set written per row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TableLayout {
    /// IP, Hostname, ScanTime, State
    Basic,
    /// Basic columns plus MACADDR, Ping and Generateon
    #[default]
    Extended,
}

const BASIC_COLUMNS: &[Column] = &[Column::Ip, Column::Hostname, Column::ScanTime, Column::State];

const EXTENDED_COLUMNS: &[Column] = &[
    Column::Ip,
    Column::MacAddr,
    Column::Hostname,
    Column::ScanTime,
    Column::State,
    Column::Ping,
    Column::GenerateOn,
];

impl TableLayout {
    pub fn columns(self) -> &'static [Column] {
        match self {
            TableLayout::Basic => BASIC_COLUMNS,
            TableLayout::Extended => EXTENDED_COLUMNS,
        }
    }

    /// Insert field list, in column order
    pub fn field_names(self) -> Vec<&'static str> {
        self.columns().iter().map(|c| c.name()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn entry() -> HostEntry {
        HostEntry {
            ip: "10.0.0.5".to_string(),
            mac_addr: None,
            hostname: "printer".to_string(),
            scan_time: Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap(),
            state: "STALE".to_string(),
            ping: false,
            generate_on: "scanner-01".to_string(),
        }
    }

    #[test]
    fn test_layout_field_lists() {
        assert_eq!(
            TableLayout::Extended.field_names(),
            vec!["IP", "MACADDR", "Hostname", "ScanTime", "State", "Ping", "Generateon"]
        );
        assert_eq!(
            TableLayout::Basic.field_names(),
            vec!["IP", "Hostname", "ScanTime", "State"]
        );
    }

    #[test]
    fn test_json_values() {
        let entry = entry();
        assert_eq!(Column::MacAddr.json_value(&entry), serde_json::Value::Null);
        assert_eq!(Column::Ping.json_value(&entry), serde_json::Value::Bool(false));
        assert_eq!(
            Column::ScanTime.json_value(&entry),
            serde_json::Value::from("2024-03-01T12:00:00+00:00")
        );
    }
}
