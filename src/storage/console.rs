//! Dry-run sink printing records as JSON lines

use super::{InventorySink, TableLayout};
use crate::inventory::HostEntry;
use crate::{Result, ScanError};
use std::io::{self, Write};
use std::sync::Mutex;

/// Sink that writes each record as one JSON object per line.
///
/// Keys are the column names of the layout, so the output shows exactly what
/// the database sink would insert.
pub struct ConsoleSink<W: Write + Send> {
    writer: Mutex<W>,
    table: String,
    layout: TableLayout,
}

impl ConsoleSink<io::Stdout> {
    pub fn stdout(table: impl Into<String>, layout: TableLayout) -> Self {
        Self::new(io::stdout(), table, layout)
    }
}

impl<W: Write + Send> ConsoleSink<W> {
    pub fn new(writer: W, table: impl Into<String>, layout: TableLayout) -> Self {
        Self {
            writer: Mutex::new(writer),
            table: table.into(),
            layout,
        }
    }

    pub fn into_inner(self) -> Result<W> {
        self.writer
            .into_inner()
            .map_err(|_| ScanError::OutputError("console writer lock poisoned".to_string()))
    }

    fn render(&self, entry: &HostEntry) -> Result<String> {
        let row: serde_json::Map<String, serde_json::Value> = self
            .layout
            .columns()
            .iter()
            .map(|c| (c.name().to_string(), c.json_value(entry)))
            .collect();
        Ok(serde_json::to_string(&row)?)
    }
}

#[async_trait::async_trait]
impl<W: Write + Send> InventorySink for ConsoleSink<W> {
    async fn create_table(&self) -> Result<()> {
        log::info!(
            "Dry run: table {} ({}) not created",
            self.table,
            self.layout.field_names().join(", ")
        );
        Ok(())
    }

    async fn insert(&self, entry: &HostEntry) -> Result<()> {
        let line = self.render(entry)?;
        let mut writer = self
            .writer
            .lock()
            .map_err(|_| ScanError::OutputError("console writer lock poisoned".to_string()))?;
        writeln!(writer, "{}", line)?;
        Ok(())
    }

    fn table_name(&self) -> &str {
        &self.table
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn entry(ip: &str) -> HostEntry {
        HostEntry {
            ip: ip.to_string(),
            mac_addr: Some("aa:bb:cc:dd:ee:ff".to_string()),
            hostname: "<unresolved>".to_string(),
            scan_time: Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap(),
            state: "STALE".to_string(),
            ping: true,
            generate_on: "scanner-01".to_string(),
        }
    }

    #[tokio::test]
    async fn test_one_line_per_record() {
        let sink = ConsoleSink::new(Vec::new(), "ScanIntranet", TableLayout::Extended);
        sink.insert(&entry("10.0.0.5")).await.unwrap();
        sink.insert(&entry("10.0.0.6")).await.unwrap();

        let output = String::from_utf8(sink.into_inner().unwrap()).unwrap();
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 2);

        let row: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(row["IP"], "10.0.0.5");
        assert_eq!(row["MACADDR"], "aa:bb:cc:dd:ee:ff");
        assert_eq!(row["Ping"], true);
        assert_eq!(row["Generateon"], "scanner-01");
    }

    #[tokio::test]
    async fn test_basic_layout_keys() {
        let sink = ConsoleSink::new(Vec::new(), "ScanIntranet", TableLayout::Basic);
        sink.create_table().await.unwrap();
        sink.insert(&entry("10.0.0.5")).await.unwrap();

        let output = String::from_utf8(sink.into_inner().unwrap()).unwrap();
        let row: serde_json::Value = serde_json::from_str(output.trim()).unwrap();
        let keys: Vec<&String> = row.as_object().unwrap().keys().collect();
        assert_eq!(keys.len(), 4);
        assert!(row.get("MACADDR").is_none());
    }
}
