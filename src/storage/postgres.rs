//! PostgreSQL sink
//!
//! Statements are built with `sea_query` so the table name and the column set
//! stay runtime values taken from the configuration.

use super::{Column, DatabaseLocation, InventorySink, TableLayout};
use crate::inventory::HostEntry;
use crate::{Result, ScanError};
use sea_orm::sea_query::{Alias, ColumnDef, InsertStatement, Query, SimpleExpr, Table, TableCreateStatement};
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection};

/// Inventory sink writing one row per record into PostgreSQL
pub struct PostgresSink {
    db: DatabaseConnection,
    table: String,
    layout: TableLayout,
}

impl PostgresSink {
    /// Open a connection to the database at `location`
    pub async fn connect(
        location: &DatabaseLocation,
        table: impl Into<String>,
        layout: TableLayout,
    ) -> Result<Self> {
        log::debug!("Connect to {}:{}", location.host(), location.port());

        let mut options = ConnectOptions::new(location.connection_url());
        options
            .max_connections(1)
            .sqlx_logging_level(log::LevelFilter::Debug);

        let db = Database::connect(options).await.map_err(|e| {
            ScanError::DatabaseError(format!("Error opening connection to {}: {}", location, e))
        })?;
        log::info!("Connected to {}", location);

        Ok(Self::from_connection(db, table, layout))
    }

    /// Wrap an already established connection
    pub fn from_connection(db: DatabaseConnection, table: impl Into<String>, layout: TableLayout) -> Self {
        Self {
            db,
            table: table.into(),
            layout,
        }
    }

    /// Give the connection back, e.g. to inspect a mock's transaction log
    pub fn into_connection(self) -> DatabaseConnection {
        self.db
    }

    pub fn create_table_statement(&self) -> TableCreateStatement {
        let mut statement = Table::create();
        statement.table(Alias::new(&self.table)).if_not_exists();
        for column in self.layout.columns() {
            statement.col(&mut column_def(*column));
        }
        statement
    }

    pub fn insert_statement(&self, entry: &HostEntry) -> Result<InsertStatement> {
        let columns = self.layout.columns();

        let mut statement = Query::insert();
        statement
            .into_table(Alias::new(&self.table))
            .columns(columns.iter().map(|c| Alias::new(c.name())))
            .values(columns.iter().map(|c| column_value(*c, entry)))?;
        Ok(statement)
    }
}

fn column_def(column: Column) -> ColumnDef {
    let mut def = ColumnDef::new(Alias::new(column.name()));
    match column {
        Column::Ip => def.string().not_null(),
        Column::MacAddr => def.string().null(),
        Column::Hostname | Column::State | Column::GenerateOn => def.string(),
        Column::ScanTime => def.timestamp_with_time_zone(),
        Column::Ping => def.boolean(),
    };
    def
}

fn column_value(column: Column, entry: &HostEntry) -> SimpleExpr {
    match column {
        Column::Ip => entry.ip.clone().into(),
        Column::MacAddr => entry.mac_addr.clone().into(),
        Column::Hostname => entry.hostname.clone().into(),
        Column::ScanTime => entry.scan_time.into(),
        Column::State => entry.state.clone().into(),
        Column::Ping => entry.ping.into(),
        Column::GenerateOn => entry.generate_on.clone().into(),
    }
}

#[async_trait::async_trait]
impl InventorySink for PostgresSink {
    async fn create_table(&self) -> Result<()> {
        let backend = self.db.get_database_backend();
        self.db
            .execute(backend.build(&self.create_table_statement()))
            .await
            .map_err(|e| ScanError::DatabaseError(format!("Database creating failed: {}", e)))?;
        log::info!("Table {} ready ({:?} layout)", self.table, self.layout);
        Ok(())
    }

    async fn insert(&self, entry: &HostEntry) -> Result<()> {
        let backend = self.db.get_database_backend();
        let statement = backend.build(&self.insert_statement(entry)?);
        self.db
            .execute(statement)
            .await
            .map_err(|e| ScanError::DatabaseError(format!("Record insert error for {}: {}", entry.ip, e)))?;
        Ok(())
    }

    fn table_name(&self) -> &str {
        &self.table
    }
}
