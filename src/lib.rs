//! scanintranet - one-shot inventory of the local network segment
//!
//! Reads the kernel neighbor table, sweeps the subnet for live hosts,
//! resolves hostnames and writes one record per neighbor into PostgreSQL.

pub mod config;
pub mod discovery;
pub mod error;
pub mod inventory;
pub mod scanner;
pub mod storage;
pub mod utils;

// Re-export commonly used types
pub use config::ScanConfig;
pub use error::ScanError;
pub use inventory::{HostEntry, ScanContext};
pub use scanner::{ScanEngine, ScanSummary};
pub use storage::{InventorySink, TableLayout};

/// Result type alias for scan operations
pub type Result<T> = std::result::Result<T, ScanError>;
