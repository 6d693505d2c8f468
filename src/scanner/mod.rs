//! Scanner module containing the scan engine and its result summary

pub mod engine;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub use engine::ScanEngine;

/// Counts collected over one scan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanSummary {
    /// Timestamp stamped on every record of this scan
    pub scan_time: DateTime<Utc>,

    /// Neighbor table lines read
    pub lines_seen: usize,

    /// Records written to the sink
    pub inserted: usize,

    /// Malformed neighbor lines skipped
    pub skipped: usize,

    /// Records carrying the unresolved hostname sentinel
    pub unresolved: usize,

    /// Records flagged alive
    pub alive: usize,

    /// Addresses reported by the liveness sweep
    pub swept: usize,
}

impl ScanSummary {
    pub fn new(scan_time: DateTime<Utc>) -> Self {
        Self {
            scan_time,
            lines_seen: 0,
            inserted: 0,
            skipped: 0,
            unresolved: 0,
            alive: 0,
            swept: 0,
        }
    }
}
