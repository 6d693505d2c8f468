//! Error handling for the intranet scanner
//!
//! Every failure a scan can hit is a [`ScanError`]. Most of them end the scan;
//! the few that a scan recovers from locally are reported by
//! [`ScanError::is_recoverable`].

use thiserror::Error;

/// Main error type for scanning operations
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("Command error: {0}")]
    CommandError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Resolve error: {0}")]
    ResolveError(String),

    #[error("Invalid target: {0}")]
    InvalidTarget(String),

    #[error("Probe error: {0}")]
    ProbeError(String),

    #[error("Output error: {0}")]
    OutputError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl ScanError {
    /// Errors a scan handles in place instead of aborting.
    ///
    /// A failed reverse lookup falls back to the unresolved sentinel, a
    /// malformed neighbor line is skipped and a failed host probe leaves the
    /// liveness flag untouched.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            ScanError::ResolveError(_) | ScanError::ParseError(_) | ScanError::ProbeError(_)
        )
    }

    /// Build a command error for a tool that could not be run at all.
    pub fn spawn_failed(tool: &str, err: std::io::Error) -> Self {
        ScanError::CommandError(format!("failed to run {}: {}", tool, err))
    }
}

/// Convert common errors to ScanError
impl From<std::net::AddrParseError> for ScanError {
    fn from(e: std::net::AddrParseError) -> Self {
        ScanError::InvalidTarget(e.to_string())
    }
}

impl From<ipnetwork::IpNetworkError> for ScanError {
    fn from(e: ipnetwork::IpNetworkError) -> Self {
        ScanError::InvalidTarget(e.to_string())
    }
}

impl From<sea_orm::DbErr> for ScanError {
    fn from(e: sea_orm::DbErr) -> Self {
        ScanError::DatabaseError(e.to_string())
    }
}

impl From<sea_orm::sea_query::error::Error> for ScanError {
    fn from(e: sea_orm::sea_query::error::Error) -> Self {
        ScanError::DatabaseError(e.to_string())
    }
}

impl From<url::ParseError> for ScanError {
    fn from(e: url::ParseError) -> Self {
        ScanError::ConfigError(format!("invalid database URL: {}", e))
    }
}

impl From<toml::de::Error> for ScanError {
    fn from(e: toml::de::Error) -> Self {
        ScanError::ConfigError(format!("failed to parse TOML: {}", e))
    }
}

impl From<serde_json::Error> for ScanError {
    fn from(e: serde_json::Error) -> Self {
        ScanError::OutputError(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recoverable_classification() {
        assert!(ScanError::ResolveError("no PTR".to_string()).is_recoverable());
        assert!(ScanError::ParseError("empty line".to_string()).is_recoverable());
        assert!(ScanError::ProbeError("ping missing".to_string()).is_recoverable());

        assert!(!ScanError::CommandError("ip neigh".to_string()).is_recoverable());
        assert!(!ScanError::DatabaseError("insert".to_string()).is_recoverable());
        assert!(!ScanError::ConfigError("POSTGRES_URL".to_string()).is_recoverable());
    }

    #[test]
    fn test_address_parse_error_maps_to_invalid_target() {
        let err: ScanError = "not-an-ip".parse::<std::net::IpAddr>().unwrap_err().into();
        assert!(matches!(err, ScanError::InvalidTarget(_)));
    }

    #[test]
    fn test_db_error_maps_to_database_error() {
        let err: ScanError = sea_orm::DbErr::Custom("connection refused".to_string()).into();
        assert!(matches!(err, ScanError::DatabaseError(_)));
        assert!(err.to_string().contains("connection refused"));
    }

    #[test]
    fn test_spawn_failed_names_tool() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "No such file or directory");
        let err = ScanError::spawn_failed("fping", io);
        assert!(err.to_string().contains("fping"));
        assert!(!err.is_recoverable());
    }
}
