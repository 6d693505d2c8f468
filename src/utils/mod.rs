//! Utility helpers for the scanner binary

use log::LevelFilter;

/// Environment variable holding `env_logger` filter directives
const LOG_ENV: &str = "RUST_LOG";

/// Logging utilities
pub struct Logger;

impl Logger {
    /// Initialize logger for the given `-v` count
    ///
    /// Without `-v` the level comes from `RUST_LOG`, or warn when it is unset.
    /// An explicit `-v` overrides the global level but keeps module directives.
    pub fn init(verbosity: u8) {
        Self::builder(verbosity, std::env::var(LOG_ENV).ok().as_deref()).init();
    }

    fn builder(verbosity: u8, filters: Option<&str>) -> env_logger::Builder {
        let mut builder = env_logger::Builder::new();
        builder
            .filter_level(LevelFilter::Warn)
            .format_timestamp_secs();

        if let Some(filters) = filters {
            builder.parse_filters(filters);
        }
        if verbosity > 0 {
            builder.filter_level(Self::level_for_verbosity(verbosity));
        }
        builder
    }

    /// Map the number of `-v` flags to a level filter
    pub fn level_for_verbosity(verbosity: u8) -> LevelFilter {
        match verbosity {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }
}
